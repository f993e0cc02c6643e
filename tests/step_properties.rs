//! State invariants that must hold for any input sequence

use proptest::prelude::*;

use road_dodger::settings::{Rules, Variant};
use road_dodger::sim::{GamePhase, GameState, PointerDelta, StepInput, seeded, start_run, step};

fn arb_pointer() -> impl Strategy<Value = Option<PointerDelta>> {
    let delta = (-300.0f32..300.0, -300.0f32..300.0, any::<bool>());
    let pointer = delta.prop_map(|(dx, dy, is_tap)| PointerDelta { dx, dy, is_tap });
    prop::option::of(pointer)
}

fn arb_input() -> impl Strategy<Value = StepInput> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        arb_pointer(),
    )
        .prop_map(|(left, right, accelerate, decelerate, fire, pointer)| StepInput {
            left,
            right,
            accelerate,
            decelerate,
            fire,
            pointer,
        })
}

fn arb_variant() -> impl Strategy<Value = Variant> {
    prop_oneof![
        Just(Variant::Classic),
        Just(Variant::Shooter),
        Just(Variant::Survival),
        Just(Variant::Arcade),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn player_and_obstacles_stay_in_bounds(
        seed in any::<u64>(),
        variant in arb_variant(),
        frames in prop::collection::vec((arb_input(), 0.0f64..50.0), 1..300),
    ) {
        let rules = Rules::default();
        let mut state = GameState::new(variant, rules.clone());
        let mut rng = seeded(seed);
        start_run(&mut state, &mut rng);

        for (input, dt) in &frames {
            let result = step(&mut state, &mut rng, input, *dt);
            prop_assert!(result.player.x >= 0.0);
            prop_assert!(result.player.x <= rules.field_width - rules.player_width);
            prop_assert!((0.0..=rules.max_speed).contains(&result.speed));
            prop_assert!((0.0..rules.road_mark_period).contains(&result.road_offset));
            prop_assert_eq!(result.obstacles.len(), rules.opponent_count);
            for obstacle in &result.obstacles {
                prop_assert!(obstacle.y < rules.field_height);
                prop_assert!(obstacle.x >= 0.0);
                prop_assert!(obstacle.x <= rules.field_width - rules.opponent_width);
            }
            if !variant.shooting_enabled() {
                prop_assert!(result.projectiles.is_empty());
            }
            if !variant.time_bonus_enabled() {
                prop_assert_eq!(result.time_bonus, 0);
            }
            if result.phase == GamePhase::GameOver {
                break;
            }
        }
    }

    #[test]
    fn score_only_moves_in_reward_units(
        seed in any::<u64>(),
        frames in prop::collection::vec(arb_input(), 1..300),
    ) {
        let mut state = GameState::new(Variant::Arcade, Rules::default());
        let mut rng = seeded(seed);
        start_run(&mut state, &mut rng);

        let mut last_score = 0;
        let mut last_bonus = 0;
        for input in &frames {
            let result = step(&mut state, &mut rng, input, 16.0);
            prop_assert!(result.score >= last_score);
            prop_assert_eq!((result.score - last_score) % 100, 0);
            prop_assert!(result.time_bonus >= last_bonus);
            prop_assert_eq!(result.total_score, result.score + result.time_bonus);
            last_score = result.score;
            last_bonus = result.time_bonus;
            if result.just_ended {
                break;
            }
        }
    }

    #[test]
    fn game_over_freezes_until_restart(
        seed in any::<u64>(),
        tail in prop::collection::vec(arb_input(), 1..20),
    ) {
        let mut state = GameState::new(Variant::Shooter, Rules::default());
        let mut rng = seeded(seed);
        start_run(&mut state, &mut rng);

        // Park the car under the first obstacle until they meet
        let mut ended = false;
        for _ in 0..10_000 {
            state.player.pos.x = state.obstacles[0].pos.x.clamp(0.0, 740.0);
            let result = step(&mut state, &mut rng, &StepInput::default(), 16.0);
            if result.just_ended {
                ended = true;
                break;
            }
        }
        prop_assert!(ended);

        let frozen = state.clone();
        for input in &tail {
            let result = step(&mut state, &mut rng, input, 16.0);
            prop_assert_eq!(result.phase, GamePhase::GameOver);
            prop_assert!(!result.just_ended);
        }
        prop_assert_eq!(&state.player, &frozen.player);
        prop_assert_eq!(&state.obstacles, &frozen.obstacles);
        prop_assert_eq!(state.score, frozen.score);

        let restarted = start_run(&mut state, &mut rng);
        prop_assert_eq!(restarted.phase, GamePhase::Playing);
        prop_assert_eq!(restarted.score, 0);
    }

    #[test]
    fn start_run_is_idempotent(seed in any::<u64>(), variant in arb_variant()) {
        let mut state = GameState::new(variant, Rules::default());
        let mut rng = seeded(seed);
        start_run(&mut state, &mut rng);
        state.score = 1234;
        state.spawn_projectile();
        let first = start_run(&mut state, &mut rng);
        let second = start_run(&mut state, &mut rng);

        for result in [&first, &second] {
            prop_assert_eq!(result.phase, GamePhase::Playing);
            prop_assert_eq!(result.score, 0);
            prop_assert_eq!(result.time_bonus, 0);
            prop_assert_eq!(result.speed, 0.0);
            prop_assert!(result.projectiles.is_empty());
            prop_assert_eq!(result.obstacles.len(), 3);
            prop_assert_eq!(result.player, first.player);
        }
        for (a, b) in first.obstacles.iter().zip(&second.obstacles) {
            prop_assert_eq!(a.y, b.y);
        }
    }

    #[test]
    fn rapid_fire_yields_one_shot_per_window(
        seed in any::<u64>(),
        presses in 2usize..30,
        dt in 1.0f64..40.0,
    ) {
        let mut state = GameState::new(Variant::Shooter, Rules::default());
        let mut rng = seeded(seed);
        start_run(&mut state, &mut rng);
        // Keep the road clear so nothing ends the run or eats projectiles
        for obstacle in &mut state.obstacles {
            obstacle.pos.y = -1.0e6;
            obstacle.speed = 0.0;
        }

        let fire = StepInput { fire: true, ..Default::default() };
        let mut spawned = 0;
        let mut last_len = 0;
        for _ in 0..presses {
            step(&mut state, &mut rng, &fire, dt);
            if state.projectiles.len() > last_len {
                spawned += state.projectiles.len() - last_len;
            }
            last_len = state.projectiles.len();
        }
        // One shot immediately, then one per full 500ms window
        let expected_max = 1 + ((presses as f64 * dt) / 500.0).floor() as usize;
        prop_assert!(spawned >= 1);
        prop_assert!(spawned <= expected_max);
    }
}
