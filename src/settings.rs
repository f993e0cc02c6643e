//! Game settings and rules
//!
//! Persisted separately from the leaderboard (LocalStorage on web, a JSON
//! file on native).

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which rule set a run plays with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Dodge only
    #[default]
    Classic,
    /// Dodge and shoot
    Shooter,
    /// Dodge, with a bonus for every second survived
    Survival,
    /// Shooting and survival bonus together
    Arcade,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Shooter => "Shooter",
            Variant::Survival => "Survival",
            Variant::Arcade => "Arcade",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" | "dodge" => Some(Variant::Classic),
            "shooter" | "shoot" => Some(Variant::Shooter),
            "survival" | "time" => Some(Variant::Survival),
            "arcade" | "all" => Some(Variant::Arcade),
            _ => None,
        }
    }

    /// Whether fire intents spawn projectiles
    pub fn shooting_enabled(&self) -> bool {
        matches!(self, Variant::Shooter | Variant::Arcade)
    }

    /// Whether survival time accrues a bonus
    pub fn time_bonus_enabled(&self) -> bool {
        matches!(self, Variant::Survival | Variant::Arcade)
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown variant '{s}'"))
    }
}

/// Data-driven game balance. Defaults match `crate::consts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_bottom_offset: f32,
    pub lateral_step: f32,
    pub max_speed: f32,
    pub speed_step: f32,
    pub swipe_speed_factor: f32,

    // === Road ===
    pub road_speed: f32,
    pub road_mark_period: f32,

    // === Opponents ===
    pub opponent_count: usize,
    pub opponent_width: f32,
    pub opponent_height: f32,
    pub opponent_spacing: f32,
    pub opponent_respawn_y: f32,
    pub opponent_min_speed: f32,
    pub opponent_speed_range: f32,

    // === Shooting ===
    pub fire_rate_ms: f64,
    pub projectile_speed: f32,
    pub projectile_size: f32,

    // === Scoring ===
    pub pass_reward: u64,
    pub hit_reward: u64,
    pub time_bonus_interval_ms: f64,
    pub time_bonus_rate: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_bottom_offset: PLAYER_BOTTOM_OFFSET,
            lateral_step: LATERAL_STEP,
            max_speed: MAX_SPEED,
            speed_step: SPEED_STEP,
            swipe_speed_factor: SWIPE_SPEED_FACTOR,

            road_speed: ROAD_SPEED,
            road_mark_period: ROAD_MARK_PERIOD,

            opponent_count: OPPONENT_COUNT,
            opponent_width: PLAYER_WIDTH,
            opponent_height: PLAYER_HEIGHT,
            opponent_spacing: OPPONENT_SPACING,
            opponent_respawn_y: OPPONENT_RESPAWN_Y,
            opponent_min_speed: OPPONENT_MIN_SPEED,
            opponent_speed_range: OPPONENT_SPEED_RANGE,

            fire_rate_ms: FIRE_RATE_MS,
            projectile_speed: PROJECTILE_SPEED,
            projectile_size: PROJECTILE_SIZE,

            pass_reward: PASS_REWARD,
            hit_reward: HIT_REWARD,
            time_bonus_interval_ms: TIME_BONUS_INTERVAL_MS,
            time_bonus_rate: TIME_BONUS_RATE,
        }
    }
}

impl Rules {
    /// Largest legal player x
    #[inline]
    pub fn player_max_x(&self) -> f32 {
        (self.field_width - self.player_width).max(0.0)
    }

    /// Largest legal opponent x at spawn time
    #[inline]
    pub fn opponent_max_x(&self) -> f32 {
        (self.field_width - self.opponent_width).max(0.0)
    }

    /// Fixed player y (top edge)
    #[inline]
    pub fn player_y(&self) -> f32 {
        self.field_height - self.player_bottom_offset
    }

    /// Reject values the step function cannot run with.
    ///
    /// Sizes, periods, intervals and `max_speed` must be positive and
    /// finite; every other float must be finite and the fire rate
    /// non-negative.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("max_speed", self.max_speed),
            ("road_mark_period", self.road_mark_period),
            ("opponent_width", self.opponent_width),
            ("opponent_height", self.opponent_height),
            ("projectile_size", self.projectile_size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                let msg = format!("{name} must be positive, got {value}");
                return Err(SettingsError::Invalid(msg));
            }
        }

        let finite = [
            ("player_bottom_offset", self.player_bottom_offset),
            ("lateral_step", self.lateral_step),
            ("speed_step", self.speed_step),
            ("swipe_speed_factor", self.swipe_speed_factor),
            ("road_speed", self.road_speed),
            ("opponent_spacing", self.opponent_spacing),
            ("opponent_respawn_y", self.opponent_respawn_y),
            ("opponent_min_speed", self.opponent_min_speed),
            ("opponent_speed_range", self.opponent_speed_range),
            ("projectile_speed", self.projectile_speed),
        ];
        if let Some((name, value)) = finite.into_iter().find(|(_, v)| !v.is_finite()) {
            let msg = format!("{name} must be finite, got {value}");
            return Err(SettingsError::Invalid(msg));
        }

        let interval = self.time_bonus_interval_ms;
        if !(interval.is_finite() && interval > 0.0) {
            let msg = format!("time_bonus_interval_ms must be positive, got {interval}");
            return Err(SettingsError::Invalid(msg));
        }
        let fire_rate = self.fire_rate_ms;
        if !(fire_rate.is_finite() && fire_rate >= 0.0) {
            let msg = format!("fire_rate_ms must be non-negative, got {fire_rate}");
            return Err(SettingsError::Invalid(msg));
        }
        if self.opponent_count == 0 {
            return Err(SettingsError::Invalid("opponent_count must be at least 1".into()));
        }
        Ok(())
    }
}

/// Settings load/save failures
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid rules: {0}")]
    Invalid(String),
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Rule set for new runs
    pub variant: Variant,
    /// Tunables
    pub rules: Rules,
    /// Last name submitted to the leaderboard (prefills the entry box)
    pub last_player_name: Option<String>,
    /// Leaderboard file (native only; None = in-memory)
    pub leaderboard_path: Option<std::path::PathBuf>,
}

impl Settings {
    /// Create settings for a variant with default rules
    pub fn from_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Remember the last submitted name, ignoring blanks
    pub fn remember_name(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() {
            self.last_player_name = Some(name.to_string());
        }
    }

    /// Parse settings JSON and check the rules
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.rules.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn read_from(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write settings to a JSON file
    pub fn write_to(&self, path: &std::path::Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from a file, falling back to defaults
    pub fn load_from(path: &std::path::Path) -> Self {
        match Self::read_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) => {
                log::info!("Using default settings ({e})");
                Self::default()
            }
            Err(e) => {
                log::warn!(
                    "Ignoring {} ({e}), using default settings",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "road_dodger_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring saved settings ({e})"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}
