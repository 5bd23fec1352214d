use crate::mouse_gestures::engine::DEFAULT_MIN_DISTANCE;
use crate::mouse_gestures::patterns::MatchPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GestureSettings {
    /// Minimum movement in pixels on either axis before a direction is
    /// recorded.
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default)]
    pub match_policy: MatchPolicy,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            min_distance: default_min_distance(),
            match_policy: MatchPolicy::default(),
        }
    }
}

impl GestureSettings {
    pub fn min_distance(&self) -> f32 {
        if self.min_distance.is_finite() && self.min_distance > 0.0 {
            self.min_distance
        } else {
            tracing::warn!(
                "configured min_distance {} is not a positive number; using default {}",
                self.min_distance,
                DEFAULT_MIN_DISTANCE
            );
            DEFAULT_MIN_DISTANCE
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrailSettings {
    /// Time a trail point stays fully visible, in milliseconds.
    #[serde(default = "default_point_lifetime")]
    pub point_lifetime_ms: u64,
    /// Fade-out time after the lifetime expires.
    #[serde(default = "default_fade")]
    pub fade_ms: u64,
    #[serde(default = "default_max_points")]
    pub max_points: usize,
    #[serde(default = "default_point_size")]
    pub point_size: f32,
    #[serde(default = "default_point_color")]
    pub point_color: String,
    /// Delay between gesture end and clearing the trail.
    #[serde(default = "default_clear_delay")]
    pub clear_delay_ms: u64,
    /// Delay between gesture end and hiding the direction label.
    #[serde(default = "default_label_hide")]
    pub label_hide_ms: u64,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            point_lifetime_ms: default_point_lifetime(),
            fade_ms: default_fade(),
            max_points: default_max_points(),
            point_size: default_point_size(),
            point_color: default_point_color(),
            clear_delay_ms: default_clear_delay(),
            label_hide_ms: default_label_hide(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_notification_duration")]
    pub duration_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: default_notification_duration(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Settings {
    /// When enabled the logger is initialised at debug level and honours
    /// `RUST_LOG`.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional log file. Logs go to stderr when unset.
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub gestures: GestureSettings,
    #[serde(default)]
    pub trail: TrailSettings,
    #[serde(default)]
    pub notification: NotificationSettings,
}

fn default_min_distance() -> f32 {
    DEFAULT_MIN_DISTANCE
}

fn default_point_lifetime() -> u64 {
    1000
}

fn default_fade() -> u64 {
    500
}

fn default_max_points() -> usize {
    100
}

fn default_point_size() -> f32 {
    4.0
}

fn default_point_color() -> String {
    "#ff1493".to_string()
}

fn default_clear_delay() -> u64 {
    500
}

fn default_label_hide() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_notification_duration() -> u64 {
    2000
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn min_distance(&self) -> f32 {
        self.gestures.min_distance()
    }
}
