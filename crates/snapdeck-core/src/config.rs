use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Longest heavy task a config may ask for (one day)
const MAX_TASK_SECONDS: f64 = 86_400.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub fullpage: FullPageConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub clock: ClockConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Refresh rate while a transition or stress task is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Pixel height of one terminal row, used to scale drag gestures
    #[serde(default = "default_cell_pixels")]
    pub cell_pixels: f64,
    /// Input latency above this is shown as degraded
    #[serde(default = "default_latency_warn_ms")]
    pub latency_warn_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            cell_pixels: default_cell_pixels(),
            latency_warn_ms: default_latency_warn_ms(),
        }
    }
}

/// Easing curve used for section transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingType {
    /// Jump at the end of the transition
    None,
    Linear,
    /// Cubic ease-in-out: 4t³ below 0.5, 1 - (-2t+2)³/2 above
    #[default]
    CubicInOut,
    /// Cubic ease-out: 1 - (1-t)³
    Cubic,
    /// Quintic ease-out: 1 - (1-t)⁵
    Quintic,
    /// Exponential ease-out: 1 - 2^(-10t)
    EaseOut,
}

/// Full-page section scrolling options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullPageConfig {
    /// Transition duration in milliseconds (0 = instant)
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Wrap around at the first/last section
    #[serde(default, rename = "loop")]
    pub looping: bool,
    /// Deep-link names, one per section
    #[serde(default = "default_anchors")]
    pub anchors: Vec<String>,
    /// Minimum gap between two wheel-driven transitions
    #[serde(default = "default_wheel_cooldown_ms")]
    pub wheel_cooldown_ms: u64,
    /// Drag distance (pixels) needed to count as a swipe
    #[serde(default = "default_touch_threshold")]
    pub touch_threshold: f64,
    /// Arrow/PageUp/PageDown/Space/Home/End navigation
    #[serde(default = "default_true")]
    pub keyboard: bool,
    /// Replace the current history entry instead of pushing a new one
    #[serde(default = "default_true")]
    pub replace_history: bool,
    /// Skip interpolation entirely
    #[serde(default)]
    pub reduced_motion: bool,
}

impl Default for FullPageConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            easing: EasingType::default(),
            looping: false,
            anchors: default_anchors(),
            wheel_cooldown_ms: default_wheel_cooldown_ms(),
            touch_threshold: default_touch_threshold(),
            keyboard: default_true(),
            replace_history: default_true(),
            reduced_motion: false,
        }
    }
}

/// Background compute task sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Hand the canvas to the worker when possible
    #[serde(default = "default_true")]
    pub offscreen: bool,
    /// Length of one demo run
    #[serde(default = "default_seconds")]
    pub seconds: f64,
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    /// Random floats per array pass
    #[serde(default = "default_array_len")]
    pub array_len: usize,
    /// Records per JSON round trip
    #[serde(default = "default_json_items")]
    pub json_items: usize,
    #[serde(default = "default_grayscale_passes")]
    pub grayscale_passes: u32,
    /// Interval between partial images in the fallback path (0 = final image only)
    #[serde(default = "default_partial_interval_ms")]
    pub partial_interval_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            offscreen: default_true(),
            seconds: default_seconds(),
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            array_len: default_array_len(),
            json_items: default_json_items(),
            grayscale_passes: default_grayscale_passes(),
            partial_interval_ms: default_partial_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Log every clock worker tick
    #[serde(default)]
    pub log_ticks: bool,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapdeck")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_cell_pixels() -> f64 {
    16.0
}

fn default_latency_warn_ms() -> u64 {
    80
}

fn default_duration_ms() -> u64 {
    800
}

fn default_anchors() -> Vec<String> {
    ["intro", "clock", "stress", "canvas", "about"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_wheel_cooldown_ms() -> u64 {
    500
}

fn default_touch_threshold() -> f64 {
    60.0
}

fn default_seconds() -> f64 {
    5.0
}

fn default_canvas_width() -> u32 {
    320
}

fn default_canvas_height() -> u32 {
    180
}

fn default_array_len() -> usize {
    6_000_000
}

fn default_json_items() -> usize {
    80_000
}

fn default_grayscale_passes() -> u32 {
    3
}

fn default_partial_interval_ms() -> u64 {
    250
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/snapdeck/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("snapdeck")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the TUI log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("snapdeck.log")
    }

    fn validate(&self) -> crate::Result<()> {
        if self.worker.canvas_width == 0 || self.worker.canvas_height == 0 {
            return Err(crate::Error::Config(
                "worker canvas dimensions must be non-zero".to_string(),
            ));
        }
        if !(0.0..=MAX_TASK_SECONDS).contains(&self.worker.seconds) {
            return Err(crate::Error::Config(format!(
                "worker.seconds must be between 0 and {}, got {}",
                MAX_TASK_SECONDS,
                self.worker.seconds
            )));
        }
        if !(self.fullpage.touch_threshold.is_finite() && self.fullpage.touch_threshold >= 0.0) {
            return Err(crate::Error::Config(format!(
                "fullpage.touch_threshold must be a non-negative number, got {}",
                self.fullpage.touch_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.fullpage.duration_ms, 800);
        assert_eq!(config.fullpage.easing, EasingType::CubicInOut);
        assert!(!config.fullpage.looping);
        assert_eq!(config.fullpage.wheel_cooldown_ms, 500);
        assert!((config.fullpage.touch_threshold - 60.0).abs() < f64::EPSILON);
        assert!(config.fullpage.keyboard);
        assert!(config.fullpage.replace_history);
        assert_eq!(config.worker.canvas_width, 320);
        assert_eq!(config.worker.canvas_height, 180);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::parse(
            r#"
            [fullpage]
            duration_ms = 900
            loop = true
            easing = "linear"
            anchors = ["home", "work", "contact"]
            "#,
        )
        .unwrap();
        assert_eq!(config.fullpage.duration_ms, 900);
        assert!(config.fullpage.looping);
        assert_eq!(config.fullpage.easing, EasingType::Linear);
        assert_eq!(config.fullpage.anchors, vec!["home", "work", "contact"]);
        assert_eq!(config.fullpage.wheel_cooldown_ms, 500);
        assert_eq!(config.ui.tick_rate_ms, 100);
    }

    #[test]
    fn test_rejects_zero_canvas() {
        let err = AppConfig::parse("[worker]\ncanvas_width = 0\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_rejects_out_of_range_seconds() {
        for text in ["[worker]\nseconds = 1e20\n", "[worker]\nseconds = -1.0\n", "[worker]\nseconds = nan\n"] {
            let err = AppConfig::parse(text).unwrap_err();
            assert!(matches!(err, crate::Error::Config(_)), "{}", text);
        }
        assert!(AppConfig::parse("[worker]\nseconds = 2.5\n").is_ok());
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::parse(&text).unwrap();
        assert_eq!(parsed.fullpage.anchors, config.fullpage.anchors);
    }
}
