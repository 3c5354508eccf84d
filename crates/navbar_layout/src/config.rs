//! Header and screen configuration
//!
//! All timing constants are tunable because their best values depend on the
//! device and platform rather than on any invariant of the header itself.
//!
//! ```toml
//! [header]
//! settle_debounce_ms = 50
//! snap_cooldown_ms = 400
//!
//! [scroll]
//! snap_duration_ms = 250
//! easing = "ease_in_out_cubic"
//!
//! [finder]
//! scrollable_sibling_of_marker = true
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::finder::FinderCapabilities;
use crate::scroll::ScrollConfig;

/// Behaviour of the scroll-driven profile header
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileHeaderConfig {
    /// Offset changes at or below this many points are ignored as jitter
    pub dead_zone: f32,
    /// Quiet window after the last offset change before scrolling counts as settled
    pub settle_debounce_ms: u64,
    /// How long a snap blocks further snaps
    pub snap_cooldown_ms: u64,
    /// Fraction of the header height below which a settled header snaps open
    pub snap_threshold: f32,
    /// Bottom edge of the navigation bar (status bar included)
    pub nav_bar_height: f32,
    /// Animate the snap scroll
    pub snap_animated: bool,
}

impl Default for ProfileHeaderConfig {
    fn default() -> Self {
        Self {
            dead_zone: 0.4,
            settle_debounce_ms: 50,
            snap_cooldown_ms: 400,
            snap_threshold: 0.5,
            nav_bar_height: 91.0,
            snap_animated: true,
        }
    }
}

impl ProfileHeaderConfig {
    /// Parse the header table on its own, without a `[header]` section
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_negative_or_nan(self.dead_zone) {
            return Err(invalid("dead_zone", format!("must be >= 0, got {}", self.dead_zone)));
        }
        if !(0.0..=1.0).contains(&self.snap_threshold) {
            return Err(invalid(
                "snap_threshold",
                format!("must be within [0, 1], got {}", self.snap_threshold),
            ));
        }
        if is_negative_or_nan(self.nav_bar_height) {
            return Err(invalid(
                "nav_bar_height",
                format!("must be >= 0, got {}", self.nav_bar_height),
            ));
        }
        Ok(())
    }

    pub fn settle_debounce(&self) -> Duration {
        Duration::from_millis(self.settle_debounce_ms)
    }

    pub fn snap_cooldown(&self) -> Duration {
        Duration::from_millis(self.snap_cooldown_ms)
    }
}

/// Everything a [`ProfileScreen`](crate::screen::ProfileScreen) needs
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub header: ProfileHeaderConfig,
    pub scroll: ScrollConfig,
    pub finder: FinderCapabilities,
    /// Number of list rows below the header
    pub rows: usize,
    /// Height of a single list row
    pub row_height: f32,
    /// Visible height of the scroll container
    pub viewport_height: f32,
    /// Top content inset of the scroll container (navigation chrome under a transparent bar)
    pub content_inset_top: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            header: ProfileHeaderConfig::default(),
            scroll: ScrollConfig::default(),
            finder: FinderCapabilities::default(),
            rows: 40,
            row_height: 72.0,
            viewport_height: 844.0,
            content_inset_top: 0.0,
        }
    }
}

impl ScreenConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.header.validate()?;
        if is_negative_or_nan(config.content_inset_top) {
            return Err(invalid(
                "content_inset_top",
                format!("must be >= 0, got {}", config.content_inset_top),
            ));
        }
        Ok(config)
    }

    pub fn content_height(&self) -> f32 {
        self.rows as f32 * self.row_height
    }
}

fn is_negative_or_nan(value: f32) -> bool {
    value.is_nan() || value < 0.0
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    tracing::warn!("rejected config value for {}: {}", field, reason);
    ConfigError::Invalid { field, reason }
}
