//! Blur configuration.
//!
//! One immutable [`BlurConfig`] is built up front and passed into every blur
//! call; nothing is read from mutable widget state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::blur::check_radius;
use crate::error::Result;
use crate::scale::check_scale_factor;

/// Where the blur runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExecutionMode {
    /// Block the calling thread until the blur is done.
    Sync,
    /// Run on a background worker and deliver the result later.
    #[default]
    Async,
}

/// How often the backdrop is re-blurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RefreshMode {
    /// Blur the first frame only.
    #[default]
    Once,
    /// Blur again every time the backdrop changes.
    Continuous,
}

/// Blur parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BlurConfig {
    /// Blur strength. Truncated toward zero to get the integer stack radius.
    pub radius: f32,
    /// Downscale divisor applied to the captured region before blurring.
    pub scale_factor: f32,
    pub mode: ExecutionMode,
    pub refresh: RefreshMode,
}

impl BlurConfig {
    /// Attribute-style radius is divided by this.
    pub const RADIUS_ATTR_DIVISOR: f32 = 10.0;
    /// Attribute-style scale factor is multiplied by this.
    pub const SCALE_ATTR_MULTIPLIER: f32 = 8.0;

    pub const DEFAULT_RADIUS_ATTR: f32 = 20.0;
    pub const DEFAULT_SCALE_ATTR: f32 = 1.0;

    /// Build from layout-attribute style values: `radius_attr / 10` and
    /// `scale_attr * 8`.
    pub fn from_attributes(radius_attr: f32, scale_attr: f32, is_async: bool, changing: bool) -> Self {
        Self {
            radius: radius_attr / Self::RADIUS_ATTR_DIVISOR,
            scale_factor: scale_attr * Self::SCALE_ATTR_MULTIPLIER,
            mode: if is_async {
                ExecutionMode::Async
            } else {
                ExecutionMode::Sync
            },
            refresh: if changing {
                RefreshMode::Continuous
            } else {
                RefreshMode::Once
            },
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_refresh(mut self, refresh: RefreshMode) -> Self {
        self.refresh = refresh;
        self
    }

    /// Integer stack radius, validated.
    pub fn blur_radius(&self) -> Result<u32> {
        let truncated = if self.radius.is_finite() {
            self.radius.trunc() as i64
        } else {
            i64::MIN
        };
        check_radius(truncated)
    }

    /// Check every field.
    pub fn validate(&self) -> Result<()> {
        self.blur_radius()?;
        check_scale_factor(self.scale_factor)?;
        Ok(())
    }
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self::from_attributes(Self::DEFAULT_RADIUS_ATTR, Self::DEFAULT_SCALE_ATTR, true, false)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_json_roundtrip() {
        let cfg = BlurConfig::default()
            .with_radius(7.5)
            .with_mode(ExecutionMode::Sync)
            .with_refresh(RefreshMode::Continuous);
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"mode\":\"sync\""), "{json}");
        assert!(json.contains("\"refresh\":\"continuous\""), "{json}");
        let back: BlurConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_enum_names_snake_case() {
        assert_eq!(serde_json::to_string(&ExecutionMode::Async).unwrap(), "\"async\"");
        assert_eq!(serde_json::to_string(&RefreshMode::Once).unwrap(), "\"once\"");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let cfg: BlurConfig = serde_json::from_str(r#"{"radius": 5.0}"#).unwrap();
        assert_eq!(cfg, BlurConfig::default().with_radius(5.0));
        assert_eq!(cfg.blur_radius(), Ok(5));

        let empty: BlurConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, BlurConfig::default());
    }
}
