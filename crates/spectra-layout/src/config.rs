//! Layout tuning parameters.
//!
//! Every field has a default; a config file only needs the keys it overrides.

use crate::zoom::{TierTable, ZoomThresholds, ZoomTier};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration value the layout cannot work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("height.min ({min}) exceeds height.max ({max})")]
    InvertedHeightBounds { min: f32, max: f32 },

    #[error("{tier} box width {width} exceeds layout_width {layout_width}")]
    BoxWiderThanLayout {
        tier: ZoomTier,
        width: f32,
        layout_width: f32,
    },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NonFinite { .. } => "E_CONFIG_NON_FINITE",
            Self::Negative { .. } => "E_CONFIG_NEGATIVE",
            Self::InvertedHeightBounds { .. } => "E_CONFIG_HEIGHT_BOUNDS",
            Self::BoxWiderThanLayout { .. } => "E_CONFIG_BOX_WIDTH",
        }
    }
}

fn check(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field, value });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

/// Vine layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fixed width of the layout box, independent of the rendered tier.
    /// Every tier box must fit inside it, the full tier's included.
    pub layout_width: f32,
    /// Horizontal gap between adjacent leaves.
    pub x_gap: f32,
    /// Vertical gap between a parent's bottom edge and its children's top edge.
    pub y_gap: f32,
    pub tiers: TierTable,
    pub height: HeightConfig,
    pub zoom: ZoomThresholds,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layout_width: 800.0,
            x_gap: 60.0,
            y_gap: 120.0,
            tiers: TierTable::default(),
            height: HeightConfig::default(),
            zoom: ZoomThresholds::default(),
        }
    }
}

impl LayoutConfig {
    /// Horizontal distance between consecutive leaf centers.
    pub fn leaf_stride(&self) -> f32 {
        self.layout_width + self.x_gap
    }

    /// Reject values that would produce overlapping or non-finite boxes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("layout_width", self.layout_width)?;
        check("x_gap", self.x_gap)?;
        check("y_gap", self.y_gap)?;

        for tier in ZoomTier::ALL {
            let size = self.tiers.get(tier);
            check("tiers.width", size.width)?;
            check("tiers.height", size.height)?;
            if size.width > self.layout_width {
                return Err(ConfigError::BoxWiderThanLayout {
                    tier,
                    width: size.width,
                    layout_width: self.layout_width,
                });
            }
        }

        check("zoom.dot_below", self.zoom.dot_below)?;
        check("zoom.label_below", self.zoom.label_below)?;
        check("zoom.preview_below", self.zoom.preview_below)?;
        self.height.validate()
    }
}

/// Full-tier content height estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightConfig {
    pub min: f32,
    pub max: f32,
    /// Soft-wrap budget for the full-tier text column.
    pub chars_per_line: usize,
    pub line_height: f32,
    /// Header and padding around the text body.
    pub chrome: f32,
    /// Extra space between paragraphs.
    pub paragraph_gap: f32,
    /// Text column width handed to an external measurer.
    pub column_width: f32,
}

impl Default for HeightConfig {
    fn default() -> Self {
        Self {
            min: 200.0,
            max: 3000.0,
            chars_per_line: 90,
            line_height: 24.0,
            chrome: 96.0,
            paragraph_gap: 12.0,
            column_width: 736.0,
        }
    }
}

impl HeightConfig {
    /// Clamp to `[min, max]`. Never panics: a NaN bound is ignored and a NaN
    /// height clamps to `min`.
    pub fn clamp(&self, height: f32) -> f32 {
        height.max(self.min).min(self.max.max(self.min))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check("height.min", self.min)?;
        check("height.max", self.max)?;
        check("height.line_height", self.line_height)?;
        check("height.chrome", self.chrome)?;
        check("height.paragraph_gap", self.paragraph_gap)?;
        check("height.column_width", self.column_width)?;
        if self.min > self.max {
            return Err(ConfigError::InvertedHeightBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}
