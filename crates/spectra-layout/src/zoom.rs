//! Semantic zoom tiers.
//!
//! Four discrete fidelities, lowest to highest. Layout and view derivation
//! share this taxonomy and the per-tier box table below.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Render fidelity for nodes.
/// Dot < Label < Preview < Full
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ZoomTier {
    /// Minimal marker
    Dot,
    /// Short label
    Label,
    /// Content preview
    #[default]
    Preview,
    /// Full content
    Full,
}

impl ZoomTier {
    pub const ALL: [ZoomTier; 4] = [
        ZoomTier::Dot,
        ZoomTier::Label,
        ZoomTier::Preview,
        ZoomTier::Full,
    ];

    /// Tier index, 0 (dot) to 3 (full).
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn is_full(self) -> bool {
        self == ZoomTier::Full
    }

    pub fn name(self) -> &'static str {
        match self {
            ZoomTier::Dot => "dot",
            ZoomTier::Label => "label",
            ZoomTier::Preview => "preview",
            ZoomTier::Full => "full",
        }
    }

    /// Map a continuous viewport zoom factor to a tier.
    pub fn from_viewport_zoom(zoom: f32, thresholds: &ZoomThresholds) -> Self {
        match zoom {
            z if z < thresholds.dot_below => ZoomTier::Dot,
            z if z < thresholds.label_below => ZoomTier::Label,
            z if z < thresholds.preview_below => ZoomTier::Preview,
            // NaN falls through to the top tier
            _ => ZoomTier::Full,
        }
    }
}

impl fmt::Display for ZoomTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown zoom tier '{0}' (expected dot, label, preview, full or 0-3)")]
pub struct ParseZoomTierError(String);

impl FromStr for ZoomTier {
    type Err = ParseZoomTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tier = match s.trim().to_ascii_lowercase().as_str() {
            "dot" | "0" => ZoomTier::Dot,
            "label" | "1" => ZoomTier::Label,
            "preview" | "2" => ZoomTier::Preview,
            "full" | "3" => ZoomTier::Full,
            _ => return Err(ParseZoomTierError(s.to_string())),
        };
        Ok(tier)
    }
}

/// Viewport zoom factors below which each lower tier applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomThresholds {
    pub dot_below: f32,
    pub label_below: f32,
    pub preview_below: f32,
}

impl Default for ZoomThresholds {
    fn default() -> Self {
        Self {
            dot_below: 0.4,
            label_below: 0.5,
            preview_below: 0.6,
        }
    }
}

/// Rendered box size for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBox {
    pub width: f32,
    pub height: f32,
}

impl TierBox {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Box sizes per tier. The full tier's box is also the layout box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierTable {
    pub dot: TierBox,
    pub label: TierBox,
    pub preview: TierBox,
    pub full: TierBox,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            dot: TierBox::new(40.0, 40.0),
            label: TierBox::new(200.0, 40.0),
            preview: TierBox::new(400.0, 80.0),
            full: TierBox::new(800.0, 500.0),
        }
    }
}

impl TierTable {
    pub fn get(&self, tier: ZoomTier) -> TierBox {
        match tier {
            ZoomTier::Dot => self.dot,
            ZoomTier::Label => self.label,
            ZoomTier::Preview => self.preview,
            ZoomTier::Full => self.full,
        }
    }
}
