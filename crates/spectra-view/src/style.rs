//! Visual weights for derived nodes and edges.
//!
//! Colors are CSS strings handed straight to the rendering surface.

use serde::{Deserialize, Serialize};

// =============================================================================
// EDGE STROKES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStroke {
    pub color: String,
    pub width: f32,
    /// SVG dash pattern, e.g. `"6 4"`. Solid when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

impl EdgeStroke {
    pub fn solid(color: &str, width: f32) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: None,
        }
    }

    pub fn dashed(color: &str, width: f32, dash: &str) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: Some(dash.to_string()),
        }
    }
}

// =============================================================================
// Z BANDS
// =============================================================================

/// Stacking order. Pruning edges sit under every tree edge; emphasized
/// (active branch or highlighted) items sit above the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZBands {
    pub pruning_edge: i32,
    pub edge: i32,
    pub emphasized_edge: i32,
    pub node: i32,
    pub emphasized_node: i32,
    pub selected_node: i32,
}

impl Default for ZBands {
    fn default() -> Self {
        Self {
            pruning_edge: 0,
            edge: 1,
            emphasized_edge: 2,
            node: 10,
            emphasized_node: 20,
            selected_node: 30,
        }
    }
}

/// Text budgets for the label and preview fidelities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLimits {
    pub label_chars: usize,
    pub preview_lines: usize,
    pub preview_chars: usize,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            label_chars: 20,
            preview_lines: 2,
            preview_chars: 100,
        }
    }
}

// =============================================================================
// VIEW STYLE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewStyle {
    pub node_opacity: f32,
    pub node_dimmed_opacity: f32,
    pub edge_opacity: f32,
    pub edge_dimmed_opacity: f32,
    /// Tree edge with both ends on the active branch.
    pub active_edge: EdgeStroke,
    /// Tree edge with both ends highlighted.
    pub highlighted_edge: EdgeStroke,
    pub inactive_edge: EdgeStroke,
    pub pruning_edge: EdgeStroke,
    pub z: ZBands,
    pub text: TextLimits,
}

impl Default for ViewStyle {
    fn default() -> Self {
        Self {
            node_opacity: 1.0,
            node_dimmed_opacity: 0.3,
            edge_opacity: 1.0,
            edge_dimmed_opacity: 0.2,
            active_edge: EdgeStroke::solid("#8b5cf6", 2.0),
            highlighted_edge: EdgeStroke::solid("#f59e0b", 2.0),
            inactive_edge: EdgeStroke::solid("#94a3b8", 1.0),
            pruning_edge: EdgeStroke::dashed("#a78bfa", 1.5, "6 4"),
            z: ZBands::default(),
            text: TextLimits::default(),
        }
    }
}
