//! Content height estimation.
//!
//! The layout engine never measures text itself. It asks an injected
//! [`HeightEstimator`]; returning `None` means "no estimate available" and
//! the engine falls back to the tier's fixed box height.

use crate::config::HeightConfig;
use crate::zoom::{TierTable, ZoomTier};

/// Strategy for estimating a node's rendered height.
///
/// Lower-tier estimates taller than the node's full-tier estimate are capped
/// at the full-tier height by the layout.
pub trait HeightEstimator {
    /// Height of `content` rendered at `tier`, in layout units.
    fn estimate(&self, content: &str, tier: ZoomTier) -> Option<f32>;
}

/// Closures work as estimators, which keeps headless tests short.
impl<F> HeightEstimator for F
where
    F: Fn(&str, ZoomTier) -> Option<f32>,
{
    fn estimate(&self, content: &str, tier: ZoomTier) -> Option<f32> {
        self(content, tier)
    }
}

/// External text-flow measurement, e.g. a rendering surface that can lay out
/// text at a given column width.
pub trait TextMeasure {
    /// Pixel height of `text` wrapped to `column_width`, or `None` if no
    /// measurement surface is available.
    fn measure(&self, text: &str, column_width: f32) -> Option<f32>;
}

// =============================================================================
// FIXED
// =============================================================================

/// Every node gets its tier's box height.
#[derive(Debug, Clone, Default)]
pub struct FixedTierHeight {
    tiers: TierTable,
}

impl FixedTierHeight {
    pub fn new(tiers: TierTable) -> Self {
        Self { tiers }
    }
}

impl HeightEstimator for FixedTierHeight {
    fn estimate(&self, _content: &str, tier: ZoomTier) -> Option<f32> {
        Some(self.tiers.get(tier).height)
    }
}

// =============================================================================
// PARAGRAPH HEURISTIC
// =============================================================================

/// Character-budget estimate of full-tier height.
///
/// Content is split into paragraphs on blank lines. Code, list, heading and
/// quote paragraphs keep their line breaks; prose paragraphs are soft-wrapped
/// as one run of text. Lower tiers use the fixed box height.
#[derive(Debug, Clone, Default)]
pub struct ParagraphEstimator {
    config: HeightConfig,
    tiers: TierTable,
}

impl ParagraphEstimator {
    pub fn new(config: HeightConfig, tiers: TierTable) -> Self {
        Self { config, tiers }
    }

    /// Estimated full-tier height, clamped to `[min, max]`.
    pub fn full_height(&self, content: &str) -> f32 {
        let budget = self.config.chars_per_line.max(1);
        let blocks = split_blocks(content);

        let lines: usize = blocks.iter().map(|block| block.line_count(budget)).sum();
        let gaps = blocks.len().saturating_sub(1) as f32 * self.config.paragraph_gap;
        let raw = self.config.chrome + lines as f32 * self.config.line_height + gaps;

        self.config.clamp(raw)
    }
}

impl HeightEstimator for ParagraphEstimator {
    fn estimate(&self, content: &str, tier: ZoomTier) -> Option<f32> {
        match tier {
            ZoomTier::Full => Some(self.full_height(content)),
            _ => Some(self.tiers.get(tier).height),
        }
    }
}

#[derive(Debug, PartialEq)]
struct Block<'a> {
    lines: Vec<&'a str>,
    preformatted: bool,
}

impl Block<'_> {
    fn line_count(&self, budget: usize) -> usize {
        if self.preformatted {
            self.lines.iter().map(|line| wrapped(line.chars().count(), budget)).sum()
        } else {
            // Prose reflows: single line breaks collapse to spaces.
            let chars: usize = self.lines.iter().map(|l| l.trim().chars().count()).sum::<usize>()
                + self.lines.len().saturating_sub(1);
            wrapped(chars, budget)
        }
    }
}

fn wrapped(chars: usize, budget: usize) -> usize {
    chars.div_ceil(budget).max(1)
}

/// Group lines into blank-line separated blocks. Fenced code keeps its
/// internal blank lines.
fn split_blocks(content: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in content.lines() {
        let is_fence = line.trim_start().starts_with("```");
        if !in_fence && line.trim().is_empty() {
            flush(&mut blocks, &mut current);
            continue;
        }
        if is_fence {
            in_fence = !in_fence;
        }
        current.push(line);
    }
    flush(&mut blocks, &mut current);
    blocks
}

fn flush<'a>(blocks: &mut Vec<Block<'a>>, current: &mut Vec<&'a str>) {
    if current.is_empty() {
        return;
    }
    let lines = std::mem::take(current);
    let preformatted = lines.first().is_some_and(|first| is_preformatted(first));
    blocks.push(Block {
        lines,
        preformatted,
    });
}

fn is_preformatted(first_line: &str) -> bool {
    let trimmed = first_line.trim_start();
    if first_line.starts_with("    ") || first_line.starts_with('\t') {
        return true;
    }
    if ["```", "#", "- ", "* ", "+ ", "> ", "|"]
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
    {
        return true;
    }
    // Ordered list: "1. ", "12) "
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && matches!(trimmed[digits..].get(..2), Some(". " | ") "))
}

// =============================================================================
// MEASURED
// =============================================================================

/// Delegates full-tier height to an external [`TextMeasure`], adding chrome
/// and clamping. When the measurer is unavailable the estimate is `None` and
/// the engine falls back to the fixed tier height.
#[derive(Debug, Clone)]
pub struct MeasuredEstimator<M> {
    measure: M,
    config: HeightConfig,
    tiers: TierTable,
}

impl<M: TextMeasure> MeasuredEstimator<M> {
    pub fn new(measure: M, config: HeightConfig, tiers: TierTable) -> Self {
        Self {
            measure,
            config,
            tiers,
        }
    }
}

impl<M: TextMeasure> HeightEstimator for MeasuredEstimator<M> {
    fn estimate(&self, content: &str, tier: ZoomTier) -> Option<f32> {
        match tier {
            ZoomTier::Full => self
                .measure
                .measure(content, self.config.column_width)
                .map(|text_height| self.config.clamp(text_height + self.config.chrome)),
            _ => Some(self.tiers.get(tier).height),
        }
    }
}
