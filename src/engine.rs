use crate::components::connectors::{ConnectorLayer, ScreenRect};
use crate::components::fit::{FitFrame, FitInputs};
use crate::components::overlay::{OverlayPlacement, OverlaySize, ViewportMetrics};
use crate::components::slots::{BracketGeometry, SlotFrame};
use bracket_model::{Bracket, Side};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Host measurements
// ---------------------------------------------------------------------------

/// Fresh measurements the host takes before a layout pass. Every pass
/// re-measures rather than trusting values cached from an earlier pass.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HostMetrics {
    /// Natural height of one match box. `None` when no sample box exists
    /// yet — the pass then no-ops.
    pub match_height: Option<f64>,
    /// Rendered height of a round header. `None` measures as zero.
    pub header_height: Option<f64>,
    /// Rendered width of one match box / round column.
    pub match_width: f64,
    /// Horizontal gap between adjacent round columns.
    pub column_gap: f64,
    /// Client width available inside the scroll container.
    pub avail_width: f64,
    /// Container's own top + bottom padding.
    pub vertical_padding: f64,
}

// ---------------------------------------------------------------------------
// LayoutFrame — aggregated output of one full pipeline run
// ---------------------------------------------------------------------------

/// Everything one position → fit → connectors run produced. The host applies
/// this to the rendered tree; the engine itself keeps no cross-call state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutFrame {
    pub slots: SlotFrame,
    pub fit: FitFrame,
    pub connectors: ConnectorLayer,
}

// ---------------------------------------------------------------------------
// LayoutEngine
// ---------------------------------------------------------------------------

/// Orchestrates the three bracket passes in order. Each trigger reruns the
/// whole pipeline synchronously to completion; reruns with unchanged inputs
/// are idempotent.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    bracket: Bracket,
}

impl LayoutEngine {
    pub fn new(bracket: Bracket) -> Self {
        Self { bracket }
    }

    /// Initial content-ready trigger. Same pipeline as a resize.
    pub fn on_content_ready(&self, metrics: &HostMetrics) -> Option<LayoutFrame> {
        self.on_resize(metrics)
    }

    /// Re-run position → fit → connectors from fresh measurements.
    ///
    /// Returns `None` when layout preconditions aren't met yet (fewer than
    /// 2 rounds, or no sample box to measure) — absence of content is not an
    /// error, the next trigger re-attempts.
    pub fn on_resize(&self, metrics: &HostMetrics) -> Option<LayoutFrame> {
        let match_height = metrics.match_height?;
        let header_height = metrics.header_height.unwrap_or(0.0);
        let geometry =
            BracketGeometry::new(self.bracket.num_rounds, match_height, header_height)?;

        let slots = SlotFrame::compute(&geometry, &self.bracket);

        let (natural_width, natural_height) = self.natural_size(&geometry, metrics);
        let fit = FitFrame::compute(&FitInputs {
            natural_width,
            avail_width: metrics.avail_width,
            content_height: natural_height,
            vertical_padding: metrics.vertical_padding,
        });

        let rects = self.screen_rects(&geometry, &slots, metrics, fit.scale);
        let connectors =
            ConnectorLayer::compute(&self.bracket, &rects, fit.scale, natural_width, natural_height);

        debug!(
            "layout pass: {} matches, {} connectors, scale {:.3}",
            slots.positions.len(),
            connectors.paths.len(),
            fit.scale
        );

        Some(LayoutFrame { slots, fit, connectors })
    }

    /// Viewport resize/scroll trigger for the pinned overlay. Independent of
    /// the bracket pipeline.
    pub fn on_viewport_changed(
        &self,
        metrics: Option<&ViewportMetrics>,
        overlay: Option<OverlaySize>,
    ) -> Option<OverlayPlacement> {
        OverlayPlacement::compute(metrics, overlay?)
    }

    /// Natural (unscaled) content dimensions under the demo host's column
    /// flow: left-half rounds ascending, the final, right-half rounds
    /// descending, one column each.
    fn natural_size(&self, geometry: &BracketGeometry, metrics: &HostMetrics) -> (f64, f64) {
        let columns = self.column_count();
        let stride = metrics.match_width + metrics.column_gap;
        let width = stride * (columns - 1) as f64 + metrics.match_width;
        (width, geometry.column_height)
    }

    fn column_count(&self) -> u32 {
        2 * self.bracket.num_rounds - 1
    }

    /// Column index for a match in the mirrored column flow.
    fn column_index(&self, side: Side, round: u32) -> u32 {
        let n = self.bracket.num_rounds;
        match side {
            Side::Left => round.saturating_sub(1),
            Side::Final => n - 1,
            Side::Right => (2 * n - 1).saturating_sub(round),
        }
    }

    /// Synthesize on-screen rects from computed geometry, the way the host
    /// would measure them after applying positions and scale. Tops include
    /// the header band above the match area.
    fn screen_rects(
        &self,
        geometry: &BracketGeometry,
        slots: &SlotFrame,
        metrics: &HostMetrics,
        scale: f64,
    ) -> HashMap<String, ScreenRect> {
        let stride = metrics.match_width + metrics.column_gap;
        let mut rects = HashMap::with_capacity(self.bracket.matches.len());
        for node in &self.bracket.matches {
            let Some(pos) = slots.positions.get(&node.match_id) else {
                continue;
            };
            let left = f64::from(self.column_index(node.side, node.round)) * stride;
            let top = geometry.header_height + pos.top;
            rects.insert(
                node.match_id.clone(),
                ScreenRect {
                    left: left * scale,
                    top: top * scale,
                    width: metrics.match_width * scale,
                    height: geometry.match_height * scale,
                },
            );
        }
        rects
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
