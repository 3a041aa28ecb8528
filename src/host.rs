use crate::components::overlay::{OverlayPlacement, OverlaySize, ViewportMetrics};
use crate::engine::{HostMetrics, LayoutEngine, LayoutFrame};
use bracket_model::Bracket;
use log::warn;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Frame request — one trigger's worth of host-supplied data
// ---------------------------------------------------------------------------

/// Input document for one layout run: the bracket data the markup layer
/// produced plus the measurements the host took for this pass.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameRequest {
    pub bracket: Bracket,
    pub metrics: HostMetrics,
    /// Visual-viewport sample, when the platform exposes one.
    #[serde(default)]
    pub viewport: Option<ViewportMetrics>,
    /// Measured overlay dimensions, when an overlay element exists.
    #[serde(default)]
    pub overlay: Option<OverlaySize>,
}

impl FrameRequest {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

// ---------------------------------------------------------------------------
// Frame report — the geometry the host applies
// ---------------------------------------------------------------------------

/// Everything the run produced. `layout: None` means the bracket pipeline's
/// preconditions weren't met and existing state should be left untouched.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub layout: Option<LayoutFrame>,
    /// Ready-to-use SVG path data for each connector, in diagram order.
    pub svg_paths: Vec<String>,
    pub overlay: Option<OverlayPlacement>,
}

/// Run the full pipeline for one trigger and package the output.
pub fn run_frame(request: &FrameRequest) -> FrameReport {
    if let Err(e) = request.bracket.validate() {
        // Layout itself tolerates odd data; surface the problem and continue.
        warn!("bracket failed validation: {e}");
    }

    let engine = LayoutEngine::new(request.bracket.clone());
    let layout = engine.on_content_ready(&request.metrics);
    let overlay = engine.on_viewport_changed(request.viewport.as_ref(), request.overlay);

    let svg_paths = layout
        .as_ref()
        .map(|frame| {
            frame
                .connectors
                .paths
                .iter()
                .map(|p| p.to_path_data())
                .collect()
        })
        .unwrap_or_default();

    FrameReport { layout, svg_paths, overlay }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
