use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Gap between the overlay's bottom edge and the bottom of the visual
/// viewport, in CSS pixels.
pub const BOTTOM_MARGIN: f64 = 19.0;

// ---------------------------------------------------------------------------
// Viewport metrics
// ---------------------------------------------------------------------------

/// Visual-viewport geometry sampled fresh from the platform on every
/// reposition. Fixed positioning is defined against the layout viewport and
/// drifts under pinch-zoom, so the overlay is placed at explicit document
/// coordinates derived from these metrics instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportMetrics {
    /// Pinch-zoom factor, 1.0 = no zoom.
    pub scale: f64,
    /// Visible viewport width/height in CSS pixels.
    pub width: f64,
    pub height: f64,
    /// Visual viewport origin in document coordinates.
    pub page_left: f64,
    pub page_top: f64,
}

/// Unscaled dimensions of the overlay element, measured by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlaySize {
    pub width: f64,
    pub height: f64,
}

// ---------------------------------------------------------------------------
// OverlayPlacement
// ---------------------------------------------------------------------------

/// Document-coordinate placement that keeps the overlay glued to the
/// bottom-center of the visible viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayPlacement {
    /// Counter-scale applied to the overlay (1 / zoom), anchored at its own
    /// top-left corner, so its on-screen size stays constant at any zoom.
    pub scale: f64,
    /// Top-left corner in document coordinates, rounded to whole pixels.
    pub left: f64,
    pub top: f64,
}

impl OverlayPlacement {
    /// Compute the pinned placement for the current viewport state.
    ///
    ///   left = page_left + viewport_width / 2 − overlay_width / (2s)
    ///   top  = page_top + viewport_height − overlay_height / s − margin
    ///
    /// Returns `None` when viewport metrics are unavailable (no visual
    /// viewport API) — the overlay then keeps its default placement.
    pub fn compute(metrics: Option<&ViewportMetrics>, overlay: OverlaySize) -> Option<Self> {
        let vv = metrics?;
        let s = if vv.scale > 0.0 { vv.scale } else { 1.0 };

        Some(Self {
            scale: 1.0 / s,
            left: (vv.page_left + vv.width / 2.0 - overlay.width / (2.0 * s)).round(),
            top: (vv.page_top + vv.height - overlay.height / s - BOTTOM_MARGIN).round(),
        })
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
