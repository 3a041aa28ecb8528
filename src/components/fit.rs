use serde::Serialize;

// ---------------------------------------------------------------------------
// FitInputs — host measurements taken with any previous scale reset to 1
// ---------------------------------------------------------------------------

/// Measurements for one fit pass. The host resets the content transform to
/// `scale(1)` before measuring, so these are natural (unscaled) dimensions.
#[derive(Debug, Clone, Copy)]
pub struct FitInputs {
    /// Natural scroll width of the content.
    pub natural_width: f64,
    /// Client width available inside the container.
    pub avail_width: f64,
    /// Natural scroll height of the content.
    pub content_height: f64,
    /// Container's own top + bottom padding. Border-box sizing subtracts
    /// padding from a set height, so it has to be added back or the bottom
    /// of the diagram gets clipped.
    pub vertical_padding: f64,
}

// ---------------------------------------------------------------------------
// FitFrame — the scale state the rest of the pipeline consumes
// ---------------------------------------------------------------------------

/// Output of the fit pass: the uniform shrink factor (anchored top-left) and
/// the container sizing that goes with it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitFrame {
    /// Shrink factor applied to the whole diagram, 1.0 = unscaled.
    pub scale: f64,
    /// Explicit container height when scaled; `None` means the container
    /// sizes itself naturally.
    pub container_height: Option<f64>,
    /// Whether the container clips overflow while scaled.
    pub overflow_hidden: bool,
}

impl FitFrame {
    /// Identity state: no scale, natural sizing.
    pub fn unscaled() -> Self {
        Self {
            scale: 1.0,
            container_height: None,
            overflow_hidden: false,
        }
    }

    /// Decide the shrink factor for the measured content.
    ///
    /// Content wider than the container gets scaled by `avail / natural` so
    /// the visible width equals the available width exactly; the container
    /// height is pinned to the scaled content height (plus padding) so there
    /// is no clipping and no blank space. Content that already fits clears
    /// any previously applied scale.
    pub fn compute(inputs: &FitInputs) -> Self {
        if inputs.natural_width > inputs.avail_width && inputs.avail_width > 0.0 {
            let scale = inputs.avail_width / inputs.natural_width;
            Self {
                scale,
                container_height: Some(
                    (inputs.content_height * scale + inputs.vertical_padding).ceil(),
                ),
                overflow_hidden: true,
            }
        } else {
            Self::unscaled()
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
