use bracket_model::{Bracket, Side};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;

// ---------------------------------------------------------------------------
// Screen-space inputs
// ---------------------------------------------------------------------------

/// On-screen (post-scale) rectangle of one match box, relative to the
/// content origin. The host measures these after positions and scale have
/// been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn y_center(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

// ---------------------------------------------------------------------------
// ElbowPath / ConnectorLayer
// ---------------------------------------------------------------------------

/// One orthogonal connector in the diagram's intrinsic (unscaled) coordinate
/// space: horizontal to the midpoint, vertical to the destination's level,
/// horizontal into the destination. Never diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElbowPath {
    pub src_x: f64,
    pub src_y: f64,
    pub mid_x: f64,
    pub dst_x: f64,
    pub dst_y: f64,
}

impl ElbowPath {
    /// SVG path data for this connector: `M src H mid V dst H dst`.
    pub fn to_path_data(&self) -> String {
        let mut d = String::new();
        // Writing to a String cannot fail.
        let _ = write!(
            d,
            "M {} {} H {} V {} H {}",
            self.src_x, self.src_y, self.mid_x, self.dst_y, self.dst_x
        );
        d
    }
}

/// Output of the connector pass. Each invocation produces a complete fresh
/// layer — the host replaces whatever was drawn before, which makes the pass
/// idempotent. `width`/`height` are the content's full unscaled scroll
/// dimensions: the drawing surface is not affected by the transform applied
/// to its container, so it is sized in the same intrinsic units the
/// container's natural geometry uses (and connectors are never clipped).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorLayer {
    pub width: f64,
    pub height: f64,
    pub paths: Vec<ElbowPath>,
}

impl ConnectorLayer {
    /// Draw a connector from every match with a resolvable `next_match_id`
    /// to its successor.
    ///
    /// All measurement happens in on-screen pixel space and is divided by
    /// the active `scale` to get back to intrinsic coordinates. Edge choice:
    /// the right half visually runs right-to-left toward the center, so its
    /// matches exit their LEFT edge and enter the destination's RIGHT edge;
    /// everything else (left half, and any inbound edge into the final)
    /// exits right and enters left.
    ///
    /// A match whose target does not resolve — the final, or inconsistent
    /// data — is simply skipped.
    pub fn compute(
        bracket: &Bracket,
        rects: &HashMap<String, ScreenRect>,
        scale: f64,
        surface_width: f64,
        surface_height: f64,
    ) -> Self {
        let mut paths = Vec::new();

        for node in &bracket.matches {
            let Some(next_id) = node.next_match_id.as_deref() else {
                continue;
            };
            let (Some(src), Some(dst)) = (rects.get(&node.match_id), rects.get(next_id))
            else {
                continue;
            };

            let src_y = src.y_center() / scale;
            let dst_y = dst.y_center() / scale;

            let (src_x, dst_x) = if node.side == Side::Right {
                (src.left / scale, dst.right() / scale)
            } else {
                (src.right() / scale, dst.left / scale)
            };

            paths.push(ElbowPath {
                src_x,
                src_y,
                mid_x: (src_x + dst_x) / 2.0,
                dst_x,
                dst_y,
            });
        }

        Self {
            width: surface_width,
            height: surface_height,
            paths,
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_model::MatchNode;

    fn node(id: &str, side: Side, next: Option<&str>) -> MatchNode {
        MatchNode {
            match_id: id.to_string(),
            round: 1,
            position: 1,
            side,
            next_match_id: next.map(str::to_string),
        }
    }

    fn rect(left: f64, top: f64) -> ScreenRect {
        ScreenRect { left, top, width: 100.0, height: 48.0 }
    }

    fn two_match_bracket(side: Side) -> (Bracket, HashMap<String, ScreenRect>) {
        let bracket = Bracket {
            num_rounds: 2,
            matches: vec![node("src", side, Some("dst")), node("dst", Side::Final, None)],
        };
        let mut rects = HashMap::new();
        // Left half flows left-to-right; mirror the x order for the right half.
        if side == Side::Right {
            rects.insert("src".to_string(), rect(400.0, 0.0));
            rects.insert("dst".to_string(), rect(200.0, 100.0));
        } else {
            rects.insert("src".to_string(), rect(0.0, 0.0));
            rects.insert("dst".to_string(), rect(200.0, 100.0));
        }
        (bracket, rects)
    }

    #[test]
    fn test_left_side_exits_right_edge_enters_left_edge() {
        let (bracket, rects) = two_match_bracket(Side::Left);
        let layer = ConnectorLayer::compute(&bracket, &rects, 1.0, 800.0, 600.0);
        assert_eq!(layer.paths.len(), 1);
        let p = layer.paths[0];
        assert_eq!(p.src_x, 100.0); // src right edge
        assert_eq!(p.dst_x, 200.0); // dst left edge
        assert_eq!(p.src_y, 24.0);
        assert_eq!(p.dst_y, 124.0);
        assert_eq!(p.mid_x, 150.0);
    }

    #[test]
    fn test_right_side_exits_left_edge_enters_right_edge() {
        let (bracket, rects) = two_match_bracket(Side::Right);
        let layer = ConnectorLayer::compute(&bracket, &rects, 1.0, 800.0, 600.0);
        let p = layer.paths[0];
        assert_eq!(p.src_x, 400.0); // src left edge
        assert_eq!(p.dst_x, 300.0); // dst right edge
        assert_eq!(p.mid_x, 350.0);
    }

    #[test]
    fn test_unscaled_endpoints_invariant_to_scale() {
        // Measuring at scale s and dividing back must reproduce the same
        // logical endpoints for any s.
        let (bracket, base_rects) = two_match_bracket(Side::Left);
        let reference = ConnectorLayer::compute(&bracket, &base_rects, 1.0, 800.0, 600.0);

        for scale in [0.25, 0.5, 2.0] {
            let scaled: HashMap<String, ScreenRect> = base_rects
                .iter()
                .map(|(id, r)| {
                    (
                        id.clone(),
                        ScreenRect {
                            left: r.left * scale,
                            top: r.top * scale,
                            width: r.width * scale,
                            height: r.height * scale,
                        },
                    )
                })
                .collect();
            let layer = ConnectorLayer::compute(&bracket, &scaled, scale, 800.0, 600.0);
            assert_eq!(layer.paths, reference.paths, "scale={scale}");
        }

        // Non-dyadic scale: endpoints match within float tolerance.
        let scale = 0.8;
        let scaled: HashMap<String, ScreenRect> = base_rects
            .iter()
            .map(|(id, r)| {
                (
                    id.clone(),
                    ScreenRect {
                        left: r.left * scale,
                        top: r.top * scale,
                        width: r.width * scale,
                        height: r.height * scale,
                    },
                )
            })
            .collect();
        let layer = ConnectorLayer::compute(&bracket, &scaled, scale, 800.0, 600.0);
        for (got, want) in layer.paths.iter().zip(&reference.paths) {
            for (a, b) in [
                (got.src_x, want.src_x),
                (got.src_y, want.src_y),
                (got.mid_x, want.mid_x),
                (got.dst_x, want.dst_x),
                (got.dst_y, want.dst_y),
            ] {
                assert!((a - b).abs() < 1e-9, "scale={scale}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_final_sources_no_connector() {
        let (bracket, rects) = two_match_bracket(Side::Left);
        let layer = ConnectorLayer::compute(&bracket, &rects, 1.0, 800.0, 600.0);
        // Only src → dst; the final ("dst") has no next_match_id.
        assert_eq!(layer.paths.len(), 1);
    }

    #[test]
    fn test_unresolvable_target_is_skipped() {
        let bracket = Bracket {
            num_rounds: 2,
            matches: vec![node("src", Side::Left, Some("ghost"))],
        };
        let mut rects = HashMap::new();
        rects.insert("src".to_string(), rect(0.0, 0.0));
        let layer = ConnectorLayer::compute(&bracket, &rects, 1.0, 800.0, 600.0);
        assert!(layer.paths.is_empty());
    }

    #[test]
    fn test_surface_uses_unscaled_scroll_dimensions() {
        let (bracket, rects) = two_match_bracket(Side::Left);
        let layer = ConnectorLayer::compute(&bracket, &rects, 0.5, 1200.0, 900.0);
        assert_eq!(layer.width, 1200.0);
        assert_eq!(layer.height, 900.0);
    }

    #[test]
    fn test_path_data_format() {
        let p = ElbowPath { src_x: 100.0, src_y: 24.0, mid_x: 150.0, dst_x: 200.0, dst_y: 124.0 };
        assert_eq!(p.to_path_data(), "M 100 24 H 150 V 124 H 200");
    }

    #[test]
    fn test_recompute_replaces_previous_layer() {
        // Two invocations with the same inputs produce identical layers; the
        // host swaps the whole layer, so nothing accumulates.
        let (bracket, rects) = two_match_bracket(Side::Left);
        let a = ConnectorLayer::compute(&bracket, &rects, 1.0, 800.0, 600.0);
        let b = ConnectorLayer::compute(&bracket, &rects, 1.0, 800.0, 600.0);
        assert_eq!(a, b);
    }
}
