use bracket_model::{Bracket, MAX_ROUNDS, Side};
use serde::Serialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Minimum vertical gap between adjacent round-1 matches, in CSS pixels.
pub const GAP: f64 = 14.0;

// ---------------------------------------------------------------------------
// BracketGeometry — per-pass derived context
// ---------------------------------------------------------------------------

/// Geometry context for one layout pass. Derived from fresh measurements
/// every time layout runs and discarded afterwards; never cached across
/// resizes.
#[derive(Debug, Clone, Copy)]
pub struct BracketGeometry {
    pub num_rounds: u32,
    /// Measured natural height of one match box.
    pub match_height: f64,
    /// Measured rendered height of a round header.
    pub header_height: f64,
    /// Height of one round-1 slot: match height + gap.
    pub unit: f64,
    /// Round-1 slots per half: 2^(num_rounds - 2).
    pub left_slots: u32,
    /// Match area height of a column: left_slots * unit.
    pub total_height: f64,
    /// Full column height: total_height + header_height.
    pub column_height: f64,
}

impl BracketGeometry {
    /// Build the context from fresh measurements. Returns `None` for a
    /// bracket with fewer than 2 rounds — layout has nothing to do yet —
    /// or more than [`bracket_model::MAX_ROUNDS`], which no real bracket
    /// reaches.
    pub fn new(num_rounds: u32, match_height: f64, header_height: f64) -> Option<Self> {
        if num_rounds < 2 || num_rounds > MAX_ROUNDS {
            return None;
        }
        let unit = match_height + GAP;
        let left_slots = 1u32 << (num_rounds - 2);
        let total_height = f64::from(left_slots) * unit;
        Some(Self {
            num_rounds,
            match_height,
            header_height,
            unit,
            left_slots,
            total_height,
            column_height: total_height + header_height,
        })
    }
}

// ---------------------------------------------------------------------------
// SlotFrame — computed vertical positions for every match
// ---------------------------------------------------------------------------

/// Computed vertical placement of one match box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotPosition {
    /// Vertical center of the box within its column's match area.
    pub y_center: f64,
    /// Top offset: y_center - match_height / 2.
    pub top: f64,
}

/// Output of the slot-position pass: per-match placements plus the column
/// height the host applies to every round column. The host also clears any
/// stale height on the scroll container; resizing it is the fit pass's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotFrame {
    pub positions: HashMap<String, SlotPosition>,
    pub column_height: f64,
}

impl SlotFrame {
    /// Position every match in the bracket.
    ///
    /// The bracket is a perfect binary tree built from two symmetric halves
    /// feeding a single final. Centers follow the closed-form funnel rule:
    ///
    ///   y_center(round R, 0-indexed slot S) = 2^(R-1) * (S + 0.5) * unit
    ///
    /// Doubling the multiplier each round centers every match exactly
    /// between its two children from the prior round. The left half's slot
    /// is `position - 1`; the right half re-bases its positions (which
    /// continue after the left half's) to a local 0-indexed slot; the final
    /// is centered in the column.
    pub fn compute(geometry: &BracketGeometry, bracket: &Bracket) -> Self {
        let mut positions = HashMap::with_capacity(bracket.matches.len());

        for node in &bracket.matches {
            let y_center = match node.side {
                Side::Final => geometry.total_height / 2.0,
                side => {
                    let slot = match side {
                        Side::Right => {
                            let first_right =
                                i64::from(bracket.first_right_position(node.round));
                            i64::from(node.position) - first_right
                        }
                        _ => i64::from(node.position) - 1,
                    };
                    let factor = f64::from(1u32 << (node.round.saturating_sub(1)).min(31));
                    factor * (slot as f64 + 0.5) * geometry.unit
                }
            };

            positions.insert(
                node.match_id.clone(),
                SlotPosition {
                    y_center,
                    top: y_center - geometry.match_height / 2.0,
                },
            );
        }

        Self {
            positions,
            column_height: geometry.column_height,
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
