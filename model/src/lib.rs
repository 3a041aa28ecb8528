use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of how the markup layer renders it
// ---------------------------------------------------------------------------

/// Largest round count the slot math supports: the 2^(num_rounds - 2)
/// slot-count shifts must stay inside u32. A 32-round bracket already means
/// over a billion round-1 matches per half.
pub const MAX_ROUNDS: u32 = 32;

/// Which half of the bracket a match belongs to. `Final` is the root match
/// that both halves feed into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
    Final,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Final => "final",
        }
    }
}

/// One match box in the diagram. Produced once by the external markup
/// generator; the layout engine only reads these fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchNode {
    pub match_id: String,
    /// 1-indexed round, 1 = the outermost round with the most matches.
    pub round: u32,
    /// 1-indexed slot within round + side, assigned by the bracket generator.
    pub position: u32,
    pub side: Side,
    /// Match the winner advances to. Absent for the championship match.
    #[serde(default)]
    pub next_match_id: Option<String>,
}

/// The full bracket: a perfect binary tree built from two symmetric halves
/// feeding a single final.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bracket {
    pub num_rounds: u32,
    pub matches: Vec<MatchNode>,
}

impl Bracket {
    /// Parse a bracket document from JSON (the shape the bracket data
    /// endpoint emits).
    pub fn from_json(raw: &str) -> ModelResult<Self> {
        serde_json::from_str(raw).map_err(ModelError::Parsing)
    }

    /// Number of round-1 matches on each half: 2^(num_rounds - 2).
    /// A 5-round (32-team) bracket has 8 per half.
    pub fn slots_per_half(&self) -> u32 {
        if self.num_rounds < 2 || self.num_rounds > MAX_ROUNDS {
            return 0;
        }
        1 << (self.num_rounds - 2)
    }

    /// First `position` value used by the right half in the given round:
    /// 2^(num_rounds - round - 1) + 1. Right-half positions continue after
    /// the left half's, so layout re-bases them to a local 0-indexed slot.
    pub fn first_right_position(&self, round: u32) -> u32 {
        if round >= self.num_rounds || self.num_rounds > MAX_ROUNDS {
            return 1;
        }
        (1u32 << (self.num_rounds - round - 1)) + 1
    }

    /// Find a match by ID.
    pub fn find(&self, match_id: &str) -> Option<&MatchNode> {
        self.matches.iter().find(|m| m.match_id == match_id)
    }

    /// Index of all matches by ID, used by the connector pass to resolve
    /// `next_match_id` links.
    pub fn by_id(&self) -> HashMap<&str, &MatchNode> {
        self.matches
            .iter()
            .map(|m| (m.match_id.as_str(), m))
            .collect()
    }

    /// Matches in the given round on the given side.
    pub fn round_side(&self, round: u32, side: Side) -> Vec<&MatchNode> {
        self.matches
            .iter()
            .filter(|m| m.round == round && m.side == side)
            .collect()
    }

    /// Structural validation of the perfect-binary-tree invariants:
    /// - num_rounds >= 2
    /// - round 1 on each half has exactly 2^(num_rounds - 2) matches,
    ///   each later round half as many
    /// - exactly one final
    /// - positions unique within round + side
    pub fn validate(&self) -> ModelResult<()> {
        if self.num_rounds < 2 {
            return Err(ModelError::Invalid(format!(
                "bracket needs at least 2 rounds, got {}",
                self.num_rounds
            )));
        }
        if self.num_rounds > MAX_ROUNDS {
            return Err(ModelError::Invalid(format!(
                "bracket cannot exceed {MAX_ROUNDS} rounds, got {}",
                self.num_rounds
            )));
        }

        let finals = self
            .matches
            .iter()
            .filter(|m| m.side == Side::Final)
            .count();
        if finals != 1 {
            return Err(ModelError::Invalid(format!(
                "expected exactly 1 final match, got {finals}"
            )));
        }

        for side in [Side::Left, Side::Right] {
            for round in 1..self.num_rounds {
                let expected = self.slots_per_half() >> (round - 1);
                let nodes = self.round_side(round, side);
                if nodes.len() as u32 != expected {
                    return Err(ModelError::Invalid(format!(
                        "round {round} {} half: expected {expected} matches, got {}",
                        side.label(),
                        nodes.len()
                    )));
                }
                let mut seen = std::collections::HashSet::new();
                for node in nodes {
                    if !seen.insert(node.position) {
                        return Err(ModelError::Invalid(format!(
                            "duplicate position {} in round {round} {} half",
                            node.position,
                            side.label()
                        )));
                    }
                }
            }
        }

        let mut seen_ids = std::collections::HashSet::new();
        for m in &self.matches {
            if !seen_ids.insert(m.match_id.as_str()) {
                return Err(ModelError::Invalid(format!(
                    "duplicate match_id {:?}",
                    m.match_id
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug)]
pub enum ModelError {
    Parsing(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Parsing(e) => write!(f, "Parse error: {e}"),
            ModelError::Invalid(msg) => write!(f, "Invalid bracket: {msg}"),
        }
    }
}

impl std::error::Error for ModelError {}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
