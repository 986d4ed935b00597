use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------
// Agent weights: how much each steward's proposals count before any
// evidence/risk/ETA terms are added.
// ---------------------------------------------------------------------

/// Multiplier used for agents missing from the table.
pub const DEFAULT_AGENT_WEIGHT: f64 = 1.0;

/// Agent id -> positive weight. Not exhaustive; unknown agents get
/// `DEFAULT_AGENT_WEIGHT`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentWeights(HashMap<String, f64>);

impl AgentWeights {
    /// An empty table: every agent weighs `DEFAULT_AGENT_WEIGHT`.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, agent_id: impl Into<String>, weight: f64) {
        self.0.insert(agent_id.into(), weight);
    }

    pub fn with(mut self, agent_id: impl Into<String>, weight: f64) -> Self {
        self.insert(agent_id, weight);
        self
    }

    /// Overlay `other` on top of this table; entries in `other` win.
    pub fn merge(&mut self, other: AgentWeights) {
        self.0.extend(other.0);
    }

    /// Weight for `agent_id`. Non-finite or non-positive entries fall back
    /// to the default rather than zeroing or flipping a score.
    pub fn weight_for(&self, agent_id: &str) -> f64 {
        match self.0.get(agent_id) {
            Some(&w) if w.is_finite() && w > 0.0 => w,
            _ => DEFAULT_AGENT_WEIGHT,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for AgentWeights {
    fn default() -> Self {
        default_agent_weights()
    }
}

impl FromIterator<(String, f64)> for AgentWeights {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The stock table: the chair gets a small boost, the known stewards sit at 1.0.
pub fn default_agent_weights() -> AgentWeights {
    AgentWeights::empty()
        .with("MyAI", 1.15)
        .with("ChatGPT", 1.0)
        .with("Gemini", 1.0)
        .with("Grok", 1.0)
        .with("Claude", 1.0)
}
