use crate::envelope::ContextCapsule;
use crate::moderate::Denylist;
use crate::score::ScoreParams;
use crate::weights::AgentWeights;

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchboardCfg {
    pub capsule: ContextCapsule,
    pub weights: AgentWeights,
    /// Substrings drawn from the capsule invariants; any hit rejects a proposal.
    pub denylist: Vec<String>,
    /// Deciding authority stamped on every record.
    pub chair: String,
    pub scoring: ScoreParams,
}

impl Default for SwitchboardCfg {
    fn default() -> Self {
        Self {
            capsule: ContextCapsule::default(),
            weights: AgentWeights::default(),
            denylist: vec!["paywall".to_string(), "donation only".to_string()],
            chair: "MyAI".to_string(),
            scoring: ScoreParams::default(),
        }
    }
}

impl SwitchboardCfg {
    pub fn compiled_denylist(&self) -> Denylist {
        Denylist::new(&self.denylist)
    }
}
