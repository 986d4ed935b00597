pub mod envelope;
pub mod eta;
pub mod weights;

pub mod cfg;
pub mod moderate;
pub mod mediate;
pub mod score;
pub mod decide;

pub use envelope::{
    Body, ContextCapsule, DecisionKind, DecisionRecord, Dissent, Header, MessageKind, Nomination,
    NormalizedMessage, ScoredProposal,
};
pub use eta::eta_minutes;
pub use weights::{AgentWeights, default_agent_weights, DEFAULT_AGENT_WEIGHT};

pub use cfg::SwitchboardCfg;
pub use moderate::{
    moderate, review, Denylist, ModeratorError, Moderators, NamedModerator, ProposalModerator,
    Rejection, PROPOSE_VERB,
};
pub use mediate::{goal_key, mediate, supersedes};
pub use score::{rank, round4, score, ScoreParams};
pub use decide::{decide, nominate, DecisionOutcome, DecisionState, Policy, RunParams};
