//damn_switchboard_core/envelope.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open key/value content of a message. Shape depends on the message kind.
pub type Body = Map<String, Value>;

// ---------------------------------------------------------------------
// Policy context
// ---------------------------------------------------------------------

/// Governing policy context a decision run operates under.
///
/// `invariants` are hard constraints; `priorities` are soft preferences kept
/// for audit only and never enter the score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextCapsule {
    pub id: String,
    pub invariants: Vec<String>,
    pub priorities: Vec<String>,
}

impl Default for ContextCapsule {
    fn default() -> Self {
        Self {
            id: "MyAI.v1.Tribalism".to_string(),
            invariants: vec![
                "No paywalls or money-grab motives".to_string(),
                "Physical/financial changes require MyAI sign-off".to_string(),
            ],
            priorities: vec![
                "Ship small, iterate".to_string(),
                "Transparency".to_string(),
                "Attribution".to_string(),
            ],
        }
    }
}

// ---------------------------------------------------------------------
// Inbound messages
// ---------------------------------------------------------------------

/// Speech-act tag of a message. Unknown tags are carried verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    #[default]
    Propose,
    Commit,
    Observe,
    Other(String),
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::Propose => "PROPOSE",
            MessageKind::Commit => "COMMIT",
            MessageKind::Observe => "OBSERVE",
            MessageKind::Other(s) => s,
        }
    }
}

impl From<String> for MessageKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PROPOSE" => MessageKind::Propose,
            "COMMIT" => MessageKind::Commit,
            "OBSERVE" => MessageKind::Observe,
            _ => MessageKind::Other(s),
        }
    }
}

impl From<&str> for MessageKind {
    fn from(s: &str) -> Self {
        MessageKind::from(s.to_string())
    }
}

impl From<MessageKind> for String {
    fn from(k: MessageKind) -> Self {
        match k {
            MessageKind::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

/// Sender metadata of a normalized message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub agent_id: String,
    pub capsule_id: String,
    pub persona_version: String,
    pub domains: Vec<String>,
    pub auth: Option<Value>,
}

impl Header {
    pub const UNKNOWN_AGENT: &'static str = "Unknown";
    pub const DEFAULT_PERSONA_VERSION: &'static str = "0.0.0";

    /// Header with every field defaulted under the given capsule.
    pub fn defaulted(capsule_id: impl Into<String>) -> Self {
        Self {
            agent_id: Self::UNKNOWN_AGENT.to_string(),
            capsule_id: capsule_id.into(),
            persona_version: Self::DEFAULT_PERSONA_VERSION.to_string(),
            domains: Vec::new(),
            auth: None,
        }
    }

    pub fn has_domain(&self, tag: &str) -> bool {
        self.domains.iter().any(|d| d == tag)
    }
}

/// Canonical message form. Everything after ingestion operates on this.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    pub id: String,
    pub time_utc: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub header: Header,
    pub body: Body,
}

impl NormalizedMessage {
    pub fn is_proposal(&self) -> bool {
        self.kind == MessageKind::Propose
    }

    pub fn agent_id(&self) -> &str {
        &self.header.agent_id
    }

    /// String-valued body field. Non-string values read as absent.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.body.get(key).and_then(Value::as_str)
    }

    pub fn goal(&self) -> Option<&str> {
        self.text("goal")
    }

    pub fn approach(&self) -> Option<&str> {
        self.text("approach")
    }

    /// Raw `verb` field, whatever its JSON type.
    pub fn verb_value(&self) -> Option<&Value> {
        self.body.get("verb").filter(|v| !v.is_null())
    }

    /// Non-empty string verb, if any.
    pub fn verb(&self) -> Option<&str> {
        self.text("verb").filter(|v| !v.is_empty())
    }

    pub fn eta(&self) -> Option<&Value> {
        self.body.get("eta")
    }

    pub fn evidence_count(&self) -> usize {
        self.list_len("evidence")
    }

    pub fn risk_count(&self) -> usize {
        self.list_len("risks")
    }

    /// One-line description: goal, else approach, else empty.
    pub fn summary(&self) -> &str {
        self.goal()
            .filter(|s| !s.is_empty())
            .or_else(|| self.approach().filter(|s| !s.is_empty()))
            .unwrap_or("")
    }

    fn list_len(&self, key: &str) -> usize {
        self.body
            .get(key)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

/// A proposal paired with its computed score. Lives for one run only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredProposal<'a> {
    pub proposal: &'a NormalizedMessage,
    pub score: f64,
}

// ---------------------------------------------------------------------
// Outbound decision record
// ---------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Nominate,
    None,
}

/// The winning proposal, carried whole.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Nomination {
    pub id: String,
    pub plan: NormalizedMessage,
    pub score: f64,
}

/// A surviving proposal that did not win, reduced to its audit fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dissent {
    pub id: String,
    pub agent: String,
    pub score: f64,
    pub verb: Option<String>,
    pub summary: String,
}

/// The sole persisted output of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub decision_id: String,
    pub time_utc: String,
    pub kind: DecisionKind,
    pub note: String,
    pub payload: Vec<Nomination>,
    pub dissent: Vec<Dissent>,
    pub topic: Option<String>,
    #[serde(rename = "deadlineMinutes")]
    pub deadline_minutes: Option<u32>,
    pub chair: String,
}

impl DecisionRecord {
    pub fn nominee(&self) -> Option<&Nomination> {
        self.payload.first()
    }
}
