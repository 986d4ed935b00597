//damn_switchboard_core/moderate.rs

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde_json::Value;

use crate::envelope::NormalizedMessage;

/// The only speech act accepted at the proposal stage.
pub const PROPOSE_VERB: &str = "propose";

/// Failure raised by an external moderator. Always treated as a rejection.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModeratorError {
    #[error("{0}")]
    Fault(String),
    #[error("moderator panicked; panic was caught and the proposal rejected")]
    Panicked,
}

/// Pluggable moderation predicate.
///
/// `Ok(true)` accepts, `Ok(false)` vetoes, `Err(_)` vetoes (fail closed).
///
/// A panic inside `review` is caught and also vetoes. The process panic hook
/// still runs first, so the default hook prints a `thread ... panicked at`
/// line to stderr. That line is not a crash; the run carries on.
pub trait ProposalModerator {
    fn name(&self) -> &str {
        "external"
    }

    fn review(&self, proposal: &NormalizedMessage) -> Result<bool, ModeratorError>;
}

/// Closure-backed moderator. The name shows up in rejection logs.
pub struct NamedModerator<F> {
    name: String,
    check: F,
}

impl<F> NamedModerator<F>
where
    F: Fn(&NormalizedMessage) -> Result<bool, ModeratorError>,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> ProposalModerator for NamedModerator<F>
where
    F: Fn(&NormalizedMessage) -> Result<bool, ModeratorError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn review(&self, proposal: &NormalizedMessage) -> Result<bool, ModeratorError> {
        (self.check)(proposal)
    }
}

/// Ordered moderator chain as held by an engine.
pub type Moderators = Vec<Box<dyn ProposalModerator>>;

/// Why a proposal was turned away.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    MissingGoalOrApproach,
    NonCompliantVerb(String),
    UnreadableBody,
    Denylisted(String),
    Vetoed { moderator: String },
    ModeratorFault { moderator: String, error: ModeratorError },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingGoalOrApproach => write!(f, "missing goal or approach"),
            Rejection::NonCompliantVerb(v) => write!(f, "verb `{v}` is not `{PROPOSE_VERB}`"),
            Rejection::UnreadableBody => write!(f, "body could not be serialized"),
            Rejection::Denylisted(term) => write!(f, "body mentions denylisted `{term}`"),
            Rejection::Vetoed { moderator } => write!(f, "vetoed by moderator `{moderator}`"),
            Rejection::ModeratorFault { moderator, error } => {
                write!(f, "moderator `{moderator}` failed: {error}")
            }
        }
    }
}

// ---------------------------------------------------------------------
// Denylist
// ---------------------------------------------------------------------

/// Case-insensitive substrings that must never appear in a proposal body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Denylist {
    terms: Vec<String>,
}

impl Denylist {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    /// First term contained in `text` (which must already be lowercase).
    pub fn first_hit(&self, lowered: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|t| lowered.contains(t.as_str()))
            .map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

// ---------------------------------------------------------------------
// Checks, in evaluation order
// ---------------------------------------------------------------------

pub fn check_required(p: &NormalizedMessage) -> Result<(), Rejection> {
    let present = |v: Option<&str>| v.is_some_and(|s| !s.is_empty());
    if present(p.goal()) && present(p.approach()) {
        Ok(())
    } else {
        Err(Rejection::MissingGoalOrApproach)
    }
}

/// A present verb must be `propose` (any case). Empty string counts as absent.
pub fn check_verb(p: &NormalizedMessage) -> Result<(), Rejection> {
    match p.verb_value() {
        None => Ok(()),
        Some(Value::String(v)) if v.is_empty() || v.to_lowercase() == PROPOSE_VERB => Ok(()),
        Some(Value::String(v)) => Err(Rejection::NonCompliantVerb(v.clone())),
        Some(other) => Err(Rejection::NonCompliantVerb(other.to_string())),
    }
}

pub fn check_denylist(p: &NormalizedMessage, denylist: &Denylist) -> Result<(), Rejection> {
    let text = serde_json::to_string(&p.body)
        .map_err(|_| Rejection::UnreadableBody)?
        .to_lowercase();
    match denylist.first_hit(&text) {
        Some(term) => Err(Rejection::Denylisted(term.to_string())),
        None => Ok(()),
    }
}

/// Every moderator must accept. Errors and panics count as vetoes.
pub fn check_external(
    p: &NormalizedMessage,
    moderators: &[Box<dyn ProposalModerator>],
) -> Result<(), Rejection> {
    for m in moderators {
        let verdict = catch_unwind(AssertUnwindSafe(|| m.review(p)))
            .unwrap_or(Err(ModeratorError::Panicked));
        match verdict {
            Ok(true) => {}
            Ok(false) => {
                return Err(Rejection::Vetoed {
                    moderator: m.name().to_string(),
                })
            }
            Err(error) => {
                return Err(Rejection::ModeratorFault {
                    moderator: m.name().to_string(),
                    error,
                })
            }
        }
    }
    Ok(())
}

/// Run the whole chain and report the first reason for rejection.
pub fn review(
    p: &NormalizedMessage,
    denylist: &Denylist,
    moderators: &[Box<dyn ProposalModerator>],
) -> Result<(), Rejection> {
    check_required(p)?;
    check_verb(p)?;
    check_denylist(p, denylist)?;
    check_external(p, moderators)
}

/// Accept/reject view of `review`.
pub fn moderate(
    p: &NormalizedMessage,
    denylist: &Denylist,
    moderators: &[Box<dyn ProposalModerator>],
) -> bool {
    review(p, denylist, moderators).is_ok()
}
