//damn_switchboard_core/decide.rs

use serde::{Deserialize, Serialize};

use crate::envelope::{
    DecisionKind, DecisionRecord, Dissent, Nomination, NormalizedMessage, ScoredProposal,
};
use crate::mediate::mediate;
use crate::moderate::{review, Denylist, ProposalModerator, Rejection};
use crate::score::{rank, ScoreParams};
use crate::weights::AgentWeights;

pub const NOTE_NO_PROPOSALS: &str = "No proposals";
pub const NOTE_ALL_REJECTED: &str = "All proposals rejected in moderation";
pub const NOTE_NOMINATED: &str = "Top plan nominated";

/// Where a run ended. Both empty states surface as `kind = none`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DecisionState {
    NoProposals,
    AllRejected,
    Nominated,
}

impl DecisionState {
    pub fn kind(self) -> DecisionKind {
        match self {
            DecisionState::Nominated => DecisionKind::Nominate,
            DecisionState::NoProposals | DecisionState::AllRejected => DecisionKind::None,
        }
    }

    pub fn note(self) -> &'static str {
        match self {
            DecisionState::NoProposals => NOTE_NO_PROPOSALS,
            DecisionState::AllRejected => NOTE_ALL_REJECTED,
            DecisionState::Nominated => NOTE_NOMINATED,
        }
    }
}

/// Per-run parameters, recorded verbatim in the output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParams {
    pub topic: Option<String>,
    /// Advisory only; nothing in the pipeline is time-bounded by it.
    pub deadline_minutes: Option<u32>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            topic: None,
            deadline_minutes: Some(10),
        }
    }
}

impl RunParams {
    pub fn new(topic: impl Into<String>, deadline_minutes: u32) -> Self {
        Self {
            topic: Some(topic.into()),
            deadline_minutes: Some(deadline_minutes),
        }
    }
}

/// Everything a run needs besides the buffer.
#[derive(Clone, Copy)]
pub struct Policy<'a> {
    pub denylist: &'a Denylist,
    pub moderators: &'a [Box<dyn ProposalModerator>],
    pub weights: &'a AgentWeights,
    pub scoring: &'a ScoreParams,
}

/// Result of one pass through moderation, mediation and ranking.
///
/// `rejected` and `merged` are telemetry for the caller; they are not part of
/// the persisted record.
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionOutcome {
    pub state: DecisionState,
    pub payload: Vec<Nomination>,
    pub dissent: Vec<Dissent>,
    pub rejected: Vec<(String, Rejection)>,
    pub merged: usize,
}

impl DecisionOutcome {
    fn empty(state: DecisionState, rejected: Vec<(String, Rejection)>) -> Self {
        Self {
            state,
            payload: Vec::new(),
            dissent: Vec::new(),
            rejected,
            merged: 0,
        }
    }

    /// Stamp identity and run metadata. An empty topic or a zero deadline is
    /// recorded as absent.
    pub fn into_record(
        self,
        decision_id: impl Into<String>,
        time_utc: impl Into<String>,
        run: &RunParams,
        chair: impl Into<String>,
    ) -> DecisionRecord {
        DecisionRecord {
            decision_id: decision_id.into(),
            time_utc: time_utc.into(),
            kind: self.state.kind(),
            note: self.state.note().to_string(),
            payload: self.payload,
            dissent: self.dissent,
            topic: run.topic.clone().filter(|t| !t.is_empty()),
            deadline_minutes: run.deadline_minutes.filter(|&d| d > 0),
            chair: chair.into(),
        }
    }
}

fn dissent_entry(sp: &ScoredProposal<'_>) -> Dissent {
    let p = sp.proposal;
    Dissent {
        id: p.id.clone(),
        agent: p.agent_id().to_string(),
        score: sp.score,
        verb: p.verb().map(str::to_string),
        summary: p.summary().to_string(),
    }
}

/// Split a ranked list into nomination (head) and dissent (tail).
pub fn nominate(ranked: &[ScoredProposal<'_>]) -> (Vec<Nomination>, Vec<Dissent>) {
    match ranked.split_first() {
        None => (Vec::new(), Vec::new()),
        Some((top, rest)) => (
            vec![Nomination {
                id: top.proposal.id.clone(),
                plan: top.proposal.clone(),
                score: top.score,
            }],
            rest.iter().map(dissent_entry).collect(),
        ),
    }
}

/// One decision run over `messages`. Pure: the buffer is only read.
pub fn decide(messages: &[NormalizedMessage], policy: Policy<'_>) -> DecisionOutcome {
    let proposals: Vec<&NormalizedMessage> = messages.iter().filter(|m| m.is_proposal()).collect();
    if proposals.is_empty() {
        return DecisionOutcome::empty(DecisionState::NoProposals, Vec::new());
    }

    let mut accepted: Vec<&NormalizedMessage> = Vec::with_capacity(proposals.len());
    let mut rejected: Vec<(String, Rejection)> = Vec::new();
    for p in proposals {
        match review(p, policy.denylist, policy.moderators) {
            Ok(()) => accepted.push(p),
            Err(why) => rejected.push((p.id.clone(), why)),
        }
    }
    if accepted.is_empty() {
        return DecisionOutcome::empty(DecisionState::AllRejected, rejected);
    }

    let survivors = mediate(accepted.iter().copied());
    let merged = accepted.len() - survivors.len();
    let ranked = rank(survivors, policy.weights, policy.scoring);
    let (payload, dissent) = nominate(&ranked);

    DecisionOutcome {
        state: DecisionState::Nominated,
        payload,
        dissent,
        rejected,
        merged,
    }
}
