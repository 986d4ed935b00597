use serde::{Deserialize, Serialize};

use crate::envelope::{NormalizedMessage, ScoredProposal};
use crate::eta::eta_minutes;
use crate::moderate::PROPOSE_VERB;
use crate::weights::AgentWeights;

// ---------------------------------------------------------------------
// Linear fitness score. No learned weights: every term is additive and
// can be recomputed by hand from the decision record.
// ---------------------------------------------------------------------

/// Constants of the scoring formula.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreParams {
    /// Added per evidence entry.
    pub evidence_unit: f64,
    /// Subtracted per listed risk.
    pub risk_unit: f64,
    /// Domains that earn `domain_bonus` (any one is enough).
    pub bonus_domains: Vec<String>,
    pub domain_bonus: f64,
    /// Timeline term for a committed ETA:
    /// `max(0, eta_ceiling - min(eta, eta_cap_minutes) / eta_divisor)`.
    pub eta_ceiling: f64,
    pub eta_cap_minutes: f64,
    pub eta_divisor: f64,
    /// Flat timeline term when no ETA was given. Deliberately a bonus.
    pub no_eta_bonus: f64,
    /// Added when `verb` is exactly `propose`.
    pub compliance_bonus: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            evidence_unit: 0.04,
            risk_unit: 0.02,
            bonus_domains: vec!["web".to_string(), "robotics".to_string()],
            domain_bonus: 0.03,
            eta_ceiling: 0.3,
            eta_cap_minutes: 600.0,
            eta_divisor: 2000.0,
            no_eta_bonus: 0.05,
            compliance_bonus: 0.05,
        }
    }
}

/// Round to 4 decimal places.
#[inline]
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Timeline term for a parsed ETA in minutes.
pub fn eta_term(eta_min: f64, params: &ScoreParams) -> f64 {
    if eta_min > 0.0 {
        (params.eta_ceiling - eta_min.min(params.eta_cap_minutes) / params.eta_divisor).max(0.0)
    } else {
        params.no_eta_bonus
    }
}

/// Score one proposal, rounded to 4 decimals.
pub fn score(p: &NormalizedMessage, weights: &AgentWeights, params: &ScoreParams) -> f64 {
    let agent = weights.weight_for(p.agent_id());
    let evidence = p.evidence_count() as f64 * params.evidence_unit;
    let risk = p.risk_count() as f64 * params.risk_unit;
    let timeline = eta_term(eta_minutes(p.eta()), params);

    let domain = if params.bonus_domains.iter().any(|d| p.header.has_domain(d)) {
        params.domain_bonus
    } else {
        0.0
    };

    // exact match only; moderation already accepted other casings
    let compliance = if p.text("verb") == Some(PROPOSE_VERB) {
        params.compliance_bonus
    } else {
        0.0
    };

    round4(agent + evidence + timeline + domain + compliance - risk)
}

/// Score and sort descending. Equal scores keep their input order.
pub fn rank<'a, I>(
    proposals: I,
    weights: &AgentWeights,
    params: &ScoreParams,
) -> Vec<ScoredProposal<'a>>
where
    I: IntoIterator<Item = &'a NormalizedMessage>,
{
    let mut scored: Vec<ScoredProposal<'a>> = proposals
        .into_iter()
        .map(|proposal| ScoredProposal {
            proposal,
            score: score(proposal, weights, params),
        })
        .collect();

    // slice::sort_by is stable
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}
