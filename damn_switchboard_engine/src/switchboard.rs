//! Switchboard engine.
//!
//! Owns the message buffer and the policy it is judged under:
//! - normalizes raw messages on ingest (never fails)
//! - keeps ids unique within the buffer
//! - runs moderation -> mediation -> scoring -> decision over a snapshot of the buffer
//!
//! No IO. No async. One run at a time per instance; callers serialize access.

use std::collections::HashSet;
use std::fmt;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use damn_switchboard_core::{
    decide, ContextCapsule, DecisionRecord, Denylist, NormalizedMessage, Policy, ProposalModerator,
    Rejection, RunParams, SwitchboardCfg,
};

use crate::adapter::{normalize, IngestContext, RawMessage};

/// UTC timestamp in the `2025-01-01T00:00:00.000Z` form used on the wire.
pub fn utc_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn mint(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// A decision engine instance. Construct once per batch, or `clear()` between
/// independent batches.
pub struct Switchboard {
    cfg: SwitchboardCfg,
    denylist: Denylist,
    moderators: Vec<Box<dyn ProposalModerator>>,
    buffer: Vec<NormalizedMessage>,
    ids: HashSet<String>,
}

impl Switchboard {
    pub fn new(cfg: SwitchboardCfg) -> Self {
        Self::with_moderators(cfg, Vec::new())
    }

    /// Create an engine with an ordered moderator chain.
    pub fn with_moderators(
        cfg: SwitchboardCfg,
        moderators: Vec<Box<dyn ProposalModerator>>,
    ) -> Self {
        let denylist = cfg.compiled_denylist();
        Self {
            cfg,
            denylist,
            moderators,
            buffer: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Append a moderator to the end of the chain.
    pub fn add_moderator<M: ProposalModerator + 'static>(&mut self, moderator: M) {
        self.moderators.push(Box::new(moderator));
    }

    pub fn cfg(&self) -> &SwitchboardCfg {
        &self.cfg
    }

    pub fn capsule(&self) -> &ContextCapsule {
        &self.cfg.capsule
    }

    /// Buffered messages in arrival order.
    pub fn messages(&self) -> &[NormalizedMessage] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop every buffered message.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.ids.clear();
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = mint("msg");
            if !self.ids.contains(&id) {
                return id;
            }
        }
    }

    /// Normalize and buffer one message; returns its (possibly generated) id.
    ///
    /// Accepts anything. A supplied id already in the buffer is replaced.
    pub fn ingest(&mut self, raw: impl Into<RawMessage>) -> String {
        let raw = raw.into();
        let id = match raw.supplied_id() {
            Some(id) if !self.ids.contains(id) => id.to_string(),
            Some(dup) => {
                let fresh = self.fresh_id();
                warn!(
                    duplicate = dup,
                    replacement = %fresh,
                    "message id already buffered; generated a new one"
                );
                fresh
            }
            None => self.fresh_id(),
        };

        let now = utc_now();
        let msg = normalize(
            raw,
            IngestContext {
                id: &id,
                now: &now,
                capsule_id: &self.cfg.capsule.id,
            },
        );
        debug!(id = %msg.id, kind = msg.kind.as_str(), agent = %msg.header.agent_id, "ingested");

        self.ids.insert(id.clone());
        self.buffer.push(msg);
        id
    }

    /// Ingest a batch in order; returns ids in the same order.
    pub fn ingest_batch<I, R>(&mut self, batch: I) -> Vec<String>
    where
        I: IntoIterator<Item = R>,
        R: Into<RawMessage>,
    {
        batch.into_iter().map(|raw| self.ingest(raw)).collect()
    }

    /// Run one decision over the current buffer. The buffer is not modified.
    pub fn run(&self, params: &RunParams) -> DecisionRecord {
        let outcome = decide(
            &self.buffer,
            Policy {
                denylist: &self.denylist,
                moderators: &self.moderators,
                weights: &self.cfg.weights,
                scoring: &self.cfg.scoring,
            },
        );

        for (id, why) in &outcome.rejected {
            match why {
                Rejection::ModeratorFault { .. } => warn!(%id, reason = %why, "proposal rejected"),
                _ => debug!(%id, reason = %why, "proposal rejected"),
            }
        }

        info!(
            state = ?outcome.state,
            rejected = outcome.rejected.len(),
            merged = outcome.merged,
            dissent = outcome.dissent.len(),
            "decision run complete"
        );

        outcome.into_record(mint("dec"), utc_now(), params, self.cfg.chair.as_str())
    }
}

impl Default for Switchboard {
    fn default() -> Self {
        Self::new(SwitchboardCfg::default())
    }
}

impl fmt::Debug for Switchboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Switchboard")
            .field("cfg", &self.cfg)
            .field("moderators", &self.moderators.iter().map(|m| m.name()).collect::<Vec<_>>())
            .field("buffered", &self.buffer.len())
            .finish()
    }
}
