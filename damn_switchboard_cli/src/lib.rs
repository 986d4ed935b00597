//! One-shot batch command around the switchboard engine:
//! read an inbox, run one decision, write the record, summarize.

pub mod config;
pub mod error;
pub mod inbox;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use damn_switchboard_core::{DecisionRecord, RunParams};
use damn_switchboard_engine::Switchboard;

pub use error::CliError;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "damn-switchboard",
    version,
    about = "Mediate steward proposals from an inbox into one nominated plan"
)]
pub struct Args {
    /// Inbox JSON (`{ "messages": [...] }`)
    #[arg(default_value = "data/inbox.chatgpt.json")]
    pub input: PathBuf,

    /// Where to write the decision record
    #[arg(default_value = "data/nomination.json")]
    pub output: PathBuf,

    /// Topic recorded on the decision
    #[arg(long, default_value = "inbox-run")]
    pub topic: String,

    /// Advisory deadline recorded on the decision
    #[arg(long, default_value_t = 10)]
    pub deadline_minutes: u32,

    /// Optional TOML policy overrides
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Read, decide, write. Nothing is written unless the inbox loaded cleanly.
pub fn run(args: &Args) -> Result<DecisionRecord, CliError> {
    let cfg = config::load_cfg(args.config.as_deref())?;
    let messages = inbox::read_inbox(&args.input)?;

    let mut switchboard = Switchboard::new(cfg);
    switchboard.ingest_batch(messages);

    let record = switchboard.run(&RunParams::new(args.topic.clone(), args.deadline_minutes));
    output::write_decision(&args.output, &record)?;
    info!(output = %args.output.display(), decision = %record.decision_id, "decision written");

    Ok(record)
}
