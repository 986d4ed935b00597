use std::path::Path;

use damn_switchboard_core::{DecisionKind, DecisionRecord};

use crate::error::CliError;

/// Pretty-print `record` to `path`, creating parent directories and
/// replacing any previous file.
pub fn write_decision(path: &Path, record: &DecisionRecord) -> Result<(), CliError> {
    // encode first so a failure never leaves a truncated file behind
    let text = serde_json::to_string_pretty(record)?;

    let write_err = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(write_err)?;
    }
    std::fs::write(path, text).map_err(write_err)
}

/// Human summary printed after a run.
pub fn summary_lines(record: &DecisionRecord) -> Vec<String> {
    let kind = match record.kind {
        DecisionKind::Nominate => "NOMINATE",
        DecisionKind::None => "NONE",
    };
    let mut lines = vec![format!("[EA] {kind}: {}", record.note)];
    if let Some(top) = record.nominee() {
        lines.push(format!("[EA] Top goal: {}", top.plan.goal().unwrap_or("")));
    }
    lines
}
