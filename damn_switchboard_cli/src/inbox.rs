use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use damn_switchboard_engine::{messages_from_inbox, RawMessage};

use crate::error::CliError;

/// Read `{ "messages": [...] }` from disk.
///
/// Missing file and malformed JSON are fatal. A missing or non-array
/// `messages` field is an empty batch.
pub fn read_inbox(path: &Path) -> Result<Vec<RawMessage>, CliError> {
    if !path.exists() {
        return Err(CliError::InboxNotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Value = serde_json::from_str(&text).map_err(|source| CliError::InboxJson {
        path: path.to_path_buf(),
        source,
    })?;

    match doc.get("messages") {
        Some(Value::Array(_)) | None => {}
        Some(_) => warn!(
            path = %path.display(),
            "inbox `messages` is not an array; treating as empty"
        ),
    }

    let messages = messages_from_inbox(&doc);
    debug!(path = %path.display(), count = messages.len(), "read inbox");
    Ok(messages)
}
