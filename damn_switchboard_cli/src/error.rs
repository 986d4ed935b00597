use std::path::PathBuf;

/// Fatal conditions at the command boundary. Everything inside the pipeline
/// degrades to a `none` decision instead.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("[EA] Inbox not found at {}", .0.display())]
    InboxNotFound(PathBuf),

    #[error("[EA] could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[EA] inbox {} is not valid JSON: {source}", path.display())]
    InboxJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("[EA] config {} is invalid: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("[EA] could not encode decision: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("[EA] could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
