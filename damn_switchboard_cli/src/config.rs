//! Optional TOML policy file.
//!
//! ```toml
//! chair = "MyAI"
//! denylist = ["paywall", "donation only", "ads"]
//!
//! [capsule]
//! id = "MyAI.v1.Tribalism"
//! invariants = ["No paywalls or money-grab motives"]
//! priorities = ["Ship small, iterate"]
//!
//! [weights]
//! Claude = 1.1
//!
//! [scoring]
//! no_eta_bonus = 0.0
//! ```
//!
//! Every section is optional. `weights` overlays the stock table; the other
//! sections replace their default wholesale.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use damn_switchboard_core::{AgentWeights, ContextCapsule, ScoreParams, SwitchboardCfg};

use crate::error::CliError;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CfgFile {
    pub capsule: Option<ContextCapsule>,
    pub weights: Option<AgentWeights>,
    pub denylist: Option<Vec<String>>,
    pub chair: Option<String>,
    pub scoring: Option<ScoreParams>,
}

impl CfgFile {
    pub fn parse(text: &str, path: &Path) -> Result<Self, CliError> {
        toml::from_str(text).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layer this file over the stock configuration.
    pub fn into_cfg(self) -> SwitchboardCfg {
        let mut cfg = SwitchboardCfg::default();
        if let Some(capsule) = self.capsule {
            cfg.capsule = capsule;
        }
        if let Some(weights) = self.weights {
            cfg.weights.merge(weights);
        }
        if let Some(denylist) = self.denylist {
            cfg.denylist = denylist;
        }
        if let Some(chair) = self.chair {
            cfg.chair = chair;
        }
        if let Some(scoring) = self.scoring {
            cfg.scoring = scoring;
        }
        cfg
    }
}

/// Stock config when `path` is `None`, otherwise the file layered over it.
pub fn load_cfg(path: Option<&Path>) -> Result<SwitchboardCfg, CliError> {
    let Some(path) = path else {
        return Ok(SwitchboardCfg::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = CfgFile::parse(&text, path)?.into_cfg();
    debug!(path = %path.display(), capsule = %cfg.capsule.id, "loaded config");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_overlay_defaults() {
        let file = CfgFile::parse(
            "chair = \"Council\"\n[weights]\nClaude = 1.3\nNewcomer = 0.9\n",
            Path::new("t.toml"),
        )
        .unwrap();
        let cfg = file.into_cfg();
        assert_eq!(cfg.chair, "Council");
        assert_eq!(cfg.weights.weight_for("Claude"), 1.3);
        assert_eq!(cfg.weights.weight_for("Newcomer"), 0.9);
        assert_eq!(cfg.weights.weight_for("MyAI"), 1.15);
        assert_eq!(cfg.denylist, SwitchboardCfg::default().denylist);
    }

    #[test]
    fn partial_scoring_keeps_other_constants() {
        let cfg = CfgFile::parse("[scoring]\nno_eta_bonus = 0.0\n", Path::new("t.toml"))
            .unwrap()
            .into_cfg();
        assert_eq!(cfg.scoring.no_eta_bonus, 0.0);
        assert_eq!(cfg.scoring.evidence_unit, 0.04);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CfgFile::parse("chiar = \"typo\"\n", Path::new("t.toml")).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }
}
