//! Core pinmap API shared by front-ends and emitters.
//! No file-format or UI dependencies.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::mcu::ProfileRegistry;
use crate::pairs::DiffPairTemplate;
use crate::pinmap::{CanonicalPinmap, RawNets};
use crate::roles::RoleRuleConfig;

#[derive(Debug, thiserror::Error)]
pub enum PinmapError {
    #[error("Cannot normalize {mcu} pin name '{pin}': {reason}")]
    UnrecognizedPin {
        pin: String,
        mcu: String,
        reason: String,
    },
    #[error("Pin {pin} is claimed by both {first_net} and {second_net}")]
    PinConflict {
        pin: String,
        first_net: String,
        second_net: String,
    },
    #[error("Unknown MCU '{mcu}' (supported: {supported})")]
    UnknownMcu { mcu: String, supported: String },
    #[error("No usable nets after normalization ({dropped} dropped)")]
    EmptyInput { dropped: usize },
    #[error("Invalid role pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for PinmapError {
    fn from(e: serde_json::Error) -> Self {
        PinmapError::Config(e.to_string())
    }
}

/// What to do when one pin is claimed by two unrelated nets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Record the conflict in `metadata.errors` and still produce a pinmap.
    #[default]
    Report,
    /// Fail the build with [`PinmapError::PinConflict`].
    Abort,
}

/// Options for a pinmap build.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PinmapOptions {
    pub conflict_policy: ConflictPolicy,
    /// Run per-pin assignment validation and record its warnings.
    pub validate_assignments: bool,
    /// Reference designator of the MCU, echoed into the output.
    pub mcu_ref: Option<String>,
    /// Replaces the built-in differential pair templates, in priority order.
    pub pair_templates: Option<Vec<DiffPairTemplate>>,
    /// Extra role rules, tried before the built-in table.
    pub role_overrides: Vec<RoleRuleConfig>,
}

impl Default for PinmapOptions {
    fn default() -> Self {
        Self {
            conflict_policy: ConflictPolicy::Report,
            validate_assignments: true,
            mcu_ref: None,
            pair_templates: None,
            role_overrides: vec![],
        }
    }
}

impl PinmapOptions {
    pub fn from_json_str(json: &str) -> Result<Self, PinmapError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, PinmapError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Load front-end output: a JSON object of net name to raw pin names.
///
/// A bare string is accepted for single-pin nets. Key order is preserved.
pub fn load_raw_nets(path: &Path) -> Result<RawNets, PinmapError> {
    let content = std::fs::read_to_string(path)?;
    parse_raw_nets(&content)
}

pub fn parse_raw_nets(json: &str) -> Result<RawNets, PinmapError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPins {
        One(String),
        Many(Vec<String>),
    }

    let parsed: indexmap::IndexMap<String, RawPins> = serde_json::from_str(json)?;
    Ok(parsed
        .into_iter()
        .map(|(net, pins)| match pins {
            RawPins::One(pin) => (net, vec![pin]),
            RawPins::Many(pins) => (net, pins),
        })
        .collect())
}

/// Core pinmap API used by front-ends.
pub struct PinmapGenCore;

impl PinmapGenCore {
    /// Build a canonical pinmap for `mcu_id` from in-memory raw nets.
    pub fn build(
        raw_nets: &RawNets,
        mcu_id: &str,
        options: &PinmapOptions,
    ) -> Result<CanonicalPinmap, PinmapError> {
        let profile = ProfileRegistry::global().get(mcu_id)?;
        profile.build_canonical_pinmap_with(raw_nets, options)
    }

    /// Build from a raw-nets JSON file.
    pub fn build_from_file(
        path: &Path,
        mcu_id: &str,
        options: &PinmapOptions,
    ) -> Result<CanonicalPinmap, PinmapError> {
        // Resolve the MCU first so an unknown id fails before any I/O.
        let profile = ProfileRegistry::global().get(mcu_id)?;
        let raw_nets = load_raw_nets(path)?;
        tracing::debug!("Loaded {} raw nets from {}", raw_nets.len(), path.display());
        profile.build_canonical_pinmap_with(&raw_nets, options)
    }

    pub fn supported_mcus() -> Vec<&'static str> {
        ProfileRegistry::global().supported_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = PinmapOptions::default();
        assert_eq!(options.conflict_policy, ConflictPolicy::Report);
        assert!(options.validate_assignments);
        assert!(options.pair_templates.is_none());
    }

    #[test]
    fn test_options_partial_json() {
        let options = PinmapOptions::from_json_str(r#"{"conflict_policy": "abort"}"#).unwrap();
        assert_eq!(options.conflict_policy, ConflictPolicy::Abort);
        assert!(options.validate_assignments);
        assert!(options.role_overrides.is_empty());
    }

    #[test]
    fn test_options_bad_json() {
        let err = PinmapOptions::from_json_str(r#"{"conflict_policy": "explode"}"#).unwrap_err();
        assert!(matches!(err, PinmapError::Config(_)));
    }

    #[test]
    fn test_parse_raw_nets_keeps_order() {
        let nets = parse_raw_nets(r#"{"Z_NET": "GP1", "A_NET": ["GP2", "GP3"]}"#).unwrap();
        let keys: Vec<&str> = nets.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Z_NET", "A_NET"]);
        assert_eq!(nets["Z_NET"], vec!["GP1".to_string()]);
        assert_eq!(nets["A_NET"].len(), 2);
    }

    #[test]
    fn test_error_messages() {
        let err = PinmapError::UnknownMcu {
            mcu: "pic32".to_string(),
            supported: "rp2040, stm32g0, esp32".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown MCU 'pic32' (supported: rp2040, stm32g0, esp32)"
        );
    }

    #[test]
    fn test_supported_mcus() {
        assert_eq!(PinmapGenCore::supported_mcus(), vec!["rp2040", "stm32g0", "esp32"]);
    }
}
