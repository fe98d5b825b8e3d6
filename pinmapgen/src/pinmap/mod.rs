//! Canonical Pinmap
//!
//! The single artifact handed to firmware emitters. A pinmap is built fresh
//! for every request, owns all of its data (no references back into the MCU
//! profile) and is never mutated after construction.
//!
//! # Pipeline
//!
//! ```text
//! raw nets ──▶ normalize ──▶ validate ──▶ pair detection ──▶ role inference ──▶ pinmap
//!             (profile)     (validator)      (pairs)             (roles)
//! ```
//!
//! # Serialized shape
//!
//! ```text
//! {
//!   "mcu": "rp2040",
//!   "mcu_ref": "U1",
//!   "pins": { "<net>": { "pins": [..], "role": "..", "bus_group": .., "description": ".." } },
//!   "differential_pairs": [ { "positive": "..", "negative": ".." } ],
//!   "metadata": { "total_nets", "total_pins", "differential_pairs_count",
//!                 "special_pins_used", "warnings", "errors" }
//! }
//! ```

pub mod builder;
pub mod validator;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::roles::PinRole;

pub use builder::PinmapBuilder;
pub use validator::{is_power_rail, PinmapValidator};

/// Raw front-end input: net name to raw pin names, in design order.
pub type RawNets = IndexMap<String, Vec<String>>;

/// One net's resolved pins plus inferred metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinAssignment {
    /// Key of this assignment in [`CanonicalPinmap::pins`].
    #[serde(skip_serializing)]
    pub net_name: String,
    /// Canonical pin ids, in the order the front-end listed them.
    pub pins: Vec<String>,
    pub role: PinRole,
    pub bus_group: Option<String>,
    pub description: String,
}

/// Two nets carrying one balanced signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DifferentialPair {
    pub positive: String,
    pub negative: String,
}

/// Category of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnrecognizedPin,
    DroppedNet,
    PinConflict,
    MultiPinNet,
    LonelyDifferentialSignal,
    PinAssignment,
}

/// A recovered problem, kept in the pinmap instead of being discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            nets: Vec::new(),
            pin: None,
        }
    }

    pub fn with_net(mut self, net: impl Into<String>) -> Self {
        self.nets.push(net.into());
        self
    }

    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(pin.into());
        self
    }
}

/// Warnings and errors accumulated while building a pinmap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn warn(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(kind = ?diagnostic.kind, "{}", diagnostic.message);
        self.warnings.push(diagnostic);
    }

    pub fn error(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(kind = ?diagnostic.kind, "{}", diagnostic.message);
        self.errors.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    /// All diagnostics of one kind, warnings first.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.warnings
            .iter()
            .chain(self.errors.iter())
            .filter(move |d| d.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinmapMetadata {
    pub total_nets: usize,
    pub total_pins: usize,
    pub differential_pairs_count: usize,
    pub special_pins_used: Vec<String>,
    #[serde(flatten)]
    pub diagnostics: Diagnostics,
}

/// Canonical, MCU-aware pin map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalPinmap {
    pub mcu: String,
    pub mcu_ref: Option<String>,
    pub pins: IndexMap<String, PinAssignment>,
    pub differential_pairs: Vec<DifferentialPair>,
    pub metadata: PinmapMetadata,
}

impl CanonicalPinmap {
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.metadata.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.metadata.diagnostics.errors.is_empty()
    }

    pub fn assignment(&self, net_name: &str) -> Option<&PinAssignment> {
        self.pins.get(net_name)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
