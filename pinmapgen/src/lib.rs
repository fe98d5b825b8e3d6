//! PinmapGen - MCU-aware pin map normalization library
//!
//! This library turns the net-to-pin associations extracted from a schematic
//! into a canonical pin map for one microcontroller family, checking pin
//! names, capabilities, conflicts and boot-critical pins along the way.
//!
//! # Quick Start
//!
//! ```no_run
//! use pinmapgen::{build_pinmap, RawNets};
//!
//! let mut nets = RawNets::new();
//! nets.insert("I2C0_SDA".to_string(), vec!["GPIO0".to_string()]);
//! nets.insert("I2C0_SCL".to_string(), vec!["GPIO1".to_string()]);
//!
//! let pinmap = build_pinmap(&nets, "rp2040").unwrap();
//! for (net, assignment) in &pinmap.pins {
//!     println!("{} -> {:?} ({})", net, assignment.pins, assignment.role);
//! }
//! ```
//!
//! # Features
//!
//! - **MCU profiles**: RP2040, STM32G0 and ESP32 pin catalogs
//! - **Role inference**: I2C, SPI, UART, USB, CAN, analog and GPIO roles from net names
//! - **Differential pairs**: USB, CAN and `_P`/`_N` naming conventions
//! - **Diagnostics**: unresolved pins, conflicts and risky pin choices kept in the output

pub mod capability;
pub mod core;
pub mod mcu;
pub mod pairs;
pub mod pinmap;
pub mod roles;

// Re-export main types
pub use capability::{CapabilitySet, PinCapability};
pub use crate::core::{
    load_raw_nets, parse_raw_nets, ConflictPolicy, PinmapError, PinmapGenCore, PinmapOptions,
};
pub use mcu::{profile, McuFamily, McuProfile, ProfileRegistry};
pub use pairs::{DiffPairTemplate, DifferentialPairDetector};
pub use pinmap::{
    CanonicalPinmap, Diagnostic, DiagnosticKind, DifferentialPair, PinAssignment, RawNets,
};
pub use roles::{PinRole, RoleInferencer, RoleRuleConfig};

/// Build a pinmap with default options (convenience wrapper).
pub fn build_pinmap(raw_nets: &RawNets, mcu_id: &str) -> Result<CanonicalPinmap, PinmapError> {
    PinmapGenCore::build(raw_nets, mcu_id, &PinmapOptions::default())
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        build_pinmap, CanonicalPinmap, ConflictPolicy, DiagnosticKind, PinCapability, PinRole,
        PinmapError, PinmapOptions, RawNets,
    };
}
