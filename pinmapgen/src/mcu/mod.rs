//! MCU Profiles
//!
//! Per-family electrical knowledge: which physical pin exists, what it can
//! do, which pins are boot-critical or dangerous to reassign, and how the
//! family's pin names are spelled.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   builds once   ┌──────────────────────────────┐
//! │  McuFamily   │────────────────▶│          McuProfile          │
//! │ (rp2040,     │                 │  PinCatalog + peripherals    │
//! │  stm32g0,    │                 │  normalize / capabilities_of │
//! │  esp32)      │                 │  validate_assignment / build │
//! └──────────────┘                 └──────────────┬───────────────┘
//!                                                 │
//!                                       ┌─────────▼─────────┐
//!                                       │  ProfileRegistry  │
//!                                       │ (process-wide,    │
//!                                       │  read-only)       │
//!                                       └───────────────────┘
//! ```
//!
//! Every family honours the same normalization and lookup contract; only the
//! catalog data, the shorthand grammar and the role-specific warnings differ.

pub mod esp32;
pub mod registry;
pub mod rp2040;
pub mod stm32g0;

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::capability::{CapabilitySet, PinCapability};
use crate::core::{PinmapError, PinmapOptions};
use crate::pairs::DifferentialPairDetector;
use crate::pinmap::{CanonicalPinmap, DifferentialPair, PinmapBuilder, RawNets};
use crate::roles::PinRole;

pub use esp32::Esp32;
pub use registry::{profile, ProfileRegistry};
pub use rp2040::Rp2040;
pub use stm32g0::Stm32G0;

/// Static description of one physical pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub canonical_id: String,
    pub capabilities: CapabilitySet,
    pub special_function: Option<String>,
    pub warnings: Vec<String>,
    pub aliases: BTreeSet<String>,
}

impl CatalogEntry {
    pub fn new(canonical_id: impl Into<String>, capabilities: CapabilitySet) -> Self {
        Self {
            canonical_id: canonical_id.into(),
            capabilities,
            special_function: None,
            warnings: Vec::new(),
            aliases: BTreeSet::new(),
        }
    }

    pub fn special_function(mut self, function: Option<&str>) -> Self {
        self.special_function = function.map(str::to_string);
        self
    }

    pub fn warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into().to_ascii_uppercase());
        self
    }

    pub fn has(&self, capability: PinCapability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Canonical pin id to entry, plus an upper-cased alias index.
#[derive(Debug, Clone, Default)]
pub struct PinCatalog {
    entries: IndexMap<String, CatalogEntry>,
    aliases: HashMap<String, String>,
}

impl PinCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. An alias already claimed by another pin, or shadowing a
    /// canonical id, is ignored so lookups stay unambiguous.
    pub fn insert(&mut self, entry: CatalogEntry) {
        for alias in &entry.aliases {
            if alias == &entry.canonical_id {
                continue;
            }
            if self.entries.contains_key(alias) {
                tracing::warn!("Alias {} shadows canonical pin; ignored", alias);
                continue;
            }
            if let Some(owner) = self.aliases.get(alias) {
                tracing::warn!(
                    "Alias {} already maps to {}; ignored for {}",
                    alias,
                    owner,
                    entry.canonical_id
                );
                continue;
            }
            self.aliases.insert(alias.clone(), entry.canonical_id.clone());
        }
        self.entries.insert(entry.canonical_id.clone(), entry);
    }

    pub fn get(&self, canonical_id: &str) -> Option<&CatalogEntry> {
        self.entries.get(canonical_id)
    }

    pub fn contains(&self, canonical_id: &str) -> bool {
        self.entries.contains_key(canonical_id)
    }

    /// Canonical id for an upper-cased alias.
    pub fn resolve_alias(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn canonical_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A peripheral instance and the pins it can be routed to, per signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeripheralInstance {
    pub kind: String,
    pub index: u8,
    pub role_pin_hints: IndexMap<String, Vec<String>>,
}

impl PeripheralInstance {
    pub fn new(kind: &str, index: u8) -> Self {
        Self {
            kind: kind.to_string(),
            index,
            role_pin_hints: IndexMap::new(),
        }
    }

    pub fn hint(mut self, signal: &str, pins: &[&str]) -> Self {
        self.role_pin_hints.insert(
            signal.to_string(),
            pins.iter().map(|p| p.to_string()).collect(),
        );
        self
    }
}

/// Family-specific knowledge plugged into an [`McuProfile`].
pub trait McuFamily: Send + Sync {
    /// Registry key (`rp2040`, `stm32g0`, `esp32`).
    fn id(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    fn build_catalog(&self) -> PinCatalog;

    fn build_peripherals(&self) -> Vec<PeripheralInstance>;

    /// Map a trimmed, upper-cased shorthand (`GPIO5`, `A5`, `IO21`) to the
    /// canonical id it would name. The candidate is not checked against the
    /// catalog; the profile rejects ids outside the family's range.
    fn shorthand_candidate(&self, name: &str) -> Option<String>;

    /// Warnings that depend on how the pin is used, beyond the catalog's
    /// static list.
    fn role_warnings(&self, _entry: &CatalogEntry, _role: PinRole) -> Vec<String> {
        Vec::new()
    }
}

/// Immutable, shareable profile for one MCU family.
pub struct McuProfile {
    family: Box<dyn McuFamily>,
    catalog: PinCatalog,
    peripherals: Vec<PeripheralInstance>,
}

impl std::fmt::Debug for McuProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McuProfile")
            .field("id", &self.family.id())
            .field("pins", &self.catalog.len())
            .field("peripherals", &self.peripherals.len())
            .finish()
    }
}

impl McuProfile {
    pub fn new(family: Box<dyn McuFamily>) -> Self {
        let catalog = family.build_catalog();
        let peripherals = family.build_peripherals();
        tracing::info!(
            "Built {} profile: {} pins, {} peripherals",
            family.display_name(),
            catalog.len(),
            peripherals.len()
        );
        Self {
            family,
            catalog,
            peripherals,
        }
    }

    pub fn id(&self) -> &'static str {
        self.family.id()
    }

    pub fn display_name(&self) -> &'static str {
        self.family.display_name()
    }

    pub fn catalog(&self) -> &PinCatalog {
        &self.catalog
    }

    pub fn peripherals(&self) -> &[PeripheralInstance] {
        &self.peripherals
    }

    pub fn peripheral(&self, kind: &str, index: u8) -> Option<&PeripheralInstance> {
        self.peripherals
            .iter()
            .find(|p| p.index == index && p.kind.eq_ignore_ascii_case(kind))
    }

    /// Resolve a raw pin name to its canonical id.
    ///
    /// Case-insensitive and whitespace-trimmed. Accepts the canonical form,
    /// catalog aliases and the family's shorthand grammar; never invents a
    /// pin that is not in the catalog.
    pub fn normalize(&self, raw_name: &str) -> Result<String, PinmapError> {
        let name = raw_name.trim().to_ascii_uppercase();
        if name.is_empty() {
            return Err(self.unrecognized(raw_name, "pin name is empty"));
        }

        if self.catalog.contains(&name) {
            return Ok(name);
        }
        if let Some(id) = self.catalog.resolve_alias(&name) {
            return Ok(id.to_string());
        }

        match self.family.shorthand_candidate(&name) {
            Some(candidate) if self.catalog.contains(&candidate) => Ok(candidate),
            Some(candidate) => Err(self.unrecognized(
                raw_name,
                &format!("{} is outside the {} pin range", candidate, self.display_name()),
            )),
            None => Err(self.unrecognized(raw_name, "no naming rule matches")),
        }
    }

    fn unrecognized(&self, raw_name: &str, reason: &str) -> PinmapError {
        PinmapError::UnrecognizedPin {
            pin: raw_name.trim().to_string(),
            mcu: self.id().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Capabilities of a pin; empty for anything the catalog does not know.
    pub fn capabilities_of(&self, id: &str) -> CapabilitySet {
        self.normalize(id)
            .ok()
            .and_then(|canonical| self.catalog.get(&canonical))
            .map(|entry| entry.capabilities.clone())
            .unwrap_or_default()
    }

    /// Advisory warnings for using pin `id` in `role`.
    ///
    /// `id` goes through [`normalize`](Self::normalize) first, so aliases and
    /// any spelling `capabilities_of` accepts are checked against the same pin.
    pub fn validate_assignment(&self, id: &str, role: PinRole) -> Vec<String> {
        let Some(entry) = self
            .normalize(id)
            .ok()
            .and_then(|canonical| self.catalog.get(&canonical))
        else {
            return vec![format!(
                "Pin {} not found in {} pin definitions",
                id.trim(),
                self.display_name()
            )];
        };

        let mut warnings = entry.warnings.clone();

        if let Some(required) = role.required_capability() {
            if !entry.has(required) {
                warnings.push(unsupported_role_warning(&entry.canonical_id, role, required));
            }
        }

        warnings.extend(self.family.role_warnings(entry, role));
        warnings
    }

    /// Differential pairs among `net_names` using the built-in templates.
    pub fn detect_differential_pairs<S: AsRef<str>>(
        &self,
        net_names: &[S],
    ) -> Vec<DifferentialPair> {
        DifferentialPairDetector::default().detect(net_names)
    }

    /// Build a canonical pinmap with default options.
    pub fn build_canonical_pinmap(
        &self,
        raw_nets: &RawNets,
    ) -> Result<CanonicalPinmap, PinmapError> {
        self.build_canonical_pinmap_with(raw_nets, &PinmapOptions::default())
    }

    pub fn build_canonical_pinmap_with(
        &self,
        raw_nets: &RawNets,
        options: &PinmapOptions,
    ) -> Result<CanonicalPinmap, PinmapError> {
        PinmapBuilder::from_options(self, options)?.build(raw_nets)
    }
}

/// Message used when a role's required capability is missing.
pub fn unsupported_role_warning(id: &str, role: PinRole, required: PinCapability) -> String {
    format!(
        "Pin {} may not support {} (missing {} capability)",
        id, role, required
    )
}

/// Parse an all-digit pin number; leading zeros allowed.
pub(crate) fn parse_pin_number(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_alias_collisions_are_ignored() {
        let mut catalog = PinCatalog::new();
        catalog.insert(
            CatalogEntry::new("P1", [PinCapability::Gpio].into_iter().collect()).alias("shared"),
        );
        catalog.insert(
            CatalogEntry::new("P2", [PinCapability::Gpio].into_iter().collect())
                .alias("SHARED")
                .alias("P1"),
        );

        assert_eq!(catalog.resolve_alias("SHARED"), Some("P1"));
        assert_eq!(catalog.resolve_alias("P1"), None);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_parse_pin_number() {
        assert_eq!(parse_pin_number("07"), Some(7));
        assert_eq!(parse_pin_number(""), None);
        assert_eq!(parse_pin_number("1X"), None);
        assert_eq!(parse_pin_number("-1"), None);
    }

    #[test]
    fn test_peripheral_hints() {
        let p = PeripheralInstance::new("I2C", 1)
            .hint("sda", &["PA10"])
            .hint("scl", &["PA9", "PB6"]);
        assert_eq!(p.role_pin_hints["sda"], vec!["PA10".to_string()]);
        assert_eq!(
            p.role_pin_hints.keys().collect::<Vec<_>>(),
            vec!["sda", "scl"]
        );
    }
}
