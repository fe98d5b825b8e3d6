//! Process-wide MCU profile registry.
//!
//! Profiles are built lazily, once per family, and are read-only afterwards,
//! so concurrent pinmap builds share them without locking.

use std::sync::OnceLock;

use super::{Esp32, McuFamily, McuProfile, Rp2040, Stm32G0};
use crate::core::PinmapError;

/// Constructor for a family; called at most once per registry slot.
pub type FamilyFactory = fn() -> Box<dyn McuFamily>;

struct ProfileSlot {
    id: String,
    factory: FamilyFactory,
    profile: OnceLock<McuProfile>,
}

impl ProfileSlot {
    fn profile(&self) -> &McuProfile {
        self.profile.get_or_init(|| McuProfile::new((self.factory)()))
    }
}

/// Registry of MCU families keyed by lower-case id.
pub struct ProfileRegistry {
    slots: Vec<ProfileSlot>,
}

static REGISTRY: OnceLock<ProfileRegistry> = OnceLock::new();

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileRegistry {
    /// Shared registry with the built-in families.
    pub fn global() -> &'static ProfileRegistry {
        REGISTRY.get_or_init(ProfileRegistry::builtin)
    }

    /// Empty registry.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Registry with RP2040, STM32G0 and ESP32 registered.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("rp2040", || Box::new(Rp2040));
        registry.register("stm32g0", || Box::new(Stm32G0));
        registry.register("esp32", || Box::new(Esp32));
        registry
    }

    /// Register a family. A later registration replaces an earlier one with
    /// the same id.
    pub fn register(&mut self, id: &str, factory: FamilyFactory) {
        let id = id.trim().to_ascii_lowercase();
        self.slots.retain(|slot| slot.id != id);
        tracing::debug!("Registered MCU family {}", id);
        self.slots.push(ProfileSlot {
            id,
            factory,
            profile: OnceLock::new(),
        });
    }

    /// Profile for `mcu_id`, case-insensitive. Builds it on first use.
    pub fn get(&self, mcu_id: &str) -> Result<&McuProfile, PinmapError> {
        let key = mcu_id.trim().to_ascii_lowercase();
        self.slots
            .iter()
            .find(|slot| slot.id == key)
            .map(ProfileSlot::profile)
            .ok_or_else(|| PinmapError::UnknownMcu {
                mcu: mcu_id.trim().to_string(),
                supported: self.supported_ids().join(", "),
            })
    }

    /// Registered ids, in registration order.
    pub fn supported_ids(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Look up a built-in profile.
pub fn profile(mcu_id: &str) -> Result<&'static McuProfile, PinmapError> {
    ProfileRegistry::global().get(mcu_id)
}
