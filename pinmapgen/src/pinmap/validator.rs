//! Cross-net checks on normalized nets.

use indexmap::IndexMap;

use super::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::core::{ConflictPolicy, PinmapError};

/// Rail name fragments. A net whose upper-cased name contains one of these is
/// treated as a power or ground rail.
const POWER_RAIL_PATTERNS: &[&str] = &[
    "VCC", "VDD", "VBUS", "3V3", "5V", "1V8", "GND", "VSS", "GROUND", "VREF", "AVDD", "DVDD",
];

/// Whether `net_name` names a power or ground rail.
pub fn is_power_rail(net_name: &str) -> bool {
    let upper = net_name.to_ascii_uppercase();
    POWER_RAIL_PATTERNS.iter().any(|p| upper.contains(p))
}

/// Checks that need the whole set of nets at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinmapValidator {
    policy: ConflictPolicy,
}

impl PinmapValidator {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Run every check, recording findings in `diagnostics`.
    ///
    /// Under [`ConflictPolicy::Abort`] the first pin conflict is returned as
    /// an error instead of being recorded.
    pub fn validate(
        &self,
        nets: &IndexMap<String, Vec<String>>,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), PinmapError> {
        self.check_pin_conflicts(nets, diagnostics)?;
        self.check_multi_pin_nets(nets, diagnostics);
        Ok(())
    }

    /// A pin may belong to several nets only when every one of them is a rail.
    fn check_pin_conflicts(
        &self,
        nets: &IndexMap<String, Vec<String>>,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), PinmapError> {
        let mut owners: IndexMap<&str, &str> = IndexMap::new();

        for (net_name, pins) in nets {
            for pin in pins {
                let Some(&first_net) = owners.get(pin.as_str()) else {
                    owners.insert(pin.as_str(), net_name.as_str());
                    continue;
                };
                if first_net == net_name || (is_power_rail(first_net) && is_power_rail(net_name)) {
                    continue;
                }

                let conflict = PinmapError::PinConflict {
                    pin: pin.clone(),
                    first_net: first_net.to_string(),
                    second_net: net_name.clone(),
                };
                match self.policy {
                    ConflictPolicy::Abort => return Err(conflict),
                    ConflictPolicy::Report => diagnostics.error(
                        Diagnostic::new(DiagnosticKind::PinConflict, conflict.to_string())
                            .with_net(first_net)
                            .with_net(net_name.as_str())
                            .with_pin(pin.as_str()),
                    ),
                }
            }
        }

        Ok(())
    }

    fn check_multi_pin_nets(
        &self,
        nets: &IndexMap<String, Vec<String>>,
        diagnostics: &mut Diagnostics,
    ) {
        for (net_name, pins) in nets {
            if pins.len() > 1 && !is_power_rail(net_name) {
                diagnostics.warn(
                    Diagnostic::new(
                        DiagnosticKind::MultiPinNet,
                        format!(
                            "Net {} connects {} MCU pins ({}); check for shorted signals",
                            net_name,
                            pins.len(),
                            pins.join(", ")
                        ),
                    )
                    .with_net(net_name.as_str()),
                );
            }
        }
    }
}
