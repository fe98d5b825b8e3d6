//! Raw nets to canonical pinmap.

use std::borrow::Cow;

use indexmap::IndexMap;

use super::{
    CanonicalPinmap, Diagnostic, DiagnosticKind, Diagnostics, PinAssignment, PinmapMetadata,
    PinmapValidator, RawNets,
};
use crate::core::{PinmapError, PinmapOptions};
use crate::mcu::McuProfile;
use crate::pairs::DifferentialPairDetector;
use crate::roles::RoleInferencer;

/// One build pipeline bound to a profile and a set of options.
///
/// The builder holds no per-build state; `build` can be called repeatedly
/// and every call yields an independent pinmap.
pub struct PinmapBuilder<'a> {
    profile: &'a McuProfile,
    options: &'a PinmapOptions,
    validator: PinmapValidator,
    detector: DifferentialPairDetector,
    inferencer: Cow<'a, RoleInferencer>,
}

impl<'a> PinmapBuilder<'a> {
    pub fn new(profile: &'a McuProfile, options: &'a PinmapOptions) -> Self {
        Self {
            profile,
            options,
            validator: PinmapValidator::new(options.conflict_policy),
            detector: DifferentialPairDetector::default(),
            inferencer: Cow::Borrowed(RoleInferencer::builtin()),
        }
    }

    /// Builder with templates and role overrides taken from `options`.
    pub fn from_options(
        profile: &'a McuProfile,
        options: &'a PinmapOptions,
    ) -> Result<Self, PinmapError> {
        let mut builder = Self::new(profile, options);
        if let Some(templates) = &options.pair_templates {
            builder.detector = DifferentialPairDetector::new(templates.clone());
        }
        if !options.role_overrides.is_empty() {
            builder.inferencer =
                Cow::Owned(RoleInferencer::with_overrides(&options.role_overrides)?);
        }
        Ok(builder)
    }

    pub fn build(&self, raw_nets: &RawNets) -> Result<CanonicalPinmap, PinmapError> {
        tracing::debug!(
            "Building {} pinmap from {} raw nets",
            self.profile.display_name(),
            raw_nets.len()
        );

        let mut diagnostics = Diagnostics::default();
        let nets = self.normalize_nets(raw_nets, &mut diagnostics)?;

        self.validator.validate(&nets, &mut diagnostics)?;

        let net_names: Vec<&str> = nets.keys().map(String::as_str).collect();
        let differential_pairs = self.detector.detect(&net_names);
        for lonely in self.detector.lonely_signals(&net_names, &differential_pairs) {
            diagnostics.warn(
                Diagnostic::new(
                    DiagnosticKind::LonelyDifferentialSignal,
                    format!("Net {} looks differential but has no partner net", lonely),
                )
                .with_net(lonely),
            );
        }

        let mut pins = IndexMap::with_capacity(nets.len());
        for (net_name, canonical_pins) in &nets {
            let inferred = self.inferencer.infer(net_name);

            if self.options.validate_assignments {
                for pin in canonical_pins {
                    for warning in self.profile.validate_assignment(pin, inferred.role) {
                        diagnostics.warn(
                            Diagnostic::new(
                                DiagnosticKind::PinAssignment,
                                format!("{}: {}", net_name, warning),
                            )
                            .with_net(net_name.as_str())
                            .with_pin(pin.as_str()),
                        );
                    }
                }
            }

            pins.insert(
                net_name.clone(),
                PinAssignment {
                    net_name: net_name.clone(),
                    pins: canonical_pins.clone(),
                    role: inferred.role,
                    bus_group: inferred.bus_group,
                    description: inferred.description,
                },
            );
        }

        let metadata = PinmapMetadata {
            total_nets: pins.len(),
            total_pins: nets.values().map(Vec::len).sum(),
            differential_pairs_count: differential_pairs.len(),
            special_pins_used: self.special_pins_used(&nets),
            diagnostics,
        };

        tracing::info!(
            "Built {} pinmap: {} nets, {} pins, {} differential pairs, {} warnings, {} errors",
            self.profile.display_name(),
            metadata.total_nets,
            metadata.total_pins,
            metadata.differential_pairs_count,
            metadata.diagnostics.warnings.len(),
            metadata.diagnostics.errors.len()
        );

        Ok(CanonicalPinmap {
            mcu: self.profile.id().to_string(),
            mcu_ref: self.options.mcu_ref.clone(),
            pins,
            differential_pairs,
            metadata,
        })
    }

    /// Resolve every raw pin, dropping pins that do not resolve and nets left
    /// with nothing.
    fn normalize_nets(
        &self,
        raw_nets: &RawNets,
        diagnostics: &mut Diagnostics,
    ) -> Result<IndexMap<String, Vec<String>>, PinmapError> {
        if raw_nets.is_empty() {
            return Err(PinmapError::EmptyInput { dropped: 0 });
        }

        let mut nets = IndexMap::with_capacity(raw_nets.len());
        let mut dropped = 0;

        for (net_name, raw_pins) in raw_nets {
            if net_name.trim().is_empty() {
                dropped += 1;
                diagnostics.warn(Diagnostic::new(
                    DiagnosticKind::DroppedNet,
                    "Dropped net with a blank name",
                ));
                continue;
            }

            let mut resolved: Vec<String> = Vec::with_capacity(raw_pins.len());
            for raw_pin in raw_pins {
                match self.profile.normalize(raw_pin) {
                    Ok(id) => {
                        if !resolved.contains(&id) {
                            resolved.push(id);
                        }
                    }
                    Err(e) => diagnostics.warn(
                        Diagnostic::new(DiagnosticKind::UnrecognizedPin, e.to_string())
                            .with_net(net_name.as_str())
                            .with_pin(raw_pin.trim()),
                    ),
                }
            }

            if resolved.is_empty() {
                dropped += 1;
                diagnostics.warn(
                    Diagnostic::new(
                        DiagnosticKind::DroppedNet,
                        format!(
                            "Dropped net {}: no pin resolved on {}",
                            net_name,
                            self.profile.display_name()
                        ),
                    )
                    .with_net(net_name.as_str()),
                );
                continue;
            }

            nets.insert(net_name.clone(), resolved);
        }

        if nets.is_empty() {
            return Err(PinmapError::EmptyInput { dropped });
        }
        Ok(nets)
    }

    fn special_pins_used(&self, nets: &IndexMap<String, Vec<String>>) -> Vec<String> {
        let mut used: Vec<String> = Vec::new();
        for pin in nets.values().flatten() {
            let special = self
                .profile
                .catalog()
                .get(pin)
                .is_some_and(|entry| entry.special_function.is_some());
            if special && !used.contains(pin) {
                used.push(pin.clone());
            }
        }
        used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConflictPolicy;
    use crate::mcu::profile;
    use crate::pairs::DiffPairTemplate;
    use crate::roles::{PinRole, RoleRuleConfig};

    fn raw(entries: &[(&str, &[&str])]) -> RawNets {
        entries
            .iter()
            .map(|(net, pins)| {
                (
                    net.to_string(),
                    pins.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_bad_pin_removed_from_net() {
        let rp2040 = profile("rp2040").unwrap();
        let pinmap = rp2040
            .build_canonical_pinmap(&raw(&[("LED", &["GP99", "GP5"])]))
            .unwrap();

        assert_eq!(pinmap.pins["LED"].pins, vec!["GP5".to_string()]);
        let unrecognized: Vec<_> = pinmap
            .diagnostics()
            .of_kind(DiagnosticKind::UnrecognizedPin)
            .collect();
        assert_eq!(unrecognized.len(), 1);
        assert_eq!(unrecognized[0].pin.as_deref(), Some("GP99"));
    }

    #[test]
    fn test_net_dropped_when_nothing_resolves() {
        let rp2040 = profile("rp2040").unwrap();
        let pinmap = rp2040
            .build_canonical_pinmap(&raw(&[("BAD", &["GP99"]), ("LED", &["GP5"])]))
            .unwrap();

        assert!(pinmap.assignment("BAD").is_none());
        assert_eq!(pinmap.metadata.total_nets, 1);
        let dropped: Vec<_> = pinmap.diagnostics().of_kind(DiagnosticKind::DroppedNet).collect();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].nets, vec!["BAD".to_string()]);
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let rp2040 = profile("rp2040").unwrap();
        let err = rp2040.build_canonical_pinmap(&RawNets::new()).unwrap_err();
        assert!(matches!(err, PinmapError::EmptyInput { dropped: 0 }));

        let err = rp2040
            .build_canonical_pinmap(&raw(&[("A", &["GP99"]), ("B", &[])]))
            .unwrap_err();
        assert!(matches!(err, PinmapError::EmptyInput { dropped: 2 }));
    }

    #[test]
    fn test_repeated_pin_in_net_collapses() {
        let rp2040 = profile("rp2040").unwrap();
        let pinmap = rp2040
            .build_canonical_pinmap(&raw(&[("LED", &["GP5", "GPIO5", "5"])]))
            .unwrap();
        assert_eq!(pinmap.pins["LED"].pins, vec!["GP5".to_string()]);
        assert_eq!(pinmap.metadata.total_pins, 1);
        assert!(pinmap
            .diagnostics()
            .of_kind(DiagnosticKind::MultiPinNet)
            .next()
            .is_none());
    }

    #[test]
    fn test_special_pins_used_in_input_order() {
        let rp2040 = profile("rp2040").unwrap();
        let pinmap = rp2040
            .build_canonical_pinmap(&raw(&[
                ("SENSE_A", &["GP27"]),
                ("USB_DP", &["GP25"]),
                ("LED", &["GP5"]),
                ("SENSE_B", &["GP26"]),
            ]))
            .unwrap();
        assert_eq!(
            pinmap.metadata.special_pins_used,
            vec!["GP27".to_string(), "GP25".to_string(), "GP26".to_string()]
        );
    }

    #[test]
    fn test_assignment_validation_can_be_disabled() {
        let rp2040 = profile("rp2040").unwrap();
        let nets = raw(&[("STATUS_LED", &["GP25"])]);

        let pinmap = rp2040.build_canonical_pinmap(&nets).unwrap();
        assert!(pinmap
            .diagnostics()
            .of_kind(DiagnosticKind::PinAssignment)
            .any(|d| d.message.contains("reserving for USB")));

        let options = PinmapOptions {
            validate_assignments: false,
            ..PinmapOptions::default()
        };
        let quiet = rp2040.build_canonical_pinmap_with(&nets, &options).unwrap();
        assert!(quiet.diagnostics().is_empty());
    }

    #[test]
    fn test_options_flow_through() {
        let esp32 = profile("esp32").unwrap();
        let options = PinmapOptions {
            conflict_policy: ConflictPolicy::Report,
            mcu_ref: Some("U1".to_string()),
            pair_templates: Some(vec![DiffPairTemplate::new("ab", "_A", "_B")]),
            role_overrides: vec![RoleRuleConfig {
                role: PinRole::Led,
                pattern: "(?i)^BEACON".to_string(),
            }],
            ..PinmapOptions::default()
        };
        let pinmap = esp32
            .build_canonical_pinmap_with(
                &raw(&[("CLK_A", &["IO4"]), ("CLK_B", &["IO16"]), ("BEACON", &["IO17"])]),
                &options,
            )
            .unwrap();

        assert_eq!(pinmap.mcu, "esp32");
        assert_eq!(pinmap.mcu_ref.as_deref(), Some("U1"));
        assert_eq!(pinmap.differential_pairs.len(), 1);
        assert_eq!(pinmap.differential_pairs[0].positive, "CLK_A");
        assert_eq!(pinmap.pins["BEACON"].role, PinRole::Led);
    }

    #[test]
    fn test_invalid_override_pattern() {
        let stm32 = profile("stm32g0").unwrap();
        let options = PinmapOptions {
            role_overrides: vec![RoleRuleConfig {
                role: PinRole::Led,
                pattern: "(unclosed".to_string(),
            }],
            ..PinmapOptions::default()
        };
        let err = stm32
            .build_canonical_pinmap_with(&raw(&[("LED", &["PA5"])]), &options)
            .unwrap_err();
        assert!(matches!(err, PinmapError::InvalidPattern { .. }));
    }
}
