//! Pin name normalization and capability lookup across all MCU profiles

use pinmapgen::mcu::unsupported_role_warning;
use pinmapgen::prelude::*;
use pinmapgen::{profile, McuProfile};

const MCUS: &[&str] = &["rp2040", "stm32g0", "esp32"];

const ALL_ROLES: &[PinRole] = &[
    PinRole::I2cSda,
    PinRole::I2cScl,
    PinRole::UartTx,
    PinRole::UartRx,
    PinRole::SpiMosi,
    PinRole::SpiMiso,
    PinRole::SpiSck,
    PinRole::SpiCs,
    PinRole::UsbDp,
    PinRole::UsbDn,
    PinRole::CanH,
    PinRole::CanL,
    PinRole::Adc,
    PinRole::Dac,
    PinRole::Pwm,
    PinRole::GpioIn,
    PinRole::GpioOut,
    PinRole::Led,
    PinRole::Button,
    PinRole::Reset,
    PinRole::Clock,
    PinRole::Power,
    PinRole::Ground,
    PinRole::Unknown,
];

fn profiles() -> Vec<&'static McuProfile> {
    MCUS.iter().map(|id| profile(id).unwrap()).collect()
}

#[test]
fn test_canonical_ids_round_trip() {
    for p in profiles() {
        for id in p.catalog().canonical_ids() {
            assert_eq!(p.normalize(id).unwrap(), id, "{} on {}", id, p.id());
            assert_eq!(
                p.normalize(&id.to_lowercase()).unwrap(),
                id,
                "lower-case {} on {}",
                id,
                p.id()
            );
            assert_eq!(p.normalize(&format!("  {}\t", id)).unwrap(), id);
        }
    }
}

#[test]
fn test_aliases_round_trip() {
    for p in profiles() {
        for entry in p.catalog().iter() {
            for alias in &entry.aliases {
                assert_eq!(
                    p.normalize(alias).unwrap(),
                    entry.canonical_id,
                    "alias {} on {}",
                    alias,
                    p.id()
                );
                assert_eq!(
                    p.normalize(&format!(" {} ", alias.to_lowercase())).unwrap(),
                    entry.canonical_id
                );
            }
        }
    }
}

#[test]
fn test_normalization_is_idempotent() {
    let samples: &[(&str, &[&str])] = &[
        ("rp2040", &["gpio7", "IO3", "12", "usb_dn", "adc2"]),
        ("stm32g0", &["pb3", "GPIOC13", "F1", "osc32_in", "swclk"]),
        ("esp32", &["io4", "39", "sensor_vn", "dac2", "GPIO05"]),
    ];
    for (mcu, names) in samples {
        let p = profile(mcu).unwrap();
        for name in names.iter() {
            let once = p.normalize(name).unwrap();
            let twice = p.normalize(&once).unwrap();
            assert_eq!(once, twice, "{} on {}", name, mcu);
        }
    }
}

#[test]
fn test_unrecognized_pin_error() {
    let rp2040 = profile("rp2040").unwrap();
    match rp2040.normalize("GP99") {
        Err(PinmapError::UnrecognizedPin { pin, mcu, reason }) => {
            assert_eq!(pin, "GP99");
            assert_eq!(mcu, "rp2040");
            assert!(reason.contains("outside the RP2040 pin range"));
        }
        other => panic!("expected UnrecognizedPin, got {:?}", other),
    }

    for p in profiles() {
        for bad in ["", "   ", "NOT_A_PIN", "GPIO-1"] {
            assert!(p.normalize(bad).is_err(), "{:?} on {}", bad, p.id());
        }
    }
}

#[test]
fn test_capabilities_of_unknown_is_empty() {
    for p in profiles() {
        assert!(p.capabilities_of("NOT_A_PIN").is_empty());
        assert!(p.capabilities_of("").is_empty());
    }
}

#[test]
fn test_capabilities_follow_normalization() {
    let rp2040 = profile("rp2040").unwrap();
    assert!(rp2040.capabilities_of("adc0").contains(&PinCapability::Adc));
    assert!(!rp2040.capabilities_of("GP5").contains(&PinCapability::Adc));

    let stm32 = profile("stm32g0").unwrap();
    assert!(stm32.capabilities_of("A4").contains(&PinCapability::Dac));

    let esp32 = profile("esp32").unwrap();
    assert!(esp32.capabilities_of("DAC2").contains(&PinCapability::Dac));
    assert!(!esp32.capabilities_of("VN").contains(&PinCapability::UartTx));
}

#[test]
fn test_capability_gated_warnings() {
    for p in profiles() {
        for entry in p.catalog().iter() {
            let id = entry.canonical_id.as_str();
            for &role in ALL_ROLES {
                let Some(required) = role.required_capability() else {
                    continue;
                };
                let expected = unsupported_role_warning(id, role, required);
                let warnings = p.validate_assignment(id, role);
                assert_eq!(
                    warnings.contains(&expected),
                    !p.capabilities_of(id).contains(&required),
                    "{} as {} on {}",
                    id,
                    role,
                    p.id()
                );
            }
        }
    }
}

#[test]
fn test_capability_gated_warnings_for_any_spelling() {
    for p in profiles() {
        for entry in p.catalog().iter() {
            let id = entry.canonical_id.as_str();
            let mut spellings = vec![id.to_lowercase(), format!(" {} ", id)];
            spellings.extend(entry.aliases.iter().cloned());
            spellings.extend(entry.aliases.iter().map(|a| a.to_lowercase()));

            for spelling in &spellings {
                for &role in ALL_ROLES {
                    let Some(required) = role.required_capability() else {
                        continue;
                    };
                    let warnings = p.validate_assignment(spelling, role);
                    assert_eq!(
                        warnings.contains(&unsupported_role_warning(id, role, required)),
                        !p.capabilities_of(spelling).contains(&required),
                        "{:?} as {} on {}",
                        spelling,
                        role,
                        p.id()
                    );
                    assert_eq!(warnings, p.validate_assignment(id, role));
                }
            }
        }
    }
}

#[test]
fn test_lower_case_pin_gets_capability_warning() {
    let rp2040 = profile("rp2040").unwrap();
    let warnings = rp2040.validate_assignment("gp5", PinRole::Adc);
    assert_eq!(
        warnings,
        vec![unsupported_role_warning("GP5", PinRole::Adc, PinCapability::Adc)]
    );
    assert!(!warnings.iter().any(|w| w.contains("not found")));
}

#[test]
fn test_unknown_pin_assignment_warning() {
    let esp32 = profile("esp32").unwrap();
    let warnings = esp32.validate_assignment("GPIO6", PinRole::Led);
    assert_eq!(
        warnings,
        vec!["Pin GPIO6 not found in ESP32 pin definitions".to_string()]
    );
}
