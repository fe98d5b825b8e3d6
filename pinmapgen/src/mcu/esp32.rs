//! ESP32 profile (ESP32-WROOM-32 pinout).
//!
//! The GPIO matrix routes any digital peripheral to any output-capable pin,
//! so capabilities are broad. The interesting knowledge is in the warnings:
//! strapping pins, the console UART, input-only pins and ADC2's conflict
//! with WiFi. GPIO6-11 are wired to the module flash and left out.

use super::{parse_pin_number, CatalogEntry, McuFamily, PeripheralInstance, PinCatalog};
use crate::capability::{CapabilitySet, PinCapability};
use crate::roles::PinRole;

const GPIO_PINS: &[u32] = &[
    0, 1, 2, 3, 4, 5, 12, 13, 14, 15, 16, 17, 18, 19, 21, 22, 23, 25, 26, 27, 32, 33, 34, 35, 36,
    37, 38, 39,
];

const INPUT_ONLY: &[u32] = &[34, 35, 36, 37, 38, 39];
const ADC1_PINS: &[u32] = &[32, 33, 34, 35, 36, 37, 38, 39];
const ADC2_PINS: &[u32] = &[0, 2, 4, 12, 13, 14, 15, 25, 26, 27];
const DAC_PINS: &[u32] = &[25, 26];
const STRAPPING: &[u32] = &[0, 2, 5, 12, 15];
const UART0: &[u32] = &[1, 3];

const NAMED_ALIASES: &[(u32, &str)] = &[
    (1, "TXD0"),
    (3, "RXD0"),
    (25, "DAC1"),
    (26, "DAC2"),
    (36, "VP"),
    (36, "SENSOR_VP"),
    (39, "VN"),
    (39, "SENSOR_VN"),
];

fn special_function(num: u32) -> Option<&'static str> {
    let function = match num {
        0 => "Strapping Pin / Boot Mode / ADC2_CH1 / Touch1",
        1 => "UART0 TX (Console)",
        2 => "Strapping Pin / Boot Mode / ADC2_CH2 / Touch2",
        3 => "UART0 RX (Console)",
        5 => "Strapping Pin / VSPI CS0",
        12 => "Strapping Pin / Boot Voltage / ADC2_CH5 / Touch5",
        15 => "Strapping Pin / Boot Silence / ADC2_CH3 / Touch3",
        25 => "DAC1 / ADC2_CH8",
        26 => "DAC2 / ADC2_CH9",
        34 => "ADC1_CH6 (Input Only)",
        35 => "ADC1_CH7 (Input Only)",
        36 => "ADC1_CH0 / VP (Input Only)",
        37 => "ADC1_CH1 (Input Only)",
        38 => "ADC1_CH2 (Input Only)",
        39 => "ADC1_CH3 / VN (Input Only)",
        _ => return None,
    };
    Some(function)
}

fn static_warnings(num: u32) -> Vec<String> {
    let mut warnings = Vec::new();

    if STRAPPING.contains(&num) {
        warnings.push("Strapping pin - state at boot affects ESP32 behavior".to_string());
    }
    match num {
        0 => warnings.push("GPIO0 low at boot enters download mode".to_string()),
        2 => warnings.push("GPIO2 must be low/floating at boot".to_string()),
        12 => warnings.push("GPIO12 controls boot voltage - keep low for 3.3V VDD".to_string()),
        15 => warnings.push("GPIO15 controls boot message silence".to_string()),
        _ => {}
    }
    if UART0.contains(&num) {
        warnings.push("UART0 pin - used for programming and console output".to_string());
    }
    if INPUT_ONLY.contains(&num) {
        warnings.push("Input-only pin - no output or pull-up capability".to_string());
    }
    if ADC2_PINS.contains(&num) {
        warnings.push("ADC2 not available when WiFi is active".to_string());
    }

    warnings
}

fn capabilities(num: u32) -> CapabilitySet {
    let mut caps = if INPUT_ONLY.contains(&num) {
        [PinCapability::Gpio].into_iter().collect()
    } else {
        PinCapability::digital_peripherals()
    };
    if ADC1_PINS.contains(&num) || ADC2_PINS.contains(&num) {
        caps.insert(PinCapability::Adc);
    }
    if DAC_PINS.contains(&num) {
        caps.insert(PinCapability::Dac);
    }
    caps
}

fn pin_number(canonical_id: &str) -> Option<u32> {
    canonical_id.strip_prefix("GPIO").and_then(parse_pin_number)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Esp32;

impl McuFamily for Esp32 {
    fn id(&self) -> &'static str {
        "esp32"
    }

    fn display_name(&self) -> &'static str {
        "ESP32"
    }

    fn build_catalog(&self) -> PinCatalog {
        let mut catalog = PinCatalog::new();

        for &num in GPIO_PINS {
            let mut entry = CatalogEntry::new(format!("GPIO{}", num), capabilities(num))
                .special_function(special_function(num))
                .warnings(static_warnings(num))
                .alias(format!("IO{}", num))
                .alias(num.to_string());
            for (_, alias) in NAMED_ALIASES.iter().filter(|(n, _)| *n == num) {
                entry = entry.alias(*alias);
            }
            catalog.insert(entry);
        }

        catalog
    }

    fn build_peripherals(&self) -> Vec<PeripheralInstance> {
        vec![
            PeripheralInstance::new("I2C", 0)
                .hint("sda", &["GPIO21", "GPIO4", "GPIO15"])
                .hint("scl", &["GPIO22", "GPIO5", "GPIO2"]),
            PeripheralInstance::new("I2C", 1)
                .hint("sda", &["GPIO33", "GPIO32", "GPIO26"])
                .hint("scl", &["GPIO25", "GPIO27", "GPIO14"]),
            // HSPI
            PeripheralInstance::new("SPI", 2)
                .hint("mosi", &["GPIO13"])
                .hint("miso", &["GPIO12"])
                .hint("sck", &["GPIO14"])
                .hint("cs", &["GPIO15"]),
            // VSPI
            PeripheralInstance::new("SPI", 3)
                .hint("mosi", &["GPIO23"])
                .hint("miso", &["GPIO19"])
                .hint("sck", &["GPIO18"])
                .hint("cs", &["GPIO5"]),
            PeripheralInstance::new("UART", 0)
                .hint("tx", &["GPIO1"])
                .hint("rx", &["GPIO3"]),
            PeripheralInstance::new("UART", 1)
                .hint("tx", &["GPIO4"])
                .hint("rx", &["GPIO5", "GPIO16"]),
            PeripheralInstance::new("UART", 2)
                .hint("tx", &["GPIO16", "GPIO17"])
                .hint("rx", &["GPIO4"]),
            PeripheralInstance::new("ADC", 1)
                .hint("ch0", &["GPIO36"])
                .hint("ch1", &["GPIO37"])
                .hint("ch2", &["GPIO38"])
                .hint("ch3", &["GPIO39"])
                .hint("ch6", &["GPIO34"])
                .hint("ch7", &["GPIO35"]),
            PeripheralInstance::new("ADC", 2)
                .hint("ch1", &["GPIO0"])
                .hint("ch2", &["GPIO2"])
                .hint("ch3", &["GPIO15"])
                .hint("ch4", &["GPIO13"])
                .hint("ch5", &["GPIO12"])
                .hint("ch6", &["GPIO14"])
                .hint("ch7", &["GPIO27"])
                .hint("ch8", &["GPIO25"])
                .hint("ch9", &["GPIO26"]),
            PeripheralInstance::new("DAC", 0)
                .hint("channel1", &["GPIO25"])
                .hint("channel2", &["GPIO26"]),
            PeripheralInstance::new("TOUCH", 0)
                .hint("t0", &["GPIO4"])
                .hint("t1", &["GPIO0"])
                .hint("t2", &["GPIO2"])
                .hint("t3", &["GPIO15"])
                .hint("t4", &["GPIO13"])
                .hint("t5", &["GPIO12"])
                .hint("t6", &["GPIO14"])
                .hint("t7", &["GPIO27"])
                .hint("t8", &["GPIO33"])
                .hint("t9", &["GPIO32"]),
        ]
    }

    fn shorthand_candidate(&self, name: &str) -> Option<String> {
        let digits = ["GPIO", "IO"]
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix))
            .unwrap_or(name);
        parse_pin_number(digits).map(|num| format!("GPIO{}", num))
    }

    fn role_warnings(&self, entry: &CatalogEntry, role: PinRole) -> Vec<String> {
        let Some(num) = pin_number(&entry.canonical_id) else {
            return Vec::new();
        };
        let mut warnings = Vec::new();

        if UART0.contains(&num) && !role.is_uart() {
            warnings.push(format!(
                "GPIO{} is UART0 - may interfere with programming/console",
                num
            ));
        }
        if INPUT_ONLY.contains(&num) && role.drives_output() {
            warnings.push(format!("GPIO{} is input-only - cannot drive outputs", num));
        }
        if ADC2_PINS.contains(&num) && role == PinRole::Adc {
            warnings.push(format!("GPIO{} ADC2 not available when WiFi is active", num));
        }

        warnings
    }
}
