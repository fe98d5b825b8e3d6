//! STM32G0 profile (STM32G071, 48-pin package).
//!
//! Port-letter ids (`PA0..PF2`). Unlike the RP2040 and ESP32, peripheral
//! access is fixed per pin by the alternate-function table, so capabilities
//! are looked up pin by pin.

use super::{parse_pin_number, CatalogEntry, McuFamily, PeripheralInstance, PinCatalog};
use crate::capability::{CapabilitySet, PinCapability};
use crate::roles::PinRole;

/// Bonded pins per port.
const PORTS: &[(char, &[u32])] = &[
    ('A', &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]),
    ('B', &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]),
    ('C', &[6, 13, 14, 15]),
    ('D', &[0, 1, 2, 3, 8, 9]),
    ('F', &[0, 1, 2]),
];

const PWM_PINS: &[&str] = &[
    "PA0", "PA1", "PA2", "PA3", "PA6", "PA7", "PA8", "PA9", "PA10", "PA11", "PB0", "PB1", "PB3",
    "PB4", "PB5", "PB6", "PB7", "PB8", "PB9", "PB14", "PB15", "PC6",
];

const ADC_PINS: &[&str] = &[
    "PA0", "PA1", "PA2", "PA3", "PA4", "PA5", "PA6", "PA7", "PB0", "PB1", "PB2", "PB10", "PB11",
    "PB12",
];

const DAC_PINS: &[&str] = &["PA4", "PA5"];

/// Alternate-function signals per pin.
const AF_TABLE: &[(&str, &[PinCapability])] = &[
    // I2C1
    ("PA9", &[PinCapability::I2cScl, PinCapability::UartTx]),
    ("PA10", &[PinCapability::I2cSda, PinCapability::UartRx]),
    ("PB6", &[PinCapability::I2cScl, PinCapability::UartTx]),
    ("PB7", &[PinCapability::I2cSda, PinCapability::UartRx]),
    ("PB8", &[PinCapability::I2cScl]),
    ("PB9", &[PinCapability::I2cSda, PinCapability::SpiCs]),
    // I2C2
    ("PA11", &[PinCapability::I2cScl]),
    ("PA12", &[PinCapability::I2cSda]),
    ("PB10", &[PinCapability::I2cScl, PinCapability::UartTx]),
    ("PB11", &[PinCapability::I2cSda, PinCapability::UartRx]),
    ("PB13", &[PinCapability::I2cScl, PinCapability::SpiSck]),
    ("PB14", &[PinCapability::I2cSda, PinCapability::SpiMiso]),
    // SPI1
    ("PA4", &[PinCapability::SpiCs]),
    ("PA5", &[PinCapability::SpiSck]),
    ("PA6", &[PinCapability::SpiMiso]),
    ("PA7", &[PinCapability::SpiMosi]),
    ("PA15", &[PinCapability::SpiCs, PinCapability::UartRx]),
    ("PB3", &[PinCapability::SpiSck]),
    ("PB4", &[PinCapability::SpiMiso]),
    ("PB5", &[PinCapability::SpiMosi]),
    // SPI2
    ("PB12", &[PinCapability::SpiCs]),
    ("PB15", &[PinCapability::SpiMosi]),
    // USART2
    ("PA2", &[PinCapability::UartTx]),
    ("PA3", &[PinCapability::UartRx]),
    ("PA14", &[PinCapability::UartTx]),
];

/// (pin, special function, static warning)
const SPECIAL_PINS: &[(&str, &str, &str)] = &[
    (
        "PA13",
        "SWD Debug IO (SWDIO)",
        "SWD debug pin - avoid using for GPIO if debugging needed",
    ),
    (
        "PA14",
        "SWD Debug Clock (SWCLK)",
        "SWD debug pin - avoid using for GPIO if debugging needed",
    ),
    ("PB2", "Boot1 Pin", "Boot1 pin - state affects boot mode"),
    (
        "PC14",
        "LSE Crystal (32kHz)",
        "LSE crystal pin - avoid if external 32kHz crystal used",
    ),
    (
        "PC15",
        "LSE Crystal (32kHz)",
        "LSE crystal pin - avoid if external 32kHz crystal used",
    ),
    (
        "PF0",
        "HSE Crystal Input",
        "HSE crystal pin - avoid if external crystal/oscillator used",
    ),
    (
        "PF1",
        "HSE Crystal Output",
        "HSE crystal pin - avoid if external crystal/oscillator used",
    ),
    (
        "PF2",
        "NRST (Reset)",
        "NRST reset pin - typically connected to reset circuit",
    ),
];

const NAMED_ALIASES: &[(&str, &str)] = &[
    ("PA13", "SWDIO"),
    ("PA14", "SWCLK"),
    ("PC14", "OSC32_IN"),
    ("PC15", "OSC32_OUT"),
    ("PF0", "OSC_IN"),
    ("PF1", "OSC_OUT"),
    ("PF2", "NRST"),
    ("PA4", "DAC_OUT1"),
    ("PA5", "DAC_OUT2"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Stm32G0;

impl Stm32G0 {
    fn capabilities(pin: &str) -> CapabilitySet {
        let mut caps: CapabilitySet = [PinCapability::Gpio].into_iter().collect();
        if PWM_PINS.contains(&pin) {
            caps.insert(PinCapability::Pwm);
        }
        if ADC_PINS.contains(&pin) {
            caps.insert(PinCapability::Adc);
        }
        if DAC_PINS.contains(&pin) {
            caps.insert(PinCapability::Dac);
        }
        for (af_pin, signals) in AF_TABLE {
            if *af_pin == pin {
                caps.extend(signals.iter().copied());
            }
        }
        caps
    }

    fn special(pin: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
        SPECIAL_PINS.iter().find(|(p, _, _)| *p == pin)
    }
}

impl McuFamily for Stm32G0 {
    fn id(&self) -> &'static str {
        "stm32g0"
    }

    fn display_name(&self) -> &'static str {
        "STM32G0"
    }

    fn build_catalog(&self) -> PinCatalog {
        let mut catalog = PinCatalog::new();

        for (port, pins) in PORTS {
            for num in pins.iter() {
                let id = format!("P{}{}", port, num);
                let mut entry = CatalogEntry::new(id.clone(), Self::capabilities(&id))
                    .alias(format!("GPIO{}{}", port, num))
                    .alias(format!("{}{}", port, num));

                if let Some((_, function, warning)) = Self::special(&id) {
                    entry = entry
                        .special_function(Some(*function))
                        .warnings(vec![warning.to_string()]);
                }
                for (_, alias) in NAMED_ALIASES.iter().filter(|(p, _)| *p == id) {
                    entry = entry.alias(*alias);
                }

                catalog.insert(entry);
            }
        }

        catalog
    }

    fn build_peripherals(&self) -> Vec<PeripheralInstance> {
        vec![
            PeripheralInstance::new("I2C", 1)
                .hint("scl", &["PA9", "PB6", "PB8"])
                .hint("sda", &["PA10", "PB7", "PB9"]),
            PeripheralInstance::new("I2C", 2)
                .hint("scl", &["PA11", "PB10", "PB13"])
                .hint("sda", &["PA12", "PB11", "PB14"]),
            PeripheralInstance::new("SPI", 1)
                .hint("sck", &["PA5", "PB3"])
                .hint("miso", &["PA6", "PB4"])
                .hint("mosi", &["PA7", "PB5"])
                .hint("cs", &["PA4", "PA15"]),
            PeripheralInstance::new("SPI", 2)
                .hint("sck", &["PB13"])
                .hint("miso", &["PB14"])
                .hint("mosi", &["PB15"])
                .hint("cs", &["PB9", "PB12"]),
            PeripheralInstance::new("USART", 1)
                .hint("tx", &["PA9", "PB6"])
                .hint("rx", &["PA10", "PB7"]),
            PeripheralInstance::new("USART", 2)
                .hint("tx", &["PA2", "PA14"])
                .hint("rx", &["PA3", "PA15"]),
            PeripheralInstance::new("USART", 3)
                .hint("tx", &["PB10"])
                .hint("rx", &["PB11"]),
            PeripheralInstance::new("ADC", 1)
                .hint("in0", &["PA0"])
                .hint("in1", &["PA1"])
                .hint("in2", &["PA2"])
                .hint("in3", &["PA3"])
                .hint("in4", &["PA4"])
                .hint("in5", &["PA5"])
                .hint("in6", &["PA6"])
                .hint("in7", &["PA7"])
                .hint("in8", &["PB0"])
                .hint("in9", &["PB1"])
                .hint("in10", &["PB2"])
                .hint("in11", &["PB10"])
                .hint("in15", &["PB11"])
                .hint("in16", &["PB12"]),
            PeripheralInstance::new("DAC", 1)
                .hint("out1", &["PA4"])
                .hint("out2", &["PA5"]),
        ]
    }

    fn shorthand_candidate(&self, name: &str) -> Option<String> {
        let rest = name.strip_prefix("GPIO").unwrap_or(name);
        let mut chars = rest.chars();
        let first = chars.next()?;
        let second = chars.next()?;

        // `PA5` carries the port as its second letter, `A5` as its first.
        let (port, digits) = if first == 'P' && second.is_ascii_alphabetic() {
            (second, &rest[2..])
        } else if first.is_ascii_alphabetic() {
            (first, &rest[1..])
        } else {
            return None;
        };

        let num = parse_pin_number(digits)?;
        Some(format!("P{}{}", port, num))
    }

    fn role_warnings(&self, entry: &CatalogEntry, role: PinRole) -> Vec<String> {
        let id = entry.canonical_id.as_str();
        let general_io = matches!(role, PinRole::GpioIn | PinRole::GpioOut);
        let mut warnings = Vec::new();

        match id {
            "PA13" | "PA14" => warnings.push(format!(
                "Pin {} is SWD debug pin - may conflict with debugging",
                id
            )),
            "PB2" => warnings
                .push("PB2 is Boot1 pin - state affects boot mode selection".to_string()),
            "PC14" | "PC15" if !general_io && role != PinRole::Clock => warnings.push(format!(
                "Pin {} is LSE crystal pin - may conflict with RTC",
                id
            )),
            "PF0" | "PF1" if !general_io && role != PinRole::Clock => warnings.push(format!(
                "Pin {} is HSE crystal pin - may conflict with system clock",
                id
            )),
            "PF2" if role != PinRole::Reset => warnings.push(
                "PF2 is the NRST pin - reassigning it needs option byte changes".to_string(),
            ),
            _ => {}
        }

        warnings
    }
}
