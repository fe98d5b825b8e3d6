//! Pin Role Inference
//!
//! Classifies nets by their functional role using an ordered table of
//! case-insensitive regex rules. The first rule that matches wins, so the
//! table order is the tie-break between overlapping conventions (a net named
//! `LED_PWM` is a PWM output, not an LED). Names no rule recognizes fall back
//! to direction keywords (`in`/`out`) and finally to [`PinRole::Unknown`].
//!
//! Inference is MCU-independent; capability checks happen in the profile.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::capability::PinCapability;
use crate::core::PinmapError;

/// Functional role of a net as seen by firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinRole {
    #[serde(rename = "i2c.sda")]
    I2cSda,
    #[serde(rename = "i2c.scl")]
    I2cScl,
    #[serde(rename = "uart.tx")]
    UartTx,
    #[serde(rename = "uart.rx")]
    UartRx,
    #[serde(rename = "spi.mosi")]
    SpiMosi,
    #[serde(rename = "spi.miso")]
    SpiMiso,
    #[serde(rename = "spi.sck")]
    SpiSck,
    #[serde(rename = "spi.cs")]
    SpiCs,
    #[serde(rename = "usb.dp")]
    UsbDp,
    #[serde(rename = "usb.dn")]
    UsbDn,
    #[serde(rename = "can.h")]
    CanH,
    #[serde(rename = "can.l")]
    CanL,
    #[serde(rename = "adc")]
    Adc,
    #[serde(rename = "dac")]
    Dac,
    #[serde(rename = "pwm")]
    Pwm,
    #[serde(rename = "gpio.in")]
    GpioIn,
    #[serde(rename = "gpio.out")]
    GpioOut,
    #[serde(rename = "led")]
    Led,
    #[serde(rename = "button")]
    Button,
    #[serde(rename = "reset")]
    Reset,
    #[serde(rename = "clock")]
    Clock,
    #[serde(rename = "power")]
    Power,
    #[serde(rename = "ground")]
    Ground,
    #[serde(rename = "unknown")]
    Unknown,
}

impl PinRole {
    /// Dotted tag used in serialized pinmaps (`i2c.sda`, `gpio.out`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            PinRole::I2cSda => "i2c.sda",
            PinRole::I2cScl => "i2c.scl",
            PinRole::UartTx => "uart.tx",
            PinRole::UartRx => "uart.rx",
            PinRole::SpiMosi => "spi.mosi",
            PinRole::SpiMiso => "spi.miso",
            PinRole::SpiSck => "spi.sck",
            PinRole::SpiCs => "spi.cs",
            PinRole::UsbDp => "usb.dp",
            PinRole::UsbDn => "usb.dn",
            PinRole::CanH => "can.h",
            PinRole::CanL => "can.l",
            PinRole::Adc => "adc",
            PinRole::Dac => "dac",
            PinRole::Pwm => "pwm",
            PinRole::GpioIn => "gpio.in",
            PinRole::GpioOut => "gpio.out",
            PinRole::Led => "led",
            PinRole::Button => "button",
            PinRole::Reset => "reset",
            PinRole::Clock => "clock",
            PinRole::Power => "power",
            PinRole::Ground => "ground",
            PinRole::Unknown => "unknown",
        }
    }

    /// Capability a pin must offer to carry this role, if any.
    ///
    /// CAN roles name the transceiver side of the bus, which no MCU pin
    /// drives directly, so they carry no requirement.
    pub fn required_capability(&self) -> Option<PinCapability> {
        match self {
            PinRole::I2cSda => Some(PinCapability::I2cSda),
            PinRole::I2cScl => Some(PinCapability::I2cScl),
            PinRole::UartTx => Some(PinCapability::UartTx),
            PinRole::UartRx => Some(PinCapability::UartRx),
            PinRole::SpiMosi => Some(PinCapability::SpiMosi),
            PinRole::SpiMiso => Some(PinCapability::SpiMiso),
            PinRole::SpiSck => Some(PinCapability::SpiSck),
            PinRole::SpiCs => Some(PinCapability::SpiCs),
            PinRole::UsbDp => Some(PinCapability::UsbDp),
            PinRole::UsbDn => Some(PinCapability::UsbDm),
            PinRole::Adc => Some(PinCapability::Adc),
            PinRole::Dac => Some(PinCapability::Dac),
            PinRole::Pwm => Some(PinCapability::Pwm),
            PinRole::GpioIn | PinRole::GpioOut | PinRole::Led | PinRole::Button => {
                Some(PinCapability::Gpio)
            }
            PinRole::CanH
            | PinRole::CanL
            | PinRole::Reset
            | PinRole::Clock
            | PinRole::Power
            | PinRole::Ground
            | PinRole::Unknown => None,
        }
    }

    /// Roles that actively drive the pin.
    pub fn drives_output(&self) -> bool {
        matches!(
            self,
            PinRole::GpioOut
                | PinRole::Pwm
                | PinRole::Led
                | PinRole::Dac
                | PinRole::SpiMosi
                | PinRole::SpiSck
                | PinRole::SpiCs
                | PinRole::UartTx
        )
    }

    pub fn is_usb(&self) -> bool {
        matches!(self, PinRole::UsbDp | PinRole::UsbDn)
    }

    pub fn is_uart(&self) -> bool {
        matches!(self, PinRole::UartTx | PinRole::UartRx)
    }

    /// Human-readable description of the role.
    pub fn description(&self) -> &'static str {
        match self {
            PinRole::I2cSda => "I2C Serial Data",
            PinRole::I2cScl => "I2C Serial Clock",
            PinRole::UartTx => "UART Transmit",
            PinRole::UartRx => "UART Receive",
            PinRole::SpiMosi => "SPI Master Out Slave In",
            PinRole::SpiMiso => "SPI Master In Slave Out",
            PinRole::SpiSck => "SPI Serial Clock",
            PinRole::SpiCs => "SPI Chip Select",
            PinRole::UsbDp => "USB Data Positive",
            PinRole::UsbDn => "USB Data Negative",
            PinRole::CanH => "CAN Bus High",
            PinRole::CanL => "CAN Bus Low",
            PinRole::Adc => "Analog to Digital Converter",
            PinRole::Dac => "Digital to Analog Converter",
            PinRole::Pwm => "Pulse Width Modulation",
            PinRole::GpioIn => "General Purpose Input",
            PinRole::GpioOut => "General Purpose Output",
            PinRole::Led => "Light Emitting Diode",
            PinRole::Button => "Push Button Input",
            PinRole::Reset => "Reset Signal",
            PinRole::Clock => "Clock Signal",
            PinRole::Power => "Power Rail",
            PinRole::Ground => "Ground Reference",
            PinRole::Unknown => "General Purpose I/O",
        }
    }
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Built-in role table. Order is priority.
const ROLE_PATTERNS: &[(PinRole, &str)] = &[
    // Rails
    (PinRole::Ground, r"(?i)^(a|d|p|s)?gnd|ground|^(a|d)?vss"),
    (
        PinRole::Power,
        r"(?i)^\+?(vcc|vdd|vbat|vin|vsys|avdd|dvdd|avcc|vref)|vbus|3v3|1v8|^\+?\d+v\d*$",
    ),
    // I2C
    (PinRole::I2cSda, r"(?i)i2c.*sda"),
    (PinRole::I2cSda, r"(?i)sda"),
    (PinRole::I2cScl, r"(?i)i2c.*scl"),
    (PinRole::I2cScl, r"(?i)scl"),
    // UART
    (PinRole::UartTx, r"(?i)uart.*tx"),
    (PinRole::UartTx, r"(?i)tx"),
    (PinRole::UartTx, r"(?i)serial.*tx"),
    (PinRole::UartRx, r"(?i)uart.*rx"),
    (PinRole::UartRx, r"(?i)rx"),
    (PinRole::UartRx, r"(?i)serial.*rx"),
    // SPI
    (PinRole::SpiMosi, r"(?i)spi.*mosi"),
    (PinRole::SpiMosi, r"(?i)mosi"),
    (PinRole::SpiMosi, r"(?i)spi.*tx"),
    (PinRole::SpiMiso, r"(?i)spi.*miso"),
    (PinRole::SpiMiso, r"(?i)miso"),
    (PinRole::SpiMiso, r"(?i)spi.*rx"),
    (PinRole::SpiSck, r"(?i)spi.*sck"),
    (PinRole::SpiSck, r"(?i)sck"),
    (PinRole::SpiSck, r"(?i)spi.*clk"),
    (PinRole::SpiCs, r"(?i)spi.*cs"),
    (PinRole::SpiCs, r"(?i)cs"),
    (PinRole::SpiCs, r"(?i)spi.*ss"),
    (PinRole::SpiCs, r"(?i)ss"),
    // USB
    (PinRole::UsbDp, r"(?i)usb.*d\+"),
    (PinRole::UsbDp, r"(?i)usb.*dp"),
    (PinRole::UsbDp, r"(?i)usb.*plus"),
    (PinRole::UsbDn, r"(?i)usb.*d-"),
    (PinRole::UsbDn, r"(?i)usb.*dn"),
    (PinRole::UsbDn, r"(?i)usb.*dm"),
    (PinRole::UsbDn, r"(?i)usb.*minus"),
    // CAN
    (PinRole::CanH, r"(?i)can.*h"),
    (PinRole::CanH, r"(?i)canh"),
    (PinRole::CanL, r"(?i)can.*l"),
    (PinRole::CanL, r"(?i)canl"),
    // Analog
    (PinRole::Adc, r"(?i)adc"),
    (PinRole::Adc, r"(?i)analog.*in"),
    (PinRole::Adc, r"(?i)ain"),
    (PinRole::Dac, r"(?i)dac"),
    (PinRole::Dac, r"(?i)analog.*out"),
    (PinRole::Dac, r"(?i)aout"),
    // PWM
    (PinRole::Pwm, r"(?i)pwm"),
    (PinRole::Pwm, r"(?i)pulse"),
    (PinRole::Pwm, r"(?i)servo"),
    (PinRole::Pwm, r"(?i)motor"),
    // Indicators and inputs
    (PinRole::Led, r"(?i)led"),
    (PinRole::Led, r"(?i)light"),
    (PinRole::Button, r"(?i)button"),
    (PinRole::Button, r"(?i)btn"),
    (PinRole::Button, r"(?i)switch"),
    (PinRole::Button, r"(?i)sw"),
    (PinRole::Reset, r"(?i)reset"),
    (PinRole::Reset, r"(?i)rst"),
    (PinRole::Clock, r"(?i)clock"),
    (PinRole::Clock, r"(?i)clk"),
    (PinRole::Clock, r"(?i)xtal"),
    (PinRole::Clock, r"(?i)osc"),
];

/// Peripheral name + optional instance number, per bus role family.
const BUS_PATTERNS: &[(&[PinRole], &str)] = &[
    (&[PinRole::I2cSda, PinRole::I2cScl], r"(?i)(i2c\d*)"),
    (&[PinRole::UartTx, PinRole::UartRx], r"(?i)(usart\d*|uart\d*)"),
    (
        &[PinRole::SpiMosi, PinRole::SpiMiso, PinRole::SpiSck, PinRole::SpiCs],
        r"(?i)(spi\d*)",
    ),
];

const INPUT_KEYWORDS: &[&str] = &["in", "input", "sense"];
const OUTPUT_KEYWORDS: &[&str] = &["out", "output", "drive"];

/// User-supplied role rule, evaluated ahead of the built-in table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRuleConfig {
    pub role: PinRole,
    pub pattern: String,
}

#[derive(Debug, Clone)]
struct RoleRule {
    role: PinRole,
    regex: Regex,
}

/// Result of classifying one net name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredRole {
    pub role: PinRole,
    pub bus_group: Option<String>,
    pub description: String,
}

/// Ordered, first-match-wins role classifier.
#[derive(Debug, Clone)]
pub struct RoleInferencer {
    rules: Vec<RoleRule>,
    bus_rules: Vec<(&'static [PinRole], Regex)>,
}

static BUILTIN: OnceLock<RoleInferencer> = OnceLock::new();

impl RoleInferencer {
    /// Shared inferencer compiled from the built-in tables.
    pub fn builtin() -> &'static RoleInferencer {
        BUILTIN.get_or_init(Self::compile_builtin)
    }

    fn compile_builtin() -> Self {
        // The tables are compile-time constants exercised by the unit tests.
        let rules = ROLE_PATTERNS
            .iter()
            .map(|(role, pattern)| RoleRule {
                role: *role,
                regex: Regex::new(pattern).expect("built-in role pattern is valid"),
            })
            .collect();
        let bus_rules = BUS_PATTERNS
            .iter()
            .map(|(roles, pattern)| {
                (
                    *roles,
                    Regex::new(pattern).expect("built-in bus pattern is valid"),
                )
            })
            .collect();
        Self { rules, bus_rules }
    }

    /// Built-in table with `overrides` evaluated first, in the given order.
    pub fn with_overrides(overrides: &[RoleRuleConfig]) -> Result<Self, PinmapError> {
        let mut inferencer = Self::builtin().clone();
        let mut custom = Vec::with_capacity(overrides.len());
        for rule in overrides {
            let regex = Regex::new(&rule.pattern).map_err(|source| PinmapError::InvalidPattern {
                pattern: rule.pattern.clone(),
                source,
            })?;
            custom.push(RoleRule {
                role: rule.role,
                regex,
            });
        }
        custom.append(&mut inferencer.rules);
        inferencer.rules = custom;
        Ok(inferencer)
    }

    /// Infer the role of a net from its name.
    pub fn infer_role(&self, net_name: &str) -> PinRole {
        if let Some(rule) = self.rules.iter().find(|r| r.regex.is_match(net_name)) {
            return rule.role;
        }

        let lower = net_name.to_lowercase();
        if INPUT_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return PinRole::GpioIn;
        }
        if OUTPUT_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return PinRole::GpioOut;
        }

        PinRole::Unknown
    }

    /// Extract the bus/peripheral group (`I2C0`, `UART1`, `SPI2`) for bus roles.
    pub fn extract_bus_group(&self, net_name: &str, role: PinRole) -> Option<String> {
        self.bus_rules
            .iter()
            .find(|(roles, _)| roles.contains(&role))
            .and_then(|(_, regex)| regex.captures(net_name))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_uppercase())
    }

    /// Classify a net: role, bus group and description together.
    pub fn infer(&self, net_name: &str) -> InferredRole {
        let role = self.infer_role(net_name);
        let bus_group = self.extract_bus_group(net_name, role);
        let description = describe(role, bus_group.as_deref());
        InferredRole {
            role,
            bus_group,
            description,
        }
    }
}

impl Default for RoleInferencer {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn describe(role: PinRole, bus_group: Option<&str>) -> String {
    match bus_group {
        Some(group) => format!("{} ({})", role.description(), group),
        None => role.description().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(name: &str) -> PinRole {
        RoleInferencer::builtin().infer_role(name)
    }

    #[test]
    fn test_i2c_roles() {
        assert_eq!(infer("I2C0_SDA"), PinRole::I2cSda);
        assert_eq!(infer("I2C_SDA"), PinRole::I2cSda);
        assert_eq!(infer("SDA"), PinRole::I2cSda);
        assert_eq!(infer("I2C0_SCL"), PinRole::I2cScl);
        assert_eq!(infer("SCL"), PinRole::I2cScl);
    }

    #[test]
    fn test_spi_roles() {
        assert_eq!(infer("SPI_MOSI"), PinRole::SpiMosi);
        assert_eq!(infer("MOSI"), PinRole::SpiMosi);
        assert_eq!(infer("SPI_MISO"), PinRole::SpiMiso);
        assert_eq!(infer("MISO"), PinRole::SpiMiso);
        assert_eq!(infer("SPI_SCK"), PinRole::SpiSck);
        assert_eq!(infer("SCK"), PinRole::SpiSck);
        assert_eq!(infer("SPI_CS"), PinRole::SpiCs);
        assert_eq!(infer("CS"), PinRole::SpiCs);
    }

    #[test]
    fn test_uart_roles() {
        assert_eq!(infer("UART_TX"), PinRole::UartTx);
        assert_eq!(infer("TX"), PinRole::UartTx);
        assert_eq!(infer("UART_RX"), PinRole::UartRx);
        assert_eq!(infer("RX"), PinRole::UartRx);
    }

    #[test]
    fn test_usb_and_can_roles() {
        assert_eq!(infer("USB_DP"), PinRole::UsbDp);
        assert_eq!(infer("USB_DN"), PinRole::UsbDn);
        assert_eq!(infer("USB_DM"), PinRole::UsbDn);
        assert_eq!(infer("CAN_H"), PinRole::CanH);
        assert_eq!(infer("CANH"), PinRole::CanH);
        assert_eq!(infer("CAN_L"), PinRole::CanL);
        assert_eq!(infer("CANL"), PinRole::CanL);
    }

    #[test]
    fn test_table_order_breaks_ties() {
        // PWM rules sit above LED rules
        assert_eq!(infer("LED_PWM"), PinRole::Pwm);
        assert_eq!(infer("MOTOR_PWM"), PinRole::Pwm);
        assert_eq!(infer("PWM_OUT"), PinRole::Pwm);
    }

    #[test]
    fn test_analog_roles() {
        assert_eq!(infer("ADC_IN"), PinRole::Adc);
        assert_eq!(infer("ANALOG_IN"), PinRole::Adc);
        assert_eq!(infer("AIN0"), PinRole::Adc);
        assert_eq!(infer("DAC_OUT"), PinRole::Dac);
    }

    #[test]
    fn test_rail_roles() {
        assert_eq!(infer("GND"), PinRole::Ground);
        assert_eq!(infer("AGND"), PinRole::Ground);
        assert_eq!(infer("VCC"), PinRole::Power);
        assert_eq!(infer("3V3"), PinRole::Power);
        assert_eq!(infer("+5V"), PinRole::Power);
    }

    #[test]
    fn test_keyword_fallbacks() {
        assert_eq!(infer("LED"), PinRole::Led);
        assert_eq!(infer("BUTTON"), PinRole::Button);
        assert_eq!(infer("GPIO_OUT"), PinRole::GpioOut);
        // "UNKNOWN_PIN" contains "in"
        assert_eq!(infer("UNKNOWN_PIN"), PinRole::GpioIn);
        assert_eq!(infer("MYSTERY_NET"), PinRole::Unknown);
        assert_eq!(infer(""), PinRole::Unknown);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(infer("i2c_sda"), PinRole::I2cSda);
        assert_eq!(infer("Spi_Mosi"), PinRole::SpiMosi);
        assert_eq!(infer("pwm_out"), PinRole::Pwm);
    }

    #[test]
    fn test_bus_group_extraction() {
        let inferencer = RoleInferencer::builtin();
        assert_eq!(
            inferencer.extract_bus_group("I2C1_SDA", PinRole::I2cSda).as_deref(),
            Some("I2C1")
        );
        assert_eq!(
            inferencer.extract_bus_group("usart2_tx", PinRole::UartTx).as_deref(),
            Some("USART2")
        );
        assert_eq!(
            inferencer.extract_bus_group("SPI_MOSI", PinRole::SpiMosi).as_deref(),
            Some("SPI")
        );
        assert_eq!(inferencer.extract_bus_group("SDA", PinRole::I2cSda), None);
        assert_eq!(inferencer.extract_bus_group("I2C0_LED", PinRole::Led), None);
    }

    #[test]
    fn test_description_includes_bus_group() {
        let inferred = RoleInferencer::builtin().infer("I2C0_SCL");
        assert_eq!(inferred.role, PinRole::I2cScl);
        assert_eq!(inferred.description, "I2C Serial Clock (I2C0)");

        let inferred = RoleInferencer::builtin().infer("MYSTERY_NET");
        assert_eq!(inferred.description, "General Purpose I/O");
    }

    #[test]
    fn test_overrides_take_priority() {
        let inferencer = RoleInferencer::with_overrides(&[RoleRuleConfig {
            role: PinRole::Clock,
            pattern: r"(?i)^tx_clk$".to_string(),
        }])
        .unwrap();
        assert_eq!(inferencer.infer_role("TX_CLK"), PinRole::Clock);
        assert_eq!(inferencer.infer_role("UART_TX"), PinRole::UartTx);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let err = RoleInferencer::with_overrides(&[RoleRuleConfig {
            role: PinRole::Led,
            pattern: "(unclosed".to_string(),
        }])
        .unwrap_err();
        assert!(matches!(err, PinmapError::InvalidPattern { .. }));
    }

    #[test]
    fn test_role_tags_serialize() {
        assert_eq!(serde_json::to_string(&PinRole::GpioOut).unwrap(), "\"gpio.out\"");
        let role: PinRole = serde_json::from_str("\"usb.dn\"").unwrap();
        assert_eq!(role, PinRole::UsbDn);
        assert_eq!(PinRole::I2cSda.to_string(), "i2c.sda");
    }
}
