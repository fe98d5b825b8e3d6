//! Pin capability model shared by every MCU family.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Functional capability a physical pin may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinCapability {
    Gpio,
    Adc,
    Dac,
    Pwm,
    I2cSda,
    I2cScl,
    SpiMosi,
    SpiMiso,
    SpiSck,
    SpiCs,
    UartTx,
    UartRx,
    CanH,
    CanL,
    UsbDp,
    UsbDm,
    I2sData,
    I2sBclk,
    I2sLrclk,
}

/// Ordered capability set; ordering keeps serialized output stable.
pub type CapabilitySet = BTreeSet<PinCapability>;

impl PinCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinCapability::Gpio => "gpio",
            PinCapability::Adc => "adc",
            PinCapability::Dac => "dac",
            PinCapability::Pwm => "pwm",
            PinCapability::I2cSda => "i2c_sda",
            PinCapability::I2cScl => "i2c_scl",
            PinCapability::SpiMosi => "spi_mosi",
            PinCapability::SpiMiso => "spi_miso",
            PinCapability::SpiSck => "spi_sck",
            PinCapability::SpiCs => "spi_cs",
            PinCapability::UartTx => "uart_tx",
            PinCapability::UartRx => "uart_rx",
            PinCapability::CanH => "can_h",
            PinCapability::CanL => "can_l",
            PinCapability::UsbDp => "usb_dp",
            PinCapability::UsbDm => "usb_dm",
            PinCapability::I2sData => "i2s_data",
            PinCapability::I2sBclk => "i2s_bclk",
            PinCapability::I2sLrclk => "i2s_lrclk",
        }
    }

    /// Capabilities every digital peripheral routed through a pin mux needs.
    pub fn digital_peripherals() -> CapabilitySet {
        [
            PinCapability::Gpio,
            PinCapability::Pwm,
            PinCapability::I2cSda,
            PinCapability::I2cScl,
            PinCapability::SpiMosi,
            PinCapability::SpiMiso,
            PinCapability::SpiSck,
            PinCapability::SpiCs,
            PinCapability::UartTx,
            PinCapability::UartRx,
        ]
        .into_iter()
        .collect()
    }
}

impl fmt::Display for PinCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_serializes_snake_case() {
        let json = serde_json::to_string(&PinCapability::I2cSda).unwrap();
        assert_eq!(json, "\"i2c_sda\"");
        assert_eq!(PinCapability::I2cSda.to_string(), "i2c_sda");
    }

    #[test]
    fn test_digital_peripherals_excludes_analog() {
        let caps = PinCapability::digital_peripherals();
        assert!(caps.contains(&PinCapability::Gpio));
        assert!(caps.contains(&PinCapability::UartRx));
        assert!(!caps.contains(&PinCapability::Adc));
        assert!(!caps.contains(&PinCapability::UsbDp));
    }
}
