//! RP2040 profile.
//!
//! Flat `GP0..GP29` bank. Every GPIO can reach every digital peripheral
//! through function select; GP26-GP29 add the ADC inputs, GP24/GP25 double as
//! the USB pair and GP23 controls the SMPS mode on reference boards.

use super::{parse_pin_number, CatalogEntry, McuFamily, PeripheralInstance, PinCatalog};
use crate::capability::PinCapability;
use crate::roles::PinRole;

const ADC_PINS: &[(u32, &str)] = &[(26, "ADC0"), (27, "ADC1"), (28, "ADC2"), (29, "ADC3")];

#[derive(Debug, Clone, Copy, Default)]
pub struct Rp2040;

impl Rp2040 {
    fn numeric_aliases(entry: CatalogEntry, num: u32) -> CatalogEntry {
        entry
            .alias(format!("GPIO{}", num))
            .alias(format!("IO{}", num))
            .alias(num.to_string())
    }
}

impl McuFamily for Rp2040 {
    fn id(&self) -> &'static str {
        "rp2040"
    }

    fn display_name(&self) -> &'static str {
        "RP2040"
    }

    fn build_catalog(&self) -> PinCatalog {
        let mut catalog = PinCatalog::new();

        for num in 0..23u32 {
            let entry =
                CatalogEntry::new(format!("GP{}", num), PinCapability::digital_peripherals());
            catalog.insert(Self::numeric_aliases(entry, num));
        }

        let gp23 = CatalogEntry::new("GP23", [PinCapability::Gpio].into_iter().collect())
            .special_function(Some("SMPS Power Mode"))
            .warnings(vec!["GP23 controls SMPS power mode - use with caution".to_string()]);
        catalog.insert(Self::numeric_aliases(gp23, 23));

        let gp24 = CatalogEntry::new(
            "GP24",
            [PinCapability::Gpio, PinCapability::UsbDm].into_iter().collect(),
        )
        .special_function(Some("USB D- (Data Minus)"))
        .warnings(vec![
            "GP24 is USB D- pin - avoid for general GPIO if USB needed".to_string(),
        ])
        .alias("USB_DM")
        .alias("USB_DN")
        .alias("USBDM")
        .alias("USBDN");
        catalog.insert(Self::numeric_aliases(gp24, 24));

        let gp25 = CatalogEntry::new(
            "GP25",
            [PinCapability::Gpio, PinCapability::UsbDp].into_iter().collect(),
        )
        .special_function(Some("USB D+ (Data Plus)"))
        .warnings(vec![
            "GP25 is USB D+ pin - avoid for general GPIO if USB needed".to_string(),
        ])
        .alias("USB_DP")
        .alias("USBDP");
        catalog.insert(Self::numeric_aliases(gp25, 25));

        for (num, adc) in ADC_PINS {
            let mut capabilities = PinCapability::digital_peripherals();
            capabilities.insert(PinCapability::Adc);
            let entry = CatalogEntry::new(format!("GP{}", num), capabilities)
                .special_function(Some(format!("ADC Channel {}", num - 26).as_str()))
                .alias(*adc);
            catalog.insert(Self::numeric_aliases(entry, *num));
        }

        catalog
    }

    fn build_peripherals(&self) -> Vec<PeripheralInstance> {
        vec![
            PeripheralInstance::new("I2C", 0)
                .hint("sda", &["GP0", "GP4", "GP8", "GP12", "GP16", "GP20", "GP28"])
                .hint("scl", &["GP1", "GP5", "GP9", "GP13", "GP17", "GP21", "GP29"]),
            PeripheralInstance::new("I2C", 1)
                .hint("sda", &["GP2", "GP6", "GP10", "GP14", "GP18", "GP26"])
                .hint("scl", &["GP3", "GP7", "GP11", "GP15", "GP19", "GP27"]),
            PeripheralInstance::new("SPI", 0)
                .hint("miso", &["GP0", "GP4", "GP16", "GP20"])
                .hint("cs", &["GP1", "GP5", "GP17", "GP21"])
                .hint("sck", &["GP2", "GP6", "GP18", "GP22"])
                .hint("mosi", &["GP3", "GP7", "GP19"]),
            PeripheralInstance::new("SPI", 1)
                .hint("miso", &["GP8", "GP12", "GP28"])
                .hint("cs", &["GP9", "GP13", "GP29"])
                .hint("sck", &["GP10", "GP14", "GP26"])
                .hint("mosi", &["GP11", "GP15", "GP27"]),
            PeripheralInstance::new("UART", 0)
                .hint("tx", &["GP0", "GP12", "GP16", "GP28"])
                .hint("rx", &["GP1", "GP13", "GP17", "GP29"]),
            PeripheralInstance::new("UART", 1)
                .hint("tx", &["GP4", "GP8", "GP20"])
                .hint("rx", &["GP5", "GP9", "GP21"]),
            PeripheralInstance::new("USB", 0)
                .hint("dp", &["GP25"])
                .hint("dm", &["GP24"]),
            PeripheralInstance::new("ADC", 0)
                .hint("ch0", &["GP26"])
                .hint("ch1", &["GP27"])
                .hint("ch2", &["GP28"])
                .hint("ch3", &["GP29"]),
        ]
    }

    fn shorthand_candidate(&self, name: &str) -> Option<String> {
        let digits = ["GPIO", "GP", "IO"]
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix))
            .unwrap_or(name);
        // Out-of-range numbers still produce a candidate; the profile reports
        // them as outside the bank.
        parse_pin_number(digits).map(|num| format!("GP{}", num))
    }

    fn role_warnings(&self, entry: &CatalogEntry, role: PinRole) -> Vec<String> {
        let id = entry.canonical_id.as_str();
        let mut warnings = Vec::new();

        if id == "GP23" && !matches!(role, PinRole::GpioIn | PinRole::GpioOut) {
            warnings.push("GP23 has limited peripheral support due to SMPS function".to_string());
        }

        if (id == "GP24" || id == "GP25") && !role.is_usb() {
            warnings.push(format!(
                "Pin {} is a USB pin - consider reserving for USB functionality",
                id
            ));
        }

        if entry.has(PinCapability::Adc) && matches!(role, PinRole::Pwm | PinRole::GpioOut) {
            warnings.push(format!(
                "Pin {} is an ADC pin - consider using for analog input",
                id
            ));
        }

        warnings
    }
}
