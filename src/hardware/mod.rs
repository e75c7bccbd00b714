//! Hardware abstraction for multi-channel digitizers.
//!
//! The synchronization engine never talks to a concrete driver. It programs
//! against two seams:
//!
//! - [`Digitizer`]: an open device handle exposing identity attributes and
//!   paired typed write/read operations for each programmable setting. Every
//!   operation returns `Result<_, DeviceError>`; a failure is a value, not a
//!   panic, so the caller can decide how much of the run survives it.
//! - [`Connector`]: the link layer that turns verified connection parameters
//!   into an open handle.
//!
//! [`mock`] provides a simulated implementation of both, used by the default
//! binary wiring and by the test suite; a CAEN-library-backed connector plugs
//! in through the same traits.

pub mod mock;

use std::fmt;
use std::str::FromStr;

use crate::error::DeviceError;
use crate::settings::connection::ConnectionSettings;

/// Physical link used to reach a digitizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    /// Direct USB link.
    Usb,
    /// Optical link (CONET).
    Optical,
}

impl FromStr for LinkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usb" | "0" => Ok(LinkType::Usb),
            "optical" | "opticallink" | "1" => Ok(LinkType::Optical),
            other => Err(format!("unknown link type '{other}'")),
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkType::Usb => write!(f, "USB"),
            LinkType::Optical => write!(f, "Optical"),
        }
    }
}

/// Identity and capability attributes of an open digitizer.
///
/// Read once at connection time; immutable for the lifetime of the handle.
#[derive(Debug, Clone)]
pub struct DigitizerInfo {
    /// Model name, e.g. "V1730".
    pub model: String,
    /// Numeric model identifier.
    pub model_no: u32,
    /// Serial number.
    pub serial: u32,
    /// Number of physical input channels.
    pub channels: u32,
    /// Number of channel groups; 1 means the channels are not grouped.
    pub groups: u32,
    /// ADC resolution in bits.
    pub adc_bits: u32,
    /// Firmware license string.
    pub license: String,
    /// Form factor code.
    pub form_factor: u32,
    /// Board family code.
    pub family_code: u32,
    /// ROC firmware release.
    pub roc_firmware: String,
    /// AMC firmware release.
    pub amc_firmware: String,
    /// PCB revision number.
    pub pcb_revision: u32,
}

/// An open digitizer handle.
///
/// Each programmable setting appears as a write/read operation pair of
/// matching scalar type. Getters take `&mut self`: a read is a bus
/// transaction against stateful hardware, not a field access.
pub trait Digitizer {
    /// Identity and capability attributes of this device.
    fn info(&self) -> &DigitizerInfo;

    /// Enable or disable software-trigger mode.
    fn set_sw_trigger_mode(&mut self, enabled: bool) -> Result<(), DeviceError>;
    /// Read back the software-trigger mode.
    fn sw_trigger_mode(&mut self) -> Result<bool, DeviceError>;

    /// Write the per-channel enable mask (ungrouped models).
    fn set_channel_enable_mask(&mut self, mask: u32) -> Result<(), DeviceError>;
    /// Read back the per-channel enable mask.
    fn channel_enable_mask(&mut self) -> Result<u32, DeviceError>;

    /// Write the per-group enable mask (grouped models).
    fn set_group_enable_mask(&mut self, mask: u32) -> Result<(), DeviceError>;
    /// Read back the per-group enable mask.
    fn group_enable_mask(&mut self) -> Result<u32, DeviceError>;
}

/// The link layer that opens digitizer handles.
pub trait Connector {
    /// Open a handle using verified connection parameters.
    fn open(&self, settings: &ConnectionSettings) -> Result<Box<dyn Digitizer>, DeviceError>;
}
