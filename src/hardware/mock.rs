//! Simulated digitizer hardware.
//!
//! [`MockDigitizer`] behaves like a well-mannered board: it keeps a small
//! register file, clamps enable masks to the physically present channels and
//! groups (the way real hardware silently ignores bits for channels it does
//! not have), records every operation invoked on it, and can be told to fail
//! specific operations to exercise the error-isolation paths.
//!
//! [`MockConnector`] hands out fresh mock devices for any section, so the
//! tool can run end to end without hardware attached.

use std::cell::Cell;
use std::collections::HashMap;

use crate::error::{DeviceError, DeviceErrorKind};
use crate::settings::connection::ConnectionSettings;

use super::{Connector, Digitizer, DigitizerInfo};

/// Simulated digitizer with a register file and per-operation call log.
#[derive(Debug)]
pub struct MockDigitizer {
    info: DigitizerInfo,
    sw_trigger_mode: bool,
    channel_mask: u32,
    group_mask: u32,
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, DeviceErrorKind>,
}

impl MockDigitizer {
    /// Create a mock board with the given channel and group counts.
    pub fn new(channels: u32, groups: u32) -> Self {
        Self {
            info: DigitizerInfo {
                model: "MOCK1730".to_string(),
                model_no: 1730,
                serial: 1,
                channels,
                groups,
                adc_bits: 14,
                license: "simulated".to_string(),
                form_factor: 0,
                family_code: 11,
                roc_firmware: "4.12".to_string(),
                amc_firmware: "1.03".to_string(),
                pcb_revision: 1,
            },
            sw_trigger_mode: false,
            channel_mask: 0,
            group_mask: 0,
            calls: Vec::new(),
            failures: HashMap::new(),
        }
    }

    /// Override the serial number reported by the device.
    pub fn with_serial(mut self, serial: u32) -> Self {
        self.info.serial = serial;
        self
    }

    /// Make the named operation fail with the given kind from now on.
    pub fn fail_on(&mut self, op: &'static str, kind: DeviceErrorKind) {
        self.failures.insert(op, kind);
    }

    /// Number of times the named operation was invoked (including failures).
    pub fn call_count(&self, op: &str) -> usize {
        self.calls.iter().filter(|&&c| c == op).count()
    }

    /// All operations invoked on this device, in order.
    pub fn calls(&self) -> &[&'static str] {
        &self.calls
    }

    fn touch(&mut self, op: &'static str) -> Result<(), DeviceError> {
        self.calls.push(op);
        match self.failures.get(op) {
            Some(&kind) => Err(DeviceError::new(op, kind)),
            None => Ok(()),
        }
    }

    fn clamp(mask: u32, bits: u32) -> u32 {
        if bits >= u32::BITS {
            mask
        } else {
            mask & ((1 << bits) - 1)
        }
    }
}

impl Digitizer for MockDigitizer {
    fn info(&self) -> &DigitizerInfo {
        &self.info
    }

    fn set_sw_trigger_mode(&mut self, enabled: bool) -> Result<(), DeviceError> {
        self.touch("set_sw_trigger_mode")?;
        self.sw_trigger_mode = enabled;
        Ok(())
    }

    fn sw_trigger_mode(&mut self) -> Result<bool, DeviceError> {
        self.touch("sw_trigger_mode")?;
        Ok(self.sw_trigger_mode)
    }

    fn set_channel_enable_mask(&mut self, mask: u32) -> Result<(), DeviceError> {
        self.touch("set_channel_enable_mask")?;
        self.channel_mask = Self::clamp(mask, self.info.channels);
        Ok(())
    }

    fn channel_enable_mask(&mut self) -> Result<u32, DeviceError> {
        self.touch("channel_enable_mask")?;
        Ok(self.channel_mask)
    }

    fn set_group_enable_mask(&mut self, mask: u32) -> Result<(), DeviceError> {
        self.touch("set_group_enable_mask")?;
        self.group_mask = Self::clamp(mask, self.info.groups);
        Ok(())
    }

    fn group_enable_mask(&mut self) -> Result<u32, DeviceError> {
        self.touch("group_enable_mask")?;
        Ok(self.group_mask)
    }
}

/// Connector handing out fresh [`MockDigitizer`]s.
#[derive(Debug)]
pub struct MockConnector {
    channels: u32,
    groups: u32,
    next_serial: Cell<u32>,
    fail_open: Cell<bool>,
}

impl MockConnector {
    /// Connector whose devices all have the given topology.
    pub fn new(channels: u32, groups: u32) -> Self {
        Self {
            channels,
            groups,
            next_serial: Cell::new(100),
            fail_open: Cell::new(false),
        }
    }

    /// Make the next (and every following) open attempt fail.
    pub fn fail_open(&self) {
        self.fail_open.set(true);
    }
}

impl Connector for MockConnector {
    fn open(&self, _settings: &ConnectionSettings) -> Result<Box<dyn Digitizer>, DeviceError> {
        if self.fail_open.get() {
            return Err(DeviceError::new("open", DeviceErrorKind::NotFound));
        }
        let serial = self.next_serial.get();
        self.next_serial.set(serial + 1);
        Ok(Box::new(
            MockDigitizer::new(self.channels, self.groups).with_serial(serial),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_enable_mask_to_physical_channels() {
        let mut dev = MockDigitizer::new(2, 1);
        dev.set_channel_enable_mask(0xF).unwrap();
        assert_eq!(dev.channel_enable_mask().unwrap(), 0x3);
    }

    #[test]
    fn injected_failure_surfaces_and_is_counted() {
        let mut dev = MockDigitizer::new(4, 1);
        dev.fail_on("set_sw_trigger_mode", DeviceErrorKind::Timeout);
        let err = dev.set_sw_trigger_mode(true).unwrap_err();
        assert_eq!(err.op, "set_sw_trigger_mode");
        assert_eq!(err.kind, DeviceErrorKind::Timeout);
        assert_eq!(dev.call_count("set_sw_trigger_mode"), 1);
    }

    #[test]
    fn connector_assigns_distinct_serials() {
        let connector = MockConnector::new(4, 1);
        let settings = ConnectionSettings::new("dev");
        let a = connector.open(&settings).unwrap();
        let b = connector.open(&settings).unwrap();
        assert_ne!(a.info().serial, b.info().serial);
    }

    #[test]
    fn connector_open_failure() {
        let connector = MockConnector::new(4, 1);
        connector.fail_open();
        let settings = ConnectionSettings::new("dev");
        assert!(connector.open(&settings).is_err());
    }
}
