//! Programmable register settings for one digitizer.

use ini::{Ini, Properties};
use tracing::warn;

use crate::error::{CadiError, CadiResult};
use crate::mask::{mask_to_vec, vec_to_mask};

use super::{parse_flag, parse_unsigned, take};

/// The register-level settings of one digitizer section.
///
/// Every field is optional: an unset value means the file expressed no
/// preference and the device keeps whatever it currently holds. The record is
/// refined in place by the programming passes: the write pass pushes the set
/// values to hardware, the read pass overwrites everything with the values
/// the hardware actually reports.
#[derive(Debug, Clone)]
pub struct RegisterSettings {
    name: String,
    /// Software-trigger mode flag.
    pub sw_trigger_mode: Option<bool>,
    /// Per-channel enablement, one entry per physical channel.
    pub ch_enable: Vec<Option<bool>>,
}

impl RegisterSettings {
    /// Empty record sized to the device's channel count.
    pub fn new(name: &str, channels: usize) -> Self {
        Self {
            name: name.to_string(),
            sw_trigger_mode: None,
            ch_enable: vec![None; channels],
        }
    }

    /// Section name this record belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Consume the register keys from a section.
    ///
    /// `chEnable` is accepted in two forms: a mask literal (`0xA`, `0b1010`,
    /// decimal) or a comma-separated per-channel list (`0,1,0,1`). Both are
    /// normalized into the channel-enable vector.
    pub fn parse(&mut self, props: &mut Properties) -> CadiResult<()> {
        if let Some(raw) = take(props, "swTriggerMode") {
            self.sw_trigger_mode =
                Some(parse_flag(&raw).map_err(|e| self.bad_value("swTriggerMode", e))?);
        }
        if let Some(raw) = take(props, "chEnable") {
            if raw.contains(',') {
                self.parse_channel_list(&raw)?;
            } else {
                let mask =
                    parse_unsigned(&raw).map_err(|e| self.bad_value("chEnable", e))?;
                let channels = self.ch_enable.len();
                if channels < u32::BITS as usize && mask >> channels != 0 {
                    warn!(
                        section = %self.name,
                        mask,
                        channels,
                        "chEnable mask enables more channels than the device has; \
                         extra bits ignored"
                    );
                }
                mask_to_vec(mask, &mut self.ch_enable, 1);
            }
        }
        Ok(())
    }

    fn parse_channel_list(&mut self, raw: &str) -> CadiResult<()> {
        let entries: Vec<&str> = raw.split(',').collect();
        if entries.len() > self.ch_enable.len() {
            warn!(
                section = %self.name,
                listed = entries.len(),
                channels = self.ch_enable.len(),
                "chEnable lists more channels than the device has; extra entries ignored"
            );
        }
        for (i, entry) in entries.iter().take(self.ch_enable.len()).enumerate() {
            let enabled = parse_flag(entry).map_err(|e| self.bad_value("chEnable", e))?;
            self.ch_enable[i] = Some(enabled);
        }
        Ok(())
    }

    /// Semantic checks after parsing. Nothing further to enforce today: all
    /// register settings are optional and already range-checked by parsing.
    pub fn verify(&self) -> CadiResult<()> {
        Ok(())
    }

    /// Write the verified register values into this record's section of the
    /// output document.
    ///
    /// `chEnable` is emitted as a hex mask literal, one of the accepted input
    /// forms, so the output file is itself a valid input file.
    pub fn fill(&self, doc: &mut Ini) {
        if let Some(mode) = self.sw_trigger_mode {
            doc.set_to(Some(&self.name), "swTriggerMode".into(), mode.to_string());
        }
        if self.ch_enable.iter().any(Option::is_some) {
            let mask = vec_to_mask(&self.ch_enable, 1);
            doc.set_to(Some(&self.name), "chEnable".into(), format!("0x{mask:X}"));
        }
    }

    fn bad_value(&self, key: &str, detail: String) -> CadiError {
        CadiError::Config(format!("section '{}', key '{key}': {detail}", self.name))
    }
}
