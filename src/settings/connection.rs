//! Link and addressing parameters for one digitizer.

use std::fmt;

use ini::{Ini, Properties};

use crate::error::{CadiError, CadiResult};
use crate::hardware::LinkType;

use super::{parse_unsigned, take};

/// How to reach one digitizer: link type, link index, daisy-chain node and
/// VME base address.
///
/// All four parameters are required to open a handle. The record is immutable
/// after [`verify`](ConnectionSettings::verify) and is echoed unchanged into
/// the output document at the end of the run.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    name: String,
    /// Physical link type.
    pub link_type: Option<LinkType>,
    /// Link number on the host side.
    pub link_num: Option<u32>,
    /// Node index on an optical daisy chain.
    pub conet_node: Option<u32>,
    /// VME base address of the board.
    pub vme_base_address: Option<u32>,
}

impl ConnectionSettings {
    /// Empty record for the named device section.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            link_type: None,
            link_num: None,
            conet_node: None,
            vme_base_address: None,
        }
    }

    /// Section name this record belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Consume the connection keys from a section.
    pub fn parse(&mut self, props: &mut Properties) -> CadiResult<()> {
        if let Some(raw) = take(props, "linkType") {
            self.link_type = Some(raw.parse().map_err(|e| self.bad_value("linkType", e))?);
        }
        if let Some(raw) = take(props, "linkNum") {
            self.link_num = Some(parse_unsigned(&raw).map_err(|e| self.bad_value("linkNum", e))?);
        }
        if let Some(raw) = take(props, "conetNode") {
            self.conet_node =
                Some(parse_unsigned(&raw).map_err(|e| self.bad_value("conetNode", e))?);
        }
        if let Some(raw) = take(props, "vmeBaseAddress") {
            self.vme_base_address =
                Some(parse_unsigned(&raw).map_err(|e| self.bad_value("vmeBaseAddress", e))?);
        }
        Ok(())
    }

    /// Check that every parameter needed to open the device is present.
    pub fn verify(&self) -> CadiResult<()> {
        let missing = [
            ("linkType", self.link_type.is_none()),
            ("linkNum", self.link_num.is_none()),
            ("conetNode", self.conet_node.is_none()),
            ("vmeBaseAddress", self.vme_base_address.is_none()),
        ];
        for (key, absent) in missing {
            if absent {
                return Err(CadiError::Config(format!(
                    "section '{}': missing required connection setting '{key}'",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Write the connection parameters into the output document under this
    /// record's section.
    pub fn fill(&self, doc: &mut Ini) {
        if let Some(link_type) = self.link_type {
            doc.set_to(Some(&self.name), "linkType".into(), link_type.to_string());
        }
        if let Some(link_num) = self.link_num {
            doc.set_to(Some(&self.name), "linkNum".into(), link_num.to_string());
        }
        if let Some(conet_node) = self.conet_node {
            doc.set_to(Some(&self.name), "conetNode".into(), conet_node.to_string());
        }
        if let Some(addr) = self.vme_base_address {
            doc.set_to(
                Some(&self.name),
                "vmeBaseAddress".into(),
                format!("0x{addr:X}"),
            );
        }
    }

    fn bad_value(&self, key: &str, detail: String) -> CadiError {
        CadiError::Config(format!("section '{}', key '{key}': {detail}", self.name))
    }
}

impl fmt::Display for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt<T: fmt::Display>(value: &Option<T>) -> String {
            value.as_ref().map_or_else(|| "?".to_string(), T::to_string)
        }
        write!(
            f,
            "linkType={}, linkNum={}, conetNode={}, vmeBaseAddress={}",
            opt(&self.link_type),
            opt(&self.link_num),
            opt(&self.conet_node),
            self.vme_base_address
                .map_or_else(|| "?".to_string(), |a| format!("0x{a:X}")),
        )
    }
}
