//! Run orchestration: iterate the configured digitizers, program and verify
//! each one, and merge the verified state into the output document.
//!
//! Devices are processed strictly sequentially in document order. Each
//! section's device handle and settings records are exclusively owned for the
//! duration of that section; nothing is shared across devices (the underlying
//! transport may be a shared bus, so serializing device access is a safety
//! property here, not a missed optimization).
//!
//! Failure policy is deliberately asymmetric. A register access that fails on
//! an open device is isolated inside the programming layer and the run
//! continues. A device that cannot be *opened* aborts the whole run: with no
//! handle there is no channel count, no grouping, nothing downstream can be
//! reasoned about, and an operator needs to intervene anyway. The output
//! document is only built and serialized after the full device loop
//! completes, so an aborted run never leaves a partial output file behind.

use std::path::Path;

use ini::{Ini, Properties};
use tracing::{debug, error, info, warn};

use crate::error::{CadiError, CadiResult};
use crate::hardware::Connector;
use crate::program::{program_settings, Direction};
use crate::settings::connection::ConnectionSettings;
use crate::settings::register::RegisterSettings;

/// Fixed path the verified configuration is written to.
pub const OUTPUT_FILE: &str = "output.ini";

/// Section reserved for process-wide settings.
const SECTION_DAQ: &str = "daq";
/// Section reserved for settings common to all digitizers (not yet consumed).
const SECTION_GENERAL: &str = "general";

fn is_reserved(section: &str) -> bool {
    section.eq_ignore_ascii_case(SECTION_DAQ) || section.eq_ignore_ascii_case(SECTION_GENERAL)
}

/// Process every digitizer section of `doc` and return the merged output
/// document holding the hardware-verified configuration.
///
/// Propagates an error if a section is semantically invalid or a device
/// cannot be opened; in that case no output document exists at all.
pub fn run_document(doc: &Ini, connector: &dyn Connector) -> CadiResult<Ini> {
    let n_digitizers = doc
        .iter()
        .filter(|(name, _)| matches!(name, Some(n) if !is_reserved(n)))
        .count();
    info!("configuration for {n_digitizers} digitizer(s) found in config file");

    let mut connections: Vec<ConnectionSettings> = Vec::new();
    let mut registers: Vec<RegisterSettings> = Vec::new();

    for (name, props) in doc.iter() {
        let Some(name) = name else { continue };
        if is_reserved(name) {
            continue;
        }
        let (conn, regs) = program_device(name, props, connector)?;
        connections.push(conn);
        registers.push(regs);
    }

    // merge: connection parameters first, then the verified register values
    // into the same sections
    let mut out = Ini::new();
    for conn in &connections {
        conn.fill(&mut out);
    }
    for regs in &registers {
        regs.fill(&mut out);
    }
    // a fresh Ini starts with an implicit unnamed section; drop it so the
    // output holds exactly the device sections
    out.delete(None::<String>);
    Ok(out)
}

/// Configure and verify a single digitizer section.
fn program_device(
    name: &str,
    props: &Properties,
    connector: &dyn Connector,
) -> CadiResult<(ConnectionSettings, RegisterSettings)> {
    // consumed keys are removed from this working copy; leftovers are unknown
    let mut props = props.clone();

    let mut conn = ConnectionSettings::new(name);
    conn.parse(&mut props)?;
    conn.verify()?;

    info!(device = %name, "establishing connection to digitizer ({conn})");
    let mut device = match connector.open(&conn) {
        Ok(device) => device,
        Err(err) => {
            error!(device = %name, "failed to open digitizer: {err}");
            error!(
                "please check the physical connection and the connection settings; \
                 if using a USB link, make sure the USB driver kernel module is \
                 installed and loaded"
            );
            return Err(CadiError::Connection {
                device: name.to_string(),
                source: err,
            });
        }
    };

    let info = device.info().clone();
    debug!(
        device = %name,
        model = %info.model,
        model_no = info.model_no,
        serial = info.serial,
        channels = info.channels,
        groups = info.groups,
        adc_bits = info.adc_bits,
        license = %info.license,
        form_factor = info.form_factor,
        family_code = info.family_code,
        roc_firmware = %info.roc_firmware,
        amc_firmware = %info.amc_firmware,
        pcb_revision = info.pcb_revision,
        "connected to digitizer"
    );

    let mut regs = RegisterSettings::new(name, info.channels as usize);
    regs.parse(&mut props)?;
    regs.verify()?;

    program_settings(device.as_mut(), &mut regs, Direction::Write);

    // anything still left in the section was not consumed by parsing:
    // a typo, or a setting this version does not know
    for (key, value) in props.iter() {
        warn!(section = %name, "unknown setting ignored: {key} = {value}");
    }

    program_settings(device.as_mut(), &mut regs, Direction::Read);

    Ok((conn, regs))
}

/// Read `input`, program all configured digitizers and write the verified
/// configuration to `output`.
pub fn run_file(input: &Path, connector: &dyn Connector, output: &Path) -> CadiResult<()> {
    let doc = Ini::load_from_file(input)?;
    let merged = run_document(&doc, connector)?;
    merged.write_to_file(output)?;
    info!("verified configuration written to {}", output.display());
    Ok(())
}
