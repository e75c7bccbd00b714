//! The bidirectional settings-synchronization engine.
//!
//! Programming a digitizer is a two-pass affair: a WRITE pass pushes every
//! value the configuration actually specifies, then a READ pass pulls the
//! authoritative post-write state of *every* setting back into the record,
//! including settings the file never mentioned. That second pass is what
//! turns a partially-specified, intent-only configuration into a fully
//! specified, hardware-verified one: anything the hardware clamped, rounded
//! or ignored becomes visible and ends up in the output file.
//!
//! Failures of individual register accesses are isolated here. One
//! misbehaving register must not prevent configuring and verifying the rest
//! of a working device, so each operation's error is logged with full device
//! identity and swallowed at this boundary. Only failing to open the device
//! in the first place is fatal, and that is decided a layer up in [`run`].
//!
//! [`run`]: crate::run

use std::fmt::Display;

use tracing::{error, warn};

use crate::hardware::Digitizer;
use crate::mask::{mask_to_vec, vec_to_mask};
use crate::settings::register::RegisterSettings;

/// Which way a programming pass moves data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Push configured values to the device.
    Write,
    /// Pull the device's authoritative values back into the record.
    Read,
}

/// A setter bound to one logical setting of the device.
pub type WriteOp<T> = fn(&mut dyn Digitizer, T) -> Result<(), crate::error::DeviceError>;
/// The matching getter for the same logical setting.
pub type ReadOp<T> = fn(&mut dyn Digitizer) -> Result<T, crate::error::DeviceError>;

/// Program one scalar setting through a bound operation pair.
///
/// On `Write` the setter is invoked with `*value`; on `Read` the getter's
/// result overwrites `*value`. A device error is logged with the device's
/// identity, the failing operation and (for writes) the attempted value, and
/// the surrounding run continues. Returns whether the operation succeeded;
/// on failure `*value` is left as the caller provided it.
pub fn program_value<T: Copy + Display>(
    device: &mut dyn Digitizer,
    write: WriteOp<T>,
    read: ReadOp<T>,
    value: &mut T,
    direction: Direction,
) -> bool {
    let outcome = match direction {
        Direction::Write => write(device, *value),
        Direction::Read => read(device).map(|v| *value = v),
    };
    match outcome {
        Ok(()) => true,
        Err(err) => {
            let info = device.info();
            match direction {
                Direction::Write => error!(
                    model = %info.model,
                    serial = info.serial,
                    op = err.op,
                    value = %value,
                    "writing to digitizer failed: {}", err.kind
                ),
                Direction::Read => error!(
                    model = %info.model,
                    serial = info.serial,
                    op = err.op,
                    "reading from digitizer failed: {}", err.kind
                ),
            }
            false
        }
    }
}

/// Program an optional setting.
///
/// An unset value on `Write` expresses no preference: the device is not
/// touched at all. An unset value on `Read` is promoted: the device value
/// is read into a scratch scalar and the option becomes set to it. A set
/// value delegates to [`program_value`] with the inner value; on `Write` the
/// option keeps holding the caller's request (only a later `Read` overwrites
/// it), and on a failed operation it is left in its prior state.
pub fn program_optional<T: Copy + Default + Display>(
    device: &mut dyn Digitizer,
    write: WriteOp<T>,
    read: ReadOp<T>,
    value: &mut Option<T>,
    direction: Direction,
) {
    match value {
        Some(inner) => {
            program_value(device, write, read, inner, direction);
        }
        None if direction == Direction::Read => {
            let mut scratch = T::default();
            if program_value(device, write, read, &mut scratch, Direction::Read) {
                *value = Some(scratch);
            }
        }
        None => {}
    }
}

/// Program a mask-valued setting backed by a channel-enable vector.
///
/// On `Write` the vector is packed at the device's group granularity, the
/// only mask the hardware can actually hold. If that mask differs from the
/// channel-exact packing, the requested per-channel pattern is not
/// representable under the device's grouping; this is logged as a warning
/// naming the setting and the group mask is used regardless. On `Read` the
/// retrieved mask is expanded back into the vector, setting every entry.
pub fn program_mask(
    device: &mut dyn Digitizer,
    write: WriteOp<u32>,
    read: ReadOp<u32>,
    vec: &mut [Option<bool>],
    name: &str,
    direction: Direction,
) {
    let groups = device.info().groups.max(1) as usize;
    let mut mask = 0;
    if direction == Direction::Write {
        mask = vec_to_mask(vec, groups);
        if mask != vec_to_mask(vec, 1) {
            let info = device.info();
            warn!(
                model = %info.model,
                serial = info.serial,
                setting = name,
                "channel selection cannot be mapped exactly onto the device's \
                 channel groups; programming the group mask 0x{mask:X} instead"
            );
        }
    }
    let ok = program_value(device, write, read, &mut mask, direction);
    if direction == Direction::Read && ok {
        mask_to_vec(mask, vec, groups);
    }
}

/// Apply every recognized register setting of one device, in a fixed order,
/// for a single direction.
///
/// The enable mask is bound to the channel-level operation pair on ungrouped
/// devices and to the group-level pair otherwise. The selection depends only
/// on the device topology, so the WRITE and READ passes of one run always
/// address the same register.
pub fn program_settings(
    device: &mut dyn Digitizer,
    settings: &mut RegisterSettings,
    direction: Direction,
) {
    program_optional(
        device,
        |d, v| d.set_sw_trigger_mode(v),
        |d| d.sw_trigger_mode(),
        &mut settings.sw_trigger_mode,
        direction,
    );

    if device.info().groups == 1 {
        program_mask(
            device,
            |d, m| d.set_channel_enable_mask(m),
            |d| d.channel_enable_mask(),
            &mut settings.ch_enable,
            "chEnable",
            direction,
        );
    } else {
        program_mask(
            device,
            |d, m| d.set_group_enable_mask(m),
            |d| d.group_enable_mask(),
            &mut settings.ch_enable,
            "chEnable",
            direction,
        );
    }
}
