//! cadidaq: configure and verify CAEN-style digitizers from an INI file.
//!
//! The tool reads a human-edited configuration with one section per
//! digitizer, opens each device, programs every specified register setting,
//! reads the authoritative state of *all* settings back from the hardware,
//! and writes the verified configuration to `output.ini`. The output mirrors
//! the input format but reflects what the hardware actually holds (clamped,
//! rounded or defaulted values included) rather than what was requested.
//!
//! # Module map
//!
//! - [`mask`]: per-channel enable vectors to and from packed masks, under grouping.
//! - [`program`]: the bidirectional synchronization engine: per-setting
//!   parameter channels with isolated error handling, and the fixed-order
//!   per-device programming sequence.
//! - [`run`]: the device loop and the merge into the output document.
//! - [`settings`]: typed connection and register records per section.
//! - [`hardware`]: the `Digitizer`/`Connector` seams and mock devices.
//! - [`error`], [`logging`]: the usual ambient concerns.

pub mod error;
pub mod hardware;
pub mod logging;
pub mod mask;
pub mod program;
pub mod run;
pub mod settings;

pub use error::{CadiError, CadiResult, DeviceError, DeviceErrorKind};
pub use program::Direction;
