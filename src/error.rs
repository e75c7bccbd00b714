//! Error types for the configuration tool.
//!
//! Two layers are kept deliberately distinct:
//!
//! - [`DeviceError`] is the structured outcome of a single device operation
//!   (one register write or read, or the attempt to open a handle). These are
//!   expected failures on flaky hardware links and are handled close to the
//!   call site; they never abort the run on their own.
//! - [`CadiError`] is the crate-level error: configuration-file problems and
//!   the one device failure that is fatal by policy, failing to open a
//!   digitizer handle in the first place.

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type CadiResult<T> = std::result::Result<T, CadiError>;

/// Top-level error for a configuration run.
#[derive(Error, Debug)]
pub enum CadiError {
    /// Reading or writing a configuration file failed at the I/O level.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input document is not well-formed INI.
    #[error("failed to parse configuration file: {0}")]
    Ini(#[from] ini::Error),

    /// A section holds a malformed or missing value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A digitizer handle could not be opened. Fatal for the whole run.
    #[error("failed to open digitizer '{device}': {source}")]
    Connection {
        /// Section name of the digitizer that could not be opened.
        device: String,
        /// The underlying device-layer failure.
        source: DeviceError,
    },
}

/// Classification of a single failed device operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceErrorKind {
    /// The link dropped or returned garbage mid-transaction.
    #[error("communication error")]
    Comm,
    /// The device did not answer in time.
    #[error("timeout")]
    Timeout,
    /// The device rejected the value or address.
    #[error("invalid parameter")]
    InvalidParam,
    /// No device answered at the configured address.
    #[error("device not found")]
    NotFound,
    /// The operation does not exist on this model.
    #[error("operation not supported by this model")]
    Unsupported,
    /// Unclassified driver failure.
    #[error("generic failure")]
    Generic,
}

/// A failed device operation, carrying the name of the operation that failed.
///
/// The operation name identifies which register access misbehaved when the
/// failure is logged and execution continues with the next setting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{op}: {kind}")]
pub struct DeviceError {
    /// Name of the device operation that failed.
    pub op: &'static str,
    /// Failure classification.
    pub kind: DeviceErrorKind,
}

impl DeviceError {
    /// Create a new device error for the given operation.
    pub fn new(op: &'static str, kind: DeviceErrorKind) -> Self {
        Self { op, kind }
    }
}
