//! Print spooler interface
//!
//! One method per blocking spooler call. A backend hands out a device
//! handle on `open` and takes it back on `close`, so a closed handle can
//! never be used again.

use std::fmt;

use crate::error::SpoolError;

/// Data type tag that makes the spooler pass bytes through untouched
pub const RAW_DATATYPE: &str = "RAW";

/// Job descriptor passed when starting a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocInfo {
    /// Job display name
    pub name: String,
    /// Spool-to-file path, `None` for hardware-bound jobs
    pub output_file: Option<String>,
    /// Data type tag
    pub datatype: String,
}

impl DocInfo {
    /// Descriptor for a raw hardware job
    pub fn raw(name: &str) -> Self {
        Self {
            name: name.to_string(),
            output_file: None,
            datatype: RAW_DATATYPE.to_string(),
        }
    }
}

/// Spooler-assigned job identifier, only used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub u32);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Blocking access to an OS print spooler
pub trait Spooler {
    /// Exclusive capability on one open device
    type Handle;

    /// Open the named device
    fn open(&mut self, device: &str) -> Result<Self::Handle, SpoolError>;

    /// Start a job on the device
    fn start_job(&mut self, handle: &mut Self::Handle, doc: &DocInfo)
    -> Result<JobId, SpoolError>;

    fn start_page(&mut self, handle: &mut Self::Handle) -> Result<(), SpoolError>;

    /// Transfer `data`, returning how many bytes the spooler accepted
    fn write(&mut self, handle: &mut Self::Handle, data: &[u8]) -> Result<usize, SpoolError>;

    fn end_page(&mut self, handle: &mut Self::Handle) -> Result<(), SpoolError>;

    fn end_job(&mut self, handle: &mut Self::Handle) -> Result<(), SpoolError>;

    /// Release the device
    fn close(&mut self, handle: Self::Handle) -> Result<(), SpoolError>;
}
