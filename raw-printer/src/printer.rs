//! Printer adapters for sending raw ESC/POS data
//!
//! Wraps [`RawPrintTransport`] behind the async [`Printer`] trait. Spooler
//! calls block, so async printing runs them on tokio's blocking pool.

use tracing::instrument;

use crate::error::{PrintError, PrintResult};
use crate::spooler::Spooler;
use crate::transport::{RawPrintTransport, Submission};

/// Default job name shown in the printer queue
pub const DEFAULT_JOB_NAME: &str = "Raw Document";

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer, returning the bytes written
    async fn print(&self, data: &[u8]) -> PrintResult<usize>;
}

/// Named spooler device
///
/// Every print opens and closes its own device handle.
#[derive(Debug, Clone)]
pub struct RawPrinter<S> {
    device: String,
    job_name: String,
    spooler: S,
}

impl<S> RawPrinter<S> {
    /// Create a printer for a device name as known to the spooler
    pub fn new(device: &str, spooler: S) -> Self {
        Self {
            device: device.to_string(),
            job_name: DEFAULT_JOB_NAME.to_string(),
            spooler,
        }
    }

    /// Set the job display name
    pub fn with_job_name(mut self, job_name: &str) -> Self {
        self.job_name = job_name.to_string();
        self
    }

    /// Get the device name
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Get the job display name
    pub fn job_name(&self) -> &str {
        &self.job_name
    }
}

#[cfg(windows)]
impl RawPrinter<crate::win32::WinSpooler> {
    /// Printer backed by the Windows spooler
    pub fn windows(device: &str) -> Self {
        Self::new(device, crate::win32::WinSpooler::new())
    }
}

impl<S: Spooler + Clone> RawPrinter<S> {
    /// Run one submission on the calling thread
    #[instrument(skip(self, data), fields(device = %self.device, data_len = data.len()))]
    pub fn submit(&self, data: &[u8]) -> Submission {
        RawPrintTransport::new(self.spooler.clone()).submit(&self.device, &self.job_name, data)
    }

    /// Send raw data synchronously (for use from sync/blocking contexts)
    pub fn print_sync(&self, data: &[u8]) -> PrintResult<usize> {
        self.submit(data).into_result()
    }
}

impl<S> Printer for RawPrinter<S>
where
    S: Spooler + Clone + Send + 'static,
{
    async fn print(&self, data: &[u8]) -> PrintResult<usize> {
        // Spooler calls are synchronous, run in blocking task
        let printer = self.clone();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || printer.print_sync(&data))
            .await
            .map_err(|e| PrintError::Runtime(format!("Task join failed: {}", e)))?
    }
}
