//! # raw-printer
//!
//! Raw print job transport - sends an opaque byte stream (typically ESC/POS)
//! straight to a spooler device, skipping driver rendering.
//!
//! ## Scope
//!
//! This crate handles ONE raw job at a time:
//! - Job lifecycle (open, start job, start page, write, end page, end job, close)
//! - RAW data type declaration so command bytes reach the device unmodified
//! - Best-effort teardown with warnings that never mask the primary error
//! - Windows spooler backend (winspool)
//!
//! Printer discovery, retries and command vocabulary stay in application code.
//!
//! ## Example
//!
//! ```ignore
//! use raw_printer::{RawPrintTransport, WinSpooler, escpos};
//!
//! let mut transport = RawPrintTransport::new(WinSpooler::new());
//! let submission = transport.submit("EPSON TM-T20III Receipt", "RAW Test", &escpos::test_ticket());
//! for warning in &submission.warnings {
//!     eprintln!("{warning}");
//! }
//! let written = submission.result?;
//! ```

mod config;
mod error;
pub mod escpos;
mod logger;
mod printer;
mod spooler;
mod transport;

#[cfg(windows)]
mod win32;

// Re-exports
pub use config::Config;
pub use error::{PrintError, PrintResult, SpoolError, TeardownStep, TeardownWarning};
pub use escpos::EscPosBuilder;
pub use logger::init_logger;
pub use printer::{DEFAULT_JOB_NAME, Printer, RawPrinter};
pub use spooler::{DocInfo, JobId, RAW_DATATYPE, Spooler};
pub use transport::{RawPrintTransport, Step, StepRecord, Submission};

#[cfg(windows)]
pub use win32::{PrinterHandle, WinSpooler};
