/// Submission configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | RAW_PRINTER_NAME | EPSON TM-T20III Receipt | Spooler device name |
/// | RAW_PRINT_JOB_NAME | RAW Test | Job name shown in the queue |
/// | RAW_PRINT_LOG | raw_printer=info | Log filter when RUST_LOG is unset |
///
/// # Example
///
/// ```ignore
/// RAW_PRINTER_NAME="RECEIPT-1" cargo run --bin send-to-printer
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Device to open
    pub printer_name: String,
    /// Job display name
    pub job_name: String,
    /// Fallback tracing filter
    pub log_filter: String,
}

pub const DEFAULT_PRINTER_NAME: &str = "EPSON TM-T20III Receipt";
pub const DEFAULT_JOB_NAME: &str = "RAW Test";
pub const DEFAULT_LOG_FILTER: &str = "raw_printer=info";

impl Default for Config {
    fn default() -> Self {
        Self {
            printer_name: DEFAULT_PRINTER_NAME.into(),
            job_name: DEFAULT_JOB_NAME.into(),
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or empty variables fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            printer_name: get("RAW_PRINTER_NAME", DEFAULT_PRINTER_NAME),
            job_name: get("RAW_PRINT_JOB_NAME", DEFAULT_JOB_NAME),
            log_filter: get("RAW_PRINT_LOG", DEFAULT_LOG_FILTER),
        }
    }
}
