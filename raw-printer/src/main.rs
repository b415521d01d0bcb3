//! send-to-printer - submit the self-test ticket as a raw job
//!
//! Prints one progress line per lifecycle step, then a SUCCESS or FAILED
//! banner. Exit code 0 on success (teardown warnings allowed), 1 otherwise.

use std::process::ExitCode;

use raw_printer::{Config, PrintResult, Step, Submission, escpos, init_logger};

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    init_logger(&config.log_filter);

    println!("\nWindows RAW Printer Test");
    println!("========================\n");

    let payload = escpos::test_ticket();
    tracing::info!(
        printer = %config.printer_name,
        job = %config.job_name,
        bytes = payload.len(),
        "Submitting test ticket"
    );

    let submission = match submit(&config, &payload) {
        Ok(s) => s,
        Err(e) => {
            println!("ERROR: {}", e);
            println!("\nFAILED: Print job not submitted\n");
            return ExitCode::FAILURE;
        }
    };

    for line in progress_lines(&submission) {
        println!("{}", line);
    }

    match submission.into_result() {
        Ok(_) => {
            println!("\nSUCCESS: Print job submitted!");
            println!("\n** CHECK YOUR PRINTER **\n");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("\nFAILED: {}\n", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(windows)]
fn submit(config: &Config, payload: &[u8]) -> PrintResult<Submission> {
    use raw_printer::{RawPrintTransport, WinSpooler};

    let mut transport = RawPrintTransport::new(WinSpooler::new());
    Ok(transport.submit(&config.printer_name, &config.job_name, payload))
}

#[cfg(not(windows))]
fn submit(_config: &Config, _payload: &[u8]) -> PrintResult<Submission> {
    Err(raw_printer::PrintError::Unsupported(
        "raw spooler printing requires Windows".to_string(),
    ))
}

/// Human-readable line per attempted step, then one per warning
fn progress_lines(submission: &Submission) -> Vec<String> {
    let written = submission.result.as_ref().ok().copied();

    let mut lines: Vec<String> = submission
        .trail
        .iter()
        .map(|record| match (&record.outcome, record.step) {
            (Ok(()), Step::Open) => "OK: Printer opened".to_string(),
            (Ok(()), Step::StartJob) => match submission.job_id {
                Some(id) => format!("OK: Document started (Job ID: {})", id),
                None => "OK: Document started".to_string(),
            },
            (Ok(()), Step::Write) => match written {
                Some(n) => format!("OK: Wrote {} bytes", n),
                None => "OK: Payload written".to_string(),
            },
            (Ok(()), step) => format!("OK: {}", capitalize(&step.to_string())),
            (Err(e), step) => format!("ERROR: Could not {}: {}", step, e),
        })
        .collect();

    lines.extend(
        submission
            .warnings
            .iter()
            .map(|w| format!("WARNING: {}", w)),
    );
    lines
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
