//! Raw print job lifecycle
//!
//! open -> start job -> start page -> write -> end page -> end job -> close
//!
//! Setup stops at the first failure. Teardown runs for whatever was
//! acquired, and its failures are collected as warnings next to the
//! primary result instead of replacing it.

use std::fmt;

use tracing::{debug, info, instrument, warn};

use crate::error::{PrintError, PrintResult, SpoolError, TeardownStep, TeardownWarning};
use crate::spooler::{DocInfo, JobId, Spooler};

/// Lifecycle step of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Open,
    StartJob,
    StartPage,
    Write,
    EndPage,
    EndJob,
    Close,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::Open => "open device",
            Step::StartJob => "start job",
            Step::StartPage => "start page",
            Step::Write => "write payload",
            Step::EndPage => "end page",
            Step::EndJob => "end job",
            Step::Close => "close device",
        };
        f.write_str(s)
    }
}

impl From<TeardownStep> for Step {
    fn from(step: TeardownStep) -> Self {
        match step {
            TeardownStep::EndPage => Step::EndPage,
            TeardownStep::EndJob => Step::EndJob,
            TeardownStep::Close => Step::Close,
        }
    }
}

/// One attempted step and whether it succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: Step,
    pub outcome: Result<(), SpoolError>,
}

/// Everything that happened during one submission
#[derive(Debug)]
pub struct Submission {
    /// Bytes written, or the first fatal error
    pub result: PrintResult<usize>,
    /// Job identifier, if the job was started
    pub job_id: Option<JobId>,
    /// Teardown failures, in the order they occurred
    pub warnings: Vec<TeardownWarning>,
    /// Attempted steps, in order
    pub trail: Vec<StepRecord>,
}

impl Submission {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Log the warnings and return the primary result
    pub fn into_result(self) -> PrintResult<usize> {
        for warning in &self.warnings {
            warn!(step = %warning.step, error = %warning.source, "Teardown step failed");
        }
        self.result
    }
}

/// Drives one raw print job at a time through a [`Spooler`]
#[derive(Debug)]
pub struct RawPrintTransport<S> {
    spooler: S,
}

impl<S: Spooler> RawPrintTransport<S> {
    pub fn new(spooler: S) -> Self {
        Self { spooler }
    }

    pub fn spooler(&self) -> &S {
        &self.spooler
    }

    pub fn into_spooler(self) -> S {
        self.spooler
    }

    /// Submit `payload` as one raw job on `device`
    ///
    /// Returns a [`Submission`] holding the primary result plus any
    /// teardown warnings. The device is closed on every path where it was
    /// opened.
    #[instrument(skip(self, payload), fields(data_len = payload.len()))]
    pub fn submit(&mut self, device: &str, job_name: &str, payload: &[u8]) -> Submission {
        let mut run = Run::default();

        let mut handle = match self.spooler.open(device) {
            Ok(h) => {
                run.ok(Step::Open);
                h
            }
            Err(e) => {
                run.failed(Step::Open, &e);
                return run.finish(Err(PrintError::DeviceUnavailable {
                    device: device.to_string(),
                    source: e,
                }));
            }
        };

        let result = self.run_job(&mut handle, job_name, payload, &mut run);

        let closed = self.spooler.close(handle);
        run.teardown(TeardownStep::Close, closed);

        run.finish(result)
    }

    /// Plain `Result` form of [`submit`](Self::submit)
    ///
    /// Teardown warnings are logged, never promoted.
    pub fn print_sync(
        &mut self,
        device: &str,
        job_name: &str,
        payload: &[u8],
    ) -> PrintResult<usize> {
        self.submit(device, job_name, payload).into_result()
    }

    fn run_job(
        &mut self,
        handle: &mut S::Handle,
        job_name: &str,
        payload: &[u8],
        run: &mut Run,
    ) -> PrintResult<usize> {
        let doc = DocInfo::raw(job_name);
        match self.spooler.start_job(handle, &doc) {
            Ok(id) => {
                run.ok(Step::StartJob);
                run.job_id = Some(id);
                debug!(job_id = %id, "Job started");
            }
            Err(e) => {
                run.failed(Step::StartJob, &e);
                return Err(PrintError::JobStartFailed {
                    job: job_name.to_string(),
                    source: e,
                });
            }
        }

        let result = self.run_page(handle, payload, run);

        let ended = self.spooler.end_job(handle);
        run.teardown(TeardownStep::EndJob, ended);

        result
    }

    fn run_page(
        &mut self,
        handle: &mut S::Handle,
        payload: &[u8],
        run: &mut Run,
    ) -> PrintResult<usize> {
        if let Err(e) = self.spooler.start_page(handle) {
            run.failed(Step::StartPage, &e);
            return Err(PrintError::PageStartFailed(e));
        }
        run.ok(Step::StartPage);

        let result = match self.spooler.write(handle, payload) {
            Ok(written) if written == payload.len() => {
                run.ok(Step::Write);
                info!(bytes = written, "Payload written");
                Ok(written)
            }
            Ok(written) => {
                let short = SpoolError::new(
                    0,
                    format!("accepted {} of {} bytes", written, payload.len()),
                );
                run.failed(Step::Write, &short);
                Err(PrintError::ShortWrite {
                    written,
                    expected: payload.len(),
                })
            }
            Err(e) => {
                run.failed(Step::Write, &e);
                Err(PrintError::WriteFailed(e))
            }
        };

        let ended = self.spooler.end_page(handle);
        run.teardown(TeardownStep::EndPage, ended);

        result
    }
}

#[derive(Default)]
struct Run {
    job_id: Option<JobId>,
    warnings: Vec<TeardownWarning>,
    trail: Vec<StepRecord>,
}

impl Run {
    fn ok(&mut self, step: Step) {
        debug!(%step, "Step ok");
        self.trail.push(StepRecord {
            step,
            outcome: Ok(()),
        });
    }

    fn failed(&mut self, step: Step, err: &SpoolError) {
        warn!(%step, error = %err, "Step failed");
        self.trail.push(StepRecord {
            step,
            outcome: Err(err.clone()),
        });
    }

    fn teardown(&mut self, step: TeardownStep, outcome: Result<(), SpoolError>) {
        match outcome {
            Ok(()) => self.ok(step.into()),
            Err(source) => {
                self.failed(step.into(), &source);
                self.warnings.push(TeardownWarning { step, source });
            }
        }
    }

    fn finish(self, result: PrintResult<usize>) -> Submission {
        Submission {
            result,
            job_id: self.job_id,
            warnings: self.warnings,
            trail: self.trail,
        }
    }
}
