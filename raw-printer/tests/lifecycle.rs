//! Job lifecycle tests against a scripted spooler

use std::sync::{Arc, Mutex};

use raw_printer::{
    DocInfo, JobId, PrintError, Printer, RAW_DATATYPE, RawPrintTransport, RawPrinter, SpoolError,
    Spooler, Step, TeardownStep, escpos,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Open(String),
    StartJob(DocInfo),
    StartPage,
    Write(Vec<u8>),
    EndPage,
    EndJob,
    Close,
}

/// Spooler double: fails the configured steps and records every call
#[derive(Debug, Clone, Default)]
struct ScriptedSpooler {
    calls: Arc<Mutex<Vec<Call>>>,
    fail: Vec<Step>,
    accept: Option<usize>,
}

#[derive(Debug)]
struct FakeHandle;

impl ScriptedSpooler {
    fn failing(steps: &[Step]) -> Self {
        Self {
            fail: steps.to_vec(),
            ..Default::default()
        }
    }

    fn accepting(bytes: usize) -> Self {
        Self {
            accept: Some(bytes),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| f(c)).count()
    }

    fn record(&self, call: Call, step: Step) -> Result<(), SpoolError> {
        self.calls.lock().unwrap().push(call);
        if self.fail.contains(&step) {
            return Err(SpoolError::new(31, format!("{} refused", step)));
        }
        Ok(())
    }
}

impl Spooler for ScriptedSpooler {
    type Handle = FakeHandle;

    fn open(&mut self, device: &str) -> Result<FakeHandle, SpoolError> {
        self.record(Call::Open(device.to_string()), Step::Open)?;
        if device != "RECEIPT-1" {
            return Err(SpoolError::new(1801, "The printer name is invalid"));
        }
        Ok(FakeHandle)
    }

    fn start_job(&mut self, _: &mut FakeHandle, doc: &DocInfo) -> Result<JobId, SpoolError> {
        self.record(Call::StartJob(doc.clone()), Step::StartJob)?;
        Ok(JobId(42))
    }

    fn start_page(&mut self, _: &mut FakeHandle) -> Result<(), SpoolError> {
        self.record(Call::StartPage, Step::StartPage)
    }

    fn write(&mut self, _: &mut FakeHandle, data: &[u8]) -> Result<usize, SpoolError> {
        self.record(Call::Write(data.to_vec()), Step::Write)?;
        Ok(self.accept.unwrap_or(data.len()).min(data.len()))
    }

    fn end_page(&mut self, _: &mut FakeHandle) -> Result<(), SpoolError> {
        self.record(Call::EndPage, Step::EndPage)
    }

    fn end_job(&mut self, _: &mut FakeHandle) -> Result<(), SpoolError> {
        self.record(Call::EndJob, Step::EndJob)
    }

    fn close(&mut self, _: FakeHandle) -> Result<(), SpoolError> {
        self.record(Call::Close, Step::Close)
    }
}

fn position(calls: &[Call], target: &Call) -> usize {
    calls
        .iter()
        .position(|c| c == target)
        .unwrap_or_else(|| panic!("{:?} not called", target))
}

#[test]
fn test_full_success() {
    let spooler = ScriptedSpooler::default();
    let payload = escpos::test_ticket();

    let mut transport = RawPrintTransport::new(spooler.clone());
    let submission = transport.submit("RECEIPT-1", "T1", &payload);

    assert_eq!(submission.result, Ok(payload.len()));
    assert_eq!(submission.job_id, Some(JobId(42)));
    assert!(submission.warnings.is_empty());
    assert_eq!(
        spooler.calls(),
        vec![
            Call::Open("RECEIPT-1".into()),
            Call::StartJob(DocInfo::raw("T1")),
            Call::StartPage,
            Call::Write(payload.clone()),
            Call::EndPage,
            Call::EndJob,
            Call::Close,
        ]
    );
    assert!(submission.trail.iter().all(|r| r.outcome.is_ok()));
}

#[test]
fn test_job_declared_raw_without_output_file() {
    let spooler = ScriptedSpooler::default();
    RawPrintTransport::new(spooler.clone()).submit("RECEIPT-1", "T1", b"\x1b@");

    let doc = spooler
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::StartJob(doc) => Some(doc),
            _ => None,
        })
        .expect("job started");
    assert_eq!(doc.name, "T1");
    assert_eq!(doc.output_file, None);
    assert_eq!(doc.datatype, RAW_DATATYPE);
}

#[test]
fn test_unknown_device() {
    let spooler = ScriptedSpooler::default();
    let submission =
        RawPrintTransport::new(spooler.clone()).submit("NO-SUCH-PRINTER", "T1", b"TEST\n");

    match submission.result {
        Err(PrintError::DeviceUnavailable { device, source }) => {
            assert_eq!(device, "NO-SUCH-PRINTER");
            assert_eq!(source.code, 1801);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(spooler.calls(), vec![Call::Open("NO-SUCH-PRINTER".into())]);
    assert!(submission.warnings.is_empty());
    assert_eq!(submission.job_id, None);
}

#[test]
fn test_job_start_failure_closes_device_only() {
    let spooler = ScriptedSpooler::failing(&[Step::StartJob]);
    let submission = RawPrintTransport::new(spooler.clone()).submit("RECEIPT-1", "T1", b"TEST\n");

    assert!(matches!(
        submission.result,
        Err(PrintError::JobStartFailed { ref job, .. }) if job == "T1"
    ));
    assert_eq!(
        spooler.calls(),
        vec![
            Call::Open("RECEIPT-1".into()),
            Call::StartJob(DocInfo::raw("T1")),
            Call::Close,
        ]
    );
}

#[test]
fn test_page_start_failure_ends_job_and_closes() {
    let spooler = ScriptedSpooler::failing(&[Step::StartPage]);
    let submission = RawPrintTransport::new(spooler.clone()).submit("RECEIPT-1", "T1", b"TEST\n");

    assert!(matches!(submission.result, Err(PrintError::PageStartFailed(_))));
    assert_eq!(
        spooler.calls(),
        vec![
            Call::Open("RECEIPT-1".into()),
            Call::StartJob(DocInfo::raw("T1")),
            Call::StartPage,
            Call::EndJob,
            Call::Close,
        ]
    );
}

#[test]
fn test_page_start_error_not_masked_by_end_job_failure() {
    let spooler = ScriptedSpooler::failing(&[Step::StartPage, Step::EndJob]);
    let submission = RawPrintTransport::new(spooler.clone()).submit("RECEIPT-1", "T1", b"TEST\n");

    assert!(matches!(submission.result, Err(PrintError::PageStartFailed(_))));
    assert_eq!(submission.warnings.len(), 1);
    assert_eq!(submission.warnings[0].step, TeardownStep::EndJob);
    assert_eq!(spooler.count(|c| *c == Call::Close), 1);
}

#[test]
fn test_short_write() {
    let spooler = ScriptedSpooler::accepting(10);
    let payload = escpos::test_ticket();
    let submission = RawPrintTransport::new(spooler.clone()).submit("RECEIPT-1", "T1", &payload);

    assert_eq!(
        submission.result,
        Err(PrintError::ShortWrite {
            written: 10,
            expected: payload.len(),
        })
    );
    assert!(submission.warnings.is_empty());
    assert_eq!(spooler.count(|c| *c == Call::EndPage), 1);
    assert_eq!(spooler.count(|c| *c == Call::EndJob), 1);
    assert_eq!(spooler.count(|c| *c == Call::Close), 1);
    assert_eq!(spooler.count(|c| matches!(c, Call::Write(_))), 1);
}

#[test]
fn test_write_failure_keeps_primary_error_over_teardown() {
    let spooler = ScriptedSpooler::failing(&[Step::Write, Step::EndPage, Step::EndJob, Step::Close]);
    let submission = RawPrintTransport::new(spooler.clone()).submit("RECEIPT-1", "T1", b"TEST\n");

    assert!(matches!(submission.result, Err(PrintError::WriteFailed(_))));
    let steps: Vec<TeardownStep> = submission.warnings.iter().map(|w| w.step).collect();
    assert_eq!(
        steps,
        vec![TeardownStep::EndPage, TeardownStep::EndJob, TeardownStep::Close]
    );
    assert_eq!(spooler.count(|c| *c == Call::EndPage), 1);
    assert_eq!(spooler.count(|c| *c == Call::EndJob), 1);
    assert_eq!(spooler.count(|c| *c == Call::Close), 1);
}

#[test]
fn test_end_page_failure_is_warning_only() {
    let spooler = ScriptedSpooler::failing(&[Step::EndPage]);
    let payload = escpos::test_ticket();
    let submission = RawPrintTransport::new(spooler.clone()).submit("RECEIPT-1", "T1", &payload);

    assert_eq!(submission.result, Ok(payload.len()));
    assert_eq!(submission.warnings.len(), 1);
    assert_eq!(submission.warnings[0].step, TeardownStep::EndPage);
    assert_eq!(spooler.count(|c| *c == Call::EndJob), 1);
    assert_eq!(spooler.count(|c| *c == Call::Close), 1);
}

#[test]
fn test_close_failure_is_warning_only() {
    let spooler = ScriptedSpooler::failing(&[Step::Close]);
    let submission = RawPrintTransport::new(spooler.clone()).submit("RECEIPT-1", "T1", b"TEST\n");

    assert_eq!(submission.result, Ok(5));
    assert_eq!(submission.warnings.len(), 1);
    assert_eq!(submission.warnings[0].step, TeardownStep::Close);
}

#[test]
fn test_teardown_order_on_every_path() {
    let scripts: [&[Step]; 6] = [
        &[],
        &[Step::StartJob],
        &[Step::StartPage],
        &[Step::Write],
        &[Step::EndPage],
        &[Step::EndPage, Step::EndJob, Step::Close],
    ];

    for script in scripts {
        let spooler = ScriptedSpooler::failing(script);
        RawPrintTransport::new(spooler.clone()).submit("RECEIPT-1", "T1", b"TEST\n");
        let calls = spooler.calls();

        assert_eq!(spooler.count(|c| *c == Call::Close), 1, "script {:?}", script);
        assert_eq!(calls.last(), Some(&Call::Close), "script {:?}", script);
        if calls.contains(&Call::EndPage) {
            assert!(position(&calls, &Call::EndPage) < position(&calls, &Call::EndJob));
        }
        if calls.contains(&Call::EndJob) {
            assert!(position(&calls, &Call::EndJob) < position(&calls, &Call::Close));
        }
    }
}

#[test]
fn test_trail_marks_failed_step() {
    let spooler = ScriptedSpooler::accepting(3);
    let submission = RawPrintTransport::new(spooler).submit("RECEIPT-1", "T1", b"TEST\n");

    let failed: Vec<Step> = submission
        .trail
        .iter()
        .filter(|r| r.outcome.is_err())
        .map(|r| r.step)
        .collect();
    assert_eq!(failed, vec![Step::Write]);
    assert_eq!(submission.trail.last().map(|r| r.step), Some(Step::Close));
}

#[test]
fn test_print_sync_returns_success_despite_warnings() {
    let spooler = ScriptedSpooler::failing(&[Step::EndJob]);
    let result = RawPrintTransport::new(spooler).print_sync("RECEIPT-1", "T1", b"TEST\n");
    assert_eq!(result, Ok(5));
}

#[tokio::test]
async fn test_raw_printer_async() {
    let spooler = ScriptedSpooler::default();
    let printer = RawPrinter::new("RECEIPT-1", spooler.clone()).with_job_name("T1");

    let payload = escpos::test_ticket();
    let written = printer.print(&payload).await.unwrap();

    assert_eq!(written, payload.len());
    assert_eq!(spooler.calls().first(), Some(&Call::Open("RECEIPT-1".into())));
    assert_eq!(spooler.calls().last(), Some(&Call::Close));
}

#[tokio::test]
async fn test_raw_printer_opens_fresh_handle_per_job() {
    let spooler = ScriptedSpooler::default();
    let printer = RawPrinter::new("RECEIPT-1", spooler.clone());

    printer.print(b"one\n").await.unwrap();
    printer.print(b"two\n").await.unwrap();

    assert_eq!(spooler.count(|c| matches!(c, Call::Open(_))), 2);
    assert_eq!(spooler.count(|c| *c == Call::Close), 2);
}

#[tokio::test]
async fn test_raw_printer_async_error() {
    let printer = RawPrinter::new("OFFLINE", ScriptedSpooler::default());
    let err = printer.print(b"TEST\n").await.unwrap_err();
    assert!(err.is_retryable());
}
