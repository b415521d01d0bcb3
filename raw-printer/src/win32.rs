//! Windows spooler backend
//!
//! Talks to winspool through the Win32 API.

use core::ffi::c_void;

use windows::Win32::Foundation::GetLastError;
use windows::Win32::Graphics::Printing::{
    ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, OpenPrinterW, PRINTER_HANDLE,
    StartDocPrinterW, StartPagePrinter, WritePrinter,
};
use windows::core::{PCWSTR, PWSTR};

use crate::error::SpoolError;
use crate::spooler::{DocInfo, JobId, Spooler};

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn last_error(message: &str) -> SpoolError {
    let code = unsafe { GetLastError() }.0;
    SpoolError::new(code, message)
}

/// Open winspool printer handle
#[derive(Debug)]
pub struct PrinterHandle(PRINTER_HANDLE);

/// Spooler backed by the Windows print subsystem
#[derive(Debug, Clone, Copy, Default)]
pub struct WinSpooler;

impl WinSpooler {
    pub fn new() -> Self {
        Self
    }
}

impl Spooler for WinSpooler {
    type Handle = PrinterHandle;

    fn open(&mut self, device: &str) -> Result<PrinterHandle, SpoolError> {
        let name_w = to_wide(device);
        let mut handle = PRINTER_HANDLE::default();

        unsafe { OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None) }
            .map_err(|e| SpoolError::new(e.code().0 as u32, "OpenPrinterW failed"))?;

        Ok(PrinterHandle(handle))
    }

    fn start_job(
        &mut self,
        handle: &mut PrinterHandle,
        doc: &DocInfo,
    ) -> Result<JobId, SpoolError> {
        let name_w = to_wide(&doc.name);
        let datatype_w = to_wide(&doc.datatype);
        let output_w = doc.output_file.as_deref().map(to_wide);

        let doc_info = DOC_INFO_1W {
            pDocName: PWSTR(name_w.as_ptr() as *mut _),
            pOutputFile: output_w
                .as_ref()
                .map_or(PWSTR::null(), |w| PWSTR(w.as_ptr() as *mut _)),
            pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
        };

        let job = unsafe { StartDocPrinterW(handle.0, 1, &doc_info as *const DOC_INFO_1W) };
        if job == 0 {
            return Err(last_error("StartDocPrinter failed"));
        }
        Ok(JobId(job))
    }

    fn start_page(&mut self, handle: &mut PrinterHandle) -> Result<(), SpoolError> {
        if !unsafe { StartPagePrinter(handle.0) }.as_bool() {
            return Err(last_error("StartPagePrinter failed"));
        }
        Ok(())
    }

    fn write(&mut self, handle: &mut PrinterHandle, data: &[u8]) -> Result<usize, SpoolError> {
        let len = u32::try_from(data.len()).map_err(|_| {
            SpoolError::new(0, format!("payload of {} bytes exceeds u32", data.len()))
        })?;

        let mut written: u32 = 0;
        let ok = unsafe {
            WritePrinter(
                handle.0,
                data.as_ptr() as *const c_void,
                len,
                &mut written,
            )
        };
        if !ok.as_bool() {
            return Err(last_error("WritePrinter failed"));
        }
        Ok(written as usize)
    }

    fn end_page(&mut self, handle: &mut PrinterHandle) -> Result<(), SpoolError> {
        if !unsafe { EndPagePrinter(handle.0) }.as_bool() {
            return Err(last_error("EndPagePrinter failed"));
        }
        Ok(())
    }

    fn end_job(&mut self, handle: &mut PrinterHandle) -> Result<(), SpoolError> {
        if !unsafe { EndDocPrinter(handle.0) }.as_bool() {
            return Err(last_error("EndDocPrinter failed"));
        }
        Ok(())
    }

    fn close(&mut self, handle: PrinterHandle) -> Result<(), SpoolError> {
        unsafe { ClosePrinter(handle.0) }
            .map_err(|e| SpoolError::new(e.code().0 as u32, "ClosePrinter failed"))
    }
}
