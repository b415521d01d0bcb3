//! ESC/POS command builder
//!
//! Byte-level helpers for assembling a command stream. The transport
//! never looks inside the result.

/// ESC @ - Initialize
const INIT: [u8; 2] = [0x1B, 0x40];

/// ESC/POS command builder
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

impl EscPosBuilder {
    /// Create a new builder, starting with the initialize command
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(256);
        buf.extend_from_slice(&INIT);
        Self { buf }
    }

    // === Text Output ===

    /// Write text bytes as-is
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write empty line
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Write `n` literal line feeds
    pub fn blank_lines(&mut self, n: usize) -> &mut Self {
        self.buf.extend(std::iter::repeat_n(b'\n', n));
        self
    }

    /// Print and feed n lines
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        // ESC d n
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    // === Paper Control ===

    /// Cut paper (full cut)
    pub fn cut(&mut self) -> &mut Self {
        // GS V 0 - Full cut
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    /// Partial cut (leave a small connection)
    pub fn cut_partial(&mut self) -> &mut Self {
        // GS V 1 - Partial cut
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x01]);
        self
    }

    /// Write raw bytes directly
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.buf.clone()
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Printer self-test ticket: init, three text lines, four blank lines, cut
pub fn test_ticket() -> Vec<u8> {
    EscPosBuilder::new()
        .line("TEST")
        .line("Line 1")
        .line("Line 2")
        .blank_lines(4)
        .cut()
        .build()
}
