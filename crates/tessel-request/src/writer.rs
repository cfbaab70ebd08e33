//! Output sinks handed out by a request.
//!
//! A host owns one output stream per response. [`SharedWriter`] is a cheap,
//! cloneable handle onto it, so the raw writer and the print writer a request
//! hands out always write into the same stream.
//!
//! [`PrintWriter`] follows the print-writer convention: its write methods
//! never fail. An I/O error sets a sticky flag instead, readable through
//! [`PrintWriter::check_error`]. This is the one place in the crate where
//! failures are recorded rather than returned.

use std::cell::{Cell, RefCell};
use std::fmt::{self, Display};
use std::io::{self, Write};
use std::rc::Rc;

use log::warn;

/// Cloneable handle onto a host output stream.
#[derive(Clone)]
pub struct SharedWriter {
    inner: Rc<RefCell<Box<dyn Write>>>,
}

impl SharedWriter {
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + 'static,
    {
        Self {
            inner: Rc::new(RefCell::new(Box::new(writer))),
        }
    }

    /// Returns true if both handles point at the same stream.
    pub fn same_stream(&self, other: &SharedWriter) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.borrow_mut().flush()
    }
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedWriter")
            .field("handles", &Rc::strong_count(&self.inner))
            .finish()
    }
}

/// Writer whose operations never fail; errors set a sticky flag.
///
/// Clones share both the underlying writer (when `W` is a shared handle) and
/// the error flag.
///
/// # Example
///
/// ```
/// use std::fmt::Write;
/// use tessel_request::PrintWriter;
///
/// let mut out = PrintWriter::new(Vec::new());
/// out.print("total: ");
/// out.println(&3);
/// write!(out, "done").unwrap();
/// assert!(!out.check_error());
/// ```
#[derive(Clone)]
pub struct PrintWriter<W: Write> {
    inner: Rc<RefCell<W>>,
    error: Rc<Cell<bool>>,
}

impl<W: Write> PrintWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Rc::new(RefCell::new(writer)),
            error: Rc::new(Cell::new(false)),
        }
    }

    /// Runs `f` against the wrapped writer.
    pub fn with_inner<R>(&self, f: impl FnOnce(&W) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// Returns true once any operation has failed.
    pub fn check_error(&self) -> bool {
        self.error.get()
    }

    /// Writes a string slice.
    pub fn write_str(&self, s: &str) {
        self.guarded(|w| w.write_all(s.as_bytes()));
    }

    /// Writes a single character.
    pub fn write_char(&self, c: char) {
        let mut buf = [0u8; 4];
        self.write_str(c.encode_utf8(&mut buf));
    }

    /// Writes `len` characters of `s` starting at character `offset`.
    pub fn write_slice(&self, s: &str, offset: usize, len: usize) {
        let slice: String = s.chars().skip(offset).take(len).collect();
        self.write_str(&slice);
    }

    /// Writes the textual form of `value`.
    pub fn print<T: Display + ?Sized>(&self, value: &T) {
        self.guarded(|w| write!(w, "{}", value));
    }

    /// Writes the textual form of `value` followed by a line separator.
    pub fn println<T: Display + ?Sized>(&self, value: &T) {
        self.guarded(|w| writeln!(w, "{}", value));
    }

    /// Writes a line separator.
    pub fn newline(&self) {
        self.write_str("\n");
    }

    /// Writes `s` and returns `self` for chaining.
    pub fn append(&self, s: &str) -> &Self {
        self.write_str(s);
        self
    }

    pub fn flush(&self) {
        let result = self.inner.borrow_mut().flush();
        if let Err(e) = result {
            warn!("print writer flush failed: {}", e);
            self.error.set(true);
        }
    }

    /// Flushes; the wrapped writer is released when the last clone drops.
    pub fn close(&self) {
        self.flush();
    }

    fn guarded<F>(&self, op: F)
    where
        F: FnOnce(&mut W) -> io::Result<()>,
    {
        let mut inner = self.inner.borrow_mut();
        if let Err(e) = op(&mut inner) {
            warn!("print writer swallowed write failure: {}", e);
            self.error.set(true);
            // best effort: a failing flush leaves the flag as it is
            let _ = inner.flush();
        }
    }
}

impl<W: Write> fmt::Write for PrintWriter<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        PrintWriter::write_str(self, s);
        Ok(())
    }
}

impl<W: Write> fmt::Debug for PrintWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintWriter")
            .field("error", &self.error.get())
            .finish_non_exhaustive()
    }
}
