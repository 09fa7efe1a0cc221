// Copyright (C) 2021-2024 The Vela Team.
// This file is part of the Vela library.

// The Vela library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The Vela library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the Vela library. If not, see <https://www.gnu.org/licenses/>.

use crate::{VelaError, VelaWarning};

use core::fmt;
use std::{cell::RefCell, rc::Rc};

/// Types that are sinks for compiler errors.
pub trait Emitter {
    /// Emit the error `err`.
    fn emit_err(&mut self, err: VelaError);

    /// Emit the warning `warning`.
    fn emit_warning(&mut self, warning: VelaWarning);
}

/// A trivial `Emitter` that prints to standard error immediately.
pub struct StderrEmitter;

impl Emitter for StderrEmitter {
    fn emit_err(&mut self, err: VelaError) {
        eprintln!("{err}");
    }

    fn emit_warning(&mut self, warning: VelaWarning) {
        eprintln!("{warning}");
    }
}

/// A buffer of `T`s.
#[derive(Debug)]
pub struct Buffer<T>(Vec<T>);

impl<T> Default for Buffer<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Buffer<T> {
    /// Pushes `x` onto the buffer.
    pub fn push(&mut self, x: T) {
        self.0.push(x);
    }

    /// Extracts all the elements in the buffer.
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }

    /// The number of elements currently buffered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is the buffer empty?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: fmt::Display> fmt::Display for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for x in &self.0 {
            if !first {
                writeln!(f)?;
            }
            first = false;
            x.fmt(f)?;
        }
        Ok(())
    }
}

/// A buffer of errors.
pub type ErrBuffer = Buffer<VelaError>;
/// A buffer of warnings.
pub type WarningBuffer = Buffer<VelaWarning>;

/// An `Emitter` that collects into a buffer, used by tests.
#[derive(Default, Clone)]
pub struct BufferEmitter(Rc<RefCell<ErrBuffer>>, Rc<RefCell<WarningBuffer>>);

impl BufferEmitter {
    /// Returns a new buffered emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts all the errors collected in this emitter.
    pub fn extract_errs(&self) -> ErrBuffer {
        self.0.take()
    }

    /// Extracts all the warnings collected in this emitter.
    pub fn extract_warnings(&self) -> WarningBuffer {
        self.1.take()
    }
}

impl Emitter for BufferEmitter {
    fn emit_err(&mut self, err: VelaError) {
        self.0.borrow_mut().push(err);
    }

    fn emit_warning(&mut self, warning: VelaWarning) {
        self.1.borrow_mut().push(warning);
    }
}

/// Contains the actual data for `Handler`.
/// Modeled this way to afford an API using interior mutability.
struct HandlerInner {
    /// The number of errors emitted thus far.
    err_count: usize,
    /// The number of warnings emitted thus far.
    warn_count: usize,
    /// The last error emitted, if any.
    last_err: Option<VelaError>,
    /// The sink through which errors are emitted.
    emitter: Box<dyn Emitter>,
}

impl HandlerInner {
    fn emit_err(&mut self, err: VelaError) {
        self.err_count = self.err_count.saturating_add(1);
        self.last_err = Some(err.clone());
        self.emitter.emit_err(err);
    }

    fn emit_warning(&mut self, warning: VelaWarning) {
        self.warn_count = self.warn_count.saturating_add(1);
        self.emitter.emit_warning(warning);
    }
}

/// A handler deals with diagnostics emitted during parsing and compilation.
///
/// The parser reports into a `&Handler` side channel and keeps going;
/// whether any errors occurred is queried at the end.
pub struct Handler {
    inner: RefCell<HandlerInner>,
}

impl Default for Handler {
    fn default() -> Self {
        Self::new(Box::new(StderrEmitter))
    }
}

impl Handler {
    /// Construct a `Handler` using the given `emitter`.
    pub fn new(emitter: Box<dyn Emitter>) -> Self {
        let inner = RefCell::new(HandlerInner { err_count: 0, warn_count: 0, last_err: None, emitter });
        Self { inner }
    }

    /// Construct a `Handler` that will append to `buf`.
    pub fn new_with_buf() -> (Self, BufferEmitter) {
        let buf = BufferEmitter::default();
        let handler = Self::new(Box::new(buf.clone()));
        (handler, buf)
    }

    /// Runs `logic` provided a handler that collects all errors into the `String` returned.
    pub fn with<T>(logic: impl FnOnce(&Handler) -> Result<T, VelaError>) -> Result<T, String> {
        let (handler, buf) = Handler::new_with_buf();
        let res = logic(&handler);
        handler.last_err().map_err(|e| e.to_string())?;
        res.map_err(|_| buf.extract_errs().to_string())
    }

    /// Emit the error `err`.
    pub fn emit_err<E: Into<VelaError>>(&self, err: E) {
        self.inner.borrow_mut().emit_err(err.into());
    }

    /// Emit the warning `warning`.
    pub fn emit_warning<W: Into<VelaWarning>>(&self, warning: W) {
        self.inner.borrow_mut().emit_warning(warning.into());
    }

    /// Have any errors been emitted?
    pub fn had_errors(&self) -> bool {
        self.inner.borrow().err_count > 0
    }

    /// The number of errors emitted thus far.
    pub fn err_count(&self) -> usize {
        self.inner.borrow().err_count
    }

    /// The number of warnings emitted thus far.
    pub fn warn_count(&self) -> usize {
        self.inner.borrow().warn_count
    }

    /// Returns `Err` with the last emitted error, if any error was emitted.
    pub fn last_err(&self) -> Result<(), VelaError> {
        match &self.inner.borrow().last_err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Extend the error count with `res`' error, if any, and return `res`.
    pub fn extend_if_error<T>(&self, res: Result<T, VelaError>) -> Result<T, VelaError> {
        match res {
            Ok(x) => Ok(x),
            Err(e) => {
                self.emit_err(e.clone());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParserError;
    use vela_span::Span;

    #[test]
    fn buffered_errors_are_counted() {
        let (handler, buf) = Handler::new_with_buf();
        assert!(!handler.had_errors());
        handler.emit_err(ParserError::mixed_associativity(Span::dummy()));
        handler.emit_err(ParserError::unbound_placeholder_parameter(Span::dummy()));
        assert_eq!(handler.err_count(), 2);
        assert!(handler.had_errors());
        assert!(handler.last_err().is_err());
        assert_eq!(buf.extract_errs().len(), 2);
    }
}
