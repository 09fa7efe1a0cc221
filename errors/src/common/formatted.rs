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

use crate::common::Backtraced;

use vela_span::Span;

use backtrace::Backtrace;
use colored::Colorize;
use std::fmt;

/// A diagnostic anchored at a source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    /// The source span the diagnostic points at.
    pub span: Span,
    /// The positionless payload of the diagnostic.
    pub backtrace: Backtraced,
}

impl Formatted {
    /// Creates a diagnostic from its parts and the span it points at.
    #[allow(clippy::too_many_arguments)]
    pub fn new_from_span(
        message: impl ToString,
        help: Option<String>,
        code: i32,
        code_prefix: &'static str,
        code_letter: &'static str,
        label: &'static str,
        span: Span,
        backtrace: Backtrace,
    ) -> Self {
        Self {
            span,
            backtrace: Backtraced::new_from_backtrace(message, help, code, code_prefix, code_letter, label, backtrace),
        }
    }

    /// The exit code of the diagnostic.
    pub fn exit_code(&self) -> i32 {
        self.backtrace.exit_code()
    }

    /// The rendered code, e.g. `EPAR0370003`.
    pub fn error_code(&self) -> String {
        self.backtrace.error_code()
    }
}

impl fmt::Display for Formatted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = format!("{} [{}]:", self.backtrace.label, self.error_code());
        let label = if self.backtrace.label == "Warning" { label.bold().yellow() } else { label.bold().red() };
        write!(f, "{} {}", label, self.backtrace.message)?;
        write!(f, "\n{} {}", "-->".bold().blue(), self.span)?;
        if let Some(help) = &self.backtrace.help {
            write!(f, "\n{} {}", "help:".bold().cyan(), help)?;
        }
        Ok(())
    }
}

impl std::error::Error for Formatted {}
