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

use backtrace::Backtrace;
use colored::Colorize;
use derivative::Derivative;
use std::fmt;

/// A diagnostic without a source position, carrying the backtrace of the
/// point that created it. Used where no span exists yet.
#[derive(Derivative, Clone)]
#[derivative(Debug, PartialEq)]
pub struct Backtraced {
    /// The diagnostic message.
    pub message: String,
    /// An optional help hint.
    pub help: Option<String>,
    /// The numeric code, already masked.
    pub code: i32,
    /// The code prefix of the emitting enum, e.g. `PAR`.
    pub code_prefix: &'static str,
    /// `E` for errors, `W` for warnings.
    pub code_letter: &'static str,
    /// `Error` or `Warning`; selects the rendering style.
    pub label: &'static str,
    /// The backtrace at the construction site.
    #[derivative(Debug = "ignore", PartialEq = "ignore")]
    pub backtrace: Backtrace,
}

impl Eq for Backtraced {}

impl Backtraced {
    /// Creates a backtraced diagnostic from its parts.
    pub fn new_from_backtrace(
        message: impl ToString,
        help: Option<String>,
        code: i32,
        code_prefix: &'static str,
        code_letter: &'static str,
        label: &'static str,
        backtrace: Backtrace,
    ) -> Self {
        Self { message: message.to_string(), help, code, code_prefix, code_letter, label, backtrace }
    }

    /// The exit code of the diagnostic.
    pub fn exit_code(&self) -> i32 {
        self.code
    }

    /// The rendered code, e.g. `EPAR0370003`.
    pub fn error_code(&self) -> String {
        format!("{}{}{:0>7}", self.code_letter, self.code_prefix, self.code)
    }
}

impl fmt::Display for Backtraced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = format!("{} [{}]:", self.label, self.error_code());
        let label = if self.label == "Warning" { label.bold().yellow() } else { label.bold().red() };
        write!(f, "{} {}", label, self.message)?;
        if let Some(help) = &self.help {
            write!(f, "\n{} {}", "help:".bold().cyan(), help)?;
        }
        Ok(())
    }
}

impl std::error::Error for Backtraced {}
