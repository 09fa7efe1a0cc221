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

use crate::common::VelaMessageCode;

/// Contains the parser error and warning definitions.
pub mod parser;
pub use self::parser::*;

/// The umbrella error type for the Vela front end.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VelaError {
    /// Represents a Parser Error in a Vela Error.
    #[error(transparent)]
    ParserError(#[from] ParserError),
}

impl VelaError {
    /// Implement exit code for each variant of VelaError.
    pub fn exit_code(&self) -> i32 {
        match self {
            VelaError::ParserError(error) => error.exit_code(),
        }
    }

    /// Implement error code for each variant of VelaError.
    pub fn error_code(&self) -> String {
        match self {
            VelaError::ParserError(error) => error.error_code(),
        }
    }
}

/// The umbrella warning type for the Vela front end.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VelaWarning {
    /// Represents a Parser Warning in a Vela Warning.
    #[error(transparent)]
    ParserWarning(#[from] ParserWarning),
}

impl VelaWarning {
    /// Implement warning code for each variant of VelaWarning.
    pub fn error_code(&self) -> String {
        match self {
            VelaWarning::ParserWarning(warning) => warning.error_code(),
        }
    }
}
