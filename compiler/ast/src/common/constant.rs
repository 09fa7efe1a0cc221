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

use vela_span::Symbol;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The value of a literal tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Unit,
    Bool(bool),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Symbol(Symbol),
    Null,
}

impl Constant {
    /// Negates a numeric constant, if it is one.
    pub fn negate(&self) -> Option<Constant> {
        Some(match self {
            Constant::Int(v) => Constant::Int(v.checked_neg()?),
            Constant::Long(v) => Constant::Long(v.checked_neg()?),
            Constant::Float(v) => Constant::Float(-v),
            Constant::Double(v) => Constant::Double(-v),
            _ => return None,
        })
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Unit => write!(f, "()"),
            Constant::Bool(v) => write!(f, "{v}"),
            Constant::Char(v) => write!(f, "'{v}'"),
            Constant::Int(v) => write!(f, "{v}"),
            Constant::Long(v) => write!(f, "{v}L"),
            Constant::Float(v) => write!(f, "{v}F"),
            Constant::Double(v) => write!(f, "{v}"),
            Constant::String(v) => write!(f, "{v:?}"),
            Constant::Symbol(v) => write!(f, "'{v}"),
            Constant::Null => write!(f, "null"),
        }
    }
}
