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

use vela_span::{sym, Symbol};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a name lives in the term or the type namespace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameKind {
    Term,
    Type,
}

/// A name in a program: an interned symbol tagged with its namespace.
///
/// The same spelling can denote a term and a type; the parser decides the
/// namespace from context when it constructs the name.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    /// The spelling the user wrote, interned.
    pub sym: Symbol,
    /// The namespace of the name.
    pub kind: NameKind,
}

impl Name {
    /// Creates a term name from `sym`.
    pub fn term(sym: Symbol) -> Self {
        Self { sym, kind: NameKind::Term }
    }

    /// Creates a type name from `sym`.
    pub fn type_(sym: Symbol) -> Self {
        Self { sym, kind: NameKind::Type }
    }

    /// This name, moved to the term namespace.
    pub fn to_term(self) -> Self {
        Self::term(self.sym)
    }

    /// This name, moved to the type namespace.
    pub fn to_type(self) -> Self {
        Self::type_(self.sym)
    }

    /// Is this name in the term namespace?
    pub fn is_term(&self) -> bool {
        self.kind == NameKind::Term
    }

    /// Is this name in the type namespace?
    pub fn is_type(&self) -> bool {
        self.kind == NameKind::Type
    }

    /// Is this the wildcard name `_`?
    pub fn is_wildcard(&self) -> bool {
        self.sym == sym::USCORE
    }

    /// Is this the error name?
    pub fn is_error(&self) -> bool {
        self.sym == sym::ERROR
    }

    /// Is this the empty name?
    pub fn is_empty(&self) -> bool {
        self.sym == sym::EMPTY
    }

    /// Can this spelling bind a pattern variable?
    /// Pattern variables must start with a lower-case letter or `_`.
    pub fn is_variable_name(&self) -> bool {
        self.sym.with(|s| matches!(s.chars().next(), Some(c) if c.is_lowercase() || c == '_'))
    }

    /// Does this spelling end in `:`, making an infix operator right-associative?
    pub fn is_right_assoc_operator(&self) -> bool {
        self.sym.with(|s| s.ends_with(':'))
    }

    /// Is this an operator-assignment spelling such as `+=`?
    /// Comparison spellings (`==`, `<=`, `>=`, `!=`) are not.
    pub fn is_op_assignment(&self) -> bool {
        self.sym.with(|s| match s {
            "==" | "!=" | "<=" | ">=" => false,
            _ => s.len() > 1 && s.ends_with('=') && !s.starts_with('=') && s.chars().next().is_some_and(is_operator_part),
        })
    }
}

/// Is `c` a character operator identifiers are made of?
pub fn is_operator_part(c: char) -> bool {
    matches!(c, '~' | '!' | '@' | '#' | '%' | '^' | '*' | '+' | '-' | '<' | '>' | '?' | ':' | '=' | '&' | '|' | '/' | '\\')
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sym)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NameKind::Term => write!(f, "{}", self.sym),
            NameKind::Type => write!(f, "{}#type", self.sym),
        }
    }
}
