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

//! The abstract syntax trees of the Vela language.
//!
//! The parser produces one [`Tree`] per compilation unit (a
//! [`PackageDef`]); this crate defines the node types, names, modifier
//! flags, and literal constants those trees are made of.

#![forbid(unsafe_code)]

pub mod common;
pub use common::*;

pub mod trees;
pub use trees::*;

pub mod tree;
pub use tree::*;

use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) fn fmt_comma_separated(f: &mut fmt::Formatter<'_>, trees: &[Tree]) -> fmt::Result {
    let mut first = true;
    for tree in trees {
        if !first {
            write!(f, ", ")?;
        }
        first = false;
        write!(f, "{tree}")?;
    }
    Ok(())
}

/// A compilation unit's abstract syntax tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ast {
    pub tree: Tree,
}

impl Ast {
    /// Wraps the root `tree` of a compilation unit.
    pub fn new(tree: Tree) -> Self {
        Self { tree }
    }

    /// Returns a reference to the root tree.
    pub fn as_repr(&self) -> &Tree {
        &self.tree
    }

    /// Serializes the ast into a JSON string.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.tree)
    }

    /// Deserializes a JSON string into an ast.
    pub fn from_json_string(json: &str) -> serde_json::Result<Self> {
        Ok(Self { tree: serde_json::from_str(json)? })
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.fmt(f)
    }
}
