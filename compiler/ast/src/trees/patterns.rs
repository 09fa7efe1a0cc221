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

//! Pattern-only trees.

use crate::{simple_node_impl, Name, Tree};

use vela_span::Span;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pattern binder `name @ body`; a bare variable pattern is
/// `Bind(name, Empty)` only in wildcard-type position, otherwise `Ident`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bind {
    pub name: Name,
    pub body: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(Bind);

impl fmt::Display for Bind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "({} @ {})", self.name, self.body)
        }
    }
}

/// A sequence-tail pattern `elem*`, accepted only in final argument position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub elem: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(Star);

impl fmt::Display for Star {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*", self.elem)
    }
}

/// An alternative pattern `p1 | p2 | …`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub trees: Vec<Tree>,
    pub span: Span,
}

simple_node_impl!(Alternative);

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for tree in &self.trees {
            if !first {
                write!(f, " | ")?;
            }
            first = false;
            write!(f, "{tree}")?;
        }
        Ok(())
    }
}
