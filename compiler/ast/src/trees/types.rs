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

//! Type-level trees.

use crate::{fmt_comma_separated, simple_node_impl, Template, Tree};

use vela_span::Span;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A singleton type `path.type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SingletonType {
    pub ref_: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(SingletonType);

impl fmt::Display for SingletonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.type", self.ref_)
    }
}

/// An intersection of parents with an optional refinement,
/// `A with B { defs }`. The template's body holds the refinement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompoundType {
    pub templ: Template,
    pub span: Span,
}

simple_node_impl!(CompoundType);

impl fmt::Display for CompoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for parent in &self.templ.parents {
            if !first {
                write!(f, " with ")?;
            }
            first = false;
            write!(f, "{parent}")?;
        }
        if !self.templ.body.is_empty() {
            write!(f, " {{ ")?;
            for stat in &self.templ.body {
                write!(f, "{stat}; ")?;
            }
            write!(f, "}}")?;
        }
        Ok(())
    }
}

/// A type application `tpt[args]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedType {
    pub tpt: Box<Tree>,
    pub args: Vec<Tree>,
    pub span: Span,
}

simple_node_impl!(AppliedType);

impl fmt::Display for AppliedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.tpt)?;
        fmt_comma_separated(f, &self.args)?;
        write!(f, "]")
    }
}

/// Type bounds `>: lo <: hi`; either side may be the empty tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeBounds {
    pub lo: Box<Tree>,
    pub hi: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(TypeBounds);

impl fmt::Display for TypeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_")?;
        if !self.lo.is_empty() {
            write!(f, " >: {}", self.lo)?;
        }
        if !self.hi.is_empty() {
            write!(f, " <: {}", self.hi)?;
        }
        Ok(())
    }
}

/// An existential type `tpt forSome { clauses }`; also produced by
/// wildcard type arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExistentialType {
    pub tpt: Box<Tree>,
    pub clauses: Vec<Tree>,
    pub span: Span,
}

simple_node_impl!(ExistentialType);

impl fmt::Display for ExistentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} forSome {{ ", self.tpt)?;
        for clause in &self.clauses {
            write!(f, "{clause}; ")?;
        }
        write!(f, "}}")
    }
}
