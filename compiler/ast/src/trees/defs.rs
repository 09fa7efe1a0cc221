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

//! Definition trees: members, templates, packagings, imports.

use crate::{simple_node_impl, Flags, Modifiers, Name, Tree};

use vela_span::{sym, Span};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value definition or declaration: `val`/`var`/parameter.
/// An empty `rhs` means the definition is deferred (abstract).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValDef {
    pub mods: Modifiers,
    pub name: Name,
    /// The declared type, or the empty tree when inferred.
    pub tpt: Box<Tree>,
    pub rhs: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(ValDef);

impl fmt::Display for ValDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.mods.has(Flags::MUTABLE) { "var" } else { "val" };
        write!(f, "{}{} {}", self.mods, keyword, self.name)?;
        if !self.tpt.is_empty() {
            write!(f, ": {}", self.tpt)?;
        }
        if !self.rhs.is_empty() {
            write!(f, " = {}", self.rhs)?;
        }
        Ok(())
    }
}

/// A method definition or declaration.
/// An empty `rhs` means the method is deferred (abstract).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefDef {
    pub mods: Modifiers,
    pub name: Name,
    pub tparams: Vec<TypeDef>,
    pub paramss: Vec<Vec<ValDef>>,
    /// The result type, or the empty tree when inferred.
    pub tpt: Box<Tree>,
    pub rhs: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(DefDef);

impl fmt::Display for DefDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}def {}", self.mods, self.name)?;
        fmt_tparams(f, &self.tparams)?;
        for params in &self.paramss {
            write!(f, "(")?;
            if params.first().is_some_and(|p| p.mods.has(Flags::IMPLICIT)) {
                write!(f, "implicit ")?;
            }
            let mut first = true;
            for param in params {
                if !first {
                    write!(f, ", ")?;
                }
                first = false;
                write!(f, "{}", param.name)?;
                if !param.tpt.is_empty() {
                    write!(f, ": {}", param.tpt)?;
                }
            }
            write!(f, ")")?;
        }
        if !self.tpt.is_empty() {
            write!(f, ": {}", self.tpt)?;
        }
        if !self.rhs.is_empty() {
            write!(f, " = {}", self.rhs)?;
        }
        Ok(())
    }
}

/// A type member, type alias, or type parameter.
/// The `rhs` is an alias tree, a `TypeBounds`, or empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    pub mods: Modifiers,
    pub name: Name,
    pub tparams: Vec<TypeDef>,
    pub rhs: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(TypeDef);

impl fmt::Display for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}type {}", self.mods, self.name)?;
        fmt_tparams(f, &self.tparams)?;
        if !self.rhs.is_empty() {
            write!(f, " = {}", self.rhs)?;
        }
        Ok(())
    }
}

/// A class or trait definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub mods: Modifiers,
    pub name: Name,
    pub tparams: Vec<TypeDef>,
    pub impl_: Template,
    pub span: Span,
}

simple_node_impl!(ClassDef);

impl fmt::Display for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.mods.has(Flags::TRAIT) { "trait" } else { "class" };
        write!(f, "{}{} {}", self.mods, keyword, self.name)?;
        fmt_tparams(f, &self.tparams)?;
        write!(f, " {}", self.impl_)
    }
}

/// An object definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleDef {
    pub mods: Modifiers,
    pub name: Name,
    pub impl_: Template,
    pub span: Span,
}

simple_node_impl!(ModuleDef);

impl fmt::Display for ModuleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}object {} {}", self.mods, self.name, self.impl_)
    }
}

/// A packaging: the whole compilation unit, or a `package pid { … }` block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageDef {
    pub pid: Box<Tree>,
    pub stats: Vec<Tree>,
    pub span: Span,
}

simple_node_impl!(PackageDef);

impl fmt::Display for PackageDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "package {} {{ ", self.pid)?;
        for stat in &self.stats {
            write!(f, "{stat}; ")?;
        }
        write!(f, "}}")
    }
}

/// The body of a class, trait, object, or `new` expression:
/// parents, an optional self declaration, and member statements.
/// Early definitions appear in the body marked `PRESUPER`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub parents: Vec<Tree>,
    /// The self-type declaration, if one was written.
    pub self_decl: Option<Box<ValDef>>,
    pub body: Vec<Tree>,
    pub span: Span,
}

simple_node_impl!(Template);

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.parents.is_empty() {
            write!(f, "extends ")?;
            let mut first = true;
            for parent in &self.parents {
                if !first {
                    write!(f, " with ")?;
                }
                first = false;
                write!(f, "{parent}")?;
            }
            write!(f, " ")?;
        }
        write!(f, "{{ ")?;
        if let Some(self_decl) = &self.self_decl {
            write!(f, "{}", self_decl.name)?;
            if !self_decl.tpt.is_empty() {
                write!(f, ": {}", self_decl.tpt)?;
            }
            write!(f, " => ")?;
        }
        for stat in &self.body {
            write!(f, "{stat}; ")?;
        }
        write!(f, "}}")
    }
}

/// A single selector of an import clause.
/// A wildcard is a selector whose name is the wildcard name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportSelector {
    pub name: Name,
    pub name_span: Span,
    /// The rename, `None` for a plain import,
    /// the wildcard name for a hiding clause `name => _`.
    pub rename: Option<Name>,
    pub rename_span: Option<Span>,
}

impl ImportSelector {
    /// Is this the wildcard selector `_`?
    pub fn is_wildcard(&self) -> bool {
        self.name.sym == sym::USCORE
    }
}

impl fmt::Display for ImportSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(rename) = &self.rename {
            write!(f, " => {rename}")?;
        }
        Ok(())
    }
}

/// An import clause `import expr.{selectors}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Import {
    pub expr: Box<Tree>,
    pub selectors: Vec<ImportSelector>,
    pub span: Span,
}

simple_node_impl!(Import);

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import {}.", self.expr)?;
        match self.selectors.as_slice() {
            [single] if single.rename.is_none() => write!(f, "{single}"),
            selectors => {
                write!(f, "{{")?;
                let mut first = true;
                for selector in selectors {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{selector}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn fmt_tparams(f: &mut fmt::Formatter<'_>, tparams: &[TypeDef]) -> fmt::Result {
    if tparams.is_empty() {
        return Ok(());
    }
    write!(f, "[")?;
    let mut first = true;
    for tparam in tparams {
        if !first {
            write!(f, ", ")?;
        }
        first = false;
        if tparam.mods.has(Flags::COVARIANT) {
            write!(f, "+")?;
        } else if tparam.mods.has(Flags::CONTRAVARIANT) {
            write!(f, "-")?;
        }
        write!(f, "{}", tparam.name)?;
    }
    write!(f, "]")
}
