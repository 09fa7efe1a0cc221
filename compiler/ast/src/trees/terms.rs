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

//! Term-level trees: references, applications, control flow, literals.

use crate::{fmt_comma_separated, simple_node_impl, Constant, Name, Tree, ValDef};

use vela_span::Span;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A bare reference to a name, e.g. `x`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name: Name,
    /// Backquoted identifiers never act as pattern variables.
    pub is_backquoted: bool,
    pub span: Span,
}

simple_node_impl!(Ident);

impl Ident {
    pub fn new(name: Name, span: Span) -> Self {
        Self { name, is_backquoted: false, span }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_backquoted {
            write!(f, "`{}`", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// A selection `qualifier.name`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub qualifier: Box<Tree>,
    pub name: Name,
    pub span: Span,
}

simple_node_impl!(Select);

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.qualifier, self.name)
    }
}

/// A type projection `qualifier#name`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectFromType {
    pub qualifier: Box<Tree>,
    pub name: Name,
    pub span: Span,
}

simple_node_impl!(SelectFromType);

impl fmt::Display for SelectFromType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.qualifier, self.name)
    }
}

/// A reference to the enclosing instance, optionally qualified: `C.this`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct This {
    /// The qualifier, or the empty name for bare `this`.
    pub qual: Name,
    pub span: Span,
}

simple_node_impl!(This);

impl fmt::Display for This {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.qual.is_empty() {
            write!(f, "this")
        } else {
            write!(f, "{}.this", self.qual)
        }
    }
}

/// A reference to a parent instance: `super[M]` with an optional mix-in qualifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Super {
    /// The `this` qualifier in `C.super[M]`.
    pub qual: Box<Tree>,
    /// The mix-in qualifier, or the empty name.
    pub mix: Name,
    pub span: Span,
}

simple_node_impl!(Super);

impl fmt::Display for Super {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.qual {
            Tree::This(t) if t.qual.is_empty() => write!(f, "super")?,
            qual => write!(f, "{qual}.super")?,
        }
        if !self.mix.is_empty() {
            write!(f, "[{}]", self.mix)?;
        }
        Ok(())
    }
}

/// A literal value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub value: Constant,
    pub span: Span,
}

simple_node_impl!(Literal);

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// An application `fun(args)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Apply {
    pub fun: Box<Tree>,
    pub args: Vec<Tree>,
    pub span: Span,
}

simple_node_impl!(Apply);

impl fmt::Display for Apply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.fun)?;
        fmt_comma_separated(f, &self.args)?;
        write!(f, ")")
    }
}

/// A type application `fun[args]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeApply {
    pub fun: Box<Tree>,
    pub args: Vec<Tree>,
    pub span: Span,
}

simple_node_impl!(TypeApply);

impl fmt::Display for TypeApply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.fun)?;
        fmt_comma_separated(f, &self.args)?;
        write!(f, "]")
    }
}

/// A named argument `name = value`; occurs only in argument lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedArg {
    pub lhs: Box<Tree>,
    pub rhs: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(NamedArg);

impl fmt::Display for NamedArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

/// An assignment `lhs = rhs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    pub lhs: Box<Tree>,
    pub rhs: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(Assign);

impl fmt::Display for Assign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

/// A type ascription `expr: tpt`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Typed {
    pub expr: Box<Tree>,
    pub tpt: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(Typed);

impl fmt::Display for Typed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}: {})", self.expr, self.tpt)
    }
}

/// An annotated term or type: `arg: @annot` or `T @annot`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotated {
    pub annot: Box<Tree>,
    pub arg: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(Annotated);

impl fmt::Display for Annotated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: @{}", self.arg, self.annot)
    }
}

/// A function literal `(params) => body`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub params: Vec<ValDef>,
    pub body: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(Function);

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "((")?;
        let mut first = true;
        for param in &self.params {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}", param.name)?;
            if !param.tpt.is_empty() {
                write!(f, ": {}", param.tpt)?;
            }
        }
        write!(f, ") => {})", self.body)
    }
}

/// A statement block `{ stats; expr }`; `expr` is the result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stats: Vec<Tree>,
    pub expr: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(Block);

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for stat in &self.stats {
            write!(f, "{stat}; ")?;
        }
        write!(f, "{} }}", self.expr)
    }
}

/// A conditional `if (cond) thenp else elsep`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub cond: Box<Tree>,
    pub thenp: Box<Tree>,
    pub elsep: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(If);

impl fmt::Display for If {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if ({}) {}", self.cond, self.thenp)?;
        if !self.elsep.is_empty() {
            write!(f, " else {}", self.elsep)?;
        }
        Ok(())
    }
}

/// A single case in a match or catch: `case pat if guard => body`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseDef {
    pub pat: Box<Tree>,
    /// The guard, or the empty tree.
    pub guard: Box<Tree>,
    pub body: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(CaseDef);

impl fmt::Display for CaseDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "case {}", self.pat)?;
        if !self.guard.is_empty() {
            write!(f, " if {}", self.guard)?;
        }
        write!(f, " => {}", self.body)
    }
}

/// A pattern match `selector match { cases }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub selector: Box<Tree>,
    pub cases: Vec<CaseDef>,
    pub span: Span,
}

simple_node_impl!(Match);

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} match {{ ", self.selector)?;
        for case in &self.cases {
            write!(f, "{case} ")?;
        }
        write!(f, "}}")
    }
}

/// A try expression with optional handlers and finalizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Try {
    pub block: Box<Tree>,
    pub catches: Vec<CaseDef>,
    /// The finalizer, or the empty tree.
    pub finalizer: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(Try);

impl fmt::Display for Try {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "try {}", self.block)?;
        if !self.catches.is_empty() {
            write!(f, " catch {{ ")?;
            for case in &self.catches {
                write!(f, "{case} ")?;
            }
            write!(f, "}}")?;
        }
        if !self.finalizer.is_empty() {
            write!(f, " finally {}", self.finalizer)?;
        }
        Ok(())
    }
}

/// A throw expression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Throw {
    pub expr: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(Throw);

impl fmt::Display for Throw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "throw {}", self.expr)
    }
}

/// A return expression; `expr` is the unit literal when elided.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Return {
    pub expr: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(Return);

impl fmt::Display for Return {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "return {}", self.expr)
    }
}

/// An instance creation prefix; `new C(...)` is
/// `Apply(Select(New(C), <init>), ...)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct New {
    pub tpt: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(New);

impl fmt::Display for New {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "new {}", self.tpt)
    }
}

/// A labelled loop; `while` and `do`/`while` desugar into these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelDef {
    pub name: Name,
    pub params: Vec<Tree>,
    pub rhs: Box<Tree>,
    pub span: Span,
}

simple_node_impl!(LabelDef);

impl fmt::Display for LabelDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.rhs)
    }
}

/// A parenthesised expression list, kept transiently during parsing;
/// the parser strips or retargets these before they reach definitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parens {
    pub exprs: Vec<Tree>,
    pub span: Span,
}

simple_node_impl!(Parens);

impl fmt::Display for Parens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        fmt_comma_separated(f, &self.exprs)?;
        write!(f, ")")
    }
}

/// A placeholder tree for unparsable input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorTree {
    pub span: Span,
}

simple_node_impl!(ErrorTree);

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<error>")
    }
}
