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

use crate::*;

use vela_span::Span;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A syntax tree.
///
/// One sum type covers terms, patterns, types, and definitions; which
/// subset is legal where is enforced by the parser, not the type system.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Tree {
    /// The absence of a tree: an elided type, a missing else branch,
    /// a deferred body.
    #[default]
    Empty,
    /// A placeholder produced during error recovery.
    Error(ErrorTree),

    // Terms.
    Ident(Ident),
    Select(Select),
    SelectFromType(SelectFromType),
    This(This),
    Super(Super),
    Literal(Literal),
    Apply(Apply),
    TypeApply(TypeApply),
    NamedArg(NamedArg),
    Assign(Assign),
    Typed(Typed),
    Annotated(Annotated),
    Function(Function),
    Block(Block),
    If(If),
    Match(Match),
    CaseDef(CaseDef),
    Try(Try),
    Throw(Throw),
    Return(Return),
    New(New),
    LabelDef(LabelDef),
    Parens(Parens),

    // Patterns.
    Bind(Bind),
    Star(Star),
    Alternative(Alternative),

    // Types.
    SingletonType(SingletonType),
    CompoundType(CompoundType),
    AppliedType(AppliedType),
    TypeBounds(TypeBounds),
    ExistentialType(ExistentialType),

    // Definitions.
    ValDef(ValDef),
    DefDef(DefDef),
    TypeDef(TypeDef),
    ClassDef(ClassDef),
    ModuleDef(ModuleDef),
    PackageDef(PackageDef),
    Template(Template),
    Import(Import),
}

macro_rules! for_each_variant {
    ($self:expr, $node:ident => $action:expr, $empty:expr) => {
        match $self {
            Tree::Empty => $empty,
            Tree::Error($node) => $action,
            Tree::Ident($node) => $action,
            Tree::Select($node) => $action,
            Tree::SelectFromType($node) => $action,
            Tree::This($node) => $action,
            Tree::Super($node) => $action,
            Tree::Literal($node) => $action,
            Tree::Apply($node) => $action,
            Tree::TypeApply($node) => $action,
            Tree::NamedArg($node) => $action,
            Tree::Assign($node) => $action,
            Tree::Typed($node) => $action,
            Tree::Annotated($node) => $action,
            Tree::Function($node) => $action,
            Tree::Block($node) => $action,
            Tree::If($node) => $action,
            Tree::Match($node) => $action,
            Tree::CaseDef($node) => $action,
            Tree::Try($node) => $action,
            Tree::Throw($node) => $action,
            Tree::Return($node) => $action,
            Tree::New($node) => $action,
            Tree::LabelDef($node) => $action,
            Tree::Parens($node) => $action,
            Tree::Bind($node) => $action,
            Tree::Star($node) => $action,
            Tree::Alternative($node) => $action,
            Tree::SingletonType($node) => $action,
            Tree::CompoundType($node) => $action,
            Tree::AppliedType($node) => $action,
            Tree::TypeBounds($node) => $action,
            Tree::ExistentialType($node) => $action,
            Tree::ValDef($node) => $action,
            Tree::DefDef($node) => $action,
            Tree::TypeDef($node) => $action,
            Tree::ClassDef($node) => $action,
            Tree::ModuleDef($node) => $action,
            Tree::PackageDef($node) => $action,
            Tree::Template($node) => $action,
            Tree::Import($node) => $action,
        }
    };
}

impl Tree {
    /// Is this the empty tree?
    pub fn is_empty(&self) -> bool {
        matches!(self, Tree::Empty)
    }

    /// The span of this tree; the empty tree has a dummy span.
    pub fn span(&self) -> Span {
        for_each_variant!(self, node => node.span(), Span::dummy())
    }

    /// Replaces the span of this tree, if it carries one.
    pub fn set_span(&mut self, span: Span) {
        for_each_variant!(self, node => node.set_span(span), ())
    }

    /// Is this tree a legal left-hand side of an assignment?
    pub fn is_assignable(&self) -> bool {
        matches!(self, Tree::Ident(_) | Tree::Select(_) | Tree::Apply(_))
    }

    /// Is this tree a reference to `name`?
    pub fn is_ident_named(&self, name: Name) -> bool {
        matches!(self, Tree::Ident(id) if id.name == name)
    }

    /// Is this a path: an identifier, a selection of paths, `this`, or `super`?
    pub fn is_path(&self) -> bool {
        match self {
            Tree::Ident(_) | Tree::This(_) | Tree::Super(_) => true,
            Tree::Select(select) => select.qualifier.is_path(),
            _ => false,
        }
    }

    /// Is this pattern irrefutable enough to close over directly?
    /// Variable patterns and typed variable patterns are.
    pub fn is_var_pattern(&self) -> bool {
        match self {
            Tree::Ident(id) => !id.is_backquoted && id.name.is_variable_name(),
            Tree::Typed(typed) => typed.expr.is_var_pattern(),
            Tree::Bind(bind) => bind.name.is_variable_name() && bind.body.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for_each_variant!(self, node => node.fmt(f), write!(f, "<empty>"))
    }
}
