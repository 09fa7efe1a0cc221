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

//! The operator-precedence engine shared by expression and pattern parsing.
//!
//! Infix operands are pushed onto an operator stack; whenever an incoming
//! operator binds no tighter than the stack top, the stack is reduced into
//! nested applications. Precedence and associativity are derived from the
//! operator's spelling alone.

use super::*;

use vela_ast::{Apply, Ident, Name, Select, Tree, TypeApply};
use vela_errors::ParserError;
use vela_span::BytePos;

/// One pending infix operand: the left-hand side, the operator, its type
/// arguments, and the operator's offset.
pub(crate) struct OpInfo {
    pub lhs: Tree,
    pub operator: Name,
    pub targs: Vec<Tree>,
    pub offset: BytePos,
}

/// The precedence level of the operator spelling `name`.
///
/// Assignment operators bind loosest, then alphanumeric operators, then the
/// special-character classes, with all remaining operator characters at the
/// maximum level.
pub(crate) fn precedence(name: Name) -> i32 {
    if name.is_error() {
        return -1;
    }
    if name.is_op_assignment() {
        return 0;
    }
    name.sym.with(|s| match s.chars().next() {
        None => -1,
        Some(c) if c.is_alphanumeric() || c == '_' || c == '$' => 1,
        Some('|') => 2,
        Some('^') => 3,
        Some('&') => 4,
        Some('=' | '!') => 5,
        Some('<' | '>') => 6,
        Some(':') => 7,
        Some('+' | '-') => 8,
        Some('*' | '/' | '%') => 9,
        Some(_) => 10,
    })
}

impl ParserContext<'_> {
    /// Pushes a pending operand onto the operator stack.
    pub(crate) fn push_op_info(&mut self, lhs: Tree, operator: Name, targs: Vec<Tree>, offset: BytePos) {
        self.opstack.push(OpInfo { lhs, operator, targs, offset });
    }

    /// If the stack top has the same precedence as the incoming operator,
    /// their associativities must agree.
    fn check_assoc(&mut self, offset: BytePos, op_prec: i32, left_assoc: bool) {
        if let Some(top) = self.opstack.last() {
            if precedence(top.operator) == op_prec && top.operator.is_right_assoc_operator() == left_assoc {
                let span = Span::new(offset, offset);
                self.syntax_error(ParserError::mixed_associativity(span), false);
            }
        }
    }

    /// Reduces the operator stack down to `base` against an incoming
    /// operator of precedence `prec` and the given associativity, folding
    /// the current `top` tree into applications.
    pub(crate) fn reduce_stack(
        &mut self,
        is_expr: bool,
        base: usize,
        mut top: Tree,
        prec: i32,
        left_assoc: bool,
        op_offset: BytePos,
    ) -> Tree {
        if self.opstack.len() > base {
            self.check_assoc(op_offset, prec, left_assoc);
        }
        while self.opstack.len() > base {
            let top_prec = precedence(self.opstack.last().map(|op| op.operator).unwrap_or(Name::term(vela_span::sym::ERROR)));
            if top_prec > prec || (top_prec == prec && left_assoc) {
                let op_info = self.opstack.pop().unwrap();
                top = self.finish_binary_op(is_expr, op_info, top);
            } else {
                break;
            }
        }
        top
    }

    /// Builds one infix application from a popped stack entry and the
    /// right-hand side.
    pub(crate) fn finish_binary_op(&mut self, is_expr: bool, op_info: OpInfo, rhs: Tree) -> Tree {
        let OpInfo { lhs, operator, targs, offset } = op_info;
        let span = lhs.span() + rhs.span();
        if is_expr {
            let sel_span = lhs.span() + Span::new(offset, offset);
            let mut fun = Tree::Select(Select {
                qualifier: Box::new(self.builder().strip_parens(lhs)),
                name: operator,
                span: sel_span,
            });
            if !targs.is_empty() {
                fun = Tree::TypeApply(TypeApply { fun: Box::new(fun), args: targs, span: sel_span });
            }
            Tree::Apply(Apply { fun: Box::new(fun), args: vec![rhs], span })
        } else {
            if !targs.is_empty() {
                self.syntax_error(ParserError::type_application_in_pattern(Span::new(offset, offset)), false);
            }
            let fun = Tree::Ident(Ident::new(operator, Span::new(offset, offset)));
            Tree::Apply(Apply { fun: Box::new(fun), args: vec![lhs, rhs], span })
        }
    }

    /// Reduces everything down to `base`; used when the infix sequence ends.
    pub(crate) fn reduce_exprlike_stack(&mut self, is_expr: bool, base: usize, top: Tree) -> Tree {
        let offset = self.token.span.lo;
        self.reduce_stack(is_expr, base, top, 0, true, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::precedence;
    use vela_ast::Name;
    use vela_span::{create_session_if_not_set_then, Symbol};

    fn prec(op: &str) -> i32 {
        precedence(Name::term(Symbol::intern(op)))
    }

    #[test]
    fn levels_follow_first_character() {
        create_session_if_not_set_then(|_| {
            assert!(prec("+") < prec("*"));
            assert!(prec("==") < prec("<"));
            assert!(prec("|") < prec("^"));
            assert!(prec("^") < prec("&"));
            assert!(prec("::") < prec("+"));
            assert!(prec("max") < prec("|"));
            assert_eq!(prec("+"), prec("-"));
            assert_eq!(prec("*"), prec("%"));
        });
    }

    #[test]
    fn assignment_operators_bind_loosest() {
        create_session_if_not_set_then(|_| {
            assert_eq!(prec("+="), 0);
            assert_eq!(prec("::="), 0);
            assert!(prec("+=") < prec("max"));
            // Comparison spellings are not assignments.
            assert_eq!(prec("<="), 6);
            assert_eq!(prec("=="), 5);
        });
    }

    #[test]
    fn associativity_from_trailing_colon() {
        create_session_if_not_set_then(|_| {
            assert!(Name::term(Symbol::intern("::")).is_right_assoc_operator());
            assert!(!Name::term(Symbol::intern("+")).is_right_assoc_operator());
        });
    }
}
