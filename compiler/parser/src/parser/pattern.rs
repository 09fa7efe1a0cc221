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

//! Pattern parsing. The functions carry a [`PatternMode`]: whether a
//! sequence wildcard `_*` is acceptable here, and whether the closing
//! delimiter of the surrounding context is a brace (markup patterns)
//! rather than a parenthesis.

use super::*;

/// The context sensitivity of a pattern position.
#[derive(Copy, Clone)]
pub(crate) struct PatternMode {
    pub seq_ok: bool,
    pub is_xml: bool,
}

impl PatternMode {
    pub(crate) fn no_seq() -> Self {
        Self { seq_ok: false, is_xml: false }
    }

    pub(crate) fn seq() -> Self {
        Self { seq_ok: true, is_xml: false }
    }
}

impl ParserContext<'_> {
    /// Comma-separated patterns.
    pub(crate) fn parse_patterns(&mut self, mode: PatternMode) -> Vec<Tree> {
        self.comma_separated(|p| p.parse_pattern(mode))
    }

    /// `Pattern ::= Pattern1 ('|' Pattern1)*`.
    pub(crate) fn parse_pattern(&mut self, mode: PatternMode) -> Tree {
        let start = self.token.span;
        let first = self.parse_pattern1(mode);
        if !self.is_raw_ident(sym::bar) {
            return first;
        }
        let mut alts = vec![first];
        while self.is_raw_ident(sym::bar) {
            self.bump();
            alts.push(self.parse_pattern1(mode));
        }
        let span = start + self.prev_token.span;
        Tree::Alternative(Alternative { trees: alts, span })
    }

    /// `Pattern1 ::= varid ':' TypePat | '_' ':' TypePat | Pattern2`.
    /// A typed pattern needs a lower-case-initial variable on the left.
    pub(crate) fn parse_pattern1(&mut self, mode: PatternMode) -> Tree {
        let p = self.parse_pattern2(mode);
        if !self.check(&Token::Colon) {
            return p;
        }
        let is_var = matches!(&p, Tree::Ident(id) if !id.is_backquoted && id.name.is_variable_name());
        if !is_var {
            if matches!(p, Tree::Ident(_)) {
                self.syntax_error(ParserError::pattern_var_uppercase(self.token.span), false);
            } else {
                return p;
            }
        }
        self.bump();
        let tpt = self.parse_compound_type(TypeMode::Pattern);
        let span = p.span() + tpt.span();
        Tree::Typed(Typed { expr: Box::new(p), tpt: Box::new(tpt), span })
    }

    /// `Pattern2 ::= varid ['@' Pattern3] | Pattern3`.
    pub(crate) fn parse_pattern2(&mut self, mode: PatternMode) -> Tree {
        let p = self.parse_pattern3(mode);
        if !self.check(&Token::At) {
            return p;
        }
        match p {
            Tree::Ident(id) if id.name.is_wildcard() => {
                // `_ @ p` carries no information beyond `p`.
                self.bump();
                self.parse_pattern3(mode)
            }
            Tree::Ident(id) if !id.is_backquoted && id.name.is_variable_name() => {
                self.bump();
                let body = self.parse_pattern3(mode);
                let span = id.span + body.span();
                Tree::Bind(Bind { name: id.name, body: Box::new(body), span })
            }
            p => p,
        }
    }

    /// `Pattern3`: simple patterns strung together by infix operators via
    /// the shared precedence engine, with the `_*` sequence-tail special
    /// case up front.
    pub(crate) fn parse_pattern3(&mut self, mode: PatternMode) -> Tree {
        let top = self.parse_simple_pattern(mode, false);
        let base = self.opstack.len();

        // `_*` closes a sequence pattern iff the context allows it and a
        // matching close delimiter follows; otherwise the star is an
        // ordinary infix operator.
        if let Tree::Ident(id) = &top {
            if id.name.is_wildcard() && mode.seq_ok && self.is_raw_ident(sym::star) {
                let matched = self.peeking_ahead(|p| {
                    let closes = if mode.is_xml { p.check(&Token::RBrace) } else { p.check(&Token::RParen) };
                    closes.then_some(())
                });
                if matched.is_some() {
                    let span = top.span() + self.prev_token.span;
                    return Tree::Star(Star { elem: Box::new(top), span });
                }
            }
        }

        let mut top = top;
        while self.is_ident() && !self.is_raw_ident(sym::bar) {
            top = {
                let name = Name::term(self.name());
                let prec = precedence(name);
                let left_assoc = !name.is_right_assoc_operator();
                let offset = self.offset();
                self.reduce_stack(false, base, std::mem::take(&mut top), prec, left_assoc, offset)
            };
            let op_name = Name::term(self.name());
            let op_offset = self.offset();
            self.bump();
            let lhs = std::mem::take(&mut top);
            self.push_op_info(lhs, op_name, Vec::new(), op_offset);
            top = self.parse_simple_pattern(mode, true);
        }
        let top = self.reduce_exprlike_stack(false, base, top);
        self.builder().strip_parens(top)
    }

    /// `SimplePattern ::= varid | '_' | literal | stableId [TypeArgs] [ArgumentPatterns] | (Patterns)`.
    fn parse_simple_pattern(&mut self, mode: PatternMode, in_pattern3: bool) -> Tree {
        if self.is_ident() || self.check(&Token::This) {
            let t = self.parse_stable_id();
            // `-1` in a pattern is a negated literal, not a unary selection.
            if let Tree::Ident(id) = &t {
                if id.name.sym == sym::minus
                    && matches!(
                        self.token.token,
                        Token::IntLit(_) | Token::LongLit(_) | Token::FloatLit(_) | Token::DoubleLit(_)
                    )
                {
                    return self.parse_literal(true);
                }
            }
            let t = if self.check(&Token::LBracket) {
                let args = self.parse_type_args(TypeMode::Pattern);
                let span = t.span() + self.prev_token.span;
                Tree::AppliedType(AppliedType {
                    tpt: Box::new(convert_to_type_id(t)),
                    args,
                    span,
                })
            } else {
                t
            };
            if self.check(&Token::LParen) {
                let args = self.parse_argument_patterns();
                let span = t.span() + self.prev_token.span;
                Tree::Apply(Apply { fun: Box::new(t), args, span })
            } else {
                t
            }
        } else if self.check(&Token::Underscore) {
            let span = self.token.span;
            self.bump();
            Tree::Ident(Ident::new(Name::term(sym::USCORE), span))
        } else if matches!(self.token.token, Token::InterpolationId(_)) {
            self.parse_interpolated_string(true)
        } else if self.token.token.is_literal() {
            self.parse_literal(false)
        } else if self.check(&Token::LParen) {
            let start = self.token.span;
            let pats = self.in_parens(|p| {
                if p.check(&Token::RParen) {
                    Vec::new()
                } else {
                    p.parse_patterns(PatternMode::no_seq())
                }
            });
            Tree::Parens(Parens { exprs: pats, span: start + self.prev_token.span })
        } else if self.check(&Token::XmlStart) {
            self.parse_xml_literal_pattern()
        } else if in_pattern3 {
            self.bad_pattern3(mode)
        } else {
            let err = ParserError::illegal_start_of_simple_pattern(&self.token.token, self.token.span);
            self.syntax_error_or_incomplete(err, true);
            self.error_tree()
        }
    }

    /// Targeted diagnostics when a simple pattern is missing after an
    /// infix operator, most of which involve misplaced `_*`.
    fn bad_pattern3(&mut self, mode: PatternMode) -> Tree {
        let span = self.token.span;
        let is_comma = self.check(&Token::Comma);
        let is_delim = self.check(&Token::RParen) || self.check(&Token::RBrace);
        let (is_underscore, is_star) = match self.opstack.last() {
            Some(op) if op.operator.sym == sym::star => {
                (matches!(&op.lhs, Tree::Ident(id) if id.name.is_wildcard()), true)
            }
            _ => (false, false),
        };
        let is_seq_pattern_close = is_underscore && is_star && mode.seq_ok && is_delim;

        let err = match (is_underscore, is_star, mode.seq_ok) {
            (true, true, true) if is_comma => Some(ParserError::seq_wildcard_not_last(span)),
            (true, true, true) if is_delim => Some(ParserError::seq_wildcard_bad_close(span)),
            (true, true, false) if is_delim => Some(ParserError::seq_wildcard_not_allowed(span)),
            (false, true, true) if is_delim => Some(ParserError::use_seq_wildcard(span)),
            (false, true, _) if is_comma || is_delim => Some(ParserError::trailing_star_pattern(span)),
            _ => None,
        };
        let err =
            err.unwrap_or_else(|| ParserError::illegal_start_of_simple_pattern(&self.token.token, span));
        // Better recovery if delimiters of enclosing patterns are not skipped.
        let skip = !(is_comma || is_delim) || is_seq_pattern_close;
        self.syntax_error_or_incomplete(err, skip);
        self.error_tree()
    }

    /// Parenthesised argument patterns of a constructor pattern;
    /// sequence wildcards are allowed here.
    pub(crate) fn parse_argument_patterns(&mut self) -> Vec<Tree> {
        self.in_parens(|p| {
            if p.check(&Token::RParen) {
                Vec::new()
            } else {
                p.parse_patterns(PatternMode::seq())
            }
        })
    }

    /// A pattern, unwrapping one level of braces; used by interpolated
    /// string patterns.
    pub(crate) fn parse_drop_any_braces_pattern(&mut self) -> Tree {
        if self.check(&Token::LBrace) {
            self.in_braces(|p| p.parse_pattern(PatternMode::no_seq()))
        } else {
            self.parse_pattern(PatternMode::no_seq())
        }
    }
}
