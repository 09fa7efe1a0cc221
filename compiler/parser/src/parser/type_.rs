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

//! Type parsing. The grammar is context-sensitive in one spot: type
//! arguments inside patterns may bind type variables, so the functions
//! carry a [`TypeMode`].

use super::*;

/// Whether types are being parsed in ordinary or pattern position.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum TypeMode {
    Normal,
    Pattern,
}

impl ParserContext<'_> {
    /// `Type ::= InfixType (`=>` Type | forSome Refinement)?`,
    /// plus the parenthesised tuple/function disambiguation.
    pub(crate) fn parse_type(&mut self) -> Tree {
        self.parse_typ(TypeMode::Normal)
    }

    pub(crate) fn parse_typ(&mut self, mode: TypeMode) -> Tree {
        self.placeholder_type_boundary(|p| {
            let start = p.token.span;
            let t = if p.check(&Token::LParen) {
                p.parse_tuple_infix_type(mode, start)
            } else {
                let t = p.parse_compound_type(mode);
                p.parse_infix_type_rest(t, mode)
            };
            match p.token.token {
                Token::Arrow => {
                    p.bump();
                    let result = p.parse_typ(mode);
                    let span = start + result.span();
                    p.builder().mk_function_type(vec![t], result, span)
                }
                Token::ForSome => {
                    p.bump();
                    p.parse_existential_rest(t)
                }
                _ => t,
            }
        })
    }

    /// After `(`: either a function type `(T, U) => R` (whose argument
    /// types may be by-name or repeated) or a tuple type continuing as an
    /// ordinary simple type.
    fn parse_tuple_infix_type(&mut self, mode: TypeMode, start: Span) -> Tree {
        self.bump();
        if self.eat(&Token::RParen) {
            self.accept(&Token::Arrow);
            let result = self.parse_typ(mode);
            let span = start + result.span();
            return self.builder().mk_function_type(vec![], result, span);
        }
        let ts = self.comma_separated(|p| p.parse_function_arg_type(mode));
        self.accept(&Token::RParen);
        if self.eat(&Token::Arrow) {
            let result = self.parse_typ(mode);
            let span = start + result.span();
            self.builder().mk_function_type(ts, result, span)
        } else {
            for t in &ts {
                self.check_not_by_name_or_varargs(t);
            }
            let span = start + self.prev_token.span;
            let tuple = self.builder().mk_tuple_type(ts, span);
            let t = self.parse_simple_type_rest(tuple, mode);
            let t = self.parse_annot_type_rest(t);
            let t = self.parse_compound_type_rest(t, mode);
            self.parse_infix_type_rest(t, mode)
        }
    }

    /// `InfixType ::= CompoundType (id [nl] CompoundType)*`.
    pub(crate) fn parse_infix_type(&mut self, mode: TypeMode) -> Tree {
        self.placeholder_type_boundary(|p| {
            let t = p.parse_compound_type(mode);
            p.parse_infix_type_rest(t, mode)
        })
    }

    /// Folds a run of type-operator applications using the spelling-derived
    /// precedence and associativity. A raw `*` ends the run (it belongs to
    /// repeated-parameter syntax).
    fn parse_infix_type_rest(&mut self, first: Tree, mode: TypeMode) -> Tree {
        fn reduce(stack: &mut Vec<(Tree, Name, Span)>, mut top: Tree, prec: i32, left_assoc: bool) -> Tree {
            while let Some((_, op, _)) = stack.last() {
                let top_prec = precedence(*op);
                if top_prec > prec || (top_prec == prec && left_assoc) {
                    let (lhs, op, op_span) = stack.pop().unwrap();
                    let span = lhs.span() + top.span();
                    top = Tree::AppliedType(AppliedType {
                        tpt: Box::new(Tree::Ident(Ident::new(op, op_span))),
                        args: vec![lhs, top],
                        span,
                    });
                } else {
                    break;
                }
            }
            top
        }

        let mut stack: Vec<(Tree, Name, Span)> = Vec::new();
        let mut top = first;
        while self.is_ident() && !self.is_raw_ident(sym::star) {
            let op = Name::type_(self.name());
            let op_span = self.token.span;
            let prec = precedence(op);
            let left_assoc = !op.is_right_assoc_operator();
            if let Some((_, top_op, _)) = stack.last() {
                if precedence(*top_op) == prec
                    && top_op.is_right_assoc_operator() != op.is_right_assoc_operator()
                {
                    self.syntax_error(ParserError::mixed_associativity(op_span), false);
                }
            }
            let reduced = reduce(&mut stack, top, prec, left_assoc);
            self.bump();
            self.newline_opt_when_following(|t| t.can_begin_type());
            let operand = self.parse_compound_type(mode);
            stack.push((reduced, op, op_span));
            top = operand;
        }
        reduce(&mut stack, top, 0, true)
    }

    /// `CompoundType ::= AnnotType (with AnnotType)* Refinement?`;
    /// a leading `{` makes a parentless refinement.
    pub(crate) fn parse_compound_type(&mut self, mode: TypeMode) -> Tree {
        let t = if self.check(&Token::LBrace) { Tree::Empty } else { self.parse_annot_type(mode) };
        self.parse_compound_type_rest(t, mode)
    }

    fn parse_compound_type_rest(&mut self, t: Tree, mode: TypeMode) -> Tree {
        let start = if t.is_empty() { self.token.span } else { t.span() };
        let mut ts = Vec::new();
        if !t.is_empty() {
            ts.push(t);
        }
        while self.eat(&Token::With) {
            ts.push(self.parse_annot_type(mode));
        }
        self.newline_opt_when_followed_by(&Token::LBrace);
        if self.check(&Token::LBrace) {
            // A brace body after the return type of a procedure-looking
            // definition is usually a missing `=`, not a refinement.
            if self.in_fun_return_type
                && matches!(ts.as_slice(), [parent] if parent.is_ident_named(Name::type_(sym::Unit)))
            {
                self.warning(ParserWarning::apparent_unit_refinement(self.token.span));
            }
            let body = self.parse_refinement();
            let span = start + self.prev_token.span;
            Tree::CompoundType(CompoundType {
                templ: Template { parents: ts, self_decl: None, body, span },
                span,
            })
        } else if ts.len() == 1 {
            ts.pop().unwrap()
        } else {
            let span = start + self.prev_token.span;
            Tree::CompoundType(CompoundType {
                templ: Template { parents: ts, self_decl: None, body: vec![], span },
                span,
            })
        }
    }

    /// `AnnotType ::= SimpleType Annotation*`.
    pub(crate) fn parse_annot_type(&mut self, mode: TypeMode) -> Tree {
        self.placeholder_type_boundary(|p| {
            let t = p.parse_simple_type(mode);
            p.parse_annot_type_rest(t)
        })
    }

    pub(crate) fn parse_annot_type_rest(&mut self, t: Tree) -> Tree {
        let annots = self.parse_annotations(false);
        annots.into_iter().fold(t, |t, annot| {
            let span = t.span() + annot.span();
            Tree::Annotated(Annotated { annot: Box::new(annot), arg: Box::new(t), span })
        })
    }

    /// `SimpleType ::= (Types) | _ Bounds | Path[.type] | SimpleType [Args] | SimpleType # id`.
    pub(crate) fn parse_simple_type(&mut self, mode: TypeMode) -> Tree {
        let start = self.token.span;
        let t = if self.check(&Token::LParen) {
            let types = self.in_parens(|p| p.parse_types(mode));
            self.builder().mk_tuple_type(types, start + self.prev_token.span)
        } else if self.check(&Token::Underscore) {
            let start_pos = self.skip_token();
            self.parse_wildcard_type(start_pos)
        } else {
            let path = self.parse_path(false, true);
            match path {
                singleton @ Tree::SingletonType(_) => singleton,
                p => convert_to_type_id(p),
            }
        };
        self.parse_simple_type_rest(t, mode)
    }

    fn parse_simple_type_rest(&mut self, t: Tree, mode: TypeMode) -> Tree {
        if self.check(&Token::Hash) {
            self.bump();
            let name = self.ident_for_type();
            let span = t.span() + self.prev_token.span;
            let projection = Tree::SelectFromType(SelectFromType { qualifier: Box::new(t), name, span });
            self.parse_simple_type_rest(projection, mode)
        } else if self.check(&Token::LBracket) {
            let args = self.parse_type_args(mode);
            let span = t.span() + self.prev_token.span;
            let applied = Tree::AppliedType(AppliedType { tpt: Box::new(t), args, span });
            self.parse_simple_type_rest(applied, mode)
        } else {
            t
        }
    }

    /// Comma-separated types; argument behaviour depends on the mode.
    pub(crate) fn parse_types(&mut self, mode: TypeMode) -> Vec<Tree> {
        self.comma_separated(|p| p.parse_arg_type(mode))
    }

    /// Bracketed type arguments.
    pub(crate) fn parse_type_args(&mut self, mode: TypeMode) -> Vec<Tree> {
        self.in_brackets(|p| p.parse_types(mode))
    }

    /// A type argument. In pattern mode, a wildcard becomes either a
    /// bounded existential wildcard (when bounds follow) or a type-variable
    /// binder, and a lower-case identifier binds a type variable.
    fn parse_arg_type(&mut self, mode: TypeMode) -> Tree {
        match mode {
            TypeMode::Normal => self.parse_typ(mode),
            TypeMode::Pattern => {
                if self.check(&Token::Underscore) {
                    let start = self.token.span;
                    let start_pos = self.skip_token();
                    if self.check(&Token::Subtype) || self.check(&Token::Supertype) {
                        self.parse_wildcard_type(start_pos)
                    } else {
                        Tree::Bind(Bind {
                            name: Name::type_(sym::USCORE),
                            body: Box::new(Tree::Empty),
                            span: start,
                        })
                    }
                } else if self.is_ident() && Name::type_(self.name()).is_variable_name() {
                    let name = self.ident_for_type();
                    Tree::Bind(Bind { name, body: Box::new(Tree::Empty), span: self.prev_token.span })
                } else {
                    self.parse_typ(mode)
                }
            }
        }
    }

    fn parse_function_arg_type(&mut self, mode: TypeMode) -> Tree {
        match mode {
            TypeMode::Normal => self.parse_param_type(),
            TypeMode::Pattern => self.parse_arg_type(mode),
        }
    }

    /// A parameter type: `=> T` by-name, `T*` repeated, or plain.
    pub(crate) fn parse_param_type(&mut self) -> Tree {
        let start = self.token.span;
        if self.eat(&Token::Arrow) {
            let t = self.parse_type();
            let span = start + t.span();
            self.builder().by_name_application(t, span)
        } else {
            let t = self.parse_type();
            if self.is_raw_ident(sym::star) {
                self.bump();
                let span = t.span() + self.prev_token.span;
                self.builder().repeated_application(t, span)
            } else {
                t
            }
        }
    }

    /// By-name and repeated types are parameter-only syntax.
    pub(crate) fn check_not_by_name_or_varargs(&mut self, t: &Tree) {
        if self.builder().is_by_name_param_type(t) {
            self.syntax_error(ParserError::by_name_type_not_allowed(t.span()), false);
        } else if self.builder().is_repeated_param_type(t) {
            self.syntax_error(ParserError::repeated_type_not_allowed(t.span()), false);
        }
    }

    /// A `_` wildcard type with optional bounds: registers a synthetic
    /// existential type parameter and refers to it.
    pub(crate) fn parse_wildcard_type(&mut self, start: BytePos) -> Tree {
        let pname = Name::type_(self.fresh.fresh("_$"));
        let bounds = self.parse_type_bounds();
        let span = Span::new(start, self.last_offset());
        let param = TypeDef {
            mods: Modifiers::empty().with_flag(Flags::PARAM | Flags::DEFERRED | Flags::SYNTHETIC),
            name: pname,
            tparams: vec![],
            rhs: Box::new(bounds),
            span,
        };
        self.placeholder_types.push(param);
        Tree::Ident(Ident::new(pname, span))
    }

    /// `>: Lo <: Hi` with both bounds optional.
    pub(crate) fn parse_type_bounds(&mut self) -> Tree {
        let start = self.token.span;
        let lo = self.parse_bound(&Token::Supertype);
        let hi = self.parse_bound(&Token::Subtype);
        let span = if lo.is_empty() && hi.is_empty() {
            Span::new(start.lo, start.lo)
        } else {
            start + self.prev_token.span
        };
        Tree::TypeBounds(TypeBounds { lo: Box::new(lo), hi: Box::new(hi), span })
    }

    fn parse_bound(&mut self, tok: &Token) -> Tree {
        if self.eat(tok) {
            self.parse_type()
        } else {
            Tree::Empty
        }
    }

    /// The `forSome { … }` tail of an existential type. Only type members
    /// and immutable value declarations are legal clauses.
    fn parse_existential_rest(&mut self, t: Tree) -> Tree {
        let clauses = self.parse_refinement();
        let mut dcls = Vec::new();
        for clause in clauses {
            match clause {
                td @ Tree::TypeDef(_) => dcls.push(td),
                Tree::ValDef(vd) if !vd.mods.has(Flags::MUTABLE) => dcls.push(Tree::ValDef(vd)),
                Tree::Empty => {}
                other => {
                    self.syntax_error(ParserError::not_a_legal_existential_clause(other.span()), false);
                }
            }
        }
        let span = t.span() + self.prev_token.span;
        Tree::ExistentialType(ExistentialType { tpt: Box::new(t), clauses: dcls, span })
    }

    /// `{ Dcl … }`; placeholders may not escape a refinement.
    pub(crate) fn parse_refinement(&mut self) -> Vec<Tree> {
        self.check_no_escaping_placeholders(|p| p.in_braces(|p| p.parse_refine_stat_seq()))
    }

    fn parse_refine_stat_seq(&mut self) -> Vec<Tree> {
        let mut stats = Vec::new();
        while !self.is_stat_seq_end() {
            if self.token.token.is_dcl_intro() {
                stats.extend(self.parse_def_or_dcl(Modifiers::empty()));
            } else if !self.token.token.is_stat_sep() {
                let err = ParserError::illegal_start_of_declaration(&self.token.token, self.token.span);
                self.syntax_error_or_incomplete(err, true);
                if !self.has_next() {
                    break;
                }
            }
            if !self.check(&Token::RBrace) && self.has_next() {
                self.accept_stat_sep();
            }
        }
        stats
    }

    /// A full type locally; only an infix type where `=>` would be
    /// ambiguous (ascriptions in blocks and templates).
    pub(crate) fn parse_type_or_infix_type(&mut self, location: Location) -> Tree {
        if location == Location::Local {
            self.parse_type()
        } else {
            self.parse_infix_type(TypeMode::Normal)
        }
    }
}

/// Moves a term path into the type namespace.
pub(crate) fn convert_to_type_id(t: Tree) -> Tree {
    match t {
        Tree::Ident(mut id) => {
            id.name = id.name.to_type();
            Tree::Ident(id)
        }
        Tree::Select(mut select) => {
            select.name = select.name.to_type();
            Tree::Select(select)
        }
        t => t,
    }
}
