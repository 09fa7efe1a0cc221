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

//! Expression parsing: the `expr`/`postfixExpr`/`simpleExpr` ladder,
//! blocks, case clauses, for-comprehensions, and literals.

use super::*;

impl ParserContext<'_> {
    /// Parses an expression at `location`; a placeholder boundary.
    pub(crate) fn parse_expr(&mut self, location: Location) -> Tree {
        self.with_placeholders(false, |p| p.parse_expr0(location))
    }

    /// Parses a local expression. The usual entry point.
    pub fn parse_expression(&mut self) -> Tree {
        self.parse_expr(Location::Local)
    }

    /// A statement in a block or template body.
    pub(crate) fn parse_statement(&mut self, location: Location) -> Tree {
        self.parse_expr(location)
    }

    fn parse_expr0(&mut self, location: Location) -> Tree {
        match self.token.token {
            Token::If => self.parse_if_expr(),
            Token::Try => self.parse_try_expr(),
            Token::While => self.parse_while_expr(),
            Token::Do => self.parse_do_expr(),
            Token::For => self.parse_for_expr(),
            Token::Return => {
                let start = self.skip_token();
                let expr = if self.is_expr_intro() {
                    self.parse_expr(Location::Local)
                } else {
                    self.builder().unit_literal(self.prev_token.span)
                };
                let span = Span::new(start, expr.span().hi.max(self.last_offset()));
                Tree::Return(Return { expr: Box::new(expr), span })
            }
            Token::Throw => {
                let start = self.skip_token();
                let expr = self.parse_expr(Location::Local);
                let span = Span::new(start, expr.span().hi);
                Tree::Throw(Throw { expr: Box::new(expr), span })
            }
            Token::Implicit => {
                let start = self.skip_token();
                self.parse_implicit_closure(start, location)
            }
            _ => self.parse_expr_rest(location),
        }
    }

    /// The postfix expression and its optional trailers: assignment,
    /// ascription, `match`, and function-literal arrows.
    fn parse_expr_rest(&mut self, location: Location) -> Tree {
        let mut t = self.parse_postfix_expr();
        match self.token.token {
            Token::Eq => {
                // Only a plain reference, selection, or application may be
                // assigned to; anything else keeps the expression as-is.
                if t.is_assignable() {
                    self.bump();
                    let rhs = self.parse_expr(Location::Local);
                    let span = t.span() + rhs.span();
                    t = Tree::Assign(Assign { lhs: Box::new(t), rhs: Box::new(rhs), span });
                }
            }
            Token::Colon => {
                t = self.builder().strip_parens(t);
                self.bump();
                if self.check(&Token::Underscore) {
                    let uscore_span = self.token.span;
                    self.bump();
                    if self.is_raw_ident(sym::star) {
                        self.bump();
                        let span = t.span() + self.prev_token.span;
                        t = Tree::Typed(Typed {
                            expr: Box::new(t),
                            tpt: Box::new(Tree::Ident(Ident::new(Name::type_(sym::WILDCARD_STAR), uscore_span))),
                            span,
                        });
                    } else {
                        let err = ParserError::unexpected(&self.token.token, "*", self.token.span);
                        self.syntax_error_or_incomplete(err, true);
                    }
                } else if self.is_annotation_intro() {
                    for annot in self.parse_annotations(false) {
                        let span = t.span() + annot.span();
                        t = Tree::Annotated(Annotated { annot: Box::new(annot), arg: Box::new(t), span });
                    }
                } else {
                    let tpt = self.parse_type_or_infix_type(location);
                    if self.is_wildcard_ref(&t) {
                        if let Some(param) = self.placeholder_params.last_mut() {
                            param.tpt = Box::new(tpt.clone());
                        }
                    }
                    let span = t.span() + tpt.span();
                    t = Tree::Typed(Typed { expr: Box::new(t), tpt: Box::new(tpt), span });
                }
            }
            Token::Match => {
                self.bump();
                let selector = self.builder().strip_parens(t);
                let cases = self.in_braces(|p| p.parse_case_clauses());
                let span = selector.span() + self.prev_token.span;
                t = Tree::Match(Match { selector: Box::new(selector), cases, span });
            }
            _ => {}
        }

        // Disambiguate function literals from self-type annotations: in a
        // template body only a parenthesised typed parameter list opens a
        // lambda.
        if self.check(&Token::Arrow) && (location != Location::InTemplate || self.lhs_is_typed_param_list(&t)) {
            self.bump();
            let params = self.convert_to_params(t);
            let body = if location != Location::InBlock {
                self.parse_expr(Location::Local)
            } else {
                self.parse_block()
            };
            let span = params.first().map(|p| p.span).unwrap_or(self.prev_token.span) + body.span();
            t = Tree::Function(Function { params, body: Box::new(body), span });
        }
        self.builder().strip_parens(t)
    }

    fn lhs_is_typed_param_list(&mut self, t: &Tree) -> bool {
        fn is_typed_param(t: &Tree) -> bool {
            matches!(t, Tree::Typed(typed) if matches!(&*typed.expr, Tree::Ident(_)))
        }
        match t {
            Tree::Parens(parens)
                if matches!(parens.exprs.as_slice(),
                    [Tree::Typed(typed)] if matches!(&*typed.expr, Tree::This(_))) =>
            {
                self.syntax_error(ParserError::not_a_legal_formal_parameter(t.span()), false);
                true
            }
            Tree::Parens(parens) => !parens.exprs.is_empty() && parens.exprs.iter().all(is_typed_param),
            _ => false,
        }
    }

    /// Converts a parsed expression into the parameters of a function
    /// literal, releasing any placeholder registered for the same name.
    pub(crate) fn convert_to_params(&mut self, t: Tree) -> Vec<ValDef> {
        match t {
            Tree::Parens(parens) => parens.exprs.into_iter().map(|e| self.convert_to_param(e)).collect(),
            t => vec![self.convert_to_param(t)],
        }
    }

    pub(crate) fn convert_to_param(&mut self, t: Tree) -> ValDef {
        let span = t.span();
        let mut remove_as_placeholder = |p: &mut Self, name: Name| {
            p.placeholder_params.retain(|vd| vd.name != name);
        };
        match t {
            Tree::Ident(id) => {
                remove_as_placeholder(self, id.name);
                self.builder().mk_param(id.name, Tree::Empty, span)
            }
            Tree::Typed(typed) => match *typed.expr {
                Tree::Ident(id) => {
                    remove_as_placeholder(self, id.name);
                    self.builder().mk_param(id.name, *typed.tpt, span)
                }
                _ => {
                    self.syntax_error(ParserError::not_a_legal_formal_parameter(span), false);
                    self.builder().mk_param(Name::term(sym::ERROR), Tree::Empty, span)
                }
            },
            _ => {
                self.syntax_error(ParserError::not_a_legal_formal_parameter(span), false);
                self.builder().mk_param(Name::term(sym::ERROR), Tree::Empty, span)
            }
        }
    }

    /// `implicit x => body` and `implicit x: T => body` closures.
    pub(crate) fn parse_implicit_closure(&mut self, start: BytePos, location: Location) -> Tree {
        let param_span = self.token.span;
        let name = self.ident_for_term();
        let tpt = if self.eat(&Token::Colon) { self.parse_type_or_infix_type(location) } else { Tree::Empty };
        let mut param = self.builder().mk_param(name, tpt, param_span);
        param.mods.flags |= Flags::IMPLICIT;
        self.accept(&Token::Arrow);
        let body = if location != Location::InBlock { self.parse_expr(Location::Local) } else { self.parse_block() };
        let span = Span::new(start, body.span().hi);
        Tree::Function(Function { params: vec![param], body: Box::new(body), span })
    }

    // ----- control-flow forms ---------------------------------------------

    /// A parenthesised condition. A missing `(` reports and yields an
    /// error tree rather than a made-up constant.
    fn parse_cond_expr(&mut self) -> Tree {
        if self.eat(&Token::LParen) {
            let r = self.parse_expr(Location::Local);
            self.accept(&Token::RParen);
            self.builder().strip_parens(r)
        } else {
            self.syntax_error(ParserError::missing_condition(self.token.span), false);
            self.accept(&Token::LParen);
            self.error_tree()
        }
    }

    fn parse_if_expr(&mut self) -> Tree {
        let start = self.skip_token();
        let cond = self.parse_cond_expr();
        self.newlines_opt();
        let thenp = self.parse_expr(Location::Local);
        let elsep = if self.eat(&Token::Else) { self.parse_expr(Location::Local) } else { Tree::Empty };
        let hi = if elsep.is_empty() { thenp.span().hi } else { elsep.span().hi };
        Tree::If(If {
            cond: Box::new(cond),
            thenp: Box::new(thenp),
            elsep: Box::new(elsep),
            span: Span::new(start, hi),
        })
    }

    fn parse_while_expr(&mut self) -> Tree {
        let start = self.skip_token();
        let cond = self.parse_cond_expr();
        self.newlines_opt();
        let body = self.parse_expr(Location::Local);
        let span = Span::new(start, body.span().hi);
        self.builder().mk_while(cond, body, span)
    }

    fn parse_do_expr(&mut self) -> Tree {
        let start = self.skip_token();
        let body = self.parse_expr(Location::Local);
        if self.token.token.is_stat_sep() {
            self.bump();
        }
        self.accept(&Token::While);
        let cond = self.parse_cond_expr();
        let span = Span::new(start, cond.span().hi.max(self.last_offset()));
        self.builder().mk_do_while(body, cond, span)
    }

    fn parse_try_expr(&mut self) -> Tree {
        let start = self.skip_token();
        let body = match self.token.token {
            Token::LBrace => self.in_braces(|p| {
                if p.check(&Token::RBrace) {
                    p.builder().unit_literal(p.token.span)
                } else {
                    p.parse_block()
                }
            }),
            Token::LParen => {
                let r = self.in_parens(|p| p.parse_expr(Location::Local));
                self.builder().strip_parens(r)
            }
            _ => self.parse_expr(Location::Local),
        };
        let catches = if self.eat(&Token::Catch) {
            if !self.check(&Token::LBrace) {
                let handler = self.parse_expr(Location::Local);
                vec![self.builder().mk_catch_from_expr(handler)]
            } else {
                self.in_braces(|p| {
                    if p.is_case_def_intro() {
                        p.parse_case_clauses()
                    } else {
                        let handler = p.parse_expr(Location::Local);
                        vec![p.builder().mk_catch_from_expr(handler)]
                    }
                })
            }
        } else {
            Vec::new()
        };
        let finalizer = if self.eat(&Token::Finally) { self.parse_expr(Location::Local) } else { Tree::Empty };
        let span = Span::new(start, self.last_offset());
        Tree::Try(Try { block: Box::new(body), catches, finalizer: Box::new(finalizer), span })
    }

    fn parse_for_expr(&mut self) -> Tree {
        let start = self.skip_token();
        let enums = if self.check(&Token::LBrace) {
            self.in_braces(|p| p.parse_enumerators())
        } else {
            self.in_parens(|p| p.parse_enumerators())
        };
        self.newlines_opt();
        let (is_yield, body) = if self.eat(&Token::Yield) {
            (true, self.parse_expr(Location::Local))
        } else {
            (false, self.parse_expr(Location::Local))
        };
        let span = Span::new(start, body.span().hi.max(self.last_offset()));
        self.builder().mk_for(enums, is_yield, body, span)
    }

    // ----- enumerators ----------------------------------------------------

    fn parse_enumerators(&mut self) -> Vec<Enumerator> {
        let mut enums = Vec::new();
        self.parse_generator(&mut enums, false);
        while self.token.token.is_stat_sep() {
            self.bump();
            if self.check(&Token::If) {
                let span = self.token.span;
                let cond = self.parse_guard();
                enums.push(Enumerator::Guard { cond, span });
            } else {
                self.parse_generator(&mut enums, true);
            }
        }
        enums
    }

    /// One enumerator: a generator `pat <- rhs`, an assignment `pat = rhs`
    /// (with `eq_ok`), or the deprecated `val pat = rhs` form, followed by
    /// any number of trailing guards.
    fn parse_generator(&mut self, enums: &mut Vec<Enumerator>, eq_ok: bool) {
        let start = self.offset();
        let has_val = self.eat(&Token::Val);
        let pat = self.parse_pattern1(PatternMode::no_seq());
        let has_eq = self.check(&Token::Eq);

        if has_val {
            if has_eq {
                if self.options.future {
                    self.deprecation_warning(ParserWarning::deprecated_val_in_for(self.token.span));
                }
            } else {
                self.syntax_error(ParserError::val_in_for_needs_assignment(self.token.span), false);
            }
        }

        if has_eq && eq_ok {
            self.bump();
        } else {
            self.accept(&Token::LArrow);
        }
        let rhs = self.parse_expr(Location::Local);
        let span = Span::new(start, rhs.span().hi);
        enums.push(self.builder().mk_generator(pat, has_eq && eq_ok, rhs, span));

        while self.check(&Token::If) {
            let span = self.token.span;
            let cond = self.parse_guard();
            enums.push(Enumerator::Guard { cond, span });
        }
    }

    /// `if postfixExpr` in cases and enumerators.
    pub(crate) fn parse_guard(&mut self) -> Tree {
        if self.eat(&Token::If) {
            let g = self.parse_postfix_expr();
            self.builder().strip_parens(g)
        } else {
            Tree::Empty
        }
    }

    // ----- case clauses ---------------------------------------------------

    pub(crate) fn parse_case_clauses(&mut self) -> Vec<CaseDef> {
        let mut cases = Vec::new();
        while self.is_case_def_intro() {
            cases.push(self.parse_case_clause());
        }
        if cases.is_empty() {
            let err = ParserError::unexpected(&self.token.token, Token::Case, self.token.span);
            self.syntax_error_or_incomplete(err, true);
        }
        cases
    }

    fn parse_case_clause(&mut self) -> CaseDef {
        let start = self.accept(&Token::Case);
        let pat = self.parse_pattern(PatternMode::no_seq());
        let guard = self.parse_guard();
        self.accept(&Token::Arrow);
        let body = self.parse_block();
        let span = start + body.span();
        CaseDef { pat: Box::new(pat), guard: Box::new(guard), body: Box::new(body), span }
    }

    // ----- blocks ---------------------------------------------------------

    /// `{ … }`: either a block or a sequence of cases (a partial-function
    /// literal, represented as a selector-less match).
    pub(crate) fn parse_block_expr(&mut self) -> Tree {
        let start = self.offset();
        self.check_no_escaping_placeholders(|p| {
            p.in_braces(|p| {
                if p.is_case_def_intro() {
                    let cases = p.parse_case_clauses();
                    let span = Span::new(start, p.token.span.hi);
                    Tree::Match(Match { selector: Box::new(Tree::Empty), cases, span })
                } else {
                    p.parse_block()
                }
            })
        })
    }

    /// The statements inside braces; the caller handles the braces.
    pub(crate) fn parse_block(&mut self) -> Tree {
        let start = self.offset();
        let stats = self.parse_block_stat_seq();
        let span = Span::new(start, self.last_offset());
        self.builder().mk_block(stats, span)
    }

    pub(crate) fn parse_block_stat_seq(&mut self) -> Vec<Tree> {
        let mut stats = Vec::new();
        while !self.is_case_def_end() {
            if self.check(&Token::Import) {
                stats.extend(self.parse_import_clause());
                self.accept_stat_sep_opt();
            } else if self.is_def_intro() || self.token.token.is_local_modifier() || self.is_annotation_intro() {
                if self.check(&Token::Implicit) {
                    let start = self.skip_token();
                    if self.is_ident() {
                        stats.push(self.parse_implicit_closure(start, Location::InBlock));
                    } else {
                        stats.extend(self.parse_local_def(Flags::IMPLICIT));
                    }
                } else {
                    stats.extend(self.parse_local_def(Flags::empty()));
                }
                self.accept_stat_sep_opt();
            } else if self.is_expr_intro() {
                stats.push(self.parse_statement(Location::InBlock));
                if !self.is_case_def_end() {
                    self.accept_stat_sep();
                }
            } else if self.token.token.is_stat_sep() {
                self.bump();
            } else {
                let err = ParserError::illegal_start_of_statement(&self.token.token, self.token.span);
                self.syntax_error_or_incomplete(err, true);
                if !self.has_next() {
                    break;
                }
            }
        }
        stats
    }

    // ----- the infix/prefix/simple ladder ---------------------------------

    /// Reduces the operator stack against the current token: an incoming
    /// identifier supplies its precedence, anything else flushes the stack.
    fn reduce_expr_stack(&mut self, is_expr: bool, base: usize, top: Tree) -> Tree {
        let (prec, left_assoc) = if self.is_ident() {
            let name = Name::term(self.name());
            (precedence(name), !name.is_right_assoc_operator())
        } else {
            (0, true)
        };
        let offset = self.offset();
        self.reduce_stack(is_expr, base, top, prec, left_assoc, offset)
    }

    /// The infix layer. Identifiers become operators; a dangling operator
    /// with no operand becomes a postfix selection.
    pub(crate) fn parse_postfix_expr(&mut self) -> Tree {
        let start = self.offset();
        let base = self.opstack.len();
        let mut top = self.parse_prefix_expr();

        while self.is_ident() {
            top = self.reduce_expr_stack(true, base, top);
            let op_name = Name::term(self.name());
            let op_offset = self.offset();
            self.bump();
            let targs = if self.check(&Token::LBracket) { self.parse_expr_type_args() } else { Vec::new() };
            let lhs = std::mem::take(&mut top);
            self.push_op_info(lhs, op_name, targs, op_offset);
            self.newline_opt_when_following(|t| t.can_begin_expr());

            if self.is_expr_intro() {
                top = self.parse_prefix_expr();
            } else {
                // Postfix: reduce what is on the stack and select.
                let op_info = self.opstack.pop().expect("operator stack underflow");
                if !op_info.targs.is_empty() {
                    let span = Span::new(op_info.offset, op_info.offset);
                    self.syntax_error(ParserError::type_application_on_postfix(span), false);
                }
                let od = self.reduce_expr_stack(true, base, op_info.lhs);
                let od = self.builder().strip_parens(od);
                let span = Span::new(start, op_info.offset);
                return Tree::Select(Select { qualifier: Box::new(od), name: op_info.operator, span });
            }
        }
        self.reduce_expr_stack(true, base, top)
    }

    fn is_unary_op(&self) -> bool {
        matches!(&self.token.token, Token::Ident(name, false)
            if [sym::plus, sym::minus, sym::bang, sym::tilde].contains(name))
    }

    fn is_numeric_lit(&self) -> bool {
        matches!(
            self.token.token,
            Token::IntLit(_) | Token::LongLit(_) | Token::FloatLit(_) | Token::DoubleLit(_)
        )
    }

    fn is_simple_expr_intro(&self) -> bool {
        self.token.token.is_literal()
            || self.is_ident()
            || matches!(
                self.token.token,
                Token::This | Token::Super | Token::LParen | Token::LBrace | Token::Underscore | Token::New | Token::XmlStart
            )
    }

    /// Prefix operators `+ - ~ !`; a unary minus on a numeric literal is
    /// folded into the literal.
    fn parse_prefix_expr(&mut self) -> Tree {
        if self.is_unary_op() && self.looking_ahead(|p| p.is_simple_expr_intro()) {
            let start = self.token.span;
            let name = self.name();
            self.bump();
            if name == sym::minus && self.is_numeric_lit() {
                let lit = self.parse_literal(true);
                return self.parse_simple_expr_rest(lit, true);
            }
            let operand = self.parse_simple_expr();
            let operand = self.builder().strip_parens(operand);
            let uname = match name {
                s if s == sym::plus => sym::unary_plus,
                s if s == sym::minus => sym::unary_minus,
                s if s == sym::bang => sym::unary_bang,
                _ => sym::unary_tilde,
            };
            let span = start + operand.span();
            return Tree::Select(Select { qualifier: Box::new(operand), name: Name::term(uname), span });
        }
        self.parse_simple_expr()
    }

    fn parse_simple_expr(&mut self) -> Tree {
        let mut can_apply = true;
        let t = if self.check(&Token::XmlStart) {
            self.parse_xml_literal()
        } else if self.is_ident() || self.check(&Token::This) || self.check(&Token::Super) {
            self.parse_path(true, false)
        } else if self.token.token.is_literal() {
            self.parse_literal(false)
        } else if self.check(&Token::Underscore) {
            self.fresh_placeholder()
        } else if self.check(&Token::LParen) {
            let start = self.token.span;
            let exprs = self.in_parens(|p| {
                if p.check(&Token::RParen) {
                    Vec::new()
                } else {
                    p.comma_separated(|p| p.parse_expr(Location::Local))
                }
            });
            Tree::Parens(Parens { exprs, span: start + self.prev_token.span })
        } else if self.check(&Token::LBrace) {
            can_apply = false;
            self.parse_block_expr()
        } else if self.check(&Token::New) {
            can_apply = false;
            let start = self.skip_token();
            let (parents, self_decl, stats) = self.parse_template_parts();
            let span = Span::new(start, self.last_offset());
            self.builder().mk_new(parents, self_decl, stats, span)
        } else {
            let err = ParserError::illegal_start_of_simple_expression(&self.token.token, self.token.span);
            self.syntax_error_or_incomplete(err, true);
            self.error_tree()
        };
        self.parse_simple_expr_rest(t, can_apply)
    }

    /// An `_` placeholder: registers a synthetic parameter and yields a
    /// reference to it.
    fn fresh_placeholder(&mut self) -> Tree {
        let span = self.token.span;
        self.bump();
        let pname = Name::term(self.fresh.fresh("x$"));
        let param = self.builder().mk_synthetic_param(pname, span);
        self.placeholder_params.push(param);
        Tree::Ident(Ident::new(pname, span))
    }

    pub(crate) fn parse_simple_expr_rest(&mut self, t: Tree, can_apply: bool) -> Tree {
        if can_apply {
            self.newline_opt_when_followed_by(&Token::LBrace);
        }
        match self.token.token {
            Token::Dot => {
                self.bump();
                let stripped = self.builder().strip_parens(t);
                let sel = self.parse_selector(stripped);
                self.parse_simple_expr_rest(sel, true)
            }
            Token::LBracket => match t {
                Tree::Ident(_) | Tree::Select(_) | Tree::Apply(_) => {
                    let mut app = t;
                    while self.check(&Token::LBracket) {
                        let args = self.parse_expr_type_args();
                        let span = app.span() + self.prev_token.span;
                        app = Tree::TypeApply(TypeApply { fun: Box::new(app), args, span });
                    }
                    self.parse_simple_expr_rest(app, true)
                }
                t => t,
            },
            Token::LParen | Token::LBrace if can_apply => {
                let args = self.parse_argument_exprs();
                let span = t.span() + self.prev_token.span;
                let app = Tree::Apply(Apply { fun: Box::new(t), args, span });
                self.parse_simple_expr_rest(app, true)
            }
            Token::Underscore => {
                // Eta expansion: `f _`.
                self.bump();
                let stripped = self.builder().strip_parens(t);
                let span = stripped.span() + self.prev_token.span;
                Tree::Typed(Typed {
                    expr: Box::new(stripped),
                    tpt: Box::new(Tree::Function(Function {
                        params: vec![],
                        body: Box::new(Tree::Empty),
                        span: self.prev_token.span,
                    })),
                    span,
                })
            }
            _ => t,
        }
    }

    /// An argument list: parenthesised comma-separated expressions (with
    /// named-argument rewriting) or a single brace block.
    pub(crate) fn parse_argument_exprs(&mut self) -> Vec<Tree> {
        fn to_maybe_named_arg(e: Tree) -> Tree {
            match e {
                Tree::Assign(assign) if matches!(&*assign.lhs, Tree::Ident(_)) => {
                    Tree::NamedArg(NamedArg { lhs: assign.lhs, rhs: assign.rhs, span: assign.span })
                }
                e => e,
            }
        }
        if self.check(&Token::LBrace) {
            vec![self.parse_block_expr()]
        } else {
            self.in_parens(|p| {
                if p.check(&Token::RParen) {
                    Vec::new()
                } else {
                    p.comma_separated(|p| to_maybe_named_arg(p.parse_expr(Location::Local)))
                }
            })
        }
    }

    /// Consecutive parenthesised argument lists.
    pub(crate) fn parse_multiple_argument_exprs(&mut self) -> Vec<Vec<Tree>> {
        let mut argss = Vec::new();
        while self.check(&Token::LParen) {
            argss.push(self.parse_argument_exprs());
        }
        argss
    }

    /// Type arguments in expression position.
    pub(crate) fn parse_expr_type_args(&mut self) -> Vec<Tree> {
        self.in_brackets(|p| p.comma_separated(|p| p.parse_type()))
    }

    // ----- paths ----------------------------------------------------------

    /// A path: `ident`, `a.b.c`, `this`, `C.this`, `super[M].x`, and with
    /// `type_ok` also `path.type` singleton types.
    pub(crate) fn parse_path(&mut self, this_ok: bool, type_ok: bool) -> Tree {
        let start = self.token.span;
        if self.eat(&Token::This) {
            let mut t = Tree::This(This { qual: Name::type_(sym::EMPTY), span: start });
            if !this_ok || self.check(&Token::Dot) {
                self.accept(&Token::Dot);
                t = self.parse_selectors(t, type_ok);
            }
            t
        } else if self.check(&Token::Super) {
            self.parse_super_path(Name::type_(sym::EMPTY), start, type_ok)
        } else {
            let backquoted = matches!(self.token.token, Token::Ident(_, true));
            let name = self.ident();
            let mut t = Tree::Ident(Ident {
                name: Name::term(name),
                is_backquoted: backquoted,
                span: self.prev_token.span,
            });
            if self.check(&Token::Dot) {
                self.bump();
                if self.eat(&Token::This) {
                    let mut t2 = Tree::This(This { qual: Name::type_(name), span: start + self.prev_token.span });
                    if !this_ok || self.check(&Token::Dot) {
                        self.accept(&Token::Dot);
                        t2 = self.parse_selectors(t2, type_ok);
                    }
                    t = t2;
                } else if self.check(&Token::Super) {
                    t = self.parse_super_path(Name::type_(name), start, type_ok);
                } else {
                    t = self.parse_selectors(t, type_ok);
                }
            }
            t
        }
    }

    fn parse_super_path(&mut self, qual: Name, start: Span, type_ok: bool) -> Tree {
        self.accept(&Token::Super);
        let mix = self.parse_mixin_qualifier_opt();
        let this_tree = Tree::This(This { qual, span: start });
        let mut t = Tree::Super(Super { qual: Box::new(this_tree), mix, span: start + self.prev_token.span });
        self.accept(&Token::Dot);
        t = self.parse_selector(t);
        if self.eat(&Token::Dot) {
            t = self.parse_selectors(t, type_ok);
        }
        t
    }

    fn parse_selectors(&mut self, t: Tree, type_ok: bool) -> Tree {
        if type_ok && self.check(&Token::Type) {
            self.bump();
            let span = t.span() + self.prev_token.span;
            Tree::SingletonType(SingletonType { ref_: Box::new(t), span })
        } else {
            let t1 = self.parse_selector(t);
            if self.eat(&Token::Dot) {
                self.parse_selectors(t1, type_ok)
            } else {
                t1
            }
        }
    }

    pub(crate) fn parse_selector(&mut self, t: Tree) -> Tree {
        let name = self.ident_for_term();
        let span = t.span() + self.prev_token.span;
        Tree::Select(Select { qualifier: Box::new(t), name, span })
    }

    fn parse_mixin_qualifier_opt(&mut self) -> Name {
        if self.check(&Token::LBracket) {
            self.in_brackets(|p| p.ident_for_type())
        } else {
            Name::type_(sym::EMPTY)
        }
    }

    /// A stable identifier: a path without `this` at the end.
    pub(crate) fn parse_stable_id(&mut self) -> Tree {
        self.parse_path(false, false)
    }

    // ----- literals -------------------------------------------------------

    /// The markup hook; the embedded sub-parser is an external extension
    /// point, so a markup token is an error here.
    pub(crate) fn parse_xml_literal(&mut self) -> Tree {
        let span = self.token.span;
        self.syntax_error(ParserError::markup_not_supported(span), false);
        self.bump();
        Tree::Error(ErrorTree { span })
    }

    /// Like [`parse_xml_literal`], in pattern position.
    pub(crate) fn parse_xml_literal_pattern(&mut self) -> Tree {
        self.parse_xml_literal()
    }

    fn int_constant(&mut self, text: &str, negated: bool, long: bool, span: Span) -> Constant {
        let (radix, digits) = if let Some(hex) = text.strip_prefix("0x") { (16, hex) } else { (10, text) };
        let Ok(value) = u64::from_str_radix(digits, radix) else {
            self.syntax_error(ParserError::malformed_literal(text, span), false);
            return if long { Constant::Long(0) } else { Constant::Int(0) };
        };
        if long {
            let in_range = if negated { value <= (i64::MAX as u64) + 1 } else { value <= i64::MAX as u64 };
            if !in_range && !(radix == 16 && !negated) {
                self.syntax_error(ParserError::malformed_literal(text, span), false);
                return Constant::Long(0);
            }
            let v = if negated { (value as i128).wrapping_neg() as i64 } else { value as i64 };
            Constant::Long(v)
        } else {
            let in_range = if negated {
                value <= (i32::MAX as u64) + 1
            } else {
                value <= i32::MAX as u64 || (radix == 16 && value <= u32::MAX as u64)
            };
            if !in_range {
                self.syntax_error(ParserError::malformed_literal(text, span), false);
                return Constant::Int(0);
            }
            let v = if negated { (value as i64).wrapping_neg() as i32 } else { value as i32 };
            Constant::Int(v)
        }
    }

    /// A literal token, with interpolated strings delegated.
    pub(crate) fn parse_literal(&mut self, negated: bool) -> Tree {
        if matches!(self.token.token, Token::InterpolationId(_)) {
            return self.with_placeholders(true, |p| p.parse_interpolated_string(false));
        }
        let span = self.token.span;
        let token = self.token.token.clone();
        self.bump();
        let value = match token {
            Token::IntLit(text) => self.int_constant(&text, negated, false, span),
            Token::LongLit(text) => self.int_constant(&text, negated, true, span),
            Token::FloatLit(text) => match text.parse::<f32>() {
                Ok(v) => Constant::Float(if negated { -v } else { v }),
                Err(_) => {
                    self.syntax_error(ParserError::malformed_literal(&text, span), false);
                    Constant::Float(0.0)
                }
            },
            Token::DoubleLit(text) => match text.parse::<f64>() {
                Ok(v) => Constant::Double(if negated { -v } else { v }),
                Err(_) => {
                    self.syntax_error(ParserError::malformed_literal(&text, span), false);
                    Constant::Double(0.0)
                }
            },
            Token::CharLit(c) => Constant::Char(c),
            Token::StringLit(s) => Constant::String(s),
            Token::SymbolLit(s) => Constant::Symbol(s),
            Token::True => Constant::Bool(true),
            Token::False => Constant::Bool(false),
            Token::Null => Constant::Null,
            token => {
                let err = ParserError::illegal_start_of_simple_expression(&token, span);
                self.syntax_error_or_incomplete(err, false);
                return Tree::Error(ErrorTree { span });
            }
        };
        Tree::Literal(Literal { value, span })
    }

    /// An interpolated string `id"part${expr}part"`, desugared to a
    /// `StringContext` application. The caller supplies the placeholder
    /// boundary.
    pub(crate) fn parse_interpolated_string(&mut self, in_pattern: bool) -> Tree {
        let start = self.token.span;
        let interpolator = self.name();
        self.bump();
        let mut parts = Vec::new();
        let mut exprs = Vec::new();
        while let Token::StringPart(s) = &self.token.token {
            let part_span = self.token.span;
            parts.push(Tree::Literal(Literal { value: Constant::String(s.clone()), span: part_span }));
            self.bump();
            if in_pattern {
                exprs.push(self.parse_drop_any_braces_pattern());
            } else if self.is_ident() {
                let name = self.ident_for_term();
                exprs.push(Tree::Ident(Ident::new(name, self.prev_token.span)));
            } else if self.check(&Token::This) {
                let span = self.token.span;
                self.bump();
                exprs.push(Tree::This(This { qual: Name::type_(sym::EMPTY), span }));
            } else if self.check(&Token::LBrace) {
                exprs.push(self.parse_expr(Location::Local));
            } else {
                let err = ParserError::illegal_start_of_simple_expression(&self.token.token, self.token.span);
                self.syntax_error_or_incomplete(err, true);
                exprs.push(self.error_tree());
            }
        }
        if let Token::StringLit(s) = &self.token.token {
            parts.push(Tree::Literal(Literal { value: Constant::String(s.clone()), span: self.token.span }));
            self.bump();
        }
        let span = start + self.prev_token.span;
        self.builder().mk_string_interpolation(interpolator, parts, exprs, span)
    }
}
