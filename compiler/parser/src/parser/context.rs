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

use super::*;

use std::mem;

/// Stores a compilation unit in tokenized format plus additional context.
/// May be converted into a [`Tree`] AST by parsing all tokens.
pub struct ParserContext<'a> {
    /// Handler used to side-channel emit errors from the parser.
    pub(crate) handler: &'a Handler,
    /// Feature toggles.
    pub(crate) options: ParserOptions,
    /// The fresh-name source the desugarings draw from.
    pub(crate) fresh: FreshNameSource,
    /// All tokens of the unit, in source order.
    tokens: Vec<SpannedToken>,
    /// Index into `tokens` of the token after the current one.
    pos: usize,
    /// The current token.
    pub(crate) token: SpannedToken,
    /// The previous token.
    pub(crate) prev_token: SpannedToken,

    /// The highest offset an error has been reported at; errors at or
    /// before it are cascade noise and get dropped.
    last_error_offset: Option<BytePos>,
    /// Closing delimiters assumed present during recovery,
    /// indexed `) ] }`.
    assumed_closing: [usize; 3],

    /// Synthetic parameters for `_` placeholders, in source order.
    pub(crate) placeholder_params: Vec<ValDef>,
    /// Synthetic type parameters for `_` wildcard types, in source order.
    pub(crate) placeholder_types: Vec<TypeDef>,
    /// Set while parsing the return type of a function definition.
    pub(crate) in_fun_return_type: bool,

    /// The pending-operand stack of the precedence engine.
    pub(crate) opstack: Vec<OpInfo>,

    /// Context bounds of the enclosing class's type parameters, copied
    /// into auxiliary constructors.
    pub(crate) class_context_bounds: Vec<Tree>,

    /// Whether this unit is inside the root `vela` package; value-class
    /// sources there get a synthetic constructor.
    pub(crate) in_vela_package: bool,
    /// The dotted path of the enclosing packages.
    pub(crate) current_package: String,
}

/// A saved scanner position that can later be restored.
#[derive(Clone)]
pub(crate) struct ScannerSnapshot {
    pos: usize,
    token: SpannedToken,
    prev_token: SpannedToken,
}

impl<'a> ParserContext<'a> {
    /// Returns a new [`ParserContext`] type given a vector of tokens.
    pub fn new(handler: &'a Handler, options: ParserOptions, mut tokens: Vec<SpannedToken>) -> Self {
        // Strip out any remaining trivia.
        tokens.retain(|x| !x.token.is_trivia());

        let mut p = Self {
            handler,
            options,
            fresh: FreshNameSource::default(),
            tokens,
            pos: 0,
            token: SpannedToken::dummy(),
            prev_token: SpannedToken::dummy(),
            last_error_offset: None,
            assumed_closing: [0; 3],
            placeholder_params: Vec::new(),
            placeholder_types: Vec::new(),
            in_fun_return_type: false,
            opstack: Vec::new(),
            class_context_bounds: Vec::new(),
            in_vela_package: false,
            current_package: String::new(),
        };
        p.bump();
        p
    }

    /// A builder for constructed and desugared trees.
    pub(crate) fn builder(&self) -> TreeBuilder<'_> {
        TreeBuilder { fresh: &self.fresh }
    }

    // ----- cursor ---------------------------------------------------------

    /// Advances the parser cursor by one token.
    pub fn bump(&mut self) {
        // Probably a bug (infinite loop), as the previous token was already EOF.
        if let (Token::Eof, Token::Eof) = (&self.prev_token.token, &self.token.token) {
            panic!("attempted to bump the parser past EOF (may be stuck in a loop)");
        }

        let next_token = self.tokens.get(self.pos).cloned().unwrap_or_else(|| SpannedToken {
            token: Token::Eof,
            span: Span::new(self.token.span.hi, self.token.span.hi),
        });
        self.pos += 1;
        self.prev_token = mem::replace(&mut self.token, next_token);
    }

    /// Checks whether the current token is `tok`.
    pub fn check(&self, tok: &Token) -> bool {
        &self.token.token == tok
    }

    /// Removes the next token if it equals `token` and returns `true` if it did.
    pub fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.bump();
            return true;
        }
        false
    }

    /// Look-ahead `dist` tokens past `self.token` and run `looker` there.
    /// When `dist == 0` the current token is looked at.
    pub fn look_ahead<R>(&self, dist: usize, looker: impl FnOnce(&SpannedToken) -> R) -> R {
        if dist == 0 {
            return looker(&self.token);
        }
        let eof = SpannedToken { token: Token::Eof, span: Span::new(self.token.span.hi, self.token.span.hi) };
        looker(self.tokens.get(self.pos + dist - 1).unwrap_or(&eof))
    }

    /// Returns true if the next token exists.
    pub fn has_next(&self) -> bool {
        !matches!(self.token.token, Token::Eof)
    }

    /// The offset of the current token.
    pub(crate) fn offset(&self) -> BytePos {
        self.token.span.lo
    }

    /// The end offset of the previous token.
    pub(crate) fn last_offset(&self) -> BytePos {
        self.prev_token.span.hi
    }

    /// The name of the current token, if it is an identifier.
    pub(crate) fn name(&self) -> Symbol {
        match &self.token.token {
            Token::Ident(name, _) => *name,
            Token::InterpolationId(name) => *name,
            _ => sym::EMPTY,
        }
    }

    /// Is the current token an identifier?
    pub(crate) fn is_ident(&self) -> bool {
        self.token.token.is_ident()
    }

    /// Is the current token the plain identifier `name`?
    pub(crate) fn is_raw_ident(&self, name: Symbol) -> bool {
        matches!(&self.token.token, Token::Ident(s, false) if *s == name)
    }

    /// Advances past the current token and returns its start offset.
    pub(crate) fn skip_token(&mut self) -> BytePos {
        let offset = self.token.span.lo;
        self.bump();
        offset
    }

    // ----- speculation ----------------------------------------------------

    /// Captures the scanner position.
    pub(crate) fn snapshot(&self) -> ScannerSnapshot {
        ScannerSnapshot { pos: self.pos, token: self.token.clone(), prev_token: self.prev_token.clone() }
    }

    /// Restores a previously captured scanner position.
    pub(crate) fn restore(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.prev_token = snapshot.prev_token;
    }

    /// Advances one token, runs `body`, and unconditionally rolls back.
    pub(crate) fn looking_ahead<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        let snapshot = self.snapshot();
        self.bump();
        let result = body(self);
        self.restore(snapshot);
        result
    }

    /// Advances one token and runs `body` speculatively: a `None` result
    /// rolls the scanner back, a `Some` keeps the consumed tokens.
    pub(crate) fn peeking_ahead<R>(&mut self, body: impl FnOnce(&mut Self) -> Option<R>) -> Option<R> {
        let snapshot = self.snapshot();
        self.bump();
        let result = body(self);
        if result.is_none() {
            self.restore(snapshot);
        }
        result
    }

    // ----- newline hooks --------------------------------------------------

    /// Consumes a single `NewLine` token, if present.
    pub(crate) fn newline_opt(&mut self) {
        if matches!(self.token.token, Token::NewLine) {
            self.bump();
        }
    }

    /// Consumes a `NewLine` or `NewLines` token, if present.
    pub(crate) fn newlines_opt(&mut self) {
        if matches!(self.token.token, Token::NewLine | Token::NewLines) {
            self.bump();
        }
    }

    /// Consumes a `NewLine` iff the token after it is `tok`.
    pub(crate) fn newline_opt_when_followed_by(&mut self, tok: &Token) {
        if matches!(self.token.token, Token::NewLine) && self.look_ahead(1, |t| &t.token == tok) {
            self.bump();
        }
    }

    /// Consumes a `NewLine` iff the token after it satisfies `pred`.
    pub(crate) fn newline_opt_when_following(&mut self, pred: impl FnOnce(&Token) -> bool) {
        if matches!(self.token.token, Token::NewLine) && self.look_ahead(1, |t| pred(&t.token)) {
            self.bump();
        }
    }

    /// Is the current token at the end of a statement sequence?
    pub(crate) fn is_stat_seq_end(&self) -> bool {
        matches!(self.token.token, Token::RBrace | Token::Eof)
    }

    /// Is the current token at the end of a case-clause body?
    pub(crate) fn is_case_def_end(&self) -> bool {
        matches!(self.token.token, Token::RBrace | Token::Case | Token::Eof)
    }

    /// Consumes a statement separator, or reports a missing `;`.
    pub(crate) fn accept_stat_sep(&mut self) {
        if self.token.token.is_stat_sep() {
            self.bump();
        } else {
            self.accept(&Token::Semi);
        }
    }

    /// Consumes a statement separator unless the sequence is over.
    pub(crate) fn accept_stat_sep_opt(&mut self) {
        if !self.is_stat_seq_end() {
            self.accept_stat_sep();
        }
    }

    // ----- classification -------------------------------------------------

    /// Does the current token start a template definition,
    /// counting `case class` and `case object`?
    pub(crate) fn is_template_intro(&self) -> bool {
        self.token.token.is_template_intro()
            || (self.check(&Token::Case) && self.look_ahead(1, |t| matches!(t.token, Token::Class | Token::Object)))
    }

    /// Does the current token start a definition?
    pub(crate) fn is_def_intro(&self) -> bool {
        self.token.token.is_dcl_intro() || self.is_template_intro()
    }

    /// Does the current token start a case clause (not a case class/object)?
    pub(crate) fn is_case_def_intro(&self) -> bool {
        self.check(&Token::Case) && !self.is_template_intro()
    }

    /// Does the current token start an annotation?
    pub(crate) fn is_annotation_intro(&self) -> bool {
        self.check(&Token::At)
    }

    /// Does the current token start an expression?
    pub(crate) fn is_expr_intro(&self) -> bool {
        self.token.token.can_begin_expr()
    }

    // ----- identifiers ----------------------------------------------------

    /// Consumes and returns an identifier, or reports an error and
    /// returns the error name.
    pub(crate) fn ident(&mut self) -> Symbol {
        self.ident_common(true)
    }

    fn ident_common(&mut self, skip_it: bool) -> Symbol {
        match self.token.token {
            Token::Ident(name, _) => {
                self.bump();
                name
            }
            _ => {
                let err = ParserError::expected_identifier(&self.token.token, self.token.span);
                self.syntax_error_or_incomplete(err, skip_it);
                sym::ERROR
            }
        }
    }

    /// Consumes an identifier into a term name.
    pub(crate) fn ident_for_term(&mut self) -> Name {
        Name::term(self.ident())
    }

    /// Consumes an identifier into a type name.
    pub(crate) fn ident_for_type(&mut self) -> Name {
        Name::type_(self.ident())
    }

    /// Consumes `_` or an identifier.
    pub(crate) fn wildcard_or_ident(&mut self) -> Symbol {
        if self.eat(&Token::Underscore) {
            sym::USCORE
        } else {
            self.ident()
        }
    }

    // ----- errors & recovery ----------------------------------------------

    /// Emit the warning `warning`.
    pub(crate) fn warning(&self, warning: ParserWarning) {
        self.handler.emit_warning(warning);
    }

    /// Emit a deprecation warning.
    pub(crate) fn deprecation_warning(&self, warning: ParserWarning) {
        self.handler.emit_warning(warning);
    }

    /// Reports `err` unless an error was already reported at or after its
    /// offset, then optionally skips ahead to a safe point.
    pub(crate) fn syntax_error(&mut self, err: ParserError, skip_it: bool) {
        let offset = match &err {
            ParserError::Formatted(formatted) => formatted.span.lo,
            ParserError::Backtraced(_) => self.offset(),
        };
        if self.last_error_offset.map_or(true, |last| offset > last) {
            self.handler.emit_err(err);
            self.last_error_offset = Some(offset);
        }
        if skip_it {
            self.skip(None);
        }
    }

    /// Like [`syntax_error`], but reports an incomplete-input error when
    /// the unexpected token is the end of the input, so interactive
    /// drivers can tell "truncated" from "broken".
    pub(crate) fn syntax_error_or_incomplete(&mut self, err: ParserError, skip_it: bool) {
        if self.has_next() {
            self.syntax_error(err, skip_it);
        } else {
            let msg = match &err {
                ParserError::Formatted(formatted) => formatted.backtrace.message.clone(),
                ParserError::Backtraced(backtraced) => backtraced.message.clone(),
            };
            let incomplete = ParserError::incomplete_input(msg, self.token.span);
            self.syntax_error(incomplete, false);
        }
    }

    /// An error tree at the current token.
    pub(crate) fn error_tree(&self) -> Tree {
        Tree::Error(ErrorTree { span: self.token.span })
    }

    /// The net count of closers-minus-openers of `closer`'s kind in the
    /// remaining input, the current token included. Negative means some
    /// closer can never arrive.
    pub(crate) fn paren_balance(&self, closer: &Token) -> i64 {
        let opener = match closer {
            Token::RParen => Token::LParen,
            Token::RBracket => Token::LBracket,
            Token::RBrace => Token::LBrace,
            _ => return 0,
        };
        let mut balance = 0i64;
        let remaining = std::iter::once(&self.token).chain(self.tokens[self.pos.min(self.tokens.len())..].iter());
        for spanned in remaining {
            if &spanned.token == closer {
                balance += 1;
            } else if spanned.token == opener {
                balance -= 1;
            }
        }
        balance
    }

    fn closer_index(token: &Token) -> Option<usize> {
        match token {
            Token::RParen => Some(0),
            Token::RBracket => Some(1),
            Token::RBrace => Some(2),
            _ => None,
        }
    }

    /// Consumes the expected `token`, or reports an error and recovers:
    /// a missing closing delimiter whose opener count shows it can never
    /// arrive is assumed present, anything else skips ahead.
    pub(crate) fn accept(&mut self, expected: &Token) -> Span {
        let here = self.token.span;
        if !self.check(expected) {
            let err = ParserError::unexpected(&self.token.token, expected, self.token.span);
            self.syntax_error_or_incomplete(err, false);
            match Self::closer_index(expected) {
                Some(index) => {
                    if self.paren_balance(expected) + (self.assumed_closing[index] as i64) < 0 {
                        self.assumed_closing[index] += 1;
                        return here;
                    }
                    self.skip(Some(expected));
                }
                None => self.skip(None),
            }
        }
        if self.check(expected) {
            let span = self.token.span;
            self.bump();
            span
        } else {
            here
        }
    }

    /// Skips ahead to `target`, a statement separator, or the closing
    /// brace of the enclosing block, tracking nesting on the way.
    pub(crate) fn skip(&mut self, target: Option<&Token>) {
        let mut nparens = 0i32;
        let mut nbraces = 0i32;
        loop {
            match &self.token.token {
                Token::Eof => return,
                Token::Semi | Token::NewLine | Token::NewLines => {
                    if nparens == 0 && nbraces == 0 {
                        return;
                    }
                }
                Token::RParen => nparens -= 1,
                Token::RBrace => {
                    if nbraces == 0 {
                        return;
                    }
                    nbraces -= 1;
                }
                Token::LParen => nparens += 1,
                Token::LBrace => nbraces += 1,
                _ => {}
            }
            if let Some(target) = target {
                if self.check(target) && nparens == 0 && nbraces == 0 {
                    return;
                }
            }
            self.bump();
        }
    }

    // ----- grouped parsing helpers ----------------------------------------

    /// Parses `f` between parentheses.
    pub(crate) fn in_parens<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.accept(&Token::LParen);
        let result = f(self);
        self.accept(&Token::RParen);
        result
    }

    /// Parses `f` between braces.
    pub(crate) fn in_braces<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.accept(&Token::LBrace);
        let result = f(self);
        self.accept(&Token::RBrace);
        result
    }

    /// Parses `f` between brackets.
    pub(crate) fn in_brackets<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.accept(&Token::LBracket);
        let result = f(self);
        self.accept(&Token::RBracket);
        result
    }

    /// Parses one or more `f`, separated by commas.
    pub(crate) fn comma_separated<T>(&mut self, mut f: impl FnMut(&mut Self) -> T) -> Vec<T> {
        let mut items = vec![f(self)];
        while self.eat(&Token::Comma) {
            items.push(f(self));
        }
        items
    }

    // ----- placeholder frames ---------------------------------------------

    /// Is `t` a reference to the most recent placeholder parameter,
    /// possibly under ascriptions or annotations? Such a tree is the bare
    /// placeholder itself and must not close here.
    pub(crate) fn is_wildcard_ref(&self, t: &Tree) -> bool {
        match t {
            Tree::Ident(id) => {
                matches!(self.placeholder_params.last(), Some(param) if id.name == param.name)
            }
            Tree::Typed(typed) => self.is_wildcard_ref(&typed.expr),
            Tree::Annotated(annotated) => self.is_wildcard_ref(&annotated.arg),
            _ => false,
        }
    }

    /// A placeholder boundary: placeholders collected while parsing `f`
    /// close over its result as a function literal, unless the result is
    /// the bare placeholder itself (which propagates outward).
    ///
    /// With `is_any`, parameters left untyped are ascribed the top type;
    /// string interpolation bodies use this.
    pub(crate) fn with_placeholders(&mut self, is_any: bool, f: impl FnOnce(&mut Self) -> Tree) -> Tree {
        let saved = mem::take(&mut self.placeholder_params);
        let mut res = f(self);
        if !self.placeholder_params.is_empty() && !self.is_wildcard_ref(&res) {
            let mut params = mem::take(&mut self.placeholder_params);
            if is_any {
                for param in &mut params {
                    if param.tpt.is_empty() {
                        param.tpt = Box::new(Tree::Ident(Ident::new(Name::type_(sym::Any), param.span)));
                    }
                }
            }
            let span = res.span();
            res = Tree::Function(Function { params, body: Box::new(res), span });
        }
        let mut restored = saved;
        restored.append(&mut self.placeholder_params);
        self.placeholder_params = restored;
        res
    }

    /// A wildcard-type boundary: type placeholders collected while parsing
    /// `f` wrap an applied-type result into an existential; any other
    /// result propagates them outward.
    pub(crate) fn placeholder_type_boundary(&mut self, f: impl FnOnce(&mut Self) -> Tree) -> Tree {
        let saved = mem::take(&mut self.placeholder_types);
        let mut t = f(self);
        if !self.placeholder_types.is_empty() && matches!(t, Tree::AppliedType(_)) {
            let params = mem::take(&mut self.placeholder_types);
            let span = t.span();
            t = Tree::ExistentialType(ExistentialType {
                tpt: Box::new(t),
                clauses: params.into_iter().map(Tree::TypeDef).collect(),
                span,
            });
        }
        let mut restored = saved;
        restored.append(&mut self.placeholder_types);
        self.placeholder_types = restored;
        t
    }

    /// Delimits a scope placeholders may not escape: whatever is still
    /// unbound after `f` is an error and gets cleared.
    pub(crate) fn check_no_escaping_placeholders<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved_params = mem::take(&mut self.placeholder_params);
        let saved_types = mem::take(&mut self.placeholder_types);
        let res = f(self);
        if let Some(param) = self.placeholder_params.first() {
            let span = param.span;
            self.syntax_error(ParserError::unbound_placeholder_parameter(span), false);
            self.placeholder_params.clear();
        }
        if let Some(tparam) = self.placeholder_types.first() {
            let span = tparam.span;
            self.syntax_error(ParserError::unbound_wildcard_type(span), false);
            self.placeholder_types.clear();
        }
        self.placeholder_params = saved_params;
        self.placeholder_types = saved_types;
        res
    }
}
