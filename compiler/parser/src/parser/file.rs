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

//! Compilation units, packagings, templates, member definitions,
//! parameter clauses, modifiers, and imports.

use super::*;

/// The names whose compilation units inside the root `vela` package get a
/// synthetic unit-bodied constructor: the nine primitive value classes and
/// the top value type.
const VALUE_CLASS_NAMES: &[Symbol] = &[
    sym::Byte,
    sym::Short,
    sym::Char,
    sym::Int,
    sym::Long,
    sym::Float,
    sym::Double,
    sym::Boolean,
    sym::Unit,
    sym::AnyVal,
];

impl ParserContext<'_> {
    // ----- compilation units ----------------------------------------------

    /// Parses a whole compilation unit into a `PackageDef`.
    pub fn parse_compilation_unit(&mut self) -> Tree {
        self.check_no_escaping_placeholders(|p| {
            let start = p.token.span;
            let stats = p.parse_top_stats();
            match <[Tree; 1]>::try_from(stats) {
                Ok([package @ Tree::PackageDef(_)]) => package,
                Ok([stat]) => {
                    let span = start + p.prev_token.span;
                    let pid = Tree::Ident(Ident::new(Name::term(sym::EMPTY_PACKAGE), Span::new(start.lo, start.lo)));
                    Tree::PackageDef(PackageDef { pid: Box::new(pid), stats: vec![stat], span })
                }
                Err(stats) => {
                    let span = start + p.prev_token.span;
                    let pid = Tree::Ident(Ident::new(Name::term(sym::EMPTY_PACKAGE), Span::new(start.lo, start.lo)));
                    Tree::PackageDef(PackageDef { pid: Box::new(pid), stats, span })
                }
            }
        })
    }

    fn parse_top_stats(&mut self) -> Vec<Tree> {
        let mut stats = Vec::new();
        while self.check(&Token::Semi) {
            self.bump();
        }
        let start = self.token.span;
        if self.check(&Token::Package) {
            self.bump();
            if self.check(&Token::Object) {
                let module = self.parse_object_def(Modifiers::empty());
                let span = start + module.span();
                let Tree::ModuleDef(module) = module else { return vec![module] };
                stats.push(self.builder().mk_package_object(module, span));
                if self.has_next() {
                    self.accept_stat_sep();
                    stats.extend(self.parse_top_stat_seq());
                }
            } else {
                let pid = self.parse_pkg_qual_id();
                if !self.has_next() {
                    let span = start + pid.span();
                    stats.push(Tree::PackageDef(PackageDef { pid: Box::new(pid), stats: vec![], span }));
                } else if self.token.token.is_stat_sep() {
                    self.bump();
                    let inner = self.parse_top_stats();
                    let span = start + self.prev_token.span;
                    stats.push(Tree::PackageDef(PackageDef { pid: Box::new(pid), stats: inner, span }));
                } else {
                    let inner = self.in_braces(|p| p.parse_top_stat_seq());
                    let span = start + self.prev_token.span;
                    stats.push(Tree::PackageDef(PackageDef { pid: Box::new(pid), stats: inner, span }));
                    self.accept_stat_sep_opt();
                    stats.extend(self.parse_top_stat_seq());
                }
            }
        } else {
            stats.extend(self.parse_top_stat_seq());
        }
        stats
    }

    /// Top-level statements: packagings, imports, and template definitions.
    pub(crate) fn parse_top_stat_seq(&mut self) -> Vec<Tree> {
        let mut stats = Vec::new();
        while !self.is_stat_seq_end() {
            if self.check(&Token::Package) {
                let start = self.token.span;
                self.bump();
                if self.check(&Token::Object) {
                    let module = self.parse_object_def(Modifiers::empty());
                    let span = start + module.span();
                    if let Tree::ModuleDef(module) = module {
                        stats.push(self.builder().mk_package_object(module, span));
                    }
                } else {
                    stats.push(self.parse_packaging(start));
                }
            } else if self.check(&Token::Import) {
                stats.extend(self.parse_import_clause());
            } else if self.is_annotation_intro() || self.is_template_intro() || self.token.token.is_modifier() {
                stats.push(self.parse_top_level_tmpl_def());
            } else if !self.token.token.is_stat_sep() {
                let err = ParserError::expected_class_or_object_definition(self.token.span);
                self.syntax_error_or_incomplete(err, true);
                if !self.has_next() {
                    break;
                }
            }
            self.accept_stat_sep_opt();
        }
        stats
    }

    /// `package pid { stats }` nested inside another packaging.
    fn parse_packaging(&mut self, start: Span) -> Tree {
        let pid = self.parse_pkg_qual_id();
        let inner = self.in_braces(|p| p.parse_top_stat_seq());
        let span = start + self.prev_token.span;
        Tree::PackageDef(PackageDef { pid: Box::new(pid), stats: inner, span })
    }

    /// `a.b.c` package qualifiers; tracks whether the unit now sits in the
    /// root language package.
    fn parse_pkg_qual_id(&mut self) -> Tree {
        let pid = self.parse_qual_id();
        self.newline_opt_when_followed_by(&Token::LBrace);
        let mut path = String::new();
        qualified_name(&pid, &mut path);
        if self.current_package.is_empty() {
            self.current_package = path;
        } else {
            self.current_package.push('.');
            self.current_package.push_str(&path);
        }
        self.in_vela_package = self.current_package == "vela";
        pid
    }

    fn parse_qual_id(&mut self) -> Tree {
        let start = self.token.span;
        let name = self.ident_for_term();
        let mut t = Tree::Ident(Ident::new(name, start));
        while self.eat(&Token::Dot) {
            t = self.parse_selector(t);
        }
        t
    }

    /// A template definition preceded by annotations and modifiers.
    fn parse_top_level_tmpl_def(&mut self) -> Tree {
        let annotations = self.parse_annotations(true);
        let mut mods = self.parse_modifiers();
        mods.annotations = annotations;
        self.parse_tmpl_def(mods)
    }

    // ----- annotations & modifiers ----------------------------------------

    /// `@annot(args)*`; with `skip_newlines`, a line break after an
    /// annotation does not end the enclosing statement.
    pub(crate) fn parse_annotations(&mut self, skip_newlines: bool) -> Vec<Tree> {
        let mut annots = Vec::new();
        while self.check(&Token::At) {
            self.bump();
            annots.push(self.parse_annotation_expr());
            if skip_newlines {
                self.newline_opt();
            }
        }
        annots
    }

    fn parse_annotation_expr(&mut self) -> Tree {
        let start = self.token.span;
        let t = self.parse_simple_type(TypeMode::Normal);
        let argss = self.parse_multiple_argument_exprs();
        let span = start + self.prev_token.span;
        self.builder().mk_new_from_type(t, argss, span)
    }

    fn add_mod(&mut self, mods: Modifiers, flag: Flags) -> Modifiers {
        if mods.has(flag) {
            self.syntax_error(ParserError::repeated_modifier(&self.token.token, self.token.span), false);
        }
        self.bump();
        mods.with_flag(flag)
    }

    /// Modifiers legal on any definition.
    pub(crate) fn parse_modifiers(&mut self) -> Modifiers {
        let mut mods = Modifiers::empty();
        loop {
            mods = match self.token.token {
                Token::Abstract => self.add_mod(mods, Flags::ABSTRACT),
                Token::Final => self.add_mod(mods, Flags::FINAL),
                Token::Sealed => self.add_mod(mods, Flags::SEALED),
                Token::Implicit => self.add_mod(mods, Flags::IMPLICIT),
                Token::Lazy => self.add_mod(mods, Flags::LAZY),
                Token::Override => self.add_mod(mods, Flags::OVERRIDE),
                Token::Private => {
                    let m = self.add_mod(mods, Flags::PRIVATE);
                    self.parse_access_qualifier_opt(m)
                }
                Token::Protected => {
                    let m = self.add_mod(mods, Flags::PROTECTED);
                    self.parse_access_qualifier_opt(m)
                }
                Token::NewLine => {
                    self.bump();
                    mods
                }
                _ => return mods,
            };
        }
    }

    /// Modifiers legal on local definitions.
    pub(crate) fn parse_local_modifiers(&mut self) -> Modifiers {
        let mut mods = Modifiers::empty();
        loop {
            mods = match self.token.token {
                Token::Abstract => self.add_mod(mods, Flags::ABSTRACT),
                Token::Final => self.add_mod(mods, Flags::FINAL),
                Token::Sealed => self.add_mod(mods, Flags::SEALED),
                Token::Implicit => self.add_mod(mods, Flags::IMPLICIT),
                Token::Lazy => self.add_mod(mods, Flags::LAZY),
                _ => return mods,
            };
        }
    }

    /// `private[Qualifier]` and `private[this]`.
    fn parse_access_qualifier_opt(&mut self, mut mods: Modifiers) -> Modifiers {
        if self.check(&Token::LBracket) {
            self.in_brackets(|p| {
                if p.eat(&Token::This) {
                    mods.flags |= Flags::LOCAL;
                } else {
                    mods.private_within = Some(p.ident_for_type());
                }
            });
        }
        mods
    }

    // ----- member definitions ---------------------------------------------

    /// Annotations, modifiers, then a member definition.
    pub(crate) fn parse_non_local_def_or_dcl(&mut self) -> Vec<Tree> {
        let annotations = self.parse_annotations(true);
        let mut mods = self.parse_modifiers();
        mods.annotations = annotations;
        self.parse_def_or_dcl(mods)
    }

    /// A definition in statement position inside a block.
    pub(crate) fn parse_local_def(&mut self, implicit_flags: Flags) -> Vec<Tree> {
        let annotations = self.parse_annotations(true);
        let mut mods = self.parse_local_modifiers();
        mods.annotations = annotations;
        mods.flags |= implicit_flags;
        if self.token.token.is_dcl_intro() {
            self.parse_def_or_dcl(mods)
        } else {
            vec![self.parse_tmpl_def(mods)]
        }
    }

    /// `val|var PatDef`, `def FunDef`, `type TypeDef`, or a template.
    pub(crate) fn parse_def_or_dcl(&mut self, mods: Modifiers) -> Vec<Tree> {
        if mods.has(Flags::LAZY) && !self.check(&Token::Val) {
            self.syntax_error(ParserError::lazy_not_allowed(self.token.span), false);
        }
        match self.token.token {
            Token::Val => self.parse_pat_def_or_dcl(mods),
            Token::Var => self.parse_pat_def_or_dcl(mods.with_flag(Flags::MUTABLE)),
            Token::Def => vec![self.parse_fun_def_or_dcl(mods)],
            Token::Type => vec![self.parse_type_def_or_dcl(mods)],
            _ => vec![self.parse_tmpl_def(mods)],
        }
    }

    /// `val p1, p2: T = rhs` with the full pattern-definition desugaring.
    fn parse_pat_def_or_dcl(&mut self, mods: Modifiers) -> Vec<Tree> {
        let mut newmods = mods.clone();
        self.bump();
        let lhs: Vec<Tree> = self
            .comma_separated(|p| {
                let pat = p.parse_pattern2(PatternMode::no_seq());
                p.builder().strip_parens(pat)
            })
            .into_iter()
            .collect();
        let tp = self.parse_typed_opt();
        let all_idents = lhs.iter().all(|p| matches!(p, Tree::Ident(_)));

        let rhs = if tp.is_empty() || self.check(&Token::Eq) {
            self.accept(&Token::Eq);
            if !tp.is_empty()
                && newmods.has(Flags::MUTABLE)
                && all_idents
                && self.check(&Token::Underscore)
            {
                self.bump();
                newmods.flags |= Flags::DEFAULTINIT;
                Tree::Empty
            } else {
                self.parse_expr(Location::Local)
            }
        } else {
            newmods.flags |= Flags::DEFERRED;
            Tree::Empty
        };

        let mut trees = Vec::new();
        for pat in lhs {
            // Each binding gets its own copy of the shared type and rhs.
            let (tp, rhs) = (tp.clone(), rhs.clone());
            let pat_span = pat.span();
            let pat1 = if tp.is_empty() {
                pat
            } else {
                let span = pat_span + tp.span();
                Tree::Typed(Typed { expr: Box::new(pat), tpt: Box::new(tp), span })
            };
            let defs = self.builder().mk_pat_def(newmods.clone(), pat1, rhs);
            if newmods.has(Flags::DEFERRED) {
                match defs.as_slice() {
                    [Tree::ValDef(vd)] if vd.rhs.is_empty() => {
                        if mods.has(Flags::LAZY) {
                            self.syntax_error(ParserError::lazy_values_may_not_be_abstract(pat_span), false);
                        }
                    }
                    _ => {
                        self.syntax_error(
                            ParserError::pattern_definition_may_not_be_abstract(pat_span),
                            false,
                        );
                    }
                }
            } else if mods.has(Flags::LAZY) && defs.len() > 1 {
                self.syntax_error(ParserError::lazy_pattern_definition(pat_span), false);
            }
            trees.extend(defs);
        }
        trees
    }

    /// `def f …` and auxiliary constructors `def this(…)`.
    fn parse_fun_def_or_dcl(&mut self, mods: Modifiers) -> Tree {
        let start = self.token.span;
        self.bump();
        if self.check(&Token::This) {
            self.bump();
            let bounds: Vec<Tree> = self.class_context_bounds.clone();
            let vparamss = self.parse_param_clauses(Name::term(sym::CONSTRUCTOR), bounds, false);
            self.newline_opt_when_followed_by(&Token::LBrace);
            let rhs = if self.check(&Token::LBrace) {
                self.parse_constr_block(&vparamss)
            } else {
                self.accept(&Token::Eq);
                self.parse_constr_expr(&vparamss)
            };
            let span = start + rhs.span();
            return Tree::DefDef(DefDef {
                mods,
                name: Name::term(sym::CONSTRUCTOR),
                tparams: vec![],
                paramss: vparamss,
                tpt: Box::new(Tree::Empty),
                rhs: Box::new(rhs),
                span,
            });
        }
        let name = Name::term(self.ident());
        self.parse_fun_def_rest(start, mods, name)
    }

    fn parse_fun_def_rest(&mut self, start: Span, mods: Modifiers, name: Name) -> Tree {
        let mut newmods = mods;
        let mut context_bounds = Vec::new();
        let tparams = self.parse_type_param_clause_opt(false, Some(&mut context_bounds));
        let vparamss = self.parse_param_clauses(name, context_bounds, false);
        self.newline_opt_when_followed_by(&Token::LBrace);

        let mut restype = {
            let saved = self.in_fun_return_type;
            self.in_fun_return_type = true;
            let t = self.parse_typed_opt();
            self.in_fun_return_type = saved;
            t
        };

        let rhs = if self.token.token.is_stat_sep() || self.check(&Token::RBrace) || !self.has_next() {
            // Declaration. Procedure-style declarations get a unit result.
            if restype.is_empty() {
                if self.options.future {
                    self.deprecation_warning(ParserWarning::deprecated_procedure_syntax(name, self.token.span));
                }
                restype = self.builder().vela_dot(Name::type_(sym::Unit), self.prev_token.span);
            }
            newmods.flags |= Flags::DEFERRED;
            Tree::Empty
        } else if restype.is_empty() && self.check(&Token::LBrace) {
            if self.options.future {
                self.deprecation_warning(ParserWarning::deprecated_procedure_syntax(name, self.token.span));
            }
            restype = self.builder().vela_dot(Name::type_(sym::Unit), self.token.span);
            self.parse_block_expr()
        } else {
            if self.check(&Token::Eq) {
                self.bump();
                if self.check(&Token::Macro) {
                    self.bump();
                    newmods.flags |= Flags::MACRO;
                }
            } else {
                self.accept(&Token::Eq);
            }
            self.parse_expr(Location::Local)
        };
        let span = start + if rhs.is_empty() { self.prev_token.span } else { rhs.span() };
        Tree::DefDef(DefDef {
            mods: newmods,
            name,
            tparams,
            paramss: vparamss,
            tpt: Box::new(restype),
            rhs: Box::new(rhs),
            span,
        })
    }

    /// The body of an auxiliary constructor without braces:
    /// a self invocation, wrapped in a unit block.
    fn parse_constr_expr(&mut self, vparamss: &[Vec<ValDef>]) -> Tree {
        if self.check(&Token::LBrace) {
            return self.parse_constr_block(vparamss);
        }
        let invocation = self.parse_self_invocation(vparamss);
        let span = invocation.span();
        Tree::Block(Block {
            stats: vec![invocation],
            expr: Box::new(self.builder().unit_literal(span)),
            span,
        })
    }

    /// `this(args)…` starting an auxiliary constructor body.
    fn parse_self_invocation(&mut self, vparamss: &[Vec<ValDef>]) -> Tree {
        let start = self.accept(&Token::This);
        self.newline_opt_when_followed_by(&Token::LBrace);
        let mut t = Tree::Apply(Apply {
            fun: Box::new(Tree::Ident(Ident::new(Name::term(sym::CONSTRUCTOR), start))),
            args: self.parse_argument_exprs(),
            span: start + self.prev_token.span,
        });
        self.newline_opt_when_followed_by(&Token::LBrace);
        while self.check(&Token::LParen) || self.check(&Token::LBrace) {
            let args = self.parse_argument_exprs();
            let span = t.span() + self.prev_token.span;
            t = Tree::Apply(Apply { fun: Box::new(t), args, span });
            self.newline_opt_when_followed_by(&Token::LBrace);
        }
        if !self.class_context_bounds.is_empty() {
            if let Some(last) = vparamss.last() {
                let args = last.iter().map(|vd| Tree::Ident(Ident::new(vd.name, vd.span))).collect();
                let span = t.span();
                t = Tree::Apply(Apply { fun: Box::new(t), args, span });
            }
        }
        t
    }

    fn parse_constr_block(&mut self, vparamss: &[Vec<ValDef>]) -> Tree {
        let start = self.token.span;
        self.in_braces(|p| {
            let mut stats = vec![p.parse_self_invocation(vparamss)];
            if p.token.token.is_stat_sep() {
                p.bump();
                stats.extend(p.parse_block_stat_seq());
            }
            let span = start + p.token.span;
            Tree::Block(Block {
                stats,
                expr: Box::new(p.builder().unit_literal(span)),
                span,
            })
        })
    }

    /// `type T[…] = U`, or an abstract type with bounds.
    fn parse_type_def_or_dcl(&mut self, mods: Modifiers) -> Tree {
        let start = self.token.span;
        self.bump();
        self.newlines_opt();
        let name = self.ident_for_type();
        let tparams = self.parse_type_param_clause_opt(true, None);
        match self.token.token {
            Token::Eq => {
                self.bump();
                let rhs = self.parse_type();
                let span = start + rhs.span();
                Tree::TypeDef(TypeDef { mods, name, tparams, rhs: Box::new(rhs), span })
            }
            Token::Subtype | Token::Supertype | Token::Semi | Token::NewLine | Token::NewLines
            | Token::Comma | Token::RBrace | Token::Eof => {
                let bounds = self.parse_type_bounds();
                let span = start + self.prev_token.span;
                Tree::TypeDef(TypeDef {
                    mods: mods.with_flag(Flags::DEFERRED),
                    name,
                    tparams,
                    rhs: Box::new(bounds),
                    span,
                })
            }
            _ => {
                self.syntax_error_or_incomplete(ParserError::eq_or_bounds_expected(self.token.span), true);
                Tree::TypeDef(TypeDef {
                    mods,
                    name,
                    tparams,
                    rhs: Box::new(self.error_tree()),
                    span: start + self.token.span,
                })
            }
        }
    }

    // ----- template definitions -------------------------------------------

    /// `class|trait|object`, with their `case` variants.
    pub(crate) fn parse_tmpl_def(&mut self, mods: Modifiers) -> Tree {
        if mods.has(Flags::LAZY) {
            self.syntax_error(ParserError::lazy_not_allowed(self.token.span), false);
        }
        match self.token.token {
            Token::Trait => self.parse_class_def(mods.with_flag(Flags::TRAIT | Flags::ABSTRACT)),
            Token::Class => self.parse_class_def(mods),
            Token::Object => self.parse_object_def(mods),
            Token::Case if self.look_ahead(1, |t| matches!(t.token, Token::Class)) => {
                self.bump();
                self.parse_class_def(mods.with_flag(Flags::CASE))
            }
            Token::Case if self.look_ahead(1, |t| matches!(t.token, Token::Object)) => {
                self.bump();
                self.parse_object_def(mods.with_flag(Flags::CASE))
            }
            _ => {
                let err = ParserError::illegal_start_of_definition(&self.token.token, self.token.span);
                self.syntax_error_or_incomplete(err, true);
                self.error_tree()
            }
        }
    }

    fn parse_class_def(&mut self, mods: Modifiers) -> Tree {
        let start = self.token.span;
        let is_trait = self.check(&Token::Trait) || mods.has(Flags::TRAIT);
        self.bump();
        let name = self.ident_for_type();

        let saved_bounds = std::mem::take(&mut self.class_context_bounds);
        let mut context_bounds = Vec::new();
        let tparams = self.parse_type_param_clause_opt(true, Some(&mut context_bounds));
        self.class_context_bounds = context_bounds;

        if !self.class_context_bounds.is_empty() && is_trait {
            self.syntax_error(ParserError::trait_bounds_on_type_params(self.token.span), false);
            self.class_context_bounds.clear();
        }

        let mut mods1 = mods;
        if is_trait {
            mods1.flags |= Flags::TRAIT;
        }

        let (constr_mods, vparamss) = if is_trait {
            (Modifiers::empty().with_flag(Flags::TRAIT), None)
        } else {
            let constr_annots = self.parse_annotations(false);
            let mut constr_mods = self.parse_access_modifier_opt();
            constr_mods.annotations = constr_annots;
            let bounds = self.class_context_bounds.clone();
            let vparamss = self.parse_param_clauses(name, bounds, mods1.has(Flags::CASE));
            (constr_mods, Some(vparamss))
        };

        if self.check(&Token::Subtype) {
            if is_trait && self.options.virtual_classes {
                mods1.flags |= Flags::DEFERRED;
            } else if !is_trait {
                self.syntax_error(ParserError::classes_cannot_be_virtual(self.token.span), false);
            }
        }

        let templ = self.parse_template_opt(&mods1, name, constr_mods, vparamss);
        let span = start + templ.span;
        let result = Tree::ClassDef(ClassDef { mods: mods1, name, tparams, impl_: templ, span });
        self.class_context_bounds = saved_bounds;
        result
    }

    fn parse_object_def(&mut self, mods: Modifiers) -> Tree {
        let start = self.accept(&Token::Object);
        let name = Name::term(self.ident());
        let templ = self.parse_template_opt(&mods, name, Modifiers::empty(), None);
        let span = start + templ.span;
        Tree::ModuleDef(ModuleDef { mods, name, impl_: templ, span })
    }

    /// The access modifier before a primary constructor's parameters.
    fn parse_access_modifier_opt(&mut self) -> Modifiers {
        let mut mods = Modifiers::empty();
        match self.token.token {
            Token::Private => {
                mods = self.add_mod(mods, Flags::PRIVATE);
                mods = self.parse_access_qualifier_opt(mods);
            }
            Token::Protected => {
                mods = self.add_mod(mods, Flags::PROTECTED);
                mods = self.parse_access_qualifier_opt(mods);
            }
            _ => {}
        }
        mods
    }

    // ----- type parameters and parameters ---------------------------------

    /// `[+T <: Hi >: Lo : Ctx <% View]`; context and view bounds are
    /// collected for translation into implicit evidence parameters.
    pub(crate) fn parse_type_param_clause_opt(
        &mut self,
        owner_is_type: bool,
        mut context_bounds: Option<&mut Vec<Tree>>,
    ) -> Vec<TypeDef> {
        self.newline_opt_when_followed_by(&Token::LBracket);
        if !self.check(&Token::LBracket) {
            return vec![];
        }
        self.in_brackets(|p| {
            p.comma_separated(|p| {
                let annotations = p.parse_annotations(true);
                let bounds = context_bounds.as_mut().map(|buf| &mut **buf);
                p.parse_type_param(owner_is_type, annotations, bounds)
            })
        })
    }

    fn parse_type_param(
        &mut self,
        owner_is_type: bool,
        annotations: Vec<Tree>,
        context_bounds: Option<&mut Vec<Tree>>,
    ) -> TypeDef {
        let start = self.token.span;
        let mut mods = Modifiers::empty().with_flag(Flags::PARAM);
        mods.annotations = annotations;
        if owner_is_type && self.is_ident() {
            if self.is_raw_ident(sym::plus) {
                self.bump();
                mods.flags |= Flags::COVARIANT;
            } else if self.is_raw_ident(sym::minus) {
                self.bump();
                mods.flags |= Flags::CONTRAVARIANT;
            }
        }
        let pname = Name::type_(self.wildcard_or_ident());
        let tparams = self.parse_type_param_clause_opt(true, None);
        let bounds = self.parse_type_bounds();
        let span = start + self.prev_token.span;
        let param = TypeDef { mods, name: pname, tparams, rhs: Box::new(bounds), span };

        if let Some(buf) = context_bounds {
            while self.check(&Token::ViewBound) {
                if self.options.future {
                    self.deprecation_warning(ParserWarning::deprecated_view_bounds(self.token.span));
                }
                let vb_span = self.token.span;
                self.bump();
                let target = self.parse_type();
                let span = vb_span + target.span();
                buf.push(self.builder().mk_function_type(
                    vec![Tree::Ident(Ident::new(pname, vb_span))],
                    target,
                    span,
                ));
            }
            while self.check(&Token::Colon) {
                let cb_span = self.token.span;
                self.bump();
                let bound = self.parse_type();
                let span = cb_span + bound.span();
                buf.push(Tree::AppliedType(AppliedType {
                    tpt: Box::new(bound),
                    args: vec![Tree::Ident(Ident::new(pname, cb_span))],
                    span,
                }));
            }
        }
        param
    }

    /// All parameter clauses of a definition, with context-bound evidence
    /// parameters appended as a trailing implicit clause.
    pub(crate) fn parse_param_clauses(
        &mut self,
        owner: Name,
        context_bounds: Vec<Tree>,
        of_case_class: bool,
    ) -> Vec<Vec<ValDef>> {
        let owner_is_type = owner.is_type();
        let mut vparamss: Vec<Vec<ValDef>> = Vec::new();
        let mut implicit_seen = false;
        let mut case_param = of_case_class;
        let start = self.token.span;

        self.newline_opt_when_followed_by(&Token::LParen);
        if of_case_class && !self.check(&Token::LParen) {
            self.syntax_error(
                ParserError::case_class_without_params(Span::new(self.last_offset(), self.last_offset())),
                false,
            );
        }
        while !implicit_seen && self.check(&Token::LParen) {
            self.bump();
            let mut params = Vec::new();
            if !self.check(&Token::RParen) {
                let implicit_mod = if self.eat(&Token::Implicit) {
                    implicit_seen = true;
                    Flags::IMPLICIT
                } else {
                    Flags::empty()
                };
                params = self.comma_separated(|p| p.parse_param(owner_is_type, implicit_mod, case_param));
            }
            self.accept(&Token::RParen);
            vparamss.push(params);
            case_param = false;
            self.newline_opt_when_followed_by(&Token::LParen);
        }

        if owner.sym == sym::CONSTRUCTOR
            && (vparamss.is_empty()
                || vparamss.first().and_then(|ps| ps.first()).is_some_and(|p| p.mods.has(Flags::IMPLICIT)))
        {
            match self.token.token {
                Token::LBracket => {
                    self.syntax_error(ParserError::no_type_params_allowed_here(self.token.span), false)
                }
                _ => self.syntax_error_or_incomplete(
                    ParserError::aux_constructor_needs_params(start),
                    false,
                ),
            }
        }

        self.add_evidence_params(&mut vparamss, context_bounds);
        vparamss
    }

    /// Appends context/view-bound evidence as implicit parameters, either
    /// into an existing trailing implicit clause or as a new one.
    fn add_evidence_params(&mut self, vparamss: &mut Vec<Vec<ValDef>>, context_bounds: Vec<Tree>) {
        if context_bounds.is_empty() {
            return;
        }
        let params: Vec<ValDef> = context_bounds
            .into_iter()
            .map(|tpt| {
                let span = tpt.span();
                let name = Name::term(self.fresh.fresh("evidence$"));
                let mut param = self.builder().mk_param(name, tpt, span);
                param.mods.flags |= Flags::IMPLICIT | Flags::SYNTHETIC;
                param
            })
            .collect();
        match vparamss.last_mut() {
            Some(last) if last.first().is_some_and(|p| p.mods.has(Flags::IMPLICIT)) => {
                last.extend(params);
            }
            _ => vparamss.push(params),
        }
    }

    /// One value parameter.
    fn parse_param(&mut self, owner_is_type: bool, implicit_mod: Flags, case_param: bool) -> ValDef {
        let start = self.token.span;
        let annotations = self.parse_annotations(false);
        let mut mods = Modifiers::empty().with_flag(Flags::PARAM);
        mods.annotations = annotations;

        if owner_is_type {
            let outer_mods = self.parse_modifiers();
            mods.flags |= outer_mods.flags | Flags::PARAMACCESSOR;
            mods.private_within = outer_mods.private_within;
            if mods.has(Flags::LAZY) {
                self.syntax_error(ParserError::lazy_param_not_allowed(self.token.span), false);
            }
            match self.token.token {
                Token::Val => {
                    self.bump();
                }
                Token::Var => {
                    mods.flags |= Flags::MUTABLE;
                    self.bump();
                }
                _ => {
                    // Explicit modifiers require an explicit `val` or `var`.
                    if mods.flags.intersection(!(Flags::PARAM | Flags::PARAMACCESSOR)) != Flags::empty()
                        || mods.private_within.is_some()
                    {
                        self.accept(&Token::Val);
                    }
                    if !case_param {
                        mods.flags |= Flags::PRIVATE | Flags::LOCAL;
                    }
                }
            }
            if case_param {
                mods.flags |= Flags::CASEACCESSOR;
            }
        }

        let name = Name::term(self.ident());
        let mut byname = Flags::empty();
        let tpt = if self.options.method_infer && !owner_is_type && !self.check(&Token::Colon) {
            Tree::Empty
        } else {
            if !self.check(&Token::Colon) {
                self.syntax_error(ParserError::missing_parameter_type(self.token.span), false);
            }
            self.accept(&Token::Colon);
            if self.check(&Token::Arrow) {
                if owner_is_type && !mods.has(Flags::LOCAL) {
                    self.syntax_error(ParserError::val_params_no_by_name(self.token.span), false);
                } else if implicit_mod == Flags::IMPLICIT {
                    self.syntax_error(ParserError::implicit_params_no_by_name(self.token.span), false);
                } else {
                    byname = Flags::BYNAMEPARAM;
                }
            }
            self.parse_param_type()
        };
        let default = if self.eat(&Token::Eq) {
            mods.flags |= Flags::DEFAULTPARAM;
            self.parse_expr(Location::Local)
        } else {
            Tree::Empty
        };
        mods.flags |= implicit_mod | byname;
        let span = start + self.prev_token.span;
        ValDef { mods, name, tpt: Box::new(tpt), rhs: Box::new(default), span }
    }

    /// An optional `: Type` ascription.
    pub(crate) fn parse_typed_opt(&mut self) -> Tree {
        if self.eat(&Token::Colon) {
            self.parse_type()
        } else {
            Tree::Empty
        }
    }

    // ----- templates ------------------------------------------------------

    /// The parents/self/body of a template after `extends` or `new`.
    /// A leading brace body is tentatively parsed as statements; if `with`
    /// follows, those statements are re-labelled as early definitions.
    pub(crate) fn parse_template_parts(&mut self) -> (Vec<Tree>, Option<Box<ValDef>>, Vec<Tree>) {
        self.newline_opt_when_followed_by(&Token::LBrace);
        if self.check(&Token::LBrace) {
            let (self_decl, body) = self.parse_template_body(true);
            if self.check(&Token::With) && self_decl.is_none() {
                let early_defs: Vec<Tree> =
                    body.into_iter().map(|stat| self.ensure_early_def(stat)).filter(|t| !t.is_empty()).collect();
                self.bump();
                let parents = self.parse_template_parents();
                let (self_decl, mut body1) = self.parse_template_body_opt(false);
                let mut full_body = early_defs;
                full_body.append(&mut body1);
                (parents, self_decl, full_body)
            } else {
                (vec![], self_decl, body)
            }
        } else {
            let parents = self.parse_template_parents();
            let (self_decl, body) = self.parse_template_body_opt(false);
            (parents, self_decl, body)
        }
    }

    /// Re-labels a tentatively parsed statement as an early definition.
    fn ensure_early_def(&mut self, tree: Tree) -> Tree {
        match tree {
            Tree::ValDef(mut vd) if !vd.mods.has(Flags::DEFERRED) => {
                vd.mods.flags |= Flags::PRESUPER;
                Tree::ValDef(vd)
            }
            Tree::TypeDef(mut td) => {
                self.deprecation_warning(ParserWarning::deprecated_early_type_members(td.span));
                td.mods.flags |= Flags::PRESUPER;
                Tree::TypeDef(td)
            }
            Tree::Empty => Tree::Empty,
            stat => {
                self.syntax_error(ParserError::early_defs_only_vals(stat.span()), false);
                Tree::Empty
            }
        }
    }

    /// `Parent(args) with Parent …`.
    fn parse_template_parents(&mut self) -> Vec<Tree> {
        let mut parents = Vec::new();
        let mut read_applied_parent = |p: &mut Self| {
            let parent = p.parse_annot_type(TypeMode::Normal);
            let parent = if p.check(&Token::LParen) {
                let argss = p.parse_multiple_argument_exprs();
                argss.into_iter().fold(parent, |fun, args| {
                    let span = fun.span() + p.prev_token.span;
                    Tree::Apply(Apply { fun: Box::new(fun), args, span })
                })
            } else {
                parent
            };
            parents.push(parent);
        };
        read_applied_parent(self);
        while self.eat(&Token::With) {
            read_applied_parent(self);
        }
        parents
    }

    /// A brace-delimited template body; placeholders may not escape it.
    fn parse_template_body(&mut self, is_pre: bool) -> (Option<Box<ValDef>>, Vec<Tree>) {
        let _ = is_pre;
        self.check_no_escaping_placeholders(|p| p.in_braces(|p| p.parse_template_stat_seq()))
    }

    /// An optional template body; a stray `(` here means someone gave
    /// parameters to a trait or object.
    fn parse_template_body_opt(&mut self, paren_means_error: bool) -> (Option<Box<ValDef>>, Vec<Tree>) {
        self.newline_opt_when_followed_by(&Token::LBrace);
        if self.check(&Token::LBrace) {
            self.parse_template_body(false)
        } else {
            if self.check(&Token::LParen) && paren_means_error {
                self.syntax_error(ParserError::traits_objects_no_params(self.token.span), true);
            }
            (None, vec![])
        }
    }

    /// Template statements, with the self-type declaration peeled off the
    /// front when the first statement turns out to be `expr =>`.
    pub(crate) fn parse_template_stat_seq(&mut self) -> (Option<Box<ValDef>>, Vec<Tree>) {
        let mut self_decl: Option<Box<ValDef>> = None;
        let mut stats = Vec::new();
        if self.is_expr_intro() {
            let first = self.parse_expr(Location::InTemplate);
            if self.check(&Token::Arrow) {
                match first {
                    Tree::Typed(typed) if matches!(&*typed.expr, Tree::This(t) if t.qual.is_empty()) => {
                        self_decl = Some(Box::new(self.builder().mk_self_def(
                            Name::term(sym::USCORE),
                            *typed.tpt,
                            typed.span,
                        )));
                    }
                    first => {
                        let param = self.convert_to_param(first);
                        if !param.name.is_error() {
                            let span = param.span;
                            self_decl =
                                Some(Box::new(self.builder().mk_self_def(param.name, *param.tpt, span)));
                        }
                    }
                }
                self.bump();
            } else {
                stats.push(first);
                self.accept_stat_sep_opt();
            }
        }
        while !self.is_stat_seq_end() {
            if self.check(&Token::Import) {
                stats.extend(self.parse_import_clause());
            } else if self.is_def_intro() || self.token.token.is_modifier() || self.is_annotation_intro() {
                stats.extend(self.parse_non_local_def_or_dcl());
            } else if self.is_expr_intro() {
                let stat = self.parse_statement(Location::InTemplate);
                if self.check(&Token::Arrow)
                    && matches!(&stat, Tree::Typed(typed) if matches!(&*typed.expr, Tree::Ident(_)))
                {
                    // `x: T => …` after the first statement can be neither a
                    // self type nor (unparenthesised) a function literal.
                    self.syntax_error(ParserError::ambiguous_typed_parameter(self.token.span), false);
                    self.bump();
                    let _ = self.parse_expr(Location::InTemplate);
                }
                stats.push(stat);
            } else if !self.token.token.is_stat_sep() {
                let err = ParserError::illegal_start_of_definition(&self.token.token, self.token.span);
                self.syntax_error_or_incomplete(err, true);
                if !self.has_next() {
                    break;
                }
            }
            self.accept_stat_sep_opt();
        }
        (self_decl, stats)
    }

    /// The template of a class/trait/object definition, including the
    /// synthetic constructor insertion.
    fn parse_template_opt(
        &mut self,
        mods: &Modifiers,
        name: Name,
        constr_mods: Modifiers,
        vparamss: Option<Vec<Vec<ValDef>>>,
    ) -> Template {
        let start = self.token.span;
        let (parents, self_decl, body) = if self.check(&Token::Extends)
            || (self.check(&Token::Subtype) && mods.has(Flags::TRAIT))
        {
            self.bump();
            self.parse_template_parts()
        } else {
            self.newline_opt_when_followed_by(&Token::LBrace);
            let paren_means_error = mods.has(Flags::TRAIT) || name.is_term();
            let (self_decl, body) = self.parse_template_body_opt(paren_means_error);
            (vec![], self_decl, body)
        };
        let span = start + self.prev_token.span;

        // Primitive value-class sources in the root package get a synthetic
        // unit-bodied constructor instead of the ordinary one.
        if self.in_vela_package && VALUE_CLASS_NAMES.contains(&name.sym) {
            let constructor = Tree::DefDef(DefDef {
                mods: Modifiers::empty(),
                name: Name::term(sym::CONSTRUCTOR),
                tparams: vec![],
                paramss: vec![vec![]],
                tpt: Box::new(Tree::Empty),
                rhs: Box::new(Tree::Block(Block {
                    stats: vec![],
                    expr: Box::new(self.builder().unit_literal(span)),
                    span,
                })),
                span,
            });
            let mut full_body = vec![constructor];
            full_body.extend(body);
            return Template { parents, self_decl, body: full_body, span };
        }

        let parents = self.mk_parents(mods, parents, span);
        self.builder().mk_template(parents, self_decl, constr_mods, vparamss, body, span)
    }

    /// Case templates pick up the product parents; empty parent lists get
    /// the root reference type.
    fn mk_parents(&mut self, mods: &Modifiers, mut parents: Vec<Tree>, span: Span) -> Vec<Tree> {
        if mods.has(Flags::CASE) {
            parents.push(self.builder().vela_dot(Name::type_(sym::Product), span));
            parents.push(self.builder().vela_dot(Name::type_(sym::Serializable), span));
            parents
        } else if parents.is_empty() {
            vec![self.builder().vela_dot(Name::type_(sym::AnyRef), span)]
        } else {
            parents
        }
    }

    // ----- imports --------------------------------------------------------

    /// `import a.b.{c => d, _}, e.f`.
    pub(crate) fn parse_import_clause(&mut self) -> Vec<Tree> {
        self.accept(&Token::Import);
        self.comma_separated(|p| p.parse_import_expr())
    }

    fn parse_import_expr(&mut self) -> Tree {
        let start = self.token.span;
        let mut expr = if self.check(&Token::This) {
            self.parse_this_dotted(Name::type_(sym::EMPTY), start)
        } else {
            let name = self.ident_for_term();
            let id = Tree::Ident(Ident::new(name, self.prev_token.span));
            self.accept(&Token::Dot);
            if self.check(&Token::This) {
                self.parse_this_dotted(name.to_type(), start)
            } else {
                id
            }
        };

        // Walk down `a.b.c…` until a wildcard, a selector list, or a final
        // plain identifier.
        loop {
            let selectors: Vec<ImportSelector> = match self.token.token {
                Token::Underscore => vec![self.parse_import_selector()],
                Token::LBrace => self.parse_import_selectors(),
                _ => {
                    let name_span = self.token.span;
                    let name = Name::term(self.ident());
                    if self.eat(&Token::Dot) {
                        let span = expr.span() + name_span;
                        expr = Tree::Select(Select { qualifier: Box::new(expr), name, span });
                        continue;
                    }
                    vec![ImportSelector { name, name_span, rename: Some(name), rename_span: Some(name_span) }]
                }
            };
            let span = start + self.prev_token.span;
            return Tree::Import(Import { expr: Box::new(expr), selectors, span });
        }
    }

    /// The `this.member` head of an import expression.
    fn parse_this_dotted(&mut self, qual: Name, start: Span) -> Tree {
        self.bump();
        let t = Tree::This(This { qual, span: start + self.prev_token.span });
        self.accept(&Token::Dot);
        let result = self.parse_selector(t);
        self.accept(&Token::Dot);
        result
    }

    fn parse_import_selectors(&mut self) -> Vec<ImportSelector> {
        let selectors = self.in_braces(|p| p.comma_separated(|p| p.parse_import_selector()));
        for selector in selectors.iter().rev().skip(1) {
            if selector.is_wildcard() {
                self.syntax_error(ParserError::wildcard_import_not_last(selector.name_span), false);
            }
        }
        selectors
    }

    fn parse_import_selector(&mut self) -> ImportSelector {
        let name_span = self.token.span;
        let name = Name::term(self.wildcard_or_ident());
        let (rename, rename_span) = if self.check(&Token::Arrow) {
            self.bump();
            let rename_span = self.token.span;
            (Some(Name::term(self.wildcard_or_ident())), Some(rename_span))
        } else if name.is_wildcard() {
            (None, None)
        } else {
            (Some(name), Some(name_span))
        };
        ImportSelector { name, name_span, rename, rename_span }
    }
}

fn qualified_name(tree: &Tree, out: &mut String) {
    match tree {
        Tree::Ident(id) => out.push_str(&id.name.sym.as_str()),
        Tree::Select(select) => {
            qualified_name(&select.qualifier, out);
            out.push('.');
            out.push_str(&select.name.sym.as_str());
        }
        _ => {}
    }
}
