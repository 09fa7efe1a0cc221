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

//! Construction and desugaring of trees the grammar does not represent
//! directly: tuples, loops, closures, for-comprehensions, pattern
//! definitions, instance creation, and string interpolation.

use super::*;

/// Builds derived trees; fresh names come from the per-parse source.
pub(crate) struct TreeBuilder<'a> {
    pub(crate) fresh: &'a FreshNameSource,
}

/// One enumerator of a for-comprehension, before desugaring.
pub(crate) enum Enumerator {
    /// `pat <- rhs`
    Generator { pat: Tree, rhs: Tree, span: Span },
    /// `pat = rhs`
    Val { pat: Tree, rhs: Tree, span: Span },
    /// `if cond`
    Guard { cond: Tree, span: Span },
}

impl TreeBuilder<'_> {
    fn fresh_term(&self, prefix: &str) -> Name {
        Name::term(self.fresh.fresh(prefix))
    }

    /// `vela.name`
    pub(crate) fn vela_dot(&self, name: Name, span: Span) -> Tree {
        Tree::Select(Select {
            qualifier: Box::new(Tree::Ident(Ident::new(Name::term(sym::vela), span))),
            name,
            span,
        })
    }

    /// A synthetic `()` literal.
    pub(crate) fn unit_literal(&self, span: Span) -> Tree {
        Tree::Literal(Literal { value: Constant::Unit, span })
    }

    /// Turns a parenthesised expression list into its meaning: the lone
    /// expression, a tuple, or unit.
    pub(crate) fn strip_parens(&self, t: Tree) -> Tree {
        match t {
            Tree::Parens(parens) => self.mk_tuple_term(parens.exprs, parens.span),
            t => t,
        }
    }

    /// A tuple expression; unit for zero elements, the element itself for one.
    pub(crate) fn mk_tuple_term(&self, mut trees: Vec<Tree>, span: Span) -> Tree {
        match trees.len() {
            0 => self.unit_literal(span),
            1 => trees.pop().unwrap(),
            n => {
                let tuple_name = Name::term(Symbol::intern(&format!("Tuple{n}")));
                Tree::Apply(Apply {
                    fun: Box::new(self.vela_dot(tuple_name, span)),
                    args: trees,
                    span,
                })
            }
        }
    }

    /// A tuple type; unit for zero elements, the type itself for one.
    pub(crate) fn mk_tuple_type(&self, mut types: Vec<Tree>, span: Span) -> Tree {
        match types.len() {
            0 => self.vela_dot(Name::type_(sym::Unit), span),
            1 => types.pop().unwrap(),
            n => {
                let tuple_name = Name::type_(Symbol::intern(&format!("Tuple{n}")));
                Tree::AppliedType(AppliedType {
                    tpt: Box::new(Tree::Ident(Ident::new(tuple_name, span))),
                    args: types,
                    span,
                })
            }
        }
    }

    /// A function type `(args) => result`.
    pub(crate) fn mk_function_type(&self, args: Vec<Tree>, result: Tree, span: Span) -> Tree {
        let fun_name = Name::type_(Symbol::intern(&format!("Function{}", args.len())));
        let mut args = args;
        args.push(result);
        Tree::AppliedType(AppliedType {
            tpt: Box::new(Tree::Ident(Ident::new(fun_name, span))),
            args,
            span,
        })
    }

    /// A by-name parameter type `=> T`.
    pub(crate) fn by_name_application(&self, t: Tree, span: Span) -> Tree {
        Tree::AppliedType(AppliedType {
            tpt: Box::new(Tree::Ident(Ident::new(Name::type_(sym::BYNAME), span))),
            args: vec![t],
            span,
        })
    }

    /// A repeated parameter type `T*`.
    pub(crate) fn repeated_application(&self, t: Tree, span: Span) -> Tree {
        Tree::AppliedType(AppliedType {
            tpt: Box::new(Tree::Ident(Ident::new(Name::type_(sym::REPEATED), span))),
            args: vec![t],
            span,
        })
    }

    /// Is `t` a by-name parameter type?
    pub(crate) fn is_by_name_param_type(&self, t: &Tree) -> bool {
        matches!(t, Tree::AppliedType(at) if at.tpt.is_ident_named(Name::type_(sym::BYNAME)))
    }

    /// Is `t` a repeated parameter type?
    pub(crate) fn is_repeated_param_type(&self, t: &Tree) -> bool {
        matches!(t, Tree::AppliedType(at) if at.tpt.is_ident_named(Name::type_(sym::REPEATED)))
    }

    /// A synthetic value parameter without a declared type.
    pub(crate) fn mk_synthetic_param(&self, name: Name, span: Span) -> ValDef {
        ValDef {
            mods: Modifiers::empty().with_flag(Flags::PARAM | Flags::SYNTHETIC),
            name,
            tpt: Box::new(Tree::Empty),
            rhs: Box::new(Tree::Empty),
            span,
        }
    }

    /// An ordinary value parameter.
    pub(crate) fn mk_param(&self, name: Name, tpt: Tree, span: Span) -> ValDef {
        ValDef {
            mods: Modifiers::empty().with_flag(Flags::PARAM),
            name,
            tpt: Box::new(tpt),
            rhs: Box::new(Tree::Empty),
            span,
        }
    }

    /// The self declaration `name: tpt =>` of a template.
    pub(crate) fn mk_self_def(&self, name: Name, tpt: Tree, span: Span) -> ValDef {
        ValDef {
            mods: Modifiers::empty().with_flag(Flags::PRIVATE),
            name,
            tpt: Box::new(tpt),
            rhs: Box::new(Tree::Empty),
            span,
        }
    }

    /// A block whose result is its last expression, or unit.
    pub(crate) fn mk_block(&self, mut stats: Vec<Tree>, span: Span) -> Tree {
        if stats.is_empty() {
            return self.unit_literal(span);
        }
        let expr = if is_term(stats.last().unwrap()) { stats.pop().unwrap() } else { self.unit_literal(span) };
        Tree::Block(Block { stats, expr: Box::new(expr), span })
    }

    /// `while (cond) body` becomes a labelled loop:
    /// `label: if (cond) { body; label() } else ()`.
    pub(crate) fn mk_while(&self, cond: Tree, body: Tree, span: Span) -> Tree {
        let label = self.fresh_term("while$");
        let continu = Tree::Apply(Apply {
            fun: Box::new(Tree::Ident(Ident::new(label, span))),
            args: vec![],
            span,
        });
        let rhs = Tree::If(If {
            cond: Box::new(cond),
            thenp: Box::new(Tree::Block(Block { stats: vec![body], expr: Box::new(continu), span })),
            elsep: Box::new(self.unit_literal(span)),
            span,
        });
        Tree::LabelDef(LabelDef { name: label, params: vec![], rhs: Box::new(rhs), span })
    }

    /// `do body while (cond)` becomes a labelled loop:
    /// `label: { body; if (cond) label() else () }`.
    pub(crate) fn mk_do_while(&self, body: Tree, cond: Tree, span: Span) -> Tree {
        let label = self.fresh_term("doWhile$");
        let continu = Tree::Apply(Apply {
            fun: Box::new(Tree::Ident(Ident::new(label, span))),
            args: vec![],
            span,
        });
        let rest = Tree::If(If {
            cond: Box::new(cond),
            thenp: Box::new(continu),
            elsep: Box::new(self.unit_literal(span)),
            span,
        });
        let rhs = Tree::Block(Block { stats: vec![body], expr: Box::new(rest), span });
        Tree::LabelDef(LabelDef { name: label, params: vec![], rhs: Box::new(rhs), span })
    }

    /// `catch expr` wraps the handler expression into a synthetic case
    /// `case x => if (h.isDefinedAt(x)) h(x) else throw x`.
    pub(crate) fn mk_catch_from_expr(&self, catch_expr: Tree) -> CaseDef {
        let span = catch_expr.span();
        let binder = self.fresh_term("x$");
        let pat = Tree::Bind(Bind {
            name: binder,
            body: Box::new(Tree::Typed(Typed {
                expr: Box::new(Tree::Ident(Ident::new(Name::term(sym::USCORE), span))),
                tpt: Box::new(Tree::Ident(Ident::new(Name::type_(sym::Throwable), span))),
                span,
            })),
            span,
        });
        let catch_name = self.fresh_term("catchExpr$");
        let catch_def = Tree::ValDef(ValDef {
            mods: Modifiers::empty().with_flag(Flags::SYNTHETIC),
            name: catch_name,
            tpt: Box::new(Tree::Empty),
            rhs: Box::new(catch_expr),
            span,
        });
        let binder_ref = || Tree::Ident(Ident::new(binder, span));
        let call = |method: Symbol| {
            Tree::Apply(Apply {
                fun: Box::new(Tree::Select(Select {
                    qualifier: Box::new(Tree::Ident(Ident::new(catch_name, span))),
                    name: Name::term(method),
                    span,
                })),
                args: vec![binder_ref()],
                span,
            })
        };
        let body = Tree::Block(Block {
            stats: vec![catch_def],
            expr: Box::new(Tree::If(If {
                cond: Box::new(call(sym::isDefinedAt)),
                thenp: Box::new(call(sym::apply)),
                elsep: Box::new(Tree::Throw(Throw { expr: Box::new(binder_ref()), span })),
                span,
            })),
            span,
        });
        CaseDef { pat: Box::new(pat), guard: Box::new(Tree::Empty), body: Box::new(body), span }
    }

    /// A function literal from synthetic cases:
    /// `x$ => x$ match { cases }`.
    pub(crate) fn mk_visitor(&self, cases: Vec<CaseDef>, span: Span) -> Tree {
        let name = self.fresh_term("x$");
        let param = self.mk_synthetic_param(name, span);
        let body = Tree::Match(Match {
            selector: Box::new(Tree::Ident(Ident::new(name, span))),
            cases,
            span,
        });
        Tree::Function(Function { params: vec![param], body: Box::new(body), span })
    }

    /// Is `pat` a variable pattern, and if so which name and type does it bind?
    pub(crate) fn match_var_pattern(&self, pat: &Tree) -> Option<(Name, Tree)> {
        fn wild_type(t: &Tree) -> Option<Tree> {
            match t {
                Tree::Ident(id) if id.name.is_wildcard() => Some(Tree::Empty),
                Tree::Typed(typed) if typed.expr.is_ident_named(Name::term(sym::USCORE)) => {
                    Some((*typed.tpt).clone())
                }
                _ => None,
            }
        }
        match pat {
            Tree::Ident(id) if !id.is_backquoted && id.name.is_variable_name() => {
                Some((id.name, Tree::Empty))
            }
            Tree::Bind(bind) => wild_type(&bind.body).map(|tpt| (bind.name, tpt)),
            Tree::Typed(typed) => match &*typed.expr {
                Tree::Ident(id) if !id.is_backquoted && id.name.is_variable_name() => {
                    Some((id.name, (*typed.tpt).clone()))
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// A one-parameter closure over `pat`: a plain function for variable
    /// patterns, a pattern-matching visitor otherwise.
    pub(crate) fn mk_closure(&self, pat: Tree, body: Tree, span: Span) -> Tree {
        match self.match_var_pattern(&pat) {
            Some((name, tpt)) => {
                let param = self.mk_param(name, tpt, pat.span());
                Tree::Function(Function { params: vec![param], body: Box::new(body), span })
            }
            None => self.mk_visitor(
                vec![CaseDef { pat: Box::new(pat), guard: Box::new(Tree::Empty), body: Box::new(body), span }],
                span,
            ),
        }
    }

    /// Rewrites variable references in a pattern into binders, so
    /// `(x, y)` becomes `(x @ _, y @ _)`.
    pub(crate) fn patvar_transform(&self, pat: Tree) -> Tree {
        match pat {
            Tree::Ident(id) if !id.is_backquoted && id.name.is_variable_name() && !id.name.is_wildcard() => {
                Tree::Bind(Bind {
                    name: id.name,
                    body: Box::new(Tree::Ident(Ident::new(Name::term(sym::USCORE), id.span))),
                    span: id.span,
                })
            }
            Tree::Typed(typed) => match *typed.expr {
                Tree::Ident(id) if !id.is_backquoted && id.name.is_variable_name() && !id.name.is_wildcard() => {
                    Tree::Bind(Bind {
                        name: id.name,
                        body: Box::new(Tree::Typed(Typed {
                            expr: Box::new(Tree::Ident(Ident::new(Name::term(sym::USCORE), id.span))),
                            tpt: typed.tpt,
                            span: typed.span,
                        })),
                        span: typed.span,
                    })
                }
                expr => Tree::Typed(Typed {
                    expr: Box::new(self.patvar_transform(expr)),
                    tpt: typed.tpt,
                    span: typed.span,
                }),
            },
            Tree::Apply(apply) => Tree::Apply(Apply {
                fun: apply.fun,
                args: apply.args.into_iter().map(|arg| self.patvar_transform(arg)).collect(),
                span: apply.span,
            }),
            Tree::Bind(bind) => Tree::Bind(Bind {
                name: bind.name,
                body: Box::new(self.patvar_transform(*bind.body)),
                span: bind.span,
            }),
            Tree::Alternative(alt) => Tree::Alternative(Alternative {
                trees: alt.trees.into_iter().map(|t| self.patvar_transform(t)).collect(),
                span: alt.span,
            }),
            Tree::Star(star) => Tree::Star(Star {
                elem: Box::new(self.patvar_transform(*star.elem)),
                span: star.span,
            }),
            Tree::Parens(parens) => Tree::Parens(Parens {
                exprs: parens.exprs.into_iter().map(|t| self.patvar_transform(t)).collect(),
                span: parens.span,
            }),
            pat => pat,
        }
    }

    /// The binders a pattern introduces, in source order.
    pub(crate) fn get_variables(&self, pat: &Tree, out: &mut Vec<(Name, Tree, Span)>) {
        match pat {
            Tree::Bind(bind) => {
                out.push((bind.name, Tree::Empty, bind.span));
                self.get_variables(&bind.body, out);
            }
            Tree::Typed(typed) => self.get_variables(&typed.expr, out),
            Tree::Apply(apply) => {
                for arg in &apply.args {
                    self.get_variables(arg, out);
                }
            }
            Tree::Alternative(alt) => {
                for t in &alt.trees {
                    self.get_variables(t, out);
                }
            }
            Tree::Star(star) => self.get_variables(&star.elem, out),
            Tree::Parens(parens) => {
                for t in &parens.exprs {
                    self.get_variables(t, out);
                }
            }
            _ => {}
        }
    }

    /// Desugars `val/var pat = rhs`.
    ///
    /// A variable pattern stays one definition. Otherwise the pattern is
    /// matched once, yielding a tuple of its binders, and one accessor
    /// definition per binder selects out of it.
    pub(crate) fn mk_pat_def(&self, mods: Modifiers, pat: Tree, rhs: Tree) -> Vec<Tree> {
        let span = pat.span() + rhs.span();
        if let Some((name, tpt)) = self.match_var_pattern(&pat) {
            return vec![Tree::ValDef(ValDef {
                mods,
                name,
                tpt: Box::new(tpt),
                rhs: Box::new(rhs),
                span,
            })];
        }

        let pat1 = self.patvar_transform(self.strip_parens(pat));
        let mut vars = Vec::new();
        self.get_variables(&pat1, &mut vars);
        let refs: Vec<Tree> = vars.iter().map(|(name, _, span)| Tree::Ident(Ident::new(*name, *span))).collect();
        let match_expr = Tree::Match(Match {
            selector: Box::new(rhs),
            cases: vec![CaseDef {
                pat: Box::new(pat1),
                guard: Box::new(Tree::Empty),
                body: Box::new(self.mk_tuple_term(refs, span)),
                span,
            }],
            span,
        });

        match vars.as_slice() {
            [] => vec![match_expr],
            [(name, tpt, vspan)] => vec![Tree::ValDef(ValDef {
                mods,
                name: *name,
                tpt: Box::new(tpt.clone()),
                rhs: Box::new(match_expr),
                span: *vspan,
            })],
            vars => {
                let tmp = self.fresh_term("x$");
                let first = Tree::ValDef(ValDef {
                    mods: Modifiers {
                        flags: Flags::PRIVATE | Flags::LOCAL | Flags::SYNTHETIC | (mods.flags & Flags::LAZY),
                        private_within: None,
                        annotations: vec![],
                    },
                    name: tmp,
                    tpt: Box::new(Tree::Empty),
                    rhs: Box::new(match_expr),
                    span,
                });
                let mut defs = vec![first];
                for (index, (name, tpt, vspan)) in vars.iter().enumerate() {
                    let selector = Name::term(Symbol::intern(&format!("_{}", index + 1)));
                    defs.push(Tree::ValDef(ValDef {
                        mods: mods.clone(),
                        name: *name,
                        tpt: Box::new(tpt.clone()),
                        rhs: Box::new(Tree::Select(Select {
                            qualifier: Box::new(Tree::Ident(Ident::new(tmp, *vspan))),
                            name: selector,
                            span: *vspan,
                        })),
                        span: *vspan,
                    }));
                }
                defs
            }
        }
    }

    /// A generator or value-definition enumerator, with pattern variables
    /// turned into binders.
    pub(crate) fn mk_generator(&self, pat: Tree, val_eq: bool, rhs: Tree, span: Span) -> Enumerator {
        let pat = self.patvar_transform(self.strip_parens(pat));
        if val_eq {
            Enumerator::Val { pat, rhs, span }
        } else {
            Enumerator::Generator { pat, rhs, span }
        }
    }

    fn select(&self, receiver: Tree, name: Symbol, span: Span) -> Tree {
        Tree::Select(Select { qualifier: Box::new(receiver), name: Name::term(name), span })
    }

    fn apply1(&self, fun: Tree, arg: Tree, span: Span) -> Tree {
        Tree::Apply(Apply { fun: Box::new(fun), args: vec![arg], span })
    }

    /// Ensures a pattern has an outermost binder to reference.
    fn make_bind(&self, pat: Tree) -> Tree {
        match pat {
            bind @ Tree::Bind(_) => bind,
            pat => {
                let span = pat.span();
                Tree::Bind(Bind { name: self.fresh_term("x$"), body: Box::new(pat), span })
            }
        }
    }

    /// A reference to the outermost binder of a pattern.
    fn make_value(&self, pat: &Tree) -> Tree {
        match pat {
            Tree::Bind(bind) => Tree::Ident(Ident::new(bind.name, bind.span)),
            pat => Tree::Error(ErrorTree { span: pat.span() }),
        }
    }

    /// Desugars a for-comprehension into `map`, `flatMap`, `withFilter`,
    /// and `foreach` calls. With `is_yield`, `body` is the yielded
    /// expression, otherwise the loop body.
    pub(crate) fn mk_for(&self, enums: Vec<Enumerator>, is_yield: bool, body: Tree, span: Span) -> Tree {
        let mut enums = enums.into_iter();
        let Some(Enumerator::Generator { pat, rhs, span: gen_span }) = enums.next() else {
            return Tree::Error(ErrorTree { span });
        };
        let rest: Vec<Enumerator> = enums.collect();

        match rest.first() {
            // A lone generator maps or iterates directly.
            None => {
                let method = if is_yield { sym::map } else { sym::foreach };
                let fun = self.select(rhs, method, gen_span);
                self.apply1(fun, self.mk_closure(pat, body, span), span)
            }
            // A guard filters the generator's source.
            Some(Enumerator::Guard { .. }) => {
                let mut rest = rest;
                let Enumerator::Guard { cond, span: guard_span } = rest.remove(0) else { unreachable!() };
                let filtered = self.apply1(
                    self.select(rhs, sym::withFilter, guard_span),
                    self.mk_closure(pat.clone(), cond, guard_span),
                    guard_span,
                );
                let mut enums = vec![Enumerator::Generator { pat, rhs: filtered, span: gen_span }];
                enums.extend(rest);
                self.mk_for(enums, is_yield, body, span)
            }
            // Another generator nests.
            Some(Enumerator::Generator { .. }) => {
                let method = if is_yield { sym::flatMap } else { sym::foreach };
                let inner = self.mk_for(rest, is_yield, body, span);
                self.apply1(self.select(rhs, method, gen_span), self.mk_closure(pat, inner, span), span)
            }
            // Value definitions ride along in a tuple.
            Some(Enumerator::Val { .. }) => {
                let mut rest = rest;
                let mut pats = Vec::new();
                let mut rhss = Vec::new();
                while matches!(rest.first(), Some(Enumerator::Val { .. })) {
                    let Enumerator::Val { pat, rhs, .. } = rest.remove(0) else { unreachable!() };
                    pats.push(pat);
                    rhss.push(rhs);
                }

                let defpat0 = self.make_bind(pat);
                let defpats: Vec<Tree> = pats.iter().map(|p| self.make_bind(p.clone())).collect();
                let mut pdefs = Vec::new();
                for (defpat, vrhs) in defpats.iter().zip(rhss) {
                    pdefs.extend(self.mk_pat_def(Modifiers::empty(), defpat.clone(), vrhs));
                }
                let mut ids = vec![self.make_value(&defpat0)];
                ids.extend(defpats.iter().map(|p| self.make_value(p)));

                let inner_body = Tree::Block(Block {
                    stats: pdefs,
                    expr: Box::new(self.mk_tuple_term(ids, span)),
                    span,
                });
                let rhs1 = self.mk_for(
                    vec![Enumerator::Generator { pat: defpat0.clone(), rhs, span: gen_span }],
                    true,
                    inner_body,
                    span,
                );

                let mut allpats = vec![defpat0];
                allpats.extend(defpats);
                let tuple_pat = self.mk_tuple_term(allpats, span);
                let mut enums = vec![Enumerator::Generator { pat: tuple_pat, rhs: rhs1, span: gen_span }];
                enums.extend(rest);
                self.mk_for(enums, is_yield, body, span)
            }
        }
    }

    /// `new C(args)` and `new { … } with P` forms.
    ///
    /// A single applied parent with an empty body becomes a constructor
    /// call; anything else becomes an anonymous class instantiation.
    pub(crate) fn mk_new(&self, parents: Vec<Tree>, self_decl: Option<Box<ValDef>>, stats: Vec<Tree>, span: Span) -> Tree {
        if parents.len() == 1 && stats.is_empty() {
            let (callee, argss) = dissect_applied(parents.into_iter().next().unwrap());
            return self.mk_new_from_type(callee, argss, span);
        }
        let templ = Template { parents, self_decl, body: stats, span };
        let anon = Name::type_(sym::ANON_CLASS);
        let class_def = Tree::ClassDef(ClassDef {
            mods: Modifiers::empty().with_flag(Flags::FINAL | Flags::SYNTHETIC),
            name: anon,
            tparams: vec![],
            impl_: templ,
            span,
        });
        let new_call = self.mk_new_from_type(Tree::Ident(Ident::new(anon, span)), vec![], span);
        Tree::Block(Block { stats: vec![class_def], expr: Box::new(new_call), span })
    }

    /// `Apply(Select(New(tpt), <init>), args)…` for each argument clause.
    pub(crate) fn mk_new_from_type(&self, tpt: Tree, argss: Vec<Vec<Tree>>, span: Span) -> Tree {
        let init = Tree::Select(Select {
            qualifier: Box::new(Tree::New(New { tpt: Box::new(tpt), span })),
            name: Name::term(sym::CONSTRUCTOR),
            span,
        });
        let mut argss = argss;
        if argss.is_empty() {
            argss.push(vec![]);
        }
        argss.into_iter().fold(init, |fun, args| Tree::Apply(Apply { fun: Box::new(fun), args, span }))
    }

    /// Assembles a template, synthesising the primary constructor when a
    /// parameter-list carrier (class) is being built.
    pub(crate) fn mk_template(
        &self,
        parents: Vec<Tree>,
        self_decl: Option<Box<ValDef>>,
        constr_mods: Modifiers,
        vparamss: Option<Vec<Vec<ValDef>>>,
        body: Vec<Tree>,
        span: Span,
    ) -> Template {
        let mut body = body;
        if let Some(vparamss) = vparamss {
            let constructor = Tree::DefDef(DefDef {
                mods: constr_mods,
                name: Name::term(sym::CONSTRUCTOR),
                tparams: vec![],
                paramss: vparamss,
                tpt: Box::new(Tree::Empty),
                rhs: Box::new(Tree::Block(Block {
                    stats: vec![],
                    expr: Box::new(self.unit_literal(span)),
                    span,
                })),
                span,
            });
            body.insert(0, constructor);
        }
        Template { parents, self_decl, body, span }
    }

    /// `package object name { … }` is an object called `package` within a
    /// packaging of `name`.
    pub(crate) fn mk_package_object(&self, module: ModuleDef, span: Span) -> Tree {
        let pid = Tree::Ident(Ident::new(module.name.to_term(), module.span));
        let renamed = ModuleDef {
            mods: module.mods,
            name: Name::term(sym::PACKAGE),
            impl_: module.impl_,
            span: module.span,
        };
        Tree::PackageDef(PackageDef { pid: Box::new(pid), stats: vec![Tree::ModuleDef(renamed)], span })
    }

    /// An interpolated string becomes
    /// `StringContext(parts…).id(args…)`.
    pub(crate) fn mk_string_interpolation(
        &self,
        interpolator: Symbol,
        parts: Vec<Tree>,
        args: Vec<Tree>,
        span: Span,
    ) -> Tree {
        let context = Tree::Apply(Apply {
            fun: Box::new(Tree::Ident(Ident::new(Name::term(sym::StringContext), span))),
            args: parts,
            span,
        });
        Tree::Apply(Apply {
            fun: Box::new(Tree::Select(Select {
                qualifier: Box::new(context),
                name: Name::term(interpolator),
                span,
            })),
            args,
            span,
        })
    }
}

/// Splits an application chain into its callee and argument clauses.
pub(crate) fn dissect_applied(tree: Tree) -> (Tree, Vec<Vec<Tree>>) {
    let mut argss = Vec::new();
    let mut current = tree;
    while let Tree::Apply(apply) = current {
        argss.push(apply.args);
        current = *apply.fun;
    }
    argss.reverse();
    (current, argss)
}

/// Is this tree a term (usable as a block result)?
pub(crate) fn is_term(tree: &Tree) -> bool {
    !matches!(
        tree,
        Tree::Empty
            | Tree::ValDef(_)
            | Tree::DefDef(_)
            | Tree::TypeDef(_)
            | Tree::ClassDef(_)
            | Tree::ModuleDef(_)
            | Tree::PackageDef(_)
            | Tree::Import(_)
    )
}
