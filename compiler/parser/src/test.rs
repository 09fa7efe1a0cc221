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

use crate::{parse, tokenizer, ParserContext, ParserOptions};

use vela_ast::*;
use vela_errors::{
    emitter::{BufferEmitter, Handler},
    ParserError, VelaError,
};
use vela_span::{create_session_if_not_set_then, sym, BytePos, Symbol};

fn with_parser<T>(source: &str, logic: impl FnOnce(&mut ParserContext<'_>) -> T) -> (T, BufferEmitter, usize) {
    let (handler, buf) = Handler::new_with_buf();
    let tokens = tokenizer::tokenize(source, BytePos(0)).expect("tokenization failed");
    let mut p = ParserContext::new(&handler, ParserOptions::default(), tokens);
    let result = logic(&mut p);
    let errs = handler.err_count();
    (result, buf, errs)
}

fn parse_expr_ok(source: &str) -> Tree {
    let (tree, _, errs) = with_parser(source, |p| p.parse_expression());
    assert_eq!(errs, 0, "unexpected errors parsing `{source}`");
    tree
}

fn parse_unit_ok(source: &str) -> Tree {
    let (handler, buf) = Handler::new_with_buf();
    let tree = parse(&handler, ParserOptions::default(), source);
    match tree {
        Ok(tree) => tree,
        Err(_) => panic!("unexpected errors parsing `{source}`:\n{}", buf.extract_errs()),
    }
}

fn term(name: &str) -> Name {
    Name::term(Symbol::intern(name))
}

fn select_name(tree: &Tree) -> Name {
    match tree {
        Tree::Select(select) => select.name,
        tree => panic!("expected a selection, got {tree:?}"),
    }
}

fn as_apply(tree: &Tree) -> &Apply {
    match tree {
        Tree::Apply(apply) => apply,
        tree => panic!("expected an application, got {tree:?}"),
    }
}

fn error_offsets(buf: &BufferEmitter) -> Vec<u32> {
    buf.extract_errs()
        .into_inner()
        .into_iter()
        .filter_map(|e| match e {
            VelaError::ParserError(ParserError::Formatted(f)) => Some(f.span.lo.0),
            _ => None,
        })
        .collect()
}

// ----- precedence and associativity ---------------------------------------

#[test]
fn multiplication_binds_tighter_than_addition() {
    create_session_if_not_set_then(|_| {
        // 1 + 2 * 3  ==>  Apply(Select(1, +), Apply(Select(2, *), 3))
        let tree = parse_expr_ok("1 + 2 * 3");
        let outer = as_apply(&tree);
        assert_eq!(select_name(&outer.fun), term("+"));
        let Tree::Select(plus) = &*outer.fun else { panic!() };
        assert_eq!(*plus.qualifier, Tree::Literal(Literal { value: Constant::Int(1), span: plus.qualifier.span() }));
        let inner = as_apply(&outer.args[0]);
        assert_eq!(select_name(&inner.fun), term("*"));
    });
}

#[test]
fn cons_is_right_associative() {
    create_session_if_not_set_then(|_| {
        // a :: b :: Nil groups to the right.
        let tree = parse_expr_ok("a :: b :: Nil");
        let outer = as_apply(&tree);
        assert_eq!(select_name(&outer.fun), term("::"));
        let Tree::Select(sel) = &*outer.fun else { panic!() };
        assert!(sel.qualifier.is_ident_named(term("a")));
        let inner = as_apply(&outer.args[0]);
        assert_eq!(select_name(&inner.fun), term("::"));
        assert!(inner.args[0].is_ident_named(term("Nil")));
    });
}

#[test]
fn alphanumeric_operators_bind_loosest() {
    create_session_if_not_set_then(|_| {
        // a max b + 1  ==>  a max (b + 1)
        let tree = parse_expr_ok("a max b + 1");
        let outer = as_apply(&tree);
        assert_eq!(select_name(&outer.fun), term("max"));
        let inner = as_apply(&outer.args[0]);
        assert_eq!(select_name(&inner.fun), term("+"));
    });
}

#[test]
fn mixed_associativity_is_an_error() {
    create_session_if_not_set_then(|_| {
        let (_, buf, errs) = with_parser("1 +: 2 + 3", |p| p.parse_expression());
        assert_eq!(errs, 1);
        let rendered = buf.extract_errs().to_string();
        assert!(rendered.contains("left- and right-associative"), "got: {rendered}");
    });
}

#[test]
fn postfix_operator_becomes_selection() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("xs reverse");
        let Tree::Select(select) = tree else { panic!("expected postfix selection, got {tree:?}") };
        assert_eq!(select.name, term("reverse"));
        assert!(select.qualifier.is_ident_named(term("xs")));
    });
}

#[test]
fn type_application_rejected_on_postfix_operator() {
    create_session_if_not_set_then(|_| {
        let (_, _, errs) = with_parser("xs reverse[Int]", |p| p.parse_expression());
        assert_eq!(errs, 1);
    });
}

#[test]
fn unary_minus_folds_into_literal() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("-42");
        let Tree::Literal(lit) = tree else { panic!("expected literal, got {tree:?}") };
        assert_eq!(lit.value, Constant::Int(-42));

        let tree = parse_expr_ok("!x");
        let Tree::Select(select) = tree else { panic!() };
        assert_eq!(select.name, term("unary_!"));
    });
}

// ----- placeholders -------------------------------------------------------

#[test]
fn placeholder_closes_over_argument() {
    create_session_if_not_set_then(|_| {
        // List(1, 2).map(_ + 1): the argument becomes a one-parameter function.
        let tree = parse_expr_ok("List(1, 2).map(_ + 1)");
        let call = as_apply(&tree);
        let Tree::Function(function) = &call.args[0] else {
            panic!("expected function argument, got {:?}", call.args[0])
        };
        assert_eq!(function.params.len(), 1);
        let body = as_apply(&function.body);
        assert_eq!(select_name(&body.fun), term("+"));
        let Tree::Select(plus) = &*body.fun else { panic!() };
        assert!(plus.qualifier.is_ident_named(function.params[0].name));
    });
}

#[test]
fn bare_placeholder_propagates_to_outer_expression() {
    create_session_if_not_set_then(|_| {
        // f(_) means x => f(x), not f(x => x).
        let tree = parse_expr_ok("f(_)");
        let Tree::Function(function) = tree else { panic!("expected function, got {tree:?}") };
        assert_eq!(function.params.len(), 1);
        let call = as_apply(&function.body);
        assert!(call.fun.is_ident_named(term("f")));
    });
}

#[test]
fn two_placeholders_bind_in_source_order() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("_ + _");
        let Tree::Function(function) = tree else { panic!("expected function, got {tree:?}") };
        assert_eq!(function.params.len(), 2);
        let body = as_apply(&function.body);
        let Tree::Select(plus) = &*body.fun else { panic!() };
        assert!(plus.qualifier.is_ident_named(function.params[0].name));
        assert!(body.args[0].is_ident_named(function.params[1].name));
    });
}

#[test]
fn typed_placeholder_types_the_parameter() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("(_: Int) => 1");
        let Tree::Function(function) = tree else { panic!("expected function, got {tree:?}") };
        assert_eq!(function.params.len(), 1);
        assert!(!function.params[0].tpt.is_empty());
    });
}

#[test]
fn escaping_placeholder_is_an_error() {
    create_session_if_not_set_then(|_| {
        let (handler, _buf) = Handler::new_with_buf();
        let result = parse(&handler, ParserOptions::default(), "class C { val x = _ }");
        assert!(result.is_err());
        assert!(handler.err_count() >= 1);
    });
}

#[test]
fn eta_expansion_marker() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("f _");
        let Tree::Typed(typed) = tree else { panic!("expected typed tree, got {tree:?}") };
        assert!(typed.expr.is_ident_named(term("f")));
        let Tree::Function(function) = &*typed.tpt else { panic!() };
        assert!(function.params.is_empty());
        assert!(function.body.is_empty());
    });
}

// ----- expressions --------------------------------------------------------

#[test]
fn assignment_requires_assignable_lhs() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("x.f = 1");
        assert!(matches!(tree, Tree::Assign(_)));

        // A literal LHS silently keeps the postfix expression.
        let ((), _, _) = with_parser("1 = 2", |p| {
            let t = p.parse_expression();
            assert!(matches!(t, Tree::Literal(_)));
        });
    });
}

#[test]
fn named_arguments_only_in_argument_position() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("f(x = 1, 2)");
        let call = as_apply(&tree);
        assert!(matches!(call.args[0], Tree::NamedArg(_)));
        assert!(matches!(call.args[1], Tree::Literal(_)));
    });
}

#[test]
fn parenthesised_expressions_strip_to_tuples() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("(1, 2)");
        let tuple = as_apply(&tree);
        assert_eq!(select_name(&tuple.fun), term("Tuple2"));
        assert_eq!(tuple.args.len(), 2);

        let tree = parse_expr_ok("(1)");
        assert!(matches!(tree, Tree::Literal(_)));
    });
}

#[test]
fn while_desugars_to_labelled_loop() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("while (x) f()");
        let Tree::LabelDef(label) = tree else { panic!("expected label, got {tree:?}") };
        assert!(matches!(&*label.rhs, Tree::If(_)));

        let tree = parse_expr_ok("do f() while (x)");
        let Tree::LabelDef(label) = tree else { panic!("expected label, got {tree:?}") };
        assert!(matches!(&*label.rhs, Tree::Block(_)));
    });
}

#[test]
fn try_catch_finally_forms() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("try { f() } catch { case e => g } finally h()");
        let Tree::Try(t) = tree else { panic!("expected try, got {tree:?}") };
        assert_eq!(t.catches.len(), 1);
        assert!(!t.finalizer.is_empty());

        // `catch handler` wraps the handler into a synthetic case.
        let tree = parse_expr_ok("try f() catch handler");
        let Tree::Try(t) = tree else { panic!() };
        assert_eq!(t.catches.len(), 1);
        let Tree::Block(block) = &*t.catches[0].body else { panic!("expected block body") };
        let Tree::If(branch) = &*block.expr else { panic!("expected isDefinedAt test") };
        let cond = as_apply(&branch.cond);
        assert_eq!(select_name(&cond.fun), Name::term(sym::isDefinedAt));
    });
}

#[test]
fn partial_function_literal_is_selectorless_match() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("{ case x => 1 }");
        let Tree::Match(m) = tree else { panic!("expected match, got {tree:?}") };
        assert!(m.selector.is_empty());
        assert_eq!(m.cases.len(), 1);
    });
}

#[test]
fn implicit_closure_in_block() {
    create_session_if_not_set_then(|_| {
        let ((), _, _) = with_parser("{ implicit x => x * 2 }", |p| {
            let t = p.parse_expression();
            let Tree::Block(block) = t else { panic!("expected block, got {t:?}") };
            let Tree::Function(function) = &*block.expr else {
                panic!("expected function, got {:?}", block.expr)
            };
            assert!(function.params[0].mods.has(Flags::IMPLICIT));
        });
    });
}

#[test]
fn string_interpolation_desugars_to_string_context() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok(r#"s"a${x}b""#);
        let outer = as_apply(&tree);
        assert_eq!(select_name(&outer.fun), term("s"));
        let Tree::Select(select) = &*outer.fun else { panic!() };
        let context = as_apply(&select.qualifier);
        assert!(context.fun.is_ident_named(Name::term(sym::StringContext)));
        assert_eq!(context.args.len(), 2);
        assert_eq!(outer.args.len(), 1);
        assert!(outer.args[0].is_ident_named(term("x")));
    });
}

#[test]
fn leading_dot_continues_the_statement() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("a\n  .b");
        let Tree::Select(select) = tree else { panic!("expected selection, got {tree:?}") };
        assert_eq!(select.name, term("b"));
    });
}

#[test]
fn trailing_operator_continues_the_statement() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("1 +\n  2");
        let outer = as_apply(&tree);
        assert_eq!(select_name(&outer.fun), term("+"));
    });
}

// ----- for comprehensions -------------------------------------------------

#[test]
fn for_yield_desugars_to_with_filter_and_map() {
    create_session_if_not_set_then(|_| {
        // for (x <- xs if x > 0) yield x + 1
        let tree = parse_expr_ok("for (x <- xs if x > 0) yield x + 1");
        let map_call = as_apply(&tree);
        assert_eq!(select_name(&map_call.fun), Name::term(sym::map));
        let Tree::Select(map_sel) = &*map_call.fun else { panic!() };
        let filter_call = as_apply(&map_sel.qualifier);
        assert_eq!(select_name(&filter_call.fun), Name::term(sym::withFilter));
        assert!(matches!(map_call.args[0], Tree::Function(_)));
    });
}

#[test]
fn nested_generators_use_flat_map() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("for (x <- xs; y <- ys) yield x + y");
        let flat_map_call = as_apply(&tree);
        assert_eq!(select_name(&flat_map_call.fun), Name::term(sym::flatMap));
        let Tree::Function(outer_fun) = &flat_map_call.args[0] else { panic!() };
        let inner = as_apply(&outer_fun.body);
        assert_eq!(select_name(&inner.fun), Name::term(sym::map));
    });
}

#[test]
fn for_without_yield_uses_foreach() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("for (x <- xs) println(x)");
        let call = as_apply(&tree);
        assert_eq!(select_name(&call.fun), Name::term(sym::foreach));
    });
}

#[test]
fn tuple_pattern_generator_uses_visitor() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("for ((a, b) <- xs) yield a");
        let call = as_apply(&tree);
        assert_eq!(select_name(&call.fun), Name::term(sym::map));
        let Tree::Function(function) = &call.args[0] else { panic!() };
        assert!(matches!(&*function.body, Tree::Match(_)));
    });
}

#[test]
fn value_definitions_in_for_ride_a_tuple() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("for (x <- xs; y = x + 1) yield y");
        // The rewritten comprehension maps over a tuple of (x, y).
        let call = as_apply(&tree);
        assert_eq!(select_name(&call.fun), Name::term(sym::map));
        let Tree::Select(sel) = &*call.fun else { panic!() };
        let inner = as_apply(&sel.qualifier);
        assert_eq!(select_name(&inner.fun), Name::term(sym::map));
    });
}

#[test]
fn first_enumerator_must_be_generator() {
    create_session_if_not_set_then(|_| {
        let (_, _, errs) = with_parser("for (x = 1) yield x", |p| p.parse_expression());
        assert!(errs >= 1);
    });
}

// ----- patterns -----------------------------------------------------------

fn parse_match_case(source: &str) -> CaseDef {
    let (tree, _, errs) = with_parser(source, |p| p.parse_expression());
    assert_eq!(errs, 0, "unexpected errors parsing `{source}`");
    let Tree::Match(m) = tree else { panic!("expected match, got {tree:?}") };
    m.cases.into_iter().next().unwrap()
}

#[test]
fn pattern_alternatives() {
    create_session_if_not_set_then(|_| {
        let case = parse_match_case("x match { case 1 | 2 | 3 => 0 }");
        let Tree::Alternative(alt) = &*case.pat else { panic!("expected alternative") };
        assert_eq!(alt.trees.len(), 3);
    });
}

#[test]
fn bind_pattern() {
    create_session_if_not_set_then(|_| {
        let case = parse_match_case("x match { case a @ Some(_) => a }");
        let Tree::Bind(bind) = &*case.pat else { panic!("expected bind") };
        assert_eq!(bind.name, term("a"));
        assert!(matches!(&*bind.body, Tree::Apply(_)));

        // `_ @ p` is just `p`.
        let case = parse_match_case("x match { case _ @ Some(y) => y }");
        assert!(matches!(&*case.pat, Tree::Apply(_)));
    });
}

#[test]
fn typed_pattern_requires_lowercase_variable() {
    create_session_if_not_set_then(|_| {
        let case = parse_match_case("x match { case n: Int => n }");
        assert!(matches!(&*case.pat, Tree::Typed(_)));

        let (_, buf, errs) = with_parser("x match { case X: Int => 0 }", |p| p.parse_expression());
        assert_eq!(errs, 1);
        let rendered = buf.extract_errs().to_string();
        assert!(rendered.contains("lower-case letter"), "got: {rendered}");
    });
}

#[test]
fn sequence_wildcard_in_last_position() {
    create_session_if_not_set_then(|_| {
        let case = parse_match_case("x match { case Seq(a, _*) => a }");
        let Tree::Apply(apply) = &*case.pat else { panic!() };
        assert!(matches!(apply.args.last(), Some(Tree::Star(_))));
    });
}

#[test]
fn sequence_wildcard_elsewhere_is_an_error() {
    create_session_if_not_set_then(|_| {
        let (_, buf, errs) = with_parser("x match { case Seq(_*, a) => a }", |p| p.parse_expression());
        assert!(errs >= 1);
        let rendered = buf.extract_errs().to_string();
        assert!(rendered.contains("_*"), "got: {rendered}");
    });
}

#[test]
fn infix_pattern_uses_pattern_application() {
    create_session_if_not_set_then(|_| {
        // a :: rest  ==>  Apply(Ident(::), [a, rest])
        let case = parse_match_case("x match { case a :: rest => a }");
        let Tree::Apply(apply) = &*case.pat else { panic!() };
        assert!(apply.fun.is_ident_named(term("::")));
        assert_eq!(apply.args.len(), 2);
    });
}

#[test]
fn guards_attach_to_cases() {
    create_session_if_not_set_then(|_| {
        let case = parse_match_case("x match { case n if n > 0 => n }");
        assert!(!case.guard.is_empty());
    });
}

#[test]
fn negative_literal_pattern() {
    create_session_if_not_set_then(|_| {
        let case = parse_match_case("x match { case -1 => 0 }");
        let Tree::Literal(lit) = &*case.pat else { panic!("expected literal, got {:?}", case.pat) };
        assert_eq!(lit.value, Constant::Int(-1));
    });
}

// ----- definitions --------------------------------------------------------

fn parse_stats_ok(source: &str) -> Vec<Tree> {
    let (stats, _, errs) = with_parser(source, |p| p.parse_block_stat_seq());
    assert_eq!(errs, 0, "unexpected errors parsing `{source}`");
    stats
}

#[test]
fn simple_val_stays_one_definition() {
    create_session_if_not_set_then(|_| {
        let stats = parse_stats_ok("val x = 1");
        assert_eq!(stats.len(), 1);
        let Tree::ValDef(vd) = &stats[0] else { panic!() };
        assert_eq!(vd.name, term("x"));
    });
}

#[test]
fn tuple_val_desugars_to_match_and_accessors() {
    create_session_if_not_set_then(|_| {
        // val (x, y) = e ==> synthetic tuple val + two accessors.
        let stats = parse_stats_ok("val (x, y) = e");
        assert_eq!(stats.len(), 3);
        let Tree::ValDef(tmp) = &stats[0] else { panic!() };
        assert!(tmp.mods.has(Flags::SYNTHETIC));
        assert!(matches!(&*tmp.rhs, Tree::Match(_)));
        let Tree::ValDef(x) = &stats[1] else { panic!() };
        assert_eq!(x.name, term("x"));
        let Tree::Select(sel) = &*x.rhs else { panic!() };
        assert_eq!(sel.name, term("_1"));
        let Tree::ValDef(y) = &stats[2] else { panic!() };
        let Tree::Select(sel) = &*y.rhs else { panic!() };
        assert_eq!(sel.name, term("_2"));
        assert_eq!(y.name, term("y"));
    });
}

#[test]
fn wildcard_val_stays_one_definition() {
    create_session_if_not_set_then(|_| {
        let stats = parse_stats_ok("val _ = e");
        assert_eq!(stats.len(), 1);
        let Tree::ValDef(vd) = &stats[0] else { panic!() };
        assert!(vd.name.is_wildcard());
    });
}

#[test]
fn binderless_pattern_val_becomes_bare_match() {
    create_session_if_not_set_then(|_| {
        // Zero binders: just match the pattern for its effect.
        let stats = parse_stats_ok("val Some(1) = e");
        assert_eq!(stats.len(), 1);
        let Tree::Match(m) = &stats[0] else { panic!("expected match, got {:?}", stats[0]) };
        assert!(matches!(&*m.cases[0].body, Tree::Literal(_)));
    });
}

#[test]
fn var_with_default_init() {
    create_session_if_not_set_then(|_| {
        let stats = parse_stats_ok("var x: Int = _");
        let Tree::ValDef(vd) = &stats[0] else { panic!() };
        assert!(vd.mods.has(Flags::DEFAULTINIT));
        assert!(vd.rhs.is_empty());
    });
}

#[test]
fn multiple_binding_val() {
    create_session_if_not_set_then(|_| {
        let stats = parse_stats_ok("val a, b: Int = 0");
        assert_eq!(stats.len(), 2);
    });
}

#[test]
fn def_with_implicit_parameter_clause() {
    create_session_if_not_set_then(|_| {
        let stats = parse_stats_ok("def f(x: Int)(implicit ev: E): Int = x");
        let Tree::DefDef(dd) = &stats[0] else { panic!() };
        assert_eq!(dd.paramss.len(), 2);
        assert!(!dd.paramss[0][0].mods.has(Flags::IMPLICIT));
        assert!(dd.paramss[1][0].mods.has(Flags::IMPLICIT));
        assert!(!dd.tpt.is_empty());
    });
}

#[test]
fn abstract_def_is_deferred() {
    create_session_if_not_set_then(|_| {
        let stats = parse_stats_ok("def f: Int");
        let Tree::DefDef(dd) = &stats[0] else { panic!() };
        assert!(dd.mods.has(Flags::DEFERRED));
        assert!(dd.rhs.is_empty());
    });
}

#[test]
fn macro_def_sets_the_flag() {
    create_session_if_not_set_then(|_| {
        let stats = parse_stats_ok("def f: Int = macro impl");
        let Tree::DefDef(dd) = &stats[0] else { panic!() };
        assert!(dd.mods.has(Flags::MACRO));
        assert!(dd.rhs.is_ident_named(term("impl")));
    });
}

#[test]
fn procedure_syntax_warns_under_future() {
    create_session_if_not_set_then(|_| {
        let (handler, _) = Handler::new_with_buf();
        let tokens = tokenizer::tokenize("def run { f() }", BytePos(0)).unwrap();
        let options = ParserOptions { future: true, ..Default::default() };
        let mut p = ParserContext::new(&handler, options, tokens);
        let stats = p.parse_block_stat_seq();
        assert_eq!(handler.err_count(), 0);
        assert_eq!(handler.warn_count(), 1);
        let Tree::DefDef(dd) = &stats[0] else { panic!() };
        // The result type was synthesised to unit.
        assert!(!dd.tpt.is_empty());
    });
}

#[test]
fn type_alias_and_abstract_type() {
    create_session_if_not_set_then(|_| {
        let stats = parse_stats_ok("type T = List[Int]");
        let Tree::TypeDef(td) = &stats[0] else { panic!() };
        assert!(!td.mods.has(Flags::DEFERRED));

        let stats = parse_stats_ok("type T <: Ordered");
        let Tree::TypeDef(td) = &stats[0] else { panic!() };
        assert!(td.mods.has(Flags::DEFERRED));
        assert!(matches!(&*td.rhs, Tree::TypeBounds(_)));
    });
}

#[test]
fn lazy_abstract_val_is_an_error() {
    create_session_if_not_set_then(|_| {
        let (_, _, errs) = with_parser("lazy val x: Int", |p| p.parse_block_stat_seq());
        assert_eq!(errs, 1);
    });
}

#[test]
fn lazy_pattern_val_is_an_error() {
    create_session_if_not_set_then(|_| {
        let (_, _, errs) = with_parser("lazy val (x, y) = e", |p| p.parse_block_stat_seq());
        assert!(errs >= 1);
    });
}

// ----- classes and templates ----------------------------------------------

fn parse_top_ok(source: &str) -> Vec<Tree> {
    let tree = parse_unit_ok(source);
    let Tree::PackageDef(pkg) = tree else { panic!("expected package, got {tree:?}") };
    pkg.stats
}

fn primary_constructor(class: &ClassDef) -> &DefDef {
    class
        .impl_
        .body
        .iter()
        .find_map(|t| match t {
            Tree::DefDef(dd) if dd.name.sym == sym::CONSTRUCTOR => Some(dd),
            _ => None,
        })
        .expect("no primary constructor")
}

#[test]
fn context_bound_synthesises_evidence_parameter() {
    create_session_if_not_set_then(|_| {
        // class C[T: Ord](x: T) gains an implicit clause of type Ord[T].
        let stats = parse_top_ok("class C[T: Ord](x: T)");
        let Tree::ClassDef(class) = &stats[0] else { panic!() };
        let constructor = primary_constructor(class);
        assert_eq!(constructor.paramss.len(), 2);
        let evidence = &constructor.paramss[1][0];
        assert!(evidence.mods.has(Flags::IMPLICIT));
        let Tree::AppliedType(applied) = &*evidence.tpt else { panic!() };
        assert!(applied.tpt.is_ident_named(Name::type_(Symbol::intern("Ord"))));
    });
}

#[test]
fn view_bound_synthesises_conversion_evidence() {
    create_session_if_not_set_then(|_| {
        let stats = parse_top_ok("class C[T <% Ordered](x: T)");
        let Tree::ClassDef(class) = &stats[0] else { panic!() };
        let constructor = primary_constructor(class);
        let evidence = &constructor.paramss[1][0];
        assert!(evidence.mods.has(Flags::IMPLICIT));
        assert!(matches!(&*evidence.tpt, Tree::AppliedType(_)));
    });
}

#[test]
fn trait_with_context_bounds_is_an_error() {
    create_session_if_not_set_then(|_| {
        let (handler, _) = Handler::new_with_buf();
        assert!(parse(&handler, ParserOptions::default(), "trait T[A: Ord]").is_err());
    });
}

#[test]
fn case_class_requires_parameter_list() {
    create_session_if_not_set_then(|_| {
        let (handler, buf) = Handler::new_with_buf();
        assert!(parse(&handler, ParserOptions::default(), "case class C").is_err());
        let rendered = buf.extract_errs().to_string();
        assert!(rendered.contains("parameter list"), "got: {rendered}");
    });
}

#[test]
fn case_class_gains_product_parents() {
    create_session_if_not_set_then(|_| {
        let stats = parse_top_ok("case class C(x: Int)");
        let Tree::ClassDef(class) = &stats[0] else { panic!() };
        assert!(class.mods.has(Flags::CASE));
        assert_eq!(class.impl_.parents.len(), 2);
    });
}

#[test]
fn early_definitions_are_marked_presuper() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("new { val x = 1 } with A with B { def y = 2 }");
        let Tree::Block(block) = tree else { panic!("expected anon class block, got {tree:?}") };
        let Tree::ClassDef(class) = &block.stats[0] else { panic!() };
        assert_eq!(class.impl_.parents.len(), 2);
        let Tree::ValDef(early) = &class.impl_.body[0] else { panic!() };
        assert!(early.mods.has(Flags::PRESUPER));
        assert!(matches!(&class.impl_.body[1], Tree::DefDef(_)));
    });
}

#[test]
fn new_with_arguments_is_a_constructor_call() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("new C(1)");
        let call = as_apply(&tree);
        let Tree::Select(select) = &*call.fun else { panic!() };
        assert_eq!(select.name.sym, sym::CONSTRUCTOR);
        assert!(matches!(&*select.qualifier, Tree::New(_)));
        assert_eq!(call.args.len(), 1);
    });
}

#[test]
fn self_type_declaration() {
    create_session_if_not_set_then(|_| {
        let stats = parse_top_ok("trait T { self: Ordered => def cmp = 1 }");
        let Tree::ClassDef(class) = &stats[0] else { panic!() };
        let self_decl = class.impl_.self_decl.as_ref().expect("no self declaration");
        assert_eq!(self_decl.name, term("self"));
        assert!(!self_decl.tpt.is_empty());
        assert_eq!(class.impl_.body.len(), 1);
    });
}

#[test]
fn auxiliary_constructor_requires_params() {
    create_session_if_not_set_then(|_| {
        let (handler, _) = Handler::new_with_buf();
        let result = parse(&handler, ParserOptions::default(), "class C(x: Int) { def this() = this(1)\n def f = 2 }");
        assert!(result.is_ok());

        let (handler, _) = Handler::new_with_buf();
        assert!(parse(&handler, ParserOptions::default(), "class C(x: Int) { def this = this(1) }").is_err());
    });
}

#[test]
fn value_class_in_root_package_gets_synthetic_constructor() {
    create_session_if_not_set_then(|_| {
        // The lone packaging is the unit itself.
        let tree = parse_unit_ok("package vela\nclass Int extends AnyVal { }");
        let Tree::PackageDef(pkg) = tree else { panic!() };
        assert!(pkg.pid.is_ident_named(Name::term(sym::vela)));
        let Tree::ClassDef(class) = &pkg.stats[0] else { panic!() };
        let Tree::DefDef(constructor) = &class.impl_.body[0] else { panic!() };
        assert_eq!(constructor.name.sym, sym::CONSTRUCTOR);
        let Tree::Block(body) = &*constructor.rhs else { panic!() };
        assert!(matches!(&*body.expr, Tree::Literal(_)));
    });
}

// ----- packages and imports -----------------------------------------------

#[test]
fn compilation_unit_is_a_package_def() {
    create_session_if_not_set_then(|_| {
        let tree = parse_unit_ok("class A\nclass B");
        let Tree::PackageDef(pkg) = tree else { panic!() };
        assert_eq!(pkg.stats.len(), 2);
    });
}

#[test]
fn package_object_wraps_a_module() {
    create_session_if_not_set_then(|_| {
        let tree = parse_unit_ok("package object foo { def x = 1 }");
        let Tree::PackageDef(pkg) = tree else { panic!() };
        assert!(pkg.pid.is_ident_named(term("foo")));
        let Tree::ModuleDef(module) = &pkg.stats[0] else { panic!("expected module") };
        assert_eq!(module.name.sym, sym::PACKAGE);
    });
}

#[test]
fn import_selector_forms() {
    create_session_if_not_set_then(|_| {
        let stats = parse_stats_ok("import a.b.{c => d, e => _, _}");
        let Tree::Import(import) = &stats[0] else { panic!() };
        assert_eq!(import.selectors.len(), 3);
        assert_eq!(import.selectors[0].rename, Some(term("d")));
        assert_eq!(import.selectors[1].rename, Some(Name::term(sym::USCORE)));
        assert!(import.selectors[2].is_wildcard());
        let Tree::Select(prefix) = &*import.expr else { panic!() };
        assert_eq!(prefix.name, term("b"));
    });
}

#[test]
fn wildcard_import_must_be_last() {
    create_session_if_not_set_then(|_| {
        let (_, buf, errs) = with_parser("import a.{_, b}", |p| p.parse_block_stat_seq());
        assert_eq!(errs, 1);
        let rendered = buf.extract_errs().to_string();
        assert!(rendered.contains("last position"), "got: {rendered}");
    });
}

#[test]
fn comma_separated_import_clauses() {
    create_session_if_not_set_then(|_| {
        let stats = parse_stats_ok("import a.b, c.d");
        assert_eq!(stats.len(), 2);
    });
}

// ----- types --------------------------------------------------------------

fn parse_type_ok(source: &str) -> Tree {
    let (tree, _, errs) = with_parser(source, |p| p.parse_type());
    assert_eq!(errs, 0, "unexpected errors parsing type `{source}`");
    tree
}

#[test]
fn function_types() {
    create_session_if_not_set_then(|_| {
        let t = parse_type_ok("(Int, String) => Unit");
        let Tree::AppliedType(applied) = t else { panic!("expected applied type, got {t:?}") };
        assert!(applied.tpt.is_ident_named(Name::type_(Symbol::intern("Function2"))));
        assert_eq!(applied.args.len(), 3);

        let t = parse_type_ok("Int => Int");
        let Tree::AppliedType(applied) = t else { panic!() };
        assert!(applied.tpt.is_ident_named(Name::type_(Symbol::intern("Function1"))));

        let t = parse_type_ok("() => Int");
        let Tree::AppliedType(applied) = t else { panic!() };
        assert!(applied.tpt.is_ident_named(Name::type_(Symbol::intern("Function0"))));
    });
}

#[test]
fn tuple_types() {
    create_session_if_not_set_then(|_| {
        let t = parse_type_ok("(Int, String)");
        let Tree::AppliedType(applied) = t else { panic!() };
        assert_eq!(applied.args.len(), 2);
    });
}

#[test]
fn compound_types_with_refinement() {
    create_session_if_not_set_then(|_| {
        let t = parse_type_ok("A with B { def f: Int }");
        let Tree::CompoundType(compound) = t else { panic!("expected compound, got {t:?}") };
        assert_eq!(compound.templ.parents.len(), 2);
        assert_eq!(compound.templ.body.len(), 1);
    });
}

#[test]
fn singleton_and_projection_types() {
    create_session_if_not_set_then(|_| {
        let t = parse_type_ok("x.type");
        assert!(matches!(t, Tree::SingletonType(_)));

        let t = parse_type_ok("A#B");
        assert!(matches!(t, Tree::SelectFromType(_)));
    });
}

#[test]
fn wildcard_type_argument_makes_existential() {
    create_session_if_not_set_then(|_| {
        let t = parse_type_ok("List[_]");
        let Tree::ExistentialType(existential) = t else { panic!("expected existential, got {t:?}") };
        assert!(matches!(&*existential.tpt, Tree::AppliedType(_)));
        assert_eq!(existential.clauses.len(), 1);
    });
}

#[test]
fn for_some_existential() {
    create_session_if_not_set_then(|_| {
        let t = parse_type_ok("List[T] forSome { type T }");
        let Tree::ExistentialType(existential) = t else { panic!() };
        assert_eq!(existential.clauses.len(), 1);
    });
}

#[test]
fn infix_types_respect_precedence() {
    create_session_if_not_set_then(|_| {
        // A + B * C groups the `*` tighter.
        let t = parse_type_ok("A + B * C");
        let Tree::AppliedType(outer) = t else { panic!() };
        assert!(outer.tpt.is_ident_named(Name::type_(Symbol::intern("+"))));
        assert!(matches!(&outer.args[1], Tree::AppliedType(_)));
    });
}

#[test]
fn by_name_type_only_in_parameters() {
    create_session_if_not_set_then(|_| {
        let (_, _, errs) = with_parser("(=> Int)", |p| p.parse_type());
        assert!(errs >= 1);

        let (stats, _, errs) = with_parser("def f(x: => Int) = x", |p| p.parse_block_stat_seq());
        assert_eq!(errs, 0);
        let Tree::DefDef(dd) = &stats[0] else { panic!() };
        assert!(dd.paramss[0][0].mods.has(Flags::BYNAMEPARAM));
    });
}

#[test]
fn repeated_param_type() {
    create_session_if_not_set_then(|_| {
        let (stats, _, errs) = with_parser("def f(xs: Int*) = xs", |p| p.parse_block_stat_seq());
        assert_eq!(errs, 0);
        let Tree::DefDef(dd) = &stats[0] else { panic!() };
        let Tree::AppliedType(applied) = &*dd.paramss[0][0].tpt else { panic!() };
        assert!(applied.tpt.is_ident_named(Name::type_(sym::REPEATED)));
    });
}

#[test]
fn pattern_type_arguments_bind_type_variables() {
    create_session_if_not_set_then(|_| {
        let case = parse_match_case("x match { case l: List[a] => l }");
        let Tree::Typed(typed) = &*case.pat else { panic!() };
        let Tree::AppliedType(applied) = &*typed.tpt else { panic!() };
        assert!(matches!(&applied.args[0], Tree::Bind(_)));
    });
}

// ----- recovery and diagnostics -------------------------------------------

#[test]
fn parse_reports_err_but_keeps_going() {
    create_session_if_not_set_then(|_| {
        let (handler, _) = Handler::new_with_buf();
        let tokens = tokenizer::tokenize("class C { def f: Int = ; def g = 2 }", BytePos(0)).unwrap();
        let mut p = ParserContext::new(&handler, ParserOptions::default(), tokens);
        let tree = p.parse_compilation_unit();
        assert!(handler.had_errors());
        let Tree::PackageDef(pkg) = tree else { panic!() };
        let Tree::ClassDef(class) = &pkg.stats[0] else { panic!() };
        let defs: Vec<_> = class
            .impl_
            .body
            .iter()
            .filter_map(|t| match t {
                Tree::DefDef(dd) if dd.name.sym != sym::CONSTRUCTOR => Some(dd.name),
                _ => None,
            })
            .collect();
        assert_eq!(defs, vec![term("f"), term("g")]);
    });
}

#[test]
fn missing_closing_paren_is_assumed() {
    create_session_if_not_set_then(|_| {
        let (handler, _) = Handler::new_with_buf();
        let tokens = tokenizer::tokenize("f(1, 2", BytePos(0)).unwrap();
        let mut p = ParserContext::new(&handler, ParserOptions::default(), tokens);
        let tree = p.parse_expression();
        assert!(handler.had_errors());
        // The application survived with both arguments.
        let call = as_apply(&tree);
        assert_eq!(call.args.len(), 2);
    });
}

#[test]
fn incomplete_input_at_eof() {
    create_session_if_not_set_then(|_| {
        let (handler, buf) = Handler::new_with_buf();
        assert!(parse(&handler, ParserOptions::default(), "class C {").is_err());
        let rendered = buf.extract_errs().to_string();
        assert!(rendered.contains("input ends"), "got: {rendered}");
    });
}

#[test]
fn error_offsets_are_monotonic() {
    create_session_if_not_set_then(|_| {
        let (handler, buf) = Handler::new_with_buf();
        let _ = parse(&handler, ParserOptions::default(), "class C { def f(x Int) = ; val 2 = }");
        let offsets = error_offsets(&buf);
        assert!(!offsets.is_empty());
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]), "offsets not monotonic: {offsets:?}");
    });
}

#[test]
fn errors_deduplicate_by_offset() {
    create_session_if_not_set_then(|_| {
        let (_, buf, _) = with_parser("1 +: 2 + 3", |p| p.parse_expression());
        // The associativity conflict is reported exactly once.
        let rendered = buf.extract_errs().to_string();
        assert_eq!(rendered.matches("left- and right-associative").count(), 1);
    });
}

#[test]
fn markup_literal_reports_extension_point() {
    create_session_if_not_set_then(|_| {
        let (handler, buf) = Handler::new_with_buf();
        let tokens = vec![tokenizer::SpannedToken {
            token: crate::tokenizer::Token::XmlStart,
            span: vela_span::Span::dummy(),
        }];
        let mut p = ParserContext::new(&handler, ParserOptions::default(), tokens);
        let tree = p.parse_expression();
        assert!(matches!(tree, Tree::Error(_)));
        assert!(buf.extract_errs().to_string().contains("markup"), "wrong diagnostic");
    });
}

#[test]
fn deprecated_val_in_for_warns_under_future() {
    create_session_if_not_set_then(|_| {
        let (handler, _) = Handler::new_with_buf();
        let tokens = tokenizer::tokenize("for (x <- xs; val y = x) yield y", BytePos(0)).unwrap();
        let options = ParserOptions { future: true, ..Default::default() };
        let mut p = ParserContext::new(&handler, options, tokens);
        let _ = p.parse_expression();
        assert_eq!(handler.err_count(), 0);
        assert_eq!(handler.warn_count(), 1);
    });
}

#[test]
fn ast_round_trips_through_json() {
    create_session_if_not_set_then(|_| {
        let tree = parse_unit_ok("class A { def f = 1 + 2 }");
        let json = serde_json::to_string(&tree).expect("serialization failed");
        assert!(json.contains("ClassDef"));
        let back: Tree = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(tree, back);
    });
}

#[test]
fn trees_render_back_to_source_shapes() {
    create_session_if_not_set_then(|_| {
        let tree = parse_expr_ok("if (x) f(1) else g");
        assert_eq!(tree.to_string(), "if (x) f(1) else g");

        let stats = parse_stats_ok("def f(x: Int): Int = x");
        assert_eq!(stats[0].to_string(), "def f(x: Int): Int = x");
    });
}

#[test]
fn condition_without_paren_yields_error_tree() {
    create_session_if_not_set_then(|_| {
        let (tree, _, errs) = with_parser("if x) 1 else 2", |p| p.parse_expression());
        assert!(errs >= 1);
        let Tree::If(branch) = tree else { panic!("expected if, got {tree:?}") };
        assert!(matches!(&*branch.cond, Tree::Error(_)));
    });
}
