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

use crate::create_messages;
use std::fmt::Display;

create_messages!(
    /// ParserError enum that represents all the errors for the `vela-parser` crate.
    ParserError,
    code_mask: 370000i32,
    code_prefix: "PAR",

    @formatted
    unexpected {
        args: (found: impl Display, expected: impl Display),
        msg: format!("`{expected}` expected but `{found}` found."),
        help: None,
    }

    @formatted
    expected_identifier {
        args: (found: impl Display),
        msg: format!("identifier expected but `{found}` found."),
        help: None,
    }

    @formatted
    illegal_start_of_simple_expression {
        args: (found: impl Display),
        msg: format!("illegal start of simple expression: `{found}`."),
        help: None,
    }

    @formatted
    illegal_start_of_simple_pattern {
        args: (found: impl Display),
        msg: format!("illegal start of simple pattern: `{found}`."),
        help: None,
    }

    @formatted
    illegal_start_of_definition {
        args: (found: impl Display),
        msg: format!("illegal start of definition: `{found}`."),
        help: None,
    }

    @formatted
    illegal_start_of_statement {
        args: (found: impl Display),
        msg: format!("illegal start of statement: `{found}`."),
        help: None,
    }

    @formatted
    incomplete_input {
        args: (msg: impl Display),
        msg: format!("{msg}"),
        help: Some("the input ends before the enclosing construct is complete.".to_string()),
    }

    @formatted
    mixed_associativity {
        args: (),
        msg: "left- and right-associative operators with same precedence may not be mixed".to_string(),
        help: None,
    }

    @formatted
    type_application_in_pattern {
        args: (),
        msg: "type application is not allowed in pattern".to_string(),
        help: None,
    }

    @formatted
    type_application_on_postfix {
        args: (),
        msg: "type application is not allowed for postfix operators".to_string(),
        help: None,
    }

    @formatted
    unbound_placeholder_parameter {
        args: (),
        msg: "unbound placeholder parameter".to_string(),
        help: None,
    }

    @formatted
    unbound_wildcard_type {
        args: (),
        msg: "unbound wildcard type".to_string(),
        help: None,
    }

    @formatted
    pattern_var_uppercase {
        args: (),
        msg: "Pattern variables must start with a lower-case letter".to_string(),
        help: None,
    }

    @formatted
    seq_wildcard_not_last {
        args: (),
        msg: "bad use of `_*` (a sequence pattern must be the last pattern)".to_string(),
        help: None,
    }

    @formatted
    seq_wildcard_not_allowed {
        args: (),
        msg: "bad use of `_*` (sequence pattern not allowed)".to_string(),
        help: None,
    }

    @formatted
    seq_wildcard_bad_close {
        args: (),
        msg: "bad brace or paren after `_*`".to_string(),
        help: None,
    }

    @formatted
    use_seq_wildcard {
        args: (),
        msg: "use `_*` to match a sequence".to_string(),
        help: None,
    }

    @formatted
    trailing_star_pattern {
        args: (),
        msg: "trailing `*` is not a valid pattern".to_string(),
        help: None,
    }

    @formatted
    lazy_values_may_not_be_abstract {
        args: (),
        msg: "lazy values may not be abstract".to_string(),
        help: None,
    }

    @formatted
    lazy_pattern_definition {
        args: (),
        msg: "lazy values may not be bound by a pattern".to_string(),
        help: None,
    }

    @formatted
    wildcard_import_not_last {
        args: (),
        msg: "wildcard import must be in the last position".to_string(),
        help: None,
    }

    @formatted
    case_class_without_params {
        args: (),
        msg: "case classes require a parameter list".to_string(),
        help: Some("use a case object, or add an explicit `()` parameter list.".to_string()),
    }

    @formatted
    aux_constructor_needs_params {
        args: (),
        msg: "auxiliary constructor needs non-implicit parameter list".to_string(),
        help: None,
    }

    @formatted
    trait_bounds_on_type_params {
        args: (),
        msg: "traits cannot have type parameters with context bounds `: ...` nor view bounds `<% ...`".to_string(),
        help: None,
    }

    @formatted
    early_defs_only_vals {
        args: (),
        msg: "only concrete field definitions are allowed in early object initialization section".to_string(),
        help: None,
    }

    @formatted
    by_name_type_not_allowed {
        args: (),
        msg: "no by-name parameter type allowed here".to_string(),
        help: None,
    }

    @formatted
    repeated_type_not_allowed {
        args: (),
        msg: "no `*` parameter type allowed here".to_string(),
        help: None,
    }

    @formatted
    missing_parameter_type {
        args: (),
        msg: "missing parameter type".to_string(),
        help: None,
    }

    @formatted
    not_a_legal_formal_parameter {
        args: (),
        msg: "not a legal formal parameter".to_string(),
        help: None,
    }

    @formatted
    ambiguous_typed_parameter {
        args: (),
        msg: "an unparenthesised typed identifier in template position is ambiguous".to_string(),
        help: Some("wrap the function parameter in parentheses, or move the self-type annotation to the start of the body.".to_string()),
    }

    @formatted
    not_a_legal_existential_clause {
        args: (),
        msg: "not a legal existential clause".to_string(),
        help: None,
    }

    @formatted
    illegal_start_of_declaration {
        args: (found: impl Display),
        msg: format!("illegal start of declaration: `{found}`."),
        help: None,
    }

    @formatted
    expected_class_or_object_definition {
        args: (),
        msg: "expected class or object definition".to_string(),
        help: None,
    }

    @formatted
    lazy_not_allowed {
        args: (),
        msg: "lazy not allowed here; only vals can be lazy".to_string(),
        help: None,
    }

    @formatted
    classes_cannot_be_virtual {
        args: (),
        msg: "classes are not allowed to be virtual".to_string(),
        help: None,
    }

    @formatted
    no_type_params_allowed_here {
        args: (),
        msg: "no type parameters allowed here".to_string(),
        help: None,
    }

    @formatted
    val_params_no_by_name {
        args: (),
        msg: "`val` parameters may not be call-by-name".to_string(),
        help: None,
    }

    @formatted
    implicit_params_no_by_name {
        args: (),
        msg: "implicit parameters may not be call-by-name".to_string(),
        help: None,
    }

    @formatted
    lazy_param_not_allowed {
        args: (),
        msg: "lazy modifier not allowed here; use call-by-name parameters instead".to_string(),
        help: None,
    }

    @formatted
    pattern_definition_may_not_be_abstract {
        args: (),
        msg: "pattern definition may not be abstract".to_string(),
        help: None,
    }

    @formatted
    repeated_modifier {
        args: (modifier: impl Display),
        msg: format!("repeated modifier `{modifier}`."),
        help: None,
    }

    @formatted
    traits_objects_no_params {
        args: (),
        msg: "traits or objects may not have parameters".to_string(),
        help: None,
    }

    @formatted
    eq_or_bounds_expected {
        args: (),
        msg: "`=`, `>:`, or `<:` expected".to_string(),
        help: None,
    }

    @formatted
    markup_not_supported {
        args: (),
        msg: "markup literals are not supported".to_string(),
        help: None,
    }

    @formatted
    malformed_literal {
        args: (text: impl Display),
        msg: format!("malformed literal `{text}`."),
        help: None,
    }

    @formatted
    val_in_for_needs_assignment {
        args: (),
        msg: "`val` in for comprehension must be followed by assignment".to_string(),
        help: None,
    }

    @formatted
    missing_condition {
        args: (),
        msg: "a parenthesised condition is required here".to_string(),
        help: None,
    }

    @backtraced
    lexer_empty_input {
        args: (),
        msg: "the lexer received empty input.".to_string(),
        help: None,
    }

    @backtraced
    lexer_unclosed_string {
        args: (content: impl Display),
        msg: format!("unclosed string literal `\"{content}`."),
        help: None,
    }

    @backtraced
    lexer_unclosed_char {
        args: (),
        msg: "unclosed character literal.".to_string(),
        help: None,
    }

    @backtraced
    lexer_invalid_escape {
        args: (c: impl Display),
        msg: format!("invalid escape sequence `\\{c}`."),
        help: None,
    }

    @backtraced
    lexer_unclosed_comment {
        args: (),
        msg: "unclosed block comment.".to_string(),
        help: None,
    }

    @backtraced
    lexer_unclosed_interpolation {
        args: (),
        msg: "unclosed string interpolation.".to_string(),
        help: None,
    }

    @backtraced
    lexer_unclosed_backquote {
        args: (),
        msg: "unclosed backquoted identifier.".to_string(),
        help: None,
    }

    @backtraced
    lexer_malformed_number {
        args: (text: impl Display),
        msg: format!("malformed numeric literal `{text}`."),
        help: None,
    }

    @backtraced
    lexer_unexpected_eof {
        args: (),
        msg: "unexpected end of input inside a literal.".to_string(),
        help: None,
    }

    @backtraced
    lexer_could_not_lex {
        args: (found: impl Display),
        msg: format!("could not lex the following content: `{found}`."),
        help: None,
    }
);
