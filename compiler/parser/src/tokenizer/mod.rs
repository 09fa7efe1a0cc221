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

//! The tokenizer to convert Vela code text into tokens.
//!
//! This module contains the [`tokenize()`] method which breaks down string
//! text into tokens, runs the layout pass that turns line breaks into
//! statement separators, and strips trivia.

pub(crate) mod token;
pub use self::token::KEYWORD_TOKENS;
pub(crate) use self::token::*;

pub(crate) mod lexer;
pub(crate) use self::lexer::*;

use vela_errors::{ParserError, Result};
use vela_span::{BytePos, Pos, Span, Symbol};

/// Creates a new vector of spanned tokens from the given source text,
/// with statement separators inserted and trivia removed.
///
/// The `start_pos` byte position determines where spans will start.
pub fn tokenize(input: &str, start_pos: BytePos) -> Result<Vec<SpannedToken>> {
    let raw = tokenize_raw(input, start_pos)?;
    Ok(insert_separators(input, start_pos, raw))
}

/// Scans `input` into raw tokens, including whitespace and comments.
/// Interpolated strings are flattened into an `InterpolationId` head,
/// `StringPart` pieces, embedded expression tokens, and a closing
/// string literal.
pub(crate) fn tokenize_raw(input: &str, start_pos: BytePos) -> Result<Vec<SpannedToken>> {
    let mut tokens = Vec::new();
    let mut index = 0usize;
    while index < input.len() {
        let (token_len, token) = Token::eat(&input[index..])?;
        let lo = start_pos + BytePos::from_usize(index);
        let span = Span::new(lo, lo + BytePos::from_usize(token_len));
        index += token_len;
        let is_interpolation = matches!(token, Token::InterpolationId(_));
        tokens.push(SpannedToken { token, span });
        if is_interpolation {
            index = tokenize_interpolation(input, index, start_pos, &mut tokens)?;
        }
    }
    Ok(tokens)
}

/// Scans the quoted part of an interpolated string starting at the opening
/// `"` and appends the flattened tokens. Returns the index after the
/// closing quote.
fn tokenize_interpolation(
    input: &str,
    mut index: usize,
    start_pos: BytePos,
    tokens: &mut Vec<SpannedToken>,
) -> Result<usize> {
    let at = |index: usize| input[index..].chars().next();
    let span_from = |from: usize, to: usize| {
        Span::new(start_pos + BytePos::from_usize(from), start_pos + BytePos::from_usize(to))
    };

    if at(index) != Some('"') {
        return Err(ParserError::lexer_unclosed_interpolation().into());
    }
    index += 1;

    let mut part = String::new();
    let mut part_start = index;
    loop {
        let Some(c) = at(index) else {
            return Err(ParserError::lexer_unclosed_interpolation().into());
        };
        match c {
            '\n' => return Err(ParserError::lexer_unclosed_interpolation().into()),
            '"' => {
                tokens.push(SpannedToken {
                    token: Token::StringLit(std::mem::take(&mut part)),
                    span: span_from(part_start, index + 1),
                });
                return Ok(index + 1);
            }
            '\\' => {
                let mut chars = input[index + 1..].chars();
                let mut len = 0usize;
                let escaped = match chars.next() {
                    None => return Err(ParserError::lexer_unclosed_interpolation().into()),
                    Some('b') => {
                        len += 1;
                        '\u{0008}'
                    }
                    Some('t') => {
                        len += 1;
                        '\t'
                    }
                    Some('n') => {
                        len += 1;
                        '\n'
                    }
                    Some('f') => {
                        len += 1;
                        '\u{000C}'
                    }
                    Some('r') => {
                        len += 1;
                        '\r'
                    }
                    Some(c @ ('"' | '\'' | '\\' | '$')) => {
                        len += c.len_utf8();
                        c
                    }
                    Some(c) => return Err(ParserError::lexer_invalid_escape(c).into()),
                };
                part.push(escaped);
                index += 1 + len;
            }
            '$' => {
                match at(index + 1) {
                    Some('$') => {
                        part.push('$');
                        index += 2;
                    }
                    Some('{') => {
                        tokens.push(SpannedToken {
                            token: Token::StringPart(std::mem::take(&mut part)),
                            span: span_from(part_start, index),
                        });
                        index += 1;
                        // Tokenize the embedded expression, braces included.
                        let mut depth = 0usize;
                        loop {
                            if index >= input.len() {
                                return Err(ParserError::lexer_unclosed_interpolation().into());
                            }
                            let (token_len, token) = Token::eat(&input[index..])?;
                            let span = span_from(index, index + token_len);
                            index += token_len;
                            match &token {
                                Token::LBrace => depth += 1,
                                Token::RBrace => depth -= 1,
                                _ => {}
                            }
                            let is_interpolation = matches!(token, Token::InterpolationId(_));
                            let done = depth == 0;
                            tokens.push(SpannedToken { token, span });
                            if is_interpolation {
                                index = tokenize_interpolation(input, index, start_pos, tokens)?;
                            }
                            if done {
                                break;
                            }
                        }
                        part_start = index;
                    }
                    Some(c) if c.is_alphabetic() || c == '_' => {
                        tokens.push(SpannedToken {
                            token: Token::StringPart(std::mem::take(&mut part)),
                            span: span_from(part_start, index),
                        });
                        index += 1;
                        let ident_start = index;
                        let mut ident = String::new();
                        while let Some(c) = at(index) {
                            if c.is_alphanumeric() || c == '_' {
                                ident.push(c);
                                index += c.len_utf8();
                            } else {
                                break;
                            }
                        }
                        tokens.push(SpannedToken {
                            token: Token::Ident(Symbol::intern(&ident), false),
                            span: span_from(ident_start, index),
                        });
                        part_start = index;
                    }
                    _ => return Err(ParserError::lexer_unclosed_interpolation().into()),
                }
            }
            c => {
                part.push(c);
                index += c.len_utf8();
            }
        }
    }
}

/// The enclosing-syntax regions the layout pass tracks.
/// Newlines become statement separators only at the top level and
/// directly inside braces.
#[derive(Copy, Clone, PartialEq)]
enum Region {
    Paren,
    Bracket,
    Brace,
    /// Between a `case` and its `=>`.
    Arrow,
}

/// Walks the raw tokens, inserting `NewLine`/`NewLines` separators where
/// the layout rules call for them and dropping trivia.
fn insert_separators(input: &str, start_pos: BytePos, raw: Vec<SpannedToken>) -> Vec<SpannedToken> {
    let mut out: Vec<SpannedToken> = Vec::with_capacity(raw.len());
    let mut regions: Vec<Region> = Vec::new();
    let mut pending_newlines = 0usize;
    let mut break_offset = BytePos(0);

    // The next non-trivia token after position `i`, for `case class` detection.
    let next_meaningful = |from: usize| raw[from..].iter().find(|t| !t.token.is_trivia());

    for (i, spanned) in raw.iter().enumerate() {
        if spanned.token.is_trivia() {
            let lo = spanned.span.lo.to_usize() - start_pos.to_usize();
            let hi = spanned.span.hi.to_usize() - start_pos.to_usize();
            for (k, _) in input[lo..hi].match_indices('\n') {
                if pending_newlines == 0 {
                    break_offset = spanned.span.lo + BytePos::from_usize(k);
                }
                pending_newlines += 1;
            }
            continue;
        }

        let newlines_allowed = regions.is_empty() || regions.last() == Some(&Region::Brace);
        if pending_newlines > 0
            && newlines_allowed
            && out.last().is_some_and(|prev| prev.token.can_end_stat())
            && spanned.token.can_begin_stat()
        {
            let token = if pending_newlines > 1 { Token::NewLines } else { Token::NewLine };
            let span = Span::new(break_offset, break_offset + BytePos(1));
            out.push(SpannedToken { token, span });
        }
        pending_newlines = 0;

        match &spanned.token {
            Token::LParen => regions.push(Region::Paren),
            Token::LBracket => regions.push(Region::Bracket),
            Token::LBrace => regions.push(Region::Brace),
            Token::Case => {
                // `case class` and `case object` open no case clause.
                let follows_template = matches!(
                    next_meaningful(i + 1).map(|t| &t.token),
                    Some(Token::Class | Token::Object)
                );
                if !follows_template {
                    regions.push(Region::Arrow);
                }
            }
            Token::RBrace => {
                while let Some(region) = regions.pop() {
                    if region == Region::Brace {
                        break;
                    }
                }
            }
            Token::RParen => {
                if regions.last() == Some(&Region::Paren) {
                    regions.pop();
                }
            }
            Token::RBracket => {
                if regions.last() == Some(&Region::Bracket) {
                    regions.pop();
                }
            }
            Token::Arrow => {
                if regions.last() == Some(&Region::Arrow) {
                    regions.pop();
                }
            }
            _ => {}
        }

        out.push(spanned.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_span::create_session_if_not_set_then;

    fn kinds(src: &str) -> Vec<Token> {
        tokenize(src, BytePos(0)).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_tokenizer() {
        create_session_if_not_set_then(|_| {
            let tokens = kinds("val x = 1 + 2");
            assert_eq!(
                tokens,
                vec![
                    Token::Val,
                    Token::Ident(Symbol::intern("x"), false),
                    Token::Eq,
                    Token::IntLit("1".into()),
                    Token::Ident(Symbol::intern("+"), false),
                    Token::IntLit("2".into()),
                ]
            );
        });
    }

    #[test]
    fn operators_fold_to_keyword_tokens() {
        create_session_if_not_set_then(|_| {
            let tokens = kinds("=> <- <: >: <% = : # @ <= |");
            assert_eq!(
                tokens,
                vec![
                    Token::Arrow,
                    Token::LArrow,
                    Token::Subtype,
                    Token::Supertype,
                    Token::ViewBound,
                    Token::Eq,
                    Token::Colon,
                    Token::Hash,
                    Token::At,
                    Token::Ident(Symbol::intern("<="), false),
                    Token::Ident(Symbol::intern("|"), false),
                ]
            );
        });
    }

    #[test]
    fn underscore_star_stays_two_tokens() {
        create_session_if_not_set_then(|_| {
            assert_eq!(
                kinds("_* _foo foo_+"),
                vec![
                    Token::Underscore,
                    Token::Ident(Symbol::intern("*"), false),
                    Token::Ident(Symbol::intern("_foo"), false),
                    Token::Ident(Symbol::intern("foo_+"), false),
                ]
            );
        });
    }

    #[test]
    fn literals() {
        create_session_if_not_set_then(|_| {
            assert_eq!(
                kinds("1 42L 3.14 2.5e3 1.5F 'a' \"hi\" 'sym true null"),
                vec![
                    Token::IntLit("1".into()),
                    Token::LongLit("42".into()),
                    Token::DoubleLit("3.14".into()),
                    Token::DoubleLit("2.5e3".into()),
                    Token::FloatLit("1.5".into()),
                    Token::CharLit('a'),
                    Token::StringLit("hi".into()),
                    Token::SymbolLit(Symbol::intern("sym")),
                    Token::True,
                    Token::Null,
                ]
            );
        });
    }

    #[test]
    fn member_selection_on_int_literal() {
        create_session_if_not_set_then(|_| {
            assert_eq!(
                kinds("1.abs"),
                vec![
                    Token::IntLit("1".into()),
                    Token::Dot,
                    Token::Ident(Symbol::intern("abs"), false),
                ]
            );
        });
    }

    #[test]
    fn newline_inserted_between_statements() {
        create_session_if_not_set_then(|_| {
            let tokens = kinds("val x = 1\nval y = 2");
            assert!(tokens.contains(&Token::NewLine));
        });
    }

    #[test]
    fn newline_suppressed_inside_parens() {
        create_session_if_not_set_then(|_| {
            let tokens = kinds("f(a,\nb)");
            assert!(!tokens.contains(&Token::NewLine));
        });
    }

    #[test]
    fn newline_after_trailing_operator_is_inserted() {
        // The parser is the one that eats it, via `newline_opt_when_following`.
        create_session_if_not_set_then(|_| {
            let tokens = kinds("a +\nb");
            assert!(tokens.contains(&Token::NewLine));
        });
    }

    #[test]
    fn blank_line_inserts_newlines_token() {
        create_session_if_not_set_then(|_| {
            let tokens = kinds("a\n\nb");
            assert!(tokens.contains(&Token::NewLines));
        });
    }

    #[test]
    fn case_suppresses_newline_until_arrow() {
        create_session_if_not_set_then(|_| {
            // No separator between the pattern lines, one after the body.
            let tokens = kinds("x match { case a |\nb => 1\ncase _ => 2 }");
            let newline_count = tokens.iter().filter(|t| **t == Token::NewLine).count();
            assert_eq!(newline_count, 1);
        });
    }

    #[test]
    fn interpolation_is_flattened() {
        create_session_if_not_set_then(|_| {
            assert_eq!(
                kinds(r#"s"a${x}b""#),
                vec![
                    Token::InterpolationId(Symbol::intern("s")),
                    Token::StringPart("a".into()),
                    Token::LBrace,
                    Token::Ident(Symbol::intern("x"), false),
                    Token::RBrace,
                    Token::StringLit("b".into()),
                ]
            );
            assert_eq!(
                kinds(r#"s"hi $name!""#),
                vec![
                    Token::InterpolationId(Symbol::intern("s")),
                    Token::StringPart("hi ".into()),
                    Token::Ident(Symbol::intern("name"), false),
                    Token::StringLit("!".into()),
                ]
            );
        });
    }

    #[test]
    fn nested_comments() {
        create_session_if_not_set_then(|_| {
            assert_eq!(kinds("/* a /* b */ c */ x"), vec![Token::Ident(Symbol::intern("x"), false)]);
        });
    }
}
