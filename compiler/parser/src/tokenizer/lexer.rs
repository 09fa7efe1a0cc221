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

use crate::tokenizer::Token;

use vela_ast::is_operator_part;
use vela_errors::{ParserError, Result};
use vela_span::{Span, Symbol};

use serde::{Deserialize, Serialize};
use std::{fmt, iter::Peekable, str::Chars};

/// Is `c` a character identifiers can start with?
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Is `c` a character identifiers can continue with?
fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Eats an identifier: a letter run, optionally continued by an operator
/// run after a trailing underscore, e.g. `value_+`.
fn eat_identifier(input: &mut Peekable<Chars<'_>>) -> Option<String> {
    input.peek().filter(|c| is_ident_start(**c))?;
    let mut ident = String::new();
    while let Some(c) = input.next_if(|c| is_ident_part(*c)) {
        ident.push(c);
    }
    // A lone `_` is reserved; it never absorbs a following operator,
    // so `_*` stays two tokens.
    if ident.ends_with('_') && ident != "_" {
        while let Some(c) = input.next_if(|c| is_operator_part(*c)) {
            ident.push(c);
        }
    }
    Some(ident)
}

/// Reads the character after a backslash in a character or string literal.
fn eat_escape(input: &mut Peekable<Chars<'_>>, len: &mut usize) -> Result<char> {
    let c = input.next().ok_or_else(ParserError::lexer_unexpected_eof)?;
    *len += c.len_utf8();
    Ok(match c {
        'b' => '\u{0008}',
        't' => '\t',
        'n' => '\n',
        'f' => '\u{000C}',
        'r' => '\r',
        '"' => '"',
        '\'' => '\'',
        '\\' => '\\',
        'u' => {
            let mut value = 0u32;
            for _ in 0..4 {
                let d = input.next().ok_or_else(ParserError::lexer_unexpected_eof)?;
                *len += d.len_utf8();
                value = value * 16 + d.to_digit(16).ok_or_else(|| ParserError::lexer_invalid_escape(d))?;
            }
            char::from_u32(value).ok_or_else(|| ParserError::lexer_invalid_escape(value))?
        }
        c => return Err(ParserError::lexer_invalid_escape(c).into()),
    })
}

impl Token {
    /// Eats a numeric literal.
    fn eat_number(input: &mut Peekable<Chars<'_>>) -> Result<(usize, Token)> {
        let mut text = String::new();

        // Hexadecimal.
        if input.peek() == Some(&'0') {
            text.push(input.next().unwrap());
            if input.next_if_eq(&'x').is_some() || input.next_if_eq(&'X').is_some() {
                text.push('x');
                while let Some(c) = input.next_if(|c| c.is_ascii_hexdigit()) {
                    text.push(c);
                }
                if text == "0x" {
                    return Err(ParserError::lexer_malformed_number(text).into());
                }
                return Ok(if input.next_if(|c| *c == 'l' || *c == 'L').is_some() {
                    (text.len() + 1, Token::LongLit(text))
                } else {
                    (text.len(), Token::IntLit(text))
                });
            }
        }

        while let Some(c) = input.next_if(|c| c.is_ascii_digit()) {
            text.push(c);
        }

        let mut is_floating = false;
        // A fraction only if a digit follows the dot, so `1.abs` still lexes
        // as a selection.
        if input.peek() == Some(&'.') {
            let mut ahead = input.clone();
            ahead.next();
            if ahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                is_floating = true;
                text.push(input.next().unwrap());
                while let Some(c) = input.next_if(|c| c.is_ascii_digit()) {
                    text.push(c);
                }
            }
        }
        if let Some(e) = input.next_if(|c| *c == 'e' || *c == 'E') {
            is_floating = true;
            text.push(e);
            if let Some(sign) = input.next_if(|c| *c == '+' || *c == '-') {
                text.push(sign);
            }
            let mut has_digits = false;
            while let Some(c) = input.next_if(|c| c.is_ascii_digit()) {
                has_digits = true;
                text.push(c);
            }
            if !has_digits {
                return Err(ParserError::lexer_malformed_number(text).into());
            }
        }

        Ok(match input.peek() {
            Some('l' | 'L') if !is_floating => {
                input.next();
                (text.len() + 1, Token::LongLit(text))
            }
            Some('f' | 'F') => {
                input.next();
                (text.len() + 1, Token::FloatLit(text))
            }
            Some('d' | 'D') => {
                input.next();
                (text.len() + 1, Token::DoubleLit(text))
            }
            _ if is_floating => (text.len(), Token::DoubleLit(text)),
            _ => (text.len(), Token::IntLit(text)),
        })
    }

    /// Eats a string literal, single or triple quoted.
    /// The leading `"` has already been seen but not consumed.
    fn eat_string(input: &mut Peekable<Chars<'_>>) -> Result<(usize, Token)> {
        input.next();
        let mut len = 1;

        // Distinguish `""`, `"""…"""` and `"…"`.
        if input.next_if_eq(&'"').is_some() {
            len += 1;
            if input.next_if_eq(&'"').is_some() {
                // Triple quoted: raw until `"""`.
                len += 1;
                let mut string = String::new();
                let mut quotes = 0;
                for c in input.by_ref() {
                    len += c.len_utf8();
                    if c == '"' {
                        quotes += 1;
                        if quotes == 3 {
                            return Ok((len, Token::StringLit(string)));
                        }
                    } else {
                        for _ in 0..quotes {
                            string.push('"');
                        }
                        quotes = 0;
                        string.push(c);
                    }
                }
                return Err(ParserError::lexer_unclosed_string(string).into());
            }
            return Ok((len, Token::StringLit(String::new())));
        }

        let mut string = String::new();
        loop {
            let Some(c) = input.next() else {
                return Err(ParserError::lexer_unclosed_string(string).into());
            };
            len += c.len_utf8();
            match c {
                '"' => return Ok((len, Token::StringLit(string))),
                '\n' => return Err(ParserError::lexer_unclosed_string(string).into()),
                '\\' => string.push(eat_escape(input, &mut len)?),
                c => string.push(c),
            }
        }
    }

    /// Eats a character literal or a symbol literal, both starting with `'`.
    fn eat_quoted(input: &mut Peekable<Chars<'_>>) -> Result<(usize, Token)> {
        input.next();
        let mut len = 1;

        // `'ident` not followed by another quote is a symbol literal.
        if input.peek().is_some_and(|c| is_ident_start(*c)) {
            let mut ahead = input.clone();
            let mut ident = String::new();
            while let Some(c) = ahead.next_if(|c| is_ident_part(*c)) {
                ident.push(c);
            }
            if ahead.peek() != Some(&'\'') {
                for _ in ident.chars() {
                    input.next();
                }
                return Ok((len + ident.len(), Token::SymbolLit(Symbol::intern(&ident))));
            }
        }

        let c = match input.next() {
            None => return Err(ParserError::lexer_unclosed_char().into()),
            Some('\\') => {
                len += 1;
                eat_escape(input, &mut len)?
            }
            Some(c) => {
                len += c.len_utf8();
                c
            }
        };
        if input.next_if_eq(&'\'').is_none() {
            return Err(ParserError::lexer_unclosed_char().into());
        }
        Ok((len + 1, Token::CharLit(c)))
    }

    /// Eats a `//` or `/*` comment; the `/` has been seen but not consumed.
    /// Block comments nest.
    fn eat_comment(input: &mut Peekable<Chars<'_>>) -> Result<(usize, Token)> {
        input.next();
        if input.next_if_eq(&'/').is_some() {
            let mut comment = String::from("//");
            while let Some(c) = input.next_if(|c| *c != '\n') {
                comment.push(c);
            }
            return Ok((comment.len(), Token::CommentLine(comment)));
        }
        if input.next_if_eq(&'*').is_some() {
            let mut comment = String::from("/*");
            let mut depth = 1usize;
            while let Some(c) = input.next() {
                comment.push(c);
                if c == '/' && input.peek() == Some(&'*') {
                    comment.push(input.next().unwrap());
                    depth += 1;
                } else if c == '*' && input.peek() == Some(&'/') {
                    comment.push(input.next().unwrap());
                    depth -= 1;
                    if depth == 0 {
                        return Ok((comment.len(), Token::CommentBlock(comment)));
                    }
                }
            }
            return Err(ParserError::lexer_unclosed_comment().into());
        }
        // A bare `/` continues as an operator identifier.
        let mut op = String::from("/");
        while let Some(c) = input.next_if(|c| is_operator_part(*c)) {
            op.push(c);
        }
        Ok((op.len(), operator_token(&op)))
    }

    /// Returns a tuple: `(token length, token)` if the next token can be eaten.
    /// The lexer works on whole characters; byte lengths are computed from them.
    pub(crate) fn eat(input: &str) -> Result<(usize, Token)> {
        if input.is_empty() {
            return Err(ParserError::lexer_empty_input().into());
        }

        let mut input = input.chars().peekable();

        let single = |input: &mut Peekable<Chars<'_>>, token| {
            input.next();
            Ok((1, token))
        };

        match *input.peek().ok_or_else(ParserError::lexer_empty_input)? {
            c if c.is_whitespace() => {
                input.next();
                return Ok((c.len_utf8(), Token::WhiteSpace));
            }
            c if c.is_ascii_digit() => return Self::eat_number(&mut input),
            '"' => return Self::eat_string(&mut input),
            '\'' => return Self::eat_quoted(&mut input),
            '/' => return Self::eat_comment(&mut input),
            '(' => return single(&mut input, Token::LParen),
            ')' => return single(&mut input, Token::RParen),
            '[' => return single(&mut input, Token::LBracket),
            ']' => return single(&mut input, Token::RBracket),
            '{' => return single(&mut input, Token::LBrace),
            '}' => return single(&mut input, Token::RBrace),
            ',' => return single(&mut input, Token::Comma),
            ';' => return single(&mut input, Token::Semi),
            '.' => return single(&mut input, Token::Dot),
            '`' => {
                input.next();
                let mut ident = String::new();
                let mut len = 1;
                loop {
                    match input.next() {
                        None | Some('\n') => return Err(ParserError::lexer_unclosed_backquote().into()),
                        Some('`') => return Ok((len + 1, Token::Ident(Symbol::intern(&ident), true))),
                        Some(c) => {
                            len += c.len_utf8();
                            ident.push(c);
                        }
                    }
                }
            }
            _ => (),
        }

        if let Some(ident) = eat_identifier(&mut input) {
            let byte_len = ident.len();
            let token = match Token::keyword(&ident) {
                _ if ident == "_" => Token::Underscore,
                Some(keyword) => keyword,
                None => {
                    // An interpolated string starts with `id"`.
                    if input.peek() == Some(&'"') {
                        Token::InterpolationId(Symbol::intern(&ident))
                    } else {
                        Token::Ident(Symbol::intern(&ident), false)
                    }
                }
            };
            return Ok((byte_len, token));
        }

        if input.peek().is_some_and(|c| is_operator_part(*c)) {
            let mut op = String::new();
            while let Some(c) = input.next_if(|c| is_operator_part(*c)) {
                op.push(c);
            }
            return Ok((op.len(), operator_token(&op)));
        }

        Err(ParserError::lexer_could_not_lex(
            input.take_while(|c| *c != ';' && !c.is_whitespace()).collect::<String>(),
        )
        .into())
    }
}

/// Folds the operator spellings that are their own tokens;
/// all other operator runs stay identifiers.
fn operator_token(op: &str) -> Token {
    match op {
        ":" => Token::Colon,
        "=" => Token::Eq,
        "=>" => Token::Arrow,
        "<-" => Token::LArrow,
        "<:" => Token::Subtype,
        ">:" => Token::Supertype,
        "<%" => Token::ViewBound,
        "#" => Token::Hash,
        "@" => Token::At,
        _ => Token::Ident(Symbol::intern(op), false),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

impl SpannedToken {
    /// Returns a dummy token at a dummy span.
    /// Deliberately not `Eof`, so a fresh cursor can take its first step.
    pub const fn dummy() -> Self {
        Self { token: Token::Semi, span: Span::dummy() }
    }
}

impl fmt::Display for SpannedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' @ ", self.token.to_string().trim())?;
        self.span.fmt(f)
    }
}
