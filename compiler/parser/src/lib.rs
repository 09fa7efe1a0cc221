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

//! The parser to convert Vela code text into an [`Ast`].
//!
//! Interned names live in session globals: wrap calls into this crate in
//! `vela_span::create_session_if_not_set_then`.

#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub(crate) mod tokenizer;
pub use tokenizer::KEYWORD_TOKENS;
pub(crate) use tokenizer::*;

pub mod parser;
pub use parser::*;

use vela_ast::Ast;
use vela_errors::{emitter::Handler, Result};

#[cfg(test)]
mod test;

/// Creates a new AST from the given source code text.
pub fn parse_ast(handler: &Handler, options: ParserOptions, source: &str) -> Result<Ast> {
    Ok(Ast::new(parse(handler, options, source)?))
}
