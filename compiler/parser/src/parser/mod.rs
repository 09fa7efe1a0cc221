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

//! The parser to convert Vela token streams into [`Tree`] ASTs.
//!
//! Errors are reported to the handler and parsing continues with local
//! recovery; the entry points return `Err` only if any error was emitted.

use crate::tokenizer::*;

use vela_ast::*;
use vela_errors::{emitter::Handler, ParserError, ParserWarning, Result};
use vela_span::{sym, BytePos, FreshNameSource, Span, Symbol};

mod builder;
pub(crate) use builder::*;

mod context;
pub use context::*;

pub mod expression;
pub mod file;
pub mod pattern;
pub(crate) use pattern::*;
mod precedence;
pub(crate) use precedence::*;
pub mod type_;
pub(crate) use type_::*;

/// Where an expression occurs; selects the follow set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// An ordinary expression position.
    Local,
    /// A statement in a block.
    InBlock,
    /// A statement in a template body.
    InTemplate,
}

/// Feature toggles of the parser.
#[derive(Clone, Debug, Default)]
pub struct ParserOptions {
    /// Enables deprecation warnings for view bounds, procedure syntax,
    /// and `val` in for-comprehensions.
    pub future: bool,
    /// Allows omitting parameter type annotations.
    pub method_infer: bool,
    /// Permits `trait T <: …` to mark the trait deferred.
    pub virtual_classes: bool,
}

fn ensure_eof(p: &mut ParserContext<'_>) {
    if p.has_next() {
        let err = ParserError::unexpected(&p.token.token, "end of input", p.token.span);
        p.syntax_error(err, false);
    }
}

/// Parses a compilation unit from `source`.
pub fn parse(handler: &Handler, options: ParserOptions, source: &str) -> Result<Tree> {
    let tokens = crate::tokenizer::tokenize(source, BytePos(0))?;
    tracing::debug!(tokens = tokens.len(), "parsing compilation unit");
    let mut p = ParserContext::new(handler, options, tokens);
    let tree = p.parse_compilation_unit();
    ensure_eof(&mut p);
    handler.last_err()?;
    Ok(tree)
}

/// Parses a sequence of template statements from `source`.
pub fn parse_stats(handler: &Handler, options: ParserOptions, source: &str) -> Result<Vec<Tree>> {
    let tokens = crate::tokenizer::tokenize(source, BytePos(0))?;
    tracing::debug!(tokens = tokens.len(), "parsing template statements");
    let mut p = ParserContext::new(handler, options, tokens);
    let (_, stats) = p.check_no_escaping_placeholders(|p| p.parse_template_stat_seq());
    ensure_eof(&mut p);
    handler.last_err()?;
    Ok(stats)
}

/// Parses top-level statements, packagings included, from `source`.
pub fn parse_stats_or_packages(handler: &Handler, options: ParserOptions, source: &str) -> Result<Vec<Tree>> {
    let tokens = crate::tokenizer::tokenize(source, BytePos(0))?;
    tracing::debug!(tokens = tokens.len(), "parsing top-level statements");
    let mut p = ParserContext::new(handler, options, tokens);
    let stats = p.check_no_escaping_placeholders(|p| p.parse_top_stat_seq());
    ensure_eof(&mut p);
    handler.last_err()?;
    Ok(stats)
}
