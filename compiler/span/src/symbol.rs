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

use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{cell::RefCell, fmt};

/// A helper for `symbols!` defining the static symbol table.
macro_rules! consts {
    ($index:expr,) => {};
    ($index:expr, $name:ident $(: $value:expr)?, $($rest:tt)*) => {
        #[allow(non_upper_case_globals)]
        pub const $name: $crate::symbol::Symbol = $crate::symbol::Symbol::new($index);
        consts!($index + 1u32, $($rest)*);
    };
}

macro_rules! strings {
    ($name:ident) => {
        stringify!($name)
    };
    ($name:ident: $value:expr) => {
        $value
    };
}

/// Defines the statically pre-interned symbols,
/// accessible as constants under [`sym`].
macro_rules! symbols {
    ($($name:ident $(: $value:expr)?),* $(,)?) => {
        /// Symbols interned up-front for every session.
        pub mod sym {
            consts!(0u32, $($name $(: $value)?,)*);
        }

        const PRE_INTERNED: &[&str] = &[$(strings!($name $(: $value)?)),*];
    };
}

symbols! {
    // Special names.
    EMPTY: "",
    ERROR: "<error>",
    USCORE: "_",
    CONSTRUCTOR: "<init>",
    ROOT: "_root_",
    EMPTY_PACKAGE: "<empty>",
    PACKAGE: "package",
    ANON_CLASS: "$anon",
    WILDCARD_STAR: "_*",
    BYNAME: "<byname>",
    REPEATED: "<repeated>",

    // Operator spellings the parser matches on.
    star: "*",
    bar: "|",
    plus: "+",
    minus: "-",
    bang: "!",
    tilde: "~",
    eq_op: "=",

    // Prefix operator selections.
    unary_plus: "unary_+",
    unary_minus: "unary_-",
    unary_bang: "unary_!",
    unary_tilde: "unary_~",

    // Names the desugarings target.
    map,
    flatMap,
    foreach,
    withFilter,
    filter,
    apply,
    isDefinedAt,
    StringContext,
    Throwable,

    // The root language package and its value classes.
    vela,
    AnyRef,
    Product,
    Serializable,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Unit,
    AnyVal,
    Any,
}

/// An interned string.
///
/// Represented as an index into the session interner,
/// so equality and hashing are cheap.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a symbol from a raw interner index.
    /// Used by the `symbols!` table; `intern` is the public way in.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Maps the string `s` to its unique symbol for this session.
    pub fn intern(s: &str) -> Self {
        with_session_globals(|session_globals| session_globals.symbol_interner.intern(s))
    }

    /// The raw interner index of this symbol.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Runs `f` over the string this symbol stands for.
    pub fn with<R>(self, f: impl FnOnce(&str) -> R) -> R {
        with_session_globals(|session_globals| session_globals.symbol_interner.with_str(self, f))
    }

    /// Copies out the string this symbol stands for.
    pub fn as_str(self) -> String {
        self.with(|s| s.to_owned())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|s| f.write_str(s))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.with(|s| serializer.serialize_str(s))
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string = String::deserialize(deserializer)?;
        Ok(Symbol::intern(&string))
    }
}

/// The interner owning every string used as a symbol in one session.
pub struct Interner {
    inner: RefCell<IndexSet<String, FxBuildHasher>>,
}

impl Interner {
    /// Returns an interner prefilled with the `symbols!` table.
    fn prefilled() -> Self {
        let mut set: IndexSet<String, FxBuildHasher> = IndexSet::default();
        for &string in PRE_INTERNED {
            set.insert(string.to_owned());
        }
        Self { inner: RefCell::new(set) }
    }

    /// Interns `string`, returning its symbol.
    fn intern(&self, string: &str) -> Symbol {
        let mut inner = self.inner.borrow_mut();
        if let Some(index) = inner.get_index_of(string) {
            return Symbol::new(index as u32);
        }
        let (index, _) = inner.insert_full(string.to_owned());
        Symbol::new(index as u32)
    }

    /// Runs `f` over the string `symbol` was interned from.
    fn with_str<R>(&self, symbol: Symbol, f: impl FnOnce(&str) -> R) -> R {
        let inner = self.inner.borrow();
        let string = inner
            .get_index(symbol.0 as usize)
            .unwrap_or_else(|| panic!("symbol {} was not interned in this session", symbol.0));
        f(string)
    }
}

/// A per-parse source of unique names.
///
/// `RefCell` is used so the generator can be shared without `&mut`
/// threading through the parser.
#[derive(Default)]
pub struct FreshNameSource {
    counter: RefCell<u32>,
}

impl FreshNameSource {
    /// Returns a new source whose first name uses the number `next`.
    pub fn new(next: u32) -> Self {
        Self { counter: RefCell::new(next) }
    }

    /// Returns a fresh name built from `prefix`, unique for this source.
    pub fn fresh(&self, prefix: &str) -> Symbol {
        let mut counter = self.counter.borrow_mut();
        *counter += 1;
        Symbol::intern(&format!("{}{}", prefix, counter))
    }
}

/// Globals for one compiler session.
pub struct SessionGlobals {
    /// The interner for `Symbol`s used in this session.
    symbol_interner: Interner,
}

impl Default for SessionGlobals {
    fn default() -> Self {
        Self { symbol_interner: Interner::prefilled() }
    }
}

scoped_tls::scoped_thread_local!(static SESSION_GLOBALS: SessionGlobals);

/// Creates the session globals if they do not exist already
/// and then runs `f` with them in scope.
pub fn create_session_if_not_set_then<R>(f: impl FnOnce(&SessionGlobals) -> R) -> R {
    if SESSION_GLOBALS.is_set() {
        SESSION_GLOBALS.with(f)
    } else {
        let session_globals = SessionGlobals::default();
        SESSION_GLOBALS.set(&session_globals, || SESSION_GLOBALS.with(f))
    }
}

/// Runs `f` with the session globals, which must have been set.
pub fn with_session_globals<R>(f: impl FnOnce(&SessionGlobals) -> R) -> R {
    SESSION_GLOBALS.with(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable() {
        create_session_if_not_set_then(|_| {
            let a = Symbol::intern("hello");
            let b = Symbol::intern("hello");
            let c = Symbol::intern("world");
            assert_eq!(a, b);
            assert_ne!(a, c);
            assert_eq!(a.as_str(), "hello");
        });
    }

    #[test]
    fn static_symbols_resolve() {
        create_session_if_not_set_then(|_| {
            assert_eq!(sym::USCORE.as_str(), "_");
            assert_eq!(sym::unary_minus.as_str(), "unary_-");
            assert_eq!(Symbol::intern("_"), sym::USCORE);
            assert_eq!(Symbol::intern("flatMap"), sym::flatMap);
        });
    }

    #[test]
    fn fresh_names_are_distinct() {
        create_session_if_not_set_then(|_| {
            let fresh = FreshNameSource::default();
            let a = fresh.fresh("x$");
            let b = fresh.fresh("x$");
            assert_ne!(a, b);
            assert_eq!(a.as_str(), "x$1");
            assert_eq!(b.as_str(), "x$2");
        });
    }
}
