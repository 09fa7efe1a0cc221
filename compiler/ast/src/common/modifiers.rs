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

use crate::{Name, Tree};

use serde::{Deserialize, Serialize};
use std::fmt;

bitflags::bitflags! {
    /// The modifier flags a definition can carry out of the parser.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Flags: u32 {
        const IMPLICIT      = 1 << 0;
        const FINAL         = 1 << 1;
        const PRIVATE       = 1 << 2;
        const PROTECTED     = 1 << 3;
        const SEALED        = 1 << 4;
        const OVERRIDE      = 1 << 5;
        const CASE          = 1 << 6;
        const ABSTRACT      = 1 << 7;
        /// A declaration without a body.
        const DEFERRED      = 1 << 8;
        /// A `var` rather than a `val`.
        const MUTABLE       = 1 << 9;
        const LAZY          = 1 << 10;
        const MACRO         = 1 << 11;
        const TRAIT         = 1 << 12;
        /// A value or type parameter.
        const PARAM         = 1 << 13;
        const COVARIANT     = 1 << 14;
        const CONTRAVARIANT = 1 << 15;
        /// A `=> T` parameter.
        const BYNAMEPARAM   = 1 << 16;
        /// A parameter with a default value.
        const DEFAULTPARAM  = 1 << 17;
        /// An early definition, declared before the parent list.
        const PRESUPER      = 1 << 18;
        /// Introduced by the parser, not written by the user.
        const SYNTHETIC     = 1 << 19;
        /// `private[this]` / `protected[this]`.
        const LOCAL         = 1 << 20;
        /// A constructor parameter that is also a field.
        const PARAMACCESSOR = 1 << 21;
        /// A case-class constructor parameter.
        const CASEACCESSOR  = 1 << 22;
        /// A `var x: T = _` requesting default initialisation.
        const DEFAULTINIT   = 1 << 23;
    }
}

/// The modifier set of a definition: flags, an optional access qualifier
/// (`private[x]`), and the annotations preceding the definition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    pub flags: Flags,
    pub private_within: Option<Name>,
    pub annotations: Vec<Tree>,
}

impl Modifiers {
    /// An empty modifier set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns these modifiers with `flag` added.
    pub fn with_flag(mut self, flag: Flags) -> Self {
        self.flags |= flag;
        self
    }

    /// Does the set contain `flag`?
    pub fn has(&self, flag: Flags) -> bool {
        self.flags.contains(flag)
    }

    /// Is any access modifier present?
    pub fn has_access_boundary(&self) -> bool {
        self.private_within.is_some() || self.flags.intersects(Flags::PRIVATE | Flags::PROTECTED)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut write_word = |word: &str| -> fmt::Result {
            write!(f, "{word} ")
        };
        if self.has(Flags::OVERRIDE) {
            write_word("override")?;
        }
        if self.has(Flags::PRIVATE) {
            write_word("private")?;
        }
        if self.has(Flags::PROTECTED) {
            write_word("protected")?;
        }
        if self.has(Flags::SEALED) {
            write_word("sealed")?;
        }
        if self.has(Flags::ABSTRACT) {
            write_word("abstract")?;
        }
        if self.has(Flags::FINAL) {
            write_word("final")?;
        }
        if self.has(Flags::IMPLICIT) {
            write_word("implicit")?;
        }
        if self.has(Flags::LAZY) {
            write_word("lazy")?;
        }
        if self.has(Flags::CASE) {
            write_word("case")?;
        }
        Ok(())
    }
}
