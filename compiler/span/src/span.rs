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

//! Defines the `Span` type and the byte positions it is made of.

use serde::{Deserialize, Serialize};
use std::{fmt, ops::Add};

/// Offset-based types that can index into source files.
pub trait Pos {
    fn from_usize(n: usize) -> Self;
    fn to_usize(&self) -> usize;
    fn from_u32(n: u32) -> Self;
    fn to_u32(&self) -> u32;
}

macro_rules! impl_pos {
    ($(
        $(#[$attr:meta])*
        $vis:vis struct $ident:ident($inner_vis:vis $inner_ty:ty);
    )*) => {
        $(
            $(#[$attr])*
            $vis struct $ident($inner_vis $inner_ty);

            impl Pos for $ident {
                #[inline(always)]
                fn from_usize(n: usize) -> $ident {
                    $ident(n as $inner_ty)
                }

                #[inline(always)]
                fn to_usize(&self) -> usize {
                    self.0 as usize
                }

                #[inline(always)]
                fn from_u32(n: u32) -> $ident {
                    $ident(n as $inner_ty)
                }

                #[inline(always)]
                fn to_u32(&self) -> u32 {
                    self.0 as u32
                }
            }

            impl Add for $ident {
                type Output = $ident;

                #[inline(always)]
                fn add(self, rhs: $ident) -> $ident {
                    $ident(self.0 + rhs.0)
                }
            }
        )*
    };
}

impl_pos! {
    /// A byte offset relative to the start of a compilation unit.
    #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
    pub struct BytePos(pub u32);

    /// A character offset, useful when a renderer needs column positions.
    #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
    pub struct CharPos(pub usize);
}

impl fmt::Display for BytePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The span between two byte positions in a compilation unit.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The start position of the span, inclusive.
    pub lo: BytePos,
    /// The end position of the span, exclusive.
    pub hi: BytePos,
}

impl Span {
    /// Generates a new span from the `lo` and `hi` positions.
    pub fn new(lo: BytePos, hi: BytePos) -> Self {
        Self { lo, hi }
    }

    /// Generates a dummy span with all defaults.
    pub const fn dummy() -> Self {
        Self { lo: BytePos(0), hi: BytePos(0) }
    }

    /// Is the span a dummy?
    pub fn is_dummy(&self) -> bool {
        self == &Self::dummy()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.lo, self.hi)
    }
}

impl Add<&Span> for &Span {
    type Output = Span;

    fn add(self, other: &Span) -> Span {
        *self + *other
    }
}

impl Add for Span {
    type Output = Self;

    /// Widens a span to cover both `self` and `other`,
    /// as well as everything in between.
    fn add(self, other: Self) -> Self {
        if self.is_dummy() {
            other
        } else if other.is_dummy() {
            self
        } else {
            let lo = self.lo.min(other.lo);
            let hi = self.hi.max(other.hi);
            Self::new(lo, hi)
        }
    }
}
