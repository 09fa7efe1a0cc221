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

/// The backtraced diagnostic payload.
pub mod backtraced;
pub use self::backtraced::*;

/// The span-anchored diagnostic payload.
pub mod formatted;
pub use self::formatted::*;

/// The `create_messages!` macro.
#[macro_use]
pub mod macros;

/// Shared diagnostic traits.
pub mod traits;
pub use self::traits::*;
