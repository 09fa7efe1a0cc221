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

#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

/// Contains the common functionality for all errors: message payloads,
/// the `create_messages!` macro, and shared traits.
#[macro_use]
pub mod common;
pub use self::common::*;

/// Contains the Emitter, Buffer, and Handler used to track diagnostics.
pub mod emitter;

/// Contains the concrete error and warning enums.
pub mod errors;
pub use self::errors::*;

/// A result type equipped with the Vela error type.
pub type Result<T = (), E = VelaError> = core::result::Result<T, E>;
