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

/// Behaviour every Vela diagnostic enum shares: a stable exit code and a
/// rendered error code such as `EPAR0370003`.
pub trait VelaMessageCode: Sized {
    /// The exit code of the diagnostic.
    fn exit_code(&self) -> i32;

    /// The rendered error code, e.g. `EPAR0370003`.
    fn error_code(&self) -> String;

    /// The numeric mask added to each message index of the enum.
    fn code_mask() -> i32;

    /// The three-letter code prefix of the enum, e.g. `PAR`.
    fn code_prefix() -> &'static str;
}
