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

/// A macro that, given a diagnostic enum name, a code mask, a code prefix,
/// and a list of message definitions, generates the enum together with one
/// constructor method per message.
///
/// Each message is declared either `@formatted` (carries a `Span` and
/// renders with source position) or `@backtraced` (carries only a
/// backtrace; used where no position exists, e.g. raw lexing).
///
/// Invoke as `create_messages!(Name, code_mask: …, …)` for errors and
/// `create_messages!(@warnings Name, code_mask: …, …)` for warnings.
#[macro_export]
macro_rules! create_messages {
    (
        $(#[$error_type_docs:meta])*
        $type_:ident,
        code_mask: $code_mask:expr,
        code_prefix: $code_prefix:expr,
        $($rest:tt)*
    ) => {
        create_messages!(@meta "Error", "E", $(#[$error_type_docs])* $type_, $code_mask, $code_prefix, $($rest)*);
    };

    (
        @warnings
        $(#[$error_type_docs:meta])*
        $type_:ident,
        code_mask: $code_mask:expr,
        code_prefix: $code_prefix:expr,
        $($rest:tt)*
    ) => {
        create_messages!(@meta "Warning", "W", $(#[$error_type_docs])* $type_, $code_mask, $code_prefix, $($rest)*);
    };

    (
        @meta $label:expr, $letter:expr,
        $(#[$error_type_docs:meta])*
        $type_:ident, $code_mask:expr, $code_prefix:expr,
        $($(#[$docs:meta])* @$error_type:ident $name:ident {
            args: ($($arg_names:ident: $arg_types:ty),* $(,)?),
            msg: $message:expr,
            help: $help:expr,
        })*
    ) => {
        #[allow(unused_imports)]
        use $crate::common::{Backtraced, Formatted, VelaMessageCode};
        #[allow(unused_imports)]
        use vela_span::Span;

        use backtrace::Backtrace;

        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        $(#[$error_type_docs])*
        pub enum $type_ {
            #[error(transparent)]
            Formatted(#[from] Formatted),

            #[error(transparent)]
            Backtraced(#[from] Backtraced),
        }

        impl VelaMessageCode for $type_ {
            #[inline(always)]
            fn exit_code(&self) -> i32 {
                match self {
                    Self::Formatted(formatted) => formatted.exit_code(),
                    Self::Backtraced(backtraced) => backtraced.exit_code(),
                }
            }

            #[inline(always)]
            fn error_code(&self) -> String {
                match self {
                    Self::Formatted(formatted) => formatted.error_code(),
                    Self::Backtraced(backtraced) => backtraced.error_code(),
                }
            }

            #[inline(always)]
            fn code_mask() -> i32 {
                $code_mask
            }

            #[inline(always)]
            fn code_prefix() -> &'static str {
                $code_prefix
            }
        }

        impl $type_ {
            create_messages!(@step $label, $letter, 0i32, $(($(#[$docs])* $error_type, $name($($arg_names: $arg_types,)*), $message, $help),)*);
        }
    };

    // Done iterating, emit the total count of messages.
    (@step $label:expr, $letter:expr, $code:expr,) => {
        /// Returns the number of unique exit codes of this enum.
        #[inline(always)]
        pub fn num_exit_codes() -> i32 {
            $code
        }
    };

    (@step $label:expr, $letter:expr, $code:expr, ($(#[$docs:meta])* formatted, $name:ident($($arg_names:ident: $arg_types:ty,)*), $message:expr, $help:expr), $($rest:tt,)*) => {
        $(#[$docs])*
        pub fn $name($($arg_names: $arg_types,)* span: Span) -> Self {
            Self::Formatted(Formatted::new_from_span(
                $message,
                $help,
                $code + Self::code_mask(),
                Self::code_prefix(),
                $letter,
                $label,
                span,
                Backtrace::new(),
            ))
        }

        create_messages!(@step $label, $letter, $code + 1i32, $($rest,)*);
    };

    (@step $label:expr, $letter:expr, $code:expr, ($(#[$docs:meta])* backtraced, $name:ident($($arg_names:ident: $arg_types:ty,)*), $message:expr, $help:expr), $($rest:tt,)*) => {
        $(#[$docs])*
        pub fn $name($($arg_names: $arg_types,)*) -> Self {
            Self::Backtraced(Backtraced::new_from_backtrace(
                $message,
                $help,
                $code + Self::code_mask(),
                Self::code_prefix(),
                $letter,
                $label,
                Backtrace::new(),
            ))
        }

        create_messages!(@step $label, $letter, $code + 1i32, $($rest,)*);
    };
}
