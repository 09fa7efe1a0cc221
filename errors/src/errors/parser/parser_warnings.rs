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

use crate::create_messages;
use std::fmt::Display;

create_messages!(
    @warnings
    /// ParserWarning enum that represents all the warnings for the `vela-parser` crate.
    ParserWarning,
    code_mask: 370000i32,
    code_prefix: "PAR",

    @formatted
    deprecated_procedure_syntax {
        args: (name: impl Display),
        msg: format!("procedure syntax is deprecated for `{name}`."),
        help: Some("add `: Unit =` to make the result type and body explicit.".to_string()),
    }

    @formatted
    deprecated_view_bounds {
        args: (),
        msg: "view bounds are deprecated.".to_string(),
        help: Some("use an implicit parameter instead.".to_string()),
    }

    @formatted
    deprecated_val_in_for {
        args: (),
        msg: "the `val` keyword in a for comprehension is deprecated.".to_string(),
        help: None,
    }

    @formatted
    apparent_unit_refinement {
        args: (),
        msg: "detected apparent refinement of Unit.".to_string(),
        help: Some("are you missing an `=` sign?".to_string()),
    }

    @formatted
    deprecated_early_type_members {
        args: (),
        msg: "early type members are deprecated.".to_string(),
        help: Some("move them to the regular body; the semantics are the same.".to_string()),
    }
);
