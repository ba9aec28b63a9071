#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure build-phase system that turns pointer clicks into place and remove commands.

use neon_arcade_core::{CellCoord, Command, EmplacementKind, Structure};

/// Input snapshot distilled from host-provided pointer data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Indicates whether the pointer button is held on this frame.
    pub pressed: bool,
    /// Cell currently under the pointer.
    pub cursor_cell: Option<CellCoord>,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(pressed: bool, cursor_cell: Option<CellCoord>) -> Self {
        Self {
            pressed,
            cursor_cell,
        }
    }
}

/// Build-phase system that translates clicks plus the selected tool into commands.
///
/// A click on an occupied cell demolishes it, a click on any other cell
/// builds the selected tool. The world decides whether the edit is legal.
#[derive(Debug, Clone)]
pub struct Builder {
    tool: Structure,
    was_pressed: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a new builder with the obstacle tool selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tool: Structure::Obstacle,
            was_pressed: false,
        }
    }

    /// Structure built by the next click.
    #[must_use]
    pub const fn tool(&self) -> Structure {
        self.tool
    }

    /// Selects the structure built by subsequent clicks.
    pub fn select_tool(&mut self, tool: Structure) {
        self.tool = tool;
    }

    /// Tool bound to a number key: 1 obstacle, 2 turret, 3 blaster, 4 sniper.
    #[must_use]
    pub const fn tool_for_digit(digit: u8) -> Option<Structure> {
        match digit {
            1 => Some(Structure::Obstacle),
            2 => Some(Structure::Emplacement(EmplacementKind::Turret)),
            3 => Some(Structure::Emplacement(EmplacementKind::Blaster)),
            4 => Some(Structure::Emplacement(EmplacementKind::Sniper)),
            _ => None,
        }
    }

    /// Consumes pointer input to emit builder commands.
    ///
    /// Only the press edge acts, so holding the button does not repeat edits.
    /// The `structure_at` closure should mirror the world's grid lookup so the
    /// system can tell whether the clicked cell is occupied.
    pub fn handle<F>(&mut self, input: BuilderInput, mut structure_at: F, out: &mut Vec<Command>)
    where
        F: FnMut(CellCoord) -> Option<Structure>,
    {
        let clicked = input.pressed && !self.was_pressed;
        self.was_pressed = input.pressed;
        if !clicked {
            return;
        }

        let Some(cell) = input.cursor_cell else {
            return;
        };

        if structure_at(cell).is_some() {
            out.push(Command::RemoveStructure { cell });
        } else {
            out.push(Command::PlaceStructure {
                cell,
                structure: self.tool,
            });
        }
    }
}
