//! Cell grid shared by the lane world and the pathfinder.

use neon_arcade_core::{CellCoord, CellKind, GridError, Structure, Vec2};

/// Per-query bookkeeping written by the pathfinder.
///
/// Every field is reset at the start of a search.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Scratch {
    pub(crate) cost: u32,
    pub(crate) heuristic: u32,
    pub(crate) total: u32,
    pub(crate) parent: Option<CellCoord>,
    pub(crate) open: bool,
    pub(crate) closed: bool,
}

/// One grid position together with its type tag.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Cell {
    coord: CellCoord,
    kind: CellKind,
    scratch: Scratch,
}

/// Rectangular grid of cells with exactly one source and one target.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    source: CellCoord,
    target: CellCoord,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds an empty grid with the provided endpoints.
    pub fn new(
        columns: u32,
        rows: u32,
        source: CellCoord,
        target: CellCoord,
    ) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 {
            return Err(GridError::Empty);
        }
        for endpoint in [source, target] {
            if endpoint.column() >= columns || endpoint.row() >= rows {
                return Err(GridError::OutOfBounds(endpoint));
            }
        }
        if source == target {
            return Err(GridError::Coincident);
        }

        let mut cells = Vec::with_capacity(columns as usize * rows as usize);
        for row in 0..rows {
            for column in 0..columns {
                let coord = CellCoord::new(column, row);
                let kind = if coord == source {
                    CellKind::Source
                } else if coord == target {
                    CellKind::Target
                } else {
                    CellKind::Empty
                };
                cells.push(Cell {
                    coord,
                    kind,
                    scratch: Scratch::default(),
                });
            }
        }

        Ok(Self {
            columns,
            rows,
            source,
            target,
            cells,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cell where lane enemies enter.
    #[must_use]
    pub const fn source(&self) -> CellCoord {
        self.source
    }

    /// Cell lane enemies try to reach.
    #[must_use]
    pub const fn target(&self) -> CellCoord {
        self.target
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Type tag stored at the coordinate.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<CellKind> {
        self.cell(cell).map(|cell| cell.kind)
    }

    fn cell(&self, cell: CellCoord) -> Option<&Cell> {
        self.index(cell).and_then(|index| self.cells.get(index))
    }

    /// Enumerates every built structure in row-major order.
    pub fn structures(&self) -> impl Iterator<Item = (CellCoord, Structure)> + '_ {
        self.cells
            .iter()
            .filter_map(|cell| cell.kind.structure().map(|structure| (cell.coord, structure)))
    }

    /// Cell containing the world point, if it lies on the grid.
    #[must_use]
    pub fn cell_at(&self, point: Vec2, cell_size: f32) -> Option<CellCoord> {
        CellCoord::containing(point, cell_size).filter(|cell| self.contains(*cell))
    }

    /// Grid cell closest to the world point, clamping points off the grid.
    #[must_use]
    pub fn nearest_cell(&self, point: Vec2, cell_size: f32) -> CellCoord {
        let clamp = |value: f32, cells: u32| -> u32 {
            let index = (value / cell_size).floor();
            if index.is_nan() || index < 0.0 {
                0
            } else {
                (index as u32).min(cells - 1)
            }
        };
        CellCoord::new(clamp(point.x, self.columns), clamp(point.y, self.rows))
    }

    /// Orthogonal neighbours in search order: up, down, left, right.
    pub(crate) fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let mut candidates = [None; 4];

        if let Some(row) = cell.row().checked_sub(1) {
            candidates[0] = Some(CellCoord::new(cell.column(), row));
        }
        if cell.row() + 1 < self.rows {
            candidates[1] = Some(CellCoord::new(cell.column(), cell.row() + 1));
        }
        if let Some(column) = cell.column().checked_sub(1) {
            candidates[2] = Some(CellCoord::new(column, cell.row()));
        }
        if cell.column() + 1 < self.columns {
            candidates[3] = Some(CellCoord::new(cell.column() + 1, cell.row()));
        }

        candidates.into_iter().flatten()
    }

    /// Replaces the kind of an unprotected cell, returning the previous kind.
    pub(crate) fn set_kind(&mut self, cell: CellCoord, kind: CellKind) -> Option<CellKind> {
        debug_assert!(
            !kind.is_protected(),
            "source and target are fixed at construction"
        );
        let index = self.index(cell)?;
        let slot = self.cells.get_mut(index)?;
        debug_assert!(
            !slot.kind.is_protected(),
            "source and target cells cannot be overwritten"
        );
        let previous = slot.kind;
        slot.kind = kind;
        self.debug_assert_endpoints();
        Some(previous)
    }

    pub(crate) fn scratch(&self, cell: CellCoord) -> Option<Scratch> {
        self.cell(cell).map(|cell| cell.scratch)
    }

    pub(crate) fn scratch_mut(&mut self, cell: CellCoord) -> Option<&mut Scratch> {
        let index = self.index(cell)?;
        self.cells.get_mut(index).map(|cell| &mut cell.scratch)
    }

    pub(crate) fn reset_scratch(&mut self) {
        for cell in &mut self.cells {
            cell.scratch = Scratch::default();
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let columns = usize::try_from(self.columns).ok()?;
        row.checked_mul(columns)?.checked_add(column)
    }

    fn debug_assert_endpoints(&self) {
        if cfg!(debug_assertions) {
            let sources = self
                .cells
                .iter()
                .filter(|cell| cell.kind == CellKind::Source)
                .count();
            let targets = self
                .cells
                .iter()
                .filter(|cell| cell.kind == CellKind::Target)
                .count();
            assert!(
                sources == 1 && targets == 1,
                "grid must hold exactly one source and one target, found {sources} and {targets}"
            );
        }
    }
}
