//! Tile grid storage and layout parsing.

use flashpoint_core::{CellCoord, TileKind};

/// Default board: a two-storey house outline surrounded by street.
pub const DEFAULT_LAYOUT: &str = "\
FFFFFFFFFFFFFFFFFFFF
FMMMMMMMMMMMMDMMMMMF
FMCCCCCDCCCMCCCCCCMF
FMCCCCCMCCCDCCCCCCMF
FMCCCMMMMMMMMMMMMDMF
FDCCCMCCCCCCCCCDCCMF
FMCCCMCCCCCCCCCMCCMF
FMMMMMMMMDMMMMMMMMMF
FMCCCCCCCCCDCCCDCCMF
FMCCCCCCCCCMCCCMCCMF
FMMMMDMMMMMMMMMMMMMF
FFFFFFFFFFFFFFFFFFFF";

/// Reasons a textual layout may fail to produce a grid.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The layout contained no rows or only empty rows.
    #[error("layout is empty")]
    Empty,
    /// A row's length differs from the first row's.
    #[error("layout row {row} has {found} tiles, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character outside the `F`/`M`/`C`/`D` legend was found.
    #[error("unknown layout symbol '{symbol}' at column {column}, row {row}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Column of the character.
        column: usize,
        /// Row of the character.
        row: usize,
    },
}

/// Mutable state of a single board tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub(crate) kind: TileKind,
    pub(crate) fire: bool,
    pub(crate) smoke: bool,
    pub(crate) wall_damage: u32,
    pub(crate) has_victim: bool,
}

impl Tile {
    const fn new(kind: TileKind) -> Self {
        Self {
            kind,
            fire: false,
            smoke: false,
            wall_damage: 0,
            has_victim: false,
        }
    }

    /// Structural kind of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Whether the tile is burning.
    #[must_use]
    pub const fn fire(&self) -> bool {
        self.fire
    }

    /// Whether the tile is smoky.
    #[must_use]
    pub const fn smoke(&self) -> bool {
        self.smoke
    }

    /// Whether the tile holds smoke or fire.
    #[must_use]
    pub const fn has_hazard(&self) -> bool {
        self.fire || self.smoke
    }

    /// Damage accumulated while the tile was a wall.
    #[must_use]
    pub const fn wall_damage(&self) -> u32 {
        self.wall_damage
    }

    /// Whether a victim marker lies on the tile.
    #[must_use]
    pub const fn has_victim(&self) -> bool {
        self.has_victim
    }

    /// Whether the tile is open floor.
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        self.kind.is_walkable()
    }
}

/// Fixed-size rectangular board built once from a textual layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Parses a newline separated layout using the `F`/`M`/`C`/`D` legend.
    ///
    /// Surrounding whitespace on each row is ignored and blank rows are skipped.
    pub fn parse(layout: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();
        Self::from_rows(&rows)
    }

    /// Builds a grid from pre-split layout rows.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let expected = first.as_ref().chars().count();
        if expected == 0 {
            return Err(LayoutError::Empty);
        }

        let mut tiles = Vec::with_capacity(expected * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != expected {
                return Err(LayoutError::Ragged {
                    row: row_index,
                    expected,
                    found,
                });
            }
            for (column, symbol) in row.chars().enumerate() {
                let kind = TileKind::from_legend(symbol).ok_or(LayoutError::UnknownSymbol {
                    symbol,
                    column,
                    row: row_index,
                })?;
                tiles.push(Tile::new(kind));
            }
        }

        Ok(Self {
            width: u32::try_from(expected).unwrap_or(u32::MAX),
            height: u32::try_from(rows.len()).unwrap_or(u32::MAX),
            tiles,
        })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Tile at the provided cell, or `None` outside the board.
    #[must_use]
    pub fn tile_at(&self, cell: CellCoord) -> Option<&Tile> {
        self.index(cell).and_then(|index| self.tiles.get(index))
    }

    pub(crate) fn tile_mut(&mut self, cell: CellCoord) -> Option<&mut Tile> {
        self.index(cell).and_then(|index| self.tiles.get_mut(index))
    }

    /// In-bounds cardinal neighbours in the fixed order +y, -y, +x, -x.
    pub fn neighbors4(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        neighbors(cell, self.width, self.height)
    }

    /// Every tile with its coordinate in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, &Tile)> + '_ {
        let width = self.width.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % width, index / width), tile)
        })
    }

    /// Manhattan-nearest tile of the given kind; ties resolve to the first in row-major order.
    #[must_use]
    pub fn nearest_of_kind(&self, from: CellCoord, kind: TileKind) -> Option<CellCoord> {
        self.cells()
            .filter(|(_, tile)| tile.kind == kind)
            .map(|(cell, _)| cell)
            .min_by_key(|cell| cell.manhattan_distance(from))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if cell.column() >= width || cell.row() >= height {
        return candidates.into_iter().take(count).flatten();
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < height {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < width {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_parses_to_twenty_by_twelve() {
        let grid = TileGrid::parse(DEFAULT_LAYOUT).expect("default layout parses");
        assert_eq!(grid.width(), 20);
        assert_eq!(grid.height(), 12);
        assert_eq!(
            grid.tile_at(CellCoord::new(1, 5)).map(Tile::kind),
            Some(TileKind::Door)
        );
        assert_eq!(
            grid.tile_at(CellCoord::new(0, 5)).map(Tile::kind),
            Some(TileKind::Outside)
        );
        assert!(grid.tile_at(CellCoord::new(20, 0)).is_none());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let error = TileGrid::parse("FFF\nFC\nFFF").expect_err("ragged layout");
        assert_eq!(
            error,
            LayoutError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        let error = TileGrid::parse("FF\nFX").expect_err("unknown symbol");
        assert_eq!(
            error,
            LayoutError::UnknownSymbol {
                symbol: 'X',
                column: 1,
                row: 1
            }
        );
        assert_eq!(TileGrid::parse("\n\n"), Err(LayoutError::Empty));
    }

    #[test]
    fn neighbors_follow_fixed_order() {
        let grid = TileGrid::parse("CCC\nCCC\nCCC").expect("layout parses");
        let around: Vec<_> = grid.neighbors4(CellCoord::new(1, 1)).collect();
        assert_eq!(
            around,
            vec![
                CellCoord::new(1, 2),
                CellCoord::new(1, 0),
                CellCoord::new(2, 1),
                CellCoord::new(0, 1),
            ]
        );
    }

    #[test]
    fn neighbors_stay_in_bounds() {
        let grid = TileGrid::parse("CCC\nCCC").expect("layout parses");
        let corner: Vec<_> = grid.neighbors4(CellCoord::new(0, 0)).collect();
        assert_eq!(corner, vec![CellCoord::new(0, 1), CellCoord::new(1, 0)]);

        let far_corner: Vec<_> = grid.neighbors4(CellCoord::new(2, 1)).collect();
        assert_eq!(far_corner, vec![CellCoord::new(2, 0), CellCoord::new(1, 1)]);
    }

    #[test]
    fn walkability_excludes_walls_doors_and_street() {
        let grid = TileGrid::parse("FMCD").expect("layout parses");
        let walkable: Vec<bool> = grid.cells().map(|(_, tile)| tile.is_walkable()).collect();
        assert_eq!(walkable, vec![false, false, true, false]);
    }

    #[test]
    fn nearest_kind_prefers_row_major_order_on_ties() {
        let grid = TileGrid::parse("FCF\nCCC\nFCF").expect("layout parses");
        assert_eq!(
            grid.nearest_of_kind(CellCoord::new(1, 1), TileKind::Outside),
            Some(CellCoord::new(0, 0))
        );
        assert_eq!(
            grid.nearest_of_kind(CellCoord::new(2, 1), TileKind::Outside),
            Some(CellCoord::new(2, 0))
        );
    }
}
