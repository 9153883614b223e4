//! The grid model: rows, columns and the items placed in their cells.
//!
//! A [`Grid`] is the declarative description underneath both grid and box
//! layouts. It knows nothing about rendering; it only enforces that items
//! never overlap. An item spanning several cells reserves every covered
//! cell, and placing anything into a reserved cell is rejected.

use super::alignment::Alignment;
use super::manager::{LayoutError, LayoutItem};
use crate::geometry::Length;

/// Spacing between cells when none is configured, in pixels.
pub const DEFAULT_SPACING: i32 = 6;

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// A row or a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    /// Share of the excess space this section receives. Zero means the
    /// section keeps its preferred size.
    pub stretch: i32,
    /// Whether the user may drag the boundary after this section.
    pub resizable: bool,
    /// Size to start from when resizable; auto lets the client decide.
    pub initial_size: Length,
}

impl Section {
    pub fn new(stretch: i32) -> Self {
        Self {
            stretch,
            resizable: false,
            initial_size: Length::Auto,
        }
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::new(0)
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// One cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub item: Option<LayoutItem>,
    pub row_span: usize,
    pub col_span: usize,
    pub alignment: Alignment,
    /// The client must re-measure this cell.
    pub update: bool,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            item: None,
            row_span: 1,
            col_span: 1,
            alignment: Alignment::empty(),
            update: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub horizontal_spacing: i32,
    pub vertical_spacing: i32,
    pub(crate) rows: Vec<Section>,
    pub(crate) columns: Vec<Section>,
    /// Row-major cells; always `rows.len()` rows of `columns.len()` cells.
    pub(crate) items: Vec<Vec<Item>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// An empty grid with default spacing.
    pub fn new() -> Self {
        Self {
            horizontal_spacing: DEFAULT_SPACING,
            vertical_spacing: DEFAULT_SPACING,
            rows: Vec::new(),
            columns: Vec::new(),
            items: Vec::new(),
        }
    }

    /// A grid with `rows` x `columns` empty cells.
    pub fn with_size(rows: usize, columns: usize) -> Self {
        let mut grid = Self::new();
        grid.expand(rows, columns);
        grid
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn rows(&self) -> &[Section] {
        &self.rows
    }

    pub fn columns(&self) -> &[Section] {
        &self.columns
    }

    pub fn row_mut(&mut self, row: usize) -> Option<&mut Section> {
        self.rows.get_mut(row)
    }

    pub fn column_mut(&mut self, column: usize) -> Option<&mut Section> {
        self.columns.get_mut(column)
    }

    /// The cell at `(row, col)`.
    pub fn item(&self, row: usize, col: usize) -> Option<&Item> {
        self.items.get(row).and_then(|r| r.get(col))
    }

    pub fn item_mut(&mut self, row: usize, col: usize) -> Option<&mut Item> {
        self.items.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Grow the grid to at least `rows` x `columns`.
    pub fn expand(&mut self, rows: usize, columns: usize) {
        if columns > self.columns.len() {
            self.columns.resize(columns, Section::default());
            for row in &mut self.items {
                row.resize(columns, Item::default());
            }
        }
        let width = self.columns.len();
        while self.rows.len() < rows {
            self.rows.push(Section::default());
            self.items.push(vec![Item::default(); width]);
        }
    }

    /// The anchor of the item occupying `(row, col)`, either directly or
    /// through its span.
    pub fn owner_of(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        for r in 0..=row.min(self.rows.len().saturating_sub(1)) {
            for c in 0..=col.min(self.columns.len().saturating_sub(1)) {
                let Some(cell) = self.item(r, c) else { continue };
                if cell.item.is_some() && r + cell.row_span > row && c + cell.col_span > col {
                    return Some((r, c));
                }
            }
        }
        None
    }

    /// Whether `(row, col)` is reserved by another cell's span.
    pub fn is_covered(&self, row: usize, col: usize) -> bool {
        matches!(self.owner_of(row, col), Some(owner) if owner != (row, col))
    }

    /// Place `item` at `(row, col)` spanning `row_span` x `col_span` cells.
    ///
    /// The grid grows as needed. Fails without changing the grid if any
    /// target cell already holds an item or is covered by another span.
    pub fn add_item(
        &mut self,
        item: LayoutItem,
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
        alignment: Alignment,
    ) -> Result<(), LayoutError> {
        if row_span == 0 || col_span == 0 {
            return Err(LayoutError::InvalidSpan);
        }
        for r in row..row + row_span {
            for c in col..col + col_span {
                match self.owner_of(r, c) {
                    Some(owner) if owner == (r, c) => {
                        return Err(LayoutError::CellOccupied { row: r, col: c });
                    }
                    Some((owner_row, owner_col)) => {
                        return Err(LayoutError::CellReserved {
                            row: r,
                            col: c,
                            owner_row,
                            owner_col,
                        });
                    }
                    None => {}
                }
            }
        }
        self.expand(row + row_span, col + col_span);
        if let Some(cell) = self.item_mut(row, col) {
            *cell = Item {
                item: Some(item),
                row_span,
                col_span,
                alignment,
                update: false,
            };
        }
        Ok(())
    }

    /// Where `item` is anchored.
    pub fn find(&self, item: LayoutItem) -> Option<(usize, usize)> {
        self.items.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .position(|cell| cell.item == Some(item))
                .map(|c| (r, c))
        })
    }

    /// Take `item` out of the grid, releasing the cells it covered.
    pub fn remove_item(&mut self, item: LayoutItem) -> Option<(usize, usize)> {
        let (row, col) = self.find(item)?;
        if let Some(cell) = self.item_mut(row, col) {
            *cell = Item::default();
        }
        Some((row, col))
    }

    /// Insert an empty row before `index` (clamped to the end).
    pub fn insert_row(&mut self, index: usize, section: Section) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, section);
        self.items
            .insert(index, vec![Item::default(); self.columns.len()]);
    }

    /// Insert an empty column before `index` (clamped to the end).
    pub fn insert_column(&mut self, index: usize, section: Section) {
        let index = index.min(self.columns.len());
        self.columns.insert(index, section);
        for row in &mut self.items {
            row.insert(index, Item::default());
        }
    }

    /// Drop row `index` together with its cells.
    pub fn remove_row(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
            self.items.remove(index);
        }
    }

    /// Drop column `index` together with its cells.
    pub fn remove_column(&mut self, index: usize) {
        if index < self.columns.len() {
            self.columns.remove(index);
            for row in &mut self.items {
                row.remove(index);
            }
        }
    }

    /// Every anchored item with its position, in row-major order.
    pub fn placed_items(&self) -> impl Iterator<Item = (usize, usize, &Item)> {
        self.items.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| cell.item.is_some())
                .map(move |(c, cell)| (r, c, cell))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.placed_items().next().is_none()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
