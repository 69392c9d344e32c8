//! Grid layout - pack children into a table with a fixed number of columns.
//!
//! # Algorithm
//!
//! 1. **Pack**: children fill cells left-to-right, top-to-bottom. Cells
//!    covered by an earlier child's horizontal or vertical span are skipped
//! 2. **Eliminate**: columns and rows that hold no child, or that only
//!    continue the span of the previous column/row, are dropped
//! 3. **Measure**: span-1 children set column widths / row heights; wider
//!    spanning children then enlarge their spanned cells round-robin
//! 4. **Fit**: shrink (largest first) or grow (grabbing columns/rows only)
//!    to the available area, per column and per row
//! 5. **Place**: each child is aligned inside the union of its cells

use std::collections::BTreeSet;

use crate::types::{Position, Rect, Size};

use super::fit::{grow_to_fill, shrink_to_fit, total};
use super::types::{GridLayoutData, LayoutChild, LayoutManager};

/// Table layout with `columns` columns; the row count follows from the
/// children and their spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    columns: u16,
    horizontal_spacing: u16,
    vertical_spacing: u16,
    left_margin: u16,
    right_margin: u16,
    top_margin: u16,
    bottom_margin: u16,
}

impl GridLayout {
    /// A grid with at least one column, one cell of horizontal spacing and
    /// no margins.
    pub fn new(columns: u16) -> Self {
        Self {
            columns: columns.max(1),
            horizontal_spacing: 1,
            vertical_spacing: 0,
            left_margin: 0,
            right_margin: 0,
            top_margin: 0,
            bottom_margin: 0,
        }
    }

    pub fn with_spacing(mut self, horizontal: u16, vertical: u16) -> Self {
        self.horizontal_spacing = horizontal;
        self.vertical_spacing = vertical;
        self
    }

    /// Margins in CSS order: top, right, bottom, left.
    pub fn with_margins(mut self, top: u16, right: u16, bottom: u16, left: u16) -> Self {
        self.top_margin = top;
        self.right_margin = right;
        self.bottom_margin = bottom;
        self.left_margin = left;
        self
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    fn horizontal_margins(&self) -> u32 {
        self.left_margin as u32 + self.right_margin as u32
    }

    fn vertical_margins(&self) -> u32 {
        self.top_margin as u32 + self.bottom_margin as u32
    }
}

// =============================================================================
// TABLE
// =============================================================================

/// Where a child ended up in the (reduced) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    row: usize,
    column: usize,
    rows: usize,
    columns: usize,
}

/// Packed table: `cells[row][column]` holds a child index.
#[derive(Debug, Default)]
struct Table {
    cells: Vec<Vec<Option<usize>>>,
}

impl Table {
    fn build(columns: usize, data: &[GridLayoutData]) -> Self {
        let mut cells: Vec<Vec<Option<usize>>> = Vec::new();
        // Remaining span still to cover, per cell
        let mut h_spans: Vec<Vec<usize>> = Vec::new();
        let mut v_spans: Vec<Vec<usize>> = Vec::new();

        let mut next = 0;
        let mut rows_extent = 1;
        let mut row_index = 0;

        while next < data.len() || row_index < rows_extent {
            let mut row = vec![None; columns];
            let mut h_span = vec![1; columns];
            let mut v_span = vec![1; columns];

            for column in 0..columns {
                if column > 0 && h_span[column - 1] > 1 {
                    row[column] = row[column - 1];
                    h_span[column] = h_span[column - 1] - 1;
                    v_span[column] = v_span[column - 1];
                } else if row_index > 0 && v_spans[row_index - 1][column] > 1 {
                    row[column] = cells[row_index - 1][column];
                    h_span[column] = h_spans[row_index - 1][column];
                    v_span[column] = v_spans[row_index - 1][column] - 1;
                } else if next < data.len() {
                    row[column] = Some(next);
                    h_span[column] = data[next].horizontal_span as usize;
                    v_span[column] = data[next].vertical_span as usize;
                    rows_extent = rows_extent.max(row_index + v_span[column]);
                    next += 1;
                }
            }

            cells.push(row);
            h_spans.push(h_span);
            v_spans.push(v_span);
            row_index += 1;
        }

        Self { cells }
    }

    fn row_count(&self) -> usize {
        self.cells.len()
    }

    fn column_count(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Drop empty columns/rows and those that repeat their predecessor.
    fn eliminate_unused(mut self) -> Self {
        let rows = self.row_count();
        let columns = self.column_count();

        let keep_columns: Vec<usize> = (0..columns)
            .filter(|&column| {
                let empty = self.cells.iter().all(|row| row[column].is_none());
                let repeats = column > 0
                    && self.cells.iter().all(|row| row[column] == row[column - 1]);
                !empty && !repeats
            })
            .collect();

        let keep_rows: Vec<usize> = (0..rows)
            .filter(|&row| {
                let empty = self.cells[row].iter().all(Option::is_none);
                let repeats = row > 0 && self.cells[row] == self.cells[row - 1];
                !empty && !repeats
            })
            .collect();

        self.cells = keep_rows
            .iter()
            .map(|&row| keep_columns.iter().map(|&column| self.cells[row][column]).collect())
            .collect();
        self
    }

    /// First cell and effective span of every child, indexed by child.
    fn locate(&self, child_count: usize) -> Vec<Option<Cell>> {
        let mut located: Vec<Option<Cell>> = vec![None; child_count];
        for (row, cells) in self.cells.iter().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                let Some(child) = *cell else { continue };
                if located[child].is_some() {
                    continue;
                }
                let columns = cells[column..]
                    .iter()
                    .take_while(|c| **c == Some(child))
                    .count();
                let rows = self.cells[row..]
                    .iter()
                    .take_while(|r| r[column] == Some(child))
                    .count();
                located[child] = Some(Cell { row, column, rows, columns });
            }
        }
        located
    }
}

// =============================================================================
// MEASURE
// =============================================================================

/// Preferred extents of each track (column or row).
///
/// `span_of` and `start_of` pick the axis out of a [`Cell`], `extent_of` the
/// matching preferred extent of a child.
fn track_extents(
    track_count: usize,
    cells: &[Option<Cell>],
    preferred: &[u16],
    start_of: fn(&Cell) -> usize,
    span_of: fn(&Cell) -> usize,
) -> Vec<u16> {
    let mut extents = vec![0u16; track_count];

    for (cell, &want) in cells.iter().zip(preferred) {
        let Some(cell) = cell else { continue };
        if span_of(cell) == 1 {
            let track = &mut extents[start_of(cell)];
            *track = (*track).max(want);
        }
    }

    for (cell, &want) in cells.iter().zip(preferred) {
        let Some(cell) = cell else { continue };
        let span = span_of(cell);
        if span <= 1 {
            continue;
        }
        let start = start_of(cell);
        let spanned = &mut extents[start..start + span];
        let mut accumulated = total(spanned);
        let mut offset = 0;
        while (want as u32) > accumulated {
            spanned[offset] = spanned[offset].saturating_add(1);
            accumulated += 1;
            offset = (offset + 1) % span;
        }
    }

    extents
}

/// Tracks that may take extra space: every track covered by a grabbing child.
fn growable_tracks(
    track_count: usize,
    cells: &[Option<Cell>],
    grabs: impl Iterator<Item = bool>,
    start_of: fn(&Cell) -> usize,
    span_of: fn(&Cell) -> usize,
) -> Vec<bool> {
    let mut set = BTreeSet::new();
    for (cell, grab) in cells.iter().zip(grabs) {
        if let (Some(cell), true) = (cell, grab) {
            set.extend(start_of(cell)..start_of(cell) + span_of(cell));
        }
    }
    (0..track_count).map(|track| set.contains(&track)).collect()
}

/// Starting offset of each track given extents and spacing.
fn offsets(extents: &[u16], spacing: u16) -> Vec<u32> {
    let mut offset = 0u32;
    extents
        .iter()
        .map(|&extent| {
            let start = offset;
            offset += extent as u32 + spacing as u32;
            start
        })
        .collect()
}

/// Extent of `span` tracks starting at `start`, including the spacing
/// between them.
fn spanned_extent(extents: &[u16], start: usize, span: usize, spacing: u16) -> u16 {
    let sum = total(&extents[start..start + span]) + spacing as u32 * (span as u32 - 1);
    sum.min(u16::MAX as u32) as u16
}

fn column_start(cell: &Cell) -> usize {
    cell.column
}

fn column_span(cell: &Cell) -> usize {
    cell.columns
}

fn row_start(cell: &Cell) -> usize {
    cell.row
}

fn row_span(cell: &Cell) -> usize {
    cell.rows
}

struct Measured {
    table: Table,
    cells: Vec<Option<Cell>>,
    data: Vec<GridLayoutData>,
    widths: Vec<u16>,
    heights: Vec<u16>,
}

impl GridLayout {
    fn measure(&self, children: &[LayoutChild<'_>]) -> Measured {
        let data: Vec<GridLayoutData> = children.iter().map(LayoutChild::grid_data).collect();
        let table = Table::build(self.columns as usize, &data).eliminate_unused();
        let cells = table.locate(children.len());

        let preferred_columns: Vec<u16> = children.iter().map(|c| c.preferred.columns).collect();
        let preferred_rows: Vec<u16> = children.iter().map(|c| c.preferred.rows).collect();

        let widths = track_extents(
            table.column_count(),
            &cells,
            &preferred_columns,
            column_start,
            column_span,
        );
        let heights = track_extents(table.row_count(), &cells, &preferred_rows, row_start, row_span);

        Measured { table, cells, data, widths, heights }
    }
}

// =============================================================================
// LAYOUT MANAGER
// =============================================================================

impl LayoutManager for GridLayout {
    fn preferred_size(&self, children: &[LayoutChild<'_>]) -> Size {
        let margins = Size::new(
            self.horizontal_margins().min(u16::MAX as u32) as u16,
            self.vertical_margins().min(u16::MAX as u32) as u16,
        );
        if children.is_empty() {
            return margins;
        }

        let measured = self.measure(children);
        let columns = measured.widths.len() as u32;
        let rows = measured.heights.len() as u32;

        let width = total(&measured.widths)
            + self.horizontal_margins()
            + self.horizontal_spacing as u32 * columns.saturating_sub(1);
        let height = total(&measured.heights)
            + self.vertical_margins()
            + self.vertical_spacing as u32 * rows.saturating_sub(1);

        Size::new(
            width.min(u16::MAX as u32) as u16,
            height.min(u16::MAX as u32) as u16,
        )
    }

    fn place(&self, area: Size, children: &[LayoutChild<'_>]) -> Vec<Rect> {
        if children.is_empty() {
            return Vec::new();
        }

        let Measured { table, cells, data, mut widths, mut heights } = self.measure(children);
        let columns = table.column_count() as u32;
        let rows = table.row_count() as u32;

        let h_spacing_total = self.horizontal_spacing as u32 * columns.saturating_sub(1);
        let v_spacing_total = self.vertical_spacing as u32 * rows.saturating_sub(1);

        // Too small to hold even the margins and spacing
        if columns == 0
            || rows == 0
            || area.columns as u32 <= self.horizontal_margins() + h_spacing_total
            || area.rows as u32 <= self.vertical_margins() + v_spacing_total
        {
            return vec![Rect::EMPTY; children.len()];
        }

        let target_width = area.columns as u32 - self.horizontal_margins() - h_spacing_total;
        let target_height = area.rows as u32 - self.vertical_margins() - v_spacing_total;

        let grow_columns = growable_tracks(
            widths.len(),
            &cells,
            data.iter().map(|d| d.grab_extra_horizontal_space),
            column_start,
            column_span,
        );
        let grow_rows = growable_tracks(
            heights.len(),
            &cells,
            data.iter().map(|d| d.grab_extra_vertical_space),
            row_start,
            row_span,
        );

        shrink_to_fit(&mut widths, target_width);
        grow_to_fill(&mut widths, &grow_columns, target_width);
        shrink_to_fit(&mut heights, target_height);
        grow_to_fill(&mut heights, &grow_rows, target_height);

        let column_offsets = offsets(&widths, self.horizontal_spacing);
        let row_offsets = offsets(&heights, self.vertical_spacing);

        children
            .iter()
            .zip(cells.iter().zip(&data))
            .map(|(child, (cell, data))| {
                let Some(cell) = cell else {
                    return Rect::EMPTY;
                };
                let available_width =
                    spanned_extent(&widths, cell.column, cell.columns, self.horizontal_spacing);
                let available_height =
                    spanned_extent(&heights, cell.row, cell.rows, self.vertical_spacing);

                let (dx, width) = data
                    .horizontal_alignment
                    .place(child.preferred.columns, available_width);
                let (dy, height) = data
                    .vertical_alignment
                    .place(child.preferred.rows, available_height);

                let column =
                    self.left_margin as u32 + column_offsets[cell.column] + dx as u32;
                let row = self.top_margin as u32 + row_offsets[cell.row] + dy as u32;

                Rect::new(
                    Position::new(column as u16, row as u16),
                    Size::new(width, height),
                )
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
