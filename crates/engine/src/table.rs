//! The table model: header list, row matrix and sort state.
//!
//! Invariant: every row has exactly `headers.len()` cells, after every
//! operation. Operations that cannot apply (bad anchor, would remove the
//! last row/column, move past an edge) leave the table untouched and
//! return `None`/`false`.
//!
//! Structural operations take the anchor index explicitly. Which cell is
//! "selected" is the caller's business.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::sort::{self, SortState};

/// Default grid size for a fresh table.
pub const DEFAULT_COLUMNS: usize = 3;
pub const DEFAULT_ROWS: usize = 3;

/// Where a new row/column goes relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsertPosition {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalMove {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalMove {
    Up,
    Down,
}

/// Label for a generated column: "Column 1", "Column 2", ...
pub fn default_header(index: usize) -> String {
    format!("Column {}", index + 1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    sort: Option<SortState>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS, DEFAULT_ROWS)
    }
}

impl Table {
    /// Fresh table of `cols` generated headers and `rows` empty rows.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            headers: (0..cols).map(default_header).collect(),
            rows: vec![vec![String::new(); cols]; rows],
            sort: None,
        }
    }

    /// Build a table from loaded data, padding short rows with empty cells
    /// and dropping cells past the header count.
    pub fn from_parts(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut table = Self {
            headers: Vec::new(),
            rows: Vec::new(),
            sort: None,
        };
        table.replace(headers, rows);
        table
    }

    /// Replace all data. Sort state is cleared.
    pub fn replace(&mut self, headers: Vec<String>, mut rows: Vec<Vec<String>>) {
        let width = headers.len();
        for row in rows.iter_mut() {
            row.resize(width, String::new());
        }
        self.headers = headers;
        self.rows = rows;
        self.sort = None;
        debug!("table replaced: {} columns x {} rows", self.column_count(), self.row_count());
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.row_count() && col < self.column_count()
    }

    /// Owned copy for a renderer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            headers: self.headers.clone(),
            rows: self.rows.clone(),
            sort: self.sort,
        }
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.headers, self.rows)
    }

    // =========================================================================
    // Cell edits
    // =========================================================================

    /// Commit a cell value. Out-of-range positions are rejected.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> bool {
        let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) else {
            trace!("set_cell({row}, {col}) rejected: out of range");
            return false;
        };
        *cell = value.into();
        true
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Insert an empty column next to `anchor`. Returns the new column's index.
    ///
    /// The header is "Column <N+1>" where N is the count before insertion,
    /// whatever the position. It can duplicate an existing header.
    pub fn add_column(&mut self, position: InsertPosition, anchor: usize) -> Option<usize> {
        if anchor >= self.column_count() {
            trace!("add_column skipped: anchor {anchor} out of range");
            return None;
        }
        let index = match position {
            InsertPosition::Before => anchor,
            InsertPosition::After => anchor + 1,
        };

        let header = default_header(self.column_count());
        self.headers.insert(index, header);
        for row in self.rows.iter_mut() {
            row.insert(index, String::new());
        }
        self.sort = None;
        debug!("column inserted at {index}");
        Some(index)
    }

    /// Remove the column at `anchor`. The last remaining column is kept.
    /// Returns the index of the column that now holds the anchor's place.
    pub fn remove_column(&mut self, anchor: usize) -> Option<usize> {
        if self.column_count() <= 1 || anchor >= self.column_count() {
            trace!("remove_column skipped: anchor {anchor}, {} columns", self.column_count());
            return None;
        }

        self.headers.remove(anchor);
        for row in self.rows.iter_mut() {
            row.remove(anchor);
        }
        self.sort = None;
        debug!("column removed at {anchor}");
        Some(anchor.min(self.column_count() - 1))
    }

    /// Move the column at `anchor` one step left or right.
    /// Returns the column's new index. Sort state is kept as is.
    pub fn move_column(&mut self, direction: HorizontalMove, anchor: usize) -> Option<usize> {
        let target = match direction {
            HorizontalMove::Left => anchor.checked_sub(1),
            HorizontalMove::Right => anchor.checked_add(1),
        };
        let Some(target) = target.filter(|&t| t < self.column_count() && anchor < self.column_count())
        else {
            trace!("move_column skipped: anchor {anchor} at edge");
            return None;
        };

        let header = self.headers.remove(anchor);
        self.headers.insert(target, header);
        for row in self.rows.iter_mut() {
            let cell = row.remove(anchor);
            row.insert(target, cell);
        }
        debug!("column moved {anchor} -> {target}");
        Some(target)
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Insert an empty row next to `anchor`. Returns the new row's index.
    pub fn add_row(&mut self, position: InsertPosition, anchor: usize) -> Option<usize> {
        if anchor >= self.row_count() {
            trace!("add_row skipped: anchor {anchor} out of range");
            return None;
        }
        let index = match position {
            InsertPosition::Before => anchor,
            InsertPosition::After => anchor + 1,
        };

        self.rows.insert(index, vec![String::new(); self.column_count()]);
        debug!("row inserted at {index}");
        Some(index)
    }

    /// Remove the row at `anchor`. The last remaining row is kept.
    pub fn remove_row(&mut self, anchor: usize) -> Option<usize> {
        if self.row_count() <= 1 || anchor >= self.row_count() {
            trace!("remove_row skipped: anchor {anchor}, {} rows", self.row_count());
            return None;
        }

        self.rows.remove(anchor);
        debug!("row removed at {anchor}");
        Some(anchor.min(self.row_count() - 1))
    }

    /// Move the row at `anchor` one step up or down. Returns its new index.
    pub fn move_row(&mut self, direction: VerticalMove, anchor: usize) -> Option<usize> {
        let target = match direction {
            VerticalMove::Up => anchor.checked_sub(1),
            VerticalMove::Down => anchor.checked_add(1),
        };
        let Some(target) = target.filter(|&t| t < self.row_count() && anchor < self.row_count())
        else {
            trace!("move_row skipped: anchor {anchor} at edge");
            return None;
        };

        let row = self.rows.remove(anchor);
        self.rows.insert(target, row);
        debug!("row moved {anchor} -> {target}");
        Some(target)
    }

    // =========================================================================
    // Sort
    // =========================================================================

    /// Advance the sort cycle for `col` and reorder rows if a direction is
    /// now active. Clearing the sort leaves rows where they are.
    ///
    /// Returns `None` for an out-of-range column (nothing changes);
    /// otherwise `Some(new_state)`.
    pub fn sort_by_column(&mut self, col: usize) -> Option<Option<SortState>> {
        if col >= self.column_count() {
            trace!("sort_by_column({col}) rejected: out of range");
            return None;
        }

        let next = sort::next_sort_state(self.sort, col);
        if let Some(state) = next {
            sort::sort_rows(&mut self.rows, state.column, state.direction);
        }
        self.sort = next;
        debug!("sort state for column {col}: {next:?}");
        Some(next)
    }
}

/// Owned (headers, rows, sort) view handed to a renderer after each change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub sort: Option<SortState>,
}

impl Snapshot {
    /// JSON form for web front-ends.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| e.to_string())
    }
}
