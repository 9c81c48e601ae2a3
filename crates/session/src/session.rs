use std::path::{Path, PathBuf};

use gridpad_config::Settings;
use gridpad_engine::events::{EventCallback, TableEvent};
use gridpad_engine::{Snapshot, Table};
use gridpad_io::CsvError;
use gridpad_io::csv;
use log::{debug, trace, warn};

use crate::action::{ActionOutcome, CellPosition, GridAction};

pub struct GridSession {
    table: Table,
    anchor: Option<CellPosition>,
    export_file_name: String,
    subscribers: Vec<EventCallback>,
}

impl Default for GridSession {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl GridSession {
    /// Start with the configured default grid.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_table(
            Table::new(settings.default_columns, settings.default_rows),
            settings,
        )
    }

    pub fn with_table(table: Table, settings: &Settings) -> Self {
        Self {
            table,
            anchor: None,
            export_file_name: settings.export_file_name.clone(),
            subscribers: Vec::new(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn anchor(&self) -> Option<CellPosition> {
        self.anchor
    }

    pub fn snapshot(&self) -> Snapshot {
        self.table.snapshot()
    }

    /// Register a callback that receives every applied change.
    pub fn subscribe(&mut self, callback: EventCallback) {
        self.subscribers.push(callback);
    }

    /// Apply one user action.
    pub fn apply(&mut self, action: GridAction) -> ActionOutcome {
        if action.needs_anchor() && self.anchor.is_none() {
            trace!("{action:?} ignored: no cell selected");
            return self.outcome(None);
        }

        let event = match action {
            GridAction::SelectCell { row, col } => {
                if self.table.contains(row, col) {
                    self.anchor = Some(CellPosition::new(row, col));
                } else {
                    trace!("select ({row}, {col}) ignored: out of range");
                }
                None
            }
            GridAction::ClearSelection => {
                self.anchor = None;
                None
            }
            GridAction::CommitCell { row, col, value } => self
                .table
                .set_cell(row, col, value)
                .then_some(TableEvent::CellChanged { row, col }),
            GridAction::ActivateHeader(col) => self
                .table
                .sort_by_column(col)
                .map(|sort| TableEvent::SortChanged { sort }),
            GridAction::AddColumn(position) => {
                let at = self.anchor_or_default();
                self.table.add_column(position, at.col).map(|index| {
                    self.anchor = Some(CellPosition::new(at.row, index));
                    TableEvent::ColumnInserted { index }
                })
            }
            GridAction::RemoveColumn => {
                let at = self.anchor_or_default();
                self.table.remove_column(at.col).map(|index| {
                    self.anchor = Some(CellPosition::new(at.row, index));
                    TableEvent::ColumnRemoved { index: at.col }
                })
            }
            GridAction::MoveColumn(direction) => {
                let at = self.anchor_or_default();
                self.table.move_column(direction, at.col).map(|to| {
                    self.anchor = Some(CellPosition::new(at.row, to));
                    TableEvent::ColumnMoved { from: at.col, to }
                })
            }
            GridAction::AddRow(position) => {
                let at = self.anchor_or_default();
                self.table.add_row(position, at.row).map(|index| {
                    self.anchor = Some(CellPosition::new(index, at.col));
                    TableEvent::RowInserted { index }
                })
            }
            GridAction::RemoveRow => {
                let at = self.anchor_or_default();
                self.table.remove_row(at.row).map(|index| {
                    self.anchor = Some(CellPosition::new(index, at.col));
                    TableEvent::RowRemoved { index: at.row }
                })
            }
            GridAction::MoveRow(direction) => {
                let at = self.anchor_or_default();
                self.table.move_row(direction, at.row).map(|to| {
                    self.anchor = Some(CellPosition::new(to, at.col));
                    TableEvent::RowMoved { from: at.row, to }
                })
            }
            GridAction::Load(table) => {
                self.table = table;
                self.anchor = None;
                Some(TableEvent::Loaded {
                    columns: self.table.column_count(),
                    rows: self.table.row_count(),
                })
            }
        };

        if let Some(event) = &event {
            debug!("applied: {event:?}");
            for callback in self.subscribers.iter_mut() {
                callback(event);
            }
        }
        self.outcome(event)
    }

    fn anchor_or_default(&self) -> CellPosition {
        self.anchor.unwrap_or_default()
    }

    fn outcome(&self, event: Option<TableEvent>) -> ActionOutcome {
        ActionOutcome {
            event,
            focus: self.anchor,
        }
    }

    // =========================================================================
    // CSV file flows
    // =========================================================================

    /// Load CSV text that was already read. Unusable text leaves the grid
    /// as it was.
    pub fn load_csv_text(&mut self, text: &str) -> ActionOutcome {
        match csv::parse(text) {
            Ok(parsed) => self.apply(GridAction::Load(parsed.into_table())),
            Err(e) => {
                debug!("CSV text ignored: {e}");
                self.outcome(None)
            }
        }
    }

    /// Read and load a CSV file. On error the grid is unchanged and the
    /// error is returned for the caller to report.
    pub fn open_csv(&mut self, path: &Path) -> Result<ActionOutcome, CsvError> {
        match csv::import(path) {
            Ok(table) => Ok(self.apply(GridAction::Load(table))),
            Err(e) => {
                warn!("could not open {}: {e}", path.display());
                Err(e)
            }
        }
    }

    /// Current contents as CSV text.
    pub fn export_text(&self) -> String {
        csv::serialize_table(&self.table)
    }

    /// Write the grid to `<dir>/<export file name>` and return the path.
    pub fn export_csv(&self, dir: &Path) -> Result<PathBuf, CsvError> {
        let path = dir.join(&self.export_file_name);
        csv::export(&self.table, &path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpad_engine::events::EventCollector;
    use gridpad_engine::{HorizontalMove, InsertPosition, VerticalMove};

    fn session() -> GridSession {
        GridSession::default()
    }

    #[test]
    fn test_default_session_is_three_by_three() {
        let s = session();
        assert_eq!(s.table().headers(), &["Column 1", "Column 2", "Column 3"]);
        assert_eq!(s.table().row_count(), 3);
        assert_eq!(s.anchor(), None);
    }

    #[test]
    fn test_structural_command_without_anchor_is_noop() {
        let mut s = session();
        let before = s.snapshot();
        for action in [
            GridAction::AddColumn(InsertPosition::After),
            GridAction::RemoveColumn,
            GridAction::MoveColumn(HorizontalMove::Right),
            GridAction::AddRow(InsertPosition::Before),
            GridAction::RemoveRow,
            GridAction::MoveRow(VerticalMove::Down),
        ] {
            let outcome = s.apply(action);
            assert!(!outcome.changed());
            assert_eq!(outcome.focus, None);
        }
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_select_out_of_range_ignored() {
        let mut s = session();
        s.apply(GridAction::SelectCell { row: 1, col: 1 });
        s.apply(GridAction::SelectCell { row: 9, col: 0 });
        assert_eq!(s.anchor(), Some(CellPosition::new(1, 1)));
    }

    #[test]
    fn test_commit_cell() {
        let mut s = session();
        let outcome = s.apply(GridAction::CommitCell { row: 2, col: 0, value: "x".into() });
        assert_eq!(outcome.event, Some(TableEvent::CellChanged { row: 2, col: 0 }));
        assert_eq!(s.table().cell(2, 0), Some("x"));

        let outcome = s.apply(GridAction::CommitCell { row: 3, col: 0, value: "y".into() });
        assert!(!outcome.changed());
    }

    #[test]
    fn test_move_column_focus_follows() {
        let mut s = session();
        s.apply(GridAction::SelectCell { row: 1, col: 0 });
        let outcome = s.apply(GridAction::MoveColumn(HorizontalMove::Right));
        assert_eq!(outcome.event, Some(TableEvent::ColumnMoved { from: 0, to: 1 }));
        assert_eq!(outcome.focus, Some(CellPosition::new(1, 1)));
        assert_eq!(s.table().headers(), &["Column 2", "Column 1", "Column 3"]);
    }

    #[test]
    fn test_add_row_focuses_new_row() {
        let mut s = session();
        s.apply(GridAction::SelectCell { row: 2, col: 1 });
        let outcome = s.apply(GridAction::AddRow(InsertPosition::After));
        assert_eq!(outcome.event, Some(TableEvent::RowInserted { index: 3 }));
        assert_eq!(outcome.focus, Some(CellPosition::new(3, 1)));
        assert_eq!(s.table().row_count(), 4);
    }

    #[test]
    fn test_remove_last_row_clamps_focus() {
        let mut s = session();
        s.apply(GridAction::SelectCell { row: 2, col: 2 });
        let outcome = s.apply(GridAction::RemoveRow);
        assert_eq!(outcome.event, Some(TableEvent::RowRemoved { index: 2 }));
        assert_eq!(outcome.focus, Some(CellPosition::new(1, 2)));
    }

    #[test]
    fn test_remove_only_column_is_noop() {
        let mut s = GridSession::with_table(Table::new(1, 2), &Settings::default());
        s.apply(GridAction::SelectCell { row: 0, col: 0 });
        let outcome = s.apply(GridAction::RemoveColumn);
        assert!(!outcome.changed());
        assert_eq!(outcome.focus, Some(CellPosition::new(0, 0)));
        assert_eq!(s.table().column_count(), 1);
    }

    #[test]
    fn test_activate_header_cycles_sort() {
        let mut s = session();
        s.apply(GridAction::CommitCell { row: 0, col: 0, value: "b".into() });
        s.apply(GridAction::CommitCell { row: 1, col: 0, value: "a".into() });
        s.apply(GridAction::CommitCell { row: 2, col: 0, value: "c".into() });

        s.apply(GridAction::ActivateHeader(0));
        let col: Vec<&str> = (0..3).filter_map(|r| s.table().cell(r, 0)).collect();
        assert_eq!(col, vec!["a", "b", "c"]);

        s.apply(GridAction::ActivateHeader(0));
        let outcome = s.apply(GridAction::ActivateHeader(0));
        assert_eq!(outcome.event, Some(TableEvent::SortChanged { sort: None }));

        assert!(!s.apply(GridAction::ActivateHeader(3)).changed());
    }

    #[test]
    fn test_subscribers_see_only_changes() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(EventCollector::new()));
        let mut s = session();
        let sink = Rc::clone(&seen);
        s.subscribe(Box::new(move |event: &TableEvent| sink.borrow_mut().push(event.clone())));

        s.apply(GridAction::RemoveRow); // no anchor
        s.apply(GridAction::SelectCell { row: 0, col: 0 });
        s.apply(GridAction::AddColumn(InsertPosition::Before));

        assert_eq!(seen.borrow().events(), &[TableEvent::ColumnInserted { index: 0 }]);
    }

    #[test]
    fn test_load_clears_anchor() {
        let mut s = session();
        s.apply(GridAction::SelectCell { row: 0, col: 0 });
        let outcome = s.load_csv_text("a,b\n1,2\n");
        assert_eq!(outcome.event, Some(TableEvent::Loaded { columns: 2, rows: 1 }));
        assert_eq!(s.anchor(), None);

        let outcome = s.load_csv_text("\n\n");
        assert!(!outcome.changed());
        assert_eq!(s.table().headers(), &["a", "b"]);
    }
}
