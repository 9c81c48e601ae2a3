//! Change notifications for table mutations.
//!
//! Every applied mutation produces exactly one event. No-ops produce none,
//! so a renderer can redraw only when something actually changed.

use crate::sort::SortState;

/// Events emitted after a table mutation is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    /// Whole table replaced (initialization or CSV load).
    Loaded { columns: usize, rows: usize },
    /// One cell value committed.
    CellChanged { row: usize, col: usize },
    ColumnInserted { index: usize },
    ColumnRemoved { index: usize },
    ColumnMoved { from: usize, to: usize },
    RowInserted { index: usize },
    RowRemoved { index: usize },
    RowMoved { from: usize, to: usize },
    /// Sort state changed. `None` means the indicator was cleared and the
    /// row order was left as it was.
    SortChanged { sort: Option<SortState> },
}

impl TableEvent {
    /// True when the column layout changed (headers must be redrawn).
    pub fn changes_columns(&self) -> bool {
        matches!(
            self,
            TableEvent::Loaded { .. }
                | TableEvent::ColumnInserted { .. }
                | TableEvent::ColumnRemoved { .. }
                | TableEvent::ColumnMoved { .. }
        )
    }
}

/// Callback type for receiving table events.
pub type EventCallback = Box<dyn FnMut(&TableEvent)>;

/// Simple event collector for testing.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<TableEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: TableEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[TableEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Only the events that changed the column layout.
    pub fn column_changes(&self) -> Vec<&TableEvent> {
        self.events.iter().filter(|e| e.changes_columns()).collect()
    }
}
