use gridpad_engine::events::TableEvent;
use gridpad_engine::{HorizontalMove, InsertPosition, Table, VerticalMove};

/// Position of a cell in the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// User intent reported by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum GridAction {
    /// A cell received focus; it becomes the anchor for structural commands.
    SelectCell { row: usize, col: usize },
    ClearSelection,
    /// An edited cell lost focus with this value.
    CommitCell { row: usize, col: usize, value: String },
    /// Header clicked: advance that column's sort cycle.
    ActivateHeader(usize),
    AddColumn(InsertPosition),
    RemoveColumn,
    MoveColumn(HorizontalMove),
    AddRow(InsertPosition),
    RemoveRow,
    MoveRow(VerticalMove),
    /// Replace everything, e.g. after a CSV file was read.
    Load(Table),
}

impl GridAction {
    /// Structural commands act on the anchor and do nothing without one.
    pub fn needs_anchor(&self) -> bool {
        matches!(
            self,
            GridAction::AddColumn(_)
                | GridAction::RemoveColumn
                | GridAction::MoveColumn(_)
                | GridAction::AddRow(_)
                | GridAction::RemoveRow
                | GridAction::MoveRow(_)
        )
    }
}

/// Result of applying one action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    /// What changed; `None` when the action was a no-op or selection only.
    pub event: Option<TableEvent>,
    /// Cell the renderer should focus afterwards.
    pub focus: Option<CellPosition>,
}

impl ActionOutcome {
    pub fn changed(&self) -> bool {
        self.event.is_some()
    }
}
