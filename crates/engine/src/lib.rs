pub mod collate;
pub mod events;
pub mod sort;
pub mod table;

pub use sort::{SortDirection, SortState};
pub use table::{HorizontalMove, InsertPosition, Snapshot, Table, VerticalMove};
