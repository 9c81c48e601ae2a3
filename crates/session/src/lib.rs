//! Headless side of the grid UI.
//!
//! A renderer owns a [`GridSession`], turns user input into [`GridAction`]s,
//! and redraws from [`GridSession::snapshot`] whenever an action reports a
//! change. The session keeps the selected cell (the anchor for structural
//! commands) so the table model never deals with focus.

mod action;
mod session;

pub use action::{ActionOutcome, CellPosition, GridAction};
pub use session::GridSession;
