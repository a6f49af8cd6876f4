//! Employee selection.
//!
//! This module contains the manage-employees transfer list and the
//! projection from the selected employees onto deduction membership.

mod membership;
mod transfer_list;

pub use membership::{employee_counts, enrolled_employees};
pub use transfer_list::{MoveDirection, Pane, TransferEntry, TransferList};
