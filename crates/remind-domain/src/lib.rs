//! remind-domain
//!
//! Pure domain models (Bill, Budget, reminder events and alerts).
//! No I/O, no scheduling, no storage. Only data types and core enums.

pub mod bill;
pub mod budget;
pub mod common;
pub mod notification;

pub use bill::*;
pub use budget::*;
pub use common::*;
pub use notification::*;
