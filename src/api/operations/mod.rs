//! Forms batch update operations
//!
//! This module provides typed `forms.batchUpdate` operations that can be
//! collected, chunked and submitted in order.

pub mod operation;
pub mod operations;

pub use operation::{
    BatchUpdateRequest, BatchUpdateResponse, CreateItem, DeleteItem, Location, MoveItem,
    Operation, UpdateFormInfo, UpdateItem, UpdateSettings,
};
pub use operations::Operations;
