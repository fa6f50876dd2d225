//! Google Forms, Drive and Sheets API module
//!
//! Typed models for the documents the services exchange, the batch update
//! operation builder, the service traits the engines are written against and
//! the reqwest-backed client implementing them.

pub mod client;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod operations;
pub mod service;

pub use client::GoogleClient;
pub use error::ApiError;
pub use logging::{ApiLogger, OperationContext};
pub use models::{Form, FormInfo, FormSettings, Item, ItemKind, Question, QuestionKind};
pub use operations::{BatchUpdateRequest, BatchUpdateResponse, Location, Operation, Operations};
pub use service::{FormsService, SheetsService};
