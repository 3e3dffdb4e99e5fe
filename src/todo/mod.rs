//! TODO-list domain
//!
//! This module holds the list data model, the shared in-memory store, JSON
//! rendering of lists, and the handler that routes list API requests.

pub mod handler;
pub mod json;
pub mod model;
pub mod store;

pub use handler::{HandlerError, ListHandler};
pub use model::{Item, ListId, TodoList};
pub use store::Store;
