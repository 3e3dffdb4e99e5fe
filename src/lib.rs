//! todolist - In-memory TODO-list service
//!
//! Core library: request parsing, the list store and API, and the TCP
//! accept loop.

pub mod config;
pub mod http;
pub mod server;
pub mod todo;
