//! JSON rendering of stored lists.

use crate::todo::model::{ListId, TodoList};

/// Body returned for a list that does not exist.
pub const EMPTY_OBJECT: &str = "{}";

/// Render a list as pretty-printed JSON, or `{}` when there is none.
pub fn format_list(list: Option<&TodoList>) -> String {
    match list {
        Some(list) => serde_json::to_string_pretty(list).unwrap_or_else(|e| {
            tracing::error!(id = list.id, error = %e, "Failed to encode list");
            EMPTY_OBJECT.to_string()
        }),
        None => EMPTY_OBJECT.to_string(),
    }
}

/// Render the reply to a create request, e.g. `{"id":1}`.
pub fn format_created(id: ListId) -> String {
    serde_json::json!({ "id": id }).to_string()
}
