use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a [`TodoList`] inside the store.
pub type ListId = i64;

/// A single task entry inside a list.
///
/// `itemid` is chosen by the client and is not checked for uniqueness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    #[serde(rename = "itemid")]
    pub item_id: i64,
    pub detail: String,
    pub completed: bool,
}

/// A titled list of items.
///
/// Every field is optional on input: missing fields fall back to their
/// defaults and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoList {
    pub id: ListId,
    pub title: String,
    #[serde(rename = "list", deserialize_with = "null_as_empty")]
    pub items: Vec<Item>,
}

impl TodoList {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_item(mut self, item_id: i64, detail: impl Into<String>, completed: bool) -> Self {
        self.items.push(Item {
            item_id,
            detail: detail.into(),
            completed,
        });
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Item>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Item>>::deserialize(deserializer)?.unwrap_or_default())
}
