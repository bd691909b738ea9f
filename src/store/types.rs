//! Todo record types.

use serde::{Deserialize, Serialize};

/// Store-assigned todo identifier.
pub type TodoId = u64;

/// A todo item as held by the store and returned over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Identifier assigned at creation, never changed afterwards.
    pub id: TodoId,
    /// User-supplied title.
    pub title: String,
    /// Whether the item is done.
    pub completed: bool,
}

/// Client payload for creating or replacing a todo.
///
/// Has no `id` field: any identifier sent by a client is skipped during
/// decoding, so the store is always the one deciding it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDraft {
    /// Title; an absent field decodes as empty.
    #[serde(default)]
    pub title: String,
    /// Completion flag, defaults to `false`.
    #[serde(default)]
    pub completed: bool,
}

impl TodoDraft {
    /// Create a not-yet-completed draft.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }

    /// Set the completion flag.
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Whether the title is missing or empty.
    pub fn has_empty_title(&self) -> bool {
        self.title.is_empty()
    }

    /// Bind this draft to an identifier.
    pub fn into_todo(self, id: TodoId) -> Todo {
        Todo {
            id,
            title: self.title,
            completed: self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_wire_field_names() {
        let todo = Todo {
            id: 1,
            title: "Buy groceries".to_string(),
            completed: false,
        };
        let json = serde_json::to_string(&todo).unwrap();
        assert_eq!(json, r#"{"id":1,"title":"Buy groceries","completed":false}"#);
    }

    #[test]
    fn draft_defaults_missing_fields() {
        let draft: TodoDraft = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert!(draft.has_empty_title());
        assert!(draft.completed);

        let draft: TodoDraft = serde_json::from_str(r#"{"title":"Walk the dog"}"#).unwrap();
        assert_eq!(draft.title, "Walk the dog");
        assert!(!draft.completed);
    }

    #[test]
    fn draft_skips_client_supplied_id() {
        let draft: TodoDraft =
            serde_json::from_str(r#"{"id":42,"title":"Read","completed":false}"#).unwrap();
        assert_eq!(draft.into_todo(7).id, 7);
    }

    #[test]
    fn draft_rejects_wrong_field_types() {
        assert!(serde_json::from_str::<TodoDraft>(r#"{"title":5}"#).is_err());
        assert!(serde_json::from_str::<TodoDraft>(r#"{"completed":"yes"}"#).is_err());
        assert!(serde_json::from_str::<TodoDraft>("").is_err());
    }
}
