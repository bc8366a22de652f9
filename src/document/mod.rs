//! Serialized documents and structural assertions over them.

mod assert;
mod pointer;

use std::fmt;

use serde_json::Value;

pub use assert::{
    assert_json_contains, assert_json_does_not_contain, json_contains, try_json_contains,
    try_json_does_not_contain, AssertionFailure,
};
pub use pointer::{JsonPath, PathSegment, PointerError};

/// The text of a serialized value together with its parsed tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedDocument {
    text: String,
    tree: Value,
}

impl SerializedDocument {
    /// Parse `text` into a document.
    pub fn parse(text: impl Into<String>) -> Result<Self, serde_json::Error> {
        let text = text.into();
        let tree = serde_json::from_str(&text)?;
        Ok(Self { text, tree })
    }

    /// Render `tree` into a document.
    pub fn from_tree(tree: Value) -> Self {
        Self {
            text: tree.to_string(),
            tree,
        }
    }

    /// The JSON text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parsed tree.
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Consume the document, keeping the text.
    pub fn into_text(self) -> String {
        self.text
    }

    /// The value at `path`, if any.
    pub fn at(&self, path: impl Into<JsonPath>) -> Option<&Value> {
        path.into().resolve(&self.tree)
    }

    /// Whether a non-null value exists at `path`.
    pub fn contains(&self, path: impl Into<JsonPath>) -> bool {
        json_contains(&self.tree, &path.into())
    }

    /// Assert that a non-null value exists at `path`.
    #[track_caller]
    pub fn assert_contains(&self, path: impl Into<JsonPath>) {
        assert_json_contains(&self.tree, path);
    }

    /// Assert that `path` is missing or `null`.
    #[track_caller]
    pub fn assert_does_not_contain(&self, path: impl Into<JsonPath>) {
        assert_json_does_not_contain(&self.tree, path);
    }
}

impl fmt::Display for SerializedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
