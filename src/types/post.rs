use serde::{Deserialize, Serialize};

/// A community feed entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Feed-unique identifier.
    pub id: u64,

    /// Display name of the author.
    pub author: String,

    /// Short avatar initials shown next to the author.
    pub avatar: String,

    /// Post headline.
    pub title: String,

    /// Body text.
    pub content: String,

    /// Like count.
    pub likes: u32,

    /// Comment count.
    pub comments: u32,

    /// Human-readable relative timestamp, e.g. "2 hours ago".
    pub timestamp: String,

    /// Topic tags, e.g. "Kerala", "Budget".
    pub tags: Vec<String>,
}

impl Post {
    /// Returns true if the query matches the title, content, or a tag,
    /// case-insensitively.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query)
            || self.content.to_lowercase().contains(&query)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&query))
    }
}
