use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Author, Group};

/// Number of characters of the text used as the post summary.
const SUMMARY_CHARS: usize = 15;

/// Post entity - a publication by an author, optionally filed under a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub text: String,
    /// Stored media name, e.g. `posts/small.gif`.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// First characters of the text, used as a page title.
    pub fn summary(&self) -> String {
        self.text.chars().take(SUMMARY_CHARS).collect()
    }

    pub fn is_authored_by(&self, user_id: i32) -> bool {
        self.author_id == user_id
    }
}

/// A post that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub text: String,
    pub image: Option<String>,
}

impl NewPost {
    pub fn new(author_id: i32, text: impl Into<String>) -> Self {
        Self {
            author_id,
            group_id: None,
            text: text.into(),
            image: None,
        }
    }

    pub fn in_group(mut self, group_id: i32) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// In-place changes applied by the edit form.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub text: String,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

impl PostChanges {
    pub fn apply(self, post: &mut Post) {
        post.text = self.text;
        post.group_id = self.group_id;
        post.image = self.image;
    }
}

/// A post together with the records a listing needs to display it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
    pub post: Post,
    pub author: Author,
    pub group: Option<Group>,
}

/// Which posts a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(i32),
    Author(i32),
    /// Posts by every author the given user follows.
    FollowedBy(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(text: &str) -> Post {
        Post {
            id: 1,
            author_id: 7,
            group_id: None,
            text: text.to_string(),
            image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_truncates_by_characters() {
        let post = post("Тестовый текст длиннее пятнадцати");
        assert_eq!(post.summary(), "Тестовый текст ");
        assert_eq!(post.summary().chars().count(), 15);
    }

    #[test]
    fn test_summary_of_short_text() {
        assert_eq!(post("short").summary(), "short");
    }

    #[test]
    fn test_changes_replace_fields_in_place() {
        let mut post = post("old");
        PostChanges {
            text: "new".to_string(),
            group_id: Some(3),
            image: Some("posts/a.gif".to_string()),
        }
        .apply(&mut post);

        assert_eq!(post.id, 1);
        assert_eq!(post.text, "new");
        assert_eq!(post.group_id, Some(3));
        assert!(post.is_authored_by(7));
    }
}
