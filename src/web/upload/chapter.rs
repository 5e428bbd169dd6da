//! # Chapter Paths
//!
//! Validated `(username, slug, chapter)` triples taken from the URL, and the
//! storage key they map to: `<username>/<slug>/<chapter>.pdf`.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChapterPathError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} contains a path separator or parent reference")]
    Traversal(&'static str),
}

/// One chapter of one work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterPath {
    username: String,
    slug: String,
    chapter: u32,
}

impl ChapterPath {
    /// # Errors
    /// [`ChapterPathError`] if `username` or `slug` is empty or could escape
    /// its directory.
    pub fn new(username: &str, slug: &str, chapter: u32) -> Result<Self, ChapterPathError> {
        Ok(Self {
            username: segment("username", username)?,
            slug: segment("slug", slug)?,
            chapter,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    /// Relative storage key.
    pub fn storage_key(&self) -> String {
        format!("{}/{}/{}.pdf", self.username, self.slug, self.chapter)
    }
}

impl fmt::Display for ChapterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

fn segment(name: &'static str, value: &str) -> Result<String, ChapterPathError> {
    if value.is_empty() {
        return Err(ChapterPathError::Empty(name));
    }
    if value.contains(['/', '\\', '\0']) || value.contains("..") {
        return Err(ChapterPathError::Traversal(name));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_storage_key() {
        let p = ChapterPath::new("alice", "my-book", 3).unwrap();
        assert_eq!(p.storage_key(), "alice/my-book/3.pdf");
        assert_eq!(p.to_string(), "alice/my-book/3.pdf");
        assert_eq!((p.username(), p.slug(), p.chapter()), ("alice", "my-book", 3));
    }

    #[test]
    fn rejects_empty_segments() {
        assert_eq!(
            ChapterPath::new("", "s", 1),
            Err(ChapterPathError::Empty("username"))
        );
        assert_eq!(
            ChapterPath::new("u", "", 1),
            Err(ChapterPathError::Empty("slug"))
        );
    }

    #[test]
    fn rejects_traversal() {
        for bad in ["..", "a/b", "a\\b", "x..y", "nul\0"] {
            assert_eq!(
                ChapterPath::new(bad, "s", 1),
                Err(ChapterPathError::Traversal("username")),
                "{bad:?}"
            );
            assert!(ChapterPath::new("u", bad, 1).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn allows_dots_and_unicode_that_are_not_traversal() {
        assert!(ChapterPath::new("a.b", "v1.0-final", 0).is_ok());
        assert!(ChapterPath::new("ユーザー", "本", 12).is_ok());
    }
}
