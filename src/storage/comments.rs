use chrono::{DateTime, Local};

use super::records::Store;
use super::types::{Comment, CommentIndex};

/// Display format for comment timestamps, e.g. `1/20/2025, 3:04:05 PM`.
const WHEN_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Reader comments, grouped by article id and kept newest first.
///
/// The index is read from the store once, when the repository is loaded.
/// After that the in-memory copy is authoritative: every change is applied
/// to it first and then written through to the store. A failed write is
/// logged by the store and the session carries on with the in-memory copy.
pub struct CommentRepository {
    store: Store,
    index: CommentIndex,
}

impl CommentRepository {
    /// Load the comment index from `store`. A missing or corrupt index
    /// starts empty.
    pub async fn load(store: Store) -> Self {
        let index = store.load_comments().await;
        tracing::debug!(articles = index.len(), "Loaded comment index");
        Self { store, index }
    }

    /// Comments for `article_id`, newest first. Empty when there are none.
    pub fn list(&self, article_id: &str) -> Vec<Comment> {
        self.index.get(article_id).cloned().unwrap_or_default()
    }

    /// Add a comment stamped with the current local time.
    ///
    /// Returns `false` (and stores nothing) when `name` or `text` is blank.
    pub async fn add(&mut self, article_id: &str, name: &str, text: &str) -> bool {
        self.add_at(article_id, name, text, Local::now()).await
    }

    /// Add a comment with an explicit timestamp.
    pub async fn add_at(
        &mut self,
        article_id: &str,
        name: &str,
        text: &str,
        when: DateTime<Local>,
    ) -> bool {
        let name = name.trim();
        let text = text.trim();
        if name.is_empty() || text.is_empty() {
            tracing::debug!(article_id = %article_id, "Ignoring comment with blank name or text");
            return false;
        }

        self.index.entry(article_id.to_string()).or_default().insert(
            0,
            Comment {
                name: name.to_string(),
                text: text.to_string(),
                when: when.format(WHEN_FORMAT).to_string(),
            },
        );
        self.store.save_comments(&self.index).await;

        tracing::debug!(article_id = %article_id, "Comment added");
        true
    }

    /// Remove every comment on `article_id`. Other articles are untouched.
    pub async fn clear(&mut self, article_id: &str) {
        self.index.insert(article_id.to_string(), Vec::new());
        self.store.save_comments(&self.index).await;

        tracing::debug!(article_id = %article_id, "Comments cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{keys, Database};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    async fn test_repo() -> CommentRepository {
        let db = Database::open(":memory:").await.unwrap();
        CommentRepository::load(Store::new(db)).await
    }

    /// Make every write to local storage fail, as a full disk would.
    async fn reject_writes(store: &Store) {
        for event in ["INSERT", "UPDATE"] {
            sqlx::query(&format!(
                "CREATE TRIGGER reject_{event} BEFORE {event} ON local_storage \
                 BEGIN SELECT RAISE(ABORT, 'disk full'); END"
            ))
            .execute(&store.database().pool)
            .await
            .unwrap();
        }
    }

    fn names(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|c| c.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_list_empty_for_unknown_article() {
        let repo = test_repo().await;
        assert!(repo.list("p1").is_empty());
    }

    #[tokio::test]
    async fn test_add_inserts_newest_first() {
        let mut repo = test_repo().await;
        assert!(repo.add("p1", "Alice", "Nice post").await);
        assert!(repo.add("p1", "Bob", "Agreed").await);

        let comments = repo.list("p1");
        assert_eq!(names(&comments), vec!["Bob", "Alice"]);
        assert_eq!(comments[1].text, "Nice post");
    }

    #[tokio::test]
    async fn test_add_trims_fields() {
        let mut repo = test_repo().await;
        assert!(repo.add("p1", "  Alice ", "\tNice post\n").await);

        let comments = repo.list("p1");
        assert_eq!(comments[0].name, "Alice");
        assert_eq!(comments[0].text, "Nice post");
    }

    #[tokio::test]
    async fn test_add_rejects_blank_fields() {
        let mut repo = test_repo().await;
        assert!(!repo.add("p1", "   ", "text").await);
        assert!(!repo.add("p1", "Alice", "").await);
        assert!(!repo.add("p1", "", "").await);

        assert!(repo.list("p1").is_empty());
        // Nothing was written at all.
        let raw = repo.store.database().get_item(keys::COMMENTS).await.unwrap();
        assert_eq!(raw, None);
    }

    #[tokio::test]
    async fn test_add_at_formats_timestamp() {
        let mut repo = test_repo().await;
        let when = Local.with_ymd_and_hms(2025, 1, 20, 15, 4, 5).unwrap();
        repo.add_at("p1", "Alice", "Hi", when).await;

        assert_eq!(repo.list("p1")[0].when, "1/20/2025, 3:04:05 PM");
    }

    #[tokio::test]
    async fn test_add_writes_through_to_store() {
        let mut repo = test_repo().await;
        repo.add("p1", "Alice", "Saved").await;

        let stored = repo.store.load_comments().await;
        assert_eq!(stored, repo.index);

        let reloaded = CommentRepository::load(repo.store.clone()).await;
        assert_eq!(names(&reloaded.list("p1")), vec!["Alice"]);
    }

    #[tokio::test]
    async fn test_clear_leaves_other_articles() {
        let mut repo = test_repo().await;
        repo.add("p1", "Alice", "One").await;
        repo.add("p2", "Bob", "Two").await;

        repo.clear("p1").await;

        assert!(repo.list("p1").is_empty());
        assert_eq!(names(&repo.list("p2")), vec!["Bob"]);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let mut repo = test_repo().await;
        repo.clear("p1").await;
        repo.clear("p1").await;
        assert!(repo.list("p1").is_empty());

        repo.add("p1", "Alice", "Back again").await;
        assert_eq!(repo.list("p1").len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_index_recovers_on_add() {
        let db = Database::open(":memory:").await.unwrap();
        db.set_item(keys::COMMENTS, "garbage").await.unwrap();
        let mut repo = CommentRepository::load(Store::new(db)).await;

        assert!(repo.list("p1").is_empty());
        assert!(repo.add("p1", "Alice", "Fresh start").await);
        assert_eq!(names(&repo.list("p1")), vec!["Alice"]);
        assert_eq!(names(&repo.store.load_comments().await["p1"]), vec!["Alice"]);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_comments_for_session() {
        let mut repo = test_repo().await;
        repo.add("p2", "Carol", "Before the disk filled").await;
        reject_writes(&repo.store).await;

        assert!(repo.add("p1", "Alice", "Nice post").await);
        assert!(repo.add("p1", "Bob", "Agreed").await);
        assert_eq!(names(&repo.list("p1")), vec!["Bob", "Alice"]);

        repo.clear("p2").await;
        assert!(repo.list("p2").is_empty());

        // The store still holds the last successful write.
        let stored = repo.store.load_comments().await;
        assert!(!stored.contains_key("p1"));
        assert_eq!(names(&stored["p2"]), vec!["Carol"]);
    }
}
