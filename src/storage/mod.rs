mod comments;
mod local_storage;
mod records;
mod schema;
mod types;

pub use comments::CommentRepository;
pub use records::{keys, Store};
pub use schema::Database;
pub use types::{validate_articles, Article, ArticleError, Comment, CommentIndex, DatabaseError};
