//! Comment publication seam.

use async_trait::async_trait;
use tracing::info;

/// Receives a finished comment for publication.
#[async_trait]
pub trait CommentSink: Send + Sync {
    async fn publish(&self, post_title: &str, comment: &str);
}

/// Dry-run sink: logs the rendered comment instead of publishing it.
/// Actual publication to the platform is a collaborator outside this
/// binary.
pub struct LogSink;

#[async_trait]
impl CommentSink for LogSink {
    async fn publish(&self, post_title: &str, comment: &str) {
        info!("comment for '{}':\n{}", post_title, comment);
    }
}
