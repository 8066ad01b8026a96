//! Health check handler for the HTTP tracker.
#[allow(clippy::unused_async)]
pub async fn handler() -> &'static str {
    "OK"
}
