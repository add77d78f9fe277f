use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Wait until `predicate` returns true or `timeout` elapses.
///
/// The predicate is checked immediately, then once per `interval`. Returns
/// whether the predicate was satisfied; running out of time is not an error.
pub async fn poll_until<F, Fut>(interval: Duration, timeout: Duration, mut predicate: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if predicate().await {
            return true;
        }

        let now = Instant::now();
        if now >= deadline {
            return false;
        }

        sleep(interval.min(deadline - now)).await;
    }
}

/// File name for the deal at 1-indexed processing position `position`
pub fn deal_file_name(position: usize) -> String {
    format!("Deal-{:03}.png", position)
}

/// File name for a selection preview at 1-indexed scan position `position`
pub fn preview_file_name(position: usize) -> String {
    format!("preview-{:03}.png", position)
}

/// Convert a string to a sanitized filename
pub fn sanitize_filename(name: &str) -> String {
    let mut name = name.replace(
        ['/', '\\', ':', '?', '&', '=', '#', '%', '*', '"', '<', '>', '|'],
        "_",
    );
    name = name.trim().to_string();

    if name.is_empty() {
        return "pdf_deals.txt".to_string();
    }

    // Limit filename length
    if name.chars().count() > 100 {
        name.chars().take(100).collect()
    } else {
        name
    }
}
