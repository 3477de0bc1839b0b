//! Mock feed source and recording presenter for tests
//!
//! Available in all builds (not just `cfg(test)`) so integration tests can
//! drive the stream engine without credentials or network access.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{ApiError, Result};
use crate::feed::{FeedPage, PostRecord};
use crate::stream::{FeedSource, Presenter};

/// Feed source that replays a scripted sequence of fetch outcomes.
///
/// Each `fetch_page` call consumes the next entry: `Ok(page)` is returned
/// as-is, `Err(msg)` becomes a network error. An exhausted script yields
/// empty pages.
pub struct MockFeedSource {
    script: Mutex<VecDeque<std::result::Result<FeedPage, String>>>,
    fetch_count: AtomicUsize,
}

impl MockFeedSource {
    pub fn new(script: Vec<std::result::Result<FeedPage, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Number of fetches performed so far.
    pub fn fetches(&self) -> usize {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FeedSource for MockFeedSource {
    async fn fetch_page(&self) -> Result<FeedPage> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(msg)) => Err(ApiError::Network(msg).into()),
            None => Ok(Vec::new()),
        }
    }
}

/// Presenter that records the URIs it was asked to display.
pub struct RecordingPresenter {
    displayed: Arc<Mutex<Vec<String>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self {
            displayed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the display log, usable after the engine takes
    /// ownership of the presenter.
    pub fn displayed(&self) -> Arc<Mutex<Vec<String>>> {
        self.displayed.clone()
    }
}

impl Default for RecordingPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for RecordingPresenter {
    fn display(&mut self, post: &PostRecord) {
        self.displayed.lock().unwrap().push(post.uri.clone());
    }
}

/// Build an original (non-reshare) record for tests.
pub fn post(uri: &str) -> PostRecord {
    PostRecord {
        uri: uri.to_string(),
        reshare: false,
        author: "Test Author".to_string(),
        handle: "author.test".to_string(),
        text: format!("post {}", uri),
    }
}

/// Build a reshare record for tests.
pub fn reshare(uri: &str) -> PostRecord {
    PostRecord {
        reshare: true,
        ..post(uri)
    }
}
