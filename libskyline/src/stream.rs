//! Incremental timeline synchronization
//!
//! The engine polls a [`FeedSource`] on a fixed interval and hands only
//! not-yet-shown records to its [`Presenter`]. Two pieces of state drive
//! this, both owned by the engine and scoped to the process lifetime:
//!
//! - the **cursor**: the URI of the newest record displayed by the previous
//!   cycle. Scanning a page newest-first stops at the cursor, so each cycle
//!   costs O(new records) regardless of how long the process has run.
//! - the **dedup ledger**: the set of reshare URIs already displayed, so a
//!   reshare that stays near the top of the timeline across polls is shown
//!   once. The ledger never evicts; for session-length runs the growth is
//!   bounded by how many distinct reshares scroll past.
//!
//! If more than one page of posts arrives between polls, the older ones are
//! dropped: the page size is a hard ceiling on catch-up volume per cycle.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};
use crate::feed::{FeedPage, PostRecord};

/// Source of timeline pages, newest-first.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_page(&self) -> Result<FeedPage>;
}

/// Renders one record to the user. Presenters only see the record; engine
/// state stays out of reach.
pub trait Presenter: Send {
    fn display(&mut self, post: &PostRecord);
}

pub struct SyncEngine<S, P> {
    source: S,
    presenter: P,
    cursor: Option<String>,
    displayed_reshares: HashSet<String>,
}

impl<S: FeedSource, P: Presenter> SyncEngine<S, P> {
    pub fn new(source: S, presenter: P) -> Self {
        Self {
            source,
            presenter,
            cursor: None,
            displayed_reshares: HashSet::new(),
        }
    }

    /// URI of the newest record displayed so far, if any.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Number of distinct reshares shown so far.
    pub fn reshares_seen(&self) -> usize {
        self.displayed_reshares.len()
    }

    /// Run a single poll cycle: fetch one page, display what is new,
    /// advance the cursor. A fetch failure leaves the engine untouched.
    pub async fn run_once(&mut self) -> Result<()> {
        let page = self.source.fetch_page().await?;
        let shown = self.scan_page(&page);
        debug!(
            new_posts = shown,
            ledger = self.reshares_seen(),
            "cycle complete"
        );
        Ok(())
    }

    /// Poll on `interval` until `shutdown` is set.
    ///
    /// The interval must be positive; a zero interval is rejected before
    /// the loop starts. Fetch failures are logged and the loop waits out
    /// the normal interval before retrying, so transient upstream trouble
    /// degrades to "try again next poll". The wait is sliced so a shutdown
    /// request is honored mid-interval.
    pub async fn run(&mut self, interval: Duration, shutdown: Arc<AtomicBool>) -> Result<()> {
        if interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "interval".to_string(),
                reason: "poll interval must be positive".to_string(),
            }
            .into());
        }

        loop {
            if shutdown.load(Ordering::Relaxed) {
                debug!("shutdown requested, stopping stream loop");
                break;
            }

            if let Err(e) = self.run_once().await {
                warn!("fetch failed, retrying next cycle: {}", e);
            }

            // Sleep until the next poll, checking for shutdown along the way
            let mut remaining = interval;
            while !remaining.is_zero() {
                if shutdown.load(Ordering::Relaxed) {
                    return Ok(());
                }
                let step = remaining.min(Duration::from_secs(1));
                sleep(step).await;
                remaining -= step;
            }
        }

        Ok(())
    }

    /// Scan one page newest-first and display the records that are new.
    ///
    /// The boundary check runs before the reshare check, so a record equal
    /// to the cursor always stops the scan without consulting the ledger.
    /// The cursor then adopts the page's first element whenever the page is
    /// non-empty, whether or not that element itself was displayed.
    fn scan_page(&mut self, page: &[PostRecord]) -> usize {
        let mut shown = 0;

        for post in page {
            // Boundary: everything from here down was already considered
            if self.cursor.as_deref() == Some(post.uri.as_str()) {
                break;
            }

            if post.reshare {
                if self.displayed_reshares.contains(&post.uri) {
                    continue;
                }
                self.displayed_reshares.insert(post.uri.clone());
            }

            self.presenter.display(post);
            shown += 1;
        }

        if let Some(first) = page.first() {
            self.cursor = Some(first.uri.clone());
        }

        shown
    }
}
