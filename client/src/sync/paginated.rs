//! Async driver for a [`ListState`].
//!
//! [`PaginatedList`] pairs a [`PageSource`] with shared list state. The lock
//! is held only to start a fetch and to apply its outcome, never across the
//! network call, so readers (`snapshot`) are never blocked by a slow page.
//!
//! Infinite scroll is driven by [`PaginatedList::on_sentinel`]: the view
//! reports where the end-of-list sentinel sits relative to the viewport, and
//! the list loads the next page once the sentinel is within
//! [`Sentinel::root_margin`] of it.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::list::{Applied, FetchTicket, ListState};
use crate::core::service::PageSource;

/// Proximity rule for the end-of-list sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentinel {
    /// Distance below the viewport that still counts as visible (px)
    pub root_margin: f64,
    /// Fraction of the sentinel that must be inside the margin
    pub threshold: f64,
}

impl Default for Sentinel {
    fn default() -> Self {
        Self { root_margin: 50.0, threshold: 0.1 }
    }
}

/// Layout reported by the view, in one coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentinelGeometry {
    pub sentinel_top: f64,
    pub sentinel_height: f64,
    pub viewport_top: f64,
    pub viewport_bottom: f64,
}

impl Sentinel {
    /// Whether the sentinel intersects the viewport grown by the margin on
    /// both edges. Non-finite geometry is never visible.
    pub fn is_visible(&self, geometry: SentinelGeometry) -> bool {
        let SentinelGeometry { sentinel_top, sentinel_height, viewport_top, viewport_bottom } = geometry;
        let finite = [sentinel_top, sentinel_height, viewport_top, viewport_bottom, self.root_margin, self.threshold]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return false;
        }

        let top = viewport_top - self.root_margin;
        let bottom = viewport_bottom + self.root_margin;
        if sentinel_height <= 0.0 {
            return sentinel_top >= top && sentinel_top <= bottom;
        }
        let overlap = (sentinel_top + sentinel_height).min(bottom) - sentinel_top.max(top);
        overlap > 0.0 && overlap / sentinel_height >= self.threshold
    }
}

/// Incrementally loaded, de-duplicated view of a remote collection.
///
/// Clones share the same state and source.
pub struct PaginatedList<S: PageSource> {
    source: Arc<S>,
    state: Arc<RwLock<ListState<S::Item>>>,
    sentinel: Sentinel,
}

impl<S: PageSource> Clone for PaginatedList<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
            sentinel: self.sentinel,
        }
    }
}

impl<S: PageSource> PaginatedList<S> {
    pub fn new(source: S) -> Self {
        Self::with_sentinel(source, Sentinel::default())
    }

    pub fn with_sentinel(source: S, sentinel: Sentinel) -> Self {
        Self {
            source: Arc::new(source),
            state: Arc::new(RwLock::new(ListState::new())),
            sentinel,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> ListState<S::Item> {
        self.state.read().clone()
    }

    /// Drop everything and load page 0.
    ///
    /// Any fetch still in flight is superseded; its response is discarded.
    pub async fn reset(&self, limit: u32) -> Applied {
        let ticket = self.state.write().begin_reset(limit);
        self.run(ticket).await
    }

    /// Load the next page. `None` when exhausted or a fetch is in flight.
    pub async fn load_more(&self) -> Option<Applied> {
        let ticket = self.state.write().begin_load_more()?;
        Some(self.run(ticket).await)
    }

    /// Reload from page 0 with the last limit.
    pub async fn retry(&self) -> Applied {
        let limit = self.state.read().limit();
        self.reset(limit).await
    }

    /// Scroll callback. Loads the next page when the sentinel is near.
    pub async fn on_sentinel(&self, geometry: SentinelGeometry) -> Option<Applied> {
        if !self.sentinel.is_visible(geometry) {
            return None;
        }
        self.load_more().await
    }

    async fn run(&self, ticket: FetchTicket) -> Applied {
        let name = self.source.name();
        debug!(list = name, epoch = ticket.epoch, page = ticket.page, limit = ticket.limit, kind = ?ticket.kind, "Fetching page");

        let start = Instant::now();
        let result = self.source.fetch_page(ticket.page, ticket.limit).await;
        let duration_ms = start.elapsed().as_millis();

        let error = result.as_ref().err().map(|e| e.to_string());
        let source = &self.source;
        let (applied, epoch, len) = {
            let mut state = self.state.write();
            let applied = state.apply(ticket, result, || source.fallback(ticket.limit));
            (applied, state.epoch(), state.len())
        };

        match applied {
            Applied::Page { added } => {
                debug!(list = name, page = ticket.page, added, total = len, duration_ms, "Page applied");
            }
            Applied::Fallback => {
                warn!(
                    list = name,
                    error = error.as_deref().unwrap_or_default(),
                    fallback_items = len,
                    "First page failed, showing placeholder data"
                );
            }
            Applied::Failed => {
                warn!(list = name, page = ticket.page, error = error.as_deref().unwrap_or_default(), "Page fetch failed");
            }
            Applied::Stale => {
                debug!(list = name, ticket_epoch = ticket.epoch, current_epoch = epoch, "Discarding stale page");
            }
        }
        applied
    }
}
