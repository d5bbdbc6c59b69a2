//! Paginated list state machine.
//!
//! [`ListState`] holds no IO. A fetch is a two-step transaction:
//!
//! 1. `begin_reset` / `begin_load_more` mark the fetch in flight and hand out
//!    a [`FetchTicket`]
//! 2. `apply` folds the outcome back in, if the ticket is still current
//!
//! Every reset starts a new epoch. A ticket from an older epoch is discarded
//! without touching the state, so a reset supersedes any fetch still in
//! flight. The async driver lives in [`super::paginated`].

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use shared::{
    DirectoryUser, LeaderboardEntry, LeaderboardResponse, UsersResponse, WalletHistoryItem, WalletHistoryResponse,
};

use crate::core::error::ApiError;

/// Natural identity of a list item, used for de-duplication.
pub trait Keyed {
    type Key: Eq + Hash + Clone + Debug + Send + Sync;

    fn key(&self) -> Self::Key;
}

impl Keyed for LeaderboardEntry {
    type Key = String;

    fn key(&self) -> String {
        self.github_id.clone()
    }
}

impl Keyed for DirectoryUser {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Keyed for WalletHistoryItem {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// One page as returned by a remote accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// 0-based index the backend confirmed for this page
    pub page_index: u32,
    pub has_next: bool,
}

impl From<LeaderboardResponse> for ListPage<LeaderboardEntry> {
    fn from(response: LeaderboardResponse) -> Self {
        Self {
            items: response.items,
            page_index: response.current_page,
            has_next: response.has_next,
        }
    }
}

impl From<UsersResponse> for ListPage<DirectoryUser> {
    fn from(response: UsersResponse) -> Self {
        Self {
            items: response.users,
            page_index: response.pagination.page,
            has_next: response.pagination.has_next,
        }
    }
}

impl From<WalletHistoryResponse> for ListPage<WalletHistoryItem> {
    fn from(response: WalletHistoryResponse) -> Self {
        Self {
            items: response.history,
            page_index: response.current_page,
            has_next: response.has_more,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Reset,
    LoadMore,
}

/// Identity of one outbound fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub epoch: u64,
    pub page: u32,
    pub limit: u32,
    pub kind: FetchKind,
}

/// What `apply` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Page merged into the list.
    Page { added: usize },
    /// Reset failed; the non-empty placeholder dataset is shown.
    Fallback,
    /// Fetch failed; the error is surfaced and the list left as it was.
    Failed,
    /// Ticket belongs to an older epoch; nothing changed.
    Stale,
}

/// Accumulated view of a remote paginated collection.
#[derive(Debug, Clone)]
pub struct ListState<T: Keyed> {
    accumulated: Vec<T>,
    seen: HashSet<T::Key>,
    current_page: u32,
    has_more: bool,
    loading: bool,
    loading_more: bool,
    error: Option<String>,
    fallback: bool,
    epoch: u64,
    limit: u32,
}

impl<T: Keyed> Default for ListState<T> {
    fn default() -> Self {
        Self {
            accumulated: Vec::new(),
            seen: HashSet::new(),
            current_page: 0,
            has_more: false,
            loading: false,
            loading_more: false,
            error: None,
            fallback: false,
            epoch: 0,
            limit: 0,
        }
    }
}

impl<T: Keyed> ListState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.accumulated
    }

    pub fn len(&self) -> usize {
        self.accumulated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    /// Whether any fetch is outstanding.
    pub fn in_flight(&self) -> bool {
        self.loading || self.loading_more
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the items are the placeholder dataset.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Start a new epoch and request page 0.
    ///
    /// Clears the list, including a `loading_more` left over from the
    /// previous epoch, so the new epoch never inherits a stuck flag.
    pub fn begin_reset(&mut self, limit: u32) -> FetchTicket {
        self.epoch += 1;
        self.limit = limit;
        self.accumulated.clear();
        self.seen.clear();
        self.current_page = 0;
        self.has_more = false;
        self.loading = true;
        self.loading_more = false;
        self.error = None;
        self.fallback = false;

        FetchTicket { epoch: self.epoch, page: 0, limit, kind: FetchKind::Reset }
    }

    /// Request the next page, unless the list is exhausted or busy.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        if !self.has_more || self.in_flight() {
            return None;
        }
        self.loading_more = true;
        Some(FetchTicket {
            epoch: self.epoch,
            page: self.current_page + 1,
            limit: self.limit,
            kind: FetchKind::LoadMore,
        })
    }

    /// Fold a fetch outcome into the state.
    ///
    /// `fallback` is only called when a reset fails with a recoverable error.
    /// An empty fallback leaves the reset [`Applied::Failed`].
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        result: Result<ListPage<T>, ApiError>,
        fallback: impl FnOnce() -> Vec<T>,
    ) -> Applied {
        if ticket.epoch != self.epoch {
            return Applied::Stale;
        }

        match (ticket.kind, result) {
            (FetchKind::Reset, Ok(page)) => {
                self.loading = false;
                let added = self.merge(page);
                Applied::Page { added }
            }
            (FetchKind::LoadMore, Ok(page)) => {
                self.loading_more = false;
                let added = self.merge(page);
                Applied::Page { added }
            }
            (FetchKind::Reset, Err(e)) => {
                self.loading = false;
                self.has_more = false;
                self.error = Some(e.to_string());
                if e.is_auth() {
                    return Applied::Failed;
                }
                for item in fallback() {
                    self.push_unique(item);
                }
                if self.accumulated.is_empty() {
                    return Applied::Failed;
                }
                self.fallback = true;
                Applied::Fallback
            }
            (FetchKind::LoadMore, Err(e)) => {
                // Items and has_more stay, so the next trigger retries.
                self.loading_more = false;
                self.error = Some(e.to_string());
                Applied::Failed
            }
        }
    }

    fn merge(&mut self, page: ListPage<T>) -> usize {
        self.current_page = page.page_index;
        self.has_more = page.has_next;
        self.error = None;
        let mut added = 0;
        for item in page.items {
            if self.push_unique(item) {
                added += 1;
            }
        }
        added
    }

    fn push_unique(&mut self, item: T) -> bool {
        if self.seen.insert(item.key()) {
            self.accumulated.push(item);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Item(pub &'static str);

    impl Keyed for Item {
        type Key = &'static str;

        fn key(&self) -> &'static str {
            self.0
        }
    }

    pub(crate) fn page(keys: &[&'static str], page_index: u32, has_next: bool) -> ListPage<Item> {
        ListPage { items: keys.iter().map(|k| Item(*k)).collect(), page_index, has_next }
    }

    fn keys(state: &ListState<Item>) -> Vec<&'static str> {
        state.items().iter().map(|i| i.0).collect()
    }

    fn no_fallback() -> Vec<Item> {
        Vec::new()
    }

    const FIRST: [&str; 10] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];
    const SECOND: [&str; 10] = ["K", "L", "M", "N", "O", "P", "Q", "R", "S", "T"];

    #[test]
    fn two_pages_then_exhausted() {
        let mut state = ListState::new();
        let ticket = state.begin_reset(10);
        assert_eq!(ticket.page, 0);
        assert!(state.is_loading());

        state.apply(ticket, Ok(page(&FIRST, 0, true)), no_fallback);
        assert_eq!(state.len(), 10);
        assert!(state.has_more());
        assert!(!state.is_loading());

        let ticket = state.begin_load_more().unwrap();
        assert_eq!(ticket.page, 1);
        state.apply(ticket, Ok(page(&SECOND, 1, false)), no_fallback);
        assert_eq!(state.len(), 20);
        assert_eq!(state.current_page(), 1);
        assert!(!state.has_more());

        assert_eq!(state.begin_load_more(), None);
        assert_eq!(state.len(), 20);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn load_more_is_noop_when_exhausted() {
        let mut state = ListState::new();
        let ticket = state.begin_reset(3);
        state.apply(ticket, Ok(page(&["A", "B"], 0, false)), no_fallback);

        for _ in 0..5 {
            assert_eq!(state.begin_load_more(), None);
        }
        assert_eq!(keys(&state), vec!["A", "B"]);
        assert_eq!(state.current_page(), 0);
        assert!(!state.is_loading_more());
    }

    #[test]
    fn load_more_before_first_reset_is_noop() {
        let mut state: ListState<Item> = ListState::new();
        assert_eq!(state.begin_load_more(), None);
    }

    #[test]
    fn only_one_fetch_in_flight() {
        let mut state = ListState::new();
        let reset = state.begin_reset(2);
        assert_eq!(state.begin_load_more(), None);

        state.apply(reset, Ok(page(&["A", "B"], 0, true)), no_fallback);
        let first = state.begin_load_more();
        assert!(first.is_some());
        assert_eq!(state.begin_load_more(), None);
    }

    #[test]
    fn duplicates_across_pages_are_dropped() {
        let mut state = ListState::new();
        let ticket = state.begin_reset(3);
        state.apply(ticket, Ok(page(&["A", "B", "C"], 0, true)), no_fallback);

        let ticket = state.begin_load_more().unwrap();
        let applied = state.apply(ticket, Ok(page(&["C", "D", "D", "E"], 1, true)), no_fallback);

        assert_eq!(applied, Applied::Page { added: 2 });
        assert_eq!(keys(&state), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn empty_page_does_not_imply_exhausted() {
        let mut state = ListState::new();
        let ticket = state.begin_reset(3);
        state.apply(ticket, Ok(page(&["A"], 0, true)), no_fallback);

        let ticket = state.begin_load_more().unwrap();
        state.apply(ticket, Ok(page(&[], 1, true)), no_fallback);
        assert!(state.has_more());
        assert!(state.begin_load_more().is_some());
    }

    #[test]
    fn reset_supersedes_in_flight_load_more() {
        let mut state = ListState::new();
        let ticket = state.begin_reset(2);
        state.apply(ticket, Ok(page(&["A", "B"], 0, true)), no_fallback);

        let stale = state.begin_load_more().unwrap();
        let fresh = state.begin_reset(2);
        assert!(!state.is_loading_more());

        state.apply(fresh, Ok(page(&["X", "Y"], 0, true)), no_fallback);
        let applied = state.apply(stale, Ok(page(&["C", "D"], 1, false)), no_fallback);

        assert_eq!(applied, Applied::Stale);
        assert_eq!(keys(&state), vec!["X", "Y"]);
        assert_eq!(state.current_page(), 0);
        assert!(state.has_more());
    }

    #[test]
    fn stale_reset_response_is_ignored() {
        let mut state = ListState::new();
        let old = state.begin_reset(2);
        let new = state.begin_reset(2);

        state.apply(new, Ok(page(&["N"], 0, false)), no_fallback);
        assert_eq!(state.apply(old, Ok(page(&["O"], 0, true)), no_fallback), Applied::Stale);
        assert_eq!(keys(&state), vec!["N"]);
        assert!(!state.has_more());
    }

    #[test]
    fn reset_failure_uses_fallback() {
        let mut state = ListState::new();
        let ticket = state.begin_reset(10);
        let applied = state.apply(ticket, Err(ApiError::Network("connection refused".into())), || {
            vec![Item("demo-1"), Item("demo-2")]
        });

        assert_eq!(applied, Applied::Fallback);
        assert_eq!(keys(&state), vec!["demo-1", "demo-2"]);
        assert!(!state.has_more());
        assert!(state.is_fallback());
        assert!(!state.is_loading());
        assert_eq!(state.error(), Some("Network error: connection refused"));
        assert_eq!(state.begin_load_more(), None);
    }

    #[test]
    fn reset_failure_without_placeholder_is_not_fallback() {
        let mut state = ListState::new();
        let ticket = state.begin_reset(10);
        let applied = state.apply(ticket, Err(ApiError::Network("offline".into())), no_fallback);

        assert_eq!(applied, Applied::Failed);
        assert!(state.is_empty());
        assert!(!state.is_fallback());
        assert_eq!(state.error(), Some("Network error: offline"));
        assert_eq!(state.begin_load_more(), None);
    }

    #[test]
    fn reset_auth_failure_skips_fallback() {
        let mut state = ListState::new();
        let ticket = state.begin_reset(10);
        let applied = state.apply(ticket, Err(ApiError::Unauthorized { status: 401 }), || vec![Item("demo")]);

        assert_eq!(applied, Applied::Failed);
        assert!(state.is_empty());
        assert!(!state.is_fallback());
    }

    #[test]
    fn load_more_failure_is_retryable() {
        let mut state = ListState::new();
        let ticket = state.begin_reset(2);
        state.apply(ticket, Ok(page(&["A", "B"], 0, true)), no_fallback);

        let ticket = state.begin_load_more().unwrap();
        let error = ApiError::Application { status: 500, message: "boom".into() };
        assert_eq!(state.apply(ticket, Err(error), no_fallback), Applied::Failed);
        assert_eq!(keys(&state), vec!["A", "B"]);
        assert!(state.has_more());
        assert!(!state.is_loading_more());
        assert_eq!(state.error(), Some("boom"));

        let retry = state.begin_load_more().unwrap();
        assert_eq!(retry.page, 1);
        state.apply(retry, Ok(page(&["C"], 1, false)), no_fallback);
        assert_eq!(keys(&state), vec!["A", "B", "C"]);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn response_conversions() {
        let leaderboard = LeaderboardResponse {
            items: vec![LeaderboardEntry {
                rank: 1,
                profile_image_url: String::new(),
                total_coins: 10.0,
                github_id: "octo".into(),
            }],
            current_page: 2,
            page_size: 10,
            total_users: 21,
            total_pages: 3,
            has_next: false,
            has_previous: true,
        };
        let page = ListPage::from(leaderboard);
        assert_eq!(page.page_index, 2);
        assert!(!page.has_next);
        assert_eq!(page.items[0].key(), "octo");

        let history: WalletHistoryResponse = serde_json::from_value(serde_json::json!({
            "history": [],
            "hasMore": true,
            "totalCount": 0,
            "currentPage": 4
        }))
        .unwrap();
        let page = ListPage::from(history);
        assert_eq!((page.page_index, page.has_next), (4, true));
    }
}
