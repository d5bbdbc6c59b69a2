//! # Session Context
//!
//! Explicit, injectable replacement for a process-global auth store.
//!
//! One [`SessionContext`] is created at application start and shared via
//! `Arc`. It is mutated only by the login/logout transitions ([`establish`],
//! [`logout`], [`expire`]) and the cached read models (wallet, profile).
//! Every outbound request reads the bearer token through [`bearer_token`],
//! which clones it under a short read lock, so a token is never observed
//! half-written.
//!
//! Observers can follow the lifecycle two ways:
//!
//! - [`subscribe`]: a `watch` channel of the authenticated flag (drives the
//!   balance poller)
//! - [`events`]: a channel of [`SessionEvent`]s (drives navigation, e.g.
//!   returning to the login view on expiry)
//!
//! [`establish`]: SessionContext::establish
//! [`logout`]: SessionContext::logout
//! [`expire`]: SessionContext::expire
//! [`bearer_token`]: SessionContext::bearer_token
//! [`subscribe`]: SessionContext::subscribe
//! [`events`]: SessionContext::events

use parking_lot::RwLock;
use shared::{User, UserProfile, WalletInfo};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Capacity of the session event channel. Events beyond it are dropped.
const EVENT_CAPACITY: usize = 32;

/// Lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session was established.
    SignedIn { user_id: String },
    /// The user logged out.
    LoggedOut,
    /// The backend rejected the credentials (HTTP 401/403).
    Expired { status: u16 },
}

/// Access and refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Default)]
struct SessionState {
    /// Bumped by every login, logout and expiry.
    generation: u64,
    tokens: Option<Tokens>,
    user: Option<User>,
    pending_xquare_id: Option<String>,
    wallet: Option<WalletInfo>,
    profile: Option<UserProfile>,
}

/// Shared session state.
pub struct SessionContext {
    state: RwLock<SessionState>,
    authenticated: watch::Sender<bool>,
    events_tx: async_channel::Sender<SessionEvent>,
    events_rx: async_channel::Receiver<SessionEvent>,
}

impl SessionContext {
    /// Create an unauthenticated session.
    pub fn new() -> Self {
        let (authenticated, _) = watch::channel(false);
        let (events_tx, events_rx) = async_channel::bounded(EVENT_CAPACITY);
        Self {
            state: RwLock::new(SessionState::default()),
            authenticated,
            events_tx,
            events_rx,
        }
    }

    /// Identifies the current session. Read it before a fetch and hand it
    /// back to the cache setters with the result.
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.state.read().tokens.is_some()
    }

    /// Current access token, if signed in.
    pub fn bearer_token(&self) -> Option<String> {
        self.state.read().tokens.as_ref().map(|t| t.access_token.clone())
    }

    /// Follow the authenticated flag.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    /// Receiver of lifecycle events. All clones share one queue.
    pub fn events(&self) -> async_channel::Receiver<SessionEvent> {
        self.events_rx.clone()
    }

    /// Login transition.
    pub fn establish(&self, tokens: Tokens, user: User) {
        let user_id = user.id.clone();
        {
            let mut state = self.state.write();
            state.clear();
            state.tokens = Some(tokens);
            state.user = Some(user);
        }
        self.authenticated.send_replace(true);
        info!(user_id = %user_id, "Session established");
        self.emit(SessionEvent::SignedIn { user_id });
    }

    /// Logout transition. Clears every cached value.
    pub fn logout(&self) {
        let was_authenticated = {
            let mut state = self.state.write();
            let was = state.tokens.is_some();
            state.clear();
            was
        };
        self.authenticated.send_replace(false);
        if was_authenticated {
            info!("Session logged out");
            self.emit(SessionEvent::LoggedOut);
        }
    }

    /// Credentials rejected by the backend.
    ///
    /// `token_used` is the bearer token the failing request carried. The
    /// session only expires if that token is still the current one, so a late
    /// 401 from a previous session cannot end a newer one. Returns whether
    /// the session was expired by this call.
    pub fn expire(&self, token_used: Option<&str>, status: u16) -> bool {
        {
            let mut state = self.state.write();
            let current = state.tokens.as_ref().map(|t| t.access_token.as_str());
            match (current, token_used) {
                (Some(current), Some(used)) if current == used => {}
                (None, _) => return false,
                _ => {
                    debug!(status, "Ignoring auth failure from a superseded token");
                    return false;
                }
            }
            state.clear();
        }
        self.authenticated.send_replace(false);
        warn!(status, "Session expired by backend");
        self.emit(SessionEvent::Expired { status });
        true
    }

    /// Remember the XQUARE id between XQUARE login and GitHub registration.
    pub fn begin_registration(&self, xquare_id: String) {
        self.state.write().pending_xquare_id = Some(xquare_id);
    }

    pub fn pending_xquare_id(&self) -> Option<String> {
        self.state.read().pending_xquare_id.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    /// Apply a partial update to the user of session `generation`.
    /// Returns whether that session is still current.
    pub fn update_user(&self, generation: u64, update: impl FnOnce(&mut User)) -> bool {
        let mut state = self.state.write();
        if state.generation != generation {
            return false;
        }
        match state.user.as_mut() {
            Some(user) => {
                update(user);
                true
            }
            None => false,
        }
    }

    pub fn wallet(&self) -> Option<WalletInfo> {
        self.state.read().wallet.clone()
    }

    /// Cache a balance fetched under session `generation`.
    ///
    /// Dropped unless that session is still the signed-in one, so a fetch
    /// that completes after logout, or after someone else signed in, leaves
    /// nothing behind. Returns whether it was stored.
    pub fn set_wallet(&self, generation: u64, wallet: WalletInfo) -> bool {
        let mut state = self.state.write();
        if !state.is_current(generation) {
            return false;
        }
        state.wallet = Some(wallet);
        true
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.state.read().profile.clone()
    }

    /// Same rule as [`SessionContext::set_wallet`].
    pub fn set_profile(&self, generation: u64, profile: UserProfile) -> bool {
        let mut state = self.state.write();
        if !state.is_current(generation) {
            return false;
        }
        state.profile = Some(profile);
        true
    }

    fn emit(&self, event: SessionEvent) {
        if let Err(e) = self.events_tx.try_send(event) {
            debug!(error = %e, "Session event dropped");
        }
    }
}

impl SessionState {
    /// Drop everything and start a new generation.
    fn clear(&mut self) {
        *self = SessionState { generation: self.generation.wrapping_add(1), ..SessionState::default() };
    }

    fn is_current(&self, generation: u64) -> bool {
        self.tokens.is_some() && self.generation == generation
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
