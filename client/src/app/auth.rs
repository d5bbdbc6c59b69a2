//! # Authentication Flows
//!
//! Sign-in is two steps:
//!
//! 1. XQUARE account login ([`login_with_xquare`]) yields an XQUARE id, kept
//!    in the session as pending
//! 2. GitHub OAuth returns a `code` that completes registration
//!    ([`register_with_github`]) and establishes the session
//!
//! [`refresh_profile`] loads the dashboard read models, [`logout`] ends it.

use chrono::{SecondsFormat, Utc};
use shared::{RegisterResponse, User};
use tracing::{info, warn};

use crate::core::error::{AppError, Result};
use crate::core::service::ApiService;
use crate::services::session::{SessionContext, Tokens};

/// Starting balance assumed when registration does not report one.
pub const SIGNUP_BONUS: f64 = 1250.0;

pub const DEFAULT_AVATAR: &str = "/default-avatar.png";

/// XQUARE login form.
#[derive(Debug, Clone, Default)]
pub struct XquareLoginForm {
    pub account_id: String,
    pub password: String,
}

/// Step 1. Returns the XQUARE id now pending registration.
pub async fn login_with_xquare(
    api: &dyn ApiService,
    session: &SessionContext,
    form: XquareLoginForm,
) -> Result<String> {
    let account_id = form.account_id.trim().to_string();
    if account_id.is_empty() || form.password.is_empty() {
        return Err(AppError::Validation("Account id and password required".to_string()));
    }

    let response = api.xquare_login(account_id, form.password).await?;
    session.begin_registration(response.xquare_id.clone());
    Ok(response.xquare_id)
}

/// Step 2. Completes registration with the GitHub OAuth `code`.
pub async fn register_with_github(api: &dyn ApiService, session: &SessionContext, code: &str) -> Result<User> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::Validation("GitHub authorization code required".to_string()));
    }
    let xquare_id = session
        .pending_xquare_id()
        .ok_or_else(|| AppError::State("No XQUARE login in progress, sign in again".to_string()))?;

    let response = api.register(xquare_id.clone(), code.to_string()).await.map_err(|e| {
        warn!(error = %e, "Registration failed");
        e
    })?;

    let tokens = Tokens {
        access_token: response.access_token.clone(),
        refresh_token: response.refresh_token.clone(),
    };
    let user = user_from_registration(xquare_id, response);
    info!(user_id = %user.id, github = %user.github_username, "Registration complete");
    session.establish(tokens, user.clone());
    Ok(user)
}

/// Build the signed-in user, filling what the backend left out.
pub fn user_from_registration(xquare_id: String, response: RegisterResponse) -> User {
    let now = Utc::now();
    let github_username = response.github_username.unwrap_or_default();

    User {
        id: response
            .user_id
            .unwrap_or_else(|| format!("user_{}", now.timestamp_millis())),
        xquare_id,
        github_id: response.github_id.unwrap_or_else(|| github_username.clone()),
        avatar: response.avatar.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
        name: response.name.unwrap_or_else(|| github_username.clone()),
        email: response
            .email
            .unwrap_or_else(|| format!("{}@github.local", github_username)),
        total_coins: response.total_coins.unwrap_or(SIGNUP_BONUS),
        created_at: response
            .created_at
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        last_mining_at: response.last_mining_at,
        github_username,
    }
}

/// Reload profile and balance into the session.
pub async fn refresh_profile(api: &dyn ApiService, session: &SessionContext) -> Result<()> {
    if !session.is_authenticated() {
        return Err(AppError::State("Not signed in".to_string()));
    }

    let generation = session.generation();
    let (profile, wallet) = tokio::join!(api.get_user_info(), api.get_wallet_info());
    let profile = profile?;
    let wallet = wallet?;

    let balance = wallet.balance;
    let current = session.set_profile(generation, profile)
        && session.set_wallet(generation, wallet)
        && session.update_user(generation, |user| user.total_coins = balance);
    if !current {
        return Err(AppError::State("Session changed while refreshing".to_string()));
    }
    Ok(())
}

pub fn logout(session: &SessionContext) {
    session.logout();
}
