//! # API Client
//!
//! HTTP wrapper shared by every accessor: base URL, timeout, bearer token,
//! status classification and typed decoding.

use std::sync::Arc;
use std::time::Instant;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{
    ErrorBody, LeaderboardResponse, Order, OrderCreateRequest, Product, ProductCreateRequest, RegisterResponse,
    StoreApplyRequest, StoreLoginResponse, TodayMinedResponse, TransferResponse, UserProfile, UsersResponse,
    WalletHistoryResponse, WalletInfo, XquareLoginResponse,
};

use crate::config::ClientConfig;
use crate::core::error::ApiError;
use crate::core::service::{ApiService, BalanceSource, StoreService};
use crate::services::session::SessionContext;

/// How a request authenticates.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Auth<'a> {
    /// Session bearer token, if any. A 401/403 expires the session.
    Session,
    /// Explicit token (store owners). A 401/403 is only reported.
    Bearer(&'a str),
    /// No credentials.
    Anonymous,
}

/// HTTP client for the DaemaCoin API.
///
/// Cheap to clone; the connection pool and the session are shared.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    base: Url,
    base_url: String,
    session: Arc<SessionContext>,
}

impl ApiClient {
    /// Create a client for `config.api_base_url` bound to `session`.
    pub fn new(config: &ClientConfig, session: Arc<SessionContext>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = config.api_base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .map_err(|e| ApiError::Network(format!("Invalid API base URL {}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Network(format!("API base URL {} cannot carry a path", base_url)));
        }

        Ok(Self { client, base, base_url, session })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// `GET` and decode a JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        auth: Auth<'_>,
        default_error: &str,
    ) -> Result<T, ApiError> {
        let request = self.client.request(Method::GET, self.url(segments)).query(query);
        let bytes = self.execute(request, auth, default_error).await?;
        decode(&bytes)
    }

    /// `POST` a JSON body and decode a JSON response.
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
        auth: Auth<'_>,
        default_error: &str,
    ) -> Result<T, ApiError> {
        let request = self.client.request(Method::POST, self.url(segments)).json(body);
        let bytes = self.execute(request, auth, default_error).await?;
        decode(&bytes)
    }

    /// `POST` where only the status matters; any response body is ignored.
    pub(crate) async fn post_ack<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: Option<&B>,
        auth: Auth<'_>,
        default_error: &str,
    ) -> Result<(), ApiError> {
        let mut request = self.client.request(Method::POST, self.url(segments));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request, auth, default_error).await.map(|_| ())
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and classify the outcome.
    ///
    /// Returns the raw body of a 2xx response. 401/403 become
    /// [`ApiError::Unauthorized`] (and expire the session for
    /// [`Auth::Session`]); other failures become
    /// [`ApiError::Application`] with the best message the body offers.
    async fn execute(&self, request: RequestBuilder, auth: Auth<'_>, default_error: &str) -> Result<Vec<u8>, ApiError> {
        let token = match auth {
            Auth::Session => self.session.bearer_token(),
            Auth::Bearer(token) => Some(token.to_string()),
            Auth::Anonymous => None,
        };
        let request = match token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let start = Instant::now();
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "Network error");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let path = response.url().path().to_string();
        let bytes = response.bytes().await?;
        let duration_ms = start.elapsed().as_millis();

        if status.is_success() {
            tracing::debug!(%path, status = status.as_u16(), duration_ms, "Request succeeded");
            return Ok(bytes.to_vec());
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(%path, status = status.as_u16(), duration_ms, "Request rejected: not authorized");
            if matches!(auth, Auth::Session) {
                self.session.expire(token.as_deref(), status.as_u16());
            }
            return Err(ApiError::Unauthorized { status: status.as_u16() });
        }

        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|body| body.best_message().map(str::to_string))
            .unwrap_or_else(|| default_error.to_string());

        tracing::warn!(%path, status = status.as_u16(), error = %message, duration_ms, "Request failed");
        Err(ApiError::Application { status: status.as_u16(), message })
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::error!(error = %e, "Response parse error");
        ApiError::from(e)
    })
}

#[async_trait::async_trait]
impl ApiService for ApiClient {
    async fn xquare_login(&self, account_id: String, password: String) -> Result<XquareLoginResponse, ApiError> {
        super::auth::xquare_login(self, account_id, password).await
    }

    async fn register(&self, xquare_id: String, code: String) -> Result<RegisterResponse, ApiError> {
        super::auth::register(self, xquare_id, code).await
    }

    async fn get_user_info(&self) -> Result<UserProfile, ApiError> {
        super::auth::get_user_info(self).await
    }

    async fn get_wallet_info(&self) -> Result<WalletInfo, ApiError> {
        super::wallet::get_wallet_info(self).await
    }

    async fn get_wallet_history(&self, page: u32) -> Result<WalletHistoryResponse, ApiError> {
        super::wallet::get_wallet_history(self, page).await
    }

    async fn get_leaderboard(&self, page: u32, limit: u32) -> Result<LeaderboardResponse, ApiError> {
        super::leaderboard::get_leaderboard(self, page, limit).await
    }

    async fn get_today_mined(&self) -> Result<TodayMinedResponse, ApiError> {
        super::wallet::get_today_mined(self).await
    }

    async fn get_users(&self, page: u32, take: u32) -> Result<UsersResponse, ApiError> {
        super::leaderboard::get_users(self, page, take).await
    }

    async fn transfer_coin(&self, to: String, amount: f64) -> Result<TransferResponse, ApiError> {
        super::wallet::transfer_coin(self, to, amount).await
    }
}

#[async_trait::async_trait]
impl StoreService for ApiClient {
    async fn store_apply(&self, request: StoreApplyRequest) -> Result<(), ApiError> {
        super::store::store_apply(self, &request).await
    }

    async fn store_login(&self, store_id: String, password: String) -> Result<StoreLoginResponse, ApiError> {
        super::store::store_login(self, store_id, password).await
    }

    async fn my_products(&self, store_token: &str) -> Result<Vec<Product>, ApiError> {
        super::store::my_products(self, store_token).await
    }

    async fn my_orders(&self, store_token: &str) -> Result<Vec<Order>, ApiError> {
        super::store::my_orders(self, store_token).await
    }

    async fn add_product(&self, store_token: &str, request: ProductCreateRequest) -> Result<Product, ApiError> {
        super::store::add_product(self, store_token, &request).await
    }

    async fn complete_order(&self, store_token: &str, order_id: u64) -> Result<(), ApiError> {
        super::store::complete_order(self, store_token, order_id).await
    }

    async fn store_products(&self, store_id: &str) -> Result<Vec<Product>, ApiError> {
        super::store::store_products(self, store_id).await
    }

    async fn place_order(&self, store_id: &str, request: OrderCreateRequest) -> Result<Order, ApiError> {
        super::store::place_order(self, store_id, &request).await
    }
}

#[async_trait::async_trait]
impl BalanceSource for ApiClient {
    async fn fetch_balance(&self) -> Result<WalletInfo, ApiError> {
        super::wallet::get_wallet_info(self).await
    }
}
