//! # Service Traits
//!
//! Seams for dependency injection. Production code uses
//! [`crate::services::api::ApiClient`]; tests substitute mocks.

use async_trait::async_trait;
use shared::{
    LeaderboardResponse, Order, OrderCreateRequest, Product, ProductCreateRequest, RegisterResponse,
    StoreApplyRequest, StoreLoginResponse, TodayMinedResponse, TransferResponse, UserProfile, UsersResponse,
    WalletHistoryResponse, WalletInfo, XquareLoginResponse,
};

use super::error::ApiError;
use crate::sync::list::{Keyed, ListPage};

/// Remote accessors of the signed-in user's API surface.
///
/// Every call authenticates with the session bearer token; a 401/403 on any
/// of them expires the session.
#[async_trait]
pub trait ApiService: Send + Sync {
    /// XQUARE account login (first sign-in step)
    async fn xquare_login(&self, account_id: String, password: String) -> Result<XquareLoginResponse, ApiError>;

    /// Complete registration with a GitHub OAuth code
    async fn register(&self, xquare_id: String, code: String) -> Result<RegisterResponse, ApiError>;

    /// Profile of the signed-in user
    async fn get_user_info(&self) -> Result<UserProfile, ApiError>;

    /// Balance of the signed-in user
    async fn get_wallet_info(&self) -> Result<WalletInfo, ApiError>;

    /// One page of coin history
    async fn get_wallet_history(&self, page: u32) -> Result<WalletHistoryResponse, ApiError>;

    /// One page of the leaderboard
    async fn get_leaderboard(&self, page: u32, limit: u32) -> Result<LeaderboardResponse, ApiError>;

    /// Coins mined today across the service
    async fn get_today_mined(&self) -> Result<TodayMinedResponse, ApiError>;

    /// One page of the user directory
    async fn get_users(&self, page: u32, take: u32) -> Result<UsersResponse, ApiError>;

    /// Send coins to another user
    async fn transfer_coin(&self, to: String, amount: f64) -> Result<TransferResponse, ApiError>;
}

/// Festival store endpoints.
///
/// Owner calls carry an explicit store token; an auth failure on them does
/// not touch the user session.
#[async_trait]
pub trait StoreService: Send + Sync {
    async fn store_apply(&self, request: StoreApplyRequest) -> Result<(), ApiError>;

    async fn store_login(&self, store_id: String, password: String) -> Result<StoreLoginResponse, ApiError>;

    async fn my_products(&self, store_token: &str) -> Result<Vec<Product>, ApiError>;

    async fn my_orders(&self, store_token: &str) -> Result<Vec<Order>, ApiError>;

    async fn add_product(&self, store_token: &str, request: ProductCreateRequest) -> Result<Product, ApiError>;

    async fn complete_order(&self, store_token: &str, order_id: u64) -> Result<(), ApiError>;

    async fn store_products(&self, store_id: &str) -> Result<Vec<Product>, ApiError>;

    async fn place_order(&self, store_id: &str, request: OrderCreateRequest) -> Result<Order, ApiError>;
}

/// Input of the balance poller.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch_balance(&self) -> Result<WalletInfo, ApiError>;
}

/// Input of a paginated list.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Keyed + Clone + Send + Sync + 'static;

    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    async fn fetch_page(&self, page: u32, limit: u32) -> Result<ListPage<Self::Item>, ApiError>;

    /// Placeholder dataset shown when the first page cannot be loaded.
    fn fallback(&self, _limit: u32) -> Vec<Self::Item> {
        Vec::new()
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted implementations of the service traits.
    //!
    //! Each endpoint pops its next queued result; an empty queue answers with
    //! a network error. Every call is recorded in `calls`.

    use parking_lot::Mutex;

    use super::*;

    type Queue<T> = Mutex<Vec<Result<T, ApiError>>>;

    fn next<T>(queue: &Queue<T>) -> Result<T, ApiError> {
        let mut queue = queue.lock();
        if queue.is_empty() {
            return Err(ApiError::Network("nothing scripted".into()));
        }
        queue.remove(0)
    }

    #[derive(Default)]
    pub(crate) struct MockApi {
        pub login: Queue<XquareLoginResponse>,
        pub register: Queue<RegisterResponse>,
        pub user_info: Queue<UserProfile>,
        pub wallet: Queue<WalletInfo>,
        pub history: Queue<WalletHistoryResponse>,
        pub leaderboard: Queue<LeaderboardResponse>,
        pub today_mined: Queue<TodayMinedResponse>,
        pub users: Queue<UsersResponse>,
        pub transfer: Queue<TransferResponse>,
        pub calls: Mutex<Vec<String>>,
    }

    impl MockApi {
        fn record(&self, call: String) {
            self.calls.lock().push(call);
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl ApiService for MockApi {
        async fn xquare_login(&self, account_id: String, _password: String) -> Result<XquareLoginResponse, ApiError> {
            self.record(format!("xquare_login:{}", account_id));
            next(&self.login)
        }

        async fn register(&self, xquare_id: String, code: String) -> Result<RegisterResponse, ApiError> {
            self.record(format!("register:{}:{}", xquare_id, code));
            next(&self.register)
        }

        async fn get_user_info(&self) -> Result<UserProfile, ApiError> {
            self.record("user_info".into());
            next(&self.user_info)
        }

        async fn get_wallet_info(&self) -> Result<WalletInfo, ApiError> {
            self.record("wallet".into());
            next(&self.wallet)
        }

        async fn get_wallet_history(&self, page: u32) -> Result<WalletHistoryResponse, ApiError> {
            self.record(format!("history:{}", page));
            next(&self.history)
        }

        async fn get_leaderboard(&self, page: u32, limit: u32) -> Result<LeaderboardResponse, ApiError> {
            self.record(format!("leaderboard:{}:{}", page, limit));
            next(&self.leaderboard)
        }

        async fn get_today_mined(&self) -> Result<TodayMinedResponse, ApiError> {
            self.record("today_mined".into());
            next(&self.today_mined)
        }

        async fn get_users(&self, page: u32, take: u32) -> Result<UsersResponse, ApiError> {
            self.record(format!("users:{}:{}", page, take));
            next(&self.users)
        }

        async fn transfer_coin(&self, to: String, amount: f64) -> Result<TransferResponse, ApiError> {
            self.record(format!("transfer:{}:{}", to, amount));
            next(&self.transfer)
        }
    }

    #[derive(Default)]
    pub(crate) struct MockStore {
        pub apply: Queue<()>,
        pub login: Queue<StoreLoginResponse>,
        pub products: Queue<Vec<Product>>,
        pub orders: Queue<Vec<Order>>,
        pub added: Queue<Product>,
        pub completed: Queue<()>,
        pub placed: Queue<Order>,
        pub calls: Mutex<Vec<String>>,
    }

    impl MockStore {
        fn record(&self, call: String) {
            self.calls.lock().push(call);
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl StoreService for MockStore {
        async fn store_apply(&self, request: StoreApplyRequest) -> Result<(), ApiError> {
            self.record(format!("apply:{}", request.store_name));
            next(&self.apply)
        }

        async fn store_login(&self, store_id: String, _password: String) -> Result<StoreLoginResponse, ApiError> {
            self.record(format!("login:{}", store_id));
            next(&self.login)
        }

        async fn my_products(&self, store_token: &str) -> Result<Vec<Product>, ApiError> {
            self.record(format!("my_products:{}", store_token));
            next(&self.products)
        }

        async fn my_orders(&self, store_token: &str) -> Result<Vec<Order>, ApiError> {
            self.record(format!("my_orders:{}", store_token));
            next(&self.orders)
        }

        async fn add_product(&self, store_token: &str, request: ProductCreateRequest) -> Result<Product, ApiError> {
            self.record(format!("add_product:{}:{}:{}", store_token, request.name, request.price));
            next(&self.added)
        }

        async fn complete_order(&self, store_token: &str, order_id: u64) -> Result<(), ApiError> {
            self.record(format!("complete:{}:{}", store_token, order_id));
            next(&self.completed)
        }

        async fn store_products(&self, store_id: &str) -> Result<Vec<Product>, ApiError> {
            self.record(format!("store_products:{}", store_id));
            next(&self.products)
        }

        async fn place_order(&self, store_id: &str, request: OrderCreateRequest) -> Result<Order, ApiError> {
            let lines: Vec<String> = request
                .order_items
                .iter()
                .map(|l| format!("{}x{}", l.product_id, l.quantity))
                .collect();
            self.record(format!("place_order:{}:{}:{}", store_id, request.user_id, lines.join(",")));
            next(&self.placed)
        }
    }
}
