//! Accessor tests against an in-process fake backend.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use parking_lot::Mutex;

use crate::config::ClientConfig;
use crate::services::api::ApiClient;
use crate::services::session::tests::{test_user, tokens};
use crate::services::session::SessionContext;

mod auth;
mod store;

/// A request as the fake backend saw it.
#[derive(Debug, Clone)]
pub(super) struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Default)]
struct Shared {
    routes: HashMap<String, (StatusCode, String)>,
    requests: Mutex<Vec<Recorded>>,
}

pub(super) struct FakeBackend {
    addr: SocketAddr,
    shared: Arc<Shared>,
}

impl FakeBackend {
    /// Serve `routes` (path, status, body) on an ephemeral port. Unknown
    /// paths answer 404 with an empty body.
    pub async fn start(routes: &[(&str, u16, &str)]) -> Self {
        let routes = routes
            .iter()
            .map(|(path, status, body)| {
                let status = StatusCode::from_u16(*status).unwrap();
                (path.to_string(), (status, body.to_string()))
            })
            .collect();
        let shared = Arc::new(Shared { routes, requests: Mutex::new(Vec::new()) });

        let app = Router::new().fallback(respond).with_state(shared.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, shared }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.requests.lock().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("no request reached the backend")
    }
}

async fn respond(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    shared.requests.lock().push(Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization,
        body,
    });

    let (status, body) = shared
        .routes
        .get(uri.path())
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, String::new()));
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// Client for `base_url` with an anonymous session.
pub(super) fn client_for(base_url: String) -> (ApiClient, Arc<SessionContext>) {
    let config = ClientConfig { api_base_url: base_url, ..ClientConfig::default() };
    let session = Arc::new(SessionContext::new());
    let client = ApiClient::new(&config, session.clone()).unwrap();
    (client, session)
}

/// Client whose session is signed in with access token `token`.
pub(super) fn signed_in(base_url: String, token: &str) -> (ApiClient, Arc<SessionContext>) {
    let (client, session) = client_for(base_url);
    session.establish(tokens(token), test_user("u1"));
    (client, session)
}

/// Base URL of a port nothing listens on.
pub(super) async fn closed_port() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Drain queued session events.
pub(super) fn drain_events(session: &SessionContext) -> Vec<crate::services::session::SessionEvent> {
    let events = session.events();
    std::iter::from_fn(|| events.try_recv().ok()).collect()
}
