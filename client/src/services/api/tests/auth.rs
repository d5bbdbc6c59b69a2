use super::*;
use crate::core::error::ApiError;
use crate::services::api::auth;
use crate::services::session::SessionEvent;

#[tokio::test]
async fn xquare_login_is_anonymous_post() {
    let backend = FakeBackend::start(&[("/auth/xquare", 200, r#"{"xquareId":"xq-42"}"#)]).await;
    let (client, _session) = client_for(backend.base_url());

    let response = auth::xquare_login(&client, "student".into(), "pw".into()).await.unwrap();
    assert_eq!(response.xquare_id, "xq-42");

    let request = backend.last();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.authorization, None);
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["accountId"], "student");
    assert_eq!(body["password"], "pw");
}

#[tokio::test]
async fn register_failure_uses_body_message() {
    let backend = FakeBackend::start(&[("/auth/register/", 400, r#"{"message":"Invalid code"}"#)]).await;
    let (client, _session) = client_for(backend.base_url());

    let err = auth::register(&client, "xq-42".into(), "bad".into()).await.unwrap_err();
    assert_eq!(err, ApiError::Application { status: 400, message: "Invalid code".into() });
}

#[tokio::test]
async fn user_info_sends_bearer_token() {
    let backend = FakeBackend::start(&[(
        "/auth/user",
        200,
        r#"{"id":7,"githubId":"octocat","githubImageUrl":"https://img","totalCommits":12}"#,
    )])
    .await;
    let (client, _session) = signed_in(backend.base_url(), "tok-1");

    let profile = auth::get_user_info(&client).await.unwrap();
    assert_eq!(profile.id, "7");
    assert_eq!(profile.total_commits, 12);
    assert_eq!(backend.last().authorization.as_deref(), Some("Bearer tok-1"));
}

#[tokio::test]
async fn unauthorized_expires_session() {
    let backend = FakeBackend::start(&[("/auth/user", 401, "")]).await;
    let (client, session) = signed_in(backend.base_url(), "tok-1");
    drain_events(&session);

    let err = auth::get_user_info(&client).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized { status: 401 });
    assert!(!session.is_authenticated());
    assert_eq!(drain_events(&session), vec![SessionEvent::Expired { status: 401 }]);
}
