//! HTTP surface tests against a mock backend

use chrono::NaiveDate;
use dadam_client::{ApiClient, AuthFailure, Choice, ClientConfig, DadamError, GameId};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> ApiClient {
    let config = ClientConfig {
        api_base_url: format!("{}/api/v1/", server.uri()),
        ..Default::default()
    };
    ApiClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_today_normalizes_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/balance/today"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12,
            "question": "짜장 vs 짬뽕",
            "optionA": "짜장",
            "optionB": "짬뽕",
            "votesA": [{"userId": 1, "userName": "윤수진"}]
        })))
        .mount(&server)
        .await;

    let summary = client(&server).await.fetch_today().await.unwrap();

    assert_eq!(summary.id, Some(GameId::Remote("12".into())));
    assert_eq!(summary.category, "ETC");
    assert!(summary.votes_b.is_empty());
    assert_eq!(summary.tally().avatars_a, vec!["수진"]);
}

#[tokio::test]
async fn test_fetch_today_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/balance/today"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let err = client(&server).await.fetch_today().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_vote_sends_bearer_and_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/balance/today/vote"))
        .and(header("authorization", "Bearer token-1"))
        .and(body_json(json!({"choice": "B"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12,
            "votesA": [],
            "votesB": ["엄마"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let summary = client(&server).await.vote(Choice::B, "token-1").await.unwrap();
    assert_eq!(summary.votes_b.len(), 1);
}

#[tokio::test]
async fn test_non_object_vote_response_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/balance/today/vote"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("ok")))
        .mount(&server)
        .await;

    let err = client(&server).await.vote(Choice::A, "t").await.unwrap_err();
    assert!(matches!(err, DadamError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_login_classification() {
    let server = MockServer::start().await;
    for (email, status) in [("new@example.com", 404), ("bad@example.com", 401), ("oops@example.com", 500)] {
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .and(body_json(json!({"email": email, "password": "pw"})))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
    }
    let api = client(&server).await;

    assert_eq!(
        api.login(" new@example.com ", "pw").await.unwrap_err(),
        AuthFailure::UnknownEmail { email: "new@example.com".into() }
    );
    assert_eq!(
        api.login("bad@example.com", "pw").await.unwrap_err(),
        AuthFailure::InvalidCredentials
    );
    assert_eq!(
        api.login("oops@example.com", "pw").await.unwrap_err(),
        AuthFailure::LoginFailed { status: 500 }
    );
}

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt",
            "user": {"id": 7, "name": "윤수진", "email": "sujin@example.com", "familyCode": "F-1"}
        })))
        .mount(&server)
        .await;

    let session = client(&server).await.login("sujin@example.com", "pw").await.unwrap();
    assert_eq!(session.token, "jwt");
    assert_eq!(session.user.family_code.as_deref(), Some("F-1"));
    assert_eq!(session.display_name(), "윤수진");
}

#[tokio::test]
async fn test_signup_classification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/signup"))
        .and(body_json(json!({
            "name": "수진",
            "email": "dup@example.com",
            "password": "pw",
            "familyCode": "F-1"
        })))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/signup"))
        .and(body_json(json!({"name": "수진", "email": "down@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let api = client(&server).await;

    assert_eq!(
        api.signup("수진", "dup@example.com", "pw", Some("F-1")).await.unwrap_err(),
        AuthFailure::DuplicateEmail
    );
    let err = api.signup("수진", "down@example.com", "pw", Some("  ")).await.unwrap_err();
    assert_eq!(err.to_string(), "서버 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.");
}

#[tokio::test]
async fn test_unreachable_backend() {
    let config = ClientConfig {
        api_base_url: "http://127.0.0.1:9/api/v1".into(),
        timeout_secs: 2,
        ..Default::default()
    };
    let api = ApiClient::new(&config).unwrap();

    assert_eq!(api.login("a@b.c", "pw").await.unwrap_err(), AuthFailure::LoginUnreachable);
    assert!(matches!(api.fetch_today().await, Err(DadamError::Network(_))));
}

#[tokio::test]
async fn test_fetch_question_by_date() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/questions"))
        .and(query_param("date", "2025-11-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "content": "이번 주말에 뭐 먹을까?",
            "category": "FOOD",
            "assignedDate": "2025-11-02"
        })))
        .mount(&server)
        .await;

    let day = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
    let question = client(&server).await.fetch_question(day).await.unwrap();
    assert_eq!(question.id, 3);
    assert_eq!(question.assigned_date, Some(day));
}
