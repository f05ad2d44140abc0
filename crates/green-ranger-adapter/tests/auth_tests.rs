/*
[INPUT]:  Mock authentication responses
[OUTPUT]: Test results for login and session handling
[POS]:    Integration tests - authentication
[UPDATE]: When auth endpoints or flow changes
*/

mod common;

use common::{login_body, mock_client, setup_mock_server, TEST_AUTH, TEST_SECRET};
use green_ranger_adapter::{
    AuthManager, DeviceQuery, Endpoint, EnergyService, LoginRequest, RangerError, Session,
};
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn auth_manager(server: &MockServer) -> AuthManager {
    AuthManager::new(
        mock_client(server),
        LoginRequest::new("13200000000", "5f4dcc3b5aa765d61d8327deb882cf99"),
    )
}

async fn mount_login(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(Endpoint::Login.path()))
        .and(body_json(serde_json::json!({
            "account": "13200000000",
            "password": "5f4dcc3b5aa765d61d8327deb882cf99",
            "project": "IOT"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("auth", TEST_AUTH)
                .set_body_json(login_body("fresh-token")),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_collects_credentials() {
    let server = setup_mock_server().await;
    mount_login(&server, 1).await;

    let credentials = assert_ok!(auth_manager(&server).login().await);
    assert_eq!(credentials.token, "fresh-token");
    assert_eq!(credentials.secret, TEST_SECRET);
    assert_eq!(credentials.user_id, "10086");
    assert_eq!(credentials.auth, TEST_AUTH);
}

#[tokio::test]
async fn test_login_without_data_fails() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path(Endpoint::Login.path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "errorMessage": "wrong password"
        })))
        .mount(&server)
        .await;

    let err = auth_manager(&server).login().await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(err.to_string().contains("login failed: no data returned"));
}

#[tokio::test]
async fn test_existing_session_skips_login() {
    let server = setup_mock_server().await;
    mount_login(&server, 0).await;

    let manager = auth_manager(&server);
    let mut session = Session::from_credentials(common::test_credentials());
    let credentials = assert_ok!(manager.ensure_session(&mut session).await);
    assert_eq!(credentials.token, "token-abc");
}

#[tokio::test]
async fn test_reauthenticates_once_after_unauthorized() {
    let server = setup_mock_server().await;
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path(Endpoint::EnergyDay.path()))
        .and(header("token", "stale-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(Endpoint::EnergyDay.path()))
        .and(header("token", "fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": { "energyDay": 6.89 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut stale = common::test_credentials();
    stale.token = "stale-token".to_string();
    let mut session = Session::from_credentials(stale);

    let service = EnergyService::new(auth_manager(&server));
    let date = chrono::NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
    let point = assert_ok!(service.generation_data(&mut session, date).await);

    assert_eq!(point.amount.to_string(), "6.89");
    assert_eq!(session.credentials().map(|c| c.token.as_str()), Some("fresh-token"));
}

#[tokio::test]
async fn test_second_rejection_is_surfaced() {
    let server = setup_mock_server().await;
    mount_login(&server, 2).await;

    Mock::given(method("GET"))
        .and(path(Endpoint::EnergyTotal.path()))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let service = EnergyService::new(auth_manager(&server));
    let mut session = Session::new();
    let result = service.energy_total(&mut session).await;
    assert!(matches!(result, Err(RangerError::TokenExpired)));
}

#[tokio::test]
async fn test_month_per_day_returns_generation_series() {
    let server = setup_mock_server().await;
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path(Endpoint::EnergyMonthPerDay.path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {
                "items": [
                    { "typeCode": 2, "vals": [{ "ts": "2025-02-01", "val": 1.0 }] },
                    { "typeCode": 0, "vals": [
                        { "ts": "2025-02-01", "val": 6.89 },
                        { "ts": "2025-02-02", "val": 7.12 }
                    ] }
                ]
            }
        })))
        .mount(&server)
        .await;

    let service = EnergyService::new(auth_manager(&server));
    let mut session = Session::new();
    let device = DeviceQuery {
        date: chrono::NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        devaddr: 1,
        devcode: 3502,
        pn: "W0040158451235".to_string(),
        sn: "96342210200071".to_string(),
        kind: 4,
    };

    let item = assert_ok!(service.energy_month_per_day(&mut session, &device).await)
        .expect("generation series present");
    assert_eq!(item.type_code, 0);
    assert_eq!(item.total().to_string(), "14.01");
}
