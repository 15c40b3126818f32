//! Integration tests for `TwilioClient` using wiremock HTTP mocks.

use autocare_core::{GatewayError, MessageGateway};
use autocare_sms::{TwilioClient, TwilioCredentials};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> TwilioClient {
    TwilioClient::with_base_url(
        TwilioCredentials {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
            from_number: "+15550009999".to_string(),
        },
        30,
        base_url,
    )
    .expect("client construction should not fail")
}

#[tokio::test]
async fn send_posts_form_with_basic_auth() {
    let server = MockServer::start().await;

    // base64("AC123:secret")
    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
        .and(header("authorization", "Basic QUMxMjM6c2VjcmV0"))
        .and(body_string_contains("To=%2B15551234567"))
        .and(body_string_contains("From=%2B15550009999"))
        .and(body_string_contains("Body=Hi+Jane"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "sid": "SM0001",
            "status": "queued"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let receipt = client
        .send("+15551234567", "Hi Jane")
        .await
        .expect("message accepted");

    assert_eq!(receipt.id, "SM0001");
}

#[tokio::test]
async fn rejected_number_maps_to_gateway_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "code": 21211,
            "message": "The 'To' number +1000 is not a valid phone number.",
            "status": 400
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.send("+1000", "Hi").await.unwrap_err();

    match err {
        GatewayError::Rejected { code, message } => {
            assert_eq!(code, "21211");
            assert!(message.contains("not a valid phone number"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_success_body_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.send("+15551234567", "Hi").await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
}
