//! HTTP integration tests for the interaction endpoint.
//!
//! Run with: `cargo test -p fc-bot --test interactions_http_test`

mod helpers;

use axum::body::Body;
use axum::http::Method;
use fc_bot::api::signature::{sign_payload, SIGNATURE_HEADER};
use fc_bot::config::Config;
use helpers::{body_to_json, interaction, TestApp, TestGuild, TestUser};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app
        .oneshot(
            TestApp::request(Method::GET, "/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = body_to_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["rate_limiting"], false);
}

#[tokio::test]
async fn test_add_list_remove_flow() {
    let app = TestApp::new();
    let ash = TestUser::new("Ash");

    let replies = app
        .interact(interaction(&ash, None, Some("add"), &["Pikachu", "0000", "1111", "2222"], None))
        .await;
    assert_eq!(replies[0]["kind"], "success");
    assert_eq!(replies[0]["body"], "Added friend code `000011112222` for `Pikachu`.");

    let replies = app
        .interact(interaction(&ash, None, Some("l"), &[], None))
        .await;
    assert_eq!(replies[0]["title"], "F.C. List for Ash");
    assert_eq!(replies[0]["fields"][0]["name"], "Pikachu");
    assert_eq!(replies[0]["fields"][0]["value"], "000011112222");

    let replies = app
        .interact(interaction(&ash, None, Some("d"), &["Pikachu"], None))
        .await;
    assert_eq!(replies[0]["body"], "Removed Pikachu from your list.");

    let replies = app
        .interact(interaction(&ash, None, Some("remove"), &["Pikachu"], None))
        .await;
    assert_eq!(replies[0]["kind"], "error");
    assert_eq!(replies[0]["title"], "Error Removing Friend Code");
    assert_eq!(replies[0]["body"], "Pikachu not found on your list.");
}

#[tokio::test]
async fn test_validation_errors_become_replies() {
    let app = TestApp::new();
    let ash = TestUser::new("Ash");

    let replies = app
        .interact(interaction(&ash, None, Some("add"), &["Pikachu", "12345678901a"], None))
        .await;
    assert_eq!(replies[0]["kind"], "error");
    assert_eq!(replies[0]["title"], "Error Adding Friend Code");
    assert_eq!(replies[0]["body"], "The given friend code isn't all numbers.");

    let replies = app
        .interact(interaction(&ash, None, Some("vis"), &["bogus"], None))
        .await;
    assert_eq!(replies[0]["title"], "Error Changing F.C. Visibility");
    assert_eq!(replies[0]["body"], "Bogus is not a valid option.");

    let replies = app
        .interact(interaction(&ash, None, Some("dance"), &[], None))
        .await;
    assert_eq!(replies[0]["kind"], "error");
}

#[tokio::test]
async fn test_home_guild_scenario() {
    let app = TestApp::new();
    let u1 = TestUser::new("Ash");
    let u2 = TestUser::new("Misty");
    let g1 = TestGuild::new("Cerulean", &u2, &[&u1]);
    let g2 = TestGuild::new("Pallet", &u1, &[&u2]);

    app.interact(interaction(&u2, Some(&g1), Some("add"), &["Staryu", "999999999999"], None))
        .await;
    app.interact(interaction(&u2, Some(&g1), Some("vis"), &["private"], None))
        .await;

    let replies = app
        .interact(interaction(&u1, Some(&g1), None, &[], Some(&u2)))
        .await;
    assert_eq!(replies[0]["kind"], "error");
    assert_eq!(replies[0]["footer"], "They need to run `fc sethome`");

    let replies = app
        .interact(interaction(&u2, Some(&g1), Some("sethome"), &[], None))
        .await;
    assert_eq!(replies[0]["body"], "Set Cerulean as your home server.");

    let replies = app
        .interact(interaction(&u1, Some(&g1), None, &[], Some(&u2)))
        .await;
    assert_eq!(replies[0]["kind"], "info");
    assert_eq!(replies[0]["title"], "F.C. for Staryu");
    assert_eq!(replies[0]["footer"], "Owned by Misty");

    let replies = app
        .interact(interaction(&u1, Some(&g2), None, &[], Some(&u2)))
        .await;
    assert_eq!(replies[0]["kind"], "error");
    assert_eq!(replies[0]["title"], "Misty's Friend Codes");
}

#[tokio::test]
async fn test_list_all_uses_member_directory() {
    let app = TestApp::new();
    let brock = TestUser::new("Brock");
    let misty = TestUser::new("Misty");
    let pewter = TestGuild::new("Pewter", &brock, &[&misty]);

    app.interact(interaction(&misty, Some(&pewter), Some("add"), &["Staryu", "999999999999"], None))
        .await;
    app.interact(interaction(&misty, Some(&pewter), Some("sethome"), &[], None))
        .await;

    let replies = app
        .interact(interaction(&misty, Some(&pewter), Some("listall"), &[], None))
        .await;
    assert_eq!(replies[0]["kind"], "error");

    let replies = app
        .interact(interaction(&brock, Some(&pewter), Some("list_all"), &[], None))
        .await;
    assert_eq!(replies[0]["title"], "F.C. List for Pewter");
    assert_eq!(replies[0]["fields"][0]["name"], "Misty");
    assert_eq!(replies[0]["fields"][0]["value"], "Staryu: 999999999999");
}

#[tokio::test]
async fn test_signature_required_when_secret_configured() {
    let config = Config {
        interaction_secret: Some("shared-secret".into()),
        ..Config::default_for_test()
    };
    let app = TestApp::with_config(config);
    let ash = TestUser::new("Ash");
    let body = interaction(&ash, None, Some("list"), &[], None).to_string();

    let unsigned = TestApp::request(Method::POST, "/interactions")
        .header("content-type", "application/json")
        .body(Body::from(body.clone()))
        .unwrap();
    assert_eq!(app.oneshot(unsigned).await.status(), 401);

    let forged = TestApp::request(Method::POST, "/interactions")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, sign_payload("wrong-secret", body.as_bytes()).unwrap())
        .body(Body::from(body.clone()))
        .unwrap();
    assert_eq!(app.oneshot(forged).await.status(), 401);

    let signed = TestApp::request(Method::POST, "/interactions")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, sign_payload("shared-secret", body.as_bytes()).unwrap())
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(signed).await;
    assert_eq!(response.status(), 200);
    let json = body_to_json(response).await;
    assert_eq!(json["replies"][0]["kind"], "warning");
}

#[tokio::test]
async fn test_malformed_interaction_rejected() {
    let app = TestApp::new();
    let request = TestApp::request(Method::POST, "/interactions")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"user": 42}"#))
        .unwrap();
    assert!(app.oneshot(request).await.status().is_client_error());
}
