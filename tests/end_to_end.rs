//! Full server over TCP, with a mock AI provider.

mod common;

use common::{spawn_server, start_programmable_backend, test_config, ADMIN_KEY};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_admin_create_then_browse() {
    let (base, _db) = spawn_server(test_config()).await;
    let client = client();

    let created: Value = client
        .post(format!("{}/admin/pages", base))
        .bearer_auth(ADMIN_KEY)
        .json(&json!({ "service_keyword": "Tagrenovering", "city": "Roskilde" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["slug"], "tagrenovering-roskilde");

    let response = client
        .get(format!("{}/localseo/tagrenovering-roskilde/", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 301);
    let location = response.headers()["location"].to_str().unwrap().to_string();
    assert_eq!(location, "/service/tagrenovering/roskilde/");

    let response = client.get(format!("{}{}", base, location)).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    let html = response.text().await.unwrap();
    assert!(html.contains("Tagrenovering i Roskilde"));

    let response = client.get(format!("{}/health", base)).send().await.unwrap();
    let health: Value = response.json().await.unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["pages"], 1);
}

#[tokio::test]
async fn test_openai_generation_against_mock_provider() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let provider = start_programmable_backend(move |request: String| {
        let seen = Arc::clone(&seen);
        async move {
            seen.fetch_add(1, Ordering::SeqCst);
            if !request.contains("Bearer sk-test") {
                return (401, json!({ "error": { "message": "bad key" } }).to_string());
            }
            let content = json!({
                "intro": "Erfarne kloakmestre i Dianalund.",
                "meta_title": "Kloakmester Dianalund",
                "meta_description": "Hurtig hjælp i Dianalund.",
            })
            .to_string();
            let body = json!({
                "choices": [{ "message": { "role": "assistant", "content": content } }]
            });
            (200, body.to_string())
        }
    })
    .await;

    let mut config = test_config();
    config.ai.api_key = "sk-test".into();
    config.ai.endpoint = Some(format!("http://{}/v1/chat/completions", provider));
    let (base, db) = spawn_server(config).await;

    let id = db
        .pages()
        .insert(localseo_router::store::NewLocalPage::new("Kloakmester", "Dianalund"))
        .await
        .unwrap();

    let response = client()
        .post(format!("{}/admin/pages/{}/generate", base, id))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let page: Value = response.json().await.unwrap();
    assert_eq!(page["ai_intro"], "Erfarne kloakmestre i Dianalund.");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let html = client()
        .get(format!("{}/service/kloakmester/dianalund/", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Erfarne kloakmestre i Dianalund."));
    assert!(html.contains("<title>Kloakmester Dianalund"));
}

#[tokio::test]
async fn test_provider_error_is_bad_gateway() {
    let provider = start_programmable_backend(|_request: String| async {
        (429, json!({ "error": { "message": "Rate limit reached" } }).to_string())
    })
    .await;

    let mut config = test_config();
    config.ai.api_key = "sk-test".into();
    config.ai.endpoint = Some(format!("http://{}/v1/chat/completions", provider));
    let (base, db) = spawn_server(config).await;
    let id = db
        .pages()
        .insert(localseo_router::store::NewLocalPage::new("Kloakmester", "Dianalund"))
        .await
        .unwrap();

    let response = client()
        .post(format!("{}/admin/pages/{}/generate", base, id))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Rate limit reached"));
}
