//! Integration tests for the HTTP endpoints.
//!
//! The router is driven in-process through `tower::ServiceExt`. Records
//! live in a per-test temp directory and the LLM API is a local Axum
//! listener returning a canned answer.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use castaway_runner::RunnerConfig;
use castaway_server::config::{CastawayConfig, StorageConfig};
use castaway_server::{build_router, build_state};
use serde_json::{Value, json};
use tower::ServiceExt;

const MANIFEST: &str = r#"[
    {"name": "inventory", "description": "Items you own"},
    {"name": "player_info", "description": "Your vitals"},
    {"name": "objectives", "description": "Current goals"},
    {"name": "logs", "description": "Recent actions"},
    {"name": "game_info", "description": "World facts"},
    {"name": "actions", "description": "Actions you can take"}
]"#;

fn seed_data_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "castaway_api_{label}_{}_{:?}",
        std::process::id(),
        std::thread::current().id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();

    fs::write(dir.join("memory.json"), MANIFEST).unwrap();
    let inventory: Vec<Value> = ["axe", "fibers", "stone", "wood", "stick", "shelter", "firepit"]
        .iter()
        .map(|name| json!({"name": name, "description": format!("some {name}"), "quantity": 0}))
        .collect();
    fs::write(
        dir.join("inventory.json"),
        json!({"inventory": inventory}).to_string(),
    )
    .unwrap();
    fs::write(
        dir.join("player_info.json"),
        json!({"player_info": [
            {"name": "health", "description": "Very good"},
            {"name": "hunger", "description": "Very good"},
            {"name": "thirst", "description": "Very good"},
            {"name": "energy", "description": "Very good"}
        ]})
        .to_string(),
    )
    .unwrap();
    fs::write(
        dir.join("objectives.json"),
        json!({"objectives": [{"name": "Build Shelter", "description": "Build a shelter."}]})
            .to_string(),
    )
    .unwrap();
    fs::write(
        dir.join("actions.json"),
        json!({"actions": [
            {"name": "eat", "description": "Eat something"},
            {"name": "drink", "description": "Drink water"},
            {"name": "build_shelter", "description": "Build a shelter"}
        ]})
        .to_string(),
    )
    .unwrap();
    dir
}

/// Start a chat-completions stand-in that always answers `content`.
async fn spawn_llm(content: &'static str) -> String {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(move || async move {
            axum::Json(json!({"choices": [{"message": {"content": content}}]}))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

async fn setup(label: &str, llm_answer: &'static str) -> (Router, PathBuf) {
    let dir = seed_data_dir(label);
    let llm_url = spawn_llm(llm_answer).await;

    let config = CastawayConfig {
        storage: StorageConfig {
            data_dir: dir.clone(),
            ..StorageConfig::default()
        },
        ..CastawayConfig::default()
    };
    let runner = RunnerConfig::from_lookup(|name| match name {
        "LLM_API_URL" => Some(llm_url.clone()),
        "LLM_API_KEY" => Some("test-key".to_owned()),
        _ => None,
    })
    .unwrap();

    let state = build_state(&config, &runner).unwrap();
    (build_router(Arc::new(state)), dir)
}

const EAT: &str = r#"{"action": "eat", "observation": "Hunger is dropping."}"#;

fn event(inventory: &Value) -> Value {
    json!({
        "action": "build_shelter",
        "status": "success",
        "message": "You built a shelter",
        "inventory": inventory,
        "player_info": {"health": "Good", "hunger": "Low", "thirst": "Normal", "energy": "Low"}
    })
}

fn full_inventory(shelter: u32) -> Value {
    json!({
        "axe": 1, "fibers": 2, "stone": 0, "wood": 3,
        "stick": 4, "shelter": shelter, "firepit": 0
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn read_record(dir: &Path, name: &str) -> Value {
    let raw = fs::read_to_string(dir.join(format!("{name}.json"))).unwrap();
    serde_json::from_str(&raw).unwrap()
}

// =========================================================================
// POST /next_action
// =========================================================================

#[tokio::test]
async fn test_next_action_returns_decision_and_updates_memory() {
    let (router, dir) = setup("next_action", EAT).await;

    let response = router
        .oneshot(post_json("/next_action", &event(&full_inventory(1))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, json!({"action": "eat", "observation": "Hunger is dropping."}));

    let logs = read_record(&dir, "logs");
    assert_eq!(logs["logs"][0]["name"], "build_shelter");
    assert_eq!(
        logs["logs"][0]["description"],
        "The action 'build_shelter' was executed with status 'success' and message: 'You built a shelter'."
    );
    let inventory = read_record(&dir, "inventory");
    assert_eq!(inventory["inventory"][5]["name"], "shelter");
    assert_eq!(inventory["inventory"][5]["quantity"], 1);
    let vitals = read_record(&dir, "player_info");
    assert_eq!(vitals["player_info"][1]["description"], "Low");
    let objectives = read_record(&dir, "objectives");
    assert_eq!(objectives["objectives"].as_array().unwrap().len(), 1);
    assert_eq!(objectives["objectives"][0]["name"], "Build Firepit");
    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_next_action_trailing_slash() {
    let (router, dir) = setup("trailing_slash", EAT).await;

    let response = router
        .oneshot(post_json("/next_action/", &event(&full_inventory(0))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let objectives = read_record(&dir, "objectives");
    assert_eq!(objectives["objectives"][0]["name"], "Build Shelter");
    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_next_action_unknown_inventory_item_rejected_before_mutation() {
    let (router, dir) = setup("unknown_item", EAT).await;
    let mut inventory = full_inventory(0);
    inventory["raft"] = json!(1);

    let response = router
        .oneshot(post_json("/next_action", &event(&inventory)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 422);
    assert!(json["error"].as_str().unwrap().contains("raft"));
    assert!(!dir.join("logs.json").exists());
    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_next_action_missing_inventory_item_rejected() {
    let (router, dir) = setup("missing_item", EAT).await;
    let inventory = json!({"axe": 1});

    let response = router
        .oneshot(post_json("/next_action", &event(&inventory)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_next_action_schema_violations_rejected() {
    let (router, dir) = setup("schema", EAT).await;

    let mut extra_key = event(&full_inventory(0));
    extra_key["mood"] = json!("calm");
    let response = router
        .clone()
        .oneshot(post_json("/next_action", &extra_key))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let mut missing = event(&full_inventory(0));
    missing.as_object_mut().unwrap().remove("status");
    let response = router
        .clone()
        .oneshot(post_json("/next_action", &missing))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .oneshot(
            Request::post("/next_action")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 422);
    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_next_action_model_failure_returns_sentinel() {
    let (router, dir) = setup("sentinel", r#"{"action": "eat"}"#).await;

    let response = router
        .oneshot(post_json("/next_action", &event(&full_inventory(0))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, json!({"action": "", "observation": "Validation error"}));
    // The event itself was still recorded.
    assert_eq!(read_record(&dir, "logs")["logs"][0]["name"], "build_shelter");
    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_next_action_write_failure_is_500() {
    let (router, dir) = setup("write_failure", EAT).await;
    fs::create_dir_all(dir.join("logs.json.tmp")).unwrap();

    let response = router
        .oneshot(post_json("/next_action", &event(&full_inventory(0))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 500);
    assert!(json["error"].as_str().unwrap().contains("'logs'"));
    assert!(!dir.join("logs.json").exists());
    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_startup_rejects_record_file_under_wrong_key() {
    let dir = seed_data_dir("wrong_key");
    fs::write(
        dir.join("game_info.json"),
        json!({"gameinfo": [{"name": "island", "description": "small"}]}).to_string(),
    )
    .unwrap();
    let config = CastawayConfig {
        storage: StorageConfig {
            data_dir: dir.clone(),
            ..StorageConfig::default()
        },
        ..CastawayConfig::default()
    };
    let runner = RunnerConfig::from_lookup(|name| {
        (name == "LLM_API_KEY").then(|| "test-key".to_owned())
    })
    .unwrap();

    assert!(build_state(&config, &runner).is_err());
    let _ = fs::remove_dir_all(&dir);
}

// =========================================================================
// POST /new_game, GET /memory
// =========================================================================

#[tokio::test]
async fn test_new_game_resets_memory() {
    let (router, dir) = setup("new_game", EAT).await;

    router
        .clone()
        .oneshot(post_json("/next_action", &event(&full_inventory(1))))
        .await
        .unwrap();

    let response = router
        .oneshot(Request::post("/new_game").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let memory = json["memory"].as_str().unwrap();
    assert!(memory.contains("Objectives (Current goals):\nBuild Shelter: "));
    assert!(memory.contains("shelter: some shelter (You own 0 shelter)"));
    assert!(memory.contains("hunger: Very good"));
    assert!(memory.contains("Logs (Recent actions):\n\nGame_info"));
    assert!(json["tokens"].as_u64().unwrap() > 0);
    assert_eq!(read_record(&dir, "logs"), json!({"logs": []}));
    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_get_memory() {
    let (router, dir) = setup("memory", EAT).await;

    let response = router
        .oneshot(Request::get("/memory").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let memory = json["memory"].as_str().unwrap();
    assert!(memory.starts_with("Inventory (Items you own):\naxe: some axe (You own 0 axe)"));
    assert!(memory.ends_with("build_shelter: Build a shelter"));
    assert_eq!(json["encoding"], "cl100k_base");
    assert!(json["tokens"].as_u64().unwrap() > 10);
    let _ = fs::remove_dir_all(&dir);
}

// =========================================================================
// GET /records/{name}
// =========================================================================

#[tokio::test]
async fn test_get_record() {
    let (router, dir) = setup("record", EAT).await;

    let response = router
        .oneshot(Request::get("/records/actions").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["name"], "actions");
    assert_eq!(json["description"], "Actions you can take");
    assert_eq!(json["items"].as_array().unwrap().len(), 3);
    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_get_unknown_record_is_404() {
    let (router, dir) = setup("record_404", EAT).await;

    let response = router
        .oneshot(Request::get("/records/weather").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 404);
    assert!(json["error"].as_str().unwrap().contains("weather"));
    let _ = fs::remove_dir_all(&dir);
}

// =========================================================================
// GET /messages
// =========================================================================

#[tokio::test]
async fn test_messages_empty_without_file() {
    let (router, dir) = setup("messages_empty", EAT).await;

    let response = router
        .oneshot(Request::get("/messages").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, json!({"messages": []}));
    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_messages_from_file() {
    let (router, dir) = setup("messages", EAT).await;
    fs::write(
        dir.join("messages.json"),
        json!({"messages": [{"name": "narrator", "description": "A storm is coming."}]})
            .to_string(),
    )
    .unwrap();

    let response = router
        .oneshot(Request::get("/messages/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["messages"][0]["name"], "narrator");
    assert_eq!(json["messages"][0]["description"], "A storm is coming.");
    let _ = fs::remove_dir_all(&dir);
}
