use mandate_lib::config::AppConfig;
use mandate_lib::{invoke, AppState};
use serde_json::{json, Value};

fn state_with(config: AppConfig) -> AppState {
    AppState::new(AppConfig {
        calendar_connect_delay_ms: 0,
        chat_reply_delay_ms: 0,
        ..config
    })
    .expect("app state")
}

fn state() -> AppState {
    state_with(AppConfig::default())
}

async fn call(state: &AppState, cmd: &str, args: Value) -> Value {
    invoke(state, cmd, args).await.expect(cmd)
}

#[tokio::test]
async fn quick_add_then_toggle_moves_task_to_completed() {
    let state = state();
    let task = call(&state, "task_quick_add", json!({ "raw": "Call plumber: about the leak" })).await;
    assert_eq!(task["title"], "Call plumber");
    assert_eq!(task["description"], "about the leak");
    let task_id = task["id"].as_str().expect("task id").to_string();

    call(&state, "task_toggle", json!({ "taskId": task_id })).await;
    let view = call(&state, "tasks_view", json!({})).await;
    let completed = view["completed"].as_array().expect("completed");
    assert!(completed.iter().any(|task| task["id"] == task_id.as_str()));

    let toasts = call(&state, "notifications_drain", json!({})).await;
    let messages = toasts
        .as_array()
        .expect("toasts")
        .iter()
        .map(|toast| toast["message"].as_str().expect("message").to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        messages,
        vec!["New task added: Call plumber", "Task completed: Call plumber"]
    );
}

#[tokio::test]
async fn blank_task_title_is_rejected_over_the_bridge() {
    let state = state();
    let error = invoke(&state, "task_add", json!({ "payload": { "title": "   " } }))
        .await
        .expect_err("blank title");
    assert!(error.starts_with("VALIDATION"));
    let tasks = call(&state, "tasks_list", json!({})).await;
    assert_eq!(tasks.as_array().expect("tasks").len(), 8);
}

#[tokio::test]
async fn configure_mandate_from_template_appends_card() {
    let state = state();
    let form = call(
        &state,
        "mandate_form_render",
        json!({ "request": { "target": "template", "id": "travel-planner" } }),
    )
    .await;
    assert_eq!(form["editing"], false);

    let mandate = call(
        &state,
        "mandate_configure",
        json!({
            "payload": {
                "templateId": "travel-planner",
                "values": {
                    "home-address": "12 Elm Street",
                    "work-address": "1 Market Square",
                    "transport-mode": "Cycle",
                    "arrival-time": "08:45"
                },
                "frequency": "weekly",
                "timeOfDay": "07:15"
            }
        }),
    )
    .await;
    assert_eq!(mandate["templateId"], "travel-planner");
    assert_eq!(mandate["isActive"], true);

    let cards = call(&state, "mandates_list", json!({})).await;
    let cards = cards.as_array().expect("cards");
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[1]["mandate"]["id"], mandate["id"]);
}

#[tokio::test]
async fn flag_value_for_address_field_is_rejected() {
    let state = state();
    let error = invoke(
        &state,
        "mandate_configure",
        json!({
            "payload": {
                "templateId": "travel-planner",
                "values": {
                    "home-address": true,
                    "work-address": true,
                    "transport-mode": "Cycle",
                    "arrival-time": "08:45"
                }
            }
        }),
    )
    .await
    .expect_err("flag in address field");
    assert!(error.starts_with("VALIDATION"));
    let cards = call(&state, "mandates_list", json!({})).await;
    assert_eq!(cards.as_array().expect("cards").len(), 1);
}

#[tokio::test]
async fn custom_wizard_requires_name_before_saving() {
    let state = state();
    let error = invoke(&state, "custom_mandate_submit", json!({}))
        .await
        .expect_err("missing name");
    assert!(error.contains("name"));

    for msg in [
        json!({ "kind": "setName", "value": "Inbox Triage" }),
        json!({ "kind": "setUseCase", "value": "Sort my email every morning" }),
        json!({ "kind": "next" }),
    ] {
        call(&state, "custom_mandate_update", json!({ "msg": msg })).await;
    }
    let saved = call(&state, "custom_mandate_submit", json!({})).await;
    assert_eq!(saved["name"], "Inbox Triage");
    assert_eq!(saved["templateId"], "custom");

    let wizard = call(&state, "custom_mandate_view", json!({})).await;
    assert_eq!(wizard["config"]["name"], "");
}

#[tokio::test]
async fn google_connect_imports_calendar_tasks() {
    let state = state();
    let response = call(&state, "calendar_connect", json!({ "provider": "google" })).await;
    assert_eq!(response["integration"]["connected"], true);
    assert_eq!(response["imported"].as_array().expect("imported").len(), 2);

    let tags = call(&state, "task_tags", json!({})).await;
    assert!(tags.as_array().expect("tags").iter().any(|tag| tag == "meeting"));

    let error = invoke(&state, "calendar_sync", json!({ "provider": "apple" }))
        .await
        .expect_err("apple not connected");
    assert!(error.starts_with("INTEGRATION"));
}

#[tokio::test]
async fn empty_lunch_store_shows_empty_panel() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = state_with(AppConfig {
        lunch_store_path: Some(dir.path().join("lunch.sqlite3")),
        ..AppConfig::default()
    });
    let card = call(&state, "event_card", json!({ "eventId": "event-6" })).await;
    assert_eq!(card["panel"]["state"], "empty");

    let other = call(&state, "event_card", json!({ "eventId": "event-5" })).await;
    assert_eq!(other["panel"]["state"], "ready");
    assert_eq!(other["panel"]["hasMore"], false);
}

#[tokio::test]
async fn chat_and_routing_round_out_the_shell() {
    let state = state();
    let replies = call(
        &state,
        "chat_send",
        json!({ "input": { "kind": "chip", "text": "Yes, that sounds good" } }),
    )
    .await;
    assert_eq!(replies.as_array().expect("replies").len(), 2);
    let chat = call(&state, "chat_view", json!({})).await;
    assert_eq!(chat["state"], "onboarding");

    assert_eq!(call(&state, "route", json!({ "path": "/tasks" })).await, "tasks");
    assert_eq!(call(&state, "route", json!({ "path": "/nope" })).await, "not-found");

    let error = invoke(&state, "launch_rockets", json!({}))
        .await
        .expect_err("unknown command");
    assert!(error.contains("launch_rockets"));
}
