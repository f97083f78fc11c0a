pub mod app;
pub mod calendar;
pub mod chat;
pub mod clock;
pub mod config;
pub mod db;
pub mod errors;
pub mod fixtures;
pub mod integrations;
pub mod lunch;
pub mod mandates;
pub mod models;
pub mod notifications;
pub mod router;
pub mod suggestions;
pub mod tasks;
pub mod voice;

use crate::app::{AppCore, ChatView, DayPage, FormRequest, RevealResponse};
use crate::chat::{ChatInput, ChatMessage};
use crate::config::AppConfig;
use crate::lunch::EventCardView;
use crate::mandates::board::{MandateCard, TemplateCard};
use crate::mandates::custom::{WizardMsg, WizardView};
use crate::mandates::form::FormView;
use crate::models::{
    BooleanResponse, CalendarIntegration, CalendarProvider, ConfigureMandatePayload, ConfiguredMandate,
    ConnectResponse, NewTaskPayload, Task, TaskView, UpdateMandatePayload,
};
use crate::notifications::Notification;
use crate::router::Route;
use crate::suggestions::CardView;
use crate::voice::VoiceState;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

#[derive(Clone)]
pub struct AppState {
    core: Arc<AppCore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> errors::AppResult<Self> {
        Ok(Self {
            core: AppCore::new(config)?,
        })
    }

    pub fn from_core(core: Arc<AppCore>) -> Self {
        Self { core }
    }

    pub fn core(&self) -> &Arc<AppCore> {
        &self.core
    }
}

// ─── Day view and event cards ─────────────────────────────────────────────

fn day_view(state: &AppState) -> Result<DayPage, String> {
    state.core.day_view().map_err(to_client_error)
}

fn day_previous(state: &AppState) -> Result<DayPage, String> {
    state.core.day_previous().map_err(to_client_error)
}

fn day_next(state: &AppState) -> Result<DayPage, String> {
    state.core.day_next().map_err(to_client_error)
}

fn day_today(state: &AppState) -> Result<DayPage, String> {
    state.core.day_today().map_err(to_client_error)
}

async fn event_card(state: &AppState, event_id: String) -> Result<EventCardView, String> {
    state.core.event_card(&event_id).await.map_err(to_client_error)
}

fn event_reveal_next(state: &AppState, event_id: String) -> Result<RevealResponse, String> {
    state.core.event_reveal_next(&event_id).map_err(to_client_error)
}

fn suggestion_view(
    state: &AppState,
    event_id: String,
    suggestion_id: String,
    expanded: bool,
) -> Result<CardView, String> {
    state
        .core
        .suggestion_view(&event_id, &suggestion_id, expanded)
        .map_err(to_client_error)
}

// ─── Tasks and voice ──────────────────────────────────────────────────────

fn tasks_list(state: &AppState) -> Result<Vec<Task>, String> {
    state.core.tasks_list().map_err(to_client_error)
}

fn task_add(state: &AppState, payload: NewTaskPayload) -> Result<Task, String> {
    state.core.task_add(payload).map_err(to_client_error)
}

fn task_quick_add(state: &AppState, raw: String) -> Result<Task, String> {
    state.core.task_quick_add(&raw).map_err(to_client_error)
}

fn task_update(state: &AppState, task: Task) -> Result<Task, String> {
    state.core.task_update(task).map_err(to_client_error)
}

fn task_delete(state: &AppState, task_id: String) -> Result<Task, String> {
    state.core.task_delete(&task_id).map_err(to_client_error)
}

fn task_toggle(state: &AppState, task_id: String) -> Result<Task, String> {
    state.core.task_toggle(&task_id).map_err(to_client_error)
}

fn tasks_view(state: &AppState, tag: Option<String>) -> Result<TaskView, String> {
    state.core.tasks_view(tag.as_deref()).map_err(to_client_error)
}

fn task_tags(state: &AppState) -> Result<Vec<String>, String> {
    state.core.task_tags().map_err(to_client_error)
}

fn voice_state(state: &AppState) -> Result<VoiceState, String> {
    state.core.voice_state().map_err(to_client_error)
}

fn voice_toggle(state: &AppState) -> Result<VoiceState, String> {
    state.core.voice_toggle().map_err(to_client_error)
}

fn voice_result(state: &AppState, transcript: String) -> Result<VoiceState, String> {
    state.core.voice_result(&transcript).map_err(to_client_error)
}

fn voice_error(state: &AppState, reason: String) -> Result<VoiceState, String> {
    state.core.voice_error(&reason).map_err(to_client_error)
}

fn voice_set_typed(state: &AppState, value: String) -> Result<VoiceState, String> {
    state.core.voice_set_typed(&value).map_err(to_client_error)
}

fn voice_submit(state: &AppState) -> Result<Task, String> {
    state.core.voice_submit().map_err(to_client_error)
}

fn voice_submit_typed(state: &AppState) -> Result<Task, String> {
    state.core.voice_submit_typed().map_err(to_client_error)
}

// ─── Mandates ─────────────────────────────────────────────────────────────

fn templates_search(state: &AppState, query: Option<String>) -> Result<Vec<TemplateCard>, String> {
    state
        .core
        .templates_search(query.as_deref().unwrap_or_default())
        .map_err(to_client_error)
}

fn mandate_form_render(state: &AppState, request: FormRequest) -> Result<FormView, String> {
    state.core.mandate_form_render(&request).map_err(to_client_error)
}

fn mandate_configure(state: &AppState, payload: ConfigureMandatePayload) -> Result<ConfiguredMandate, String> {
    state.core.mandate_configure(payload).map_err(to_client_error)
}

fn mandate_update(state: &AppState, payload: UpdateMandatePayload) -> Result<ConfiguredMandate, String> {
    state.core.mandate_update(payload).map_err(to_client_error)
}

fn mandate_toggle(state: &AppState, mandate_id: String) -> Result<ConfiguredMandate, String> {
    state.core.mandate_toggle(&mandate_id).map_err(to_client_error)
}

fn mandate_delete(state: &AppState, mandate_id: String) -> Result<ConfiguredMandate, String> {
    state.core.mandate_delete(&mandate_id).map_err(to_client_error)
}

fn mandates_list(state: &AppState) -> Result<Vec<MandateCard>, String> {
    state.core.mandates_list().map_err(to_client_error)
}

fn custom_mandate_view(state: &AppState) -> Result<WizardView, String> {
    state.core.custom_mandate_view().map_err(to_client_error)
}

fn custom_mandate_update(state: &AppState, msg: WizardMsg) -> Result<WizardView, String> {
    state.core.custom_mandate_update(msg).map_err(to_client_error)
}

fn custom_mandate_submit(state: &AppState) -> Result<ConfiguredMandate, String> {
    state.core.custom_mandate_submit().map_err(to_client_error)
}

// ─── Chat and calendar providers ──────────────────────────────────────────

fn chat_view(state: &AppState) -> Result<ChatView, String> {
    state.core.chat_view().map_err(to_client_error)
}

async fn chat_send(state: &AppState, input: ChatInput) -> Result<Vec<ChatMessage>, String> {
    state.core.chat_send(input).await.map_err(to_client_error)
}

fn calendar_integrations(state: &AppState) -> Result<Vec<CalendarIntegration>, String> {
    state.core.calendar_integrations().map_err(to_client_error)
}

async fn calendar_connect(state: &AppState, provider: CalendarProvider) -> Result<ConnectResponse, String> {
    state.core.calendar_connect(provider).await.map_err(to_client_error)
}

fn calendar_disconnect(state: &AppState, provider: CalendarProvider) -> Result<CalendarIntegration, String> {
    state.core.calendar_disconnect(provider).map_err(to_client_error)
}

fn calendar_sync(state: &AppState, provider: CalendarProvider) -> Result<CalendarIntegration, String> {
    state.core.calendar_sync(provider).map_err(to_client_error)
}

// ─── Notifications and routing ────────────────────────────────────────────

fn notifications_list(state: &AppState) -> Vec<Notification> {
    state.core.notifications_list()
}

fn notifications_dismiss(state: &AppState, notification_id: String) -> BooleanResponse {
    BooleanResponse {
        success: state.core.notifications_dismiss(&notification_id),
    }
}

fn notifications_drain(state: &AppState) -> Vec<Notification> {
    state.core.notifications_drain()
}

fn route(state: &AppState, path: String) -> Route {
    state.core.route(&path)
}

fn arg<T: DeserializeOwned>(args: &Value, key: &str) -> Result<T, String> {
    let value = args.get(key).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|error| format!("invalid argument `{}`: {}", key, error))
}

fn respond<T: Serialize>(result: Result<T, String>) -> Result<Value, String> {
    result.and_then(|value| serde_json::to_value(value).map_err(to_client_error))
}

/// Dispatches one shell request. `args` is an object keyed by argument name.
pub async fn invoke(state: &AppState, cmd: &str, args: Value) -> Result<Value, String> {
    tracing::debug!(cmd = %cmd, "invoke");
    match cmd {
        "day_view" => respond(day_view(state)),
        "day_previous" => respond(day_previous(state)),
        "day_next" => respond(day_next(state)),
        "day_today" => respond(day_today(state)),
        "event_card" => respond(event_card(state, arg(&args, "eventId")?).await),
        "event_reveal_next" => respond(event_reveal_next(state, arg(&args, "eventId")?)),
        "suggestion_view" => respond(suggestion_view(
            state,
            arg(&args, "eventId")?,
            arg(&args, "suggestionId")?,
            arg::<Option<bool>>(&args, "expanded")?.unwrap_or(false),
        )),
        "tasks_list" => respond(tasks_list(state)),
        "task_add" => respond(task_add(state, arg(&args, "payload")?)),
        "task_quick_add" => respond(task_quick_add(state, arg(&args, "raw")?)),
        "task_update" => respond(task_update(state, arg(&args, "task")?)),
        "task_delete" => respond(task_delete(state, arg(&args, "taskId")?)),
        "task_toggle" => respond(task_toggle(state, arg(&args, "taskId")?)),
        "tasks_view" => respond(tasks_view(state, arg(&args, "tag")?)),
        "task_tags" => respond(task_tags(state)),
        "voice_state" => respond(voice_state(state)),
        "voice_toggle" => respond(voice_toggle(state)),
        "voice_result" => respond(voice_result(state, arg(&args, "transcript")?)),
        "voice_error" => respond(voice_error(state, arg(&args, "reason")?)),
        "voice_set_typed" => respond(voice_set_typed(state, arg(&args, "value")?)),
        "voice_submit" => respond(voice_submit(state)),
        "voice_submit_typed" => respond(voice_submit_typed(state)),
        "templates_search" => respond(templates_search(state, arg(&args, "query")?)),
        "mandate_form_render" => respond(mandate_form_render(state, arg(&args, "request")?)),
        "mandate_configure" => respond(mandate_configure(state, arg(&args, "payload")?)),
        "mandate_update" => respond(mandate_update(state, arg(&args, "payload")?)),
        "mandate_toggle" => respond(mandate_toggle(state, arg(&args, "mandateId")?)),
        "mandate_delete" => respond(mandate_delete(state, arg(&args, "mandateId")?)),
        "mandates_list" => respond(mandates_list(state)),
        "custom_mandate_view" => respond(custom_mandate_view(state)),
        "custom_mandate_update" => respond(custom_mandate_update(state, arg(&args, "msg")?)),
        "custom_mandate_submit" => respond(custom_mandate_submit(state)),
        "chat_view" => respond(chat_view(state)),
        "chat_send" => respond(chat_send(state, arg(&args, "input")?).await),
        "calendar_integrations" => respond(calendar_integrations(state)),
        "calendar_connect" => respond(calendar_connect(state, arg(&args, "provider")?).await),
        "calendar_disconnect" => respond(calendar_disconnect(state, arg(&args, "provider")?)),
        "calendar_sync" => respond(calendar_sync(state, arg(&args, "provider")?)),
        "notifications_list" => respond(Ok(notifications_list(state))),
        "notifications_dismiss" => respond(Ok(notifications_dismiss(state, arg(&args, "notificationId")?))),
        "notifications_drain" => respond(Ok(notifications_drain(state))),
        "route" => respond(Ok(route(state, arg(&args, "path")?))),
        other => Err(format!("unknown command `{}`", other)),
    }
}

#[derive(Debug, Deserialize)]
struct BridgeRequest {
    #[serde(default)]
    id: Option<Value>,
    cmd: String,
    #[serde(default)]
    args: Value,
}

/// Reads `{"cmd", "args"}` lines from stdin and answers each with one line on stdout.
async fn serve_stdio(state: &AppState) -> Result<(), String> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.map_err(to_client_error)? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<BridgeRequest>(&line) {
            Ok(request) => {
                let result = invoke(state, &request.cmd, request.args).await;
                if let Err(error) = &result {
                    tracing::warn!(cmd = %request.cmd, error = %error, "command failed");
                }
                match result {
                    Ok(value) => json!({ "id": request.id, "ok": value }),
                    Err(error) => json!({ "id": request.id, "error": error }),
                }
            }
            Err(error) => json!({ "error": format!("malformed request: {}", error) }),
        };
        let mut encoded = serde_json::to_vec(&reply).map_err(to_client_error)?;
        encoded.push(b'\n');
        stdout.write_all(&encoded).await.map_err(to_client_error)?;
        stdout.flush().await.map_err(to_client_error)?;
    }
    Ok(())
}

pub fn run() -> Result<(), String> {
    let config = AppConfig::load().map_err(to_client_error)?;
    init_tracing(config.log_dir.as_deref())?;

    let runtime = tokio::runtime::Runtime::new().map_err(to_client_error)?;
    runtime.block_on(async move {
        let state = AppState::new(config).map_err(to_client_error)?;
        state.core.start_clock().map_err(to_client_error)?;
        tracing::info!("mandate core ready");

        let served = serve_stdio(&state).await;
        if let Err(error) = state.core.stop_clock() {
            tracing::warn!(error = %error, "clock shutdown failed");
        }
        served
    })
}

fn init_tracing(log_dir: Option<&Path>) -> Result<(), String> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let Some(log_dir) = log_dir else {
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|error| error.to_string());
    };

    std::fs::create_dir_all(log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "mandate.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}

fn to_client_error(error: impl std::fmt::Display) -> String {
    error.to_string()
}
