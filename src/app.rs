use crate::calendar::{self, ClockIndicator, ClockMarker, DayHeader, DayView, TimeSlot, SLOT_HEIGHT_PX};
use crate::chat::{ChatInput, ChatMessage, ChatSession, ConversationState};
use crate::clock::MinuteTicker;
use crate::config::AppConfig;
use crate::db::LunchStore;
use crate::errors::{AppError, AppResult};
use crate::fixtures;
use crate::integrations::{CalendarIntegrations, ProviderLink, SimulatedLink};
use crate::lunch::{fetch_lunch_suggestions, EventCard, EventCardView, LunchSuggestionSource};
use crate::mandates::board::{MandateCard, TemplateCard};
use crate::mandates::custom::{WizardMsg, WizardView};
use crate::mandates::form::FormView;
use crate::mandates::{CustomMandateWizard, MandateBoard, MandateForm};
use crate::models::{
    CalendarIntegration, CalendarProvider, ConfigureMandatePayload, ConfiguredMandate, ConnectResponse,
    Event, NewTaskPayload, Suggestion, Task, TaskView, UpdateMandatePayload,
};
use crate::notifications::{Notification, Notifier};
use crate::router::Route;
use crate::suggestions::{CardView, ScrollRequest, SuggestionCard};
use crate::tasks::TaskBoard;
use crate::voice::{HostRecognizer, SpeechRecognizer, VoiceCapture, VoiceState};
use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> AppResult<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| AppError::Internal(format!("{} mutex poisoned", name)))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPage {
    pub header: DayHeader,
    pub slots: Vec<TimeSlot>,
    pub marker: Option<ClockMarker>,
    pub marker_top_px: Option<f64>,
    pub minute_ticks: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealResponse {
    pub suggestion: Option<Suggestion>,
    pub scroll: ScrollRequest,
    pub card: EventCardView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatView {
    pub state: ConversationState,
    pub messages: Vec<ChatMessage>,
}

/// Which form to render: a fresh one for a template or the edit form of a configured mandate.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "target", rename_all = "camelCase")]
pub enum FormRequest {
    Template { id: String },
    Mandate { id: String },
}

/// Releases the in-flight connect if the connect future is dropped before the handshake is applied.
struct PendingConnect<'a> {
    integrations: &'a Mutex<CalendarIntegrations>,
    provider: CalendarProvider,
    armed: bool,
}

impl PendingConnect<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PendingConnect<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut integrations) = self.integrations.lock() {
            integrations.cancel_connect(self.provider);
        }
    }
}

/// State behind every page of the app.
pub struct AppCore {
    config: AppConfig,
    notifier: Notifier,
    tasks: Mutex<TaskBoard>,
    voice: Mutex<VoiceCapture>,
    mandates: Mutex<MandateBoard>,
    wizard: Mutex<CustomMandateWizard>,
    chat: Mutex<ChatSession>,
    integrations: Mutex<CalendarIntegrations>,
    link: Arc<dyn ProviderLink>,
    day: Mutex<DayView>,
    events: Vec<Event>,
    cards: Mutex<HashMap<String, EventCard>>,
    lunch_source: Arc<dyn LunchSuggestionSource>,
    clock: ClockIndicator,
    minute_ticks: AtomicU64,
    ticker: Mutex<Option<MinuteTicker>>,
}

impl AppCore {
    /// Opens the configured lunch store, or seeds an in-memory one with demo rows.
    pub fn new(config: AppConfig) -> AppResult<Arc<Self>> {
        let lunch_source: Arc<dyn LunchSuggestionSource> = match config.lunch_store_path.as_deref() {
            Some(path) => Arc::new(LunchStore::open(path)?),
            None => {
                let store = LunchStore::in_memory()?;
                let seeded = store.seed(&fixtures::demo_lunch_rows(Utc::now()))?;
                tracing::info!(rows = seeded, "seeded in-memory lunch store");
                Arc::new(store)
            }
        };
        Ok(Self::with_parts(config, lunch_source, Arc::new(SimulatedLink)))
    }

    pub fn with_parts(
        config: AppConfig,
        lunch_source: Arc<dyn LunchSuggestionSource>,
        link: Arc<dyn ProviderLink>,
    ) -> Arc<Self> {
        let recognizer: Option<Box<dyn SpeechRecognizer>> = if config.speech_recognition {
            Some(Box::new(HostRecognizer::default()))
        } else {
            None
        };
        let events = fixtures::day_events();
        let cards = events
            .iter()
            .map(|event| (event.id.clone(), EventCard::new(event.clone())))
            .collect();

        Arc::new(Self {
            clock: ClockIndicator::from(config.clock_mode),
            notifier: Notifier::new(),
            tasks: Mutex::new(TaskBoard::new(fixtures::starter_tasks())),
            voice: Mutex::new(VoiceCapture::new(recognizer)),
            mandates: Mutex::new(MandateBoard::new(
                fixtures::mandate_templates(),
                fixtures::configured_mandates(Utc::now()),
            )),
            wizard: Mutex::new(CustomMandateWizard::default()),
            chat: Mutex::new(ChatSession::default()),
            integrations: Mutex::new(CalendarIntegrations::default()),
            link,
            day: Mutex::new(DayView::new(today())),
            events,
            cards: Mutex::new(cards),
            lunch_source,
            minute_ticks: AtomicU64::new(0),
            ticker: Mutex::new(None),
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    // ─── Clock ────────────────────────────────────────────────────────────

    /// Starts the periodic re-render tick. Must run inside a tokio runtime.
    pub fn start_clock(self: &Arc<Self>) -> AppResult<()> {
        let core = Arc::downgrade(self);
        let ticker = MinuteTicker::spawn(Duration::from_secs(self.config.clock_tick_secs), move || {
            if let Some(core) = core.upgrade() {
                let ticks = core.minute_ticks.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::debug!(ticks, "clock tick");
            }
        });
        *lock(&self.ticker, "ticker")? = Some(ticker);
        Ok(())
    }

    pub fn stop_clock(&self) -> AppResult<bool> {
        Ok(lock(&self.ticker, "ticker")?.take().is_some())
    }

    // ─── Day view ─────────────────────────────────────────────────────────

    fn day_page(&self, view: &DayView) -> DayPage {
        let now = Local::now().time();
        let marker = self.clock.marker(now);
        DayPage {
            header: view.header(today()),
            slots: calendar::slots(&self.events),
            marker_top_px: marker.as_ref().map(|marker| marker.top_px(SLOT_HEIGHT_PX)),
            marker,
            minute_ticks: self.minute_ticks.load(Ordering::Relaxed),
        }
    }

    pub fn day_view(&self) -> AppResult<DayPage> {
        let day = lock(&self.day, "day")?;
        Ok(self.day_page(&day))
    }

    pub fn day_previous(&self) -> AppResult<DayPage> {
        let mut day = lock(&self.day, "day")?;
        day.previous();
        Ok(self.day_page(&day))
    }

    pub fn day_next(&self) -> AppResult<DayPage> {
        let mut day = lock(&self.day, "day")?;
        day.next();
        Ok(self.day_page(&day))
    }

    pub fn day_today(&self) -> AppResult<DayPage> {
        let mut day = lock(&self.day, "day")?;
        day.today(today());
        Ok(self.day_page(&day))
    }

    // ─── Event cards ──────────────────────────────────────────────────────

    /// Returns the card, running its lunch fetch the first time it is asked for.
    pub async fn event_card(&self, event_id: &str) -> AppResult<EventCardView> {
        let claimed = {
            let mut cards = lock(&self.cards, "cards")?;
            let card = cards
                .get_mut(event_id)
                .ok_or_else(|| AppError::NotFound(format!("event {}", event_id)))?;
            card.claim_lunch_fetch()
        };

        if claimed {
            tracing::info!(event_id = %event_id, "fetching lunch suggestions");
            let result =
                fetch_lunch_suggestions(self.lunch_source.clone(), self.config.lunch_fetch_limit).await;
            let mut cards = lock(&self.cards, "cards")?;
            if let Some(card) = cards.get_mut(event_id) {
                card.resolve_lunch(result, &self.notifier);
            }
        }

        let cards = lock(&self.cards, "cards")?;
        cards
            .get(event_id)
            .map(EventCard::view)
            .ok_or_else(|| AppError::NotFound(format!("event {}", event_id)))
    }

    pub fn event_reveal_next(&self, event_id: &str) -> AppResult<RevealResponse> {
        let mut cards = lock(&self.cards, "cards")?;
        let card = cards
            .get_mut(event_id)
            .ok_or_else(|| AppError::NotFound(format!("event {}", event_id)))?;
        let suggestion = card.reveal_next();
        Ok(RevealResponse {
            suggestion,
            scroll: card.take_scroll(),
            card: card.view(),
        })
    }

    pub fn suggestion_view(&self, event_id: &str, suggestion_id: &str, expanded: bool) -> AppResult<CardView> {
        let cards = lock(&self.cards, "cards")?;
        let suggestion = cards
            .get(event_id)
            .ok_or_else(|| AppError::NotFound(format!("event {}", event_id)))?
            .suggestion(suggestion_id)
            .ok_or_else(|| AppError::NotFound(format!("suggestion {}", suggestion_id)))?
            .clone();
        let mut card = SuggestionCard::new(suggestion);
        if expanded {
            card.toggle();
        }
        Ok(card.view())
    }

    // ─── Tasks ────────────────────────────────────────────────────────────

    pub fn tasks_list(&self) -> AppResult<Vec<Task>> {
        Ok(lock(&self.tasks, "tasks")?.list().to_vec())
    }

    pub fn task_add(&self, payload: NewTaskPayload) -> AppResult<Task> {
        lock(&self.tasks, "tasks")?.add(payload, &self.notifier)
    }

    pub fn task_quick_add(&self, raw: &str) -> AppResult<Task> {
        lock(&self.tasks, "tasks")?.quick_add(raw, &self.notifier)
    }

    pub fn task_update(&self, task: Task) -> AppResult<Task> {
        lock(&self.tasks, "tasks")?.edit(task, &self.notifier)
    }

    pub fn task_delete(&self, id: &str) -> AppResult<Task> {
        lock(&self.tasks, "tasks")?.delete(id, &self.notifier)
    }

    pub fn task_toggle(&self, id: &str) -> AppResult<Task> {
        lock(&self.tasks, "tasks")?.toggle_complete(id, &self.notifier)
    }

    pub fn tasks_view(&self, tag: Option<&str>) -> AppResult<TaskView> {
        Ok(lock(&self.tasks, "tasks")?.view(tag))
    }

    pub fn task_tags(&self) -> AppResult<Vec<String>> {
        Ok(lock(&self.tasks, "tasks")?.all_tags())
    }

    // ─── Voice ────────────────────────────────────────────────────────────

    pub fn voice_state(&self) -> AppResult<VoiceState> {
        Ok(lock(&self.voice, "voice")?.state())
    }

    pub fn voice_toggle(&self) -> AppResult<VoiceState> {
        Ok(lock(&self.voice, "voice")?.toggle_listening(&self.notifier))
    }

    pub fn voice_result(&self, transcript: &str) -> AppResult<VoiceState> {
        let mut voice = lock(&self.voice, "voice")?;
        voice.on_result(transcript);
        Ok(voice.state())
    }

    pub fn voice_error(&self, reason: &str) -> AppResult<VoiceState> {
        let mut voice = lock(&self.voice, "voice")?;
        voice.on_error(reason, &self.notifier);
        Ok(voice.state())
    }

    pub fn voice_set_typed(&self, value: &str) -> AppResult<VoiceState> {
        let mut voice = lock(&self.voice, "voice")?;
        voice.set_typed(value);
        Ok(voice.state())
    }

    pub fn voice_submit(&self) -> AppResult<Task> {
        let mut voice = lock(&self.voice, "voice")?;
        let mut tasks = lock(&self.tasks, "tasks")?;
        voice.submit(&mut tasks, &self.notifier)
    }

    pub fn voice_submit_typed(&self) -> AppResult<Task> {
        let mut voice = lock(&self.voice, "voice")?;
        let mut tasks = lock(&self.tasks, "tasks")?;
        voice.submit_typed(&mut tasks, &self.notifier)
    }

    // ─── Mandates ─────────────────────────────────────────────────────────

    pub fn templates_search(&self, query: &str) -> AppResult<Vec<TemplateCard>> {
        Ok(lock(&self.mandates, "mandates")?.search(query))
    }

    pub fn mandate_form_render(&self, request: &FormRequest) -> AppResult<FormView> {
        let board = lock(&self.mandates, "mandates")?;
        let form = match request {
            FormRequest::Template { id } => MandateForm::for_template(board.template(id)?),
            FormRequest::Mandate { id } => MandateForm::for_mandate(board.get(id)?),
        };
        Ok(form.render())
    }

    pub fn mandate_configure(&self, payload: ConfigureMandatePayload) -> AppResult<ConfiguredMandate> {
        let mut board = lock(&self.mandates, "mandates")?;
        let mut form = MandateForm::for_template(board.template(&payload.template_id)?);
        form.apply_values(payload.values)?;
        if let Some(frequency) = payload.frequency {
            form.set_frequency(frequency);
        }
        if let Some(time) = payload.time_of_day.as_deref() {
            form.set_time_of_day(time);
        }
        let mandate = form.submit()?;
        Ok(board.add(mandate, &self.notifier))
    }

    pub fn mandate_update(&self, payload: UpdateMandatePayload) -> AppResult<ConfiguredMandate> {
        let mut board = lock(&self.mandates, "mandates")?;
        let mut form = MandateForm::for_mandate(board.get(&payload.id)?);
        form.apply_values(payload.values)?;
        if let Some(frequency) = payload.frequency {
            form.set_frequency(frequency);
        }
        if let Some(time) = payload.time_of_day.as_deref() {
            form.set_time_of_day(time);
        }
        let updated = form.submit()?;
        board.update(updated, &self.notifier)
    }

    pub fn mandate_toggle(&self, id: &str) -> AppResult<ConfiguredMandate> {
        lock(&self.mandates, "mandates")?.toggle_active(id, &self.notifier)
    }

    pub fn mandate_delete(&self, id: &str) -> AppResult<ConfiguredMandate> {
        lock(&self.mandates, "mandates")?.delete(id, &self.notifier)
    }

    pub fn mandates_list(&self) -> AppResult<Vec<MandateCard>> {
        Ok(lock(&self.mandates, "mandates")?.cards(Utc::now()))
    }

    pub fn custom_mandate_view(&self) -> AppResult<WizardView> {
        Ok(lock(&self.wizard, "wizard")?.view())
    }

    pub fn custom_mandate_update(&self, msg: WizardMsg) -> AppResult<WizardView> {
        let mut wizard = lock(&self.wizard, "wizard")?;
        wizard.update(msg)?;
        Ok(wizard.view())
    }

    pub fn custom_mandate_submit(&self) -> AppResult<ConfiguredMandate> {
        let mandate = lock(&self.wizard, "wizard")?.submit(&self.notifier)?;
        lock(&self.mandates, "mandates")?.insert(mandate.clone());
        Ok(mandate)
    }

    // ─── Chat ─────────────────────────────────────────────────────────────

    pub fn chat_view(&self) -> AppResult<ChatView> {
        let chat = lock(&self.chat, "chat")?;
        Ok(ChatView {
            state: chat.state(),
            messages: chat.messages().to_vec(),
        })
    }

    /// Records the user turn and delivers the bot replies one by one after the reply delay.
    pub async fn chat_send(&self, input: ChatInput) -> AppResult<Vec<ChatMessage>> {
        let replies = lock(&self.chat, "chat")?.accept(input);
        let delay = Duration::from_millis(self.config.chat_reply_delay_ms);
        let mut delivered = Vec::with_capacity(replies.len());
        for reply in replies {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            delivered.push(lock(&self.chat, "chat")?.deliver(reply));
        }
        Ok(delivered)
    }

    // ─── Calendar providers ───────────────────────────────────────────────

    pub fn calendar_integrations(&self) -> AppResult<Vec<CalendarIntegration>> {
        Ok(lock(&self.integrations, "integrations")?.list().to_vec())
    }

    /// Simulated connect; imported tasks land at the top of the task list.
    pub async fn calendar_connect(&self, provider: CalendarProvider) -> AppResult<ConnectResponse> {
        lock(&self.integrations, "integrations")?.begin_connect(provider)?;
        let mut pending = PendingConnect {
            integrations: &self.integrations,
            provider,
            armed: true,
        };
        let delay = Duration::from_millis(self.config.calendar_connect_delay_ms);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.link.handshake(provider);
        let finished = lock(&self.integrations, "integrations")?.finish_connect(
            provider,
            outcome,
            Utc::now(),
            &self.notifier,
        );
        pending.disarm();
        let response = finished?;
        if !response.imported.is_empty() {
            lock(&self.tasks, "tasks")?.import(response.imported.clone(), &self.notifier);
        }
        Ok(response)
    }

    pub fn calendar_disconnect(&self, provider: CalendarProvider) -> AppResult<CalendarIntegration> {
        lock(&self.integrations, "integrations")?.disconnect(provider, &self.notifier)
    }

    pub fn calendar_sync(&self, provider: CalendarProvider) -> AppResult<CalendarIntegration> {
        lock(&self.integrations, "integrations")?.sync(provider, Utc::now(), &self.notifier)
    }

    // ─── Notifications and routing ────────────────────────────────────────

    pub fn notifications_list(&self) -> Vec<Notification> {
        self.notifier.pending()
    }

    pub fn notifications_dismiss(&self, id: &str) -> bool {
        self.notifier.dismiss(id)
    }

    pub fn notifications_drain(&self) -> Vec<Notification> {
        self.notifier.drain()
    }

    pub fn route(&self, path: &str) -> Route {
        Route::resolve(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCore, FormRequest};
    use crate::chat::{ChatInput, CHIP_ACCEPT};
    use crate::config::AppConfig;
    use crate::db::LunchStore;
    use crate::errors::AppError;
    use crate::fixtures::demo_lunch_rows;
    use crate::integrations::{ProviderLink, SimulatedLink};
    use crate::lunch::PanelView;
    use crate::models::{CalendarProvider, ConfigureMandatePayload, FieldValue};
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn quiet_config() -> AppConfig {
        AppConfig {
            calendar_connect_delay_ms: 0,
            chat_reply_delay_ms: 0,
            ..AppConfig::default()
        }
    }

    fn core() -> Arc<AppCore> {
        let store = LunchStore::in_memory().expect("store");
        store.seed(&demo_lunch_rows(Utc::now())).expect("seed");
        AppCore::with_parts(quiet_config(), Arc::new(store), Arc::new(SimulatedLink))
    }

    struct BrokenLink;

    impl ProviderLink for BrokenLink {
        fn handshake(&self, _provider: CalendarProvider) -> anyhow::Result<()> {
            anyhow::bail!("provider unreachable")
        }
    }

    #[tokio::test]
    async fn lunch_card_loads_newest_rows_once() {
        let core = core();
        let view = core.event_card("event-6").await.expect("card");
        match view.panel {
            PanelView::Ready { visible, has_more } => {
                assert_eq!(visible[0].id, "lunch-3");
                assert!(has_more);
            }
            other => panic!("unexpected panel {:?}", other),
        }
        let reveal = core.event_reveal_next("event-6").expect("reveal");
        assert_eq!(reveal.suggestion.map(|s| s.id), Some("lunch-2".to_string()));
    }

    #[tokio::test]
    async fn google_connect_imports_tasks_into_board() {
        let core = core();
        let before = core.tasks_list().expect("tasks").len();
        let response = core
            .calendar_connect(CalendarProvider::Google)
            .await
            .expect("connect");
        assert_eq!(response.imported.len(), 2);
        let tasks = core.tasks_list().expect("tasks");
        assert_eq!(tasks.len(), before + 2);
        assert_eq!(tasks[0].title, "Weekly Team Meeting");
    }

    #[tokio::test]
    async fn failed_connect_keeps_integrations_and_tasks() {
        let core = AppCore::with_parts(
            quiet_config(),
            Arc::new(LunchStore::in_memory().expect("store")),
            Arc::new(BrokenLink),
        );
        let result = core.calendar_connect(CalendarProvider::Google).await;
        assert!(matches!(result, Err(AppError::Integration(_))));
        assert!(core
            .calendar_integrations()
            .expect("list")
            .iter()
            .all(|integration| !integration.connected));
        assert_eq!(core.tasks_list().expect("tasks").len(), 8);
    }

    #[tokio::test]
    async fn dropped_connect_does_not_block_the_next_one() {
        let core = AppCore::with_parts(
            AppConfig {
                calendar_connect_delay_ms: 20,
                ..quiet_config()
            },
            Arc::new(LunchStore::in_memory().expect("store")),
            Arc::new(SimulatedLink),
        );
        let abandoned = tokio::time::timeout(
            std::time::Duration::from_millis(1),
            core.calendar_connect(CalendarProvider::Outlook),
        )
        .await;
        assert!(abandoned.is_err());

        let response = core
            .calendar_connect(CalendarProvider::Outlook)
            .await
            .expect("connect after drop");
        assert!(response.integration.connected);
    }

    #[tokio::test]
    async fn chat_accept_chip_delivers_two_messages() {
        let core = core();
        let delivered = core
            .chat_send(ChatInput::Chip(CHIP_ACCEPT.to_string()))
            .await
            .expect("send");
        assert_eq!(delivered.len(), 2);
        assert_eq!(core.chat_view().expect("view").messages.len(), 4);
    }

    #[test]
    fn configure_rejects_incomplete_form_without_adding() {
        let core = core();
        let payload = ConfigureMandatePayload {
            template_id: "travel-planner".to_string(),
            values: BTreeMap::from([("home-address".to_string(), FieldValue::text("1 Elm"))]),
            frequency: None,
            time_of_day: None,
        };
        let error = core.mandate_configure(payload).expect_err("incomplete");
        assert!(error.field_errors().is_some());
        assert_eq!(core.mandates_list().expect("list").len(), 1);

        let view = core
            .mandate_form_render(&FormRequest::Template {
                id: "travel-planner".to_string(),
            })
            .expect("render");
        assert_eq!(view.fields.len(), 4);
    }

    #[test]
    fn quick_add_and_voice_share_the_board() {
        let core = core();
        core.task_quick_add("Water plants - balcony only").expect("quick add");
        let tasks = core.tasks_list().expect("tasks");
        assert_eq!(tasks[0].title, "Water plants");
        assert_eq!(tasks[0].description.as_deref(), Some("balcony only"));

        let state = core.voice_toggle().expect("toggle");
        assert!(!state.supported);
        assert_eq!(
            core.notifier().last_message().as_deref(),
            Some("Speech recognition is not supported in your browser")
        );
    }
}
