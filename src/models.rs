use crate::mandates::icons::IconName;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ─── Calendar ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventCategory {
    Meeting,
    Travel,
    Reminder,
    Errand,
    Goal,
    Routine,
    Lunch,
    Focus,
    Other,
}

impl EventCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::Travel => "travel",
            Self::Reminder => "reminder",
            Self::Errand => "errand",
            Self::Goal => "goal",
            Self::Routine => "routine",
            Self::Lunch => "lunch",
            Self::Focus => "focus",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "meeting" => Some(Self::Meeting),
            "travel" => Some(Self::Travel),
            "reminder" => Some(Self::Reminder),
            "errand" => Some(Self::Errand),
            "goal" => Some(Self::Goal),
            "routine" => Some(Self::Routine),
            "lunch" => Some(Self::Lunch),
            "focus" => Some(Self::Focus),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub time: String,
    pub hour_index: u8,
    #[serde(default)]
    pub category: Option<EventCategory>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

impl Event {
    pub fn is_lunch(&self) -> bool {
        self.category == Some(EventCategory::Lunch) || self.title.to_lowercase().contains("lunch")
    }
}

// ─── Suggestions ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Text,
    Image,
    Graph,
    Link,
    News,
    FoodOrder,
    Recipe,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Graph => "graph",
            Self::Link => "link",
            Self::News => "news",
            Self::FoodOrder => "food-order",
            Self::Recipe => "recipe",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "graph" => Some(Self::Graph),
            "link" => Some(Self::Link),
            "news" => Some(Self::News),
            "food-order" | "order" => Some(Self::FoodOrder),
            "recipe" => Some(Self::Recipe),
            _ => None,
        }
    }
}

/// Which expandable detail block a suggestion card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetailKind {
    FoodOrder,
    Recipe,
    Route,
    Meeting,
    EventTicket,
    Document,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub source: String,
    #[serde(default)]
    pub attribution: Option<String>,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Order/recipe payload carried by suggestions built from lunch rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LunchDetails {
    pub price: Option<String>,
    pub delivery_time: Option<String>,
    pub restaurant: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub chart_data: Option<ChartData>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub content: Vec<NewsItem>,
    #[serde(default)]
    pub detail: Option<DetailKind>,
    #[serde(default)]
    pub order: Option<LunchDetails>,
}

impl Suggestion {
    pub fn text(id: &str, title: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: ContentType::Text,
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            image_url: None,
            link_url: None,
            chart_data: None,
            source: None,
            date: None,
            content: Vec::new(),
            detail: None,
            order: None,
        }
    }

    pub fn is_news(&self) -> bool {
        self.kind == ContentType::News
    }
}

// ─── Tasks ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskPayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuickEntry {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub filter_tag: Option<String>,
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
    pub total: usize,
}

// ─── Mandates ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MandateType {
    Travel,
    Meeting,
    News,
    Weather,
    Task,
    Research,
    Custom,
}

impl MandateType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Travel => "travel",
            Self::Meeting => "meeting",
            Self::News => "news",
            Self::Weather => "weather",
            Self::Task => "task",
            Self::Research => "research",
            Self::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    Select,
    Time,
    Date,
    Location,
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }

    /// Blank text and an unset flag both count as missing.
    pub fn is_filled(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Text(text) => !text.trim().is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Flag(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MandateField {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    pub required: bool,
    #[serde(default)]
    pub value: Option<FieldValue>,
}

impl MandateField {
    pub fn is_filled(&self) -> bool {
        self.value.as_ref().is_some_and(FieldValue::is_filled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MandateTemplate {
    pub id: String,
    #[serde(rename = "type")]
    pub mandate_type: MandateType,
    pub name: String,
    pub description: String,
    pub icon: IconName,
    pub fields: Vec<MandateField>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
    OnDemand,
}

impl Frequency {
    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::OnDemand => "on demand",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredMandate {
    pub id: String,
    pub template_id: String,
    #[serde(rename = "type")]
    pub mandate_type: MandateType,
    pub name: String,
    pub description: String,
    pub icon: IconName,
    pub fields: Vec<MandateField>,
    pub is_active: bool,
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    pub frequency: Frequency,
    #[serde(default)]
    pub time_of_day: Option<String>,
    #[serde(default)]
    pub days_of_week: Vec<String>,
}

impl ConfiguredMandate {
    pub fn field(&self, label: &str) -> Option<&MandateField> {
        self.fields.iter().find(|field| field.label == label)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureMandatePayload {
    pub template_id: String,
    #[serde(default)]
    pub values: std::collections::BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    #[serde(default)]
    pub time_of_day: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMandatePayload {
    pub id: String,
    #[serde(default)]
    pub values: std::collections::BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    #[serde(default)]
    pub time_of_day: Option<String>,
}

// ─── Calendar providers ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarProvider {
    Google,
    Outlook,
    Apple,
}

impl CalendarProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Outlook => "outlook",
            Self::Apple => "apple",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Google Calendar",
            Self::Outlook => "Outlook Calendar",
            Self::Apple => "Apple Calendar",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarIntegration {
    pub id: String,
    #[serde(rename = "type")]
    pub provider: CalendarProvider,
    pub connected: bool,
    #[serde(default)]
    pub last_synced: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub integration: CalendarIntegration,
    pub imported: Vec<Task>,
}

// ─── Misc responses ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanResponse {
    pub success: bool,
}
