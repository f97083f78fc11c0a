use crate::calendar::{category_style, CategoryStyle};
use crate::errors::{AppError, AppResult};
use crate::models::{ContentType, DetailKind, Event, LunchDetails, Suggestion};
use crate::notifications::Notifier;
use crate::suggestions::{classify_detail, ScrollRequest, SuggestionCarousel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_LUNCH_TITLE: &str = "Lunch suggestion";
pub const DEFAULT_LUNCH_DESCRIPTION: &str = "No description available";
pub const EMPTY_LUNCH_MESSAGE: &str = "No lunch suggestions yet. Check back closer to lunchtime.";
const FETCH_FAILED_MESSAGE: &str = "Failed to load lunch suggestions";

/// One row of the hosted lunch-suggestions collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LunchRow {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub delivery_time: Option<String>,
    pub restaurant: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Newest-first read over the lunch collection.
pub trait LunchSuggestionSource: Send + Sync {
    fn recent(&self, limit: usize) -> AppResult<Vec<LunchRow>>;
}

pub fn row_to_suggestion(row: LunchRow) -> Suggestion {
    let kind = row
        .kind
        .as_deref()
        .and_then(ContentType::parse)
        .unwrap_or(ContentType::FoodOrder);
    let title = row.title.unwrap_or_else(|| DEFAULT_LUNCH_TITLE.to_string());
    let description = row
        .description
        .unwrap_or_else(|| DEFAULT_LUNCH_DESCRIPTION.to_string());
    let detail = match kind {
        ContentType::FoodOrder => Some(DetailKind::FoodOrder),
        ContentType::Recipe => Some(DetailKind::Recipe),
        _ => classify_detail(Some(&title), Some(&description)),
    };

    Suggestion {
        id: row.id,
        kind,
        title: Some(title),
        description: Some(description),
        image_url: row.image_url,
        link_url: None,
        chart_data: None,
        source: row.restaurant.clone(),
        date: Some(row.created_at.to_rfc3339()),
        content: Vec::new(),
        detail,
        order: Some(LunchDetails {
            price: row.price,
            delivery_time: row.delivery_time,
            restaurant: row.restaurant,
            ingredients: row.ingredients,
            instructions: row.instructions,
        }),
    }
}

/// Runs the read on the blocking pool; the SQLite call must not stall the runtime.
pub async fn fetch_lunch_suggestions(
    source: Arc<dyn LunchSuggestionSource>,
    limit: usize,
) -> AppResult<Vec<Suggestion>> {
    let rows = tokio::task::spawn_blocking(move || source.recent(limit))
        .await
        .map_err(|error| AppError::Internal(error.to_string()))??;
    Ok(rows.into_iter().map(row_to_suggestion).collect())
}

#[derive(Debug, Clone)]
pub enum SuggestionPanel {
    Ready(SuggestionCarousel),
    Loading,
    Loaded(SuggestionCarousel),
    Empty,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum PanelView {
    Ready {
        visible: Vec<Suggestion>,
        #[serde(rename = "hasMore")]
        has_more: bool,
    },
    Loading,
    Empty {
        message: String,
    },
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCardView {
    pub event_id: String,
    pub title: String,
    pub time: String,
    pub style: CategoryStyle,
    pub panel: PanelView,
}

/// An event row with its style and suggestion panel.
#[derive(Debug, Clone)]
pub struct EventCard {
    event: Event,
    style: CategoryStyle,
    panel: SuggestionPanel,
    fetch_claimed: bool,
}

impl EventCard {
    pub fn new(event: Event) -> Self {
        let style = category_style(event.category);
        let panel = if event.is_lunch() {
            SuggestionPanel::Loading
        } else {
            SuggestionPanel::Ready(SuggestionCarousel::new(event.suggestions.clone().into()))
        };
        Self {
            event,
            style,
            panel,
            fetch_claimed: false,
        }
    }

    pub fn wants_lunch_fetch(&self) -> bool {
        matches!(self.panel, SuggestionPanel::Loading)
    }

    /// True for exactly one caller while the card is loading.
    pub fn claim_lunch_fetch(&mut self) -> bool {
        if !self.wants_lunch_fetch() || self.fetch_claimed {
            return false;
        }
        self.fetch_claimed = true;
        true
    }

    pub fn suggestion(&self, id: &str) -> Option<&Suggestion> {
        self.event.suggestions.iter().find(|suggestion| suggestion.id == id)
    }

    /// Applies a finished fetch. Ignored unless the card is still loading.
    pub fn resolve_lunch(&mut self, result: AppResult<Vec<Suggestion>>, notifier: &Notifier) {
        if !self.wants_lunch_fetch() {
            return;
        }
        self.panel = match result {
            Ok(suggestions) if suggestions.is_empty() => SuggestionPanel::Empty,
            Ok(suggestions) => {
                tracing::info!(event_id = %self.event.id, count = suggestions.len(), "lunch suggestions loaded");
                self.event.suggestions = suggestions.clone();
                SuggestionPanel::Loaded(SuggestionCarousel::new(suggestions.into()))
            }
            Err(error) => {
                tracing::warn!(event_id = %self.event.id, error = %error, "lunch suggestion fetch failed");
                notifier.error(FETCH_FAILED_MESSAGE);
                SuggestionPanel::Failed
            }
        };
    }

    pub fn panel(&self) -> &SuggestionPanel {
        &self.panel
    }

    pub fn reveal_next(&mut self) -> Option<Suggestion> {
        match &mut self.panel {
            SuggestionPanel::Ready(carousel) | SuggestionPanel::Loaded(carousel) => {
                carousel.reveal_next().cloned()
            }
            _ => None,
        }
    }

    pub fn take_scroll(&mut self) -> ScrollRequest {
        match &mut self.panel {
            SuggestionPanel::Ready(carousel) | SuggestionPanel::Loaded(carousel) => carousel.take_scroll(),
            _ => ScrollRequest::None,
        }
    }

    pub fn view(&self) -> EventCardView {
        let panel = match &self.panel {
            SuggestionPanel::Ready(carousel) | SuggestionPanel::Loaded(carousel) => PanelView::Ready {
                visible: carousel.visible().to_vec(),
                has_more: carousel.has_more(),
            },
            SuggestionPanel::Loading => PanelView::Loading,
            SuggestionPanel::Empty => PanelView::Empty {
                message: EMPTY_LUNCH_MESSAGE.to_string(),
            },
            SuggestionPanel::Failed => PanelView::Failed,
        };
        EventCardView {
            event_id: self.event.id.clone(),
            title: self.event.title.clone(),
            time: self.event.time.clone(),
            style: self.style,
            panel,
        }
    }
}
