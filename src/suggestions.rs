use crate::models::{ChartData, DetailKind, NewsItem, Suggestion};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;

static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\d+(?:\.\d{2})?").expect("valid price regex"));
static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*mins?\b").expect("valid duration regex"));

const FOOD_WORDS: &[&str] = &["order", "delivery", "menu", "restaurant", "takeaway", "breakfast spot"];
const RECIPE_WORDS: &[&str] = &["recipe", "ingredients", "cook", "smoothie", "oatmeal", "bake"];
const ROUTE_WORDS: &[&str] = &["route", "traffic", "tube", "overground", "train", "commute", "delays", "drive"];
const MEETING_WORDS: &[&str] = &["meeting", "agenda", "call with", "notes", "standup", "review"];
const TICKET_WORDS: &[&str] = &["ticket", "flight", "airlines", "concert", "booking", "gig"];
const DOCUMENT_WORDS: &[&str] = &["document", "email", "report", "slides", "pdf", "contract"];

/// Infers the detail block from free text. Only called when a suggestion is created;
/// cards read the stored `Suggestion::detail`.
pub fn classify_detail(title: Option<&str>, description: Option<&str>) -> Option<DetailKind> {
    let title = title.unwrap_or_default().to_lowercase();
    let description = description.unwrap_or_default().to_lowercase();
    let text = format!("{}\n{}", title, description);
    let any = |words: &[&str]| words.iter().any(|word| text.contains(word));

    if title.contains(" from ") || any(FOOD_WORDS) {
        Some(DetailKind::FoodOrder)
    } else if any(RECIPE_WORDS) {
        Some(DetailKind::Recipe)
    } else if any(ROUTE_WORDS) {
        Some(DetailKind::Route)
    } else if any(MEETING_WORDS) {
        Some(DetailKind::Meeting)
    } else if any(TICKET_WORDS) {
        Some(DetailKind::EventTicket)
    } else if any(DOCUMENT_WORDS) {
        Some(DetailKind::Document)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DetailPanel {
    #[serde(rename_all = "camelCase")]
    FoodOrder {
        price: String,
        delivery_time: String,
        restaurant: String,
        action_label: String,
    },
    Recipe {
        ingredients: Vec<String>,
        instructions: String,
    },
    #[serde(rename_all = "camelCase")]
    Route {
        duration: String,
        service_status: String,
        steps: Vec<String>,
    },
    Meeting {
        participants: Vec<String>,
        agenda: Vec<String>,
    },
    EventTicket {
        headline: String,
        price: String,
        seat: String,
    },
    #[serde(rename_all = "camelCase")]
    Document {
        file_name: String,
        pages: u32,
        updated: String,
    },
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

pub fn detail_panel(suggestion: &Suggestion) -> Option<DetailPanel> {
    let kind = suggestion.detail?;
    let title = suggestion.title.as_deref().unwrap_or_default();
    let lowered = title.to_lowercase();
    let description = suggestion.description.as_deref().unwrap_or_default();
    let order = suggestion.order.as_ref();

    let panel = match kind {
        DetailKind::FoodOrder => {
            let canned_price = if lowered.contains("pancakes") {
                "$12.99"
            } else if lowered.contains("bagel") {
                "$7.50"
            } else if lowered.contains("coffee") {
                "$5.25"
            } else {
                "$10.99"
            };
            let canned_restaurant = title
                .split_once(" from ")
                .map(|(_, place)| place.trim().to_string())
                .unwrap_or_else(|| "Local kitchen".to_string());
            DetailPanel::FoodOrder {
                price: order
                    .and_then(|details| details.price.clone())
                    .unwrap_or_else(|| canned_price.to_string()),
                delivery_time: order
                    .and_then(|details| details.delivery_time.clone())
                    .unwrap_or_else(|| "15-25 min".to_string()),
                restaurant: order
                    .and_then(|details| details.restaurant.clone())
                    .unwrap_or(canned_restaurant),
                action_label: "Place Order".to_string(),
            }
        }
        DetailKind::Recipe => {
            let (ingredients, instructions) = if lowered.contains("smoothie") {
                (
                    strings(&[
                        "1 frozen banana",
                        "1/2 cup frozen berries",
                        "1 cup almond milk",
                        "1 tbsp chia seeds",
                        "1/4 cup granola",
                    ]),
                    "Blend all ingredients except granola until smooth. Pour into bowl and top with granola.",
                )
            } else if lowered.contains("oatmeal") {
                (
                    strings(&["1 cup rolled oats", "2 cups milk", "1 tbsp honey", "Cinnamon to taste", "Fresh fruits"]),
                    "Cook oats with milk for 5 minutes. Stir in honey and cinnamon. Top with fresh fruits.",
                )
            } else {
                (
                    strings(&["2 eggs", "1/4 cup milk", "Salt and pepper", "Vegetables of choice", "1/4 cup cheese"]),
                    "Whisk eggs and milk. Cook in a pan on medium heat. Add vegetables and cheese. Fold and serve.",
                )
            };
            match order.filter(|details| !details.ingredients.is_empty()) {
                Some(details) => DetailPanel::Recipe {
                    ingredients: details.ingredients.clone(),
                    instructions: details
                        .instructions
                        .clone()
                        .unwrap_or_else(|| instructions.to_string()),
                },
                None => DetailPanel::Recipe {
                    ingredients,
                    instructions: instructions.to_string(),
                },
            }
        }
        DetailKind::Route => {
            let duration = DURATION_RE
                .captures(title)
                .and_then(|caps| caps.get(1))
                .map(|minutes| format!("{} min", minutes.as_str()))
                .unwrap_or_else(|| "25 min".to_string());
            let service_status = if description.to_lowercase().contains("delay") {
                "Minor delays"
            } else {
                "Good service"
            };
            DetailPanel::Route {
                duration,
                service_status: service_status.to_string(),
                steps: strings(&["Walk to the station (5 min)", "Ride to your stop", "Walk to the office (3 min)"]),
            }
        }
        DetailKind::Meeting => {
            let participants = if lowered.contains("team") || description.to_lowercase().contains("quarterly") {
                strings(&["Alex Chen", "Priya Patel", "Jordan Lee"])
            } else {
                strings(&["You", "Sam Rivera"])
            };
            DetailPanel::Meeting {
                participants,
                agenda: strings(&["Review open action items", "Quarterly priorities", "Next steps"]),
            }
        }
        DetailKind::EventTicket => {
            let price = PRICE_RE
                .find(description)
                .or_else(|| PRICE_RE.find(title))
                .map(|found| found.as_str().to_string())
                .unwrap_or_else(|| "$45".to_string());
            let is_flight = lowered.contains("airlines") || description.to_lowercase().contains("flight");
            let (headline, seat) = if is_flight {
                ("Departs 9:40 AM, Gate B12", "Economy, 23A")
            } else {
                ("Doors open 7:00 PM", "General admission")
            };
            DetailPanel::EventTicket {
                headline: headline.to_string(),
                price,
                seat: seat.to_string(),
            }
        }
        DetailKind::Document => {
            let slug = lowered
                .split(|c: char| !c.is_ascii_alphanumeric())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join("-");
            DetailPanel::Document {
                file_name: format!("{}.pdf", if slug.is_empty() { "document" } else { slug.as_str() }),
                pages: 4,
                updated: "Updated 2 hours ago".to_string(),
            }
        }
    };
    Some(panel)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trend {
    Rising,
    Falling,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBar {
    pub label: Option<String>,
    pub value: f64,
    pub height_pct: f64,
    pub trend: Trend,
}

pub fn chart_bars(chart: &ChartData) -> Vec<ChartBar> {
    let max = chart.values.iter().copied().fold(f64::MIN, f64::max);
    chart
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let rising = index > 0 && *value > chart.values[index - 1];
            ChartBar {
                label: chart.labels.get(index).cloned(),
                value: *value,
                height_pct: if max > 0.0 { value / max * 100.0 } else { 0.0 },
                trend: if rising { Trend::Rising } else { Trend::Falling },
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "kebab-case")]
pub enum CardView {
    News {
        headline: Option<String>,
        description: Option<String>,
        bars: Vec<ChartBar>,
        items: Vec<NewsItem>,
    },
    #[serde(rename_all = "camelCase")]
    Standard {
        title: Option<String>,
        description: Option<String>,
        expandable: bool,
        expanded: bool,
        detail: Option<DetailPanel>,
        link_url: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct SuggestionCard {
    suggestion: Suggestion,
    expanded: bool,
}

impl SuggestionCard {
    pub fn new(suggestion: Suggestion) -> Self {
        Self {
            suggestion,
            expanded: false,
        }
    }

    /// News cards and cards without a title never expand.
    pub fn is_expandable(&self) -> bool {
        !self.suggestion.is_news() && self.suggestion.title.is_some()
    }

    pub fn toggle(&mut self) -> bool {
        if !self.is_expandable() {
            return false;
        }
        self.expanded = !self.expanded;
        true
    }

    pub fn view(&self) -> CardView {
        let suggestion = &self.suggestion;
        if suggestion.is_news() {
            return CardView::News {
                headline: suggestion.title.clone(),
                description: suggestion.description.clone(),
                bars: suggestion.chart_data.as_ref().map(chart_bars).unwrap_or_default(),
                items: suggestion.content.clone(),
            };
        }
        CardView::Standard {
            title: suggestion.title.clone(),
            description: suggestion.description.clone(),
            expandable: self.is_expandable(),
            expanded: self.expanded,
            detail: if self.expanded { detail_panel(suggestion) } else { None },
            link_url: suggestion.link_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollRequest {
    None,
    End,
}

/// Incremental reveal of an event's suggestions.
#[derive(Debug, Clone)]
pub struct SuggestionCarousel {
    suggestions: Arc<[Suggestion]>,
    visible: usize,
    active_index: usize,
    scroll: ScrollRequest,
}

impl SuggestionCarousel {
    pub fn new(suggestions: Arc<[Suggestion]>) -> Self {
        let visible = suggestions.len().min(1);
        Self {
            suggestions,
            visible,
            active_index: 0,
            scroll: ScrollRequest::None,
        }
    }

    /// Resets the reveal state only when handed a different list.
    pub fn replace(&mut self, suggestions: Arc<[Suggestion]>) {
        if Arc::ptr_eq(&self.suggestions, &suggestions) {
            return;
        }
        *self = Self::new(suggestions);
    }

    pub fn visible(&self) -> &[Suggestion] {
        &self.suggestions[..self.visible]
    }

    pub fn has_more(&self) -> bool {
        self.visible < self.suggestions.len()
    }

    pub fn reveal_next(&mut self) -> Option<&Suggestion> {
        if !self.has_more() {
            return None;
        }
        let next = self.visible;
        self.visible += 1;
        self.active_index = next;
        self.scroll = ScrollRequest::End;
        self.suggestions.get(next)
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Returns the pending scroll request once.
    pub fn take_scroll(&mut self) -> ScrollRequest {
        std::mem::replace(&mut self.scroll, ScrollRequest::None)
    }

    pub fn total(&self) -> usize {
        self.suggestions.len()
    }
}
