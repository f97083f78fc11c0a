//! Seed data the app starts from on every launch.

use crate::lunch::LunchRow;
use crate::mandates::custom::{ComputerPermission, IntelligenceModel, ToolApi};
use crate::mandates::icons::IconName;
use crate::models::{
    ChartData, ConfiguredMandate, ContentType, Event, EventCategory, FieldKind, FieldValue, Frequency,
    MandateField, MandateTemplate, MandateType, NewsItem, Priority, Suggestion, Task,
};
use crate::suggestions::classify_detail;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

fn text(id: &str, title: &str, description: &str) -> Suggestion {
    let mut suggestion = Suggestion::text(id, title, description);
    suggestion.detail = classify_detail(Some(title), Some(description));
    suggestion
}

fn event(id: &str, title: &str, time: &str, hour: u8, category: EventCategory, suggestions: Vec<Suggestion>) -> Event {
    Event {
        id: id.to_string(),
        title: title.to_string(),
        time: time.to_string(),
        hour_index: hour,
        category: Some(category),
        suggestions,
    }
}

pub fn day_events() -> Vec<Event> {
    let market = Suggestion {
        id: "suggestion-3-1".to_string(),
        kind: ContentType::News,
        title: Some("Your portfolio is up by 2%".to_string()),
        description: Some("Trump introduces tariffs on steel from UK - Impacts TTST (-2.21%)".to_string()),
        image_url: None,
        link_url: None,
        chart_data: Some(ChartData {
            labels: ["Jan", "Feb", "Mar", "Apr", "May", "Jun"]
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            values: vec![1200.0, 1300.0, 1150.0, 1400.0, 1300.0, 1500.0],
        }),
        source: None,
        date: None,
        content: vec![
            NewsItem {
                title: "Newsletter: Case-Shiller: National House Price Index Up 3.9%".to_string(),
                source: "Calculated Risk".to_string(),
                attribution: None,
                time: "10h".to_string(),
            },
            NewsItem {
                title: "How to capture the next S-curve in commodity trading".to_string(),
                source: "Gas and LNG profits surpass oil".to_string(),
                attribution: Some("McKinsey".to_string()),
                time: "1d".to_string(),
            },
        ],
        detail: None,
        order: None,
    };

    vec![
        event(
            "event-1",
            "Breakfast",
            "8 AM",
            8,
            EventCategory::Routine,
            vec![text("suggestion-1-1", "Pancakes from Angie's", "Top-rated breakfast spot, 10 min away")],
        ),
        event(
            "event-2",
            "Travel to Work",
            "9 AM",
            9,
            EventCategory::Travel,
            vec![
                text("suggestion-2-1", "Overground in 40 mins", "Regular service, minor delays at King's Cross"),
                text("suggestion-2-2", "Tube in 30 mins", "Victoria Line running normally"),
            ],
        ),
        event("event-3", "Check Market & News", "11 AM", 11, EventCategory::Routine, vec![market]),
        event(
            "event-4",
            "Respond to emails",
            "12 PM",
            12,
            EventCategory::Routine,
            vec![text("suggestion-4-1", "3 priority emails", "From client regarding project timeline")],
        ),
        event(
            "event-5",
            "Call with Team",
            "1 PM",
            13,
            EventCategory::Meeting,
            vec![text("suggestion-5-1", "Meeting Notes", "Prepare quarterly review points")],
        ),
        event("event-6", "Lunch", "2 PM", 14, EventCategory::Lunch, Vec::new()),
        event(
            "event-7",
            "Book Flight for US Trip",
            "4 PM",
            16,
            EventCategory::Travel,
            vec![text("suggestion-7-1", "United Airlines", "Direct flight $430 return")],
        ),
        event(
            "event-8",
            "Buy Book for Friend's Birthday",
            "5 PM",
            17,
            EventCategory::Errand,
            vec![text("suggestion-8-1", "The Silent Patient", "Bestseller, available at Waterstones")],
        ),
        event(
            "event-9",
            "1 hour of code",
            "6 PM",
            18,
            EventCategory::Focus,
            vec![text("suggestion-9-1", "Finish React project", "Complete authentication module")],
        ),
        event(
            "event-10",
            "1 hour of Chinese",
            "7 PM",
            19,
            EventCategory::Goal,
            vec![text("suggestion-10-1", "Duolingo lesson 5", "Focus on business vocabulary")],
        ),
        event(
            "event-11",
            "Dinner",
            "8 PM",
            20,
            EventCategory::Routine,
            vec![text("suggestion-11-1", "Pasta recipe", "Quick carbonara, ingredients ready")],
        ),
        event(
            "event-12",
            "Get Ready for bed",
            "10 PM",
            22,
            EventCategory::Reminder,
            vec![text("suggestion-12-1", "Read 30 minutes", "Continue 'Thinking Fast and Slow'")],
        ),
    ]
}

fn task(
    id: &str,
    title: &str,
    description: &str,
    completed: bool,
    priority: Priority,
    due_date: Option<NaiveDate>,
    tags: &[&str],
    created_at: DateTime<Utc>,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        completed,
        priority,
        due_date,
        tags: tags.iter().map(ToString::to_string).collect(),
        created_at,
    }
}

pub fn starter_tasks() -> Vec<Task> {
    vec![
        task(
            "task-1",
            "Prepare presentation slides",
            "Create PowerPoint slides for the client meeting on Thursday",
            false,
            Priority::High,
            date(2023, 12, 15),
            &["work", "client", "presentation"],
            at(2023, 12, 10),
        ),
        task(
            "task-2",
            "Complete expense report",
            "Submit expense report for the business trip last week",
            true,
            Priority::Medium,
            date(2023, 12, 12),
            &["work", "finance"],
            at(2023, 12, 8),
        ),
        task(
            "task-3",
            "Schedule doctor appointment",
            "Annual physical check-up",
            false,
            Priority::Medium,
            date(2023, 12, 20),
            &["health", "personal"],
            at(2023, 12, 7),
        ),
        task(
            "task-4",
            "Pick up dry cleaning",
            "Ticket #A45B at Main Street Cleaners",
            false,
            Priority::Low,
            date(2023, 12, 14),
            &["errands"],
            at(2023, 12, 10),
        ),
        task(
            "task-5",
            "Research vacation options",
            "Look into beach resorts for spring break",
            false,
            Priority::Low,
            None,
            &["personal", "vacation"],
            at(2023, 12, 5),
        ),
        task(
            "task-6",
            "Call internet service provider",
            "Discuss billing discrepancy on last month's statement",
            false,
            Priority::High,
            date(2023, 12, 13),
            &["home", "finance"],
            at(2023, 12, 9),
        ),
        task(
            "task-7",
            "Update resume",
            "Add recent project experience",
            false,
            Priority::Medium,
            None,
            &["career", "personal"],
            at(2023, 12, 6),
        ),
        task(
            "task-8",
            "Buy birthday gift",
            "Find a gift for Mom's birthday next week",
            false,
            Priority::Medium,
            date(2023, 12, 18),
            &["personal", "shopping"],
            at(2023, 12, 8),
        ),
    ]
}

/// Tasks synthesised by the first Google Calendar connect.
pub fn google_calendar_tasks(now: DateTime<Utc>) -> Vec<Task> {
    let stamp = now.timestamp_millis();
    vec![
        Task {
            id: format!("calendar-{}-1", stamp),
            title: "Weekly Team Meeting".to_string(),
            description: Some("Discuss project progress and next steps".to_string()),
            completed: false,
            priority: Priority::Medium,
            due_date: None,
            tags: vec!["meeting".to_string(), "imported".to_string()],
            created_at: now,
        },
        Task {
            id: format!("calendar-{}-2", stamp),
            title: "Client Presentation".to_string(),
            description: Some("Present Q2 results to the client".to_string()),
            completed: false,
            priority: Priority::High,
            due_date: Some((now + Duration::days(1)).date_naive()),
            tags: vec!["presentation".to_string(), "imported".to_string()],
            created_at: now,
        },
    ]
}

struct FieldSpec<'a> {
    id: &'a str,
    name: &'a str,
    kind: FieldKind,
    label: &'a str,
    placeholder: Option<&'a str>,
    options: &'a [&'a str],
    required: bool,
}

fn field(spec: FieldSpec<'_>) -> MandateField {
    MandateField {
        id: spec.id.to_string(),
        name: spec.name.to_string(),
        kind: spec.kind,
        label: spec.label.to_string(),
        placeholder: spec.placeholder.map(ToString::to_string),
        options: spec.options.iter().map(ToString::to_string).collect(),
        required: spec.required,
        value: None,
    }
}

fn template(
    id: &str,
    mandate_type: MandateType,
    name: &str,
    description: &str,
    icon: IconName,
    fields: Vec<FieldSpec<'_>>,
) -> MandateTemplate {
    MandateTemplate {
        id: id.to_string(),
        mandate_type,
        name: name.to_string(),
        description: description.to_string(),
        icon,
        fields: fields.into_iter().map(field).collect(),
        is_active: None,
        last_run: None,
    }
}

pub fn mandate_templates() -> Vec<MandateTemplate> {
    vec![
        template(
            "travel-planner",
            MandateType::Travel,
            "Daily Commute Planner",
            "Plan your daily commute between home and work with real-time traffic updates",
            IconName::MapPin,
            vec![
                FieldSpec {
                    id: "home-address",
                    name: "homeAddress",
                    kind: FieldKind::Location,
                    label: "Home Address",
                    placeholder: Some("Enter your home address"),
                    options: &[],
                    required: true,
                },
                FieldSpec {
                    id: "work-address",
                    name: "workAddress",
                    kind: FieldKind::Location,
                    label: "Work Address",
                    placeholder: Some("Enter your work address"),
                    options: &[],
                    required: true,
                },
                FieldSpec {
                    id: "transport-mode",
                    name: "transportMode",
                    kind: FieldKind::Select,
                    label: "Preferred Mode of Transport",
                    placeholder: None,
                    options: &["Drive", "Public Transport", "Walk", "Cycle"],
                    required: true,
                },
                FieldSpec {
                    id: "arrival-time",
                    name: "arrivalTime",
                    kind: FieldKind::Time,
                    label: "Preferred Arrival Time",
                    placeholder: None,
                    options: &[],
                    required: true,
                },
            ],
        ),
        template(
            "meeting-prep",
            MandateType::Meeting,
            "Meeting Preparation",
            "Get AI-powered meeting briefs and relevant documents before your meetings",
            IconName::Users,
            vec![
                FieldSpec {
                    id: "calendar-integration",
                    name: "calendarIntegration",
                    kind: FieldKind::Select,
                    label: "Calendar Integration",
                    placeholder: None,
                    options: &["Google Calendar", "Microsoft Outlook", "Apple Calendar"],
                    required: true,
                },
                FieldSpec {
                    id: "prep-time",
                    name: "prepTime",
                    kind: FieldKind::Select,
                    label: "Preparation Time",
                    placeholder: None,
                    options: &["30 minutes before", "1 hour before", "2 hours before", "1 day before"],
                    required: true,
                },
                FieldSpec {
                    id: "include-documents",
                    name: "includeDocuments",
                    kind: FieldKind::Toggle,
                    label: "Include Relevant Documents",
                    placeholder: None,
                    options: &[],
                    required: false,
                },
            ],
        ),
        template(
            "news-summary",
            MandateType::News,
            "Daily News Digest",
            "Receive a personalized summary of top news stories based on your interests",
            IconName::Newspaper,
            vec![
                FieldSpec {
                    id: "interests",
                    name: "interests",
                    kind: FieldKind::Text,
                    label: "Interests (comma separated)",
                    placeholder: Some("e.g., Technology, Finance, Science"),
                    options: &[],
                    required: true,
                },
                FieldSpec {
                    id: "delivery-time",
                    name: "deliveryTime",
                    kind: FieldKind::Time,
                    label: "Delivery Time",
                    placeholder: None,
                    options: &[],
                    required: true,
                },
                FieldSpec {
                    id: "max-stories",
                    name: "maxStories",
                    kind: FieldKind::Select,
                    label: "Maximum Stories",
                    placeholder: None,
                    options: &["3", "5", "10", "15"],
                    required: true,
                },
            ],
        ),
        template(
            "weather-forecast",
            MandateType::Weather,
            "Weather Alert",
            "Get weather forecasts and alerts for your day",
            IconName::Cloud,
            vec![
                FieldSpec {
                    id: "location",
                    name: "location",
                    kind: FieldKind::Location,
                    label: "Location",
                    placeholder: Some("Enter a location"),
                    options: &[],
                    required: true,
                },
                FieldSpec {
                    id: "alert-time",
                    name: "alertTime",
                    kind: FieldKind::Time,
                    label: "Alert Time",
                    placeholder: None,
                    options: &[],
                    required: true,
                },
                FieldSpec {
                    id: "alert-conditions",
                    name: "alertConditions",
                    kind: FieldKind::Select,
                    label: "Alert for Conditions",
                    placeholder: None,
                    options: &["Rain", "Snow", "Extreme Heat", "Extreme Cold", "All"],
                    required: false,
                },
            ],
        ),
        template(
            "task-prioritizer",
            MandateType::Task,
            "Task Prioritizer",
            "Automatically prioritize your tasks based on deadlines and importance",
            IconName::ListChecks,
            vec![
                FieldSpec {
                    id: "task-source",
                    name: "taskSource",
                    kind: FieldKind::Select,
                    label: "Task Source",
                    placeholder: None,
                    options: &["Mandate Tasks", "Google Tasks", "Microsoft To Do", "Apple Reminders"],
                    required: true,
                },
                FieldSpec {
                    id: "prioritization-time",
                    name: "prioritizationTime",
                    kind: FieldKind::Time,
                    label: "When to Prioritize",
                    placeholder: None,
                    options: &[],
                    required: true,
                },
                FieldSpec {
                    id: "consider-calendar",
                    name: "considerCalendar",
                    kind: FieldKind::Toggle,
                    label: "Consider Calendar Availability",
                    placeholder: None,
                    options: &[],
                    required: false,
                },
            ],
        ),
        template(
            "research-assistant",
            MandateType::Research,
            "Research Assistant",
            "Get AI-powered research on topics relevant to your upcoming meetings or tasks",
            IconName::Search,
            vec![
                FieldSpec {
                    id: "research-topics",
                    name: "researchTopics",
                    kind: FieldKind::Text,
                    label: "Research Keywords",
                    placeholder: Some("Enter keywords or topics"),
                    options: &[],
                    required: true,
                },
                FieldSpec {
                    id: "depth",
                    name: "depth",
                    kind: FieldKind::Select,
                    label: "Research Depth",
                    placeholder: None,
                    options: &["Brief overview", "Detailed summary", "Comprehensive analysis"],
                    required: true,
                },
                FieldSpec {
                    id: "sources",
                    name: "sources",
                    kind: FieldKind::Select,
                    label: "Preferred Sources",
                    placeholder: None,
                    options: &["Academic", "News", "Industry Reports", "All"],
                    required: false,
                },
            ],
        ),
    ]
}

/// The commute planner the user already set up, last run a day ago.
pub fn configured_mandates(now: DateTime<Utc>) -> Vec<ConfiguredMandate> {
    let Some(commute) = mandate_templates().into_iter().next() else {
        return Vec::new();
    };
    let values = [
        ("home-address", "123 Home Street, San Francisco, CA"),
        ("work-address", "456 Office Building, San Francisco, CA"),
        ("transport-mode", "Public Transport"),
        ("arrival-time", "09:00"),
    ];
    let fields = commute
        .fields
        .into_iter()
        .map(|mut field| {
            field.value = values
                .iter()
                .find(|(id, _)| *id == field.id)
                .map(|(_, value)| FieldValue::text(value));
            field
        })
        .collect();

    vec![ConfiguredMandate {
        id: "mandate-travel-planner".to_string(),
        template_id: commute.id,
        mandate_type: commute.mandate_type,
        name: commute.name,
        description: commute.description,
        icon: commute.icon,
        fields,
        is_active: true,
        last_run: Some(now - Duration::days(1)),
        frequency: Frequency::Daily,
        time_of_day: Some("07:00".to_string()),
        days_of_week: Vec::new(),
    }]
}

pub fn intelligence_models() -> Vec<IntelligenceModel> {
    vec![
        IntelligenceModel {
            id: "gpt-4o".to_string(),
            name: "GPT-4o".to_string(),
            description: "Advanced model with strong reasoning capabilities".to_string(),
            capabilities: vec![
                "Text generation".to_string(),
                "Image understanding".to_string(),
                "Code assistance".to_string(),
            ],
        },
        IntelligenceModel {
            id: "gpt-4o-mini".to_string(),
            name: "GPT-4o Mini".to_string(),
            description: "Faster and more efficient version of GPT-4o".to_string(),
            capabilities: vec![
                "Text generation".to_string(),
                "Image understanding".to_string(),
                "Code assistance".to_string(),
            ],
        },
        IntelligenceModel {
            id: "claude-3-5-sonnet".to_string(),
            name: "Claude 3.5 Sonnet".to_string(),
            description: "Balanced model with strong reasoning and creativity".to_string(),
            capabilities: vec![
                "Text generation".to_string(),
                "Image understanding".to_string(),
                "Long context".to_string(),
            ],
        },
    ]
}

pub fn tool_catalog() -> Vec<ToolApi> {
    vec![
        ToolApi::GoogleCalendar,
        ToolApi::WeatherApi,
        ToolApi::MapsApi,
        ToolApi::Email,
        ToolApi::Zapier,
    ]
}

pub fn permission_catalog() -> Vec<ComputerPermission> {
    vec![
        ComputerPermission::FileSystem,
        ComputerPermission::Browser,
        ComputerPermission::ScreenCapture,
        ComputerPermission::Notifications,
    ]
}

fn lunch_row(
    id: &str,
    kind: &str,
    title: &str,
    description: &str,
    price: Option<&str>,
    restaurant: Option<&str>,
    ingredients: &[&str],
    instructions: Option<&str>,
    created_at: DateTime<Utc>,
) -> LunchRow {
    LunchRow {
        id: id.to_string(),
        kind: Some(kind.to_string()),
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        image_url: None,
        price: price.map(ToString::to_string),
        delivery_time: price.map(|_| "15-25 min".to_string()),
        restaurant: restaurant.map(ToString::to_string),
        ingredients: ingredients.iter().map(ToString::to_string).collect(),
        instructions: instructions.map(ToString::to_string),
        created_at,
    }
}

/// Rows used to seed the in-memory lunch store when no store path is configured.
pub fn demo_lunch_rows(now: DateTime<Utc>) -> Vec<LunchRow> {
    vec![
        lunch_row(
            "lunch-1",
            "food-order",
            "Chicken Caesar Salad",
            "Classic Caesar salad with grilled chicken and homemade dressing",
            Some("$14.99"),
            Some("Fresh Greens"),
            &[],
            None,
            now - Duration::minutes(30),
        ),
        lunch_row(
            "lunch-2",
            "food-order",
            "Veggie Wrap",
            "Whole wheat wrap filled with seasonal vegetables and hummus",
            Some("$9.99"),
            Some("Veggie Delight"),
            &[],
            None,
            now - Duration::minutes(20),
        ),
        lunch_row(
            "lunch-3",
            "recipe",
            "Avocado Toast",
            "Simple and nutritious avocado toast with various toppings",
            None,
            None,
            &[
                "2 slices of whole grain bread",
                "1 ripe avocado",
                "2 eggs (optional)",
                "Salt and pepper to taste",
                "Red pepper flakes (optional)",
                "Lemon juice",
            ],
            Some("Toast bread. Mash avocado and spread on toast. Add toppings as desired. For eggs, cook sunny-side up or poached and place on top."),
            now - Duration::minutes(10),
        ),
        lunch_row(
            "lunch-4",
            "food-order",
            "Morning Coffee",
            "Freshly brewed premium coffee to kickstart your day",
            Some("$4.50"),
            Some("Coffee Corner"),
            &[],
            None,
            now - Duration::hours(5),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::{configured_mandates, day_events, mandate_templates, starter_tasks};
    use crate::models::DetailKind;
    use chrono::Utc;
    use std::collections::HashSet;

    #[test]
    fn events_fit_the_day_window_with_unique_hours() {
        let events = day_events();
        let hours = events.iter().map(|event| event.hour_index).collect::<HashSet<_>>();
        assert_eq!(hours.len(), events.len());
        assert!(events.iter().all(|event| (8..=22).contains(&event.hour_index)));
        assert_eq!(events.iter().filter(|event| event.is_lunch()).count(), 1);
    }

    #[test]
    fn fixture_suggestions_carry_stored_detail_kind() {
        let events = day_events();
        let dinner = events.iter().find(|event| event.id == "event-11").expect("dinner");
        assert_eq!(dinner.suggestions[0].detail, Some(DetailKind::Recipe));
        let commute = events.iter().find(|event| event.id == "event-2").expect("commute");
        assert_eq!(commute.suggestions[1].detail, Some(DetailKind::Route));
    }

    #[test]
    fn seeded_mandate_satisfies_required_fields() {
        let configured = configured_mandates(Utc::now());
        assert_eq!(configured.len(), 1);
        assert!(configured[0]
            .fields
            .iter()
            .filter(|field| field.required)
            .all(|field| field.is_filled()));
        assert_eq!(mandate_templates().len(), 6);
        assert_eq!(starter_tasks().len(), 8);
    }
}
