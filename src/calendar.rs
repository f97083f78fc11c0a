use crate::config::ClockMode;
use crate::models::{Event, EventCategory};
use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::Serialize;

pub const FIRST_HOUR: u8 = 8;
pub const LAST_HOUR: u8 = 22;
pub const SLOT_HEIGHT_PX: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStyle {
    pub background: &'static str,
    pub foreground: &'static str,
    pub accent: &'static str,
}

const DEFAULT_STYLE: CategoryStyle = CategoryStyle {
    background: "hsl(var(--event-background))",
    foreground: "hsl(var(--event-foreground))",
    accent: "slate",
};

pub fn category_style(category: Option<EventCategory>) -> CategoryStyle {
    let (background, foreground, accent) = match category {
        Some(EventCategory::Meeting) => ("#e0ecff", "#1e3a8a", "blue"),
        Some(EventCategory::Travel) => ("#dcfce7", "#14532d", "green"),
        Some(EventCategory::Reminder) => ("#fef9c3", "#713f12", "yellow"),
        Some(EventCategory::Errand) => ("#ffedd5", "#7c2d12", "orange"),
        Some(EventCategory::Goal) => ("#f3e8ff", "#581c87", "purple"),
        Some(EventCategory::Routine) => ("#f1f5f9", "#0f172a", "slate"),
        Some(EventCategory::Lunch) => ("#fee2e2", "#7f1d1d", "red"),
        Some(EventCategory::Focus) => ("#e0f2fe", "#0c4a6e", "sky"),
        Some(EventCategory::Other) | None => return DEFAULT_STYLE,
    };
    CategoryStyle {
        background,
        foreground,
        accent,
    }
}

pub fn hour_label(hour: u8) -> String {
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let adjusted = match hour % 12 {
        0 => 12,
        other => other,
    };
    format!("{} {}", adjusted, suffix)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub hour: u8,
    pub label: String,
    pub event: Option<Event>,
}

/// Hourly rows from 8 AM to 10 PM; each holds the first event for that hour.
pub fn slots(events: &[Event]) -> Vec<TimeSlot> {
    (FIRST_HOUR..=LAST_HOUR)
        .map(|hour| TimeSlot {
            hour,
            label: hour_label(hour),
            event: events.iter().find(|event| event.hour_index == hour).cloned(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHeader {
    pub date: NaiveDate,
    pub title: String,
    pub is_today: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct DayView {
    selected: NaiveDate,
}

impl DayView {
    pub fn new(today: NaiveDate) -> Self {
        Self { selected: today }
    }

    pub fn previous(&mut self) -> NaiveDate {
        self.selected -= Duration::days(1);
        self.selected
    }

    pub fn next(&mut self) -> NaiveDate {
        self.selected += Duration::days(1);
        self.selected
    }

    pub fn today(&mut self, today: NaiveDate) -> NaiveDate {
        self.selected = today;
        self.selected
    }

    pub fn is_today_selected(&self, today: NaiveDate) -> bool {
        self.selected == today
    }

    /// "Monday, January 8" style heading.
    pub fn header(&self, today: NaiveDate) -> DayHeader {
        DayHeader {
            date: self.selected,
            title: self.selected.format("%A, %B %-d").to_string(),
            is_today: self.is_today_selected(today),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockMarker {
    pub hour_offset: u8,
    pub minute_pct: f64,
    pub label: String,
}

impl ClockMarker {
    pub fn top_px(&self, slot_height: f64) -> f64 {
        f64::from(self.hour_offset) * slot_height + self.minute_pct * slot_height / 100.0
    }
}

/// Current-time marker drawn over the hour slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockIndicator {
    Fixed,
    Live,
}

impl From<ClockMode> for ClockIndicator {
    fn from(mode: ClockMode) -> Self {
        match mode {
            ClockMode::Fixed => Self::Fixed,
            ClockMode::Live => Self::Live,
        }
    }
}

impl ClockIndicator {
    /// `None` when a live clock falls outside the displayed hours.
    pub fn marker(self, now: NaiveTime) -> Option<ClockMarker> {
        let (hour, minute) = match self {
            Self::Fixed => (FIRST_HOUR, 15),
            Self::Live => {
                let hour = u8::try_from(now.hour()).ok()?;
                if !(FIRST_HOUR..=LAST_HOUR).contains(&hour) {
                    return None;
                }
                (hour, now.minute())
            }
        };
        let display_hour = match hour % 12 {
            0 => 12,
            other => other,
        };
        let suffix = if hour >= 12 { "PM" } else { "AM" };
        Some(ClockMarker {
            hour_offset: hour - FIRST_HOUR,
            minute_pct: f64::from(minute) / 60.0 * 100.0,
            label: format!("{}:{:02} {}", display_hour, minute, suffix),
        })
    }

    pub fn top_px(self, now: NaiveTime, slot_height: f64) -> Option<f64> {
        self.marker(now).map(|marker| marker.top_px(slot_height))
    }
}

#[cfg(test)]
mod tests {
    use super::{category_style, hour_label, slots, ClockIndicator, DayView, SLOT_HEIGHT_PX};
    use crate::fixtures::day_events;
    use crate::models::EventCategory;
    use chrono::{NaiveDate, NaiveTime};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn hour_labels_use_twelve_hour_clock() {
        assert_eq!(hour_label(8), "8 AM");
        assert_eq!(hour_label(12), "12 PM");
        assert_eq!(hour_label(22), "10 PM");
    }

    #[test]
    fn slots_cover_fifteen_hours_and_attach_events() {
        let events = day_events();
        let slots = slots(&events);
        assert_eq!(slots.len(), 15);
        assert_eq!(slots[0].label, "8 AM");
        assert_eq!(slots[14].label, "10 PM");
        let filled = slots.iter().filter(|slot| slot.event.is_some()).count();
        assert_eq!(filled, events.len());
    }

    #[test]
    fn day_navigation_moves_one_day_and_returns_to_today() {
        let today = date(2024, 1, 8);
        let mut view = DayView::new(today);
        assert!(view.is_today_selected(today));
        assert_eq!(view.previous(), date(2024, 1, 7));
        assert!(!view.is_today_selected(today));
        view.next();
        assert_eq!(view.next(), date(2024, 1, 9));
        view.today(today);
        assert_eq!(view.header(today).title, "Monday, January 8");
    }

    #[test]
    fn unknown_category_gets_default_style() {
        assert_eq!(category_style(None), category_style(Some(EventCategory::Other)));
        assert_ne!(category_style(Some(EventCategory::Meeting)), category_style(None));
    }

    #[test]
    fn fixed_marker_sits_a_quarter_into_the_first_slot() {
        let now = NaiveTime::from_hms_opt(18, 40, 0).expect("time");
        let marker = ClockIndicator::Fixed.marker(now).expect("marker");
        assert_eq!(marker.label, "8:15 AM");
        assert_eq!(marker.top_px(SLOT_HEIGHT_PX), 17.5);
    }

    #[test]
    fn live_marker_hides_outside_the_window() {
        let early = NaiveTime::from_hms_opt(6, 30, 0).expect("time");
        assert!(ClockIndicator::Live.marker(early).is_none());
        let evening = NaiveTime::from_hms_opt(13, 30, 0).expect("time");
        assert_eq!(ClockIndicator::Live.top_px(evening, SLOT_HEIGHT_PX), Some(385.0));
    }
}
