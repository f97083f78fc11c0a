use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Periodic re-render tick. The loop is aborted when the handle is dropped.
#[derive(Debug)]
pub struct MinuteTicker {
    handle: JoinHandle<()>,
}

impl MinuteTicker {
    /// Must be called from inside a tokio runtime.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately; skip it so the callback runs once per period.
            interval.tick().await;
            loop {
                interval.tick().await;
                on_tick();
            }
        });
        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for MinuteTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

fn distance(seconds: i64) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const MONTH: i64 = 30 * DAY;
    const YEAR: i64 = 365 * DAY;

    let minutes = (seconds + 30) / MINUTE;
    if seconds < 30 {
        return "less than a minute".to_string();
    }
    if minutes < 45 {
        return plural(minutes.max(1), "minute");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < 24 * 60 {
        return format!("about {}", plural((minutes + 30) / 60, "hour"));
    }
    if minutes < 42 * 60 {
        return "1 day".to_string();
    }
    if seconds < MONTH {
        return plural((seconds + DAY / 2) / DAY, "day");
    }
    if seconds < 45 * DAY {
        return "about 1 month".to_string();
    }
    if seconds < 60 * DAY {
        return "about 2 months".to_string();
    }
    if seconds < YEAR {
        return plural((seconds + MONTH / 2) / MONTH, "month");
    }

    let years = seconds / YEAR;
    let remainder = seconds % YEAR;
    if remainder < 3 * MONTH {
        format!("about {}", plural(years, "year"))
    } else if remainder < 9 * MONTH {
        format!("over {}", plural(years, "year"))
    } else {
        format!("almost {}", plural(years + 1, "year"))
    }
}

/// "about 2 hours ago" style distance between `then` and `now`.
pub fn relative_label(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds >= 0 {
        format!("{} ago", distance(seconds))
    } else {
        format!("in {}", distance(-seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::{relative_label, MinuteTicker};
    use chrono::{Duration, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn labels_follow_distance_buckets() {
        let now = Utc::now();
        assert_eq!(relative_label(now - Duration::seconds(10), now), "less than a minute ago");
        assert_eq!(relative_label(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_label(now - Duration::minutes(12), now), "12 minutes ago");
        assert_eq!(relative_label(now - Duration::minutes(50), now), "about 1 hour ago");
        assert_eq!(relative_label(now - Duration::hours(2), now), "about 2 hours ago");
        assert_eq!(relative_label(now - Duration::days(1), now), "1 day ago");
        assert_eq!(relative_label(now - Duration::days(5), now), "5 days ago");
        assert_eq!(relative_label(now - Duration::days(400), now), "about 1 year ago");
        assert_eq!(relative_label(now + Duration::minutes(3), now), "in 3 minutes");
    }

    #[tokio::test]
    async fn ticker_calls_back_and_stops_on_drop() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = MinuteTicker::spawn(std::time::Duration::from_millis(10), {
            let ticks = ticks.clone();
            move || {
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        });
        tokio::time::sleep(std::time::Duration::from_millis(60)).await;
        assert!(ticker.is_running());
        drop(ticker);
        let seen = ticks.load(Ordering::SeqCst);
        assert!(seen >= 1);
        tokio::time::sleep(std::time::Duration::from_millis(40)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }
}
