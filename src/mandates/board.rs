use crate::clock::relative_label;
use crate::errors::{AppError, AppResult};
use crate::mandates::icons::IconGlyph;
use crate::models::{ConfiguredMandate, MandateTemplate};
use crate::notifications::Notifier;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCard {
    pub template: MandateTemplate,
    pub glyph: IconGlyph,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MandateCard {
    pub mandate: ConfiguredMandate,
    pub glyph: IconGlyph,
    pub schedule: String,
    pub last_run_label: Option<String>,
}

/// Template catalog plus the user's configured mandates.
#[derive(Debug, Clone, Default)]
pub struct MandateBoard {
    templates: Vec<MandateTemplate>,
    configured: Vec<ConfiguredMandate>,
}

impl MandateBoard {
    pub fn new(templates: Vec<MandateTemplate>, configured: Vec<ConfiguredMandate>) -> Self {
        Self {
            templates,
            configured,
        }
    }

    pub fn template(&self, id: &str) -> AppResult<&MandateTemplate> {
        self.templates
            .iter()
            .find(|template| template.id == id)
            .ok_or_else(|| AppError::NotFound(format!("template {}", id)))
    }

    /// Case-insensitive match on name, description or type. A blank query returns everything.
    pub fn search(&self, query: &str) -> Vec<TemplateCard> {
        let needle = query.trim().to_lowercase();
        self.templates
            .iter()
            .filter(|template| {
                needle.is_empty()
                    || template.name.to_lowercase().contains(&needle)
                    || template.description.to_lowercase().contains(&needle)
                    || template.mandate_type.as_str().contains(&needle)
            })
            .map(|template| TemplateCard {
                template: template.clone(),
                glyph: template.icon.glyph(),
            })
            .collect()
    }

    pub fn list(&self) -> &[ConfiguredMandate] {
        &self.configured
    }

    pub fn get(&self, id: &str) -> AppResult<&ConfiguredMandate> {
        self.configured
            .iter()
            .find(|mandate| mandate.id == id)
            .ok_or_else(|| AppError::NotFound(format!("mandate {}", id)))
    }

    fn get_mut(&mut self, id: &str) -> AppResult<&mut ConfiguredMandate> {
        self.configured
            .iter_mut()
            .find(|mandate| mandate.id == id)
            .ok_or_else(|| AppError::NotFound(format!("mandate {}", id)))
    }

    /// Appends without a toast; used when the caller has already announced the mandate.
    pub fn insert(&mut self, mandate: ConfiguredMandate) {
        tracing::info!(mandate_id = %mandate.id, template_id = %mandate.template_id, "mandate configured");
        self.configured.push(mandate);
    }

    pub fn add(&mut self, mandate: ConfiguredMandate, notifier: &Notifier) -> ConfiguredMandate {
        notifier.success(format!("{} mandate has been configured successfully", mandate.name));
        self.insert(mandate.clone());
        mandate
    }

    pub fn update(&mut self, updated: ConfiguredMandate, notifier: &Notifier) -> AppResult<ConfiguredMandate> {
        let slot = self.get_mut(&updated.id)?;
        *slot = updated.clone();
        tracing::info!(mandate_id = %updated.id, "mandate updated");
        notifier.success(format!("{} mandate has been updated", updated.name));
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str, notifier: &Notifier) -> AppResult<ConfiguredMandate> {
        let index = self
            .configured
            .iter()
            .position(|mandate| mandate.id == id)
            .ok_or_else(|| AppError::NotFound(format!("mandate {}", id)))?;
        let removed = self.configured.remove(index);
        tracing::info!(mandate_id = %id, "mandate deleted");
        notifier.success("Mandate has been deleted");
        Ok(removed)
    }

    /// Flips `is_active` and nothing else.
    pub fn toggle_active(&mut self, id: &str, notifier: &Notifier) -> AppResult<ConfiguredMandate> {
        let mandate = self.get_mut(id)?;
        mandate.is_active = !mandate.is_active;
        let state = if mandate.is_active { "activated" } else { "deactivated" };
        tracing::info!(mandate_id = %id, active = mandate.is_active, "mandate toggled");
        notifier.success(format!("{} {}", mandate.name, state));
        Ok(mandate.clone())
    }

    pub fn last_run_label(&self, id: &str, now: DateTime<Utc>) -> AppResult<Option<String>> {
        Ok(self.get(id)?.last_run.map(|last_run| relative_label(last_run, now)))
    }

    pub fn cards(&self, now: DateTime<Utc>) -> Vec<MandateCard> {
        self.configured
            .iter()
            .map(|mandate| {
                let mut schedule = format!("Runs {}", mandate.frequency.label());
                if let Some(time) = mandate.time_of_day.as_deref() {
                    schedule.push_str(&format!(" at {}", time));
                }
                MandateCard {
                    mandate: mandate.clone(),
                    glyph: mandate.icon.glyph(),
                    schedule,
                    last_run_label: mandate.last_run.map(|last_run| relative_label(last_run, now)),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::MandateBoard;
    use crate::errors::AppError;
    use crate::fixtures::{configured_mandates, mandate_templates};
    use crate::notifications::Notifier;
    use chrono::{Duration, Utc};

    fn board() -> MandateBoard {
        MandateBoard::new(mandate_templates(), configured_mandates(Utc::now()))
    }

    #[test]
    fn search_matches_name_description_and_type() {
        let board = board();
        assert_eq!(board.search("").len(), 6);
        assert_eq!(board.search("  ").len(), 6);
        let by_type = board.search("WEATHER");
        assert_eq!(by_type.len(), 1);
        assert_eq!(by_type[0].template.id, "weather-forecast");
        assert!(!board.search("traffic").is_empty());
        assert!(board.search("zzz").is_empty());
    }

    #[test]
    fn toggle_twice_restores_only_the_flag() {
        let notifier = Notifier::new();
        let mut board = board();
        let original = board.list()[0].clone();
        board.toggle_active(&original.id, &notifier).expect("off");
        assert_eq!(
            notifier.last_message().as_deref(),
            Some("Daily Commute Planner deactivated")
        );
        board.toggle_active(&original.id, &notifier).expect("on");
        assert_eq!(board.list()[0], original);
    }

    #[test]
    fn delete_and_update_report_missing_ids() {
        let notifier = Notifier::new();
        let mut board = board();
        assert!(matches!(board.delete("ghost", &notifier), Err(AppError::NotFound(_))));
        let mut mandate = board.list()[0].clone();
        mandate.name = "Commute".to_string();
        board.update(mandate.clone(), &notifier).expect("update");
        assert_eq!(board.get(&mandate.id).expect("get").name, "Commute");
        board.delete(&mandate.id, &notifier).expect("delete");
        assert!(board.list().is_empty());
    }

    #[test]
    fn cards_describe_schedule_and_last_run() {
        let now = Utc::now();
        let mut configured = configured_mandates(now);
        configured[0].last_run = Some(now - Duration::hours(2));
        let board = MandateBoard::new(mandate_templates(), configured);
        let cards = board.cards(now);
        assert_eq!(cards[0].schedule, "Runs daily at 07:00");
        assert_eq!(cards[0].last_run_label.as_deref(), Some("about 2 hours ago"));
        assert_eq!(cards[0].glyph.component, "MapPin");
        let id = cards[0].mandate.id.clone();
        assert_eq!(
            board.last_run_label(&id, now).expect("label").as_deref(),
            Some("about 2 hours ago")
        );
    }
}
