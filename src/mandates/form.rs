use crate::errors::{AppError, AppResult, FieldErrors};
use crate::models::{
    ConfiguredMandate, FieldKind, FieldValue, Frequency, MandateField, MandateTemplate,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

pub type FormErrors = FieldErrors;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const OPTION_MESSAGE: &str = "Please choose one of the listed options";
pub const TIME_MESSAGE: &str = "Please enter a time as HH:MM";
pub const KIND_MESSAGE: &str = "This value does not fit the field";
pub const TIME_OF_DAY_KEY: &str = "timeOfDay";
const DEFAULT_TIME_OF_DAY: &str = "08:00";

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid time regex"));

pub fn is_valid_time(value: &str) -> bool {
    TIME_RE.is_match(value.trim())
}

/// Toggles hold flags; every other kind holds text.
fn value_fits(kind: FieldKind, value: &FieldValue) -> bool {
    match kind {
        FieldKind::Toggle => matches!(value, FieldValue::Flag(_)),
        _ => matches!(value, FieldValue::Text(_)),
    }
}

/// One rendered control, chosen by the field's kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "input", rename_all = "kebab-case")]
pub enum FieldInput {
    #[serde(rename_all = "camelCase")]
    Text {
        id: String,
        label: String,
        placeholder: Option<String>,
        value: String,
        required: bool,
        error: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Time {
        id: String,
        label: String,
        value: String,
        required: bool,
        error: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Choice {
        id: String,
        label: String,
        options: Vec<String>,
        selected: Option<String>,
        required: bool,
        error: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Switch {
        id: String,
        label: String,
        checked: bool,
        required: bool,
        error: Option<String>,
    },
}

impl FieldInput {
    fn for_field(field: &MandateField, error: Option<&str>) -> Self {
        let id = field.id.clone();
        let label = field.label.clone();
        let required = field.required;
        let error = error.map(ToString::to_string);
        let text = field
            .value
            .as_ref()
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
            .to_string();

        match field.kind {
            FieldKind::Text | FieldKind::Date | FieldKind::Location => Self::Text {
                id,
                label,
                placeholder: field.placeholder.clone(),
                value: text,
                required,
                error,
            },
            FieldKind::Time => Self::Time {
                id,
                label,
                value: text,
                required,
                error,
            },
            FieldKind::Select => Self::Choice {
                id,
                label,
                options: field.options.clone(),
                selected: Some(text).filter(|value| !value.is_empty()),
                required,
                error,
            },
            FieldKind::Toggle => Self::Switch {
                id,
                label,
                checked: matches!(field.value, Some(FieldValue::Flag(true))),
                required,
                error,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub title: String,
    pub editing: bool,
    pub fields: Vec<FieldInput>,
    pub frequency: Frequency,
    pub frequency_options: Vec<Frequency>,
    /// Hidden when the mandate only runs on demand.
    pub time_of_day: Option<String>,
    pub errors: FormErrors,
}

#[derive(Debug, Clone)]
enum FormTarget {
    New(MandateTemplate),
    Edit(ConfiguredMandate),
}

/// Shared configuration and edit form.
#[derive(Debug, Clone)]
pub struct MandateForm {
    target: FormTarget,
    fields: Vec<MandateField>,
    frequency: Frequency,
    time_of_day: String,
    errors: FormErrors,
}

impl MandateForm {
    pub fn for_template(template: &MandateTemplate) -> Self {
        Self {
            fields: template.fields.clone(),
            target: FormTarget::New(template.clone()),
            frequency: Frequency::Daily,
            time_of_day: DEFAULT_TIME_OF_DAY.to_string(),
            errors: FormErrors::new(),
        }
    }

    pub fn for_mandate(mandate: &ConfiguredMandate) -> Self {
        Self {
            fields: mandate.fields.clone(),
            frequency: mandate.frequency,
            time_of_day: mandate
                .time_of_day
                .clone()
                .unwrap_or_else(|| DEFAULT_TIME_OF_DAY.to_string()),
            target: FormTarget::Edit(mandate.clone()),
            errors: FormErrors::new(),
        }
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn render(&self) -> FormView {
        let (title, editing) = match &self.target {
            FormTarget::New(template) => (template.name.clone(), false),
            FormTarget::Edit(mandate) => (mandate.name.clone(), true),
        };
        FormView {
            title,
            editing,
            fields: self
                .fields
                .iter()
                .map(|field| FieldInput::for_field(field, self.errors.get(&field.id)))
                .collect(),
            frequency: self.frequency,
            frequency_options: vec![
                Frequency::Daily,
                Frequency::Weekly,
                Frequency::Monthly,
                Frequency::OnDemand,
            ],
            time_of_day: (self.frequency != Frequency::OnDemand).then(|| self.time_of_day.clone()),
            errors: self.errors.clone(),
        }
    }

    /// Sets one field by id and clears its error.
    pub fn set_value(&mut self, field_id: &str, value: FieldValue) -> AppResult<()> {
        let field = self
            .fields
            .iter_mut()
            .find(|field| field.id == field_id)
            .ok_or_else(|| AppError::NotFound(format!("field {}", field_id)))?;
        if !value_fits(field.kind, &value) {
            return Err(AppError::Validation(FieldErrors::single(field_id, KIND_MESSAGE)));
        }
        field.value = Some(value);
        self.errors.remove(field_id);
        Ok(())
    }

    pub fn apply_values(&mut self, values: BTreeMap<String, FieldValue>) -> AppResult<()> {
        for (field_id, value) in values {
            self.set_value(&field_id, value)?;
        }
        Ok(())
    }

    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency;
        if frequency == Frequency::OnDemand {
            self.errors.remove(TIME_OF_DAY_KEY);
        }
    }

    pub fn set_time_of_day(&mut self, time: &str) {
        self.time_of_day = time.trim().to_string();
        self.errors.remove(TIME_OF_DAY_KEY);
    }

    fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        for field in &self.fields {
            let fits = field.value.as_ref().map_or(true, |value| value_fits(field.kind, value));
            if field.required && (!fits || !field.is_filled()) {
                errors.insert(&field.id, REQUIRED_MESSAGE);
                continue;
            }
            let Some(text) = field.value.as_ref().and_then(FieldValue::as_text) else {
                continue;
            };
            if text.trim().is_empty() {
                continue;
            }
            match field.kind {
                FieldKind::Select if !field.options.iter().any(|option| option == text) => {
                    errors.insert(&field.id, OPTION_MESSAGE);
                }
                FieldKind::Time if !is_valid_time(text) => {
                    errors.insert(&field.id, TIME_MESSAGE);
                }
                _ => {}
            }
        }
        if self.frequency != Frequency::OnDemand && !is_valid_time(&self.time_of_day) {
            errors.insert(TIME_OF_DAY_KEY, TIME_MESSAGE);
        }
        errors
    }

    /// Validates every field; on failure the errors stay on the form and nothing is produced.
    pub fn submit(&mut self) -> AppResult<ConfiguredMandate> {
        let errors = self.validate();
        if !errors.is_empty() {
            tracing::info!(errors = errors.len(), "mandate form rejected");
            self.errors = errors.clone();
            return Err(AppError::Validation(errors));
        }
        self.errors = FormErrors::new();

        let time_of_day = (self.frequency != Frequency::OnDemand).then(|| self.time_of_day.clone());
        let mandate = match &self.target {
            FormTarget::New(template) => ConfiguredMandate {
                id: format!("mandate-{}", Uuid::new_v4()),
                template_id: template.id.clone(),
                mandate_type: template.mandate_type,
                name: template.name.clone(),
                description: template.description.clone(),
                icon: template.icon,
                fields: self.fields.clone(),
                is_active: true,
                last_run: None,
                frequency: self.frequency,
                time_of_day,
                days_of_week: Vec::new(),
            },
            FormTarget::Edit(existing) => ConfiguredMandate {
                fields: self.fields.clone(),
                frequency: self.frequency,
                time_of_day,
                ..existing.clone()
            },
        };
        Ok(mandate)
    }
}
