use crate::errors::{AppError, AppResult, FieldErrors};
use crate::fixtures::intelligence_models;
use crate::mandates::icons::IconName;
use crate::models::{ConfiguredMandate, FieldKind, FieldValue, Frequency, MandateField, MandateType};
use crate::notifications::Notifier;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NAME_REQUIRED_MESSAGE: &str = "Please provide a name for your mandate";
pub const USE_CASE_REQUIRED_MESSAGE: &str = "Please describe what you expect this mandate to do";
pub const CUSTOM_TEMPLATE_ID: &str = "custom";
pub const SHORT_TERM_WINDOWS: [u32; 4] = [5, 10, 20, 50];
const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceModel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolApi {
    GoogleCalendar,
    WeatherApi,
    MapsApi,
    Email,
    Zapier,
}

impl ToolApi {
    pub fn label(self) -> &'static str {
        match self {
            Self::GoogleCalendar => "Google Calendar",
            Self::WeatherApi => "Weather API",
            Self::MapsApi => "Maps API",
            Self::Email => "Email",
            Self::Zapier => "Zapier",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComputerPermission {
    FileSystem,
    Browser,
    ScreenCapture,
    Notifications,
}

impl ComputerPermission {
    pub fn label(self) -> &'static str {
        match self {
            Self::FileSystem => "File System",
            Self::Browser => "Browser",
            Self::ScreenCapture => "Screen Capture",
            Self::Notifications => "Notifications",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    #[default]
    UseCase,
    Intelligence,
    Conditioning,
    Access,
    Memory,
    Preferences,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        Self::UseCase,
        Self::Intelligence,
        Self::Conditioning,
        Self::Access,
        Self::Memory,
        Self::Preferences,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::UseCase => "Use Case",
            Self::Intelligence => "Intelligence",
            Self::Conditioning => "Conditioning",
            Self::Access => "Access",
            Self::Memory => "Memory",
            Self::Preferences => "Preferences",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|step| *step == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Intelligence {
    pub model: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    pub enabled: bool,
    pub documents: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinetuneExample {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Finetuning {
    pub enabled: bool,
    pub examples: Vec<FinetuneExample>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conditioning {
    pub instructions: String,
    pub knowledge_base: KnowledgeBase,
    pub finetuning: Finetuning,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolAccess {
    pub enabled: bool,
    pub connected_apis: Vec<ToolApi>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComputerAccess {
    pub enabled: bool,
    pub permissions: Vec<ComputerPermission>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Access {
    pub tools: ToolAccess,
    pub computer_access: ComputerAccess,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    /// Conversations kept in short-term memory.
    pub short_term_window: u32,
    pub long_term_read: bool,
    pub long_term_write: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomMandateConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub use_case: String,
    pub intelligence: Intelligence,
    pub conditioning: Conditioning,
    pub access: Access,
    pub memory: Memory,
    pub preferences: Vec<String>,
}

impl Default for CustomMandateConfig {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            description: String::new(),
            use_case: String::new(),
            intelligence: Intelligence {
                model: DEFAULT_MODEL.to_string(),
            },
            conditioning: Conditioning::default(),
            access: Access::default(),
            memory: Memory {
                short_term_window: 10,
                long_term_read: false,
                long_term_write: false,
            },
            preferences: Vec::new(),
        }
    }
}

impl CustomMandateConfig {
    /// Flattens the builder output into the generic field list.
    pub fn into_configured(self, models: &[IntelligenceModel]) -> ConfiguredMandate {
        let mut fields = vec![
            MandateField {
                id: "use-case".to_string(),
                name: "useCase".to_string(),
                kind: FieldKind::Text,
                label: "Use Case".to_string(),
                placeholder: None,
                options: Vec::new(),
                required: true,
                value: Some(FieldValue::Text(self.use_case)),
            },
            MandateField {
                id: "model".to_string(),
                name: "model".to_string(),
                kind: FieldKind::Select,
                label: "Model".to_string(),
                placeholder: None,
                options: models.iter().map(|model| model.id.clone()).collect(),
                required: true,
                value: Some(FieldValue::Text(self.intelligence.model)),
            },
        ];
        fields.extend(self.preferences.into_iter().enumerate().map(|(index, preference)| {
            MandateField {
                id: format!("preference-{}", index + 1),
                name: format!("preference{}", index + 1),
                kind: FieldKind::Text,
                label: format!("Preference {}", index + 1),
                placeholder: None,
                options: Vec::new(),
                required: false,
                value: Some(FieldValue::Text(preference)),
            }
        }));

        ConfiguredMandate {
            id: self.id,
            template_id: CUSTOM_TEMPLATE_ID.to_string(),
            mandate_type: MandateType::Custom,
            name: self.name,
            description: self.description,
            icon: IconName::Bot,
            fields,
            is_active: true,
            last_run: None,
            frequency: Frequency::OnDemand,
            time_of_day: None,
            days_of_week: Vec::new(),
        }
    }
}

/// One message per editable wizard field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum WizardMsg {
    SetName(String),
    SetDescription(String),
    SetUseCase(String),
    SelectModel(String),
    SetInstructions(String),
    SetKnowledgeBaseEnabled(bool),
    AddDocument(String),
    RemoveDocument(usize),
    SetFinetuningEnabled(bool),
    AddExample(FinetuneExample),
    RemoveExample(usize),
    SetToolsEnabled(bool),
    ToggleApi(ToolApi),
    SetComputerAccessEnabled(bool),
    TogglePermission(ComputerPermission),
    SetShortTermWindow(u32),
    SetLongTermRead(bool),
    SetLongTermWrite(bool),
    AddPreference(String),
    RemovePreference(usize),
    Next,
    Back,
    GoTo(WizardStep),
}

fn toggle_member<T: PartialEq + Copy>(items: &mut Vec<T>, item: T) {
    match items.iter().position(|existing| *existing == item) {
        Some(index) => {
            items.remove(index);
        }
        None => items.push(item),
    }
}

fn remove_at<T>(items: &mut Vec<T>, index: usize, what: &str) -> AppResult<()> {
    if index >= items.len() {
        return Err(AppError::NotFound(format!("{} {}", what, index)));
    }
    items.remove(index);
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub step: WizardStep,
    pub step_label: &'static str,
    pub step_index: usize,
    pub step_count: usize,
    pub can_go_back: bool,
    pub can_go_next: bool,
    pub config: CustomMandateConfig,
    pub models: Vec<IntelligenceModel>,
    pub tools: Vec<ToolApi>,
    pub permissions: Vec<ComputerPermission>,
}

#[derive(Debug, Clone)]
pub struct CustomMandateWizard {
    step: WizardStep,
    config: CustomMandateConfig,
    models: Vec<IntelligenceModel>,
}

impl Default for CustomMandateWizard {
    fn default() -> Self {
        Self::new(intelligence_models())
    }
}

impl CustomMandateWizard {
    pub fn new(models: Vec<IntelligenceModel>) -> Self {
        Self {
            step: WizardStep::default(),
            config: CustomMandateConfig::default(),
            models,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn config(&self) -> &CustomMandateConfig {
        &self.config
    }

    pub fn view(&self) -> WizardView {
        let step_index = self.step.index();
        WizardView {
            step: self.step,
            step_label: self.step.label(),
            step_index,
            step_count: WizardStep::ALL.len(),
            can_go_back: step_index > 0,
            can_go_next: step_index + 1 < WizardStep::ALL.len(),
            config: self.config.clone(),
            models: self.models.clone(),
            tools: crate::fixtures::tool_catalog(),
            permissions: crate::fixtures::permission_catalog(),
        }
    }

    /// Single reducer for every wizard edit and navigation message.
    pub fn update(&mut self, msg: WizardMsg) -> AppResult<()> {
        let config = &mut self.config;
        match msg {
            WizardMsg::SetName(name) => config.name = name,
            WizardMsg::SetDescription(description) => config.description = description,
            WizardMsg::SetUseCase(use_case) => config.use_case = use_case,
            WizardMsg::SelectModel(model) => {
                if !self.models.iter().any(|known| known.id == model) {
                    return Err(AppError::Validation(FieldErrors::single(
                        "model",
                        format!("Unknown model {}", model),
                    )));
                }
                config.intelligence.model = model;
            }
            WizardMsg::SetInstructions(instructions) => config.conditioning.instructions = instructions,
            WizardMsg::SetKnowledgeBaseEnabled(enabled) => {
                config.conditioning.knowledge_base.enabled = enabled
            }
            WizardMsg::AddDocument(document) => {
                if !document.trim().is_empty() {
                    config.conditioning.knowledge_base.documents.push(document);
                }
            }
            WizardMsg::RemoveDocument(index) => {
                remove_at(&mut config.conditioning.knowledge_base.documents, index, "document")?
            }
            WizardMsg::SetFinetuningEnabled(enabled) => config.conditioning.finetuning.enabled = enabled,
            WizardMsg::AddExample(example) => {
                if !example.input.trim().is_empty() && !example.output.trim().is_empty() {
                    config.conditioning.finetuning.examples.push(example);
                }
            }
            WizardMsg::RemoveExample(index) => {
                remove_at(&mut config.conditioning.finetuning.examples, index, "example")?
            }
            WizardMsg::SetToolsEnabled(enabled) => config.access.tools.enabled = enabled,
            WizardMsg::ToggleApi(api) => toggle_member(&mut config.access.tools.connected_apis, api),
            WizardMsg::SetComputerAccessEnabled(enabled) => config.access.computer_access.enabled = enabled,
            WizardMsg::TogglePermission(permission) => {
                toggle_member(&mut config.access.computer_access.permissions, permission)
            }
            WizardMsg::SetShortTermWindow(window) => {
                if !SHORT_TERM_WINDOWS.contains(&window) {
                    return Err(AppError::Validation(FieldErrors::single(
                        "shortTermWindow",
                        format!("Unsupported window {}", window),
                    )));
                }
                config.memory.short_term_window = window;
            }
            WizardMsg::SetLongTermRead(enabled) => config.memory.long_term_read = enabled,
            WizardMsg::SetLongTermWrite(enabled) => config.memory.long_term_write = enabled,
            WizardMsg::AddPreference(preference) => {
                if !preference.trim().is_empty() {
                    config.preferences.push(preference);
                }
            }
            WizardMsg::RemovePreference(index) => remove_at(&mut config.preferences, index, "preference")?,
            WizardMsg::Next => {
                let next = (self.step.index() + 1).min(WizardStep::ALL.len() - 1);
                self.step = WizardStep::ALL[next];
            }
            WizardMsg::Back => {
                self.step = WizardStep::ALL[self.step.index().saturating_sub(1)];
            }
            WizardMsg::GoTo(step) => self.step = step,
        }
        Ok(())
    }

    /// Checks name and use case, then hands back the flattened mandate and resets the wizard.
    pub fn submit(&mut self, notifier: &Notifier) -> AppResult<ConfiguredMandate> {
        if self.config.name.trim().is_empty() {
            notifier.error(NAME_REQUIRED_MESSAGE);
            return Err(AppError::Validation(FieldErrors::single("name", NAME_REQUIRED_MESSAGE)));
        }
        if self.config.use_case.trim().is_empty() {
            notifier.error(USE_CASE_REQUIRED_MESSAGE);
            return Err(AppError::Validation(FieldErrors::single(
                "useCase",
                USE_CASE_REQUIRED_MESSAGE,
            )));
        }

        let config = std::mem::take(&mut self.config);
        self.step = WizardStep::default();
        let mandate = config.into_configured(&self.models);
        tracing::info!(mandate_id = %mandate.id, "custom mandate created");
        notifier.success("Custom mandate created successfully");
        Ok(mandate)
    }
}

#[cfg(test)]
mod tests {
    use super::{ComputerPermission, CustomMandateWizard, FinetuneExample, ToolApi, WizardMsg, WizardStep};
    use crate::errors::AppError;
    use crate::mandates::icons::IconName;
    use crate::models::{FieldValue, Frequency, MandateType};
    use crate::notifications::Notifier;

    #[test]
    fn navigation_moves_without_validation_and_clamps() {
        let mut wizard = CustomMandateWizard::default();
        wizard.update(WizardMsg::Back).expect("back");
        assert_eq!(wizard.step(), WizardStep::UseCase);
        for _ in 0..10 {
            wizard.update(WizardMsg::Next).expect("next");
        }
        assert_eq!(wizard.step(), WizardStep::Preferences);
        assert!(!wizard.view().can_go_next);
        wizard.update(WizardMsg::GoTo(WizardStep::Access)).expect("goto");
        assert_eq!(wizard.view().step_index, 3);
    }

    #[test]
    fn reducer_writes_nested_fields() {
        let mut wizard = CustomMandateWizard::default();
        wizard.update(WizardMsg::SelectModel("claude-3-5-sonnet".to_string())).expect("model");
        wizard.update(WizardMsg::SetKnowledgeBaseEnabled(true)).expect("kb");
        wizard.update(WizardMsg::ToggleApi(ToolApi::MapsApi)).expect("api");
        wizard.update(WizardMsg::ToggleApi(ToolApi::Email)).expect("api");
        wizard.update(WizardMsg::ToggleApi(ToolApi::MapsApi)).expect("api off");
        wizard
            .update(WizardMsg::TogglePermission(ComputerPermission::Browser))
            .expect("perm");
        wizard
            .update(WizardMsg::AddExample(FinetuneExample {
                input: "hi".to_string(),
                output: " ".to_string(),
            }))
            .expect("ignored example");
        wizard.update(WizardMsg::SetShortTermWindow(20)).expect("window");

        let config = wizard.config();
        assert_eq!(config.intelligence.model, "claude-3-5-sonnet");
        assert!(config.conditioning.knowledge_base.enabled);
        assert_eq!(config.access.tools.connected_apis, vec![ToolApi::Email]);
        assert_eq!(config.access.computer_access.permissions, vec![ComputerPermission::Browser]);
        assert!(config.conditioning.finetuning.examples.is_empty());
        assert_eq!(config.memory.short_term_window, 20);

        assert!(wizard.update(WizardMsg::SelectModel("gpt-2".to_string())).is_err());
        assert!(wizard.update(WizardMsg::SetShortTermWindow(7)).is_err());
        assert!(matches!(
            wizard.update(WizardMsg::RemovePreference(0)),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn messages_decode_from_tagged_json() {
        let msg: WizardMsg =
            serde_json::from_str(r#"{"kind":"toggleApi","value":"google-calendar"}"#).expect("decode");
        assert_eq!(msg, WizardMsg::ToggleApi(ToolApi::GoogleCalendar));
        let msg: WizardMsg = serde_json::from_str(r#"{"kind":"next"}"#).expect("decode next");
        assert_eq!(msg, WizardMsg::Next);
    }

    #[test]
    fn submit_requires_name_then_use_case() {
        let notifier = Notifier::new();
        let mut wizard = CustomMandateWizard::default();
        assert!(wizard.submit(&notifier).is_err());
        assert_eq!(
            notifier.last_message().as_deref(),
            Some("Please provide a name for your mandate")
        );
        wizard.update(WizardMsg::SetName("Trip Helper".to_string())).expect("name");
        wizard.update(WizardMsg::SetUseCase("  ".to_string())).expect("use case");
        assert!(wizard.submit(&notifier).is_err());
        assert_eq!(
            notifier.last_message().as_deref(),
            Some("Please describe what you expect this mandate to do")
        );
    }

    #[test]
    fn defaults_flatten_into_configured_mandate() {
        let notifier = Notifier::new();
        let mut wizard = CustomMandateWizard::default();
        wizard.update(WizardMsg::SetName("Trip Helper".to_string())).expect("name");
        wizard.update(WizardMsg::SetUseCase("plan trips".to_string())).expect("use case");
        wizard.update(WizardMsg::AddPreference("window seats".to_string())).expect("pref");
        wizard.update(WizardMsg::AddPreference("   ".to_string())).expect("blank pref");

        let mandate = wizard.submit(&notifier).expect("submit");
        assert_eq!(mandate.mandate_type, MandateType::Custom);
        assert_eq!(mandate.icon, IconName::Bot);
        assert_eq!(mandate.frequency, Frequency::OnDemand);
        assert!(mandate.is_active);
        assert_eq!(
            mandate.field("Use Case").and_then(|field| field.value.clone()),
            Some(FieldValue::text("plan trips"))
        );
        assert_eq!(
            mandate.field("Model").and_then(|field| field.value.clone()),
            Some(FieldValue::text("gpt-4o"))
        );
        assert!(mandate.field("Preference 1").is_some());
        assert!(mandate.field("Preference 2").is_none());
        assert!(wizard.config().name.is_empty());
    }
}
