use crate::errors::{AppError, AppResult};
use crate::fixtures::google_calendar_tasks;
use crate::models::{CalendarIntegration, CalendarProvider, ConnectResponse};
use crate::notifications::Notifier;
use chrono::{DateTime, Utc};

pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect calendar. Please try again.";

/// Completes the provider handshake once the simulated latency has elapsed.
pub trait ProviderLink: Send + Sync {
    fn handshake(&self, provider: CalendarProvider) -> anyhow::Result<()>;
}

/// Stand-in link that always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedLink;

impl ProviderLink for SimulatedLink {
    fn handshake(&self, provider: CalendarProvider) -> anyhow::Result<()> {
        tracing::debug!(provider = provider.as_str(), "simulated calendar handshake");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CalendarIntegrations {
    items: Vec<CalendarIntegration>,
    connecting: Option<CalendarProvider>,
    google_imported: bool,
}

impl Default for CalendarIntegrations {
    fn default() -> Self {
        let items = [CalendarProvider::Google, CalendarProvider::Outlook, CalendarProvider::Apple]
            .into_iter()
            .map(|provider| CalendarIntegration {
                id: provider.as_str().to_string(),
                provider,
                connected: false,
                last_synced: None,
            })
            .collect();
        Self {
            items,
            connecting: None,
            google_imported: false,
        }
    }
}

impl CalendarIntegrations {
    pub fn list(&self) -> &[CalendarIntegration] {
        &self.items
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting.is_some()
    }

    fn find_mut(&mut self, provider: CalendarProvider) -> AppResult<&mut CalendarIntegration> {
        self.items
            .iter_mut()
            .find(|item| item.provider == provider)
            .ok_or_else(|| AppError::NotFound(format!("calendar {}", provider.as_str())))
    }

    /// Marks a connect as in flight. Only one connect runs at a time.
    pub fn begin_connect(&mut self, provider: CalendarProvider) -> AppResult<()> {
        if let Some(active) = self.connecting {
            return Err(AppError::Integration(format!(
                "{} connect already in progress",
                active.display_name()
            )));
        }
        self.find_mut(provider)?;
        self.connecting = Some(provider);
        Ok(())
    }

    /// Clears the in-flight marker when a connect is abandoned before its handshake completes.
    pub fn cancel_connect(&mut self, provider: CalendarProvider) {
        if self.connecting == Some(provider) {
            tracing::info!(provider = provider.as_str(), "calendar connect cancelled");
            self.connecting = None;
        }
    }

    /// Applies the handshake outcome. On failure nothing but the in-flight marker changes.
    pub fn finish_connect(
        &mut self,
        provider: CalendarProvider,
        outcome: anyhow::Result<()>,
        now: DateTime<Utc>,
        notifier: &Notifier,
    ) -> AppResult<ConnectResponse> {
        self.connecting = None;
        if let Err(error) = outcome {
            tracing::warn!(provider = provider.as_str(), error = %error, "calendar connect failed");
            notifier.error(CONNECT_FAILED_MESSAGE);
            return Err(AppError::Integration(error.to_string()));
        }

        let item = self.find_mut(provider)?;
        item.connected = true;
        item.last_synced = Some(now);
        let integration = item.clone();
        tracing::info!(provider = provider.as_str(), "calendar connected");
        notifier.success(format!("Successfully connected to {}", provider.display_name()));

        let imported = if provider == CalendarProvider::Google && !self.google_imported {
            self.google_imported = true;
            google_calendar_tasks(now)
        } else {
            Vec::new()
        };
        Ok(ConnectResponse {
            integration,
            imported,
        })
    }

    pub fn disconnect(&mut self, provider: CalendarProvider, notifier: &Notifier) -> AppResult<CalendarIntegration> {
        let item = self.find_mut(provider)?;
        item.connected = false;
        item.last_synced = None;
        let integration = item.clone();
        tracing::info!(provider = provider.as_str(), "calendar disconnected");
        notifier.info(format!("Disconnected from {}", provider.display_name()));
        Ok(integration)
    }

    pub fn sync(
        &mut self,
        provider: CalendarProvider,
        now: DateTime<Utc>,
        notifier: &Notifier,
    ) -> AppResult<CalendarIntegration> {
        let item = self.find_mut(provider)?;
        if !item.connected {
            return Err(AppError::Integration(format!(
                "{} is not connected",
                provider.display_name()
            )));
        }
        item.last_synced = Some(now);
        let integration = item.clone();
        notifier.success(format!("Synced {}", provider.display_name()));
        Ok(integration)
    }
}
