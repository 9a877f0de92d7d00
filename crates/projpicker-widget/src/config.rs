//! Widget configuration.
//!
//! Loaded from a YAML file, with the initial map view optionally overridden
//! by the `PROJPICKER_*` environment variables.

use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use projpicker_common::{InitialView, PickerError, PickerResult};
use projpicker_protocol::{LogicalOperator, SerializationMode, DEFAULT_QUERY_PATH};

use crate::dispatcher::{DispatchError, HttpTransport, QueryDispatcher};
use crate::widget::PickerWidget;

/// Everything needed to build a widget talking to one search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Base URL of the search server, e.g. `http://localhost:8000`.
    pub endpoint: String,
    #[serde(default = "default_query_path")]
    pub query_path: String,
    #[serde(default)]
    pub mode: SerializationMode,
    /// Operator selected when the widget starts.
    #[serde(default)]
    pub operator: LogicalOperator,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub initial_view: InitialView,
}

fn default_query_path() -> String {
    DEFAULT_QUERY_PATH.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl WidgetConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            query_path: default_query_path(),
            mode: SerializationMode::default(),
            operator: LogicalOperator::default(),
            request_timeout_secs: default_request_timeout_secs(),
            initial_view: InitialView::default(),
        }
    }

    /// Load and validate a YAML config file.
    pub fn from_file(path: impl AsRef<Path>) -> PickerResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PickerError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: WidgetConfig = serde_yaml::from_str(&contents).map_err(|e| {
            PickerError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        debug!(path = %path.display(), endpoint = %config.endpoint, "Loaded widget config");
        Ok(config)
    }

    /// Apply `PROJPICKER_*` view overrides from the process environment.
    pub fn with_env_view(self) -> PickerResult<Self> {
        self.with_view_overrides(|key| std::env::var(key).ok())
    }

    /// Apply view overrides found through `lookup`.
    pub fn with_view_overrides<F>(mut self, lookup: F) -> PickerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.initial_view = self.initial_view.overlay(lookup)?;
        Ok(self)
    }

    pub fn validate(&self) -> PickerResult<()> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            PickerError::Config(format!("invalid endpoint '{}': {}", self.endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PickerError::Config(format!(
                "endpoint '{}' must use http or https",
                self.endpoint
            )));
        }
        if self.query_path.trim().is_empty() {
            return Err(PickerError::Config("query_path must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(PickerError::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn build_widget(&self) -> PickerWidget {
        PickerWidget::new(self.mode, self.operator)
    }

    pub fn build_dispatcher(&self) -> Result<QueryDispatcher<HttpTransport>, DispatchError> {
        let transport = HttpTransport::new(&self.endpoint, self.timeout())?;
        Ok(QueryDispatcher::new(transport, self.query_path.clone()))
    }
}
