//! The display surface shared by the renderer and the settings form
//!
//! Created once by [`new_view_handle`] and handed to each writer. The
//! renderer owns `readings` and `status`; the settings synchronizer owns
//! `thresholds` and `settings`.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::status::StatusLight;

/// Text shown in a field that has never been written
pub const PLACEHOLDER: &str = "--";

/// A monitored quantity card: its value text and warning treatment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityField {
    pub value: String,
    pub warning: bool,
}

impl Default for QuantityField {
    fn default() -> Self {
        Self {
            value: PLACEHOLDER.to_string(),
            warning: false,
        }
    }
}

/// Live reading fields written on every successful poll
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReadingFields {
    pub temperature: QuantityField,
    pub heart_rate: QuantityField,
    pub gforce: QuantityField,
    pub last_updated: Option<String>,
}

/// Threshold labels shown next to each card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdLabels {
    pub temperature: String,
    pub heart_rate: String,
    pub gforce: String,
}

impl Default for ThresholdLabels {
    fn default() -> Self {
        Self {
            temperature: PLACEHOLDER.to_string(),
            heart_rate: PLACEHOLDER.to_string(),
            gforce: PLACEHOLDER.to_string(),
        }
    }
}

/// The open edit form: raw field text plus any inline error
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettingsForm {
    pub temperature: String,
    pub heart_rate: String,
    pub gforce: String,
    pub error: Option<String>,
}

/// Settings panel: the form when open, and a notice shown when opening failed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettingsPanel {
    pub form: Option<SettingsForm>,
    pub notice: Option<String>,
}

impl SettingsPanel {
    pub fn is_open(&self) -> bool {
        self.form.is_some()
    }
}

/// Everything visible on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub readings: ReadingFields,
    pub status: StatusLight,
    pub thresholds: ThresholdLabels,
    pub settings: SettingsPanel,
}

/// Shared handle to the display surface
pub type ViewHandle = Arc<RwLock<DashboardView>>;

pub fn new_view_handle() -> ViewHandle {
    Arc::new(RwLock::new(DashboardView::default()))
}
