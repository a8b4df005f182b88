//! Projects sensor readings onto the display surface

use crate::status::{ConnectivityState, StatusLight};
use crate::types::SensorReading;
use crate::view::{QuantityField, ViewHandle};

/// Writes reading fields and the status light
#[derive(Debug, Clone)]
pub struct DisplayRenderer {
    view: ViewHandle,
}

impl DisplayRenderer {
    pub fn new(view: ViewHandle) -> Self {
        Self { view }
    }

    /// Render a reading. `None` leaves the display untouched.
    ///
    /// Warning treatment is copied from `reading.warnings`; no thresholds are
    /// consulted here.
    pub async fn render(&self, reading: Option<&SensorReading>) {
        let Some(reading) = reading else {
            return;
        };

        let rendered_at = chrono::Local::now().format("%H:%M:%S").to_string();
        let mut view = self.view.write().await;
        let fields = &mut view.readings;
        fields.temperature = QuantityField {
            value: format_one_decimal(reading.temperature),
            warning: reading.warnings.temperature,
        };
        fields.heart_rate = QuantityField {
            value: reading.heart_rate.to_string(),
            warning: reading.warnings.heart_rate,
        };
        fields.gforce = QuantityField {
            value: format_one_decimal(reading.gforce),
            warning: reading.warnings.gforce,
        };
        fields.last_updated = Some(rendered_at);
        view.status = StatusLight::showing(ConnectivityState::Connected);
    }

    /// Update the status light only
    pub async fn show_status(&self, state: ConnectivityState) {
        self.view.write().await.status = StatusLight::showing(state);
    }
}

pub fn format_one_decimal(value: f64) -> String {
    format!("{:.1}", value)
}
