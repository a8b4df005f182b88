//! Dashboard instance: wires the display surface to its writers

use std::sync::Arc;

use crate::config::Config;
use crate::io::HttpClient;
use crate::poller::PollController;
use crate::renderer::DisplayRenderer;
use crate::settings::SettingsSynchronizer;
use crate::telemetry_client::TelemetryClient;
use crate::view::{new_view_handle, DashboardView, ViewHandle};

/// One dashboard: its view, poll controller and settings synchronizer.
///
/// The view is bound once here and shared with both writers.
#[derive(Debug)]
pub struct Dashboard {
    view: ViewHandle,
    poller: PollController,
    settings: SettingsSynchronizer,
}

impl Dashboard {
    pub fn new(config: &Config, http: Arc<dyn HttpClient>) -> crate::Result<Self> {
        config.validate()?;

        let view = new_view_handle();
        let client = Arc::new(TelemetryClient::new(&config.telemetry, http));
        let poller = PollController::new(
            Arc::clone(&client),
            DisplayRenderer::new(Arc::clone(&view)),
            config.polling.interval(),
        );
        let settings = SettingsSynchronizer::new(client, Arc::clone(&view));

        Ok(Self {
            view,
            poller,
            settings,
        })
    }

    pub fn poller(&self) -> &PollController {
        &self.poller
    }

    pub fn settings(&self) -> &SettingsSynchronizer {
        &self.settings
    }

    /// Copy of everything currently displayed
    pub async fn snapshot(&self) -> DashboardView {
        self.view.read().await.clone()
    }
}
