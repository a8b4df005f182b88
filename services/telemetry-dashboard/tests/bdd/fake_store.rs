//! In-memory stand-in for the telemetry source and settings store

use std::sync::Mutex;

use async_trait::async_trait;
use telemetry_dashboard::io::{HttpClient, HttpResponse};
use telemetry_dashboard::DashboardError;

#[derive(Debug, Clone, PartialEq)]
pub enum SaveBehaviour {
    Accept,
    Reject(String),
    Unreachable,
}

#[derive(Debug)]
struct FakeState {
    reading: String,
    reading_failing: bool,
    settings: String,
    settings_unreachable: bool,
    save: SaveBehaviour,
    reading_gets: u32,
    posts: Vec<String>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            reading: reading_body(36.5, 80, 1.0, false),
            reading_failing: false,
            settings: settings_body(38.0, 120, 4.5),
            settings_unreachable: false,
            save: SaveBehaviour::Accept,
            reading_gets: 0,
            posts: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeStore {
    state: Mutex<FakeState>,
}

pub fn reading_body(temperature: f64, heart_rate: i64, gforce: f64, hr_warning: bool) -> String {
    serde_json::json!({
        "temperature": temperature,
        "heart_rate": heart_rate,
        "gforce": gforce,
        "warnings": {"temperature": false, "heart_rate": hr_warning, "gforce": false}
    })
    .to_string()
}

pub fn settings_body(temperature: f64, heart_rate: i64, gforce: f64) -> String {
    serde_json::json!({
        "TEMPERATURE_THRESHOLD": temperature,
        "HEART_RATE_THRESHOLD": heart_rate,
        "GFORCE_THRESHOLD": gforce
    })
    .to_string()
}

impl FakeStore {
    pub fn set_reading(&self, body: String) {
        self.state.lock().unwrap().reading = body;
    }

    pub fn set_reading_failing(&self, failing: bool) {
        self.state.lock().unwrap().reading_failing = failing;
    }

    pub fn set_settings(&self, body: String) {
        self.state.lock().unwrap().settings = body;
    }

    pub fn set_settings_unreachable(&self, unreachable: bool) {
        self.state.lock().unwrap().settings_unreachable = unreachable;
    }

    pub fn set_save(&self, behaviour: SaveBehaviour) {
        self.state.lock().unwrap().save = behaviour;
    }

    pub fn reading_gets(&self) -> u32 {
        self.state.lock().unwrap().reading_gets
    }

    pub fn posts(&self) -> Vec<String> {
        self.state.lock().unwrap().posts.clone()
    }
}

fn ok(body: String) -> HttpResponse {
    HttpResponse { status: 200, body }
}

#[async_trait]
impl HttpClient for FakeStore {
    async fn get(&self, url: &str) -> telemetry_dashboard::Result<HttpResponse> {
        let mut state = self.state.lock().unwrap();
        if url.ends_with("/api/sensor-data") {
            state.reading_gets += 1;
            if state.reading_failing {
                return Ok(HttpResponse {
                    status: 503,
                    body: "Service Unavailable".to_string(),
                });
            }
            return Ok(ok(state.reading.clone()));
        }
        if url.ends_with("/api/settings") {
            if state.settings_unreachable {
                return Err(DashboardError::Transport(format!(
                    "GET {} failed: connection refused",
                    url
                )));
            }
            return Ok(ok(state.settings.clone()));
        }
        Ok(HttpResponse {
            status: 404,
            body: "Not Found".to_string(),
        })
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> telemetry_dashboard::Result<HttpResponse> {
        let mut state = self.state.lock().unwrap();
        state.posts.push(body.to_string());
        match state.save.clone() {
            SaveBehaviour::Accept => {
                state.settings = body.to_string();
                Ok(ok(r#"{"success": true}"#.to_string()))
            }
            SaveBehaviour::Reject(message) => Ok(HttpResponse {
                status: 400,
                body: serde_json::json!({ "error": message }).to_string(),
            }),
            SaveBehaviour::Unreachable => Err(DashboardError::Transport(format!(
                "POST {} failed: connection reset",
                url
            ))),
        }
    }
}
