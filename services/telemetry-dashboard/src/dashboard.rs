//! Operator page and JSON view of the dashboard

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;

use crate::app::Dashboard;
use crate::settings::{CloseReason, ThresholdField};
use crate::view::{DashboardView, QuantityField};

/// Build the dashboard axum router
pub fn build_router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/view", get(view_handler))
        .route("/settings/open", post(open_settings_handler))
        .route("/settings/edit", post(edit_settings_handler))
        .route("/settings/save", post(save_settings_handler))
        .route("/settings/close", post(close_settings_handler))
        .route("/polling/start", post(start_polling_handler))
        .route("/polling/stop", post(stop_polling_handler))
        .route("/health", get(health_handler))
        .with_state(dashboard)
}

#[derive(Debug, Deserialize)]
struct EditForm {
    field: ThresholdField,
    value: String,
}

/// Field values submitted alongside a save; absent fields keep their draft
#[derive(Debug, Default, Deserialize)]
struct SaveForm {
    temperature: Option<String>,
    heart_rate: Option<String>,
    gforce: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CloseForm {
    #[serde(default)]
    reason: CloseReason,
}

async fn index_handler(State(dashboard): State<Arc<Dashboard>>) -> impl IntoResponse {
    Html(render_page(&dashboard.snapshot().await))
}

async fn view_handler(State(dashboard): State<Arc<Dashboard>>) -> impl IntoResponse {
    Json(dashboard.snapshot().await)
}

async fn open_settings_handler(State(dashboard): State<Arc<Dashboard>>) -> impl IntoResponse {
    // Failure is already surfaced as a notice in the view
    let _ = dashboard.settings().open().await;
    Redirect::to("/")
}

async fn edit_settings_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Form(edit): Form<EditForm>,
) -> impl IntoResponse {
    dashboard.settings().edit(edit.field, &edit.value).await;
    Redirect::to("/")
}

async fn save_settings_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Form(fields): Form<SaveForm>,
) -> impl IntoResponse {
    let settings = dashboard.settings();
    let edits = [
        (ThresholdField::Temperature, fields.temperature),
        (ThresholdField::HeartRate, fields.heart_rate),
        (ThresholdField::Gforce, fields.gforce),
    ];
    for (field, value) in edits {
        if let Some(value) = value {
            settings.edit(field, &value).await;
        }
    }
    let outcome = settings.save().await;
    tracing::debug!("Save from operator page: {:?}", outcome);
    Redirect::to("/")
}

async fn close_settings_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Form(close): Form<CloseForm>,
) -> impl IntoResponse {
    dashboard.settings().close(close.reason).await;
    Redirect::to("/")
}

async fn start_polling_handler(State(dashboard): State<Arc<Dashboard>>) -> impl IntoResponse {
    dashboard.poller().start().await;
    Redirect::to("/")
}

async fn stop_polling_handler(State(dashboard): State<Arc<Dashboard>>) -> impl IntoResponse {
    dashboard.poller().stop().await;
    Redirect::to("/")
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

fn render_page(view: &DashboardView) -> String {
    // Auto-refresh would wipe what the operator is typing
    let refresh = if view.settings.is_open() {
        ""
    } else {
        r#"<meta http-equiv="refresh" content="1">"#
    };

    let readings = &view.readings;
    let thresholds = &view.thresholds;
    let cards = [
        render_card(
            "temperature",
            "Temperature",
            "&deg;C",
            &readings.temperature,
            &thresholds.temperature,
        ),
        render_card(
            "heart-rate",
            "Heart Rate",
            "BPM",
            &readings.heart_rate,
            &thresholds.heart_rate,
        ),
        render_card(
            "gforce",
            "G-Force",
            "g",
            &readings.gforce,
            &thresholds.gforce,
        ),
    ]
    .concat();

    let notice = view
        .settings
        .notice
        .as_deref()
        .map(|n| format!(r#"<p class="notice">{}</p>"#, escape_html(n)))
        .unwrap_or_default();

    let settings = match &view.settings.form {
        Some(form) => {
            let error = form
                .error
                .as_deref()
                .map(|e| format!(r#"<p class="form-error">{}</p>"#, escape_html(e)))
                .unwrap_or_default();
            format!(
                r#"<form class="backdrop" method="post" action="/settings/close">
        <input type="hidden" name="reason" value="click_outside">
        <button class="backdrop-hit" aria-label="Close settings"></button>
    </form>
    <div id="settings-modal" class="modal">
        <form method="post" action="/settings/close" class="close-x">
            <input type="hidden" name="reason" value="close">
            <button>&times;</button>
        </form>
        <h2>Alert Thresholds</h2>
        {error}
        <form method="post" action="/settings/save">
            <label>Temperature (&deg;C) <input id="temp-threshold-input" name="temperature" value="{temperature}"></label>
            <label>Heart Rate (BPM) <input id="hr-threshold-input" name="heart_rate" value="{heart_rate}"></label>
            <label>G-Force (g) <input id="gforce-threshold-input" name="gforce" value="{gforce}"></label>
            <button id="save-settings">Save</button>
        </form>
        <form method="post" action="/settings/close">
            <input type="hidden" name="reason" value="cancel">
            <button id="cancel-settings">Cancel</button>
        </form>
    </div>"#,
                error = error,
                temperature = escape_html(&form.temperature),
                heart_rate = escape_html(&form.heart_rate),
                gforce = escape_html(&form.gforce),
            )
        }
        None => concat!(
            r#"<form method="post" action="/settings/open">"#,
            r#"<button id="settings-btn">Settings</button></form>"#
        )
        .to_string(),
    };

    let last_updated = view.readings.last_updated.as_deref().unwrap_or("Never");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    {refresh}
    <title>Telemetry Dashboard</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem; }}
        .cards {{ display: flex; gap: 1rem; }}
        .card {{ flex: 1; padding: 1rem; border: 1px solid #dee2e6; border-radius: 0.5rem; }}
        .card.warning {{ background-color: #f8d7da; border-color: #f44336; }}
        .value {{ font-size: 2rem; font-weight: 600; }}
        .notice, .form-error {{ color: #721c24; }}
        .backdrop {{ position: fixed; inset: 0; background: rgba(0, 0, 0, 0.4); }}
        .backdrop-hit {{ width: 100%; height: 100%; opacity: 0; }}
        .modal {{ position: fixed; top: 20%; left: 50%; transform: translateX(-50%); background: #fff; padding: 1rem; border-radius: 0.5rem; }}
    </style>
</head>
<body>
    <h1>Telemetry Dashboard <span id="status" style="color: {status_color};">&#9679;</span> <small>{status}</small></h1>
    <section class="cards">{cards}</section>
    <p>Last update: <span id="last-update">{last_updated}</span></p>
    {notice}
    {settings}
    <form method="post" action="/polling/start"><button>Start</button></form>
    <form method="post" action="/polling/stop"><button>Stop</button></form>
</body>
</html>"#,
        refresh = refresh,
        status_color = view.status.color,
        status = view.status.state,
        cards = cards,
        last_updated = escape_html(last_updated),
        notice = notice,
        settings = settings,
    )
}

fn render_card(
    id: &str,
    title: &str,
    unit: &str,
    field: &QuantityField,
    threshold: &str,
) -> String {
    let class = if field.warning { "card warning" } else { "card" };
    format!(
        r#"<div id="{id}-card" class="{class}">
            <h2>{title}</h2>
            <div class="value"><span id="{id}">{value}</span> {unit}</div>
            <div>Threshold: <span id="{id}-threshold">{threshold}</span> {unit}</div>
        </div>"#,
        id = id,
        class = class,
        title = title,
        value = escape_html(&field.value),
        unit = unit,
        threshold = escape_html(threshold),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
