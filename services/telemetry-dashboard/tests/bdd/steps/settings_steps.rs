//! BDD step definitions for the threshold settings feature

use cucumber::{given, then, when};
use telemetry_dashboard::settings::{CloseReason, SaveOutcome, ThresholdField};

use crate::fake_store::{settings_body, SaveBehaviour};
use crate::world::DashboardWorld;

fn parse_reason(s: &str) -> CloseReason {
    match s {
        "close" => CloseReason::Close,
        "cancel" => CloseReason::Cancel,
        "click_outside" => CloseReason::ClickOutside,
        other => panic!("Unknown close reason: {}", other),
    }
}

#[given(expr = "a settings store holding temperature {float}, heart rate {int} and g-force {float}")]
fn store_holding(world: &mut DashboardWorld, temperature: f64, heart_rate: i64, gforce: f64) {
    world
        .store()
        .set_settings(settings_body(temperature, heart_rate, gforce));
}

#[given("the threshold labels have been loaded")]
async fn labels_loaded(world: &mut DashboardWorld) {
    world
        .dashboard()
        .settings()
        .refresh_labels()
        .await
        .expect("labels should load");
    let labels = world.dashboard().snapshot().await.thresholds;
    world.labels_before = Some(labels);
}

#[given("the store accepts saves")]
fn store_accepts(world: &mut DashboardWorld) {
    world.store().set_save(SaveBehaviour::Accept);
}

#[given(expr = "the store rejects saves with {string}")]
fn store_rejects(world: &mut DashboardWorld, message: String) {
    world.store().set_save(SaveBehaviour::Reject(message));
}

#[given("the store is unreachable for saves")]
fn store_unreachable_for_saves(world: &mut DashboardWorld) {
    world.store().set_save(SaveBehaviour::Unreachable);
}

#[given("the settings store is unreachable")]
fn settings_unreachable(world: &mut DashboardWorld) {
    world.store().set_settings_unreachable(true);
}

#[when("the operator opens settings")]
async fn operator_opens(world: &mut DashboardWorld) {
    // Failures surface through the view, which the Then steps inspect
    let _ = world.dashboard().settings().open().await;
}

#[when(expr = "the operator enters temperature {string}, heart rate {string} and g-force {string}")]
async fn operator_enters(
    world: &mut DashboardWorld,
    temperature: String,
    heart_rate: String,
    gforce: String,
) {
    let settings = world.dashboard().settings();
    settings
        .edit(ThresholdField::Temperature, &temperature)
        .await;
    settings.edit(ThresholdField::HeartRate, &heart_rate).await;
    settings.edit(ThresholdField::Gforce, &gforce).await;
}

#[when("the operator saves")]
async fn operator_saves(world: &mut DashboardWorld) {
    let outcome = world.dashboard().settings().save().await;
    world.last_save = Some(outcome);
}

#[when(expr = "the operator closes the form by {string}")]
async fn operator_closes(world: &mut DashboardWorld, reason: String) {
    world
        .dashboard()
        .settings()
        .close(parse_reason(&reason))
        .await;
}

#[then("the settings form is open")]
async fn form_is_open(world: &mut DashboardWorld) {
    assert!(world.dashboard().snapshot().await.settings.is_open());
}

#[then("the settings form is closed")]
async fn form_is_closed(world: &mut DashboardWorld) {
    assert!(!world.dashboard().snapshot().await.settings.is_open());
}

#[then(expr = "the form shows temperature {string}, heart rate {string} and g-force {string}")]
async fn form_shows(
    world: &mut DashboardWorld,
    temperature: String,
    heart_rate: String,
    gforce: String,
) {
    let view = world.dashboard().snapshot().await;
    let form = view.settings.form.expect("settings form should be open");
    assert_eq!(form.temperature, temperature);
    assert_eq!(form.heart_rate, heart_rate);
    assert_eq!(form.gforce, gforce);
}

#[then(expr = "the form error is {string}")]
async fn form_error(world: &mut DashboardWorld, expected: String) {
    let view = world.dashboard().snapshot().await;
    let form = view.settings.form.expect("settings form should be open");
    assert_eq!(form.error, Some(expected));
}

#[then(expr = "the threshold labels show temperature {string}, heart rate {string} and g-force {string}")]
async fn labels_show(
    world: &mut DashboardWorld,
    temperature: String,
    heart_rate: String,
    gforce: String,
) {
    let thresholds = world.dashboard().snapshot().await.thresholds;
    assert_eq!(thresholds.temperature, temperature);
    assert_eq!(thresholds.heart_rate, heart_rate);
    assert_eq!(thresholds.gforce, gforce);
}

#[then("the threshold labels are unchanged")]
async fn labels_unchanged(world: &mut DashboardWorld) {
    let before = world
        .labels_before
        .clone()
        .expect("labels were not captured");
    assert_eq!(world.dashboard().snapshot().await.thresholds, before);
}

#[then("the save was accepted")]
fn save_accepted(world: &mut DashboardWorld) {
    assert!(matches!(world.last_save, Some(SaveOutcome::Saved(_))));
}

#[then("the store received no saves")]
fn no_saves(world: &mut DashboardWorld) {
    assert!(world.store().posts().is_empty());
}

#[then("a settings notice is shown")]
async fn notice_shown(world: &mut DashboardWorld) {
    let view = world.dashboard().snapshot().await;
    assert!(view.settings.notice.is_some());
}
