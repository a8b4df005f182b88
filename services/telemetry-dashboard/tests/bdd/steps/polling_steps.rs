//! BDD step definitions for the polling feature

use cucumber::{given, then, when};
use telemetry_dashboard::status::ConnectivityState;

use crate::world::DashboardWorld;

fn parse_state(s: &str) -> ConnectivityState {
    match s {
        "connected" => ConnectivityState::Connected,
        "initializing" => ConnectivityState::Initializing,
        "error" => ConnectivityState::Error,
        other => panic!("Unknown connectivity state: {}", other),
    }
}

#[given("the telemetry source is failing")]
fn source_is_failing(world: &mut DashboardWorld) {
    world.store().set_reading_failing(true);
}

#[when("the telemetry source starts failing")]
fn source_starts_failing(world: &mut DashboardWorld) {
    world.store().set_reading_failing(true);
}

#[when("the telemetry source recovers")]
fn source_recovers(world: &mut DashboardWorld) {
    world.store().set_reading_failing(false);
}

#[when("polling is started")]
async fn polling_started(world: &mut DashboardWorld) {
    world.dashboard().poller().start().await;
}

#[when("polling is stopped")]
async fn polling_stopped(world: &mut DashboardWorld) {
    world.dashboard().poller().stop().await;
}

#[when("one poll cycle runs")]
async fn one_cycle(world: &mut DashboardWorld) {
    world.dashboard().poller().poll_once().await;
}

#[then("polling is running")]
async fn polling_is_running(world: &mut DashboardWorld) {
    assert!(world.dashboard().poller().is_running().await);
}

#[then("polling is not running")]
async fn polling_is_not_running(world: &mut DashboardWorld) {
    assert!(!world.dashboard().poller().is_running().await);
}

#[then(expr = "the telemetry source was polled {int} time(s)")]
fn polled_times(world: &mut DashboardWorld, expected: u32) {
    assert_eq!(world.store().reading_gets(), expected);
}

#[then(expr = "the connectivity status is {string}")]
async fn connectivity_status(world: &mut DashboardWorld, expected: String) {
    let view = world.dashboard().snapshot().await;
    assert_eq!(view.status.state, parse_state(&expected));
}

#[then(expr = "the status color is {string}")]
async fn status_color(world: &mut DashboardWorld, expected: String) {
    let view = world.dashboard().snapshot().await;
    assert_eq!(view.status.color, expected);
}
