//! Headless unit tests for the [`GameState`] state machine.
//!
//! These tests use [`MinimalPlugins`] — no window, no rendering, no physics —
//! so they run fast and deterministically in CI.
//!
//! Covered scenarios:
//! 1. Default initial state is `Editor`.
//! 2. A `NextState` request transitions from `Editor` → `Flight`.
//! 3. `Flight` persists across frames with no new transition request.

use apogee::app_state::GameState;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a minimal headless app with just the state registered via
/// `init_state`.  `StatesPlugin` adds the `StateTransition` schedule.
fn app_with_default_state() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<GameState>();
    app
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// The default variant of `GameState` is `Editor` — the game starts at the
/// build grid, not in flight.
#[test]
fn default_state_is_editor() {
    let mut app = app_with_default_state();
    app.update(); // run one frame so StateTransition fires
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::Editor, "initial state must be Editor");
}

/// Requesting `Flight` via `NextState` transitions the state on the next
/// `StateTransition` pass — this is the launch handoff path.
#[test]
fn transition_editor_to_flight() {
    let mut app = app_with_default_state();
    app.update(); // settle into Editor

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Flight);

    app.update(); // StateTransition fires; state becomes Flight

    let state = app.world().resource::<State<GameState>>();
    assert_eq!(
        *state.get(),
        GameState::Flight,
        "state must be Flight after explicit transition"
    );
}

/// `Flight` persists across additional frames — no accidental reversion back
/// to the editor.
#[test]
fn flight_state_persists_across_frames() {
    let mut app = app_with_default_state();
    app.update();

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Flight);
    app.update();

    for _ in 0..5 {
        app.update();
    }

    let state = app.world().resource::<State<GameState>>();
    assert_eq!(
        *state.get(),
        GameState::Flight,
        "Flight must remain stable without a new transition"
    );
}
