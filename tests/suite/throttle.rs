//! Leading-edge cool-down and in-flight dropping.

use std::time::Duration;

use navstack_core::{ControllerState, NavSettings, PopOutcome, PushOutcome};
use navstack_types::TransitionKind;

use crate::common::{COOLDOWN, Harness, cool_down};

#[tokio::test(start_paused = true)]
async fn second_push_inside_window_is_dropped() {
    let h = Harness::new();

    let first = h.nav.push_from_source("home.tmpl").await.unwrap();
    let second = h.nav.push_from_source("detail.tmpl").await.unwrap();

    assert!(matches!(first, PushOutcome::Pushed(_)));
    assert_eq!(second, PushOutcome::Throttled);
    assert_eq!(h.nav.depth(), 1);
    assert_eq!(h.mem.renderer.mounted_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn window_reopens_exactly_at_cooldown() {
    let h = Harness::new();
    h.nav.push_from_source("home.tmpl").await.unwrap();

    tokio::time::advance(COOLDOWN - Duration::from_millis(1)).await;
    let early = h.nav.push_from_source("detail.tmpl").await.unwrap();
    assert_eq!(early, PushOutcome::Throttled);

    // A dropped call does not extend the window.
    tokio::time::advance(Duration::from_millis(1)).await;
    let on_time = h.nav.push_from_source("detail.tmpl").await.unwrap();
    assert!(matches!(on_time, PushOutcome::Pushed(_)));
    assert_eq!(h.nav.depth(), 2);
}

#[tokio::test(start_paused = true)]
async fn push_and_pop_windows_are_independent() {
    let h = Harness::new().with_root("Home");

    h.nav.push_from_source("detail.tmpl").await.unwrap();
    let popped = h.nav.pop().await.unwrap();
    assert!(matches!(popped, PopOutcome::Popped(_)));

    let pushed = h.nav.push_from_source("detail.tmpl").await.unwrap();
    assert_eq!(pushed, PushOutcome::Throttled);
    assert_eq!(h.nav.depth(), 1);
}

#[tokio::test(start_paused = true)]
async fn requests_during_a_slow_transition_are_dropped() {
    let h = Harness::animated(Duration::from_millis(500)).with_root("Home");

    let (pushed, dropped_push, dropped_pop) = tokio::join!(
        h.nav.push_from_source("detail.tmpl"),
        async {
            // Past the push window, while the animation still runs.
            tokio::time::sleep(COOLDOWN + Duration::from_millis(50)).await;
            assert_eq!(
                h.nav.state(),
                ControllerState::Transitioning(TransitionKind::Push)
            );
            h.nav.push_from_source("settings.tmpl").await
        },
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            h.nav.pop().await
        },
    );

    assert!(matches!(pushed.unwrap(), PushOutcome::Pushed(_)));
    assert_eq!(dropped_push.unwrap(), PushOutcome::Throttled);
    assert_eq!(dropped_pop.unwrap(), PopOutcome::Throttled);
    assert_eq!(h.nav.depth(), 2);
    assert_eq!(h.nav.state(), ControllerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn pop_dropped_while_busy_keeps_its_window() {
    let h = Harness::animated(Duration::from_millis(100)).with_root("Home");
    h.nav.push_from_source("detail.tmpl").await.unwrap();
    cool_down().await;

    let (_, dropped) = tokio::join!(h.nav.push_from_source("settings.tmpl"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.nav.pop().await
    });
    assert_eq!(dropped.unwrap(), PopOutcome::Throttled);

    // The busy rejection did not start a pop window.
    let popped = h.nav.pop().await.unwrap();
    assert!(matches!(popped, PopOutcome::Popped(_)));
    assert_eq!(h.nav.current_title(), "Detail");
}

#[tokio::test(start_paused = true)]
async fn zero_cooldown_admits_back_to_back_requests() {
    let h = Harness::with_settings(NavSettings::default().with_cooldown(Duration::ZERO));

    for source in ["home.tmpl", "detail.tmpl", "settings.tmpl"] {
        let outcome = h.nav.push_from_source(source).await.unwrap();
        assert!(matches!(outcome, PushOutcome::Pushed(_)), "{source}");
    }
    assert_eq!(h.nav.depth(), 3);
}
