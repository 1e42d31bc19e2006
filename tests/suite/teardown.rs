//! Destroy, back-button unbinding, and the root-page floor.

use std::time::Duration;

use navstack_core::memory::MemoryCollaborators;
use navstack_core::{
    ControllerState, NavController, NavEvent, NavSettings, PopOutcome, PushOutcome,
};
use navstack_types::NavBarState;

use crate::common::{Harness, catalog, cool_down};

#[tokio::test(start_paused = true)]
async fn back_press_after_destroy_mutates_nothing() {
    let h = Harness::new().with_root("Home");
    h.nav.push_from_source("detail.tmpl").await.unwrap();
    assert_eq!(h.mem.back_button.handler_count(), 1);

    h.nav.destroy().await;
    assert_eq!(h.mem.back_button.handler_count(), 0);
    let projections = h.mem.nav_bar.len();

    cool_down().await;
    h.mem.back_button.press().await;
    assert_eq!(h.nav.depth(), 0);
    assert_eq!(h.mem.nav_bar.len(), projections);
    assert_eq!(h.nav.state(), ControllerState::Destroyed);
}

#[tokio::test(start_paused = true)]
async fn destroy_releases_pages_top_down_and_is_idempotent() {
    let h = Harness::new();
    let mut events = h.nav.subscribe();
    h.nav.push_from_source("home.tmpl").await.unwrap();
    cool_down().await;
    h.nav.push_from_source("detail.tmpl").await.unwrap();
    let home = h.mem.renderer.find_by_title("Home").unwrap();
    let detail = h.mem.renderer.find_by_title("Detail").unwrap();

    h.nav.destroy().await;
    h.nav.destroy().await;

    assert_eq!(h.mem.renderer.unmounted(), vec![detail, home]);
    assert_eq!(h.mem.renderer.mounted_count(), 0);
    assert_eq!(h.mem.nav_bar.latest(), Some(NavBarState::empty()));

    let destroyed = std::iter::from_fn(|| events.try_recv().ok())
        .filter(|event| *event == NavEvent::Destroyed)
        .count();
    assert_eq!(destroyed, 1);
}

#[tokio::test(start_paused = true)]
async fn mutations_after_destroy_are_invalid_state() {
    let h = Harness::new().with_root("Home");
    h.nav.destroy().await;

    assert!(h.nav.push_from_source("detail.tmpl").await.unwrap_err().is_invalid_state());
    assert!(h.nav.pop().await.unwrap_err().is_invalid_state());
    assert!(h.nav.set_title("Again").unwrap_err().is_invalid_state());
    assert!(h.nav.bind_hardware_back().unwrap_err().is_invalid_state());
    assert!(h.nav.start().await.unwrap_err().is_invalid_state());

    // Queries stay answerable.
    assert_eq!(h.nav.current_title(), "");
    assert!(!h.nav.can_go_back());
    assert!(!h.nav.nav_bar_visible());
}

#[tokio::test(start_paused = true)]
async fn destroy_during_slow_resolution_abandons_push() {
    let mem = MemoryCollaborators::new(catalog().with_latency(Duration::from_millis(200)));
    let h = Harness::with_collaborators(mem);

    let (outcome, ()) = tokio::join!(h.nav.push_from_source("home.tmpl"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.nav.destroy().await;
    });

    assert_eq!(outcome.unwrap(), PushOutcome::Abandoned);
    assert_eq!(h.nav.depth(), 0);
    assert_eq!(h.mem.renderer.mounted_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn destroy_during_pop_animation_releases_popped_view() {
    let h = Harness::animated(Duration::from_millis(200)).with_root("Home");
    h.nav.push_from_source("detail.tmpl").await.unwrap();

    let (outcome, ()) = tokio::join!(h.nav.pop(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.nav.destroy().await;
    });

    assert_eq!(outcome.unwrap(), PopOutcome::Abandoned);
    assert_eq!(h.mem.renderer.mounted_count(), 0);
    assert_eq!(h.mem.back_button.handler_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_controller_unbinds_back() {
    let mem = MemoryCollaborators::new(catalog());
    let nav = NavController::new(NavSettings::default(), mem.handles());
    assert_eq!(mem.back_button.handler_count(), 1);

    drop(nav);
    assert_eq!(mem.back_button.handler_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn depth_never_drops_below_one() {
    let h = Harness::new().with_root("Home");
    let sources = ["detail.tmpl", "settings.tmpl", "login.tmpl"];

    // Deterministic mix of pushes, pops, and back presses.
    for step in 0..30_usize {
        match step % 5 {
            0 | 3 => {
                h.nav
                    .push_from_source(sources[step % sources.len()])
                    .await
                    .unwrap();
            }
            1 | 4 => {
                h.nav.pop().await.unwrap();
            }
            _ => h.mem.back_button.press().await,
        }
        assert!(h.nav.depth() >= 1, "step {step}");
        assert_eq!(h.nav.can_go_back(), h.nav.depth() > 1, "step {step}");
        if step % 2 == 0 {
            cool_down().await;
        }
    }

    while h.nav.can_go_back() {
        h.nav.pop().await.unwrap();
        cool_down().await;
    }
    cool_down().await;
    let before = h.mem.nav_bar.len();
    assert_eq!(h.nav.pop().await.unwrap(), PopOutcome::AtRoot);
    assert_eq!(h.nav.depth(), 1);
    assert_eq!(h.mem.nav_bar.len(), before);
    assert_eq!(h.nav.current_title(), "Home");
}
