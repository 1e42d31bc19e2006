//! Collaborator failures recover to `Idle` without touching the stack.

use std::time::Duration;

use navstack_core::memory::{CatalogResolver, MemoryCollaborators};
use navstack_core::{ControllerState, PushOutcome};
use navstack_types::{NavError, RenderableContent};

use crate::common::{Harness, catalog, cool_down};

#[tokio::test(start_paused = true)]
async fn failed_resolution_then_retry_succeeds() {
    let h = Harness::new().with_root("Home");
    let before = h.mem.nav_bar.len();

    h.mem.resolver.fail_next("detail.tmpl");
    let failed = h.nav.push_from_source("detail.tmpl").await.unwrap();
    let PushOutcome::Failed(err) = failed else {
        panic!("expected failure, got {failed:?}");
    };
    assert_eq!(
        err,
        NavError::ContentResolutionFailed {
            source_ref: "detail.tmpl".to_string(),
            reason: "injected failure".to_string(),
        }
    );
    assert_eq!(h.nav.depth(), 1);
    assert_eq!(h.nav.state(), ControllerState::Idle);
    assert_eq!(h.mem.nav_bar.len(), before);

    // Retrying is subject to the same throttle.
    let early = h.nav.push_from_source("detail.tmpl").await.unwrap();
    assert_eq!(early, PushOutcome::Throttled);

    cool_down().await;
    let retried = h.nav.push_from_source("detail.tmpl").await.unwrap();
    assert!(matches!(retried, PushOutcome::Pushed(_)));
    assert_eq!(h.nav.current_title(), "Detail");
}

#[tokio::test(start_paused = true)]
async fn unknown_source_names_the_reference() {
    let h = Harness::new();
    let outcome = h.nav.push_from_source("nowhere.tmpl").await.unwrap();

    let PushOutcome::Failed(err) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(err.to_string().contains("nowhere.tmpl"), "{err}");
    assert!(!err.is_invalid_state());
    assert_eq!(h.nav.depth(), 0);
    assert_eq!(h.nav.current_title(), "");
}

#[tokio::test(start_paused = true)]
async fn mount_failure_releases_nothing_and_recovers() {
    let h = Harness::new().with_root("Home");

    h.mem.renderer.fail_next_mount();
    let outcome = h.nav.push_from_source("settings.tmpl").await.unwrap();
    assert!(matches!(
        outcome,
        PushOutcome::Failed(NavError::RenderFailed { .. })
    ));
    assert_eq!(h.mem.renderer.mounted_count(), 1);
    assert!(h.mem.renderer.unmounted().is_empty());

    cool_down().await;
    let outcome = h.nav.push_from_source("settings.tmpl").await.unwrap();
    assert!(matches!(outcome, PushOutcome::Pushed(_)));
    assert_eq!(h.mem.renderer.mounted_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_failing_resolution_holds_the_transition() {
    let resolver = catalog().with_latency(Duration::from_millis(400));
    resolver.fail_next("home.tmpl");
    let h = Harness::with_collaborators(MemoryCollaborators::new(resolver));

    let (failed, during) = tokio::join!(h.nav.push_from_source("home.tmpl"), async {
        tokio::time::sleep(Duration::from_millis(350)).await;
        h.nav.push_from_source("detail.tmpl").await
    });

    assert!(matches!(failed.unwrap(), PushOutcome::Failed(_)));
    assert_eq!(during.unwrap(), PushOutcome::Throttled);
    assert_eq!(h.nav.depth(), 0);
    assert_eq!(h.nav.state(), ControllerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn configured_catalog_drives_pushes() {
    let resolver = CatalogResolver::new().with_page(
        "only.tmpl",
        RenderableContent::new("Only", "<p/>").with_nav_bar(false),
    );
    let h = Harness::with_collaborators(MemoryCollaborators::new(resolver));

    h.nav.push_from_source("only.tmpl").await.unwrap();
    assert_eq!(h.nav.current_title(), "Only");
    assert!(!h.nav.nav_bar_visible());

    cool_down().await;
    let missing = h.nav.push_from_source("home.tmpl").await.unwrap();
    assert!(matches!(
        missing,
        PushOutcome::Failed(NavError::ContentResolutionFailed { .. })
    ));
    assert_eq!(h.nav.depth(), 1);
}
