//! In-process collaborators.
//!
//! Used by the `navstack` binary and by tests. The resolver serves a fixed
//! catalog, the renderer tracks mounted views in a map, the animator records
//! what it was asked to play, and the back button is a local handler list.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;

use navstack_config::PageEntry;
use navstack_types::{
    AnimationCue, CollaboratorFailure, ContainerId, NavBarState, RenderableContent, SubscriptionId,
    ViewHandle,
};

use crate::collab::{
    BackHandler, ContentResolver, MountFut, NavBarSink, NavCollaborators, PlatformBackButton,
    ResolveFut, TransitionAnimator, ViewRenderer,
};

/// Most entries any recording collaborator keeps; older ones are dropped.
pub const RECORD_LIMIT: usize = 256;

fn record<T>(log: &RefCell<VecDeque<T>>, entry: T) {
    let mut log = log.borrow_mut();
    if log.len() == RECORD_LIMIT {
        log.pop_front();
    }
    log.push_back(entry);
}

// ============================================================================
// Resolver
// ============================================================================

/// Serves content from a fixed catalog keyed by source reference.
#[derive(Debug, Default)]
pub struct CatalogResolver {
    pages: HashMap<String, RenderableContent>,
    latency: Duration,
    failing: RefCell<HashSet<String>>,
}

impl CatalogResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_entries(entries: &[PageEntry]) -> Self {
        entries.iter().fold(Self::new(), |resolver, entry| {
            let mut content = RenderableContent::new(entry.title.clone(), entry.body.clone());
            content.nav_bar = entry.nav_bar;
            resolver.with_page(entry.source.clone(), content)
        })
    }

    #[must_use]
    pub fn with_page(mut self, source_ref: impl Into<String>, content: RenderableContent) -> Self {
        self.pages.insert(source_ref.into(), content);
        self
    }

    /// Delay every resolution by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make the next resolution of `source_ref` fail.
    pub fn fail_next(&self, source_ref: impl Into<String>) {
        self.failing.borrow_mut().insert(source_ref.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl ContentResolver for CatalogResolver {
    fn resolve<'a>(&'a self, source_ref: &'a str) -> ResolveFut<'a> {
        async move {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            if self.failing.borrow_mut().remove(source_ref) {
                return Err(CollaboratorFailure::new("injected failure"));
            }
            self.pages
                .get(source_ref)
                .cloned()
                .ok_or_else(|| {
                    CollaboratorFailure::new(format!("no page registered for {source_ref}"))
                })
        }
        .boxed_local()
    }
}

// ============================================================================
// Renderer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedView {
    pub title: String,
    pub body: String,
    pub container: ContainerId,
    pub visible: bool,
}

/// Keeps mounted views in a map keyed by handle.
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    next_handle: Cell<u64>,
    mounted: RefCell<BTreeMap<ViewHandle, MountedView>>,
    fail_next_mount: Cell<bool>,
    unmounted: RefCell<VecDeque<ViewHandle>>,
}

impl MemoryRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount synchronously, for pages adopted by the host.
    pub fn mount_now(&self, content: RenderableContent, container: &ContainerId) -> ViewHandle {
        let handle = ViewHandle::new(self.next_handle.get() + 1);
        self.next_handle.set(handle.value());
        self.mounted.borrow_mut().insert(
            handle,
            MountedView {
                title: content.title,
                body: content.body,
                container: container.clone(),
                visible: true,
            },
        );
        handle
    }

    pub fn fail_next_mount(&self) {
        self.fail_next_mount.set(true);
    }

    #[must_use]
    pub fn is_mounted(&self, view: ViewHandle) -> bool {
        self.mounted.borrow().contains_key(&view)
    }

    #[must_use]
    pub fn is_visible(&self, view: ViewHandle) -> bool {
        self.mounted.borrow().get(&view).is_some_and(|v| v.visible)
    }

    #[must_use]
    pub fn mounted_count(&self) -> usize {
        self.mounted.borrow().len()
    }

    #[must_use]
    pub fn view(&self, view: ViewHandle) -> Option<MountedView> {
        self.mounted.borrow().get(&view).cloned()
    }

    /// First mounted view carrying `title`.
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Option<ViewHandle> {
        self.mounted
            .borrow()
            .iter()
            .find(|(_, mounted)| mounted.title == title)
            .map(|(handle, _)| *handle)
    }

    /// Handles in the order they were unmounted, most recent [`RECORD_LIMIT`].
    #[must_use]
    pub fn unmounted(&self) -> Vec<ViewHandle> {
        self.unmounted.borrow().iter().copied().collect()
    }
}

impl ViewRenderer for MemoryRenderer {
    fn mount<'a>(&'a self, content: RenderableContent, container: &'a ContainerId) -> MountFut<'a> {
        async move {
            if self.fail_next_mount.replace(false) {
                return Err(CollaboratorFailure::new("mount rejected"));
            }
            Ok(self.mount_now(content, container))
        }
        .boxed_local()
    }

    fn unmount(&self, view: ViewHandle) -> LocalBoxFuture<'_, ()> {
        async move {
            if self.mounted.borrow_mut().remove(&view).is_some() {
                record(&self.unmounted, view);
            }
        }
        .boxed_local()
    }

    fn set_visible(&self, view: ViewHandle, visible: bool) {
        if let Some(mounted) = self.mounted.borrow_mut().get_mut(&view) {
            mounted.visible = visible;
        }
    }
}

// ============================================================================
// Animator
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Enter,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationRecord {
    pub view: ViewHandle,
    pub phase: AnimationPhase,
    pub cue: AnimationCue,
}

/// Records requested animations (the last [`RECORD_LIMIT`]) and completes
/// after a fixed duration.
#[derive(Debug, Default)]
pub struct RecordingAnimator {
    duration: Duration,
    log: RefCell<VecDeque<AnimationRecord>>,
}

impl RecordingAnimator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn records(&self) -> Vec<AnimationRecord> {
        self.log.borrow().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    fn play(
        &self,
        view: ViewHandle,
        phase: AnimationPhase,
        cue: AnimationCue,
    ) -> LocalBoxFuture<'_, ()> {
        record(&self.log, AnimationRecord { view, phase, cue });
        let duration = self.duration;
        async move {
            if !duration.is_zero() {
                tokio::time::sleep(duration).await;
            }
        }
        .boxed_local()
    }
}

impl TransitionAnimator for RecordingAnimator {
    fn apply_enter(&self, view: ViewHandle, cue: AnimationCue) -> LocalBoxFuture<'_, ()> {
        self.play(view, AnimationPhase::Enter, cue)
    }

    fn apply_exit(&self, view: ViewHandle, cue: AnimationCue) -> LocalBoxFuture<'_, ()> {
        self.play(view, AnimationPhase::Exit, cue)
    }
}

// ============================================================================
// Back button
// ============================================================================

/// Local stand-in for a platform back button.
#[derive(Default)]
pub struct LocalBackButton {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(SubscriptionId, BackHandler)>>,
}

impl LocalBackButton {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Deliver a back event to every registered handler, in registration order.
    pub async fn press(&self) {
        let handlers: Vec<BackHandler> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler().await;
        }
    }
}

impl PlatformBackButton for LocalBackButton {
    fn on_hardware_back(&self, handler: BackHandler) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id.get() + 1);
        self.next_id.set(id.value());
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    fn off_hardware_back(&self, id: SubscriptionId) {
        self.handlers.borrow_mut().retain(|(existing, _)| *existing != id);
    }
}

// ============================================================================
// Nav bar
// ============================================================================

/// Keeps the last [`RECORD_LIMIT`] projections it receives.
#[derive(Debug, Default)]
pub struct RecordingNavBar {
    history: RefCell<VecDeque<NavBarState>>,
}

impl RecordingNavBar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn latest(&self) -> Option<NavBarState> {
        self.history.borrow().back().cloned()
    }

    #[must_use]
    pub fn history(&self) -> Vec<NavBarState> {
        self.history.borrow().iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.history.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.borrow().is_empty()
    }
}

impl NavBarSink for RecordingNavBar {
    fn project(&self, state: &NavBarState) {
        record(&self.history, state.clone());
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// The in-memory collaborators with typed handles kept for inspection.
#[derive(Clone)]
pub struct MemoryCollaborators {
    pub resolver: Rc<CatalogResolver>,
    pub renderer: Rc<MemoryRenderer>,
    pub animator: Rc<RecordingAnimator>,
    pub back_button: Rc<LocalBackButton>,
    pub nav_bar: Rc<RecordingNavBar>,
}

impl MemoryCollaborators {
    #[must_use]
    pub fn new(resolver: CatalogResolver) -> Self {
        Self {
            resolver: Rc::new(resolver),
            renderer: Rc::new(MemoryRenderer::new()),
            animator: Rc::new(RecordingAnimator::new()),
            back_button: Rc::new(LocalBackButton::new()),
            nav_bar: Rc::new(RecordingNavBar::new()),
        }
    }

    #[must_use]
    pub fn with_animator(mut self, animator: RecordingAnimator) -> Self {
        self.animator = Rc::new(animator);
        self
    }

    /// Upcast into the trait objects a controller takes.
    #[must_use]
    pub fn handles(&self) -> NavCollaborators {
        NavCollaborators {
            resolver: self.resolver.clone(),
            renderer: self.renderer.clone(),
            animator: self.animator.clone(),
            platform: self.back_button.clone(),
            nav_bar: self.nav_bar.clone(),
        }
    }
}
