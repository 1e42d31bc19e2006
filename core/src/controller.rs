//! Navigation controller.
//!
//! Owns a [`PageStack`] and mediates every mutation through a leading-edge
//! throttle and a `Idle -> Transitioning -> Idle` state machine. A push runs
//! as one linear async sequence: resolve, mount, commit, animate, settle.
//! Requests that arrive while a transition is in flight, or inside a
//! cool-down window, are dropped rather than queued.
//!
//! Teardown via [`NavController::destroy`] is terminal. Suspended transitions
//! notice it at their next step and finish as [`PushOutcome::Abandoned`] /
//! [`PopOutcome::Abandoned`] without touching the stack.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use futures_util::FutureExt;
use futures_util::future::join;
use tokio::sync::broadcast;
use tokio::time::Instant;

use navstack_types::{
    Direction, NavBarState, NavError, PageId, SubscriptionId, TransitionKind, ViewHandle,
};

use crate::collab::{BackHandler, NavCollaborators};
use crate::settings::NavSettings;
use crate::stack::{Page, PageStack, TransitionTicket};
use crate::throttle::CooldownGate;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Transitioning(TransitionKind),
    Destroyed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Resolved, mounted, and now on top.
    Pushed(PageId),
    /// Dropped: inside the cool-down window or another transition in flight.
    Throttled,
    /// Resolution or mounting failed; the stack is unchanged.
    Failed(NavError),
    /// The controller was destroyed before the transition completed.
    Abandoned,
}

impl PushOutcome {
    #[must_use]
    pub fn page_id(&self) -> Option<PageId> {
        match self {
            Self::Pushed(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopOutcome {
    Popped(PageId),
    /// Nothing to go back to.
    AtRoot,
    Throttled,
    Abandoned,
}

/// Broadcast after the stack changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Pushed { page: PageId, depth: usize },
    Popped { page: PageId, depth: usize },
    TransitionFailed { kind: TransitionKind, error: NavError },
    Destroyed,
}

pub struct NavController {
    settings: NavSettings,
    collab: NavCollaborators,
    stack: RefCell<PageStack>,
    state: Cell<ControllerState>,
    push_gate: CooldownGate,
    pop_gate: CooldownGate,
    back_subscription: Cell<Option<SubscriptionId>>,
    next_page_id: Cell<u64>,
    events: broadcast::Sender<NavEvent>,
    this: Weak<Self>,
}

impl NavController {
    /// Build a controller and register its hardware back handler.
    #[must_use]
    pub fn new(settings: NavSettings, collab: NavCollaborators) -> Rc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let controller = Rc::new_cyclic(|this| Self {
            push_gate: CooldownGate::new(settings.push_cooldown),
            pop_gate: CooldownGate::new(settings.pop_cooldown),
            settings,
            collab,
            stack: RefCell::new(PageStack::new()),
            state: Cell::new(ControllerState::Idle),
            back_subscription: Cell::new(None),
            next_page_id: Cell::new(1),
            events,
            this: this.clone(),
        });
        controller.register_back_handler();
        controller
    }

    /// Push the configured first page, if any.
    pub async fn start(&self) -> Result<Option<PushOutcome>, NavError> {
        self.ensure_live("start")?;
        let Some(first) = self.settings.first.clone() else {
            return Ok(None);
        };
        self.push_from_source(&first).await.map(Some)
    }

    pub async fn push_from_source(&self, source_ref: &str) -> Result<PushOutcome, NavError> {
        self.ensure_live("push")?;
        if !self.admit(&self.push_gate, TransitionKind::Push) {
            return Ok(PushOutcome::Throttled);
        }

        let ticket = self
            .stack
            .borrow_mut()
            .begin_transition(TransitionKind::Push)?;
        self.state
            .set(ControllerState::Transitioning(TransitionKind::Push));
        tracing::debug!(source_ref, "Push started");

        let outcome = self.run_push(source_ref, &ticket).await;
        self.settle(ticket, matches!(outcome, Ok(PushOutcome::Pushed(_))));
        outcome
    }

    pub async fn pop(&self) -> Result<PopOutcome, NavError> {
        self.ensure_live("pop")?;
        if !self.admit(&self.pop_gate, TransitionKind::Pop) {
            return Ok(PopOutcome::Throttled);
        }
        if !self.can_go_back() {
            tracing::debug!("Pop ignored at root");
            return Ok(PopOutcome::AtRoot);
        }

        let ticket = self
            .stack
            .borrow_mut()
            .begin_transition(TransitionKind::Pop)?;
        self.state
            .set(ControllerState::Transitioning(TransitionKind::Pop));

        let outcome = self.run_pop(&ticket).await;
        self.settle(ticket, matches!(outcome, Ok(PopOutcome::Popped(_))));
        outcome
    }

    /// Register a page whose view is already mounted (declared inline by the
    /// host), bypassing resolution. The covered page is hidden. Refused
    /// mid-transition.
    pub fn adopt_page(
        &self,
        title: impl Into<String>,
        view: ViewHandle,
        nav_bar_visible: bool,
    ) -> Result<PageId, NavError> {
        self.ensure_live("adopt page")?;
        let previous = {
            let stack = self.stack.borrow();
            if stack.in_flight().is_some() {
                return Err(NavError::invalid_state(
                    "adopt page",
                    "a transition is in flight",
                ));
            }
            stack.top().map(Page::view)
        };
        let page = Page::new(self.allocate_page_id(), title, view, nav_bar_visible);
        let id = page.id();
        self.stack.borrow_mut().push(page)?;
        if let Some(previous) = previous {
            self.collab.renderer.set_visible(previous, false);
        }

        let depth = self.depth();
        tracing::debug!(page = %id, depth, "Page adopted");
        self.project_nav_bar(None);
        self.emit(NavEvent::Pushed { page: id, depth });
        Ok(id)
    }

    /// Retitle the current page. Returns `false` when the stack is empty.
    pub fn set_title(&self, title: impl Into<String>) -> Result<bool, NavError> {
        self.ensure_live("set title")?;
        let retitled = {
            let mut stack = self.stack.borrow_mut();
            if let Some(top) = stack.top_mut() {
                top.set_title(title);
                true
            } else {
                false
            }
        };
        if retitled {
            self.project_nav_bar(None);
        }
        Ok(retitled)
    }

    pub fn bind_hardware_back(&self) -> Result<(), NavError> {
        self.ensure_live("bind hardware back")?;
        self.register_back_handler();
        Ok(())
    }

    /// Idempotent.
    pub fn unbind_hardware_back(&self) {
        if let Some(id) = self.back_subscription.take() {
            self.collab.platform.off_hardware_back(id);
            tracing::debug!(subscription = %id, "Hardware back unbound");
        }
    }

    /// Release every page (top first) and the back binding. Idempotent.
    pub async fn destroy(&self) {
        if self.is_destroyed() {
            return;
        }
        self.state.set(ControllerState::Destroyed);
        self.unbind_hardware_back();

        let pages = self.stack.borrow_mut().drain_top_down();
        tracing::info!(pages = pages.len(), "Navigation controller destroyed");
        self.collab.nav_bar.project(&NavBarState::empty());
        self.emit(NavEvent::Destroyed);
        for page in pages {
            self.collab.renderer.unmount(page.view()).await;
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NavEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state.get()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.state.get() == ControllerState::Destroyed
    }

    #[must_use]
    pub fn settings(&self) -> &NavSettings {
        &self.settings
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.borrow().depth()
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.depth() > 1
    }

    #[must_use]
    pub fn current_title(&self) -> String {
        self.stack
            .borrow()
            .top()
            .map(|page| page.title().to_string())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn nav_bar_visible(&self) -> bool {
        self.stack.borrow().top().is_some_and(Page::nav_bar_visible)
    }

    #[must_use]
    pub fn current_page(&self) -> Option<PageId> {
        self.stack.borrow().top().map(Page::id)
    }

    /// Bottom to top.
    #[must_use]
    pub fn page_ids(&self) -> Vec<PageId> {
        self.stack.borrow().iter().map(Page::id).collect()
    }

    /// Direction of the last completed transition, for renderers that show
    /// pages lazily and pick their animation on the next visibility change.
    #[must_use]
    pub fn last_direction(&self) -> Option<Direction> {
        self.stack.borrow().last_direction()
    }

    #[must_use]
    pub fn nav_bar_state(&self) -> NavBarState {
        self.projection(None)
    }

    async fn run_push(
        &self,
        source_ref: &str,
        ticket: &TransitionTicket,
    ) -> Result<PushOutcome, NavError> {
        let content = match self.collab.resolver.resolve(source_ref).await {
            Ok(content) => content,
            Err(failure) => {
                return Ok(self.fail_push(NavError::ContentResolutionFailed {
                    source_ref: source_ref.to_string(),
                    reason: failure.to_string(),
                }));
            }
        };
        if self.is_destroyed() {
            return Ok(PushOutcome::Abandoned);
        }

        let title = content.title.clone();
        let nav_bar_visible = content
            .nav_bar
            .unwrap_or(self.settings.default_nav_bar_visible);
        let view = match self
            .collab
            .renderer
            .mount(content, &self.settings.container)
            .await
        {
            Ok(view) => view,
            Err(failure) => {
                return Ok(self.fail_push(NavError::RenderFailed {
                    source_ref: source_ref.to_string(),
                    reason: failure.to_string(),
                }));
            }
        };
        if self.is_destroyed() {
            self.collab.renderer.unmount(view).await;
            return Ok(PushOutcome::Abandoned);
        }

        let page = Page::new(self.allocate_page_id(), title, view, nav_bar_visible);
        let id = page.id();
        let previous = self.stack.borrow().top().map(Page::view);
        let committed = self.stack.borrow_mut().commit_push(ticket, page);
        if let Err(err) = committed {
            self.collab.renderer.unmount(view).await;
            return Err(err);
        }

        let depth = self.depth();
        tracing::info!(page = %id, depth, source_ref, "Page pushed");
        self.project_nav_bar(Some(Direction::Forward));
        self.emit(NavEvent::Pushed { page: id, depth });

        // The first page of an empty stack appears without animation.
        if let Some(previous) = previous {
            let classes = &self.settings.animation;
            join(
                self.collab
                    .animator
                    .apply_exit(previous, classes.exit_cue(Direction::Forward)),
                self.collab
                    .animator
                    .apply_enter(view, classes.enter_cue(Direction::Forward)),
            )
            .await;
            if self.is_destroyed() {
                return Ok(PushOutcome::Abandoned);
            }
            self.collab.renderer.set_visible(previous, false);
        }

        Ok(PushOutcome::Pushed(id))
    }

    async fn run_pop(&self, ticket: &TransitionTicket) -> Result<PopOutcome, NavError> {
        let committed = self.stack.borrow_mut().commit_pop(ticket);
        let Some(popped) = committed? else {
            return Ok(PopOutcome::AtRoot);
        };
        let next = self.stack.borrow().top().map(Page::view);

        let depth = self.depth();
        tracing::info!(page = %popped.id(), depth, "Page popped");
        self.project_nav_bar(Some(Direction::Backward));
        self.emit(NavEvent::Popped {
            page: popped.id(),
            depth,
        });

        let classes = &self.settings.animation;
        let exit = self
            .collab
            .animator
            .apply_exit(popped.view(), classes.exit_cue(Direction::Backward));
        if let Some(next) = next {
            self.collab.renderer.set_visible(next, true);
            let enter = self
                .collab
                .animator
                .apply_enter(next, classes.enter_cue(Direction::Backward));
            join(exit, enter).await;
        } else {
            exit.await;
        }

        // The popped page is out of the stack, so teardown cannot release it.
        self.collab.renderer.unmount(popped.view()).await;
        if self.is_destroyed() {
            return Ok(PopOutcome::Abandoned);
        }
        Ok(PopOutcome::Popped(popped.id()))
    }

    fn fail_push(&self, error: NavError) -> PushOutcome {
        if self.is_destroyed() {
            return PushOutcome::Abandoned;
        }
        tracing::warn!(%error, "Push failed, stack unchanged");
        self.emit(NavEvent::TransitionFailed {
            kind: TransitionKind::Push,
            error: error.clone(),
        });
        PushOutcome::Failed(error)
    }

    fn admit(&self, gate: &CooldownGate, kind: TransitionKind) -> bool {
        let state = self.state.get();
        if state != ControllerState::Idle {
            tracing::debug!(%kind, ?state, "Request dropped, transition in flight");
            return false;
        }
        if !gate.try_acquire(Instant::now()) {
            tracing::debug!(%kind, cooldown = ?gate.cooldown(), "Request dropped, cooling down");
            return false;
        }
        true
    }

    fn settle(&self, ticket: TransitionTicket, applied: bool) {
        if self.is_destroyed() {
            return;
        }
        self.stack.borrow_mut().finish_transition(ticket, applied);
        self.state.set(ControllerState::Idle);
    }

    fn ensure_live(&self, operation: &'static str) -> Result<(), NavError> {
        if self.is_destroyed() {
            return Err(NavError::invalid_state(operation, "controller destroyed"));
        }
        Ok(())
    }

    fn allocate_page_id(&self) -> PageId {
        let id = self.next_page_id.get();
        self.next_page_id.set(id + 1);
        PageId::new(id)
    }

    fn projection(&self, direction: Option<Direction>) -> NavBarState {
        let stack = self.stack.borrow();
        match stack.top() {
            Some(top) => NavBarState {
                title: top.title().to_string(),
                back_button_visible: stack.depth() > 1,
                is_visible: top.nav_bar_visible(),
                direction,
            },
            None => NavBarState {
                direction,
                ..NavBarState::empty()
            },
        }
    }

    fn project_nav_bar(&self, direction: Option<Direction>) {
        let state = self.projection(direction);
        self.collab.nav_bar.project(&state);
    }

    fn emit(&self, event: NavEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    fn register_back_handler(&self) {
        if self.back_subscription.get().is_some() {
            return;
        }
        let this = self.this.clone();
        let handler: BackHandler = Rc::new(move || {
            let this = this.clone();
            async move {
                let Some(controller) = this.upgrade() else {
                    return;
                };
                match controller.pop().await {
                    Ok(outcome) => tracing::debug!(?outcome, "Hardware back handled"),
                    Err(err) => tracing::debug!(%err, "Hardware back ignored"),
                }
            }
            .boxed_local()
        });
        let id = self.collab.platform.on_hardware_back(handler);
        tracing::debug!(subscription = %id, "Hardware back bound");
        self.back_subscription.set(Some(id));
    }
}

impl Drop for NavController {
    fn drop(&mut self) {
        self.unbind_hardware_back();
    }
}
