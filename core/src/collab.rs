//! Collaborator seams of the navigation controller.
//!
//! The controller runs on a single thread of control, so every future here is
//! a [`LocalBoxFuture`] and implementations are free to use `Rc`/`RefCell`.

use std::rc::Rc;

use futures_util::future::LocalBoxFuture;

use navstack_types::{
    AnimationCue, CollaboratorFailure, ContainerId, NavBarState, RenderableContent, SubscriptionId,
    ViewHandle,
};

pub type ResolveFut<'a> = LocalBoxFuture<'a, Result<RenderableContent, CollaboratorFailure>>;
pub type MountFut<'a> = LocalBoxFuture<'a, Result<ViewHandle, CollaboratorFailure>>;

/// Handler registered with the platform; the platform drives the returned future.
pub type BackHandler = Rc<dyn Fn() -> LocalBoxFuture<'static, ()>>;

/// Turns a source reference into content a page can display.
pub trait ContentResolver {
    fn resolve<'a>(&'a self, source_ref: &'a str) -> ResolveFut<'a>;
}

/// Mounts and releases page views.
pub trait ViewRenderer {
    fn mount<'a>(&'a self, content: RenderableContent, container: &'a ContainerId) -> MountFut<'a>;

    fn unmount(&self, view: ViewHandle) -> LocalBoxFuture<'_, ()>;

    /// Show or hide a mounted view without releasing it.
    fn set_visible(&self, view: ViewHandle, visible: bool) {
        let _ = (view, visible);
    }
}

/// Plays enter/exit animations. Completion of the future means the animation
/// finished; animations cannot fail.
pub trait TransitionAnimator {
    fn apply_enter(&self, view: ViewHandle, cue: AnimationCue) -> LocalBoxFuture<'_, ()>;

    fn apply_exit(&self, view: ViewHandle, cue: AnimationCue) -> LocalBoxFuture<'_, ()>;
}

/// Host platform's hardware back button.
pub trait PlatformBackButton {
    fn on_hardware_back(&self, handler: BackHandler) -> SubscriptionId;

    /// Unknown ids are ignored.
    fn off_hardware_back(&self, id: SubscriptionId);
}

/// Observer of navbar projections.
pub trait NavBarSink {
    fn project(&self, state: &NavBarState);
}

/// Everything a controller talks to, passed at construction.
#[derive(Clone)]
pub struct NavCollaborators {
    pub resolver: Rc<dyn ContentResolver>,
    pub renderer: Rc<dyn ViewRenderer>,
    pub animator: Rc<dyn TransitionAnimator>,
    pub platform: Rc<dyn PlatformBackButton>,
    pub nav_bar: Rc<dyn NavBarSink>,
}
