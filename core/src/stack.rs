//! Ordered page stack with single-transition bracketing.
//!
//! Pages are appended and removed at the tail only. A transition is bracketed
//! by a [`TransitionTicket`]: `begin_transition` hands one out, `commit_*`
//! mutates the stack on its behalf, and `finish_transition` releases it and
//! records the direction of an applied transition. Only one ticket can be
//! outstanding, and plain `push`/`pop` are refused while it is.

use navstack_types::{Direction, NavError, PageId, TransitionKind, ViewHandle};

/// One entry of the navigation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    id: PageId,
    title: String,
    view: ViewHandle,
    nav_bar_visible: bool,
}

impl Page {
    #[must_use]
    pub fn new(
        id: PageId,
        title: impl Into<String>,
        view: ViewHandle,
        nav_bar_visible: bool,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            view,
            nav_bar_visible,
        }
    }

    #[must_use]
    pub fn id(&self) -> PageId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    #[must_use]
    pub fn view(&self) -> ViewHandle {
        self.view
    }

    #[must_use]
    pub fn nav_bar_visible(&self) -> bool {
        self.nav_bar_visible
    }
}

/// Proof that a transition was begun on a particular stack.
///
/// Cannot be constructed outside this module and is consumed by
/// [`PageStack::finish_transition`].
#[derive(Debug)]
pub struct TransitionTicket {
    serial: u64,
    kind: TransitionKind,
}

impl TransitionTicket {
    #[must_use]
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }
}

#[derive(Debug, Default)]
pub struct PageStack {
    pages: Vec<Page>,
    in_flight: Option<(u64, TransitionKind)>,
    next_serial: u64,
    last_direction: Option<Direction>,
}

impl PageStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page outside of any transition.
    pub fn push(&mut self, page: Page) -> Result<(), NavError> {
        if self.in_flight.is_some() {
            return Err(NavError::invalid_state("push", "a transition is in flight"));
        }
        self.pages.push(page);
        Ok(())
    }

    /// Remove the tail page. The root page is never removed, and nothing is
    /// removed while a transition is in flight.
    pub fn pop(&mut self) -> Option<Page> {
        if self.in_flight.is_some() || self.pages.len() <= 1 {
            return None;
        }
        self.pages.pop()
    }

    #[must_use]
    pub fn top(&self) -> Option<&Page> {
        self.pages.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Page> {
        self.pages.last_mut()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<TransitionKind> {
        self.in_flight.map(|(_, kind)| kind)
    }

    /// Direction of the most recently applied transition.
    #[must_use]
    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    pub fn begin_transition(&mut self, kind: TransitionKind) -> Result<TransitionTicket, NavError> {
        if self.in_flight.is_some() {
            return Err(NavError::invalid_state(
                "begin transition",
                "another transition is in flight",
            ));
        }
        self.next_serial += 1;
        let serial = self.next_serial;
        self.in_flight = Some((serial, kind));
        Ok(TransitionTicket { serial, kind })
    }

    pub fn commit_push(&mut self, ticket: &TransitionTicket, page: Page) -> Result<(), NavError> {
        self.check_ticket(ticket, TransitionKind::Push, "commit push")?;
        self.pages.push(page);
        Ok(())
    }

    /// Same root rule as [`PageStack::pop`]: returns `None` at depth <= 1.
    pub fn commit_pop(&mut self, ticket: &TransitionTicket) -> Result<Option<Page>, NavError> {
        self.check_ticket(ticket, TransitionKind::Pop, "commit pop")?;
        if self.pages.len() <= 1 {
            return Ok(None);
        }
        Ok(self.pages.pop())
    }

    /// Release the ticket. A stale ticket (e.g. after a drain) is ignored.
    pub fn finish_transition(&mut self, ticket: TransitionTicket, applied: bool) {
        if self.in_flight != Some((ticket.serial, ticket.kind)) {
            return;
        }
        self.in_flight = None;
        if applied {
            self.last_direction = Some(ticket.kind.direction());
        }
    }

    /// Remove every page, top first, and forget any in-flight transition.
    pub fn drain_top_down(&mut self) -> Vec<Page> {
        self.in_flight = None;
        let mut pages = std::mem::take(&mut self.pages);
        pages.reverse();
        pages
    }

    fn check_ticket(
        &self,
        ticket: &TransitionTicket,
        expected: TransitionKind,
        operation: &'static str,
    ) -> Result<(), NavError> {
        if self.in_flight != Some((ticket.serial, ticket.kind)) {
            return Err(NavError::invalid_state(operation, "ticket is not the active transition"));
        }
        if ticket.kind != expected {
            return Err(NavError::invalid_state(operation, "ticket is for a different kind"));
        }
        Ok(())
    }
}
