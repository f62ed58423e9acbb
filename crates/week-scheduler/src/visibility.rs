//! Show/hide state machine with before/after lifecycle hooks.
//!
//! A before-hook returning `false` vetoes the transition; the matching
//! after-hook then does not run. Showing a shown widget (or hiding a hidden
//! one) does nothing at all, hooks included.

use std::fmt;

use serde::Serialize;
use tracing::debug;

/// Visibility of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Shown,
    Hidden,
}

/// What a call to [`VisibilityMachine::show`] or
/// [`VisibilityMachine::hide`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Already in the requested state.
    Unchanged,
    /// The before-hook said no.
    Declined,
    Completed,
}

type Guard = Box<dyn FnMut() -> bool>;
type Callback = Box<dyn FnMut()>;

/// The four optional lifecycle hooks.
#[derive(Default)]
pub struct LifecycleHooks {
    on_before_show: Option<Guard>,
    on_after_show: Option<Callback>,
    on_before_hide: Option<Guard>,
    on_after_hide: Option<Callback>,
}

impl LifecycleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs before showing; return `false` to keep the widget hidden.
    pub fn on_before_show(mut self, hook: impl FnMut() -> bool + 'static) -> Self {
        self.on_before_show = Some(Box::new(hook));
        self
    }

    pub fn on_after_show(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_after_show = Some(Box::new(hook));
        self
    }

    /// Runs before hiding; return `false` to keep the widget shown.
    pub fn on_before_hide(mut self, hook: impl FnMut() -> bool + 'static) -> Self {
        self.on_before_hide = Some(Box::new(hook));
        self
    }

    pub fn on_after_hide(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_after_hide = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("on_before_show", &self.on_before_show.is_some())
            .field("on_after_show", &self.on_after_show.is_some())
            .field("on_before_hide", &self.on_before_hide.is_some())
            .field("on_after_hide", &self.on_after_hide.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub struct VisibilityMachine {
    state: Visibility,
    hooks: LifecycleHooks,
}

impl VisibilityMachine {
    pub fn new(initial: Visibility, hooks: LifecycleHooks) -> Self {
        Self {
            state: initial,
            hooks,
        }
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    pub fn is_shown(&self) -> bool {
        self.state == Visibility::Shown
    }

    pub fn show(&mut self) -> Transition {
        if self.state == Visibility::Shown {
            return Transition::Unchanged;
        }

        let allowed = self.hooks.on_before_show.as_mut().is_none_or(|hook| hook());
        if !allowed {
            debug!("show declined by onBeforeShow");
            return Transition::Declined;
        }

        self.state = Visibility::Shown;
        debug!("widget shown");
        if let Some(hook) = self.hooks.on_after_show.as_mut() {
            hook();
        }
        Transition::Completed
    }

    /// Hide the widget. With `trigger_hooks` off the transition is
    /// unconditional and silent.
    pub fn hide(&mut self, trigger_hooks: bool) -> Transition {
        if self.state == Visibility::Hidden {
            return Transition::Unchanged;
        }

        if !trigger_hooks {
            self.state = Visibility::Hidden;
            debug!("widget hidden without hooks");
            return Transition::Completed;
        }

        let allowed = self.hooks.on_before_hide.as_mut().is_none_or(|hook| hook());
        if !allowed {
            debug!("hide declined by onBeforeHide");
            return Transition::Declined;
        }

        self.state = Visibility::Hidden;
        debug!("widget hidden");
        if let Some(hook) = self.hooks.on_after_hide.as_mut() {
            hook();
        }
        Transition::Completed
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
