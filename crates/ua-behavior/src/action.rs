//! Actions and the state machine that drives them.
//!
//! ```text
//!            execute           on_enter → true
//! Created ───────────▶ Entered ─────────────────▶ Running
//!                         │                          │
//!                         │ on_enter → false         │ should_exit / ctx.conclude() / interrupt
//!                         ▼                          ▼
//!                     Concluded ◀────────────────────┘
//! ```
//!
//! Every transition into `Concluded` calls [`Action::on_exit`] exactly once.

use std::any::Any;

use ua_blackboard::Blackboard;
use ua_core::{AgentRng, Position};
use ua_targeting::Target;

use crate::{ActionError, ActionResult, Decision};

// ── Action ────────────────────────────────────────────────────────────────────

/// Stateful body of a behavior, instantiated fresh for every enactment.
///
/// Only [`on_enter`][Self::on_enter] has meaningful work to do in most
/// actions; every hook has a default.
pub trait Action: Send + 'static {
    /// Display name used in logs and errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Prepare to run.  Returning `false` aborts: the action concludes
    /// without ever running.
    fn on_enter(&mut self, _ctx: &mut ActionContext<'_>) -> bool {
        true
    }

    fn on_update(&mut self, _ctx: &mut ActionContext<'_>, _dt: f32) {}

    fn on_fixed_update(&mut self, _ctx: &mut ActionContext<'_>, _dt: f32) {}

    /// Cleanup.  Called once, on conclusion, failed entry, or interrupt.
    fn on_exit(&mut self, _ctx: &mut ActionContext<'_>) {}

    /// Checked before every update; `true` concludes the action.
    fn should_exit(&self, _ctx: &ActionContext<'_>) -> bool {
        false
    }
}

/// Produces a fresh [`Action`] per enactment.
///
/// Any `Action + Clone + Sync` is its own template: the stored prototype is
/// cloned.
pub trait ActionTemplate: Send + Sync {
    fn instantiate(&self) -> Box<dyn Action>;
}

impl<A: Action + Clone + Sync> ActionTemplate for A {
    fn instantiate(&self) -> Box<dyn Action> {
        Box::new(self.clone())
    }
}

// ── ActionContext ─────────────────────────────────────────────────────────────

/// What an action may see and touch during one hook call.
pub struct ActionContext<'a> {
    decision:   &'a Decision,
    /// The agent's position, movable by the action.
    pub position:   &'a mut Position,
    pub blackboard: &'a mut Blackboard,
    pub rng:        &'a mut AgentRng,
    conclude_requested: bool,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        decision:   &'a Decision,
        position:   &'a mut Position,
        blackboard: &'a mut Blackboard,
        rng:        &'a mut AgentRng,
    ) -> Self {
        Self { decision, position, blackboard, rng, conclude_requested: false }
    }

    #[inline]
    pub fn decision(&self) -> &Decision {
        self.decision
    }

    #[inline]
    pub fn target(&self) -> Option<&Target> {
        self.decision.target()
    }

    /// The decision's payload as `T`.
    pub fn data<T: Any>(&self) -> Option<&T> {
        self.decision.data::<T>()
    }

    /// Ask the runner to conclude the action after the current hook.
    pub fn conclude(&mut self) {
        self.conclude_requested = true;
    }

    pub fn is_conclusion_requested(&self) -> bool {
        self.conclude_requested
    }
}

// ── ActionRunner ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionState {
    Created,
    Entered,
    Running,
    Concluded,
}

/// Owns one live [`Action`] and enforces its lifecycle.
pub struct ActionRunner {
    action:             Box<dyn Action>,
    state:              ActionState,
    pending_conclusion: bool,
}

impl ActionRunner {
    pub fn new(action: Box<dyn Action>) -> Self {
        Self { action, state: ActionState::Created, pending_conclusion: false }
    }

    #[inline]
    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn name(&self) -> &str {
        self.action.name()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == ActionState::Running
    }

    #[inline]
    pub fn is_concluded(&self) -> bool {
        self.state == ActionState::Concluded
    }

    /// Enter the action.  Returns whether it is now running.
    ///
    /// # Errors
    ///
    /// [`ActionError::AlreadyExecuted`] if called more than once.
    pub fn execute(&mut self, ctx: &mut ActionContext<'_>) -> ActionResult<bool> {
        if self.state != ActionState::Created {
            return Err(ActionError::AlreadyExecuted(self.action.name().to_string()));
        }
        self.state = ActionState::Entered;
        if self.action.on_enter(ctx) {
            self.state = ActionState::Running;
            self.pending_conclusion = ctx.is_conclusion_requested();
            Ok(true)
        } else {
            self.finish(ctx);
            Ok(false)
        }
    }

    /// Advance one frame.  Returns `true` if the action concluded on its own
    /// during this call.
    pub fn update(&mut self, dt: f32, ctx: &mut ActionContext<'_>) -> bool {
        if self.state != ActionState::Running {
            return false;
        }
        if self.pending_conclusion || self.action.should_exit(ctx) {
            self.finish(ctx);
            return true;
        }
        self.action.on_update(ctx, dt);
        if ctx.is_conclusion_requested() {
            self.finish(ctx);
            return true;
        }
        false
    }

    /// Fixed-step update.  A conclusion requested here takes effect on the
    /// next [`update`][Self::update].
    pub fn fixed_update(&mut self, dt: f32, ctx: &mut ActionContext<'_>) {
        if self.state != ActionState::Running {
            return;
        }
        self.action.on_fixed_update(ctx, dt);
        if ctx.is_conclusion_requested() {
            self.pending_conclusion = true;
        }
    }

    /// Stop the action from outside.  Returns `true` if `on_exit` ran.
    pub fn interrupt(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        match self.state {
            ActionState::Entered | ActionState::Running => {
                self.finish(ctx);
                true
            }
            ActionState::Created | ActionState::Concluded => false,
        }
    }

    fn finish(&mut self, ctx: &mut ActionContext<'_>) {
        self.action.on_exit(ctx);
        self.state = ActionState::Concluded;
        self.pending_conclusion = false;
    }
}

impl std::fmt::Debug for ActionRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRunner")
            .field("action", &self.action.name())
            .field("state", &self.state)
            .finish()
    }
}
