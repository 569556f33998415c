//! Guard actions and the blackboard components they read and write.

use tracing::debug;
use ua_behavior::{Action, ActionContext};
use ua_core::Position;

// ── Components ────────────────────────────────────────────────────────────────

pub const MAX_STAMINA: f32 = 100.0;

/// Remaining energy in `0..=MAX_STAMINA`.
#[derive(Copy, Clone, Debug)]
pub struct Stamina(pub f32);

/// The post a guard patrols around and returns to for rest.
#[derive(Copy, Clone, Debug)]
pub struct HomePost(pub Position);

fn drain(ctx: &mut ActionContext<'_>, amount: f32) {
    if let Some(stamina) = ctx.blackboard.get_mut::<Stamina>() {
        stamina.0 = (stamina.0 - amount).max(0.0);
    }
}

fn stamina(ctx: &ActionContext<'_>) -> f32 {
    ctx.blackboard.get::<Stamina>().map_or(0.0, |s| s.0)
}

// ── Patrol ────────────────────────────────────────────────────────────────────

/// Walk to a random waypoint in a ring around the home post.
#[derive(Clone)]
pub struct Patrol {
    pub min_radius:  f32,
    pub max_radius:  f32,
    pub arena_half:  f32,
    pub speed:       f32,
    pub drain_rate:  f32,
    waypoint:        Position,
}

impl Patrol {
    const WAYPOINT_ATTEMPTS: usize = 5;

    pub fn new(min_radius: f32, max_radius: f32, arena_half: f32, speed: f32, drain_rate: f32) -> Self {
        Self { min_radius, max_radius, arena_half, speed, drain_rate, waypoint: Position::ORIGIN }
    }

    fn in_arena(&self, p: Position) -> bool {
        p.x.abs() <= self.arena_half && p.y.abs() <= self.arena_half
    }
}

impl Action for Patrol {
    fn name(&self) -> &str {
        "patrol"
    }

    fn on_enter(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let Some(home) = ctx.blackboard.get::<HomePost>().map(|h| h.0) else {
            return false;
        };
        for _ in 0..Self::WAYPOINT_ATTEMPTS {
            let p = ctx.rng.point_in_ring(home, self.min_radius, self.max_radius);
            if self.in_arena(p) {
                self.waypoint = p;
                return true;
            }
        }
        debug!(?home, "no waypoint inside the arena");
        false
    }

    fn on_update(&mut self, ctx: &mut ActionContext<'_>, dt: f32) {
        *ctx.position = ctx.position.step_towards(self.waypoint, self.speed * dt);
        drain(ctx, self.drain_rate * dt);
    }

    fn should_exit(&self, ctx: &ActionContext<'_>) -> bool {
        ctx.position.distance(self.waypoint) <= f32::EPSILON
    }
}

// ── Chase ─────────────────────────────────────────────────────────────────────

/// Run at the decision's target until reaching where it was last seen.
#[derive(Clone)]
pub struct Chase {
    pub speed:      f32,
    pub drain_rate: f32,
}

impl Action for Chase {
    fn name(&self) -> &str {
        "chase"
    }

    fn on_enter(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        ctx.target().is_some()
    }

    fn on_update(&mut self, ctx: &mut ActionContext<'_>, dt: f32) {
        let Some(goal) = ctx.target().map(|t| t.position) else {
            ctx.conclude();
            return;
        };
        *ctx.position = ctx.position.step_towards(goal, self.speed * dt);
        drain(ctx, self.drain_rate * dt);
    }

    fn should_exit(&self, ctx: &ActionContext<'_>) -> bool {
        let arrived = ctx.target().is_none_or(|t| ctx.position.distance(t.position) <= f32::EPSILON);
        arrived || stamina(ctx) <= 0.0
    }
}

// ── Rest ──────────────────────────────────────────────────────────────────────

/// Walk back to the home post, then recover stamina until full.
#[derive(Clone)]
pub struct Rest {
    pub speed:        f32,
    pub recover_rate: f32,
}

impl Action for Rest {
    fn name(&self) -> &str {
        "rest"
    }

    fn on_enter(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        ctx.blackboard.contains::<HomePost>() && ctx.blackboard.contains::<Stamina>()
    }

    fn on_update(&mut self, ctx: &mut ActionContext<'_>, dt: f32) {
        let Some(home) = ctx.blackboard.get::<HomePost>().map(|h| h.0) else {
            return;
        };
        if ctx.position.distance(home) > f32::EPSILON {
            *ctx.position = ctx.position.step_towards(home, self.speed * dt);
            return;
        }
        if let Some(stamina) = ctx.blackboard.get_mut::<Stamina>() {
            stamina.0 = (stamina.0 + self.recover_rate * dt).min(MAX_STAMINA);
        }
    }

    fn should_exit(&self, ctx: &ActionContext<'_>) -> bool {
        stamina(ctx) >= MAX_STAMINA
    }
}
