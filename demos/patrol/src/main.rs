//! patrol: smallest example for the ua-* utility AI crates.
//!
//! Three guards patrol around their posts in a square arena while a handful
//! of intruders wander about.  Each guard scores Patrol, Chase (one
//! candidate per visible intruder) and Rest every half second; stamina
//! drains while moving, so a long chase ends with a walk home to rest.
//! Intruders a guard gets close enough to are caught and leave the index.
//!
//! Decision scores and lifecycle events are written to `output/patrol/`.
//! Set `RUST_LOG=ua_agent=debug` to watch the decision loop.

mod actions;
mod considerations;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ua_agent::{AgentBuilder, AgentObserver, DecisionResult, World};
use ua_behavior::{Decision, Registry, load_behavior_set_reader};
use ua_blackboard::Blackboard;
use ua_core::{AgentConfig, AgentId, Position, SimRng, TargetId};
use ua_output::{CsvWriter, TraceObserver, TraceWriter};
use ua_targeting::{SpatialTargetIndexBuilder, Target};

use actions::{Chase, HomePost, MAX_STAMINA, Patrol, Rest, Stamina};

// ── Constants ─────────────────────────────────────────────────────────────────

const GUARD_COUNT:      u32   = 3;
const INTRUDER_COUNT:   u32   = 6;
const INTRUDER_ID_BASE: u32   = 100;
const SEED:             u64   = 42;
const DT:               f32   = 0.1;   // seconds per step
const STEPS:            u64   = 1_200; // two simulated minutes
const ARENA_HALF:       f32   = 40.0;
const SIGHT_RADIUS:     f32   = 15.0;
const CATCH_RADIUS:     f32   = 1.0;
const IDLE_SCORE:       f32   = 0.25;
const GUARD_SPEED:      f32   = 3.0;
const INTRUDER_SPEED:   f32   = 1.5;

// ── Configuration ─────────────────────────────────────────────────────────────

// Fields left out keep their defaults.
const CONFIG_JSON: &str = r#"{
  "decision_interval": 0.5,
  "target_search_radius": 15.0,
  "max_targets_per_decision": 4,
  "seed": 42
}"#;

const BEHAVIORS_JSON: &str = r#"{
  "name": "guard",
  "behaviors": [
    {
      "name": "Patrol",
      "action": "patrol",
      "reasoner": "untargeted",
      "considerations": [{ "name": "always" }, { "name": "stamina" }]
    },
    {
      "name": "Chase",
      "action": "chase",
      "weight": 2.0,
      "required_target_tags": ["intruder"],
      "considerations": [{ "name": "intruder_close" }, { "name": "stamina" }]
    },
    {
      "name": "Rest",
      "action": "rest",
      "reasoner": "untargeted",
      "considerations": [{ "name": "stamina", "inverted": true }]
    }
  ]
}"#;

// ── Observer wrapper to count events ──────────────────────────────────────────

struct CountingObserver<W: TraceWriter> {
    inner:        TraceObserver<W>,
    enactments:   BTreeMap<String, usize>,
    interrupts:   usize,
    no_decisions: usize,
}

impl<W: TraceWriter> CountingObserver<W> {
    fn new(inner: TraceObserver<W>) -> Self {
        Self { inner, enactments: BTreeMap::new(), interrupts: 0, no_decisions: 0 }
    }
}

impl<W: TraceWriter> AgentObserver for CountingObserver<W> {
    fn on_step_start(&mut self, time: f64) {
        self.inner.on_step_start(time);
    }

    fn on_decisions(&mut self, agent: AgentId, results: &[DecisionResult]) {
        self.inner.on_decisions(agent, results);
    }

    fn on_enact(&mut self, agent: AgentId, decision: &Decision) {
        *self.enactments.entry(decision.behavior().name().to_string()).or_default() += 1;
        self.inner.on_enact(agent, decision);
    }

    fn on_no_decision(&mut self, agent: AgentId) {
        self.no_decisions += 1;
        self.inner.on_no_decision(agent);
    }

    fn on_interrupt(&mut self, agent: AgentId, decision: &Decision) {
        self.interrupts += 1;
        self.inner.on_interrupt(agent, decision);
    }

    fn on_action_concluded(&mut self, agent: AgentId, decision: &Decision) {
        self.inner.on_action_concluded(agent, decision);
    }
}

// ── Intruders ─────────────────────────────────────────────────────────────────

/// Random-walk every active intruder, kept inside the arena.
fn wander(world: &mut World, intruders: &[TargetId], rng: &mut SimRng) -> Result<()> {
    let step = INTRUDER_SPEED * DT;
    for &id in intruders {
        let Some(target) = world.targets().get(id) else { continue };
        if !target.active {
            continue;
        }
        let p = target.position;
        let next = Position::new(
            (p.x + rng.gen_range(-step..=step)).clamp(-ARENA_HALF, ARENA_HALF),
            (p.y + rng.gen_range(-step..=step)).clamp(-ARENA_HALF, ARENA_HALF),
        );
        world.targets_mut().move_to(id, next)?;
    }
    Ok(())
}

/// Deactivate every intruder within reach of a guard.  Returns the number
/// caught this step.
fn catch(world: &mut World, intruders: &[TargetId]) -> Result<usize> {
    let guards: Vec<Position> = world.agents().iter().map(|a| a.position()).collect();
    let mut caught = 0;
    for &id in intruders {
        let Some(target) = world.targets().get(id) else { continue };
        if target.active && guards.iter().any(|g| target.distance_from(*g) <= CATCH_RADIUS) {
            world.targets_mut().set_active(id, false)?;
            info!(intruder = ?id, time = world.time(), "caught");
            caught += 1;
        }
    }
    Ok(caught)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("=== patrol: ua utility AI ===");
    println!("Guards: {GUARD_COUNT}  |  Intruders: {INTRUDER_COUNT}  |  Steps: {STEPS}  |  Seed: {SEED}");
    println!();

    // 1. Agent configuration.
    let config: AgentConfig = serde_json::from_str(CONFIG_JSON)?;
    config.validate()?;

    // 2. Actions, considerations, behaviors.
    let mut registry = Registry::new();
    registry.register_action("patrol", Patrol::new(4.0, 12.0, ARENA_HALF, GUARD_SPEED, 2.0));
    registry.register_action("chase", Chase { speed: GUARD_SPEED * 1.5, drain_rate: 8.0 });
    registry.register_action("rest", Rest { speed: GUARD_SPEED, recover_rate: 20.0 });
    considerations::register(&mut registry, IDLE_SCORE, SIGHT_RADIUS)?;
    let guard_set = load_behavior_set_reader(BEHAVIORS_JSON.as_bytes(), &mut registry)?;
    println!("Loaded behavior set '{}' with {} behaviors", guard_set.name, guard_set.len());

    // 3. Targets: guards are visible to each other, intruders are chased.
    let guard_tag = registry.tag("guard")?;
    let intruder_tag = registry.tag("intruder")?;
    let mut sim_rng = SimRng::new(SEED);

    let posts: Vec<Position> = (0..GUARD_COUNT)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / GUARD_COUNT as f32;
            let r = ARENA_HALF / 2.0;
            Position::new(r * angle.cos(), r * angle.sin())
        })
        .collect();

    let mut index = SpatialTargetIndexBuilder::new();
    for (i, post) in posts.iter().enumerate() {
        index.add(Target::new(TargetId(i as u32), *post).with_tag(guard_tag));
    }
    let mut intruders = Vec::with_capacity(INTRUDER_COUNT as usize);
    for i in 0..INTRUDER_COUNT {
        let id = TargetId(INTRUDER_ID_BASE + i);
        index.add(Target::new(id, sim_rng.point_in_square(ARENA_HALF)).with_tag(intruder_tag));
        intruders.push(id);
    }

    // 4. Guards.
    let mut world = World::new(index.build()?);
    for (i, post) in posts.iter().enumerate() {
        let blackboard = Blackboard::new().with(Stamina(MAX_STAMINA)).with(HomePost(*post));
        let guard = AgentBuilder::new(AgentId(i as u32))
            .config(config.clone())
            .position(*post)
            .blackboard(blackboard)
            .behavior_set(&guard_set)
            .as_target(TargetId(i as u32))
            .build()?;
        world.add_agent(guard)?;
    }

    // 5. Output.
    std::fs::create_dir_all("output/patrol")?;
    let writer = CsvWriter::new(Path::new("output/patrol"))?;
    let mut obs = CountingObserver::new(TraceObserver::new(writer));

    // 6. Run.
    let t0 = Instant::now();
    let mut caught = 0;
    for _ in 0..STEPS {
        world.step(DT, &mut obs)?;
        wander(&mut world, &intruders, &mut sim_rng)?;
        caught += catch(&mut world, &intruders)?;
    }
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }
    obs.inner.finish()?;

    // 7. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("Simulated time:  {:.1} s", world.time());
    println!("Intruders caught: {caught} / {INTRUDER_COUNT}");
    println!("Interrupts: {}  |  Cycles without a decision: {}", obs.interrupts, obs.no_decisions);
    println!();

    println!("{:<10} {:>10}", "Behavior", "Enacted");
    println!("{}", "-".repeat(21));
    for (name, count) in &obs.enactments {
        println!("{name:<10} {count:>10}");
    }
    println!();

    println!("{:<8} {:<10} {:>8} {:>16}", "Guard", "Behavior", "Stamina", "Position");
    println!("{}", "-".repeat(45));
    for guard in world.agents() {
        let behavior = guard.current_decision().map_or("-", |d| d.behavior().name());
        let stamina = guard.blackboard().get::<Stamina>().map_or(0.0, |s| s.0);
        let p = guard.position();
        println!(
            "{:<8} {:<10} {:>8.1} {:>16}",
            guard.id().0,
            behavior,
            stamina,
            format!("({:.1}, {:.1})", p.x, p.y),
        );
    }

    Ok(())
}
