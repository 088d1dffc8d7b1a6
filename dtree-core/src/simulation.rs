//! One visualisation session: the point cloud, the tree growing on it,
//! the split clock and the projected scene.
//!
//! The update loop is:
//! 1. [`Simulation::tick`] at a fixed period; when the split clock is due
//!    and an eligible leaf exists, the most impure leaf is split.
//! 2. The scene is re-projected from the current state after every tick.
//! 3. [`Simulation::resize`] may run between ticks; it rescales the
//!    session in place and restarts the split clock.

use crate::{
    config::{Config, ConfigError},
    dataset::PointSet,
    render::RenderSurface,
    scene::Scene,
    scheduler::{GrowthState, SplitScheduler},
    tree::{ChildLayout, SplitOutcome, Tree},
};
use glam::Vec2;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{info, warn};

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// The split attempt made on this tick, if any.
    pub outcome: Option<SplitOutcome>,
    pub state: GrowthState,
}

#[derive(Debug)]
pub struct Simulation {
    cfg: Config,
    viewport: Vec2,
    points: PointSet,
    tree: Tree,
    scheduler: SplitScheduler,
    scene: Scene,
    converged_logged: bool,
    /// Source for regenerated point clouds.
    rng: StdRng,
}

fn root_position(viewport: Vec2, cfg: &Config) -> Vec2 {
    Vec2::new(viewport.x * 0.5, viewport.y * cfg.root_y_frac)
}

impl Simulation {
    /// Starts a session on a freshly generated point cloud.
    ///
    /// Later regenerations draw from a generator seeded off `rng`.
    pub fn new(viewport: Vec2, cfg: Config, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let mut rng = StdRng::from_rng(rng);
        let points = PointSet::generate(viewport, cfg.area_per_point, &mut rng);
        Ok(Self::assemble(viewport, cfg, points, rng))
    }

    /// Starts a session on a caller-supplied point cloud.
    ///
    /// Regenerated clouds come from a generator seeded with zero.
    pub fn with_points(viewport: Vec2, cfg: Config, points: PointSet) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self::assemble(viewport, cfg, points, StdRng::seed_from_u64(0)))
    }

    fn assemble(viewport: Vec2, cfg: Config, points: PointSet, rng: StdRng) -> Self {
        let tree = Tree::new(root_position(viewport, &cfg), &points);
        let scene = Scene::project(&tree, &points, viewport);
        info!(
            points = points.len(),
            width = viewport.x,
            height = viewport.y,
            "session started"
        );
        Self {
            cfg,
            viewport,
            points,
            tree,
            scheduler: SplitScheduler::new(),
            scene,
            converged_logged: false,
            rng,
        }
    }

    /// Discards points and tree and starts over on a new cloud.
    pub fn regenerate(&mut self) {
        let points = PointSet::generate(self.viewport, self.cfg.area_per_point, &mut self.rng);
        self.points = points;
        self.tree = Tree::new(root_position(self.viewport, &self.cfg), &self.points);
        self.scheduler = SplitScheduler::new();
        self.converged_logged = false;
        self.refresh_scene();
        info!(
            points = self.points.len(),
            width = self.viewport.x,
            height = self.viewport.y,
            "session regenerated"
        );
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Replaces the configuration; takes effect from the next tick.
    pub fn set_config(&mut self, cfg: Config) -> Result<(), ConfigError> {
        cfg.validate()?;
        self.cfg = cfg;
        self.converged_logged = false;
        Ok(())
    }

    #[inline]
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    #[inline]
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    #[inline]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn iteration(&self) -> u32 {
        self.scheduler.iteration()
    }

    pub fn state(&self) -> GrowthState {
        if !self.scheduler.started() {
            GrowthState::Idle
        } else if !self.scheduler.budget_left(&self.cfg)
            || self.tree.eligible_leaves(&self.cfg).next().is_none()
        {
            GrowthState::Converged
        } else {
            GrowthState::Growing
        }
    }

    /// Advances the session to time `now` (seconds on the caller's clock).
    pub fn tick(&mut self, now: f64) -> TickReport {
        self.scheduler.mark_started();

        let mut outcome = None;
        if self.scheduler.split_due(now, &self.cfg) {
            outcome = self.attempt_split();
            if outcome.is_some() {
                self.scheduler.record_attempt(now);
            }
        }

        self.refresh_scene();
        let state = self.state();
        if state == GrowthState::Converged && !self.converged_logged {
            info!(
                nodes = self.tree.nodes.len(),
                leaves = self.tree.leaf_count(),
                iteration = self.scheduler.iteration(),
                "growth converged"
            );
            self.converged_logged = true;
        }

        TickReport { outcome, state }
    }

    /// Attempts one split right away, ignoring the split clock and budget.
    pub fn step(&mut self) -> Option<SplitOutcome> {
        self.scheduler.mark_started();
        let outcome = self.attempt_split();
        self.refresh_scene();
        outcome
    }

    fn attempt_split(&mut self) -> Option<SplitOutcome> {
        let id = self.tree.select_leaf(&self.points, &self.cfg)?;
        let layout = ChildLayout::for_viewport(self.viewport, &self.cfg);
        Some(self.tree.try_split(id, &self.points, &self.cfg, &layout))
    }

    /// Adapts the session to a new viewport size.
    ///
    /// Points, node positions and thresholds scale per axis; the tree
    /// structure is kept and the split clock restarts. Returns `false`
    /// when the size is unchanged or unusable.
    pub fn resize(&mut self, viewport: Vec2) -> bool {
        if viewport == self.viewport {
            return false;
        }
        if !viewport.is_finite() || viewport.x <= 0.0 || viewport.y <= 0.0 {
            warn!(width = viewport.x, height = viewport.y, "ignoring unusable viewport size");
            return false;
        }
        if !self.viewport.is_finite() || self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            // Nothing to scale from: the old size held no points.
            self.viewport = viewport;
            self.regenerate();
            return true;
        }

        let scale = viewport / self.viewport;
        self.points.rescale(scale);
        self.tree.rescale(scale);
        self.viewport = viewport;
        self.scheduler.reset();
        self.converged_logged = false;
        self.refresh_scene();

        info!(
            width = viewport.x,
            height = viewport.y,
            sx = scale.x,
            sy = scale.y,
            "viewport resized"
        );
        true
    }

    fn refresh_scene(&mut self) {
        self.scene = Scene::project(&self.tree, &self.points, self.viewport);
    }

    /// Draws the last projected scene.
    pub fn render(&self, surface: &mut impl RenderSurface) {
        self.scene.render_to(surface);
    }

    /// Fraction of points the current leaves classify correctly.
    pub fn accuracy(&self) -> f32 {
        self.tree.training_accuracy(&self.points)
    }
}
