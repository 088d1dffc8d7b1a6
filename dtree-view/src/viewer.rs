//! Interactive decision-tree growth viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`Simulation`] and
//! implements [`eframe::App`] to drive its tick clock, forward resizes of
//! the drawing area, and paint the projected scene.

use crate::surface::PainterSurface;
use dtree_core::{
    config::{Config, ConfigError},
    scheduler::{GrowthState, TickClock},
    simulation::Simulation,
    tree::SplitOutcome,
};
use eframe::App;
use glam::Vec2;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{info, warn};

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions (run/pause, step, reset, config edits).
/// 2. Forward a changed drawing-area size to [`Simulation::resize`].
/// 3. If `running` and the tick clock fires, call [`Simulation::tick`].
/// 4. Paint the last projected scene through [`PainterSurface`].
///
/// ### Fields
/// - `sim` - The growing tree and its point cloud.
/// - `cfg` - Working copy of the configuration edited by the side panel.
/// - `cfg_error` - Validation error of the working copy, if any.
/// - `seed` - Seed the session was started from, shown in the status bar.
/// - `running` - Whether ticks advance automatically.
/// - `clock` - Fixed-period tick source measured on egui's clock.
/// - `last_outcome` - Result of the most recent split attempt.
/// - `show_labels` - Whether split labels are drawn above internal nodes.
pub struct Viewer {
    sim: Simulation,
    cfg: Config,
    cfg_error: Option<String>,

    seed: u64,

    running: bool,
    clock: TickClock,

    last_outcome: Option<SplitOutcome>,
    show_labels: bool,
}

impl Viewer {
    /// Creates a viewer with a cloud generated for `viewport` from `seed`.
    ///
    /// The first painted frame resizes the session to the real panel size.
    pub fn new(cfg: Config, viewport: Vec2, seed: u64) -> Result<Self, ConfigError> {
        let sim = Simulation::new(viewport, cfg, &mut StdRng::seed_from_u64(seed))?;

        Ok(Self {
            sim,
            cfg,
            cfg_error: None,
            seed,
            running: true,
            clock: TickClock::new(cfg.tick_interval),
            last_outcome: None,
            show_labels: true,
        })
    }

    /// Regenerates the point cloud and starts a fresh tree.
    ///
    /// Keeps the configuration and the running flag.
    fn reset(&mut self) {
        self.sim.regenerate();
        self.last_outcome = None;
        info!(points = self.sim.points().len(), "session reset");
    }

    /// Attempts one split immediately, bypassing the split interval.
    fn step_once(&mut self) {
        self.last_outcome = self.sim.step();
    }

    /// Runs one scheduler tick at `now`.
    fn tick(&mut self, now: f64) {
        let report = self.sim.tick(now);
        if report.outcome.is_some() {
            self.last_outcome = report.outcome;
        }
    }

    /// Pushes the working configuration into the simulation if it changed.
    fn apply_config(&mut self) {
        if self.cfg == *self.sim.config() {
            return;
        }
        match self.sim.set_config(self.cfg) {
            Ok(()) => {
                self.clock.set_period(self.cfg.tick_interval);
                self.cfg_error = None;
            }
            Err(e) => {
                warn!(error = %e, "config edit rejected");
                self.cfg_error = Some(e.to_string());
            }
        }
    }

    /// Forwards a new drawing-area size to the simulation.
    fn sync_viewport(&mut self, size: egui::Vec2) {
        let viewport = Vec2::new(size.x, size.y);
        if viewport != self.sim.viewport() {
            self.sim.resize(viewport);
        }
    }

    fn state_text(&self) -> &'static str {
        match self.sim.state() {
            GrowthState::Idle => "idle",
            GrowthState::Growing => "growing",
            GrowthState::Converged => "converged",
        }
    }

    fn outcome_text(&self) -> String {
        match &self.last_outcome {
            None => "-".to_owned(),
            Some(SplitOutcome::Applied {
                node,
                feature,
                threshold,
                gain,
                ..
            }) => format!("split #{node} on {feature} <= {threshold:.0} (gain {gain:.3})"),
            Some(SplitOutcome::Rejected(reason)) => format!("rejected: {reason}"),
        }
    }

    /// Helper to draw a labeled numeric [`egui::DragValue`].
    fn labeled_drag<N: egui::emath::Numeric>(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut N,
        range: std::ops::RangeInclusive<N>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, reset).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                ui.checkbox(&mut self.show_labels, "Labels");
            });
        });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("seed = {}", self.seed));
                ui.separator();
                ui.label(format!("accuracy = {:.1}%", self.sim.accuracy() * 100.0));
                ui.label(format!("state = {}", self.state_text()));
                ui.label(format!(
                    "iteration = {}/{}",
                    self.sim.iteration(),
                    self.sim.config().max_iterations
                ));
                ui.separator();
                ui.label(format!("leaves = {}", self.sim.tree().leaf_count()));
                ui.label(format!("nodes = {}", self.sim.tree().nodes.len()));
                ui.label(format!("points = {}", self.sim.points().len()));
                ui.separator();
                ui.label(self.outcome_text());
            });
        });
    }

    /// Builds the right-hand configuration panel.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Split acceptance");
                Self::labeled_drag(
                    ui,
                    "min_points_to_split:",
                    &mut self.cfg.min_points_to_split,
                    1..=500,
                    1.0,
                );
                Self::labeled_drag(ui, "max_depth:", &mut self.cfg.max_depth, 1..=10, 1.0);
                Self::labeled_drag(ui, "min_gain:", &mut self.cfg.min_gain, 0.0..=0.5, 0.001);

                ui.separator();
                ui.label("Timing (seconds)");
                Self::labeled_drag(
                    ui,
                    "split_interval:",
                    &mut self.cfg.split_interval,
                    0.05..=10.0,
                    0.05,
                );
                Self::labeled_drag(
                    ui,
                    "tick_interval:",
                    &mut self.cfg.tick_interval,
                    0.01..=1.0,
                    0.01,
                );
                Self::labeled_drag(
                    ui,
                    "max_iterations:",
                    &mut self.cfg.max_iterations,
                    1..=1000,
                    1.0,
                );

                ui.separator();
                ui.label("Layout");
                Self::labeled_drag(
                    ui,
                    "base_spread_frac:",
                    &mut self.cfg.base_spread_frac,
                    0.01..=1.0,
                    0.005,
                );
                Self::labeled_drag(
                    ui,
                    "level_spacing_frac:",
                    &mut self.cfg.level_spacing_frac,
                    0.01..=1.0,
                    0.005,
                );

                if let Some(err) = &self.cfg_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
                }

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                }
            });
        self.apply_config();
    }

    /// Builds the central panel where the scene is drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;
                self.sync_viewport(rect.size());

                if self.running {
                    let now = ctx.input(|i| i.time);
                    if self.clock.poll(now) {
                        self.tick(now);
                    }
                    ctx.request_repaint();
                }

                let painter = ui.painter_at(rect);
                let mut surface = PainterSurface::new(&painter, rect, self.show_labels);
                self.sim.render(&mut surface);
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
