//! Interactive river network viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a growth run (engine,
//! configuration, random source) and implements [`eframe::App`] to step
//! through the run and draw the network once it is annotated.

use eframe::App;
use glam::Vec2;
use rand::{SeedableRng, rngs::StdRng};
use river_core::{
    config::{Config, LonePointPolicy},
    error::GrowthError,
    growth::{GrowthEngine, Step},
    pending::PendingPoints,
    post::RiverNetwork,
    tree::Tree,
    validate::find_crossings,
};

const BRANCH_COLORS: [egui::Color32; 6] = [
    egui::Color32::from_rgb(66, 135, 245),
    egui::Color32::from_rgb(52, 199, 160),
    egui::Color32::from_rgb(240, 180, 41),
    egui::Color32::from_rgb(231, 98, 84),
    egui::Color32::from_rgb(170, 110, 230),
    egui::Color32::from_rgb(140, 200, 80),
];

/// Main application state for the interactive viewer.
///
/// A run moves through two stages:
/// 1. While `engine` is `Some`, the network is still growing and can be
///    advanced with [`Viewer::step_once`].
/// 2. When the engine reports [`Step::Finished`], it is turned into an
///    annotated [`RiverNetwork`] and drawn with branch colors and widths.
///
/// A growth failure ends the run and is shown in the status bar.
pub struct Viewer {
    cfg: Config,
    point_count: usize,
    seed: u64,
    rng: StdRng,

    engine: Option<GrowthEngine>,
    network: Option<RiverNetwork>,
    crossings: usize,
    error: Option<GrowthError>,
    last_step: Option<Step>,

    running: bool,
    show_region: bool,
    zoom: f32,
    pan: egui::Vec2,

    step_interval: f64,
    last_step_time: f64,
}

impl Viewer {
    /// Creates a viewer with the default configuration and a freshly
    /// seeded run.
    pub fn new() -> Self {
        let mut viewer = Self {
            cfg: Config::default(),
            point_count: 60,
            seed: 0,
            rng: StdRng::seed_from_u64(0),
            engine: None,
            network: None,
            crossings: 0,
            error: None,
            last_step: None,
            running: false,
            show_region: true,
            zoom: 4.0,
            pan: egui::vec2(0.0, 0.0),
            step_interval: 0.1,
            last_step_time: 0.0,
        };
        viewer.regenerate();
        viewer
    }

    /// Starts a new run from `seed`, keeping configuration and camera.
    fn regenerate(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        let points = PendingPoints::random_in_basin(self.cfg.basin, self.point_count, &mut self.rng)
            .points
            .into_iter()
            .map(|p| p.pos)
            .collect();

        self.network = None;
        self.crossings = 0;
        self.last_step = None;
        self.running = false;

        match GrowthEngine::new(points, self.cfg) {
            Ok(engine) => {
                self.engine = Some(engine);
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(%err, seed = self.seed, "could not seed river network");
                self.engine = None;
                self.error = Some(err);
            }
        }
    }

    /// Advances the current run by one transition.
    ///
    /// On [`Step::Finished`] the engine is consumed and the annotated
    /// network takes its place.
    fn step_once(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            self.running = false;
            return;
        };

        match engine.step(&mut self.rng) {
            Ok(Step::Finished) => {
                if let Some(engine) = self.engine.take() {
                    let network = RiverNetwork::from_growth(engine.into_growth());
                    self.crossings = find_crossings(&network.tree).len();
                    self.network = Some(network);
                }
                self.last_step = Some(Step::Finished);
                self.running = false;
            }
            Ok(step) => self.last_step = Some(step),
            Err(err) => {
                tracing::warn!(%err, recoverable = err.is_recoverable(), "growth failed");
                self.engine = None;
                self.error = Some(err);
                self.running = false;
            }
        }
    }

    /// Steps until the run finishes or fails.
    fn finish(&mut self) {
        while self.engine.is_some() {
            self.step_once();
        }
    }

    fn tree(&self) -> Option<&Tree> {
        match (&self.network, &self.engine) {
            (Some(network), _) => Some(&network.tree),
            (None, Some(engine)) => Some(engine.tree()),
            (None, None) => None,
        }
    }

    fn pending(&self) -> Option<&PendingPoints> {
        match (&self.network, &self.engine) {
            (Some(network), _) => Some(&network.pending),
            (None, Some(engine)) => Some(engine.pending()),
            (None, None) => None,
        }
    }

    /// Converts a basin position to screen-space.
    ///
    /// The basin center maps to the center of `rect`; the y-axis is
    /// flipped so the mouth sits at the bottom.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let basin = self.cfg.basin;
        let local = p - Vec2::new(basin.width, basin.height) * 0.5;
        egui::pos2(
            center.x + local.x * self.zoom + self.pan.x,
            center.y - local.y * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let basin = self.cfg.basin;
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y) + Vec2::new(basin.width, basin.height) * 0.5
    }

    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed))
                .changed()
        })
        .inner
    }

    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.01..=1.0)
                        .speed(0.01),
                );

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Finish").clicked() {
                    self.finish();
                }

                if ui.button("Regenerate").clicked() {
                    self.regenerate();
                }

                if ui.button("Next seed").clicked() {
                    self.seed = self.seed.wrapping_add(1);
                    self.regenerate();
                }

                ui.separator();
                ui.checkbox(&mut self.show_region, "Region");
                ui.add(egui::Slider::new(&mut self.zoom, 0.5..=20.0).text("Zoom"));
            });
        });
    }

    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::LIGHT_RED, err.to_string());
                    ui.separator();
                }
                if let Some(network) = &self.network {
                    ui.label(format!("crossings = {}", self.crossings));
                    ui.label(format!("branches = {}", network.branches().len()));
                    ui.label(format!("mouth width = {}", network.max_width()));
                    ui.separator();
                }
                if let Some(step) = self.last_step {
                    ui.label(format!("last = {step:?}"));
                }
                ui.label(format!(
                    "nodes = {}",
                    self.tree().map_or(0, |tree| tree.len())
                ));
                ui.label(format!(
                    "pending = {}",
                    self.pending().map_or(0, |p| p.pending_count())
                ));
            });
        });
    }

    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");
                let mut dirty = false;

                ui.separator();
                ui.label("Points");
                ui.horizontal(|ui| {
                    ui.label("count:");
                    dirty |= ui
                        .add(egui::DragValue::new(&mut self.point_count).range(3..=2000))
                        .changed();
                });
                ui.horizontal(|ui| {
                    ui.label("seed:");
                    dirty |= ui.add(egui::DragValue::new(&mut self.seed)).changed();
                });

                ui.separator();
                ui.label("Basin");
                dirty |= Self::labeled_drag_f32(
                    ui,
                    "width:",
                    &mut self.cfg.basin.width,
                    1.0..=1000.0,
                    1.0,
                );
                dirty |= Self::labeled_drag_f32(
                    ui,
                    "height:",
                    &mut self.cfg.basin.height,
                    1.0..=1000.0,
                    1.0,
                );

                ui.separator();
                ui.label("Lone point in region");
                ui.horizontal(|ui| {
                    for (policy, label) in [
                        (LonePointPolicy::Synthesize, "Synthesize"),
                        (LonePointPolicy::Discard, "Discard"),
                    ] {
                        if ui
                            .selectable_label(self.cfg.lone_point == policy, label)
                            .clicked()
                        {
                            self.cfg.lone_point = policy;
                            dirty = true;
                        }
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("attempts:");
                    dirty |= ui
                        .add(
                            egui::DragValue::new(&mut self.cfg.synthesis_attempts)
                                .range(1..=100_000),
                        )
                        .changed();
                });

                ui.separator();
                dirty |= ui
                    .checkbox(&mut self.cfg.strict_geometry, "strict geometry")
                    .changed();

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                    dirty = true;
                }

                if dirty {
                    self.regenerate();
                }
            });
    }

    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.5, 20.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            let basin = self.cfg.basin;
            let outline: Vec<egui::Pos2> = [
                basin.bottom_left(),
                basin.bottom_right(),
                basin.top_right(),
                basin.top_left(),
            ]
            .iter()
            .map(|&c| self.world_to_screen(c, rect))
            .collect();
            painter.add(egui::Shape::closed_line(
                outline,
                egui::Stroke::new(1.0, egui::Color32::GRAY),
            ));

            if self.show_region
                && let Some(region) = self.engine.as_ref().and_then(|e| e.region())
            {
                let pts: Vec<egui::Pos2> = region
                    .iter()
                    .map(|&p| self.world_to_screen(p, rect))
                    .collect();
                painter.add(egui::Shape::closed_line(
                    pts,
                    egui::Stroke::new(1.5, egui::Color32::YELLOW),
                ));
            }

            if let Some(pending) = self.pending() {
                for p in pending.points.iter().filter(|p| p.is_pending()) {
                    let s = self.world_to_screen(p.pos, rect);
                    painter.circle_filled(s, 2.0, egui::Color32::LIGHT_RED);
                }
            }

            if let Some(network) = &self.network {
                for record in network.records() {
                    let Some(parent) = record.parent else {
                        continue;
                    };
                    let a = self.world_to_screen(network.tree.nodes[parent].pos, rect);
                    let b = self.world_to_screen(record.pos, rect);
                    let color = BRANCH_COLORS[record.branch % BRANCH_COLORS.len()];
                    painter.line_segment([a, b], egui::Stroke::new(record.width as f32 * 1.5, color));
                }
            } else if let Some(engine) = &self.engine {
                let tree = engine.tree();
                for (parent, child) in tree.edges() {
                    let a = self.world_to_screen(tree.nodes[parent].pos, rect);
                    let b = self.world_to_screen(tree.nodes[child].pos, rect);
                    painter.line_segment([a, b], egui::Stroke::new(1.0, egui::Color32::LIGHT_BLUE));
                }
                let tip = self.world_to_screen(tree.nodes[engine.current()].pos, rect);
                painter.circle_filled(tip, 3.5, egui::Color32::RED);
            }

            let mouth = self.world_to_screen(basin.mouth(), rect);
            painter.circle_filled(mouth, 4.0, egui::Color32::WHITE);

            if self.running {
                let now = ctx.input(|i| i.time);
                if now - self.last_step_time >= self.step_interval {
                    self.step_once();
                    self.last_step_time = now;
                }
                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
