// ui.rs - Control bar and generation display

use std::time::Duration;

use eframe::egui;
use egui::{Color32, load::SizedTexture};
use life_engine::{LifeInterface, PATTERNS};
use log::{debug, error};

use crate::LifeViewer;

impl eframe::App for LifeViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drive();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let button_text = if self.is_running { "⏸ Pause" } else { "▶ Start" };
                let can_run = !self.simulation.is_halted();
                if ui.add_enabled(can_run, egui::Button::new(button_text)).clicked() {
                    self.is_running = !self.is_running;
                    if self.is_running {
                        self.simulation.restart_gate();
                    }
                }

                if ui.add_enabled(can_run && !self.is_running, egui::Button::new("⏭ Step")).clicked() {
                    self.report(|viewer| viewer.simulation.step());
                }

                if ui.button("⏹ Clear").clicked() {
                    self.is_running = false;
                    self.report(|viewer| viewer.simulation.clear());
                }

                if ui.button("🎲 Random").clicked() {
                    let percent = self.alive_probability_percent;
                    self.report(|viewer| viewer.simulation.reseed(percent, &mut rand::rng()));
                }

                ui.separator();

                // Pattern dropdown
                ui.label("Pattern:");
                egui::ComboBox::from_id_source("pattern_selector")
                    .selected_text(PATTERNS[self.selected_pattern].name)
                    .show_ui(ui, |ui| {
                        for (i, pattern) in PATTERNS.iter().enumerate() {
                            ui.selectable_value(&mut self.selected_pattern, i, pattern.name);
                        }
                    });

                if ui.button("Apply Pattern").clicked() {
                    self.is_running = false;
                    let (width, height) = self.simulation.dimensions();
                    let pattern = &PATTERNS[self.selected_pattern];
                    self.report(|viewer| {
                        let grid = pattern.centered(width, height)?;
                        viewer.simulation.reset_with(grid)
                    });
                }
            });

            ui.horizontal(|ui| {
                ui.label("Speed:");
                let mut speed = 1.0 / self.simulation.update_interval().as_secs_f32();
                if ui
                    .add(egui::Slider::new(&mut speed, 0.5..=120.0).suffix(" gen/sec"))
                    .changed()
                {
                    let interval = Duration::from_secs_f32(1.0 / speed);
                    self.report(|viewer| viewer.simulation.set_update_interval(interval));
                }

                ui.separator();

                ui.label("Live:");
                ui.color_edit_button_srgba(&mut self.live_color);
                ui.label("Dead:");
                ui.color_edit_button_srgba(&mut self.dead_color);

                ui.separator();
                ui.checkbox(&mut self.pause_on_cycle, "Pause on cycle");
            });

            ui.horizontal(|ui| {
                let (width, height) = self.simulation.dimensions();
                let cells = (width * height) as f32;
                let live_cells = self.simulation.population();
                ui.label(format!("Generation: {}", self.simulation.generation()));
                ui.label(format!("Live cells: {live_cells}"));
                ui.label(format!("Population: {:.1}%", live_cells as f32 / cells * 100.0));
                if let Some(period) = self.simulation.last_cycle() {
                    ui.label(format!("Cycle: period {period}"));
                }
                if let Some(failure) = &self.failure {
                    ui.colored_label(Color32::RED, format!("Stopped: {failure}"));
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(self.dead_color))
            .show(ctx, |ui| {
                let scale = self.scale;
                let texture = self.refresh_texture(ctx);
                let size = texture.size_vec2() * scale;
                let sized_texture = SizedTexture::new(texture.id(), size);
                ui.add(egui::Image::new(sized_texture).fit_to_exact_size(size));
            });

        // Keep frames coming so the gate gets polled
        if self.is_running {
            ctx.request_repaint();
        }
    }
}

impl LifeViewer {
    /// Runs a control action, surfacing any error in the control bar.
    fn report(&mut self, action: impl FnOnce(&mut Self) -> life_engine::Result<()>) {
        match action(self) {
            Ok(()) => {
                if !self.simulation.is_halted() {
                    self.failure = None;
                }
                debug!(
                    "generation {}, {} alive",
                    self.simulation.generation(),
                    self.simulation.population()
                );
            }
            Err(err) => {
                error!("{err}");
                self.failure = Some(err.to_string());
                if err.is_fatal() {
                    self.is_running = false;
                }
            }
        }
    }
}
