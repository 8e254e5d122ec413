//! Interactive chart window
//!
//! Shows the same [`ChartLayout`] as the PNG in two side-by-side plots whose
//! strike axes are linked. The volume line is rescaled onto the change axis
//! since a plot has a single horizontal axis.

use eframe::egui;
use egui_plot::{Bar, BarChart, Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text, VLine};
use std::path::PathBuf;

use super::config::ChartConfig;
use super::layout::{ChartLayout, LabelAnchor, PanelLayout};
use crate::core::{GoldError, GoldResult};

fn color(triple: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(triple[0], triple[1], triple[2])
}

fn faded(triple: [u8; 3], alpha: f64) -> egui::Color32 {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(triple[0], triple[1], triple[2], a)
}

struct ChartViewer {
    layout: ChartLayout,
    config: ChartConfig,
    saved_to: Option<PathBuf>,
}

impl ChartViewer {
    fn panel_plot(&self, ui: &mut egui::Ui, panel: &PanelLayout) {
        let palette = self.config.palette;
        let limit = self.layout.change_axis.max;
        let strikes = self.layout.strike_axis;
        let volume_scale = limit / panel.volume_axis.max;

        ui.heading(panel.side.label());

        Plot::new(panel.side.label())
            .legend(Legend::default())
            .link_axis("strike_axis", false, true)
            .include_x(-limit)
            .include_x(limit)
            .include_y(strikes.min)
            .include_y(strikes.max)
            .x_axis_label("change")
            .y_axis_label("price")
            .show(ui, |plot_ui| {
                if panel.is_empty() {
                    return;
                }

                let bars: Vec<Bar> = panel
                    .bars
                    .iter()
                    .map(|b| Bar::new(b.strike, b.change).width(self.config.bar_height))
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .horizontal()
                        .name("change")
                        .color(faded(palette.bar, self.config.bar_alpha)),
                );

                plot_ui.vline(VLine::new(0.0).color(color(palette.text)).width(0.8));

                for bar in &panel.bars {
                    let Some(label) = &bar.label else { continue };
                    let anchor = match label.anchor {
                        LabelAnchor::Left => egui::Align2::LEFT_CENTER,
                        LabelAnchor::Right => egui::Align2::RIGHT_CENTER,
                    };
                    plot_ui.text(
                        Text::new(PlotPoint::new(bar.change, bar.strike), label.text.clone())
                            .color(color(palette.text))
                            .anchor(anchor),
                    );
                }

                let volume: Vec<[f64; 2]> = panel
                    .volume_points
                    .iter()
                    .map(|&[v, strike]| [v * volume_scale, strike])
                    .collect();
                let line_color = faded(palette.line, self.config.line_alpha);
                plot_ui.line(
                    Line::new(PlotPoints::new(volume.clone()))
                        .name(format!(
                            "Open position volume (full width = {})",
                            panel.volume_axis.max
                        ))
                        .color(line_color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::new(volume))
                        .shape(MarkerShape::Circle)
                        .radius(3.0)
                        .color(line_color),
                );
            });
    }
}

impl eframe::App for ChartViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("title").show(ctx, |ui| {
            ui.heading(&self.layout.title);
            if let Some(path) = &self.saved_to {
                ui.label(format!("Saved to {}", path.display()));
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                self.panel_plot(&mut columns[0], &self.layout.calls);
                self.panel_plot(&mut columns[1], &self.layout.puts);
            });
        });
    }
}

/// Open the chart window; blocks until it is closed
pub fn show_chart(
    layout: ChartLayout,
    config: ChartConfig,
    saved_to: Option<PathBuf>,
) -> GoldResult<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1600.0, 900.0])
            .with_title(layout.title.clone()),
        ..Default::default()
    };

    eframe::run_native(
        "Gold Options",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Box::new(ChartViewer {
                layout,
                config,
                saved_to,
            })
        }),
    )
    .map_err(|e| GoldError::Display(e.to_string()))
}
