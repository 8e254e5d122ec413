//! Explicit figure/axes rasterisation of a [`ChartLayout`]
//!
//! A [`Figure`] owns its canvas and configuration; each panel is drawn
//! through an [`Axes`] value mapping data coordinates to pixels. Nothing is
//! kept in global drawing state.

use chrono::NaiveDate;
use image::{imageops, ImageFormat, Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

use super::config::{chart_file_name, ChartConfig};
use super::font;
use super::layout::{format_tick, AxisRange, ChartLayout, LabelAnchor, PanelLayout};
use super::raster::{rgb, Canvas, PixelRect};
use crate::core::{GoldError, GoldResult, OptionType};

/// Data-to-pixel mapping for one panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axes {
    pub frame: PixelRect,
    pub x: AxisRange,
    pub y: AxisRange,
}

impl Axes {
    pub fn new(frame: PixelRect, x: AxisRange, y: AxisRange) -> Self {
        Self { frame, x, y }
    }

    /// Same frame and vertical axis, independent horizontal axis
    pub fn twin_x(&self, x: AxisRange) -> Self {
        Self { x, ..*self }
    }

    pub fn map_x(&self, value: f64) -> f64 {
        self.frame.left as f64 + self.x.fraction(value) * self.frame.width() as f64
    }

    /// Larger values sit higher
    pub fn map_y(&self, value: f64) -> f64 {
        self.frame.bottom as f64 - self.y.fraction(value) * self.frame.height() as f64
    }

    pub fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (self.map_x(x), self.map_y(y))
    }
}

/// A rendered chart under construction
pub struct Figure {
    canvas: Canvas,
    config: ChartConfig,
}

impl Figure {
    pub fn new(config: ChartConfig) -> Self {
        let (width, height) = config.pixel_size();
        Self {
            canvas: Canvas::new(width, height, rgb(config.palette.background)),
            config,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Panel frames, calls on the left, puts on the right
    pub fn panel_frame(&self, side: OptionType) -> PixelRect {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        let (left, right) = match side {
            OptionType::Call => (0.07, 0.485),
            OptionType::Put => (0.55, 0.965),
        };
        PixelRect::from_corners(left * w, 0.2 * h, right * w, 0.86 * h)
    }

    /// Primary axes (change vs strike) for one panel
    pub fn panel_axes(&self, layout: &ChartLayout, side: OptionType) -> Axes {
        Axes::new(self.panel_frame(side), layout.change_axis, layout.strike_axis)
    }

    /// Draw the whole chart
    pub fn draw(&mut self, layout: &ChartLayout) {
        let title_scale = self.font_scale(self.config.title_font_pt);
        let (title_w, _) = font::text_size(&layout.title, title_scale);
        let x = (self.canvas.width() as i64 - title_w as i64) / 2;
        let y = (0.04 * self.canvas.height() as f64) as i64;
        let text = self.text_color();
        self.canvas.text(x, y, &layout.title, title_scale, text);

        for panel in layout.panels() {
            let axes = self.panel_axes(layout, panel.side);
            self.draw_panel(&axes, layout, panel);
        }

        let calls = self.panel_axes(layout, OptionType::Call);
        self.draw_y_label(&calls, "price");
    }

    pub fn into_image(self) -> RgbImage {
        self.canvas.into_image()
    }

    /// Drawn extent plus a 0.1 inch margin, kept inside the canvas
    pub fn tight_bounds(&self) -> PixelRect {
        let background = rgb(self.config.palette.background);
        let Some(extent) = self.canvas.content_bounds(background) else {
            return self.canvas.bounds();
        };
        let pad = (0.1 * self.config.dpi).round() as i64;
        PixelRect::new(
            extent.left - pad,
            extent.top - pad,
            extent.right + pad,
            extent.bottom + pad,
        )
        .intersect(&self.canvas.bounds())
    }

    /// Image cropped to [`Figure::tight_bounds`]
    pub fn into_tight_image(self) -> RgbImage {
        let bounds = self.tight_bounds();
        let image = self.canvas.into_image();
        imageops::crop_imm(
            &image,
            bounds.left as u32,
            bounds.top as u32,
            bounds.width() as u32,
            bounds.height() as u32,
        )
        .to_image()
    }

    fn draw_panel(&mut self, axes: &Axes, layout: &ChartLayout, panel: &PanelLayout) {
        let palette = self.config.palette;
        let panel_bg = match panel.side {
            OptionType::Call => palette.background,
            OptionType::Put => palette.right_panel,
        };
        self.canvas.fill_rect(axes.frame, rgb(panel_bg), 1.0);

        self.canvas.set_clip(Some(axes.frame));
        self.draw_grid(axes, layout);
        if !panel.is_empty() {
            self.draw_bars(axes, panel);
            let volume_axes = axes.twin_x(panel.volume_axis);
            self.draw_volume(&volume_axes, panel);
        }
        self.canvas.set_clip(None);

        if !panel.is_empty() {
            self.draw_value_labels(axes, panel);
        }

        let spine = self.px(0.8).round() as i64;
        let text = self.text_color();
        self.canvas.stroke_rect(axes.frame, spine, text);

        self.draw_bottom_ticks(axes, &layout.change_ticks);
        self.draw_left_ticks(axes, &layout.strike_ticks);
        let volume_axes = axes.twin_x(panel.volume_axis);
        let top_extent = self.draw_top_ticks(&volume_axes, &panel.volume_ticks);
        self.draw_titles(axes, panel.side, top_extent);
    }

    fn draw_grid(&mut self, axes: &Axes, layout: &ChartLayout) {
        let color = rgb(self.config.palette.grid);
        let alpha = self.config.grid_alpha;
        let thickness = self.px(0.8);
        let dash = self.px(1.0);
        let frame = axes.frame;

        for &tick in &layout.change_ticks {
            let x = axes.map_x(tick);
            self.canvas.dotted_vline(
                x,
                frame.top as f64,
                frame.bottom as f64,
                thickness,
                dash,
                color,
                alpha,
            );
        }
        for &tick in &layout.strike_ticks {
            let y = axes.map_y(tick);
            self.canvas.dotted_hline(
                y,
                frame.left as f64,
                frame.right as f64,
                thickness,
                dash,
                color,
                alpha,
            );
        }
    }

    fn draw_bars(&mut self, axes: &Axes, panel: &PanelLayout) {
        let color = rgb(self.config.palette.bar);
        let alpha = self.config.bar_alpha;
        let half = self.config.bar_height / 2.0;

        for bar in &panel.bars {
            let (x0, y0) = axes.map(0.0, bar.strike + half);
            let (x1, y1) = axes.map(bar.change, bar.strike - half);
            let mut rect = PixelRect::from_corners(x0, y0, x1, y1);
            if rect.height() == 0 {
                rect.bottom += 1;
            }
            self.canvas.fill_rect(rect, color, alpha);
        }

        let zero = axes.map_x(0.0);
        let text = self.text_color();
        self.canvas.vline(
            zero,
            axes.frame.top as f64,
            axes.frame.bottom as f64,
            self.px(0.8),
            text,
            1.0,
        );
    }

    fn draw_volume(&mut self, axes: &Axes, panel: &PanelLayout) {
        let color = rgb(self.config.palette.line);
        let alpha = self.config.line_alpha;
        let width = self.px(self.config.line_width_pt);
        let radius = self.px(self.config.marker_size_pt) / 2.0;

        let points: Vec<(f64, f64)> = panel
            .volume_points
            .iter()
            .map(|&[volume, strike]| axes.map(volume, strike))
            .collect();

        for pair in points.windows(2) {
            self.canvas.line(pair[0], pair[1], width, color, alpha);
        }
        for &point in &points {
            self.canvas.disc(point, radius, color, alpha);
        }
    }

    fn draw_value_labels(&mut self, axes: &Axes, panel: &PanelLayout) {
        let scale = self.font_scale(self.config.value_label_font_pt);
        let pad = self.px(1.0).round() as i64;
        let text = self.text_color();

        for bar in &panel.bars {
            let Some(label) = &bar.label else { continue };
            let (w, h) = font::text_size(&label.text, scale);
            let (x, y) = axes.map(bar.change, bar.strike);
            let left = match label.anchor {
                LabelAnchor::Left => x.round() as i64 + pad,
                LabelAnchor::Right => x.round() as i64 - pad - w as i64,
            };
            let top = y.round() as i64 - h as i64 / 2;
            self.canvas.text(left, top, &label.text, scale, text);
        }
    }

    fn draw_bottom_ticks(&mut self, axes: &Axes, ticks: &[f64]) {
        let scale = self.font_scale(self.config.tick_font_pt);
        let tick_len = self.px(3.5);
        let pad = self.px(3.5).round() as i64;
        let text = self.text_color();
        let frame = axes.frame;

        for &tick in ticks {
            let x = axes.map_x(tick);
            self.canvas.vline(
                x,
                frame.bottom as f64,
                frame.bottom as f64 + tick_len,
                self.px(0.8),
                text,
                1.0,
            );
            let label = format_tick(tick);
            let (w, _) = font::text_size(&label, scale);
            let top = frame.bottom + tick_len.round() as i64 + pad;
            self.canvas.text(x.round() as i64 - w as i64 / 2, top, &label, scale, text);
        }

        let label_scale = self.font_scale(self.config.axis_label_font_pt);
        let (w, _) = font::text_size("change", label_scale);
        let (_, tick_h) = font::text_size("0", scale);
        let top = frame.bottom + tick_len.round() as i64 + pad * 3 + tick_h as i64;
        let center = (frame.left + frame.right) / 2;
        self.canvas.text(center - w as i64 / 2, top, "change", label_scale, text);
    }

    fn draw_left_ticks(&mut self, axes: &Axes, ticks: &[f64]) {
        let scale = self.font_scale(self.config.tick_font_pt);
        let tick_len = self.px(3.5);
        let pad = self.px(3.5).round() as i64;
        let text = self.text_color();
        let frame = axes.frame;

        for &tick in ticks {
            let y = axes.map_y(tick);
            self.canvas.hline(
                y,
                frame.left as f64 - tick_len,
                frame.left as f64,
                self.px(0.8),
                text,
                1.0,
            );
            let label = format_tick(tick);
            let (w, h) = font::text_size(&label, scale);
            let left = frame.left - tick_len.round() as i64 - pad - w as i64;
            self.canvas.text(left, y.round() as i64 - h as i64 / 2, &label, scale, text);
        }
    }

    /// Secondary volume ticks above the frame; returns the topmost pixel used
    fn draw_top_ticks(&mut self, axes: &Axes, ticks: &[f64]) -> i64 {
        let scale = self.font_scale(self.config.tick_font_pt);
        let tick_len = self.px(3.5);
        let pad = self.px(3.5).round() as i64;
        let text = self.text_color();
        let frame = axes.frame;
        let (_, h) = font::text_size("0", scale);
        let top = frame.top - tick_len.round() as i64 - pad - h as i64;

        for &tick in ticks {
            let x = axes.map_x(tick);
            self.canvas.vline(
                x,
                frame.top as f64 - tick_len,
                frame.top as f64,
                self.px(0.8),
                text,
                1.0,
            );
            let label = format_tick(tick);
            let (w, _) = font::text_size(&label, scale);
            self.canvas.text(x.round() as i64 - w as i64 / 2, top, &label, scale, text);
        }

        top
    }

    fn draw_titles(&mut self, axes: &Axes, side: OptionType, top_extent: i64) {
        let text = self.text_color();
        let pad = self.px(6.0).round() as i64;
        let center = (axes.frame.left + axes.frame.right) / 2;

        let label_scale = self.font_scale(self.config.axis_label_font_pt);
        let secondary = "Open position volume";
        let (w, h) = font::text_size(secondary, label_scale);
        let label_top = top_extent - pad - h as i64;
        self.canvas.text(center - w as i64 / 2, label_top, secondary, label_scale, text);

        let title_scale = self.font_scale(self.config.panel_title_font_pt);
        let title = side.label();
        let (w, h) = font::text_size(title, title_scale);
        let title_top = label_top - pad * 2 - h as i64;
        self.canvas.text(center - w as i64 / 2, title_top, title, title_scale, text);
    }

    fn draw_y_label(&mut self, axes: &Axes, label: &str) {
        let scale = self.font_scale(self.config.axis_label_font_pt);
        let (w, _) = font::text_size(label, scale);
        let x = (0.012 * self.canvas.width() as f64) as i64;
        let center = (axes.frame.top + axes.frame.bottom) / 2;
        let text = self.text_color();
        self.canvas.text_vertical(x, center - w as i64 / 2, label, scale, text);
    }

    fn px(&self, points: f64) -> f64 {
        self.config.px(points)
    }

    /// Integer glyph scale approximating a point size
    fn font_scale(&self, points: f64) -> u32 {
        (self.px(points) / font::GLYPH_HEIGHT as f64).round().max(1.0) as u32
    }

    fn text_color(&self) -> Rgb<u8> {
        rgb(self.config.palette.text)
    }
}

/// Rasterise `layout` with `config`, cropped to a tight bounding box
pub fn render_chart(layout: &ChartLayout, config: &ChartConfig) -> RgbImage {
    let mut figure = Figure::new(config.clone());
    figure.draw(layout);
    figure.into_tight_image()
}

/// Render and write `gold_options_<run_date>.png` into `dir`
pub fn save_chart(
    layout: &ChartLayout,
    config: &ChartConfig,
    dir: &Path,
    run_date: NaiveDate,
) -> GoldResult<PathBuf> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let path = dir.join(chart_file_name(run_date));
    let image = render_chart(layout, config);
    image
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|e| GoldError::render(format!("Failed to write {}: {}", path.display(), e)))?;

    tracing::info!(
        "Saved {}x{} chart to {:?}",
        image.width(),
        image.height(),
        path
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChartDataset, StrikeBounds, StrikeRecord};
    use crate::render::raster::blend_color;

    fn small_config() -> ChartConfig {
        ChartConfig::with_dpi(40.0)
    }

    fn layout(config: &ChartConfig) -> ChartLayout {
        let dataset = ChartDataset::from_records(vec![
            StrikeRecord::new(3350.0, 300.0, 0.0, OptionType::Call),
            StrikeRecord::new(3390.0, -3.0, 10.0, OptionType::Call),
            StrikeRecord::new(3330.0, -250.0, 40.0, OptionType::Put),
        ]);
        ChartLayout::build(&dataset, &StrikeBounds::new(3300.0, 3400.0), "202508", config)
    }

    #[test]
    fn test_axes_mapping() {
        let axes = Axes::new(
            PixelRect::new(100, 50, 300, 250),
            AxisRange::symmetric(600.0),
            AxisRange::new(3300.0, 3400.0),
        );
        assert_eq!(axes.map(0.0, 3350.0), (200.0, 150.0));
        assert_eq!(axes.map(-600.0, 3400.0), (100.0, 50.0));

        let twin = axes.twin_x(AxisRange::new(0.0, 1000.0));
        assert_eq!(twin.map_x(500.0), 200.0);
        assert_eq!(twin.map_y(3300.0), 250.0);
    }

    #[test]
    fn test_render_dimensions() {
        let config = small_config();
        let layout = layout(&config);
        let mut figure = Figure::new(config.clone());
        figure.draw(&layout);
        assert_eq!((figure.canvas().width(), figure.canvas().height()), (720, 400));

        let image = render_chart(&layout, &config);
        assert!(image.width() <= 720 && image.height() < 400);
        assert_eq!(*image.get_pixel(0, 0), rgb(config.palette.background));
    }

    #[test]
    fn test_tight_bounds_keep_margin() {
        let config = small_config();
        let layout = layout(&config);
        let mut figure = Figure::new(config.clone());
        figure.draw(&layout);

        let tight = figure.tight_bounds();
        let calls = figure.panel_frame(OptionType::Call);
        let puts = figure.panel_frame(OptionType::Put);
        assert!(tight.left <= calls.left - 4 && tight.right >= puts.right + 4);
        assert!(tight.top >= 0 && tight.bottom <= 400);
        assert!(tight.bottom >= calls.bottom + 4);

        let background = rgb(config.palette.background);
        let image = figure.into_tight_image();
        assert_eq!((image.width() as i64, image.height() as i64), (tight.width(), tight.height()));
        let (w, h) = (image.width(), image.height());
        for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
            assert_eq!(*image.get_pixel(x, y), background);
        }
    }

    #[test]
    fn test_panels_and_bars_drawn() {
        let config = small_config();
        let layout = layout(&config);
        let mut figure = Figure::new(config.clone());
        figure.draw(&layout);

        let palette = config.palette;
        let bar_over_left = blend_color(rgb(palette.background), rgb(palette.bar), config.bar_alpha);
        let bar_over_right =
            blend_color(rgb(palette.right_panel), rgb(palette.bar), config.bar_alpha);

        let calls = figure.panel_axes(&layout, OptionType::Call);
        let (x, y) = calls.map(150.0, 3350.0);
        assert_eq!(figure.canvas().pixel(x as u32, y as u32), bar_over_left);

        let puts = figure.panel_axes(&layout, OptionType::Put);
        let (x, y) = puts.map(-30.0, 3330.0);
        assert_eq!(figure.canvas().pixel(x as u32, y as u32), bar_over_right);

        // Empty area of the puts panel keeps its own background
        let (x, y) = puts.map(450.0, 3370.0);
        assert_eq!(figure.canvas().pixel(x as u32, y as u32), rgb(palette.right_panel));
    }

    #[test]
    fn test_save_chart_file_name() {
        let config = small_config();
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();

        let path = save_chart(&layout(&config), &config, dir.path(), date).unwrap();

        assert_eq!(path, dir.path().join("gold_options_20250715.png"));
        let expected = render_chart(&layout(&config), &config);
        let written = image::open(&path).unwrap();
        assert_eq!(
            (written.width(), written.height()),
            (expected.width(), expected.height())
        );
    }
}
