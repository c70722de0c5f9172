//! Plotters-powered hour-distribution chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `BarChart` widget here?
//! - 24 bars need real axis/tick handling to stay readable
//! - less manual work for labels and scaling
//! - easy to extend later (annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: the bars and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and makes
/// it easy to test the data prep separately.
pub struct HourBarsChart<'a> {
    /// (display hour 1-24, mean count) pairs, ascending by hour.
    pub bars: &'a [(u8, f64)],
    /// Upper y bound (mean counts start at 0).
    pub y_max: f64,
    /// Axis labels (kept simple for terminal rendering).
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl Widget for HourBarsChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        if self.bars.is_empty() || !self.y_max.is_finite() || self.y_max <= 0.0 {
            buf.set_string(
                area.x,
                area.y,
                "No matching hours for this selection.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let y_max = self.y_max * 1.05;

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(0.5_f64..24.5_f64, 0.0_f64..y_max)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in
            // low-resolution terminal rendering.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(8)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // One filled rectangle per hour; cyan reads well on dark terminals.
            let bar_color = RGBColor(0, 255, 255);
            chart.draw_series(self.bars.iter().map(|&(hour, mean)| {
                let x = hour as f64;
                Rectangle::new([(x - 0.4, 0.0), (x + 0.4, mean)], bar_color.filled())
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
