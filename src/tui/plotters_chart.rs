//! Plotters-powered installment chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description: principal and interest per installment.
///
/// All series and bounds are computed outside the render call.
pub struct SchedulePlottersChart<'a> {
    /// (installment number, principal portion).
    pub principal: &'a [(f64, f64)],
    /// (installment number, interest portion).
    pub interest: &'a [(f64, f64)],
    /// (installment number, installment total).
    pub total: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for SchedulePlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead of panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("installment")
                .y_desc("R$")
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let principal_color = RGBColor(0, 255, 255); // cyan
            let interest_color = RGBColor(255, 0, 0); // red
            let total_color = RGBColor(0, 255, 0); // green

            chart.draw_series(LineSeries::new(self.total.iter().copied(), &total_color))?;
            chart.draw_series(LineSeries::new(self.principal.iter().copied(), &principal_color))?;
            chart.draw_series(LineSeries::new(self.interest.iter().copied(), &interest_color))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
