//! Plotters-powered price chart widgets for Ratatui.
//!
//! Both widgets are render-only: series and bounds are prepared outside the
//! render call (see `tui::chart_series`). X values are fractional days since
//! `origin`, so line points and daily candles share one axis.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// One daily candle in chart coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandlePoint {
    pub x: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, Copy)]
pub enum PriceGeometry<'a> {
    Line(&'a [(f64, f64)]),
    Candles(&'a [CandlePoint]),
}

/// An index overlay already rebased onto the stock's price scale.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub name: &'static str,
    pub points: Vec<(f64, f64)>,
}

const LINE_COLOR: RGBColor = RGBColor(0, 255, 255);
const GAIN_COLOR: RGBColor = RGBColor(0, 220, 0);
const LOSS_COLOR: RGBColor = RGBColor(255, 60, 60);
const OVERLAY_COLORS: [RGBColor; 3] = [RGBColor(255, 200, 0), RGBColor(255, 0, 255), RGBColor(120, 160, 255)];

pub fn overlay_color(idx: usize) -> Color {
    let RGBColor(r, g, b) = OVERLAY_COLORS[idx % OVERLAY_COLORS.len()];
    Color::Rgb(r, g, b)
}

fn day_label(origin: NaiveDate, x: f64) -> String {
    (origin + Duration::days(x.floor() as i64)).format("%m-%d").to_string()
}

pub struct PriceChart<'a> {
    pub geometry: PriceGeometry<'a>,
    pub overlays: &'a [OverlayLine],
    pub origin: NaiveDate,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl Widget for PriceChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a tiny chart; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let origin = self.origin;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| day_label(origin, *v))
                .y_label_formatter(&|v| format!("{v:.2}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            for (idx, overlay) in self.overlays.iter().enumerate() {
                let color = OVERLAY_COLORS[idx % OVERLAY_COLORS.len()];
                chart.draw_series(LineSeries::new(overlay.points.iter().copied(), &color))?;
            }

            match self.geometry {
                PriceGeometry::Line(points) => {
                    chart.draw_series(LineSeries::new(points.iter().copied(), &LINE_COLOR))?;
                }
                PriceGeometry::Candles(candles) => {
                    chart.draw_series(candles.iter().map(|c| {
                        CandleStick::new(
                            c.x,
                            c.open,
                            c.high,
                            c.low,
                            c.close,
                            GAIN_COLOR.filled(),
                            LOSS_COLOR.filled(),
                            2,
                        )
                    }))?;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Signed `close - open` bars under a candle chart, colored by sign.
pub struct RangeStrip<'a> {
    pub ranges: &'a [(f64, f64)],
    pub origin: NaiveDate,
    pub x_bounds: [f64; 2],
}

impl Widget for RangeStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 4 || self.ranges.is_empty() {
            return;
        }

        let [x0, x1] = self.x_bounds;
        let peak = self.ranges.iter().map(|r| r.1.abs()).fold(0.0_f64, f64::max);
        let y = if peak > 0.0 { peak * 1.1 } else { 1.0 };
        if !(x0.is_finite() && x1.is_finite()) || x1 <= x0 {
            return;
        }

        let origin = self.origin;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .build_cartesian_2d(x0..x1, -y..y)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(3)
                .x_label_formatter(&|v| day_label(origin, *v))
                .y_label_formatter(&|v| format!("{v:+.2}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            chart.draw_series(self.ranges.iter().map(|&(x, v)| {
                let color = if v >= 0.0 { GAIN_COLOR } else { LOSS_COLOR };
                Rectangle::new([(x - 0.3, 0.0), (x + 0.3, v)], color.filled())
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
