//! ASCII price plot for terminal output.
//!
//! A fixed character grid, so `sdash report --plot` output can be diffed and
//! snapshot-tested.
//!
//! Plot elements:
//! - line mode: observations `*`, joined by `.`
//! - candle mode: wick `|`, body `#` (close >= open) or `=` (close < open)

use chrono::{NaiveDate, NaiveDateTime};

use crate::aggregate::{CandleDirection, OhlcBar};
use crate::app::pipeline::{ChartData, SheetView};

/// Render whichever chart the view carries.
pub fn render_price_plot(view: &SheetView, width: usize, height: usize) -> String {
    match &view.chart {
        ChartData::Line { points } => render_line_plot(&view.name, points, width, height),
        ChartData::Candles { bars, .. } => render_candle_plot(&view.name, bars, width, height),
    }
}

pub fn render_line_plot(name: &str, points: &[(NaiveDateTime, f64)], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let Some(t0) = points.iter().map(|p| p.0).min() else {
        return format!("Plot: {name} (no data)\n");
    };
    let t1 = points.iter().map(|p| p.0).max().unwrap_or(t0);

    let x_of = |t: NaiveDateTime| (t - t0).num_seconds() as f64;
    let x_span = (0.0, x_of(t1).max(1.0));
    let (y_min, y_max) = pad_range(price_range(points.iter().map(|p| p.1)), 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let cells: Vec<(usize, usize)> = points
        .iter()
        .map(|&(t, p)| {
            (
                map_x(x_of(t), x_span, width),
                map_y(p, y_min, y_max, height),
            )
        })
        .collect();

    for pair in cells.windows(2) {
        draw_line(&mut grid, pair[0], pair[1], '.');
    }
    for &(x, y) in &cells {
        grid[y][x] = '*';
    }

    finish(
        format!(
            "Plot: {name} | {} .. {} | price=[{y_min:.2}, {y_max:.2}]\n",
            t0.date(),
            t1.date()
        ),
        grid,
    )
}

pub fn render_candle_plot(name: &str, bars: &[OhlcBar], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        return format!("Plot: {name} (no data)\n");
    };

    let d0: NaiveDate = first.day;
    let x_span = (0.0, ((last.day - d0).num_days() as f64).max(1.0));
    let (y_min, y_max) = pad_range(
        price_range(bars.iter().flat_map(|b| [b.low, b.high])),
        0.05,
    );

    let mut grid = vec![vec![' '; width]; height];
    for bar in bars {
        let x = map_x((bar.day - d0).num_days() as f64, x_span, width);
        let top = map_y(bar.high, y_min, y_max, height);
        let bottom = map_y(bar.low, y_min, y_max, height);
        for row in grid.iter_mut().take(bottom + 1).skip(top) {
            row[x] = '|';
        }

        let body = match bar.direction() {
            CandleDirection::Up => '#',
            CandleDirection::Down => '=',
        };
        let body_top = map_y(bar.open.max(bar.close), y_min, y_max, height);
        let body_bottom = map_y(bar.open.min(bar.close), y_min, y_max, height);
        for row in grid.iter_mut().take(body_bottom + 1).skip(body_top) {
            row[x] = body;
        }
    }

    finish(
        format!(
            "Plot: {name} | {} .. {} daily | price=[{y_min:.2}, {y_max:.2}]\n",
            first.day, last.day
        ),
        grid,
    )
}

fn finish(mut out: String, grid: Vec<Vec<char>>) -> String {
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn price_range(prices: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = prices.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p), hi.max(p)));
    if lo.is_finite() && hi.is_finite() { (lo, hi) } else { (0.0, 1.0) }
}

fn pad_range((min, max): (f64, f64), frac: f64) -> (f64, f64) {
    let span = max - min;
    // Flat series: give it a visible band.
    let pad = if span > 0.0 { span * frac } else { (min.abs() * frac).max(1.0) };
    (min - pad, max + pad)
}

fn map_x(x: f64, (x_min, x_max): (f64, f64), width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top (max price).
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = grid.get_mut(y0 as usize).and_then(|r| r.get_mut(x0 as usize)) {
            if *cell == ' ' {
                *cell = ch;
            }
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
