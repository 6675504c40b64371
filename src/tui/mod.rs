//! Ratatui-based terminal dashboard.
//!
//! Layout: metrics header, stock list (plus skipped/failed sheets), price
//! chart (line, or candles with a range strip), optional cleaned-rows table,
//! validation report, footer.
//! The workbook is loaded and cleaned before the terminal is taken over, so
//! input errors print normally.

use std::collections::HashMap;
use std::io;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};
use tracing::{info, warn};

use crate::app::pipeline::{ChartData, Dashboard, SheetView, build_view, load_overlays};
use crate::data::{IndexSource, OverlaySet};
use crate::domain::{DashConfig, IndexSeries, ViewRequest};
use crate::error::AppError;
use crate::report::{format_currency, format_percent, row_cells, row_headers};

mod plotters_chart;

/// Rows moved per PageUp/PageDown in the rows table.
const ROW_PAGE: usize = 10;

use plotters_chart::{CandlePoint, OverlayLine, PriceChart, PriceGeometry, RangeStrip, overlay_color};

/// Start the dashboard over an already-loaded workbook.
pub fn run(config: DashConfig, dashboard: Dashboard, source: Option<Box<dyn IndexSource>>) -> Result<(), AppError> {
    let mut app = App::new(config, dashboard, source)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: DashConfig,
    dashboard: Dashboard,
    source: Option<Box<dyn IndexSource>>,
    /// Fetched overlays, per sheet name.
    overlays: HashMap<String, OverlaySet>,
    selected: usize,
    request: ViewRequest,
    view: SheetView,
    show_rows: bool,
    /// First cleaned row shown in the rows table.
    row_offset: usize,
    status: String,
}

impl App {
    fn new(config: DashConfig, dashboard: Dashboard, source: Option<Box<dyn IndexSource>>) -> Result<Self, AppError> {
        let sheet = dashboard.initial_sheet(config.sheet.as_deref())?;
        let selected = dashboard
            .stock_names()
            .iter()
            .position(|n| *n == sheet)
            .unwrap_or(0);
        let request = ViewRequest {
            sheet,
            chart: config.chart,
            show_indices: config.show_indices,
        };
        let view = build_view(&dashboard, &request, None)?;

        let mut app = Self {
            config,
            dashboard,
            source,
            overlays: HashMap::new(),
            selected,
            request,
            view,
            show_rows: false,
            row_offset: 0,
            status: "Ready.".to_string(),
        };
        app.refresh_view()?;
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up | KeyCode::Char('k') => self.select(self.selected.saturating_sub(1))?,
            KeyCode::Down | KeyCode::Char('j') => self.select(self.selected + 1)?,
            KeyCode::Char('c') => {
                self.request.chart = self.request.chart.toggle();
                self.status = format!("chart: {}", self.request.chart.display_name());
                self.refresh_view()?;
            }
            KeyCode::Char('i') => {
                self.request.show_indices = !self.request.show_indices;
                self.status = if self.request.show_indices {
                    "indices: on".to_string()
                } else {
                    "indices: off".to_string()
                };
                self.refresh_view()?;
            }
            KeyCode::Char('r') => {
                self.show_rows = !self.show_rows;
                self.status = if self.show_rows {
                    "rows: on".to_string()
                } else {
                    "rows: off".to_string()
                };
            }
            KeyCode::PageDown if self.show_rows => {
                let last = self.view.series.rows().len().saturating_sub(1);
                self.row_offset = (self.row_offset + ROW_PAGE).min(last);
            }
            KeyCode::PageUp if self.show_rows => {
                self.row_offset = self.row_offset.saturating_sub(ROW_PAGE);
            }
            _ => {}
        }
        Ok(false)
    }

    fn select(&mut self, idx: usize) -> Result<(), AppError> {
        let names = self.dashboard.stock_names();
        let Some(name) = names.get(idx) else {
            return Ok(());
        };
        if idx == self.selected {
            return Ok(());
        }
        self.request.sheet = name.to_string();
        self.selected = idx;
        self.row_offset = 0;
        self.refresh_view()
    }

    fn refresh_view(&mut self) -> Result<(), AppError> {
        if self.request.show_indices {
            self.ensure_overlays();
        }
        let overlays = self.overlays.get(&self.request.sheet);
        self.view = build_view(&self.dashboard, &self.request, overlays)?;
        Ok(())
    }

    /// Fetch overlays for the current sheet once; failures only affect the status line.
    fn ensure_overlays(&mut self) {
        if self.overlays.contains_key(&self.request.sheet) {
            return;
        }
        let Some(source) = self.source.as_deref() else {
            self.status = "indices unavailable (no index source)".to_string();
            return;
        };
        let Some(sheet) = self.dashboard.sheet(&self.request.sheet) else {
            return;
        };

        let set = load_overlays(source, &self.config.indices, &sheet.series);
        info!(
            sheet = %self.request.sheet,
            loaded = set.series.len(),
            failed = set.failures.len(),
            "overlays fetched"
        );
        if !set.failures.is_empty() {
            warn!(missing = ?set.failed_names(), "some indices are unavailable");
        }
        self.status = format!(
            "indices: {} of {} loaded",
            set.series.len(),
            self.config.indices.len()
        );
        self.overlays.insert(self.request.sheet.clone(), set);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let m = &self.view.metrics;
        let change_color = if m.total_change >= 0.0 { Color::Green } else { Color::Red };
        let s = &self.view.stats;

        let lines = vec![
            Line::from(vec![
                Span::styled(
                    self.view.name.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  Current Price: "),
                Span::styled(format_currency(m.current_price), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  Total Change: "),
                Span::styled(format_currency(m.total_change), Style::default().fg(change_color)),
                Span::raw("  Percentage Change: "),
                Span::styled(format_percent(m.percent_change), Style::default().fg(change_color)),
            ]),
            Line::from(Span::styled(
                format!(
                    "{} | rows: {} | {} .. {} | low {} | high {}",
                    self.dashboard.source,
                    s.rows,
                    s.first_day,
                    s.last_day,
                    format_currency(s.min_price),
                    format_currency(s.max_price),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let report_height = (self.view.report.lines.len() as u16 + 2).clamp(3, 10);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(report_height)])
            .split(area);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(26), Constraint::Min(0)])
            .split(rows[0]);

        self.draw_sidebar(frame, cols[0]);
        if self.show_rows {
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(cols[1]);
            self.draw_chart(frame, right[0]);
            self.draw_rows(frame, right[1]);
        } else {
            self.draw_chart(frame, cols[1]);
        }
        self.draw_report(frame, rows[1]);
    }

    fn draw_sidebar(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let issues: Vec<Line> = self
            .dashboard
            .skipped
            .iter()
            .map(|e| Line::from(Span::styled(format!("skipped {}", e.sheet()), Style::default().fg(Color::DarkGray))))
            .chain(
                self.dashboard
                    .failures
                    .iter()
                    .map(|e| Line::from(Span::styled(format!("no data {}", e.sheet()), Style::default().fg(Color::Red)))),
            )
            .collect();

        let issue_height = if issues.is_empty() { 0 } else { issues.len() as u16 + 2 };
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(issue_height)])
            .split(area);

        let items: Vec<ListItem> = self
            .dashboard
            .stock_names()
            .into_iter()
            .map(|n| ListItem::new(n.to_string()))
            .collect();
        let list = List::new(items)
            .block(Block::default().title("Stocks").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");
        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, parts[0], &mut state);

        if !issues.is_empty() {
            let p = Paragraph::new(Text::from(issues))
                .block(Block::default().title("Sheets").borders(Borders::ALL))
                .wrap(Wrap { trim: true });
            frame.render_widget(p, parts[1]);
        }
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut title = vec![Span::raw(format!("Price ({})", self.request.chart.display_name()))];
        let series = chart_series(&self.view);
        for (idx, o) in series.overlays.iter().enumerate() {
            title.push(Span::raw("  "));
            title.push(Span::styled(o.name, Style::default().fg(overlay_color(idx))));
        }

        let block = Block::default().title(Line::from(title)).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        match &series.geometry {
            Geometry::Line(points) => {
                frame.render_widget(
                    PriceChart {
                        geometry: PriceGeometry::Line(points),
                        overlays: &series.overlays,
                        origin: series.origin,
                        x_bounds: series.x_bounds,
                        y_bounds: series.y_bounds,
                    },
                    inner,
                );
            }
            Geometry::Candles { candles, ranges } => {
                let parts = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(7)])
                    .split(inner);
                frame.render_widget(
                    PriceChart {
                        geometry: PriceGeometry::Candles(candles),
                        overlays: &series.overlays,
                        origin: series.origin,
                        x_bounds: series.x_bounds,
                        y_bounds: series.y_bounds,
                    },
                    parts[0],
                );
                frame.render_widget(
                    RangeStrip {
                        ranges,
                        origin: series.origin,
                        x_bounds: series.x_bounds,
                    },
                    parts[1],
                );
            }
        }
    }

    fn draw_rows(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let series = &self.view.series;
        let headers = row_headers(series, &self.dashboard.columns);
        let widths: Vec<Constraint> = (0..headers.len())
            .map(|i| if i == 0 { Constraint::Length(19) } else { Constraint::Min(10) })
            .collect();
        let rows: Vec<Row> = series
            .rows()
            .iter()
            .skip(self.row_offset)
            .map(|r| Row::new(row_cells(r)))
            .collect();

        let title = format!(
            "Rows (from {} of {}, PgUp/PgDn)",
            self.row_offset + 1,
            series.rows().len()
        );
        let table = Table::new(rows, widths)
            .header(Row::new(headers).style(Style::default().add_modifier(Modifier::BOLD)))
            .column_spacing(2)
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(table, area);
    }

    fn draw_report(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = if self.view.report.lines.is_empty() {
            Text::from(Line::from(Span::styled("No invalid rows.", Style::default().fg(Color::Green))))
        } else {
            Text::from(
                self.view
                    .report
                    .lines
                    .iter()
                    .map(|l| Line::from(l.as_str()))
                    .collect::<Vec<_>>(),
            )
        };
        let p = Paragraph::new(text)
            .block(Block::default().title("Validation").borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ stock  c chart  i indices  r rows  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Owned chart geometry for one frame.
#[derive(Debug, Clone, PartialEq)]
enum Geometry {
    Line(Vec<(f64, f64)>),
    Candles {
        candles: Vec<CandlePoint>,
        ranges: Vec<(f64, f64)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct ChartSeries {
    geometry: Geometry,
    overlays: Vec<OverlayLine>,
    origin: NaiveDate,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Fractional days since `origin`.
fn day_offset(origin: NaiveDate, t: NaiveDateTime) -> f64 {
    (t - origin.and_time(chrono::NaiveTime::MIN)).num_seconds() as f64 / 86_400.0
}

/// Scale an index so its first close equals `base` (the stock's first price).
fn rebase(index: &IndexSeries, origin: NaiveDate, base: f64) -> Option<OverlayLine> {
    let first = index.points.first()?.1;
    if !(first.is_finite() && first > 0.0) {
        return None;
    }
    let factor = base / first;
    Some(OverlayLine {
        name: index.index.display_name(),
        points: index
            .points
            .iter()
            .map(|&(d, v)| ((d - origin).num_days() as f64, v * factor))
            .collect(),
    })
}

/// Build chart geometry and bounds for a view.
fn chart_series(view: &SheetView) -> ChartSeries {
    let (origin, _) = view.series.date_span();
    let base = view.series.first().price;

    let geometry = match &view.chart {
        ChartData::Line { points } => Geometry::Line(
            points
                .iter()
                .map(|&(t, p)| (day_offset(origin, t), p))
                .collect(),
        ),
        ChartData::Candles { bars, ranges } => Geometry::Candles {
            candles: bars
                .iter()
                .map(|b| CandlePoint {
                    x: (b.day - origin).num_days() as f64,
                    open: b.open,
                    high: b.high,
                    low: b.low,
                    close: b.close,
                })
                .collect(),
            ranges: ranges
                .iter()
                .map(|r| ((r.day - origin).num_days() as f64, r.value))
                .collect(),
        },
    };

    let overlays: Vec<OverlayLine> = view
        .overlays
        .iter()
        .filter_map(|o| rebase(o, origin, base))
        .collect();

    let mut xs: Vec<f64> = Vec::new();
    let mut ys: Vec<f64> = Vec::new();
    match &geometry {
        Geometry::Line(points) => {
            xs.extend(points.iter().map(|p| p.0));
            ys.extend(points.iter().map(|p| p.1));
        }
        Geometry::Candles { candles, .. } => {
            xs.extend(candles.iter().map(|c| c.x));
            ys.extend(candles.iter().flat_map(|c| [c.low, c.high]));
        }
    }
    for o in &overlays {
        ys.extend(o.points.iter().map(|p| p.1));
    }

    let x_pad = if matches!(geometry, Geometry::Candles { .. }) { 0.5 } else { 0.0 };
    let x_bounds = padded_bounds(&xs, x_pad, 0.5);
    let y_bounds = {
        let [lo, hi] = padded_bounds(&ys, 0.0, 1.0);
        let pad = (hi - lo) * 0.05;
        [lo - pad, hi + pad]
    };

    ChartSeries {
        geometry,
        overlays,
        origin,
        x_bounds,
        y_bounds,
    }
}

/// `[min - pad, max + pad]`, widened by `flat` on each side when min == max.
fn padded_bounds(values: &[f64], pad: f64, flat: f64) -> [f64; 2] {
    let (lo, hi) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if hi <= lo {
        return [lo - pad - flat, hi + pad + flat];
    }
    [lo - pad, hi + pad]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::dashboard_from_workbook;
    use crate::domain::{Cell, ChartKind, ColumnNames, MarketIndex, RawRow, RawSheet, ReportDetail, Workbook};
    use crate::error::FetchError;

    fn workbook() -> Workbook {
        let sheet = |name: &str, rows: &[(&str, f64)]| RawSheet {
            name: name.to_string(),
            headers: vec!["Date".to_string(), "Price".to_string()],
            rows: rows
                .iter()
                .enumerate()
                .map(|(i, (d, p))| RawRow::new(i + 1, vec![Cell::text(*d), Cell::Number(*p)]))
                .collect(),
        };
        Workbook {
            source: "t.xlsx".to_string(),
            sheets: vec![
                sheet("ACME", &[("2024-01-01 10:00", 10.0), ("2024-01-01 15:00", 12.0), ("2024-01-03", 11.0)]),
                sheet("GLOBEX", &[("2024-02-01", 50.0), ("2024-02-02", 40.0)]),
            ],
        }
    }

    struct NoDow;

    impl IndexSource for NoDow {
        fn fetch(&self, index: MarketIndex, start: NaiveDate, end: NaiveDate) -> Result<IndexSeries, FetchError> {
            if index == MarketIndex::DowJones {
                return Err(FetchError::Empty {
                    index: index.display_name().to_string(),
                });
            }
            Ok(IndexSeries {
                index,
                points: vec![(start, 4_000.0), (end, 4_400.0)],
            })
        }
    }

    fn app(source: Option<Box<dyn IndexSource>>) -> App {
        let dash = dashboard_from_workbook(&workbook(), &ColumnNames::default(), ReportDetail::Itemized);
        App::new(DashConfig::default(), dash, source).unwrap()
    }

    #[test]
    fn keys_drive_the_view_request() {
        let mut app = app(None);
        assert_eq!(app.view.name, "ACME");

        assert!(!app.handle_key(KeyCode::Char('c')).unwrap());
        assert!(matches!(app.view.chart, ChartData::Candles { .. }));

        app.handle_key(KeyCode::Down).unwrap();
        assert_eq!(app.view.name, "GLOBEX");
        assert_eq!(app.request.chart, ChartKind::Candlestick);

        // Already at the last stock.
        app.handle_key(KeyCode::Down).unwrap();
        assert_eq!(app.selected, 1);

        app.handle_key(KeyCode::Up).unwrap();
        assert_eq!(app.view.name, "ACME");
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn indices_are_fetched_once_per_sheet_and_partial_failure_is_quiet() {
        let mut app = app(Some(Box::new(NoDow)));
        app.handle_key(KeyCode::Char('i')).unwrap();
        assert_eq!(app.view.overlays.len(), 2);
        assert_eq!(app.status, "indices: 2 of 3 loaded");

        app.handle_key(KeyCode::Char('i')).unwrap();
        assert!(app.view.overlays.is_empty());
        app.handle_key(KeyCode::Char('i')).unwrap();
        assert_eq!(app.overlays.len(), 1);
        assert_eq!(app.overlays["ACME"].failures.len(), 1);
    }

    #[test]
    fn rows_panel_toggles_and_pages() {
        let mut app = app(None);
        assert!(!app.show_rows);

        // Paging does nothing while the table is hidden.
        app.handle_key(KeyCode::PageDown).unwrap();
        assert_eq!(app.row_offset, 0);

        app.handle_key(KeyCode::Char('r')).unwrap();
        assert!(app.show_rows);
        assert_eq!(app.status, "rows: on");

        // ACME has three rows; the offset stops at the last one.
        app.handle_key(KeyCode::PageDown).unwrap();
        assert_eq!(app.row_offset, 2);
        app.handle_key(KeyCode::PageUp).unwrap();
        assert_eq!(app.row_offset, 0);

        app.handle_key(KeyCode::PageDown).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        assert_eq!(app.view.name, "GLOBEX");
        assert_eq!(app.row_offset, 0);

        app.handle_key(KeyCode::Char('r')).unwrap();
        assert!(!app.show_rows);
    }

    #[test]
    fn missing_source_keeps_the_chart() {
        let mut app = app(None);
        app.handle_key(KeyCode::Char('i')).unwrap();
        assert!(app.view.overlays.is_empty());
        assert!(app.status.contains("unavailable"));
    }

    #[test]
    fn overlays_are_rebased_to_the_first_price() {
        let origin = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let index = IndexSeries {
            index: MarketIndex::Sp500,
            points: vec![(origin, 4_000.0), (NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), 4_400.0)],
        };
        let line = rebase(&index, origin, 10.0).unwrap();
        assert_eq!(line.points, vec![(0.0, 10.0), (2.0, 11.0)]);
    }

    #[test]
    fn chart_series_bounds_cover_candles() {
        let app = {
            let mut a = app(None);
            a.handle_key(KeyCode::Char('c')).unwrap();
            a
        };
        let series = chart_series(&app.view);
        let Geometry::Candles { candles, ranges } = &series.geometry else {
            panic!("expected candles");
        };
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[1].x, 2.0);
        assert_eq!(ranges[0], (0.0, 2.0));
        assert_eq!(series.x_bounds, [-0.5, 2.5]);
        assert!(series.y_bounds[0] < 10.0 && series.y_bounds[1] > 12.0);
    }

    #[test]
    fn line_points_use_fractional_days() {
        let origin = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let t = origin.and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(day_offset(origin, t), 0.5);
        assert_eq!(padded_bounds(&[3.0], 0.0, 0.5), [2.5, 3.5]);
    }
}
