//! Ratatui-based terminal UI.
//!
//! The TUI mirrors the three-column dashboard: a sidebar with the three filter
//! selectors and the season ranking, a middle column with the weather and hour
//! charts, and a right column with the totals/peaks/occurrence metrics and the
//! working-day comparison. The whole view model is recomputed on every filter
//! change; only dataset loading is cached.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{BarChart, Block, Borders, Clear, List, ListItem, Paragraph, Row, Table},
};

use crate::app::pipeline::{ViewModel, build_view};
use crate::cli::ViewArgs;
use crate::data::store::{DataStore, Datasets};
use crate::domain::{Category, ViewConfig};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::HourBarsChart;

/// Start the TUI.
pub fn run(args: ViewArgs) -> Result<(), AppError> {
    let config = crate::app::view_config_from_args(&args);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config)?;
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
    config: ViewConfig,
    store: DataStore,
    datasets: Datasets,
    view: ViewModel,
    selected_field: usize,
    status: String,
}

impl App {
    fn new(config: ViewConfig) -> Result<Self, AppError> {
        let mut store = DataStore::new();
        let datasets = store.load_datasets(&config)?;
        let view = build_view(&datasets, config.selection);
        let status = format!(
            "Loaded {} daily rows, {} hourly rows.",
            datasets.daily.stats.rows, datasets.hourly.stats.rows
        );
        Ok(Self {
            config,
            store,
            datasets,
            view,
            selected_field: 0,
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
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
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < 2 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('r') => {
                // Drop the cache so edited dataset files are picked up.
                self.store.clear();
                self.datasets = self.store.load_datasets(&self.config)?;
                self.refresh_view();
                self.status = "Reloaded datasets from disk.".to_string();
            }
            KeyCode::Char('e') => {
                let path = crate::io::export::timestamped_view_path();
                match crate::io::export::write_view_json(&path, &self.view) {
                    Ok(()) => {
                        self.status = format!("Wrote view JSON: {}", path.display());
                    }
                    Err(err) => {
                        self.status = format!("Export failed: {err}");
                    }
                }
            }
            _ => {}
        }

        Ok(false)
    }

    fn adjust_field(&mut self, delta: i32) {
        let sel = &mut self.config.selection;
        match self.selected_field {
            0 => {
                sel.year = if delta >= 0 { sel.year.next() } else { sel.year.prev() };
                self.status = format!("year: {}", sel.year.label());
            }
            1 => {
                // Wrap within the display range 1-24.
                sel.hour = if delta >= 0 {
                    if sel.hour >= 24 { 1 } else { sel.hour + 1 }
                } else if sel.hour <= 1 {
                    24
                } else {
                    sel.hour - 1
                };
                self.status = format!("hour: {}", sel.hour);
            }
            2 => {
                sel.season = if delta >= 0 {
                    sel.season.next()
                } else {
                    sel.season.prev()
                };
                self.status = format!("season: {}", sel.season.label());
            }
            _ => {}
        }
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        self.view = build_view(&self.datasets, self.config.selection);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let sel = &self.config.selection;
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("bikedash", Style::default().fg(Color::Cyan)),
            Span::raw(" — Bike Sharing Dashboard"),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "year: {} | hour: {} | season: {} | daily rows: {} | hourly rows: {}",
                sel.year.label(),
                sel.hour,
                sel.season.label(),
                self.view.daily_stats.rows,
                self.view.hourly_stats.rows,
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        // Sidebar / charts / metrics at a 3:6:4 split.
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(3, 13),
                Constraint::Ratio(6, 13),
                Constraint::Ratio(4, 13),
            ])
            .split(area);

        self.draw_sidebar(frame, columns[0]);
        self.draw_charts(frame, columns[1]);
        self.draw_metrics(frame, columns[2]);
    }

    fn draw_sidebar(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(9),
                Constraint::Min(0),
            ])
            .split(area);

        self.draw_settings(frame, chunks[0]);
        self.draw_about(frame, chunks[1]);
        self.draw_season_table(frame, chunks[2]);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let sel = &self.config.selection;
        let items = vec![
            ListItem::new(format!("Year:   {}", sel.year.label())),
            ListItem::new(format!("Hour:   {}", sel.hour)),
            ListItem::new(format!("Season: {}", sel.season.label())),
        ];

        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_about(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = Text::from(vec![
            Line::from("Weather Based: avg bikes/hour per weather"),
            Line::from("Hour Based: avg bikes shared per hour"),
            Line::from("Occurrences: weather counts at this hour"),
            Line::from("Working Day: avg count, working vs not"),
            Line::from("Peak & Low: max/min per day and hour"),
        ]);
        let p = Paragraph::new(text)
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(Block::default().title("About").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_season_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows: Vec<Row> = self
            .view
            .season_ranking
            .iter()
            .map(|r| {
                Row::new(vec![
                    r.season.display(),
                    format!("{:.1}", r.mean_count),
                    format!("{:.1}", r.mean_temp_display),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Length(9),
                Constraint::Length(9),
            ],
        )
        .header(
            Row::new(vec!["Season", "Avg Cnt", "Avg Temp"])
                .style(Style::default().fg(Color::Cyan)),
        )
        .block(Block::default().title("Best Season").borders(Borders::ALL));

        frame.render_widget(table, area);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        self.draw_weather_chart(frame, chunks[0]);
        self.draw_hour_chart(frame, chunks[1]);
    }

    fn draw_weather_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let labels: Vec<String> = self
            .view
            .weather_means
            .iter()
            .map(|m| m.category.display())
            .collect();
        let data: Vec<(&str, u64)> = self
            .view
            .weather_means
            .iter()
            .zip(&labels)
            .map(|(m, label)| (label.as_str(), m.mean_count.round().max(0.0) as u64))
            .collect();

        let chart = BarChart::default()
            .block(
                Block::default()
                    .title("Weather Based (avg hourly count)")
                    .borders(Borders::ALL),
            )
            .bar_width(12)
            .bar_gap(2)
            .bar_style(Style::default().fg(Color::Blue))
            .value_style(Style::default().fg(Color::White))
            .data(&data);

        frame.render_widget(chart, area);
    }

    fn draw_hour_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Hour Based (avg hourly count)")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let bars: Vec<(u8, f64)> = self
            .view
            .hour_means
            .iter()
            .map(|m| (m.hour, m.mean_count))
            .collect();
        let y_max = bars.iter().map(|&(_, v)| v).fold(0.0_f64, f64::max);

        let widget = HourBarsChart {
            bars: &bars,
            y_max,
            x_label: "hour",
            y_label: "avg count",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_metrics(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(6),
                Constraint::Length(6),
                Constraint::Min(0),
            ])
            .split(area);

        self.draw_totals(frame, chunks[0]);
        self.draw_peak_low(frame, chunks[1]);
        self.draw_occurrences(frame, chunks[2]);
        self.draw_working_day(frame, chunks[3]);
    }

    fn draw_totals(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = Text::from(vec![
            Line::from(format!(
                "Total Year:   {}",
                crate::report::fmt_total_year(self.view.total_year)
            )),
            Line::from(format!(
                "Total Season: {}",
                crate::report::fmt_total_season(self.view.total_season)
            )),
        ]);
        let p = Paragraph::new(text)
            .block(Block::default().title("Total Bike Shared").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_peak_low(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let fmt = |v: Option<i64>| v.map_or_else(|| "-".to_string(), |c| c.to_string());
        let text = Text::from(vec![
            Line::from(format!("Peak Day:    {}", fmt(self.view.day_extremes.max))),
            Line::from(format!("Lowest Day:  {}", fmt(self.view.day_extremes.min))),
            Line::from(format!("Peak Hour:   {}", fmt(self.view.hour_extremes.max))),
            Line::from(format!("Lowest Hour: {}", fmt(self.view.hour_extremes.min))),
        ]);
        let p = Paragraph::new(text)
            .block(Block::default().title("Peak & Low").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_occurrences(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines: Vec<Line> = self
            .view
            .weather_occurrences
            .iter()
            .map(|(weather, count)| Line::from(format!("{:<16} {count}", weather.label())))
            .collect();
        let p = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .title("Weather Occurrences")
                .borders(Borders::ALL),
        );
        frame.render_widget(p, area);
    }

    fn draw_working_day(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let labels: Vec<String> = self
            .view
            .working_day_means
            .iter()
            .map(|m| m.category.display())
            .collect();
        let data: Vec<(&str, u64)> = self
            .view
            .working_day_means
            .iter()
            .zip(&labels)
            .map(|(m, label)| (label.as_str(), m.mean_count.round().max(0.0) as u64))
            .collect();

        let chart = BarChart::default()
            .block(
                Block::default()
                    .title("Working Day (avg count)")
                    .borders(Borders::ALL),
            )
            .bar_width(16)
            .bar_gap(2)
            .bar_style(Style::default().fg(Color::Magenta))
            .value_style(Style::default().fg(Color::White))
            .data(&data);

        frame.render_widget(chart, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  r reload  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
