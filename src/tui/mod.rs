//! Ratatui-based loan form.
//!
//! The left pane is the form; the right pane shows the last schedule (table,
//! totals and chart) or the error that replaced it. Validation failures pop up
//! an alert and never reach the backend.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
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
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
};
use rust_decimal::prelude::ToPrimitive;

use crate::api::LoanApiClient;
use crate::app::pipeline::Submission;
use crate::config::Config;
use crate::domain::{AmortizationType, ClientSummary, Frequency, LoanRequest, Schedule};
use crate::error::AppError;
use crate::form::{Field, LoanForm};
use crate::report::{CALCULATING, format_brl, format_date};

mod plotters_chart;

use plotters_chart::SchedulePlottersChart;

/// Rows moved per PageUp/PageDown in the schedule table.
const PAGE_ROWS: usize = 10;
/// Results requested per client search.
const SEARCH_PAGE_SIZE: u32 = 20;

/// Start the TUI.
pub fn run(config: &Config) -> Result<(), AppError> {
    let client = LoanApiClient::new(config)?;
    let mut app = App::new(client, Local::now().date_naive());

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::remote(format!("Failed to initialize terminal: {e}")))?;

    tracing::info!(base_url = app.client.base_url(), "loan form started");
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::remote(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::remote(format!("Failed to enter alternate screen: {e}")));
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

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Browse,
    /// Editing the selected text field; the buffer is committed on Enter.
    Editing,
    /// Validation alert; any key dismisses it.
    Alert(String),
    Search,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq)]
enum Action {
    None,
    Quit,
    Submit(LoanRequest),
    SearchClients(String),
}

/// Right-hand pane contents.
#[derive(Debug, Clone)]
enum Outcome {
    Schedule(Submission),
    Failed(String),
}

#[derive(Debug, Default)]
struct ClientSearch {
    query: String,
    /// Query the current results belong to.
    searched: Option<String>,
    results: Vec<ClientSummary>,
    selected: usize,
}

struct App {
    client: LoanApiClient,
    today: NaiveDate,
    form: LoanForm,
    selected_field: usize,
    mode: Mode,
    edit_buffer: String,
    status: String,
    outcome: Option<Outcome>,
    table_state: TableState,
    search: ClientSearch,
}

impl App {
    fn new(client: LoanApiClient, today: NaiveDate) -> Self {
        Self {
            client,
            today,
            form: LoanForm::new(today),
            selected_field: 0,
            mode: Mode::Browse,
            edit_buffer: String::new(),
            status: "Fill in the form and press c to calculate.".to_string(),
            outcome: None,
            table_state: TableState::default(),
            search: ClientSearch::default(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                self.redraw(terminal)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::remote(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::remote(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match self.handle_key(key.code) {
                        Action::None => {}
                        Action::Quit => break,
                        Action::Submit(request) => {
                            // Show the in-flight marker before blocking on the request.
                            self.status = CALCULATING.to_string();
                            self.redraw(terminal)?;
                            self.calculate(request);
                        }
                        Action::SearchClients(query) => {
                            self.status = format!("Searching clients for '{query}'...");
                            self.redraw(terminal)?;
                            self.run_search(query);
                        }
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

    fn redraw<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        terminal
            .draw(|f| self.draw(f))
            .map_err(|e| AppError::remote(format!("Terminal draw error: {e}")))?;
        Ok(())
    }

    fn selected(&self) -> Field {
        Field::ALL[self.selected_field]
    }

    fn handle_key(&mut self, code: KeyCode) -> Action {
        match self.mode {
            Mode::Alert(_) => {
                self.mode = Mode::Browse;
                Action::None
            }
            Mode::Editing => self.handle_edit(code),
            Mode::Search => self.handle_search(code),
            Mode::Browse => self.handle_browse(code),
        }
    }

    fn handle_browse(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < Field::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => {
                let field = self.selected();
                cycle_choice(&mut self.form, field, -1);
            }
            KeyCode::Right => {
                let field = self.selected();
                cycle_choice(&mut self.form, field, 1);
            }
            KeyCode::Enter => {
                let field = self.selected();
                if field.is_choice() {
                    cycle_choice(&mut self.form, field, 1);
                } else {
                    self.edit_buffer = self.form.value(field).to_string();
                    self.mode = Mode::Editing;
                    self.status = format!("Editing {}. Enter to apply, Esc to cancel.", field.label());
                }
            }
            KeyCode::Char('c') => return self.submit(),
            KeyCode::Char('/') => {
                self.mode = Mode::Search;
                self.status = "Type a client name, Enter to search/pick, Esc to close.".to_string();
            }
            KeyCode::Char('e') => self.export_csv(),
            KeyCode::PageDown => self.scroll_table(PAGE_ROWS as isize),
            KeyCode::PageUp => self.scroll_table(-(PAGE_ROWS as isize)),
            _ => {}
        }
        Action::None
    }

    fn handle_edit(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let field = self.selected();
                *self.form.value_mut(field) = self.edit_buffer.trim().to_string();
                self.mode = Mode::Browse;
                self.status = format!("{} updated.", field.label());
            }
            KeyCode::Backspace => {
                self.edit_buffer.pop();
            }
            KeyCode::Char(c) => {
                if accepts_char(self.selected(), c) {
                    self.edit_buffer.push(c);
                }
            }
            _ => {}
        }
        Action::None
    }

    fn handle_search(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.status = "Client search closed.".to_string();
            }
            KeyCode::Up => {
                self.search.selected = self.search.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.search.selected + 1 < self.search.results.len() {
                    self.search.selected += 1;
                }
            }
            KeyCode::Backspace => {
                self.search.query.pop();
            }
            KeyCode::Char(c) => self.search.query.push(c),
            KeyCode::Enter => {
                let query = self.search.query.trim().to_string();
                let fresh = self.search.searched.as_deref() == Some(query.as_str());
                if fresh && !self.search.results.is_empty() {
                    let picked = &self.search.results[self.search.selected];
                    self.form.client_id = picked.id.to_string();
                    self.status = format!("Client: {} (#{})", picked.full_name(), picked.id);
                    self.mode = Mode::Browse;
                } else if !query.is_empty() {
                    return Action::SearchClients(query);
                }
            }
            _ => {}
        }
        Action::None
    }

    /// Pre-flight validation; only a valid form turns into a request.
    fn submit(&mut self) -> Action {
        match self.form.validate(self.today) {
            Ok(request) => Action::Submit(request),
            Err(err) => {
                tracing::warn!(reason = %err, "loan form rejected");
                self.mode = Mode::Alert(err.to_string());
                self.status = "Fix the form and try again.".to_string();
                Action::None
            }
        }
    }

    fn calculate(&mut self, request: LoanRequest) {
        match self.client.calculate_schedule(&request) {
            Ok(schedule) => {
                self.status = format!(
                    "{} installments | interest {} | accumulated {}",
                    schedule.len(),
                    format_brl(schedule.total_interest()),
                    format_brl(schedule.total_accumulated()),
                );
                self.table_state = TableState::default();
                if !schedule.is_empty() {
                    self.table_state.select(Some(0));
                }
                self.outcome = Some(Outcome::Schedule(Submission { request, schedule }));
            }
            Err(err) => {
                self.status = "Calculation failed.".to_string();
                self.outcome = Some(Outcome::Failed(err.message().to_string()));
            }
        }
    }

    fn run_search(&mut self, query: String) {
        match self.client.search_clients(&query, 0, SEARCH_PAGE_SIZE) {
            Ok(page) => {
                self.status = format!("{} client(s) found.", page.content.len());
                self.search.results = page.content;
            }
            Err(err) => {
                self.status = err.message().to_string();
                self.search.results.clear();
            }
        }
        self.search.selected = 0;
        self.search.searched = Some(query);
    }

    fn export_csv(&mut self) {
        let Some(Outcome::Schedule(submission)) = &self.outcome else {
            self.status = "No schedule to export.".to_string();
            return;
        };
        let path = export_path(&submission.request);
        match crate::io::write_schedule_csv(&path, &submission.schedule) {
            Ok(()) => self.status = format!("Wrote {}", path.display()),
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    fn scroll_table(&mut self, delta: isize) {
        let Some(Outcome::Schedule(submission)) = &self.outcome else {
            return;
        };
        let len = submission.schedule.len();
        if len == 0 {
            return;
        }
        let cur = self.table_state.selected().unwrap_or(0) as isize;
        let next = (cur + delta).clamp(0, len as isize - 1) as usize;
        self.table_state.select(Some(next));
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_form(frame, body[0]);
        self.draw_result(frame, body[1]);

        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Alert(message) => draw_alert(frame, size, message),
            Mode::Search => self.draw_search(frame, size),
            _ => {}
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("loan", Style::default().fg(Color::Cyan)),
            Span::raw(" | amortization plan | backend: "),
            Span::styled(self.client.base_url(), Style::default().fg(Color::Gray)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = Field::ALL
            .iter()
            .enumerate()
            .map(|(i, &field)| {
                let value = if self.mode == Mode::Editing && i == self.selected_field {
                    format!("{}_", self.edit_buffer)
                } else {
                    display_value(&self.form, field)
                };
                ListItem::new(format!("{:<18} {value}", format!("{}:", field.label())))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Loan").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_result(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Amortization Plan").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let submission = match &self.outcome {
            None => {
                let msg = Paragraph::new("No schedule yet.").style(Style::default().fg(Color::Gray));
                frame.render_widget(msg, inner);
                return;
            }
            Some(Outcome::Failed(message)) => {
                let msg = Paragraph::new(message.as_str())
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true });
                frame.render_widget(msg, inner);
                return;
            }
            Some(Outcome::Schedule(submission)) => submission,
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(2), Constraint::Length(14)])
            .split(inner);

        let schedule = &submission.schedule;
        let header = Row::new(["Number", "Date", "Principal", "Interest", "Total"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = schedule
            .installments
            .iter()
            .map(|inst| {
                Row::new(vec![
                    Cell::from(inst.installment_number.to_string()),
                    Cell::from(format_date(inst.installment_date)),
                    Cell::from(format_brl(inst.installment_amount)),
                    Cell::from(format_brl(inst.installment_interest)),
                    Cell::from(format_brl(inst.installment_total)),
                ])
            })
            .collect();
        let widths = [
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(16),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Gray));

        let totals = Text::from(vec![
            Line::from(format!("Total Interest:    {}", format_brl(schedule.total_interest()))),
            Line::from(format!("Total Accumulated: {}", format_brl(schedule.total_accumulated()))),
        ]);

        let series = chart_series(schedule);
        let chart = SchedulePlottersChart {
            principal: &series.principal,
            interest: &series.interest,
            total: &series.total,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
        };

        frame.render_stateful_widget(table, chunks[0], &mut self.table_state);
        frame.render_widget(Paragraph::new(totals), chunks[1]);
        frame.render_widget(chart, chunks[2]);
    }

    fn draw_search(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rect = centered_rect(area, 60, 16);
        frame.render_widget(Clear, rect);

        let block = Block::default().title("Client search").borders(Borders::ALL);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let input = Paragraph::new(format!("name: {}_", self.search.query))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(input, chunks[0]);

        let items: Vec<ListItem> = self
            .search
            .results
            .iter()
            .map(|c| ListItem::new(format!("#{:<6} {} <{}>", c.id, c.full_name(), c.email)))
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");
        let mut state = ListState::default();
        if !self.search.results.is_empty() {
            state.select(Some(self.search.selected));
        }
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  Enter edit  ←/→ option  c calculate  / client  e export  PgUp/PgDn scroll  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_alert(frame: &mut ratatui::Frame<'_>, area: Rect, message: &str) {
    let rect = centered_rect(area, 56, 5);
    frame.render_widget(Clear, rect);
    let p = Paragraph::new(vec![
        Line::from(Span::styled(message, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled("Press any key.", Style::default().fg(Color::Gray))),
    ])
    .wrap(Wrap { trim: true })
    .style(Style::default().fg(Color::Yellow))
    .block(Block::default().title("Check the form").borders(Borders::ALL));
    frame.render_widget(p, rect);
}

/// Move an option field to the next/previous value (empty starts at the first option).
fn cycle_choice(form: &mut LoanForm, field: Field, delta: i32) {
    match field {
        Field::AmortizationType => {
            let next = match form.amortization_type.parse::<AmortizationType>() {
                Ok(cur) if delta >= 0 => cur.next(),
                Ok(cur) => cur.prev(),
                Err(_) => AmortizationType::ALL[0],
            };
            form.amortization_type = next.code().to_string();
        }
        Field::Frequency => {
            let next = match form.frequency.parse::<Frequency>() {
                Ok(cur) if delta >= 0 => cur.next(),
                Ok(cur) => cur.prev(),
                Err(_) => Frequency::ALL[0],
            };
            form.frequency = next.code().to_string();
        }
        _ => {}
    }
}

fn accepts_char(field: Field, c: char) -> bool {
    match field {
        Field::Amount | Field::InterestRate => c.is_ascii_digit() || c == '.' || c == ',' || c == '-',
        Field::Installments => c.is_ascii_digit() || c == '-',
        Field::Date => c.is_ascii_digit() || c == '-',
        Field::Client => !c.is_control(),
        Field::AmortizationType | Field::Frequency => false,
    }
}

fn display_value(form: &LoanForm, field: Field) -> String {
    let raw = form.value(field);
    match field {
        Field::AmortizationType => raw
            .parse::<AmortizationType>()
            .map(|t| format!("‹ {} ›", t.display_name()))
            .unwrap_or_else(|_| "‹ choose ›".to_string()),
        Field::Frequency => raw
            .parse::<Frequency>()
            .map(|f| format!("‹ {} ›", f.display_name()))
            .unwrap_or_else(|_| "‹ choose ›".to_string()),
        _ if raw.is_empty() => "-".to_string(),
        _ => raw.to_string(),
    }
}

fn export_path(request: &LoanRequest) -> PathBuf {
    PathBuf::from(format!(
        "loan-schedule_{}_client{}.csv",
        request.date.format("%Y%m%d"),
        sanitize(&request.client_id)
    ))
}

fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct ChartSeries {
    principal: Vec<(f64, f64)>,
    interest: Vec<(f64, f64)>,
    total: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters.
fn chart_series(schedule: &Schedule) -> ChartSeries {
    let point = |n: u32, v: rust_decimal::Decimal| (f64::from(n), v.to_f64().unwrap_or(0.0));

    let principal: Vec<(f64, f64)> = schedule
        .installments
        .iter()
        .map(|i| point(i.installment_number, i.installment_amount))
        .collect();
    let interest: Vec<(f64, f64)> = schedule
        .installments
        .iter()
        .map(|i| point(i.installment_number, i.installment_interest))
        .collect();
    let total: Vec<(f64, f64)> = schedule
        .installments
        .iter()
        .map(|i| point(i.installment_number, i.installment_total))
        .collect();

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (0.0_f64, f64::NEG_INFINITY);
    for &(x, y) in principal.iter().chain(&interest).chain(&total) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !x_min.is_finite() || !x_max.is_finite() {
        x_min = 1.0;
        x_max = 2.0;
    } else if x_max <= x_min {
        x_min -= 0.5;
        x_max += 0.5;
    }
    if !y_max.is_finite() || y_max <= y_min {
        y_max = y_min + 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    ChartSeries {
        principal,
        interest,
        total,
        x_bounds: [x_min, x_max],
        y_bounds: [y_min, y_max + pad],
    }
}

/// A `width` x `height` rect centered in `area` (clamped to it).
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
