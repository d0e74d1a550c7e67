//! Sorter TUI - interactive single-package classification form
//!
//! Collects the four measurements (width, height, length in cm; mass in
//! kg), classifies on Enter, and displays:
//! - The resulting category (STANDARD / SPECIAL / REJECTED) or the
//!   validation failure, verbatim
//! - Live volume and longest-dimension readouts while editing
//! - A short history of recent classifications

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use sorter_poc::domain::{classify, Classification, Field, MeasurementError};
use sorter_poc::infra::Config;
use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

/// Maximum classifications to keep in history
const MAX_HISTORY: usize = 12;

const FIELD_LABELS: [&str; 4] = ["Width (cm)", "Height (cm)", "Length (cm)", "Mass (kg)"];

/// One past classification shown in the history panel
struct HistoryEntry {
    summary: String,
    color: Color,
}

struct App {
    /// Editable text of the four fields, in width/height/length/mass order
    inputs: [String; 4],
    /// Index of the field currently being edited
    selected: usize,
    /// Result of the last submit, if any
    result: Option<Result<Classification, MeasurementError>>,
    history: VecDeque<HistoryEntry>,
}

impl App {
    fn new(config: &Config) -> Self {
        Self {
            inputs: [
                format_value(config.form_width_cm()),
                format_value(config.form_height_cm()),
                format_value(config.form_length_cm()),
                format_value(config.form_mass_kg()),
            ],
            selected: 0,
            result: None,
            history: VecDeque::new(),
        }
    }

    fn next_field(&mut self) {
        self.selected = (self.selected + 1) % self.inputs.len();
    }

    fn prev_field(&mut self) {
        self.selected = (self.selected + self.inputs.len() - 1) % self.inputs.len();
    }

    fn push_char(&mut self, c: char) {
        // Numeric input only; sign and exponent entry are not needed here
        if c.is_ascii_digit() || c == '.' {
            self.inputs[self.selected].push(c);
        }
    }

    fn pop_char(&mut self) {
        self.inputs[self.selected].pop();
    }

    /// Parse the four fields in validation order.
    ///
    /// A field that does not parse reports the same TypeKind failure the
    /// core raises for a non-numeric value.
    fn parsed(&self) -> Result<[f64; 4], MeasurementError> {
        let mut values = [0.0f64; 4];
        for ((field, input), slot) in
            Field::ORDERED.into_iter().zip(&self.inputs).zip(&mut values)
        {
            *slot = input
                .trim()
                .parse::<f64>()
                .map_err(|_| MeasurementError::NotANumber(field))?;
        }
        Ok(values)
    }

    fn submit(&mut self) {
        let result = self
            .parsed()
            .and_then(|[width, height, length, mass]| classify(width, height, length, mass));

        let entry = match &result {
            Ok(classification) => HistoryEntry {
                summary: format!(
                    "{} × {} × {} cm, {} kg → {}",
                    self.inputs[0], self.inputs[1], self.inputs[2], self.inputs[3], classification
                ),
                color: classification_color(*classification),
            },
            Err(err) => HistoryEntry { summary: format!("error: {}", err), color: Color::Red },
        };

        self.history.push_front(entry);
        if self.history.len() > MAX_HISTORY {
            self.history.pop_back();
        }

        self.result = Some(result);
    }
}

fn classification_color(classification: Classification) -> Color {
    match classification {
        Classification::Standard => Color::Green,
        Classification::Special => Color::Yellow,
        Classification::Rejected => Color::Red,
    }
}

/// Render a config default without a trailing ".0"
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let config = Config::load(&args);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    let result = run_ui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_ui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| draw_ui(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Tab | KeyCode::Down => app.next_field(),
                        KeyCode::BackTab | KeyCode::Up => app.prev_field(),
                        KeyCode::Backspace => app.pop_char(),
                        KeyCode::Enter => app.submit(),
                        KeyCode::Char(c) => app.push_char(c),
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

fn draw_ui(f: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Input fields
            Constraint::Length(3), // Computed readout
            Constraint::Length(3), // Result banner
            Constraint::Min(0),    // History
        ])
        .split(f.area());

    draw_header(f, main_chunks[0]);
    draw_fields(f, main_chunks[1], app);
    draw_readout(f, main_chunks[2], app);
    draw_result(f, main_chunks[3], app);
    draw_history(f, main_chunks[4], app);
}

fn draw_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Package Sorter ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("| Tab/↑↓ move | Enter classify | 'q' quit"),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn draw_fields(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    for (i, (label, input)) in FIELD_LABELS.iter().zip(&app.inputs).enumerate() {
        let selected = i == app.selected;
        let border_style = if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text = if selected { format!("{}█", input) } else { input.clone() };

        let field = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(*label).border_style(border_style));
        f.render_widget(field, chunks[i]);
    }
}

fn draw_readout(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.parsed() {
        Ok([width, height, length, mass]) => Line::from(vec![
            Span::raw(format!("Volume: {:.0} cm³", width * height * length)),
            Span::raw("  |  "),
            Span::raw(format!("Longest dimension: {:.2} cm", width.max(height).max(length))),
            Span::raw("  |  "),
            Span::raw(format!("Mass: {:.2} kg", mass)),
        ]),
        Err(_) => Line::from(Span::styled("-", Style::default().fg(Color::DarkGray))),
    };

    let readout = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title(" Package "));
    f.render_widget(readout, area);
}

fn draw_result(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.result {
        Some(Ok(classification)) => Line::from(Span::styled(
            classification.as_str(),
            Style::default()
                .fg(classification_color(*classification))
                .add_modifier(Modifier::BOLD),
        )),
        Some(Err(err)) => {
            Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red)))
        }
        None => Line::from(Span::styled(
            "press Enter to classify",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let result = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title(" Classification "));
    f.render_widget(result, area);
}

fn draw_history(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .history
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(Span::styled(
                entry.summary.clone(),
                Style::default().fg(entry.color),
            )))
        })
        .collect();

    let list =
        List::new(items).block(Block::default().borders(Borders::ALL).title(" History "));
    f.render_widget(list, area);
}
