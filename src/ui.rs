use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use glacier_catalog::{chart, BalanceSeries, Glacier, GlacierCatalog, DEFAULT_TOP_N};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState,
    },
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Inventory,
    Rankings,
    Extremes,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Inventory => Page::Rankings,
            Page::Rankings => Page::Extremes,
            Page::Extremes => Page::Inventory,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Inventory => Page::Extremes,
            Page::Rankings => Page::Inventory,
            Page::Extremes => Page::Rankings,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Inventory => "Inventory",
            Page::Rankings => "Rankings",
            Page::Extremes => "Extremes",
        }
    }
}

pub struct App {
    pub catalog: GlacierCatalog,
    pub state: TableState,
    pub current_page: Page,
    pub show_series: bool,
}

impl App {
    pub fn new(catalog: GlacierCatalog) -> Self {
        let mut state = TableState::default();
        if !catalog.is_empty() {
            state.select(Some(0));
        }

        Self {
            catalog,
            state,
            current_page: Page::Inventory,
            show_series: false,
        }
    }

    pub fn toggle_series(&mut self) {
        self.show_series = !self.show_series;
    }

    pub fn selected_glacier(&self) -> Option<&Glacier> {
        self.state.selected().and_then(|i| self.catalog.iter().nth(i))
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    /// How deep the ranking tables can go without running out of
    /// measured glaciers.
    pub fn ranking_depth(&self) -> usize {
        let measured = self
            .catalog
            .iter()
            .filter(|g| g.has_measurements())
            .count();
        DEFAULT_TOP_N.min(measured)
    }

    pub fn next(&mut self) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                let next = i + 20;
                if next >= len {
                    len - 1
                } else {
                    next
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i < 20 {
                    0
                } else {
                    i - 20
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            total: self.catalog.len(),
            ..CatalogStats::default()
        };

        for glacier in self.catalog.iter() {
            if let Some((_, latest)) = glacier.latest() {
                stats.measured += 1;
                if latest > 0.0 {
                    stats.growing += 1;
                } else if latest < 0.0 {
                    stats.shrinking += 1;
                }
            }
        }

        stats
    }
}

#[derive(Default)]
pub struct CatalogStats {
    pub total: usize,
    pub measured: usize,
    pub growing: usize,
    pub shrinking: usize,
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_series(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.state.select(Some(0)),
                KeyCode::End => {
                    if !app.catalog.is_empty() {
                        app.state.select(Some(app.catalog.len() - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    // Header with page navigation
    render_header(f, chunks[0], app);

    // Content area with optional split for the selected glacier's series
    if app.show_series && app.current_page == Page::Inventory {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(55), // Inventory table
                Constraint::Percentage(45), // Balance series chart
            ])
            .split(chunks[1]);

        render_inventory(f, content_chunks[0], app);
        render_series_chart(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Inventory => render_inventory(f, chunks[1], app),
            Page::Rankings => render_rankings(f, chunks[1], app),
            Page::Extremes => render_extremes(f, chunks[1], app),
        }
    }

    // Status bar
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.stats();

    let pages = [Page::Inventory, Page::Rankings, Page::Extremes];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Glaciers: {}", stats.total),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Measured: {}", stats.measured),
        Style::default().fg(Color::Cyan),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("↓ {}", stats.shrinking),
        Style::default().fg(Color::Red),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("↑ {}", stats.growing),
        Style::default().fg(Color::Green),
    ));

    let header_text = vec![Line::from(tab_spans)];

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_inventory(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["ID", "Name", "Unit", "Latitude", "Longitude", "Code", "Obs", "Latest"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.catalog.iter().map(|glacier| {
        let (latest, color) = match glacier.latest() {
            Some((year, value)) => {
                let color = if value > 0.0 {
                    Color::Green
                } else if value < 0.0 {
                    Color::Red
                } else {
                    Color::White
                };
                (format!("{value:.1} ({year})"), color)
            }
            None => ("-".to_string(), Color::DarkGray),
        };

        let cells = vec![
            Cell::from(glacier.id().to_string()),
            Cell::from(truncate(glacier.name(), 28)),
            Cell::from(glacier.political_unit().to_string()),
            Cell::from(format!("{:.5}", glacier.latitude())),
            Cell::from(format!("{:.5}", glacier.longitude())),
            Cell::from(format!("{}", glacier.code())),
            Cell::from(format!("{}", glacier.measurement_count())),
            Cell::from(latest).style(Style::default().fg(color)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Length(30),
            Constraint::Length(6),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Glacier Inventory "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_rankings(f: &mut Frame, area: Rect, app: &App) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let depth = app.ranking_depth();
    render_ranking_table(
        f,
        halves[0],
        " Top Growers ",
        Color::Green,
        app.catalog.sort_by_latest_balance(depth, false),
    );
    render_ranking_table(
        f,
        halves[1],
        " Top Shrinkers ",
        Color::Red,
        app.catalog.sort_by_latest_balance(depth, true),
    );
}

fn render_ranking_table(
    f: &mut Frame,
    area: Rect,
    title: &str,
    accent: Color,
    ranked: glacier_catalog::Result<Vec<&Glacier>>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(title.to_string());

    let glaciers = match ranked {
        Ok(glaciers) => glaciers,
        Err(e) => {
            let message = Paragraph::new(format!("\n  {e}"))
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(message, area);
            return;
        }
    };

    let header_cells = ["#", "Name", "Latest", "Year"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = glaciers.iter().enumerate().map(|(i, glacier)| {
        let (year, value) = glacier.latest().unwrap_or((0, 0.0));
        let cells = vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(truncate(glacier.name(), 26)),
            Cell::from(format!("{value:.1}")).style(Style::default().fg(accent)),
            Cell::from(format!("{year}")),
        ];
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(28),
            Constraint::Length(10),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}

fn render_extremes(f: &mut Frame, area: Rect, app: &App) {
    match app.catalog.extremes() {
        Ok((grower, shrinker)) => {
            render_series(
                f,
                area,
                " Extremes - strongest growth vs strongest shrinkage ",
                &[(grower, Color::Green), (shrinker, Color::Red)],
            );
        }
        Err(e) => {
            let message = Paragraph::new(format!("\n  Nothing to chart: {e}"))
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title(" Extremes "));
            f.render_widget(message, area);
        }
    }
}

fn render_series_chart(f: &mut Frame, area: Rect, app: &App) {
    let Some(glacier) = app.selected_glacier() else {
        return;
    };

    if !glacier.has_measurements() {
        let message = Paragraph::new("\n  No measurements recorded")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", glacier.name())),
            );
        f.render_widget(message, area);
        return;
    }

    let series = BalanceSeries::new(glacier.name(), glacier.series());
    let title = format!(" {} - annual mass balance ", glacier.name());
    render_series(f, area, &title, &[(series, Color::Cyan)]);
}

fn render_series(f: &mut Frame, area: Rect, title: &str, series: &[(BalanceSeries, Color)]) {
    let all: Vec<BalanceSeries> = series.iter().map(|(s, _)| s.clone()).collect();

    let (year_lo, year_hi) = pad_years(chart::combined_year_range(&all).unwrap_or((0, 1)));
    let (value_lo, value_hi) = pad_values(chart::combined_value_range(&all).unwrap_or((0.0, 1.0)));

    let points: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|(s, _)| s.points.iter().map(|&(y, v)| (y as f64, v)).collect())
        .collect();

    let datasets = series
        .iter()
        .zip(points.iter())
        .map(|((s, color), data)| {
            Dataset::default()
                .name(s.label.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(*color))
                .data(data)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title.to_string()),
        )
        .x_axis(
            Axis::default()
                .title("Year")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([year_lo as f64, year_hi as f64])
                .labels(vec![
                    Span::raw(format!("{year_lo}")),
                    Span::raw(format!("{}", (year_lo + year_hi) / 2)),
                    Span::raw(format!("{year_hi}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Balance")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([value_lo, value_hi])
                .labels(vec![
                    Span::raw(format!("{value_lo:.0}")),
                    Span::raw(format!("{:.0}", (value_lo + value_hi) / 2.0)),
                    Span::raw(format!("{value_hi:.0}")),
                ]),
        );

    f.render_widget(chart, area);
}

// Ajustar los límites cuando la serie tiene un solo punto
fn pad_years((lo, hi): (i32, i32)) -> (i32, i32) {
    if lo == hi {
        (lo - 1, hi + 1)
    } else {
        (lo, hi)
    }
}

fn pad_values((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo - span * 0.1, hi + span * 0.1)
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.catalog.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if app.show_series {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            "Series panel on",
            Style::default().fg(Color::Green),
        ));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Series | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Fast | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_text = vec![Line::from(status_spans)];

    let status_bar = Paragraph::new(status_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
