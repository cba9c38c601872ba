// 🖥️ Terminal UI - user tabs, search, category toggles and the sortable table

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use goods_catalog::{
    Catalog, Good, Person, ResetScope, SelectionEvent, SelectionState, SortColumn, NO_RESULTS_MESSAGE,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

pub struct App {
    pub catalog: Catalog,
    pub selection: SelectionState,
    pub view: Vec<Good>,
    pub state: TableState,
    pub reset_scope: ResetScope,
    pub input_mode: InputMode,
    pub category_cursor: usize,
    pub show_detail: bool,
}

impl App {
    pub fn new(catalog: Catalog, reset_scope: ResetScope) -> Self {
        let selection = SelectionState::new();
        let view = catalog.view(&selection);

        let mut state = TableState::default();
        if !view.is_empty() {
            state.select(Some(0));
        }

        Self {
            catalog,
            selection,
            view,
            state,
            reset_scope,
            input_mode: InputMode::Normal,
            category_cursor: 0,
            show_detail: false,
        }
    }

    /// Run one event through its reducer and re-derive the view
    pub fn dispatch(&mut self, event: SelectionEvent) {
        let current = std::mem::take(&mut self.selection);
        self.selection = current.apply(&event, self.reset_scope);
        self.view = self.catalog.view(&self.selection);

        // Reset selection to first row
        if !self.view.is_empty() {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_good(&self) -> Option<&Good> {
        self.state.selected().and_then(|i| self.view.get(i))
    }

    /// All → first person → ... → last person → All
    pub fn cycle_user(&mut self, forward: bool) {
        let people = &self.catalog.dataset.people;
        if people.is_empty() {
            return;
        }

        let position = self
            .selection
            .selected_user
            .and_then(|id| people.iter().position(|p| p.id == id));

        // Tab slots: 0 = All, 1..=len = people
        let slots = people.len() + 1;
        let current = position.map(|i| i + 1).unwrap_or(0);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };

        let user = if next == 0 { None } else { Some(people[next - 1].id) };
        self.dispatch(SelectionEvent::SelectUser { user });
    }

    pub fn move_category_cursor(&mut self, forward: bool) {
        let len = self.catalog.dataset.categories.len();
        if len == 0 {
            return;
        }
        self.category_cursor = if forward {
            (self.category_cursor + 1) % len
        } else {
            (self.category_cursor + len - 1) % len
        };
    }

    pub fn toggle_category_at_cursor(&mut self) {
        if let Some(category) = self.catalog.dataset.categories.get(self.category_cursor) {
            let category = category.id;
            self.dispatch(SelectionEvent::ToggleCategory { category });
        }
    }

    fn push_query_char(&mut self, c: char) {
        let mut query = self.selection.search_query.clone();
        query.push(c);
        self.dispatch(SelectionEvent::SetQuery { query });
    }

    fn pop_query_char(&mut self) {
        let mut query = self.selection.search_query.clone();
        query.pop();
        self.dispatch(SelectionEvent::SetQuery { query });
    }

    /// Returns false when the app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.input_mode == InputMode::Search {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Backspace => self.pop_query_char(),
                KeyCode::Char(c) => self.push_query_char(c),
                _ => {}
            }
            return true;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Enter => self.toggle_detail(),
            KeyCode::Tab => self.cycle_user(true),
            KeyCode::BackTab => self.cycle_user(false),
            KeyCode::Char('/') => self.input_mode = InputMode::Search,
            KeyCode::Char('x') => self.dispatch(SelectionEvent::ClearQuery),
            KeyCode::Left | KeyCode::Char('h') => self.move_category_cursor(false),
            KeyCode::Right | KeyCode::Char('l') => self.move_category_cursor(true),
            KeyCode::Char(' ') => self.toggle_category_at_cursor(),
            KeyCode::Char('a') => self.dispatch(SelectionEvent::ClearCategories),
            KeyCode::Char('r') => self.dispatch(SelectionEvent::ResetAll),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                let column = SortColumn::ALL[index];
                self.dispatch(SelectionEvent::ClickColumn { column });
            }
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home if !self.view.is_empty() => self.state.select(Some(0)),
            KeyCode::End if !self.view.is_empty() => self.state.select(Some(self.view.len() - 1)),
            _ => {}
        }

        true
    }

    pub fn next(&mut self) {
        let len = self.view.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.view.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.view.len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map(|i| (i + 20).min(len - 1)).unwrap_or(0);
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.view.is_empty() {
            return;
        }
        let i = self.state.selected().map(|i| i.saturating_sub(20)).unwrap_or(0);
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Ok(());
            }
            if !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // User tabs
            Constraint::Length(3), // Search
            Constraint::Length(3), // Categories
            Constraint::Min(0),    // Goods table
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_user_tabs(f, chunks[0], app);
    render_search(f, chunks[1], app);
    render_categories(f, chunks[2], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[3]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[3], app);
    }

    render_status_bar(f, chunks[4], app);
}

fn active_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

fn person_color(person: &Person) -> Color {
    if person.is_male() {
        Color::Blue
    } else {
        Color::Red
    }
}

fn render_user_tabs(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.selection.selected_user;

    let mut tab_spans = vec![Span::styled(
        "All",
        if selected.is_none() {
            active_style()
        } else {
            Style::default().fg(Color::DarkGray)
        },
    )];

    for person in &app.catalog.dataset.people {
        tab_spans.push(Span::raw(" │ "));
        let style = if selected == Some(person.id) {
            active_style()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tab_spans.push(Span::styled(person.name.clone(), style));
    }

    let tabs = Paragraph::new(Line::from(tab_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Filters "),
    );

    f.render_widget(tabs, area);
}

fn render_search(f: &mut Frame, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::Search;

    let mut spans = vec![Span::raw(" 🔍 ")];
    if app.selection.search_query.is_empty() && !editing {
        spans.push(Span::styled("Search", Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::raw(app.selection.search_query.clone()));
    }
    if editing {
        spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    }
    if !app.selection.search_query.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("[x clear]", Style::default().fg(Color::Red)));
    }

    let border = if editing { Color::Yellow } else { Color::White };
    let search = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(border)));

    f.render_widget(search, area);
}

fn render_categories(f: &mut Frame, area: Rect, app: &App) {
    let all_style = if app.selection.selected_categories.is_empty() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![Span::styled(" All ", all_style), Span::raw("  ")];

    for (i, category) in app.catalog.dataset.categories.iter().enumerate() {
        let mut style = if app.selection.is_category_selected(category.id) {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan)
        };
        if i == app.category_cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!(" {} ", category.title), style));
        spans.push(Span::raw(" "));
    }

    let categories = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Categories "),
    );

    f.render_widget(categories, area);
}

fn products_title(app: &App) -> String {
    if app.selection.has_filters() {
        format!(
            " Products ({} of {}, filtered) ",
            app.view.len(),
            app.catalog.goods.len()
        )
    } else {
        format!(" Products ({}) ", app.view.len())
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(products_title(app));

    if app.view.is_empty() {
        let message = Paragraph::new(format!("\n  {}", NO_RESULTS_MESSAGE)).block(block);
        f.render_widget(message, area);
        return;
    }

    let header_cells = SortColumn::ALL.iter().map(|column| {
        Cell::from(format!(
            "{} {}",
            column.title(),
            app.selection.sort_indicator(*column).glyph()
        ))
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.view.iter().map(|good| {
        let cells = vec![
            Cell::from(good.id.to_string()).style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from(truncate(&good.name, 30)),
            Cell::from(truncate(&good.category.label(), 24)),
            Cell::from(good.person.name.clone())
                .style(Style::default().fg(person_color(&good.person))),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(32),
            Constraint::Length(26),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, app.view.len()),
        Style::default().fg(Color::Cyan),
    )];

    let hints: &[(&str, &str)] = if app.input_mode == InputMode::Search {
        &[("Enter/Esc", " Done | "), ("Backspace", " Delete")]
    } else {
        &[
            ("Tab", " User | "),
            ("/", " Search | "),
            ("←/→ Space", " Category | "),
            ("a", " All categories | "),
            ("1-4", " Sort | "),
            ("r", " Reset | "),
            ("q", " Quit"),
        ]
    };

    status_spans.push(Span::raw(" | "));
    for (key, label) in hints {
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(*label));
    }

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Product Details ");

    let Some(good) = app.selected_good() else {
        f.render_widget(Paragraph::new("No product selected").block(block), area);
        return;
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let content = vec![
        Line::from(""),
        Line::from(vec![Span::styled("  ID: ", label), Span::raw(good.id.to_string())]),
        Line::from(""),
        Line::from(vec![Span::styled("  Product: ", label), Span::raw(good.name.clone())]),
        Line::from(""),
        Line::from(vec![Span::styled("  Category: ", label), Span::raw(good.category.label())]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Owner: ", label),
            Span::styled(
                good.person.name.clone(),
                Style::default().fg(person_color(&good.person)),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press Enter to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
