//! Main application logic for the terminal user interface.
//!
//! `App` wraps the interaction controller with everything that only matters
//! on screen: which pane has focus, list and drawer selection, the search
//! input. Every key press becomes one controller call; the visible list is
//! recomputed from the controller after each event.

use std::io;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::controller::Controller;
use crate::dates::format_due_relative;
use crate::fields::ViewFilter;
use crate::form::{FormField, TaskForm};
use crate::input::InputField;
use crate::storage::Storage;
use crate::tui::{
    enums::Focus,
    theme::{category_icon, Theme},
    utils::{centered_rect, cursor_column},
};

const DRAWER_WIDTH: u16 = 28;

/// What a key press inside a task form asks for.
#[derive(Debug, PartialEq, Eq)]
enum FormAction {
    Submit,
    Cancel,
    Continue,
}

/// Apply a key to a task form. Shared by the entry form and the edit popup.
fn handle_form_key(form: &mut TaskForm, key: KeyCode) -> FormAction {
    match key {
        KeyCode::Esc => return FormAction::Cancel,
        KeyCode::Enter => return FormAction::Submit,
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left | KeyCode::Right => {
            let forward = key == KeyCode::Right;
            match form.focus {
                FormField::Category => form.cycle_category(forward),
                FormField::Priority => form.cycle_priority(forward),
                _ => {
                    if let Some(input) = form.focused_input_mut() {
                        if forward {
                            input.move_cursor_right();
                        } else {
                            input.move_cursor_left();
                        }
                    }
                }
            }
        }
        KeyCode::Home => {
            if let Some(input) = form.focused_input_mut() {
                input.move_home();
            }
        }
        KeyCode::End => {
            if let Some(input) = form.focused_input_mut() {
                input.move_end();
            }
        }
        KeyCode::Backspace => {
            if let Some(input) = form.focused_input_mut() {
                input.handle_backspace();
            }
        }
        KeyCode::Delete => {
            if let Some(input) = form.focused_input_mut() {
                input.handle_delete();
            }
        }
        KeyCode::Char(c) => match form.focus {
            FormField::Category if c == ' ' => form.cycle_category(true),
            FormField::Priority if c == ' ' => form.cycle_priority(true),
            _ => {
                if let Some(input) = form.focused_input_mut() {
                    input.handle_char(c);
                }
            }
        },
        _ => {}
    }
    FormAction::Continue
}

/// Terminal front end over a `Controller`.
pub struct App<S> {
    controller: Controller<S>,
    focus: Focus,
    list_state: ListState,
    drawer_state: ListState,
    search: InputField,
    visible: Vec<u64>,
}

impl<S: Storage> App<S> {
    pub fn new(controller: Controller<S>) -> Self {
        let mut app = App {
            controller,
            focus: Focus::TaskList,
            list_state: ListState::default(),
            drawer_state: ListState::default(),
            search: InputField::new(),
            visible: Vec::new(),
        };
        app.refresh_visible(Local::now().date_naive());
        app
    }

    pub fn controller(&self) -> &Controller<S> {
        &self.controller
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Recompute the visible ids and keep the selection in range.
    fn refresh_visible(&mut self, today: NaiveDate) {
        let old_selected = self.selected_id();
        self.visible = self.controller.view(today).ids();

        if self.visible.is_empty() {
            self.list_state.select(None);
            return;
        }
        let idx = old_selected
            .and_then(|id| self.visible.iter().position(|v| *v == id))
            .or_else(|| {
                self.list_state
                    .selected()
                    .map(|i| i.min(self.visible.len() - 1))
            })
            .unwrap_or(0);
        self.list_state.select(Some(idx));
    }

    /// Id of the highlighted task.
    pub fn selected_id(&self) -> Option<u64> {
        self.list_state
            .selected()
            .and_then(|i| self.visible.get(i))
            .copied()
    }

    fn move_selection(&mut self, down: bool) {
        if self.visible.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(self.visible.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.list_state.select(Some(next));
    }

    fn open_drawer(&mut self) {
        if !self.controller.drawer_open() {
            self.controller.toggle_drawer();
        }
        let current = self.controller.view_state().filter;
        let idx = ViewFilter::drawer_entries()
            .iter()
            .position(|f| *f == current)
            .unwrap_or(0);
        self.drawer_state.select(Some(idx));
        self.focus = Focus::Drawer;
    }

    fn close_drawer(&mut self) {
        if self.controller.drawer_open() {
            self.controller.toggle_drawer();
        }
        self.focus = Focus::TaskList;
    }

    /// Handle key presses while the task list has focus.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_key(&mut self, key: KeyCode, now: Instant) -> bool {
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.search.value.is_empty() {
                    return true;
                }
                self.search.clear();
                self.controller.set_search("");
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Char('a') | KeyCode::Char('n') => {
                self.controller.draft.focus = FormField::Title;
                self.focus = Focus::AddForm;
            }
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('m') => self.open_drawer(),
            KeyCode::Char('s') => self.controller.toggle_sort(),
            KeyCode::Char('t') => self.controller.toggle_theme(),
            KeyCode::Char('?') => self.focus = Focus::Help,
            KeyCode::Char('C') => {
                self.controller.clear_completed(now);
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                if let Some(id) = self.selected_id() {
                    self.controller.toggle_completed(id, now);
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.controller.toggle_expanded(id);
                }
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    if self.controller.begin_edit(id) {
                        self.focus = Focus::EditForm;
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.controller.delete(id, now);
                }
            }
            _ => {}
        }
        false
    }

    fn handle_add_form_key(&mut self, key: KeyCode, today: NaiveDate, now: Instant) {
        match handle_form_key(&mut self.controller.draft, key) {
            FormAction::Submit => {
                if let Some(id) = self.controller.submit_draft(today, now) {
                    self.refresh_visible(today);
                    if let Some(idx) = self.visible.iter().position(|v| *v == id) {
                        self.list_state.select(Some(idx));
                    }
                }
            }
            FormAction::Cancel => self.focus = Focus::TaskList,
            FormAction::Continue => {}
        }
    }

    fn handle_edit_form_key(&mut self, key: KeyCode, today: NaiveDate, now: Instant) {
        let Some(session) = self.controller.editing_mut() else {
            self.focus = Focus::TaskList;
            return;
        };
        match handle_form_key(&mut session.form, key) {
            FormAction::Submit => {
                if self.controller.commit_edit(today, now) {
                    self.focus = Focus::TaskList;
                }
            }
            FormAction::Cancel => {
                self.controller.cancel_edit();
                self.focus = Focus::TaskList;
            }
            FormAction::Continue => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.search.clear();
                self.focus = Focus::TaskList;
            }
            KeyCode::Enter | KeyCode::Down => self.focus = Focus::TaskList,
            KeyCode::Backspace => self.search.handle_backspace(),
            KeyCode::Delete => self.search.handle_delete(),
            KeyCode::Left => self.search.move_cursor_left(),
            KeyCode::Right => self.search.move_cursor_right(),
            KeyCode::Char(c) => self.search.handle_char(c),
            _ => return,
        }
        self.controller.set_search(self.search.value.clone());
    }

    fn handle_drawer_key(&mut self, key: KeyCode) {
        let entries = ViewFilter::drawer_entries();
        match key {
            KeyCode::Esc | KeyCode::Char('m') => self.close_drawer(),
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.drawer_state.selected().unwrap_or(0);
                self.drawer_state.select(Some(i.saturating_sub(1)));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.drawer_state.selected().unwrap_or(0);
                self.drawer_state.select(Some((i + 1).min(entries.len() - 1)));
            }
            KeyCode::Enter => {
                let i = self.drawer_state.selected().unwrap_or(0);
                if let Some(filter) = entries.get(i) {
                    self.controller.select_filter(*filter);
                }
                self.focus = Focus::TaskList;
            }
            _ => {}
        }
    }

    /// Dispatch one key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent, today: NaiveDate, now: Instant) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let quit = match self.focus {
            Focus::TaskList => self.handle_task_list_key(key.code, now),
            Focus::AddForm => {
                self.handle_add_form_key(key.code, today, now);
                false
            }
            Focus::EditForm => {
                self.handle_edit_form_key(key.code, today, now);
                false
            }
            Focus::Search => {
                self.handle_search_key(key.code);
                false
            }
            Focus::Drawer => {
                self.handle_drawer_key(key.code);
                false
            }
            Focus::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    self.focus = Focus::TaskList;
                }
                false
            }
        };
        self.refresh_visible(today);
        quit
    }

    /// Poll for and handle keyboard events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                return Ok(self.handle_key(key, Local::now().date_naive(), Instant::now()));
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect, theme: &Theme, today: NaiveDate) {
        let counts = self.controller.view(today).counts;
        let state = self.controller.view_state();
        let line = Line::from(vec![
            Span::styled("TASKDESK", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!(
                    "Total {}  Done {}  Overdue {}  High {}",
                    counts.total, counts.completed, counts.overdue, counts.high_priority
                ),
                Style::default().fg(theme.text),
            ),
            Span::raw("  "),
            Span::styled(
                format!(
                    "View: {}  Sort: {}  {}",
                    state.filter.label(),
                    state.sort.label(),
                    if self.controller.dark_mode() { "Dark" } else { "Light" }
                ),
                Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC),
            ),
        ]);
        let header = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.accent)))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_drawer(&mut self, f: &mut Frame, area: Rect, theme: &Theme, today: NaiveDate) {
        let counts = self.controller.view(today).counts;
        let active = self.controller.view_state().filter;
        let items: Vec<ListItem> = ViewFilter::drawer_entries()
            .into_iter()
            .map(|filter| {
                let icon = match filter {
                    ViewFilter::All => "≡",
                    ViewFilter::HighPriorityOnly => "!",
                    ViewFilter::DueToday => "◷",
                    ViewFilter::ByCategory(c) => category_icon(c),
                };
                let style = if filter == active {
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{icon} {:<15}", filter.label()), style),
                    Span::styled(format!("{:>4}", counts.for_filter(filter)), Style::default().fg(theme.dim)),
                ]))
            })
            .collect();

        let border = if self.focus == Focus::Drawer { theme.accent } else { theme.dim };
        let drawer = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title("Filters"),
            )
            .highlight_style(Style::default().bg(theme.selection_bg).fg(theme.selection_fg))
            .highlight_symbol("> ");
        f.render_stateful_widget(drawer, area, &mut self.drawer_state);
    }

    /// Render a task form into `area`. Places the cursor when `focused`.
    fn render_form(f: &mut Frame, area: Rect, form: &TaskForm, focused: bool, title: &str, theme: &Theme) {
        let label = |field: FormField, name: &str| {
            let style = if focused && form.focus == field {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.dim)
            };
            Span::styled(format!("{name:<13}"), style)
        };
        let value = Style::default().fg(theme.text);
        let category = form.category.map(|c| c.label()).unwrap_or("(none)");

        let lines = vec![
            Line::from(vec![label(FormField::Title, "Title"), Span::styled(form.title.value.clone(), value)]),
            Line::from(vec![
                label(FormField::Description, "Description"),
                Span::styled(form.description.value.clone(), value),
            ]),
            Line::from(vec![label(FormField::Due, "Due"), Span::styled(form.due.value.clone(), value)]),
            Line::from(vec![
                label(FormField::Category, "Category"),
                Span::styled(format!("< {category} >"), value),
                Span::raw("   "),
                label(FormField::Priority, "Priority"),
                Span::styled(format!("< {} >", form.priority), Style::default().fg(theme.priority(form.priority))),
            ]),
        ];

        let border = if focused { theme.accent } else { theme.dim };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title.to_string());
        let inner = block.inner(area);
        f.render_widget(Paragraph::new(lines).block(block), area);

        if focused {
            let row = match form.focus {
                FormField::Title => Some((0, &form.title)),
                FormField::Description => Some((1, &form.description)),
                FormField::Due => Some((2, &form.due)),
                _ => None,
            };
            if let Some((row, input)) = row {
                match cursor_column(inner, 13, input.cursor) {
                    Some(x) if row < inner.height => f.set_cursor_position((x, inner.y + row)),
                    _ => {}
                }
            }
        }
    }

    fn render_search(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let focused = self.focus == Focus::Search;
        let border = if focused { theme.accent } else { theme.dim };
        let text = if self.search.value.is_empty() && !focused {
            Span::styled("Press / to search tasks", Style::default().fg(theme.dim))
        } else {
            Span::styled(self.search.value.clone(), Style::default().fg(theme.text))
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title("Search");
        let inner = block.inner(area);
        f.render_widget(Paragraph::new(Line::from(text)).block(block), area);
        if focused {
            if let Some(x) = cursor_column(inner, 0, self.search.cursor) {
                f.set_cursor_position((x, inner.y));
            }
        }
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect, theme: &Theme, today: NaiveDate) {
        let (items, shown, total) = {
            let view = self.controller.view(today);
            let items: Vec<ListItem> = view
                .tasks
                .iter()
                .map(|task| {
                    let text_style = if task.completed {
                        Style::default().fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
                    } else {
                        Style::default().fg(theme.text)
                    };
                    let due_style = if task.is_overdue(today) && !task.completed {
                        Style::default().fg(theme.overdue).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(theme.dim)
                    };
                    let mut lines = vec![Line::from(vec![
                        Span::raw(if task.completed { "[x] " } else { "[ ] " }),
                        Span::styled(task.text.clone(), text_style),
                        Span::raw("  "),
                        Span::styled(
                            format!("{} {}", category_icon(task.category), task.category),
                            Style::default().fg(theme.dim),
                        ),
                        Span::raw("  "),
                        Span::styled(task.priority.label(), Style::default().fg(theme.priority(task.priority))),
                        Span::raw("  "),
                        Span::styled(
                            if task.due_date.is_some() {
                                format!("due {}", format_due_relative(task.due_date, today))
                            } else {
                                String::new()
                            },
                            due_style,
                        ),
                        Span::styled(
                            if task.expanded || task.description.is_empty() { "" } else { "  …" },
                            Style::default().fg(theme.dim),
                        ),
                    ])];
                    if task.expanded {
                        if task.description.is_empty() {
                            lines.push(Line::styled("    No description", Style::default().fg(theme.dim)));
                        } else {
                            lines.extend(task.description.lines().map(|l| {
                                Line::styled(format!("    {l}"), Style::default().fg(theme.text))
                            }));
                        }
                    }
                    ListItem::new(lines)
                })
                .collect();
            (items, view.len(), view.counts.total)
        };

        let title = format!("Tasks ({shown}/{total})");
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if self.focus == Focus::TaskList { theme.accent } else { theme.dim }))
            .title(title);

        if items.is_empty() {
            let message = if total == 0 {
                "No tasks yet. Press 'a' to add one."
            } else {
                "No tasks match the current filter."
            };
            let empty = Paragraph::new(message)
                .style(Style::default().fg(theme.dim))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(theme.selection_bg).fg(theme.selection_fg))
            .highlight_symbol(">> ");
        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_help(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let rows = [
            ("a / n", "Focus the add form"),
            ("Enter (form)", "Add the task"),
            ("/", "Search titles"),
            ("m", "Open the filter drawer"),
            ("s", "Toggle sort: priority / due date"),
            ("t", "Toggle light / dark theme"),
            ("Space / x", "Toggle completed"),
            ("Enter", "Show / hide description"),
            ("e", "Edit selected task"),
            ("d / Del", "Delete selected task"),
            ("C", "Clear completed tasks"),
            ("q / Esc", "Quit"),
        ];
        let lines: Vec<Line> = rows
            .iter()
            .map(|(k, d)| {
                Line::from(vec![
                    Span::styled(format!("{k:<14}"), Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
                    Span::styled(*d, Style::default().fg(theme.text)),
                ])
            })
            .collect();
        let popup = centered_rect(60, 60, area);
        f.render_widget(Clear, popup);
        f.render_widget(
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Help"))
                .style(Style::default().bg(theme.background))
                .wrap(Wrap { trim: false }),
            popup,
        );
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let text = match self.controller.notification() {
            Some(message) => message.to_string(),
            None => self.focus.hint().to_string(),
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(theme.accent).fg(theme.bar_text))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function.
    fn render(&mut self, f: &mut Frame) {
        let today = Local::now().date_naive();
        let theme = Theme::for_mode(self.controller.dark_mode());
        f.render_widget(Block::default().style(Style::default().bg(theme.background)), f.area());

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());
        self.render_header(f, rows[0], &theme, today);

        let main = if self.controller.drawer_open() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(DRAWER_WIDTH), Constraint::Min(0)])
                .split(rows[1]);
            self.render_drawer(f, cols[0], &theme, today);
            cols[1]
        } else {
            rows[1]
        };

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Length(3), Constraint::Min(0)])
            .split(main);
        Self::render_form(
            f,
            sections[0],
            &self.controller.draft,
            self.focus == Focus::AddForm,
            "New Task",
            &theme,
        );
        self.render_search(f, sections[1], &theme);
        self.render_task_list(f, sections[2], &theme, today);

        if let Some(session) = self.controller.editing() {
            let popup = centered_rect(70, 40, rows[1]);
            f.render_widget(Clear, popup);
            f.render_widget(Block::default().style(Style::default().bg(theme.background)), popup);
            Self::render_form(f, popup, &session.form, self.focus == Focus::EditForm, "Edit Task", &theme);
        }
        if self.focus == Focus::Help {
            self.render_help(f, rows[1], &theme);
        }

        self.render_status_bar(f, rows[2], &theme);
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.controller.tick(Instant::now());
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Category, SortKey};
    use crate::persist::Persistence;
    use crate::storage::MemoryStorage;
    use crate::store::TaskStore;
    use ratatui::backend::TestBackend;

    fn app() -> App<MemoryStorage> {
        App::new(Controller::new(TaskStore::open(Persistence::new(MemoryStorage::new()))))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 4).unwrap()
    }

    fn press(app: &mut App<MemoryStorage>, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), today(), Instant::now())
    }

    fn type_text(app: &mut App<MemoryStorage>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add_task(app: &mut App<MemoryStorage>, title: &str) {
        press(app, KeyCode::Char('a'));
        type_text(app, title);
        press(app, KeyCode::Enter);
        press(app, KeyCode::Esc);
    }

    #[test]
    fn test_enter_in_form_adds_task() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.focus(), Focus::AddForm);
        type_text(&mut app, "Buy milk");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        let tasks = app.controller().store().tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Buy milk");
        assert_eq!(tasks[0].category, Category::Shopping);
        assert_eq!(app.controller().notification(), Some("Task added successfully!"));
        assert_eq!(app.selected_id(), Some(tasks[0].id));
    }

    #[test]
    fn test_list_keys_toggle_and_delete() {
        let mut app = app();
        add_task(&mut app, "one");
        add_task(&mut app, "two");
        assert_eq!(app.focus(), Focus::TaskList);

        let first = app.controller().store().tasks()[0].id;
        app.list_state.select(Some(0));
        press(&mut app, KeyCode::Char(' '));
        assert!(app.controller().store().get(first).unwrap().completed);
        press(&mut app, KeyCode::Enter);
        assert!(app.controller().store().get(first).unwrap().expanded);
        press(&mut app, KeyCode::Char('d'));
        assert!(app.controller().store().get(first).is_none());
        assert_eq!(app.visible.len(), 1);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_search_and_drawer() {
        let mut app = app();
        add_task(&mut app, "alpha");
        add_task(&mut app, "beta");

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "ALP");
        assert_eq!(app.visible.len(), 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.visible.len(), 2);

        press(&mut app, KeyCode::Char('m'));
        assert!(app.controller().drawer_open());
        assert_eq!(app.focus(), Focus::Drawer);
        // All, High Priority, Due Today, Personal
        for _ in 0..3 {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Enter);
        assert!(!app.controller().drawer_open());
        assert_eq!(app.controller().view_state().filter, ViewFilter::ByCategory(Category::Personal));
        assert!(app.visible.is_empty());
        assert_eq!(app.selected_id(), None);
    }

    #[test]
    fn test_edit_popup() {
        let mut app = app();
        add_task(&mut app, "old");
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.focus(), Focus::EditForm);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "new");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus(), Focus::TaskList);
        assert_eq!(app.controller().store().tasks()[0].text, "new");
    }

    #[test]
    fn test_sort_key_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.controller().view_state().sort, SortKey::DueDate);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        press(&mut app, KeyCode::Char('a'));
        assert!(app.handle_key(ctrl_c, today(), Instant::now()));
        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_render_smoke() {
        let mut app = app();
        add_task(&mut app, "render me");
        press(&mut app, KeyCode::Char('m'));
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(text.contains("render me"));
        assert!(text.contains("Filters"));
    }

    #[test]
    fn test_render_long_search_keeps_cursor_inside() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        for _ in 0..300 {
            press(&mut app, KeyCode::Char('a'));
        }
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let cursor = terminal.get_cursor_position().unwrap();
        assert!(cursor.x < 80);
    }
}
