//! Interactive report browser.
//!
//! Shows one collapsible group per owner. Year, month, day and owner are cycled with
//! single keys; every change recomputes the report from the session, which collapses
//! all groups again.

use std::collections::HashSet;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::filter::{DayFilter, MonthFilter};
use crate::render::{describe_selection, owner_heading, task_row};
use crate::report::{OwnerReport, Report};
use crate::session::Session;
use crate::tui::colors::{DARK_PURPLE, GOLD, LATE_RED, STEEL_BLUE};
use crate::tui::enums::{cycle, AppState, FilterField};

pub struct ReportApp {
    session: Session,
    report: Report,
    state: AppState,
    expanded: HashSet<String>,
    selected_owner: usize,
    list_state: ListState,
    status_message: String,
    should_quit: bool,
}

impl ReportApp {
    pub fn new(session: Session) -> Self {
        let report = session.report();
        ReportApp {
            session,
            report,
            state: AppState::Report,
            expanded: HashSet::new(),
            selected_owner: 0,
            list_state: ListState::default(),
            status_message: String::new(),
            should_quit: false,
        }
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_expanded(&self, owner: &str) -> bool {
        self.expanded.contains(owner)
    }

    pub fn selected_owner(&self) -> Option<&OwnerReport> {
        self.report.owners.get(self.selected_owner)
    }

    fn recompute(&mut self) {
        self.report = self.session.report();
        self.expanded.clear();
        if self.selected_owner >= self.report.owners.len() {
            self.selected_owner = self.report.owners.len().saturating_sub(1);
        }
    }

    /// Move the given selection dimension one step and refresh the report.
    fn cycle_filter(&mut self, field: FilterField, forward: bool) {
        let selection = self.session.selection().clone();
        let changed = match field {
            FilterField::Year => {
                let mut choices: Vec<Option<i32>> = vec![None];
                choices.extend(self.session.index().years.iter().copied().map(Some));
                cycle(&choices, &selection.year, forward).map(|y| self.session.set_year(y)).is_some()
            }
            FilterField::Month => {
                let mut choices = vec![MonthFilter::All];
                choices.extend(
                    self.session.index().month_labels.iter().cloned().map(MonthFilter::Label),
                );
                cycle(&choices, &selection.month, forward).map(|m| self.session.set_month(m)).is_some()
            }
            FilterField::Day => {
                let mut choices = vec![DayFilter::All];
                choices.extend(self.session.days().iter().cloned().map(DayFilter::Day));
                cycle(&choices, &selection.day, forward).map(|d| self.session.set_day(d)).is_some()
            }
            FilterField::Owner => {
                let choices = self.session.owner_choices();
                cycle(&choices, &selection.owner, forward).map(|o| self.session.set_owner(o)).is_some()
            }
        };

        if changed {
            self.recompute();
            self.set_status_message(format!(
                "{}: {}",
                field.label(),
                describe_selection(self.session.selection())
            ));
        }
    }

    fn toggle_selected(&mut self) {
        let Some(owner) = self.selected_owner().map(|o| o.owner.clone()) else {
            self.set_status_message("No owner selected".to_string());
            return;
        };
        if !self.expanded.remove(&owner) {
            self.expanded.insert(owner);
        }
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    /// Apply one key press. Returns true when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if self.state == AppState::Help {
            self.state = AppState::Report;
            return false;
        }

        self.status_message.clear();
        let shift = modifiers.contains(KeyModifiers::SHIFT);
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => self.should_quit = true,
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_owner = self.selected_owner.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_owner + 1 < self.report.owners.len() {
                    self.selected_owner += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('e') => {
                self.expanded = self.report.owners.iter().map(|o| o.owner.clone()).collect();
            }
            KeyCode::Char('c') => self.expanded.clear(),
            KeyCode::Char(c @ ('y' | 'Y')) => self.cycle_filter(FilterField::Year, c == 'y' && !shift),
            KeyCode::Char(c @ ('m' | 'M')) => self.cycle_filter(FilterField::Month, c == 'm' && !shift),
            KeyCode::Char(c @ ('d' | 'D')) => self.cycle_filter(FilterField::Day, c == 'd' && !shift),
            KeyCode::Char(c @ ('o' | 'O')) => self.cycle_filter(FilterField::Owner, c == 'o' && !shift),
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        self.should_quit
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
            }
        }
        Ok(false)
    }

    /// Main event loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }

    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Owner groups
                Constraint::Length(1), // Total
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_groups(f, chunks[1]);
        self.render_total(f, chunks[2]);
        self.render_status_bar(f, chunks[3]);

        if self.state == AppState::Help {
            self.render_help(f);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let load = self.session.tasks().len();
        let header = Paragraph::new(Line::from(vec![
            Span::styled("COMPLETED TASKS", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                describe_selection(self.session.selection()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
            Span::raw(format!("  ({load} loaded)")),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    /// Flatten owner groups into list rows, returning the row index of each owner header.
    fn group_items(&self) -> (Vec<ListItem<'static>>, Vec<usize>) {
        let escalation = self.session.aggregate_options.escalation_metrics;
        let mut items = Vec::new();
        let mut header_rows = Vec::new();

        for owner in &self.report.owners {
            let open = self.expanded.contains(&owner.owner);
            header_rows.push(items.len());
            items.push(ListItem::new(Line::from(vec![
                Span::styled(if open { "[-] " } else { "[+] " }, Style::default().fg(STEEL_BLUE)),
                Span::styled(owner_heading(owner, escalation), Style::default().add_modifier(Modifier::BOLD)),
            ])));
            if !open {
                continue;
            }

            for entry in &owner.task_type_counts {
                items.push(ListItem::new(format!("      {:<30} {:>5}", entry.task_type, entry.count)));
            }
            items.push(ListItem::new(
                Line::from(format!("      {:<30} {:>5}", "Total Completed", owner.total_count))
                    .style(Style::default().fg(GOLD)),
            ));
            if escalation {
                let style = Style::default().fg(Color::White).bg(DARK_PURPLE);
                items.push(ListItem::new(
                    Line::from(format!("      {:<30} {:>5}", "Picked up after escalation", owner.picked_after_escalation_count))
                        .style(style),
                ));
                items.push(ListItem::new(
                    Line::from(format!("      {:<30} {:>5}", "Total escalation completed", owner.escalated_count))
                        .style(style),
                ));
            }
            for task in &owner.tasks {
                let style = if task.picked_after_escalation() {
                    Style::default().fg(LATE_RED)
                } else {
                    Style::default()
                };
                items.push(ListItem::new(Line::from(format!("    {}", task_row(task))).style(style)));
            }
        }
        (items, header_rows)
    }

    fn render_groups(&mut self, f: &mut Frame, area: Rect) {
        let (items, header_rows) = self.group_items();
        let block = Block::default().borders(Borders::ALL).title("Owners");

        if items.is_empty() {
            let empty = Paragraph::new("No tasks match the current selection.")
                .block(block)
                .alignment(Alignment::Center);
            f.render_widget(empty, area);
            return;
        }

        self.list_state.select(header_rows.get(self.selected_owner).copied());
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(STEEL_BLUE).fg(Color::White));
        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_total(&self, f: &mut Frame, area: Rect) {
        let total = Paragraph::new(format!("Total Tasks: {}", self.report.total_tasks))
            .style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Right);
        f.render_widget(total, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if self.status_message.is_empty() {
            "Enter: Toggle | e/c: Expand/Collapse all | y m d o: Cycle filters (Shift: back) | h: Help | q: Quit".to_string()
        } else {
            self.status_message.clone()
        };
        let status = Paragraph::new(text).style(Style::default().bg(STEEL_BLUE).fg(Color::White));
        f.render_widget(status, area);
    }

    fn render_help(&self, f: &mut Frame) {
        let area = f.area();
        let popup = Rect::new(area.width / 6, area.height / 6, area.width * 2 / 3, area.height * 2 / 3);
        f.render_widget(Clear, popup);

        let lines = vec![
            Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from("Up/Down, j/k   Select owner"),
            Line::from("Enter, Space   Expand or collapse owner"),
            Line::from("e / c          Expand all / collapse all"),
            Line::from("y / Y          Next / previous year"),
            Line::from("m / M          Next / previous month"),
            Line::from("d / D          Next / previous day"),
            Line::from("o / O          Next / previous owner"),
            Line::from("q, Esc         Quit"),
            Line::from(""),
            Line::from("Rows in red were picked up after escalation."),
        ];
        let help = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help (any key to close)")
                    .title_alignment(Alignment::Center),
            )
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(Color::Black));
        f.render_widget(help, popup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Roster;
    use crate::fields::*;
    use crate::filter::OwnerFilter;
    use crate::source::RawRow;
    use ratatui::backend::TestBackend;

    fn row(date: &str, owner: &str, pon: &str) -> RawRow {
        RawRow::from_pairs([
            (COL_COMPLETE_DATE, date),
            (COL_OWNER, owner),
            (COL_ORDER, pon),
            (COL_TASK_TYPE, "Install"),
            (COL_ESCALATED, "Yes"),
            (COL_ESCALATION_TIME, "2024-03-04T10:00"),
            (COL_ASSIGNMENT_DATE, "2024-03-04T12:00"),
        ])
    }

    fn app() -> ReportApp {
        let mut session = Session::new(Roster::default());
        session.load_rows_at(
            &[
                row("2024-03-05", "Tim Corey", "PON-1"),
                row("2024-03-09", "Ermal Shala", "PON-2"),
                row("2024-02-01", "Tim Corey", "PON-3"),
            ],
            2024,
        );
        ReportApp::new(session)
    }

    fn screen(app: &mut ReportApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_groups_start_collapsed() {
        let mut app = app();
        let text = screen(&mut app);
        assert!(text.contains("[+] Tim Corey (1 completed | 1 escalated | 1 picked up after escalation)"));
        assert!(text.contains("[+] Ermal Shala"));
        assert!(text.contains("Total Tasks: 2"));
        assert!(!text.contains("Total Completed"));
    }

    #[test]
    fn test_toggle_expands_selected_owner() {
        let mut app = app();
        app.handle_key(KeyCode::Down, KeyModifiers::NONE);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.is_expanded("Ermal Shala"));
        assert!(!app.is_expanded("Tim Corey"));

        let text = screen(&mut app);
        assert!(text.contains("[-] Ermal Shala"));
        assert!(text.contains("PON-2"));

        app.handle_key(KeyCode::Char(' '), KeyModifiers::NONE);
        assert!(!app.is_expanded("Ermal Shala"));
    }

    #[test]
    fn test_cycling_month_recomputes() {
        let mut app = app();
        app.handle_key(KeyCode::Char('e'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('M'), KeyModifiers::SHIFT);
        assert_eq!(app.session().selection().month, MonthFilter::Label("February 2024".to_string()));
        assert_eq!(app.report().total_tasks, 1);
        assert!(!app.is_expanded("Tim Corey"));

        app.handle_key(KeyCode::Char('m'), KeyModifiers::NONE);
        assert_eq!(app.session().selection().month, MonthFilter::Label("March 2024".to_string()));

        app.handle_key(KeyCode::Char('d'), KeyModifiers::NONE);
        assert_eq!(app.session().selection().day, DayFilter::Day("05".to_string()));
        assert_eq!(app.report().total_tasks, 1);
    }

    #[test]
    fn test_cycling_owner_and_year() {
        let mut app = app();
        app.handle_key(KeyCode::Char('o'), KeyModifiers::NONE);
        assert_eq!(app.session().selection().owner, OwnerFilter::Named("Fitim Ahmeti".to_string()));
        assert_eq!(app.report().total_tasks, 0);

        app.handle_key(KeyCode::Char('O'), KeyModifiers::SHIFT);
        assert_eq!(app.session().selection().owner, OwnerFilter::All);

        app.handle_key(KeyCode::Char('y'), KeyModifiers::NONE);
        assert_eq!(app.session().selection().year, None);
        assert_eq!(app.report().total_tasks, 0);
        assert!(screen(&mut app).contains("No tasks match"));
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('h'), KeyModifiers::NONE));
        assert!(screen(&mut app).contains("Help (any key to close)"));
        assert!(!app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE));
    }
}
