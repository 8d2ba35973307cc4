//! Terminal front-end
//!
//! Decodes keystrokes into [`Key`]s, lets [`ViewerState::handle`] compute the
//! next state and draws it. Nothing here decides what a key means.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use gradeview_core::navigation::{AnswerView, TreeView};
use gradeview_core::{is_block_beginning, Key, ScanConfig, Step, ViewerState};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::path::Path;

type Backend = CrosstermBackend<Stdout>;

/// Raw mode + alternate screen, undone on drop
struct TerminalGuard {
    terminal: Terminal<Backend>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// What a terminal key event means to the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Key(Key),
    Interrupt,
}

fn decode(event: KeyEvent) -> Option<Input> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(event.code, KeyCode::Char('c' | 'C')).then_some(Input::Interrupt);
    }

    let key = match event.code {
        KeyCode::Char('q' | 'Q') => Key::Quit,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter | KeyCode::Char(' ') => Key::Select,
        _ => return None,
    };
    Some(Input::Key(key))
}

/// Run the interactive browser starting at `start`
pub fn run(start: &Path, config: &ScanConfig) -> Result<()> {
    let state = ViewerState::open(start, config)
        .with_context(|| format!("Failed to open {}", start.display()))?;
    let mut guard = TerminalGuard::enter()?;

    event_loop(state, config, event::read, |state| {
        guard.terminal.draw(|frame| render(frame, state))?;
        Ok(())
    })
}

/// Draw, wait for one event, apply it; repeat until exit
///
/// `next_event` blocks, so an idle browser does no work. Non-key events
/// (resizes) only cause a redraw.
fn event_loop<E, D>(
    mut state: ViewerState,
    config: &ScanConfig,
    mut next_event: E,
    mut draw: D,
) -> Result<()>
where
    E: FnMut() -> io::Result<Event>,
    D: FnMut(&ViewerState) -> io::Result<()>,
{
    loop {
        draw(&state)?;

        let Event::Key(event) = next_event()? else {
            continue;
        };

        match decode(event) {
            Some(Input::Key(key)) => match state.handle(key, config) {
                Step::Continue(next) => state = next,
                Step::Exit => return Ok(()),
            },
            Some(Input::Interrupt) => return Ok(()),
            None => {}
        }
    }
}

fn render(frame: &mut Frame, state: &ViewerState) {
    let [title, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    match state {
        ViewerState::DirectoryTree(tree) => render_tree(frame, tree, [title, body, footer]),
        ViewerState::AnswerBrowse(view) => render_answer(frame, view, [title, body, footer]),
    }
}

fn render_tree(frame: &mut Frame, tree: &TreeView, [title, body, footer]: [Rect; 3]) {
    let heading = Span::styled(
        tree.dir.display().to_string(),
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
    );
    frame.render_widget(Paragraph::new(Line::from(heading)), title);

    let items: Vec<ListItem> = tree
        .entries
        .iter()
        .map(|entry| ListItem::new(format!("{}/", entry)))
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(tree.selected));
    frame.render_stateful_widget(list, body, &mut list_state);

    let status = match &tree.status {
        Some(message) => Span::styled(message.as_str(), Style::default().fg(Color::Red)),
        None => Span::styled(
            "enter: open  q: quit",
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(status)), footer);
}

fn render_answer(frame: &mut Frame, view: &AnswerView, [title, body, footer]: [Rect; 3]) {
    let heading = Span::styled(
        format!("# {}", view.dir.display()),
        Style::default().fg(Color::Green),
    );
    frame.render_widget(Paragraph::new(Line::from(heading)), title);

    let lines: Vec<Line> = view
        .block()
        .map(|block| block.lines())
        .unwrap_or_default()
        .iter()
        .map(|line| {
            if is_block_beginning(line) {
                Line::styled(line.as_str(), Style::default().fg(Color::Green))
            } else {
                Line::raw(line.as_str())
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body);

    let user = view
        .corpus
        .user(view.cursor.user)
        .map(|user| user.user_id().to_string())
        .unwrap_or_default();
    let hint = Span::styled(
        format!("{}  arrows: move  q: back", user),
        Style::default().fg(Color::DarkGray),
    );
    frame.render_widget(Paragraph::new(Line::from(hint)), footer);
}
