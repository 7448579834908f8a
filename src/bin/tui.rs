use std::time::Duration;

use anyhow::Result;
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal, widgets::{Block, Borders, List, ListItem, Paragraph, ListState}, layout::{Layout, Constraint, Direction}, style::{Style, Modifier, Color}};

use todo_api::{
    application::todo_service::{TodoService, TodoServiceImpl},
    config::AppConfig,
    domain::{error::TodoError, repository::TodoRepository, todo::{CreateTodo, DeleteTodo, UpdateTodo}},
    infrastructure::sqlite_repo::SqliteTodoRepository,
    presentation::todo_view::TodoView,
};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = AppConfig::from_env()?;
    let repo = SqliteTodoRepository::connect(&config.database_url).await?;
    repo.init().await?;
    let service = TodoServiceImpl::new(repo);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, service, &config.database_url).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode { View, Create }

struct App<R: TodoRepository> {
    service: TodoServiceImpl<R>,
    view: TodoView,
    selected: usize,
    mode: Mode,
    list_state: ListState,
    draft: String,
    status: String,
}

impl<R: TodoRepository> App<R> {
    async fn load(&mut self) {
        match self.service.get_todos().await {
            Ok(todos) => self.view.replace_all(todos),
            Err(e) => self.status = format!("load failed: {e}"),
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.view.len();
        if len == 0 { self.selected = 0; self.list_state.select(None); }
        else { if self.selected >= len { self.selected = len - 1; } self.list_state.select(Some(self.selected)); }
    }

    async fn toggle_selected(&mut self) {
        let Some(entry) = self.view.get(self.selected) else { return };
        let input = UpdateTodo { id: entry.id, completed: !entry.completed };
        match self.service.update_todo(input).await {
            Ok(todo) => self.view.apply_updated(todo),
            Err(e @ TodoError::NotFound(_)) => {
                self.status = e.to_string();
                self.load().await;
            }
            Err(e) => self.status = format!("update failed: {e}"),
        }
    }

    async fn delete_selected(&mut self) {
        let Some(id) = self.view.get(self.selected).map(|t| t.id) else { return };
        match self.service.delete_todo(DeleteTodo { id }).await {
            Ok(outcome) => {
                if !outcome.success { self.status = format!("todo {id} was already gone"); }
                self.view.apply_deleted(id);
                self.clamp_selection();
            }
            Err(e) => self.status = format!("delete failed: {e}"),
        }
    }

    async fn submit_draft(&mut self) {
        // the draft survives a rejected create so it can be fixed and resubmitted
        let input = CreateTodo { text: self.draft.clone() };
        match self.service.create_todo(input).await {
            Ok(todo) => {
                self.draft.clear();
                self.mode = Mode::View;
                self.view.apply_created(todo);
                self.selected = 0;
                self.clamp_selection();
            }
            Err(e) => self.status = e.to_string(),
        }
    }
}

async fn run_app<R: TodoRepository>(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, service: TodoServiceImpl<R>, database_url: &str) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut app = App { service, view: TodoView::new(), selected: 0, mode: Mode::View, list_state: ListState::default(), draft: String::new(), status: String::new() };
    app.load().await;

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(1),
                    Constraint::Length(3),
                ])
                .split(f.size());

            let header = Paragraph::new(format!("{}  |  Enter/space: toggle, n: new, d: delete, r: reload, q: quit", app.view.summary()))
                .block(Block::default().borders(Borders::ALL).title("todos"));
            f.render_widget(header, chunks[0]);

            let list_items: Vec<ListItem> = app.view.items().iter().map(|t| {
                let mark = if t.completed { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {}  ({})", mark, t.text, t.created_at.format("%Y-%m-%d %H:%M")))
            }).collect();
            let list = List::new(list_items)
                .block(Block::default().borders(Borders::ALL).title("items"))
                .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
                .highlight_symbol(">> ");
            f.render_stateful_widget(list, chunks[1], &mut app.list_state);

            let (title, footer_text) = match app.mode {
                Mode::View if app.status.is_empty() => ("info", format!("DATABASE_URL={database_url}")),
                Mode::View => ("status", app.status.clone()),
                Mode::Create if app.status.is_empty() => ("new", format!("{}_  |  Enter to save, Esc to cancel", app.draft)),
                Mode::Create => ("new", format!("{}_  |  {}", app.draft, app.status)),
            };
            let footer = Paragraph::new(footer_text)
                .block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(footer, chunks[2]);
        })?;

        if !event::poll(tick_rate)? { continue; }
        let Event::Key(key) = event::read()? else { continue };
        // Only act on key presses; ignore repeats and releases to prevent duplicate input
        if key.kind != KeyEventKind::Press { continue; }
        match app.mode {
            Mode::View => {
                app.status.clear();
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Up => { if app.selected > 0 { app.selected -= 1; } app.clamp_selection(); }
                    KeyCode::Down => { if app.selected + 1 < app.view.len() { app.selected += 1; } app.clamp_selection(); }
                    KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected().await,
                    KeyCode::Char('d') => app.delete_selected().await,
                    KeyCode::Char('r') => app.load().await,
                    KeyCode::Char('n') => { app.mode = Mode::Create; app.draft.clear(); }
                    _ => {}
                }
            }
            Mode::Create => match key.code {
                KeyCode::Esc => { app.mode = Mode::View; app.draft.clear(); app.status.clear(); }
                KeyCode::Enter => { app.status.clear(); app.submit_draft().await; }
                KeyCode::Backspace => { app.draft.pop(); }
                KeyCode::Char(c) => { app.status.clear(); app.draft.push(c); }
                _ => {}
            },
        }
    }
    Ok(())
}
