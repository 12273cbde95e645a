pub mod controller;
pub mod form;
pub mod types;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    widgets::TableState,
};

use crate::config::Config;
use crate::data::{RequestGateway, ResultStore, SelectionSummary};
use crate::error::{BidStackError, Result};
use crate::input::{Command, KeyMap};
use crate::ui::{header, loading, popup, statusbar, table};
use crate::view::Projection;

pub use controller::{ControllerSettings, ViewController};
pub use form::{FormOutcome, SearchForm};
pub use types::{MessageType, OpKind, ViewPhase};

/// Clock label in the Korean locale style, e.g. `2024. 01. 15. 14:05`
pub fn clock_label(now: DateTime<Local>) -> String {
    now.format("%Y. %m. %d. %H:%M").to_string()
}

/// The terminal shell: owns the controller and turns key presses into intents
pub struct App {
    running: bool,
    app_name: String,
    controller: ViewController,
    form: SearchForm,
    keymap: KeyMap,
    table_state: TableState,
    show_quit_confirm: bool,
    spinner_frame: usize,
    clock: String,
    clock_interval: Duration,
    last_clock: Instant,
    tick_rate: Duration,
    needs_render: bool,
}

impl App {
    pub fn new(config: Config, gateway: Arc<dyn RequestGateway>) -> Result<Self> {
        let keymap = KeyMap::from_overrides(&config.keybindings).map_err(BidStackError::Config)?;
        let controller = ViewController::new(
            ResultStore::new(),
            gateway,
            ControllerSettings::from_config(&config),
        )?;
        let now = Local::now();

        Ok(Self {
            running: false,
            app_name: config.app.name.clone(),
            controller,
            form: SearchForm::new(&config.search, now.date_naive()),
            keymap,
            table_state: TableState::default(),
            show_quit_confirm: false,
            spinner_frame: 0,
            clock: clock_label(now),
            clock_interval: config.ui.clock_interval(),
            last_clock: Instant::now(),
            tick_rate: config.ui.tick_rate(),
            needs_render: true,
        })
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        self.controller.load_agencies();
        tracing::info!("event loop started");

        while self.running {
            self.tick(Instant::now());

            if self.needs_render {
                terminal.draw(|frame| self.render(frame))?;
                self.needs_render = false;
            }

            if let Ok(true) = event::poll(self.tick_rate) {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            // Let spawned requests make progress between polls
            tokio::task::yield_now().await;
        }

        tracing::info!("event loop stopped");
        Ok(())
    }

    /// Periodic housekeeping: completions, toast expiry, spinner, clock
    fn tick(&mut self, now: Instant) {
        if self.controller.poll_completions() {
            self.clamp_cursor();
            self.needs_render = true;
        }

        if self.controller.expire_feedback(now) {
            self.needs_render = true;
        }

        if self.controller.phase().is_busy() {
            self.spinner_frame = loading::next_frame(self.spinner_frame);
            self.needs_render = true;
        }

        if now.duration_since(self.last_clock) >= self.clock_interval {
            self.clock = clock_label(Local::now());
            self.last_clock = now;
            self.needs_render = true;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.needs_render = true;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        self.controller.dismiss_feedback();

        if self.controller.pending_delete().is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.controller.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.controller.cancel_delete()
                }
                _ => {}
            }
            return;
        }

        if self.show_quit_confirm {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.running = false,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.show_quit_confirm = false
                }
                _ => {}
            }
            return;
        }

        if self.form.is_active() {
            if self.form.handle_key(key, self.controller.agencies()) == FormOutcome::Submit {
                self.submit_search();
            }
            return;
        }

        match self.keymap.resolve(&key) {
            Some(cmd) => self.run_command(cmd),
            None if key.code == KeyCode::Esc => self.show_quit_confirm = true,
            None => {}
        }
    }

    fn submit_search(&mut self) {
        match self.form.to_criteria(self.controller.agencies()) {
            Ok(criteria) => {
                self.form.close();
                self.controller.submit_search(criteria);
            }
            Err(message) => self.controller.warn(message),
        }
    }

    fn run_command(&mut self, cmd: Command) {
        match cmd {
            Command::Quit => self.show_quit_confirm = true,
            Command::Search => self.form.open(),
            Command::Down => self.move_cursor(|i, len| (i + 1).min(len - 1)),
            Command::Up => self.move_cursor(|i, _| i.saturating_sub(1)),
            Command::Top => self.move_cursor(|_, _| 0),
            Command::Bottom => self.move_cursor(|_, len| len - 1),
            Command::ToggleRow => {
                let current = self
                    .table_state
                    .selected()
                    .and_then(|i| self.controller.store().get(i))
                    .map(|row| row.id.clone());
                if let Some(id) = current {
                    let selected = !self.controller.store().is_selected(&id);
                    self.controller.toggle_row(&id, selected);
                }
            }
            Command::ToggleAll => {
                let checked = self.controller.store().summary() != SelectionSummary::All;
                self.controller.toggle_all(checked);
            }
            Command::SelectAll => self.controller.select_all(),
            Command::Delete => self.controller.request_delete(),
            Command::Export => self.controller.export(),
        }
    }

    fn move_cursor(&mut self, step: impl Fn(usize, usize) -> usize) {
        let len = self.controller.visible_len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        self.table_state.select(Some(step(current, len)));
    }

    /// Keep the highlighted row inside the (possibly shrunk) result set
    fn clamp_cursor(&mut self) {
        let len = self.controller.visible_len();
        let next = match (self.table_state.selected(), len) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.table_state.select(next);
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let projection = Projection::from_controller(&self.controller);

        let [title, form, content, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .areas(area);

        header::render_title(frame, title, &self.app_name, &self.clock);
        header::render_search_form(frame, form, &self.form, self.controller.agencies());
        table::render_results(frame, content, &projection, &mut self.table_state);
        statusbar::render_statusbar(
            frame,
            status,
            &projection,
            self.table_state.selected(),
            &self.keymap,
        );

        if let Some(busy) = projection.busy {
            loading::render_loading_indicator(frame, content, self.spinner_frame, busy);
        }

        if let Some(feedback) = self.controller.feedback() {
            popup::render_feedback(frame, area, feedback);
        }

        if let Some(confirm) = self.controller.pending_delete() {
            popup::render_confirm(frame, area, "삭제 확인", &confirm.message);
        }

        if self.show_quit_confirm {
            popup::render_confirm(frame, area, "종료", "프로그램을 종료하시겠습니까?");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        BidCategory, BidNotice, DeleteOutcome, GatewayResult, SearchCriteria, SearchOutcome,
    };
    use crate::error::GatewayFailure;
    use async_trait::async_trait;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
    use std::sync::atomic::{AtomicBool, Ordering};
    use unicode_width::UnicodeWidthStr;

    /// Always succeeds, except searches while `search_down` is set
    #[derive(Default)]
    struct StubGateway {
        search_down: AtomicBool,
    }

    fn notice(id: &str) -> BidNotice {
        BidNotice {
            id: id.to_string(),
            category: BidCategory::Service,
            announced_at: Some("2024-01-15 10:00:00".to_string()),
            closes_at: Some("2024-01-22 17:00:00".to_string()),
            title: format!("시설 관리 용역 {}", id),
            notice_no: format!("2024{}", id),
            agency: "조달청".to_string(),
            announcing_agency: None,
            estimated_price: Some("25000000".to_string()),
            detail_url: Some("https://www.g2b.go.kr".to_string()),
        }
    }

    #[async_trait]
    impl RequestGateway for StubGateway {
        async fn agencies(&self) -> GatewayResult<Vec<String>> {
            Ok(vec!["조달청".to_string()])
        }

        async fn search(&self, _criteria: &SearchCriteria) -> GatewayResult<SearchOutcome> {
            if self.search_down.load(Ordering::SeqCst) {
                return Err(GatewayFailure::transport("connection refused"));
            }
            Ok(SearchOutcome {
                rows: vec![notice("1"), notice("2"), notice("3")],
                count: 3,
            })
        }

        async fn delete(&self, ids: &[String]) -> GatewayResult<DeleteOutcome> {
            Ok(DeleteOutcome {
                remaining_count: 3 - ids.len(),
                message: format!("{}개 항목이 삭제되었습니다.", ids.len()),
            })
        }

        async fn export_spreadsheet(&self, _ids: &[String]) -> GatewayResult<Vec<u8>> {
            Err(GatewayFailure::transport("not used"))
        }
    }

    fn app() -> App {
        app_with(Arc::new(StubGateway::default()))
    }

    fn app_with(gateway: Arc<StubGateway>) -> App {
        App::new(Config::default(), gateway).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Buffer contents with the filler cells behind wide glyphs skipped
    fn buffer_text(buffer: &Buffer) -> String {
        let mut text = String::new();
        let mut hidden = 0;
        for cell in buffer.content() {
            if hidden > 0 {
                hidden -= 1;
                continue;
            }
            text.push_str(cell.symbol());
            hidden = cell.symbol().width().saturating_sub(1);
        }
        text
    }

    async fn searched_app() -> App {
        search(app()).await
    }

    async fn search(mut app: App) -> App {
        app.handle_key(press(KeyCode::Char('/')));
        assert!(app.form.is_active());
        app.handle_key(press(KeyCode::Enter));
        assert!(!app.form.is_active());
        assert_eq!(app.controller.phase(), ViewPhase::Searching);

        assert!(app.controller.next_completion().await);
        app.clamp_cursor();
        app
    }

    #[test]
    fn test_clock_label_format() {
        let at = chrono::NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(9, 7, 0)
            .unwrap()
            .and_local_timezone(Local)
            .unwrap();
        assert_eq!(clock_label(at), "2024. 01. 05. 09:07");
    }

    #[tokio::test]
    async fn test_search_then_select_and_delete() {
        let mut app = searched_app().await;
        assert_eq!(app.controller.store().len(), 3);
        assert_eq!(app.table_state.selected(), Some(0));

        app.handle_key(press(KeyCode::Char(' ')));
        app.handle_key(press(KeyCode::Char('j')));
        app.handle_key(press(KeyCode::Char(' ')));
        assert_eq!(app.controller.store().summary(), SelectionSummary::Partial);

        app.handle_key(press(KeyCode::Char('d')));
        assert!(app.controller.pending_delete().is_some());
        app.handle_key(press(KeyCode::Char('y')));
        assert_eq!(app.controller.phase(), ViewPhase::Deleting);

        app.controller.next_completion().await;
        app.clamp_cursor();
        assert_eq!(app.controller.store().len(), 1);
        assert_eq!(app.controller.count_label(), Some(1));
        assert_eq!(app.table_state.selected(), Some(0));

        let projection = Projection::from_controller(&app.controller);
        assert_eq!(projection.count_label.as_deref(), Some("1건"));
    }

    #[tokio::test]
    async fn test_toggle_all_cycles() {
        let mut app = searched_app().await;
        app.handle_key(press(KeyCode::Char('a')));
        assert_eq!(app.controller.store().summary(), SelectionSummary::All);
        app.handle_key(press(KeyCode::Char('a')));
        assert_eq!(app.controller.store().summary(), SelectionSummary::None);

        app.handle_key(press(KeyCode::Char(' ')));
        app.handle_key(press(KeyCode::Char('a')));
        assert_eq!(app.controller.store().summary(), SelectionSummary::All);
    }

    #[tokio::test]
    async fn test_invalid_form_date_warns_without_request() {
        let mut app = app();
        app.handle_key(press(KeyCode::Char('/')));
        app.handle_key(press(KeyCode::Char('x')));
        app.handle_key(press(KeyCode::Enter));

        assert!(app.form.is_active());
        assert_eq!(app.controller.phase(), ViewPhase::Idle);
        assert_eq!(
            app.controller.feedback().map(|f| f.message_type),
            Some(MessageType::Warning)
        );
    }

    #[test]
    fn test_quit_requires_confirmation() {
        let mut app = app();
        app.running = true;
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.show_quit_confirm);
        app.handle_key(press(KeyCode::Char('n')));
        assert!(!app.show_quit_confirm);
        assert!(app.running);

        app.handle_key(press(KeyCode::Char('q')));
        app.handle_key(press(KeyCode::Char('y')));
        assert!(!app.running);
    }

    #[test]
    fn test_any_key_dismisses_feedback() {
        let mut app = app();
        app.handle_key(press(KeyCode::Char('e')));
        assert!(app.controller.feedback().is_some());
        app.handle_key(press(KeyCode::Char('k')));
        assert!(app.controller.feedback().is_none());
    }

    #[tokio::test]
    async fn test_draw_results() {
        let mut app = searched_app().await;
        app.handle_key(press(KeyCode::Char(' ')));

        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("3건"));
        assert!(text.contains("[-]"));
        assert!(text.contains("2천만원"));
        assert!(text.contains("Row 1/3"));
    }

    #[tokio::test]
    async fn test_failed_search_hides_previous_rows() {
        let gateway = Arc::new(StubGateway::default());
        let mut app = search(app_with(gateway.clone())).await;
        app.handle_key(press(KeyCode::Char(' ')));

        gateway.search_down.store(true, Ordering::SeqCst);
        let mut app = search(app).await;
        assert_eq!(app.controller.phase(), ViewPhase::Empty);
        assert_eq!(app.table_state.selected(), None);
        assert_eq!(app.controller.store().len(), 3);

        // Nothing on screen, so nothing to toggle or delete
        app.handle_key(press(KeyCode::Char(' ')));
        app.handle_key(press(KeyCode::Char('d')));
        assert!(app.controller.pending_delete().is_none());
        assert_eq!(app.controller.store().selected_count(), 1);

        let projection = Projection::from_controller(&app.controller);
        assert!(projection.rows.is_empty());
        assert_eq!(projection.selected, 0);
        assert_eq!(projection.count_label, None);

        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Row 0/0"));
        assert!(!text.contains("2천만원"));
    }

    #[test]
    fn test_draw_idle() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Row 0/0"));
        assert!(text.contains("Status"));
    }
}
