use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::api::DirectoryClient;
use crate::api::types::{Profile, UserSummary};
use crate::command::{self, Command};
use crate::config::AppConfig;
use crate::directory::controller::{DirectoryController, FetchMode, FetchRequest, ToggleRequest};
use crate::directory::debounce::Debouncer;
use crate::directory::listing::QueryContext;
use crate::directory::resolver::resolve_follow_status;
use crate::event::{ApiResult, AppEvent, Event, EventHandler, app_event};
use crate::profile::ProfileCache;
use crate::ui;

// ---------------------------------------------------------------------------
// App mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Search,
    Command,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub running: bool,
    pub events: EventHandler,
    pub config: AppConfig,
    pub mode: AppMode,
    pub show_help: bool,

    // Directory state (single owner; mutated only from the event loop)
    pub directory: DirectoryController,
    pub selected_index: usize,
    debouncer: Debouncer,

    // Input state
    pub search_input: String,
    pub command_input: String,

    // Signed-in user
    pub actor_id: Option<String>,
    pub profile: Option<Profile>,
    profile_cache: ProfileCache,

    pub api_client: Option<Arc<DirectoryClient>>,

    // Local messages (unknown commands etc.); fetch errors live in `directory`.
    pub status_message: Option<String>,
}

impl App {
    pub fn new(
        config: AppConfig,
        api_client: Option<DirectoryClient>,
        profile_cache: ProfileCache,
    ) -> Self {
        let events = EventHandler::new(config.tick_rate_fps);
        let debouncer = Debouncer::new(config.debounce(), events.sender());

        let actor_id = api_client
            .as_ref()
            .and_then(|c| c.session())
            .map(|s| s.user_id.clone());

        let profile = match profile_cache.load_for(actor_id.as_deref()) {
            Ok(cached) => cached.map(|c| c.profile),
            Err(e) => {
                let path = profile_cache.path().display();
                tracing::warn!(%path, "ignoring unreadable profile cache: {e}");
                None
            }
        };

        Self {
            running: true,
            events,
            mode: AppMode::Normal,
            show_help: false,
            directory: DirectoryController::new(actor_id.clone(), config.page_size),
            selected_index: 0,
            debouncer,
            search_input: String::new(),
            command_input: String::new(),
            actor_id,
            profile,
            profile_cache,
            api_client: api_client.map(Arc::new),
            status_message: None,
            config,
        }
    }

    // -- Main event loop ----------------------------------------------------

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        // Initial browse listing and profile refresh.
        self.events.send(AppEvent::Reload);
        self.refresh_profile();

        while self.running {
            terminal.draw(|frame| self.draw(frame))?;
            match self.events.next().await? {
                Event::Tick => {}
                Event::Crossterm(event) => {
                    if let crossterm::event::Event::Key(key) = event
                        && key.kind == crossterm::event::KeyEventKind::Press
                    {
                        self.handle_key_event(key);
                    }
                }
                Event::App(app_event) => self.handle_app_event(*app_event),
            }
        }

        self.debouncer.cancel();
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        ui::draw(frame, self);
    }

    // -- Key event routing --------------------------------------------------

    fn handle_key_event(&mut self, key: KeyEvent) {
        // Ctrl-C always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.events.send(AppEvent::Quit);
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q' | '?')) {
                self.events.send(AppEvent::ToggleHelp);
            }
            return;
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Search => self.handle_search_key(key),
            AppMode::Command => self.handle_command_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc if self.has_message() => {
                self.dismiss_messages();
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.events.send(AppEvent::Quit);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection_down();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection_up();
            }
            KeyCode::Char('f') | KeyCode::Enter => {
                self.toggle_selected();
            }
            KeyCode::Char('n') => {
                self.events.send(AppEvent::LoadMore);
            }
            KeyCode::Char('r') => {
                self.events.send(AppEvent::Reload);
            }
            KeyCode::Char('/') | KeyCode::Char('i') => {
                self.mode = AppMode::Search;
            }
            KeyCode::Char(':') => {
                self.mode = AppMode::Command;
                self.command_input.clear();
            }
            KeyCode::Char('?') => {
                self.events.send(AppEvent::ToggleHelp);
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down => {
                self.mode = AppMode::Normal;
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search_input.clear();
                self.query_changed();
            }
            KeyCode::Backspace => {
                if self.search_input.pop().is_some() {
                    self.query_changed();
                }
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.query_changed();
            }
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = AppMode::Normal;
                self.command_input.clear();
            }
            KeyCode::Enter => {
                self.execute_command();
                self.mode = AppMode::Normal;
            }
            KeyCode::Backspace => {
                self.command_input.pop();
            }
            KeyCode::Char(c) => {
                self.command_input.push(c);
            }
            _ => {}
        }
    }

    // -- Command execution --------------------------------------------------

    fn execute_command(&mut self) {
        let input = self.command_input.clone();
        match command::parse_command(&input) {
            Some(Command::Search(term)) => {
                self.search_input = term;
                self.events.send(AppEvent::Reload);
            }
            Some(Command::Browse) => {
                self.search_input.clear();
                self.events.send(AppEvent::Reload);
            }
            Some(Command::More) => {
                self.events.send(AppEvent::LoadMore);
            }
            Some(Command::Follow) => {
                self.toggle_selected();
            }
            Some(Command::Reload) => {
                self.events.send(AppEvent::Reload);
            }
            Some(Command::Help) => {
                self.events.send(AppEvent::ToggleHelp);
            }
            Some(Command::Quit) => {
                self.events.send(AppEvent::Quit);
            }
            None => {
                self.status_message = Some(format!("Unknown command: {input}"));
            }
        }
        self.command_input.clear();
    }

    // -- Selection helpers --------------------------------------------------

    fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.directory.listing().len() {
            self.selected_index += 1;
        }
    }

    fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn selected_user(&self) -> Option<&UserSummary> {
        self.directory.listing().items.get(self.selected_index)
    }

    fn toggle_selected(&mut self) {
        if let Some(user) = self.selected_user() {
            let user_id = user.id.clone();
            self.events.send(AppEvent::ToggleFollow { user_id });
        }
    }

    fn query_changed(&mut self) {
        self.debouncer.schedule(self.search_input.clone());
    }

    fn has_message(&self) -> bool {
        self.status_message.is_some() || self.directory.error().is_some()
    }

    fn dismiss_messages(&mut self) {
        self.status_message = None;
        self.directory.clear_error();
    }

    // -- App event handling -------------------------------------------------

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => {
                self.running = false;
            }
            AppEvent::ToggleHelp => {
                self.show_help = !self.show_help;
            }

            // Intents
            AppEvent::QuerySettled { seq, query } => {
                if !self.debouncer.accept(seq) {
                    tracing::debug!(seq, "ignoring superseded query");
                    return;
                }
                if let Some(request) = self.directory.query_settled(&query) {
                    self.dispatch_fetch(request);
                }
            }
            AppEvent::Reload => {
                // Explicit reloads bypass the debounce.
                self.debouncer.cancel();
                let context = QueryContext::from_query(&self.search_input);
                if let Some(request) = self.directory.begin_refresh(context) {
                    self.dispatch_fetch(request);
                }
            }
            AppEvent::LoadMore => {
                if let Some(request) = self.directory.begin_load_more() {
                    self.dispatch_fetch(request);
                }
            }
            AppEvent::ToggleFollow { user_id } => {
                if let Some(request) = self.directory.begin_toggle(&user_id) {
                    self.dispatch_toggle(request);
                }
            }

            // Outcomes
            AppEvent::PageLoaded { request, result } => {
                let Some(new_ids) = self.directory.apply_page(&request, result) else {
                    return;
                };
                if request.mode == FetchMode::Replace {
                    self.selected_index = 0;
                }
                if !new_ids.is_empty() {
                    self.dispatch_resolve(new_ids);
                }
            }
            AppEvent::FlagsResolved(flags) => {
                self.directory.merge_flags(flags);
            }
            AppEvent::ToggleCompleted { request, result } => {
                self.directory.apply_toggle(&request, result);
            }
            AppEvent::ProfileLoaded(result) => self.apply_profile(result),
        }
    }

    fn apply_profile(&mut self, result: ApiResult<Profile>) {
        match result {
            Ok(profile) => {
                if let Err(e) = self.profile_cache.save(&profile) {
                    tracing::warn!("failed to cache profile: {e}");
                }
                tracing::info!(name = %profile.name, "profile refreshed");
                self.profile = Some(profile);
            }
            Err(e) => {
                tracing::warn!("profile refresh failed, keeping cached profile: {e}");
            }
        }
    }

    // -- API dispatch -------------------------------------------------------

    fn dispatch_fetch(&self, request: FetchRequest) {
        let Some(ref client) = self.api_client else {
            return;
        };
        let client = Arc::clone(client);
        let sender = self.events.sender();

        tokio::spawn(async move {
            let result: ApiResult<_> = request
                .execute(&*client)
                .await
                .map_err(|e| Arc::new(e.to_string()));
            let _ = sender.send(app_event(AppEvent::PageLoaded { request, result }));
        });
    }

    fn dispatch_resolve(&self, user_ids: Vec<String>) {
        let Some(ref client) = self.api_client else {
            return;
        };
        let client = Arc::clone(client);
        let sender = self.events.sender();

        tokio::spawn(async move {
            let flags = resolve_follow_status(&*client, &user_ids).await;
            let _ = sender.send(app_event(AppEvent::FlagsResolved(flags)));
        });
    }

    fn dispatch_toggle(&self, request: ToggleRequest) {
        let Some(ref client) = self.api_client else {
            return;
        };
        let client = Arc::clone(client);
        let sender = self.events.sender();

        tokio::spawn(async move {
            let result: ApiResult<_> = request
                .execute(&*client)
                .await
                .map_err(|e| Arc::new(e.to_string()));
            let _ = sender.send(app_event(AppEvent::ToggleCompleted { request, result }));
        });
    }

    fn refresh_profile(&self) {
        let Some(ref client) = self.api_client else {
            return;
        };
        if client.session().is_none() {
            return;
        }
        let client = Arc::clone(client);
        let sender = self.events.sender();

        tokio::spawn(async move {
            let result: ApiResult<_> = client
                .get_profile()
                .await
                .map_err(|e| Arc::new(e.to_string()));
            let _ = sender.send(app_event(AppEvent::ProfileLoaded(result)));
        });
    }
}
