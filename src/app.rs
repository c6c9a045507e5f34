use crate::async_task::Task;
use crate::config::Config;
use crate::model::Node;
use crate::navigation::NavigationState;
use ratatui::widgets::ListState;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct UiState {
    pub status_message: String,
    /// A fetching action is outstanding.
    pub is_loading: bool,
    pub pending_action: Option<String>,
    pub last_error: Option<String>,
    pub last_refresh: Option<String>,
    pub force_redraw: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status_message: "Ready".to_string(),
            is_loading: false,
            pending_action: None,
            last_error: None,
            last_refresh: None,
            force_redraw: false,
        }
    }
}

pub struct App {
    pub config: Config,
    pub should_quit: bool,

    // Mirror of the controller state, replaced on every successful action
    pub nav: NavigationState,

    // Row table
    pub list_state: ListState,
    pub cursor: usize,

    // Breadcrumb bar
    pub crumb_focus: usize,

    // Search box
    pub search_input: String,
    pub in_search_mode: bool,

    pub ui: UiState,
}

impl App {
    pub fn new(config: Config) -> Self {
        let nav = NavigationState::new(&config.navigation.home_label, config.paging.page_size);
        Self::from_state(config, nav)
    }

    /// Build an app around an existing navigation state, e.g. one saved
    /// by `fsnav snapshot`.
    pub fn from_state(config: Config, nav: NavigationState) -> Self {
        let mut list_state = ListState::default();
        list_state.select(if nav.displayed_rows().is_empty() { None } else { Some(0) });
        Self {
            config,
            should_quit: false,
            crumb_focus: nav.depth(),
            search_input: nav.search_term().to_string(),
            nav,
            list_state,
            cursor: 0,
            in_search_mode: false,
            ui: UiState::default(),
        }
    }

    pub fn displayed_rows(&self) -> Vec<&Node> {
        self.nav.displayed_rows()
    }

    /// The row under the cursor, for edit/delete flows to act on.
    pub fn selected_node(&self) -> Option<&Node> {
        self.nav.displayed_rows().get(self.cursor).copied()
    }

    pub fn select_next(&mut self) -> bool {
        let len = self.displayed_rows().len();
        if len == 0 || self.cursor + 1 >= len {
            return false;
        }
        self.cursor += 1;
        self.list_state.select(Some(self.cursor));
        true
    }

    pub fn select_previous(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.list_state.select(Some(self.cursor));
        true
    }

    fn reset_cursor(&mut self) {
        self.cursor = 0;
        let has_rows = !self.displayed_rows().is_empty();
        self.list_state.select(if has_rows { Some(0) } else { None });
    }

    /// Replace the mirrored state with the controller's. The search box is
    /// edited locally, so its text survives results of older actions.
    pub fn apply_state(&mut self, mut state: NavigationState) {
        state.set_search_term(self.search_input.clone());
        self.crumb_focus = state.depth();
        self.nav = state;
        self.reset_cursor();
    }

    pub fn set_search_input(&mut self, term: String) {
        self.nav.set_search_term(term.clone());
        self.search_input = term;
        self.reset_cursor();
    }

    pub fn focus_previous_crumb(&mut self) -> bool {
        if self.crumb_focus == 0 {
            return false;
        }
        self.crumb_focus -= 1;
        true
    }

    pub fn focus_next_crumb(&mut self) -> bool {
        if self.crumb_focus >= self.nav.depth() {
            return false;
        }
        self.crumb_focus += 1;
        true
    }

    pub fn next_page(&self) -> Option<usize> {
        let next = self.nav.page() + 1;
        ((next as u64) < self.nav.total_pages()).then_some(next)
    }

    pub fn previous_page(&self) -> Option<usize> {
        self.nav.page().checked_sub(1)
    }

    /// The neighbouring entry of the configured page size options.
    pub fn adjacent_page_size(&self, larger: bool) -> Option<usize> {
        let options = &self.config.paging.page_size_options;
        let current = self.nav.page_size();
        if larger {
            options.iter().copied().filter(|size| *size > current).min()
        } else {
            options.iter().copied().filter(|size| *size < current).max()
        }
    }

    /// Hand an action to the worker.
    ///
    /// Only one fetching action may be outstanding; a second one is
    /// rejected until the first has answered.
    pub fn request(&mut self, task: Task, sender: &mpsc::Sender<Task>) -> bool {
        let fetches = task.fetches();
        if fetches && self.ui.is_loading {
            let pending = self.ui.pending_action.clone().unwrap_or_default();
            self.ui.status_message = format!("Busy: still waiting for {}", pending);
            return false;
        }

        let description = task.describe();
        if let Err(e) = sender.try_send(task) {
            log::error!("📤 app: failed to queue '{}': {}", description, e);
            self.ui.status_message = format!("Failed to start {}: {}", description, e);
            return false;
        }

        if fetches {
            self.ui.is_loading = true;
            self.ui.status_message = format!("Loading: {}...", description);
            self.ui.pending_action = Some(description);
        }
        true
    }
}
