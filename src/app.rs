use std::path::PathBuf;
use tui_tree_widget::TreeState;

use crate::config::Config;
use crate::dashboard::{DashboardRow, RepoDashboard};
use crate::summary::CodeIntelSummary;

/// Where the summary for the current view stands
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Failed(String),
    Loaded(Box<RepoDashboard>),
}

pub struct App {
    pub repo: String,
    pub source: PathBuf,
    pub config: Config,
    pub should_quit: bool,

    pub load_state: LoadState,
    pub tree_state: TreeState<usize>,

    pub status_message: String,
}

impl App {
    pub fn new(repo: impl Into<String>, source: PathBuf, config: Config) -> Self {
        Self {
            repo: repo.into(),
            source,
            config,
            should_quit: false,
            load_state: LoadState::Loading,
            tree_state: TreeState::default(),
            status_message: "Loading code intelligence summary...".to_string(),
        }
    }

    /// Build an app that already holds a loaded summary
    pub fn from_summary(repo: impl Into<String>, summary: CodeIntelSummary, config: Config) -> Self {
        let mut app = Self::new(repo, PathBuf::from("-"), config);
        app.apply_summary(summary);
        app
    }

    pub fn dashboard(&self) -> Option<&RepoDashboard> {
        match &self.load_state {
            LoadState::Loaded(dashboard) => Some(dashboard.as_ref()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_state, LoadState::Loading)
    }

    pub fn begin_reload(&mut self) {
        self.load_state = LoadState::Loading;
        self.status_message = "Reloading code intelligence summary...".to_string();
    }

    /// Replace the current view with a freshly built dashboard.
    ///
    /// Every node starts expanded and the first row is selected.
    pub fn apply_summary(&mut self, summary: CodeIntelSummary) {
        let dashboard = RepoDashboard::new(self.repo.clone(), summary);

        self.tree_state = TreeState::default();
        let rows = dashboard.rows();
        for node in dashboard.tree.iter().filter(|node| !node.is_root() && node.has_children()) {
            self.tree_state.open(dashboard.tree.ancestry(node.id));
        }
        if let Some(first) = rows.first() {
            self.tree_state.select(dashboard.tree.ancestry(first.id));
        }

        self.status_message = format!(
            "Loaded {} roots ({} tree nodes)",
            dashboard.data_roots().len(),
            rows.len()
        );
        self.load_state = LoadState::Loaded(Box::new(dashboard));
    }

    pub fn fail(&mut self, message: String) {
        log::error!("❌ App::fail: {}", message);
        self.status_message = "Load failed".to_string();
        self.load_state = LoadState::Failed(message);
    }

    /// The row under the cursor, if any
    pub fn selected_row(&self) -> Option<DashboardRow> {
        let dashboard = self.dashboard()?;
        let id = *self.tree_state.selected().last()?;
        dashboard.rows().into_iter().find(|row| row.id == id)
    }

    pub fn navigate_up(&mut self) -> bool {
        self.tree_state.key_up()
    }

    pub fn navigate_down(&mut self) -> bool {
        self.tree_state.key_down()
    }

    pub fn navigate_to_first(&mut self) -> bool {
        self.tree_state.select_first()
    }

    pub fn navigate_to_last(&mut self) -> bool {
        self.tree_state.select_last()
    }

    pub fn expand_selected(&mut self) -> bool {
        self.tree_state.key_right()
    }

    pub fn collapse_selected(&mut self) -> bool {
        self.tree_state.key_left()
    }

    pub fn toggle_selected(&mut self) -> bool {
        self.tree_state.toggle_selected()
    }
}
