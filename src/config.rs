use ratatui::style::Color;
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming an optional JSON configuration file
pub const CONFIG_ENV_VAR: &str = "CODEINTEL_DASHBOARD_CONFIG";

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub colors: ColorConfig,
    pub layout: LayoutConfig,
    pub keybindings: KeybindingConfig,
}

#[derive(Debug, Clone)]
pub struct ColorConfig {
    pub border: Color,
    pub title: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub directory: Color,
    pub badge_success: Color,
    pub badge_in_progress: Color,
    pub badge_queued: Color,
    pub badge_errored: Color,
    pub badge_inactive: Color,
    pub suggestion: Color,
    pub muted: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
}

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub header_height: u16,
    pub show_status_bar: bool,
    pub tick_rate_ms: u64,
}

#[derive(Debug, Clone)]
pub struct KeybindingConfig {
    pub quit: char,
    pub reload: char,
    pub goto_top: char,
    pub goto_bottom: char,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            border: Color::DarkGray,
            title: Color::Yellow,
            selected_bg: Color::White,
            selected_fg: Color::Black,
            directory: Color::Blue,
            badge_success: Color::Green,
            badge_in_progress: Color::Cyan,
            badge_queued: Color::Yellow,
            badge_errored: Color::Red,
            badge_inactive: Color::Gray,
            suggestion: Color::Magenta,
            muted: Color::Gray,
            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_height: 5,
            show_status_bar: true,
            tick_rate_ms: 250,
        }
    }
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: 'q',
            reload: 'r',
            goto_top: 'g',
            goto_bottom: 'G',
        }
    }
}

/// Partial configuration read from disk; absent fields keep their defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
struct ConfigFile {
    layout: LayoutOverrides,
    keybindings: KeybindingOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LayoutOverrides {
    header_height: Option<u16>,
    show_status_bar: Option<bool>,
    tick_rate_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KeybindingOverrides {
    quit: Option<char>,
    reload: Option<char>,
    goto_top: Option<char>,
    goto_bottom: Option<char>,
}

impl Config {
    /// Load configuration from the file named by `CODEINTEL_DASHBOARD_CONFIG`,
    /// falling back to defaults when unset or unreadable
    pub fn load() -> Self {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => match Self::from_file(Path::new(&path)) {
                Ok(config) => {
                    log::info!("⚙️ Config::load: loaded overrides from {}", path);
                    config
                }
                Err(e) => {
                    log::warn!("⚙️ Config::load: ignoring {}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> crate::error::Result<Self> {
        let file: ConfigFile = serde_json::from_str(content)?;
        let mut config = Self::default();

        let layout = &mut config.layout;
        if let Some(height) = file.layout.header_height {
            layout.header_height = height;
        }
        if let Some(show) = file.layout.show_status_bar {
            layout.show_status_bar = show;
        }
        if let Some(tick) = file.layout.tick_rate_ms {
            layout.tick_rate_ms = tick.max(10);
        }

        let keys = &mut config.keybindings;
        if let Some(key) = file.keybindings.quit {
            keys.quit = key;
        }
        if let Some(key) = file.keybindings.reload {
            keys.reload = key;
        }
        if let Some(key) = file.keybindings.goto_top {
            keys.goto_top = key;
        }
        if let Some(key) = file.keybindings.goto_bottom {
            keys.goto_bottom = key;
        }

        Ok(config)
    }
}
