use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::fs;
use std::path::Path;

use crate::{app::App, config::Config, error::Result, summary, ui};

/// Render the dashboard for a summary file once and write it out as text
pub fn generate_screenshot(
    summary_path: &Path,
    repo: &str,
    output_path: Option<&str>,
    width: u16,
    height: u16,
) -> Result<()> {
    let summary = summary::load_summary(summary_path)?;
    let mut app = App::from_summary(repo, summary, Config::load());

    let screenshot = render_to_string(&mut app, width, height)?;

    match output_path {
        Some(path) => {
            fs::write(path, screenshot)?;
            println!("Screenshot saved to: {}", path);
        }
        None => {
            print!("{}", screenshot);
        }
    }

    Ok(())
}

/// Draw a single frame of the app into an in-memory terminal
pub fn render_to_string(app: &mut App, width: u16, height: u16) -> Result<String> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend)?;

    terminal.draw(|frame| {
        ui::draw(frame, app);
    })?;

    Ok(buffer_to_string(terminal.backend().buffer()))
}

pub fn buffer_to_string(buffer: &Buffer) -> String {
    let mut result = String::new();

    for y in 0..buffer.area().height {
        for x in 0..buffer.area().width {
            let cell = &buffer[(x, y)];
            let sym = cell.symbol();

            // Use a space for empty cells to make output more readable
            if sym.is_empty() {
                result.push(' ');
            } else {
                result.push_str(sym);
            }
        }
        result.push('\n');
    }

    result
}
