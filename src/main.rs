use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::PathBuf;
use std::{io, time::Duration};
use tokio::sync::mpsc;

use codeintel_dashboard::app::App;
use codeintel_dashboard::async_task::{self, Task, TaskResult};
use codeintel_dashboard::cli::{Cli, Commands};
use codeintel_dashboard::config::Config;
use codeintel_dashboard::error::{DashboardError, Result};
use codeintel_dashboard::{event, main_lib, screenshot, ui};

/// Environment variable naming a file to receive debug logs
const LOG_ENV_VAR: &str = "CODEINTEL_DASHBOARD_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Run { summary, repo } => run_interactive(summary, repo).await,
        Commands::Outline { summary, repo } => {
            main_lib::write_outline(&mut io::stdout().lock(), &summary, &repo)
        }
        Commands::Tree { paths, json } => main_lib::write_tree(&mut io::stdout().lock(), &paths, json),
        Commands::Screenshot {
            summary,
            repo,
            output,
            width,
            height,
        } => screenshot::generate_screenshot(&summary, &repo, output.as_deref(), width, height),
    }
}

// Logging is off unless a log file is named or --verbose is given
fn init_logging(verbose: bool) -> Result<()> {
    if let Ok(log_file) = std::env::var(LOG_ENV_VAR) {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        env_logger::Builder::new()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .filter_level(log::LevelFilter::Debug)
            .init();
        log::info!("codeintel-dashboard starting up");
    } else if verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }
    Ok(())
}

async fn run_interactive(source: PathBuf, repo: String) -> Result<()> {
    if source.as_os_str() == "-" {
        return Err(DashboardError::from(
            "the interactive dashboard needs a summary file; stdin is the terminal",
        ));
    }

    let config = Config::load();
    let tick_rate = Duration::from_millis(config.layout.tick_rate_ms);
    let mut app = App::new(repo, source.clone(), config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup async task channels
    let (task_sender, task_receiver) = mpsc::channel::<Task>(8);
    let (result_sender, mut result_receiver) = mpsc::channel::<TaskResult>(8);

    // Start background worker
    let worker_handle = tokio::spawn(async_task::run_worker(task_receiver, result_sender));

    log::info!("📤 main: Sending LoadSummary task");
    if let Err(e) = task_sender.send(Task::LoadSummary { source }).await {
        log::error!("📤 main: Failed to send LoadSummary task: {}", e);
        app.fail(format!("Failed to start loading: {}", e));
    }

    let result = run_loop(&mut terminal, &mut app, &task_sender, &mut result_receiver, tick_rate);

    // Cleanup
    worker_handle.abort();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    task_sender: &mpsc::Sender<Task>,
    result_receiver: &mut mpsc::Receiver<TaskResult>,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if crossterm::event::poll(tick_rate)? {
            let terminal_event = crossterm::event::read()?;
            if let Err(e) = event::handle_event(terminal_event, app, task_sender) {
                app.status_message = format!("Error handling event: {}", e);
            }
        }

        // Handle async task results
        while let Ok(result) = result_receiver.try_recv() {
            log::debug!("📨 main: Received async task result: {:?}", std::mem::discriminant(&result));
            event::handle_task_result(app, result);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
