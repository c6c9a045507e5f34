use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use fsnav::app::App;
use fsnav::async_task::{self, Task, TaskResult};
use fsnav::cli::{Cli, Commands, ConnectionArgs};
use fsnav::config::Config;
use fsnav::controller::NavigationController;
use fsnav::error::{FsNavError, Result};
use fsnav::service::{FixtureListingService, HttpListingService, ListingService};
use fsnav::{event, main_lib, screenshot, ui};

const LOG_ENV: &str = "FSNAV_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger only if FSNAV_LOG environment variable is set
    if let Ok(log_file) = std::env::var(LOG_ENV) {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .map_err(|e| FsNavError::from(format!("Failed to open log file {}: {}", log_file, e)))?;
        env_logger::Builder::new()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .filter_level(log::LevelFilter::Debug)
            .init();

        log::info!("fsnav starting up");
    }

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&cli.connection).await,
        Commands::Snapshot {
            path,
            output,
            verbose,
        } => run_snapshot(&cli.connection, path.as_deref(), output.as_deref(), verbose).await,
        Commands::Screenshot {
            state,
            output,
            width,
            height,
        } => {
            screenshot::generate_screenshot(&state, output.as_deref(), width, height)
                .map_err(|e| FsNavError::from(e.to_string()))?;
            Ok(())
        }
    }
}

async fn run(connection: &ConnectionArgs) -> Result<()> {
    let config = main_lib::load_config(connection)?;

    match connection.fixture.as_deref() {
        Some(fixture) => {
            let service = FixtureListingService::from_file(fixture)?;
            log::info!("🗂️ main: serving {} root nodes from {}", service.roots().len(), fixture);
            run_interactive(config, service, true).await
        }
        None => {
            let service = HttpListingService::new(&config.server.base_url, config.server.timeout())?;
            log::info!("🌐 main: using {}", service.base_url());
            run_interactive(config, service, false).await
        }
    }
}

async fn run_snapshot(
    connection: &ConnectionArgs,
    path: Option<&str>,
    output: Option<&str>,
    verbose: bool,
) -> Result<()> {
    if verbose && std::env::var(LOG_ENV).is_err() {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    let config = main_lib::load_config(connection)?;
    let state = match connection.fixture.as_deref() {
        Some(fixture) => {
            let session = main_lib::session_for(&config, true)?;
            let service = FixtureListingService::from_file(fixture)?;
            let mut controller =
                NavigationController::new(service, session, config.controller_options());
            main_lib::take_snapshot(&mut controller, path).await?
        }
        None => {
            let session = main_lib::session_for(&config, false)?;
            let service = HttpListingService::new(&config.server.base_url, config.server.timeout())?;
            let mut controller =
                NavigationController::new(service, session, config.controller_options());
            main_lib::take_snapshot(&mut controller, path).await?
        }
    };

    main_lib::write_snapshot(&state, output)
}

async fn run_interactive<S: ListingService + 'static>(
    config: Config,
    service: S,
    using_fixture: bool,
) -> Result<()> {
    // Refuse to start without credentials before touching the terminal
    let session = main_lib::session_for(&config, using_fixture)?;
    let controller = NavigationController::new(service, session, config.controller_options());

    let page_size = config.paging.page_size;
    let mut app = App::new(config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup async task channels
    let (task_sender, task_receiver) = mpsc::channel::<Task>(32);
    let (result_sender, mut result_receiver) = mpsc::channel::<TaskResult>(32);

    // Start background worker
    let shutdown = CancellationToken::new();
    let worker_handle = tokio::spawn(async_task::run_worker(
        controller,
        task_receiver,
        result_sender,
        shutdown.clone(),
    ));

    // Load initial data
    log::info!("📤 main: Sending LoadRootPage task");
    app.request(Task::LoadRootPage { page: 0, page_size }, &task_sender);

    // Main application loop
    let tick_rate = Duration::from_millis(250);
    let loop_result: Result<()> = async {
        loop {
            if app.ui.force_redraw {
                terminal.clear()?;
                app.ui.force_redraw = false;
            }

            terminal.draw(|f| ui::draw(f, &app))?;

            if crossterm::event::poll(tick_rate)? {
                let event = crossterm::event::read()?;
                if let Err(e) = event::handle_event(event, &mut app, &task_sender) {
                    app.ui.status_message = format!("Error handling event: {}", e);
                }
            }

            while let Ok(result) = result_receiver.try_recv() {
                log::debug!("📨 main: Received task result: {:?}", std::mem::discriminant(&result));
                main_lib::handle_task_result(&mut app, result);
            }

            if app.should_quit {
                return Ok(());
            }
        }
    }
    .await;

    // Cleanup
    shutdown.cancel();
    if tokio::time::timeout(Duration::from_secs(1), worker_handle).await.is_err() {
        log::warn!("🛑 main: worker did not stop in time");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    loop_result
}
