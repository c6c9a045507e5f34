// Library module containing testable functions from main.rs

use crate::app::App;
use crate::async_task::TaskResult;
use crate::cli::ConnectionArgs;
use crate::config::Config;
use crate::controller::NavigationController;
use crate::error::{FsNavError, NavError, Result};
use crate::navigation::NavigationState;
use crate::service::ListingService;
use crate::session::Session;
use std::fs;
use std::path::Path;

/// Token used against a local fixture when none was given.
pub const FIXTURE_TOKEN: &str = "fixture";

pub fn handle_task_result(app: &mut App, result: TaskResult) {
    app.ui.is_loading = false;
    app.ui.pending_action = None;

    match result {
        TaskResult::Navigated { state, summary } => {
            app.apply_state(state);
            app.ui.last_error = None;
            app.ui.last_refresh = Some(chrono::Local::now().format("%H:%M:%S").to_string());
            app.ui.status_message = format!("Done: {}", summary);
        }
        TaskResult::Ignored { summary } => {
            app.ui.status_message = format!("Nothing to do: {}", summary);
        }
        TaskResult::Failed { action, error } => {
            // The controller kept its state, so the mirror stays as is.
            log::warn!("📨 main: {} failed: {}", action, error);
            app.ui.last_error = Some(error.to_string());
            app.ui.status_message = format!("Failed to {}: {}", action, error);
        }
    }
}

pub fn load_config(connection: &ConnectionArgs) -> Result<Config> {
    let mut config = Config::load(connection.config.as_deref().map(Path::new))?;
    config.apply_overrides(
        connection.base_url.clone(),
        connection.token.clone(),
        connection.page_size,
    );
    config.validate()?;
    Ok(config)
}

/// The session for a run. Talking to the REST API requires a token; a
/// local fixture gets a placeholder one.
pub fn session_for(config: &Config, using_fixture: bool) -> Result<Session> {
    let session = Session::new(config.server.token.clone());
    if session.is_authenticated() {
        return Ok(session);
    }
    if using_fixture {
        return Ok(Session::new(Some(FIXTURE_TOKEN.to_string())));
    }
    Err(NavError::Auth(format!(
        "no token given; pass --token or set {}",
        crate::config::ENV_TOKEN
    ))
    .into())
}

/// Load the first root page and descend `path` (`/`-separated), returning
/// the resulting state.
pub async fn take_snapshot<S: ListingService>(
    controller: &mut NavigationController<S>,
    path: Option<&str>,
) -> Result<NavigationState> {
    let page_size = controller.state().page_size();
    controller.load_root_page(0, page_size).await?;

    if let Some(path) = path {
        let names: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        controller.descend_path(&names).await?;
    }

    Ok(controller.state().clone())
}

pub fn write_snapshot(state: &NavigationState, output_path: Option<&str>) -> Result<()> {
    let state_json = serde_json::to_string_pretty(state)?;

    match output_path {
        Some(path) => {
            fs::write(path, &state_json)?;
            println!("State saved to: {}", path);
        }
        None => {
            println!("{}", state_json);
        }
    }

    Ok(())
}

pub fn read_snapshot(path: &str) -> Result<NavigationState> {
    let content = fs::read_to_string(path)
        .map_err(|e| FsNavError::from(format!("Failed to read state file {}: {}", path, e)))?;
    Ok(serde_json::from_str(&content)?)
}
