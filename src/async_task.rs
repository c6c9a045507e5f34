use crate::controller::NavigationController;
use crate::error::NavError;
use crate::model::Node;
use crate::navigation::NavigationState;
use crate::service::ListingService;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Navigation actions the view asks the worker to perform.
#[derive(Debug, Clone)]
pub enum Task {
    LoadRootPage { page: usize, page_size: usize },
    Reload,
    DescendInto { node: Node },
    JumpToBreadcrumb { index: usize },
    SetPage { page: usize },
    SetPageSize { page_size: usize },
    SetSearchTerm { term: String },
}

impl Task {
    /// Whether the action goes to the backend.
    pub fn fetches(&self) -> bool {
        !matches!(self, Task::SetSearchTerm { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            Task::LoadRootPage { page, .. } => format!("load page {}", page + 1),
            Task::Reload => "reload".to_string(),
            Task::DescendInto { node } => format!("open {}", node.name),
            Task::JumpToBreadcrumb { index } => format!("jump to crumb {}", index),
            Task::SetPage { page } => format!("go to page {}", page + 1),
            Task::SetPageSize { page_size } => format!("show {} rows per page", page_size),
            Task::SetSearchTerm { term } => format!("search '{}'", term),
        }
    }
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    /// The action succeeded; `state` is the controller's new state.
    Navigated { state: NavigationState, summary: String },
    /// The action was a no-op (file, empty directory, unknown crumb).
    Ignored { summary: String },
    /// The action failed and the controller state is unchanged.
    Failed { action: String, error: NavError },
}

/// Owns the controller and runs actions strictly one after another, so a
/// slow response can never overwrite the result of a later action.
pub async fn run_worker<S: ListingService + 'static>(
    mut controller: NavigationController<S>,
    mut task_receiver: mpsc::Receiver<Task>,
    result_sender: mpsc::Sender<TaskResult>,
    shutdown: CancellationToken,
) {
    loop {
        let task = tokio::select! {
            _ = shutdown.cancelled() => {
                log::debug!("🛑 worker: shutdown requested");
                break;
            }
            task = task_receiver.recv() => match task {
                Some(task) => task,
                None => break,
            },
        };

        log::debug!("📥 worker: {}", task.describe());
        let fetches = task.fetches();
        let result = execute(&mut controller, task).await;

        // The view already applied its own search edit; only fetch
        // outcomes go back.
        if !fetches {
            continue;
        }

        if result_sender.send(result).await.is_err() {
            // Main loop has dropped the receiver, exit worker
            break;
        }
    }
}

/// Run one action against the controller and package the outcome.
pub async fn execute<S: ListingService>(
    controller: &mut NavigationController<S>,
    task: Task,
) -> TaskResult {
    let action = task.describe();
    let outcome: Result<bool, NavError> = match task {
        Task::LoadRootPage { page, page_size } => {
            controller.load_root_page(page, page_size).await.map(|_| true)
        }
        Task::Reload => controller.reload().await.map(|_| true),
        Task::DescendInto { node } => controller.descend_into(&node).await,
        Task::JumpToBreadcrumb { index } => controller.jump_to_breadcrumb_index(index).await,
        Task::SetPage { page } => controller.set_page(page).await.map(|_| true),
        Task::SetPageSize { page_size } => controller.set_page_size(page_size).await.map(|_| true),
        Task::SetSearchTerm { term } => {
            controller.set_search_term(term);
            Ok(true)
        }
    };

    match outcome {
        Ok(true) => TaskResult::Navigated {
            state: controller.state().clone(),
            summary: action,
        },
        Ok(false) => TaskResult::Ignored { summary: action },
        Err(error) => TaskResult::Failed { action, error },
    }
}
