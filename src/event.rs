use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::app::App;
use crate::async_task::Task;

pub type EventResult = Result<bool, Box<dyn std::error::Error>>;

/// Handle one terminal event. Returns whether the UI needs a redraw.
pub fn handle_event(event: Event, app: &mut App, task_sender: &mpsc::Sender<Task>) -> EventResult {
    match event {
        Event::Key(key) => {
            if app.in_search_mode {
                return handle_search_key(key, app, task_sender);
            }
            handle_browse_key(key, app, task_sender)
        }
        Event::Resize(_, _) => Ok(true),
        _ => Ok(false),
    }
}

fn handle_search_key(key: KeyEvent, app: &mut App, task_sender: &mpsc::Sender<Task>) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.in_search_mode = false;
            update_search(app, String::new(), task_sender);
        }
        KeyCode::Enter => {
            app.in_search_mode = false;
        }
        KeyCode::Char(c) => {
            let mut term = app.search_input.clone();
            term.push(c);
            update_search(app, term, task_sender);
        }
        KeyCode::Backspace => {
            let mut term = app.search_input.clone();
            term.pop();
            update_search(app, term, task_sender);
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn update_search(app: &mut App, term: String, task_sender: &mpsc::Sender<Task>) {
    app.set_search_input(term.clone());
    app.request(Task::SetSearchTerm { term }, task_sender);
}

fn handle_browse_key(key: KeyEvent, app: &mut App, task_sender: &mpsc::Sender<Task>) -> EventResult {
    let keys = app.config.keybindings.clone();

    match key.code {
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.ui.force_redraw = true;
            app.ui.status_message = "Screen refreshed".to_string();
        }
        KeyCode::Esc => {
            app.should_quit = true;
            return Ok(false);
        }
        KeyCode::Char(c) if c == keys.quit => {
            app.should_quit = true;
            return Ok(false);
        }
        KeyCode::Up => return Ok(app.select_previous()),
        KeyCode::Down => return Ok(app.select_next()),
        KeyCode::Enter | KeyCode::Right => open_selected(app, task_sender),
        KeyCode::Backspace | KeyCode::Left => go_up(app, task_sender),
        KeyCode::Home => {
            app.request(Task::JumpToBreadcrumb { index: 0 }, task_sender);
        }
        KeyCode::Char(c) if c == keys.home => {
            app.request(Task::JumpToBreadcrumb { index: 0 }, task_sender);
        }
        KeyCode::Char('[') => return Ok(app.focus_previous_crumb()),
        KeyCode::Char(']') => return Ok(app.focus_next_crumb()),
        KeyCode::Char(c) if c == keys.open_crumb => {
            let index = app.crumb_focus;
            app.request(Task::JumpToBreadcrumb { index }, task_sender);
        }
        KeyCode::PageDown => change_page(app, true, task_sender),
        KeyCode::PageUp => change_page(app, false, task_sender),
        KeyCode::Char(c) if c == keys.next_page => change_page(app, true, task_sender),
        KeyCode::Char(c) if c == keys.previous_page => change_page(app, false, task_sender),
        KeyCode::Char(c) if c == keys.larger_page => change_page_size(app, true, task_sender),
        KeyCode::Char(c) if c == keys.smaller_page => change_page_size(app, false, task_sender),
        KeyCode::Char(c) if c == keys.reload => {
            app.request(Task::Reload, task_sender);
        }
        KeyCode::Char(c) if c == keys.search => {
            app.in_search_mode = true;
        }
        _ => return Ok(false),
    }

    Ok(true)
}

fn open_selected(app: &mut App, task_sender: &mpsc::Sender<Task>) {
    let Some(node) = app.selected_node().cloned() else {
        app.ui.status_message = "Nothing selected".to_string();
        return;
    };

    if !node.is_navigable() {
        app.ui.status_message = if node.is_dir() {
            format!("{} is empty", node.name)
        } else {
            format!("{} is a file", node.name)
        };
        return;
    }

    app.request(Task::DescendInto { node }, task_sender);
}

fn go_up(app: &mut App, task_sender: &mpsc::Sender<Task>) {
    let depth = app.nav.depth();
    if depth == 0 {
        app.ui.status_message = "Already at the top".to_string();
        return;
    }
    app.request(Task::JumpToBreadcrumb { index: depth - 1 }, task_sender);
}

fn change_page(app: &mut App, forward: bool, task_sender: &mpsc::Sender<Task>) {
    if !app.nav.is_root_view() {
        app.ui.status_message = "Pagination applies to the root listing".to_string();
        return;
    }
    let target = if forward { app.next_page() } else { app.previous_page() };
    match target {
        Some(page) => {
            app.request(Task::SetPage { page }, task_sender);
        }
        None => {
            app.ui.status_message = if forward {
                "Already on the last page".to_string()
            } else {
                "Already on the first page".to_string()
            };
        }
    }
}

fn change_page_size(app: &mut App, larger: bool, task_sender: &mpsc::Sender<Task>) {
    match app.adjacent_page_size(larger) {
        Some(page_size) => {
            app.request(Task::SetPageSize { page_size }, task_sender);
        }
        None => {
            app.ui.status_message = format!("No other page size than {}", app.nav.page_size());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::{Node, Page};
    use crate::navigation::NavigationState;
    use crossterm::event::KeyEventKind;

    fn create_key_event(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::empty(),
        })
    }

    fn create_test_app() -> App {
        let mut nav = NavigationState::new("home", 5);
        nav.apply_root_page(
            0,
            5,
            Page {
                content: vec![
                    Node::new_dir(1, "A", vec![Node::new_file(10, "X"), Node::new_file(11, "Y")]),
                    Node::new_file(2, "B"),
                    Node::new_dir(3, "Empty", vec![]),
                ],
                total_elements: 8,
                total_pages: 2,
            },
        );
        App::from_state(Config::default(), nav)
    }

    async fn create_test_channel() -> (mpsc::Sender<Task>, mpsc::Receiver<Task>) {
        mpsc::channel(16)
    }

    mod browsing {
        use super::*;

        #[tokio::test]
        async fn test_enter_on_directory_requests_descend() {
            let mut app = create_test_app();
            let (task_sender, mut task_receiver) = create_test_channel().await;

            let result = handle_event(create_key_event(KeyCode::Enter), &mut app, &task_sender);
            assert!(result.is_ok());

            match task_receiver.try_recv() {
                Ok(Task::DescendInto { node }) => assert_eq!(node.name, "A"),
                other => panic!("Expected DescendInto, got {:?}", other),
            }
            assert!(app.ui.is_loading);
        }

        #[tokio::test]
        async fn test_enter_on_file_or_empty_dir_sends_nothing() {
            let mut app = create_test_app();
            let (task_sender, mut task_receiver) = create_test_channel().await;

            handle_event(create_key_event(KeyCode::Down), &mut app, &task_sender).unwrap();
            handle_event(create_key_event(KeyCode::Enter), &mut app, &task_sender).unwrap();
            assert!(app.ui.status_message.contains("is a file"));

            handle_event(create_key_event(KeyCode::Down), &mut app, &task_sender).unwrap();
            handle_event(create_key_event(KeyCode::Enter), &mut app, &task_sender).unwrap();
            assert!(app.ui.status_message.contains("is empty"));

            assert!(task_receiver.try_recv().is_err());
            assert!(!app.ui.is_loading);
        }

        #[tokio::test]
        async fn test_backspace_at_root_does_nothing() {
            let mut app = create_test_app();
            let (task_sender, mut task_receiver) = create_test_channel().await;

            handle_event(create_key_event(KeyCode::Backspace), &mut app, &task_sender).unwrap();
            assert!(task_receiver.try_recv().is_err());
            assert_eq!(app.ui.status_message, "Already at the top");
        }

        #[tokio::test]
        async fn test_backspace_in_subtree_jumps_to_parent() {
            let mut app = create_test_app();
            app.nav.enter_subtree("A", vec![Node::new_file(10, "X")]);
            app.nav.enter_subtree("X", vec![Node::new_file(12, "Z")]);
            let (task_sender, mut task_receiver) = create_test_channel().await;

            handle_event(create_key_event(KeyCode::Backspace), &mut app, &task_sender).unwrap();
            assert!(matches!(
                task_receiver.try_recv(),
                Ok(Task::JumpToBreadcrumb { index: 1 })
            ));
        }

        #[tokio::test]
        async fn test_home_key_jumps_to_root() {
            let mut app = create_test_app();
            let (task_sender, mut task_receiver) = create_test_channel().await;

            handle_event(create_key_event(KeyCode::Char('h')), &mut app, &task_sender).unwrap();
            assert!(matches!(
                task_receiver.try_recv(),
                Ok(Task::JumpToBreadcrumb { index: 0 })
            ));
        }

        #[tokio::test]
        async fn test_quit_keys() {
            let mut app = create_test_app();
            let (task_sender, _task_receiver) = create_test_channel().await;

            let result = handle_event(create_key_event(KeyCode::Char('q')), &mut app, &task_sender);
            assert!(!result.unwrap());
            assert!(app.should_quit);
        }
    }

    mod paging {
        use super::*;

        #[tokio::test]
        async fn test_next_and_previous_page() {
            let mut app = create_test_app();
            let (task_sender, mut task_receiver) = create_test_channel().await;

            handle_event(create_key_event(KeyCode::Char('p')), &mut app, &task_sender).unwrap();
            assert_eq!(app.ui.status_message, "Already on the first page");

            handle_event(create_key_event(KeyCode::PageDown), &mut app, &task_sender).unwrap();
            assert!(matches!(task_receiver.try_recv(), Ok(Task::SetPage { page: 1 })));
        }

        #[tokio::test]
        async fn test_page_size_cycles_through_options() {
            let mut app = create_test_app();
            let (task_sender, mut task_receiver) = create_test_channel().await;

            handle_event(create_key_event(KeyCode::Char('+')), &mut app, &task_sender).unwrap();
            assert!(matches!(
                task_receiver.try_recv(),
                Ok(Task::SetPageSize { page_size: 10 })
            ));
        }

        #[tokio::test]
        async fn test_paging_disabled_in_subtree() {
            let mut app = create_test_app();
            app.nav.enter_subtree("A", vec![Node::new_file(10, "X")]);
            let (task_sender, mut task_receiver) = create_test_channel().await;

            handle_event(create_key_event(KeyCode::Char('n')), &mut app, &task_sender).unwrap();
            assert!(task_receiver.try_recv().is_err());
        }
    }

    mod search {
        use super::*;

        #[tokio::test]
        async fn test_typing_filters_locally_and_forwards() {
            let mut app = create_test_app();
            let (task_sender, mut task_receiver) = create_test_channel().await;

            handle_event(create_key_event(KeyCode::Char('/')), &mut app, &task_sender).unwrap();
            assert!(app.in_search_mode);

            handle_event(create_key_event(KeyCode::Char('b')), &mut app, &task_sender).unwrap();
            assert_eq!(app.displayed_rows().len(), 1);
            assert_eq!(app.selected_node().unwrap().name, "B");
            assert!(matches!(
                task_receiver.try_recv(),
                Ok(Task::SetSearchTerm { ref term }) if term == "b"
            ));

            // 'q' is text while searching
            handle_event(create_key_event(KeyCode::Char('q')), &mut app, &task_sender).unwrap();
            assert!(!app.should_quit);
            assert_eq!(app.search_input, "bq");

            handle_event(create_key_event(KeyCode::Esc), &mut app, &task_sender).unwrap();
            assert!(!app.in_search_mode);
            assert_eq!(app.search_input, "");
            assert_eq!(app.displayed_rows().len(), 3);
        }

        #[tokio::test]
        async fn test_enter_keeps_search_term() {
            let mut app = create_test_app();
            let (task_sender, _task_receiver) = create_test_channel().await;

            handle_event(create_key_event(KeyCode::Char('/')), &mut app, &task_sender).unwrap();
            handle_event(create_key_event(KeyCode::Char('a')), &mut app, &task_sender).unwrap();
            handle_event(create_key_event(KeyCode::Enter), &mut app, &task_sender).unwrap();

            assert!(!app.in_search_mode);
            assert_eq!(app.nav.search_term(), "a");
        }
    }

    #[tokio::test]
    async fn test_resize_event() {
        let mut app = create_test_app();
        let (task_sender, _task_receiver) = create_test_channel().await;

        let result = handle_event(Event::Resize(80, 24), &mut app, &task_sender);
        assert!(result.is_ok());
    }
}
