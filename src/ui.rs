use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::model::Node;
use crate::theme::{get_theme, Theme};

const NAME_COLUMN_WIDTH: usize = 40;

pub fn draw(frame: &mut Frame, app: &App) {
    let theme = get_theme();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // breadcrumbs
            Constraint::Length(3), // search
            Constraint::Min(3),    // rows
            Constraint::Length(1), // selected node
            Constraint::Length(1), // pagination
            Constraint::Length(1), // status bar
        ])
        .split(frame.area());

    draw_breadcrumbs(frame, app, &theme, chunks[0]);
    draw_search(frame, app, &theme, chunks[1]);
    draw_rows(frame, app, &theme, chunks[2]);
    draw_selection_detail(frame, app, &theme, chunks[3]);
    draw_pagination(frame, app, &theme, chunks[4]);
    draw_status_bar(frame, app, &theme, chunks[5]);
}

fn draw_breadcrumbs(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let trail = app.nav.trail();
    let last = app.nav.depth();
    let mut spans = Vec::with_capacity(trail.len() * 2);

    for (index, crumb) in trail.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" / ", Style::default().fg(theme.crumb_separator)));
        }
        let mut style = if index == last {
            Style::default().fg(theme.crumb_current).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.crumb)
        };
        if index == app.crumb_focus {
            style = style.bg(theme.crumb_focused_bg);
        }
        spans.push(Span::styled(crumb.clone(), style));
    }

    let block = Block::default().title(" Location ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_search(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let (border_style, text) = if app.in_search_mode {
        (
            Style::default().fg(theme.active_border),
            format!("{}_", app.search_input),
        )
    } else {
        (Style::default(), app.search_input.clone())
    };

    let mut spans = vec![Span::styled(
        text,
        Style::default().fg(if app.in_search_mode {
            theme.search_active
        } else {
            theme.search_inactive
        }),
    )];
    if !app.nav.is_root_view() && !app.search_input.is_empty() {
        spans.push(Span::styled(
            "  (search applies to the root listing only)",
            Style::default().fg(theme.search_inactive),
        ));
    }

    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(border_style);
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn row_label(node: &Node) -> String {
    let marker = if node.is_dir() { "▶" } else { " " };
    format!("{} {:<width$} ", marker, node.name, width = NAME_COLUMN_WIDTH)
}

fn draw_rows(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let title = if app.nav.is_root_view() {
        " Name / Type ".to_string()
    } else {
        format!(" {} ", app.nav.trail().join(" / "))
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let rows = app.displayed_rows();
    if rows.is_empty() {
        let message = if app.ui.is_loading {
            "Loading...".to_string()
        } else if !app.search_input.is_empty() && app.nav.is_root_view() {
            format!("No entries match '{}'", app.search_input)
        } else {
            "No entries".to_string()
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(theme.empty_listing));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .map(|node| {
            let style = if node.is_dir() {
                Style::default().fg(theme.row_directory).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.row_file)
            };
            ListItem::new(Line::from(vec![
                Span::styled(row_label(node), style),
                Span::styled(node.type_label(), Style::default().fg(theme.row_type)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(theme.row_selected_bg)
                .fg(theme.row_selected_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("");

    let mut list_state = app.list_state.clone();
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_selection_detail(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let text = match app.selected_node() {
        Some(node) => {
            let id = node
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string());
            if node.is_dir() {
                format!(
                    " Selected: {} (id {}, Folder, {} entries)",
                    node.name,
                    id,
                    node.children().len()
                )
            } else {
                format!(" Selected: {} (id {}, File)", node.name, id)
            }
        }
        None => " Nothing selected".to_string(),
    };
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(theme.detail)),
        area,
    );
}

pub fn pagination_label(app: &App) -> String {
    format!(
        " Page {} of {} | {} rows per page | {} items",
        app.nav.page() + 1,
        app.nav.total_pages(),
        app.nav.page_size(),
        app.nav.total_elements()
    )
}

fn draw_pagination(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    frame.render_widget(
        Paragraph::new(pagination_label(app)).style(Style::default().fg(theme.pagination)),
        area,
    );
}

fn draw_status_bar(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut spans = Vec::new();

    let status_text = if app.ui.is_loading {
        format!("Loading... | {}", app.ui.status_message)
    } else {
        app.ui.status_message.clone()
    };
    spans.push(Span::styled(status_text, Style::default().fg(theme.status_bar_fg)));

    if let Some(ref error) = app.ui.last_error {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(theme.status_error),
        ));
    }
    if let Some(ref refreshed) = app.ui.last_refresh {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("Updated {}", refreshed),
            Style::default().fg(theme.status_bar_fg),
        ));
    }

    let help_text = if app.in_search_mode {
        "Enter: Keep | Esc: Clear"
    } else {
        "Enter: Open | Bksp: Up | h: Home | n/p: Page | +/-: Size | /: Search | q: Quit"
    };
    spans.push(Span::raw(" | "));
    spans.push(Span::styled(help_text, Style::default().fg(theme.status_help_text)));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.status_bar_bg));
    frame.render_widget(paragraph, area);
}
