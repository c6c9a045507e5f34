use ratatui::style::Color;

/// Theme data structure containing all colors used in the application
#[derive(Debug, Clone)]
pub struct Theme {
    // Breadcrumb bar
    pub crumb: Color,
    pub crumb_current: Color,
    pub crumb_focused_bg: Color,
    pub crumb_separator: Color,

    // Search box
    pub search_active: Color,
    pub search_inactive: Color,

    // Rows
    pub row_selected_bg: Color,
    pub row_selected_fg: Color,
    pub row_directory: Color,
    pub row_file: Color,
    pub row_type: Color,
    pub empty_listing: Color,

    // Footer
    pub pagination: Color,
    pub detail: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_error: Color,
    pub status_help_text: Color,

    // Panel borders
    pub active_border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            crumb: Color::Blue,
            crumb_current: Color::White,
            crumb_focused_bg: Color::DarkGray,
            crumb_separator: Color::Gray,

            search_active: Color::Yellow,
            search_inactive: Color::Gray,

            row_selected_bg: Color::White,
            row_selected_fg: Color::Black,
            row_directory: Color::Blue,
            row_file: Color::Reset,
            row_type: Color::Gray,
            empty_listing: Color::Gray,

            pagination: Color::Cyan,
            detail: Color::Gray,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_error: Color::Red,
            status_help_text: Color::Gray,

            active_border: Color::Yellow,
        }
    }
}

/// Get the current theme
pub fn get_theme() -> Theme {
    Theme::default()
}
