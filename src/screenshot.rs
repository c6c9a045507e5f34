use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::fs;

use crate::{app::App, config::Config, main_lib, ui};

/// Render a saved navigation state once and emit the screen as text.
pub fn generate_screenshot(
    state_path: &str,
    output_path: Option<&str>,
    width: u16,
    height: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = main_lib::read_snapshot(state_path)?;
    let app = App::from_state(Config::default(), state);

    let screenshot = render_to_string(&app, width, height)?;

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

pub fn render_to_string(
    app: &App,
    width: u16,
    height: u16,
) -> Result<String, Box<dyn std::error::Error>> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend)?;
    terminal.draw(|frame| ui::draw(frame, app))?;
    Ok(buffer_to_string(terminal.backend().buffer()))
}

pub fn buffer_to_string(buffer: &Buffer) -> String {
    let mut result = String::new();

    for y in 0..buffer.area().height {
        for x in 0..buffer.area().width {
            let sym = buffer[(x, y)].symbol();
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
