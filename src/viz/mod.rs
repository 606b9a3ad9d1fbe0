//! Terminal front end for the learning loop

use std::{io, time::Duration};

use crossterm::event;
use log::{error, LevelFilter};

use crate::{
    gym::Action,
    observer::{Frame, Observer},
};

use self::{app::App, tui::Tui};

mod app;
mod components;
mod tui;
mod util;

const INPUT_POLL: Duration = Duration::from_millis(16);

/// Route `log` records into the "Logs" tab
///
/// Does nothing if a logger is already installed.
pub fn init_logger(level: LevelFilter) {
    if tui_logger::init_logger(level).is_ok() {
        tui_logger::set_default_level(level);
    }
}

/// Draws the maze, score history and logs in the terminal and reads keyboard input
///
/// `q` quits, `Tab` switches tabs, `h` toggles help, arrows and `wasd` move the agent in
/// manual play. The terminal is restored when the view is dropped.
pub struct MazeView {
    terminal: Tui,
    app: App,
}

impl MazeView {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            terminal: tui::init()?,
            app: App::new(),
        })
    }

    fn draw(&mut self) {
        let app = &self.app;
        if let Err(e) = self
            .terminal
            .draw(|frame| frame.render_widget(app, frame.size()))
        {
            error!("Failed to draw: {e}");
            self.app.request_quit();
        }
    }

    /// Handle every pending terminal event, waiting up to `timeout` for the first one
    fn handle_events(&mut self, timeout: Duration) {
        let mut timeout = timeout;
        let mut redraw = false;

        loop {
            match event::poll(timeout).and_then(|ready| ready.then(event::read).transpose()) {
                Ok(Some(event)) => {
                    self.app.handle_event(&event);
                    redraw = true;
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read terminal events: {e}");
                    self.app.request_quit();
                    break;
                }
            }
            timeout = Duration::ZERO;
        }

        if redraw {
            self.draw();
        }
    }
}

impl Observer for MazeView {
    fn render_frame(&mut self, frame: &Frame<'_>) {
        self.app.update(frame);
        self.draw();
        self.handle_events(Duration::ZERO);
    }

    fn poll_quit(&mut self) -> bool {
        self.handle_events(Duration::ZERO);
        self.app.should_quit()
    }

    fn poll_manual_input(&mut self) -> Option<Action> {
        if let Some(action) = self.app.pop_action() {
            return Some(action);
        }
        self.handle_events(INPUT_POLL);
        self.app.pop_action()
    }

    /// Show the final score and wait for a key unless the user already quit
    fn finish(&mut self, score: f64) {
        self.app.finish(score);
        self.draw();

        if self.app.should_quit() {
            return;
        }
        loop {
            match event::read() {
                Ok(event) if util::event_keycode(&event).is_some() => break,
                Ok(_) => {}
                Err(e) => {
                    error!("Failed to read terminal events: {e}");
                    break;
                }
            }
        }
    }
}

impl Drop for MazeView {
    fn drop(&mut self) {
        if let Err(e) = tui::restore() {
            error!("Failed to restore the terminal: {e}");
        }
    }
}
