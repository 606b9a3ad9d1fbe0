pub mod help;
pub mod log;
pub mod maze;
pub mod plot;

use crossterm::event::Event;
pub use log::Logs;
pub use maze::MazeGrid;
pub use plot::ScorePlot;
use ratatui::widgets::WidgetRef;

pub trait Component: WidgetRef {
    /// **Returns** `true` if the event was consumed
    fn handle_ui_event(&mut self, event: &Event) -> bool;
}
