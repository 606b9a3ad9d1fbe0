use std::collections::VecDeque;

use crossterm::event::{Event, KeyCode};
use ratatui::{prelude::*, widgets::*};

use super::{
    components::{help::render_help, Component, Logs, MazeGrid, ScorePlot},
    util::{event_keycode, keycode_action},
};
use crate::{
    gym::{Action, Maze},
    observer::{Frame, FrameKind},
};

const TABS: [&str; 3] = ["Maze", "Scores", "Logs"];
const MAX_PENDING_MOVES: usize = 8;

/// The root TUI component holding everything the last frame showed
pub struct App {
    maze: Option<Maze>,
    episode: Option<u32>,
    exploration_rate: Option<f64>,
    converged: bool,
    final_score: Option<f64>,
    scores: ScorePlot,
    logs: Logs,
    selected_tab: usize,
    show_help: bool,
    quit: bool,
    pending: VecDeque<Action>,
}

impl App {
    pub fn new() -> Self {
        Self {
            maze: None,
            episode: None,
            exploration_rate: None,
            converged: false,
            final_score: None,
            scores: ScorePlot::new(),
            logs: Logs::new(),
            selected_tab: 0,
            show_help: false,
            quit: false,
            pending: VecDeque::new(),
        }
    }

    /// Take over the state carried by a frame
    pub fn update(&mut self, frame: &Frame<'_>) {
        self.maze = Some(frame.maze.clone());
        self.episode = frame.episode;
        self.exploration_rate = frame.exploration_rate;
        self.converged = frame.converged;

        if frame.kind == FrameKind::EpisodeEnd {
            if let Some(episode) = frame.episode {
                self.scores.update(episode, frame.maze.score());
            }
        }
    }

    pub fn finish(&mut self, score: f64) {
        self.final_score = Some(score);
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Next move queued from the keyboard
    pub fn pop_action(&mut self) -> Option<Action> {
        self.pending.pop_front()
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Some(code) = event_keycode(event) else {
            return;
        };

        match code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('h') => self.show_help = !self.show_help,
            KeyCode::Tab => self.selected_tab = (self.selected_tab + 1) % TABS.len(),
            _ if self.selected_tab == 2 => {
                self.logs.handle_ui_event(event);
            }
            code => {
                if let Some(action) = keycode_action(code) {
                    if self.pending.len() < MAX_PENDING_MOVES {
                        self.pending.push_back(action);
                    }
                }
            }
        }
    }

    fn status_lines(&self) -> Vec<Line<'_>> {
        let mut lines = Vec::new();
        if let Some(episode) = self.episode {
            lines.push(Line::from(vec![
                Span::raw("Run: "),
                Span::from(episode.to_string()).light_magenta().bold(),
            ]));
        }
        if let Some(maze) = &self.maze {
            lines.push(Line::from(vec![
                Span::raw("Points: "),
                Span::from(maze.score().to_string()).light_green().bold(),
            ]));
            lines.push(Line::from(format!("Steps: {}", maze.steps())));
        }
        if let Some(rate) = self.exploration_rate {
            lines.push(Line::from(format!("Exploration rate: {rate}")));
        }
        if self.converged {
            lines.push(Line::default());
            lines.push("Reached convergence!".light_magenta().bold().into());
            lines.push("Showing optimal route".light_magenta().into());
        }
        if let Some(score) = self.final_score {
            lines.push(Line::default());
            lines.push(format!("Final score: {score}").yellow().bold().into());
            if !self.quit {
                lines.push("Press any key to exit".dark_gray().into());
            }
        }
        lines
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Layout
        let [menu_area, main_area, gauge_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        // Menu
        Tabs::new(TABS)
            .block(Block::default().padding(Padding::uniform(1)))
            .white()
            .bold()
            .highlight_style(Style::default().light_green())
            .select(self.selected_tab)
            .render(menu_area, buf);

        // Main
        match self.selected_tab {
            0 => {
                let [grid_area, status_area] =
                    Layout::horizontal([Constraint::Fill(3), Constraint::Fill(1)]).areas(main_area);

                match &self.maze {
                    Some(maze) => MazeGrid::new(maze).render(grid_area, buf),
                    None => Paragraph::new("Waiting for the first frame")
                        .dark_gray()
                        .render(grid_area, buf),
                }

                Paragraph::new(self.status_lines())
                    .block(
                        Block::bordered()
                            .border_type(BorderType::Rounded)
                            .padding(Padding::horizontal(1))
                            .title("Status"),
                    )
                    .wrap(Wrap { trim: true })
                    .render(status_area, buf);
            }
            1 => self.scores.render(main_area, buf),
            2 => self.logs.render_ref(main_area, buf),
            _ => {}
        }

        // Exploration rate
        let rate = self.exploration_rate.unwrap_or(0.0).clamp(0.0, 1.0);
        Gauge::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Exploration rate"),
            )
            .gauge_style(Color::Cyan)
            .ratio(rate)
            .label(format!("{:.0}%", rate * 100.0))
            .render(gauge_area, buf);

        if self.show_help {
            render_help(area, buf, self.selected_tab);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;
    use crate::{env::Environment, gym::MazeConfig};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn keys_update_state() {
        let mut app = App::new();
        app.handle_event(&key(KeyCode::Up));
        app.handle_event(&key(KeyCode::Char('d')));
        assert_eq!(app.pop_action(), Some(Action::Up));
        assert_eq!(app.pop_action(), Some(Action::Right));
        assert_eq!(app.pop_action(), None);

        app.handle_event(&key(KeyCode::Tab));
        app.handle_event(&key(KeyCode::Tab));
        assert_eq!(app.selected_tab, 2);
        app.handle_event(&key(KeyCode::Up));
        assert_eq!(app.pop_action(), None, "Arrows belong to the log widget");

        assert!(!app.should_quit());
        app.handle_event(&key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn pending_moves_are_bounded() {
        let mut app = App::new();
        for _ in 0..20 {
            app.handle_event(&key(KeyCode::Left));
        }
        assert_eq!(app.pending.len(), MAX_PENDING_MOVES);
    }

    #[test]
    fn episode_end_adds_score() {
        let mut app = App::new();
        let mut maze = Maze::new(MazeConfig::default()).unwrap();
        maze.step(Action::Left);
        maze.step(Action::Left);

        app.update(&Frame {
            kind: FrameKind::EpisodeEnd,
            maze: &maze,
            episode: Some(4),
            exploration_rate: Some(0.25),
            converged: true,
        });
        assert_eq!(app.scores.len(), 1);

        let area = Rect::new(0, 0, 140, 48);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        let text = buf
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>();
        assert!(text.contains("Points: 8"));
        assert!(text.contains("Reached convergence!"));
    }
}
