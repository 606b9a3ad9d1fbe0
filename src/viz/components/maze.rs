use ratatui::{prelude::*, widgets::*};

use crate::gym::{Cell, CellKind, Maze};

/// The maze drawn as a grid of boxes showing reward and learned value
pub struct MazeGrid<'a> {
    maze: &'a Maze,
}

impl<'a> MazeGrid<'a> {
    pub fn new(maze: &'a Maze) -> Self {
        Self { maze }
    }
}

fn cell_style(cell: &Cell) -> (Style, &'static str) {
    match cell.kind() {
        CellKind::Wall => (Style::default().bg(Color::Black).dark_gray(), ""),
        CellKind::Empty => (Style::default().white(), ""),
        CellKind::Hazard => (Style::default().light_blue(), "water"),
        CellKind::Enemy => (Style::default().light_red(), "enemy"),
        CellKind::GoalLow => (Style::default().light_green(), "finish"),
        CellKind::GoalHigh => (Style::default().green().bold(), "FINISH"),
    }
}

impl Widget for MazeGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cells = self.maze.cells();
        let (rows, cols) = (cells.rows() as u32, cells.cols() as u32);

        let row_areas = Layout::vertical((0..rows).map(|_| Constraint::Ratio(1, rows))).split(area);
        for (r, row_area) in row_areas.iter().enumerate() {
            let col_areas =
                Layout::horizontal((0..cols).map(|_| Constraint::Ratio(1, cols))).split(*row_area);

            for (c, cell_area) in col_areas.iter().enumerate() {
                let cell = &cells[(r, c)];
                let (style, label) = cell_style(cell);

                if cell.is_wall() {
                    Block::default().style(style).render(*cell_area, buf);
                    continue;
                }

                let mut block = Block::bordered().border_style(style);
                if self.maze.agent() == (r, c) {
                    block = block
                        .border_type(BorderType::Thick)
                        .border_style(Style::default().yellow().bold())
                        .title(" agent ".yellow().bold());
                }

                let lines = vec![
                    Line::styled(format!("{:+}", cell.reward()), style),
                    Line::styled(label, style),
                    Line::styled(format!("V = {}", cell.value()), Style::default().bold()),
                ];

                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .block(block)
                    .render(*cell_area, buf);
            }
        }
    }
}
