use ratatui::{prelude::*, widgets::*};

/// Render the key bindings of the selected tab as a centered popup
pub fn render_help(area: Rect, buf: &mut Buffer, selected_tab: usize) {
    let key = |k: &'static str| Span::from(k).light_cyan().bold();

    let mut lines = vec![
        vec![key("  q  "), Span::raw(" : Quit and report the final score")],
        vec![key("  h  "), Span::raw(" : Toggle help popup")],
        vec![key(" Tab "), Span::raw(" : Switch tabs")],
    ];

    match selected_tab {
        0 => lines.push(vec![
            key("⬅⬆⬇➡ / wasd"),
            Span::raw(" : Move the agent in manual play"),
        ]),
        2 => lines.extend([
            vec![key("⬆ / ⬇"), Span::raw(" : Switch log target")],
            vec![
                key("⬅ / ➡"),
                Span::raw(" : Reduce/increase shown log messages by one level"),
            ],
            vec![
                key("- / +"),
                Span::raw(" : Reduce/increase captured log messages by one level"),
            ],
            vec![key("  f  "), Span::raw(" : Focus on the selected target only")],
            vec![key("PgUp "), Span::raw(" : Page up in log history")],
            vec![key("PgDn "), Span::raw(" : Page down in log history")],
            vec![key(" Esc "), Span::raw(" : Leave page mode")],
        ]),
        _ => {}
    }

    let lines = lines.into_iter().map(Line::from).collect::<Vec<_>>();

    let [_, center_vert, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length((lines.len() + 4) as u16),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(72),
        Constraint::Fill(1),
    ])
    .areas(center_vert);

    Clear.render(center, buf);

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::horizontal(1))
                .title("Help"),
        )
        .wrap(Wrap { trim: false })
        .render(center, buf);
}
