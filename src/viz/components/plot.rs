use ratatui::{prelude::*, style::Stylize, widgets::*};

/// Scatter plot of the score of every finished episode
pub struct ScorePlot {
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_labels: Vec<String>,
    y_labels: Vec<String>,
    data: Vec<(f64, f64)>,
}

impl ScorePlot {
    pub fn new() -> Self {
        Self {
            x_bounds: [f64::MAX, f64::MIN],
            y_bounds: [f64::MAX, f64::MIN],
            x_labels: Vec::new(),
            y_labels: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Add the score of an episode, widening the axes as needed
    pub fn update(&mut self, episode: u32, score: f64) {
        let point = (episode as f64, score);
        let [x_min, x_max] = &mut self.x_bounds;
        let x_bounds_changed = point.0 < *x_min || point.0 > *x_max;
        *x_min = x_min.min(point.0);
        *x_max = x_max.max(point.0);

        let [y_min, y_max] = &mut self.y_bounds;
        let y_bounds_changed = point.1 < *y_min || point.1 > *y_max;
        *y_min = y_min.min(point.1);
        *y_max = y_max.max(point.1);

        if x_bounds_changed {
            self.x_labels = labels(self.x_bounds, 0);
        }
        if y_bounds_changed {
            self.y_labels = labels(self.y_bounds, 1);
        }

        self.data.push(point);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn labels([min, max]: [f64; 2], precision: usize) -> Vec<String> {
    vec![
        format!("{min:.precision$}"),
        format!("{:.precision$}", (min + max) / 2.0),
        format!("{max:.precision$}"),
    ]
}

impl Widget for &ScorePlot {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Score per episode")
            .padding(Padding::uniform(1));

        if self.is_empty() {
            Paragraph::new("No finished episodes yet")
                .dark_gray()
                .block(block)
                .render(area, buf);
            return;
        }

        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Scatter)
            .cyan()
            .data(&self.data);

        let axis = |title: &'static str, bounds: [f64; 2], labels: &[String]| {
            Axis::default()
                .title(title)
                .dark_gray()
                .labels(labels.iter().map(|l| l.clone().bold()).collect())
                .bounds(bounds)
        };

        Chart::new(vec![dataset])
            .block(block)
            .x_axis(axis("Episode", self.x_bounds, &self.x_labels))
            .y_axis(axis("Score", self.y_bounds, &self.y_labels))
            .render(area, buf);
    }
}
