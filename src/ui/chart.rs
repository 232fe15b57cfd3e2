// src/ui/chart.rs

use iced::{
    mouse::Cursor,
    widget::canvas::{self, Frame, Geometry, Path, Stroke, Style, Text as CanvasText},
    Color, Point, Rectangle, Renderer, Theme,
};

use crate::history::is_spike;

const GRID_LINES: usize = 5;

/// Line chart of a 0-100 % series. Segments whose relative change exceeds
/// the spike threshold are drawn red.
pub struct UsageChart {
    title: &'static str,
    history: Vec<f32>,
    color: Color,
    spike_threshold: f32,
}

impl UsageChart {
    pub fn new(title: &'static str, history: Vec<f32>, color: Color, spike_threshold: f32) -> Self {
        Self {
            title,
            history,
            color,
            spike_threshold,
        }
    }

    pub fn cpu(history: Vec<f32>, spike_threshold: f32) -> Self {
        Self::new("CPU Usage (%)", history, Color::from_rgb(0.0, 0.6, 0.6), spike_threshold)
    }

    pub fn memory(history: Vec<f32>, spike_threshold: f32) -> Self {
        Self::new("Memory Usage (%)", history, Color::from_rgb(0.6, 0.3, 0.8), spike_threshold)
    }

    fn segment_color(&self, previous: f32, current: f32) -> Color {
        if is_spike(previous, current, self.spike_threshold) {
            Color::from_rgb(1.0, 0.0, 0.0)
        } else {
            self.color
        }
    }
}

impl<Message> canvas::Program<Message> for UsageChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        // Grid
        for i in 0..=GRID_LINES {
            let y = i as f32 * bounds.height / GRID_LINES as f32;
            frame.stroke(
                &Path::line(Point::new(0.0, y), Point::new(bounds.width, y)),
                Stroke {
                    style: Style::Solid(Color::from_rgb(0.25, 0.25, 0.25)),
                    width: 1.0,
                    ..Stroke::default()
                },
            );
        }

        let label = match self.history.last() {
            Some(latest) => format!("{}  {:.1}%", self.title, latest),
            None => self.title.to_string(),
        };
        frame.fill_text(CanvasText {
            content: label,
            position: Point::new(5.0, 5.0),
            color: Color::from_rgb(0.85, 0.85, 0.85),
            size: 16.0,
            ..CanvasText::default()
        });

        if self.history.len() < 2 {
            return vec![frame.into_geometry()];
        }

        let step_x = bounds.width / (self.history.len() - 1) as f32;
        let scale_y = bounds.height / 100.0;
        let to_point = |i: usize, value: f32| {
            Point::new(i as f32 * step_x, bounds.height - value.clamp(0.0, 100.0) * scale_y)
        };

        for (i, pair) in self.history.windows(2).enumerate() {
            let (previous, current) = (pair[0], pair[1]);
            frame.stroke(
                &Path::line(to_point(i, previous), to_point(i + 1, current)),
                Stroke {
                    style: Style::Solid(self.segment_color(previous, current)),
                    width: 2.0,
                    ..Stroke::default()
                },
            );
        }

        vec![frame.into_geometry()]
    }
}
