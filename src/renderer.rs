use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use tracing::warn;

use crate::config::{
    GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD_DOWN, GLYPH_SNAKE_HEAD_LEFT, GLYPH_SNAKE_HEAD_RIGHT,
    GLYPH_SNAKE_HEAD_UP, GridSize, THEME, Theme,
};
use crate::geometry::{Direction, Point};
use crate::snake::Snake;
use crate::terminal_runtime::TerminalSession;
use crate::view::{View, WorldSnapshot};

/// Renders the full frame from an immutable world snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &WorldSnapshot<'_>) {
    let [play_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    let block = Block::bordered()
        .border_style(Style::new().fg(THEME.border_fg))
        .style(Style::new().bg(THEME.play_bg));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    for (index, snake) in snapshot.snakes.iter().enumerate() {
        render_snake(frame, inner, snapshot.bounds, snake, body_color(&THEME, index));
    }

    let status = format!(
        " tick {}  snakes {}  [←/→] [A/D] turn  [Q] quit",
        snapshot.tick,
        snapshot.snakes.len()
    );
    frame.render_widget(
        Paragraph::new(Line::from(status)).style(Style::new().fg(THEME.status_fg)),
        status_area,
    );
}

fn body_color(theme: &Theme, index: usize) -> Color {
    theme.snake_bodies[index % theme.snake_bodies.len()]
}

fn render_snake(
    frame: &mut Frame<'_>,
    inner: Rect,
    bounds: GridSize,
    snake: &Snake,
    color: Color,
) {
    let buffer = frame.buffer_mut();

    // Draw tail first so the head stays visible where the body overlaps it.
    let segments: Vec<Point> = snake.segments().copied().collect();
    for (index, segment) in segments.iter().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, bounds, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                head_glyph(snake.heading()),
                Style::new()
                    .fg(THEME.snake_head)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(color));
        }
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_SNAKE_HEAD_UP,
        Direction::Down => GLYPH_SNAKE_HEAD_DOWN,
        Direction::Left => GLYPH_SNAKE_HEAD_LEFT,
        Direction::Right => GLYPH_SNAKE_HEAD_RIGHT,
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Point) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

/// View drawing each snapshot into the terminal session it owns.
pub struct TerminalView {
    session: TerminalSession,
}

impl TerminalView {
    #[must_use]
    pub fn new(session: TerminalSession) -> Self {
        Self { session }
    }
}

impl View for TerminalView {
    fn render(&mut self, snapshot: &WorldSnapshot<'_>) {
        if let Err(error) = self
            .session
            .terminal_mut()
            .draw(|frame| render(frame, snapshot))
        {
            warn!(%error, "terminal draw failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::config::GridSize;
    use crate::geometry::{Direction, Point};
    use crate::snake::{Snake, SnakeId};
    use crate::view::WorldSnapshot;

    use super::{logical_to_terminal, render};

    #[test]
    fn logical_cells_map_inside_inner_area() {
        let inner = Rect::new(1, 1, 4, 3);
        let bounds = GridSize {
            width: 10,
            height: 10,
        };

        assert_eq!(logical_to_terminal(inner, bounds, Point::new(0, 0)), Some((1, 1)));
        assert_eq!(logical_to_terminal(inner, bounds, Point::new(3, 2)), Some((4, 3)));
        assert_eq!(logical_to_terminal(inner, bounds, Point::new(4, 0)), None);
        assert_eq!(logical_to_terminal(inner, bounds, Point::new(-1, 0)), None);
    }

    #[test]
    fn frame_shows_head_glyph_and_body() {
        let backend = TestBackend::new(8, 5);
        let mut terminal = Terminal::new(backend).expect("test terminal should build");
        let snakes = vec![Snake::new(SnakeId(0), Point::new(2, 0), 2, Direction::Right)];
        let snapshot = WorldSnapshot {
            tick: 3,
            bounds: GridSize {
                width: 6,
                height: 2,
            },
            snakes: &snakes,
        };

        terminal
            .draw(|frame| render(frame, &snapshot))
            .expect("draw should succeed");

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(3, 1)].symbol(), ">");
        assert_eq!(buffer[(2, 1)].symbol(), "o");
    }
}
