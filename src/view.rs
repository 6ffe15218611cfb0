use std::io::Write;

use tracing::warn;

use crate::config::GridSize;
use crate::geometry::Point;
use crate::snake::Snake;

/// Read-only picture of the world handed to views after each tick.
#[derive(Debug, Clone, Copy)]
pub struct WorldSnapshot<'a> {
    pub tick: u64,
    pub bounds: GridSize,
    pub snakes: &'a [Snake],
}

impl WorldSnapshot<'_> {
    #[must_use]
    pub fn width(&self) -> u16 {
        self.bounds.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.bounds.height
    }
}

/// Consumer of world snapshots, called once per tick.
///
/// Rendering failures stay inside the view.
pub trait View {
    fn render(&mut self, snapshot: &WorldSnapshot<'_>);
}

/// Draws the snapshot as plain text: `#` border, `@` heads, `o` bodies.
///
/// Segments outside the bounds are not drawn.
#[must_use]
pub fn render_text(snapshot: &WorldSnapshot<'_>) -> String {
    let width = usize::from(snapshot.width());
    let height = usize::from(snapshot.height());
    let mut grid = vec![vec!['.'; width]; height];

    for snake in snapshot.snakes {
        for (index, segment) in snake.segments().enumerate() {
            let Some((x, y)) = cell_index(*segment, snapshot.bounds) else {
                continue;
            };

            // Heads win over bodies that share the cell.
            if index == 0 {
                grid[y][x] = '@';
            } else if grid[y][x] != '@' {
                grid[y][x] = 'o';
            }
        }
    }

    let border = "#".repeat(width + 2);
    let mut out = String::with_capacity((width + 3) * (height + 2));
    out.push_str(&border);
    out.push('\n');
    for row in grid {
        out.push('#');
        out.extend(row);
        out.push('#');
        out.push('\n');
    }
    out.push_str(&border);
    out.push('\n');
    out
}

fn cell_index(position: Point, bounds: GridSize) -> Option<(usize, usize)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    Some((usize::try_from(position.x).ok()?, usize::try_from(position.y).ok()?))
}

/// Reference view writing [`render_text`] output to any writer.
#[derive(Debug)]
pub struct TextView<W: Write> {
    out: W,
}

impl<W: Write> TextView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> View for TextView<W> {
    fn render(&mut self, snapshot: &WorldSnapshot<'_>) {
        let frame = render_text(snapshot);
        let result = writeln!(
            self.out,
            "tick {} | snakes alive: {}",
            snapshot.tick,
            snapshot.snakes.len()
        )
        .and_then(|()| self.out.write_all(frame.as_bytes()))
        .and_then(|()| self.out.flush());

        if let Err(error) = result {
            warn!(%error, "text view failed to write frame");
        }
    }
}
