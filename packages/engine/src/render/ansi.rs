// packages/engine/src/render/ansi.rs
//! ANSI terminal renderer
//!
//! ```text
//! Chronon: 12 | Prey: green, Predators: red
//! . . ><. ^^. 
//! . ><. . . . 
//! ```

use crate::world::neighborhood::Occupant;
use crate::world::snapshot::WorldSnapshot;
use crossbeam_channel::Receiver;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

const CURSOR_HOME: &str = "\x1b[H";
const CLEAR_SCREEN: &str = "\x1b[2J";
const EMPTY_GLYPH: &str = ". ";
const PREY_GLYPH: &str = "\x1b[32m><\x1b[0m";
const PREDATOR_GLYPH: &str = "\x1b[31m^^\x1b[0m";

/// Build one frame: cursor home, header line, then one line per row
pub fn render_frame(snapshot: &WorldSnapshot) -> String {
    // each cell is two visible glyphs plus up to nine bytes of color codes
    let mut out = String::with_capacity(64 + snapshot.cells.len() * 11 + snapshot.dim);
    out.push_str(CURSOR_HOME);
    out.push_str(&format!(
        "Chronon: {} | Prey: green, Predators: red\n",
        snapshot.chronon
    ));

    for row in snapshot.rows() {
        for cell in row {
            out.push_str(match cell {
                Occupant::Empty => EMPTY_GLYPH,
                Occupant::Prey => PREY_GLYPH,
                Occupant::Predator => PREDATOR_GLYPH,
            });
        }
        out.push('\n');
    }
    out
}

/// Background thread drawing snapshots to stdout
pub struct AnsiRenderer {
    handle: JoinHandle<u64>,
}

impl AnsiRenderer {
    /// Start drawing frames from `frames` until every sender is dropped
    pub fn spawn(frames: Receiver<Arc<WorldSnapshot>>, frame_delay: Duration) -> io::Result<Self> {
        let handle = thread::Builder::new()
            .name("wator-render".to_string())
            .spawn(move || draw_loop(frames, frame_delay))?;

        Ok(Self { handle })
    }

    /// Wait for the renderer to drain and return the number of frames drawn
    pub fn join(self) -> u64 {
        self.handle.join().unwrap_or_else(|_| {
            warn!("renderer thread panicked");
            0
        })
    }
}

fn draw_loop(frames: Receiver<Arc<WorldSnapshot>>, frame_delay: Duration) -> u64 {
    let stdout = io::stdout();
    let mut drawn = 0;

    if write!(stdout.lock(), "{}", CLEAR_SCREEN).is_err() {
        return 0;
    }

    for snapshot in frames.iter() {
        let frame = render_frame(&snapshot);
        let mut out = stdout.lock();
        if let Err(e) = out.write_all(frame.as_bytes()).and_then(|_| out.flush()) {
            warn!("stopping renderer: {}", e);
            break;
        }
        drawn += 1;

        if !frame_delay.is_zero() {
            thread::sleep(frame_delay);
        }
    }

    debug!(frames = drawn, "renderer finished");
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::agent::Species;
    use crate::world::grid::Grid;
    use crate::world::neighborhood::Position;

    #[test]
    fn test_render_frame() {
        let grid = Grid::new(3);
        grid.spawn(Position::new(0, 1), Species::Prey, 1).unwrap();
        grid.spawn(Position::new(2, 2), Species::Predator, 1).unwrap();
        let snapshot = WorldSnapshot::capture(&grid, 4);

        let frame = render_frame(&snapshot);
        let lines: Vec<&str> = frame.lines().collect();

        assert!(lines[0].starts_with(CURSOR_HOME));
        assert!(lines[0].contains("Chronon: 4"));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], format!(". {}. ", PREY_GLYPH));
        assert_eq!(lines[3], format!(". . {}", PREDATOR_GLYPH));
    }

    #[test]
    fn test_renderer_exits_when_senders_drop() {
        let (tx, rx) = crossbeam_channel::bounded(4);
        let grid = Grid::new(2);
        tx.send(Arc::new(WorldSnapshot::capture(&grid, 0))).unwrap();
        tx.send(Arc::new(WorldSnapshot::capture(&grid, 1))).unwrap();
        drop(tx);

        let renderer = AnsiRenderer::spawn(rx, Duration::ZERO).unwrap();
        assert_eq!(renderer.join(), 2);
    }
}
