use std::io;

use crossterm::{cursor, execute, terminal};
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

use crate::framebuffer::{FrameBuffer, HEIGHT, WIDTH};

/// Display is used by the interpreter to draw things on the screen. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work. It only ever sees a finished frame, between steps.
pub trait Display {
    fn draw(&mut self, frame: &FrameBuffer) -> Result<(), io::Error>;
}

// store useful metadata about the canvas
struct Resolution(usize, usize);

impl Resolution {
    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every pixel that is (or isn't) lit; canvas y
    /// grows upwards, so rows go negative
    fn bitplane<'a>(
        &self,
        frame: &'a FrameBuffer,
        lit: bool,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let w = self.0;
        frame
            .pixels()
            .enumerate()
            .filter(move |(_, on)| *on == lit)
            .map(move |(n, _)| ((n % w) as f64, -1.0 * (n / w) as f64))
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    /// take over the terminal; it's given back when this is dropped
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(WIDTH, HEIGHT),
        })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, frame: &FrameBuffer) -> Result<(), io::Error> {
        let off: Vec<(f64, f64)> = self.resolution.bitplane(frame, false).collect();
        let on: Vec<(f64, f64)> = self.resolution.bitplane(frame, true).collect();
        let (x_bounds, y_bounds) = (self.resolution.x_bounds(), self.resolution.y_bounds());
        let (w, h) = (self.resolution.0 as u16, self.resolution.1 as u16);

        // one terminal cell per pixel, plus the border
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + w, 2 + h).intersection(f.size());

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(x_bounds)
                .y_bounds(y_bounds)
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &off,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &on,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for testing non-display routines; keeps the last frame it saw
#[derive(Debug, Default)]
pub struct DummyDisplay {
    pub frames_drawn: usize,
    pub last: Option<FrameBuffer>,
}

impl DummyDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, frame: &FrameBuffer) -> Result<(), io::Error> {
        self.frames_drawn += 1;
        self.last = Some(frame.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Resolution tests
    #[test]
    fn test_x_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.x_bounds(), [0.0, 63.0]);
    }

    #[test]
    fn test_y_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.y_bounds(), [-31.0, 0.0]);
    }

    #[test]
    fn test_bitplanes_split_the_frame() {
        let r = Resolution(64, 32);
        let mut fb = FrameBuffer::new();
        fb.toggle(0, 0);
        fb.toggle(5, 2);
        let on: Vec<_> = r.bitplane(&fb, true).collect();
        assert_eq!(on, vec![(0.0, 0.0), (5.0, -2.0)]);
        assert_eq!(r.bitplane(&fb, false).count(), 2046);
    }

    #[test]
    fn test_dummy_display_keeps_frame() -> Result<(), io::Error> {
        let mut d = DummyDisplay::new();
        let mut fb = FrameBuffer::new();
        fb.toggle(1, 1);
        d.draw(&fb)?;
        assert_eq!(d.frames_drawn, 1);
        assert!(d.last.as_ref().map_or(false, |f| f.get(1, 1)));
        Ok(())
    }
}
