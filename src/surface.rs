use crate::snake::Heading;
use crate::{Point, Rgb};
use std::io;
use std::time::{Duration, Instant};

/// Input events the key-dispatch layer hands to the session, already routed
/// to a player index where applicable.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Action {
    Turn(usize, Heading),
    TogglePause,
    SpeedUp,
    SpeedDown,
    /// New playfield half-extents after a window resize.
    Resize(f32, f32),
    Quit,
}

/// Rendering and input boundary of the engine. The session draws through
/// these primitives and never touches a concrete backend, which keeps the
/// simulation driveable headlessly.
pub trait Surface {
    fn begin_frame(&mut self);
    fn draw_square(&mut self, pos: Point, heading: Heading, color: Rgb, head: bool);
    fn draw_circle(&mut self, pos: Point, color: Rgb);
    fn write_status(&mut self, text: &str);
    fn show_banner(&mut self, lines: &[&str]) -> io::Result<()>;
    fn hide_banner(&mut self) -> io::Result<()>;
    fn present(&mut self) -> io::Result<()>;

    /// Block until `deadline` collecting input; the wait doubles as the
    /// per-tick pacing delay.
    fn poll_actions(&mut self, deadline: Instant) -> io::Result<Vec<Action>>;

    /// Pacing for intra-tick animation frames.
    fn sleep(&mut self, _duration: Duration) {}
}

/// Backend that draws nothing, returns no input, and never blocks.
pub struct NoopSurface;

impl Surface for NoopSurface {
    fn begin_frame(&mut self) {}

    fn draw_square(&mut self, _pos: Point, _heading: Heading, _color: Rgb, _head: bool) {}

    fn draw_circle(&mut self, _pos: Point, _color: Rgb) {}

    fn write_status(&mut self, _text: &str) {}

    fn show_banner(&mut self, _lines: &[&str]) -> io::Result<()> {
        Ok(())
    }

    fn hide_banner(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn poll_actions(&mut self, _deadline: Instant) -> io::Result<Vec<Action>> {
        Ok(Vec::new())
    }
}
