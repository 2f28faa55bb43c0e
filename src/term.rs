use std::io::{stdout, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};

use crate::snake::Heading::{self, Down, Left, Right, Up};
use crate::surface::{Action, Surface};
use crate::{Point, Rgb, SEGMENT_SIZE};

const BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'o';

struct Cell {
    col: u16,
    row: u16,
    color: Rgb,
    ch: char,
}

/// Terminal backend: one 20-unit playfield square per character cell, the
/// top row reserved for the scoreboard. Frames are drawn into a cell list
/// and written out in one queued batch on present.
pub struct TermSurface {
    cols: u16,
    rows: u16,
    two_player: bool,
    stdout: Stdout,
    cells: Vec<Cell>,
    status: String,
}

impl TermSurface {
    pub fn new(two_player: bool) -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(TermSurface {
            cols,
            rows,
            two_player,
            stdout: stdout(),
            cells: Vec::new(),
            status: String::new(),
        })
    }

    pub fn setup(&mut self) -> std::io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()
    }

    pub fn restore(&mut self) -> std::io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, LeaveAlternateScreen)
    }

    /// Playfield half-extents matching the current terminal size.
    pub fn playfield_extents(&self) -> (f32, f32) {
        (
            self.cols as f32 * SEGMENT_SIZE / 2.0,
            self.rows.saturating_sub(1) as f32 * SEGMENT_SIZE / 2.0,
        )
    }

    pub fn show_intro(&mut self) -> std::io::Result<()> {
        self.show_banner(&[
            "Color the Snake!",
            "",
            "Fill your snake with colors by eating pellets.",
            "Crash into yourself and the colors scatter.",
            "",
            "Arrow keys steer the first snake",
            "WASD steers the second snake",
            "+ / - change speed, Space pauses",
            "q or CTRL+C quits",
            "",
            "Press any key to begin",
        ])?;
        self.wait_key()?;
        self.hide_banner()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn wait_key(&mut self) -> std::io::Result<()> {
        loop {
            if let Event::Key(ev) = read()? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }

    fn cell_of(&self, pos: Point) -> Option<(u16, u16)> {
        let (half_w, half_h) = self.playfield_extents();
        let col = ((pos.0 + half_w) / SEGMENT_SIZE).round() as i32;
        let row = ((half_h - pos.1) / SEGMENT_SIZE).round() as i32 + 1;
        if col < 0 || col >= self.cols as i32 || row < 1 || row >= self.rows as i32 {
            None
        } else {
            Some((col as u16, row as u16))
        }
    }

    fn head_char(heading: Heading) -> char {
        match heading {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }

    fn translate_key(&self, ev: &KeyEvent) -> Option<Action> {
        if ev.kind != KeyEventKind::Press {
            return None;
        }
        if ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Action::Quit);
        }

        // WASD is the second player's scheme when there is a second player.
        let wasd = if self.two_player { 1 } else { 0 };
        match ev.code {
            KeyCode::Up => Some(Action::Turn(0, Up)),
            KeyCode::Down => Some(Action::Turn(0, Down)),
            KeyCode::Left => Some(Action::Turn(0, Left)),
            KeyCode::Right => Some(Action::Turn(0, Right)),
            KeyCode::Char('w') => Some(Action::Turn(wasd, Up)),
            KeyCode::Char('s') => Some(Action::Turn(wasd, Down)),
            KeyCode::Char('a') => Some(Action::Turn(wasd, Left)),
            KeyCode::Char('d') => Some(Action::Turn(wasd, Right)),
            KeyCode::Char('+') => Some(Action::SpeedUp),
            KeyCode::Char('-') => Some(Action::SpeedDown),
            KeyCode::Char(' ') => Some(Action::TogglePause),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }
}

impl Surface for TermSurface {
    fn begin_frame(&mut self) {
        self.cells.clear();
        self.status.clear();
    }

    fn draw_square(&mut self, pos: Point, heading: Heading, color: Rgb, head: bool) {
        if let Some((col, row)) = self.cell_of(pos) {
            let ch = if head { Self::head_char(heading) } else { BODY_CHAR };
            self.cells.push(Cell { col, row, color, ch });
        }
    }

    fn draw_circle(&mut self, pos: Point, color: Rgb) {
        if let Some((col, row)) = self.cell_of(pos) {
            self.cells.push(Cell { col, row, color, ch: FOOD_CHAR });
        }
    }

    fn write_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn show_banner(&mut self, lines: &[&str]) -> std::io::Result<()> {
        let height = lines.len() as u16 + 2;
        let width = lines.iter().map(|line| line.len()).max().unwrap_or(0) as u16 + 4;
        let left = self.cols.saturating_sub(width) / 2;
        let top = self.rows.saturating_sub(height) / 2;

        queue!(self.stdout, style::SetForegroundColor(style::Color::White))?;
        for y in 0..height {
            let text = if y == 0 || y == height - 1 {
                " ".repeat(width as usize)
            } else {
                let line = lines[(y - 1) as usize];
                format!("{line: ^width$}", line = line, width = width as usize)
            };
            queue!(self.stdout, cursor::MoveTo(left, top + y), style::Print(text))?;
        }
        self.stdout.flush()
    }

    fn hide_banner(&mut self) -> std::io::Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))
    }

    fn present(&mut self) -> std::io::Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))?;
        for cell in &self.cells {
            let (r, g, b) = cell.color;
            queue!(
                self.stdout,
                cursor::MoveTo(cell.col, cell.row),
                style::SetForegroundColor(style::Color::Rgb { r, g, b }),
                style::Print(cell.ch)
            )?;
        }

        let status_col = self.cols.saturating_sub(self.status.len() as u16) / 2;
        queue!(
            self.stdout,
            cursor::MoveTo(status_col, 0),
            style::SetForegroundColor(style::Color::White),
            style::Print(&self.status),
            style::ResetColor
        )?;
        self.stdout.flush()
    }

    fn poll_actions(&mut self, deadline: Instant) -> std::io::Result<Vec<Action>> {
        let mut actions = Vec::new();
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !poll(timeout)? {
                break; // deadline reached with the queue drained
            }
            match read()? {
                Event::Key(ev) => {
                    if let Some(action) = self.translate_key(&ev) {
                        actions.push(action);
                    }
                }
                Event::Resize(cols, rows) => {
                    self.cols = cols;
                    self.rows = rows;
                    let (half_w, half_h) = self.playfield_extents();
                    actions.push(Action::Resize(half_w, half_h));
                }
                _ => {}
            }
        }
        Ok(actions)
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}
