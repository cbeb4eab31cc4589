use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, read, poll};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::app::{CellState, Frontend};
use crate::error::{Result, WormError};
use crate::worm::Cell;

pub const TITLE: &str = "Worm Game (Early Alpha) v0.1.05";

type Coords = (u16, u16);

const CELL_WIDTH: u16 = 2;
const BOARD_TOP: u16 = 1;
const CELL_CHAR: char = '█';
const DEAD_CHAR: char = 'X';
const TEXT_COLOR: Color = Color::White;

#[derive(Copy, Clone, PartialEq)]
struct Glyph {
    ch: char,
    color: Color,
}

const BLANK: Glyph = Glyph { ch: ' ', color: TEXT_COLOR };

/// Draws the board on the alternate screen. Every cell is two columns wide
/// so the grid looks roughly square; the score line sits above the border.
pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    screen: Vec<Glyph>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: u16,
    height: u16,
}

impl TermManager {
    pub fn new(grid_size: u16) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let (need_width, need_height) = board_extent(grid_size);
        if width < need_width || height < need_height {
            return Err(WormError::TerminalTooSmall { width, height, need_width, need_height });
        }

        let screen = vec![BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, stdout: stdout(), screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, terminal::SetTitle(TITLE))?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![BLANK; self.width as usize * self.height as usize];
        Ok(())
    }

    fn draw_borders(&mut self, grid_size: u16) -> Result<()> {
        let (width, height) = board_extent(grid_size);
        let end_x = width - 1;
        let end_y = height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.print_at((x, BOARD_TOP), Glyph { ch, color: TEXT_COLOR })?;
            self.print_at((x, end_y), Glyph { ch, color: TEXT_COLOR })?;
        }

        for y in BOARD_TOP + 1..end_y {
            self.print_at((0, y), Glyph { ch: '|', color: TEXT_COLOR })?;
            self.print_at((end_x, y), Glyph { ch: '|', color: TEXT_COLOR })?;
        }

        Ok(())
    }

    fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.current_msg.is_some() {
            self.hide_message()?;
        }

        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (widest + 2) as u16;
        let top_left = (
            (self.width / 2).saturating_sub(msg_width / 2),
            (self.height / 2).saturating_sub(msg_height / 2),
        );

        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), BLANK)?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as u16, y), Glyph { ch, color: TEXT_COLOR })?;
            }
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush_stdout()
    }

    fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Restore what the box covered from the screen buffer
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let pos = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                if let Some(glyph) = self.glyph_at(pos) {
                    self.print_at_no_save(pos, glyph)?;
                }
            }
        }

        self.flush_stdout()
    }

    fn print_at(&mut self, pos: Coords, glyph: Glyph) -> Result<()> {
        self.print_at_no_save(pos, glyph)?;
        if let Some(index) = self.index_of(pos) {
            self.screen[index] = glyph;
        }
        Ok(())
    }

    // For message boxes, which must not overwrite the buffer they restore from
    fn print_at_no_save(&mut self, pos: Coords, glyph: Glyph) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::SetForegroundColor(glyph.color), style::Print(glyph.ch))?;
        Ok(())
    }

    fn glyph_at(&self, pos: Coords) -> Option<Glyph> {
        self.index_of(pos).map(|i| self.screen[i])
    }

    fn index_of(&self, pos: Coords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    fn flush_stdout(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }
}

impl Frontend for TermManager {
    fn draw_board(&mut self, grid_size: u16) -> Result<()> {
        self.current_msg = None;
        self.clear()?;
        self.draw_borders(grid_size)?;
        for row in 0..grid_size {
            for col in 0..grid_size {
                self.paint(Cell::new(row, col), CellState::Empty)?;
            }
        }
        Ok(())
    }

    fn paint(&mut self, cell: Cell, state: CellState) -> Result<()> {
        let glyph = glyph_for(state);
        let (x, y) = cell_origin(cell);
        for dx in 0..CELL_WIDTH {
            self.print_at((x + dx, y), glyph)?;
        }
        Ok(())
    }

    fn show_score(&mut self, score: u32) -> Result<()> {
        let text = format!("Score: {:<10}", score);
        for (x, ch) in text.chars().enumerate() {
            self.print_at((x as u16, 0), Glyph { ch, color: TEXT_COLOR })?;
        }
        Ok(())
    }

    fn inform(&mut self, lines: &[&str]) -> Result<bool> {
        self.show_message(lines)?;
        let key = self.read_key_blocking()?;
        self.hide_message()?;
        Ok(!is_ctrl_c(&key))
    }

    fn confirm(&mut self, lines: &[&str]) -> Result<bool> {
        self.show_message(lines)?;
        loop {
            let key = self.read_key_blocking()?;
            if let Some(answer) = confirm_answer(&key) {
                self.hide_message()?;
                return Ok(answer);
            }
        }
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>> {
        if poll(timeout)? {
            if let Event::Key(ev) = read()? {
                return Ok(Some(ev));
            }
        }
        Ok(None)
    }

    fn flush(&mut self) -> Result<()> {
        self.flush_stdout()
    }
}

/// Terminal columns and rows the board occupies, score line included.
fn board_extent(grid_size: u16) -> Coords {
    (grid_size * CELL_WIDTH + 2, grid_size + BOARD_TOP + 2)
}

fn cell_origin(cell: Cell) -> Coords {
    (1 + cell.col * CELL_WIDTH, BOARD_TOP + 1 + cell.row)
}

fn glyph_for(state: CellState) -> Glyph {
    match state {
        CellState::Empty => Glyph { ch: CELL_CHAR, color: Color::DarkGrey },
        CellState::Worm => Glyph { ch: CELL_CHAR, color: Color::Yellow },
        CellState::Target => Glyph { ch: CELL_CHAR, color: Color::Green },
        CellState::Dead => Glyph { ch: DEAD_CHAR, color: Color::Red },
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

/// Yes/no answer for the game over prompt; Ctrl+C counts as "no".
fn confirm_answer(ev: &KeyEvent) -> Option<bool> {
    if is_ctrl_c(ev) {
        return Some(false);
    }

    match ev.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
        _ => None,
    }
}
