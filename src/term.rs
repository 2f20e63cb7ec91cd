use crate::{Coords, TermInt};
use std::collections::VecDeque;
use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};

/// Logical keys the game cares about.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Char(char),
    Esc,
    /// Ctrl+C. Raw mode swallows SIGINT, so this arrives as a key.
    Interrupt,
    Other,
}

impl From<KeyEvent> for Key {
    fn from(ev: KeyEvent) -> Self {
        match ev {
            KeyEvent { code: KeyCode::Char('c'), modifiers, .. }
                if modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Key::Interrupt
            }
            KeyEvent { code, .. } => match code {
                KeyCode::Up => Key::Up,
                KeyCode::Down => Key::Down,
                KeyCode::Left => Key::Left,
                KeyCode::Right => Key::Right,
                KeyCode::Esc => Key::Esc,
                KeyCode::Char(c) => Key::Char(c),
                _ => Key::Other,
            },
        }
    }
}

/// Everything the game needs from a terminal.
///
/// Cells with a negative coordinate are off screen and silently dropped.
pub trait Screen {
    fn clear(&mut self) -> Result<()>;
    fn print_at(&mut self, pos: Coords, ch: char) -> Result<()>;
    fn print_str_at(&mut self, pos: Coords, text: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;

    /// Returns at most one pending key without waiting.
    fn poll_key(&mut self) -> Result<Option<Key>>;
    fn read_key_blocking(&mut self) -> Result<Key>;
}

fn to_term_coords(pos: Coords) -> Option<(TermInt, TermInt)> {
    Some((TermInt::try_from(pos.0).ok()?, TermInt::try_from(pos.1).ok()?))
}

/// Keeps the first failure, reporting how many others followed it.
fn first_error<I: IntoIterator<Item = Result<()>>>(results: I) -> Result<()> {
    let mut errors = results.into_iter().filter_map(Result::err);
    match errors.next() {
        Some(err) => {
            let others = errors.count();
            if others == 0 {
                Err(err)
            } else {
                Err(err.context(format!("{} more restore step(s) also failed", others)))
            }
        }
        None => Ok(()),
    }
}

/// Real terminal backed by crossterm.
///
/// Raw mode and the alternate screen are held for the lifetime of the value
/// and released on drop.
pub struct TermManager {
    stdout: Stdout,
    restored: bool,
}

impl TermManager {
    /// Takes over the terminal, failing first if it cannot fit a board of
    /// the given size.
    pub fn setup(min_width: TermInt, min_height: TermInt) -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        if width < min_width || height < min_height {
            bail!(
                "terminal is {}x{}, the board needs at least {}x{}",
                width,
                height,
                min_width,
                min_height
            );
        }

        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        let mut term = TermManager { stdout, restored: false };

        terminal::enable_raw_mode().context("Error enabling raw mode")?;
        execute!(term.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        term.stdout.flush()?;

        Ok(term)
    }

    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        // Every step runs even if an earlier one failed
        let steps = [
            terminal::disable_raw_mode().context("Error disabling raw mode"),
            execute!(self.stdout, cursor::Show).context("Error showing cursor"),
            execute!(self.stdout, cursor::EnableBlinking).context("Error enabling cursor blink"),
            execute!(self.stdout, LeaveAlternateScreen).context("Error leaving alt screen"),
        ];
        first_error(steps)
    }

    fn key_from_event(event: Event) -> Option<Key> {
        match event {
            // Some platforms also report releases and repeats
            Event::Key(ev) if ev.kind == KeyEventKind::Press => Some(ev.into()),
            _ => None,
        }
    }
}

impl Screen for TermManager {
    fn clear(&mut self) -> Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        if let Some((x, y)) = to_term_coords(pos) {
            queue!(self.stdout, cursor::MoveTo(x, y), style::Print(ch))?;
        }
        Ok(())
    }

    fn print_str_at(&mut self, pos: Coords, text: &str) -> Result<()> {
        if let Some((x, y)) = to_term_coords(pos) {
            queue!(self.stdout, cursor::MoveTo(x, y), style::Print(text))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    fn poll_key(&mut self) -> Result<Option<Key>> {
        if poll(Duration::ZERO)? {
            return Ok(Self::key_from_event(read()?));
        }
        Ok(None)
    }

    fn read_key_blocking(&mut self) -> Result<Key> {
        loop {
            if let Some(key) = Self::key_from_event(read()?) {
                return Ok(key);
            }
        }
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::error!(?err, "failed to restore terminal");
        }
    }
}

/// In-memory screen with a scripted key queue.
#[derive(Clone, Debug)]
pub struct BufferScreen {
    width: TermInt,
    height: TermInt,
    screen: Vec<char>,
    keys: VecDeque<Key>,
    flushes: usize,
}

impl BufferScreen {
    pub fn new(width: TermInt, height: TermInt) -> Self {
        let screen = vec![' '; width as usize * height as usize];
        BufferScreen { width, height, screen, keys: VecDeque::new(), flushes: 0 }
    }

    pub fn push_key(&mut self, key: Key) {
        self.keys.push_back(key);
    }

    pub fn pending_keys(&self) -> usize {
        self.keys.len()
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn char_at(&self, pos: Coords) -> Option<char> {
        self.index(pos).map(|i| self.screen[i])
    }

    pub fn count_char(&self, ch: char) -> usize {
        self.screen.iter().filter(|c| **c == ch).count()
    }

    pub fn row(&self, y: TermInt) -> String {
        let start = self.width as usize * y as usize;
        self.screen[start..start + self.width as usize].iter().collect()
    }

    pub fn contains_text(&self, text: &str) -> bool {
        (0..self.height).any(|y| self.row(y).contains(text))
    }

    fn index(&self, pos: Coords) -> Option<usize> {
        let (x, y) = to_term_coords(pos)?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.width as usize * y as usize + x as usize)
    }
}

impl Screen for BufferScreen {
    fn clear(&mut self) -> Result<()> {
        self.screen.fill(' ');
        Ok(())
    }

    fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        if let Some(i) = self.index(pos) {
            self.screen[i] = ch;
        }
        Ok(())
    }

    fn print_str_at(&mut self, pos: Coords, text: &str) -> Result<()> {
        for (dx, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + dx as i16, pos.1), ch)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<Key>> {
        Ok(self.keys.pop_front())
    }

    fn read_key_blocking(&mut self) -> Result<Key> {
        self.keys.pop_front().ok_or_else(|| anyhow!("no input left to read"))
    }
}
