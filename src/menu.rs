//! Arrow-key list picker.
//!
//! [`Picker`] is a plain state machine (`title`, `options`, `selected`): feed
//! it [`MenuKey`]s, get back a [`MenuStep`], ask it for the lines to draw.
//! [`pick`] is the terminal driver around it, built on crossterm raw mode.
//!
//! Long lists scroll: only a window of rows around the selection is drawn.

use crate::error::{Error, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use std::io::Write;

/// Input the picker understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuKey {
    Up,
    Down,
    Home,
    End,
    Confirm,
    Cancel,
    Other,
}

impl From<KeyEvent> for MenuKey {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => MenuKey::Up,
            KeyCode::Down | KeyCode::Char('j') => MenuKey::Down,
            KeyCode::Home => MenuKey::Home,
            KeyCode::End => MenuKey::End,
            KeyCode::Enter => MenuKey::Confirm,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => MenuKey::Cancel,
            KeyCode::Esc | KeyCode::Char('q') => MenuKey::Cancel,
            _ => MenuKey::Other,
        }
    }
}

/// What the driver should do after a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuStep {
    Continue,
    Selected(usize),
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct Picker {
    title: String,
    options: Vec<String>,
    selected: usize,
}

impl Picker {
    /// Fails on an empty option list: there would be nothing to confirm.
    pub fn new(title: impl Into<String>, options: Vec<String>) -> Result<Self> {
        let title = title.into();
        if options.is_empty() {
            return Err(Error::InvalidInput(format!("{title}: no options to choose from")));
        }
        Ok(Self {
            title,
            options,
            selected: 0,
        })
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Apply one key. Movement clamps at both ends.
    pub fn handle(&mut self, key: MenuKey) -> MenuStep {
        let last = self.options.len() - 1;
        match key {
            MenuKey::Up => self.selected = self.selected.saturating_sub(1),
            MenuKey::Down => self.selected = (self.selected + 1).min(last),
            MenuKey::Home => self.selected = 0,
            MenuKey::End => self.selected = last,
            MenuKey::Confirm => return MenuStep::Selected(self.selected),
            MenuKey::Cancel => return MenuStep::Cancelled,
            MenuKey::Other => {}
        }
        MenuStep::Continue
    }

    /// Lines to draw, at most `max_rows` option rows around the selection.
    pub fn render_lines(&self, max_rows: usize) -> Vec<String> {
        let rows = max_rows.max(1).min(self.options.len());
        // Keep the selection inside the window, scrolling as late as possible.
        let start = (self.selected + 1).saturating_sub(rows);
        let end = start + rows;

        let mut lines = Vec::with_capacity(rows + 4);
        lines.push(self.title.clone());
        if start > 0 {
            lines.push("   ...".to_string());
        }
        for (i, opt) in self.options[start..end].iter().enumerate() {
            let marker = if start + i == self.selected { " > " } else { "   " };
            lines.push(format!("{marker}{opt}"));
        }
        if end < self.options.len() {
            lines.push("   ...".to_string());
        }
        lines.push(String::new());
        lines.push("Use Up/Down arrows and Enter to select, Esc to quit.".to_string());
        lines
    }
}

/// Something that lets the user choose one of `options`.
pub trait Selector {
    fn select(&mut self, title: &str, options: &[String]) -> Result<usize>;
}

/// Interactive picker on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalSelector;

impl Selector for TerminalSelector {
    fn select(&mut self, title: &str, options: &[String]) -> Result<usize> {
        pick(title, options)
    }
}

/// Restores cooked mode and the cursor even if the loop errors out.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(std::io::stdout(), Show);
        let _ = terminal::disable_raw_mode();
    }
}

/// Show `options` under `title` and return the chosen index.
///
/// Esc, `q` and Ctrl+C return [`Error::SelectionCancelled`].
pub fn pick(title: &str, options: &[String]) -> Result<usize> {
    let mut picker = Picker::new(title, options.to_vec())?;
    let mut out = std::io::stdout();
    let _guard = RawModeGuard::enter()?;
    execute!(out, Hide)?;

    loop {
        let (_, height) = terminal::size().unwrap_or((80, 24));
        // title + blank + help + two scroll markers
        let rows = (height as usize).saturating_sub(5);
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        for line in picker.render_lines(rows) {
            write!(out, "{line}\r\n")?;
        }
        out.flush()?;

        let key = match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press => MenuKey::from(k),
            _ => continue,
        };
        match picker.handle(key) {
            MenuStep::Continue => {}
            MenuStep::Selected(idx) => {
                queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
                out.flush()?;
                return Ok(idx);
            }
            MenuStep::Cancelled => return Err(Error::SelectionCancelled),
        }
    }
}
