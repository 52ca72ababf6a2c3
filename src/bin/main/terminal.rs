//! crossterm keyboard input and screen output.

use core::fmt::Write as _;
use std::{
    io::{self, Stdout, Write},
    time::Duration,
};

use aeroread_core::{
    engine::{GroupSize, PlaybackPhase},
    input::{InputProvider, KeyCommand},
    render::{ReaderView, WordDisplay},
};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, PrintStyledContent, Stylize},
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use heapless::String as HeaplessString;

const ORP_ANCHOR_PERCENT: u32 = 42;
const STATUS_BYTES: usize = 128;
const HELP: &str =
    "space play/pause  \u{2190} rewind  \u{2191}\u{2193} speed  1-3 group  w warmup  b/r bookmark  0 reset  esc quit";

pub(super) fn command_for(key: KeyEvent) -> Option<KeyCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(KeyCommand::Exit);
    }

    let command = match key.code {
        KeyCode::Char(' ') => KeyCommand::TogglePlay,
        KeyCode::Left => KeyCommand::Rewind,
        KeyCode::Up => KeyCommand::Faster,
        KeyCode::Down => KeyCommand::Slower,
        KeyCode::Char(digit @ '1'..='3') => {
            KeyCommand::SetGroup(GroupSize::try_from(digit as u8 - b'0').ok()?)
        }
        KeyCode::Char('w') => KeyCommand::ToggleWarmup,
        KeyCode::Char('b') => KeyCommand::SaveBookmark,
        KeyCode::Char('r') => KeyCommand::RestoreBookmark,
        KeyCode::Enter => KeyCommand::DismissNotice,
        KeyCode::Char('0') | KeyCode::Backspace => KeyCommand::Reset,
        KeyCode::Esc | KeyCode::Char('q') => KeyCommand::Exit,
        _ => return None,
    };
    Some(command)
}

/// Non-blocking keyboard reader; drains whatever crossterm has queued.
#[derive(Debug, Default)]
pub(super) struct TerminalInput;

impl InputProvider for TerminalInput {
    type Error = io::Error;

    fn poll_event(&mut self) -> Result<Option<KeyCommand>, Self::Error> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()?
                && let Some(command) = command_for(key)
            {
                return Ok(Some(command));
            }
        }
        Ok(None)
    }
}

/// Raw-mode alternate screen, restored on drop.
pub(super) struct TerminalScreen {
    out: Stdout,
}

impl TerminalScreen {
    pub(super) fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide)?;
        Ok(Self { out })
    }

    pub(super) fn render(&mut self, view: &ReaderView<'_>) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        let middle = height / 2;
        let anchor = pivot_column(width);

        queue!(
            self.out,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(anchor, middle.saturating_sub(1)),
            PrintStyledContent("\u{25be}".dark_grey()),
            cursor::MoveTo(anchor, middle.saturating_add(1)),
            PrintStyledContent("\u{25b4}".dark_grey()),
        )?;

        match &view.display {
            WordDisplay::Empty => {
                queue!(
                    self.out,
                    cursor::MoveTo(centered(width, "(no text)"), middle),
                    Print("(no text)")
                )?;
            }
            WordDisplay::Word(parts) => {
                let lead = parts.prefix.chars().count() as u16;
                queue!(
                    self.out,
                    cursor::MoveTo(anchor.saturating_sub(lead), middle),
                    Print(parts.prefix),
                    PrintStyledContent(parts.pivot.with(Color::Red).bold()),
                    Print(parts.suffix),
                )?;
            }
            WordDisplay::Group(text) => {
                queue!(
                    self.out,
                    cursor::MoveTo(centered(width, text), middle),
                    Print(text)
                )?;
            }
        }

        if let Some(notice) = view.notice {
            queue!(
                self.out,
                cursor::MoveTo(centered(width, notice), middle.saturating_add(3)),
                PrintStyledContent(notice.with(Color::Yellow)),
            )?;
        }

        let status = status_line(view);
        queue!(
            self.out,
            cursor::MoveTo(0, height.saturating_sub(2)),
            Print(status.as_str()),
            cursor::MoveTo(0, height.saturating_sub(1)),
            PrintStyledContent(HELP.dark_grey()),
        )?;
        self.out.flush()
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn pivot_column(width: u16) -> u16 {
    (width as u32 * ORP_ANCHOR_PERCENT / 100) as u16
}

fn centered(width: u16, text: &str) -> u16 {
    let cols = text.chars().count().min(width as usize) as u16;
    (width - cols) / 2
}

pub(super) fn status_line(view: &ReaderView<'_>) -> HeaplessString<STATUS_BYTES> {
    let mut line = HeaplessString::new();
    let state = match view.phase {
        PlaybackPhase::Running => "reading",
        PlaybackPhase::Idle => "paused",
        PlaybackPhase::Finished => "finished",
    };

    let _ = write!(line, "{state}  {} wpm", view.live_wpm);
    if view.warmup_active {
        let _ = write!(line, " (warmup to {})", view.target_wpm);
    }
    let _ = write!(
        line,
        "  group {}  {}%  {} left",
        view.group_size.get(),
        view.progress_pct(),
        view.time_left_label()
    );
    if view.chapter_count > 1 {
        let _ = write!(line, "  ch {}/{}", view.chapter + 1, view.chapter_count);
    }
    line
}
