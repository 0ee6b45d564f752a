//! Raw-mode console: key handling, prompt and terminal title.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, execute};

use crate::commands::{Command, parse_command};

/// What a key press did to the line being typed.
#[derive(Debug, PartialEq, Eq)]
pub enum Edit {
    Ignored,
    Typed(char),
    Erased,
    Cleared,
    Submitted(Command),
}

/// The command line being typed at the prompt.
#[derive(Debug, Default)]
pub struct LineEditor {
    line: String,
}

impl LineEditor {
    pub fn key(&mut self, key: KeyEvent) -> Edit {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.line.clear();
            return Edit::Submitted(Command::Quit);
        }

        match key.code {
            KeyCode::Enter => Edit::Submitted(parse_command(&std::mem::take(&mut self.line))),
            KeyCode::Char(c) => {
                self.line.push(c);
                Edit::Typed(c)
            }
            KeyCode::Backspace if self.line.pop().is_some() => Edit::Erased,
            KeyCode::Esc => {
                self.line.clear();
                Edit::Cleared
            }
            _ => Edit::Ignored,
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }
}

/// Read keys until a quit is submitted or the tick loop hangs up.
#[allow(clippy::print_stdout)]
pub fn read_commands(tx: Sender<Command>) {
    let mut editor = LineEditor::default();

    loop {
        if !event::poll(Duration::from_millis(50)).unwrap_or(false) {
            continue;
        }
        let Ok(Event::Key(key)) = event::read() else {
            continue;
        };

        match editor.key(key) {
            Edit::Typed(c) => print!("{c}"),
            Edit::Erased => print!("\x08 \x08"),
            Edit::Cleared => {
                clear_line();
                print_prompt();
            }
            Edit::Submitted(command) => {
                let quit = command == Command::Quit;
                if tx.send(command).is_err() || quit {
                    return;
                }
            }
            Edit::Ignored => continue,
        }
        io::stdout().flush().ok();
    }
}

#[allow(clippy::print_stdout)]
pub fn print_prompt() {
    print!("\r> ");
    io::stdout().flush().ok();
}

pub fn clear_line() {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine)
    )
    .ok();
}

#[allow(clippy::print_stdout)]
pub fn set_title(tick: u64, gates: usize) {
    print!("\x1b]0;Gate Runner - Tick: {tick} - Gates: {gates}\x07");
    io::stdout().flush().ok();
}
