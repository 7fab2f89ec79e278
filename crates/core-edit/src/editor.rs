//! The editor: configuration, the main edit loop, and read dispatch.
//!
//! The loop owns the per-line state and borrows the editor's history and
//! callbacks as disjoint fields, so there is no parent pointer between the
//! two. Keystrokes become tagged [`Command`]s first and are dispatched
//! second; the only stateful parsing is the escape disambiguation inside
//! the translator.

use crate::completion::{complete_line, CompletionFn};
use crate::error::ReadError;
use crate::history::History;
use crate::keys::{self, Command, NUL, TAB};
use crate::line::{Hint, HintsFn, LineState, RefreshCtx};
use core_term::{fdio, screen, RawMode, RuneReader};
use std::io::{self, BufRead, BufReader, Write};
use std::os::unix::io::RawFd;
use std::path::Path;
use std::time::Duration;

/// Poll cadence of [`Editor::loop_until`].
const LOOP_TIMEOUT: Duration = Duration::from_millis(10);

pub struct Editor {
    history: History,
    multiline: bool,
    completion: Option<Box<CompletionFn>>,
    hints: Option<Box<HintsFn>>,
    hotkey: Option<char>,
    /// Lazily created buffered reader for non-tty input.
    scanner: Option<io::Lines<BufReader<io::Stdin>>>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            history: History::new(),
            multiline: false,
            completion: None,
            hints: None,
            hotkey: None,
            scanner: None,
        }
    }

    /// Install the tab-completion callback: line in, candidate lines out.
    pub fn set_completion_callback(
        &mut self,
        callback: impl Fn(&str) -> Vec<String> + 'static,
    ) {
        self.completion = Some(Box::new(callback));
    }

    /// Install the hints callback consulted on every refresh.
    pub fn set_hints_callback(&mut self, callback: impl Fn(&str) -> Option<Hint> + 'static) {
        self.hints = Some(Box::new(callback));
    }

    pub fn set_multiline(&mut self, on: bool) {
        self.multiline = on;
    }

    /// A rune that terminates the line like CR but is appended to the
    /// returned string.
    pub fn set_hotkey(&mut self, key: char) {
        self.hotkey = Some(key);
    }

    pub fn history_add(&mut self, line: &str) {
        self.history.add(line);
    }

    pub fn history_set_maxlen(&mut self, maxlen: usize) {
        self.history.set_maxlen(maxlen);
    }

    pub fn history_save(&self, path: impl AsRef<Path>) {
        self.history.save(path.as_ref());
    }

    pub fn history_load(&mut self, path: impl AsRef<Path>) {
        self.history.load(path.as_ref());
    }

    /// All history entries, oldest first.
    pub fn history_list(&self) -> &[String] {
        self.history.list()
    }

    /// Read a line from stdin. Raw-mode editing when stdin is a supported
    /// terminal, plain buffered reading otherwise.
    pub fn read(&mut self, prompt: &str, init: &str) -> Result<String, ReadError> {
        if unsafe { libc::isatty(libc::STDIN_FILENO) } == 0 {
            // A file or a pipe: no editing, no prompt.
            return self.read_basic();
        }
        if screen::unsupported_term() {
            let mut out = io::stdout();
            let _ = write!(out, "{prompt}");
            let _ = out.flush();
            let result = self.read_basic();
            if matches!(result, Err(ReadError::Quit)) {
                println!();
            }
            return result;
        }
        self.read_raw(prompt, init)
    }

    fn read_raw(&mut self, prompt: &str, init: &str) -> Result<String, ReadError> {
        let raw = RawMode::enable(libc::STDIN_FILENO)?;
        let result = self.edit(libc::STDIN_FILENO, libc::STDOUT_FILENO, prompt, init);
        if let Err(err) = raw.restore() {
            tracing::warn!(target: "term.raw", %err, "restore_failed");
        }
        let _ = fdio::write_str(libc::STDOUT_FILENO, "\r\n");
        result
    }

    fn read_basic(&mut self) -> Result<String, ReadError> {
        let scanner = self
            .scanner
            .get_or_insert_with(|| BufReader::new(io::stdin()).lines());
        match scanner.next() {
            None => Err(ReadError::Quit),
            Some(Ok(line)) => Ok(line),
            Some(Err(err)) => Err(ReadError::Io(err)),
        }
    }

    /// Drive one line of raw-mode editing against explicit descriptors.
    /// The caller is responsible for the terminal mode of `ifd`.
    pub fn edit(
        &mut self,
        ifd: RawFd,
        ofd: RawFd,
        prompt: &str,
        init: &str,
    ) -> Result<String, ReadError> {
        let Editor {
            history,
            multiline,
            completion,
            hints,
            hotkey,
            ..
        } = self;
        let ctx = RefreshCtx {
            multiline: *multiline,
            hints: hints.as_deref(),
        };
        let mut ls = LineState::new(ifd, ofd, prompt);
        ls.set(init, &ctx)?;
        // The newest history entry mirrors the live buffer while the line
        // is edited; remember whether it was actually inserted so a
        // suppressed duplicate does not pop a real entry at the end.
        let live_added = history.add(&ls.as_string());
        let pop_live = |history: &mut History| {
            if live_added {
                history.pop_last();
            }
        };
        let mut reader = RuneReader::new();
        loop {
            let mut rune = reader.next_rune(ifd, None)?;
            if rune == NUL {
                continue;
            }
            if rune == TAB {
                if let Some(completion) = completion.as_deref() {
                    rune = complete_line(&mut ls, completion, &mut reader, &ctx)?;
                    if rune == NUL {
                        continue;
                    }
                }
            }
            let cmd = keys::translate(rune, *hotkey, completion.is_some(), &mut reader, ifd)?;
            match cmd {
                Command::Commit | Command::Hotkey => {
                    pop_live(history);
                    if ctx.hints.is_some() {
                        // Show the finalized line without the hint.
                        ls.refresh(&ctx.without_hints())?;
                    }
                    let mut line = ls.as_string();
                    if cmd == Command::Hotkey {
                        if let Some(key) = *hotkey {
                            line.push(key);
                        }
                    }
                    return Ok(line);
                }
                Command::AbandonLine => {
                    pop_live(history);
                    return Ok(String::new());
                }
                Command::Interrupt => return Err(ReadError::Quit),
                Command::Eof => {
                    if ls.is_empty() {
                        pop_live(history);
                        return Err(ReadError::Quit);
                    }
                    ls.delete(&ctx)?;
                }
                Command::Insert(r) => ls.insert(r, &ctx)?,
                Command::Backspace => ls.backspace(&ctx)?,
                Command::Delete => ls.delete(&ctx)?,
                Command::Swap => ls.swap(&ctx)?,
                Command::MoveLeft => ls.move_left(&ctx)?,
                Command::MoveRight => ls.move_right(&ctx)?,
                Command::MoveHome => ls.move_home(&ctx)?,
                Command::MoveEnd => ls.move_end(&ctx)?,
                Command::DeleteLine => ls.delete_line(&ctx)?,
                Command::DeleteToEnd => ls.delete_to_end(&ctx)?,
                Command::DeletePrevWord => ls.delete_prev_word(&ctx)?,
                Command::HistoryPrev => {
                    let current = ls.as_string();
                    let line = history.prev(&mut ls.history_idx, &current);
                    ls.set(&line, &ctx)?;
                }
                Command::HistoryNext => {
                    let current = ls.as_string();
                    let line = history.next(&mut ls.history_idx, &current);
                    ls.set(&line, &ctx)?;
                }
                Command::ClearScreen => {
                    screen::clear_screen(ofd)?;
                    ls.refresh(&ctx)?;
                }
                Command::Complete | Command::Ignore => {}
            }
        }
    }

    /// Call `body` repeatedly until it returns true (completed) or the
    /// user presses `exit_key` (cancelled, returns false). The keyboard is
    /// checked once per iteration with a 10 ms window, so the cadence is
    /// set by `body` itself.
    pub fn loop_until(&mut self, mut body: impl FnMut() -> bool, exit_key: char) -> bool {
        let raw = match RawMode::enable(libc::STDIN_FILENO) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!(target: "term.raw", %err, "enable_failed");
                return false;
            }
        };
        let mut reader = RuneReader::new();
        let completed = loop {
            match reader.next_rune(libc::STDIN_FILENO, Some(LOOP_TIMEOUT)) {
                Ok(rune) if rune == exit_key => break false,
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(target: "term.raw", %err, "loop_read_error");
                    break false;
                }
            }
            if body() {
                break true;
            }
        };
        if let Err(err) = raw.restore() {
            tracing::warn!(target: "term.raw", %err, "restore_failed");
        }
        completed
    }

    /// Modal debug pump: print each rune received as `'<glyph>' 0x<hex>
    /// (<dec>)` until the last four runes spell `quit`.
    pub fn print_keycodes(&mut self) {
        println!("Key code debugging mode. Type 'quit' to exit.");
        let raw = match RawMode::enable(libc::STDIN_FILENO) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!(target: "term.raw", %err, "enable_failed");
                return;
            }
        };
        let mut reader = RuneReader::new();
        let mut tail = [NUL; 4];
        loop {
            let rune = match reader.next_rune(libc::STDIN_FILENO, None) {
                Ok(rune) => rune,
                Err(err) => {
                    tracing::warn!(target: "term.raw", %err, "keycode_read_error");
                    break;
                }
            };
            if rune == NUL {
                continue;
            }
            let glyph = if rune.is_control() {
                match rune {
                    keys::CR => "\\r".to_string(),
                    keys::TAB => "\\t".to_string(),
                    keys::ESC => "ESC".to_string(),
                    keys::LF => "\\n".to_string(),
                    keys::BS => "BS".to_string(),
                    _ => "?".to_string(),
                }
            } else {
                rune.to_string()
            };
            let line = format!("'{}' 0x{:x} ({})\r\n", glyph, rune as u32, rune as u32);
            if fdio::write_str(libc::STDOUT_FILENO, &line).is_err() {
                break;
            }
            tail.rotate_left(1);
            tail[3] = rune;
            if tail == ['q', 'u', 'i', 't'] {
                break;
            }
        }
        if let Err(err) = raw.restore() {
            tracing::warn!(target: "term.raw", %err, "restore_failed");
        }
    }
}
