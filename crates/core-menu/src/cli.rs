//! Parse-and-dispatch over the command tree.

use crate::complete::completions_for;
use crate::menu::{Help, Leaf, Menu, MenuItem, MenuNode, User, CR_HELP, GENERAL_HELP};
use crate::table::table_string;
use core_edit::{Editor, ReadError};
use core_text::str_width;
use std::path::Path;
use std::rc::Rc;

/// Parse `arg` as an integer in `base` and check it against inclusive
/// `limits`; complains to the user and returns `None` otherwise.
pub fn int_arg(user: &mut dyn User, arg: &str, limits: (i64, i64), base: u32) -> Option<i64> {
    match i64::from_str_radix(arg, base) {
        Ok(value) if value >= limits.0 && value <= limits.1 => Some(value),
        _ => {
            user.put("invalid argument\n");
            None
        }
    }
}

/// How one command token resolved against the current menu level.
enum Resolution {
    Unknown,
    Ambiguous,
    Sub(Rc<Menu>),
    Leaf(Leaf, &'static [Help]),
}

pub struct Cli {
    user: Box<dyn User>,
    editor: Editor,
    root: Rc<Menu>,
    /// Seed for the next read: set by leaves (history recall) and by the
    /// help paths that hand the line back minus its `?`.
    next_line: String,
    prompt: String,
    running: bool,
}

impl Cli {
    pub fn new(user: Box<dyn User>) -> Self {
        let mut editor = Editor::new();
        // '?' terminates the line so help can react to it in place.
        editor.set_hotkey('?');
        Self {
            user,
            editor,
            root: Rc::new(Menu::new(Vec::new())),
            next_line: String::new(),
            prompt: "> ".to_string(),
            running: true,
        }
    }

    /// Install the command tree and wire tab completion to it.
    pub fn set_root(&mut self, root: Menu) {
        let root = Rc::new(root);
        self.root = Rc::clone(&root);
        self.editor
            .set_completion_callback(move |line| completions_for(&root, line));
    }

    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    /// Seed the next command line (used by history recall).
    pub fn set_line(&mut self, line: &str) {
        self.next_line = line.to_string();
    }

    pub fn put(&mut self, s: &str) {
        self.user.put(s);
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn history_load(&mut self, path: impl AsRef<Path>) {
        self.editor.history_load(path);
    }

    pub fn history_save(&self, path: impl AsRef<Path>) {
        self.editor.history_save(path);
    }

    /// Pass-through to the editor's hotkey-exitable loop helper.
    pub fn loop_until(&mut self, body: impl FnMut() -> bool, exit_key: char) -> bool {
        self.editor.loop_until(body, exit_key)
    }

    pub fn general_help(&mut self) {
        self.display_function_help(GENERAL_HELP);
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn exit(&mut self) {
        self.running = false;
    }

    /// Read one line (seeded with any recycled content) and process it.
    /// Ctrl-C / Ctrl-D stop the interpreter.
    pub fn run(&mut self) {
        let init = std::mem::take(&mut self.next_line);
        match self.editor.read(&self.prompt, &init) {
            Ok(line) => {
                self.next_line = self.parse_cmdline(&line);
            }
            Err(ReadError::Quit) => {
                self.running = false;
            }
            Err(err) => {
                tracing::error!(target: "cli", %err, "read_failed");
                self.running = false;
            }
        }
    }

    /// Parse and dispatch one command line; returns the seed for the next
    /// line (usually empty, non-empty for help replays and recall).
    pub fn parse_cmdline(&mut self, line: &str) -> String {
        let cmd_list: Vec<String> = line
            .split(' ')
            .filter(|tok| !tok.is_empty())
            .map(String::from)
            .collect();
        if cmd_list.is_empty() {
            return String::new();
        }
        let mut menu = Rc::clone(&self.root);
        for (idx, cmd) in cmd_list.iter().enumerate() {
            // Trailing '?' asks for help at this menu level and replays
            // the line without it.
            if let Some(prefix) = cmd.strip_suffix('?') {
                self.command_help(prefix, &menu);
                return line[..line.len() - 1].to_string();
            }
            let resolution = resolve(&menu, cmd);
            match resolution {
                Resolution::Unknown => {
                    self.display_error("unknown command", &cmd_list, idx);
                    // Keep the junk available for editing.
                    self.editor.history_add(line.trim());
                    return String::new();
                }
                Resolution::Ambiguous => {
                    self.display_error("ambiguous command", &cmd_list, idx);
                    return String::new();
                }
                Resolution::Sub(sub) => {
                    menu = sub;
                }
                Resolution::Leaf(leaf, help) => {
                    let args: Vec<String> = cmd_list[idx + 1..].to_vec();
                    if let Some(last) = args.last() {
                        if last.ends_with('?') {
                            self.function_help(help);
                            return line[..line.len() - 1].to_string();
                        }
                    }
                    (leaf.func)(self, &args);
                    if !self.next_line.is_empty() {
                        return std::mem::take(&mut self.next_line);
                    }
                    self.editor.history_add(line.trim());
                    return String::new();
                }
            }
        }
        // Ran out of tokens inside the tree: the path so far is valid but
        // names no function.
        self.put("additional input needed\n");
        line.to_string()
    }

    /// Display the history, or return a recalled entry as the next line.
    pub fn display_history(&mut self, args: &[String]) -> String {
        let count = self.editor.history_list().len();
        if args.len() == 1 {
            let limits = (0, count as i64 - 1);
            let Some(idx) = int_arg(self.user.as_mut(), &args[0], limits, 10) else {
                return String::new();
            };
            let entry = self.editor.history_list()[count - 1 - idx as usize].clone();
            // The editor stashes the live buffer as a history entry, which
            // it can only do when it is unique; stored entries were trimmed
            // on add, so a trailing space cannot collide with one.
            return format!("{entry} ");
        }
        if count == 0 {
            self.put("no history\n");
            return String::new();
        }
        let listing = self
            .editor
            .history_list()
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{:<3}: {}", count - i - 1, entry))
            .collect::<Vec<_>>()
            .join("\n")
            + "\n";
        self.put(&listing);
        String::new()
    }

    /// Point at the offending token with a caret marker line.
    fn display_error(&mut self, msg: &str, cmds: &[String], idx: usize) {
        let marker: Vec<String> = cmds
            .iter()
            .enumerate()
            .map(|(i, cmd)| {
                let width = str_width(cmd);
                if i == idx {
                    "^".repeat(width)
                } else {
                    " ".repeat(width)
                }
            })
            .collect();
        let out = format!("{}\n{}\n{}\n", msg, cmds.join(" "), marker.join(" "));
        self.put(&out);
    }

    /// Help for every item at `menu` whose name begins with `cmd`.
    fn command_help(&mut self, cmd: &str, menu: &Menu) {
        let rows: Vec<Vec<String>> = menu
            .items()
            .iter()
            .filter(|item| item.name.starts_with(cmd))
            .map(|item| {
                let descr = match &item.node {
                    MenuNode::Sub { descr, .. } => *descr,
                    MenuNode::Leaf { leaf, .. } => leaf.descr,
                };
                vec![
                    "  ".to_string(),
                    item.name.to_string(),
                    format!(": {}", descr),
                ]
            })
            .collect();
        self.put(&(table_string(&rows, Some(&[0, 16, 0]), 1) + "\n"));
    }

    /// Argument help for a leaf (its own table, or the generic one).
    fn function_help(&mut self, help: &'static [Help]) {
        let help = if help.is_empty() { CR_HELP } else { help };
        self.display_function_help(help);
    }

    fn display_function_help(&mut self, help: &[Help]) {
        let rows: Vec<Vec<String>> = help
            .iter()
            .map(|entry| {
                let descr = if entry.parm.is_empty() {
                    format!("  {}", entry.descr)
                } else {
                    format!(": {}", entry.descr)
                };
                vec!["   ".to_string(), entry.parm.to_string(), descr]
            })
            .collect();
        self.put(&(table_string(&rows, Some(&[0, 16, 0]), 1) + "\n"));
    }
}

/// Match one token at a menu level: an exact name wins outright, a unique
/// prefix is accepted as an abbreviation.
fn resolve(menu: &Menu, cmd: &str) -> Resolution {
    let mut matches: Vec<&MenuItem> = Vec::new();
    let mut exact: Option<&MenuItem> = None;
    for item in menu.items() {
        if item.name == cmd {
            exact = Some(item);
            break;
        }
        if item.name.starts_with(cmd) {
            matches.push(item);
        }
    }
    let chosen = match exact {
        Some(item) => item,
        None => match matches.len() {
            0 => return Resolution::Unknown,
            1 => matches[0],
            _ => return Resolution::Ambiguous,
        },
    };
    match &chosen.node {
        MenuNode::Sub { menu: sub, .. } => Resolution::Sub(Rc::clone(sub)),
        MenuNode::Leaf { leaf, help } => Resolution::Leaf(*leaf, *help),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc as StdRc;

    /// Captures everything `put` to it for assertions.
    #[derive(Clone, Default)]
    struct Recorder {
        out: StdRc<RefCell<String>>,
    }

    impl User for Recorder {
        fn put(&mut self, s: &str) {
            self.out.borrow_mut().push_str(s);
        }
    }

    thread_local! {
        static CALLS: RefCell<Vec<(String, Vec<String>)>> = RefCell::new(Vec::new());
    }

    fn record_call(name: &str, args: &[String]) {
        CALLS.with(|calls| calls.borrow_mut().push((name.to_string(), args.to_vec())));
    }

    fn take_calls() -> Vec<(String, Vec<String>)> {
        CALLS.with(|calls| calls.borrow_mut().drain(..).collect())
    }

    fn a0(_cli: &mut Cli, args: &[String]) {
        record_call("a0", args);
    }

    fn b0(_cli: &mut Cli, args: &[String]) {
        record_call("b0", args);
    }

    fn recall(cli: &mut Cli, args: &[String]) {
        let line = cli.display_history(args);
        cli.set_line(&line);
    }

    const ARG_HELP: &[Help] = &[Help {
        parm: "arg0",
        descr: "arg0 description",
    }];

    fn cli() -> (Cli, StdRc<RefCell<String>>) {
        let recorder = Recorder::default();
        let out = recorder.out.clone();
        let mut cli = Cli::new(Box::new(recorder));
        let amenu = Menu::new(vec![
            MenuItem::leaf_with_help("a0", "a0 function", a0, ARG_HELP),
            MenuItem::leaf("a1", "a1 function", a0),
        ]);
        cli.set_root(Menu::new(vec![
            MenuItem::submenu("amenu", amenu, "menu a functions"),
            MenuItem::leaf("back", "b0 function", b0),
            MenuItem::leaf("ball", "another b", b0),
            MenuItem::leaf_with_help("history", "command history", recall, crate::HISTORY_HELP),
        ]));
        take_calls();
        (cli, out)
    }

    #[test]
    fn dispatches_leaf_with_args() {
        let (mut cli, _out) = cli();
        let next = cli.parse_cmdline("amenu a0 x y");
        assert_eq!(next, "");
        assert_eq!(
            take_calls(),
            vec![("a0".to_string(), vec!["x".to_string(), "y".to_string()])]
        );
        // The dispatched line entered history.
        assert_eq!(cli.editor_mut().history_list(), ["amenu a0 x y"]);
    }

    #[test]
    fn abbreviations_resolve_when_unique() {
        let (mut cli, _out) = cli();
        cli.parse_cmdline("am a0");
        assert_eq!(take_calls().len(), 1);
    }

    #[test]
    fn unknown_command_marks_the_token() {
        let (mut cli, out) = cli();
        let next = cli.parse_cmdline("amenu zz");
        assert_eq!(next, "");
        let text = out.borrow().clone();
        assert!(text.contains("unknown command"), "{text}");
        assert!(text.contains("amenu zz"), "{text}");
        assert!(text.contains("      ^^"), "{text}");
        // The junk line is kept for editing.
        assert_eq!(cli.editor_mut().history_list(), ["amenu zz"]);
    }

    #[test]
    fn ambiguous_command_marks_the_token() {
        let (mut cli, out) = cli();
        cli.parse_cmdline("ba");
        let text = out.borrow().clone();
        assert!(text.contains("ambiguous command"), "{text}");
        assert!(text.contains("^^"), "{text}");
        assert!(take_calls().is_empty());
    }

    #[test]
    fn exact_match_beats_longer_names() {
        let recorder = Recorder::default();
        let mut cli = Cli::new(Box::new(recorder));
        cli.set_root(Menu::new(vec![
            MenuItem::leaf("show", "show things", a0),
            MenuItem::leaf("showall", "show everything", b0),
        ]));
        take_calls();
        cli.parse_cmdline("show");
        assert_eq!(take_calls(), vec![("a0".to_string(), vec![])]);
    }

    #[test]
    fn trailing_question_shows_level_help_and_replays() {
        let (mut cli, out) = cli();
        let next = cli.parse_cmdline("amenu ?");
        // The '?' token is stripped and the line replayed without it.
        assert_eq!(next, "amenu ");
        let text = out.borrow().clone();
        assert!(text.contains("a0"), "{text}");
        assert!(text.contains("a1"), "{text}");
        assert!(take_calls().is_empty());
    }

    #[test]
    fn leaf_argument_help() {
        let (mut cli, out) = cli();
        let next = cli.parse_cmdline("amenu a0 ?");
        assert_eq!(next, "amenu a0 ");
        let text = out.borrow().clone();
        assert!(text.contains("arg0 description"), "{text}");
        assert!(take_calls().is_empty());
    }

    #[test]
    fn leaf_without_help_gets_generic_cr_help() {
        let (mut cli, out) = cli();
        cli.parse_cmdline("amenu a1 ?");
        let text = out.borrow().clone();
        assert!(text.contains("perform the function"), "{text}");
    }

    #[test]
    fn bare_submenu_needs_more_input() {
        let (mut cli, out) = cli();
        let next = cli.parse_cmdline("amenu");
        assert_eq!(next, "amenu");
        assert!(out.borrow().contains("additional input needed"));
    }

    #[test]
    fn empty_line_is_quietly_accepted() {
        let (mut cli, out) = cli();
        assert_eq!(cli.parse_cmdline("   "), "");
        assert!(out.borrow().is_empty());
    }

    #[test]
    fn history_listing_and_recall() {
        let (mut cli, out) = cli();
        cli.parse_cmdline("amenu a0");
        cli.parse_cmdline("back");
        take_calls();
        // Listing.
        let next = cli.parse_cmdline("history");
        assert_eq!(next, "");
        let text = out.borrow().clone();
        assert!(text.contains("1  : amenu a0"), "{text}");
        assert!(text.contains("0  : back"), "{text}");
        // The listing command itself entered history, so the oldest entry
        // is now index 2. The recalled line comes back as the next seed
        // with its disambiguating trailing space.
        let next = cli.parse_cmdline("history 2");
        assert_eq!(next, "amenu a0 ");
    }

    #[test]
    fn history_recall_rejects_bad_index() {
        let (mut cli, out) = cli();
        cli.parse_cmdline("back");
        let next = cli.parse_cmdline("history 7");
        assert_eq!(next, "");
        assert!(out.borrow().contains("invalid argument"));
    }

    #[test]
    fn int_arg_checks_limits() {
        let mut rec = Recorder::default();
        assert_eq!(int_arg(&mut rec, "5", (0, 9), 10), Some(5));
        assert_eq!(int_arg(&mut rec, "12", (0, 9), 10), None);
        assert_eq!(int_arg(&mut rec, "xyz", (0, 9), 10), None);
        assert_eq!(int_arg(&mut rec, "ff", (0, 255), 16), Some(255));
    }
}
