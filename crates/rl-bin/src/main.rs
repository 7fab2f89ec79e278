//! runeline demo shell entrypoint: a small hierarchical CLI exercising
//! the line editor (completion, history, hints-free editing, the
//! hotkey-driven help and the Ctrl-D-exitable loop helper).

mod config;

use anyhow::Result;
use clap::Parser;
use core_edit::keys;
use core_menu::{Cli, Help, Menu, MenuItem, User, HISTORY_HELP};
use std::io::Write;
use std::time::Duration;
use tracing::info;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "runeline", version, about = "runeline demo CLI")]
struct Args {
    /// Configuration file path (overrides discovery of `runeline.toml`).
    #[arg(long = "config")]
    config: Option<std::path::PathBuf>,
    /// Force multiline editing regardless of the config file.
    #[arg(long)]
    multiline: bool,
    /// Run the keycode debug pump instead of the shell.
    #[arg(long)]
    keycodes: bool,
}

/// Writes straight to stdout; the demo has no richer UI.
struct Console;

impl User for Console {
    fn put(&mut self, s: &str) {
        let mut out = std::io::stdout();
        let _ = out.write_all(s.as_bytes());
        let _ = out.flush();
    }
}

// ---------------------------------------------------------------------------
// Leaf commands
// ---------------------------------------------------------------------------

const ARGUMENT_HELP: &[Help] = &[
    Help {
        parm: "arg0",
        descr: "arg0 description",
    },
    Help {
        parm: "arg1",
        descr: "arg1 description",
    },
];

fn cmd_help(cli: &mut Cli, _args: &[String]) {
    cli.general_help();
}

fn cmd_history(cli: &mut Cli, args: &[String]) {
    let line = cli.display_history(args);
    cli.set_line(&line);
}

fn cmd_exit(cli: &mut Cli, _args: &[String]) {
    cli.exit();
}

/// Demonstrates the hotkey-exitable loop: counts at ~2 Hz until done or
/// Ctrl-D.
fn cmd_count(cli: &mut Cli, args: &[String]) {
    let limit = match args.first() {
        Some(arg) => match arg.parse::<usize>() {
            Ok(n) if (1..=1000).contains(&n) => n,
            _ => {
                cli.put("invalid argument\n");
                return;
            }
        },
        None => 10,
    };
    cli.put("counting... Ctrl-D to stop\n");
    let mut index = 0;
    cli.loop_until(
        move || {
            // Raw mode is active inside the loop helper: CRLF line ends.
            print!("count {index}/{limit}\r\n");
            let _ = std::io::stdout().flush();
            std::thread::sleep(Duration::from_millis(500));
            index += 1;
            index > limit
        },
        keys::CTRL_D,
    );
}

fn cmd_echo(cli: &mut Cli, args: &[String]) {
    cli.put(&format!("args: {args:?}\n"));
}

fn demo_menu() -> Menu {
    let amenu = Menu::new(vec![
        MenuItem::leaf_with_help("a0", "a0 function description", cmd_echo, ARGUMENT_HELP),
        MenuItem::leaf_with_help("a1", "a1 function description", cmd_echo, ARGUMENT_HELP),
        MenuItem::leaf("a2", "a2 function description", cmd_echo),
    ]);
    let bmenu = Menu::new(vec![
        MenuItem::leaf_with_help("b0", "b0 function description", cmd_echo, ARGUMENT_HELP),
        MenuItem::leaf("b1", "b1 function description", cmd_echo),
    ]);
    Menu::new(vec![
        MenuItem::submenu("amenu", amenu, "menu a functions"),
        MenuItem::submenu("bmenu", bmenu, "menu b functions"),
        MenuItem::leaf("count", "loop demo (Ctrl-D exits)", cmd_count),
        MenuItem::leaf("exit", "exit application", cmd_exit),
        MenuItem::leaf("help", "general help", cmd_help),
        MenuItem::leaf_with_help("history", "command history", cmd_history, HISTORY_HELP),
    ])
}

fn main() -> Result<()> {
    // File logging: the terminal is busy rendering the edit line.
    let file_appender = tracing_appender::rolling::never(".", "runeline.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .init();
    info!(target: "runtime", "startup");

    // Log panics before the raw-mode guard unwinds and restores the tty.
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!(target: "runtime.panic", ?panic_info, "panic");
        default_panic(panic_info);
    }));

    let args = Args::parse();
    let cfg = config::load_from(args.config.clone())?;

    if args.keycodes {
        core_edit::Editor::new().print_keycodes();
        return Ok(());
    }

    let mut cli = Cli::new(Box::new(Console));
    cli.set_prompt(&cfg.editor.prompt);
    cli.set_root(demo_menu());
    cli.editor_mut()
        .set_multiline(cfg.editor.multiline || args.multiline);
    cli.editor_mut().history_set_maxlen(cfg.history.maxlen);
    cli.history_load(&cfg.history.file);

    while cli.running() {
        cli.run();
    }

    cli.history_save(&cfg.history.file);
    info!(target: "runtime", "shutdown");
    Ok(())
}
