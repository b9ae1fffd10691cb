//! jotter entrypoint: CLI, logging, terminal session and the event loop.

mod clipboard;
mod files;
mod input;
mod render;
mod terminal;

use anyhow::Result;
use clap::Parser;
use core_actions::{DispatchResult, Editor, StatusMessage, settings_from_config};
use crossterm::event::{self, Event};
use files::FsDocumentProvider;
use render::View;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::{Duration, Instant};
use terminal::TerminalGuard;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "jotter.log";
/// Poll interval while nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "jotter", version, about = "Modal terminal editor for notes")]
struct Args {
    /// File to open. A path that does not exist yet is created on `:w`.
    pub path: Option<PathBuf>,
    /// Configuration file (overrides discovery of `jotter.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            // Leave the alternate screen first so the report stays visible.
            let _ = terminal::restore();
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

/// Screen state owned by the event loop.
struct Session {
    view: View,
    message: Option<StatusMessage>,
    width: u16,
    height: u16,
    redraw: bool,
}

impl Session {
    /// Fold one dispatch result into the screen state. Returns `true` to quit.
    fn absorb(&mut self, result: DispatchResult) -> bool {
        if let Some(status) = result.status {
            self.message = Some(status);
            self.redraw = true;
        } else if result.dirty {
            self.message = None;
        }
        self.redraw |= result.dirty;
        result.quit
    }

    fn draw(&mut self, editor: &mut Editor, out: &mut impl std::io::Write) -> Result<()> {
        let state = editor.state();
        let gutter = render::gutter_width(&state.document.buffer, state.settings.line_numbers);
        editor.set_text_width(usize::from(self.width).saturating_sub(gutter));
        let frame = render::layout(
            editor,
            &mut self.view,
            self.width,
            self.height,
            self.message.as_ref(),
        );
        render::draw(out, &frame)?;
        self.redraw = false;
        Ok(())
    }
}

fn run(editor: &mut Editor, message: Option<StatusMessage>) -> Result<()> {
    let mut out = stdout();
    let (width, height) = crossterm::terminal::size()?;
    let mut session = Session {
        view: View::default(),
        message,
        width,
        height,
        redraw: true,
    };
    loop {
        if session.redraw {
            session.draw(editor, &mut out)?;
        }
        let timeout = editor
            .deferred_due()
            .map_or(IDLE_POLL, |due| due.saturating_duration_since(Instant::now()));
        if !event::poll(timeout)? {
            if editor.deferred_due().is_some_and(|due| due <= Instant::now()) {
                let result = editor.fire_deferred();
                if session.absorb(result) {
                    break;
                }
            }
            continue;
        }
        match event::read()? {
            Event::Key(raw) => {
                let Some(key) = input::map_key_event(&raw) else {
                    continue;
                };
                let result = editor.handle_key(&key);
                if session.absorb(result) {
                    info!(target: "runtime", "quit");
                    break;
                }
            }
            Event::Resize(w, h) => {
                session.width = w;
                session.height = h;
                session.redraw = true;
            }
            Event::FocusGained => editor.set_focused(true),
            Event::FocusLost => editor.set_focused(false),
            _ => {}
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();

    let config = core_config::load_from(args.config.clone())?;
    let settings = settings_from_config(&config);
    let mut editor = Editor::new(
        settings,
        clipboard::open_clipboard(),
        Box::new(FsDocumentProvider),
    );
    let message = args.path.map(|path| editor.open(path)).and_then(|r| r.status);
    info!(
        target: "runtime",
        config_override = args.config.is_some(),
        "startup"
    );

    let mut guard = TerminalGuard::enter("jotter")?;
    let result = run(&mut editor, message);
    guard.leave()?;
    result
}
