mod backend;
mod channel;
mod keys;
mod logging;
mod paths;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{error, info, warn};

use pocket_config::{load_config, Config};
use pocket_display::{status_line, RefreshPlanner, RenderThrottle, Renderer};
use pocket_terminal::{GridDimensions, SharedTerminal, TerminalError, TerminalSession};

use crate::backend::CrosstermPanel;
use crate::channel::ProcessChannel;
use crate::paths::AppPaths;

const USAGE: &str = "usage: pocket [--config FILE] [COMMAND [ARGS...]]";

/// Idle wait of the feeder thread when the channel has nothing to read.
const FEED_IDLE: Duration = Duration::from_millis(5);

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
    command: Vec<String>,
    help: bool,
}

/// Options come first; the first other word starts the command.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "-c" | "--config" => {
                let file = iter.next().context("--config needs a file argument")?;
                parsed.config = Some(PathBuf::from(file));
            }
            "--" => {
                parsed.command.extend(iter);
                break;
            }
            _ => {
                if let Some(file) = arg.strip_prefix("--config=") {
                    parsed.config = Some(PathBuf::from(file));
                } else if arg.starts_with('-') && parsed.command.is_empty() {
                    bail!("unknown option: {}\n{}", arg, USAGE);
                } else {
                    parsed.command.push(arg);
                    parsed.command.extend(iter);
                    break;
                }
            }
        }
    }
    Ok(parsed)
}

fn grid_dimensions(config: &Config) -> GridDimensions {
    GridDimensions::new(
        config.terminal.cols,
        config.terminal.screen_rows,
        config.terminal.history_rows,
    )
}

fn lock_session(session: &Mutex<TerminalSession>) -> MutexGuard<'_, TerminalSession> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drain the channel into the terminal until the session ends or the app
/// stops.
fn spawn_feeder(
    session: Arc<Mutex<TerminalSession>>,
    running: Arc<AtomicBool>,
    connected: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::Acquire) {
            let result = lock_session(&session).pump();
            match result {
                Ok(0) => thread::sleep(FEED_IDLE),
                Ok(_) => {}
                Err(TerminalError::ChannelClosed) => {
                    info!("remote side closed the session");
                    break;
                }
                Err(e) => {
                    warn!("session ended: {}", e);
                    break;
                }
            }
        }
        connected.store(false, Ordering::Release);
    })
}

fn run_ui(
    config: &Config,
    terminal: &SharedTerminal,
    session: &Mutex<TerminalSession>,
    connected: &AtomicBool,
) -> Result<()> {
    let dims = terminal.dimensions();
    let mut panel = CrosstermPanel::new(dims.cols, dims.screen_rows);
    let mut renderer = Renderer::new(
        RefreshPlanner::new(config.display.full_refresh_every),
        config.display.status,
    );
    let mut throttle =
        RenderThrottle::new(Duration::from_millis(config.display.min_render_interval_ms));
    terminal.request_full_refresh();

    loop {
        if event::poll(Duration::from_millis(10))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if keys::is_quit(&key) {
                        break;
                    }
                    let bytes = keys::key_to_bytes(&key);
                    if !bytes.is_empty() && connected.load(Ordering::Acquire) {
                        if let Err(e) = lock_session(session).send(&bytes) {
                            warn!("dropping keystrokes: {}", e);
                        }
                    }
                }
                Event::Resize(..) => terminal.request_full_refresh(),
                _ => {}
            }
        }

        let now = Instant::now();
        if throttle.ready(now) && terminal.take_render_request() {
            if terminal.take_full_refresh() {
                renderer.force_full();
            }
            let snapshot = terminal.snapshot();
            let label = if connected.load(Ordering::Acquire) {
                "ON"
            } else {
                "OFF ^Q"
            };
            let status = status_line(label, &snapshot);
            if let Err(e) = renderer.render(&mut panel, &snapshot, &status) {
                error!("render error: {}", e);
            }
            throttle.mark_rendered(now);
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let paths = AppPaths::detect().context("failed to determine home directory")?;
    let mut config = load_config(&paths.config_dir(), args.config.as_deref())
        .context("failed to load configuration")?;
    if let Some((program, rest)) = args.command.split_first() {
        config.session.command = program.clone();
        config.session.args = rest.to_vec();
    }

    let log_path = logging::init(&config.log, paths.default_log_file())?;
    info!(log = %log_path.display(), "pocket starting");

    let dims = grid_dimensions(&config);
    let terminal = SharedTerminal::new(dims);
    let mut session = TerminalSession::new(terminal.clone(), config.terminal.term_type.clone());
    session
        .connect(Box::new(ProcessChannel::new(
            config.session.command.clone(),
            config.session.args.clone(),
        )))
        .with_context(|| format!("failed to start {}", config.session.command))?;

    let session = Arc::new(Mutex::new(session));
    let running = Arc::new(AtomicBool::new(true));
    let connected = Arc::new(AtomicBool::new(true));
    let feeder = spawn_feeder(session.clone(), running.clone(), connected.clone());

    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::cursor::Hide
    )?;

    let result = run_ui(&config, &terminal, &session, &connected);

    crossterm::execute!(
        std::io::stdout(),
        crossterm::cursor::Show,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    crossterm::terminal::disable_raw_mode()?;

    running.store(false, Ordering::Release);
    if feeder.join().is_err() {
        error!("feeder thread panicked");
    }
    lock_session(&session).disconnect();

    info!("pocket exited cleanly");
    result
}

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("pocket: {:#}", e);
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return;
    }

    if let Err(e) = run(args) {
        eprintln!("pocket: {:#}", e);
        std::process::exit(1);
    }
}
