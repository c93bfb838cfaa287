mod actions;
mod app;
mod input;
mod view;

use anyhow::{Context, Result};
use app::{App, DEFAULT_SEED};
use bingo_data::load_round_config_or_default;
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use env_logger::{Env, Target};
use log::info;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs::File;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
    /// Debug-level records in the `$BINGO_LOG` file.
    pub verbose: bool,
}

pub fn run(options: LaunchOptions) -> Result<()> {
    init_file_logging(options.verbose)?;
    let config = load_round_config_or_default(options.config.as_deref())?;
    let seed = options
        .seed
        .or(config.seed)
        .unwrap_or_else(seed_from_clock);
    info!("starting terminal round with seed {seed}");
    let mut app = App::bootstrap(config, seed)?;

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    run(parse_options(args))
}

fn parse_options(args: &[String]) -> LaunchOptions {
    let mut seed = None;
    let mut config = None;
    let mut verbose = false;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--config" | "-c" => {
                if let Some(value) = args.get(idx + 1) {
                    config = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--verbose" | "-v" => verbose = true,
            _ => {}
        }
        idx += 1;
    }
    LaunchOptions {
        seed,
        config,
        verbose,
    }
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(tick_rate)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = input::map_key(key);
                actions::dispatch(app, action);
            }
        }
        app.on_tick();
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "bingo-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}

/// Log records would tear the alternate screen, so they go to `$BINGO_LOG`
/// or nowhere.
fn init_file_logging(verbose: bool) -> Result<()> {
    let Some(path) = std::env::var_os("BINGO_LOG") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("create log file {}", PathBuf::from(&path).display()))?;
    let filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("init logger")?;
    Ok(())
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(DEFAULT_SEED)
}
