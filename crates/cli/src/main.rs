use anyhow::{Context, Result};
use bingo_autoplay::{
    run_batch, simulate, write_json, AutoplayConfig, SimulationTrace, StopCondition,
};
use bingo_core::{
    validate_card_count, Card, CardGenerator, CardLayout, RoundConfig, RoundToken, CARD_COLS,
    CARD_ROWS,
};
use bingo_cui::LaunchOptions;
use bingo_data::load_round_config_or_default;
use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Seeded bingo rounds from the terminal
#[derive(Parser)]
#[command(name = "bingo")]
#[command(about = "Seeded bingo rounds: tickets, headless simulation and an interactive board")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Round configuration file (defaults to $BINGO_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tickets dealt for one round
    Cards {
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of tickets (defaults to the config's card count)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Round token the tickets belong to
        #[arg(short, long, default_value = "1")]
        token: u64,

        /// Five numbers on every row, whatever the config's layout
        #[arg(short, long)]
        balanced: bool,

        /// Print JSON instead of grids
        #[arg(long)]
        json: bool,
    },

    /// Play one round on a virtual clock and print its trace
    Simulate {
        #[arg(short, long)]
        seed: Option<u64>,

        /// line, full-house or exhausted
        #[arg(short, long, default_value = "full-house")]
        until: StopCondition,

        /// Pause once this many numbers have been called
        #[arg(long)]
        pause_after: Option<usize>,

        /// How long the scripted pause lasts
        #[arg(long, default_value = "3000")]
        pause_ms: u64,

        /// Pretty-print the JSON trace
        #[arg(short, long)]
        pretty: bool,

        /// Print a readable report instead of JSON
        #[arg(long)]
        text: bool,

        /// Also write the JSON trace to this file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Play many rounds on consecutive seeds and summarize them
    Batch {
        #[arg(short, long)]
        seed: Option<u64>,

        #[arg(short, long, default_value = "100")]
        rounds: u32,

        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Open the interactive terminal board. It logs only to $BINGO_LOG;
    /// -v raises that file's level to debug.
    Play {
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let Cli {
        command,
        config,
        verbose,
    } = Cli::parse();

    // The board owns the terminal, so it sets up its own file logging.
    if !matches!(command, Commands::Play { .. }) {
        init_logging(verbose);
    }

    match command {
        Commands::Cards {
            seed,
            count,
            token,
            balanced,
            json,
        } => {
            let round = load_round_config_or_default(config.as_deref())?;
            let plan = plan_cards(&round, seed, count, balanced)?;
            print_cards(&plan, RoundToken(token), json)
        }
        Commands::Simulate {
            seed,
            until,
            pause_after,
            pause_ms,
            pretty,
            text,
            out,
        } => {
            let mut config = autoplay_config(config.as_deref(), seed)?;
            config.stop = until;
            config.pause_after_calls = pause_after;
            config.pause_ms = pause_ms;
            let trace = simulate(config).context("simulate round")?;
            if let Some(path) = out.as_ref() {
                write_json(path, &trace)
                    .with_context(|| format!("write trace to {}", path.display()))?;
            }
            print_trace(&trace, pretty, text)
        }
        Commands::Batch { seed, rounds, json } => {
            let config = autoplay_config(config.as_deref(), seed)?;
            let summary = run_batch(&config, rounds).context("run batch")?;
            if json {
                print_json(&summary, true)
            } else {
                println!("{}", summary.to_text_report());
                Ok(())
            }
        }
        Commands::Play { seed } => bingo_cui::run(LaunchOptions {
            seed,
            config,
            verbose,
        }),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn autoplay_config(path: Option<&Path>, seed: Option<u64>) -> Result<AutoplayConfig> {
    let round = load_round_config_or_default(path)?;
    Ok(build_autoplay_config(round, seed))
}

/// An explicit seed wins over the config file's, which wins over the default.
fn build_autoplay_config(round: RoundConfig, seed: Option<u64>) -> AutoplayConfig {
    let defaults = AutoplayConfig::default();
    let seed = seed.or(round.seed).unwrap_or(defaults.seed);
    debug!("autoplay seed {seed} with {round:?}");
    AutoplayConfig {
        seed,
        round,
        ..defaults
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CardsPlan {
    seed: u64,
    count: usize,
    layout: CardLayout,
}

/// Flags win over the round config; the seed falls back to the default.
fn plan_cards(
    round: &RoundConfig,
    seed: Option<u64>,
    count: Option<usize>,
    balanced: bool,
) -> Result<CardsPlan> {
    let count = validate_card_count(count.unwrap_or(round.card_count))?;
    let layout = if balanced {
        CardLayout::Balanced
    } else {
        round.card_layout
    };
    Ok(CardsPlan {
        seed: seed
            .or(round.seed)
            .unwrap_or(AutoplayConfig::default().seed),
        count,
        layout,
    })
}

fn print_cards(plan: &CardsPlan, token: RoundToken, json: bool) -> Result<()> {
    let generator = CardGenerator::new(plan.layout);
    let cards: Vec<Card> = (0..plan.count)
        .map(|ticket| generator.ticket(plan.seed, token, ticket))
        .collect();
    if json {
        return print_json(&cards, true);
    }
    for (ticket, card) in cards.iter().enumerate() {
        println!("ticket {} (seed {}, round {token})", ticket + 1, plan.seed);
        println!("{}", format_card(card));
    }
    Ok(())
}

fn format_card(card: &Card) -> String {
    (0..CARD_ROWS)
        .map(|row| {
            (0..CARD_COLS)
                .map(|col| match card.cell(row, col).number() {
                    Some(n) => format!("{n:>2}"),
                    None => " .".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_trace(trace: &SimulationTrace, pretty: bool, text: bool) -> Result<()> {
    if text {
        println!("{}", trace.to_text_report());
        return Ok(());
    }
    print_json(trace, pretty)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let body = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("serialize output")?;
    println!("{body}");
    Ok(())
}
