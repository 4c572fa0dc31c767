//! Mood Blossom — daily ritual slot machine in the terminal
//!
//! Usage:
//!   mood-blossom play [--rounds N] [--seed S] [--turbo]
//!   mood-blossom status
//!   mood-blossom lang [KR|EN|JA]
//!   mood-blossom catalog [--category tea|activity|perfume|flower]

mod render;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use mb_core::{Catalog, Category, Language, labels};
use mb_oracle::{Curator, OracleConfig};
use mb_reels::{ReelTiming, SlotMachine, SpinPhase, SpinRejected};
use mb_state::{AdminGesture, JsonFileStore, SessionConfig, SharedStore, SystemClock, UsageGuard};

const FRAME_INTERVAL: Duration = Duration::from_millis(60);

#[derive(Parser)]
#[command(name = "mood-blossom", about = "Mood Blossom daily ritual slot machine", version)]
struct Cli {
    /// Key/value store file (defaults to the platform config dir)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spin the reels
    Play {
        /// Spins to play back to back
        #[arg(short, long, default_value_t = 1)]
        rounds: u32,

        /// Seed for reproducible draws
        #[arg(long)]
        seed: Option<u64>,

        /// Short reel animation
        #[arg(long)]
        turbo: bool,
    },
    /// Show today's energy and settings
    Status,
    /// Show or switch the display language
    Lang {
        /// KR, EN or JA
        code: Option<Language>,
    },
    /// List reel items
    Catalog {
        /// tea, activity, perfume or flower
        #[arg(short, long)]
        category: Option<String>,
    },
    #[command(hide = true)]
    Badge {
        #[arg(long, default_value_t = 1)]
        taps: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = open_store(cli.store.as_deref());

    match cli.command {
        Commands::Play {
            rounds,
            seed,
            turbo,
        } => play(store, rounds, seed, turbo).await,
        Commands::Status => status(store),
        Commands::Lang { code } => lang(store, code),
        Commands::Catalog { category } => catalog(store, category.as_deref()),
        Commands::Badge { taps } => badge(store, taps),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn open_store(path: Option<&Path>) -> SharedStore {
    match path {
        Some(path) => JsonFileStore::shared(path),
        None => Arc::new(JsonFileStore::open_default()),
    }
}

fn load_catalog() -> Result<Arc<Catalog>> {
    Ok(Arc::new(
        Catalog::builtin().context("Failed to load the built-in catalog")?,
    ))
}

fn build_machine(store: &SharedStore, seed: Option<u64>, timing: ReelTiming) -> Result<SlotMachine> {
    let language = SessionConfig::load(store.clone()).language();
    let usage = UsageGuard::load(store.clone(), Arc::new(SystemClock));
    let oracle = OracleConfig::from_env();
    log::debug!("[CLI] Oracle config: {:?}", oracle);

    let curator = Curator::from_config(&oracle);
    if !curator.is_live() {
        log::info!("[CLI] Recommendation service not live, using fallback picks");
    }

    let mut builder = SlotMachine::builder(load_catalog()?, usage)
        .timing(timing)
        .curator(curator)
        .language(language);
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    Ok(builder.build())
}

async fn play(store: SharedStore, rounds: u32, seed: Option<u64>, turbo: bool) -> Result<()> {
    let timing = if turbo {
        ReelTiming::turbo()
    } else {
        ReelTiming::normal()
    };
    let machine = build_machine(&store, seed, timing)?;
    let catalog = machine.catalog();
    let language = machine.language();
    let labels = labels(language);

    for line in render::status_lines(labels, &machine.snapshot()) {
        println!("{}", line);
    }

    for round in 1..=rounds.max(1) {
        if round > 1 {
            machine.restart()?;
            println!("\n{} ({}/{})", labels.restart, round, rounds);
        }

        let plan = match machine.request_spin() {
            Ok(plan) => plan,
            Err(SpinRejected::LimitReached) => {
                println!("\n{}. {}", labels.out_of_energy, labels.recharge_needed);
                return Ok(());
            }
            Err(e) => return Err(e).context("Spin was rejected"),
        };

        println!("\n{}", labels.spinning);
        animate(&machine, &catalog, language).await?;

        let Some(result) = machine.result() else {
            bail!("Spin {} ended without a result", plan.cycle);
        };
        println!();
        for line in render::result_lines(labels, &result) {
            println!("{}", line);
        }

        println!("\n{}", labels.loading_recommendation);
        let Some((_, recommendation)) = machine.wait_settled(plan.cycle).await else {
            bail!("Spin {} was superseded before its recommendation", plan.cycle);
        };
        for line in render::recommendation_lines(labels, &recommendation) {
            println!("{}", line);
        }

        let snapshot = machine.snapshot();
        println!(
            "\n{}",
            render::energy_line(labels, &snapshot.usage, snapshot.remaining, snapshot.limit)
        );
    }

    Ok(())
}

async fn animate(machine: &SlotMachine, catalog: &Catalog, language: Language) -> Result<()> {
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    let mut stdout = std::io::stdout();
    loop {
        ticker.tick().await;
        let spinning = machine.phase() == SpinPhase::Spinning;
        let line = render::reel_line(catalog, language, machine.reel_frame());
        write!(stdout, "\r{}", line).context("Failed to write to stdout")?;
        stdout.flush().context("Failed to flush stdout")?;
        if !spinning {
            break;
        }
    }
    writeln!(stdout).context("Failed to write to stdout")?;
    Ok(())
}

fn status(store: SharedStore) -> Result<()> {
    let language = SessionConfig::load(store.clone()).language();
    let labels = labels(language);
    let mut usage = UsageGuard::load(store, Arc::new(SystemClock));
    usage.rollover();

    let state = usage.state();
    println!("{} · {}", labels.title, labels.subtitle);
    println!(
        "{}",
        render::energy_line(labels, &state, usage.remaining(), usage.limit())
    );
    println!("{} · {} {}", state.date, language.code(), language.native_name());
    if state.limit_reached {
        println!("{}. {}", labels.out_of_energy, labels.recharge_needed);
    }
    Ok(())
}

fn lang(store: SharedStore, code: Option<Language>) -> Result<()> {
    let mut session = SessionConfig::load(store);
    if let Some(language) = code {
        session.set_language(language);
    }
    let current = session.language();
    for language in Language::ALL {
        let marker = if language == current { "*" } else { " " };
        println!("{} {} {}", marker, language.code(), language.native_name());
    }
    Ok(())
}

fn catalog(store: SharedStore, category: Option<&str>) -> Result<()> {
    let language = SessionConfig::load(store).language();
    let catalog = load_catalog()?;

    let categories: Vec<Category> = match category {
        None => Category::ALL.to_vec(),
        Some(tag) => {
            let tag = tag.trim().to_ascii_lowercase();
            match Category::ALL.iter().find(|c| c.tag() == tag) {
                Some(category) => vec![*category],
                None => bail!("Unknown category '{}' (tea, activity, perfume, flower)", tag),
            }
        }
    };

    for category in categories {
        println!("[{}]", category.tag());
        for item in catalog.items(category) {
            println!("  {:<8} {}", item.id, item.display_name(language));
        }
    }
    Ok(())
}

fn badge(store: SharedStore, taps: u32) -> Result<()> {
    let labels = labels(SessionConfig::load(store.clone()).language());
    let mut usage = UsageGuard::load(store, Arc::new(SystemClock));
    let mut gesture = AdminGesture::default();

    for _ in 0..taps {
        if gesture.tap() {
            let enabled = usage.toggle_admin();
            println!("{}", if enabled { labels.admin_on } else { labels.admin_off });
        }
    }
    log::debug!("[CLI] Badge taps pending: {}", gesture.taps());
    Ok(())
}
