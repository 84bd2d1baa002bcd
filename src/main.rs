//! Organ Bath Simulator - Entry point
//!
//! Headless diagnostics for the pharmacology engine.
//!
//! CLI Usage:
//!   cargo run                              # Dose-response table for every stock drug
//!   cargo run -- --session -n 10           # Record 10 samples while dosing the Unknown
//!   cargo run -- --seed 7 --export out     # Fixed unknown, write CSV + answer JSON
//!   cargo run -- --restore out/answer.json --guess 2 0.85

use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use organ_bath_simulator::{
    config::ExperimentParameters,
    export::{export_series_csv, load_answer_json, persist_answer_to},
    lock_experiment, share, AnswerGuess, AnswerOutcome, ExperimentState, Sampler,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const DEFAULT_PARAMS_PATH: &str = "data/parameters/experiment.json";

/// Parsed command line
struct CliArgs {
    session: bool,
    samples: usize,
    doses: usize,
    seed: Option<u64>,
    params: PathBuf,
    export_dir: Option<PathBuf>,
    restore: Option<PathBuf>,
    guess: Option<(usize, f64)>,
}

/// Parse CLI arguments
fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        session: false,
        samples: 8,
        doses: 6,
        seed: None,
        params: PathBuf::from(DEFAULT_PARAMS_PATH),
        export_dir: None,
        restore: None,
        guess: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--session" | "-s" => cli.session = true,
            "-n" | "--samples" => {
                i += 1;
                if i < args.len() {
                    cli.samples = args[i].parse().unwrap_or(8);
                }
            }
            "--doses" => {
                i += 1;
                if i < args.len() {
                    cli.doses = args[i].parse().unwrap_or(6);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().ok();
                }
            }
            "--params" => {
                i += 1;
                if i < args.len() {
                    cli.params = PathBuf::from(&args[i]);
                }
            }
            "--export" => {
                i += 1;
                if i < args.len() {
                    cli.export_dir = Some(PathBuf::from(&args[i]));
                }
            }
            "--restore" => {
                i += 1;
                if i < args.len() {
                    cli.restore = Some(PathBuf::from(&args[i]));
                }
            }
            "--guess" => {
                if i + 2 < args.len() {
                    let index = args[i + 1].parse().ok();
                    let conc = args[i + 2].parse().ok();
                    cli.guess = index.zip(conc);
                    i += 2;
                }
            }
            "--help" | "-h" => {
                println!("Organ Bath Simulator - Pharmacology Diagnostics");
                println!();
                println!("Usage: organ-bath [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --session          Record a sampled session while dosing the Unknown");
                println!("  -n, --samples <N>      Samples to record in a session (default: 8)");
                println!("      --doses <N>        Doses per drug in the dose-response table (default: 6)");
                println!("      --seed <N>         Seed for the unknown draw");
                println!("      --params <PATH>    Parameter file (default: {})", DEFAULT_PARAMS_PATH);
                println!("      --export <DIR>     Write tension CSV and answer JSON to DIR");
                println!("      --restore <PATH>   Restore the hidden answer from a saved JSON");
                println!("      --guess <I> <C>    Check a guess: stock index and concentration (uM)");
                println!("  -h, --help             Print help");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }
    cli
}

/// Tension after successive 1 mL doses of each stock drug on its own
fn run_dose_response(state: &mut ExperimentState, doses: usize) -> Result<()> {
    let bath = state.params().bath.clone();
    println!("=== Dose-Response ({} mL of {} uM per dose, {} mL bath) ===\n",
        bath.default_stock_volume_mL, bath.default_stock_concentration_uM, bath.bath_volume_mL);

    let names: Vec<String> = state.drug_names(false).iter().map(|s| s.to_string()).collect();
    print!("{:<14}", "dose");
    for n in 1..=doses {
        print!("{:>8}", n);
    }
    println!();

    for (index, name) in names.iter().enumerate() {
        state.drain_bath();
        // Antagonists alone give no tension; pair them with a fixed agonist
        // dose on the receptor they block.
        let paired_agonist = state
            .receptors()
            .iter()
            .find(|r| r.antagonists()[0] == index)
            .map(|r| r.agonists()[0]);
        if let Some(agonist) = paired_agonist {
            state.dose(agonist, bath.default_stock_concentration_uM, bath.default_stock_volume_mL)?;
        }
        print!("{:<14}", name);
        for _ in 0..doses {
            state.dose(index, bath.default_stock_concentration_uM, bath.default_stock_volume_mL)?;
            print!("{:>8.3}", state.current_tension_g());
        }
        println!();
    }
    state.drain_bath();
    println!();
    Ok(())
}

/// Record a live session: the Unknown is dosed between samples
fn run_session(state: ExperimentState, cli: &CliArgs) -> Result<ExperimentState> {
    let experiment = share(state);
    let mut sampler = Sampler::with_thread_scheduler(experiment.clone());
    let unknown = lock_experiment(&experiment).unknown_roster_index();
    let volume = lock_experiment(&experiment).params().bath.default_stock_volume_mL;

    println!("=== Session ({} samples every {} ms) ===\n", cli.samples, sampler.period().as_millis());
    let start = Instant::now();
    sampler.start().context("failed to start sampler")?;

    let mut last_len = 0;
    while lock_experiment(&experiment).series().samples().len() < cli.samples {
        thread::sleep(sampler.period() / 2);
        let mut state = lock_experiment(&experiment);
        let len = state.series().samples().len();
        if len != last_len && len % 2 == 0 {
            // Stock concentration is ignored for the Unknown
            state.dose(unknown, 0.0, volume)?;
        }
        last_len = len;
    }
    sampler.stop();
    drop(sampler);

    let state = std::sync::Arc::try_unwrap(experiment)
        .map_err(|_| anyhow::anyhow!("experiment still shared after sampler stopped"))?
        .into_inner()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    for point in state.series().samples() {
        println!("  t={:>3}  tension={:.4} g", point.time_index, point.tension_g);
    }
    println!("\nElapsed time: {:.2?}", start.elapsed());
    Ok(state)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = parse_args();
    log::info!("Organ Bath Simulator starting...");

    let params = ExperimentParameters::load_or_default(&cli.params);
    let mut state = match &cli.restore {
        Some(path) => {
            let answer = load_answer_json(path)?;
            ExperimentState::restore(params, answer)?
        }
        None => {
            let mut rng = match cli.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            ExperimentState::new(params, &mut rng)?
        }
    };

    if let Some(dir) = &cli.export_dir {
        std::fs::create_dir_all(dir)?;
        state.subscribe(persist_answer_to(dir.join("answer.json")));
    }

    println!("Drugs: {}", state.drug_names(true).join(", "));
    println!("Receptors: {}\n", state.receptors().len());

    run_dose_response(&mut state, cli.doses)?;

    if cli.session {
        state = run_session(state, &cli)?;
        if let Some(dir) = &cli.export_dir {
            let path = export_series_csv(state.series(), dir.join("tension.csv"))?;
            println!("Series written to {}", path.display());
        }
    }

    if let Some((index, conc)) = cli.guess {
        let outcome = state.check_answer(&AnswerGuess::new(index, conc));
        match outcome {
            AnswerOutcome::Correct => println!("✓ Correct: the Unknown is {} at {} uM",
                state.drug_names(false).get(index).copied().unwrap_or("?"), conc),
            AnswerOutcome::Incorrect => println!("✗ Incorrect guess"),
            AnswerOutcome::Unanswered => println!("No guess given"),
        }
    }

    Ok(())
}
