//! Command-line front end for the offer simulation engine.
//!
//! Each subcommand reads a JSON request (from a file or stdin) and writes a
//! pretty-printed JSON result to stdout. Logs go to stderr.

mod logging;
mod requests;

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use serde::de::DeserializeOwned;

use offersim_core::search::search_optimal_offer;
use offersim_core::sensitivity::compute_sensitivity;
use offersim_core::simulate_offer;
use offersim_core::tiers::generate_offer_tiers;

use crate::logging::init_logging;
use crate::requests::{SearchRequest, SensitivityRequest, SimulateRequest, TiersRequest};

#[derive(Parser, Debug)]
#[command(name = "offersim")]
#[command(about = "Monte Carlo profitability simulator for prepaid telecom offers")]
struct Args {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate one offer and report aggregate profit statistics
    Simulate {
        /// Path to a JSON request file (default: stdin)
        #[arg(short, long)]
        request: Option<PathBuf>,
    },
    /// Derive and rank the ten-tier ladder around an anchor offer
    Tiers {
        #[arg(short, long)]
        request: Option<PathBuf>,
    },
    /// Rank model parameters by their influence on expected profit
    Sensitivity {
        #[arg(short, long)]
        request: Option<PathBuf>,
    },
    /// Search offer parameter space for the most profitable offer
    Search {
        #[arg(short, long)]
        request: Option<PathBuf>,
    },
}

fn read_request<T: DeserializeOwned>(path: Option<&PathBuf>) -> color_eyre::Result<T> {
    let raw = match path {
        Some(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read request file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read request from stdin")?;
            buffer
        }
    };
    serde_json::from_str(&raw).wrap_err("request is not valid JSON for this command")
}

fn print_result<T: serde::Serialize>(result: &T) -> color_eyre::Result<()> {
    serde_json::to_writer_pretty(std::io::stdout().lock(), result)?;
    println!();
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level)?;

    match &args.command {
        Command::Simulate { request } => {
            let req: SimulateRequest = read_request(request.as_ref())?;
            tracing::info!(
                offer = %req.offer.label,
                n_simulations = req.n_simulations,
                seed = req.seed,
                "running simulation"
            );
            let result = simulate_offer(&req.offer, &req.params, req.n_simulations, req.seed)?;
            print_result(&result)?;
        }
        Command::Tiers { request } => {
            let req: TiersRequest = read_request(request.as_ref())?;
            tracing::info!(anchor = %req.anchor.label, "generating tier ladder");
            let outcomes =
                generate_offer_tiers(&req.anchor, &req.params, req.n_simulations, req.seed)?;
            if outcomes.is_empty() {
                tracing::warn!("anchor produced no positively priced tiers");
            }
            print_result(&outcomes)?;
        }
        Command::Sensitivity { request } => {
            let req: SensitivityRequest = read_request(request.as_ref())?;
            tracing::info!(offer = %req.offer.label, "computing sensitivities");
            let records =
                compute_sensitivity(&req.offer, &req.params, req.n_simulations, req.seed)?;
            print_result(&records)?;
        }
        Command::Search { request } => {
            let req: SearchRequest = read_request(request.as_ref())?;
            tracing::info!(
                n_simulations = req.n_simulations,
                seed = req.seed,
                "starting tiered search"
            );
            let outcome = search_optimal_offer(
                &req.params,
                &req.bounds,
                req.n_simulations,
                req.seed,
                &req.budget,
            )?;
            for skipped in &outcome.skipped_tiers {
                tracing::warn!(tier = %skipped.label, reason = %skipped.reason, "tier skipped");
            }
            tracing::info!(
                winner = %outcome.best_offer.label,
                evaluations = outcome.evaluations,
                "search finished"
            );
            print_result(&outcome)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn request_file_round_trips() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"n_simulations": 25, "seed": 9}}"#).unwrap();

        let path = file.path().to_path_buf();
        let req: SimulateRequest = read_request(Some(&path)).unwrap();
        assert_eq!(req.n_simulations, 25);
        assert_eq!(req.seed, 9);
    }

    #[test]
    fn malformed_request_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let path = file.path().to_path_buf();
        let result: color_eyre::Result<SimulateRequest> = read_request(Some(&path));
        assert!(result.is_err());
    }
}
