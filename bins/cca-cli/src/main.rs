//! cca-cli — One-shot supply schedule generation from the command line.
//!
//! Prints the same report the `generate_supply_schedule` tool returns, so a
//! schedule can be produced without an MCP host.

use anyhow::{Context, Result};
use cca_core::constants::FINAL_PHASE_BLOCKS;
use cca_core::{ScheduleParams, ScheduleRequest};
use cca_server_lib::ToolRouter;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::{debug, info};

/// CCA supply schedule command-line interface.
#[derive(Parser)]
#[command(name = "cca-cli")]
#[command(version, about = "Generate CCA token emission schedules.")]
struct Cli {
    /// Log level for diagnostics on stderr.
    #[arg(long, global = true, env = "CCA_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a supply schedule and print the report as JSON.
    Generate(GenerateArgs),
    /// Print the fixed schedule parameters.
    Params,
}

#[derive(Args)]
struct GenerateArgs {
    /// Total auction length in blocks, prebid period included.
    #[arg(short, long)]
    auction_blocks: u64,

    /// Leading blocks with zero emission.
    #[arg(short, long, default_value_t = 0)]
    prebid_blocks: u64,

    /// Print only the phase array on a single line.
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let router = ToolRouter::new(ScheduleParams::default());
    match cli.command {
        Commands::Generate(args) => cmd_generate(&router, args),
        Commands::Params => cmd_params(router.params()),
    }
}

fn cmd_generate(router: &ToolRouter, args: GenerateArgs) -> Result<()> {
    println!("{}", render_generate(router, &args)?);
    Ok(())
}

/// Build the JSON text `generate` prints.
fn render_generate(router: &ToolRouter, args: &GenerateArgs) -> Result<String> {
    debug!(
        auction_blocks = args.auction_blocks,
        prebid_blocks = args.prebid_blocks,
        compact = args.compact,
        "generating schedule"
    );
    let request = ScheduleRequest::new(args.auction_blocks, args.prebid_blocks);
    let report = router.generate(request).with_context(|| {
        format!(
            "failed to generate schedule for {} auction blocks ({} prebid)",
            args.auction_blocks, args.prebid_blocks
        )
    })?;

    let out = if args.compact {
        serde_json::to_string(&report.schedule)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    info!(phases = report.total_phases, bytes = out.len(), "schedule ready");
    Ok(out)
}

fn cmd_params(p: &ScheduleParams) -> Result<()> {
    let out = json!({
        "total_target": p.total_target,
        "num_segments": p.num_segments,
        "growth_exponent": p.growth_exponent,
        "front_share": p.front_share,
        "final_phase_blocks": FINAL_PHASE_BLOCKS,
        "min_auction_blocks": ScheduleRequest::min_auction_blocks(p, 0),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn init_logging(level_str: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
