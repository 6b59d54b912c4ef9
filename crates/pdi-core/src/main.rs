//! Persistence Diagram Intensity CLI
//!
//! Fits Gamma marginals to the creation and destruction values of a
//! persistence diagram and samples the joint intensity surface.

use clap::{Args, Parser, Subcommand};
use pdi_core::config::{load_config, ConfigOptions, EstimationConfig};
use pdi_core::diagram::{load_diagram, Diagram};
use pdi_core::estimate::{fit_diagram, DiagramFit, MarginalFit};
use pdi_core::exit_codes::ExitCode;
use pdi_core::log_event;
use pdi_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use pdi_core::output::{
    fit_markdown, fit_summary, json_envelope, surface_markdown, surface_summary, OutputFormat,
};
use pdi_core::{Error, SCHEMA_VERSION};
use std::path::{Path, PathBuf};

/// Persistence Diagram Intensity: Bayesian Gamma-marginal intensity estimation
#[derive(Parser)]
#[command(name = "pdi-core")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Config file (JSON, or TOML by extension); falls back to PDI_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Candidates per prior axis (overrides config)
    #[arg(long, global = true)]
    grid_resolution: Option<usize>,

    /// Standard errors spanned on each side of the point estimate (overrides config)
    #[arg(long, global = true)]
    spread: Option<f64>,

    /// Leading observations scored by the likelihood (overrides config)
    #[arg(long, global = true)]
    sample_cap: Option<usize>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr: human or jsonl
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit Gamma marginals to a persistence diagram
    Fit(DiagramArgs),

    /// Fit, then sample the joint intensity surface
    Surface(DiagramArgs),

    /// Print the resolved configuration
    Config,

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct DiagramArgs {
    /// Whitespace-separated `creation destruction` pairs, one per line
    diagram: PathBuf,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let ctx = LogContext::new(generate_run_id());
    let result = match &cli.command {
        Commands::Fit(args) => run_fit(&cli.global, &ctx, args),
        Commands::Surface(args) => run_surface(&cli.global, &ctx, args),
        Commands::Config => run_config(&cli.global, &ctx),
        Commands::Version => {
            print_version(&cli.global);
            Ok(())
        }
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let code = err.exit_code();
            log_event!(
                ctx,
                ERROR,
                event_names::RUN_FAILED,
                Stage::Init,
                err.to_string(),
                code = err.code(),
                exit_code = code.as_i32()
            );
            output_error(&cli.global, &ctx, &err, code);
            code
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Load config, apply CLI overrides, validate.
fn resolve_config(global: &GlobalOpts, ctx: &LogContext) -> Result<EstimationConfig, Error> {
    let resolved = load_config(&ConfigOptions {
        config_path: global.config.clone(),
    })?;
    match &resolved.source_path {
        Some(path) => log_event!(
            ctx,
            INFO,
            event_names::CONFIG_LOADED,
            Stage::Init,
            "config loaded",
            path = tracing::field::display(path.display())
        ),
        None => log_event!(
            ctx,
            DEBUG,
            event_names::CONFIG_DEFAULT_USED,
            Stage::Init,
            "using default config"
        ),
    }

    let mut config = resolved.estimation;
    if let Some(n) = global.grid_resolution {
        config.grid_resolution = n;
    }
    if let Some(k) = global.spread {
        config.spread = k;
    }
    if let Some(cap) = global.sample_cap {
        config.sample_cap = cap;
    }
    config.validate()?;
    Ok(config)
}

fn load_and_fit(
    global: &GlobalOpts,
    ctx: &LogContext,
    path: &Path,
) -> Result<(EstimationConfig, Diagram, DiagramFit), Error> {
    let config = resolve_config(global, ctx)?;

    let diagram = load_diagram(path)?;
    log_event!(
        ctx,
        INFO,
        event_names::DIAGRAM_LOADED,
        Stage::Load,
        "diagram loaded",
        pairs = diagram.len(),
        dropped_infinite = diagram.dropped_infinite
    );

    let fit = fit_diagram(&diagram, &config)?;
    log_marginal(ctx, "creation", &fit.creation);
    log_marginal(ctx, "destruction", &fit.destruction);
    Ok((config, diagram, fit))
}

fn log_marginal(ctx: &LogContext, marginal: &str, fit: &MarginalFit) {
    log_event!(
        ctx,
        DEBUG,
        event_names::POINT_ESTIMATE,
        Stage::Estimate,
        "initial estimate",
        marginal = marginal,
        method = fit.initial_method,
        shape = fit.point_estimate.shape(),
        rate = fit.point_estimate.rate()
    );
    log_event!(
        ctx,
        DEBUG,
        event_names::PRIOR_RANGE_BUILT,
        Stage::Prior,
        "prior range built",
        marginal = marginal,
        candidates = fit.prior_range.len(),
        sample_size = fit.prior_range.sample_size
    );
    log_event!(
        ctx,
        DEBUG,
        event_names::POSTERIOR_SCORED,
        Stage::Posterior,
        "posterior grid scored",
        marginal = marginal,
        cells = fit.posterior.len(),
        observations = fit.observations_used
    );
    log_event!(
        ctx,
        INFO,
        event_names::MAP_SELECTED,
        Stage::Select,
        "MAP selected",
        marginal = marginal,
        shape = fit.map.params.shape(),
        rate = fit.map.params.rate(),
        log_score = fit.map.log_score
    );
}

fn run_fit(global: &GlobalOpts, ctx: &LogContext, args: &DiagramArgs) -> Result<(), Error> {
    let ctx = ctx.clone().with_input(args.diagram.display().to_string());
    log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "fit started");

    let (config, _diagram, fit) = load_and_fit(global, &ctx, &args.diagram)?;
    let input = args.diagram.display().to_string();

    match global.format {
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "input": input,
                "config": config,
                "creation": fit.creation,
                "destruction": fit.destruction,
            });
            let output = json_envelope(&ctx.run_id, "fit", payload);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Md => print!("{}", fit_markdown(&fit, &input)),
        OutputFormat::Summary => println!("{}", fit_summary(&fit)),
        OutputFormat::Exitcode => {}
    }

    log_event!(ctx, INFO, event_names::RUN_FINISHED, Stage::Select, "fit finished");
    Ok(())
}

fn run_surface(global: &GlobalOpts, ctx: &LogContext, args: &DiagramArgs) -> Result<(), Error> {
    let ctx = ctx.clone().with_input(args.diagram.display().to_string());
    log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "surface started");

    let (config, diagram, fit) = load_and_fit(global, &ctx, &args.diagram)?;
    let mesh = fit.surface(&diagram, config.sample_cap);
    let (nx, ny) = mesh.dims();
    log_event!(
        ctx,
        INFO,
        event_names::SURFACE_SAMPLED,
        Stage::Surface,
        "surface sampled",
        xs = nx,
        ys = ny
    );
    let input = args.diagram.display().to_string();

    match global.format {
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "input": input,
                "intensity": fit.intensity(),
                "mesh": mesh,
            });
            let output = json_envelope(&ctx.run_id, "surface", payload);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Md => print!("{}", surface_markdown(&fit, &mesh, &input)),
        OutputFormat::Summary => println!("{}", surface_summary(&fit, &mesh)),
        OutputFormat::Exitcode => {}
    }

    log_event!(ctx, INFO, event_names::RUN_FINISHED, Stage::Surface, "surface finished");
    Ok(())
}

fn run_config(global: &GlobalOpts, ctx: &LogContext) -> Result<(), Error> {
    let config = resolve_config(global, ctx)?;
    match global.format {
        OutputFormat::Json => {
            let payload = serde_json::json!({ "config": config });
            let output = json_envelope(&ctx.run_id, "config", payload);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Md => {
            println!("# Configuration\n");
            println!("- grid_resolution: {}", config.grid_resolution);
            println!("- spread: {}", config.spread);
            println!("- sample_cap: {}", config.sample_cap);
            println!("- creation_initial: {}", config.creation_initial.label());
            println!("- destruction_initial: {}", config.destruction_initial.label());
        }
        OutputFormat::Summary => println!(
            "N={} k={} cap={} creation={} destruction={}",
            config.grid_resolution,
            config.spread,
            config.sample_cap,
            config.creation_initial.label(),
            config.destruction_initial.label()
        ),
        OutputFormat::Exitcode => {}
    }
    Ok(())
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json => {
            let version_info = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "pdi_core_version": env!("CARGO_PKG_VERSION"),
                "rust_version": env!("CARGO_PKG_RUST_VERSION"),
                "parallel": cfg!(feature = "parallel"),
            });
            println!("{version_info:#}");
        }
        OutputFormat::Exitcode => {}
        _ => {
            println!("pdi-core {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}

fn output_error(global: &GlobalOpts, ctx: &LogContext, err: &Error, code: ExitCode) {
    match global.format {
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "error": err.to_report(),
                "exit_code": code.as_i32(),
                "exit_code_name": code.code_name(),
            });
            let output = json_envelope(&ctx.run_id, "error", payload);
            println!("{output:#}");
        }
        OutputFormat::Exitcode => {}
        _ => eprintln!("error: {err}"),
    }
}
