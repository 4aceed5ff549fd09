use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use panel_growth::cli::{Cli, Commands, ForecastArgs};
use panel_growth::ctx::{Ctx, RunConfig};
use panel_growth::forecast::forecast_panel;
use panel_growth::growth::YearWindow;
use panel_growth::io;
use panel_growth::io::json_writer::write_extended_panel;
use panel_growth::io::panel_reader::read_panel;
use panel_growth::pipeline::Pipeline;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let config = args.to_config();
            let mut ctx = Ctx::new(
                args.gdp,
                args.population,
                args.out,
                config,
                true,
                args.tsv,
                env!("CARGO_PKG_VERSION"),
            );
            Pipeline::full().run(&mut ctx)?;
            print_summary(&ctx)?;
        }
        Commands::Forecast(args) => {
            run_forecast(args)?;
        }
        Commands::Validate(args) => {
            let config = RunConfig {
                entity_column: args.entity_column,
                ..RunConfig::default()
            };
            let mut ctx = Ctx::new(
                args.gdp,
                args.population,
                ".".into(),
                config,
                false,
                false,
                env!("CARGO_PKG_VERSION"),
            );
            Pipeline::validation().run(&mut ctx)?;
            print_validate_summary(&ctx)?;
        }
    }

    Ok(())
}

fn run_forecast(args: ForecastArgs) -> Result<()> {
    let config = args.model.to_config(YearWindow::default());
    let panel = read_panel(&args.input, &config.entity_column)?;
    let batch = forecast_panel(&panel, &config.forecast_options(), config.threads)?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    write_extended_panel(&args.out, &batch.extended, &config.entity_column)?;

    println!(
        "forecast {} entities through {}",
        batch.extended.len(),
        batch.extended.last_year()
    );
    if !batch.excluded.is_empty() {
        println!("excluded:");
        for e in &batch.excluded {
            println!("- {}: {}", e.entity, e.reason);
        }
    }
    Ok(())
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

fn print_validate_summary(ctx: &Ctx) -> Result<()> {
    println!("panel-growth validate ok");
    for state in ctx.indicators() {
        let panel = state
            .panel
            .as_ref()
            .with_context(|| format!("{} panel missing", state.indicator.name()))?;
        println!(
            "{}: {} entities, years {}-{}",
            state.indicator.name(),
            panel.len(),
            panel.first_year(),
            panel.last_year()
        );
    }
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}
