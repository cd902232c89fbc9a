use anyhow::Result;
use clap::Parser;

use improc::cli::{Cli, Command};
use improc::stock::{stock_registry, EngineSummary};
use improc_core::{ArgValue, Registry};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let registry = stock_registry();

    match &cli.command {
        Command::Parse { query, json } => handle_parse(&registry, query, *json),
        Command::Validate { name, args, engine } => {
            handle_validate(&registry, name, args, engine.as_deref())
        }
        Command::Engines { json } => handle_engines(&registry, *json),
        Command::Plan { query, json } => handle_plan(&registry, query, *json),
    }
}

fn handle_parse(registry: &Registry, query: &str, json: bool) -> Result<()> {
    let parsed = registry.parse(query);

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }

    if parsed.operations.is_empty() {
        println!("No operations recognized.");
    } else {
        println!("Operations:");
        for op in &parsed.operations {
            println!("  {op}");
        }
    }
    if !parsed.leftover.is_empty() {
        println!("Leftover: {}", parsed.leftover);
    }
    Ok(())
}

fn handle_validate(
    registry: &Registry,
    name: &str,
    raw_args: &[String],
    engine: Option<&str>,
) -> Result<()> {
    let args: Vec<ArgValue> = raw_args.iter().map(|raw| ArgValue::coerce(raw)).collect();

    let valid = match engine {
        Some(engine_name) => {
            if registry.engine(engine_name).is_none() {
                anyhow::bail!("unknown engine: {}", engine_name);
            }
            registry.is_valid_operation_for_engine(engine_name, name, &args)
        }
        None => registry.is_valid_operation(name, &args),
    };

    if valid {
        println!("valid");
    } else {
        println!("invalid");
        let claimants = registry.engines_for_operation(name);
        if claimants.is_empty() {
            log::debug!("no engine claims operation {name}");
        } else {
            log::debug!("claimed by {claimants:?}, but arguments were rejected");
        }
        std::process::exit(1);
    }
    Ok(())
}

fn handle_engines(registry: &Registry, json: bool) -> Result<()> {
    let mut engines: Vec<EngineSummary> = registry.engines().map(EngineSummary::from).collect();
    engines.sort_by(|a, b| a.name.cmp(&b.name));

    if json {
        println!("{}", serde_json::to_string_pretty(&engines)?);
        return Ok(());
    }

    for engine in &engines {
        let default_marker = if registry.default_engine_name() == Some(engine.name.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!("{}{}", engine.name, default_marker);
        if !engine.operations.is_empty() {
            println!("  operations: {}", engine.operations.join(", "));
        }
        println!("  input:  {}", engine.input_types.join(", "));
        println!("  output: {}", engine.output_types.join(", "));
        if engine.unavailable {
            println!("  unavailable");
        }
    }
    Ok(())
}

fn handle_plan(registry: &Registry, query: &str, json: bool) -> Result<()> {
    let parsed = registry.parse(query);
    if !parsed.leftover.is_empty() {
        log::warn!("ignoring unclaimed fragments: {}", parsed.leftover);
    }

    let pipeline = registry.create_pipeline(None, Some(query.into()));

    if json {
        println!("{}", serde_json::to_string_pretty(pipeline.operations())?);
        return Ok(());
    }

    if pipeline.operations().is_empty() {
        println!("Empty pipeline.");
        return Ok(());
    }
    println!(
        "Pipeline ({} operation(s), default engine: {}):",
        pipeline.operations().len(),
        pipeline
            .options()
            .default_engine_name
            .as_deref()
            .unwrap_or("none")
    );
    for (index, op) in pipeline.operations().iter().enumerate() {
        println!("  {}. {}", index + 1, op);
    }
    Ok(())
}
