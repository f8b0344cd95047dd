//! LinkUp command-line entry point

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};

use linkup::cli::{Cli, Commands, ConfigSubcommand, PopulationArgs};
use linkup::config::{self, LinkupConfig};
use linkup::console::Console;
use linkup::error::{Error, Result};
use linkup::logging::{self, LogGuards};
use linkup::matching::GroupAllocator;
use linkup::registration::{load_population, Registrar};
use linkup::report::MatchReport;
use linkup::sample::{load_sample_data, sample_population};
use linkup::store::Directory;
use linkup::version;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // Commands that don't need the full logging stack
    match &cli.command {
        Commands::Version => {
            print!("{}", version::build_info());
            return Ok(());
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(subcommand.clone());
        }
        Commands::Sample { output } => {
            logging::init_simple(tracing::Level::WARN)?;
            return write_sample(output.as_deref());
        }
        _ => {}
    }

    let config_path = match &cli.command {
        Commands::Match { config, .. }
        | Commands::Score { config, .. }
        | Commands::Console { config, .. } => config.clone(),
        _ => None,
    };
    let config = LinkupConfig::load(config_path.as_deref())?;

    // Held until exit so buffered file logs are flushed
    let _log_guards: LogGuards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::build_info();
    info!(
        version = %build.full_version(),
        profile = %build.profile,
        "Starting LinkUp"
    );

    let directory = Directory::with_default_group_name(config.groups.default_name.clone());
    let registrar = Registrar::new(&config.registration);

    match cli.command {
        Commands::Match {
            source,
            json,
            dry_run,
            ..
        } => {
            populate(&directory, &registrar, &config, &source)?;
            run_match(&directory, &config, json, dry_run)
        }
        Commands::Score {
            mentee,
            mentor,
            source,
            ..
        } => {
            populate(&directory, &registrar, &config, &source)?;
            run_score(&directory, &mentee, &mentor)
        }
        Commands::Console { source, .. } => {
            populate(&directory, &registrar, &config, &source)?;
            let stdin = io::stdin();
            let mut console = Console::new(stdin.lock(), io::stdout(), &directory, &registrar, &config);
            console.run()
        }
        Commands::Version | Commands::Config { .. } | Commands::Sample { .. } => {
            Err(Error::Internal("command already handled".to_string()))
        }
    }
}

/// Fill the directory from `--sample`, `--population`, or the configured file
fn populate(
    directory: &Directory,
    registrar: &Registrar,
    config: &LinkupConfig,
    source: &PopulationArgs,
) -> Result<()> {
    if source.sample {
        load_sample_data(directory, registrar)?;
    }

    let file = source
        .population
        .as_deref()
        .or(if source.sample {
            None
        } else {
            config.storage.population_file.as_deref()
        });
    if let Some(path) = file {
        load_population(registrar, directory, Path::new(path))?;
    }

    if directory.participant_count() == 0 {
        warn!("Population is empty; pass --population FILE or --sample");
    }
    Ok(())
}

fn run_match(directory: &Directory, config: &LinkupConfig, json: bool, dry_run: bool) -> Result<()> {
    let allocator = GroupAllocator::new(directory)
        .with_capacity(config.matching.group_capacity)
        .with_group_name(config.groups.default_name.clone());

    let report = if dry_run {
        let plans = allocator.plan();
        MatchReport::from_plans(directory, &plans, &config.groups.default_name)
    } else {
        let groups = allocator.form_groups()?;
        MatchReport::from_groups(directory, &groups)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

fn run_score(directory: &Directory, mentee_email: &str, mentor_email: &str) -> Result<()> {
    let lookup = |email: &str| {
        directory
            .participant_by_email(email)
            .ok_or_else(|| Error::ParticipantNotFound(email.to_string()))
    };
    let mentee = lookup(mentee_email)?;
    let mentor = lookup(mentor_email)?;

    let score = GroupAllocator::new(directory).score(&mentee.id, &mentor.id)?;
    println!(
        "{} -> {}: {}",
        mentee.profile.name, mentor.profile.name, score
    );
    Ok(())
}

fn write_sample(output: Option<&str>) -> Result<()> {
    let config = LinkupConfig::load(None)?;
    let entries = sample_population(&config.registration.email_domain);
    let json = serde_json::to_string_pretty(&entries)?;

    match output {
        Some(path) => {
            let path = PathBuf::from(path);
            fs::write(&path, json).map_err(|e| Error::IoWrite {
                path: path.clone(),
                source: e,
            })?;
            println!("Sample population written to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn handle_config_command(subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = LinkupConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Configuration written to: {}", written.display());
        }
        ConfigSubcommand::Validate { config } => {
            LinkupConfig::load(config.as_deref())?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}
