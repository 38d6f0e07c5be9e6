mod commands;
mod inspector;
mod logging;
mod progress;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{CheckArgs, Cli, Commands};
use dotenv::dotenv;
use dupe_checker_core::{AppConfig, DuplicateChecker, DuplicateObserver, Relocator};
use inspector::ConsoleInspector;
use progress::{ActiveBar, CliReporter};
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let active_bar = ActiveBar::default();
    let _guard = logging::init_logger(active_bar.clone());

    let config = match dupe_checker_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Check(check_args)) => run_check(config, &check_args, active_bar),
        Some(Commands::SortLines { file }) => run_sort_lines(file),
        Some(Commands::CombineRequirements { root, output }) => {
            run_combine_requirements(&root, &output)
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => Cli::command().print_long_help().map_err(Into::into),
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run_check(
    mut config: AppConfig,
    args: &CheckArgs,
    active_bar: ActiveBar,
) -> anyhow::Result<()> {
    args.apply_to(&mut config);
    if config.folders.is_empty() {
        bail!("No folders to check; pass --folders or set `folders` in the configuration");
    }

    if args.move_duplicates && !args.yes {
        let confirmed = prompt_confirm(
            &format!(
                "Move duplicated files into '{}' subfolders?",
                config.quarantine_dir
            ),
            Some(false),
        )?;
        if !confirmed {
            info!("Nothing moved");
            return Ok(());
        }
    }

    let checker = DuplicateChecker::from_config(&config);
    let reporter = CliReporter::new(active_bar);
    let mut inspector = ConsoleInspector;
    let mut relocator = Relocator::new(&config.quarantine_dir);

    let mut observers: Vec<&mut dyn DuplicateObserver> = Vec::new();
    if args.show {
        observers.push(&mut inspector);
    }
    if args.move_duplicates {
        observers.push(&mut relocator);
    }

    let mut report = checker.check(&config.folders, &config.aliases, &reporter, &mut observers)?;
    drop(observers);

    if args.move_duplicates {
        report.relocation = Some(relocator.into_summary());
    }

    println!("\n{}", "-".repeat(50));
    println!("{}", "SUMMARY".bold());
    for folder in &report.folders {
        println!(
            "\nNumber of duplicates of files in folder '{}': {}",
            folder.alias.cyan(),
            format!("{}", folder.total).red(),
        );
        print!("{}", folder.matrix);
    }
    if !report.unreadable.is_empty() {
        println!(
            "\n{} unreadable files:",
            format!("{}", report.unreadable.len()).yellow()
        );
        for path in &report.unreadable {
            println!("  {}", path.display());
        }
    }
    if let Some(relocation) = &report.relocation {
        println!(
            "\nMoved {} files, skipped {}",
            format!("{}", relocation.moved.len()).green(),
            format!("{}", relocation.skipped.len()).yellow(),
        );
    }

    if let Some(path) = &args.json {
        fs::write(path, report.to_json_pretty()?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("JSON report written to {}", path.display());
    }
    if let Some(path) = &args.csv {
        let file =
            fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
        report.write_csv(file)?;
        info!("CSV report written to {}", path.display());
    }

    Ok(())
}

fn run_sort_lines(file: Option<PathBuf>) -> anyhow::Result<()> {
    let file = match file {
        Some(file) => file,
        None => PathBuf::from(prompt_line("Path of the file to sort: ")?),
    };
    let count = dupe_checker_core::text_files::sort_lines(&file)?;
    println!("Sorted {} lines in '{}'", count, file.display());
    Ok(())
}

fn run_combine_requirements(root: &Path, output: &Path) -> anyhow::Result<()> {
    let count = dupe_checker_core::text_files::combine_requirements(root, output)?;
    println!(
        "Combined {} requirement files into '{}'",
        format!("{}", count).green(),
        output.display()
    );
    Ok(())
}

fn prompt_line(prompt: &str) -> io::Result<String> {
    let mut input = String::new();
    print!("{}", prompt);
    io::stdout().flush()?;
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        io::stdin().read_line(&mut input)?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
