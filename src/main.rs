use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use surveyor::{Analyzer, Config};

#[derive(Parser)]
#[command(name = "surveyor")]
#[command(about = "Analyze Python package structure and dependencies")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a Python package directory
    Analyze {
        /// Path to the package to analyze
        path: PathBuf,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Do not descend into directories lacking __init__.py
        #[arg(long)]
        no_namespace_packages: bool,

        /// Emit the full analysis result as JSON
        #[arg(long)]
        json: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    match args.command {
        Command::Analyze {
            path,
            config,
            exclude,
            no_namespace_packages,
            json,
            verbose,
        } => {
            let mut config = match config {
                Some(p) => match Config::load(&p) {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return ExitCode::FAILURE;
                    }
                },
                None => Config::default(),
            };
            config.merge_cli(exclude, no_namespace_packages);

            let analyzer = Analyzer::new(config).with_verbose(verbose);
            let result = match analyzer.analyze(&path) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            };

            for failure in &result.parse_failures {
                eprintln!(
                    "warning: skipped {}: {}",
                    failure.path.display(),
                    failure.message
                );
            }

            if json {
                match serde_json::to_string_pretty(&result) {
                    Ok(out) => println!("{}", out),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                println!("Package: {}", result.package_name);
                println!("Root: {}", result.root_path.display());
                println!("Modules: {}", result.modules.len());
                println!("Edges: {}", result.graph.edge_count());
                if !result.graph.external_deps.is_empty() {
                    let deps: Vec<&str> = result
                        .graph
                        .external_deps
                        .iter()
                        .map(String::as_str)
                        .collect();
                    println!("External dependencies: {}", deps.join(", "));
                }
                for (key, value) in &result.metadata {
                    println!("{}: {}", key, value);
                }
            }

            ExitCode::SUCCESS
        }
    }
}
