use clap::{error::ErrorKind, CommandFactory, Parser};
use clap_complete::{generate, Shell};
use colored::Colorize;
use miette::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use pytypecov::analysis::{load_ranked_packages, BatchRunner, PackageAnalyzer, MAX_TOP_N};
use pytypecov::report::{ReportFormat, ReportOptions, Reporter};
use pytypecov::{
    CompletenessDataset, Config, LocalPackageSource, PackageReport, StubPackageIndex,
    TypeshedLocator,
};

/// pytypecov - Static type-annotation coverage for Python packages
#[derive(Parser, Debug)]
#[command(name = "pytypecov")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Analyze the top N packages of the download ranking
    #[arg(value_parser = clap::value_parser!(u64).range(1..=MAX_TOP_N as u64))]
    top_n: Option<u64>,

    /// Analyze a specific package by name
    #[arg(long, value_name = "NAME")]
    package_name: Option<String>,

    /// Directory holding extracted package sources, one directory per package
    #[arg(long, value_name = "DIR")]
    sources: Option<PathBuf>,

    /// Local typeshed checkout
    #[arg(long, value_name = "DIR")]
    typeshed: Option<PathBuf>,

    /// JSON array of packages that have a <package>-stubs distribution
    #[arg(long, value_name = "FILE")]
    stub_packages: Option<PathBuf>,

    /// Download ranking JSON ({"rows": [{"project", "download_count"}]})
    #[arg(long, value_name = "FILE")]
    top_packages: Option<PathBuf>,

    /// typeshed-stats CSV export
    #[arg(long, value_name = "FILE")]
    typeshed_stats: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the reports to a JSON file
    #[arg(long)]
    write_json: bool,

    /// Write the reports to an HTML table
    #[arg(long)]
    write_html: bool,

    /// Analyze packages in parallel
    #[arg(long)]
    parallel: bool,

    /// Omit the typeshed-stats block from per-package output
    #[arg(long)]
    no_typeshed_stats: bool,

    /// Summary output - averages across all analyzed packages
    #[arg(long)]
    summary: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    if cli.top_n.is_none() && cli.package_name.is_none() {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "either provide a top N number or --package-name",
            )
            .exit();
    }

    init_logging(cli.verbose, cli.quiet);

    info!("pytypecov v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let analyzer = build_analyzer(&config)?;

    let reports = if let Some(package) = &cli.package_name {
        println!("{} {}", "Analyzing specific package:".cyan(), package);
        vec![analyzer.analyze(package)]
    } else {
        let top_n = cli.top_n.unwrap_or(1) as usize;
        let packages = load_ranked_packages(&config.top_packages_file, top_n)?;
        if cli.parallel {
            println!(
                "{}",
                format!("⚡ Parallel mode: analyzing {} packages...", packages.len()).cyan()
            );
        }
        BatchRunner::new(&analyzer)
            .with_parallel(cli.parallel)
            .with_progress(!cli.quiet)
            .run(&packages)
    };

    write_reports(&cli, &config, &reports)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(Path::new("."))?
    };

    // Override with CLI arguments
    if let Some(sources) = &cli.sources {
        config.sources_dir = sources.clone();
    }
    if let Some(typeshed) = &cli.typeshed {
        config.typeshed_dir = Some(typeshed.clone());
    }
    if let Some(stub_packages) = &cli.stub_packages {
        config.stub_packages_file = Some(stub_packages.clone());
    }
    if let Some(top_packages) = &cli.top_packages {
        config.top_packages_file = top_packages.clone();
    }
    if let Some(stats) = &cli.typeshed_stats {
        config.typeshed_stats_file = Some(stats.clone());
    }

    Ok(config)
}

fn build_analyzer(config: &Config) -> Result<PackageAnalyzer> {
    let mut analyzer = PackageAnalyzer::new(LocalPackageSource::new(config.sources_dir.clone()));

    if let Some(typeshed) = &config.typeshed_dir {
        info!("Using typeshed at {}", typeshed.display());
        analyzer = analyzer.with_typeshed(TypeshedLocator::new(typeshed.clone()));
    }
    if let Some(path) = &config.stub_packages_file {
        let index = StubPackageIndex::from_file(path)?;
        info!("Loaded {} stub packages", index.len());
        analyzer = analyzer.with_stub_packages(index);
    }
    if let Some(path) = &config.typeshed_stats_file {
        analyzer = analyzer.with_dataset(CompletenessDataset::from_file(path)?);
    }

    Ok(analyzer)
}

fn write_reports(cli: &Cli, config: &Config, reports: &[PackageReport]) -> Result<()> {
    let options = ReportOptions {
        json_path: config.json_report_file.clone(),
        html_path: config.html_report_file.clone(),
        show_typeshed_stats: !cli.no_typeshed_stats,
    };

    // Per-package blocks are printed for sequential runs only
    if !cli.parallel {
        Reporter::with_options(ReportFormat::Terminal, options.clone()).report(reports)?;
    }
    if cli.summary {
        Reporter::with_options(ReportFormat::Summary, options.clone()).report(reports)?;
    }
    if cli.write_json {
        Reporter::with_options(ReportFormat::Json, options.clone()).report(reports)?;
        println!(
            "{} {}",
            "JSON report written:".green(),
            options.json_path.display()
        );
    }
    if cli.write_html {
        Reporter::with_options(ReportFormat::Html, options.clone()).report(reports)?;
        println!(
            "{} {}",
            "HTML report generated:".green(),
            options.html_path.display()
        );
    }

    Ok(())
}
