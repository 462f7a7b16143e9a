use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use deadvalues::discovery::read_template;
use deadvalues::report::{ReportFormat, ReportOptions, Reporter};
use deadvalues::{load_chart, read_templates, Config, ReferenceSet, ValuesAnalyzer};
use miette::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// DeadValues - Find keys in Helm values files that no template uses
#[derive(Parser, Debug)]
#[command(name = "deadvalues")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the Helm chart directory
    #[arg(default_value = ".")]
    chart: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional values files in the chart directory, merged after the
    /// base values file in the order given (can be specified multiple times)
    #[arg(
        short = 'f',
        long = "values-file",
        visible_alias = "additional-value-file",
        value_name = "FILE"
    )]
    values_files: Vec<PathBuf>,

    /// Base values file, relative to the chart directory (default: values.yaml)
    #[arg(long, value_name = "FILE")]
    values: Option<PathBuf>,

    /// Templates directory, relative to the chart directory (default: templates)
    #[arg(long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Template file extensions to scan (can be specified multiple times)
    #[arg(long = "extension", value_name = "EXT")]
    extensions: Vec<String>,

    /// Keys to never report: `path` for a subtree, `prefix*` for a prefix
    /// (can be specified multiple times)
    #[arg(short, long, value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Identifier introducing a values reference in templates (default: Values)
    #[arg(long)]
    accessor: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exit with status 1 when unused keys are found
    #[arg(long)]
    fail_on_unused: bool,

    /// Scan templates in parallel (enabled by default)
    #[arg(long, action = clap::ArgAction::Set)]
    parallel: Option<bool>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Compact,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Compact => ReportFormat::Compact,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Handle shell completions
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    if cli.no_color {
        colored::control::set_override(false);
    }

    init_logging(cli.verbose, cli.quiet);

    info!("DeadValues v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let has_unused = run_analysis(&config, &cli)?;

    if has_unused && config.fail_on_unused {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
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

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        // Try to load from the chart directory
        Config::from_default_locations(&cli.chart)?
    };

    // Override with CLI arguments
    if let Some(values) = &cli.values {
        config.values_file = values.clone();
    }
    if let Some(templates) = &cli.templates {
        config.templates_dir = templates.clone();
    }
    if !cli.values_files.is_empty() {
        config.additional_values = cli.values_files.clone();
    }
    if !cli.extensions.is_empty() {
        config.template_extensions = cli.extensions.clone();
    }
    if !cli.ignore.is_empty() {
        config.ignore.extend(cli.ignore.clone());
    }
    if let Some(accessor) = &cli.accessor {
        config.accessor = accessor.clone();
    }
    if let Some(parallel) = cli.parallel {
        config.parallel = parallel;
    }
    if cli.fail_on_unused {
        config.fail_on_unused = true;
    }

    Ok(config)
}

/// Run one analysis and report it; returns whether unused keys were found
fn run_analysis(config: &Config, cli: &Cli) -> Result<bool> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;

    let start_time = Instant::now();
    let analyzer = ValuesAnalyzer::new(config)?;

    // Step 1: Locate the chart, load its values files and discover templates
    let inputs = load_chart(&cli.chart, config)?;
    let files = &inputs.templates;

    // Step 2: Scan templates for references
    let references = if config.parallel {
        let templates = read_templates(files, true)?;
        analyzer.scanner().scan_all(&templates, true)
    } else {
        let pb = if cli.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(files.len() as u64)
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        info!("Scanning templates...");
        let mut references = ReferenceSet::new();
        for file in files {
            let text = read_template(file)?;
            references = references.union(analyzer.scanner().scan(&text));
            pb.inc(1);
        }
        pb.finish_and_clear();
        references
    };

    // Step 3: Resolve unused keys and group them by values file
    let analysis = analyzer.analyze_references(&inputs.documents, references, files.len());

    // Step 4: Report results
    let options = ReportOptions {
        output_path: cli.output.clone(),
        keys_count: Some(analysis.keys.len()),
        templates_count: Some(analysis.templates_scanned),
    };
    let reporter = Reporter::with_options(cli.format.into(), options);
    reporter.report(&analysis.report)?;

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(!analysis.report.is_empty())
}
