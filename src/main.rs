use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rxlens::config;
use rxlens::connectors::DataSource;
use rxlens::reports::{self, ReportKind};
use rxlens::Result;

/// Prescription claims analytics.
///
/// Runs one of the fixed reports against the claims database and writes
/// the chart to the output directory.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Report to run; see --list for the available names.
    report: Option<String>,

    /// List the available reports and exit.
    #[arg(long)]
    list: bool,

    /// Optional path to a TOML or YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database connection URL, overriding configuration.
    #[arg(long, env = "RXLENS_DB_URL")]
    database_url: Option<String>,

    /// Directory chart files are written to, overriding configuration.
    #[arg(long)]
    out_dir: Option<String>,

    /// Image format (png or svg), overriding configuration.
    #[arg(long)]
    format: Option<String>,

    /// Also write the loaded result set(s) next to the chart as CSV.
    #[arg(long)]
    dump_csv: bool,

    /// Log level filter, e.g. "info" or "rxlens=debug".
    #[arg(long, env = "RXLENS_LOG_LEVEL")]
    log_level: Option<String>,
}

fn list_reports() {
    println!("Available reports:");
    for kind in ReportKind::all() {
        println!(
            "  {:<24} {:<14} {}",
            kind.name(),
            format!("[{:?}]", kind.plot_kind()).to_lowercase(),
            kind.title()
        );
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.list {
        list_reports();
        return ExitCode::SUCCESS;
    }

    let Some(report_name) = args.report.as_deref() else {
        eprintln!("No report given; use --list to see the available reports.");
        return ExitCode::from(2);
    };

    let config = match config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::from(2);
        }
    };

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let kind = match ReportKind::from_name(report_name) {
        Ok(kind) => kind,
        Err(e) => {
            eprintln!("{}; use --list to see the available reports.", e);
            return ExitCode::from(2);
        }
    };

    match run(kind, args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Shaping and rendering faults surface as raw diagnostics.
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(kind: ReportKind, args: Args, mut config: config::RxlensConfig) -> Result<()> {
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    if let Some(dir) = args.out_dir {
        config.output.directory = dir;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }

    // Connection and query failures are terminal: report and exit, no
    // retry, no partial chart.
    let source = match DataSource::connect(&config.database.to_connector_config()).await {
        Ok(source) => {
            info!("database connection established");
            source
        }
        Err(e) => {
            eprintln!("Error creating database engine: {}", e);
            std::process::exit(1);
        }
    };

    let frames = match reports::load_frames(kind, &source).await {
        Ok(frames) => {
            info!(report = kind.name(), "data loaded successfully");
            frames
        }
        Err(e) => {
            eprintln!("Error while loading data: {}", e);
            std::process::exit(1);
        }
    };
    for frame in &frames {
        tracing::debug!(rows = frame.row_count(), "result set:\n{}", frame.head(5));
    }

    if args.dump_csv {
        std::fs::create_dir_all(&config.output.directory)?;
        for (i, frame) in frames.iter().enumerate() {
            let name = if frames.len() == 1 {
                format!("{}.csv", kind.name())
            } else {
                format!("{}-{}.csv", kind.name(), i + 1)
            };
            let path = std::path::Path::new(&config.output.directory).join(name);
            frame.to_csv(&path)?;
            info!(path = %path.display(), "result set written");
        }
    }

    let path = reports::render_frames(kind, &frames, &config.output)?;
    info!(path = %path.display(), "chart written");
    println!("Chart written to {}", path.display());

    Ok(())
}
