use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use regex::Regex;
use setsumei::core::FileConfig;
use setsumei::core::config::compile_ban;
use setsumei::executor::client::{DEFAULT_CLIENT, DEFAULT_QUERY_FILE};
use setsumei::{
    ColorMode, ExplainBuilder, ExplainConfig, MysqlClient, MysqlConnection, SetsumeiError,
    SpecialOverride, TableFormatter,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status for every fatal error
const EXIT_FAILURE: i32 = 10;

const ENV_HELP: &str = "\
Environment variables:
  MYSQL_HOST      MySQL host (default: 127.0.0.1)
  MYSQL_PORT      MySQL port (default: 3306)
  MYSQL_USER      MySQL user name (default: isucon)
  MYSQL_PASS      MySQL password (default: isucon)
  MYSQL_DBNAME    MySQL database name (default: isuumo)";

/// Setsumei - EXPLAIN every query of a mysqldumpslow summary
#[derive(Parser, Debug)]
#[command(name = "setsumei", version = "1.0.0")]
#[command(about = "Run EXPLAIN for every query of a MySQL slow log summary", long_about = None)]
#[command(after_help = ENV_HELP)]
struct Args {
    /// Read logs from these files. Otherwise, use STDIN instead
    #[arg(value_name = "SLOW_QUERY_FILES")]
    files: Vec<PathBuf>,

    /// Set a replacement value for number placeholders
    #[arg(short = 'n', long, value_name = "NUM", allow_negative_numbers = true)]
    number: Option<i64>,

    /// Specify a replacement value for LIMIT placeholders
    #[arg(short = 'l', long, value_name = "NUM")]
    limit: Option<i64>,

    /// Specify a replacement value for OFFSET placeholders
    #[arg(short = 'o', long, value_name = "NUM")]
    offset: Option<i64>,

    /// Specify a replacement value for upper bound placeholders
    #[arg(short = 'U', long, value_name = "NUM", allow_negative_numbers = true)]
    upper_bound: Option<i64>,

    /// Specify a replacement value for lower bound placeholders
    #[arg(short = 'L', long, value_name = "NUM", allow_negative_numbers = true)]
    lower_bound: Option<i64>,

    /// Set a replacement value for string placeholders
    #[arg(short = 's', long, value_name = "STR")]
    string: Option<String>,

    /// Specify a replacement value for LIKE placeholders
    #[arg(short = 'k', long, value_name = "STR")]
    like: Option<String>,

    /// Specify when to highlight words
    #[arg(short = 'c', long, value_name = "WHEN", value_enum)]
    color: Option<ColorMode>,

    /// Set the pattern for highlighting results
    #[arg(short = 'b', long, value_name = "REGEXP", value_parser = compile_ban)]
    ban: Option<Regex>,

    /// Output EXPLAIN queries
    #[arg(short = 'q', long)]
    query: bool,

    /// Specify a special replacement value for one placeholder
    #[arg(short = 'a', long = "add-special", value_name = "ROW,COL,VAL")]
    specials: Vec<SpecialOverride>,

    /// Output compactly
    #[arg(short = 'z', long)]
    zip: bool,

    /// Output more debug messages
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Config file (default: ./setsumei.toml, then the user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// File the EXPLAIN queries are written to before running the client
    #[arg(long, value_name = "PATH", default_value = DEFAULT_QUERY_FILE)]
    query_file: PathBuf,

    /// MySQL command-line client
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_CLIENT)]
    client: String,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => fail(&SetsumeiError::InvalidArgument(e.to_string())),
    };

    init_logging(args.verbose);

    if let Err(err) = run(&args) {
        fail(&err);
    }
}

/// RUST_LOG wins; otherwise --verbose means debug
fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }))
}

/// Installs the global subscriber; called once from `main`
fn init_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), SetsumeiError> {
    let config = load_config(args)?;

    let raw_log = read_input(&args.files)?;
    let batch = ExplainBuilder::new(&config).build(&raw_log)?;
    let query = batch.query();

    if config.output_queries {
        batch.write_numbered(&mut io::stderr().lock())?;
    } else {
        debug!("{}", query.replace('\n', " "));
    }

    let client = MysqlClient::new(MysqlConnection::from_env()?)
        .with_program(args.client.clone())
        .with_query_file(args.query_file.clone());
    let response = client.explain(&query)?;

    let color = config.color.enabled(io::stdout().is_terminal());
    println!(
        "{}",
        TableFormatter::new(&config, color).format(&response.stdout)
    );

    Ok(())
}

/// Priority: CLI args > config file > defaults
fn load_config(args: &Args) -> Result<ExplainConfig, SetsumeiError> {
    let mut config = ExplainConfig::new();

    if let Some(path) = FileConfig::discover(args.config.as_deref()) {
        config.apply_file(FileConfig::load(&path)?)?;
        debug!("Loaded config from: {}", path.display());
    }

    if let Some(n) = args.number {
        config.number = n;
    }
    if args.limit.is_some() {
        config.limit = args.limit;
    }
    if args.offset.is_some() {
        config.offset = args.offset;
    }
    if args.upper_bound.is_some() {
        config.upper_bound = args.upper_bound;
    }
    if args.lower_bound.is_some() {
        config.lower_bound = args.lower_bound;
    }
    if let Some(s) = &args.string {
        config.string.clone_from(s);
    }
    if args.like.is_some() {
        config.like.clone_from(&args.like);
    }
    if let Some(color) = args.color {
        config.color = color;
    }
    if let Some(ban) = &args.ban {
        config.ban = ban.clone();
    }
    if args.query {
        config.output_queries = true;
    }
    if args.zip {
        config.compact = true;
    }
    for special in &args.specials {
        config.add_special(special.clone());
    }

    Ok(config)
}

/// Concatenate the given files, or read STDIN when there are none
fn read_input(files: &[PathBuf]) -> Result<String, SetsumeiError> {
    let mut raw = String::new();

    if files.is_empty() {
        debug!("Reading from stdin...");
        io::stdin().read_to_string(&mut raw)?;
        return Ok(raw);
    }

    for path in files {
        raw.push_str(&read_file(path)?);
        if !raw.ends_with('\n') {
            raw.push('\n');
        }
    }

    Ok(raw)
}

fn read_file(path: &Path) -> Result<String, SetsumeiError> {
    fs::read_to_string(path).map_err(|source| SetsumeiError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Print the error with its causes and the usage text, then exit
fn fail(err: &SetsumeiError) -> ! {
    eprintln!("Error: {err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }

    println!();
    println!("{}", Args::command().render_help());
    process::exit(EXIT_FAILURE);
}
