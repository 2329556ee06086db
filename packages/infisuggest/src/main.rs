use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;

use log::{error, info, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use serde::Serialize;
use structopt::StructOpt;

use infisuggest::utils::time::print_time_elapsed;
use infisuggest::worker::WorkerPool;
use infisuggest::{InfiSuggestConfig, Suggester, INFISUGGEST_VERSION};
use infisuggest_search::PhraseSuggestion;

#[derive(StructOpt, Debug)]
#[structopt(name = "infisuggest")]
struct CliArgs {
    #[structopt(parse(from_os_str), help = "Text corpus, one document per line. Text after a tab is ignored")]
    corpus_path: PathBuf,
    #[structopt(help = "Phrases to correct, read from stdin (one per line) if omitted")]
    queries: Vec<String>,
    #[structopt(short, long, parse(from_os_str))]
    config_file_path: Option<PathBuf>,
    #[structopt(short = "t", long, help = "Overrides the configured number of worker threads")]
    num_threads: Option<usize>,
    #[structopt(short, long)]
    verbose: bool,
    #[structopt(long, hidden = true)]
    perf: bool,
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    text: &'a str,
    #[serde(flatten)]
    suggestion: &'a PhraseSuggestion,
}

/// Info when `-v` or `--perf` is set, warn otherwise.
fn log_level(verbose: bool, perf: bool) -> LevelFilter {
    if verbose || perf {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    }
}

fn init_logging(level: LevelFilter) -> Result<(), Box<dyn Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S%.3f)} {h({l})} {m}{n}")))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;

    Ok(())
}

fn read_queries(args_queries: Vec<String>) -> io::Result<Vec<String>> {
    if !args_queries.is_empty() {
        return Ok(args_queries);
    }

    let stdin = io::stdin();
    let mut queries = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            queries.push(line);
        }
    }

    Ok(queries)
}

fn run(args: CliArgs) -> Result<(), Box<dyn Error>> {
    info!("infisuggest {}", INFISUGGEST_VERSION);

    let mut config = match &args.config_file_path {
        Some(config_file_path) => InfiSuggestConfig::load(config_file_path)?,
        None => InfiSuggestConfig::default(),
    };
    if let Some(num_threads) = args.num_threads {
        config.num_threads = num_threads;
    }

    let start = if args.perf { Some(Instant::now()) } else { None };

    let corpus = BufReader::new(File::open(&args.corpus_path)?);
    let suggester = Suggester::from_corpus(&config, corpus)?;
    print_time_elapsed(start.as_ref(), "Indexing");

    let queries = read_queries(args.queries)?;
    let results = if config.num_threads > 1 && queries.len() > 1 {
        let pool = WorkerPool::new(config.num_threads, &suggester);
        let results = pool.suggest_all(&queries);
        pool.terminate();
        results?
    } else {
        queries.iter().map(|query| suggester.suggest(query)).collect()
    };
    print_time_elapsed(start.as_ref(), "Suggesting");

    for (query, result) in queries.iter().zip(results.into_iter()) {
        let suggestion = result?;
        println!("{}", serde_json::to_string(&QueryOutput { text: query, suggestion: &suggestion })?);
    }

    Ok(())
}

fn main() {
    let args: CliArgs = CliArgs::from_args();

    if let Err(e) = init_logging(log_level(args.verbose, args.perf)) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
