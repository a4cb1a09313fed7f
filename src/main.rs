mod api;
mod cli;
mod config;
mod filter;
mod list;
mod model;
mod sort;
mod transcript;
mod view;

use anyhow::Result;
use clap::Parser;
use std::cell::RefCell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "userlist", about = "Browse a paginated user directory")]
pub struct Args {
    #[arg(long, env = "USERLIST_BASE_URL", help = "Users API base URL")]
    pub base_url: Option<String>,

    #[arg(long, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "GENDER", help = "Initial gender filter (male, female)")]
    pub gender: Option<String>,

    #[arg(long, value_name = "TEXT", help = "Initial country filter (substring)")]
    pub country: Option<String>,

    #[arg(long, value_name = "FIELD", help = "Initial sort column: id, name, age")]
    pub sort: Option<String>,

    #[arg(long, help = "Sort descending (by id unless --sort is given)")]
    pub desc: bool,

    #[arg(
        short,
        long,
        value_name = "N",
        help = "One-shot mode: load N pages, print the table and exit"
    )]
    pub pages: Option<usize>,

    #[arg(long, help = "Session transcripts directory")]
    pub transcripts_dir: Option<PathBuf>,

    #[arg(long, help = "Enable tracing of requests and state changes")]
    pub trace: bool,

    #[arg(long, help = "Verbose output (print page summaries)")]
    pub verbose: bool,

    #[arg(long, help = "Debug output (print settings)")]
    pub debug: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut cfg = if let Some(config_path) = &args.config {
        config::Config::load_from(config_path)?
    } else {
        config::Config::load()?
    };

    // CLI overrides config files
    if let Some(base_url) = &args.base_url {
        cfg.api.base_url = base_url.clone();
    }
    if let Some(dir) = &args.transcripts_dir {
        cfg.session.transcripts_dir = Some(dir.clone());
    }

    if let Err(errors) = cfg.validate() {
        for e in &errors {
            eprintln!("Config error {}", e);
        }
        return Err(anyhow::anyhow!(
            "Invalid configuration ({} errors)",
            errors.len()
        ));
    }

    let gender = match args.gender.as_deref() {
        None => None,
        Some(s) if s.eq_ignore_ascii_case("all") => None,
        Some(s) => Some(model::Gender::from_str(s).ok_or_else(|| {
            anyhow::anyhow!("Invalid gender: {}. Use: male, female, all", s)
        })?),
    };
    let filters = filter::FilterState::new(gender, args.country.as_deref());

    let mut list = list::UserList::new(filters);
    if let Some(sort) = sort::SortState::from_args(args.sort.as_deref(), args.desc)? {
        list.set_sort(sort);
    }

    if args.pages == Some(0) {
        return Err(anyhow::anyhow!("--pages must be at least 1"));
    }

    if args.debug {
        eprintln!("[DEBUG] Base URL: {}", cfg.api.base_url);
        eprintln!("[DEBUG] Timeout: {} ms", cfg.api.timeout_ms);
        eprintln!("[DEBUG] Filters: {}", list.filters().describe());
        eprintln!("[DEBUG] Display: {:?}", cfg.display);
    }

    let session_id = uuid::Uuid::new_v4().to_string();
    let transcript = match &cfg.session.transcripts_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(format!("{}.jsonl", session_id));
            let mut t = transcript::Transcript::new(&path, &session_id)?;
            t.session_start(&cfg.api.base_url)?;
            Some(t)
        }
        None => None,
    };

    let client = api::Client::new(&cfg.api.base_url, cfg.api.timeout_ms);
    let trace = args.trace;

    let ctx = cli::Context {
        args,
        config: cfg,
        session_id,
        source: Box::new(client),
        list: RefCell::new(list),
        transcript: RefCell::new(transcript),
        tracing: RefCell::new(trace),
    };

    if let Some(pages) = ctx.args.pages {
        cli::run_once(&ctx, pages)
    } else {
        cli::run_repl(ctx)
    }
}
