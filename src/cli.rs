use crate::{
    api::UserSource,
    config::Config,
    list::{FetchOutcome, UserList},
    model::Gender,
    sort::SortField,
    transcript::Transcript,
    view, Args,
};
use anyhow::{anyhow, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::cell::RefCell;

pub struct Context {
    pub args: Args,
    pub config: Config,
    pub session_id: String,
    pub source: Box<dyn UserSource>,
    pub list: RefCell<UserList>,
    pub transcript: RefCell<Option<Transcript>>,
    pub tracing: RefCell<bool>,
}

fn trace(ctx: &Context, label: &str, content: &str) {
    if *ctx.tracing.borrow() {
        eprintln!("[TRACE:{}] {}", label, content);
    }
}

fn verbose(ctx: &Context, message: &str) {
    if ctx.args.verbose || ctx.args.debug {
        eprintln!("[VERBOSE] {}", message);
    }
}

/// Run one transcript write; a broken log never interrupts browsing
fn record(ctx: &Context, f: impl FnOnce(&mut Transcript) -> Result<()>) {
    if let Some(t) = ctx.transcript.borrow_mut().as_mut() {
        if let Err(e) = f(t) {
            eprintln!("Warning: failed to write transcript: {}", e);
        }
    }
}

/// Fetch the page at the cursor, if one may be fetched, and log the outcome.
/// Returns `None` when pagination is over or a fetch is already in flight.
pub fn fetch_next(ctx: &Context) -> Option<FetchOutcome> {
    let Some(ticket) = ctx.list.borrow_mut().begin_fetch() else {
        trace(ctx, "FETCH", "skipped (no more data or fetch in flight)");
        return None;
    };

    trace(
        ctx,
        "FETCH",
        &format!("page {} (limit={}, skip={})", ticket.page, ticket.limit(), ticket.skip()),
    );
    record(ctx, |t| t.fetch_start(ticket.page, ticket.limit(), ticket.skip()));

    let result = ctx.source.fetch_page(ticket.limit(), ticket.skip());
    if let Ok(page) = &result {
        trace(
            ctx,
            "RESPONSE",
            &format!(
                "{} users (total={:?}, skip={:?}, limit={:?})",
                page.users.len(),
                page.total,
                page.skip,
                page.limit
            ),
        );
    }

    let outcome = ctx.list.borrow_mut().complete_fetch(ticket, result);
    match &outcome {
        FetchOutcome::Loaded { page, raw, kept } => {
            let (page, raw, kept) = (*page, *raw, *kept);
            let has_more = ctx.list.borrow().has_more();
            verbose(
                ctx,
                &format!("page {}: {} fetched, {} kept after filters", page, raw, kept),
            );
            record(ctx, |t| t.fetch_ok(page, raw, kept, has_more));
        }
        FetchOutcome::Failed(e) => {
            eprintln!("Error fetching users: {:#}", e);
            record(ctx, |t| t.fetch_err(ticket.page, &format!("{:#}", e)));
        }
        FetchOutcome::Stale => {
            trace(ctx, "FETCH", &format!("discarded stale page {}", ticket.page));
            record(ctx, |t| t.fetch_stale(ticket.page));
        }
    }
    Some(outcome)
}

fn print_list(ctx: &Context) {
    print!("{}", view::render(&ctx.list.borrow(), &ctx.config.display));
}

/// A filter edit starts a new session and immediately loads its first page
fn after_filter_change(ctx: &Context) {
    let filters = ctx.list.borrow().filters().clone();
    trace(ctx, "FILTER", &filters.describe());
    record(ctx, |t| t.filter_change(&filters));
    fetch_next(ctx);
    print_list(ctx);
}

/// Scroll near the bottom: load the next page or report the end
fn scroll(ctx: &Context) {
    match fetch_next(ctx) {
        Some(FetchOutcome::Loaded { .. }) => print_list(ctx),
        // Already logged; the list is unchanged
        Some(_) => {}
        None if !ctx.list.borrow().has_more() => println!("{}", view::END_MESSAGE),
        None => {}
    }
}

/// Load up to `pages` pages and print the table. A failed page ends the run
/// with an error; it is not requested again.
pub fn run_once(ctx: &Context, pages: usize) -> Result<()> {
    for _ in 0..pages {
        match fetch_next(ctx) {
            None => break,
            Some(FetchOutcome::Failed(_)) => {
                print_list(ctx);
                let page = ctx.list.borrow().cursor();
                return Err(anyhow!("Stopped after failing to fetch page {}", page));
            }
            Some(_) => {}
        }
    }
    print_list(ctx);
    Ok(())
}

pub fn run_repl(ctx: Context) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("userlist - type /help for commands, Enter for more, /exit to quit");
    fetch_next(&ctx);
    print_list(&ctx);

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    scroll(&ctx);
                    continue;
                }
                rl.add_history_entry(line)?;

                if handle_command(&ctx, line) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Dispatch one REPL line. Returns true when the session should end.
pub fn handle_command(ctx: &Context, cmd: &str) -> bool {
    let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
    let arg = if parts.len() > 1 { parts[1].trim() } else { "" };
    match parts[0] {
        "/exit" | "/quit" => return true,
        "/help" => {
            println!("Commands:");
            println!("  /exit                 - quit");
            println!("  /help                 - show commands");
            println!("  /show                 - redraw the table");
            println!("  /more  (or Enter)     - load the next page");
            println!("  /sort id|name|age     - sort by column (repeat to reverse)");
            println!("  /gender male|female|all - filter by gender");
            println!("  /country [text]       - filter by country substring (empty clears)");
            println!("  /reset                - clear all filters");
            println!("  /status               - show paging, filter and sort state");
            println!("  /trace                - toggle tracing");
        }
        "/show" => print_list(ctx),
        "/more" => scroll(ctx),
        "/sort" => match SortField::from_str(arg) {
            Some(field) => {
                ctx.list.borrow_mut().toggle_sort(field);
                let sort = ctx.list.borrow().sort();
                trace(ctx, "SORT", &sort.to_string());
                record(ctx, |t| t.sort_change(&sort));
                print_list(ctx);
            }
            None => println!("Usage: /sort id|name|age"),
        },
        "/gender" => {
            let gender = match arg.to_lowercase().as_str() {
                "" | "all" => None,
                other => match Gender::from_str(other) {
                    Some(g) => Some(g),
                    None => {
                        println!("Usage: /gender male|female|all");
                        return false;
                    }
                },
            };
            ctx.list.borrow_mut().set_gender(gender);
            after_filter_change(ctx);
        }
        "/country" => {
            ctx.list.borrow_mut().set_country(arg);
            after_filter_change(ctx);
        }
        "/reset" => {
            ctx.list.borrow_mut().set_filters(Default::default());
            after_filter_change(ctx);
        }
        "/status" => {
            let list = ctx.list.borrow();
            println!("Session: {}", ctx.session_id);
            println!("Rows: {}", list.users().len());
            println!("Next page: {}", list.cursor());
            println!("More data: {}", if list.has_more() { "yes" } else { "no" });
            println!("Loading: {}", if list.is_loading() { "yes" } else { "no" });
            println!("Filters: {}", list.filters().describe());
            if list.sort_active() {
                println!("Sort: {}", list.sort());
            } else {
                println!("Sort: none (API order)");
            }
            if let Some(t) = ctx.transcript.borrow().as_ref() {
                println!("Transcript: {:?}", t.path);
            }
        }
        "/trace" => {
            let mut t = ctx.tracing.borrow_mut();
            *t = !*t;
            println!("Tracing: {}", if *t { "on" } else { "off" });
        }
        _ => println!("Unknown command: {}", parts[0]),
    }
    false
}
