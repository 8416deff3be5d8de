//! findtype - search a type catalog for struct/union declarations
//!
//! Usage:
//!   findtype <catalog.json>                      Interactive prompt
//!   findtype <catalog.json> size=16              One-shot query
//!   findtype <catalog.json> /n size=16 member='double'
//!
//! Query syntax:
//!   [/n] [size=<int>] [name=<pattern>] [member='<Type1>;<Type2>;...']
//!
//! `/n` disables recursive member search. `name` is a regex over
//! declared type names. `member` lists type expressions the candidate
//! must contain, each resolved against the catalog.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use findtype_catalog::TypeCatalog;
use findtype_query::{CancelToken, QuerySpec, Search};

#[derive(Parser)]
#[command(name = "findtype")]
#[command(about = "Search a type catalog for struct/union declarations", long_about = None)]
struct Cli {
    /// Path to the type catalog (JSON)
    catalog: PathBuf,

    /// Query to run once and exit; omit to get an interactive prompt
    #[arg(trailing_var_arg = true)]
    query: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let json = fs::read_to_string(&cli.catalog)
        .with_context(|| format!("failed to read catalog: {}", cli.catalog.display()))?;
    let catalog = TypeCatalog::from_json(&json)
        .with_context(|| format!("failed to parse catalog: {}", cli.catalog.display()))?;
    log::info!("loaded {} declarations", catalog.len());

    let cancel = CancelToken::new();
    let handler = cancel.clone();
    ctrlc::set_handler(move || handler.cancel())
        .context("failed to install interrupt handler")?;

    if !cli.query.is_empty() {
        let raw = cli.query.join(" ");
        if !run_query(&catalog, &cancel, &raw) {
            std::process::exit(1);
        }
        return Ok(());
    }

    repl(&catalog, &cancel)
}

/// Run one query against the catalog, printing matches as they are
/// found. Returns false when the query string did not parse.
fn run_query(catalog: &TypeCatalog, cancel: &CancelToken, raw: &str) -> bool {
    cancel.clear();

    let spec = match QuerySpec::parse(catalog, raw) {
        Ok(spec) => spec,
        Err(e) => {
            println!("findtype: {}", e);
            return false;
        }
    };
    for warning in &spec.warnings {
        println!("findtype: {}", warning);
    }

    let search = match Search::run(catalog, &spec, cancel.clone()) {
        Ok(search) => search,
        Err(e) => {
            println!("findtype: {}", e);
            return false;
        }
    };

    let mut count = 0usize;
    for declaration in search {
        println!("{}", declaration);
        count += 1;
    }
    if cancel.is_cancelled() {
        println!("findtype: interrupted");
    } else if count == 0 {
        println!("findtype: no matching types");
    }
    true
}

fn repl(catalog: &TypeCatalog, cancel: &CancelToken) -> Result<()> {
    let mut editor: Editor<(), DefaultHistory> =
        Editor::new().context("failed to initialize line editor")?;

    println!("findtype: {} declarations loaded", catalog.len());
    println!("Type 'help' for query syntax, 'quit' or Ctrl+D to leave");

    loop {
        match editor.readline("findtype> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                match line {
                    "quit" | "exit" => break,
                    "help" => print_help(),
                    _ => {
                        run_query(catalog, cancel, line);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                cancel.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("readline failed"),
        }
    }

    Ok(())
}

fn print_help() {
    println!("Query syntax: [/n] [size=<int>] [name=<pattern>] [member='<Type1>;<Type2>;...']");
    println!("  /n                 match direct members only (no recursion)");
    println!("  size=<int>         exact size of the type in bytes");
    println!("  name=<pattern>     regex over declared type names");
    println!("  member='<types>'   semicolon-separated member types the candidate must contain");
    println!("Example: size=16 member='double; struct list*'");
}
