use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::json;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use vecstore::{parse_finite, VectorRecord, VectorStore};

#[derive(Parser, Debug)]
#[command(name = "vecstore")]
#[command(about = "In-memory vector store with nearest-neighbor search", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to run; starts an interactive session when omitted
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Field delimiter for ingested files
    #[arg(short, long, global = true, default_value_t = ',', env = "VECSTORE_DELIMITER")]
    pub delimiter: char,

    /// Ingest these files before running the command
    #[arg(short, long = "load", value_name = "FILE")]
    pub load: Vec<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Log only warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Commands shared by single-command mode and the REPL.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Insert a vector
    Insert {
        #[arg(required = true, allow_negative_numbers = true, value_name = "V", value_parser = finite_f64)]
        values: Vec<f64>,
    },
    /// Ingest a delimited text file, one vector per line
    Ingest {
        path: PathBuf,
    },
    /// Find the stored vector closest to the query
    Nearest {
        #[arg(required = true, allow_negative_numbers = true, value_name = "V", value_parser = finite_f64)]
        values: Vec<f64>,
    },
    /// Find the k stored vectors closest to the query
    Search {
        #[arg(required = true, allow_negative_numbers = true, value_name = "V", value_parser = finite_f64)]
        values: Vec<f64>,
        #[arg(short, long = "k_top", default_value_t = 5)]
        k_top: usize,
    },
    /// Show the vector stored at an index
    Get {
        index: usize,
    },
    /// List all vectors
    List,
    /// Show vector count
    Count,
}

/// Vector components must be finite; `inf` and `NaN` are refused.
fn finite_f64(value: &str) -> std::result::Result<f64, String> {
    parse_finite(value).ok_or_else(|| format!("'{}' is not a finite number", value))
}

/// One REPL input line, parsed without a binary name.
#[derive(Parser, Debug)]
#[command(name = "vecstore", no_binary_name = true, disable_help_subcommand = true)]
struct ReplLine {
    #[command(subcommand)]
    command: Command,
}

/// Settings that shape how commands run and print.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub delimiter: char,
    pub json: bool,
}

impl From<&Cli> for Options {
    fn from(cli: &Cli) -> Self {
        Options { delimiter: cli.delimiter, json: cli.json }
    }
}

/// Builds the store, preloads files, then runs one command or the REPL.
pub fn run(cli: Cli) -> Result<()> {
    let options = Options::from(&cli);
    let mut store = VectorStore::new();

    for path in &cli.load {
        let count = ingest_file(&mut store, path, options.delimiter)?;
        info!("loaded {} vectors from '{}'", count, path.display());
    }

    match cli.command {
        Some(command) => {
            let output = execute_command(&mut store, command, options)?;
            println!("{}", output);
            Ok(())
        }
        None => run_repl(&mut store, options),
    }
}

/// Reads `path` and hands its lines to the store.
fn ingest_file(store: &mut VectorStore, path: &Path, delimiter: char) -> Result<usize> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;

    let count = store.ingest_delimited(contents.lines(), delimiter)
        .with_context(|| format!("failed to ingest '{}'", path.display()))?;

    Ok(count)
}

/// REPL mode - interactive session over one store
pub fn run_repl(store: &mut VectorStore, options: Options) -> Result<()> {
    println!("vecstore - In-Memory Vector Store");
    println!("Type 'help' for commands, 'exit' or 'quit' to quit\n");

    loop {
        print!("vecstore> ");
        io::stdout().flush()?;

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input == "exit" || input == "quit" {
            println!("Goodbye!");
            break;
        }

        if input == "help" {
            print_help();
            continue;
        }

        let command = match ReplLine::try_parse_from(input.split_whitespace()) {
            Ok(line) => line.command,
            Err(error) => {
                eprint!("{}", error);
                continue;
            }
        };

        match execute_command(store, command, options) {
            Ok(output) => println!("{}", output),
            Err(error) => eprintln!("Error: {:#}", error),
        }
    }

    Ok(())
}

/// Runs one command against the store and renders its result.
pub fn execute_command(store: &mut VectorStore, command: Command, options: Options) -> Result<String> {
    let output = match command {
        Command::Insert { values } => {
            let dimension = values.len();
            store.insert(VectorRecord::from_values(values))?;
            let index = store.len() - 1;

            if options.json {
                json!({ "index": index, "dimension": dimension }).to_string()
            } else {
                format!("Inserted vector at index {} (dimension {})", index, dimension)
            }
        }

        Command::Ingest { path } => {
            let count = ingest_file(store, &path, options.delimiter)?;

            if options.json {
                json!({ "path": path, "ingested": count, "total": store.len() }).to_string()
            } else {
                format!("Ingested {} vectors from '{}' ({} total)", count, path.display(), store.len())
            }
        }

        Command::Nearest { values } => {
            let query = VectorRecord::from_values(values);
            let hit = store.nearest(&query);

            if options.json {
                json!({ "match": hit }).to_string()
            } else {
                match hit {
                    Some(n) => format!(
                        "Nearest: index {}, distance {:.4}, vector {:?}",
                        n.index, n.distance, n.record.values()
                    ),
                    None if store.is_empty() => "Store is empty".to_string(),
                    None => format!("No vector with dimension {}", query.dimension()),
                }
            }
        }

        Command::Search { values, k_top } => {
            let query = VectorRecord::from_values(values);
            let results = store.search(&query, k_top);

            if options.json {
                json!({ "matches": results }).to_string()
            } else if results.is_empty() {
                "No results found".to_string()
            } else {
                let mut lines = vec![format!("Top {} results:", results.len())];
                for (rank, n) in results.iter().enumerate() {
                    lines.push(format!(
                        "{}. Index: {}, Distance: {:.4}, Vector: {:?}",
                        rank + 1, n.index, n.distance, n.record.values()
                    ));
                }
                lines.join("\n")
            }
        }

        Command::Get { index } => {
            let Some(record) = store.get(index) else {
                bail!("Vector {} not found", index);
            };

            if options.json {
                json!({ "index": index, "vector": record }).to_string()
            } else {
                format!("Vector {}: {:?}", index, record.values())
            }
        }

        Command::List => {
            if options.json {
                json!({ "vectors": store.records() }).to_string()
            } else if store.is_empty() {
                "Store is empty".to_string()
            } else {
                let mut lines = vec!["Stored vectors:".to_string()];
                for (index, record) in store.records().iter().enumerate() {
                    lines.push(format!("  {}: {:?}", index, record.values()));
                }
                lines.push(format!("Total: {} vectors", store.len()));
                lines.join("\n")
            }
        }

        Command::Count => {
            if options.json {
                json!({ "count": store.len() }).to_string()
            } else {
                store.len().to_string()
            }
        }
    };

    Ok(output)
}

fn print_help() {
    println!("Available commands:");
    println!("  insert <v1> <v2> ...              - Insert a vector");
    println!("  ingest <path>                     - Ingest a delimited file, one vector per line");
    println!("  nearest <v1> <v2> ...             - Find the closest vector");
    println!("  search <v1> <v2> ... [--k_top N]  - Find the N closest vectors (default 5)");
    println!("  get <index>                       - Show the vector at an index");
    println!("  list                              - List all vectors");
    println!("  count                             - Show vector count");
    println!("  help                              - Show this help");
    println!("  exit, quit                        - Exit the program");
}
