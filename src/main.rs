use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use clap::{Parser as ClapParser, Subcommand};
use sieve_lang::{
    Limits,
    cli::{self, CheckOptions, CheckResult, CliError},
    config::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_LENGTH, DEFAULT_MAX_TERMS},
};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "sieve")]
#[command(about = "Sieve - A filter language for list endpoints, checked against a schema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a filter and run it over JSON records or compile it to SQL
    Check {
        /// The filter to check
        filter: String,

        /// Schema file (JSON object keyed by property name)
        #[arg(short, long, env = "SIEVE_SCHEMA")]
        schema: Option<PathBuf>,

        /// JSON records (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Print the SQL condition and its parameters instead of matches
        #[arg(long)]
        sql: bool,

        /// Bind resource lists as one SQL parameter
        #[arg(long, requires = "sql")]
        no_split_lists: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, no schema needed
        #[arg(long)]
        syntax_only: bool,

        /// Maximum filter length in characters
        #[arg(long, env = "SIEVE_MAX_LENGTH", default_value_t = DEFAULT_MAX_LENGTH)]
        max_length: usize,

        /// Maximum nesting of `not` and parentheses
        #[arg(long, env = "SIEVE_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Maximum number of comparisons
        #[arg(long, env = "SIEVE_MAX_TERMS", default_value_t = DEFAULT_MAX_TERMS)]
        max_terms: usize,
    },

    /// List documentation topics
    Docs,

    /// Show documentation for a specific topic
    Doc {
        /// Topic name (use 'sieve docs' to list topics)
        topic: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_env("SIEVE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let (raw_filter, result) = match cli.command {
        Commands::Check {
            filter,
            schema,
            input,
            sql,
            no_split_lists,
            pretty,
            syntax_only,
            max_length,
            max_depth,
            max_terms,
        } => {
            let options = CheckOptions {
                filter: filter.clone(),
                schema: None,
                input,
                sql,
                no_split_lists,
                syntax_only,
                limits: Limits {
                    max_length,
                    max_depth,
                    max_terms,
                },
            };
            (Some(filter), run_check(options, schema, pretty))
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            (None, Ok(()))
        }
        Commands::Doc { topic } => {
            let result = cli::get_doc_topic(&topic).map(|content| print!("{}", content));
            (None, result)
        }
    };

    if let Err(e) = result {
        match raw_filter.as_deref().and_then(|raw| e.report(raw)) {
            Some(report) => match serde_json::to_string(&report) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", e),
            },
            None => eprintln!("{}", e),
        }
        std::process::exit(1);
    }
}

fn run_check(
    mut options: CheckOptions,
    schema: Option<PathBuf>,
    pretty: bool,
) -> Result<(), CliError> {
    if !options.syntax_only {
        options.schema = match schema {
            Some(path) => Some(fs::read_to_string(path)?),
            None => None,
        };
    }

    let needs_records = !options.syntax_only && !options.sql && options.input.is_none();
    if needs_records && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        options.input = Some(buffer);
    }

    let output = match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => {
            println!("Syntax is valid");
            return Ok(());
        }
        CheckResult::Matches(records) => serde_json::to_value(records)?,
        CheckResult::Sql(fragment) => serde_json::to_value(fragment)?,
    };

    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", json);
    Ok(())
}
