use clap::{Parser as ClapParser, Subcommand};
use await_fields::{
    AnalyzerOptions,
    cli::{self, CliError, InferOptions, MergeOptions},
};
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "await-fields")]
#[command(about = "Infer the GraphQL fields a template reads from awaited queries")]
#[command(version)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer selection bodies for every await block in a template
    Infer {
        /// Template file (reads --input or stdin if not provided)
        file: Option<PathBuf>,

        /// Template text
        #[arg(short, long)]
        input: Option<String>,

        /// Print field trees instead of selection bodies
        #[arg(long)]
        tree: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Lex <script> and <style> regions too
        #[arg(long)]
        keep_scripts: bool,

        /// Keep method names at the end of access chains
        #[arg(long)]
        keep_method_calls: bool,

        /// First word of iteration directives
        #[arg(long, default_value = "#each")]
        each_keyword: String,

        /// Deepest field path recorded below an awaited value
        #[arg(long, default_value_t = 64)]
        max_depth: usize,
    },

    /// Merge dotted field paths into a query's endpoint field
    Merge {
        /// Query file (reads --query or stdin if not provided)
        file: Option<PathBuf>,

        /// Query text
        #[arg(short, long)]
        query: Option<String>,

        /// Field path to add, e.g. address.city (repeatable)
        #[arg(short, long = "field", required = true)]
        fields: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.log_level);

    let result = match cli.command {
        Commands::Infer {
            file,
            input,
            tree,
            pretty,
            keep_scripts,
            keep_method_calls,
            each_keyword,
            max_depth,
        } => read_input(file, input).and_then(|input| {
            run_infer(InferOptions {
                input,
                tree,
                pretty,
                analyzer: AnalyzerOptions {
                    iteration_keyword: each_keyword,
                    strip_script_blocks: !keep_scripts,
                    drop_method_calls: !keep_method_calls,
                    max_field_depth: max_depth,
                },
            })
        }),
        Commands::Merge {
            file,
            query,
            fields,
        } => read_input(file, query).and_then(|query| {
            let printed = cli::execute_merge(&MergeOptions { query, fields })?;
            print!("{}", printed);
            Ok(())
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn setup_logging(default_level: tracing::Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string().to_ascii_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

/// File argument, then inline text, then piped stdin
fn read_input(file: Option<PathBuf>, inline: Option<String>) -> Result<Option<String>, CliError> {
    if let Some(path) = file {
        return Ok(Some(fs::read_to_string(path)?));
    }

    match inline {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn run_infer(options: InferOptions) -> Result<(), CliError> {
    let output = cli::execute_infer(&options)?;

    let json = if options.pretty {
        serde_json::to_string_pretty(&output.json)
    } else {
        serde_json::to_string(&output.json)
    }?;
    println!("{}", json);

    if output.diagnostics > 0 {
        tracing::info!(count = output.diagnostics, "template constructs were skipped");
    }
    Ok(())
}
