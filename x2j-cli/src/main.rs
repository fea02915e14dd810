// Command-line interface for x2j
//
// This binary converts XML files to JSON, either through a JSON schema that describes the output
// or by mapping the markup structure directly when no schema is available.
//
// Usage:
//  x2j <input> [--schema <file>] [-o <file>] [--indent <n>]          - Convert (default)
//  x2j convert <input> [--schema <file>] [-o <file>] [--indent <n>]  - Same as above (explicit)
//  x2j query <input> <path>                                          - Print the nodes a path selects
//  x2j messages                                                      - Print the error catalog
//
// Configuration is layered: built-in defaults, ~/.x2j.toml, ./x2j.toml, then --config.
// Log filtering comes from X2J_LOG, else --verbose, else logging.level in the configuration.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use x2j::path::{resolve_node_set, Item};
use x2j::{markup, X2jError};
use x2j_config::{fatal, Catalog, ConfigSources, X2jConfig};

const SUBCOMMANDS: &[&str] = &["convert", "query", "messages", "help"];

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "X2J_LOG";

fn build_cli() -> Command {
    Command::new("x2j")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert XML documents to JSON")
        .long_about(
            "x2j converts XML documents to JSON.\n\n\
            The shape of the output is described by a JSON schema whose string values\n\
            say where each value comes from (XPATH(...), VALUE(...), CONCAT(...), ...).\n\
            Without a schema, a JSONSchema element inside the XML is used; failing that,\n\
            the XML structure is mapped onto JSON directly.\n\n\
            Examples:\n  \
            x2j shipment.xml --schema shipment.json      # Convert (outputs to stdout)\n  \
            x2j shipment.xml -o shipment.json            # Default mapping to a file\n  \
            x2j query shipment.xml '/Shipment/Line/@Id'  # Inspect what a path selects",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an x2j.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log conversion progress to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert an XML file to JSON (default command)")
                .arg(
                    Arg::new("input")
                        .help("Input XML file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("schema")
                        .long("schema")
                        .short('s')
                        .value_name("FILE")
                        .help("JSON schema describing the output")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("FILE")
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("indent")
                        .long("indent")
                        .value_name("N")
                        .help("Spaces per indentation level (overrides output.indent)")
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("query")
                .about("Print every node a location path selects")
                .arg(
                    Arg::new("input")
                        .help("Input XML file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("path")
                        .help("Location path, e.g. /Shipment/Line[2]/@Id")
                        .required(true)
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(Command::new("messages").about("Print the effective error message catalog"))
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            if args.len() > 1 && !args[1].starts_with('-') && !SUBCOMMANDS.contains(&args[1].as_str())
            {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    let sources = ConfigSources::discover(matches.get_one::<String>("config").map(PathBuf::from));
    let catalog = match x2j_config::load_catalog(&sources) {
        Ok(catalog) => catalog,
        Err(err) => {
            init_logging("warn");
            fail(&Catalog::default(), err);
        }
    };
    let config = match load_settings(&sources, &matches) {
        Ok(config) => config,
        Err(err) => {
            init_logging("warn");
            fail(&catalog, err);
        }
    };
    init_logging(&config.logging.level);

    let result = match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let schema = sub_matches.get_one::<String>("schema").map(String::as_str);
            let output = sub_matches.get_one::<String>("output").map(String::as_str);
            handle_convert_command(input, schema, output, config.output.indent)
        }
        Some(("query", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            handle_query_command(input, path)
        }
        Some(("messages", _)) => {
            handle_messages_command(&catalog);
            Ok(())
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        fail(&catalog, err);
    }
}

/// Layered configuration with command-line flags applied on top.
fn load_settings(sources: &ConfigSources, matches: &ArgMatches) -> Result<X2jConfig, X2jError> {
    let mut loader = sources.loader();
    if matches.get_flag("verbose") {
        loader = loader.set_override("logging.level", "debug").map_err(fatal)?;
    }
    let indent = matches
        .subcommand_matches("convert")
        .and_then(|sub_matches| sub_matches.get_one::<u32>("indent"));
    if let Some(&indent) = indent {
        loader = loader
            .set_override("output.indent", i64::from(indent))
            .map_err(fatal)?;
    }
    loader.build().map_err(fatal)
}

/// Install the stderr subscriber. `X2J_LOG` wins over the configured level.
fn init_logging(level: &str) {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn fail(catalog: &Catalog, err: X2jError) -> ! {
    error!(code = err.kind().code(), "{}", catalog.describe(&err));
    std::process::exit(1);
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    schema: Option<&str>,
    output: Option<&str>,
    indent: usize,
) -> Result<(), X2jError> {
    let source = x2j::read_markup_file(input)?;
    let doc = x2j::load_markup(&source)?;

    let schema = match schema {
        Some(path) => {
            debug!(schema = path, "reading schema");
            x2j::load_schema(&x2j::read_schema_file(path)?)?
        }
        None => None,
    };

    let json = match &schema {
        Some(schema) => x2j::convert(doc.root_element(), Some(schema))?,
        None => x2j::convert_document(&doc)?,
    };

    match output {
        Some(path) => {
            debug!(output = path, "writing JSON");
            x2j::persist_json(&json, path, indent)
        }
        None => {
            let mut bytes = x2j::emit_json(&json, indent)?;
            bytes.push(b'\n');
            std::io::stdout()
                .lock()
                .write_all(&bytes)
                .map_err(|e| X2jError::new(x2j::ErrorKind::Persist, e.to_string()))
        }
    }
}

/// Handle the query command
fn handle_query_command(input: &str, path: &str) -> Result<(), X2jError> {
    let source = x2j::read_markup_file(input)?;
    let doc = x2j::load_markup(&source)?;

    let items = resolve_node_set(doc.root_element(), path)?;
    debug!(path, count = items.len(), "query matched");
    for item in items {
        match item {
            Item::Node(node) if node.is_element() => println!("{}", markup::serialize_element(node)?),
            other => println!("{}", other.string_value()),
        }
    }
    Ok(())
}

/// Handle the messages command
fn handle_messages_command(catalog: &Catalog) {
    for (kind, message) in catalog.entries() {
        println!("{} = {message}", kind.code());
    }
}
