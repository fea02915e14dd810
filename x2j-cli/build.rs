use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of build_cli() in src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
fn build_cli() -> Command {
    Command::new("x2j")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert XML documents to JSON")
        .arg_required_else_help(true)
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
                        .help("JSON schema describing the output")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("indent")
                        .long("indent")
                        .help("Spaces per indentation level")
                        .value_hint(ValueHint::Other),
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
                        .help("Location path")
                        .required(true)
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(Command::new("messages").about("Print the effective error message catalog"))
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = build_cli();

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "x2j", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "x2j", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "x2j", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
