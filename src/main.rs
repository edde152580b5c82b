extern crate clap;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches};
use earl::config::context_file::{apply_overrides, load_context, parse_assignment};
use earl::{UriTemplate, Value};
use std::path::Path;

fn cli() -> clap::Command {
    let template_arg = Arg::new("template")
        .value_name("TEMPLATE")
        .required(true)
        .help("RFC 6570 URI template, e.g. '/search{?q,page}'");

    clap::Command::new("earl")
        .about("Expand RFC 6570 URI templates")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Log parsing and expansion details to stderr"),
        )
        .subcommand(
            clap::Command::new("expand")
                .about("Expand a template against a context")
                .arg(template_arg.clone())
                .arg(
                    Arg::new("context")
                        .short('c')
                        .long("context")
                        .value_name("FILE")
                        .help("Path to a YAML or JSON file with variable values"),
                )
                .arg(
                    Arg::new("var")
                        .long("var")
                        .value_name("NAME=VALUE")
                        .action(ArgAction::Append)
                        .help("Set a string variable, overriding the context file"),
                ),
        )
        .subcommand(
            clap::Command::new("parse")
                .about("Print the parsed sections of a template as JSON")
                .arg(template_arg),
        )
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();
}

fn run_expand(matches: &ArgMatches) -> Result<String> {
    let source = matches
        .get_one::<String>("template")
        .context("missing template")?;
    let template = UriTemplate::parse(source)?;

    let context = match matches.get_one::<String>("context") {
        Some(path) => load_context(Path::new(path))?,
        None => Value::Map(Vec::new()),
    };

    let overrides = matches
        .get_many::<String>("var")
        .unwrap_or_default()
        .map(|assignment| parse_assignment(assignment))
        .collect::<Result<Vec<_>>>()?;

    let context = apply_overrides(context, overrides);
    Ok(template.expand(&context)?)
}

fn run_parse(matches: &ArgMatches) -> Result<String> {
    let source = matches
        .get_one::<String>("template")
        .context("missing template")?;
    let template = UriTemplate::parse(source)?;
    Ok(serde_json::to_string_pretty(template.template())?)
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    let output = match matches.subcommand() {
        Some(("expand", sub)) => run_expand(sub)?,
        Some(("parse", sub)) => run_parse(sub)?,
        _ => unreachable!("subcommand is required"),
    };

    println!("{}", output);
    Ok(())
}
