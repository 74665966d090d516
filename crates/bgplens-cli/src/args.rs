use std::fmt::Write as _;

use bgplens_backends::all_backends;
use bgplens_types::TimeWindow;
use clap::{CommandFactory, FromArgMatches, Parser};

#[derive(Parser, Debug)]
#[command(name = "bgplens")]
#[command(about = "Read filtered BGP records from archival data interfaces", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data interface used to find available data
    #[arg(short = 'd', long = "data-interface", value_name = "interface")]
    pub interface: Option<String>,

    /// Set an option for the current data interface; use '-o ?' to list
    /// the options the selected interface accepts
    #[arg(short = 'o', long = "option", value_name = "name,value", value_parser = parse_option_arg)]
    pub options: Vec<OptionArg>,

    /// Process records from only the given project (routeviews, ris)
    #[arg(short = 'p', long = "project", value_name = "project")]
    pub projects: Vec<String>,

    /// Process records from only the given collector
    #[arg(short = 'c', long = "collector", value_name = "collector")]
    pub collectors: Vec<String>,

    /// Process records with only the given type (ribs, updates)
    #[arg(short = 't', long = "type", value_name = "type")]
    pub record_types: Vec<String>,

    /// Process records only within the given time window; at least one
    /// window is required
    #[arg(short = 'w', long = "window", value_name = "start,end", value_parser = parse_window)]
    pub windows: Vec<TimeWindow>,

    /// Process at most one RIB dump per collector every <seconds>
    #[arg(short = 'P', long = "rib-period", value_name = "seconds")]
    pub rib_period: Option<u32>,

    /// Make blocking requests for records; allows data to be processed in
    /// real time as it is published
    #[arg(short = 'b', long = "blocking")]
    pub blocking: bool,

    /// Print one line per record (default when no output mode is given)
    #[arg(short = 'r', long = "records")]
    pub record_output: bool,

    /// Print each valid record's payload in the interface's native dump
    /// format
    #[arg(short = 'm', long = "native-dump")]
    pub native_output: bool,

    /// Print one line per element of each valid record
    #[arg(short = 'e', long = "elems")]
    pub elem_output: bool,

    /// Read defaults from this config file instead of the usual locations
    #[arg(long = "config", value_name = "file")]
    pub config: Option<String>,
}

/// One `-o` occurrence: either a name,value pair or the `?` listing
/// request.
#[derive(Debug, Clone)]
pub enum OptionArg {
    List,
    Set { name: String, value: String },
}

fn parse_option_arg(s: &str) -> Result<OptionArg, String> {
    if s == "?" {
        return Ok(OptionArg::List);
    }
    match s.split_once(',') {
        Some((name, value)) if !name.is_empty() => Ok(OptionArg::Set {
            name: name.to_string(),
            value: value.to_string(),
        }),
        _ => Err(format!(
            "malformed data interface option '{}': expecting <option-name>,<option-value>",
            s
        )),
    }
}

fn parse_window(s: &str) -> Result<TimeWindow, String> {
    let malformed = || format!("malformed time window '{}': expecting <start>,<end>", s);
    let (start, end) = s.split_once(',').ok_or_else(malformed)?;
    let start: u32 = start.trim().parse().map_err(|_| malformed())?;
    let end: u32 = end.trim().parse().map_err(|_| malformed())?;
    Ok(TimeWindow::new(start, end))
}

fn interfaces_help() -> String {
    let mut help = String::from("Data interfaces:\n");
    for meta in all_backends() {
        let default = if meta.is_default { " (default)" } else { "" };
        let _ = writeln!(help, "  {:<12}{}{}", meta.name, meta.description, default);
    }
    help.push_str("\nUse '-o ?' to list the options accepted by the selected data interface.");
    help
}

/// The clap command with the dynamic data-interface listing attached.
pub fn command() -> clap::Command {
    Cli::command().after_help(interfaces_help())
}

pub fn parse() -> Cli {
    // getopt-era '-?' help alias; clap cannot register '?' as a short flag
    if std::env::args_os().skip(1).any(|arg| arg == "-?") {
        let _ = command().print_help();
        std::process::exit(0);
    }
    let matches = command().get_matches();
    match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    }
}

/// One-line usage hint on stderr, printed after usage errors.
pub fn print_usage() {
    let mut cmd = command();
    eprintln!("{}", cmd.render_usage());
    eprintln!("For more information, try '-h'.");
}
