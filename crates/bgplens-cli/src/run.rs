use std::io::{self, Write as _};

use anyhow::{Context, Result, anyhow};
use bgplens_backends::{BackendId, backend_by_name, default_backend, metadata, option_by_name, options_for};
use bgplens_stream::{CancelToken, Session};
use bgplens_types::{FilterKind, FilterSet, RecordStatus};

use crate::args::{self, Cli, OptionArg};
use crate::config::Config;
use crate::console;
use crate::render::{self, FixedBuf};

// Command-line safety bounds; the filter set itself is unbounded.
const PROJECT_CMD_MAX: usize = 10;
const COLLECTOR_CMD_MAX: usize = 100;
const TYPE_CMD_MAX: usize = 10;
const WINDOW_CMD_MAX: usize = 1024;
const OPTION_CMD_MAX: usize = 1024;

/// Drive one retrieval session from parsed arguments; returns the process
/// exit code for non-error completions.
pub fn run(cli: Cli) -> Result<i32> {
    let config = Config::load(cli.config.as_deref())?;

    let interface = match resolve_interface(&cli, &config) {
        Ok(id) => id,
        Err(msg) => return usage_error(&msg),
    };

    // '-o ?' lists the selected interface's options and stops there
    if cli.options.iter().any(|o| matches!(o, OptionArg::List)) {
        print_interface_options(interface);
        args::print_usage();
        return Ok(0);
    }

    if let Some(msg) = capacity_overflow(&cli) {
        return usage_error(&msg);
    }
    if cli.windows.is_empty() {
        return usage_error("At least one time window must be specified using -w");
    }

    let mut session = Session::new();
    session.select_backend(interface)?;

    // config-file option defaults first, then -o pairs (last wins)
    if let Some(defaults) = config.interfaces.get(metadata(interface).name) {
        for (name, value) in defaults {
            let handle = option_by_name(interface, name).ok_or_else(|| {
                anyhow!(
                    "Invalid option '{}' for data interface '{}' in config",
                    name,
                    metadata(interface).name
                )
            })?;
            session.set_option(handle, value.clone())?;
        }
    }
    for option in &cli.options {
        let OptionArg::Set { name, value } = option else {
            continue;
        };
        match option_by_name(interface, name) {
            Some(handle) => session.set_option(handle, value.clone())?,
            None => {
                return usage_error(&format!(
                    "Invalid option '{}' for data interface '{}'",
                    name,
                    metadata(interface).name
                ));
            }
        }
    }

    let mut filters = FilterSet::new();
    for project in &cli.projects {
        filters.add_filter(FilterKind::Project, project);
    }
    for collector in &cli.collectors {
        filters.add_filter(FilterKind::Collector, collector);
    }
    for record_type in &cli.record_types {
        filters.add_filter(FilterKind::RecordType, record_type);
    }
    for window in &cli.windows {
        filters.add_window(*window);
    }
    if let Some(period) = cli.rib_period {
        filters.set_rib_period(period);
    }

    session.set_blocking(cli.blocking)?;
    session.start(filters)?;

    let token = CancelToken::new();
    {
        let handle = token.clone();
        ctrlc::set_handler(move || handle.cancel())
            .context("cannot install interrupt handler")?;
    }

    let record_output = cli.record_output || !(cli.native_output || cli.elem_output);
    drain_session(&cli, record_output, session, &token)
}

/// The retrieval loop: pull, render, release, repeat.
fn drain_session(
    cli: &Cli,
    record_output: bool,
    mut session: Session,
    token: &CancelToken,
) -> Result<i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut elem_buf = FixedBuf::new(render::ELEM_BUF_LEN);

    loop {
        let Some(record) = session.next_record(token)? else {
            break;
        };

        if record_output {
            writeln!(out, "{}", render::record_line(&record))?;
        }
        if record.status != RecordStatus::Valid {
            continue;
        }
        if cli.native_output {
            for raw in &record.raw {
                writeln!(out, "{}", raw)?;
            }
        }
        if cli.elem_output {
            let mut cursor = record.elem_cursor();
            while let Some(elem) = cursor.next() {
                match render::elem_line(elem, &mut elem_buf) {
                    Ok(line) => writeln!(out, "{}", line)?,
                    Err(_) => {
                        // surface what fit, then abort rather than emit an
                        // incomplete-looking stream
                        console::error("Failed to construct elem string");
                        eprintln!("Elem string: {}", elem_buf.as_str());
                        session.stop();
                        return Ok(1);
                    }
                }
            }
        }
    }

    session.stop();
    Ok(0)
}

fn resolve_interface(cli: &Cli, config: &Config) -> std::result::Result<BackendId, String> {
    let name = cli
        .interface
        .as_deref()
        .or(config.default_interface.as_deref());
    match name {
        Some(name) => backend_by_name(name)
            .ok_or_else(|| format!("Invalid data interface name '{}'", name)),
        None => Ok(default_backend()),
    }
}

fn capacity_overflow(cli: &Cli) -> Option<String> {
    let over = |what: &str, len: usize, max: usize| {
        (len > max).then(|| {
            format!(
                "A maximum of {} {} can be specified on the command line",
                max, what
            )
        })
    };
    over("projects", cli.projects.len(), PROJECT_CMD_MAX)
        .or_else(|| over("collectors", cli.collectors.len(), COLLECTOR_CMD_MAX))
        .or_else(|| over("types", cli.record_types.len(), TYPE_CMD_MAX))
        .or_else(|| over("windows", cli.windows.len(), WINDOW_CMD_MAX))
        .or_else(|| over("interface options", cli.options.len(), OPTION_CMD_MAX))
}

fn usage_error(msg: &str) -> Result<i32> {
    console::error(msg);
    args::print_usage();
    Ok(1)
}

fn print_interface_options(id: BackendId) {
    eprintln!("Data interface options for '{}':", metadata(id).name);
    let options = options_for(id);
    if options.is_empty() {
        eprintln!("   [NONE]");
    } else {
        for option in options {
            eprintln!("   {:<15}{}", option.name, option.description);
        }
    }
    eprintln!();
}
