use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

/// Error diagnostic on stderr, colored when stderr is a terminal.
pub fn error(msg: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{} {}", "ERROR:".red().bold(), msg);
    } else {
        eprintln!("ERROR: {}", msg);
    }
}
