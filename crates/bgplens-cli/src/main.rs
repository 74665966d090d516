use bgplens::{console, parse, run};

fn main() {
    // Reset SIGPIPE to default behavior to prevent panic on broken pipe
    // (e.g., when piping to `head` or `less` that exits early)
    #[cfg(unix)]
    reset_sigpipe();

    let cli = parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            console::error(&format!("{:#}", e));
            1
        }
    };
    std::process::exit(code);
}

#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
