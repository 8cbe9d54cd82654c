use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Errors are reported through tracing where they are raised, so the
    // default filter shows exactly those.
    let filter = EnvFilter::try_from_env("DUCK_LOG").unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = match duck::Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(_) => {
            print_usage();
            process::exit(1);
        }
    };
    if duck::run(&args).is_err() {
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: duck [--wait] [--snapshot FILE] SCRIPT.dk");
}
