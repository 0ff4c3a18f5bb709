mod cmd;
mod opt;
mod repl;
mod session;

use tracing_subscriber::EnvFilter;

use opt::Next;
use session::Session;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut session = Session::new();
    match opt::parse_cmdline_options(&mut session) {
        Next::Repl => repl::read_eval_print_loop(session),
        Next::Exit(code) => std::process::exit(code),
    }
}
