use std::env;
use crate::{
    cmd,
    session::Session,
};

/// What main should do once the command line has been dealt with.
#[derive(Debug, PartialEq, Eq)]
pub enum Next {
    Repl,
    Exit(i32),
}

pub fn parse_cmdline_options(session: &mut Session) -> Next {
    // skip program name
    parse_args(env::args().skip(1), session)
}

fn parse_args<I>(mut args: I, session: &mut Session) -> Next
    where I: Iterator<Item = String>
{
    let mut interactive = true;
    let mut files = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                cmd::print_usage();
                return Next::Exit(0);
            },
            "-n" | "--no-interactive" => interactive = false,
            "-m" | "--max-steps" => {
                let limit = match args.next() {
                    Some(s) => cmd::parse_step_limit(&s),
                    None => {
                        eprintln!("option '{}' expects a number", arg);
                        return Next::Exit(2);
                    },
                };
                match limit {
                    Ok(max_steps) => session.max_steps = max_steps,
                    Err(e) => {
                        eprintln!("{}", e);
                        return Next::Exit(2);
                    },
                }
            },
            // everything else is a file to be loaded.
            _ => files.push(arg),
        }
    }

    if !interactive {
        // never start interactive prompt when -n is used
        let ok = if files.is_empty() {
            load_file(None, session)
        } else {
            files.iter().all(|name| load_file(Some(name.as_str()), session))
        };
        return Next::Exit(if ok { 0 } else { 1 });
    }

    for name in &files {
        if !load_file(Some(name.as_str()), session) {
            return Next::Exit(1);
        }
    }
    Next::Repl
}

fn load_file(filename: Option<&str>, session: &mut Session) -> bool {
    let name = filename.unwrap_or("stdin");
    match session.load_file(filename) {
        Ok(failed) => failed == 0,
        Err(e) => {
            eprintln!("failed to load file '{}': {:#}", name, e);
            false
        },
    }
}
