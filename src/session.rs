use std::{
    fs,
    io::{self, BufRead, Read},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::{Context, Result};
use tracing::info;

use lambda_front::{
    parse_str,
    reduce::{normalize_with, Limits},
    Expr,
};

use crate::cmd::{self, Command};

pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Settings that outlive a single line, plus the flag raised by Ctrl-C.
pub struct Session {
    pub max_steps: Option<usize>,
    pub show_steps: bool,
    pub pause: bool,
    cancel: Arc<AtomicBool>,
}

impl Session {
    pub fn new() -> Session {
        Session {
            max_steps: Some(DEFAULT_MAX_STEPS),
            show_steps: false,
            pause: false,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_steps: self.max_steps,
            cancel: Some(self.cancel_flag()),
        }
    }

    /// Runs a command or evaluates an expression, reporting errors on
    /// stderr. Returns whether it went fine.
    pub fn execute(&mut self, line: &str) -> bool {
        match cmd::parse_command(line) {
            Some(Ok((command, arg))) => self.run_command(command, arg),
            Some(Err(e)) => {
                eprintln!("error: {}", e);
                false
            },
            None => line.trim().is_empty() || self.evaluate(line).is_some(),
        }
    }

    fn run_command(&mut self, command: Command, arg: Option<&str>) -> bool {
        match (command, arg) {
            (Command::Help, _) => cmd::print_usage(),
            (Command::Load, Some(filename)) => {
                return match self.load_file(Some(filename)) {
                    Ok(failed) => failed == 0,
                    Err(e) => {
                        eprintln!("failed to load file '{}': {:#}", filename, e);
                        false
                    },
                };
            },
            (Command::Load, None) => unreachable!("checked by parse_command"),
            (Command::Steps, _) => {
                self.show_steps = !self.show_steps;
                println!("printing every step: {}", on_off(self.show_steps));
            },
            (Command::Limit, Some(limit)) => match cmd::parse_step_limit(limit) {
                Ok(max_steps) => self.max_steps = max_steps,
                Err(e) => {
                    eprintln!("error: {}", e);
                    return false;
                },
            },
            (Command::Limit, None) => unreachable!("checked by parse_command"),
            (Command::Pause, _) => {
                self.pause = !self.pause;
                println!("pause mode: {}", on_off(self.pause));
            },
        }
        true
    }

    /// Parses `line` and reduces it to its normal form, printing the result.
    pub fn evaluate(&mut self, line: &str) -> Option<Expr> {
        let expr = match parse_str(line) {
            Ok(expr) => expr,
            Err(e) => {
                eprintln!("syntax error: {}", e);
                return None;
            },
        };

        self.cancel.store(false, Ordering::Relaxed);
        let show_steps = self.show_steps;
        let pause = self.pause;
        let result = normalize_with(&expr, &self.limits(), |_, reduced| {
            if pause {
                wait_for_enter();
            }
            if show_steps {
                println!("= {}", reduced);
            }
        });
        match result {
            Ok(normal) => {
                if !show_steps || normal == expr {
                    println!("{}", normal);
                }
                Some(normal)
            },
            Err(e) => {
                eprintln!("error: {}", e);
                None
            },
        }
    }

    /// Evaluates every line of a file, or of stdin when `filename` is None.
    /// Lines starting with '#' are comments, and a trailing '&' joins a
    /// line with the next one. Returns how many lines failed.
    pub fn load_file(&mut self, filename: Option<&str>) -> Result<usize> {
        let contents = match filename {
            Some(name) => fs::read_to_string(name)
                .with_context(|| format!("cannot read '{}'", name))?,
            None => {
                let mut contents = String::new();
                io::stdin()
                    .lock()
                    .read_to_string(&mut contents)
                    .context("cannot read stdin")?;
                contents
            },
        };
        let name = filename.unwrap_or("stdin");
        info!(file = name, "loading");

        let mut failed = 0;
        for line in join_continued_lines(&contents) {
            if line.trim_start().starts_with('#') {
                continue;
            }
            if !self.execute(&line) {
                failed += 1;
            }
        }
        if failed > 0 {
            eprintln!("{}: {} line(s) failed", name, failed);
        }
        Ok(failed)
    }
}

fn join_continued_lines(contents: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = String::new();
    for line in contents.lines() {
        let mut line = line.to_string();
        let continues = lambda_front::lexer::strip_whitespace_and_line_cont(&mut line);
        pending.push_str(&line);
        if continues {
            pending.push(' ');
        } else {
            lines.push(std::mem::take(&mut pending));
        }
    }
    if !pending.is_empty() {
        lines.push(pending);
    }
    lines
}

fn wait_for_enter() {
    let mut buf = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut buf) {
        eprintln!("error: {}", e);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
