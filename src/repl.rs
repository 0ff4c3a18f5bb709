use std::{
    env,
    borrow::Cow,
};
use rustyline::{
    At,
    Cmd,
    CompletionType,
    Context,
    Editor,
    KeyPress,
    Movement,
    Word,
    completion::{Completer, FilenameCompleter, Pair},
    error::ReadlineError,
    highlight::{Highlighter, MatchingBracketHighlighter},
    hint::Hinter,
    line_buffer::LineBuffer,
};
use rustyline_derive::Helper;
use tracing::debug;

use lambda_front::lexer;

use crate::{
    cmd::{self, Command},
    session::Session,
};

#[derive(Helper)]
struct RustylineHelper {
    filename_completer: FilenameCompleter, // for :load
    highlighter: MatchingBracketHighlighter,
}

impl Hinter for RustylineHelper {
    fn hint(&self, _line: &str, _pos:usize, _context: &Context) -> Option<String> {
        None
    }
}

impl Completer for RustylineHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, cursor_pos: usize, context: &Context)
        -> Result<(usize, Vec<Self::Candidate>), ReadlineError>
    {
        let null_completion = (0, Vec::with_capacity(0));
        if cursor_pos == 0 || !line.starts_with(':') {
            return Ok(null_completion);
        }
        let compl_str = &line[1..cursor_pos];
        match compl_str.find(' ') {
            None => {
                // no space: complete the command's name.
                match cmd::get_command_starts_with(compl_str) {
                    None => Ok(null_completion),
                    Some(class) => {
                        let compl_pair = Pair {
                            display: class.long_name.to_string(),
                            replacement: class.long_name.to_string(),
                        };
                        Ok((1, vec![compl_pair]))
                    },
                }
            },
            Some(pos) => {
                // with space: complete the argument's name.
                match cmd::get_command(&compl_str[..pos]) {
                    Some(class) if class.cmd == Command::Load => {
                        self.filename_completer.complete(line, cursor_pos, context)
                    },
                    // no other command takes a path.
                    _ => Ok(null_completion),
                }
            },
        }
    }
    fn update(&self, line: &mut LineBuffer, start: usize, elected: &str) {
        self.filename_completer.update(line, start, elected)
    }
}

impl Highlighter for RustylineHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool
    ) -> Cow<'b, str> {
        self.highlighter.highlight_prompt(prompt, default)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        self.highlighter.highlight_hint(hint)
    }

    fn highlight_candidate<'c>(
        &self,
        candidate: &'c str,
        completion: CompletionType
    ) -> Cow<'c, str> {
        self.highlighter.highlight_candidate(candidate, completion)
    }

    fn highlight_char(&self, line: &str, pos: usize) -> bool {
        self.highlighter.highlight_char(line, pos)
    }
}

fn make_rustyline_editor(histfile: &str) -> Editor<RustylineHelper> {
    let mut rl = Editor::<RustylineHelper>::new();

    let rustyline_helper = RustylineHelper {
        filename_completer: FilenameCompleter::new(),
        highlighter: MatchingBracketHighlighter::new(),
    };
    rl.set_helper(Some(rustyline_helper));

    if let Err(e) = rl.load_history(histfile) {
        // expected on the first run.
        debug!("could not load history from {}: {}", histfile, e);
    }

    rl.bind_sequence(KeyPress::ControlRight,
                     Cmd::Move(Movement::ForwardWord(1, At::Start, Word::Vi)));
    rl.bind_sequence(KeyPress::ControlLeft,
                     Cmd::Move(Movement::BackwardWord(1, Word::Vi)));
    rl
}

fn get_histfile_path() -> String {
    let home_key = "HOME";
    let fallback = "/tmp";
    let filename = "lambda_front_hist";
    match env::var(home_key) {
        Ok(home) => format!("{}/.cache/{}", home, filename),
        Err(e) => {
            eprintln!("warning: failed to read env variable {} ({}), using fallback {}.",
                      home_key, e, fallback);
            format!("{}/{}", fallback, filename)
        },
    }
}

// Ctrl-C while reducing raises the session's cancel flag instead of
// killing the process. At the prompt, rustyline sees Ctrl-C itself.
fn install_interrupt_handler(session: &Session) {
    if let Err(e) = signal_hook::flag::register(signal_hook::SIGINT, session.cancel_flag()) {
        eprintln!("warning: Ctrl-C won't interrupt reductions ({})", e);
    }
}

pub fn read_eval_print_loop(mut session: Session) {
    install_interrupt_handler(&session);

    let histfile = get_histfile_path();
    let mut rl = make_rustyline_editor(&histfile);

    loop {
        match rl.readline("> ") {
            Ok(mut line) => {
                while lexer::strip_whitespace_and_line_cont(&mut line) {
                    match rl.readline("& ") {
                        Ok(new_line) => {
                            line.push(' ');
                            line.push_str(&new_line);
                        },
                        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                        Err(err) => {
                            eprintln!("error: {:?}", err);
                            break;
                        },
                    };
                }
                rl.add_history_entry(line.as_str());
                session.execute(&line);
            },
            Err(ReadlineError::Interrupted) => {
                break;
            },
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("error: {:?}", err);
                break;
            },
        };
    }
    if let Err(e) = rl.save_history(&histfile) {
        eprintln!("failed to save history file: {}", e);
    };
}
