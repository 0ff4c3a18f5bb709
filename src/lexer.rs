use thiserror::Error;

/// Tokens understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Lambda,
    Dot,
    OpenParen,
    CloseParen,
    Id(&'a str),
}

impl<'a> Token<'a> {
    /// The literal text this token stands for.
    pub fn text(&self) -> &'a str {
        match self {
            Token::Lambda => "λ",
            Token::Dot => ".",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::Id(name) => *name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unknown character '{character}' at position {position}")]
    UnknownCharacter { character: char, position: usize },
}

/// Removes whitespace and line continuation token (if any) from the end
/// of a line, returning whether there was a line continuation token.
///
pub fn strip_whitespace_and_line_cont(line: &mut String) -> bool {
    while let Some(c) = line.chars().next_back() {
        if !c.is_whitespace() {
            break;
        }
        line.pop();
    }
    match line.chars().next_back() {
        Some('&') => {
            line.pop();
            true
        },
        _ => false,
    }
}

/// Splits `s` into tokens, failing on the first character that isn't part
/// of the language.
///
/// ```
/// # use lambda_front::lexer::{tokenize, Token};
/// assert_eq!(
///     tokenize("λx.x").unwrap(),
///     vec![Token::Lambda, Token::Id("x"), Token::Dot, Token::Id("x")]
/// );
/// assert!(tokenize("x = y").is_err());
/// ```
pub fn tokenize(s: &str) -> Result<Vec<Token>, LexError> {
    TokenIter::new(s).collect()
}

/// An iterator over the tokens of a string.
///
/// The lambda can be written either way:
///
/// ```
/// # use lambda_front::lexer::TokenIter;
/// let t1 = TokenIter::new("λ");
/// let t2 = TokenIter::new("\\"); // backslash, Haskell-like
///
/// assert_eq!(t1.clone().next(), t2.clone().next());
/// ```
///
#[derive(Clone)]
pub struct TokenIter<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.consume_whitespace();

        let rest_of_string = self.rest_of_string();
        let first_char = rest_of_string.chars().next()?;

        let token = match first_char {
            'λ' | '\\' => Token::Lambda,
            '.' => Token::Dot,
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            c if c.is_ascii_alphabetic() => {
                let name_len = rest_of_string
                    .find(|c: char| !c.is_ascii_alphabetic())
                    .unwrap_or_else(|| rest_of_string.len());
                self.pos += name_len;
                return Some(Ok(Token::Id(&rest_of_string[..name_len])));
            },
            character => {
                // skip it, so a caller that keeps going doesn't see the
                // same invalid char forever.
                let position = self.pos;
                self.pos += character.len_utf8();
                return Some(Err(LexError::UnknownCharacter { character, position }));
            },
        };
        self.pos += first_char.len_utf8();
        Some(Ok(token))
    }
}

impl<'a> TokenIter<'a> {
    pub fn new(s: &'a str) -> TokenIter<'a> {
        TokenIter {
            s,
            pos: 0,
        }
    }

    fn rest_of_string(&self) -> &'a str {
        &self.s[self.pos..]
    }

    fn consume_whitespace(&mut self) {
        let rest_of_string = self.rest_of_string();
        for c in rest_of_string.chars() {
            if !c.is_whitespace() {
                break
            }
            self.pos += c.len_utf8();
        }
    }
}
