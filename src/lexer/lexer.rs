use log::trace;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

use lazy_static::lazy_static;

pub type RegexHandler = fn(&Lexer, &str) -> Option<Token>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

impl RegexPattern {
    fn new(pattern: &str, handler: RegexHandler) -> Self {
        RegexPattern {
            // Anchored: a pattern only counts when it matches at the cursor.
            regex: Regex::new(&format!("^(?:{})", pattern)).unwrap(),
            handler,
        }
    }
}

lazy_static! {
    /// Tried top to bottom, first match wins. Longer operators sit above
    /// their prefixes so operators are munched maximally.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern::new(r"@[a-zA-Z][a-zA-Z0-9_]*", MK_DEFAULT_HANDLER!(TokenKind::Attribute)),
        RegexPattern::new(r"[a-zA-Z_][a-zA-Z0-9_]*(\.[a-zA-Z_][a-zA-Z0-9_]*)*", symbol_handler),
        RegexPattern::new(r"[0-9]*\.[0-9]+", MK_DEFAULT_HANDLER!(TokenKind::Float)),
        RegexPattern::new(r"[0-9]+", MK_DEFAULT_HANDLER!(TokenKind::Integer)),
        RegexPattern::new(r#"".*?""#, MK_DEFAULT_HANDLER!(TokenKind::String)),
        RegexPattern::new(r"'(\\.|[^\\'])'", MK_DEFAULT_HANDLER!(TokenKind::Char)),
        RegexPattern::new(r"->", MK_DEFAULT_HANDLER!(TokenKind::Arrow)),
        RegexPattern::new(r"#.*", skip_handler),
        RegexPattern::new(r"\n", MK_DEFAULT_HANDLER!(TokenKind::Newline)),
        RegexPattern::new(r"[ \t\r\f]+", skip_handler),

        RegexPattern::new(r"&&=", MK_DEFAULT_HANDLER!(TokenKind::AndAssign)),
        RegexPattern::new(r"\|\|=", MK_DEFAULT_HANDLER!(TokenKind::OrAssign)),
        RegexPattern::new(r"\^\^=", MK_DEFAULT_HANDLER!(TokenKind::XorAssign)),
        RegexPattern::new(r"<<=", MK_DEFAULT_HANDLER!(TokenKind::BitwiseLeftShiftAssign)),
        RegexPattern::new(r">>=", MK_DEFAULT_HANDLER!(TokenKind::BitwiseRightShiftAssign)),

        RegexPattern::new(r"==", MK_DEFAULT_HANDLER!(TokenKind::Equals)),
        RegexPattern::new(r"!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals)),
        RegexPattern::new(r"<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals)),
        RegexPattern::new(r">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals)),
        RegexPattern::new(r"\+=", MK_DEFAULT_HANDLER!(TokenKind::PlusAssign)),
        RegexPattern::new(r"-=", MK_DEFAULT_HANDLER!(TokenKind::MinusAssign)),
        RegexPattern::new(r"\*=", MK_DEFAULT_HANDLER!(TokenKind::MultiplyAssign)),
        RegexPattern::new(r"/=", MK_DEFAULT_HANDLER!(TokenKind::DivideAssign)),
        RegexPattern::new(r"\^=", MK_DEFAULT_HANDLER!(TokenKind::PowerAssign)),
        RegexPattern::new(r"%=", MK_DEFAULT_HANDLER!(TokenKind::ModuloAssign)),
        RegexPattern::new(r"&=", MK_DEFAULT_HANDLER!(TokenKind::BitwiseAndAssign)),
        RegexPattern::new(r"\|=", MK_DEFAULT_HANDLER!(TokenKind::BitwiseOrAssign)),
        RegexPattern::new(r"&&", MK_DEFAULT_HANDLER!(TokenKind::And)),
        RegexPattern::new(r"\|\|", MK_DEFAULT_HANDLER!(TokenKind::Or)),
        RegexPattern::new(r"\^\^", MK_DEFAULT_HANDLER!(TokenKind::Xor)),
        RegexPattern::new(r"<<", MK_DEFAULT_HANDLER!(TokenKind::BitwiseLeftShift)),
        RegexPattern::new(r">>", MK_DEFAULT_HANDLER!(TokenKind::BitwiseRightShift)),

        RegexPattern::new(r"<", MK_DEFAULT_HANDLER!(TokenKind::Less)),
        RegexPattern::new(r">", MK_DEFAULT_HANDLER!(TokenKind::Greater)),
        RegexPattern::new(r"=", MK_DEFAULT_HANDLER!(TokenKind::Assign)),
        RegexPattern::new(r"\+", MK_DEFAULT_HANDLER!(TokenKind::Plus)),
        RegexPattern::new(r"-", MK_DEFAULT_HANDLER!(TokenKind::Minus)),
        RegexPattern::new(r"\*", MK_DEFAULT_HANDLER!(TokenKind::Multiply)),
        RegexPattern::new(r"/", MK_DEFAULT_HANDLER!(TokenKind::Divide)),
        RegexPattern::new(r"\^", MK_DEFAULT_HANDLER!(TokenKind::Power)),
        RegexPattern::new(r"%", MK_DEFAULT_HANDLER!(TokenKind::Modulo)),
        RegexPattern::new(r"!", MK_DEFAULT_HANDLER!(TokenKind::Not)),
        RegexPattern::new(r"&", MK_DEFAULT_HANDLER!(TokenKind::BitwiseAnd)),
        RegexPattern::new(r"\|", MK_DEFAULT_HANDLER!(TokenKind::BitwiseOr)),
        RegexPattern::new(r"~", MK_DEFAULT_HANDLER!(TokenKind::BitwiseNot)),

        RegexPattern::new(r"\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen)),
        RegexPattern::new(r"\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen)),
        RegexPattern::new(r"\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly)),
        RegexPattern::new(r"\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly)),
        RegexPattern::new(r"\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket)),
        RegexPattern::new(r"\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket)),

        RegexPattern::new(r",", MK_DEFAULT_HANDLER!(TokenKind::Comma)),
        RegexPattern::new(r";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon)),
        RegexPattern::new(r":", MK_DEFAULT_HANDLER!(TokenKind::Colon)),
    ];
}

/// A character no pattern accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalError {
    pub character: char,
    pub position: Position,
}

impl From<LexicalError> for Error {
    fn from(error: LexicalError) -> Self {
        Error::new(
            ErrorImpl::UnrecognisedToken {
                token: error.character,
            },
            error.position,
            1,
        )
    }
}

/// Lazy token stream over one source text.
///
/// Yields `Ok(Token)` for every semantic token (newlines included) and
/// `Err(LexicalError)` for each unrecognised character, then ends. Comments
/// and intra-line whitespace are consumed silently.
pub struct Lexer {
    source: String,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            source: normalize_blank_lines(source),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn current_position(&self) -> Position {
        Position {
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    /// The text actually scanned, after blank-line normalisation.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn advance_over(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += text.len();
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        'scan: while !self.at_eof() {
            for pattern in PATTERNS.iter() {
                let Some(found) = pattern.regex.find(self.remainder()) else {
                    continue;
                };
                let matched = found.as_str().to_string();
                let token = (pattern.handler)(self, &matched);
                self.advance_over(&matched);

                match token {
                    Some(token) => return Some(Ok(token)),
                    None => continue 'scan,
                }
            }

            let position = self.current_position();
            let character = self.remainder().chars().next()?;
            self.pos += character.len_utf8();
            self.column += 1;

            return Some(Err(LexicalError {
                character,
                position,
            }));
        }

        None
    }
}

fn skip_handler(_lexer: &Lexer, _matched: &str) -> Option<Token> {
    None
}

fn symbol_handler(lexer: &Lexer, matched: &str) -> Option<Token> {
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    Some(MK_TOKEN!(kind, String::from(matched), lexer.current_position()))
}

/// Lines holding only whitespace become empty lines.
fn normalize_blank_lines(source: &str) -> String {
    source
        .split('\n')
        .map(|line| if line.trim().is_empty() { "" } else { line })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Tokenizes a whole file.
///
/// Scans to the end even after an unrecognised character so every lexical
/// error is collected; the batch is returned only if there was at least one.
/// On success the tokens end with an `EOF` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Vec<Error>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = vec![];
    let mut errors = vec![];

    for item in lexer.by_ref() {
        match item {
            Ok(token) => tokens.push(token),
            Err(error) => errors.push(Error::from(error)),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    trace!("tokenized {} tokens", tokens.len());

    tokens.push(MK_TOKEN!(TokenKind::EOF, String::new(), lexer.current_position()));
    Ok(tokens)
}
