//! Tokenizer for group expressions.
//!
//! Each token pattern is a nom combinator; [`tokenize`] drives them in a
//! single left-to-right pass and appends an end-of-input token.

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{take_until, take_while1},
    character::complete::{char, multispace1, one_of},
    combinator::{map, recognize, value},
    sequence::delimited,
    IResult,
};

use crate::error::{ExprError, ExprResult};

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Handle, command or list name: `alice`, `followers`, `close-friends`
    Bareword,
    /// `.`
    Dot,
    /// `/`
    Slash,
    /// `&`
    Intersect,
    /// `|`
    Union,
    /// `~`
    Complement,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `,`
    Comma,
    /// `<path>`; the token text is the path without brackets.
    FileLiteral,
    /// Always the last token of a stream.
    EndOfInput,
}

impl TokenKind {
    /// Human-readable name used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Bareword => "bareword",
            TokenKind::Dot => "'.'",
            TokenKind::Slash => "'/'",
            TokenKind::Intersect => "'&'",
            TokenKind::Union => "'|'",
            TokenKind::Complement => "'~'",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::OpenBrace => "'{'",
            TokenKind::CloseBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::FileLiteral => "file literal",
            TokenKind::EndOfInput => "end of input",
        }
    }

    fn from_punctuation(c: char) -> Option<Self> {
        let kind = match c {
            '.' => TokenKind::Dot,
            '/' => TokenKind::Slash,
            '&' => TokenKind::Intersect,
            '|' => TokenKind::Union,
            '~' => TokenKind::Complement,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            ',' => TokenKind::Comma,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A single lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Matched source text (path only, for file literals).
    pub text: String,
    /// Byte offset of the token in the source.
    pub position: usize,
}

impl Token {
    fn end_of_input(position: usize) -> Self {
        Self {
            kind: TokenKind::EndOfInput,
            text: String::new(),
            position,
        }
    }

    /// Text used when this token shows up in an error message.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfInput => self.kind.describe().to_string(),
            TokenKind::FileLiteral => format!("'<{}>'", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

#[derive(Debug, Clone)]
enum Lexeme<'a> {
    Whitespace,
    Token(TokenKind, &'a str),
}

pub(crate) fn is_bareword_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn bareword(input: &str) -> IResult<&str, Lexeme<'_>> {
    map(take_while1(is_bareword_char), |text| {
        Lexeme::Token(TokenKind::Bareword, text)
    })(input)
}

fn file_literal(input: &str) -> IResult<&str, Lexeme<'_>> {
    map(delimited(char('<'), take_until(">"), char('>')), |path| {
        Lexeme::Token(TokenKind::FileLiteral, path)
    })(input)
}

fn punctuation(input: &str) -> IResult<&str, Lexeme<'_>> {
    let (rest, text) = recognize(one_of("./&|~(){},"))(input)?;
    match text.chars().next().and_then(TokenKind::from_punctuation) {
        Some(kind) => Ok((rest, Lexeme::Token(kind, text))),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::OneOf,
        ))),
    }
}

fn lexeme(input: &str) -> IResult<&str, Lexeme<'_>> {
    alt((
        bareword,
        file_literal,
        punctuation,
        value(Lexeme::Whitespace, multispace1),
    ))(input)
}

/// Splits expression text into tokens.
///
/// Whitespace is discarded and the returned stream always ends with a
/// [`TokenKind::EndOfInput`] token.
///
/// # Errors
///
/// Returns [`ExprError::UnexpectedCharacter`] at the first position where no
/// pattern matches, including an unterminated `<`.
///
/// # Examples
///
/// ```rust
/// use follow_algebra::{tokenize, TokenKind};
///
/// let tokens = tokenize("alice.followers & ~bob/mutes").unwrap();
/// assert_eq!(tokens.len(), 9);
/// assert_eq!(tokens[3].kind, TokenKind::Intersect);
/// ```
pub fn tokenize(source: &str) -> ExprResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = source;

    while !rest.is_empty() {
        let position = source.len() - rest.len();
        match lexeme(rest) {
            Ok((remaining, Lexeme::Token(kind, text))) => {
                tokens.push(Token {
                    kind,
                    text: text.to_string(),
                    position,
                });
                rest = remaining;
            }
            Ok((remaining, Lexeme::Whitespace)) => rest = remaining,
            Err(_) => {
                let character = rest.chars().next().unwrap_or_default();
                return Err(ExprError::UnexpectedCharacter {
                    character,
                    position,
                });
            }
        }
    }

    tokens.push(Token::end_of_input(source.len()));
    Ok(tokens)
}
