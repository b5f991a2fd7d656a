//! Recursive-descent parser for group expressions.
//!
//! Grammar (LL(1), one token of lookahead):
//!
//! ```text
//! expression         := binary-expression
//! binary-expression  := primary-expression { ('&'|'|') primary-expression }
//! primary-expression := complement | parenthesized | handle-set-literal | handle-expr | file-literal
//! complement         := '~' primary-expression
//! parenthesized      := '(' expression ')'
//! handle-set-literal := '{' [ bareword { ',' bareword } ] '}'
//! handle-expr        := bareword ( '.' bareword | '/' bareword )
//! file-literal       := '<' path '>'
//! ```
//!
//! `~` and `(` may nest at most [`MAX_NESTING`] deep.

use std::fs;

use crate::ast::{GroupExpr, HandleSet};
use crate::error::{ExprError, ExprResult};
use crate::lexer::{is_bareword_char, tokenize, Token, TokenKind};

/// Parse a group expression string.
///
/// File literals are read while parsing, so a missing file is reported here
/// rather than during evaluation.
///
/// # Examples
///
/// ```rust
/// use follow_algebra::{parse, GroupExpr};
///
/// let expr = parse("alice.followers & bob.followers").unwrap();
/// assert_eq!(
///     expr,
///     GroupExpr::intersection(
///         GroupExpr::followers_of("alice"),
///         GroupExpr::followers_of("bob"),
///     )
/// );
///
/// // `&` and `|` share one precedence level and associate to the left
/// let expr = parse("a.followers & b.followers | {carol}").unwrap();
/// assert!(matches!(expr, GroupExpr::Union(..)));
/// ```
pub fn parse(input: &str) -> ExprResult<GroupExpr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(&tokens);
    let expr = parser.expression()?;
    parser.expect(TokenKind::EndOfInput)?;
    Ok(expr)
}

/// Suffix commands accepted after `handle.`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Followers,
    Following,
}

const COMMANDS: &[(&str, Command)] = &[
    ("followers", Command::Followers),
    ("following", Command::Following),
];

impl Command {
    fn lookup(word: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(word))
            .map(|(_, command)| *command)
    }
}

/// Deepest allowed nesting of `~` and `(`.
pub const MAX_NESTING: usize = 256;

struct Parser<'t> {
    tokens: &'t [Token],
    cursor: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            cursor: 0,
            depth: 0,
        }
    }

    // `tokenize` always ends the stream with EndOfInput, and the cursor never
    // moves past it.
    fn peek(&self) -> &'t Token {
        let tokens = self.tokens;
        &tokens[self.cursor.min(tokens.len().saturating_sub(1))]
    }

    fn advance(&mut self) -> &'t Token {
        let token = self.peek();
        if token.kind != TokenKind::EndOfInput {
            self.cursor += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind) -> ExprResult<&'t Token> {
        let token = self.peek();
        if token.kind == kind {
            Ok(self.advance())
        } else {
            Err(unexpected(kind.describe(), token))
        }
    }

    fn expression(&mut self) -> ExprResult<GroupExpr> {
        self.binary_expression()
    }

    fn binary_expression(&mut self) -> ExprResult<GroupExpr> {
        let mut left = self.primary_expression()?;
        loop {
            match self.peek().kind {
                TokenKind::Intersect => {
                    self.advance();
                    let right = self.primary_expression()?;
                    left = GroupExpr::intersection(left, right);
                }
                TokenKind::Union => {
                    self.advance();
                    let right = self.primary_expression()?;
                    left = GroupExpr::union(left, right);
                }
                _ => return Ok(left),
            }
        }
    }

    /// Runs `inner` one nesting level deeper, failing past [`MAX_NESTING`].
    fn nested<T>(
        &mut self,
        token: &Token,
        inner: impl FnOnce(&mut Self) -> ExprResult<T>,
    ) -> ExprResult<T> {
        if self.depth >= MAX_NESTING {
            let expected = format!("at most {MAX_NESTING} nested '~' or '('");
            return Err(unexpected(&expected, token));
        }
        self.depth += 1;
        let result = inner(self);
        self.depth -= 1;
        result
    }

    fn primary_expression(&mut self) -> ExprResult<GroupExpr> {
        let token = self.peek();
        match token.kind {
            TokenKind::Complement => self.nested(token, |parser| {
                parser.advance();
                Ok(GroupExpr::complement(parser.primary_expression()?))
            }),
            TokenKind::OpenParen => self.nested(token, |parser| {
                parser.advance();
                let inner = parser.expression()?;
                parser.expect(TokenKind::CloseParen)?;
                Ok(inner)
            }),
            TokenKind::OpenBrace => self.handle_set_literal(),
            TokenKind::Bareword => self.handle_expression(),
            TokenKind::FileLiteral => {
                self.advance();
                Ok(GroupExpr::HandleSet(read_handle_file(&token.text)?))
            }
            _ => Err(unexpected("expression", token)),
        }
    }

    fn handle_set_literal(&mut self) -> ExprResult<GroupExpr> {
        self.expect(TokenKind::OpenBrace)?;
        let mut handles = Vec::new();
        if self.peek().kind == TokenKind::Bareword {
            handles.push(self.advance().text.as_str());
            while self.peek().kind == TokenKind::Comma {
                self.advance();
                handles.push(self.expect(TokenKind::Bareword)?.text.as_str());
            }
        }
        self.expect(TokenKind::CloseBrace)?;
        Ok(GroupExpr::handle_set(handles))
    }

    fn handle_expression(&mut self) -> ExprResult<GroupExpr> {
        let handle = self.expect(TokenKind::Bareword)?;
        let separator = self.peek();
        match separator.kind {
            TokenKind::Dot => {
                self.advance();
                let word = self.expect(TokenKind::Bareword)?;
                match Command::lookup(&word.text) {
                    Some(Command::Followers) => Ok(GroupExpr::followers_of(&handle.text)),
                    Some(Command::Following) => Ok(GroupExpr::following_of(&handle.text)),
                    None => Err(ExprError::UnknownCommand {
                        command: word.text.clone(),
                        position: word.position,
                    }),
                }
            }
            TokenKind::Slash => {
                self.advance();
                let list = self.expect(TokenKind::Bareword)?;
                Ok(GroupExpr::list_members(&handle.text, &list.text))
            }
            _ => Err(unexpected("'.' or '/'", separator)),
        }
    }
}

fn unexpected(expected: &str, token: &Token) -> ExprError {
    ExprError::UnexpectedToken {
        expected: expected.to_string(),
        found: token.describe(),
        position: token.position,
    }
}

/// Reads a handle file: one handle per line, blank lines ignored.
///
/// Every other line must be a bareword, so the set renders back to a
/// parseable `{...}` literal.
fn read_handle_file(path: &str) -> ExprResult<HandleSet> {
    let contents = fs::read_to_string(path).map_err(|e| ExprError::Io {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    let mut handles = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let handle = line.trim();
        if handle.is_empty() {
            continue;
        }
        if !handle.chars().all(is_bareword_char) {
            return Err(ExprError::InvalidHandle {
                path: path.to_string(),
                line: index + 1,
                handle: handle.to_string(),
            });
        }
        handles.push(handle);
    }
    Ok(HandleSet::new(handles))
}
