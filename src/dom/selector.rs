//! Compound selector parsing and matching.
//!
//! Supports the subset of CSS selectors the engine relies on: type (`tag`),
//! universal (`*`), `#id`, `.class`, attribute presence (`[attr]`), attribute
//! equality (`[attr="v"]`), negation (`:not(...)`) and comma-separated lists.
//! Combinators are rejected.

use logos::Logos;

use super::node::NodeData;

/// Errors from selector parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("unexpected token at position {position}: {found:?}")]
    UnexpectedToken { position: usize, found: String },
    #[error("unexpected end of selector: {0}")]
    UnexpectedEof(String),
    #[error("invalid character at byte {0}")]
    InvalidCharacter(usize),
    #[error("empty selector")]
    Empty,
}

/// Selector token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
enum Token {
    /// `:not(` opens a negation.
    #[token(":not(")]
    NotOpen,

    /// `#identifier`.
    #[regex(r"#[a-zA-Z0-9_-]+")]
    Hash,

    /// Double-quoted string.
    #[regex(r#""[^"]*""#)]
    StringDouble,

    /// Single-quoted string.
    #[regex(r"'[^']*'")]
    StringSingle,

    /// Tag, class or attribute name.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[token(".")]
    Dot,

    #[token("*")]
    Star,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("=")]
    Equals,

    #[token(")")]
    ParenClose,

    #[token(",")]
    Comma,
}

/// One simple selector inside a compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// `*`
    Universal,
    /// `tag`
    Tag(String),
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `[name]` or `[name="value"]`
    Attribute { name: String, value: Option<String> },
    /// `:not(compound)`
    Not(CompoundSelector),
}

impl SimpleSelector {
    fn matches(&self, data: &NodeData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => data.tag == *tag,
            Self::Id(id) => data.id() == Some(id.as_str()),
            Self::Class(class) => data.has_class(class),
            Self::Attribute { name, value: None } => data.has_attribute(name),
            Self::Attribute {
                name,
                value: Some(expected),
            } => data.get_attribute(name).as_deref() == Some(expected.as_str()),
            Self::Not(inner) => !inner.matches(data),
        }
    }
}

/// A sequence of simple selectors that must all match one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector(pub Vec<SimpleSelector>);

impl CompoundSelector {
    /// Whether every simple selector matches.
    pub fn matches(&self, data: &NodeData) -> bool {
        self.0.iter().all(|s| s.matches(data))
    }
}

/// A comma-separated list of compound selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(pub Vec<CompoundSelector>);

impl SelectorList {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let tokens = lex(input)?;
        let mut parser = Parser { tokens, pos: 0 };
        let list = parser.parse_list()?;
        if list.0.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(list)
    }

    /// Whether any selector in the list matches.
    pub fn matches(&self, data: &NodeData) -> bool {
        self.0.iter().any(|c| c.matches(data))
    }
}

fn lex(input: &str) -> Result<Vec<(Token, String)>, SelectorError> {
    let mut lexer = Token::lexer(input);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.slice().to_owned())),
            Err(()) => return Err(SelectorError::InvalidCharacter(lexer.span().start)),
        }
    }
    Ok(tokens)
}

fn unquote(text: &str) -> String {
    text[1..text.len() - 1].to_owned()
}

struct Parser {
    tokens: Vec<(Token, String)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn next(&mut self, context: &str) -> Result<(Token, String), SelectorError> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| SelectorError::UnexpectedEof(context.to_owned()))?;
        self.pos += 1;
        Ok(tok)
    }

    fn unexpected(&self, found: &str) -> SelectorError {
        SelectorError::UnexpectedToken {
            position: self.pos.saturating_sub(1),
            found: found.to_owned(),
        }
    }

    fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut compounds = Vec::new();
        loop {
            compounds.push(self.parse_compound()?);
            match self.peek() {
                None => break,
                Some(Token::Comma) => {
                    self.pos += 1;
                }
                Some(_) => {
                    let (_, text) = self.next("selector list")?;
                    return Err(self.unexpected(&text));
                }
            }
        }
        Ok(SelectorList(compounds))
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut parts = Vec::new();

        match self.peek() {
            Some(Token::Ident) => {
                let (_, text) = self.next("type selector")?;
                parts.push(SimpleSelector::Tag(text.to_ascii_lowercase()));
            }
            Some(Token::Star) => {
                self.pos += 1;
                parts.push(SimpleSelector::Universal);
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some(Token::Hash) => {
                    let (_, text) = self.next("id selector")?;
                    parts.push(SimpleSelector::Id(text[1..].to_owned()));
                }
                Some(Token::Dot) => {
                    self.pos += 1;
                    let (tok, text) = self.next("class name")?;
                    if tok != Token::Ident {
                        return Err(self.unexpected(&text));
                    }
                    parts.push(SimpleSelector::Class(text));
                }
                Some(Token::BracketOpen) => {
                    self.pos += 1;
                    parts.push(self.parse_attribute()?);
                }
                Some(Token::NotOpen) => {
                    self.pos += 1;
                    let inner = self.parse_compound()?;
                    let (tok, text) = self.next(":not(...)")?;
                    if tok != Token::ParenClose {
                        return Err(self.unexpected(&text));
                    }
                    parts.push(SimpleSelector::Not(inner));
                }
                _ => break,
            }
        }

        if parts.is_empty() {
            return match self.next("compound selector") {
                Ok((_, text)) => Err(self.unexpected(&text)),
                Err(e) => Err(e),
            };
        }
        Ok(CompoundSelector(parts))
    }

    fn parse_attribute(&mut self) -> Result<SimpleSelector, SelectorError> {
        let (tok, name) = self.next("attribute name")?;
        if tok != Token::Ident {
            return Err(self.unexpected(&name));
        }
        let name = name.to_ascii_lowercase();

        let (tok, text) = self.next("attribute selector")?;
        match tok {
            Token::BracketClose => Ok(SimpleSelector::Attribute { name, value: None }),
            Token::Equals => {
                let (tok, raw) = self.next("attribute value")?;
                let value = match tok {
                    Token::StringDouble | Token::StringSingle => unquote(&raw),
                    Token::Ident => raw,
                    _ => return Err(self.unexpected(&raw)),
                };
                let (tok, text) = self.next("attribute selector")?;
                if tok != Token::BracketClose {
                    return Err(self.unexpected(&text));
                }
                Ok(SimpleSelector::Attribute {
                    name,
                    value: Some(value),
                })
            }
            _ => Err(self.unexpected(&text)),
        }
    }
}
