//! Declarative tag/class/position queries.
//!
//! Supported grammar, a deliberately small subset of CSS plus the jQuery
//! position pseudo-classes the dialect extraction relies on:
//!
//! ```text
//! selector  := [">"] compound (combinator compound)* [position]
//! compound  := (tag | "*")? ("." class | "#" id)*
//! combinator:= whitespace (descendant) | ">" (child)
//! position  := ":first" | ":last" | ":eq(" n ")"
//! ```
//!
//! Positions apply to the full ordered match set, never per parent.

use crate::markup::document::ElementData;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected character '{found}' in selector `{selector}`")]
    UnexpectedChar { selector: String, found: char },

    #[error("selector `{0}` ends with a combinator")]
    DanglingCombinator(String),

    #[error("unsupported pseudo-class `:{pseudo}` in selector `{selector}`")]
    UnsupportedPseudo { selector: String, pseudo: String },

    #[error("position pseudo-class must end selector `{0}`")]
    MisplacedPosition(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    First,
    Last,
    Nth(usize),
}

/// One element test: optional tag, optional id, required classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    pub fn matches(&self, element: &ElementData) -> bool {
        self.tag.as_deref().map_or(true, |tag| element.name == tag)
            && self.id.as_deref().map_or(true, |id| element.id() == Some(id))
            && self.classes.iter().all(|class| element.has_class(class))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub combinator: Combinator,
    pub compound: Compound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    steps: Vec<Step>,
    position: Option<Position>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

struct Parser<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source: source.trim(),
            chars: source.trim().chars().peekable(),
        }
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::UnexpectedChar {
            selector: self.source.to_string(),
            found,
        }
    }

    fn parse(mut self) -> Result<Selector, SelectorError> {
        if self.source.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut steps = Vec::new();
        let mut position = None;
        let mut combinator = Combinator::Descendant;

        loop {
            self.skip_whitespace();
            match self.chars.peek().copied() {
                None => break,
                Some('>') => {
                    self.chars.next();
                    combinator = Combinator::Child;
                    continue;
                }
                Some(':') => {
                    if steps.is_empty() {
                        return Err(self.unexpected(':'));
                    }
                    if combinator == Combinator::Child {
                        return Err(SelectorError::DanglingCombinator(self.source.to_string()));
                    }
                    position = Some(self.position()?);
                    self.skip_whitespace();
                    if self.chars.peek().is_some() {
                        return Err(SelectorError::MisplacedPosition(self.source.to_string()));
                    }
                    break;
                }
                Some(_) => {
                    let compound = self.compound()?;
                    steps.push(Step {
                        combinator,
                        compound,
                    });
                    combinator = Combinator::Descendant;
                }
            }
        }

        if steps.is_empty() {
            return Err(SelectorError::Empty);
        }
        if self.source.ends_with('>') {
            return Err(SelectorError::DanglingCombinator(self.source.to_string()));
        }

        Ok(Selector {
            source: self.source.to_string(),
            steps,
            position,
        })
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.chars.next_if(|&c| is_name_char(c)) {
            name.push(c);
        }
        name
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();

        match self.chars.peek().copied() {
            Some('*') => {
                self.chars.next();
            }
            Some(c) if is_name_char(c) => {
                compound.tag = Some(self.name().to_ascii_lowercase());
            }
            _ => {}
        }

        while let Some(&c) = self.chars.peek() {
            match c {
                '.' | '#' => {
                    self.chars.next();
                    let name = self.name();
                    if name.is_empty() {
                        return Err(self.unexpected(c));
                    }
                    if c == '.' {
                        compound.classes.push(name);
                    } else {
                        compound.id = Some(name);
                    }
                }
                ':' | '>' => break,
                c if c.is_whitespace() => break,
                other => return Err(self.unexpected(other)),
            }
        }

        Ok(compound)
    }

    fn position(&mut self) -> Result<Position, SelectorError> {
        self.chars.next();
        let pseudo = self.name();
        match pseudo.as_str() {
            "first" => Ok(Position::First),
            "last" => Ok(Position::Last),
            "eq" => {
                if self.chars.next() != Some('(') {
                    return Err(self.unsupported(pseudo));
                }
                let digits = self.name();
                if self.chars.next() != Some(')') {
                    return Err(self.unsupported(pseudo));
                }
                digits
                    .parse()
                    .map(Position::Nth)
                    .map_err(|_| self.unsupported(format!("eq({digits})")))
            }
            _ => Err(self.unsupported(pseudo)),
        }
    }

    fn unsupported(&self, pseudo: String) -> SelectorError {
        SelectorError::UnsupportedPseudo {
            selector: self.source.to_string(),
            pseudo,
        }
    }
}
