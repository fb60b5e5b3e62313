//! Tokenizer and recursive descent parser for the C type spellings used in target
//! tables, e.g. `unsigned _Addr`, `volatile void *volatile` or `struct __pthread *`.

use crate::abi::{AggregateKind, QualType, ScalarKind, ScalarType, Signedness, TypeExpr};

use super::error::SpellingError;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Identifier,
    Star,
    EOF,
}

pub struct Lexer<'src> {
    src: &'src str,
    column: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self { src, column: 0 }
    }

    pub fn next_token(&mut self) -> Result<Token, SpellingError> {
        let rest = &self.src[self.column..];
        let trimmed = rest.trim_start();
        self.column += rest.len() - trimmed.len();
        let column = self.column;
        let Some(first) = trimmed.chars().next() else {
            return Ok(Token {
                kind: TokenKind::EOF,
                lexeme: String::new(),
                column,
            });
        };
        if first == '*' {
            self.column += 1;
            return Ok(Token {
                kind: TokenKind::Star,
                lexeme: "*".into(),
                column,
            });
        }
        if first == '_' || first.is_ascii_alphabetic() {
            let len = trimmed
                .find(|ch: char| ch != '_' && !ch.is_ascii_alphanumeric())
                .unwrap_or(trimmed.len());
            self.column += len;
            return Ok(Token {
                kind: TokenKind::Identifier,
                lexeme: trimmed[..len].to_owned(),
                column,
            });
        }
        Err(SpellingError::UnexpectedChar {
            ch: first,
            column,
            spelling: self.src.to_owned(),
        })
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, SpellingError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::EOF;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

/// Parses one type spelling into a qualified type expression.
pub fn parse_spelling(src: &str) -> Result<QualType, SpellingError> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut parser = Parser {
        src,
        tokens,
        pos: 0,
    };
    let ty = parser.spelling()?;
    parser.expect_end()?;
    Ok(ty)
}

struct Parser<'src> {
    src: &'src str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_ident(&self) -> Option<&str> {
        let token = self.peek();
        (token.kind == TokenKind::Identifier).then_some(token.lexeme.as_str())
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::EOF {
            self.pos += 1;
        }
        token
    }

    fn eat_ident(&mut self, word: &str) -> bool {
        if self.peek_ident() == Some(word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &'static str) -> SpellingError {
        let token = self.peek();
        SpellingError::Unexpected {
            expected,
            found: if token.kind == TokenKind::EOF {
                "end of spelling".into()
            } else {
                format!("'{}'", token.lexeme)
            },
            column: token.column,
            spelling: self.src.to_owned(),
        }
    }

    fn expect_end(&self) -> Result<(), SpellingError> {
        match self.peek().kind {
            TokenKind::EOF => Ok(()),
            _ => Err(self.unexpected("end of spelling")),
        }
    }

    fn qualifiers(&mut self) -> bool {
        let mut volatile = false;
        while self.eat_ident("volatile") {
            volatile = true;
        }
        volatile
    }

    fn spelling(&mut self) -> Result<QualType, SpellingError> {
        let volatile = self.qualifiers();
        let base = self.base()?;
        let mut ty = QualType { ty: base, volatile };
        while self.peek().kind == TokenKind::Star {
            self.bump();
            let mut pointer = ty.pointer_to();
            pointer.volatile = self.qualifiers();
            ty = pointer;
        }
        Ok(ty)
    }

    fn base(&mut self) -> Result<TypeExpr, SpellingError> {
        let sign = if self.eat_ident("unsigned") {
            Signedness::Unsigned
        } else if self.eat_ident("signed") {
            Signedness::Signed
        } else {
            Signedness::Plain
        };
        let Some(word) = self.peek_ident().map(str::to_owned) else {
            return match sign {
                Signedness::Plain => Err(self.unexpected("type name")),
                _ => Ok(TypeExpr::Scalar(ScalarType::bare(sign))),
            };
        };
        let kind = match word.as_str() {
            "char" => Some(ScalarKind::Char),
            "short" => {
                self.bump();
                self.eat_ident("int");
                return Ok(TypeExpr::Scalar(ScalarType::new(ScalarKind::Short, sign)));
            }
            "int" => Some(ScalarKind::Int),
            "long" => {
                self.bump();
                let kind = if self.eat_ident("long") {
                    ScalarKind::LongLong
                } else if sign == Signedness::Plain && self.eat_ident("double") {
                    return Ok(TypeExpr::Scalar(ScalarType::plain(ScalarKind::LongDouble)));
                } else {
                    ScalarKind::Long
                };
                self.eat_ident("int");
                return Ok(TypeExpr::Scalar(ScalarType::new(kind, sign)));
            }
            "_Addr" => Some(ScalarKind::Addr),
            "_Int64" => Some(ScalarKind::Int64),
            "_Reg" => Some(ScalarKind::Reg),
            _ => None,
        };
        if let Some(kind) = kind {
            self.bump();
            return Ok(TypeExpr::Scalar(ScalarType::new(kind, sign)));
        }
        if sign != Signedness::Plain {
            return match word.as_str() {
                "float" | "double" | "void" | "struct" | "union" => {
                    Err(self.unexpected("integer type after sign keyword"))
                }
                // `unsigned` alone means `unsigned int`
                _ => Ok(TypeExpr::Scalar(ScalarType::bare(sign))),
            };
        }
        self.bump();
        match word.as_str() {
            "float" => Ok(TypeExpr::Scalar(ScalarType::plain(ScalarKind::Float))),
            "double" => Ok(TypeExpr::Scalar(ScalarType::plain(ScalarKind::Double))),
            "void" => Ok(TypeExpr::Void),
            "struct" | "union" => {
                let kind = if word == "struct" {
                    AggregateKind::Struct
                } else {
                    AggregateKind::Union
                };
                match self.peek_ident().map(str::to_owned) {
                    Some(tag) => {
                        self.bump();
                        Ok(TypeExpr::Tagged { kind, tag })
                    }
                    None => Err(self.unexpected("aggregate tag")),
                }
            }
            builtin if builtin.starts_with("__builtin_") => Ok(TypeExpr::Builtin(word)),
            _ => Ok(TypeExpr::Named(word.as_str().into())),
        }
    }
}
