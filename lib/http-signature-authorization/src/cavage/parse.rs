use super::{SignatureHeader, SCHEME};
use crate::UnixTimestamp;
use logos::{Lexer, Logos, Span};
use miette::{Diagnostic, SourceSpan};
use std::str::SplitWhitespace;
use thiserror::Error;

/// Signature header parsing error
#[derive(Debug, Diagnostic, Error)]
pub enum ParseError {
    /// Header value contains characters other than visible ASCII
    #[error("Header value isn't visible ASCII")]
    InvalidCharacters,

    /// Header doesn't use the `Signature` scheme
    #[error("Authorization scheme isn't \"Signature\"")]
    InvalidScheme,

    /// Signature isn't valid base64url
    #[error(transparent)]
    InvalidSignatureEncoding(#[from] base64_simd::Error),

    /// Parameter appeared more than once
    #[error("Duplicate parameter")]
    DuplicateParameter {
        /// Location of the repeated parameter name
        #[label("already specified")]
        span: SourceSpan,
    },

    /// `headers` parameter doesn't name any component
    #[error("Signature doesn't cover any components")]
    EmptyHeaders,

    /// Timestamp parameter isn't a decimal integer
    #[error("Invalid timestamp")]
    InvalidTimestamp {
        /// Location of the timestamp value
        #[label("expected a decimal integer")]
        span: SourceSpan,
    },

    /// Required parameter is absent
    #[error("Missing parameter \"{0}\"")]
    MissingParameter(&'static str),

    /// Input ended in the middle of a parameter
    #[error("Unexpected end of input")]
    UnexpectedEnd {
        /// End of the input
        #[label("input ends here")]
        span: SourceSpan,
    },

    /// Token doesn't fit the grammar (this includes unbalanced quotes)
    #[error("Unexpected token")]
    UnexpectedToken {
        /// Location of the offending token
        #[label("unexpected token")]
        span: SourceSpan,
    },
}

#[derive(Clone, Copy, Debug, Logos, PartialEq)]
#[logos(skip r"[ \t]+")]
enum TokenTy {
    #[regex(r"[A-Za-z][A-Za-z0-9_-]*")]
    Key,

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#)]
    Value,

    #[regex(r"[0-9]+")]
    Number,

    #[token(",")]
    Comma,
}

#[derive(Debug)]
struct Token {
    ty: TokenTy,
    span: Span,
}

/// Single `key="value"` pair with spans relative to the full header value
struct Param<'a> {
    key: &'a str,
    key_span: Span,
    value: &'a str,
    value_span: Span,
    quoted: bool,
}

struct ParseIter<'a> {
    lexer: Lexer<'a, TokenTy>,

    /// Full header value, including the scheme
    input: &'a str,

    /// Offset of the parameter list within `input`
    offset: usize,

    /// Whether the last consumed token was a comma
    after_comma: bool,

    /// Marker whether we encountered any error or illegal token
    ///
    /// If we did, the iterator will stop yielding any results
    is_broken: bool,
}

impl<'a> ParseIter<'a> {
    fn new(input: &'a str, offset: usize) -> Self {
        Self {
            lexer: TokenTy::lexer(&input[offset..]),
            input,
            offset,
            after_comma: false,
            is_broken: false,
        }
    }

    fn next_token(&mut self) -> Option<Result<Token, ParseError>> {
        let ty = self.lexer.next()?;
        let span = self.lexer.span();
        let span = span.start + self.offset..span.end + self.offset;

        Some(match ty {
            Ok(ty) => Ok(Token { ty, span }),
            Err(()) => Err(ParseError::UnexpectedToken { span: span.into() }),
        })
    }

    fn expect(&mut self, pattern: &[TokenTy]) -> Result<Token, ParseError> {
        let end = self.input.len();
        let token = self.next_token().ok_or(ParseError::UnexpectedEnd {
            span: (end..end).into(),
        })??;

        if pattern.contains(&token.ty) {
            Ok(token)
        } else {
            Err(ParseError::UnexpectedToken {
                span: token.span.into(),
            })
        }
    }

    fn param(&mut self, key: Token) -> Result<Param<'a>, ParseError> {
        if key.ty != TokenTy::Key {
            return Err(ParseError::UnexpectedToken {
                span: key.span.into(),
            });
        }

        self.expect(&[TokenTy::Equals])?;
        let value = self.expect(&[TokenTy::Value, TokenTy::Number])?;

        self.after_comma = match self.next_token() {
            Some(next) => {
                let next = next?;
                if next.ty != TokenTy::Comma {
                    return Err(ParseError::UnexpectedToken {
                        span: next.span.into(),
                    });
                }
                true
            }
            None => false,
        };

        Ok(Param {
            key: &self.input[key.span.clone()],
            key_span: key.span,
            value: self.input[value.span.clone()].trim_matches('"'),
            value_span: value.span,
            quoted: value.ty == TokenTy::Value,
        })
    }
}

impl<'a> Iterator for ParseIter<'a> {
    type Item = Result<Param<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_broken {
            return None;
        }

        let item = match self.next_token() {
            Some(key) => key.and_then(|key| self.param(key)),
            None if self.after_comma => {
                let end = self.input.len();
                Err(ParseError::UnexpectedEnd {
                    span: (end..end).into(),
                })
            }
            None => return None,
        };

        self.is_broken = item.is_err();
        Some(item)
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, span: Span) -> Result<(), ParseError> {
    if slot.replace(value).is_some() {
        return Err(ParseError::DuplicateParameter { span: span.into() });
    }

    Ok(())
}

fn require_quoted(param: &Param<'_>) -> Result<(), ParseError> {
    if param.quoted {
        Ok(())
    } else {
        Err(ParseError::UnexpectedToken {
            span: param.value_span.clone().into(),
        })
    }
}

fn timestamp(param: &Param<'_>) -> Result<UnixTimestamp, ParseError> {
    param
        .value
        .parse()
        .map_err(|_| ParseError::InvalidTimestamp {
            span: param.value_span.clone().into(),
        })
}

/// Offset of the parameter list if the value starts with the `Signature` scheme
fn strip_scheme(input: &str) -> Option<usize> {
    let (scheme, _params) = input.split_once(|c: char| c == ' ' || c == '\t')?;
    scheme
        .eq_ignore_ascii_case(SCHEME)
        .then_some(scheme.len() + 1)
}

/// Parse a `Signature`-scheme `Authorization` header value
///
/// Parameters may appear in any order. `created` and `expires` are accepted quoted or bare.
/// The legacy `algorithm` parameter and unknown parameters are ignored.
#[inline]
pub fn parse(input: &str) -> Result<SignatureHeader<'_, SplitWhitespace<'_>, &str>, ParseError> {
    let offset = strip_scheme(input).ok_or(ParseError::InvalidScheme)?;

    let mut key_id = None;
    let mut signature = None;
    let mut headers = None;
    let mut created = None;
    let mut expires = None;
    let mut algorithm = None;

    for param in ParseIter::new(input, offset) {
        let param = param?;

        match param.key {
            "algorithm" => {
                // Only checked for duplicates. The verifier knows the algorithm of its key
                require_quoted(&param)?;
                set_once(&mut algorithm, (), param.key_span)?;
            }
            "keyId" => {
                require_quoted(&param)?;
                set_once(&mut key_id, param.value, param.key_span)?;
            }
            "signature" => {
                require_quoted(&param)?;
                set_once(&mut signature, param.value, param.key_span)?;
            }
            "headers" => {
                require_quoted(&param)?;
                set_once(&mut headers, param.value, param.key_span)?;
            }
            "created" => {
                let value = timestamp(&param)?;
                set_once(&mut created, value, param.key_span)?;
            }
            "expires" => {
                let value = timestamp(&param)?;
                set_once(&mut expires, value, param.key_span)?;
            }
            // Parameters outside the scheme (`nonce`, `alg`, ...) are ignored
            _ => {}
        }
    }

    let headers = headers.ok_or(ParseError::MissingParameter("headers"))?;
    if headers.split_whitespace().next().is_none() {
        return Err(ParseError::EmptyHeaders);
    }

    Ok(SignatureHeader {
        key_id: key_id.ok_or(ParseError::MissingParameter("keyId"))?,
        headers: headers.split_whitespace(),
        signature: signature.ok_or(ParseError::MissingParameter("signature"))?,
        created,
        expires,
    })
}
