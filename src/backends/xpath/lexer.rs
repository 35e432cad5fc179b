// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tokenizer for the selector language.
//!
//! `*` and the names `and`, `or`, `div`, `mod` are operators only when the previous
//! token can end an operand; otherwise they are name tests. This is the XPath 1.0
//! lexical disambiguation rule.

use crate::errors::SelectorError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Slash,
    DoubleSlash,
    LBracket,
    RBracket,
    LParen,
    RParen,
    At,
    Comma,
    Dot,
    DotDot,
    ColonColon,
    Pipe,
    Plus,
    Minus,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    /// `*` as a name test
    Star,
    /// `*` as an operator
    Multiply,
    And,
    Or,
    Div,
    Mod,
    Literal(String),
    Number(f64),
    Name(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Lexed {
    pub token: Token,
    pub offset: usize,
}

pub(crate) fn tokenize(expression: &str) -> Result<Vec<Lexed>, SelectorError> {
    let chars: Vec<(usize, char)> = expression.char_indices().collect();
    let mut tokens: Vec<Lexed> = Vec::new();
    let mut i = 0;

    let syntax = |offset: usize, message: &str| SelectorError::Syntax {
        expression: expression.to_string(),
        position: offset,
        message: message.to_string(),
    };

    while i < chars.len() {
        let (offset, c) = chars[i];
        let peek = chars.get(i + 1).map(|(_, c)| *c);
        let operator_context = can_end_operand(tokens.last().map(|l| &l.token));

        let (token, consumed) = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '/' if peek == Some('/') => (Token::DoubleSlash, 2),
            '/' => (Token::Slash, 1),
            '[' => (Token::LBracket, 1),
            ']' => (Token::RBracket, 1),
            '(' => (Token::LParen, 1),
            ')' => (Token::RParen, 1),
            '@' => (Token::At, 1),
            ',' => (Token::Comma, 1),
            '|' => (Token::Pipe, 1),
            '+' => (Token::Plus, 1),
            '-' => (Token::Minus, 1),
            '=' => (Token::Eq, 1),
            '!' if peek == Some('=') => (Token::NotEq, 2),
            '<' if peek == Some('=') => (Token::Le, 2),
            '<' => (Token::Lt, 1),
            '>' if peek == Some('=') => (Token::Ge, 2),
            '>' => (Token::Gt, 1),
            ':' if peek == Some(':') => (Token::ColonColon, 2),
            '*' if operator_context => (Token::Multiply, 1),
            '*' => (Token::Star, 1),
            '.' if peek == Some('.') => (Token::DotDot, 2),
            '.' if peek.is_some_and(|p| p.is_ascii_digit()) => {
                let (number, len) = read_number(&chars[i..]);
                (Token::Number(number), len)
            }
            '.' => (Token::Dot, 1),
            '"' | '\'' => {
                let quote = c;
                let mut j = i + 1;
                let mut literal = String::new();
                while j < chars.len() && chars[j].1 != quote {
                    literal.push(chars[j].1);
                    j += 1;
                }
                if j >= chars.len() {
                    return Err(syntax(offset, "unterminated string literal"));
                }
                (Token::Literal(literal), j + 1 - i)
            }
            c if c.is_ascii_digit() => {
                let (number, len) = read_number(&chars[i..]);
                (Token::Number(number), len)
            }
            c if is_name_start(c) => {
                let mut j = i + 1;
                while j < chars.len() {
                    let n = chars[j].1;
                    if n == ':' {
                        // `prefix:local` continues the name, `axis::` does not
                        let next = chars.get(j + 1).map(|(_, c)| *c);
                        if next.is_some_and(is_name_start) {
                            j += 1;
                            continue;
                        }
                        break;
                    }
                    if is_name_char(n) {
                        j += 1;
                    } else {
                        break;
                    }
                }
                let name: String = chars[i..j].iter().map(|(_, c)| *c).collect();
                let token = match name.as_str() {
                    "and" if operator_context => Token::And,
                    "or" if operator_context => Token::Or,
                    "div" if operator_context => Token::Div,
                    "mod" if operator_context => Token::Mod,
                    _ => Token::Name(name),
                };
                (token, j - i)
            }
            _ => return Err(syntax(offset, &format!("unexpected character '{}'", c))),
        };
        tokens.push(Lexed { token, offset });
        i += consumed;
    }
    Ok(tokens)
}

fn read_number(chars: &[(usize, char)]) -> (f64, usize) {
    let mut len = 0;
    let mut seen_dot = false;
    let mut text = String::new();
    for (_, c) in chars {
        if c.is_ascii_digit() || (*c == '.' && !seen_dot) {
            seen_dot |= *c == '.';
            text.push(*c);
            len += 1;
        } else {
            break;
        }
    }
    (text.parse().unwrap_or(f64::NAN), len)
}

/// True when the previous token can end an operand, so `*` and operator names
/// that follow it are operators.
fn can_end_operand(previous: Option<&Token>) -> bool {
    matches!(
        previous,
        Some(
            Token::Name(_)
                | Token::Literal(_)
                | Token::Number(_)
                | Token::RParen
                | Token::RBracket
                | Token::Dot
                | Token::DotDot
                | Token::Star
        )
    )
}

pub(crate) fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub(crate) fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(expression: &str) -> Vec<Token> {
        tokenize(expression)
            .unwrap()
            .into_iter()
            .map(|l| l.token)
            .collect()
    }

    #[test]
    fn test_star_is_wildcard_or_multiply() {
        assert_eq!(kinds("/*"), vec![Token::Slash, Token::Star]);
        assert_eq!(
            kinds("//start * 1000"),
            vec![
                Token::DoubleSlash,
                Token::Name("start".into()),
                Token::Multiply,
                Token::Number(1000.0)
            ]
        );
    }

    #[test]
    fn test_operator_names() {
        assert_eq!(
            kinds("div div 60"),
            vec![Token::Name("div".into()), Token::Div, Token::Number(60.0)]
        );
        assert_eq!(
            kinds("a and b"),
            vec![
                Token::Name("a".into()),
                Token::And,
                Token::Name("b".into())
            ]
        );
    }

    #[test]
    fn test_axis_and_qualified_names() {
        assert_eq!(
            kinds("child::x:item"),
            vec![
                Token::Name("child".into()),
                Token::ColonColon,
                Token::Name("x:item".into())
            ]
        );
    }

    #[test]
    fn test_literals_and_numbers() {
        assert_eq!(
            kinds("[b='e'] .5 12.25"),
            vec![
                Token::LBracket,
                Token::Name("b".into()),
                Token::Eq,
                Token::Literal("e".into()),
                Token::RBracket,
                Token::Number(0.5),
                Token::Number(12.25)
            ]
        );
    }

    #[test]
    fn test_unterminated_literal_is_syntax_error() {
        assert!(matches!(
            tokenize("/a[b='x]"),
            Err(SelectorError::Syntax { .. })
        ));
    }
}
