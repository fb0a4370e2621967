//! Tokenizer for pure arithmetic strings.

use super::EvalError;

/// Arithmetic token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

/// Split an arithmetic string into tokens.
///
/// Numbers are `digits [. digits] [(e|E) [+|-] digits]`; a leading `.` is
/// accepted (`.5`). Whitespace is skipped.
pub fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        };
        if let Some(tok) = single {
            tokens.push(tok);
            i += 1;
            continue;
        }

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let (value, next) = lex_number(&chars, i)?;
            tokens.push(Token::Number(value));
            i = next;
            continue;
        }

        return Err(EvalError::InvalidCharacter { ch: c });
    }

    Ok(tokens)
}

/// Lex a number starting at `start`, returning its value and the next index.
fn lex_number(chars: &[char], start: usize) -> Result<(f64, usize), EvalError> {
    let mut i = start;
    let mut mantissa_digits = 0;

    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return Err(EvalError::Parse {
            message: format!("número incompleto na posição {}", start + 1),
        });
    }

    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        let exp_start = j;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        if j == exp_start {
            return Err(EvalError::Parse {
                message: format!("expoente incompleto na posição {}", i + 1),
            });
        }
        i = j;
    }

    let text: String = chars[start..i].iter().collect();
    let value = text.parse::<f64>().map_err(|_| EvalError::Parse {
        message: format!("número inválido \"{}\"", text),
    })?;
    Ok((value, i))
}
