use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::{LispError, Result};
use crate::language::Value;
use crate::stack::ensure_sufficient_stack;

// ============================================================================
// Parser
// ============================================================================

#[derive(Debug, PartialEq)]
enum Token {
    LParen,
    RParen,
    Quote,
    Atom(String),
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            '\'' => {
                tokens.push(Token::Quote);
                chars.next();
            }
            ';' => {
                // Comment runs to end of line
                while let Some(c) = chars.next() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            ch if ch.is_whitespace() => {
                chars.next();
            }
            _ => {
                let mut atom = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() || matches!(ch, '(' | ')' | '\'' | ';') {
                        break;
                    }
                    atom.push(ch);
                    chars.next();
                }
                tokens.push(Token::Atom(atom));
            }
        }
    }

    tokens
}

fn looks_numeric(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn parse_atom(text: &str) -> Result<Value> {
    match text {
        "#t" => Ok(Value::Boolean(true)),
        "#f" => Ok(Value::Boolean(false)),
        _ if looks_numeric(text) => text
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| LispError::Syntax(format!("integer literal out of range: {text}"))),
        _ => Ok(Value::symbol(text)),
    }
}

fn nested_too_deep(limit: usize) -> LispError {
    LispError::Syntax(format!("Expression nested deeper than {limit} levels"))
}

/// `depth` counts the lists and quotes enclosing the current token. Trees
/// deeper than `limit` could never be evaluated, so they are refused before
/// they are built.
fn parse_tokens(tokens: &[Token], depth: usize, limit: usize) -> Result<(Value, usize)> {
    let Some(first) = tokens.first() else {
        return Err(LispError::Syntax("Unexpected end of input".to_string()));
    };

    match first {
        Token::Atom(text) => Ok((parse_atom(text)?, 1)),
        Token::Quote => {
            if depth >= limit {
                return Err(nested_too_deep(limit));
            }
            let (quoted, consumed) =
                ensure_sufficient_stack(|| parse_tokens(&tokens[1..], depth + 1, limit))?;
            let quote_list = Value::list(vec![Value::symbol("quote"), quoted]);
            Ok((quote_list, consumed + 1))
        }
        Token::LParen => {
            if depth >= limit {
                return Err(nested_too_deep(limit));
            }
            let mut values = Vec::new();
            let mut i = 1;

            while i < tokens.len() {
                if tokens[i] == Token::RParen {
                    return Ok((Value::list(values), i + 1));
                }

                let (value, consumed) =
                    ensure_sufficient_stack(|| parse_tokens(&tokens[i..], depth + 1, limit))?;
                values.push(value);
                i += consumed;
            }

            Err(LispError::Syntax("Unclosed parenthesis".to_string()))
        }
        Token::RParen => Err(LispError::Syntax("Unexpected )".to_string())),
    }
}

/// Parse exactly one expression; trailing input is an error
pub fn parse(input: &str) -> Result<Value> {
    parse_with_limit(input, DEFAULT_MAX_DEPTH)
}

/// [`parse`] with an explicit nesting limit
pub fn parse_with_limit(input: &str, max_depth: usize) -> Result<Value> {
    let tokens = tokenize(input);
    let (value, consumed) = parse_tokens(&tokens, 0, max_depth)?;
    if consumed < tokens.len() {
        return Err(LispError::Syntax(format!(
            "Expected end of input after {value}"
        )));
    }
    Ok(value)
}

/// Parse a sequence of top-level expressions
pub fn parse_multiple(input: &str) -> Result<Vec<Value>> {
    parse_multiple_with_limit(input, DEFAULT_MAX_DEPTH)
}

/// [`parse_multiple`] with an explicit nesting limit
pub fn parse_multiple_with_limit(input: &str, max_depth: usize) -> Result<Vec<Value>> {
    let tokens = tokenize(input);
    let mut exprs = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let (value, consumed) = parse_tokens(&tokens[i..], 0, max_depth)?;
        exprs.push(value);
        i += consumed;
    }
    Ok(exprs)
}

/// Whether `input` opens more parentheses than it closes, i.e. a REPL
/// should keep reading lines before parsing
pub fn is_incomplete(input: &str) -> bool {
    let mut depth = 0i64;
    for token in tokenize(input) {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth -= 1,
            _ => {}
        }
    }
    depth > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_atoms() {
        assert_eq!(parse("42"), Ok(Value::Integer(42)));
        assert_eq!(parse("-17"), Ok(Value::Integer(-17)));
        assert_eq!(parse("#t"), Ok(Value::Boolean(true)));
        assert_eq!(parse("#f"), Ok(Value::Boolean(false)));
        assert_eq!(parse("foo"), Ok(Value::symbol("foo")));
        assert_eq!(parse("-"), Ok(Value::symbol("-")));
        assert_eq!(parse("->"), Ok(Value::symbol("->")));
    }

    #[test]
    fn test_parse_nested_list() {
        let parsed = parse("(define f (lambda (n) (+ n 1)))").unwrap();
        assert_eq!(parsed.to_string(), "(define f (lambda (n) (+ n 1)))");
    }

    #[test]
    fn test_parse_empty_list() {
        assert_eq!(parse("()"), Ok(Value::empty_list()));
    }

    #[test]
    fn test_quote_shorthand() {
        assert_eq!(parse("'(1 2)").unwrap().to_string(), "(quote (1 2))");
        assert_eq!(parse("''a").unwrap().to_string(), "(quote (quote a))");
    }

    #[test]
    fn test_comments_are_skipped() {
        let parsed = parse("; leading\n(+ 1 ; inline\n 2)").unwrap();
        assert_eq!(parsed.to_string(), "(+ 1 2)");
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(parse("(1 2"), Err(LispError::Syntax(_))));
        assert!(matches!(parse(")"), Err(LispError::Syntax(_))));
        assert!(matches!(parse(""), Err(LispError::Syntax(_))));
        assert!(matches!(parse("(a) b"), Err(LispError::Syntax(_))));
        assert!(matches!(
            parse("99999999999999999999"),
            Err(LispError::Syntax(_))
        ));
    }

    #[test]
    fn test_parse_multiple() {
        let exprs = parse_multiple("(define x 1)\n\n x ; trailing").unwrap();
        assert_eq!(exprs.len(), 2);
        assert_eq!(exprs[1], Value::symbol("x"));
        assert_eq!(parse_multiple("  ; nothing\n"), Ok(vec![]));
    }

    #[test]
    fn test_incomplete_input() {
        assert!(is_incomplete("(define f (lambda (n)"));
        assert!(!is_incomplete("(+ 1 2)"));
        assert!(!is_incomplete("; (comment"));
    }

    #[test]
    fn test_deep_nesting_is_refused() {
        let depth = 200_000;
        let input = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
        match parse(&input) {
            Err(LispError::Syntax(msg)) => assert!(msg.contains("nested deeper")),
            other => panic!("expected syntax error, got {:?}", other.map(|_| ())),
        }
        assert!(matches!(parse_multiple(&input), Err(LispError::Syntax(_))));
    }

    #[test]
    fn test_nesting_limit_counts_quotes() {
        assert!(parse_with_limit("'''a", 3).is_ok());
        assert!(matches!(
            parse_with_limit("''''a", 3),
            Err(LispError::Syntax(_))
        ));
        assert!(parse_with_limit("((()))", 3).is_ok());
        assert!(matches!(
            parse_with_limit("(((())))", 3),
            Err(LispError::Syntax(_))
        ));
    }
}
