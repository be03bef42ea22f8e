use crate::error::{Error, Result};
use crate::language::{AtomType, Value, list, list_with_tail};
use crate::lexer::{Lexer, Position, Token};

// ============================================================================
// Parser
// ============================================================================

/// An open construct waiting for its closing token
enum Frame {
    List {
        items: Vec<Value>,
        tail: Option<Value>,
        after_dot: bool,
    },
    Vector(Vec<Value>),
    /// `'x` waiting for its single operand
    Quote,
}

/// Reads successive forms from one input. Nesting is tracked on an explicit
/// stack, so input depth never translates into Rust call depth.
pub struct Reader {
    lexer: Lexer,
}

fn error_at(pos: Position, message: impl Into<String>) -> Error {
    Error::Parse {
        line: pos.line,
        column: pos.column,
        message: message.into(),
    }
}

impl Reader {
    pub fn new(input: &str) -> Self {
        Reader {
            lexer: Lexer::new(input),
        }
    }

    /// Next complete form, or `None` at end of input
    pub fn read(&mut self) -> Result<Option<Value>> {
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            let (token, pos) = self.lexer.next_token()?;

            let completed = match token {
                Token::Eof => {
                    return match stack.last() {
                        None => Ok(None),
                        Some(Frame::List { .. }) => Err(error_at(pos, "Unclosed parenthesis")),
                        Some(Frame::Vector(_)) => Err(error_at(pos, "Unclosed vector")),
                        Some(Frame::Quote) => Err(error_at(pos, "Quote without operand")),
                    };
                }
                Token::LParen => {
                    stack.push(Frame::List {
                        items: Vec::new(),
                        tail: None,
                        after_dot: false,
                    });
                    continue;
                }
                Token::LBracket => {
                    stack.push(Frame::Vector(Vec::new()));
                    continue;
                }
                Token::Quote => {
                    stack.push(Frame::Quote);
                    continue;
                }
                Token::Dot => {
                    match stack.last_mut() {
                        Some(Frame::List {
                            items, after_dot, ..
                        }) if !items.is_empty() && !*after_dot => *after_dot = true,
                        _ => return Err(error_at(pos, "Unexpected .")),
                    }
                    continue;
                }
                Token::RParen => match stack.pop() {
                    Some(Frame::List {
                        items,
                        tail,
                        after_dot,
                    }) => match (after_dot, tail) {
                        (false, _) => list(items),
                        (true, Some(tail)) => list_with_tail(items, tail),
                        (true, None) => {
                            return Err(error_at(pos, "Missing tail after ."));
                        }
                    },
                    _ => return Err(error_at(pos, "Unexpected )")),
                },
                Token::RBracket => match stack.pop() {
                    Some(Frame::Vector(items)) => Value::vector(items),
                    _ => return Err(error_at(pos, "Unexpected ]")),
                },
                Token::Number(n) => Value::Atom(AtomType::Number(n)),
                Token::String(s) => Value::string(s),
                Token::Nil => Value::Nil,
                Token::T => Value::t(),
                Token::Symbol(s) => Value::symbol(&s),
            };

            let mut value = completed;
            // Hand the finished value to the innermost open frame; quotes
            // complete immediately and pass their wrapped value further up.
            loop {
                match stack.last_mut() {
                    None => return Ok(Some(value)),
                    Some(Frame::Quote) => {
                        stack.pop();
                        value = list([Value::symbol("quote"), value]);
                    }
                    Some(Frame::Vector(items)) => {
                        items.push(value);
                        break;
                    }
                    Some(Frame::List {
                        items,
                        tail,
                        after_dot,
                    }) => {
                        if !*after_dot {
                            items.push(value);
                        } else if tail.is_none() {
                            *tail = Some(value);
                        } else {
                            return Err(error_at(pos, "More than one object after ."));
                        }
                        break;
                    }
                }
            }
        }
    }
}

/// Parse exactly one form; anything but whitespace and comments after it is
/// an error.
pub fn parse(input: &str) -> Result<Value> {
    let mut reader = Reader::new(input);
    let value = reader.read()?.ok_or_else(|| Error::Parse {
        line: 1,
        column: 1,
        message: "Unexpected end of input".to_string(),
    })?;

    let (token, pos) = reader.lexer.next_token()?;
    if token != Token::Eof {
        return Err(error_at(pos, "Trailing content after form"));
    }
    Ok(value)
}

/// Parse every form in `input`
pub fn parse_all(input: &str) -> Result<Vec<Value>> {
    let mut reader = Reader::new(input);
    let mut forms = Vec::new();
    while let Some(form) = reader.read()? {
        forms.push(form);
    }
    Ok(forms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::cons;

    #[test]
    fn test_parse_atoms() {
        assert_eq!(parse("42").unwrap(), Value::int(42));
        assert_eq!(parse("nil").unwrap(), Value::Nil);
        assert_eq!(parse("t").unwrap(), Value::t());
        assert_eq!(parse("\"hi\"").unwrap(), Value::string("hi"));
        assert_eq!(parse("wg-win").unwrap(), Value::symbol("wg-win"));
    }

    #[test]
    fn test_escaped_nil_and_t_are_symbols() {
        for name in ["nil", "t"] {
            let sym = Value::symbol(name);
            assert_eq!(sym.to_string(), format!("\\{name}"));
            assert_eq!(parse(&sym.to_string()).unwrap(), sym);
        }
    }

    #[test]
    fn test_parse_empty_list_is_nil() {
        assert_eq!(parse("()").unwrap(), Value::Nil);
    }

    #[test]
    fn test_parse_dotted_pair() {
        assert_eq!(
            parse("(a . 1)").unwrap(),
            cons(Value::symbol("a"), Value::int(1))
        );
    }

    #[test]
    fn test_parse_dot_before_list_tail_is_a_list() {
        assert_eq!(
            parse("(a . (1 2))").unwrap(),
            list([Value::symbol("a"), Value::int(1), Value::int(2)])
        );
    }

    #[test]
    fn test_parse_quote() {
        assert_eq!(
            parse("'(x)").unwrap(),
            list([Value::symbol("quote"), list([Value::symbol("x")])])
        );
        assert_eq!(
            parse("''x").unwrap(),
            list([
                Value::symbol("quote"),
                list([Value::symbol("quote"), Value::symbol("x")])
            ])
        );
    }

    #[test]
    fn test_parse_vector() {
        assert_eq!(
            parse("[1 (2) []]").unwrap(),
            Value::vector(vec![
                Value::int(1),
                list([Value::int(2)]),
                Value::vector(vec![])
            ])
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("(1 2").is_err());
        assert!(parse(")").is_err());
        assert!(parse("[1 2)").is_err());
        assert!(parse("(. 1)").is_err());
        assert!(parse("(1 .)").is_err());
        assert!(parse("(1 . 2 3)").is_err());
        assert!(parse("'").is_err());
        assert!(parse("").is_err());
        assert!(parse("1 2").is_err());
    }

    #[test]
    fn test_parse_allows_trailing_comment() {
        assert_eq!(parse("(1) ; saved session\n").unwrap(), list([Value::int(1)]));
    }

    #[test]
    fn test_parse_all() {
        let forms = parse_all("1 (2) \"three\"").unwrap();
        assert_eq!(forms.len(), 3);
        assert_eq!(forms[2], Value::string("three"));
    }

    #[test]
    fn test_parse_deep_nesting() {
        let depth = 100_000;
        let input = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
        let mut value = parse(&input).unwrap();
        let mut seen = 0;
        while let Value::Cons(cell) = value {
            seen += 1;
            value = cell.car.clone();
        }
        // The innermost () reads as nil
        assert_eq!(seen, depth - 1);
    }

    #[test]
    fn test_parse_deep_vector_nesting() {
        let depth = 100_000;
        let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let value = parse(&input).unwrap();
        assert_eq!(value.to_string().len(), 2 * depth);
        drop(value);
    }

    #[test]
    fn test_drop_mixed_deep_nesting() {
        let mut value = Value::Nil;
        for i in 0..100_000 {
            value = if i % 2 == 0 {
                Value::vector(vec![Value::int(i), value])
            } else {
                list([value])
            };
        }
        drop(value);
    }

    #[test]
    fn test_round_trip_through_display() {
        let input = "(wg-session (name . \"work\") (uid . \"K3XQ\") (wconfigs [1 2.5 -3]) \\12 nil t)";
        let value = parse(input).unwrap();
        assert_eq!(value.to_string(), input);
        assert_eq!(parse(&value.to_string()).unwrap(), value);
    }
}
