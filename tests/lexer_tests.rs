// Integration tests for the minipy lexer
//
// These tests feed raw source text to `tokenize` and assert on the token
// stream, including the NEWLINE/INDENT/DEDENT structure produced by
// significant indentation, and on the LexErrors for malformed input.

use minipy::errors::ErrorKind;
use minipy::lexer::{tokenize, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .expect("tokenize failed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn tokenizes_a_simple_assignment() {
    let toks = kinds("x = 42\n");
    assert_eq!(
        toks,
        vec![
            TokenKind::Identifier("x".into()),
            TokenKind::Operator("=".into()),
            TokenKind::Int(42),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn distinguishes_int_and_float_literals() {
    let toks = kinds("1 2.5 10\n");
    assert_eq!(toks[0], TokenKind::Int(1));
    assert_eq!(toks[1], TokenKind::Float(2.5));
    assert_eq!(toks[2], TokenKind::Int(10));
}

#[test]
fn decimal_point_requires_a_digit() {
    let err = tokenize("x = 3.\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::LexError);
}

#[test]
fn recognizes_two_character_operators() {
    let toks = kinds("a // b ** c == d != e <= f >= g\n");
    let ops: Vec<_> = toks
        .iter()
        .filter_map(|k| match k {
            TokenKind::Operator(op) => Some(op.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(ops, vec!["//", "**", "==", "!=", "<=", ">="]);
}

#[test]
fn keywords_are_not_identifiers() {
    let toks = kinds("if while def return print True False None and or not x\n");
    let keyword_count = toks
        .iter()
        .filter(|k| matches!(k, TokenKind::Keyword(_)))
        .count();
    assert_eq!(keyword_count, 11);
    assert!(toks.contains(&TokenKind::Identifier("x".into())));
}

#[test]
fn string_literals_with_escapes() {
    let toks = kinds("s = \"a\\nb\\\"c\"\n");
    assert_eq!(toks[2], TokenKind::Str("a\nb\"c".into()));
    let toks = kinds("s = 'it\\'s'\n");
    assert_eq!(toks[2], TokenKind::Str("it's".into()));
}

#[test]
fn unterminated_string_is_a_lex_error() {
    let err = tokenize("s = \"oops\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::LexError);
    assert_eq!(err.line, 1);

    let err = tokenize("s = \"no closing quote").unwrap_err();
    assert_eq!(err.kind, ErrorKind::LexError);
}

#[test]
fn unexpected_character_is_a_lex_error() {
    let err = tokenize("x = 1 $ 2\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::LexError);
    assert!(err.message.contains('$'));
}

#[test]
fn emits_indent_and_dedent_tokens() {
    let toks = kinds("if x:\n    print(x)\ny = 1\n");
    let indents = toks.iter().filter(|k| matches!(k, TokenKind::Indent)).count();
    let dedents = toks.iter().filter(|k| matches!(k, TokenKind::Dedent)).count();
    assert_eq!(indents, 1);
    assert_eq!(dedents, 1);
    // The dedent appears before the token that starts the outer line
    let dedent_pos = toks.iter().position(|k| matches!(k, TokenKind::Dedent)).unwrap();
    let y_pos = toks.iter().position(|k| *k == TokenKind::Identifier("y".into())).unwrap();
    assert!(dedent_pos < y_pos);
}

#[test]
fn one_dedent_per_closed_level() {
    let source = "if a:\n    if b:\n        print(b)\nprint(a)\n";
    let toks = kinds(source);
    let dedents = toks.iter().filter(|k| matches!(k, TokenKind::Dedent)).count();
    assert_eq!(dedents, 2);
}

#[test]
fn dedents_are_closed_at_end_of_file() {
    let toks = kinds("while x:\n    if y:\n        print(y)\n");
    let dedents = toks.iter().filter(|k| matches!(k, TokenKind::Dedent)).count();
    assert_eq!(dedents, 2);
    assert_eq!(toks.last(), Some(&TokenKind::Eof));
}

#[test]
fn inconsistent_dedent_is_a_lex_error() {
    // 2 spaces matches no enclosing indentation level (0 or 4)
    let err = tokenize("if x:\n    print(x)\n  print(x)\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::LexError);
    assert_eq!(err.line, 3);
}

#[test]
fn tabs_in_indentation_are_rejected() {
    let err = tokenize("if x:\n\tprint(x)\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::LexError);
}

#[test]
fn blank_and_comment_lines_do_not_affect_indentation() {
    let source = "if x:\n    a = 1\n\n    # a comment\n    b = 2\nc = 3\n";
    let toks = kinds(source);
    let indents = toks.iter().filter(|k| matches!(k, TokenKind::Indent)).count();
    let dedents = toks.iter().filter(|k| matches!(k, TokenKind::Dedent)).count();
    assert_eq!(indents, 1);
    assert_eq!(dedents, 1);
}

#[test]
fn comments_are_skipped() {
    let toks = kinds("x = 1  # the answer\n");
    assert!(!toks.iter().any(|k| matches!(k, TokenKind::Str(_))));
    assert_eq!(toks.len(), 5); // x, =, 1, newline, eof
}

#[test]
fn newlines_inside_parentheses_are_joined() {
    let toks = kinds("x = (1 +\n     2)\n");
    let newlines = toks.iter().filter(|k| matches!(k, TokenKind::Newline)).count();
    assert_eq!(newlines, 1);
}

#[test]
fn missing_trailing_newline_is_supplied() {
    let toks = kinds("x = 1");
    assert_eq!(toks[toks.len() - 2], TokenKind::Newline);
    assert_eq!(toks[toks.len() - 1], TokenKind::Eof);
}

#[test]
fn tracks_line_numbers() {
    let tokens = tokenize("a = 1\nb = 2\n").expect("tokenize failed");
    let b_token = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Identifier("b".into()))
        .unwrap();
    assert_eq!(b_token.line, 2);
}

#[test]
fn empty_source_yields_only_eof() {
    let toks = kinds("");
    assert_eq!(toks, vec![TokenKind::Eof]);
}

#[test]
fn retokenizing_is_deterministic() {
    let source = "def f(n):\n    return n * 2\nprint(f(21))\n";
    assert_eq!(kinds(source), kinds(source));
}
