// 导入父模块（也就是 lexer 模块）的所有内容
use super::*;

/// 一个辅助函数，用于简化测试。
/// 它只返回 Token 的种类，因为大多数测试更关心 Token 的类型和顺序。
fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).into_iter().map(|token| token.kind).collect()
}

// --- 成功案例 (Happy Path) ---

#[test]
fn test_simple_arithmetic() {
    let tokens = tokenize("1+2");
    let summary: Vec<_> = tokens
        .iter()
        .map(|t| (t.kind, t.lexeme.as_str(), t.line))
        .collect();
    assert_eq!(
        summary,
        vec![
            (TokenKind::Number, "1", 1),
            (TokenKind::Plus, "+", 1),
            (TokenKind::Number, "2", 1),
            (TokenKind::Eof, "", 1),
        ]
    );
}

#[test]
fn test_keywords_and_identifiers() {
    let source = "namespace App { public class Program { int counter = 10; } }";
    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Namespace,
            TokenKind::Identifier,
            TokenKind::LBrace,
            TokenKind::Public,
            TokenKind::Class,
            TokenKind::Identifier,
            TokenKind::LBrace,
            TokenKind::Int,
            TokenKind::Identifier,
            TokenKind::Assign,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keywords_are_case_sensitive() {
    assert_eq!(kinds("If iF if"), vec![
        TokenKind::Identifier,
        TokenKind::Identifier,
        TokenKind::If,
        TokenKind::Eof,
    ]);
    // 以关键字开头的标识符仍然是标识符
    assert_eq!(kinds("integer"), vec![TokenKind::Identifier, TokenKind::Eof]);
}

#[test]
fn test_all_operators() {
    let source = "+ - * / % = == != < > <= >= && || ! ++ -- ; , . : ( ) { } [ ]";
    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Plus, TokenKind::Minus, TokenKind::Star, TokenKind::Slash, TokenKind::Percent,
            TokenKind::Assign, TokenKind::Eq, TokenKind::NotEq, TokenKind::Lt, TokenKind::Gt,
            TokenKind::Lte, TokenKind::Gte, TokenKind::And, TokenKind::Or, TokenKind::Not,
            TokenKind::PlusPlus, TokenKind::MinusMinus, TokenKind::Semicolon, TokenKind::Comma,
            TokenKind::Dot, TokenKind::Colon, TokenKind::LParen, TokenKind::RParen,
            TokenKind::LBrace, TokenKind::RBrace, TokenKind::LBracket, TokenKind::RBracket,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_numbers_and_floats() {
    let tokens = tokenize("42 3.14 7.");
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[1].kind, TokenKind::FloatLiteral);
    assert_eq!(tokens[1].lexeme, "3.14");
    // 没有小数部分的 `7.` 是整数加一个点
    assert_eq!(tokens[2].kind, TokenKind::Number);
    assert_eq!(tokens[3].kind, TokenKind::Dot);
}

#[test]
fn test_string_with_newline_is_one_token() {
    let tokens = tokenize("\"a\nb\" x");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].lexeme, "a\nb");
    assert_eq!(tokens[0].line, 1);
    // 字符串内部的换行推进了行号
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].line, 2);
    assert_eq!(tokens[2].line, 2);
}

#[test]
fn test_unterminated_string_runs_to_end() {
    let tokens = tokenize("x = \"abc;\n");
    assert_eq!(tokens[2].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[2].lexeme, "abc;\n");
    assert_eq!(tokens[3].kind, TokenKind::Eof);
    assert_eq!(tokens[3].line, 2);
}

#[test]
fn test_char_literal_and_apostrophe() {
    let tokens = tokenize("'a' '");
    assert_eq!(tokens[0].kind, TokenKind::CharLiteral);
    assert_eq!(tokens[0].lexeme, "a");
    assert_eq!(tokens[1].kind, TokenKind::Apostrophe);
}

#[test]
fn test_comments_and_whitespace_are_skipped() {
    let source = "// 单行注释\nint /* 块\n注释 */ main;";
    let tokens = tokenize(source);
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![TokenKind::Int, TokenKind::Identifier, TokenKind::Semicolon, TokenKind::Eof]
    );
    assert_eq!(tokens[0].line, 2);
    // 块注释里的换行同样计入行号
    assert_eq!(tokens[1].line, 3);
}

// --- 失败案例 (Error Path) ---

#[test]
fn test_unknown_characters_become_tokens() {
    let tokens = tokenize("a # b & c | d");
    let unknown: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Unknown)
        .map(|t| t.lexeme.as_str())
        .collect();
    assert_eq!(unknown, vec!["#", "&", "|"]);

    let errors = lexical_errors(&tokens);
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0].to_string(), "1: unrecognized character '#'");
}

#[test]
fn test_lines_are_monotonic_and_end_with_eof() {
    let source = "using System;\nnamespace N {\n  class C {\n    int x = 1 @ 2;\n  }\n}\n";
    let tokens = tokenize(source);
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    assert!(tokens.windows(2).all(|pair| pair[0].line <= pair[1].line));
    let at = tokens.iter().find(|t| t.kind == TokenKind::Unknown).unwrap();
    assert_eq!(at.line, 4);
}

#[test]
fn test_empty_source() {
    let tokens = tokenize("");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!(tokens[0].line, 1);
}

#[test]
fn test_token_listing_format() {
    let tokens = tokenize("x");
    assert_eq!(tokens[0].to_string(), "[line 1] Identifier 'x'");
}

#[test]
fn test_unicode_identifiers() {
    let tokens = tokenize("int joão = 1; string 名字 = \"x\"; int _a1 = 2;");
    assert!(lexical_errors(&tokens).is_empty());

    let identifiers: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Identifier)
        .map(|t| t.lexeme.as_str())
        .collect();
    assert_eq!(identifiers, vec!["joão", "名字", "_a1"]);
    // 标识符不能以数字开头
    assert_eq!(kinds("1abc"), vec![TokenKind::Number, TokenKind::Identifier, TokenKind::Eof]);
}
