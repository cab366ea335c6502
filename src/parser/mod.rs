//! src/parser/mod.rs
//!
//! 语法分析阶段的公共接口。
//! 它的职责是接收一个 Token 流，并将其转换为一个抽象语法树 (AST)，
//! 同时收集所有语法错误。

// `pub mod ast` 使 AST 定义可以被前端其他部分访问。
pub mod ast;
mod expression;
mod main;
mod statement;

use crate::lexer::{Token, TokenKind};
use crate::reporter::SyntaxError;
use crate::utils::Span;
use ast::Program;
use main::{Parse, Parser};
use std::borrow::Cow;

/// 这是 parser 模块唯一的公共入口函数。
///
/// - 输入: `lexer::tokenize` 产生的 Token 序列。
/// - 输出: 一个尽力而为的 `Program`，以及按发现顺序排列的语法错误。
///
/// 对任何输入都会终止。即使 Token 序列缺少结尾的 `Eof`，也会自动补上。
pub fn parse(tokens: &[Token]) -> (Program, Vec<SyntaxError>) {
    let (program, errors, _) = parse_counting_steps(tokens);
    (program, errors)
}

/// 与 `parse` 相同，额外返回解析器执行的步数，用于验证终止性。
pub(crate) fn parse_counting_steps(tokens: &[Token]) -> (Program, Vec<SyntaxError>, usize) {
    let tokens = with_eof(tokens);
    let mut parser = Parser::new(&tokens);
    let program = parser.parse_program();
    let (errors, steps) = parser.finish();
    (program, errors, steps)
}

fn with_eof(tokens: &[Token]) -> Cow<'_, [Token]> {
    match tokens.last() {
        Some(last) if last.kind == TokenKind::Eof => Cow::Borrowed(tokens),
        _ => {
            let (line, end) = tokens
                .last()
                .map_or((1, 0), |last| (last.line, last.span.end));
            let mut owned = tokens.to_vec();
            owned.push(Token::new(TokenKind::Eof, "", line, Span::new(end, end)));
            Cow::Owned(owned)
        }
    }
}
