// 导入logos分词库
use logos::Logos;
// 导入错误处理模组
use crate::reporter::LexicalError;
// 导入定位处理
use crate::utils::Span;

mod token;

pub use token::{Token, TokenKind};

// 声明单元测试模块
#[cfg(test)]
mod test;

/// 对源代码进行词法分析。
///
/// 这个函数永远不会失败：
/// * 无法识别的字符会逐个变成 `Unknown` token；
/// * 结果的最后一个 token 总是 `Eof`；
/// * 每个 token 记录它起始的行号，字符串和注释内部的换行同样计入行号。
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut line = 1;
    // 上一个 token 结束的位置，用来统计两个 token 之间的换行
    let mut cursor = 0;

    // lexer.spanned() 会产生 (Result<TokenKind, ()>, Range<usize>)
    for (result, range) in TokenKind::lexer(source).spanned() {
        line += count_newlines(&source[cursor..range.start]);
        let slice = &source[range.clone()];

        match result {
            Ok(kind) => {
                let lexeme = match kind {
                    TokenKind::StringLiteral => strip_string_quotes(slice),
                    TokenKind::CharLiteral => &slice[1..slice.len() - 1],
                    _ => slice,
                };
                tokens.push(Token::new(kind, lexeme, line, range.clone().into()));
                line += count_newlines(slice);
            }
            // logos 遇到了一个错误，错误本身不包含字符信息，需要从 slice 中还原
            Err(()) => {
                for (offset, c) in slice.char_indices() {
                    let start = range.start + offset;
                    tokens.push(Token::new(
                        TokenKind::Unknown,
                        c.to_string(),
                        line,
                        Span::new(start, start + c.len_utf8()),
                    ));
                    if c == '\n' {
                        line += 1;
                    }
                }
            }
        }
        cursor = range.end;
    }

    line += count_newlines(&source[cursor..]);
    tokens.push(Token::new(
        TokenKind::Eof,
        "",
        line,
        Span::new(source.len(), source.len()),
    ));
    tokens
}

/// 为每个 `Unknown` token 生成一条词法错误。
pub fn lexical_errors(tokens: &[Token]) -> Vec<LexicalError> {
    tokens
        .iter()
        .filter(|token| token.kind == TokenKind::Unknown)
        .map(|token| LexicalError {
            lexeme: token.lexeme.clone(),
            line: token.line,
        })
        .collect()
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

/// 去掉字符串字面量的引号。未闭合的字符串没有结尾引号。
fn strip_string_quotes(slice: &str) -> &str {
    let inner = &slice[1..];
    inner.strip_suffix('"').unwrap_or(inner)
}
