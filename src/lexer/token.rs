use crate::utils::Span;
use logos::Logos;
use std::fmt::{Display, Formatter, Result};

/// 主体 Token 定义：种类、源代码原文、起始行号以及字节范围。
///
/// 字符串字面量的 `lexeme` 是引号之间的内容，字符字面量的 `lexeme` 是那个字符本身。
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            span,
        }
    }

    /// 一个用于错误报告的简单字符串表示。
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Identifier => format!("identifier '{}'", self.lexeme),
            TokenKind::StringLiteral => format!("string \"{}\"", self.lexeme),
            TokenKind::CharLiteral => format!("character '{}'", self.lexeme),
            TokenKind::Unknown => format!("unknown character '{}'", self.lexeme),
            _ => format!("'{}'", self.lexeme),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "[line {}] {} '{}'", self.line, self.kind, self.lexeme)
    }
}

/// 语言中所有可能的词法单元种类。
///
/// `Eof` 和 `Unknown` 不由正则产生，而是由 `tokenize` 补充。
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
// 跳过空白
#[logos(skip r"[ \t\r\n\f]+")]
// 跳过单行注释
#[logos(skip r"//[^\n]*")]
// 跳过块注释
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum TokenKind {
    // 关键字
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("do")]
    Do,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("foreach")]
    Foreach,
    #[token("in")]
    In,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("namespace")]
    Namespace,
    #[token("using")]
    Using,
    #[token("class")]
    Class,

    // 内置类型
    #[token("int")]
    Int,
    #[token("float")]
    Float,
    #[token("string")]
    String,
    #[token("bool")]
    Bool,
    #[token("void")]
    Void,

    // 访问修饰符
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,
    #[token("internal")]
    Internal,

    // 布尔字面量
    #[token("true")]
    True,
    #[token("false")]
    False,

    // 浮点数字面量，logos 取最长匹配，因此 `1.5` 不会被拆成整数和 `.`
    #[regex("[0-9]+\\.[0-9]+")]
    FloatLiteral,

    // 整数字面量
    #[regex("[0-9]+")]
    Number,

    // 字符串字面量：不处理转义，允许跨行，未闭合时一直延伸到输入末尾
    #[regex(r#""[^"]*"?"#)]
    StringLiteral,

    // 字符字面量，例如 'a'
    #[regex(r"'[^'\n]'")]
    CharLiteral,

    // 标识符：任意 Unicode 字母或下划线开头，之后是字母、十进制数字或下划线
    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Identifier,

    // 运算符号
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Assign,
    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Lte,
    #[token(">=")]
    Gte,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("!")]
    Not,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    // 分割符号
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("'")]
    Apostrophe,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    /// 输入结束。
    Eof,
    /// 无法识别的单个字符。
    Unknown,
}

impl TokenKind {
    /// 可以出现在声明开头的类型关键字（包括 `void`）。
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Float | TokenKind::String | TokenKind::Bool | TokenKind::Void
        )
    }

    pub fn is_access_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::Public | TokenKind::Private | TokenKind::Protected | TokenKind::Internal
        )
    }

    /// 错误恢复时可以安全重新开始解析的关键字。
    pub fn starts_declaration_or_statement(self) -> bool {
        self.is_type_keyword()
            || self.is_access_modifier()
            || matches!(
                self,
                TokenKind::If
                    | TokenKind::Do
                    | TokenKind::While
                    | TokenKind::For
                    | TokenKind::Foreach
                    | TokenKind::Return
                    | TokenKind::Break
                    | TokenKind::Switch
                    | TokenKind::Case
                    | TokenKind::Default
                    | TokenKind::Class
                    | TokenKind::Namespace
                    | TokenKind::Using
            )
    }

    /// 在 "expected X" 形式的错误信息中使用的文本。
    pub fn expected_text(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Colon => "':'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Assign => "'='",
            TokenKind::While => "'while'",
            TokenKind::In => "'in'",
            TokenKind::Class => "'class'",
            TokenKind::Namespace => "'namespace'",
            TokenKind::Number => "number",
            TokenKind::Eof => "end of input",
            _ => "token",
        }
    }
}

// 代号列表里使用的名字，例如 `[line 1] Number '1'`
impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{:?}", self)
    }
}
