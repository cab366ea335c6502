//! 这个模块是整个前端错误处理系统的核心。
//! 它使用 `thiserror` 来定义每个阶段的结构化错误记录。
//!
//! 所有错误的 `Display` 形式统一为 `"<line>: <message>"`。

use crate::diagnostics::codes::{self, ErrorCode};
use thiserror::Error;

/// 顶层的编译器错误枚举。
/// 所有阶段（词法、语法、语义）的错误都会被包含在这里。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilerError {
    /// 词法分析阶段的错误
    #[error(transparent)]
    Lexical(#[from] LexicalError),

    /// 语法分析阶段的错误
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// 语义分析阶段的错误
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl CompilerError {
    /// 错误所在的源代码行（从 1 开始）。
    pub fn line(&self) -> usize {
        match self {
            CompilerError::Lexical(e) => e.line,
            CompilerError::Syntax(e) => e.line,
            CompilerError::Semantic(e) => e.line,
        }
    }

    /// 与该错误对应的稳定错误码。
    pub fn code(&self) -> &'static ErrorCode {
        match self {
            CompilerError::Lexical(_) => &codes::E0000_UNRECOGNIZED_CHAR,
            CompilerError::Syntax(e) => e.kind.code(),
            CompilerError::Semantic(e) => e.kind.code(),
        }
    }

    /// 不带行号前缀的错误描述。
    pub fn message(&self) -> String {
        match self {
            CompilerError::Lexical(e) => e.message(),
            CompilerError::Syntax(e) => e.kind.to_string(),
            CompilerError::Semantic(e) => e.kind.to_string(),
        }
    }
}

// --- 1. 词法错误 ---

/// 无法识别的字符。词法分析器仍然会为它产出一个 `Unknown` token。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}: unrecognized character '{lexeme}'")]
pub struct LexicalError {
    pub lexeme: String,
    pub line: usize,
}

impl LexicalError {
    pub fn message(&self) -> String {
        format!("unrecognized character '{}'", self.lexeme)
    }
}

// --- 2. 语法错误 ---

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}: {kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub line: usize,
}

/// 语法分析器可能产生的所有错误的集合。
/// `found` 字段总是当前 token 的可读描述，例如 `'}'` 或 `end of input`。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("expected {expected} {context}, found {found}")]
    Expected {
        expected: String,
        context: String,
        found: String,
    },

    #[error("invalid statement starting with {found}")]
    InvalidStatement { found: String },

    #[error("expected expression, found {found}")]
    ExpectedExpression { found: String },

    #[error("expected a type, found {found}")]
    ExpectedType { found: String },

    #[error("only fields and methods may appear in a class body, found {found}")]
    MisplacedStatement { found: String },

    #[error("expected a class declaration, found {found}")]
    ExpectedClass { found: String },

    #[error("invalid parameter declaration at {found}")]
    InvalidParameter { found: String },

    #[error("case label must be a number, string or character literal, found {found}")]
    InvalidCaseLabel { found: String },

    #[error("invalid for-loop increment starting with {found}")]
    InvalidIncrement { found: String },

    #[error("expected assignment, call, '++' or '--' after '{name}', found {found}")]
    InvalidIdentifierStatement { name: String, found: String },

    #[error("expected 'namespace' after using directives, found {found}")]
    MissingNamespace { found: String },

    #[error("unexpected {found} after the namespace declaration")]
    TrailingInput { found: String },

    #[error("nesting is too deep at {found}")]
    NestingTooDeep { found: String },
}

impl SyntaxErrorKind {
    pub fn code(&self) -> &'static ErrorCode {
        match self {
            SyntaxErrorKind::Expected { .. } => &codes::E0100_UNEXPECTED_TOKEN,
            SyntaxErrorKind::InvalidStatement { .. } => &codes::E0101_INVALID_STATEMENT,
            SyntaxErrorKind::ExpectedExpression { .. } => &codes::E0102_EXPECTED_EXPRESSION,
            SyntaxErrorKind::ExpectedType { .. } => &codes::E0103_EXPECTED_TYPE,
            SyntaxErrorKind::MisplacedStatement { .. } => &codes::E0104_MISPLACED_STATEMENT,
            SyntaxErrorKind::ExpectedClass { .. } => &codes::E0105_EXPECTED_CLASS,
            SyntaxErrorKind::InvalidParameter { .. } => &codes::E0106_INVALID_PARAMETER,
            SyntaxErrorKind::InvalidCaseLabel { .. } => &codes::E0107_INVALID_CASE_LABEL,
            SyntaxErrorKind::InvalidIncrement { .. } => &codes::E0108_INVALID_INCREMENT,
            SyntaxErrorKind::InvalidIdentifierStatement { .. } => {
                &codes::E0109_INVALID_IDENTIFIER_STATEMENT
            }
            SyntaxErrorKind::MissingNamespace { .. } => &codes::E0110_MISSING_NAMESPACE,
            SyntaxErrorKind::TrailingInput { .. } => &codes::E0111_TRAILING_INPUT,
            SyntaxErrorKind::NestingTooDeep { .. } => &codes::E0112_NESTING_TOO_DEEP,
        }
    }
}

// --- 3. 语义错误 ---

/// 语义错误额外记录了发现错误时所在的作用域路径，例如 `App.Program.Main.block7`。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}: {kind}")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub line: usize,
    pub scope: String,
}

/// 语义分析器可能产生的所有错误的集合。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticErrorKind {
    #[error("'{name}' is already declared in this scope")]
    Redeclaration { name: String },

    #[error("invalid type '{name}'")]
    InvalidType { name: String },

    #[error("invalid array size in type '{name}'")]
    InvalidArraySize { name: String },

    #[error("cannot convert '{from}' to '{to}'")]
    IncompatibleConversion { from: String, to: String },

    #[error("identifier '{name}' is not declared")]
    UndeclaredIdentifier { name: String },

    #[error("variable '{name}' is used before being initialized")]
    UninitializedVariable { name: String },

    #[error("'{name}' is not an array and cannot be indexed")]
    NotAnArray { name: String },

    #[error("array '{name}' must be indexed here")]
    ArrayWithoutIndex { name: String },

    #[error("index of '{name}' must be 'int', found '{found}'")]
    NonIntegerIndex { name: String, found: String },

    #[error("'{name}' is a {what} and cannot be used as a value")]
    NotAValue { name: String, what: String },

    #[error("'return' outside of a method")]
    ReturnOutsideMethod,

    #[error("void method '{method}' cannot return a value")]
    VoidMethodReturnsValue { method: String },

    #[error("method '{method}' must return a value of type '{expected}'")]
    MissingReturnValue { method: String, expected: String },

    #[error("'break' outside of a loop")]
    BreakOutsideLoop,

    #[error("method '{name}' is not declared")]
    UndeclaredMethod { name: String },

    #[error("object '{name}' is not declared")]
    UndeclaredObject { name: String },

    #[error("method '{name}' expects {expected} arguments, but {found} were given")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("condition of '{construct}' must be 'bool', found '{found}'")]
    InvalidCondition { construct: String, found: String },

    #[error("operator '{operator}' cannot be applied to '{left}' and '{right}'")]
    InvalidBinaryOperation {
        operator: String,
        left: String,
        right: String,
    },

    #[error("operator '{operator}' cannot be applied to '{operand}'")]
    InvalidUnaryOperation { operator: String, operand: String },

    #[error("case label of type '{label}' does not match switch subject of type '{subject}'")]
    CaseTypeMismatch { label: String, subject: String },

    #[error("foreach requires an array collection, found '{found}'")]
    ForeachRequiresArray { found: String },

    #[error("internal analyzer error: {detail}")]
    Internal { detail: String },
}

impl SemanticErrorKind {
    pub fn code(&self) -> &'static ErrorCode {
        use SemanticErrorKind::*;
        match self {
            Redeclaration { .. } => &codes::E0200_REDECLARATION,
            InvalidType { .. } => &codes::E0201_INVALID_TYPE,
            InvalidArraySize { .. } => &codes::E0202_INVALID_ARRAY_SIZE,
            IncompatibleConversion { .. } => &codes::E0203_INCOMPATIBLE_CONVERSION,
            UndeclaredIdentifier { .. } => &codes::E0204_UNDECLARED_IDENTIFIER,
            UninitializedVariable { .. } => &codes::E0205_UNINITIALIZED_VARIABLE,
            NotAnArray { .. } | ArrayWithoutIndex { .. } | NonIntegerIndex { .. } => {
                &codes::E0206_INVALID_ARRAY_USE
            }
            NotAValue { .. } => &codes::E0207_NOT_A_VALUE,
            ReturnOutsideMethod | VoidMethodReturnsValue { .. } | MissingReturnValue { .. } => {
                &codes::E0208_INVALID_RETURN
            }
            BreakOutsideLoop => &codes::E0209_BREAK_OUTSIDE_LOOP,
            UndeclaredMethod { .. } | UndeclaredObject { .. } => &codes::E0210_UNDECLARED_METHOD,
            ArgumentCountMismatch { .. } => &codes::E0211_WRONG_ARGUMENT_COUNT,
            InvalidCondition { .. } => &codes::E0212_INVALID_CONDITION,
            InvalidBinaryOperation { .. } | InvalidUnaryOperation { .. } => {
                &codes::E0213_INVALID_OPERATION
            }
            CaseTypeMismatch { .. } => &codes::E0214_CASE_TYPE_MISMATCH,
            ForeachRequiresArray { .. } => &codes::E0215_FOREACH_REQUIRES_ARRAY,
            Internal { .. } => &codes::E0299_INTERNAL_ERROR,
        }
    }
}
