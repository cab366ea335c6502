pub mod analyzer;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod reporter;
pub mod utils;

use lexer::Token;
use parser::ast::Program;
use reporter::CompilerError;

/// 前端流水线在哪个阶段之后停止。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Stage {
    Lex,
    Parse,
    #[default]
    Analyze,
}

/// 流水线配置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub stop_after: Stage,
    /// 存在词法/语法错误时是否仍然分析尽力而为的语法树，
    /// 打开时一次运行就能发现所有阶段的错误。
    pub analyze_with_syntax_errors: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            stop_after: Stage::Analyze,
            analyze_with_syntax_errors: true,
        }
    }
}

/// 一次完整运行的全部产物。
#[derive(Debug, Clone)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    /// 在 `Stage::Lex` 停止时是一个空的 `Program`。
    pub program: Program,
    /// 按阶段排列：词法错误、语法错误、语义错误。
    pub errors: Vec<CompilerError>,
}

/// 运行前端流水线，保留所有中间产物。
pub fn compile(source: &str, options: &Options) -> Compilation {
    let mut errors: Vec<CompilerError> = Vec::new();

    // 1. 词法分析：总是产出完整的 token 序列，无法识别的字符变成 Unknown token
    let tokens = lexer::tokenize(source);
    errors.extend(lexer::lexical_errors(&tokens).into_iter().map(CompilerError::from));
    if options.stop_after == Stage::Lex {
        return Compilation {
            tokens,
            program: Program::default(),
            errors,
        };
    }

    // 2. 语法分析：即使有词法错误也继续，解析器会把 Unknown token 当作普通的意外 token
    let (program, syntax_errors) = parser::parse(&tokens);
    errors.extend(syntax_errors.into_iter().map(CompilerError::from));

    // 3. 语义分析
    let analyze = options.stop_after == Stage::Analyze && (options.analyze_with_syntax_errors || errors.is_empty());
    if analyze {
        errors.extend(analyzer::analyze(&program).into_iter().map(CompilerError::from));
    }

    Compilation { tokens, program, errors }
}

/// 检查一段源代码。
///
/// # Returns
/// * `Ok(Program)` 没有发现任何错误。
/// * `Err(Vec<CompilerError>)` 包含所有遇到的错误。
pub fn check(source: &str, options: &Options) -> Result<Program, Vec<CompilerError>> {
    let Compilation { program, errors, .. } = compile(source, options);
    if errors.is_empty() { Ok(program) } else { Err(errors) }
}
