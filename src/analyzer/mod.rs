// src/analyzer/mod.rs
//
// 语义分析：单遍前序遍历 AST，维护作用域栈，解析标识符并检查类型。

// 1. 声明所有模块
pub mod symbols;
pub mod types;
mod declaration;
mod expression;
mod statement;
#[cfg(test)]
mod test;

// 2. 导入依赖
use crate::parser::ast::{self, Node};
use crate::reporter::{SemanticError, SemanticErrorKind};
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use symbols::SymbolTable;

pub use symbols::{Symbol, SymbolKind};
pub use types::{BaseType, Dimension, SemanticType};

// --- 核心抽象：上下文与 Trait ---

/// 表达式所处的位置是否允许整个数组作为值出现。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expect {
    /// 普通的运算位置，数组名必须带下标。
    Scalar,
    /// 初始化器、赋值右侧、返回值、foreach 集合、用户方法的实参。
    Any,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MethodContext<'p> {
    pub name: &'p str,
    /// 返回类型非法时为 `None`。
    pub return_type: Option<SemanticType>,
}

/// 沿着遍历向下传递的只读上下文。可变的状态（作用域栈、错误列表）留在 `Analyzer` 里。
#[derive(Debug, Clone, Copy)]
pub(crate) struct AnalysisContext<'p> {
    pub namespace: &'p str,
    pub method: Option<MethodContext<'p>>,
    pub in_loop: bool,
    pub expect: Expect,
}

impl<'p> AnalysisContext<'p> {
    fn new(namespace: &'p str) -> Self {
        AnalysisContext {
            namespace,
            method: None,
            in_loop: false,
            expect: Expect::Scalar,
        }
    }

    fn in_method(self, method: MethodContext<'p>) -> Self {
        AnalysisContext {
            method: Some(method),
            in_loop: false,
            ..self
        }
    }

    fn in_loop(self) -> Self {
        AnalysisContext { in_loop: true, ..self }
    }

    fn expecting(self, expect: Expect) -> Self {
        AnalysisContext { expect, ..self }
    }
}

/// 每种 AST 节点都实现这个 trait；`line` 是包着它的 `Node` 的行号。
pub(crate) trait Check {
    type Output;
    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) -> Self::Output;
}

// --- Analyzer 结构体与实现 ---

pub struct Analyzer {
    symbols: SymbolTable,
    errors: Vec<SemanticError>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            errors: Vec::new(),
        }
    }

    /// 分析整个程序。没有命名空间（语法错误导致）时什么也不做。
    pub fn analyze_program(&mut self, program: &ast::Program) {
        let Some(namespace) = &program.namespace else {
            return;
        };
        let ctx = AnalysisContext::new(&namespace.kind.name);
        for class in &namespace.kind.classes {
            self.visit(class, ctx);
        }
    }

    /// 结束分析，取出按发现顺序排列的语义错误。
    pub fn finish(self) -> Vec<SemanticError> {
        self.errors
    }

    fn visit<'p, T: Check>(&mut self, node: &'p Node<T>, ctx: AnalysisContext<'p>) -> T::Output {
        node.kind.check(node.line, self, ctx)
    }

    /// 在当前作用域记录一个错误。
    fn report(&mut self, kind: SemanticErrorKind, line: usize) {
        let scope = self.symbols.current_path().to_string();
        self.errors.push(SemanticError { kind, line, scope });
    }

    /// 当前作用域路径后面接上一段，例如 `App.Program.Main` + `block7`。
    fn child_scope(&self, segment: impl Display) -> String {
        format!("{}.{}", self.symbols.current_path(), segment)
    }

    /// 进入一个作用域执行 `f`，结束后无条件退出。
    fn with_scope<R>(&mut self, path: String, f: impl FnOnce(&mut Self) -> R) -> R {
        self.symbols.enter_scope(path);
        let result = f(self);
        self.symbols.exit_scope();
        result
    }
}

/// 语义分析的公共入口。
///
/// 分析器内部的意外故障不会传播给调用者：它被转换成一条 `Internal` 错误，
/// 追加在已经发现的错误之后。
pub fn analyze(program: &ast::Program) -> Vec<SemanticError> {
    let mut analyzer = Analyzer::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| analyzer.analyze_program(program)));

    let scope = analyzer.symbols.current_path().to_string();
    let mut errors = analyzer.finish();
    if let Err(payload) = outcome {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown failure".to_string());
        errors.push(SemanticError {
            kind: SemanticErrorKind::Internal { detail },
            line: program.line,
            scope,
        });
    }
    errors
}
