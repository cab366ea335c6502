// src/analyzer/statement.rs

use super::symbols::{Symbol, SymbolKind};
use super::types::SemanticType;
use super::{AnalysisContext, Analyzer, Check, Expect};
use crate::parser::ast::{self, Node};
use crate::reporter::SemanticErrorKind;

/// 为 ast::Statement 实现 Check trait，按语句种类分发。
impl Check for ast::Statement {
    type Output = ();

    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) {
        let ctx = ctx.expecting(Expect::Scalar);
        match self {
            ast::Statement::VariableDeclaration(decl) => decl.check(line, analyzer, ctx),
            ast::Statement::Block(block) => block.check(line, analyzer, ctx),
            ast::Statement::If(statement) => statement.check(line, analyzer, ctx),
            ast::Statement::While(statement) => statement.check(line, analyzer, ctx),
            ast::Statement::DoWhile(statement) => statement.check(line, analyzer, ctx),
            ast::Statement::For(statement) => statement.check(line, analyzer, ctx),
            ast::Statement::Foreach(statement) => statement.check(line, analyzer, ctx),
            ast::Statement::Switch(statement) => statement.check(line, analyzer, ctx),
            ast::Statement::Return(value) => analyzer.check_return(value.as_ref(), line, ctx),
            ast::Statement::Break => {
                if !ctx.in_loop {
                    analyzer.report(SemanticErrorKind::BreakOutsideLoop, line);
                }
            }
            ast::Statement::Assignment(assignment) => assignment.check(line, analyzer, ctx),
            ast::Statement::Expression(expression) => {
                expression.check(line, analyzer, ctx);
            }
        }
    }
}

// === 辅助函数 ===

impl Analyzer {
    /// `if`、`while`、`for`、`do-while` 的条件必须是 `bool`。错误记在语句所在的行。
    fn check_condition<'p>(
        &mut self,
        condition: &'p Node<ast::Expression>,
        construct: &str,
        line: usize,
        ctx: AnalysisContext<'p>,
    ) {
        let Some(found) = self.visit(condition, ctx.expecting(Expect::Scalar)) else {
            return;
        };
        if !found.is_bool() {
            self.report(
                SemanticErrorKind::InvalidCondition {
                    construct: construct.to_string(),
                    found: found.to_string(),
                },
                line,
            );
        }
    }

    fn check_statements<'p>(&mut self, statements: &'p [Node<ast::Statement>], ctx: AnalysisContext<'p>) {
        for statement in statements {
            self.visit(statement, ctx);
        }
    }

    fn check_return<'p>(&mut self, value: Option<&'p Node<ast::Expression>>, line: usize, ctx: AnalysisContext<'p>) {
        let Some(method) = ctx.method else {
            self.report(SemanticErrorKind::ReturnOutsideMethod, line);
            if let Some(value) = value {
                self.visit(value, ctx.expecting(Expect::Any));
            }
            return;
        };

        match (value, method.return_type) {
            (None, Some(expected)) if !expected.is_void() => {
                self.report(
                    SemanticErrorKind::MissingReturnValue {
                        method: method.name.to_string(),
                        expected: expected.to_string(),
                    },
                    line,
                );
            }
            (None, _) => {}
            (Some(value), Some(expected)) if expected.is_void() => {
                self.report(
                    SemanticErrorKind::VoidMethodReturnsValue {
                        method: method.name.to_string(),
                    },
                    line,
                );
                self.visit(value, ctx.expecting(Expect::Any));
            }
            (Some(value), expected) => {
                let found = self.visit(value, ctx.expecting(Expect::Any));
                self.check_conversion(found, expected, line);
            }
        }
    }

    /// `from` 必须能隐式转换为 `to`。任意一侧未知时不检查。
    pub(super) fn check_conversion(&mut self, from: Option<SemanticType>, to: Option<SemanticType>, line: usize) {
        let (Some(from), Some(to)) = (from, to) else {
            return;
        };
        if !from.converts_to(to) {
            self.report(
                SemanticErrorKind::IncompatibleConversion {
                    from: from.to_string(),
                    to: to.to_string(),
                },
                line,
            );
        }
    }
}

impl Check for ast::Block {
    type Output = ();

    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) {
        let path = analyzer.child_scope(format_args!("block{line}"));
        analyzer.with_scope(path, |analyzer| analyzer.check_statements(&self.statements, ctx));
    }
}

impl Check for ast::IfStatement {
    type Output = ();

    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) {
        analyzer.check_condition(&self.condition, "if", line, ctx);
        analyzer.visit(&*self.then_branch, ctx);
        if let Some(else_branch) = &self.else_branch {
            analyzer.visit(&**else_branch, ctx);
        }
    }
}

impl Check for ast::WhileStatement {
    type Output = ();

    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) {
        analyzer.check_condition(&self.condition, "while", line, ctx);
        analyzer.visit(&*self.body, ctx.in_loop());
    }
}

impl Check for ast::DoWhileStatement {
    type Output = ();

    /// 循环体直接在 `do` 自己的作用域里检查；条件看不到循环体里的声明。
    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) {
        let path = analyzer.child_scope(format_args!("do{line}"));
        analyzer.with_scope(path, |analyzer| {
            analyzer.check_statements(&self.body.kind.statements, ctx.in_loop());
        });
        analyzer.check_condition(&self.condition, "do-while", line, ctx);
    }
}

impl Check for ast::ForStatement {
    type Output = ();

    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) {
        let path = analyzer.child_scope(format_args!("for{line}"));
        analyzer.with_scope(path, |analyzer| {
            if let Some(init) = &self.init {
                analyzer.visit(&**init, ctx);
            }
            analyzer.check_condition(&self.condition, "for", line, ctx);
            if let Some(increment) = &self.increment {
                analyzer.visit(&**increment, ctx);
            }
            analyzer.visit(&*self.body, ctx.in_loop());
        });
    }
}

impl Check for ast::ForeachStatement {
    type Output = ();

    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) {
        let element = analyzer.declared_type(&self.element_type, line, false);

        // 集合在外层作用域里求值
        let collection = analyzer.visit(&self.collection, ctx.expecting(Expect::Any));
        match collection {
            Some(collection) if !collection.is_array() => {
                analyzer.report(
                    SemanticErrorKind::ForeachRequiresArray {
                        found: collection.to_string(),
                    },
                    line,
                );
            }
            Some(collection) => analyzer.check_conversion(Some(collection.element()), element, line),
            None => {}
        }

        let path = analyzer.child_scope(format_args!("foreach{line}"));
        analyzer.with_scope(path, |analyzer| {
            // 循环变量总是已初始化的
            let symbol = Symbol::new(&self.element_name, SymbolKind::Variable, element, line).with_initialized(true);
            analyzer.declare(symbol);
            analyzer.visit(&*self.body, ctx.in_loop());
        });
    }
}

impl Check for ast::SwitchStatement {
    type Output = ();

    /// switch 不建立新的作用域，也不改变循环上下文。
    fn check<'p>(&'p self, _line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) {
        let subject = analyzer.visit(&self.subject, ctx);

        for case in &self.cases {
            let label = analyzer.visit(&case.kind.value, ctx);
            // 标签类型不必支配 subject 的类型，两个方向任意一个能转换即可
            match (subject, label) {
                (Some(subject), Some(label)) if !label.converts_to(subject) && !subject.converts_to(label) => {
                    analyzer.report(
                        SemanticErrorKind::CaseTypeMismatch {
                            label: label.to_string(),
                            subject: subject.to_string(),
                        },
                        case.line,
                    );
                }
                _ => {}
            }
            analyzer.check_statements(&case.kind.statements, ctx);
        }

        analyzer.check_statements(&self.default, ctx);
    }
}

impl Check for ast::Assignment {
    type Output = ();

    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) {
        let target = analyzer
            .symbols
            .lookup(&self.target)
            .map(|symbol| (symbol.kind, symbol.ty));

        let target_type = match target {
            None => {
                analyzer.report(
                    SemanticErrorKind::UndeclaredIdentifier {
                        name: self.target.clone(),
                    },
                    line,
                );
                None
            }
            Some((kind, _)) if !kind.is_value() => {
                analyzer.report(
                    SemanticErrorKind::NotAValue {
                        name: self.target.clone(),
                        what: kind.describe().to_string(),
                    },
                    line,
                );
                None
            }
            Some((_, ty)) => match &self.index {
                Some(index) => analyzer.check_index(&self.target, ty, index, line, ctx),
                None => ty,
            },
        };

        let found = analyzer.visit(&self.value, ctx.expecting(Expect::Any));
        analyzer.check_conversion(found, target_type, line);

        // 右侧检查完之后才算初始化，所以 `x = x + 1;` 仍然会报告未初始化
        let target = analyzer.symbols.lookup_mut(&self.target);
        if let Some(symbol) = target.filter(|symbol| symbol.kind.is_value()) {
            symbol.initialized = true;
        }
    }
}

impl Analyzer {
    /// `name[index]` 的检查：`name` 必须是数组，下标必须是 `int`。返回元素类型。
    pub(super) fn check_index<'p>(
        &mut self,
        name: &str,
        ty: Option<SemanticType>,
        index: &'p Node<ast::Expression>,
        line: usize,
        ctx: AnalysisContext<'p>,
    ) -> Option<SemanticType> {
        let index_type = self.visit(index, ctx.expecting(Expect::Scalar));
        let ty = ty?;

        if !ty.is_array() {
            self.report(SemanticErrorKind::NotAnArray { name: name.to_string() }, line);
            return None;
        }
        if let Some(found) = index_type.filter(|ty| *ty != SemanticType::INT) {
            self.report(
                SemanticErrorKind::NonIntegerIndex {
                    name: name.to_string(),
                    found: found.to_string(),
                },
                line,
            );
        }
        Some(ty.element())
    }
}
