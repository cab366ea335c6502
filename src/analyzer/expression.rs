// src/analyzer/expression.rs

use super::symbols::SymbolKind;
use super::types::{self, BaseType, SemanticType};
use super::{AnalysisContext, Analyzer, Check, Expect};
use crate::parser::ast;
use crate::reporter::SemanticErrorKind;

/// 表达式检查返回它的类型；`None` 表示类型未知（已经报告过错误，或者是占位节点），
/// 上层遇到 `None` 时跳过相关检查，避免连锁报错。
impl Check for ast::Expression {
    type Output = Option<SemanticType>;

    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) -> Option<SemanticType> {
        match self {
            ast::Expression::Binary(binary) => binary.check(line, analyzer, ctx),
            ast::Expression::Unary(unary) => unary.check(line, analyzer, ctx),
            ast::Expression::Literal(literal) => literal.check(line, analyzer, ctx),
            ast::Expression::Identifier(identifier) => identifier.check(line, analyzer, ctx),
            ast::Expression::Call(call) => call.check(line, analyzer, ctx),
        }
    }
}

impl Check for ast::Literal {
    type Output = Option<SemanticType>;

    fn check<'p>(&'p self, _line: usize, _analyzer: &mut Analyzer, _ctx: AnalysisContext<'p>) -> Option<SemanticType> {
        if self.synthesized {
            return None;
        }
        let base = match self.ty {
            ast::LiteralType::Int => BaseType::Int,
            ast::LiteralType::Float => BaseType::Float,
            ast::LiteralType::String => BaseType::String,
            ast::LiteralType::Bool => BaseType::Bool,
        };
        Some(SemanticType::scalar(base))
    }
}

impl Check for ast::BinaryExpression {
    type Output = Option<SemanticType>;

    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) -> Option<SemanticType> {
        let operand_ctx = ctx.expecting(Expect::Scalar);
        let left = analyzer.visit(&*self.left, operand_ctx);
        let right = analyzer.visit(&*self.right, operand_ctx);
        let (left, right) = (left?, right?);

        let result = types::binary_result(self.operator, left, right);
        if result.is_none() {
            analyzer.report(
                SemanticErrorKind::InvalidBinaryOperation {
                    operator: self.operator.to_string(),
                    left: left.to_string(),
                    right: right.to_string(),
                },
                line,
            );
        }
        result
    }
}

impl Check for ast::UnaryExpression {
    type Output = Option<SemanticType>;

    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) -> Option<SemanticType> {
        let operand = analyzer.visit(&*self.operand, ctx.expecting(Expect::Scalar))?;

        let result = types::unary_result(self.operator, operand);
        if result.is_none() {
            analyzer.report(
                SemanticErrorKind::InvalidUnaryOperation {
                    operator: self.operator.to_string(),
                    operand: operand.to_string(),
                },
                line,
            );
        }
        result
    }
}

impl Check for ast::IdentifierExpression {
    type Output = Option<SemanticType>;

    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) -> Option<SemanticType> {
        let symbol = analyzer
            .symbols
            .lookup(&self.name)
            .map(|symbol| (symbol.kind, symbol.ty, symbol.initialized));

        let Some((kind, ty, initialized)) = symbol else {
            analyzer.report(SemanticErrorKind::UndeclaredIdentifier { name: self.name.clone() }, line);
            if let Some(index) = &self.index {
                analyzer.visit(&**index, ctx.expecting(Expect::Scalar));
            }
            return None;
        };

        if !kind.is_value() {
            analyzer.report(
                SemanticErrorKind::NotAValue {
                    name: self.name.clone(),
                    what: kind.describe().to_string(),
                },
                line,
            );
            return None;
        }
        // 参数、字段和 foreach 变量总是已初始化的
        if !initialized {
            analyzer.report(SemanticErrorKind::UninitializedVariable { name: self.name.clone() }, line);
        }

        if let Some(index) = &self.index {
            return analyzer.check_index(&self.name, ty, index, line, ctx);
        }

        let ty = ty?;
        if ty.is_array() && ctx.expect == Expect::Scalar {
            analyzer.report(SemanticErrorKind::ArrayWithoutIndex { name: self.name.clone() }, line);
            return None;
        }
        Some(ty)
    }
}

impl Check for ast::MethodCall {
    type Output = Option<SemanticType>;

    /// 只检查参数个数，不检查参数类型。`Console.WriteLine` 是内置的输出原语，总是有效。
    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) -> Option<SemanticType> {
        if self.receiver.as_deref() == Some("Console") && self.method == "WriteLine" {
            analyzer.check_arguments(&self.arguments, ctx.expecting(Expect::Scalar));
            return Some(SemanticType::VOID);
        }

        let undeclared_receiver = self
            .receiver
            .as_ref()
            .filter(|receiver| analyzer.symbols.lookup(receiver).is_none());
        if let Some(receiver) = undeclared_receiver {
            analyzer.report(SemanticErrorKind::UndeclaredObject { name: receiver.clone() }, line);
            analyzer.check_arguments(&self.arguments, ctx.expecting(Expect::Any));
            return None;
        }

        let method = analyzer
            .symbols
            .lookup(&self.method)
            .filter(|symbol| symbol.kind == SymbolKind::Method)
            .map(|symbol| (symbol.ty, symbol.parameters.len()));

        let Some((return_type, expected)) = method else {
            analyzer.report(SemanticErrorKind::UndeclaredMethod { name: self.method.clone() }, line);
            analyzer.check_arguments(&self.arguments, ctx.expecting(Expect::Any));
            return None;
        };

        if self.arguments.len() != expected {
            analyzer.report(
                SemanticErrorKind::ArgumentCountMismatch {
                    name: self.method.clone(),
                    expected,
                    found: self.arguments.len(),
                },
                line,
            );
        }
        // 参数可能是数组，所以实参允许直接传数组名
        analyzer.check_arguments(&self.arguments, ctx.expecting(Expect::Any));
        return_type
    }
}

impl Analyzer {
    fn check_arguments<'p>(&mut self, arguments: &'p [ast::Node<ast::Expression>], ctx: AnalysisContext<'p>) {
        for argument in arguments {
            self.visit(argument, ctx);
        }
    }
}
