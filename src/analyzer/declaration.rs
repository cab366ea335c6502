// src/analyzer/declaration.rs
//
// 类、方法、字段与局部变量的声明检查。

use super::symbols::{Symbol, SymbolKind};
use super::types::{BaseType, SemanticType, TypeError};
use super::{AnalysisContext, Analyzer, Check, Expect, MethodContext};
use crate::parser::ast;
use crate::reporter::SemanticErrorKind;

impl Analyzer {
    /// 解析一个声明类型并报告其中的问题。
    ///
    /// `void` 只允许出现在方法的返回类型上。返回 `None` 表示类型未知，
    /// 之后涉及它的检查都会被跳过。
    pub(super) fn declared_type(&mut self, type_name: &str, line: usize, allow_void: bool) -> Option<SemanticType> {
        let ty = match SemanticType::parse(type_name) {
            Ok(ty) => ty,
            Err(TypeError::InvalidSize(ty)) => {
                self.report(
                    SemanticErrorKind::InvalidArraySize {
                        name: type_name.to_string(),
                    },
                    line,
                );
                ty
            }
            Err(TypeError::UnknownBase) => {
                self.report(
                    SemanticErrorKind::InvalidType {
                        name: type_name.to_string(),
                    },
                    line,
                );
                return None;
            }
        };

        if ty.base == BaseType::Void && !allow_void {
            self.report(
                SemanticErrorKind::InvalidType {
                    name: type_name.to_string(),
                },
                line,
            );
            return None;
        }
        Some(ty)
    }

    /// 声明一个符号，名字在当前作用域已经存在时报告重复声明。
    pub(super) fn declare(&mut self, symbol: Symbol) -> bool {
        let (name, line) = (symbol.name.clone(), symbol.line);
        let declared = self.symbols.declare(symbol);
        if !declared {
            self.report(SemanticErrorKind::Redeclaration { name }, line);
        }
        declared
    }

    /// 在类的作用域里登记一个方法，使同一个类里的其他成员可以先于定义调用它。
    fn register_method(&mut self, method: &ast::Node<ast::Method>) {
        let return_type = self.declared_type(&method.kind.return_type, method.line, true);
        let parameters = method
            .kind
            .parameters
            .iter()
            .map(|parameter| parameter.kind.type_name.clone())
            .collect();
        let symbol = Symbol::new(&method.kind.name, SymbolKind::Method, return_type, method.line)
            .with_access(method.kind.access)
            .with_parameters(parameters);
        self.declare(symbol);
    }
}

impl Check for ast::Class {
    type Output = ();

    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) {
        let symbol = Symbol::new(&self.name, SymbolKind::Class, None, line).with_access(self.access);
        if !analyzer.declare(symbol) {
            return;
        }

        let path = format!("{}.{}", ctx.namespace, self.name);
        analyzer.with_scope(path, |analyzer| {
            // 1. 先登记所有方法
            for method in &self.methods {
                analyzer.register_method(method);
            }
            // 2. 字段按声明顺序检查
            for field in &self.fields {
                analyzer.visit(field, ctx);
            }
            // 3. 方法体
            for method in &self.methods {
                analyzer.visit(method, ctx);
            }
        });
    }
}

impl Check for ast::Method {
    type Output = ();

    fn check<'p>(&'p self, _line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) {
        // 返回类型的问题已经在登记时报告过了
        let method = MethodContext {
            name: &self.name,
            return_type: SemanticType::parse_lenient(&self.return_type),
        };
        let ctx = ctx.in_method(method);

        let path = analyzer.child_scope(&self.name);
        analyzer.with_scope(path, |analyzer| {
            for parameter in &self.parameters {
                let ty = analyzer.declared_type(&parameter.kind.type_name, parameter.line, false);
                analyzer.declare(Symbol::new(&parameter.kind.name, SymbolKind::Parameter, ty, parameter.line));
            }
            analyzer.visit(&self.body, ctx);
        });
    }
}

impl Check for ast::VariableDeclaration {
    type Output = ();

    /// 字段和局部变量共用：先检查初始化器，再声明名字，
    /// 所以 `int x = x;` 里右侧的 `x` 看不到正在声明的这个变量。
    fn check<'p>(&'p self, line: usize, analyzer: &mut Analyzer, ctx: AnalysisContext<'p>) {
        let ty = analyzer.declared_type(&self.type_name, line, false);

        if let Some(initializer) = &self.initializer {
            let found = analyzer.visit(initializer, ctx.expecting(Expect::Any));
            analyzer.check_conversion(found, ty, line);
        }

        let (kind, initialized) = if self.is_field {
            (SymbolKind::Field, true)
        } else {
            (SymbolKind::Variable, self.initializer.is_some())
        };
        let symbol = Symbol::new(&self.name, kind, ty, line).with_initialized(initialized);
        analyzer.declare(symbol);
    }
}
