//! 递归下降解析器的主体：解析器状态、trait 划分、声明层的产生式以及辅助函数。
//! 语句和表达式的产生式分别实现在 `statement.rs` 与 `expression.rs` 中。

use super::ast::*;
use super::statement::starts_statement;
use crate::lexer::{Token, TokenKind};
use crate::reporter::{SyntaxError, SyntaxErrorKind};

// --- 1. 主解析器结构体 ---

/// 语句与表达式合计允许的最大嵌套层数。
/// 二元运算链每折叠一次也算一层，因为它同样加深了语法树。
const MAX_NESTING_DEPTH: usize = 64;

/// 解析器结构体，持有解析过程所需的全部状态。
pub(super) struct Parser<'a> {
    /// Token 流。保证以 `Eof` 结尾。
    tokens: &'a [Token],
    /// 按发现顺序记录的语法错误。
    errors: Vec<SyntaxError>,
    /// 指向当前待处理 Token 的指针（在 tokens 切片中的索引）。
    current: usize,
    /// 执行步数：每次消费 Token、每次进入语句或基本表达式都会加一。
    pub(super) steps: usize,
    /// 当前的嵌套层数，产生式结束时恢复为进入前的值。
    pub(super) depth: usize,
}

// --- 2. Trait 定义：用于组织解析逻辑 ---

/// `Parse` Trait 是解析器的总入口。
pub(super) trait Parse {
    /// `using* namespace` 形式的整个源文件。
    fn parse_program(&mut self) -> Program;
}

/// `DeclarationParser` Trait 负责解析命名空间、类、字段和方法。
pub(super) trait DeclarationParser {
    fn parse_using(&mut self) -> Result<Node<String>, ()>;
    fn parse_namespace(&mut self) -> Result<Node<Namespace>, ()>;
    fn parse_class(&mut self) -> Result<Node<Class>, ()>;
    /// 解析类体中的一个成员，失败时自行恢复。
    fn parse_class_member(&mut self, fields: &mut Vec<Node<VariableDeclaration>>, methods: &mut Vec<Node<Method>>);
    fn parse_field(&mut self) -> Result<Node<VariableDeclaration>, ()>;
    fn parse_method(&mut self) -> Result<Node<Method>, ()>;
    /// 参数列表永远不会整体失败，坏掉的参数会被报告并跳到下一个逗号。
    fn parse_parameter_list(&mut self) -> Vec<Node<Parameter>>;
    fn parse_parameter(&mut self) -> Result<Node<Parameter>, ()>;
    /// `A.B.C` 形式的限定名。
    fn parse_qualified_name(&mut self, context: &str) -> Result<String, ()>;
}

/// `StatementParser` Trait 负责解析各类语句。
pub(super) trait StatementParser {
    /// 解析任意类型的语句。
    fn parse_statement(&mut self) -> Result<Node<Statement>, ()>;
    /// 按第一个 Token 分发到具体的语句产生式。
    fn parse_statement_kind(&mut self) -> Result<Node<Statement>, ()>;
    /// 语句列表中的一项：出错时在这里完成同步，返回 `None`。
    fn parse_statement_list_item(&mut self) -> Option<Node<Statement>>;
    /// 解析一个 `{...}` 代码块。
    fn parse_block(&mut self) -> Result<Node<Block>, ()>;
    /// 解析一个变量声明（不含结尾的分号）。
    fn parse_variable_declaration(&mut self, is_field: bool) -> Result<Node<VariableDeclaration>, ()>;
    fn parse_if_statement(&mut self) -> Result<Node<Statement>, ()>;
    fn parse_while_statement(&mut self) -> Result<Node<Statement>, ()>;
    fn parse_do_while_statement(&mut self) -> Result<Node<Statement>, ()>;
    fn parse_for_statement(&mut self) -> Result<Node<Statement>, ()>;
    fn parse_foreach_statement(&mut self) -> Result<Node<Statement>, ()>;
    fn parse_switch_statement(&mut self) -> Result<Node<Statement>, ()>;
    fn parse_case_label(&mut self) -> Node<Expression>;
    fn parse_case_body(&mut self) -> Vec<Node<Statement>>;
    fn parse_return_statement(&mut self) -> Result<Node<Statement>, ()>;
    fn parse_break_statement(&mut self) -> Result<Node<Statement>, ()>;
    /// 以标识符开头的语句：赋值、调用或后缀自增/自减（不含分号）。
    fn parse_identifier_statement(&mut self) -> Result<Node<Statement>, ()>;
}

/// `ExpressionParser` Trait 负责解析各类表达式（逐级的优先级阶梯）。
pub(super) trait ExpressionParser {
    /// 解析表达式的主入口。
    fn parse_expression(&mut self) -> Result<Node<Expression>, ()>;
    /// 第 `level` 层的左结合二元运算。
    fn parse_binary(&mut self, level: usize) -> Result<Node<Expression>, ()>;
    /// `parse_binary` 的循环体，`operators` 是本层的运算符。
    fn fold_binary(&mut self, level: usize, operators: &[(TokenKind, BinaryOperator)]) -> Result<Node<Expression>, ()>;
    /// 前缀 `!`、`-`、`++`、`--`。
    fn parse_unary(&mut self) -> Result<Node<Expression>, ()>;
    /// 后缀 `++`、`--`。
    fn parse_postfix(&mut self) -> Result<Node<Expression>, ()>;
    /// 字面量、标识符、调用、下标访问、括号表达式。
    fn parse_primary(&mut self) -> Result<Node<Expression>, ()>;
    /// 标识符之后的调用：`.Method(args)` 或 `(args)`。
    fn parse_call(&mut self, name: String) -> Result<MethodCall, ()>;
    /// 解析方法调用的参数列表 `(arg1, arg2, ...)`。
    fn parse_call_arguments(&mut self) -> Result<Vec<Node<Expression>>, ()>;
}

/// `TypeParser` Trait 负责解析类型名。
pub(super) trait TypeParser {
    /// 解析一个类型名，例如 `int`, `string[]`, `float[8]`，返回它的原文。
    fn parse_type(&mut self) -> Result<String, ()>;
}

/// `Util` Trait 提供了解析过程中常用的一系列辅助函数。
pub(super) trait Util<'a> {
    // --- Token 流操作 ---
    /// 查看当前的 Token。
    fn peek(&self) -> &'a Token;
    /// 查看当前位置之后第 `offset` 个 Token。
    fn peek_at(&self, offset: usize) -> &'a Token;
    /// 查看下一个 Token。
    fn peek_next(&self) -> &'a Token;
    /// 检查是否已到达 Token 流的末尾。
    fn is_at_end(&self) -> bool;
    /// 消费当前 Token 并返回它，同时前移指针。
    fn advance(&mut self) -> &'a Token;
    /// 检查当前 Token 是否是指定的类型。
    fn check(&self, kind: TokenKind) -> bool;
    /// 如果当前 Token 是指定类型，则消费它并返回 `true`。
    fn match_token(&mut self, kind: TokenKind) -> bool;
    /// 消费一个指定类型的 Token，如果不是预期类型则报告错误。
    fn consume(&mut self, kind: TokenKind, context: &str) -> Result<&'a Token, ()>;
    /// 消费一个预期的分号 `;`，如果缺失则报告错误。
    fn consume_semicolon(&mut self, context: &str) -> Result<(), ()>;
    /// 消费一个结尾的 `}` 或分隔用的 `:`。缺失时只报告错误，不让外层节点失败。
    fn expect_closing(&mut self, kind: TokenKind, context: &str);

    // --- 错误报告 ---
    fn report(&mut self, kind: SyntaxErrorKind, line: usize);
    /// 在当前 Token 所在行报告错误。
    fn report_here(&mut self, kind: SyntaxErrorKind);
    /// 当前 Token 的可读描述。
    fn found(&self) -> String;

    // --- 错误恢复 ---
    /// 语句级同步：丢弃 Token 直到 `;`（一并消费）、`{`、`}` 或一个开始声明/语句的关键字。
    fn synchronize(&mut self);
    /// 表达式级同步：扫描到 `;` `)` `]` `,` `}` 或输入末尾，但不消费它。
    fn recover_expression(&mut self);
    /// 跳过一个嵌套过深的表达式：括号成对跳过，停在外层的分隔符之前。
    fn skip_nested_expression(&mut self);
    /// 跳过一条嵌套过深的语句：括号和花括号成对跳过，结尾的 `;` 一并消费。
    fn skip_nested_statement(&mut self);
}

// --- 3. 基础实现 ---

impl<'a> Parser<'a> {
    /// 创建一个新的解析器实例。`tokens` 必须以 `Eof` 结尾。
    pub(super) fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            errors: Vec::new(),
            current: 0,
            steps: 0,
            depth: 0,
        }
    }

    /// 进入一层嵌套。超过上限时报告错误并返回 `false`，由调用方跳过过深的部分。
    pub(super) fn enter_nesting(&mut self) -> bool {
        if self.depth >= MAX_NESTING_DEPTH {
            let found = self.found();
            self.report_here(SyntaxErrorKind::NestingTooDeep { found });
            return false;
        }
        self.depth += 1;
        true
    }

    /// 结束解析，取出收集到的错误和执行步数。
    pub(super) fn finish(self) -> (Vec<SyntaxError>, usize) {
        (self.errors, self.steps)
    }
}

fn access_modifier(kind: TokenKind) -> AccessModifier {
    match kind {
        TokenKind::Public => AccessModifier::Public,
        TokenKind::Private => AccessModifier::Private,
        TokenKind::Protected => AccessModifier::Protected,
        _ => AccessModifier::Internal,
    }
}

impl<'a> Parse for Parser<'a> {
    fn parse_program(&mut self) -> Program {
        let line = self.peek().line;

        // 1. 所有 using 必须出现在命名空间之前
        let mut usings = Vec::new();
        while self.check(TokenKind::Using) {
            match self.parse_using() {
                Ok(using) => usings.push(using),
                Err(()) => self.synchronize(),
            }
        }

        // 2. 唯一的顶层命名空间
        if !self.check(TokenKind::Namespace) {
            let found = self.found();
            self.report_here(SyntaxErrorKind::MissingNamespace { found });
            while !self.is_at_end() && !self.check(TokenKind::Namespace) {
                self.advance();
            }
        }

        let namespace = if self.check(TokenKind::Namespace) {
            match self.parse_namespace() {
                Ok(namespace) => Some(namespace),
                Err(()) => {
                    // 命名空间头部已经损坏，剩余的 Token 无法可靠地归属
                    while !self.is_at_end() {
                        self.advance();
                    }
                    None
                }
            }
        } else {
            None
        };

        // 3. 命名空间之后不允许有任何内容
        if !self.is_at_end() {
            let found = self.found();
            self.report_here(SyntaxErrorKind::TrailingInput { found });
            while !self.is_at_end() {
                self.advance();
            }
        }

        Program {
            usings,
            namespace,
            line,
        }
    }
}

impl<'a> DeclarationParser for Parser<'a> {
    /// `using System.Text;`
    fn parse_using(&mut self) -> Result<Node<String>, ()> {
        let line = self.advance().line;
        let name = self.parse_qualified_name("after 'using'")?;
        self.consume_semicolon("after using directive")?;
        Ok(Node::new(name, line))
    }

    /// `namespace App { class ... }`
    fn parse_namespace(&mut self) -> Result<Node<Namespace>, ()> {
        let line = self.consume(TokenKind::Namespace, "to start the program")?.line;
        let name = self.parse_qualified_name("after 'namespace'")?;
        self.consume(TokenKind::LBrace, "after namespace name")?;

        let mut classes = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let starts_class = self.check(TokenKind::Class)
                || (self.peek().kind.is_access_modifier() && self.peek_next().kind == TokenKind::Class);
            if starts_class {
                match self.parse_class() {
                    Ok(class) => classes.push(class),
                    Err(()) => self.synchronize(),
                }
            } else {
                // 命名空间里只允许出现类
                let found = self.found();
                self.report_here(SyntaxErrorKind::ExpectedClass { found });
                self.advance();
                self.synchronize();
            }
        }
        self.expect_closing(TokenKind::RBrace, "to close namespace");

        Ok(Node::new(Namespace { name, classes }, line))
    }

    /// `public class Program { ... }`，访问修饰符可省略（默认为 internal）。
    fn parse_class(&mut self) -> Result<Node<Class>, ()> {
        let line = self.peek().line;
        let access = if self.peek().kind.is_access_modifier() {
            access_modifier(self.advance().kind)
        } else {
            AccessModifier::default()
        };
        self.consume(TokenKind::Class, "to start a class declaration")?;
        let name = self.consume(TokenKind::Identifier, "as class name")?.lexeme.clone();
        self.consume(TokenKind::LBrace, "after class name")?;

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            self.parse_class_member(&mut fields, &mut methods);
        }
        self.expect_closing(TokenKind::RBrace, "to close class body");

        Ok(Node::new(
            Class {
                name,
                access,
                fields,
                methods,
            },
            line,
        ))
    }

    /// 类成员的分发：
    /// * 访问修饰符开头是方法；
    /// * 类型关键字开头是字段，除非形如 `int Name(`，那是省略了修饰符的方法；
    /// * 其他内容都是放错位置的语句。
    fn parse_class_member(&mut self, fields: &mut Vec<Node<VariableDeclaration>>, methods: &mut Vec<Node<Method>>) {
        let kind = self.peek().kind;
        let is_bare_method = kind.is_type_keyword()
            && self.peek_next().kind == TokenKind::Identifier
            && self.peek_at(2).kind == TokenKind::LParen;

        if kind.is_access_modifier() || is_bare_method {
            match self.parse_method() {
                Ok(method) => methods.push(method),
                Err(()) => self.synchronize(),
            }
        } else if kind.is_type_keyword() {
            match self.parse_field() {
                Ok(field) => fields.push(field),
                Err(()) => self.synchronize(),
            }
        } else {
            let found = self.found();
            self.report_here(SyntaxErrorKind::MisplacedStatement { found });
            if starts_statement(kind) {
                // 完整地解析并丢弃这条语句，这样它内部的花括号不会打乱类体
                if self.parse_statement().is_err() {
                    self.synchronize();
                }
            } else {
                self.advance();
                while !self.is_at_end() {
                    let next = self.peek().kind;
                    if next == TokenKind::RBrace || next.is_access_modifier() || starts_statement(next) {
                        break;
                    }
                    self.advance();
                }
            }
        }
    }

    /// `int count = 0;`
    fn parse_field(&mut self) -> Result<Node<VariableDeclaration>, ()> {
        let field = self.parse_variable_declaration(true)?;
        self.consume_semicolon("after field declaration")?;
        Ok(field)
    }

    /// `public int Add(int a, int b) { ... }`
    fn parse_method(&mut self) -> Result<Node<Method>, ()> {
        let line = self.peek().line;
        let access = if self.peek().kind.is_access_modifier() {
            access_modifier(self.advance().kind)
        } else {
            AccessModifier::Private
        };

        // 1. 返回类型
        let return_type = self.parse_type()?;
        // 2. 方法名
        let name = self.consume(TokenKind::Identifier, "as method name")?.lexeme.clone();
        // 3. 参数列表
        self.consume(TokenKind::LParen, "after method name")?;
        let parameters = self.parse_parameter_list();
        self.consume(TokenKind::RParen, "after method parameters")?;
        // 4. 方法体
        let body = self.parse_block()?;

        Ok(Node::new(
            Method {
                name,
                return_type,
                access,
                parameters,
                body,
            },
            line,
        ))
    }

    fn parse_parameter_list(&mut self) -> Vec<Node<Parameter>> {
        let mut parameters = Vec::new();

        // 空参数列表 `()`
        if self.check(TokenKind::RParen) {
            return parameters;
        }

        loop {
            match self.parse_parameter() {
                Ok(parameter) => parameters.push(parameter),
                Err(()) => {
                    // 跳到下一个逗号（或参数列表/方法头的结尾）继续
                    while !matches!(
                        self.peek().kind,
                        TokenKind::Comma
                            | TokenKind::RParen
                            | TokenKind::LBrace
                            | TokenKind::RBrace
                            | TokenKind::Semicolon
                            | TokenKind::Eof
                    ) {
                        self.advance();
                    }
                }
            }

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        parameters
    }

    fn parse_parameter(&mut self) -> Result<Node<Parameter>, ()> {
        let line = self.peek().line;
        if !self.peek().kind.is_type_keyword() {
            let found = self.found();
            self.report_here(SyntaxErrorKind::InvalidParameter { found });
            return Err(());
        }
        let type_name = self.parse_type()?;
        let name = self.consume(TokenKind::Identifier, "as parameter name")?.lexeme.clone();
        Ok(Node::new(Parameter { type_name, name }, line))
    }

    fn parse_qualified_name(&mut self, context: &str) -> Result<String, ()> {
        let mut name = self.consume(TokenKind::Identifier, context)?.lexeme.clone();
        while self.match_token(TokenKind::Dot) {
            let part = self.consume(TokenKind::Identifier, "after '.'")?;
            name.push('.');
            name.push_str(&part.lexeme);
        }
        Ok(name)
    }
}

impl<'a> TypeParser for Parser<'a> {
    /// 基础类型关键字之后可以跟一个数组后缀：`[]` 表示长度未定，`[N]` 表示固定长度。
    fn parse_type(&mut self) -> Result<String, ()> {
        if !self.peek().kind.is_type_keyword() {
            let found = self.found();
            self.report_here(SyntaxErrorKind::ExpectedType { found });
            return Err(());
        }
        let base = self.advance().lexeme.clone();

        if !self.match_token(TokenKind::LBracket) {
            return Ok(base);
        }
        let size = if self.check(TokenKind::Number) {
            self.advance().lexeme.as_str()
        } else {
            ""
        };
        self.consume(TokenKind::RBracket, "to close array type")?;
        Ok(format!("{base}[{size}]"))
    }
}

impl<'a> Util<'a> for Parser<'a> {
    // --- Token 流操作 ---

    /// 查看当前的 Token，但并不消费它。
    /// 如果已经到达文件末尾，则稳定地返回 EOF Token，防止越界。
    fn peek(&self) -> &'a Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        tokens
            .get(self.current + offset)
            .unwrap_or_else(|| &tokens[tokens.len() - 1])
    }

    fn peek_next(&self) -> &'a Token {
        self.peek_at(1)
    }

    /// 检查是否已到达 Token 流的末尾（即当前 Token 是否是 EOF）。
    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// 消费当前 Token 并返回它，同时将指针前移一位。EOF 永远不会被越过。
    fn advance(&mut self) -> &'a Token {
        self.steps += 1;
        let token = self.peek();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// 失败时只报告错误，不跳过任何 Token，由外层的语句级产生式负责同步。
    fn consume(&mut self, kind: TokenKind, context: &str) -> Result<&'a Token, ()> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let found = self.found();
            self.report_here(SyntaxErrorKind::Expected {
                expected: kind.expected_text().to_string(),
                context: context.to_string(),
                found,
            });
            Err(())
        }
    }

    fn consume_semicolon(&mut self, context: &str) -> Result<(), ()> {
        self.consume(TokenKind::Semicolon, context).map(|_| ())
    }

    fn expect_closing(&mut self, kind: TokenKind, context: &str) {
        // 错误已经被 consume 记录
        let _ = self.consume(kind, context);
    }

    // --- 错误报告 ---

    fn report(&mut self, kind: SyntaxErrorKind, line: usize) {
        self.errors.push(SyntaxError { kind, line });
    }

    fn report_here(&mut self, kind: SyntaxErrorKind) {
        let line = self.peek().line;
        self.report(kind, line);
    }

    fn found(&self) -> String {
        self.peek().describe()
    }

    // --- 错误恢复 ---

    fn synchronize(&mut self) {
        while !self.is_at_end() {
            let kind = self.peek().kind;
            if kind == TokenKind::Semicolon {
                self.advance();
                return;
            }
            if matches!(kind, TokenKind::LBrace | TokenKind::RBrace) || kind.starts_declaration_or_statement() {
                return;
            }
            self.advance();
        }
    }

    fn skip_nested_expression(&mut self) {
        let mut open = 0usize;
        loop {
            match self.peek().kind {
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => return,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::Comma if open == 0 => return,
                TokenKind::LParen | TokenKind::LBracket => open += 1,
                TokenKind::RParen | TokenKind::RBracket => open -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    fn skip_nested_statement(&mut self) {
        let mut open = 0usize;
        loop {
            match self.peek().kind {
                TokenKind::Eof => return,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket if open == 0 => return,
                TokenKind::Semicolon if open == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => open += 1,
                TokenKind::RBrace => {
                    open -= 1;
                    if open == 0 {
                        self.advance();
                        // `else` 分支属于同一条语句
                        if !self.check(TokenKind::Else) {
                            return;
                        }
                    }
                }
                TokenKind::RParen | TokenKind::RBracket => open -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    fn recover_expression(&mut self) {
        while !matches!(
            self.peek().kind,
            TokenKind::Semicolon
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::Comma
                | TokenKind::RBrace
                | TokenKind::Eof
        ) {
            self.advance();
        }
    }
}
