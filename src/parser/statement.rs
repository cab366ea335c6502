use super::ast::*;
use super::main::{ExpressionParser, Parser, StatementParser, TypeParser, Util};
use crate::lexer::TokenKind;
use crate::reporter::SyntaxErrorKind;

/// 能够开始一条语句的 Token。
pub(super) fn starts_statement(kind: TokenKind) -> bool {
    kind.is_type_keyword()
        || matches!(
            kind,
            TokenKind::If
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::For
                | TokenKind::Foreach
                | TokenKind::Switch
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::LBrace
                | TokenKind::Identifier
        )
}

impl<'a> StatementParser for Parser<'a> {
    /// 解析任意类型的语句，这是语句解析的总入口。
    fn parse_statement(&mut self) -> Result<Node<Statement>, ()> {
        self.steps += 1;
        let depth = self.depth;
        if !self.enter_nesting() {
            // 过深的语句整体跳过，用一个空代码块代替
            let line = self.peek().line;
            self.skip_nested_statement();
            return Ok(Node::new(Statement::Block(Block { statements: Vec::new() }), line));
        }
        let statement = self.parse_statement_kind();
        self.depth = depth;
        statement
    }

    /// 通过“向前看”第一个 Token 来决定应该调用哪个更具体的解析函数。
    /// 每个分支都会先消费至少一个 Token，这保证了同步之后一定有进展。
    fn parse_statement_kind(&mut self) -> Result<Node<Statement>, ()> {
        let token = self.peek();
        match token.kind {
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Foreach => self.parse_foreach_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::LBrace => self.parse_block().map(|block| block.map(Statement::Block)),
            // 类型关键字开头的是变量声明
            kind if kind.is_type_keyword() => {
                let node = self
                    .parse_variable_declaration(false)?
                    .map(Statement::VariableDeclaration);
                self.consume_semicolon("after variable declaration")?;
                Ok(node)
            }
            TokenKind::Identifier => {
                let node = self.parse_identifier_statement()?;
                self.consume_semicolon("after statement")?;
                Ok(node)
            }
            // 无法归类的语句：报告并跳过一个 Token，保证前进
            _ => {
                let found = self.found();
                self.report_here(SyntaxErrorKind::InvalidStatement { found });
                self.advance();
                Err(())
            }
        }
    }

    fn parse_statement_list_item(&mut self) -> Option<Node<Statement>> {
        if !starts_statement(self.peek().kind) {
            // 单个 Token 的跳过已经足够，不需要再同步
            let found = self.found();
            self.report_here(SyntaxErrorKind::InvalidStatement { found });
            self.advance();
            return None;
        }
        match self.parse_statement() {
            Ok(statement) => Some(statement),
            Err(()) => {
                self.synchronize();
                None
            }
        }
    }

    fn parse_block(&mut self) -> Result<Node<Block>, ()> {
        // 1. 消费 `{`
        let line = self.consume(TokenKind::LBrace, "to start a block")?.line;

        // 2. 循环解析代码块中的每一条语句
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if let Some(statement) = self.parse_statement_list_item() {
                statements.push(statement);
            }
        }

        // 3. 消费 `}`
        self.expect_closing(TokenKind::RBrace, "to close block");
        Ok(Node::new(Block { statements }, line))
    }

    /// 例如: `int x;`、`float[3] v;`、`string s = "a" + x;`
    fn parse_variable_declaration(&mut self, is_field: bool) -> Result<Node<VariableDeclaration>, ()> {
        let line = self.peek().line;
        let type_name = self.parse_type()?;
        let name = self.consume(TokenKind::Identifier, "as variable name")?.lexeme.clone();
        let initializer = if self.match_token(TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Node::new(
            VariableDeclaration {
                type_name,
                name,
                initializer,
                is_field,
            },
            line,
        ))
    }

    /// 例如: `if (x > 0) { ... } else { ... }`
    fn parse_if_statement(&mut self) -> Result<Node<Statement>, ()> {
        let line = self.advance().line;
        self.consume(TokenKind::LParen, "after 'if'")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RParen, "after if condition")?;

        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.match_token(TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        let kind = Statement::If(IfStatement {
            condition,
            then_branch,
            else_branch,
        });
        Ok(Node::new(kind, line))
    }

    fn parse_while_statement(&mut self) -> Result<Node<Statement>, ()> {
        let line = self.advance().line;
        self.consume(TokenKind::LParen, "after 'while'")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RParen, "after while condition")?;
        let body = Box::new(self.parse_statement()?);

        Ok(Node::new(Statement::While(WhileStatement { condition, body }), line))
    }

    /// `do { ... } while (cond);` 循环体必须是代码块。
    fn parse_do_while_statement(&mut self) -> Result<Node<Statement>, ()> {
        let line = self.advance().line;
        let body = self.parse_block()?;
        self.consume(TokenKind::While, "after do-while body")?;
        self.consume(TokenKind::LParen, "after 'while'")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RParen, "after do-while condition")?;
        self.consume_semicolon("after do-while statement")?;

        Ok(Node::new(Statement::DoWhile(DoWhileStatement { body, condition }), line))
    }

    /// `for (init; cond; increment) body`
    ///
    /// 初始化部分可以为空，条件是必需的，增量部分只接受以标识符开头的语句，
    /// 并且不会检查它是否与循环变量有关。
    fn parse_for_statement(&mut self) -> Result<Node<Statement>, ()> {
        let line = self.advance().line;
        self.consume(TokenKind::LParen, "after 'for'")?;

        // 1. 初始化
        let init = match self.peek().kind {
            TokenKind::Semicolon => None,
            kind if kind.is_type_keyword() => Some(Box::new(
                self.parse_variable_declaration(false)?
                    .map(Statement::VariableDeclaration),
            )),
            TokenKind::Identifier => Some(Box::new(self.parse_identifier_statement()?)),
            _ => {
                let found = self.found();
                self.report_here(SyntaxErrorKind::Expected {
                    expected: "declaration or assignment".to_string(),
                    context: "in for initializer".to_string(),
                    found,
                });
                return Err(());
            }
        };
        self.consume_semicolon("after for initializer")?;

        // 2. 条件
        let condition = self.parse_expression()?;
        self.consume_semicolon("after for condition")?;

        // 3. 增量
        let increment = match self.peek().kind {
            TokenKind::RParen => None,
            TokenKind::Identifier => Some(Box::new(self.parse_identifier_statement()?)),
            _ => {
                let found = self.found();
                self.report_here(SyntaxErrorKind::InvalidIncrement { found });
                self.advance();
                None
            }
        };
        self.consume(TokenKind::RParen, "after for clauses")?;

        // 4. 循环体
        let body = Box::new(self.parse_statement()?);

        let kind = Statement::For(ForStatement {
            init,
            condition,
            increment,
            body,
        });
        Ok(Node::new(kind, line))
    }

    /// `foreach (int item in items) body`
    fn parse_foreach_statement(&mut self) -> Result<Node<Statement>, ()> {
        let line = self.advance().line;
        self.consume(TokenKind::LParen, "after 'foreach'")?;
        let element_type = self.parse_type()?;
        let element_name = self
            .consume(TokenKind::Identifier, "as foreach variable name")?
            .lexeme
            .clone();
        self.consume(TokenKind::In, "after foreach variable")?;
        let collection = self.parse_expression()?;
        self.consume(TokenKind::RParen, "after foreach collection")?;
        let body = Box::new(self.parse_statement()?);

        let kind = Statement::Foreach(ForeachStatement {
            element_type,
            element_name,
            collection,
            body,
        });
        Ok(Node::new(kind, line))
    }

    /// `switch (x) { case 1: case 2: ... break; default: ... }`
    ///
    /// 多个 case 标签可以共享同一段语句：前面的标签得到一个空的语句列表。
    fn parse_switch_statement(&mut self) -> Result<Node<Statement>, ()> {
        let line = self.advance().line;
        self.consume(TokenKind::LParen, "after 'switch'")?;
        let subject = self.parse_expression()?;
        self.consume(TokenKind::RParen, "after switch subject")?;
        self.consume(TokenKind::LBrace, "to open switch body")?;

        let mut cases = Vec::new();
        let mut default = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if self.check(TokenKind::Case) {
                let case_line = self.advance().line;
                let value = self.parse_case_label();
                // 缺少冒号只报告，分支照常解析，错误不会扩散到 switch 之外
                self.expect_closing(TokenKind::Colon, "after case label");
                let statements = self.parse_case_body();
                cases.push(Node::new(Case { value, statements }, case_line));
            } else if self.check(TokenKind::Default) {
                self.advance();
                self.expect_closing(TokenKind::Colon, "after 'default'");
                default.extend(self.parse_case_body());
            } else {
                let found = self.found();
                self.report_here(SyntaxErrorKind::Expected {
                    expected: "'case' or 'default'".to_string(),
                    context: "in switch body".to_string(),
                    found,
                });
                self.advance();
                self.synchronize();
            }
        }
        self.expect_closing(TokenKind::RBrace, "to close switch body");

        let kind = Statement::Switch(SwitchStatement {
            subject,
            cases,
            default,
        });
        Ok(Node::new(kind, line))
    }

    /// case 标签只能是数字、字符串或字符字面量。
    fn parse_case_label(&mut self) -> Node<Expression> {
        let token = self.peek();
        let ty = match token.kind {
            TokenKind::Number => Some(LiteralType::Int),
            TokenKind::FloatLiteral => Some(LiteralType::Float),
            TokenKind::StringLiteral | TokenKind::CharLiteral => Some(LiteralType::String),
            _ => None,
        };

        match ty {
            Some(ty) => {
                self.advance();
                Node::new(Expression::Literal(Literal::new(token.lexeme.clone(), ty)), token.line)
            }
            None => {
                let found = self.found();
                self.report_here(SyntaxErrorKind::InvalidCaseLabel { found });
                if !matches!(token.kind, TokenKind::Colon | TokenKind::RBrace | TokenKind::Eof) {
                    self.advance();
                }
                Node::new(Expression::Literal(Literal::placeholder()), token.line)
            }
        }
    }

    /// 一个 case/default 分支的语句，直到下一个标签或 switch 结尾。
    /// 直接出现在分支里的 `break;` 在这里被吸收，不产生 `Break` 节点。
    fn parse_case_body(&mut self) -> Vec<Node<Statement>> {
        let mut statements = Vec::new();
        while !matches!(
            self.peek().kind,
            TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
        ) {
            if self.check(TokenKind::Break) && self.peek_next().kind == TokenKind::Semicolon {
                self.advance();
                self.advance();
                continue;
            }
            if let Some(statement) = self.parse_statement_list_item() {
                statements.push(statement);
            }
        }
        statements
    }

    /// 例如: `return;` 或 `return x + 1;`
    fn parse_return_statement(&mut self) -> Result<Node<Statement>, ()> {
        let line = self.advance().line;
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon("after return statement")?;
        Ok(Node::new(Statement::Return(value), line))
    }

    fn parse_break_statement(&mut self) -> Result<Node<Statement>, ()> {
        let line = self.advance().line;
        self.consume_semicolon("after 'break'")?;
        Ok(Node::new(Statement::Break, line))
    }

    fn parse_identifier_statement(&mut self) -> Result<Node<Statement>, ()> {
        let name_token = self.consume(TokenKind::Identifier, "to start statement")?;
        let line = name_token.line;
        let name = name_token.lexeme.clone();

        match self.peek().kind {
            // obj.Method(args) 或 Method(args)
            TokenKind::Dot | TokenKind::LParen => {
                let call = self.parse_call(name)?;
                Ok(Node::new(Statement::Expression(Expression::Call(call)), line))
            }
            // x = value
            TokenKind::Assign => {
                self.advance();
                let value = self.parse_expression()?;
                let assignment = Assignment {
                    target: name,
                    index: None,
                    value,
                };
                Ok(Node::new(Statement::Assignment(assignment), line))
            }
            // x[i] = value
            TokenKind::LBracket => {
                self.advance();
                let index = self.parse_expression()?;
                self.consume(TokenKind::RBracket, "after array index")?;
                self.consume(TokenKind::Assign, "in array element assignment")?;
                let value = self.parse_expression()?;
                let assignment = Assignment {
                    target: name,
                    index: Some(Box::new(index)),
                    value,
                };
                Ok(Node::new(Statement::Assignment(assignment), line))
            }
            // x++ / x--
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let operator = if self.advance().kind == TokenKind::PlusPlus {
                    UnaryOperator::Increment
                } else {
                    UnaryOperator::Decrement
                };
                let operand = Node::new(Expression::Identifier(IdentifierExpression { name, index: None }), line);
                let unary = UnaryExpression {
                    operator,
                    operand: Box::new(operand),
                    is_prefix: false,
                };
                Ok(Node::new(Statement::Expression(Expression::Unary(unary)), line))
            }
            _ => {
                let found = self.found();
                self.report_here(SyntaxErrorKind::InvalidIdentifierStatement { name, found });
                Err(())
            }
        }
    }
}
