use super::ast::*;
use super::main::{ExpressionParser, Parser, Util};
use crate::lexer::TokenKind;
use crate::reporter::SyntaxErrorKind;

/// 二元运算符的优先级阶梯，从低到高：
/// or → and → equality → relational → additive → multiplicative。
const BINARY_LEVELS: [&[(TokenKind, BinaryOperator)]; 6] = [
    &[(TokenKind::Or, BinaryOperator::Or)],
    &[(TokenKind::And, BinaryOperator::And)],
    &[
        (TokenKind::Eq, BinaryOperator::Equal),
        (TokenKind::NotEq, BinaryOperator::NotEqual),
    ],
    &[
        (TokenKind::Lt, BinaryOperator::Less),
        (TokenKind::Gt, BinaryOperator::Greater),
        (TokenKind::Lte, BinaryOperator::LessEqual),
        (TokenKind::Gte, BinaryOperator::GreaterEqual),
    ],
    &[
        (TokenKind::Plus, BinaryOperator::Add),
        (TokenKind::Minus, BinaryOperator::Subtract),
    ],
    &[
        (TokenKind::Star, BinaryOperator::Multiply),
        (TokenKind::Slash, BinaryOperator::Divide),
        (TokenKind::Percent, BinaryOperator::Modulo),
    ],
];

fn prefix_operator(kind: TokenKind) -> Option<UnaryOperator> {
    match kind {
        TokenKind::Not => Some(UnaryOperator::Not),
        TokenKind::Minus => Some(UnaryOperator::Negate),
        TokenKind::PlusPlus => Some(UnaryOperator::Increment),
        TokenKind::MinusMinus => Some(UnaryOperator::Decrement),
        _ => None,
    }
}

fn placeholder(line: usize) -> Node<Expression> {
    Node::new(Expression::Literal(Literal::placeholder()), line)
}

impl<'a> ExpressionParser for Parser<'a> {
    fn parse_expression(&mut self) -> Result<Node<Expression>, ()> {
        let line = self.peek().line;
        let depth = self.depth;
        if !self.enter_nesting() {
            self.skip_nested_expression();
            return Ok(placeholder(line));
        }
        let expression = self.parse_binary(0);
        self.depth = depth;
        expression
    }

    fn parse_binary(&mut self, level: usize) -> Result<Node<Expression>, ()> {
        let Some(operators) = BINARY_LEVELS.get(level) else {
            return self.parse_unary();
        };
        let depth = self.depth;
        let expression = self.fold_binary(level, operators);
        self.depth = depth;
        expression
    }

    /// 每一层都是一个左结合的循环：只要下一个 Token 是本层的运算符，
    /// 就把已有的左侧和新的右侧折叠成一个向左加深的 `Binary` 节点。
    fn fold_binary(&mut self, level: usize, operators: &[(TokenKind, BinaryOperator)]) -> Result<Node<Expression>, ()> {
        let mut left = self.parse_binary(level + 1)?;
        loop {
            let kind = self.peek().kind;
            let Some(&(_, operator)) = operators.iter().find(|(token, _)| *token == kind) else {
                break;
            };
            self.advance();
            if !self.enter_nesting() {
                self.skip_nested_expression();
                break;
            }
            let right = self.parse_binary(level + 1)?;
            // 二元表达式的行号取左操作数的行号
            let line = left.line;
            left = Node::new(
                Expression::Binary(BinaryExpression {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                }),
                line,
            );
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node<Expression>, ()> {
        let Some(operator) = prefix_operator(self.peek().kind) else {
            return self.parse_postfix();
        };
        let line = self.advance().line;
        let depth = self.depth;
        if !self.enter_nesting() {
            self.skip_nested_expression();
            return Ok(placeholder(line));
        }
        let operand = self.parse_unary();
        self.depth = depth;
        let operand = operand?;
        let unary = UnaryExpression {
            operator,
            operand: Box::new(operand),
            is_prefix: true,
        };
        Ok(Node::new(Expression::Unary(unary), line))
    }

    /// 只有普通变量（不含调用）后面才能跟 `++` / `--`。
    fn parse_postfix(&mut self) -> Result<Node<Expression>, ()> {
        let primary = self.parse_primary()?;
        let operator = match self.peek().kind {
            TokenKind::PlusPlus => UnaryOperator::Increment,
            TokenKind::MinusMinus => UnaryOperator::Decrement,
            _ => return Ok(primary),
        };
        if !matches!(primary.kind, Expression::Identifier(_)) {
            return Ok(primary);
        }
        self.advance();
        let line = primary.line;
        let unary = UnaryExpression {
            operator,
            operand: Box::new(primary),
            is_prefix: false,
        };
        Ok(Node::new(Expression::Unary(unary), line))
    }

    fn parse_primary(&mut self) -> Result<Node<Expression>, ()> {
        self.steps += 1;
        let token = self.peek();
        let line = token.line;

        let literal_type = match token.kind {
            TokenKind::Number => Some(LiteralType::Int),
            TokenKind::FloatLiteral => Some(LiteralType::Float),
            // 字符字面量按字符串处理
            TokenKind::StringLiteral | TokenKind::CharLiteral => Some(LiteralType::String),
            TokenKind::True | TokenKind::False => Some(LiteralType::Bool),
            _ => None,
        };
        if let Some(ty) = literal_type {
            self.advance();
            return Ok(Node::new(Expression::Literal(Literal::new(token.lexeme.clone(), ty)), line));
        }

        match token.kind {
            TokenKind::Identifier => {
                self.advance();
                let name = token.lexeme.clone();
                match self.peek().kind {
                    TokenKind::Dot | TokenKind::LParen => Ok(Node::new(Expression::Call(self.parse_call(name)?), line)),
                    // a[i]
                    TokenKind::LBracket => {
                        self.advance();
                        let index = self.parse_expression()?;
                        self.consume(TokenKind::RBracket, "after array index")?;
                        let identifier = IdentifierExpression {
                            name,
                            index: Some(Box::new(index)),
                        };
                        Ok(Node::new(Expression::Identifier(identifier), line))
                    }
                    _ => Ok(Node::new(
                        Expression::Identifier(IdentifierExpression { name, index: None }),
                        line,
                    )),
                }
            }
            // 括号表达式 `(...)`，节点的行号取 `(` 所在的行
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.consume(TokenKind::RParen, "to close parenthesized expression")?;
                Ok(Node::new(inner.kind, line))
            }
            // 其他情况都是非法的表达式开头：报告、跳到表达式边界，用占位节点代替
            _ => {
                let found = self.found();
                self.report_here(SyntaxErrorKind::ExpectedExpression { found });
                self.recover_expression();
                Ok(placeholder(line))
            }
        }
    }

    /// 名字之后的调用部分：`.Method(args)` 或 `(args)`。
    fn parse_call(&mut self, name: String) -> Result<MethodCall, ()> {
        let (receiver, method) = if self.match_token(TokenKind::Dot) {
            let method = self
                .consume(TokenKind::Identifier, "as method name after '.'")?
                .lexeme
                .clone();
            (Some(name), method)
        } else {
            (None, name)
        };
        let arguments = self.parse_call_arguments()?;
        Ok(MethodCall {
            receiver,
            method,
            arguments,
        })
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<Node<Expression>>, ()> {
        self.consume(TokenKind::LParen, "to start argument list")?;

        let mut arguments = Vec::new();
        if self.match_token(TokenKind::RParen) {
            return Ok(arguments);
        }

        loop {
            arguments.push(self.parse_expression()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.consume(TokenKind::RParen, "after arguments")?;
        Ok(arguments)
    }
}
