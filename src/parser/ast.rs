use std::fmt;

// --- 1. 核心 AST 节点 ---

/// 所有 AST 节点的通用包装，包含了节点本身和它的第一个 token 所在的行。
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub kind: T,
    pub line: usize,
}

impl<T> Node<T> {
    pub fn new(kind: T, line: usize) -> Self {
        Self { kind, line }
    }

    /// 将一个节点的内部类型 `T` 映射为类型 `U`，同时保持 `line` 不变。
    ///
    /// 用于把具体的节点（如 `Node<IfStatement>`）转换为通用的 `Node<Statement>`。
    pub fn map<U, F>(self, f: F) -> Node<U>
    where
        F: FnOnce(T) -> U,
    {
        Node {
            kind: f(self.kind),
            line: self.line,
        }
    }
}

// --- 2. 程序顶层结构 ---

/// AST 的根节点，代表一个完整的源文件。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// `using` 引入的名字，例如 `System.Collections`。
    pub usings: Vec<Node<String>>,
    pub namespace: Option<Node<Namespace>>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    /// 限定名，例如 `App.Core`。
    pub name: String,
    pub classes: Vec<Node<Class>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessModifier {
    Public,
    Private,
    Protected,
    #[default]
    Internal,
}

impl fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AccessModifier::Public => "public",
            AccessModifier::Private => "private",
            AccessModifier::Protected => "protected",
            AccessModifier::Internal => "internal",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    pub access: AccessModifier,
    /// 字段就是 `is_field == true` 的变量声明。
    pub fields: Vec<Node<VariableDeclaration>>,
    pub methods: Vec<Node<Method>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    /// 返回类型的原文，可以带数组后缀，例如 `int[]`。
    pub return_type: String,
    pub access: AccessModifier,
    pub parameters: Vec<Node<Parameter>>,
    pub body: Node<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
}

/// 变量声明，例如 `int x = 1;` 或者 `int[5] values;`。
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub type_name: String,
    pub name: String,
    pub initializer: Option<Node<Expression>>,
    pub is_field: bool,
}

// --- 3. 语句 ---

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Node<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VariableDeclaration(VariableDeclaration),
    Block(Block),
    If(IfStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    For(ForStatement),
    Foreach(ForeachStatement),
    Switch(SwitchStatement),
    /// `None` 表示 `return;`
    Return(Option<Node<Expression>>),
    Break,
    Assignment(Assignment),
    /// 作为语句出现的方法调用或后缀自增/自减。
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Node<Expression>,
    pub then_branch: Box<Node<Statement>>,
    pub else_branch: Option<Box<Node<Statement>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Node<Expression>,
    pub body: Box<Node<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStatement {
    pub body: Node<Block>,
    pub condition: Node<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    /// 声明或赋值。
    pub init: Option<Box<Node<Statement>>>,
    pub condition: Node<Expression>,
    pub increment: Option<Box<Node<Statement>>>,
    pub body: Box<Node<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeachStatement {
    pub element_type: String,
    pub element_name: String,
    pub collection: Node<Expression>,
    pub body: Box<Node<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub subject: Node<Expression>,
    pub cases: Vec<Node<Case>>,
    pub default: Vec<Node<Statement>>,
}

/// `case` 分支。直接结束分支的 `break;` 由 switch 产生式吸收，不会出现在 `statements` 里。
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub value: Node<Expression>,
    pub statements: Vec<Node<Statement>>,
}

/// `x = e` 或 `x[i] = e`。
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: String,
    pub index: Option<Box<Node<Expression>>>,
    pub value: Node<Expression>,
}

// --- 4. 表达式 ---

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Binary(BinaryExpression),
    Unary(UnaryExpression),
    Literal(Literal),
    Identifier(IdentifierExpression),
    Call(MethodCall),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub left: Box<Node<Expression>>,
    pub operator: BinaryOperator,
    pub right: Box<Node<Expression>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOperator::Equal | BinaryOperator::NotEqual)
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOperator::Less
                | BinaryOperator::Greater
                | BinaryOperator::LessEqual
                | BinaryOperator::GreaterEqual
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<Node<Expression>>,
    /// `++x` 为 true，`x++` 为 false。
    pub is_prefix: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
    Negate,
    Increment,
    Decrement,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Negate => "-",
            UnaryOperator::Increment => "++",
            UnaryOperator::Decrement => "--",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralType {
    Int,
    Float,
    String,
    Bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// 字面量原文（字符串不含引号）。
    pub value: String,
    pub ty: LiteralType,
    /// 错误恢复时合成的占位节点，语义分析会忽略它的类型。
    pub synthesized: bool,
}

impl Literal {
    pub fn new(value: impl Into<String>, ty: LiteralType) -> Self {
        Self {
            value: value.into(),
            ty,
            synthesized: false,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            value: String::new(),
            ty: LiteralType::Int,
            synthesized: true,
        }
    }
}

/// 标识符，`index` 存在时表示数组元素访问 `a[i]`。
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierExpression {
    pub name: String,
    pub index: Option<Box<Node<Expression>>>,
}

/// `m(args)` 或 `obj.m(args)`。
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub receiver: Option<String>,
    pub method: String,
    pub arguments: Vec<Node<Expression>>,
}
