// src/analyzer/types.rs

use crate::parser::ast::{BinaryOperator, UnaryOperator};
use std::fmt;

/// 语言内置的五种基础类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Int,
    Float,
    String,
    Bool,
    /// 只能作为方法的返回类型。
    Void,
}

impl BaseType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(BaseType::Int),
            "float" => Some(BaseType::Float),
            "string" => Some(BaseType::String),
            "bool" => Some(BaseType::Bool),
            "void" => Some(BaseType::Void),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BaseType::Int => "int",
            BaseType::Float => "float",
            BaseType::String => "string",
            BaseType::Bool => "bool",
            BaseType::Void => "void",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, BaseType::Int | BaseType::Float)
    }

    /// 隐式转换规则（目标 ← 源）：相同类型、`int → float`、`int|float|bool → string`。
    pub fn converts_to(self, target: BaseType) -> bool {
        self == target
            || matches!(
                (self, target),
                (BaseType::Int, BaseType::Float)
                    | (BaseType::Int | BaseType::Float | BaseType::Bool, BaseType::String)
            )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Simple,
    Array,
}

/// 一个声明类型被拆分后的结果：`float[8]` → `{ Float, Array, 8 }`。
///
/// `size` 为 0 表示长度未指定（`int[]`）或者非法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemanticType {
    pub base: BaseType,
    pub dimension: Dimension,
    pub size: usize,
}

/// `SemanticType::parse` 可能出现的问题。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeError {
    /// 基础类型不是五个内置类型之一。
    UnknownBase,
    /// `[N]` 中的 N 不是正整数。携带的类型已经把长度记为 0，可以继续使用。
    InvalidSize(SemanticType),
}

impl SemanticType {
    pub const INT: SemanticType = SemanticType::scalar(BaseType::Int);
    pub const FLOAT: SemanticType = SemanticType::scalar(BaseType::Float);
    pub const STRING: SemanticType = SemanticType::scalar(BaseType::String);
    pub const BOOL: SemanticType = SemanticType::scalar(BaseType::Bool);
    pub const VOID: SemanticType = SemanticType::scalar(BaseType::Void);

    pub const fn scalar(base: BaseType) -> Self {
        SemanticType {
            base,
            dimension: Dimension::Simple,
            size: 0,
        }
    }

    pub const fn array(base: BaseType, size: usize) -> Self {
        SemanticType {
            base,
            dimension: Dimension::Array,
            size,
        }
    }

    /// 按照声明的原文拆分类型：
    /// * 结尾是 `[]`：长度未指定的数组；
    /// * 结尾是 `[N]`：长度为 N 的数组，N 必须是正整数；
    /// * 其他情况：简单类型。
    pub fn parse(name: &str) -> Result<Self, TypeError> {
        let (base_name, suffix) = match name.find('[') {
            Some(at) => name.split_at(at),
            None => (name, ""),
        };
        let base = BaseType::from_name(base_name).ok_or(TypeError::UnknownBase)?;

        if suffix.is_empty() {
            return Ok(SemanticType::scalar(base));
        }
        let Some(size_text) = suffix.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
            return Err(TypeError::UnknownBase);
        };
        if size_text.is_empty() {
            return Ok(SemanticType::array(base, 0));
        }
        match size_text.parse::<usize>() {
            Ok(size) if size > 0 => Ok(SemanticType::array(base, size)),
            _ => Err(TypeError::InvalidSize(SemanticType::array(base, 0))),
        }
    }

    /// 与 `parse` 相同，但长度非法的数组仍然得到长度为 0 的类型。
    pub fn parse_lenient(name: &str) -> Option<Self> {
        match SemanticType::parse(name) {
            Ok(ty) | Err(TypeError::InvalidSize(ty)) => Some(ty),
            Err(TypeError::UnknownBase) => None,
        }
    }

    pub fn is_array(self) -> bool {
        self.dimension == Dimension::Array
    }

    pub fn is_void(self) -> bool {
        self.base == BaseType::Void && !self.is_array()
    }

    /// 非数组的 `int` 或 `float`。
    pub fn is_numeric(self) -> bool {
        !self.is_array() && self.base.is_numeric()
    }

    pub fn is_bool(self) -> bool {
        self == SemanticType::BOOL
    }

    pub fn is_string(self) -> bool {
        self == SemanticType::STRING
    }

    /// 数组元素的类型，对简单类型返回它自己。
    pub fn element(self) -> Self {
        SemanticType::scalar(self.base)
    }

    /// 维度必须相同，基础类型按 `BaseType::converts_to` 转换。数组长度不参与比较。
    pub fn converts_to(self, target: SemanticType) -> bool {
        self.dimension == target.dimension && self.base.converts_to(target.base)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.dimension, self.size) {
            (Dimension::Simple, _) => write!(f, "{}", self.base.name()),
            (Dimension::Array, 0) => write!(f, "{}[]", self.base.name()),
            (Dimension::Array, size) => write!(f, "{}[{}]", self.base.name(), size),
        }
    }
}

/// 二元运算的结果类型；运算非法时返回 `None`。
///
/// `+` 先检查字符串拼接，所以 `1 + "a"` 与 `"a" + true` 都是 `string`。
pub fn binary_result(operator: BinaryOperator, left: SemanticType, right: SemanticType) -> Option<SemanticType> {
    if left.is_array() || right.is_array() {
        return None;
    }

    if operator.is_logical() {
        return (left.is_bool() && right.is_bool()).then_some(SemanticType::BOOL);
    }
    if operator.is_relational() {
        return (left.is_numeric() && right.is_numeric()).then_some(SemanticType::BOOL);
    }
    if operator.is_equality() {
        return (left.converts_to(right) || right.converts_to(left)).then_some(SemanticType::BOOL);
    }

    // 算术运算
    if operator == BinaryOperator::Add && (left.is_string() || right.is_string()) {
        let concatenable = |ty: SemanticType| ty.is_string() || ty.is_numeric() || ty.is_bool();
        return (concatenable(left) && concatenable(right)).then_some(SemanticType::STRING);
    }
    if !left.is_numeric() || !right.is_numeric() {
        return None;
    }
    if left.base == BaseType::Float || right.base == BaseType::Float {
        Some(SemanticType::FLOAT)
    } else {
        Some(SemanticType::INT)
    }
}

/// 一元运算的结果类型；运算非法时返回 `None`。
pub fn unary_result(operator: UnaryOperator, operand: SemanticType) -> Option<SemanticType> {
    match operator {
        UnaryOperator::Not => operand.is_bool().then_some(SemanticType::BOOL),
        UnaryOperator::Negate | UnaryOperator::Increment | UnaryOperator::Decrement => {
            operand.is_numeric().then_some(operand)
        }
    }
}
