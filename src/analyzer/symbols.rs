// src/analyzer/symbols.rs

use crate::analyzer::types::SemanticType;
use crate::parser::ast::AccessModifier;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// 全局作用域的路径。
pub const GLOBAL_SCOPE: &str = "global";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Field,
    Method,
    Class,
}

impl SymbolKind {
    pub fn describe(self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Field => "field",
            SymbolKind::Method => "method",
            SymbolKind::Class => "class",
        }
    }

    /// 可以作为值出现在表达式里的符号。
    pub fn is_value(self) -> bool {
        matches!(self, SymbolKind::Variable | SymbolKind::Parameter | SymbolKind::Field)
    }
}

/// 符号表中存储的符号信息
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// 变量的类型，方法的返回类型。类没有类型；类型非法时也为 `None`。
    pub ty: Option<SemanticType>,
    /// 声明所在作用域的路径，由 `SymbolTable::declare` 填写。
    pub scope: String,
    pub access: Option<AccessModifier>,
    pub initialized: bool,
    /// 方法的参数类型，按声明顺序。
    pub parameters: Vec<String>,
    pub line: usize,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, ty: Option<SemanticType>, line: usize) -> Self {
        Symbol {
            name: name.into(),
            kind,
            ty,
            scope: String::new(),
            access: None,
            // 只有没有初始化器的局部变量一开始是未初始化的
            initialized: kind != SymbolKind::Variable,
            parameters: Vec::new(),
            line,
        }
    }

    pub fn with_access(mut self, access: AccessModifier) -> Self {
        self.access = Some(access);
        self
    }

    pub fn with_initialized(mut self, initialized: bool) -> Self {
        self.initialized = initialized;
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = parameters;
        self
    }
}

/// 代表一个独立的作用域，例如一个方法体或一个 for 循环
#[derive(Debug)]
struct Frame {
    path: String,
    symbols: HashMap<String, Symbol>,
}

/// 符号表，使用一个栈来管理嵌套的作用域。
/// 栈底是永久存在的全局作用域。
#[derive(Debug)]
pub struct SymbolTable {
    frames: Vec<Frame>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// 创建一个新的符号表，并自动进入全局作用域
    pub fn new() -> Self {
        SymbolTable {
            frames: vec![Frame {
                path: GLOBAL_SCOPE.to_string(),
                symbols: HashMap::new(),
            }],
        }
    }

    /// 进入一个新的作用域
    pub fn enter_scope(&mut self, path: String) {
        self.frames.push(Frame {
            path,
            symbols: HashMap::new(),
        });
    }

    /// 退出当前作用域。全局作用域永远不会被弹出。
    pub fn exit_scope(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn current_path(&self) -> &str {
        self.frames.last().map_or(GLOBAL_SCOPE, |frame| frame.path.as_str())
    }

    /// 在当前作用域中添加一个新符号。
    /// 同一作用域里已经有同名符号时返回 `false`，表里的内容不变；外层的同名符号可以被遮蔽。
    pub fn declare(&mut self, mut symbol: Symbol) -> bool {
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };
        match frame.symbols.entry(symbol.name.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                symbol.scope = frame.path.clone();
                slot.insert(symbol);
                true
            }
        }
    }

    /// 查找一个符号（从内到外）
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.frames.iter().rev().find_map(|frame| frame.symbols.get(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.symbols.get_mut(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(name: &str) -> Symbol {
        Symbol::new(name, SymbolKind::Variable, Some(SemanticType::INT), 1)
    }

    #[test]
    fn test_global_scope_is_never_popped() {
        let mut table = SymbolTable::new();
        table.exit_scope();
        table.exit_scope();
        assert_eq!(table.current_path(), GLOBAL_SCOPE);
        // 全局作用域里的符号依然可见
        assert!(table.declare(variable("g")));
        table.exit_scope();
        assert!(table.lookup("g").is_some());
    }

    #[test]
    fn test_shadowing_and_redeclaration() {
        let mut table = SymbolTable::new();
        assert!(table.declare(variable("x")));
        assert!(!table.declare(variable("x")));

        table.enter_scope("global.block3".to_string());
        assert!(table.declare(variable("x")));
        assert_eq!(table.lookup("x").map(|s| s.scope.as_str()), Some("global.block3"));

        table.exit_scope();
        assert_eq!(table.lookup("x").map(|s| s.scope.as_str()), Some(GLOBAL_SCOPE));
    }

    #[test]
    fn test_symbols_die_with_their_scope() {
        let mut table = SymbolTable::new();
        table.enter_scope("N.C".to_string());
        table.declare(variable("y"));
        assert_eq!(table.lookup("y").map(|s| s.scope.as_str()), Some("N.C"));
        table.exit_scope();
        assert!(table.lookup("y").is_none());
    }

    #[test]
    fn test_lookup_mut_marks_initialized() {
        let mut table = SymbolTable::new();
        table.declare(variable("z"));
        assert!(!table.lookup("z").unwrap().initialized);
        table.enter_scope("inner".to_string());
        table.lookup_mut("z").unwrap().initialized = true;
        table.exit_scope();
        assert!(table.lookup("z").unwrap().initialized);
    }
}
