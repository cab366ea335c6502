// src/diagnostics/codes.rs

/// Represents a specific error code with its associated information.
/// This struct serves as the single source of truth for all front-end diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode {
    pub code: &'static str,
    pub message: &'static str,
    pub explanation: &'static str,
}

/*
E00xx: 词法分析 (Lexical Analysis) 错误。

E01xx: 语法分析 (Parsing / Syntax) 错误。

E02xx: 语义分析 (Semantic Analysis) 错误。
*/
// --- E00xx: Lexical Analysis Errors ---

pub const E0000_UNRECOGNIZED_CHAR: ErrorCode = ErrorCode {
    code: "E0000",
    message: "Unrecognized character",
    explanation: "The tokenizer encountered a character that is not part of the language. \
                  It is kept as an 'unknown' token so parsing can continue, but the program is rejected.",
};

// --- E01xx: Syntax Analysis (Parsing) Errors ---

pub const E0100_UNEXPECTED_TOKEN: ErrorCode = ErrorCode {
    code: "E0100",
    message: "Unexpected token",
    explanation: "A specific token was required at this point of the grammar (for example a ';' after a statement \
                  or a ')' closing a condition) but something else was found. Parsing resumes at the next statement boundary.",
};

pub const E0101_INVALID_STATEMENT: ErrorCode = ErrorCode {
    code: "E0101",
    message: "Invalid statement",
    explanation: "The token cannot start any statement. Statements begin with a type keyword, an identifier, \
                  '{', or one of if, while, do, for, foreach, switch, return, break.",
};

pub const E0102_EXPECTED_EXPRESSION: ErrorCode = ErrorCode {
    code: "E0102",
    message: "Expected expression",
    explanation: "An expression was required here. Expressions start with a literal, an identifier, '(' \
                  or one of the prefix operators '!', '-', '++', '--'.",
};

pub const E0103_EXPECTED_TYPE: ErrorCode = ErrorCode {
    code: "E0103",
    message: "Expected type",
    explanation: "A type name (int, float, string, bool or void, optionally followed by '[]' or '[N]') was required here.",
};

pub const E0104_MISPLACED_STATEMENT: ErrorCode = ErrorCode {
    code: "E0104",
    message: "Misplaced statement",
    explanation: "A class body may only contain field declarations (starting with a type) \
                  and method declarations (starting with an access modifier). Statements belong inside methods.",
};

pub const E0105_EXPECTED_CLASS: ErrorCode = ErrorCode {
    code: "E0105",
    message: "Expected class declaration",
    explanation: "A namespace may only contain class declarations.",
};

pub const E0106_INVALID_PARAMETER: ErrorCode = ErrorCode {
    code: "E0106",
    message: "Invalid parameter",
    explanation: "Method parameters are comma-separated pairs of a type and a name, for example '(int a, string b)'.",
};

pub const E0107_INVALID_CASE_LABEL: ErrorCode = ErrorCode {
    code: "E0107",
    message: "Invalid case label",
    explanation: "Switch case labels must be number, string or character literals followed by ':'.",
};

pub const E0108_INVALID_INCREMENT: ErrorCode = ErrorCode {
    code: "E0108",
    message: "Invalid for-loop increment",
    explanation: "The increment clause of a for loop must be an assignment, a call, or a '++'/'--' on an identifier.",
};

pub const E0109_INVALID_IDENTIFIER_STATEMENT: ErrorCode = ErrorCode {
    code: "E0109",
    message: "Invalid statement after identifier",
    explanation: "A statement starting with an identifier must be an assignment ('x = e;' or 'x[i] = e;'), \
                  a call ('f(...);' or 'obj.m(...);') or an increment/decrement ('x++;').",
};

pub const E0110_MISSING_NAMESPACE: ErrorCode = ErrorCode {
    code: "E0110",
    message: "Missing namespace",
    explanation: "A source file consists of optional 'using' directives followed by exactly one namespace declaration.",
};

pub const E0111_TRAILING_INPUT: ErrorCode = ErrorCode {
    code: "E0111",
    message: "Trailing input",
    explanation: "Nothing may follow the closing '}' of the namespace declaration.",
};

pub const E0112_NESTING_TOO_DEEP: ErrorCode = ErrorCode {
    code: "E0112",
    message: "Nesting too deep",
    explanation: "Expressions and statements may be nested at most 64 levels deep. \
                  The over-deep part is skipped and replaced by a placeholder.",
};

// --- E02xx: Semantic Analysis Errors ---

pub const E0200_REDECLARATION: ErrorCode = ErrorCode {
    code: "E0200",
    message: "Symbol is already declared",
    explanation: "A name may shadow a declaration of an enclosing scope, but it cannot be declared twice in the same scope.",
};

pub const E0201_INVALID_TYPE: ErrorCode = ErrorCode {
    code: "E0201",
    message: "Invalid type",
    explanation: "Only int, float, string and bool are valid variable types. void is only valid as a method return type.",
};

pub const E0202_INVALID_ARRAY_SIZE: ErrorCode = ErrorCode {
    code: "E0202",
    message: "Invalid array size",
    explanation: "A fixed array size must be a positive integer, as in 'int[5]'.",
};

pub const E0203_INCOMPATIBLE_CONVERSION: ErrorCode = ErrorCode {
    code: "E0203",
    message: "Incompatible conversion",
    explanation: "Only identical types, int to float, and int/float/bool to string convert implicitly. \
                  Arrays additionally require the same dimension.",
};

pub const E0204_UNDECLARED_IDENTIFIER: ErrorCode = ErrorCode {
    code: "E0204",
    message: "Undeclared identifier",
    explanation: "The name is not declared in the current scope or any enclosing scope. \
                  Make sure it is declared before use and check for typos.",
};

pub const E0205_UNINITIALIZED_VARIABLE: ErrorCode = ErrorCode {
    code: "E0205",
    message: "Use of uninitialized variable",
    explanation: "A local variable must be assigned before its value is read. Parameters and foreach variables are always initialized.",
};

pub const E0206_INVALID_ARRAY_USE: ErrorCode = ErrorCode {
    code: "E0206",
    message: "Invalid array use",
    explanation: "Only arrays can be indexed, an array used as a scalar must be indexed, and an index must be an int.",
};

pub const E0207_NOT_A_VALUE: ErrorCode = ErrorCode {
    code: "E0207",
    message: "Not a value",
    explanation: "Method and class names cannot be used as values. Call a method with '(...)'.",
};

pub const E0208_INVALID_RETURN: ErrorCode = ErrorCode {
    code: "E0208",
    message: "Invalid return",
    explanation: "'return' is only valid inside a method. A void method cannot return a value, \
                  and a non-void method must return a value convertible to its return type.",
};

pub const E0209_BREAK_OUTSIDE_LOOP: ErrorCode = ErrorCode {
    code: "E0209",
    message: "`break` statement outside of a loop",
    explanation: "The `break` keyword can only be used inside while, do-while, for and foreach loops, \
                  or directly terminating a switch case.",
};

pub const E0210_UNDECLARED_METHOD: ErrorCode = ErrorCode {
    code: "E0210",
    message: "Undeclared method",
    explanation: "The called method (or the object it is called on) is not declared. Console.WriteLine is always available.",
};

pub const E0211_WRONG_ARGUMENT_COUNT: ErrorCode = ErrorCode {
    code: "E0211",
    message: "Incorrect number of arguments in method call",
    explanation: "The number of arguments in the call does not match the number of parameters of the method.",
};

pub const E0212_INVALID_CONDITION: ErrorCode = ErrorCode {
    code: "E0212",
    message: "Non-boolean condition",
    explanation: "Conditions of if, while, do-while and for must have type bool.",
};

pub const E0213_INVALID_OPERATION: ErrorCode = ErrorCode {
    code: "E0213",
    message: "Invalid operand types",
    explanation: "Arithmetic and relational operators need numeric operands ('+' also concatenates strings), \
                  logical operators need bool operands, and '!' needs a bool.",
};

pub const E0214_CASE_TYPE_MISMATCH: ErrorCode = ErrorCode {
    code: "E0214",
    message: "Case label type mismatch",
    explanation: "Each case label must be convertible to or from the type of the switch subject.",
};

pub const E0215_FOREACH_REQUIRES_ARRAY: ErrorCode = ErrorCode {
    code: "E0215",
    message: "foreach over a non-array",
    explanation: "The collection of a foreach loop must be an array whose element type converts to the loop variable type.",
};

pub const E0299_INTERNAL_ERROR: ErrorCode = ErrorCode {
    code: "E0299",
    message: "Internal analyzer error",
    explanation: "An unexpected fault occurred inside the semantic analyzer itself. \
                  This indicates a bug in the front end; please report it with the source that caused it.",
};

/// 所有错误码，按编号排列。
pub const ALL: &[&ErrorCode] = &[
    &E0000_UNRECOGNIZED_CHAR,
    &E0100_UNEXPECTED_TOKEN,
    &E0101_INVALID_STATEMENT,
    &E0102_EXPECTED_EXPRESSION,
    &E0103_EXPECTED_TYPE,
    &E0104_MISPLACED_STATEMENT,
    &E0105_EXPECTED_CLASS,
    &E0106_INVALID_PARAMETER,
    &E0107_INVALID_CASE_LABEL,
    &E0108_INVALID_INCREMENT,
    &E0109_INVALID_IDENTIFIER_STATEMENT,
    &E0110_MISSING_NAMESPACE,
    &E0111_TRAILING_INPUT,
    &E0112_NESTING_TOO_DEEP,
    &E0200_REDECLARATION,
    &E0201_INVALID_TYPE,
    &E0202_INVALID_ARRAY_SIZE,
    &E0203_INCOMPATIBLE_CONVERSION,
    &E0204_UNDECLARED_IDENTIFIER,
    &E0205_UNINITIALIZED_VARIABLE,
    &E0206_INVALID_ARRAY_USE,
    &E0207_NOT_A_VALUE,
    &E0208_INVALID_RETURN,
    &E0209_BREAK_OUTSIDE_LOOP,
    &E0210_UNDECLARED_METHOD,
    &E0211_WRONG_ARGUMENT_COUNT,
    &E0212_INVALID_CONDITION,
    &E0213_INVALID_OPERATION,
    &E0214_CASE_TYPE_MISMATCH,
    &E0215_FOREACH_REQUIRES_ARRAY,
    &E0299_INTERNAL_ERROR,
];

/// 按编号查找错误码，例如 `lookup("E0203")`。大小写不敏感。
pub fn lookup(code: &str) -> Option<&'static ErrorCode> {
    ALL.iter().copied().find(|error_code| error_code.code.eq_ignore_ascii_case(code))
}
