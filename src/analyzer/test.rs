// src/analyzer/test.rs

use super::types::{self, BaseType, Dimension, SemanticType, TypeError};
use super::symbols::GLOBAL_SCOPE;
use super::{Analyzer, SymbolKind, analyze};
use crate::lexer::{self, lexical_errors};
use crate::parser::ast::*;
use crate::parser::parse;
use crate::reporter::{SemanticError, SemanticErrorKind};

// 一个通用的设置函数，负责词法和语法分析。
// 测试的“前置条件”：词法和语法分析必须完全正确。
fn setup(src: &str) -> Program {
    let tokens = lexer::tokenize(src);
    let lex_errors = lexical_errors(&tokens);
    assert!(lex_errors.is_empty(), "Test setup failed (lexical errors): {:?}", lex_errors);

    let (program, parse_errors) = parse(&tokens);
    assert!(parse_errors.is_empty(), "Test setup failed (parsing errors): {:?}", parse_errors);
    program
}

/// 把方法体包装成完整的程序，方法体从第 2 行开始。
fn in_main(body: &str) -> String {
    format!("namespace App {{ class Program {{ public void Main() {{\n{}\n}} }} }}", body)
}

/// 辅助函数：用于测试应该成功通过分析的代码。
fn analyze_ok(src: &str) {
    let errors = analyze(&setup(src));
    assert!(errors.is_empty(), "Analysis failed unexpectedly: {:?}", errors);
}

/// 辅助函数：用于测试应该产生语义错误的代码。
fn analyze_err(src: &str) -> Vec<SemanticError> {
    let errors = analyze(&setup(src));
    assert!(!errors.is_empty(), "Analysis succeeded unexpectedly for: {}", src);
    errors
}

/// 只产生一个错误，并返回它。
fn single_error(src: &str) -> SemanticError {
    let mut errors = analyze_err(src);
    assert_eq!(errors.len(), 1, "expected exactly one error: {:?}", errors);
    errors.remove(0)
}

// --- 类型模型 ---

#[test]
fn test_type_parsing() {
    assert_eq!(SemanticType::parse("int"), Ok(SemanticType::INT));
    assert_eq!(SemanticType::parse("float[]"), Ok(SemanticType::array(BaseType::Float, 0)));

    let fixed = SemanticType::parse("string[8]").unwrap();
    assert_eq!(fixed.dimension, Dimension::Array);
    assert_eq!(fixed.size, 8);
    assert_eq!(fixed.to_string(), "string[8]");

    assert_eq!(
        SemanticType::parse("int[0]"),
        Err(TypeError::InvalidSize(SemanticType::array(BaseType::Int, 0)))
    );
    assert_eq!(SemanticType::parse("char"), Err(TypeError::UnknownBase));
}

#[test]
fn test_implicit_conversions() {
    use SemanticType as T;
    assert!(T::INT.converts_to(T::FLOAT));
    assert!(T::INT.converts_to(T::STRING));
    assert!(T::FLOAT.converts_to(T::STRING));
    assert!(T::BOOL.converts_to(T::STRING));
    assert!(!T::FLOAT.converts_to(T::INT));
    assert!(!T::STRING.converts_to(T::INT));
    assert!(!T::BOOL.converts_to(T::INT));

    let ints = T::array(BaseType::Int, 3);
    let floats = T::array(BaseType::Float, 0);
    assert!(ints.converts_to(floats));
    assert!(!floats.converts_to(ints));
    assert!(!ints.converts_to(T::INT));
}

#[test]
fn test_operator_typing() {
    use SemanticType as T;
    assert_eq!(types::binary_result(BinaryOperator::Add, T::INT, T::INT), Some(T::INT));
    assert_eq!(types::binary_result(BinaryOperator::Multiply, T::INT, T::FLOAT), Some(T::FLOAT));
    assert_eq!(types::binary_result(BinaryOperator::Add, T::INT, T::STRING), Some(T::STRING));
    assert_eq!(types::binary_result(BinaryOperator::Add, T::STRING, T::BOOL), Some(T::STRING));
    assert_eq!(types::binary_result(BinaryOperator::Subtract, T::STRING, T::INT), None);
    assert_eq!(types::binary_result(BinaryOperator::Less, T::INT, T::FLOAT), Some(T::BOOL));
    assert_eq!(types::binary_result(BinaryOperator::Less, T::BOOL, T::INT), None);
    assert_eq!(types::binary_result(BinaryOperator::And, T::BOOL, T::BOOL), Some(T::BOOL));
    assert_eq!(types::binary_result(BinaryOperator::Or, T::BOOL, T::INT), None);
    assert_eq!(types::binary_result(BinaryOperator::Equal, T::STRING, T::INT), Some(T::BOOL));
    assert_eq!(types::binary_result(BinaryOperator::NotEqual, T::BOOL, T::FLOAT), None);

    assert_eq!(types::unary_result(UnaryOperator::Not, T::BOOL), Some(T::BOOL));
    assert_eq!(types::unary_result(UnaryOperator::Negate, T::FLOAT), Some(T::FLOAT));
    assert_eq!(types::unary_result(UnaryOperator::Increment, T::STRING), None);
}

// --- 成功路径测试 (Happy Path) ---

#[test]
fn test_well_typed_program() {
    let source = r#"
using System;
namespace App
{
    public class Program
    {
        int counter = 0;
        float[3] weights;

        public int Add(int a, int b)
        {
            return a + b;
        }

        public void Main()
        {
            float total = 1;
            string label = "n = " + counter;
            int[5] values;
            values[0] = Add(1, 2);
            for (int i = 0; i < 5; i++)
            {
                values[i] = i * 2;
            }
            foreach (float v in values)
            {
                total = total + v;
            }
            while (total > 10.5)
            {
                total--;
                if (total < 3) break;
            }
            do { counter++; } while (counter < 3 && !false);
            switch (counter)
            {
                case 1: label = "one"; break;
                case 2:
                case 3: Console.WriteLine(label); break;
                default: break;
            }
            Console.WriteLine("total: " + total);
        }
    }
}
"#;
    analyze_ok(source);
}

#[test]
fn test_int_to_float_initializer_is_allowed() {
    analyze_ok(&in_main("int i = 3; float f = i; string s = f;"));
}

#[test]
fn test_shadowing_in_nested_block_is_allowed() {
    analyze_ok(&in_main("int x = 1; { int x = 2; x = 3; } x = 4;"));
}

#[test]
fn test_method_can_call_later_sibling() {
    analyze_ok(
        "namespace N { class C {
            public void First() { Second(1); }
            public void Second(int n) { }
        } }",
    );
}

#[test]
fn test_array_assignment_and_argument() {
    analyze_ok(
        "namespace N { class C {
            int Sum(int[] items) { return 0; }
            public void Run() {
                int[4] a;
                a[0] = 1;
                int[] b = a;
                b = a;
                int total = Sum(a);
            }
        } }",
    );
}

#[test]
fn test_break_inside_case_is_absorbed_by_switch() {
    analyze_ok(&in_main("int x = 1; switch (x) { case 1: x = 2; break; default: break; }"));
}

// --- 失败路径测试 (Error Path) ---

#[test]
fn test_incompatible_assignment() {
    let error = single_error(&in_main("int x;\nx = \"s\";"));
    assert_eq!(error.line, 3);
    assert_eq!(
        error.kind,
        SemanticErrorKind::IncompatibleConversion {
            from: "string".to_string(),
            to: "int".to_string()
        }
    );
    assert_eq!(error.to_string(), "3: cannot convert 'string' to 'int'");
}

#[test]
fn test_redeclaration_in_same_scope() {
    let error = single_error(&in_main("int x = 1;\nint x = 2;"));
    assert_eq!(error.kind, SemanticErrorKind::Redeclaration { name: "x".to_string() });
    assert_eq!(error.line, 3);
    assert_eq!(error.scope, "App.Program.Main.block1");
}

#[test]
fn test_break_outside_loop() {
    let error = single_error(&in_main("break;"));
    assert_eq!(error.kind, SemanticErrorKind::BreakOutsideLoop);

    analyze_ok(&in_main("while (true) { break; }"));
}

#[test]
fn test_break_nested_in_case_needs_a_loop() {
    let error = single_error(&in_main("int x = 1;\nswitch (x) { case 1: if (x > 0) { break; } }"));
    assert_eq!(error.kind, SemanticErrorKind::BreakOutsideLoop);
}

#[test]
fn test_undeclared_and_uninitialized() {
    let errors = analyze_err(&in_main("int a;\nint b = a + c;"));
    let kinds: Vec<_> = errors.iter().map(|e| &e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &SemanticErrorKind::UninitializedVariable { name: "a".to_string() },
            &SemanticErrorKind::UndeclaredIdentifier { name: "c".to_string() },
        ]
    );
}

#[test]
fn test_initializer_cannot_see_its_own_name() {
    let error = single_error(&in_main("int x = x;"));
    assert_eq!(error.kind, SemanticErrorKind::UndeclaredIdentifier { name: "x".to_string() });
}

#[test]
fn test_parameters_are_initialized() {
    analyze_ok("namespace N { class C { int Twice(int n) { return n * 2; } } }");
}

#[test]
fn test_array_misuse() {
    let errors = analyze_err(&in_main(
        "int n = 1;\nint[3] a;\na[0] = 0;\nn[0] = 1;\nint m = a + 1;\na[true] = 2;",
    ));
    let kinds: Vec<_> = errors.iter().map(|e| (e.line, &e.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (5, &SemanticErrorKind::NotAnArray { name: "n".to_string() }),
            (6, &SemanticErrorKind::ArrayWithoutIndex { name: "a".to_string() }),
            (
                7,
                &SemanticErrorKind::NonIntegerIndex {
                    name: "a".to_string(),
                    found: "bool".to_string()
                }
            ),
        ]
    );
}

#[test]
fn test_invalid_array_size_and_void_variable() {
    let errors = analyze_err(&in_main("int[0] a;\nvoid v;"));
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].kind, SemanticErrorKind::InvalidArraySize { name: "int[0]".to_string() });
    assert_eq!(errors[1].kind, SemanticErrorKind::InvalidType { name: "void".to_string() });
}

#[test]
fn test_return_rules() {
    let error = single_error("namespace N { class C { void M() { return 1; } } }");
    assert_eq!(error.kind, SemanticErrorKind::VoidMethodReturnsValue { method: "M".to_string() });

    let error = single_error("namespace N { class C { int M() { return; } } }");
    assert_eq!(
        error.kind,
        SemanticErrorKind::MissingReturnValue {
            method: "M".to_string(),
            expected: "int".to_string()
        }
    );

    let error = single_error("namespace N { class C { int M() { return \"s\"; } } }");
    assert!(matches!(error.kind, SemanticErrorKind::IncompatibleConversion { .. }));

    analyze_ok("namespace N { class C { float M() { return 1; } } }");
}

#[test]
fn test_return_outside_method() {
    // 语法上无法写出方法之外的 return，直接手工构造 AST
    let stray = Node::new(Statement::Return(None), 4);
    let class = Class {
        name: "C".to_string(),
        access: AccessModifier::Public,
        fields: Vec::new(),
        methods: Vec::new(),
    };
    let program = Program {
        usings: Vec::new(),
        namespace: Some(Node::new(
            Namespace {
                name: "N".to_string(),
                classes: vec![Node::new(class, 2)],
            },
            1,
        )),
        line: 1,
    };

    let mut analyzer = Analyzer::new();
    analyzer.analyze_program(&program);
    let ctx = super::AnalysisContext::new("N");
    analyzer.visit(&stray, ctx);

    let errors = analyzer.finish();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SemanticErrorKind::ReturnOutsideMethod);
    assert_eq!(errors[0].line, 4);
    assert_eq!(errors[0].scope, "global");
}

#[test]
fn test_conditions_must_be_bool() {
    let errors = analyze_err(&in_main(
        "int x = 1;\nif (x) { }\nwhile (\"s\") { }\nfor (int i = 0; i; i++) { }\ndo { } while (1.5);",
    ));
    let constructs: Vec<_> = errors
        .iter()
        .map(|e| match &e.kind {
            SemanticErrorKind::InvalidCondition { construct, .. } => construct.as_str(),
            other => panic!("unexpected error {:?}", other),
        })
        .collect();
    assert_eq!(constructs, vec!["if", "while", "for", "do-while"]);
}

#[test]
fn test_invalid_operations() {
    let errors = analyze_err(&in_main("bool b = !5;\nint n = \"a\" - 1;\nbool c = true < false;"));
    assert_eq!(errors.len(), 3);
    assert!(matches!(errors[0].kind, SemanticErrorKind::InvalidUnaryOperation { .. }));
    assert_eq!(
        errors[1].kind,
        SemanticErrorKind::InvalidBinaryOperation {
            operator: "-".to_string(),
            left: "string".to_string(),
            right: "int".to_string()
        }
    );
    assert!(matches!(errors[2].kind, SemanticErrorKind::InvalidBinaryOperation { .. }));
}

#[test]
fn test_string_concatenation_types_as_string() {
    analyze_ok(&in_main("string s = 1 + \"a\";\ns = \"b\" + true;\ns = s + 2.5;"));
    let error = single_error(&in_main("int n = 1 + \"a\";"));
    assert!(matches!(error.kind, SemanticErrorKind::IncompatibleConversion { .. }));
}

#[test]
fn test_method_call_checks() {
    let source = "namespace N { class C {
        int Add(int a, int b) { return a + b; }
        public void Main() {
            int x = Add(1);
            Missing();
            ghost.Run();
            Console.WriteLine(x);
        }
    } }";
    let errors = analyze_err(source);
    let kinds: Vec<_> = errors.iter().map(|e| &e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &SemanticErrorKind::ArgumentCountMismatch {
                name: "Add".to_string(),
                expected: 2,
                found: 1
            },
            &SemanticErrorKind::UndeclaredMethod { name: "Missing".to_string() },
            &SemanticErrorKind::UndeclaredObject { name: "ghost".to_string() },
        ]
    );
}

#[test]
fn test_call_arguments_are_still_checked() {
    let error = single_error(&in_main("Console.WriteLine(unknown);"));
    assert_eq!(error.kind, SemanticErrorKind::UndeclaredIdentifier { name: "unknown".to_string() });
}

#[test]
fn test_method_name_is_not_a_value() {
    let error = single_error(
        "namespace N { class C { int Get() { return 1; } public void Main() { int x = Get; } } }",
    );
    assert_eq!(
        error.kind,
        SemanticErrorKind::NotAValue {
            name: "Get".to_string(),
            what: "method".to_string()
        }
    );
}

#[test]
fn test_foreach_rules() {
    let error = single_error(&in_main("int n = 3;\nforeach (int v in n) { }"));
    assert_eq!(error.kind, SemanticErrorKind::ForeachRequiresArray { found: "int".to_string() });

    let error = single_error(&in_main("string[2] names;\nnames[0] = \"a\";\nforeach (int v in names) { }"));
    assert_eq!(
        error.kind,
        SemanticErrorKind::IncompatibleConversion {
            from: "string".to_string(),
            to: "int".to_string()
        }
    );
}

#[test]
fn test_switch_case_type_mismatch() {
    let error = single_error(&in_main("bool b = true;\nswitch (b) {\ncase 1: break;\n}"));
    assert_eq!(error.line, 4);
    assert_eq!(
        error.kind,
        SemanticErrorKind::CaseTypeMismatch {
            label: "int".to_string(),
            subject: "bool".to_string()
        }
    );

    // 两个方向任意一个能转换即可
    analyze_ok(&in_main("float f = 1.5;\nswitch (f) { case 1: break; }"));
    analyze_ok(&in_main("int n = 1;\nswitch (n) { case \"x\": break; }"));
}

#[test]
fn test_duplicate_class_and_members() {
    let errors = analyze_err(
        "namespace N {
            class A { int x; int x; void M() { } void M() { } }
            class A { }
        }",
    );
    let names: Vec<_> = errors
        .iter()
        .map(|e| match &e.kind {
            SemanticErrorKind::Redeclaration { name } => name.as_str(),
            other => panic!("unexpected error {:?}", other),
        })
        .collect();
    assert_eq!(names, vec!["M", "x", "A"]);
}

#[test]
fn test_scope_paths_in_errors() {
    let source = "namespace App { class Program { public void Main() {
        for (int i = 0; i < 2; i++) {
            bad1 = 1;
        }
        foreach (int v in nums) { }
    } } }";
    let errors = analyze_err(source);
    assert_eq!(errors[0].scope, "App.Program.Main.block1.for2.block2");
    assert_eq!(errors[1].scope, "App.Program.Main.block1");
}

#[test]
fn test_scopes_are_unwound_after_analysis() {
    let program = setup(&in_main("{ { int deep = 1; } }"));
    let mut analyzer = Analyzer::new();
    analyzer.analyze_program(&program);

    assert_eq!(analyzer.symbols.current_path(), GLOBAL_SCOPE);
    let class = analyzer.symbols.lookup("Program").expect("class symbol");
    assert_eq!(class.kind, SymbolKind::Class);
    assert!(analyzer.symbols.lookup("deep").is_none());
    assert!(analyzer.finish().is_empty());
}

#[test]
fn test_placeholder_does_not_cascade() {
    let tokens = lexer::tokenize(&in_main("int x = ;\nx = x + 1;"));
    let (program, syntax_errors) = parse(&tokens);
    assert_eq!(syntax_errors.len(), 1);
    assert!(analyze(&program).is_empty());
}
