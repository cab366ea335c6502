// tests/pipeline.rs

use minisharp::lexer::TokenKind;
use minisharp::reporter::CompilerError;
use minisharp::{Options, Stage, check, compile};

fn program(body: &str) -> String {
    format!("namespace App {{ class Program {{ public void Main() {{\n{}\n}} }} }}", body)
}

fn messages(errors: &[CompilerError]) -> Vec<String> {
    errors.iter().map(|e| e.to_string()).collect()
}

#[test]
fn test_clean_program_passes_every_stage() {
    let source = "\
using System;
namespace Demo.App {
    class Program {
        private int Square(int n) { return n * n; }

        public void Main(string[] args) {
            int[5] values;
            for (int i = 0; i < 5; i++) {
                values[i] = Square(i);
            }
            foreach (int v in values) {
                Console.WriteLine(v);
            }
        }
    }
}
";
    let program = check(source, &Options::default()).unwrap();
    let namespace = program.namespace.unwrap();
    assert_eq!(namespace.kind.name, "Demo.App");
    assert_eq!(namespace.line, 2);
    assert_eq!(program.usings[0].kind, "System");
}

#[test]
fn test_errors_from_all_stages_in_order() {
    let source = program("int x = 1 @ 2;\nint y = ;\nstring s = 5 + true;");
    let errors = check(&source, &Options::default()).unwrap_err();

    assert!(matches!(errors[0], CompilerError::Lexical(_)));
    assert_eq!(errors[0].to_string(), "2: unrecognized character '@'");
    assert!(errors.iter().any(|e| matches!(e, CompilerError::Syntax(s) if s.line == 3)));

    let last = errors.last().unwrap();
    assert!(matches!(last, CompilerError::Semantic(_)));
    assert_eq!(last.to_string(), "4: operator '+' cannot be applied to 'int' and 'bool'");
}

#[test]
fn test_analysis_can_be_skipped_after_syntax_errors() {
    let source = program("int x = ;\nstring s = 5 + true;");

    let all = check(&source, &Options::default()).unwrap_err();
    assert_eq!(
        messages(&all),
        vec![
            "2: expected expression, found ';'".to_string(),
            "3: operator '+' cannot be applied to 'int' and 'bool'".to_string(),
        ]
    );

    let options = Options {
        analyze_with_syntax_errors: false,
        ..Options::default()
    };
    let syntax_only = check(&source, &options).unwrap_err();
    assert_eq!(messages(&syntax_only), vec!["2: expected expression, found ';'".to_string()]);
}

#[test]
fn test_stop_after_lexing() {
    let source = program("int x = 1 @ 2;");
    let options = Options {
        stop_after: Stage::Lex,
        ..Options::default()
    };
    let compilation = compile(&source, &options);

    assert_eq!(compilation.errors.len(), 1);
    assert!(compilation.tokens.iter().any(|t| t.kind == TokenKind::Unknown && t.lexeme == "@"));
    assert_eq!(compilation.tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    assert!(compilation.program.namespace.is_none());
}

#[test]
fn test_stop_after_parsing_ignores_semantic_errors() {
    let source = program("int x = \"text\";");
    let options = Options {
        stop_after: Stage::Parse,
        ..Options::default()
    };
    assert!(check(&source, &options).is_ok());

    let errors = check(&source, &Options::default()).unwrap_err();
    assert_eq!(messages(&errors), vec!["2: cannot convert 'string' to 'int'".to_string()]);
}

#[test]
fn test_semantic_errors_carry_scope_path() {
    let source = program("if (true) {\nint z;\nz = z + 1;\n}");
    let errors = check(&source, &Options::default()).unwrap_err();
    assert_eq!(errors.len(), 1);
    let CompilerError::Semantic(error) = &errors[0] else {
        panic!("expected a semantic error, got {:?}", errors[0]);
    };
    assert_eq!(error.line, 4);
    assert_eq!(error.scope, "App.Program.Main.block1.block2");
    assert_eq!(errors[0].code().code, "E0205");
}

#[test]
fn test_compile_keeps_tokens_and_tree_on_failure() {
    let source = program("undeclared = 1;");
    let compilation = compile(&source, &Options::default());
    assert!(!compilation.tokens.is_empty());
    assert!(compilation.program.namespace.is_some());
    assert_eq!(messages(&compilation.errors), vec!["2: identifier 'undeclared' is not declared".to_string()]);
}
