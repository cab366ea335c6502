use super::*;
use crate::reporter::{LexicalError, SemanticError, SemanticErrorKind, SyntaxError, SyntaxErrorKind};

const SOURCE: &str = "namespace N {\n  int x = \"s\";\n}\n";

fn sample_errors() -> Vec<CompilerError> {
    vec![
        LexicalError {
            lexeme: "#".to_string(),
            line: 1,
        }
        .into(),
        SyntaxError {
            kind: SyntaxErrorKind::ExpectedClass {
                found: "'int'".to_string(),
            },
            line: 2,
        }
        .into(),
        SemanticError {
            kind: SemanticErrorKind::IncompatibleConversion {
                from: "string".to_string(),
                to: "int".to_string(),
            },
            line: 2,
            scope: "N.C.M.block4".to_string(),
        }
        .into(),
    ]
}

#[test]
fn test_codes_follow_stage_prefixes() {
    let codes: Vec<_> = sample_errors().iter().map(|e| e.code().code).collect();
    assert_eq!(codes, vec!["E0000", "E0105", "E0203"]);
}

#[test]
fn test_lookup_error_code_explanation() {
    let code = codes::lookup("e0203").expect("known code");
    assert_eq!(code, &codes::E0203_INCOMPATIBLE_CONVERSION);
    assert!(!code.explanation.is_empty());
    assert_eq!(codes::lookup("E0112").map(|c| c.code), Some("E0112"));
    assert!(codes::lookup("E9999").is_none());

    let mut all: Vec<_> = codes::ALL.iter().map(|c| c.code).collect();
    let count = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), count, "error codes must be unique");
    assert!(codes::ALL.iter().all(|c| !c.explanation.is_empty()));
}

#[test]
fn test_render_plain_matches_error_display() {
    let errors = sample_errors();
    let mut bag = DiagnosticBag::new(SOURCE);
    bag.extend(&errors);

    assert_eq!(bag.len(), 3);
    assert!(!bag.is_empty());

    let expected: String = errors.iter().map(|e| format!("{}\n", e)).collect();
    assert_eq!(bag.render_plain(), expected);
    assert_eq!(
        bag.render_plain().lines().last(),
        Some("2: cannot convert 'string' to 'int'")
    );
}

#[test]
fn test_primary_label_covers_the_error_line() {
    let index = LineIndex::new(SOURCE);
    let error = sample_errors().remove(2);
    let diagnostic = Diagnostic::from_error(&error, &index);

    assert_eq!(diagnostic.code(), "E0203");
    assert_eq!(diagnostic.line(), 2);
    assert_eq!(diagnostic.message(), "cannot convert 'string' to 'int'");
    let span = diagnostic.label.span;
    assert_eq!(&SOURCE[span.into_range()], "  int x = \"s\";");
    assert_eq!(diagnostic.notes, vec!["in scope `N.C.M.block4`".to_string()]);
}

#[test]
fn test_ariadne_report_without_color() {
    let mut bag = DiagnosticBag::new(SOURCE);
    bag.extend(&sample_errors());

    let mut out = Vec::new();
    bag.write_reports("main.cs", false, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("E0203"), "{}", text);
    assert!(text.contains("cannot convert 'string' to 'int'"));
    assert!(text.contains("unrecognized character '#'"));
    assert!(text.contains("main.cs"));
    assert!(text.contains("in scope `N.C.M.block4`"));
    // 关闭颜色时不应出现 ANSI 转义序列
    assert!(!text.contains('\u{1b}'));
}

#[test]
fn test_empty_bag() {
    let bag = DiagnosticBag::new("");
    assert!(bag.is_empty());
    assert_eq!(bag.render_plain(), "");

    let mut out = Vec::new();
    bag.write_reports("empty.cs", false, &mut out).unwrap();
    assert!(out.is_empty());
}
