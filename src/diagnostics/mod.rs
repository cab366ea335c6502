pub mod codes;

#[cfg(test)]
mod test;

use crate::reporter::CompilerError;
use crate::utils::{LineIndex, Span};
use ariadne::{Color, Config, IndexType, Label as AriadneLabel, Report, ReportKind, Source};
use codes::ErrorCode;
use std::io::{self, Write};

#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

// --- Diagnostic：一条可渲染的诊断信息 ---

#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: &'static str,
    // 默认取自 ErrorCode，通常会被具体的错误描述覆盖
    message: String,
    line: usize,
    label: Label,
    notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(error_code: &'static ErrorCode, line: usize, primary_label: Label) -> Self {
        Self {
            code: error_code.code,
            message: error_code.message.to_string(),
            line,
            label: primary_label,
            notes: Vec::new(),
        }
    }

    /// 把任意阶段的错误记录转换成诊断信息。
    /// 错误只携带行号，所以主标签覆盖的是整行源代码。
    pub fn from_error(error: &CompilerError, line_index: &LineIndex) -> Self {
        let code = error.code();
        let span = line_index.line_span(error.line());
        let mut diagnostic =
            Self::new(code, error.line(), Label::new(span, code.message)).with_dynamic_message(error.message());
        if let CompilerError::Semantic(semantic) = error {
            diagnostic = diagnostic.with_note(format!("in scope `{}`", semantic.scope));
        }
        diagnostic
    }

    #[must_use]
    pub fn with_dynamic_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn code(&self) -> &str {
        self.code
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// --- DiagnosticBag：收集一个源文件的全部诊断 ---

#[derive(Debug)]
pub struct DiagnosticBag {
    source: String,
    line_index: LineIndex,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            line_index: LineIndex::new(source),
            diagnostics: Vec::new(),
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn report_error(&mut self, error: &CompilerError) {
        let diagnostic = Diagnostic::from_error(error, &self.line_index);
        self.report(diagnostic);
    }

    pub fn extend<'e>(&mut self, errors: impl IntoIterator<Item = &'e CompilerError>) {
        for error in errors {
            self.report_error(error);
        }
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 纯文本渲染，每条诊断一行，格式为 `"<line>: <message>"`。
    pub fn render_plain(&self) -> String {
        self.diagnostics
            .iter()
            .map(|d| format!("{}: {}\n", d.line, d.message))
            .collect()
    }

    /// 使用 ariadne 渲染带源代码片段的报告，写入任意 writer。
    pub fn write_reports<W: Write>(&self, file_name: &str, color: bool, mut writer: W) -> io::Result<()> {
        for diag in &self.diagnostics {
            let report = build_report(file_name, diag, color);
            report.write((file_name, Source::from(self.source.as_str())), &mut writer)?;
        }
        Ok(())
    }

    /// 把所有报告打印到 stderr。
    pub fn eprint(&self, file_name: &str, color: bool) -> io::Result<()> {
        self.write_reports(file_name, color, io::stderr().lock())
    }
}

// --- 打印逻辑 ---

fn build_report<'a>(
    file_name: &'a str,
    diag: &Diagnostic,
    color: bool,
) -> Report<'a, (&'a str, std::ops::Range<usize>)> {
    let span = diag.label.span.into_range();
    let mut report = Report::build(ReportKind::Error, (file_name, span.clone()))
        // Span 记录的是字节偏移
        .with_config(Config::default().with_color(color).with_index_type(IndexType::Byte))
        .with_message(&diag.message)
        .with_code(diag.code);

    report.add_label(
        AriadneLabel::new((file_name, span))
            .with_message(&diag.label.message)
            .with_color(Color::Red),
    );

    for note in &diag.notes {
        report = report.with_note(note);
    }

    report.finish()
}
