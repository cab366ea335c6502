use std::ops::Range;

/// 代表源代码中的一个位置范围，包含起始和结束的字节索引。
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn into_range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// 行号索引：记录每一行在源代码中的起始字节位置。
///
/// 所有阶段的错误只携带行号（从 1 开始），渲染诊断信息时
/// 需要把行号映射回字节范围，这就是 `LineIndex` 的用途。
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// `line_starts[i]` 是第 `i + 1` 行的起始字节偏移。
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// 源代码的总行数（空源代码也算一行）。
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 返回第 `line` 行的字节范围（不含换行符）。
    ///
    /// 超出范围的行号会被钳制到最后一行，因此总能得到一个合法的范围。
    pub fn line_span(&self, line: usize) -> Span {
        let index = line.clamp(1, self.line_count()) - 1;
        let start = self.line_starts[index];
        let end = self
            .line_starts
            .get(index + 1)
            .map(|next| next - 1)
            .unwrap_or(self.len);
        Span::new(start, end.max(start))
    }
}
