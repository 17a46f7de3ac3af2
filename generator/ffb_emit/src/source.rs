//! Indentation-aware source text assembly.

/// Accumulates generated source lines with block indentation.
///
/// Four-space indent, one trailing newline per line, blocks opened and
/// closed in pairs. Output depends only on the call sequence.
pub(crate) struct SourceWriter {
    out: String,
    indent: usize,
}

impl SourceWriter {
    pub(crate) fn new() -> Self {
        SourceWriter {
            out: String::new(),
            indent: 0,
        }
    }

    pub(crate) fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Open a block: the header line followed by `{`.
    pub(crate) fn open(&mut self, header: &str) {
        self.line(&format!("{header} {{"));
        self.indent += 1;
    }

    pub(crate) fn close(&mut self) {
        debug_assert!(self.indent > 0);
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }

    pub(crate) fn finish(self) -> String {
        debug_assert_eq!(self.indent, 0);
        self.out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn blocks_nest_with_four_space_indent() {
        let mut writer = SourceWriter::new();
        writer.open("pub mod demo");
        writer.line("pub const X: u64 = 0;");
        writer.blank();
        writer.open("pub fn f()");
        writer.line("x();");
        writer.close();
        writer.close();
        assert_eq!(
            writer.finish(),
            "pub mod demo {\n    pub const X: u64 = 0;\n\n    pub fn f() {\n        x();\n    }\n}\n"
        );
    }
}
