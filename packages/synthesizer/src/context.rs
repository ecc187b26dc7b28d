/// Indentation-aware text buffer used while emitting the document
pub(crate) struct DocumentContext {
    buffer: String,
    indent_level: usize,
}

impl DocumentContext {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
        }
    }

    /// Add each line of `text` at the current indentation
    pub fn add_line(&mut self, text: &str) {
        if text.is_empty() {
            self.buffer.push('\n');
        }
        for line in text.lines() {
            if !line.is_empty() {
                self.buffer.push_str(&"  ".repeat(self.indent_level));
                self.buffer.push_str(line);
            }
            self.buffer.push('\n');
        }
    }

    /// Add text exactly as given, with no indentation applied
    pub fn add_verbatim(&mut self, text: &str) {
        self.buffer.push_str(text);
        if !text.ends_with('\n') {
            self.buffer.push('\n');
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn into_output(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation() {
        let mut ctx = DocumentContext::new();
        ctx.add_line("a {");
        ctx.indent();
        ctx.add_line("b;\nc;");
        ctx.dedent();
        ctx.dedent();
        ctx.add_line("}");

        assert_eq!(ctx.into_output(), "a {\n  b;\n  c;\n}\n");
    }

    #[test]
    fn test_verbatim_ignores_indentation() {
        let mut ctx = DocumentContext::new();
        ctx.indent();
        ctx.add_verbatim("  keep\nas is");
        ctx.add_line("");
        ctx.add_line("!");

        assert_eq!(ctx.into_output(), "  keep\nas is\n\n  !\n");
    }
}
