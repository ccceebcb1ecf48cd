//! Code builder utility for generating tab-indented Go source.

/// Fluent API for building Go code with proper indentation.
///
/// # Example
///
/// ```
/// use gantry_codegen::CodeBuilder;
///
/// let code = CodeBuilder::new()
///     .line("func main() {")
///     .indent()
///     .line("println(\"hello\")")
///     .dedent()
///     .line("}")
///     .build();
///
/// assert_eq!(code, "func main() {\n\tprintln(\"hello\")\n}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeBuilder {
    indent_level: usize,
    buffer: String,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line of code with current indentation.
    pub fn line(mut self, s: &str) -> Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add a blank line (no indentation).
    pub fn blank(mut self) -> Self {
        self.buffer.push('\n');
        self
    }

    /// Add a `// text` comment line.
    pub fn comment(mut self, text: &str) -> Self {
        self.write_indent();
        self.buffer.push_str("// ");
        self.buffer.push_str(text);
        self.buffer.push('\n');
        self
    }

    /// Increase indentation level.
    pub fn indent(mut self) -> Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level.
    pub fn dedent(mut self) -> Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a block with a closing line.
    ///
    /// # Example
    ///
    /// ```
    /// use gantry_codegen::CodeBuilder;
    ///
    /// let code = CodeBuilder::new()
    ///     .block("type User struct {", "}", |b| {
    ///         b.line("Id int64")
    ///     })
    ///     .build();
    /// ```
    pub fn block<F>(self, header: &str, close: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let builder = self.line(header).indent();
        f(builder).dedent().line(close)
    }

    /// Conditionally add content.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition { f(self) } else { self }
    }

    /// Iterate and add content for each item.
    pub fn each<T, I, F>(mut self, items: I, f: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(Self, T) -> Self,
    {
        for item in items {
            self = f(self, item);
        }
        self
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push('\t');
        }
    }
}
