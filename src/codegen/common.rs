//! Common utilities for code generation
//!
//! Provides shared functionality for emitting target source text:
//! - Indentation management
//! - Literal formatting helpers

/// Options for code generation
#[derive(Debug, Clone)]
pub struct CodeGenOptions {
    /// Indent size (number of spaces)
    pub indent_size: usize,
    /// Use tabs instead of spaces
    pub use_tabs: bool,
    /// Indentation level of generated members inside the enclosing class
    pub member_indent: usize,
    /// Generate comments
    pub emit_comments: bool,
}

impl Default for CodeGenOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            use_tabs: false,
            member_indent: 1,
            emit_comments: false,
        }
    }
}

/// Helper for managing indentation in generated code
#[derive(Debug)]
pub struct IndentWriter {
    output: String,
    indent_level: usize,
    options: CodeGenOptions,
}

impl IndentWriter {
    pub fn new() -> Self {
        Self::with_options(CodeGenOptions::default())
    }

    pub fn with_options(options: CodeGenOptions) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            options,
        }
    }

    /// Get the current output
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Take ownership of the output
    pub fn into_output(self) -> String {
        self.output
    }

    pub fn options(&self) -> &CodeGenOptions {
        &self.options
    }

    /// Increase indentation level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation level
    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Write raw string without indentation
    pub fn write_raw(&mut self, s: &str) {
        self.output.push_str(s);
    }

    /// Write a line with current indentation
    pub fn writeln(&mut self, s: &str) {
        if !s.is_empty() {
            self.write_indent();
        }
        self.output.push_str(s);
        self.output.push('\n');
    }

    /// Write an empty line
    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        if self.options.use_tabs {
            for _ in 0..self.indent_level {
                self.output.push('\t');
            }
        } else {
            let width = self.indent_level * self.options.indent_size;
            self.output.extend(std::iter::repeat(' ').take(width));
        }
    }

    /// Write a comment (language-specific prefix should be included)
    pub fn write_comment(&mut self, comment: &str) {
        if self.options.emit_comments {
            self.writeln(comment);
        }
    }

    /// Write `header`, the indented body, then `footer` at the outer level.
    pub fn write_block<F>(&mut self, header: &str, footer: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.writeln(header);
        self.indent();
        f(self);
        self.dedent();
        self.writeln(footer);
    }
}

impl Default for IndentWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Comma-separated integer list without spaces, as used in array literals.
pub fn join_ints<I, T>(values: I) -> String
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
