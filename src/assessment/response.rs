use std::fmt;

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// What the model call returned, before any cleanup.
///
/// Downstream code only consumes the `Display` form:
/// `content=<escaped content> name=<name|None> model=<id> ...`, with
/// backslashes and control whitespace in the content backslash-escaped so the
/// whole representation stays on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawModelResponse {
    pub content: String,
    /// Author name attached to the message, if the provider set one
    pub name: Option<String>,
    pub model: String,
    pub usage: Option<Usage>,
}

impl fmt::Display for RawModelResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "content={} name={} model={}",
            escape_content(&self.content),
            self.name.as_deref().unwrap_or("None"),
            self.model
        )?;
        if let Some(usage) = self.usage {
            write!(
                f,
                " prompt_tokens={} completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            )?;
        }
        Ok(())
    }
}

fn escape_content(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}
