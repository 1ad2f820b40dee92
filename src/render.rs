use std::fmt;

const CONTENT_PREFIX: &str = "content=";
const METADATA_MARKER: &str = "name=None";

/// Cleaned assessment text, ready to show as markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentResult(String);

impl AssessmentResult {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssessmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Clean the textual form of a model response for display.
///
/// 1. drop one leading `content=`
/// 2. cut everything from the first `name=None` to the end, along with the
///    single space separating it from the content
/// 3. decode backslash escapes
pub fn render(raw: impl fmt::Display) -> AssessmentResult {
    let text = raw.to_string();
    let text = text.strip_prefix(CONTENT_PREFIX).unwrap_or(&text);
    let text = match text.find(METADATA_MARKER) {
        Some(idx) => {
            let head = &text[..idx];
            head.strip_suffix(' ').unwrap_or(head)
        }
        None => text,
    };
    AssessmentResult(unescape(text))
}

/// Decode backslash escape sequences.
///
/// Handles `\n \r \t \\ \' \" \a \b \f \v`, octal `\o` to `\ooo`, `\xHH`,
/// `\uHHHH`, `\UHHHHHHHH` and a backslash-newline continuation. Unknown or
/// malformed sequences and a trailing lone backslash are kept verbatim.
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(&next) = chars.peek() else {
            out.push('\\');
            break;
        };
        let simple = match next {
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'v' => Some('\u{0B}'),
            _ => None,
        };
        if let Some(decoded) = simple {
            chars.next();
            out.push(decoded);
            continue;
        }

        if next.is_digit(8) {
            let mut value = 0;
            for _ in 0..3 {
                match chars.peek().and_then(|d| d.to_digit(8)) {
                    Some(digit) => {
                        value = value * 8 + digit;
                        chars.next();
                    }
                    None => break,
                }
            }
            // at most 0o777, always a valid char
            out.extend(char::from_u32(value));
            continue;
        }

        let width = match next {
            'x' => 2,
            'u' => 4,
            'U' => 8,
            '\n' => {
                chars.next();
                continue;
            }
            _ => {
                out.push('\\');
                continue;
            }
        };

        let digits: String = chars.clone().skip(1).take(width).collect();
        let decoded = (digits.len() == width && digits.chars().all(|d| d.is_ascii_hexdigit()))
            .then(|| u32::from_str_radix(&digits, 16).ok())
            .flatten()
            .and_then(char::from_u32);
        match decoded {
            Some(ch) => {
                for _ in 0..=width {
                    chars.next();
                }
                out.push(ch);
            }
            None => out.push('\\'),
        }
    }

    out
}
