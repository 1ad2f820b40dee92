use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

use crate::render::AssessmentResult;

const TITLE: &str = "GitHub Technical Skill Assessment";

/// What to show below the form.
pub enum Outcome<'a> {
    Empty,
    Assessment(&'a AssessmentResult),
    Error(String),
}

/// Render the single page: title, username form, then the result or error banner.
pub fn render_page(username: &str, outcome: Outcome<'_>) -> String {
    let body = match outcome {
        Outcome::Empty => String::new(),
        Outcome::Assessment(result) => format!(
            "<h2>Technical Skill Assessment</h2>\n<article class=\"assessment\">\n{}</article>\n",
            markdown_to_html(result.as_str())
        ),
        Outcome::Error(message) => format!(
            "<div class=\"error\" role=\"alert\">Error: {}</div>\n",
            escape_html(&message)
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{TITLE}</title>
<style>
body {{ font-family: sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; line-height: 1.5; }}
input[type=text] {{ width: 100%; padding: 0.5rem; font-size: 1rem; box-sizing: border-box; }}
.error {{ background: #fdecea; color: #611a15; padding: 0.75rem 1rem; border-radius: 4px; margin-top: 1rem; }}
</style>
</head>
<body>
<h1>{TITLE}</h1>
<form method="get" action="/">
<label for="username">Enter GitHub username</label>
<input type="text" id="username" name="username" value="{value}" autocomplete="off" onchange="this.form.submit()">
</form>
{body}</body>
</html>
"#,
        value = escape_html(username),
    )
}

/// Markdown to HTML; raw HTML in the source is shown as text, never injected,
/// and link or image targets outside http(s), mailto, fragments and
/// absolute paths are blanked.
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    const ALLOWED: [&str; 5] = ["http:", "https:", "mailto:", "#", "/"];
    let lowered = url.trim_start().to_ascii_lowercase();
    if ALLOWED.iter().any(|prefix| lowered.starts_with(prefix)) {
        url
    } else {
        CowStr::Borrowed("")
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
