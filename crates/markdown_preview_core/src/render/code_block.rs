//! Fenced code blocks, highlighted into `hljs` classed markup.

use pulldown_cmark::{CowStr, Event};

/// Language tag of a fenced code block, the first word of its info string.
pub(super) fn language_tag(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}

/// Events replacing a fenced code block.
///
/// Highlighting failures fall back to the escaped code in the same wrapper.
pub(super) fn code_block_events(lang: Option<&str>, code: String) -> Vec<Event<'static>> {
    if let Some(lang) = lang {
        match highlighter::highlighter().highlight_html(lang, &code) {
            Ok(highlighted) => {
                return vec![Event::Html(CowStr::from(format!(
                    "<pre class=\"hljs\"><code>{highlighted}</code></pre>\n"
                )))];
            }
            Err(err) => {
                tracing::debug!(lang, ?err, "Failed to highlight code block, rendering as text");
            }
        }
    }

    vec![
        Event::Html(CowStr::Borrowed("<pre class=\"hljs\"><code>")),
        Event::Text(CowStr::from(code)),
        Event::Html(CowStr::Borrowed("</code></pre>\n")),
    ]
}
