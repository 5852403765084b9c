//! Markdown to HTML rendering.
//!
//! - GitHub Flavored Markdown (tables, strikethrough, task lists)
//! - Heading ids for anchor links
//! - Fenced code blocks highlighted with `hljs-` prefixed classes

mod code_block;
mod heading;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

pub use heading::slugify;

/// Options for rendering markdown to HTML.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Enable GitHub Flavored Markdown tables
    pub enable_tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub enable_strikethrough: bool,
    /// Enable task list items ([x] and [ ])
    pub enable_tasklists: bool,
    /// Enable heading attributes ({#id .class})
    pub enable_heading_attributes: bool,
    /// Highlight fenced code blocks
    pub highlight_code: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            enable_tables: true,
            enable_strikethrough: true,
            enable_tasklists: true,
            enable_heading_attributes: true,
            highlight_code: true,
        }
    }
}

impl RenderOptions {
    fn to_pulldown_options(&self) -> Options {
        let mut options = Options::empty();
        if self.enable_tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.enable_strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.enable_tasklists {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        if self.enable_heading_attributes {
            options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        options
    }
}

/// Fenced code block being collected.
struct PendingCodeBlock {
    lang: Option<String>,
    code: String,
}

/// Render markdown content to HTML.
///
/// ```
/// use markdown_preview_core::render::{to_html, RenderOptions};
///
/// let html = to_html("# Hello\n\nWorld", &RenderOptions::default());
/// assert!(html.contains(r#"<h1 id="hello">"#));
/// ```
pub fn to_html(markdown_content: &str, options: &RenderOptions) -> String {
    let parser = Parser::new_ext(markdown_content, options.to_pulldown_options());

    let mut processed_events: Vec<Event> = Vec::new();
    let mut slugs = heading::SlugRegistry::default();
    let mut pending_code_block: Option<PendingCodeBlock> = None;
    // Index of the heading start event and the heading text collected so far.
    let mut pending_heading: Option<(usize, String)> = None;
    let mut headings: Vec<(usize, String)> = Vec::new();

    for event in parser {
        // Raw HTML of the source is shown as text.
        let event = match event {
            Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
            event => event,
        };

        if let Some(block) = pending_code_block.as_mut() {
            match event {
                Event::Text(text) => block.code.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(PendingCodeBlock { lang, code }) = pending_code_block.take() {
                        processed_events
                            .extend(code_block::code_block_events(lang.as_deref(), code));
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref info)))
                if options.highlight_code =>
            {
                pending_code_block = Some(PendingCodeBlock {
                    lang: code_block::language_tag(info).map(str::to_string),
                    code: String::new(),
                });
            }
            Event::Start(Tag::Heading { .. }) => {
                pending_heading = Some((processed_events.len(), String::new()));
                processed_events.push(event);
            }
            Event::Text(ref text) | Event::Code(ref text) => {
                if let Some((_, heading_text)) = pending_heading.as_mut() {
                    heading_text.push_str(text);
                }
                processed_events.push(event);
            }
            Event::End(TagEnd::Heading(_)) => {
                headings.extend(pending_heading.take());
                processed_events.push(event);
            }
            event => processed_events.push(event),
        }
    }

    // Explicit ids are taken before any id is generated.
    for (index, _) in &headings {
        if let Some(Event::Start(Tag::Heading { id: Some(id), .. })) = processed_events.get(*index)
        {
            slugs.reserve(id);
        }
    }
    for (index, heading_text) in headings {
        if let Some(Event::Start(Tag::Heading { id, .. })) = processed_events.get_mut(index) {
            if id.is_none() {
                *id = Some(slugs.unique_slug(&heading_text).into());
            }
        }
    }

    let mut html_output = String::with_capacity(markdown_content.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html_output, processed_events.into_iter());
    html_output
}
