use std::borrow::Cow;

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Tag, TagEnd};
use regex::{Captures, Regex};

use crate::error::{Chainable, Result};
use crate::markdown::{Events, Plugin};

static MERMAID_FENCE: Lazy<Regex> = Lazy::new(|| fence_regex("mermaid").unwrap());

static STASH_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new("^\x02diagram:([0-9]+)\x03$").unwrap());

fn fence_regex(lang: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?s)```{}\r?\n(.*?)\r?\n```", regex::escape(lang)))
}

/// Rewrites fenced diagram blocks into containers for a client-side renderer.
///
/// A block opens with ```` ```lang ```` and closes at the first bare fence
/// that follows. Its content is kept byte for byte:
///
/// ```text
/// <div class="mermaid-container">
/// <div class="mermaid">
/// graph TD
/// A-->B
/// </div>
/// </div>
/// ```
///
/// A fence that is never closed is left as is.
///
/// As a pipeline plugin, each container is stashed behind a placeholder
/// paragraph before parsing and emitted as one raw HTML event afterwards, so
/// blank lines and indentation inside a diagram never reach the parser.
#[derive(Debug, Clone)]
pub struct DiagramBlocks {
    fence: Regex,
    class: String,
    stash: Vec<String>,
}

impl DiagramBlocks {
    /// Blocks fenced with ```` ```mermaid ````.
    pub fn mermaid() -> Self {
        DiagramBlocks { fence: MERMAID_FENCE.clone(), class: "mermaid".into(), stash: vec![] }
    }

    /// Blocks fenced with ```` ```{lang} ````, classed `{lang}`.
    pub fn new(lang: &str) -> Result<Self> {
        let fence = fence_regex(lang).chain_with(|| error! {
            "invalid diagram language",
            "language" => lang,
        })?;

        Ok(DiagramBlocks { fence, class: lang.into(), stash: vec![] })
    }

    fn container(&self, inner: &str) -> String {
        let class = &self.class;
        format!("<div class=\"{class}-container\">\n<div class=\"{class}\">\n{inner}\n</div>\n</div>")
    }

    pub fn rewrite<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut count = 0;
        let output = self.fence.replace_all(input, |caps: &Captures<'_>| {
            count += 1;
            self.container(&caps[1])
        });

        if count > 0 {
            tracing::debug!(count, class = %self.class, "rewrote diagram blocks");
        }

        output
    }

    /// The stashed container `text` stands for, if it is a stash token.
    fn unstash(&self, text: &str) -> Option<&str> {
        let caps = STASH_TOKEN.captures(text.trim())?;
        let index: usize = caps[1].parse().ok()?;
        self.stash.get(index).map(String::as_str)
    }
}

impl Default for DiagramBlocks {
    fn default() -> Self {
        DiagramBlocks::mermaid()
    }
}

impl Plugin for DiagramBlocks {
    fn preprocess<'a>(&mut self, input: &'a str) -> Result<Cow<'a, str>> {
        let mut stash = vec![];
        let output = self.fence.replace_all(input, |caps: &Captures<'_>| {
            stash.push(self.container(&caps[1]));
            format!("\n\n\x02diagram:{}\x03\n\n", stash.len() - 1)
        });

        if !stash.is_empty() {
            tracing::debug!(count = stash.len(), class = %self.class, "stashed diagram blocks");
        }

        self.stash = stash;
        Ok(output)
    }

    fn remap<'a>(&'a mut self, events: Events<'a>) -> Events<'a> {
        if self.stash.is_empty() {
            return events;
        }

        let mut input = events.peekable();
        let mut output: Vec<Event<'a>> = vec![];
        while let Some(event) = input.next() {
            if let Event::Text(text) = &event {
                if let Some(html) = self.unstash(text) {
                    output.push(Event::Html(format!("{html}\n").into()));
                    continue;
                }
            }

            if !matches!(event, Event::Start(Tag::Paragraph)) {
                output.push(event);
                continue;
            }

            let mut inner = vec![];
            let mut text = String::new();
            while let Some(Event::Text(t)) = input.peek() {
                text.push_str(t);
                inner.extend(input.next());
            }

            match (self.unstash(&text), input.peek()) {
                (Some(html), Some(Event::End(TagEnd::Paragraph))) => {
                    input.next();
                    output.push(Event::Html(format!("{html}\n").into()));
                }
                _ => {
                    output.push(event);
                    output.extend(inner);
                }
            }
        }

        Box::new(output.into_iter())
    }
}
