use std::borrow::Cow;
use std::collections::VecDeque;

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Tag, TagEnd};
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

use super::{Events, Plugin};
use crate::error::{Chainable, Result, Stage};
use crate::util::escape_html;

static DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\*\[([^\]\n]+)\]:[ \t]*(.*?)[ \t]*(?:\n|$)").unwrap()
});

/// Expands abbreviations declared as `*[ABBR]: Full title`.
///
/// Definitions are removed from the document. Every whole-word occurrence of
/// an abbreviation outside code and image text becomes
/// `<abbr title="Full title">ABBR</abbr>`. Later definitions win.
#[derive(Debug, Default)]
pub struct Abbreviations {
    titles: FxHashMap<String, String>,
    pattern: Option<Regex>,
}

struct AbbrIterator<'a> {
    pattern: &'a Regex,
    titles: &'a FxHashMap<String, String>,
    inner: Events<'a>,
    skip: usize,
    stack: VecDeque<Event<'a>>,
}

impl<'a> AbbrIterator<'a> {
    fn expand(&mut self, text: &str) {
        let mut last = 0;
        for m in self.pattern.find_iter(text) {
            if m.start() > last {
                self.stack.push_back(Event::Text(text[last..m.start()].to_string().into()));
            }

            let abbr = m.as_str();
            let title = self.titles.get(abbr).map_or("", String::as_str);
            let html = format!("<abbr title=\"{}\">{}</abbr>", escape_html(title), escape_html(abbr));
            self.stack.push_back(Event::InlineHtml(html.into()));
            last = m.end();
        }

        if last < text.len() {
            self.stack.push_back(Event::Text(text[last..].to_string().into()));
        }
    }
}

impl<'a> Iterator for AbbrIterator<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.stack.pop_front() {
            return Some(event);
        }

        let event = self.inner.next()?;
        match &event {
            Event::Start(Tag::CodeBlock(_) | Tag::Image { .. }) => self.skip += 1,
            Event::End(TagEnd::CodeBlock | TagEnd::Image) => self.skip = self.skip.saturating_sub(1),
            Event::Text(text) if self.skip == 0 && self.pattern.is_match(text) => {
                self.expand(text);
                return self.stack.pop_front();
            }
            _ => {}
        }

        Some(event)
    }
}

impl Plugin for Abbreviations {
    fn preprocess<'a>(&mut self, input: &'a str) -> Result<Cow<'a, str>> {
        self.titles.clear();
        self.pattern = None;

        let titles = &mut self.titles;
        let output = DEFINITION.replace_all(input, |caps: &Captures<'_>| {
            titles.insert(caps[1].trim().to_string(), caps[2].to_string());
            ""
        });

        if self.titles.is_empty() {
            return Ok(output);
        }

        let mut abbrs: Vec<&str> = self.titles.keys().map(String::as_str).collect();
        abbrs.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternation = abbrs.iter().map(|a| regex::escape(a)).collect::<Vec<_>>().join("|");
        let pattern = Regex::new(&format!(r"\b(?:{alternation})\b"))
            .chain_with(|| error! {
                "invalid abbreviation definitions",
                "abbreviations" => abbrs.join(", "),
            })
            .at(Stage::Rendering)?;

        tracing::debug!(count = abbrs.len(), "collected abbreviations");
        self.pattern = Some(pattern);
        Ok(output)
    }

    fn remap<'a>(&'a mut self, events: Events<'a>) -> Events<'a> {
        let Some(pattern) = self.pattern.as_ref() else {
            return events;
        };

        Box::new(AbbrIterator {
            pattern,
            titles: &self.titles,
            inner: events,
            skip: 0,
            stack: VecDeque::new(),
        })
    }
}
