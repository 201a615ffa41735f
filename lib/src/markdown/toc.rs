use pulldown_cmark::{Event, Tag, TagEnd};

use super::{Events, Plugin};
use crate::util::escape_html;

/// The paragraph text replaced by a table of contents.
pub const TOC_MARKER: &str = "[TOC]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub level: usize,
    pub id: Option<String>,
    pub children: Vec<Entry>,
}

/// Replaces every paragraph consisting of just `[TOC]` with a nested list of
/// links to the document's headings.
///
/// Headings need ids for the links to resolve, so this runs after
/// [`AutoHeading`](crate::markdown::AutoHeading).
#[derive(Debug, Default, Clone)]
pub struct TableOfContents;

impl TableOfContents {
    /// Builds the heading tree for `events`. A heading nests under the closest
    /// preceding heading with a lower level.
    pub fn entries(events: &[Event<'_>]) -> Vec<Entry> {
        fn insert(entries: &mut Vec<Entry>, entry: Entry) {
            match entries.last_mut() {
                Some(last) if last.level < entry.level => insert(&mut last.children, entry),
                _ => entries.push(entry),
            }
        }

        let mut entries = vec![];
        let mut current: Option<Entry> = None;
        for event in events {
            match event {
                Event::Start(Tag::Heading { level, id, .. }) => {
                    current = Some(Entry {
                        title: String::new(),
                        level: *level as usize,
                        id: id.as_ref().map(|id| id.to_string()),
                        children: vec![],
                    });
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some(entry) = current.as_mut() {
                        entry.title.push_str(text);
                    }
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(entry) = current.take() {
                        insert(&mut entries, entry);
                    }
                }
                _ => {}
            }
        }

        entries
    }

    pub fn render(entries: &[Entry]) -> String {
        fn list(html: &mut String, entries: &[Entry]) {
            html.push_str("<ul>\n");
            for entry in entries {
                let title = escape_html(&entry.title);
                match &entry.id {
                    Some(id) => html.push_str(&format!("<li><a href=\"#{}\">{title}</a>", escape_html(id))),
                    None => html.push_str(&format!("<li>{title}")),
                }

                if !entry.children.is_empty() {
                    list(html, &entry.children);
                }

                html.push_str("</li>\n");
            }

            html.push_str("</ul>\n");
        }

        let mut html = String::from("<div class=\"toc\">\n");
        list(&mut html, entries);
        html.push_str("</div>\n");
        html
    }
}

/// Returns the inclusive event ranges of `[TOC]` paragraphs.
fn markers(events: &[Event<'_>]) -> Vec<(usize, usize)> {
    let mut markers = vec![];
    let mut i = 0;
    while i < events.len() {
        if let Event::Start(Tag::Paragraph) = events[i] {
            let mut text = String::new();
            let mut j = i + 1;
            while let Some(Event::Text(t)) = events.get(j) {
                text.push_str(t);
                j += 1;
            }

            if let Some(Event::End(TagEnd::Paragraph)) = events.get(j) {
                if text.trim() == TOC_MARKER {
                    markers.push((i, j));
                    i = j;
                }
            }
        }

        i += 1;
    }

    markers
}

impl Plugin for TableOfContents {
    fn remap<'a>(&'a mut self, events: Events<'a>) -> Events<'a> {
        let mut events: Vec<Event<'a>> = events.collect();
        let markers = markers(&events);
        if markers.is_empty() {
            return Box::new(events.into_iter());
        }

        let html = Self::render(&Self::entries(&events));
        tracing::debug!(markers = markers.len(), "inserting table of contents");
        for (start, end) in markers.into_iter().rev() {
            events.splice(start..=end, Some(Event::Html(html.clone().into())));
        }

        Box::new(events.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pulldown_cmark::Parser;

    use super::*;
    use crate::buffer::Slot;
    use crate::markdown::{AutoHeading, Markdown, Renderer};

    fn render(input: &str) -> String {
        let slot = Slot::new();
        Markdown::new()
            .plugin(AutoHeading)
            .plugin(TableOfContents)
            .plugin(Renderer::new(&slot))
            .run(input)
            .unwrap();

        slot.take().unwrap()
    }

    #[test]
    fn headings_nest_by_level() {
        let events: Vec<_> = Parser::new("# A\n## B\n### C\n## D\n# E\n### F").collect();
        let entries = TableOfContents::entries(&events);
        let titles = |entries: &[Entry]| entries.iter().map(|e| e.title.clone()).collect::<Vec<_>>();

        assert_eq!(titles(&entries), ["A", "E"]);
        assert_eq!(titles(&entries[0].children), ["B", "D"]);
        assert_eq!(titles(&entries[0].children[0].children), ["C"]);
        assert_eq!(titles(&entries[1].children), ["F"]);
        assert_eq!(entries[0].level, 1);
        assert_eq!(entries[0].id, None);
    }

    #[test]
    fn marker_is_replaced_with_links() {
        let html = render("[TOC]\n\n# Intro\n\n## Setup & Run\n\n# Usage\n");
        assert_eq!(html.split("<h1").next().unwrap(), concat!(
            "<div class=\"toc\">\n",
            "<ul>\n",
            "<li><a href=\"#intro\">Intro</a><ul>\n",
            "<li><a href=\"#setup-run\">Setup &amp; Run</a></li>\n",
            "</ul>\n",
            "</li>\n",
            "<li><a href=\"#usage\">Usage</a></li>\n",
            "</ul>\n",
            "</div>\n",
        ));
    }

    #[test]
    fn documents_without_marker_are_unchanged() {
        let html = render("# Intro\n\nThe [TOC] marker only counts on its own.\n");
        assert!(!html.contains("class=\"toc\""));
        assert!(html.contains("<p>The [TOC] marker only counts on its own.</p>"));
    }
}
