use pulldown_cmark::{Event, Tag, TagEnd};
use rustc_hash::FxHashSet;

use super::{Events, Plugin};
use crate::util::{slugify, unique_id};

/// Gives every heading an `id` derived from its text.
///
/// Ids are unique within a document: repeats are suffixed `_1`, `_2`, and so
/// on. Ids set explicitly with `{#id}` are kept, and reserved across the
/// whole document before any id is generated.
#[derive(Default)]
pub struct AutoHeading;

impl Plugin for AutoHeading {
    fn remap<'a>(&'a mut self, events: Events<'a>) -> Events<'a> {
        let mut events: Vec<Event<'a>> = events.collect();
        let mut seen: FxHashSet<String> = events.iter()
            .filter_map(|event| match event {
                Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
                _ => None,
            })
            .collect();

        let mut i = 0;
        while i < events.len() {
            if let Event::Start(Tag::Heading { id: None, .. }) = events[i] {
                let mut text = String::new();
                let mut j = i + 1;
                while j < events.len() {
                    match &events[j] {
                        Event::Text(s) | Event::Code(s) => text.push_str(s),
                        Event::End(TagEnd::Heading(..)) => break,
                        _ => {}
                    }

                    j += 1;
                }

                if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                    *id = Some(unique_id(slugify(&text), &mut seen).into());
                }

                i = j;
            }

            i += 1;
        }

        Box::new(events.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use pulldown_cmark::Options;

    use crate::buffer::Slot;
    use crate::markdown::{AutoHeading, Markdown, Renderer};

    fn render(input: &str, options: Options) -> String {
        let slot = Slot::new();
        Markdown::new()
            .with_options(options)
            .plugin(AutoHeading)
            .plugin(Renderer::new(&slot))
            .run(input)
            .unwrap();

        slot.take().unwrap()
    }

    #[test]
    fn headings_get_slug_ids() {
        let html = render("# Title\n\n## Parts Books\n\n### `code` & More", Options::empty());
        assert!(html.contains("<h1 id=\"title\">Title</h1>"));
        assert!(html.contains("<h2 id=\"parts-books\">Parts Books</h2>"));
        assert!(html.contains("<h3 id=\"code-more\"><code>code</code> &amp; More</h3>"));
    }

    #[test]
    fn repeated_headings_get_suffixes() {
        let html = render("# Intro\n\n# Intro\n\n# Intro", Options::empty());
        assert!(html.contains("<h1 id=\"intro\">"));
        assert!(html.contains("<h1 id=\"intro_1\">"));
        assert!(html.contains("<h1 id=\"intro_2\">"));
    }

    #[test]
    fn explicit_ids_are_kept_and_reserved() {
        let html = render("# Setup {#intro}\n\n# Intro", Options::ENABLE_HEADING_ATTRIBUTES);
        assert!(html.contains("<h1 id=\"intro\">Setup</h1>"));
        assert!(html.contains("<h1 id=\"intro_1\">Intro</h1>"));
    }

    #[test]
    fn later_explicit_ids_are_reserved_too() {
        let html = render("# Intro\n\n# Setup {#intro}\n\n# Intro", Options::ENABLE_HEADING_ATTRIBUTES);
        assert_eq!(html, concat!(
            "<h1 id=\"intro_1\">Intro</h1>\n",
            "<h1 id=\"intro\">Setup</h1>\n",
            "<h1 id=\"intro_2\">Intro</h1>\n",
        ));
    }
}
