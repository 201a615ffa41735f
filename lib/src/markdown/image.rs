use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::Result;
use crate::markdown::Plugin;

static EMBED: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[\[(.*?)\]\]").unwrap());

pub const DEFAULT_IMAGE_PREFIX: &str = "images/";

/// Rewrites `![[name]]` embeds into image containers.
///
/// The name is everything up to the first `]]` on the same line and is used
/// as is: `src` is the prefix followed by the name, `alt` is the name. The
/// referenced file is never checked for.
#[derive(Debug, Clone)]
pub struct ImageEmbeds {
    prefix: String,
}

impl ImageEmbeds {
    pub fn new() -> Self {
        ImageEmbeds::with_prefix(DEFAULT_IMAGE_PREFIX)
    }

    pub fn with_prefix<P: Into<String>>(prefix: P) -> Self {
        ImageEmbeds { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn rewrite<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut count = 0;
        let output = EMBED.replace_all(input, |caps: &Captures<'_>| {
            count += 1;
            let (prefix, name) = (&self.prefix, &caps[1]);
            format!("<div class=\"image-container\">\n<img src=\"{prefix}{name}\" alt=\"{name}\">\n</div>")
        });

        if count > 0 {
            tracing::debug!(count, prefix = %self.prefix, "rewrote image embeds");
        }

        output
    }
}

impl Default for ImageEmbeds {
    fn default() -> Self {
        ImageEmbeds::new()
    }
}

impl Plugin for ImageEmbeds {
    fn preprocess<'a>(&mut self, input: &'a str) -> Result<Cow<'a, str>> {
        Ok(self.rewrite(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_becomes_image_container() {
        let output = ImageEmbeds::new().rewrite("![[diagram1.png]]");
        assert_eq!(output, concat!(
            "<div class=\"image-container\">\n",
            "<img src=\"images/diagram1.png\" alt=\"diagram1.png\">\n",
            "</div>",
        ));
    }

    #[test]
    fn text_without_embeds_is_untouched() {
        let embeds = ImageEmbeds::new();
        for input in ["", "![alt](a.png)", "[[wiki link]]", "![[not closed"] {
            assert!(matches!(embeds.rewrite(input), Cow::Borrowed(s) if s == input));
        }
    }

    #[test]
    fn embeds_are_rewritten_in_document_order() {
        let input = "see ![[one.png]] and ![[two.jpg]]\n\n![[three.gif]]";
        let output = ImageEmbeds::new().rewrite(input);
        let positions: Vec<usize> = ["images/one.png", "images/two.jpg", "images/three.gif"]
            .iter()
            .map(|src| output.find(src).unwrap())
            .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(output.starts_with("see <div class=\"image-container\">"));
    }

    #[test]
    fn names_may_contain_spaces_and_punctuation() {
        let output = ImageEmbeds::new().rewrite("![[Screen Shot (2), v1.2!.png]]");
        assert!(output.contains("src=\"images/Screen Shot (2), v1.2!.png\""));
        assert!(output.contains("alt=\"Screen Shot (2), v1.2!.png\""));
    }

    #[test]
    fn match_stops_at_first_closing_pair() {
        let output = ImageEmbeds::new().rewrite("![[a.png]] text ]]");
        assert!(output.contains("alt=\"a.png\""));
        assert!(output.ends_with(" text ]]"));
    }

    #[test]
    fn embeds_do_not_span_lines() {
        let input = "![[first\nsecond.png]]";
        assert_eq!(ImageEmbeds::new().rewrite(input), input);
    }

    #[test]
    fn prefix_is_configurable() {
        let output = ImageEmbeds::with_prefix("assets/img/").rewrite("![[x.svg]]");
        assert!(output.contains("src=\"assets/img/x.svg\""));
    }
}
