//! One markdown document in, one standalone HTML page out.

use std::path::Path;

use crate::buffer::{Sink, Slot, Source};
use crate::error::{Chainable, Result, Stage};
use crate::markdown::{DiagramBlocks, Extension, ImageEmbeds, Markdown, Renderer, DEFAULT_EXTENSIONS};
use crate::template::{compose, Placeholder, TemplateGenerator};

pub const DEFAULT_SOURCE: &str = "documentation.md";
pub const DEFAULT_TEMPLATE_PATH: &str = "template.html";
pub const DEFAULT_OUTPUT: &str = "index.html";

/// Converts markdown documents into pages.
///
/// The source is rewritten by [`DiagramBlocks`] and then [`ImageEmbeds`],
/// rendered with the configured extensions, and substituted into a template.
#[derive(Debug, Clone)]
pub struct Converter {
    diagrams: DiagramBlocks,
    images: ImageEmbeds,
    extensions: Vec<Extension>,
    placeholder: Placeholder,
}

impl Default for Converter {
    fn default() -> Self {
        Converter {
            diagrams: DiagramBlocks::mermaid(),
            images: ImageEmbeds::new(),
            extensions: DEFAULT_EXTENSIONS.to_vec(),
            placeholder: Placeholder::Lenient,
        }
    }
}

impl Converter {
    pub fn new() -> Self {
        Converter::default()
    }

    pub fn diagrams(mut self, diagrams: DiagramBlocks) -> Self {
        self.diagrams = diagrams;
        self
    }

    pub fn image_prefix<P: Into<String>>(mut self, prefix: P) -> Self {
        self.images = ImageEmbeds::with_prefix(prefix);
        self
    }

    pub fn extensions<I: IntoIterator<Item = Extension>>(mut self, extensions: I) -> Self {
        self.extensions = extensions.into_iter().collect();
        self
    }

    pub fn placeholder(mut self, policy: Placeholder) -> Self {
        self.placeholder = policy;
        self
    }

    /// Rewrites and renders `markdown` into an HTML fragment.
    pub fn render_fragment(&self, markdown: &str) -> Result<String> {
        let slot = Slot::new();
        Markdown::new()
            .plugin(self.diagrams.clone())
            .plugin(self.images.clone())
            .extensions(self.extensions.iter().copied())
            .plugin(Renderer::new(&slot))
            .run(markdown)
            .chain(error!("markdown rendering failed"))
            .at(Stage::Rendering)?;

        Ok(slot.take().unwrap_or_default())
    }

    /// Reads `source`, renders it, fills `template` with the result, and
    /// writes the page to `output`.
    pub fn convert<S, T, O>(&self, source: S, template: T, output: O) -> Result<()>
        where S: Source, T: Source, O: Sink
    {
        tracing::debug!(source = ?source.path(), template = ?template.path(), "converting");
        let markdown = source.read()
            .chain(error!("failed to load markdown source"))
            .at(Stage::MissingInput)?;

        let fragment = self.render_fragment(&markdown)?;
        tracing::debug!(markdown = markdown.len(), fragment = fragment.len(), "rendered markdown");

        let template = template.read()
            .chain(error!("failed to load page template"))
            .at(Stage::TemplateRead)?;

        let page = compose(&template, &fragment, self.placeholder)?;
        let len = page.len();
        output.write(page)
            .chain(error!("failed to write page"))
            .at(Stage::OutputWrite)?;

        tracing::info!(bytes = len, "wrote page");
        Ok(())
    }

    /// Generates the template with `generator`, then converts `source` into
    /// `output` through it. A template written before a later failure is left
    /// in place.
    pub fn build(&self, generator: &TemplateGenerator, source: &Path, output: &Path) -> Result<()> {
        generator.generate()?;
        self.convert(source, generator.path(), output)
    }
}

/// Converts `markdown` into `output` through the template at `template`
/// using the default extensions, the `images/` prefix, and a lenient
/// placeholder policy.
pub fn convert_markdown_to_html<M, T, O>(markdown: M, template: T, output: O) -> Result<()>
    where M: AsRef<Path>, T: AsRef<Path>, O: AsRef<Path>
{
    Converter::default().convert(markdown.as_ref(), template.as_ref(), output.as_ref())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn fragment_keeps_diagrams_and_images_as_html() {
        let markdown = "# Flow\n\n```mermaid\ngraph TD\nA-->B\n```\n\n![[flow.png]]\n";
        let html = Converter::new().render_fragment(markdown).unwrap();
        assert_eq!(html, concat!(
            "<h1 id=\"flow\">Flow</h1>\n",
            "<div class=\"mermaid-container\">\n",
            "<div class=\"mermaid\">\n",
            "graph TD\n",
            "A-->B\n",
            "</div>\n",
            "</div>\n",
            "<div class=\"image-container\">\n",
            "<img src=\"images/flow.png\" alt=\"flow.png\">\n",
            "</div>\n",
        ));
    }

    #[test]
    fn diagram_with_blank_lines_stays_one_block() {
        let html = Converter::new()
            .render_fragment("```mermaid\ngraph TD\n\n    A-->B\n    B-->C\n```\n")
            .unwrap();

        assert_eq!(html, concat!(
            "<div class=\"mermaid-container\">\n",
            "<div class=\"mermaid\">\n",
            "graph TD\n\n    A-->B\n    B-->C\n",
            "</div>\n",
            "</div>\n",
        ));
    }

    #[test]
    fn fragment_uses_default_extensions() {
        let html = Converter::new()
            .render_fragment("# Title\n\nHello **world**.\n\n| a |\n|---|\n| b |\n")
            .unwrap();

        assert!(html.contains("<h1 id=\"title\">Title</h1>"));
        assert!(html.contains("<strong>world</strong>"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn image_prefix_and_extensions_are_configurable() {
        let html = Converter::new()
            .image_prefix("img/")
            .extensions([])
            .render_fragment("# Title\n\n![[a.png]]\n")
            .unwrap();

        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("src=\"img/a.png\""));
    }

    #[test]
    fn convert_works_on_in_memory_buffers() {
        let page = Slot::new();
        Converter::new()
            .convert("Hello *there*.", "<main>{{CONTENT}}</main>", &page)
            .unwrap();

        assert_eq!(page.take().unwrap(), "<main><p>Hello <em>there</em>.</p>\n</main>");
    }

    #[test]
    fn strict_placeholder_fails_before_writing() {
        let page = Slot::new();
        let error = Converter::new()
            .placeholder(Placeholder::Strict)
            .convert("text", "<main></main>", &page)
            .unwrap_err();

        assert_eq!(error.stage(), Some(Stage::MissingPlaceholder));
        assert_eq!(page.take(), None);
    }
}
