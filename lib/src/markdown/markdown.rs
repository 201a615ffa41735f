use std::borrow::Cow;

use pulldown_cmark::{Parser, Options};

use crate::buffer::Source;
use crate::error::{Chainable, Result, Stage};
use crate::markdown::{Extension, Plugin};
use crate::util::normalize_newlines;

/// A markdown rendering pipeline: parser options plus an ordered plugin list.
pub struct Markdown<'p> {
    options: Options,
    plugins: Vec<Box<dyn Plugin + 'p>>,
}

impl<'p> Markdown<'p> {
    /// A pipeline with CommonMark semantics and no plugins.
    pub fn new() -> Self {
        Self { options: Options::empty(), plugins: vec![] }
    }

    pub fn plugin<T: Plugin + 'p>(mut self, plugin: T) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Enables `extension`: its parser options and any plugins it needs.
    pub fn extension(mut self, extension: Extension) -> Self {
        self.options |= extension.options();
        for plugin in extension.plugins() {
            self.plugins.push(plugin);
        }

        self
    }

    /// Enables every extension in `extensions`, once each. Heading ids are
    /// assigned before any extension rewrites inline text.
    pub fn extensions<I>(self, extensions: I) -> Self
        where I: IntoIterator<Item = Extension>
    {
        let mut singles: Vec<Extension> = extensions.into_iter()
            .flat_map(|ext| ext.expand().iter().copied())
            .collect();

        singles.sort();
        singles.dedup();
        singles.into_iter().fold(self, Markdown::extension)
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Runs `input` through every plugin. Line endings are normalized to
    /// `\n` first. Output is produced by plugins, such
    /// as [`Renderer`](crate::markdown::Renderer), that write to a sink.
    pub fn run<S: Source>(mut self, input: S) -> Result<()> {
        let input = normalize_newlines(input.read()?);
        let mut text = Cow::Borrowed(input.as_str());
        for plugin in self.plugins.iter_mut() {
            text = match text {
                Cow::Borrowed(s) => plugin.preprocess(s)?,
                Cow::Owned(s) => Cow::Owned(plugin.preprocess(&s)?.into_owned()),
            };
        }

        {
            let mut events: super::Events<'_> = Box::new(Parser::new_ext(&text, self.options));
            for plugin in self.plugins.iter_mut() {
                events = plugin.remap(events);
            }

            events.for_each(|_| {});
        }

        for plugin in self.plugins.iter_mut() {
            plugin.finalize().chain(error!("markdown plugin failed")).at(Stage::Rendering)?;
        }

        Ok(())
    }
}

impl Default for Markdown<'_> {
    fn default() -> Self {
        Markdown::new()
    }
}

impl std::fmt::Debug for Markdown<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Markdown")
            .field("options", &self.options)
            .field("plugins", &self.plugins.len())
            .finish()
    }
}
