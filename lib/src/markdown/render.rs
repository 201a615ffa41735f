use pulldown_cmark::html;

use super::{Events, Plugin};
use crate::buffer::Sink;
use crate::error::Result;

/// Renders the event stream to HTML and writes the fragment to `output`.
///
/// Consumes the stream: plugins added after this one see no events.
#[derive(Debug, Clone)]
pub struct Renderer<O> {
    output: O,
    rendered: String,
}

impl<O: Sink> Renderer<O> {
    pub fn new(output: O) -> Self {
        Renderer { output, rendered: String::new() }
    }
}

impl<O: Sink> Plugin for Renderer<O> {
    fn remap<'a>(&'a mut self, events: Events<'a>) -> Events<'a> {
        self.rendered.clear();
        html::push_html(&mut self.rendered, events);
        Box::new(std::iter::empty())
    }

    fn finalize(&mut self) -> Result<()> {
        let string = std::mem::take(&mut self.rendered);
        self.output.write(string)
    }
}
