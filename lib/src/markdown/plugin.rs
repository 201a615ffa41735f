use std::borrow::Cow;

use pulldown_cmark::Event;

use crate::error::Result;

/// A boxed stream of markdown events.
pub type Events<'a> = Box<dyn Iterator<Item = Event<'a>> + 'a>;

/// A stage of the [`Markdown`](crate::markdown::Markdown) pipeline.
///
/// Plugins see the document three times: once as raw text, in insertion
/// order, before parsing; once as an event stream, again in insertion order;
/// and once after the stream has been fully consumed.
pub trait Plugin {
    #[inline(always)]
    fn preprocess<'a>(&mut self, input: &'a str) -> Result<Cow<'a, str>> {
        Ok(Cow::Borrowed(input))
    }

    #[inline(always)]
    fn remap<'a>(&'a mut self, events: Events<'a>) -> Events<'a> {
        events
    }

    #[inline(always)]
    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}
