//! Reading and writing whole text buffers.
//!
//! Every buffer the converter handles is transient: it is read in full from a
//! [`Source`], transformed in memory, and written in full to a [`Sink`].

mod source;
mod sink;

pub use source::*;
pub use sink::*;
