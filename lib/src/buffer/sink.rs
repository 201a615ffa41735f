use std::{fs, io};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::fmt::Debug;

use crate::error::{Result, Chainable};

/// Something a text buffer can be written to in one go.
pub trait Sink: Debug {
    fn write(&self, text: String) -> Result<()>;
}

impl Sink for fs::File {
    fn write(&self, text: String) -> Result<()> {
        use io::Write;

        let mut file = io::BufWriter::new(self);
        file.write_all(text.as_bytes())?;
        Ok(file.flush()?)
    }
}

impl Sink for &Path {
    fn write(&self, text: String) -> Result<()> {
        fs::File::create(self)
            .chain(error! {
                "failed to open/create file for writing",
                "file path" => self.display()
            })?
            .write(text)
            .chain_with(|| error! {
                "failed to write file",
                "file path" => self.display()
            })
    }
}

impl Sink for PathBuf {
    fn write(&self, text: String) -> Result<()> {
        <&Path as Sink>::write(&self.as_path(), text)
    }
}

impl<T: Sink> Sink for &T {
    fn write(&self, text: String) -> Result<()> {
        <T as Sink>::write(self, text)
    }
}

/// An in-memory sink holding the last buffer written to it.
#[derive(Debug, Default)]
pub struct Slot(RefCell<Option<String>>);

impl Slot {
    pub fn new() -> Self {
        Slot::default()
    }

    /// Removes and returns the buffer, if one was written.
    pub fn take(&self) -> Option<String> {
        self.0.borrow_mut().take()
    }
}

impl Sink for Slot {
    fn write(&self, text: String) -> Result<()> {
        *self.0.borrow_mut() = Some(text);
        Ok(())
    }
}
