use std::fmt;
use std::str::FromStr;

use pulldown_cmark::Options;

use super::{Abbreviations, AutoHeading, Plugin, TableOfContents};
use crate::error::{Error, Stage};

/// A named markdown syntax extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Extension {
    /// Heading ids and `[TOC]` markers.
    Toc,
    /// `tables`, `footnotes`, `def_list`, `attr_list`, and `abbr`.
    Extra,
    Tables,
    Footnotes,
    DefList,
    AttrList,
    Abbr,
    Smarty,
}

/// The extensions a page is rendered with unless told otherwise.
pub const DEFAULT_EXTENSIONS: [Extension; 2] = [Extension::Extra, Extension::Toc];

impl Extension {
    pub const ALL: [Extension; 8] = [
        Extension::Toc,
        Extension::Extra,
        Extension::Tables,
        Extension::Footnotes,
        Extension::DefList,
        Extension::AttrList,
        Extension::Abbr,
        Extension::Smarty,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Extension::Toc => "toc",
            Extension::Extra => "extra",
            Extension::Tables => "tables",
            Extension::Footnotes => "footnotes",
            Extension::DefList => "def_list",
            Extension::AttrList => "attr_list",
            Extension::Abbr => "abbr",
            Extension::Smarty => "smarty",
        }
    }

    /// The single extensions `self` stands for.
    pub fn expand(self) -> &'static [Extension] {
        match self {
            Extension::Extra => &[
                Extension::Tables,
                Extension::Footnotes,
                Extension::DefList,
                Extension::AttrList,
                Extension::Abbr,
            ],
            Extension::Toc => &[Extension::Toc],
            Extension::Tables => &[Extension::Tables],
            Extension::Footnotes => &[Extension::Footnotes],
            Extension::DefList => &[Extension::DefList],
            Extension::AttrList => &[Extension::AttrList],
            Extension::Abbr => &[Extension::Abbr],
            Extension::Smarty => &[Extension::Smarty],
        }
    }

    pub fn options(self) -> Options {
        self.expand().iter().fold(Options::empty(), |options, ext| options | match ext {
            Extension::Tables => Options::ENABLE_TABLES,
            Extension::Footnotes => Options::ENABLE_FOOTNOTES,
            Extension::DefList => Options::ENABLE_DEFINITION_LIST,
            Extension::AttrList => Options::ENABLE_HEADING_ATTRIBUTES,
            Extension::Smarty => Options::ENABLE_SMART_PUNCTUATION,
            _ => Options::empty(),
        })
    }

    /// The plugins `self` needs, in the order they must run.
    pub fn plugins(self) -> Vec<Box<dyn Plugin>> {
        let mut plugins: Vec<Box<dyn Plugin>> = vec![];
        for ext in self.expand() {
            match ext {
                Extension::Toc => {
                    plugins.push(Box::new(AutoHeading));
                    plugins.push(Box::new(TableOfContents));
                }
                Extension::Abbr => plugins.push(Box::new(Abbreviations::default())),
                _ => {}
            }
        }

        plugins
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl FromStr for Extension {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let bare = name.trim().strip_prefix("markdown.extensions.").unwrap_or(name.trim());
        Extension::ALL.into_iter()
            .find(|ext| ext.name() == bare)
            .ok_or_else(|| {
                let known = Extension::ALL.map(Extension::name).join(", ");
                error!("unknown markdown extension", "name" => name, "known extensions" => known)
                    .at(Stage::Rendering)
            })
    }
}
