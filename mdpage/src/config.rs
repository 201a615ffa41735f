use std::path::{Path, PathBuf};

use serde::Deserialize;

use folio::buffer::Source;
use folio::error::{Chainable, Error, Result, Stage};
use folio::markdown::DEFAULT_IMAGE_PREFIX;
use folio::template::{Placeholder, TemplateGenerator};
use folio::{error, Converter, DEFAULT_OUTPUT, DEFAULT_SOURCE, DEFAULT_TEMPLATE_PATH};

use crate::flags::Mdpage;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub source: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
    pub regenerate_template: bool,
    pub strict_placeholder: bool,
    pub image_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            source: DEFAULT_SOURCE.into(),
            template: DEFAULT_TEMPLATE_PATH.into(),
            output: DEFAULT_OUTPUT.into(),
            regenerate_template: true,
            strict_placeholder: false,
            image_dir: DEFAULT_IMAGE_PREFIX.into(),
        }
    }
}

impl Settings {
    pub fn parse(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(Error::from_std)
    }

    /// Reads settings from `path`, or from [`crate::CONFIG_FILE`] in the
    /// working directory when no path is given and that file exists.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(crate::CONFIG_FILE).is_file() => Path::new(crate::CONFIG_FILE),
            None => return Ok(Settings::default()),
        };

        tracing::debug!(path = %path.display(), "loading settings");
        path.read()
            .and_then(|toml| Settings::parse(&toml))
            .chain_with(|| error! {
                "failed to load settings",
                "config path" => path.display(),
            })
            .at(Stage::Config)
    }

    /// Overrides settings with whatever was passed on the command line.
    pub fn merge(mut self, flags: &Mdpage) -> Self {
        if let Some(source) = &flags.source {
            self.source = source.clone();
        }

        if let Some(template) = &flags.template {
            self.template = template.clone();
        }

        if let Some(output) = &flags.output {
            self.output = output.clone();
        }

        self.regenerate_template &= !flags.keep_template;
        self.strict_placeholder |= flags.strict;
        self
    }

    pub fn generator(&self) -> TemplateGenerator {
        TemplateGenerator::new(&self.template).overwrite(self.regenerate_template)
    }

    pub fn converter(&self) -> Converter {
        let placeholder = match self.strict_placeholder {
            true => Placeholder::Strict,
            false => Placeholder::Lenient,
        };

        Converter::new()
            .image_prefix(self.image_dir.as_str())
            .placeholder(placeholder)
    }
}
