//! The page skeleton and the placeholder it is filled through.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::buffer::Sink;
use crate::error::{Chainable, Result, Stage};

/// The literal token replaced by the rendered fragment.
pub const PLACEHOLDER: &str = "{{CONTENT}}";

/// Sidebar anchors of the generated page, as `(fragment, label)`.
pub const NAV_LINKS: [(&str, &str); 8] = [
    ("introduction", "Introduction"),
    ("parts-books", "Parts Books"),
    ("call-logs", "Call Logs"),
    ("labor-log", "Labor Log"),
    ("actions", "Actions"),
    ("search", "Search"),
    ("workflow", "Workflow"),
    ("powershell", "PowerShell"),
];

/// The generated page skeleton.
pub const DEFAULT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Parts Management Documentation</title>
    <script src="https://cdnjs.cloudflare.com/ajax/libs/mermaid/10.6.1/mermaid.min.js"></script>
    <link rel="stylesheet" href="styles.css">
</head>
<body>
    <div class="container">
        <nav id="sidebar">
            <div class="nav-header">Table of Contents</div>
            <ul>
                <li><a href="#introduction" class="nav-link">Introduction</a></li>
                <li><a href="#parts-books" class="nav-link">Parts Books</a></li>
                <li><a href="#call-logs" class="nav-link">Call Logs</a></li>
                <li><a href="#labor-log" class="nav-link">Labor Log</a></li>
                <li><a href="#actions" class="nav-link">Actions</a></li>
                <li><a href="#search" class="nav-link">Search</a></li>
                <li><a href="#workflow" class="nav-link">Workflow</a></li>
                <li><a href="#powershell" class="nav-link">PowerShell</a></li>
            </ul>
        </nav>

        <main id="content">
            {{CONTENT}}
        </main>
    </div>
    <script src="script.js"></script>
</body>
</html>
"##;

/// What to do when a template has no [`PLACEHOLDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// Emit the template unchanged and log a warning.
    #[default]
    Lenient,
    /// Fail with a [`Stage::MissingPlaceholder`] error.
    Strict,
}

/// Substitutes `fragment` for every occurrence of [`PLACEHOLDER`] in
/// `template`. Both strings are taken literally.
pub fn compose(template: &str, fragment: &str, policy: Placeholder) -> Result<String> {
    let occurrences = memchr::memmem::find_iter(template.as_bytes(), PLACEHOLDER).count();
    match (occurrences, policy) {
        (0, Placeholder::Lenient) => {
            tracing::warn!(placeholder = PLACEHOLDER, "template has no placeholder; rendered content dropped");
            Ok(template.to_string())
        }
        (0, Placeholder::Strict) => Err(error! {
            "template has no content placeholder",
            "expected token" => PLACEHOLDER,
        }.at(Stage::MissingPlaceholder)),
        (n, _) => {
            if n > 1 {
                tracing::debug!(occurrences = n, "template has several placeholders; replacing all");
            }

            Ok(template.replace(PLACEHOLDER, fragment))
        }
    }
}

/// Writes the page skeleton to a file before conversion.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    path: PathBuf,
    overwrite: bool,
    html: Cow<'static, str>,
}

impl TemplateGenerator {
    /// Generates [`DEFAULT_TEMPLATE`] at `path`, overwriting any file there.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        TemplateGenerator {
            path: path.as_ref().to_path_buf(),
            overwrite: true,
            html: Cow::Borrowed(DEFAULT_TEMPLATE),
        }
    }

    /// When `false`, an existing file at the path is left in place.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_html<H: Into<Cow<'static, str>>>(mut self, html: H) -> Self {
        self.html = html.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Writes the template. Returns `false` if an existing file was kept.
    pub fn generate(&self) -> Result<bool> {
        if !self.overwrite && self.path.exists() {
            tracing::debug!(path = %self.path.display(), "keeping existing template");
            return Ok(false);
        }

        self.path.as_path()
            .write(self.html.to_string())
            .chain_with(|| error! {
                "failed to generate page template",
                "template path" => self.path.display(),
            })
            .at(Stage::TemplateWrite)?;

        tracing::info!(path = %self.path.display(), "generated template");
        Ok(true)
    }
}
