use std::path::PathBuf;

xflags::xflags! {
    /// Converts a markdown document into a standalone documentation page.
    cmd mdpage {
        /// Markdown source. Defaults to `documentation.md`.
        optional source: PathBuf
        /// Where the page template is generated and read from.
        optional -t, --template path: PathBuf
        /// Where the finished page is written.
        optional -o, --output path: PathBuf
        /// Settings file. Defaults to `mdpage.toml` if one exists.
        optional -c, --config path: PathBuf
        /// Use an existing template instead of regenerating it.
        optional --keep-template
        /// Fail when the template has no `{{CONTENT}}` placeholder.
        optional --strict
        /// Log progress at `info`.
        optional -v, --verbose
    }
}
