use std::{fmt, io};
use std::panic::Location;
use std::error::Error as StdError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The pipeline step an error surfaced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The markdown source is missing, unreadable, or not UTF-8.
    MissingInput,
    /// The generated template could not be written.
    TemplateWrite,
    /// The template could not be read back.
    TemplateRead,
    /// The markdown renderer or one of its plugins failed.
    Rendering,
    /// The template has no placeholder and the strict policy is in effect.
    MissingPlaceholder,
    /// The final document could not be written.
    OutputWrite,
    /// The configuration file is missing or invalid.
    Config,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::MissingInput => "missing input",
            Stage::TemplateWrite => "template write",
            Stage::TemplateRead => "template read",
            Stage::Rendering => "rendering",
            Stage::MissingPlaceholder => "missing placeholder",
            Stage::OutputWrite => "output write",
            Stage::Config => "configuration",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

#[derive(Debug)]
pub struct Error {
    stage: Option<Stage>,
    detail: Vec<Box<dyn ErrorDetail>>,
    prev: Option<Box<Error>>,
    location: &'static Location<'static>,
}

pub trait ErrorDetail: fmt::Display + fmt::Debug + Send + Sync {
    fn context(&self) -> Vec<(Option<String>, String)> { vec![] }
}

impl Error {
    #[track_caller]
    pub fn from_std<E>(error: E) -> Self
        where E: StdError + Send + Sync + 'static
    {
        Error::from(Box::new(error) as Box<dyn StdError + Send + Sync>)
    }

    /// Tags `self` with `stage`, replacing any previous tag on this link.
    pub fn at(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// The outermost stage recorded anywhere in the chain.
    pub fn stage(&self) -> Option<Stage> {
        self.stage.or_else(|| self.prev.as_ref().and_then(|prev| prev.stage()))
    }

    /// The top-level message, without context or nested errors.
    pub fn message(&self) -> String {
        self.detail.first().map(|d| d.to_string()).unwrap_or_default()
    }

    /// Places `self` at the bottom of `other`'s chain and returns `other`.
    pub fn chain(self, mut other: Error) -> Self {
        #[inline]
        fn _chain(error: Error, behind: &mut Error) {
            if let Some(prev) = behind.prev.as_mut() {
                _chain(error, prev);
            } else {
                behind.prev = Some(Box::new(error));
            }
        }

        _chain(self, &mut other);
        other
    }
}

impl ErrorDetail for &(dyn StdError + Send + Sync) {
    fn context(&self) -> Vec<(Option<String>, String)> {
        let mut ctxt = vec![];
        let mut error = self.source();
        while let Some(e) = error {
            ctxt.push((None, e.to_string()));
            error = e.source();
        }

        ctxt
    }
}

impl ErrorDetail for Box<dyn StdError + Send + Sync> {
    fn context(&self) -> Vec<(Option<String>, String)> {
        let error: &(dyn StdError + Send + Sync) = &**self;
        error.context()
    }
}

macro_rules! impl_error_detail_with_std_error {
    ($T:ty) => {
        impl $crate::error::ErrorDetail for $T {
            fn context(&self) -> Vec<(Option<String>, String)> {
                let error: &(dyn std::error::Error + Send + Sync) = self;
                error.context()
            }
        }
    }
}

impl_error_detail_with_std_error!(io::Error);
impl_error_detail_with_std_error!(std::string::FromUtf8Error);
impl_error_detail_with_std_error!(regex::Error);

impl ErrorDetail for String { }
impl ErrorDetail for &'static str { }

impl<T: ErrorDetail + 'static> From<T> for Error {
    #[track_caller]
    fn from(detail: T) -> Self {
        Error {
            stage: None,
            prev: None,
            detail: vec![Box::new(detail)],
            location: Location::caller(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Copy, Clone)] struct Indent(usize);

        impl fmt::Display for Indent {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for _ in 0..(self.0 * 4) { write!(f, " ")? }
                Ok(())
            }
        }

        struct NestedError<'a>(Indent, &'a Error);

        impl fmt::Display for NestedError<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let NestedError(indent, e) = self;
                let indent_line = format!("\n{indent}");

                for detail in &e.detail {
                    let message = detail.to_string().replace('\n', &indent_line);
                    match e.stage {
                        Some(stage) => writeln!(f, "{indent}[{stage}] {message}")?,
                        None => writeln!(f, "{indent}{message}")?,
                    }

                    for (key, value) in detail.context() {
                        let value = value.replace('\n', &indent_line);
                        match key {
                            Some(key) => writeln!(f, "{indent}{key}: {value}")?,
                            None => writeln!(f, "{indent}{value}")?,
                        }
                    }

                    if std::env::var_os("RUST_BACKTRACE").is_some() {
                        writeln!(f, "{indent}[{}]", e.location)?;
                    }
                }

                if let Some(prev) = &e.prev {
                    NestedError(Indent(indent.0 + 1), prev).fmt(f)?;
                }

                Ok(())
            }
        }

        NestedError(Indent(0), self).fmt(f)
    }
}

#[derive(Debug)]
pub struct MakeshiftError {
    pub message: String,
    pub parameters: Vec<(Option<String>, String)>,
}

#[doc(hidden)]
#[macro_export]
macro_rules! err {
    ($($token:tt)*) => (Err($crate::error!($($token)*)));
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($msg:expr, $($rest:tt)*) => (
        $crate::error::Error::from($crate::error::MakeshiftError {
            message: $msg.to_string(),
            parameters: {
                #[allow(unused_mut)]
                let mut v: Vec<(Option<String>, String)> = Vec::new();
                $crate::error!(@param v $($rest)*);
                v
            },
        })
    );

    ($msg:expr) => ( $crate::error!($msg,) );

    (@param $v:ident $key:expr => $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v $key => $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident $key:expr => $value:expr) => {
        $v.push((Some($key.to_string()), $value.to_string()));
    };

    (@param $v:ident $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident $value:expr) => {
        $v.push((None, $value.to_string()));
    };

    (@param $v:ident $(,)?) => { };
}

impl fmt::Display for MakeshiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message.fmt(f)
    }
}

impl ErrorDetail for MakeshiftError {
    fn context(&self) -> Vec<(Option<String>, String)> {
        self.parameters.clone()
    }
}

pub trait Chainable<T> {
    fn chain(self, other: impl Into<Error>) -> Result<T>;

    fn chain_with<F, E>(self, f: F) -> Result<T>
        where F: FnOnce() -> E, E: Into<Error>;

    fn at(self, stage: Stage) -> Result<T>;
}

impl<T, E: Into<Error>> Chainable<T> for Result<T, E> {
    #[track_caller]
    fn chain(self, other: impl Into<Error>) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(other.into()))
        }
    }

    #[track_caller]
    fn chain_with<F, Err>(self, f: F) -> Result<T>
        where F: FnOnce() -> Err, Err: Into<Error>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(f().into()))
        }
    }

    #[track_caller]
    fn at(self, stage: Stage) -> Result<T> {
        self.map_err(|e| e.into().at(stage))
    }
}

#[cfg(test)]
static_assertions::assert_impl_all!(Error: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn missing() -> Result<String> {
        let path = std::path::Path::new("/definitely/not/here.md");
        std::fs::read_to_string(path).chain(error! {
            "failed to read markdown source",
            "path" => path.display(),
        })
    }

    #[test]
    fn chained_error_keeps_both_messages() {
        let error = missing().unwrap_err();
        assert_eq!(error.message(), "failed to read markdown source");

        let rendered = error.to_string();
        assert!(rendered.contains("failed to read markdown source"));
        assert!(rendered.contains("path: /definitely/not/here.md"));
        assert!(rendered.lines().count() >= 3);
    }

    #[test]
    fn stage_is_reported_from_the_outermost_tag() {
        let error = missing().at(Stage::MissingInput).unwrap_err();
        assert_eq!(error.stage(), Some(Stage::MissingInput));
        assert!(error.to_string().starts_with("[missing input] failed to read"));

        let inner: Result<()> = err!("inner");
        let outer = inner.at(Stage::Rendering).chain(error!("outer")).unwrap_err();
        assert_eq!(outer.stage(), Some(Stage::Rendering));
        assert_eq!(outer.at(Stage::OutputWrite).stage(), Some(Stage::OutputWrite));
    }

    #[test]
    fn untagged_errors_have_no_stage() {
        let error: Error = "plain".into();
        assert_eq!(error.stage(), None);
        assert!(error.to_string().starts_with("plain\n"));
    }
}
