use std::fmt;

/// `application/json`.
pub const APPLICATION_JSON: &str = "application/json";
/// `application/json` with an explicit UTF-8 charset parameter.
pub const APPLICATION_JSON_UTF8: &str = "application/json; charset=utf-8";
/// `application/hal+json`.
pub const APPLICATION_HAL_JSON: &str = "application/hal+json";
/// `multipart/form-data`.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
/// `text/plain`.
pub const TEXT_PLAIN: &str = "text/plain";
/// `text/plain` with an explicit UTF-8 charset parameter.
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
/// `application/octet-stream`.
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";

/// A parsed content-type identifier.
///
/// A raw value like `application/vnd.api+json; charset=utf-8` splits into
/// the base type (`application/vnd.api`), the structural suffix (`json`)
/// and the parameters (`charset=utf-8`). The dispatch key for registries is
/// [`MediaType::full_type`], the base type with its suffix re-attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    type_: String,
    suffix: Option<String>,
    parameters: Option<String>,
}

/// Scanner mode while walking the raw string left to right.
#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Type,
    Suffix,
    Parameters,
}

impl MediaType {
    /// Parses a raw content-type string.
    ///
    /// Total function: any input yields a `MediaType`. The first `+` while
    /// reading the base type starts the suffix, the first `;` starts the
    /// parameters; once in the parameters every further `+` is literal.
    /// Suffix and parameters are trimmed, an empty remainder counts as
    /// absent.
    pub fn parse(raw: &str) -> Self {
        let mut type_ = String::new();
        let mut suffix = String::new();
        let mut parameters = String::new();

        let mut mode = Mode::Type;
        for c in raw.chars() {
            match (mode, c) {
                (Mode::Type, '+') => mode = Mode::Suffix,
                (Mode::Type, ';') | (Mode::Suffix, ';') => mode = Mode::Parameters,
                (Mode::Type, c) => type_.push(c),
                (Mode::Suffix, c) => suffix.push(c),
                (Mode::Parameters, c) => parameters.push(c),
            }
        }

        Self {
            type_,
            suffix: non_empty(suffix),
            parameters: non_empty(parameters),
        }
    }

    /// The base type without suffix or parameters, e.g. `application/json`.
    pub fn r#type(&self) -> &str {
        &self.type_
    }

    /// The structural suffix, the part after `+`, if present.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// The parameters, the trimmed part after `;`, if present.
    pub fn parameters(&self) -> Option<&str> {
        self.parameters.as_deref()
    }

    /// The base type including the suffix if present.
    ///
    /// This is the dispatch key: `application/vnd.api+json` for a raw value
    /// of `application/vnd.api+json; charset=utf-8`.
    pub fn full_type(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}+{}", self.type_, suffix),
            None => self.type_.clone(),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_)?;
        if let Some(suffix) = &self.suffix {
            write!(f, "+{suffix}")?;
        }
        if let Some(parameters) = &self.parameters {
            write!(f, "; {parameters}")?;
        }
        Ok(())
    }
}

/// Checks whether a raw content type is a vendor-specific JSON type,
/// e.g. `application/vnd.api+json`.
pub fn is_vendor_specific_json(raw: &str) -> bool {
    let media_type = MediaType::parse(raw);
    media_type.r#type().starts_with("application/vnd.")
        && media_type.suffix().is_some_and(|s| s.eq_ignore_ascii_case("json"))
}

fn non_empty(collected: String) -> Option<String> {
    let trimmed = collected.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
