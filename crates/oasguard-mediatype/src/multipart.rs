use bytes::Bytes;
use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::analyser::ContentAnalyser;
use crate::context::ValidationContext;
use crate::error::{MediaTypeError, Result};
use crate::media_type::MediaType;

/// Analyser for `multipart/form-data` bodies.
///
/// The boundary is taken from the content-type parameters. Each part must
/// carry a `content-disposition` header with a `name` parameter; part
/// bodies with a JSON content type decode into trees, everything else
/// becomes a string. The transform is an object mapping field names to the
/// decoded values; repeated field names collect into an array.
pub struct MultipartAnalyser {
    content_type: String,
    content: Bytes,
    context: ValidationContext,
}

/// One decoded part of a multipart body.
struct Part {
    name: String,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl MultipartAnalyser {
    pub fn new(content_type: &str, content: Bytes, context: ValidationContext) -> Self {
        Self {
            content_type: content_type.to_string(),
            content,
            context,
        }
    }

    fn syntax_error(&self, message: impl Into<String>) -> MediaTypeError {
        MediaTypeError::syntax(self.context, message)
    }

    fn boundary(&self) -> Result<String> {
        let media_type = MediaType::parse(&self.content_type);
        media_type
            .parameters()
            .and_then(boundary_parameter)
            .ok_or_else(|| self.syntax_error("missing boundary parameter in content type"))
    }

    fn parse_parts(&self) -> Result<Vec<Part>> {
        let boundary = self.boundary()?;
        let delimiter = format!("--{boundary}");
        let delimiter = delimiter.as_bytes();
        let body = self.content.as_ref();

        // Preamble before the first delimiter is ignored per MIME.
        let mut pos = find_subslice(body, delimiter)
            .ok_or_else(|| self.syntax_error("multipart body contains no boundary delimiter"))?
            + delimiter.len();

        let mut parts = Vec::new();
        loop {
            if body[pos..].starts_with(b"--") {
                // Closing delimiter reached.
                tracing::trace!(parts = parts.len(), "parsed multipart body");
                return Ok(parts);
            }
            if !body[pos..].starts_with(b"\r\n") {
                return Err(self.syntax_error("boundary delimiter not followed by CRLF"));
            }
            pos += 2;

            let mut end_marker = Vec::with_capacity(delimiter.len() + 2);
            end_marker.extend_from_slice(b"\r\n");
            end_marker.extend_from_slice(delimiter);
            let part_len = find_subslice(&body[pos..], &end_marker)
                .ok_or_else(|| self.syntax_error("unterminated multipart body"))?;

            parts.push(self.parse_part(&body[pos..pos + part_len])?);
            pos += part_len + end_marker.len();
        }
    }

    fn parse_part(&self, raw: &[u8]) -> Result<Part> {
        let header_len = find_subslice(raw, b"\r\n\r\n")
            .ok_or_else(|| self.syntax_error("multipart part is missing its header block"))?;
        let headers = String::from_utf8_lossy(&raw[..header_len]);
        let body = raw[header_len + 4..].to_vec();

        let mut name = None;
        let mut content_type = None;
        for line in headers.split("\r\n") {
            let Some((key, value)) = line.split_once(':') else {
                return Err(self.syntax_error(format!("malformed part header: {line}")));
            };
            let key = key.trim();
            let value = value.trim();
            if key.eq_ignore_ascii_case("content-disposition") {
                name = disposition_name(value);
            } else if key.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
        }

        let name = name.ok_or_else(|| {
            self.syntax_error("multipart part has no content-disposition name")
        })?;
        Ok(Part {
            name,
            content_type,
            body,
        })
    }

    fn decode_part(&self, part: &Part) -> Result<Value> {
        let is_json = part
            .content_type
            .as_deref()
            .map(|ct| {
                let full = MediaType::parse(ct).full_type();
                full == "application/json" || full.ends_with("+json")
            })
            .unwrap_or(false);

        if is_json {
            serde_json::from_slice(&part.body).map_err(|err| {
                self.syntax_error(format!("part '{}' is not valid JSON: {err}", part.name))
            })
        } else {
            Ok(Value::String(
                String::from_utf8_lossy(&part.body).into_owned(),
            ))
        }
    }
}

impl ContentAnalyser for MultipartAnalyser {
    fn check_syntax(&self) -> Result<()> {
        for part in self.parse_parts()? {
            self.decode_part(&part)?;
        }
        Ok(())
    }

    fn transform(&self) -> Result<Value> {
        let mut fields = Map::new();
        for part in self.parse_parts()? {
            let value = self.decode_part(&part)?;
            match fields.entry(part.name) {
                Entry::Vacant(vacant) => {
                    vacant.insert(value);
                }
                // Repeated field names collect into an array.
                Entry::Occupied(mut occupied) => match occupied.get_mut() {
                    Value::Array(existing) => existing.push(value),
                    existing => {
                        let first = existing.take();
                        *existing = Value::Array(vec![first, value]);
                    }
                },
            }
        }
        Ok(Value::Object(fields))
    }
}

/// Extracts the boundary from a content-type parameter string such as
/// `boundary=xyz; charset=utf-8`. Quoted values are unquoted.
fn boundary_parameter(parameters: &str) -> Option<String> {
    for param in parameters.split(';') {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("boundary") {
            let value = value.trim().trim_matches('"');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Extracts the `name` parameter from a content-disposition header value.
fn disposition_name(value: &str) -> Option<String> {
    for param in value.split(';') {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("name") {
            return Some(value.trim().trim_matches('"').to_string());
        }
    }
    None
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
