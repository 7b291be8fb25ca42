//! Request body decoding.
//!
//! Login credentials may arrive as JSON, an urlencoded form or a multipart
//! form. This module normalizes all of them into one flat string-keyed
//! mapping so that providers and the host's `authorize` callback never care
//! which content type the client picked. Fields should come from a form, so
//! every other content type is [`DecodedBody::Unsupported`] rather than an
//! error.

use std::collections::HashMap;

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Multipart},
    http::{header, Request},
};
use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::error::Error;

/// Flat mapping from form field name to its text value.
pub type Fields = HashMap<String, String>;

/// Outcome of decoding a request body.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    /// The body was decoded into form fields.
    Fields(Fields),

    /// The declared content type is not one credentials can be read from.
    ///
    /// This is a designed rejection, not an error: the caller must treat it
    /// as "no credentials could be extracted".
    Unsupported,
}

/// Decodes a request body of the declared content type into form fields.
///
/// The content type is matched with its parameters stripped and case
/// ignored. A missing header is treated like an unsupported type. Malformed
/// JSON is a hard error; malformed urlencoded pairs are silently dropped,
/// keeping the rest of the decode.
pub async fn decode(content_type: Option<&str>, body: Bytes) -> Result<DecodedBody, Error> {
    let Some(content_type) = content_type else {
        return Ok(DecodedBody::Unsupported);
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "application/json" => json_fields(&body).map(DecodedBody::Fields),
        // The bare variant is kept for clients that omit `form-`.
        "application/x-www-form-urlencoded" | "application/x-www-urlencoded" => Ok(
            DecodedBody::Fields(urlencoded_fields(&String::from_utf8_lossy(&body))),
        ),
        // The boundary parameter is needed here, so pass the full header.
        "multipart/form-data" => multipart_fields(content_type, body)
            .await
            .map(DecodedBody::Fields),
        _ => Ok(DecodedBody::Unsupported),
    }
}

fn json_fields(body: &[u8]) -> Result<Fields, Error> {
    let object: serde_json::Map<String, Value> = serde_json::from_slice(body)?;

    Ok(object
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(text) => (key, text),
            other => (key, other.to_string()),
        })
        .collect())
}

/// Splits an urlencoded body into fields.
///
/// Pairs that do not contain exactly one `=` are dropped without aborting
/// the whole decode; partial results are valid. Keys and values that do not
/// percent-decode to UTF-8 are dropped the same way.
fn urlencoded_fields(raw: &str) -> Fields {
    raw.trim()
        .split('&')
        .filter_map(|pair| {
            if pair.matches('=').count() != 1 {
                return None;
            }
            let (key, value) = pair.split_once('=')?;
            let key = percent_decode_str(key).decode_utf8().ok()?;
            let value = percent_decode_str(value).decode_utf8().ok()?;
            Some((key.into_owned(), value.into_owned()))
        })
        .collect()
}

async fn multipart_fields(content_type: &str, body: Bytes) -> Result<Fields, Error> {
    let request = Request::builder()
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))?;

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|err| Error::Multipart(err.to_string()))?;

    let mut fields = Fields::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| Error::Multipart(err.to_string()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let text = field
            .text()
            .await
            .map_err(|err| Error::Multipart(err.to_string()))?;
        fields.insert(name, text);
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

    use super::*;

    fn fields(body: DecodedBody) -> Fields {
        match body {
            DecodedBody::Fields(fields) => fields,
            DecodedBody::Unsupported => panic!("expected decoded fields"),
        }
    }

    #[tokio::test]
    async fn decodes_json_object() {
        let body = Bytes::from(r#"{"email":"bob.b@somedomain.com","password":"abcd1234!"}"#);
        let decoded = decode(Some("application/json"), body).await.unwrap();

        let fields = fields(decoded);
        assert_eq!(fields["email"], "bob.b@somedomain.com");
        assert_eq!(fields["password"], "abcd1234!");
    }

    #[tokio::test]
    async fn non_string_json_values_become_text() {
        let body = Bytes::from(r#"{"user":"bob","attempt":2}"#);
        let fields = fields(decode(Some("application/json"), body).await.unwrap());

        assert_eq!(fields["attempt"], "2");
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let body = Bytes::from(r#"{"email":"#);
        let result = decode(Some("application/json"), body).await;

        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn decodes_urlencoded_body() {
        let body = Bytes::from("email=bob.b%40somedomain.com&password=abcd1234%21");
        let decoded = decode(Some("application/x-www-form-urlencoded"), body)
            .await
            .unwrap();

        let fields = fields(decoded);
        assert_eq!(fields["email"], "bob.b@somedomain.com");
        assert_eq!(fields["password"], "abcd1234!");
    }

    #[tokio::test]
    async fn accepts_bare_urlencoded_variant() {
        let body = Bytes::from("userName=Bob");
        let decoded = decode(Some("application/x-www-urlencoded"), body)
            .await
            .unwrap();

        assert_eq!(fields(decoded)["userName"], "Bob");
    }

    #[test]
    fn urlencoded_round_trips() {
        let pairs = [("email", "a@b.com"), ("userName", "Bob Bobson")];
        let encoded = pairs
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, NON_ALPHANUMERIC),
                    utf8_percent_encode(value, NON_ALPHANUMERIC)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        let decoded = urlencoded_fields(&encoded);
        for (key, value) in pairs {
            assert_eq!(decoded[key], value);
        }
    }

    #[test]
    fn malformed_pair_drops_only_itself() {
        let decoded = urlencoded_fields("email=a%40b.com&passwordfoo&userName=Bob");

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded["email"], "a@b.com");
        assert_eq!(decoded["userName"], "Bob");
    }

    #[test]
    fn pair_with_two_separators_is_dropped() {
        let decoded = urlencoded_fields("a=1=2&b=2");

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded["b"], "2");
    }

    #[test]
    fn empty_input_decodes_to_empty_fields() {
        assert!(urlencoded_fields("").is_empty());
    }

    #[tokio::test]
    async fn decodes_multipart_body() {
        let boundary = "----fakeboundary12345";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"email\"\r\n\r\n\
             bob.b@somedomain.com\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"password\"\r\n\r\n\
             abcd1234!\r\n\
             --{boundary}--\r\n"
        );
        let content_type = format!("multipart/form-data; boundary={boundary}");

        let decoded = decode(Some(&content_type), Bytes::from(body)).await.unwrap();

        let fields = fields(decoded);
        assert_eq!(fields["email"], "bob.b@somedomain.com");
        assert_eq!(fields["password"], "abcd1234!");
    }

    #[tokio::test]
    async fn plain_text_is_unsupported() {
        let decoded = decode(Some("text/plain"), Bytes::from_static(b"Email: a@b.com"))
            .await
            .unwrap();

        assert_eq!(decoded, DecodedBody::Unsupported);
    }

    #[tokio::test]
    async fn missing_content_type_is_unsupported() {
        let decoded = decode(None, Bytes::new()).await.unwrap();

        assert_eq!(decoded, DecodedBody::Unsupported);
    }

    #[tokio::test]
    async fn content_type_parameters_are_ignored_for_matching() {
        let body = Bytes::from(r#"{"id":"u1"}"#);
        let decoded = decode(Some("Application/JSON; charset=utf-8"), body)
            .await
            .unwrap();

        assert_eq!(fields(decoded)["id"], "u1");
    }
}
