//! Error kinds returned by the bunny.net API client

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be sent or the response could not be received
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The API rejected the access key (HTTP 401)
    #[error("authentication failed for {url}: {message}")]
    Authentication { url: String, message: String },

    /// Non-2xx response carrying a structured error body
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Non-2xx response whose body is not a structured error
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("decoding response body of {url} failed: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported {kind} value: {value}")]
    UnknownEnumValue { kind: &'static str, value: i64 },

    #[error("invalid request path {path:?}: {reason}")]
    InvalidUrl { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Structured error body returned by the API on validation or business-rule failures
#[derive(Error, Debug, Clone, PartialEq, Eq, Deserialize)]
#[error("{message} (http status {status}, url: {url})")]
pub struct ApiError {
    #[serde(skip)]
    pub status: u16,
    #[serde(skip)]
    pub url: String,
    #[serde(rename = "ErrorKey", default)]
    pub error_key: Option<String>,
    #[serde(rename = "Field", default)]
    pub field: Option<String>,
    #[serde(rename = "Message")]
    pub message: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("http request to {url} failed with status {status}: {body}")]
pub struct HttpError {
    pub status: u16,
    pub url: String,
    pub body: String,
}

impl Error {
    /// Structured API error, if this is one
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Turn a non-2xx response into an error kind
///
/// 401 is always an authentication error. Any other status is an [`ApiError`]
/// when the body parses as one, and an [`HttpError`] carrying the raw body otherwise.
pub fn classify_response(status: u16, url: &str, body: &[u8]) -> Error {
    let parsed = serde_json::from_slice::<ApiError>(body);

    if status == 401 {
        let message = match parsed {
            Ok(api_err) => api_err.message,
            Err(_) => String::from_utf8_lossy(body).into_owned(),
        };
        return Error::Authentication {
            url: url.to_owned(),
            message,
        };
    }

    match parsed {
        Ok(mut api_err) => {
            api_err.status = status;
            api_err.url = url.to_owned();
            Error::Api(api_err)
        }
        Err(_) => Error::Http(HttpError {
            status,
            url: url.to_owned(),
            body: String::from_utf8_lossy(body).into_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const URL: &str = "https://api.bunny.net/pullzone/1";

    #[test]
    fn unauthorized_is_authentication_error() {
        let err = classify_response(401, URL, br#"{"Message":"The access key is invalid"}"#);
        match err {
            Error::Authentication { url, message } => {
                assert_eq!(url, URL);
                assert_eq!(message, "The access key is invalid");
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn unauthorized_without_json_keeps_raw_body() {
        let err = classify_response(401, URL, b"denied");
        assert!(matches!(err, Error::Authentication { message, .. } if message == "denied"));
    }

    #[test]
    fn structured_body_is_api_error() {
        let err = classify_response(
            400,
            URL,
            br#"{"ErrorKey":"pullzone.validation","Field":"OriginUrl","Message":"x"}"#,
        );
        let api_err = err.as_api_error().expect("api error");
        assert_eq!(
            api_err,
            &ApiError {
                status: 400,
                url: URL.to_owned(),
                error_key: Some("pullzone.validation".to_owned()),
                field: Some("OriginUrl".to_owned()),
                message: "x".to_owned(),
            }
        );
    }

    #[test]
    fn unparseable_body_is_http_error() {
        let err = classify_response(500, URL, b"oops");
        match err {
            Error::Http(http_err) => {
                assert_eq!(http_err.status, 500);
                assert_eq!(http_err.body, "oops");
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn json_without_message_is_http_error() {
        let err = classify_response(404, URL, br#"{"Other":1}"#);
        assert!(matches!(err, Error::Http(HttpError { status: 404, .. })));
    }
}
