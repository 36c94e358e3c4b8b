//! Reqwest-backed user directory adapter.
//!
//! This adapter owns transport details only: the bounded lookup timeout,
//! HTTP status interpretation, and decoding of the directory's user payload.
//! A 404 from the directory is a definitive "no such user" and surfaces as
//! `Ok(false)`; every other failure mode is an error so callers cannot
//! mistake an outage for a missing user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::domain::ports::{UserDirectory, UserDirectoryError};

/// Upper bound on a single directory lookup.
pub const DIRECTORY_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Directory adapter that performs HTTP GET lookups against one base URL.
pub struct HttpUserDirectory {
    client: Client,
    base_url: Url,
}

/// Subset of the directory's user payload needed to confirm existence.
#[derive(Debug, Deserialize)]
struct DirectoryUserDto {
    id: i64,
}

impl HttpUserDirectory {
    /// Build an adapter with the default five second lookup timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, DIRECTORY_LOOKUP_TIMEOUT)
    }

    /// Build an adapter with an explicit lookup timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn user_url(&self, user_id: i64) -> Result<Url, UserDirectoryError> {
        self.base_url
            .join(&format!("users/{user_id}"))
            .map_err(|err| UserDirectoryError::transport(err.to_string()))
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn user_exists(&self, user_id: i64) -> Result<bool, UserDirectoryError> {
        let url = self.user_url(user_id)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        interpret_response(status, body.as_ref(), user_id)
    }
}

/// Turn a directory response into the port's answer.
///
/// 404 is a definitive negative. A 200 whose payload names a different
/// identifier is also a negative, never an error. Every other status is
/// unexpected and unverifiable.
fn interpret_response(
    status: StatusCode,
    body: &[u8],
    user_id: i64,
) -> Result<bool, UserDirectoryError> {
    match status {
        StatusCode::NOT_FOUND => Ok(false),
        StatusCode::OK => Ok(decode_user(body)?.id == user_id),
        other => Err(UserDirectoryError::UnexpectedStatus {
            status: other.as_u16(),
        }),
    }
}

fn decode_user(body: &[u8]) -> Result<DirectoryUserDto, UserDirectoryError> {
    serde_json::from_slice(body)
        .map_err(|err| UserDirectoryError::decode(format!("invalid directory payload: {err}")))
}

fn map_transport_error(error: reqwest::Error) -> UserDirectoryError {
    if error.is_timeout() {
        UserDirectoryError::timeout(error.to_string())
    } else {
        UserDirectoryError::transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    fn directory() -> HttpUserDirectory {
        let base = Url::parse("http://user-service:8081/").expect("base URL parses");
        HttpUserDirectory::new(base).expect("client builds")
    }

    #[test]
    fn lookup_url_appends_the_user_id() {
        let url = directory().user_url(42).expect("URL joins");
        assert_eq!(url.as_str(), "http://user-service:8081/users/42");
    }

    #[test]
    fn decodes_a_directory_user_payload() {
        let user = decode_user(br#"{"id": 42, "name": "Ada"}"#).expect("payload decodes");
        assert_eq!(user.id, 42);
    }

    #[rstest]
    #[case::empty_body(b"" as &[u8])]
    #[case::not_json(b"<html>upstream error</html>")]
    #[case::missing_id(br#"{"name": "Ada"}"#)]
    fn undecodable_payloads_map_to_decode_errors(#[case] body: &[u8]) {
        let error = decode_user(body).expect_err("decode must fail");
        assert!(matches!(error, UserDirectoryError::Decode { .. }));
    }

    #[rstest]
    #[case::matching_id(StatusCode::OK, br#"{"id": 42}"# as &[u8], Ok(true))]
    #[case::mismatched_id(StatusCode::OK, br#"{"id": 7}"#, Ok(false))]
    #[case::missing_user(StatusCode::NOT_FOUND, b"", Ok(false))]
    #[case::server_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        b"boom",
        Err(UserDirectoryError::UnexpectedStatus { status: 500 })
    )]
    #[case::forbidden(
        StatusCode::FORBIDDEN,
        b"",
        Err(UserDirectoryError::UnexpectedStatus { status: 403 })
    )]
    fn interprets_statuses_and_payloads(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: Result<bool, UserDirectoryError>,
    ) {
        assert_eq!(interpret_response(status, body, 42), expected);
    }

    #[test]
    fn ok_with_garbage_payload_is_a_decode_error() {
        let error = interpret_response(StatusCode::OK, b"not json", 42)
            .expect_err("garbage payload must fail");
        assert!(matches!(error, UserDirectoryError::Decode { .. }));
    }
}
