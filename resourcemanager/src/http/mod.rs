use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Response;

pub mod error;
pub mod folders;
pub mod iam;
pub mod organizations;
pub mod projects;
pub mod resource_manager_client;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An error returned from the Cloud Resource Manager service.
    #[error(transparent)]
    Response(#[from] error::ErrorResponse),

    /// An error from the underlying HTTP client.
    #[error(transparent)]
    HttpClient(#[from] reqwest::Error),

    /// An error from one of the middleware used.
    #[error(transparent)]
    HttpMiddleware(anyhow::Error),

    /// An error from a token source.
    #[error("token source failed: {0}")]
    TokenSource(Box<dyn std::error::Error + Send + Sync>),
}

impl From<reqwest_middleware::Error> for Error {
    fn from(error: reqwest_middleware::Error) -> Self {
        match error {
            reqwest_middleware::Error::Middleware(err) => Error::HttpMiddleware(err),
            reqwest_middleware::Error::Reqwest(err) => Error::HttpClient(err),
        }
    }
}

impl Error {
    /// Whether the error reports the target resource as absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Response(e) => e.code == 404 || e.status.as_deref() == Some("NOT_FOUND"),
            Error::HttpClient(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Whether the error reports a write conflict, e.g. a `setIamPolicy` call
    /// carrying an etag that no longer matches the current policy.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Response(e) => e.code == 409 || e.status.as_deref() == Some("ABORTED"),
            Error::HttpClient(e) => e.status() == Some(reqwest::StatusCode::CONFLICT),
            _ => false,
        }
    }
}

/// Checks whether an HTTP response is successful and returns it, or returns an error.
pub(crate) async fn check_response_status(response: Response) -> Result<Response, Error> {
    // Check the status code, returning the response if it is not an error.
    let error = match response.error_for_status_ref() {
        Ok(_) => return Ok(response),
        Err(error) => error,
    };

    // try to extract a response error, falling back to the status error if it can not be parsed.
    Err(response
        .json::<error::ErrorWrapper>()
        .await
        .map(|wrapper| Error::Response(wrapper.error))
        .unwrap_or(Error::HttpClient(error)))
}

pub(crate) trait Escape {
    fn escape(&self) -> String;
}

impl Escape for String {
    fn escape(&self) -> String {
        utf8_percent_encode(self, ENCODE_SET).to_string()
    }
}

const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'*').remove(b'-').remove(b'.').remove(b'_');
