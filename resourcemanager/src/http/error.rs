use std::fmt;

/// An error body returned from the Cloud Resource Manager service.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// An HTTP status value, without the textual description.
    ///
    /// Example values include: `404` (Not Found), `409` (Conflict) and `403` (Forbidden).
    pub code: u16,

    /// Description of the error.
    pub message: String,

    /// The canonical status code, e.g. `NOT_FOUND` or `ABORTED`.
    #[serde(default)]
    pub status: Option<String>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.message.fmt(f)
    }
}

impl std::error::Error for ErrorResponse {}

#[derive(serde::Deserialize)]
pub(crate) struct ErrorWrapper {
    pub(crate) error: ErrorResponse,
}
