//! Wire models for the authentication endpoints. Internal to the gateway.

use serde::{Deserialize, Serialize};

/// Body of a challenge verification request.
#[derive(Serialize, Debug)]
pub(crate) struct VerifyCodeRequest<'a> {
    pub code: &'a str,
}

/// Error envelope the service returns on non-2xx statuses.
#[derive(Deserialize, Debug)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}
