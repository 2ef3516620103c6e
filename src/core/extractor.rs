use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::core::error::AppError;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection::Json(rejection)),
        }
    }
}

/// JSON extractor that also runs `validator` rules before the handler sees the body.
///
/// Field failures are reported as `InvalidFields`, so clients get one message
/// per offending field.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let AppJson(value) = AppJson::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|e| AppJsonRejection::Invalid(AppError::InvalidFields(e)))?;
        Ok(Self(value))
    }
}

pub enum AppJsonRejection {
    Json(JsonRejection),
    Invalid(AppError),
}

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let rejection = match self {
            AppJsonRejection::Json(rejection) => rejection,
            AppJsonRejection::Invalid(err) => return err.into_response(),
        };

        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}
