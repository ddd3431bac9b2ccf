use std::borrow::Cow;

use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;

/// Extra key/value context attached to an error message.
pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message presented to the client.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'e> {
	/// A short machine-readable description of the error.
	pub content: Cow<'e, str>,
	/// The input field the error relates to, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'e, str>>,
	/// Additional structured context.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'e, Map>>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'e> {
	pub success: bool,
	pub errors: Vec<Message<'e>>,
}

/// The shape of an error that can be rendered as a JSON response.
///
/// Route modules implement this for their domain errors; the response
/// envelope is shared so every error looks the same on the wire.
pub trait ErrorShape {
	fn status(&self) -> StatusCode;
	fn errors(&self) -> Vec<Message<'_>>;

	fn response(&self) -> Response<Body> {
		(
			self.status(),
			Json(ErrorResponse {
				success: false,
				errors: self.errors(),
			}),
		)
			.into_response()
	}
}

/// Error type for failures that are not specific to a single route.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("query string error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("path parameter error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("multipart field error: {0}")]
	Multipart(#[from] axum::extract::multipart::MultipartError),
	#[error("multipart body rejected: {0}")]
	MultipartRejection(#[from] axum::extract::multipart::MultipartRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("storage error: {0}")]
	Storage(#[from] std::io::Error),
}

impl ErrorShape for AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..)
			| Self::Query(..)
			| Self::Path(..)
			| Self::Multipart(..)
			| Self::MultipartRejection(..) => StatusCode::BAD_REQUEST,
			Self::Database(..) | Self::Storage(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors.iter().map(move |error| Message {
						content: error.code.clone(),
						field: Some(Cow::Borrowed(field)),
						details: None,
					})
				})
				.collect(),
			Self::Query(error) => vec![Message {
				content: error.to_string().into(),
				field: None,
				details: None,
			}],
			Self::Path(error) => vec![Message {
				content: error.to_string().into(),
				field: None,
				details: None,
			}],
			Self::Multipart(error) => vec![Message {
				content: error.to_string().into(),
				field: None,
				details: None,
			}],
			Self::MultipartRejection(error) => vec![Message {
				content: error.to_string().into(),
				field: None,
				details: None,
			}],
			// Internal details stay out of the response body
			Self::Database(..) | Self::Storage(..) => vec![Message {
				content: "internal_error".into(),
				field: None,
				details: None,
			}],
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		self.response()
	}
}

/// An error returned from a route handler: either an ambient [`AppError`]
/// or the route module's own error type.
#[derive(Debug)]
pub enum RouteError<E> {
	App(AppError),
	Route(E),
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.response(),
			Self::Route(error) => error.response(),
		}
	}
}

impl<E> aide::OperationOutput for RouteError<E> {
	type Inner = Self;
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<validator::ValidationErrors> for RouteError<E> {
	fn from(errors: validator::ValidationErrors) -> Self {
		Self::App(AppError::Validation(errors))
	}
}

impl<E> From<sqlx::Error> for RouteError<E> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(AppError::Database(error))
	}
}

impl<E> From<std::io::Error> for RouteError<E> {
	fn from(error: std::io::Error) -> Self {
		Self::App(AppError::Storage(error))
	}
}
