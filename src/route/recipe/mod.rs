use std::borrow::Cow;

use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::{error, AppState};

pub mod form;
pub mod model;
pub mod route;

/// Errors specific to the recipe flows.
///
/// The messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown recipe {0}")]
	UnknownRecipe(Uuid),
	#[error("invalid value for {field}")]
	InvalidField { field: String, value: String },
	#[error("a recipe needs at least one ingredient")]
	EmptyIngredients,
	#[error("a recipe needs at least one step")]
	EmptySteps,
	#[error("deletion must be confirmed")]
	ConfirmationRequired,
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(list_recipes, list_recipes_docs).post_with(create_recipe, create_recipe_docs),
		)
		.api_route(
			"/:id",
			get_with(get_recipe, get_recipe_docs)
				.put_with(update_recipe, update_recipe_docs)
				.delete_with(delete_recipe, delete_recipe_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownRecipe(..) => StatusCode::NOT_FOUND,
			Self::InvalidField { .. } | Self::EmptyIngredients | Self::EmptySteps => {
				StatusCode::BAD_REQUEST
			}
			Self::ConfirmationRequired => StatusCode::PRECONDITION_REQUIRED,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownRecipe(recipe) => vec![error::Message {
				content: "unknown_recipe".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("recipe".into(), json!(recipe));
					map
				})),
			}],
			Self::InvalidField { field, value } => vec![error::Message {
				content: self.to_string().into(),
				field: Some(field.as_str().into()),
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("value".into(), json!(value));
					map
				})),
			}],
			Self::EmptyIngredients => vec![error::Message {
				content: self.to_string().into(),
				field: Some("ingredients".into()),
				details: None,
			}],
			Self::EmptySteps => vec![error::Message {
				content: self.to_string().into(),
				field: Some("steps".into()),
				details: None,
			}],
			Self::ConfirmationRequired => vec![error::Message {
				content: self.to_string().into(),
				field: None,
				details: None,
			}],
		}
	}
}
