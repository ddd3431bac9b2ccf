use aide::{openapi::Tag, transform::TransformOpenApi};

use crate::{error, extract::Json};

pub mod tag {
	pub const RECIPE: &str = "Recipe";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Recetario API")
		.summary("A recipe-sharing service")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::RECIPE.into(),
			description: Some("Recipe management".into()),
			..Default::default()
		})
		.default_response_with::<Json<error::Message<'static>>, _>(|res| {
			res.example(error::Message {
				content: "error message".into(),
				field: Some("optional field".into()),
				details: None,
			})
		})
}
