use aide::transform::TransformOperation;
use axum::extract::State;
use validator::Validate;

use crate::{
	error::AppError,
	extract::{FormData, Json, Path, Query},
	openapi::tag,
	storage::StoredPhoto,
	AppState,
};

use super::{form::RecipeForm, model, Error, RouteError};

/// Returns every recipe, newest first. With `region` set, the fetched list
/// is narrowed in memory to that region, keeping the relative order. A
/// failed fetch is logged and degrades to an empty listing.
pub async fn list_recipes(
	State(state): State<AppState>,
	Query(filter): Query<model::ListInput>,
) -> Json<model::RecipeList> {
	let rows = sqlx::query_as::<_, model::Recipe>(
		r#"
			SELECT * FROM recipes
			ORDER BY created_at DESC
		"#,
	)
	.fetch_all(&state.database)
	.await;

	let recipes = match rows {
		Ok(recipes) => recipes,
		Err(error) => {
			tracing::error!(%error, "failed to fetch recipes");
			Vec::new()
		}
	};

	let recipes = match filter.region {
		Some(region) => recipes
			.into_iter()
			.filter(|recipe| recipe.region.as_deref() == Some(region.as_str()))
			.collect(),
		None => recipes,
	};

	Json(model::RecipeList {
		total: recipes.len(),
		region: filter.region,
		recipes,
	})
}

pub fn list_recipes_docs(op: TransformOperation) -> TransformOperation {
	op.summary("List recipes")
		.description("Returns all recipes, newest first, optionally narrowed to one region.")
		.tag(tag::RECIPE)
}

/// Returns a single recipe by its unique id, together with the derived
/// presentation fields the detail view renders.
pub async fn get_recipe(
	State(state): State<AppState>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::RecipeDetail>, RouteError> {
	let recipe = sqlx::query_as::<_, model::Recipe>(
		r#"
			SELECT * FROM recipes
			WHERE id = $1
		"#,
	)
	.bind(path.id)
	.fetch_optional(&state.database)
	.await?;

	Ok(Json(recipe.ok_or(Error::UnknownRecipe(path.id))?.into()))
}

pub fn get_recipe_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Get a single recipe")
		.description("Returns a single recipe by its unique id, with presentation fields.")
		.tag(tag::RECIPE)
}

/// Creates a new recipe from a multipart form submission.
///
/// The photo, when present, is uploaded before the row is written; if the
/// insert then fails, the uploaded object is removed again so it cannot be
/// orphaned.
pub async fn create_recipe(
	State(state): State<AppState>,
	FormData(mut multipart): FormData,
) -> Result<Json<model::Recipe>, RouteError> {
	let (form, photo) = RecipeForm::from_multipart(&mut multipart).await?;

	form.validate().map_err(AppError::Validation)?;

	if form.ingredients.is_blank() {
		return Err(Error::EmptyIngredients.into());
	}

	if form.steps.is_blank() {
		return Err(Error::EmptySteps.into());
	}

	let photo = match photo {
		Some(upload) => Some(
			state
				.photos
				.store(&upload.file_name, &upload.bytes)
				.await
				.map_err(AppError::Storage)?,
		),
		None => None,
	};

	let inserted = sqlx::query_as::<_, model::Recipe>(
		r#"
			INSERT INTO recipes
				(title, autor, tiempo_preparacion, portions, dificultad, region, category, ingredients, steps, image_url)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
			RETURNING *
		"#,
	)
	.bind(&form.title)
	.bind(&form.autor)
	.bind(&form.tiempo_preparacion)
	.bind(&form.portions)
	.bind(form.dificultad.map(model::Dificultad::as_str))
	.bind(form.region.map(model::Region::as_str))
	.bind(form.category.map(model::Categoria::as_str))
	.bind(form.ingredients.join())
	.bind(form.steps.join())
	.bind(photo.as_ref().map(|stored| stored.url.clone()))
	.fetch_one(&state.database)
	.await;

	match inserted {
		Ok(recipe) => Ok(Json(recipe)),
		Err(error) => {
			discard_photo(&state, photo).await;
			Err(error.into())
		}
	}
}

pub fn create_recipe_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Create recipe")
		.description(
			"Creates a new recipe from a multipart form. Text fields: title, autor, \
			 tiempo_preparacion, portions, dificultad, region, category; repeatable \
			 fields: ingredients, steps; optional file field: photo.",
		)
		.tag(tag::RECIPE)
}

/// Updates an existing recipe from the same form as the create flow.
///
/// Without a new photo the stored `image_url` is left untouched; with one,
/// the photo is uploaded first and the URL overwritten.
pub async fn update_recipe(
	State(state): State<AppState>,
	Path(path): Path<model::IdInput>,
	FormData(mut multipart): FormData,
) -> Result<Json<model::Recipe>, RouteError> {
	let (form, photo) = RecipeForm::from_multipart(&mut multipart).await?;

	form.validate().map_err(AppError::Validation)?;

	if form.ingredients.is_blank() {
		return Err(Error::EmptyIngredients.into());
	}

	if form.steps.is_blank() {
		return Err(Error::EmptySteps.into());
	}

	let photo = match photo {
		Some(upload) => Some(
			state
				.photos
				.store(&upload.file_name, &upload.bytes)
				.await
				.map_err(AppError::Storage)?,
		),
		None => None,
	};

	let updated = sqlx::query_as::<_, model::Recipe>(
		r#"
			UPDATE recipes
			SET title = $1, autor = $2, tiempo_preparacion = $3, portions = $4,
				dificultad = $5, region = $6, category = $7, ingredients = $8,
				steps = $9, image_url = COALESCE($10, image_url)
			WHERE id = $11
			RETURNING *
		"#,
	)
	.bind(&form.title)
	.bind(&form.autor)
	.bind(&form.tiempo_preparacion)
	.bind(&form.portions)
	.bind(form.dificultad.map(model::Dificultad::as_str))
	.bind(form.region.map(model::Region::as_str))
	.bind(form.category.map(model::Categoria::as_str))
	.bind(form.ingredients.join())
	.bind(form.steps.join())
	.bind(photo.as_ref().map(|stored| stored.url.clone()))
	.bind(path.id)
	.fetch_optional(&state.database)
	.await;

	match updated {
		Ok(Some(recipe)) => Ok(Json(recipe)),
		Ok(None) => {
			discard_photo(&state, photo).await;
			Err(Error::UnknownRecipe(path.id).into())
		}
		Err(error) => {
			discard_photo(&state, photo).await;
			Err(error.into())
		}
	}
}

pub fn update_recipe_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Update recipe")
		.description(
			"Updates an existing recipe by its unique id. Takes the same multipart \
			 form as the create operation; the stored photo is kept unless a new \
			 one is submitted.",
		)
		.tag(tag::RECIPE)
}

/// Deletes an existing recipe by its unique id. The request must carry
/// `confirm=true`; a declined confirmation issues no database call.
pub async fn delete_recipe(
	State(state): State<AppState>,
	Path(path): Path<model::IdInput>,
	Query(input): Query<model::DeleteInput>,
) -> Result<(), RouteError> {
	if !input.confirm {
		return Err(Error::ConfirmationRequired.into());
	}

	let status = sqlx::query(
		r#"
			DELETE FROM recipes
			WHERE id = $1
		"#,
	)
	.bind(path.id)
	.execute(&state.database)
	.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownRecipe(path.id).into());
	}

	Ok(())
}

pub fn delete_recipe_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Delete recipe")
		.description("Deletes an existing recipe by its unique id. Requires confirm=true.")
		.tag(tag::RECIPE)
}

/// Compensating action of the upload-then-write saga: removes an object
/// whose row never made it to the table.
async fn discard_photo(state: &AppState, photo: Option<StoredPhoto>) {
	let Some(stored) = photo else { return };

	if let Err(error) = state.photos.remove(&stored.key).await {
		tracing::warn!(key = %stored.key, %error, "failed to remove orphaned photo");
	}
}
