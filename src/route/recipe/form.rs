use axum::extract::multipart::{Field, Multipart};
use validator::{Validate, ValidationError};

use crate::error::AppError;

use super::{
	model::{split_items, Categoria, Dificultad, Region},
	Error, RouteError,
};

/// An ordered sequence of ingredient or step entries with value semantics.
///
/// The form keeps a floor of one slot so there is always a row to type
/// into; blank entries are only dropped when the list is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemList(Vec<String>);

impl Default for ItemList {
	fn default() -> Self {
		Self(vec![String::new()])
	}
}

impl ItemList {
	pub fn new() -> Self {
		Self::default()
	}

	/// Wraps existing entries, falling back to a single empty slot.
	pub fn from_items(items: Vec<String>) -> Self {
		if items.is_empty() {
			Self::new()
		} else {
			Self(items)
		}
	}

	/// Splits a stored newline blob back into form slots.
	pub fn from_text(text: &str) -> Self {
		Self::from_items(split_items(text))
	}

	pub fn append(mut self, item: impl Into<String>) -> Self {
		self.0.push(item.into());
		self
	}

	/// Removes the slot at `index`, keeping at least one slot. Out-of-range
	/// indices leave the list unchanged.
	pub fn remove_at(mut self, index: usize) -> Self {
		if self.0.len() > 1 && index < self.0.len() {
			self.0.remove(index);
		}

		self
	}

	pub fn update_at(mut self, index: usize, value: impl Into<String>) -> Self {
		if let Some(slot) = self.0.get_mut(index) {
			*slot = value.into();
		}

		self
	}

	pub fn items(&self) -> &[String] {
		&self.0
	}

	/// The entries that survive persistence: blanks removed, order kept.
	pub fn filtered(&self) -> Vec<String> {
		self.0
			.iter()
			.filter(|item| !item.trim().is_empty())
			.cloned()
			.collect()
	}

	pub fn is_blank(&self) -> bool {
		self.0.iter().all(|item| item.trim().is_empty())
	}

	/// Joins the non-blank entries with newlines for storage.
	pub fn join(&self) -> String {
		self.filtered().join("\n")
	}
}

fn validate_portions(portions: &str) -> Result<(), ValidationError> {
	match portions.parse::<u32>() {
		Ok(n) if n >= 1 => Ok(()),
		_ => Err(ValidationError::new("portions_not_positive")),
	}
}

/// The editable field set shared by the create and edit flows.
///
/// All scalar fields are required; the closed-set fields are parsed into
/// their enums while the form is collected, so invalid labels never reach
/// validation, let alone storage.
#[derive(Debug, Default, Validate)]
pub struct RecipeForm {
	#[validate(length(min = 1))]
	pub title: String,
	#[validate(length(min = 1))]
	pub autor: String,
	#[validate(length(min = 1))]
	pub tiempo_preparacion: String,
	#[validate(length(min = 1), custom(function = "validate_portions"))]
	pub portions: String,
	#[validate(required)]
	pub dificultad: Option<Dificultad>,
	#[validate(required)]
	pub region: Option<Region>,
	#[validate(required)]
	pub category: Option<Categoria>,
	pub ingredients: ItemList,
	pub steps: ItemList,
}

/// A photo file attached to a form submission.
#[derive(Debug)]
pub struct PhotoUpload {
	pub file_name: String,
	pub bytes: Vec<u8>,
}

impl RecipeForm {
	/// Collects the fields of a multipart create/edit submission.
	///
	/// Repeated `ingredients`/`steps` fields keep their submission order.
	/// An empty `photo` part (no file chosen) counts as no photo, and an
	/// empty value on a closed-set field counts as missing rather than
	/// invalid. Unknown fields are ignored.
	pub async fn from_multipart(
		multipart: &mut Multipart,
	) -> Result<(Self, Option<PhotoUpload>), RouteError> {
		let mut form = Self::default();
		let mut ingredients = Vec::new();
		let mut steps = Vec::new();
		let mut photo = None;

		while let Some(field) = multipart.next_field().await.map_err(AppError::Multipart)? {
			let Some(name) = field.name().map(str::to_owned) else {
				continue;
			};

			match name.as_str() {
				"title" => form.title = text(field).await?,
				"autor" => form.autor = text(field).await?,
				"tiempo_preparacion" => form.tiempo_preparacion = text(field).await?,
				"portions" => form.portions = text(field).await?,
				"dificultad" => form.dificultad = labeled(field, Dificultad::from_label).await?,
				"region" => form.region = labeled(field, Region::from_label).await?,
				"category" => form.category = labeled(field, Categoria::from_label).await?,
				"ingredients" => ingredients.push(text(field).await?),
				"steps" => steps.push(text(field).await?),
				"photo" => {
					let file_name = field.file_name().unwrap_or_default().to_owned();
					let bytes = field.bytes().await.map_err(AppError::Multipart)?;

					if !file_name.is_empty() && !bytes.is_empty() {
						photo = Some(PhotoUpload {
							file_name,
							bytes: bytes.to_vec(),
						});
					}
				}
				_ => {}
			}
		}

		form.ingredients = ItemList::from_items(ingredients);
		form.steps = ItemList::from_items(steps);

		Ok((form, photo))
	}
}

async fn text(field: Field<'_>) -> Result<String, RouteError> {
	Ok(field.text().await.map_err(AppError::Multipart)?)
}

/// Reads a closed-set field, mapping its label through `parse`.
async fn labeled<T>(
	field: Field<'_>,
	parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, RouteError> {
	let name = field.name().unwrap_or_default().to_owned();
	let value = field.text().await.map_err(AppError::Multipart)?;

	if value.is_empty() {
		return Ok(None);
	}

	match parse(&value) {
		Some(parsed) => Ok(Some(parsed)),
		None => Err(Error::InvalidField {
			field: name,
			value,
		}
		.into()),
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_item_list_starts_with_one_slot() {
		assert_eq!(ItemList::new().items(), [String::new()]);
		assert_eq!(ItemList::from_items(Vec::new()).items(), [String::new()]);
		assert_eq!(ItemList::from_text("").items(), [String::new()]);
	}

	#[test]
	fn test_item_list_value_operations() {
		let list = ItemList::new()
			.update_at(0, "maíz")
			.append("sal")
			.append("agua");

		assert_eq!(list.items(), ["maíz", "sal", "agua"]);

		let list = list.remove_at(1);

		assert_eq!(list.items(), ["maíz", "agua"]);

		// out-of-range removal is a no-op
		assert_eq!(list.clone().remove_at(9).items(), ["maíz", "agua"]);
	}

	#[test]
	fn test_item_list_keeps_floor_of_one() {
		let list = ItemList::new().remove_at(0);

		assert_eq!(list.items().len(), 1);
	}

	#[test]
	fn test_filtered_join_round_trip() {
		let list = ItemList::from_items(vec![
			"maíz".into(),
			"  ".into(),
			"sal".into(),
			String::new(),
			"agua".into(),
		]);

		let joined = list.join();
		let reread = ItemList::from_text(&joined);

		assert_eq!(reread.filtered(), list.filtered());
		assert_eq!(list.filtered(), vec!["maíz", "sal", "agua"]);
	}

	#[test]
	fn test_blank_list_detection() {
		assert!(ItemList::new().is_blank());
		assert!(ItemList::from_items(vec!["  ".into()]).is_blank());
		assert!(!ItemList::new().update_at(0, "maíz").is_blank());
	}

	#[test]
	fn test_portions_must_be_positive() {
		assert!(validate_portions("4").is_ok());
		assert!(validate_portions("0").is_err());
		assert!(validate_portions("-2").is_err());
		assert!(validate_portions("dos").is_err());
	}

	#[test]
	fn test_empty_form_fails_validation() {
		let form = RecipeForm::default();
		let errors = form.validate().unwrap_err();
		let fields = errors.field_errors();

		assert!(fields.contains_key("title"));
		assert!(fields.contains_key("autor"));
		assert!(fields.contains_key("dificultad"));
		assert!(fields.contains_key("region"));
		assert!(fields.contains_key("category"));
	}
}
