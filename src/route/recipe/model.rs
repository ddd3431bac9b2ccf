use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single shared recipe, as stored in the `recipes` table.
///
/// `ingredients` and `steps` hold newline-joined entries; the split forms
/// only exist in form state and in the detail payload.
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Recipe {
	/// The unique identifier of the recipe.
	pub id: Uuid,
	/// The recipe title.
	pub title: String,
	/// The display name of the author.
	pub autor: String,
	/// Preparation time in `HH:MM[:SS]` form.
	pub tiempo_preparacion: Option<String>,
	/// Number of portions, stored as text.
	pub portions: Option<String>,
	/// One of the [`Dificultad`] labels.
	pub dificultad: Option<String>,
	/// One of the [`Region`] labels.
	pub region: Option<String>,
	/// One of the [`Categoria`] labels.
	pub category: Option<String>,
	/// Newline-joined ingredient entries.
	pub ingredients: String,
	/// Newline-joined preparation steps.
	pub steps: String,
	/// Public URL of the photo, if one was uploaded.
	pub image_url: Option<String>,
	/// The creation time of the recipe; listings sort by it, newest first.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Difficulty of a recipe. Free text in storage, closed set at the form
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Dificultad {
	Facil,
	Media,
	Dificil,
}

impl Dificultad {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Facil => "facil",
			Self::Media => "media",
			Self::Dificil => "dificil",
		}
	}

	pub fn from_label(label: &str) -> Option<Self> {
		match label {
			"facil" => Some(Self::Facil),
			"media" => Some(Self::Media),
			"dificil" => Some(Self::Dificil),
			_ => None,
		}
	}
}

/// The Colombian geographic regions recipes are tagged with and filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Region {
	Andina,
	#[serde(rename = "Amazonía")]
	Amazonia,
	Caribe,
	Insular,
	#[serde(rename = "Orinoquía")]
	Orinoquia,
	#[serde(rename = "Pacífico")]
	Pacifico,
}

impl Region {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Andina => "Andina",
			Self::Amazonia => "Amazonía",
			Self::Caribe => "Caribe",
			Self::Insular => "Insular",
			Self::Orinoquia => "Orinoquía",
			Self::Pacifico => "Pacífico",
		}
	}

	pub fn from_label(label: &str) -> Option<Self> {
		match label {
			"Andina" => Some(Self::Andina),
			"Amazonía" => Some(Self::Amazonia),
			"Caribe" => Some(Self::Caribe),
			"Insular" => Some(Self::Insular),
			"Orinoquía" => Some(Self::Orinoquia),
			"Pacífico" => Some(Self::Pacifico),
			_ => None,
		}
	}
}

/// Meal-type labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Categoria {
	Desayuno,
	Almuerzo,
	Cena,
	Postre,
	Bebida,
	Entrada,
	#[serde(rename = "Plato fuerte")]
	PlatoFuerte,
}

impl Categoria {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Desayuno => "Desayuno",
			Self::Almuerzo => "Almuerzo",
			Self::Cena => "Cena",
			Self::Postre => "Postre",
			Self::Bebida => "Bebida",
			Self::Entrada => "Entrada",
			Self::PlatoFuerte => "Plato fuerte",
		}
	}

	pub fn from_label(label: &str) -> Option<Self> {
		match label {
			"Desayuno" => Some(Self::Desayuno),
			"Almuerzo" => Some(Self::Almuerzo),
			"Cena" => Some(Self::Cena),
			"Postre" => Some(Self::Postre),
			"Bebida" => Some(Self::Bebida),
			"Entrada" => Some(Self::Entrada),
			"Plato fuerte" => Some(Self::PlatoFuerte),
			_ => None,
		}
	}
}

/// Renders a stored `HH:MM[:SS]` time as a localized phrase, omitting zero
/// components. Values that do not look like a clock time come back
/// verbatim; an absent or empty value becomes "No especificado".
pub fn format_tiempo(tiempo: Option<&str>) -> String {
	let Some(tiempo) = tiempo.filter(|t| !t.is_empty()) else {
		return "No especificado".into();
	};

	let parts: Vec<&str> = tiempo.split(':').collect();

	if parts.len() < 2 {
		return tiempo.to_owned();
	}

	let hours: u32 = parts[0].trim().parse().unwrap_or(0);
	let minutes: u32 = parts[1].trim().parse().unwrap_or(0);
	let horas = if hours == 1 { "hora" } else { "horas" };

	match (hours, minutes) {
		(0, 0) => tiempo.to_owned(),
		(0, m) => format!("{m} minutos"),
		(h, 0) => format!("{h} {horas}"),
		(h, m) => format!("{h} {horas} {m} minutos"),
	}
}

/// Difficulty-to-color mapping used by the cards and the detail view.
pub fn dificultad_color(dificultad: Option<&str>) -> &'static str {
	match dificultad.map(str::to_lowercase).as_deref() {
		Some("facil") => "green",
		Some("media") => "yellow",
		Some("dificil") => "red",
		_ => "gray",
	}
}

pub fn dificultad_emoji(dificultad: Option<&str>) -> &'static str {
	match dificultad.map(str::to_lowercase).as_deref() {
		Some("facil") => "🟢",
		Some("media") => "🟡",
		Some("dificil") => "🔴",
		_ => "⚪",
	}
}

/// Splits a stored newline blob into its non-blank display items.
pub fn split_items(text: &str) -> Vec<String> {
	text.lines()
		.filter(|line| !line.trim().is_empty())
		.map(str::to_owned)
		.collect()
}

/// A recipe plus the derived presentation fields the detail view renders.
#[derive(Debug, Serialize, JsonSchema)]
pub struct RecipeDetail {
	#[serde(flatten)]
	pub recipe: Recipe,
	/// The preparation time as a readable phrase.
	pub tiempo_legible: String,
	pub dificultad_color: String,
	pub dificultad_emoji: String,
	pub ingredient_items: Vec<String>,
	pub step_items: Vec<String>,
}

impl From<Recipe> for RecipeDetail {
	fn from(recipe: Recipe) -> Self {
		Self {
			tiempo_legible: format_tiempo(recipe.tiempo_preparacion.as_deref()),
			dificultad_color: dificultad_color(recipe.dificultad.as_deref()).into(),
			dificultad_emoji: dificultad_emoji(recipe.dificultad.as_deref()).into(),
			ingredient_items: split_items(&recipe.ingredients),
			step_items: split_items(&recipe.steps),
			recipe,
		}
	}
}

/// The list view payload: recipes newest first, optionally narrowed to a
/// single region. `total` counts the recipes actually shown.
#[derive(Debug, Serialize, JsonSchema)]
pub struct RecipeList {
	pub recipes: Vec<Recipe>,
	pub total: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub region: Option<Region>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: Uuid,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ListInput {
	/// Narrow the listing to recipes of one region.
	pub region: Option<Region>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct DeleteInput {
	/// Explicit confirmation; without it the recipe is left untouched.
	#[serde(default)]
	pub confirm: bool,
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_format_tiempo() {
		assert_eq!(format_tiempo(Some("01:30")), "1 hora 30 minutos");
		assert_eq!(format_tiempo(Some("02:00")), "2 horas");
		assert_eq!(format_tiempo(Some("00:45")), "45 minutos");
		assert_eq!(format_tiempo(Some("01:30:00")), "1 hora 30 minutos");
		assert_eq!(format_tiempo(None), "No especificado");
		assert_eq!(format_tiempo(Some("")), "No especificado");
	}

	#[test]
	fn test_format_tiempo_falls_back_to_raw_value() {
		assert_eq!(format_tiempo(Some("45")), "45");
		assert_eq!(format_tiempo(Some("una hora")), "una hora");
		assert_eq!(format_tiempo(Some("00:00")), "00:00");
		assert_eq!(format_tiempo(Some("aa:bb")), "aa:bb");
	}

	#[test]
	fn test_dificultad_mapping() {
		assert_eq!(dificultad_color(Some("facil")), "green");
		assert_eq!(dificultad_color(Some("Media")), "yellow");
		assert_eq!(dificultad_color(Some("dificil")), "red");
		assert_eq!(dificultad_color(Some("extrema")), "gray");
		assert_eq!(dificultad_color(None), "gray");

		assert_eq!(dificultad_emoji(Some("facil")), "🟢");
		assert_eq!(dificultad_emoji(None), "⚪");
	}

	#[test]
	fn test_labels_round_trip() {
		for region in [
			Region::Andina,
			Region::Amazonia,
			Region::Caribe,
			Region::Insular,
			Region::Orinoquia,
			Region::Pacifico,
		] {
			assert_eq!(Region::from_label(region.as_str()), Some(region));
		}

		assert_eq!(Dificultad::from_label("facil"), Some(Dificultad::Facil));
		assert_eq!(Dificultad::from_label("Fácil"), None);
		assert_eq!(
			Categoria::from_label("Plato fuerte"),
			Some(Categoria::PlatoFuerte)
		);
		assert_eq!(Categoria::from_label("Merienda"), None);
	}

	#[test]
	fn test_split_items_drops_blanks() {
		assert_eq!(
			split_items("maíz\n\n  \nsal"),
			vec!["maíz".to_owned(), "sal".to_owned()]
		);
		assert!(split_items("").is_empty());
	}
}
