pub use axum_test::{
	multipart::{MultipartForm, Part},
	TestServer,
};

use crate::{storage::PhotoStore, Database, State};

/// Builds a test server over the real application router, with a
/// throwaway photo directory per call.
pub fn app(pool: Database) -> TestServer {
	app_with_photos(pool).0
}

/// Like [`app`], but also hands back the photo directory so tests can
/// observe the stored objects themselves.
pub fn app_with_photos(pool: Database) -> (TestServer, std::path::PathBuf) {
	let root = std::env::temp_dir().join(format!("recetario-test-{}", uuid::Uuid::new_v4()));
	let photos = PhotoStore::new(root.clone(), "/photos");

	let server = TestServer::new(crate::app(State {
		database: pool,
		photos,
	}))
	.unwrap();

	(server, root)
}

/// The scalar fields of a valid submission, without region or the
/// ingredient/step lists, so tests can vary those.
pub fn form_base(title: &str) -> MultipartForm {
	MultipartForm::new()
		.add_text("title", title)
		.add_text("autor", "Ana")
		.add_text("tiempo_preparacion", "00:30")
		.add_text("portions", "2")
		.add_text("dificultad", "facil")
		.add_text("category", "Desayuno")
}

/// A complete, valid submission with the given title and region.
pub fn recipe_form(title: &str, region: &str) -> MultipartForm {
	form_base(title)
		.add_text("region", region)
		.add_text("ingredients", "maíz")
		.add_text("steps", "mezclar")
}

pub fn arepa_form() -> MultipartForm {
	recipe_form("Arepa", "Caribe")
}
