#![warn(clippy::pedantic)]

mod error;
mod extract;
mod openapi;
mod route;
mod storage;
#[cfg(test)]
mod test;

use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{extract::Request, Extension, Router, ServiceExt};
use tower::Layer;
use tower_http::{
	cors::CorsLayer, normalize_path::NormalizePathLayer, services::ServeDir, trace::TraceLayer,
};

pub use error::AppError;
use storage::PhotoStore;

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the database connection pool or the photo store.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub photos: PhotoStore,
}

/// Assembles the full application router: the documented recipe API, the
/// OpenAPI document, and the static photo objects.
fn app(state: State) -> Router {
	let mut api = OpenApi::default();
	let photos_dir = state.photos.root().to_path_buf();

	ApiRouter::new()
		.nest("/recipes", route::recipe::routes())
		.nest("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.nest_service("/photos", ServeDir::new(photos_dir))
		.layer(Extension(Arc::new(api)))
		.layer(CorsLayer::permissive())
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt::init();
	dotenvy::dotenv().ok();

	let state = State {
		database: Database::connect(
			&std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
		)
		.await
		.expect("failed to connect to database"),
		photos: PhotoStore::new(
			std::env::var("PHOTOS_DIR").unwrap_or_else(|_| "data/photos".into()),
			"/photos",
		),
	};

	sqlx::migrate!()
		.run(&state.database)
		.await
		.expect("failed to run migrations");

	let port = std::env::var("PORT").map_or_else(
		|_| 3000,
		|port| port.parse().expect("PORT must be a number"),
	);

	let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", port);

	// trailing-slash variants of every route resolve to the same handler
	let app = NormalizePathLayer::trim_trailing_slash().layer(app(state));

	axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
		.await
		.unwrap();
}
