use std::path::{Path, PathBuf};

use tokio::fs;

/// Local object store for recipe photos.
///
/// Objects live under a root directory and are addressed by a key of the
/// form `images/<epoch-ms>_<original-filename>`; the same key appended to
/// the public base yields the URL stored on the recipe row, which stays
/// valid for as long as the object exists.
#[derive(Debug, Clone)]
pub struct PhotoStore {
	root: PathBuf,
	public_base: String,
}

/// A stored object: its key inside the store and its public URL.
#[derive(Debug)]
pub struct StoredPhoto {
	pub key: String,
	pub url: String,
}

impl PhotoStore {
	pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
		Self {
			root: root.into(),
			public_base: public_base.into(),
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Writes the uploaded bytes under a fresh timestamped key and returns
	/// the key together with its public URL.
	pub async fn store(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<StoredPhoto> {
		let key = object_key(file_name);
		let path = self.root.join(&key);

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).await?;
		}

		fs::write(&path, bytes).await?;

		let url = self.public_url(&key);
		Ok(StoredPhoto { key, url })
	}

	/// Deletes a stored object. Used as the compensating action when a row
	/// write fails after its photo was already uploaded.
	pub async fn remove(&self, key: &str) -> std::io::Result<()> {
		fs::remove_file(self.root.join(key)).await
	}

	pub fn public_url(&self, key: &str) -> String {
		format!("{}/{key}", self.public_base.trim_end_matches('/'))
	}
}

fn object_key(file_name: &str) -> String {
	let stamp = chrono::Utc::now().timestamp_millis();

	format!("images/{stamp}_{}", sanitize_file_name(file_name))
}

/// Normalizes an uploaded file name into something safe to embed in an
/// object key. Anything outside `[A-Za-z0-9._-]` becomes an underscore.
fn sanitize_file_name(name: &str) -> String {
	let sanitized: String = name
		.chars()
		.map(|c| {
			if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
				c
			} else {
				'_'
			}
		})
		.collect();

	if sanitized.is_empty() {
		"photo".into()
	} else {
		sanitized
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn store() -> PhotoStore {
		let root = std::env::temp_dir().join(format!("recetario-store-{}", uuid::Uuid::new_v4()));

		PhotoStore::new(root, "/photos")
	}

	#[test]
	fn test_sanitize_file_name() {
		assert_eq!(sanitize_file_name("arepa de huevo.png"), "arepa_de_huevo.png");
		assert_eq!(sanitize_file_name("../evil"), ".._evil");
		assert_eq!(sanitize_file_name(""), "photo");
	}

	#[test]
	fn test_public_url_joins_key() {
		let store = PhotoStore::new("/tmp/photos", "/photos/");

		assert_eq!(store.public_url("images/1_a.png"), "/photos/images/1_a.png");
	}

	#[tokio::test]
	async fn test_store_and_remove() {
		let store = store();

		let stored = store.store("foto.png", b"not a real png").await.unwrap();

		assert!(stored.key.starts_with("images/"));
		assert!(stored.key.ends_with("_foto.png"));
		assert_eq!(stored.url, format!("/photos/{}", stored.key));
		assert_eq!(
			tokio::fs::read(store.root().join(&stored.key)).await.unwrap(),
			b"not a real png"
		);

		store.remove(&stored.key).await.unwrap();

		assert!(!store.root().join(&stored.key).exists());
	}
}
