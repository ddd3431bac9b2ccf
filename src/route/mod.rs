pub mod docs;
pub mod recipe;
