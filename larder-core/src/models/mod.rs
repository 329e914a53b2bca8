mod envelope;
mod ingredient;
mod recipe;
mod recipe_image;
mod sync_status;
mod table;
mod tag;

pub use envelope::{timestamp_now, Entity, FieldRef, Record, SyncMeta};
pub use ingredient::Ingredient;
pub use recipe::Recipe;
pub use recipe_image::RecipeImage;
pub use sync_status::SyncStatus;
pub use table::Table;
pub use tag::{RecipeTag, Tag};
