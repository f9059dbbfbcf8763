pub mod error;
pub mod media_type;
pub mod owner;

pub use error::FilterError;
pub use media_type::TypeFilter;
pub use owner::{filter_by_owner, filter_by_category, Owned};
