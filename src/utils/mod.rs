pub mod constants;
pub mod markup;

pub use constants::*;
pub use markup::{escape_attr, find_link_with_attr, insert_before, replace_first};
