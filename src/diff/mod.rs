pub mod engine;
pub mod fields;
pub mod title;

#[cfg(test)]
pub(crate) mod test_support;

pub use engine::diff;
pub use title::{short_title, short_title_with};
