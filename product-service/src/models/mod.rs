pub mod product;

pub use product::{Product, ProductFields};
