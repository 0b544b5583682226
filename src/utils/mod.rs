pub mod array;
pub mod assets;
pub mod image;
