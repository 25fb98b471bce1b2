pub mod common;
pub mod forge;
