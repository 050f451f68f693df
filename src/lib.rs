pub mod analyzer;
pub mod api;
pub mod error;
pub mod extract;
pub mod graph;
pub mod knowledge;
pub mod model;
pub mod repair;
pub mod schema;
pub mod validate;
pub mod wasm;
