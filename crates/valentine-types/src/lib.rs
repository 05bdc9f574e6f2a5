pub mod api;
pub mod vocab;
