pub mod api;
pub mod calc;
pub mod profile;
