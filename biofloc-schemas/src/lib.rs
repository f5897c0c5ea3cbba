pub mod expense;
pub mod file_formats;
pub mod measurement;
pub mod mortality;
pub mod record;
pub mod tank;
