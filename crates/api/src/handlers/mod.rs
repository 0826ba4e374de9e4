pub mod matrix;
pub mod services;
pub mod stations;
