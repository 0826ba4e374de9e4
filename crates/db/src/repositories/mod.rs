//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod service_repo;
pub mod service_station_repo;
pub mod station_repo;

pub use service_repo::ServiceRepo;
pub use service_station_repo::ServiceStationRepo;
pub use station_repo::StationRepo;
