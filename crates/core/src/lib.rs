//! Domain core for the salon operations backend.
//!
//! Holds the shared id/timestamp types, the domain error type, catalogue
//! validation for services and stations, and the service/station
//! configuration matrix. Nothing in here touches the database; the
//! persistence collaborator is reached through [`matrix::MatrixBackend`].

pub mod catalog;
pub mod diff;
pub mod error;
pub mod matrix;
pub mod types;
