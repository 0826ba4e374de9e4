//! Station entity model and DTOs.

use salon_core::matrix::StationSummary;
use salon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `stations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Station {
    pub id: DbId,
    pub name: String,
    pub is_active: bool,
    pub display_order: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Station> for StationSummary {
    fn from(s: Station) -> Self {
        Self {
            id: s.id,
            name: s.name,
            is_active: s.is_active,
            display_order: s.display_order,
        }
    }
}

/// DTO for creating a new station.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStation {
    pub name: String,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

/// DTO for updating an existing station. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStation {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}
