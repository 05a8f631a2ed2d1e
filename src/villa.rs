//! The Villa record and its field catalogue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single villa listing.
///
/// `id`, `created_date` and `updated_date` are owned by the store: clients
/// may send them, but the store assigns or overwrites them on every write.
/// Missing fields deserialize to their defaults so that validation, not
/// the decoder, reports what is wrong with a sparse body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Villa {
    pub id: i64,
    pub name: String,
    pub details: Option<String>,
    pub rate: f64,
    pub sqft: i32,
    pub occupancy: i32,
    pub image_url: Option<String>,
    pub amenities: String,
    pub created_date: Option<DateTime<Utc>>,
    pub updated_date: Option<DateTime<Utc>>,
}

impl Villa {
    /// Build an unsaved villa (id 0) with the required fields set.
    pub fn new(name: impl Into<String>, rate: f64, sqft: i32, occupancy: i32) -> Self {
        Self {
            name: name.into(),
            rate,
            sqft,
            occupancy,
            ..Self::default()
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_amenities(mut self, amenities: impl Into<String>) -> Self {
        self.amenities = amenities.into();
        self
    }

    /// Case-insensitive name key used for the uniqueness invariant.
    pub fn name_key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

/// Wire names of the fields a client may edit.
pub const MUTABLE_FIELDS: &[&str] = &[
    "name",
    "details",
    "rate",
    "sqft",
    "occupancy",
    "imageUrl",
    "amenities",
];

/// Wire names of the fields only the store may write.
pub const READ_ONLY_FIELDS: &[&str] = &["id", "createdDate", "updatedDate"];

/// The two sample listings the service starts with when seeding is enabled.
pub fn seed_villas() -> Vec<Villa> {
    vec![
        Villa::new("Pool View", 200.0, 550, 4)
            .with_details("Quiet villa overlooking the main pool.")
            .with_amenities("Pool access, Wi-Fi"),
        Villa::new("Beach View", 300.0, 750, 6)
            .with_details("Beachfront villa with a private deck.")
            .with_amenities("Beach access, Wi-Fi, Parking"),
    ]
}
