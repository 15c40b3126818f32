//! Database operations for registered service centers.

use autocare_core::{Coordinates, RegisteredCenter};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `registered_service_centers` view.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RegisteredCenterRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub google_place_id: Option<String>,
    pub average_rating: Option<f64>,
}

impl From<RegisteredCenterRow> for RegisteredCenter {
    fn from(row: RegisteredCenterRow) -> Self {
        // A center with only one coordinate has no usable position.
        let location = match (row.latitude, row.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        };
        let google_place_id = row.google_place_id.filter(|id| !id.trim().is_empty());
        RegisteredCenter {
            id: row.id,
            name: row.name,
            address: row.address,
            location,
            google_place_id,
            average_rating: row.average_rating,
        }
    }
}

/// Returns every active registered center, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_registered_centers(pool: &PgPool) -> Result<Vec<RegisteredCenterRow>, DbError> {
    let rows = sqlx::query_as::<_, RegisteredCenterRow>(
        "SELECT id, name, address, latitude, longitude, google_place_id, average_rating \
         FROM registered_service_centers \
         ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> RegisteredCenterRow {
        RegisteredCenterRow {
            id: Uuid::nil(),
            name: "Main Street Auto".to_string(),
            address: "12 Main St".to_string(),
            latitude: Some(40.0),
            longitude: Some(-74.0),
            google_place_id: Some("ChIJ123".to_string()),
            average_rating: Some(4.5),
        }
    }

    #[test]
    fn row_with_coordinates_has_location() {
        let center = RegisteredCenter::from(row());
        assert_eq!(center.location, Some(Coordinates::new(40.0, -74.0)));
        assert_eq!(center.google_place_id.as_deref(), Some("ChIJ123"));
    }

    #[test]
    fn half_located_row_has_no_location() {
        let center = RegisteredCenter::from(RegisteredCenterRow {
            longitude: None,
            ..row()
        });
        assert_eq!(center.location, None);
    }

    #[test]
    fn blank_place_id_is_dropped() {
        let center = RegisteredCenter::from(RegisteredCenterRow {
            google_place_id: Some(String::new()),
            ..row()
        });
        assert_eq!(center.google_place_id, None);
    }
}
