use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::domain::{Coordinates, Facility, FacilityId, FacilityStatus};

/// Capacity assigned when a row's capacity column is missing or not numeric.
pub const DEFAULT_CAPACITY: u32 = 50;

/// Error enumeration for catalog imports. Malformed fields inside a row are
/// coerced, never fatal; only an unreadable file or record fails the batch.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read facility roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid facility CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// CSV loader for the facility roster. Expected columns: id, name,
/// description, amenities, location, capacity, latitude, longitude, status.
pub struct FacilityCsvImporter;

impl FacilityCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Facility>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Facility>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut facilities = Vec::new();

        for record in csv_reader.deserialize::<FacilityRow>() {
            let row = record?;
            facilities.push(row.into_facility());
        }

        Ok(facilities)
    }
}

#[derive(Debug, Deserialize)]
struct FacilityRow {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    amenities: String,
    #[serde(default)]
    location: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    capacity: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    latitude: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    longitude: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

impl FacilityRow {
    fn into_facility(self) -> Facility {
        let capacity = match self.capacity.as_deref().map(str::parse::<u32>) {
            Some(Ok(value)) => value,
            Some(Err(_)) => {
                debug!(facility = %self.id, "non-numeric capacity coerced to default");
                DEFAULT_CAPACITY
            }
            None => DEFAULT_CAPACITY,
        };

        let coordinates = match (
            self.latitude.as_deref().and_then(parse_finite),
            self.longitude.as_deref().and_then(parse_finite),
        ) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        };

        let status = self
            .status
            .as_deref()
            .map(FacilityStatus::from_label)
            .unwrap_or(FacilityStatus::Closed);

        Facility {
            id: FacilityId(self.id),
            name: self.name,
            description: self.description,
            amenities: self.amenities,
            location: self.location,
            capacity,
            coordinates,
            status,
        }
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|inner| !inner.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "id,name,description,amenities,location,capacity,latitude,longitude,status\n";

    fn import(rows: &str) -> Vec<Facility> {
        let csv = format!("{HEADER}{rows}");
        FacilityCsvImporter::from_reader(Cursor::new(csv.into_bytes())).expect("csv imports")
    }

    #[test]
    fn imports_well_formed_rows() {
        let facilities = import(
            "FAC-001,Covered Court,Multi-sport court,basketball court,San Isidro,150,14.676,121.0437,available\n",
        );
        assert_eq!(facilities.len(), 1);
        let court = &facilities[0];
        assert_eq!(court.id, FacilityId("FAC-001".to_string()));
        assert_eq!(court.capacity, 150);
        assert_eq!(court.status, FacilityStatus::Available);
        let coordinates = court.coordinates.expect("coordinates parsed");
        assert!((coordinates.latitude - 14.676).abs() < 1e-9);
    }

    #[test]
    fn coerces_non_numeric_capacity_to_default() {
        let facilities =
            import("FAC-002,Hall,,conference hall,Poblacion,lots,14.6688,121.0509,available\n");
        assert_eq!(facilities[0].capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn missing_coordinates_stay_absent() {
        let facilities = import("FAC-004,Pavilion,,open pavilion,Plaza,80,,,available\n");
        assert!(facilities[0].coordinates.is_none());
    }

    #[test]
    fn partial_coordinates_are_dropped() {
        let facilities = import("FAC-006,Annex,,meeting room,Poblacion,40,14.66,,available\n");
        assert!(facilities[0].coordinates.is_none());
    }

    #[test]
    fn unknown_status_imports_as_closed() {
        let facilities = import("FAC-005,Function Room,,function room,Heritage,60,,,retired\n");
        assert_eq!(facilities[0].status, FacilityStatus::Closed);
    }

    #[test]
    fn missing_status_imports_as_closed() {
        let facilities = import("FAC-007,Old Gym,,gym,Poblacion,90,,,\n");
        assert_eq!(facilities[0].status, FacilityStatus::Closed);
    }
}
