use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{Coordinates, Facility, FacilityId, FacilityStatus};

/// Storage abstraction over the facility roster so the scorer can be
/// exercised without a database. Reads only; scoring never mutates
/// facility data.
pub trait FacilityCatalog: Send + Sync {
    /// Facilities currently open for reservation. An empty list is a
    /// successful outcome, not an error.
    fn available(&self) -> Result<Vec<Facility>, CatalogError>;
}

/// Error enumeration for catalog failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("facility catalog unavailable: {0}")]
    Unavailable(String),
}

/// Coordinate lookup for the requesting resident, consumed when a request
/// names a resident but carries no explicit coordinates.
pub trait ResidentLookup: Send + Sync {
    fn locate(&self, resident_id: &str) -> Option<Coordinates>;
}

/// In-memory facility roster.
#[derive(Default, Clone)]
pub struct FacilityDirectory {
    facilities: Arc<Mutex<Vec<Facility>>>,
}

impl FacilityDirectory {
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self {
            facilities: Arc::new(Mutex::new(facilities)),
        }
    }

    /// Demo roster modeled on a small LGU: covered court, halls, and an
    /// open pavilion, with one venue down for maintenance.
    pub fn sample() -> Self {
        Self::new(vec![
            Facility {
                id: FacilityId("FAC-001".to_string()),
                name: "Barangay Covered Court".to_string(),
                description: "Covered multi-sport court with bleachers and night lighting"
                    .to_string(),
                amenities: "basketball court, volleyball net, bleachers".to_string(),
                location: "Barangay San Isidro".to_string(),
                capacity: 150,
                coordinates: Some(Coordinates::new(14.676, 121.0437)),
                status: FacilityStatus::Available,
            },
            Facility {
                id: FacilityId("FAC-002".to_string()),
                name: "Municipal Multi-Purpose Hall".to_string(),
                description: "Air-conditioned hall for assemblies, seminars, and trainings"
                    .to_string(),
                amenities: "conference hall, stage, sound system, projector".to_string(),
                location: "Municipal Compound, Poblacion".to_string(),
                capacity: 300,
                coordinates: Some(Coordinates::new(14.6688, 121.0509)),
                status: FacilityStatus::Available,
            },
            Facility {
                id: FacilityId("FAC-003".to_string()),
                name: "Community Events Hall".to_string(),
                description: "Event hall with a catering kitchen for weddings and receptions"
                    .to_string(),
                amenities: "event hall, catering kitchen, parking".to_string(),
                location: "Rizal Avenue".to_string(),
                capacity: 120,
                coordinates: Some(Coordinates::new(14.6542, 121.0296)),
                status: FacilityStatus::Available,
            },
            Facility {
                id: FacilityId("FAC-004".to_string()),
                name: "Town Plaza Pavilion".to_string(),
                description: "Open-air pavilion beside the plaza garden".to_string(),
                amenities: "open pavilion, garden, benches".to_string(),
                location: "Town Plaza".to_string(),
                capacity: 80,
                coordinates: None,
                status: FacilityStatus::Available,
            },
            Facility {
                id: FacilityId("FAC-005".to_string()),
                name: "Heritage Function Room".to_string(),
                description: "Function room inside the old municipal building".to_string(),
                amenities: "function room, antique furnishings".to_string(),
                location: "Heritage District".to_string(),
                capacity: 60,
                coordinates: Some(Coordinates::new(14.6611, 121.0384)),
                status: FacilityStatus::Maintenance,
            },
        ])
    }

    pub fn replace_all(&self, facilities: Vec<Facility>) {
        let mut guard = self.facilities.lock().expect("facility mutex poisoned");
        *guard = facilities;
    }
}

impl FacilityCatalog for FacilityDirectory {
    fn available(&self) -> Result<Vec<Facility>, CatalogError> {
        let guard = self.facilities.lock().expect("facility mutex poisoned");
        Ok(guard
            .iter()
            .filter(|facility| facility.is_available())
            .cloned()
            .collect())
    }
}

/// In-memory resident coordinate registry.
#[derive(Default, Clone)]
pub struct ResidentRegistry {
    coordinates: Arc<Mutex<HashMap<String, Coordinates>>>,
}

impl ResidentRegistry {
    pub fn insert(&self, resident_id: impl Into<String>, coordinates: Coordinates) {
        let mut guard = self.coordinates.lock().expect("resident mutex poisoned");
        guard.insert(resident_id.into(), coordinates);
    }
}

impl ResidentLookup for ResidentRegistry {
    fn locate(&self, resident_id: &str) -> Option<Coordinates> {
        let guard = self.coordinates.lock().expect("resident mutex poisoned");
        guard.get(resident_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_directory_excludes_unavailable_facilities() {
        let directory = FacilityDirectory::sample();
        let available = directory.available().expect("sample catalog reads");
        assert_eq!(available.len(), 4);
        assert!(available
            .iter()
            .all(|facility| facility.status == FacilityStatus::Available));
    }

    #[test]
    fn resident_registry_round_trips_coordinates() {
        let registry = ResidentRegistry::default();
        registry.insert("RES-88", Coordinates::new(14.6, 121.0));
        let found = registry.locate("RES-88").expect("resident registered");
        assert!((found.latitude - 14.6).abs() < 1e-9);
        assert!(registry.locate("RES-99").is_none());
    }
}
