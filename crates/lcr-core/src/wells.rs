use std::collections::BTreeMap;

use tracing::debug;

use crate::plate::PlateGeometry;
use crate::LayoutError;

/// Reagent replicated across one source well per destination.
pub const WATER: &str = "water";

/// One physical source well holding a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellRecord {
    pub index: usize,
    pub plate_id: String,
    /// Free-form columns written after the component key on the plate map.
    pub extra: Vec<String>,
}

/// Where a component lives: a single well, or one well per destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WellAssignment {
    Single(WellRecord),
    PerDestination(Vec<WellRecord>),
}

impl WellAssignment {
    pub fn records(&self) -> &[WellRecord] {
        match self {
            WellAssignment::Single(record) => std::slice::from_ref(record),
            WellAssignment::PerDestination(records) => records,
        }
    }

    fn plate_id(&self) -> Option<&str> {
        self.records().first().map(|r| r.plate_id.as_str())
    }
}

/// Component key -> source well(s). Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentWellMap {
    entries: BTreeMap<String, WellAssignment>,
}

impl ComponentWellMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        assignment: WellAssignment,
    ) -> Result<(), LayoutError> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(LayoutError::DuplicateKey {
                plate_id: assignment.plate_id().unwrap_or_default().to_string(),
                key,
            });
        }
        self.entries.insert(key, assignment);
        Ok(())
    }

    /// Merge another map into this one, rejecting key collisions.
    pub fn extend(&mut self, other: ComponentWellMap) -> Result<(), LayoutError> {
        for (key, assignment) in other.entries {
            self.insert(key, assignment)?;
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&WellAssignment> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Source well to draw `key` from when dispensing into `destination`.
    ///
    /// Single-well components ignore the destination; replicated ones return
    /// the well dedicated to that destination.
    pub fn source_well(&self, key: &str, destination: usize) -> Result<&WellRecord, LayoutError> {
        match self.entries.get(key) {
            None => Err(LayoutError::MissingComponent {
                key: key.to_string(),
            }),
            Some(WellAssignment::Single(record)) => Ok(record),
            Some(WellAssignment::PerDestination(records)) => {
                records
                    .get(destination)
                    .ok_or_else(|| LayoutError::MissingDestination {
                        key: key.to_string(),
                        destination,
                    })
            }
        }
    }

    /// Every (key, well) pair, sorted by well index.
    pub fn rows(&self) -> Vec<(&str, &WellRecord)> {
        let mut rows: Vec<(&str, &WellRecord)> = self
            .entries
            .iter()
            .flat_map(|(key, assignment)| {
                assignment
                    .records()
                    .iter()
                    .map(move |record| (key.as_str(), record))
            })
            .collect();
        rows.sort_by_key(|(_, record)| record.index);
        rows
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A component to place on a plate: its key plus extra plate-map columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentGroup {
    pub key: String,
    pub extra: Vec<String>,
}

impl ComponentGroup {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            extra: Vec::new(),
        }
    }

    pub fn with_fields(key: impl Into<String>, extra: Vec<String>) -> Self {
        Self {
            key: key.into(),
            extra,
        }
    }
}

impl From<&str> for ComponentGroup {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Assigns component groups to sequential wells of a plate.
///
/// The replicated reagent (water by default) is expanded into one well per
/// destination so every reaction well has its own source well; all other
/// groups take exactly one well.
#[derive(Debug, Clone)]
pub struct WellAllocator {
    geometry: PlateGeometry,
    destinations: usize,
    replicated_key: String,
}

impl WellAllocator {
    pub fn new(geometry: PlateGeometry, destinations: usize) -> Self {
        Self {
            geometry,
            destinations,
            replicated_key: WATER.to_string(),
        }
    }

    pub fn with_replicated_key(mut self, key: impl Into<String>) -> Self {
        self.replicated_key = key.into();
        self
    }

    pub fn geometry(&self) -> PlateGeometry {
        self.geometry
    }

    /// Number of wells `groups` will occupy.
    pub fn wells_required(&self, groups: &[ComponentGroup]) -> usize {
        groups
            .iter()
            .map(|g| {
                if g.key == self.replicated_key {
                    self.destinations
                } else {
                    1
                }
            })
            .sum()
    }

    pub fn allocate(
        &self,
        plate_id: &str,
        groups: &[ComponentGroup],
    ) -> Result<ComponentWellMap, LayoutError> {
        let requested = self.wells_required(groups);
        let capacity = self.geometry.capacity();
        if requested > capacity {
            return Err(LayoutError::CapacityExceeded {
                plate_id: plate_id.to_string(),
                requested,
                capacity,
            });
        }

        let mut map = ComponentWellMap::new();
        let mut cursor = 0usize;

        for group in groups {
            let record = |index: usize| WellRecord {
                index,
                plate_id: plate_id.to_string(),
                extra: group.extra.clone(),
            };

            let assignment = if group.key == self.replicated_key {
                let records: Vec<WellRecord> =
                    (cursor..cursor + self.destinations).map(record).collect();
                cursor += self.destinations;
                WellAssignment::PerDestination(records)
            } else {
                let single = record(cursor);
                cursor += 1;
                WellAssignment::Single(single)
            };

            map.insert(group.key.clone(), assignment)
                .map_err(|_| LayoutError::DuplicateKey {
                    plate_id: plate_id.to_string(),
                    key: group.key.clone(),
                })?;
        }

        debug!(plate_id, components = map.len(), wells = cursor, "allocated plate");
        Ok(map)
    }
}
