use std::collections::{BTreeMap, VecDeque};

use crate::plate::PlateGeometry;
use crate::worklist::WorklistEntry;
use crate::LayoutError;

/// Header row of every worklist file.
pub const WORKLIST_COLUMNS: [&str; 9] = [
    "DestinationPlateBarcode",
    "DestinationPlateWell",
    "SourcePlateBarcode",
    "SourcePlateWell",
    "Volume",
    "ComponentName",
    "description",
    "ice_id",
    "plasmid_id",
];

/// A worklist row ready for output, in `WORKLIST_COLUMNS` order.
pub type WorklistRecord = [String; 9];

/// Order entries for the robot.
///
/// Entries are grouped by destination well and each group is stably sorted by
/// source well. Groups are then drained round-robin in ascending destination
/// order, one entry per group per pass, until every group is empty.
pub fn merge(entries: Vec<WorklistEntry>) -> Vec<WorklistEntry> {
    let total = entries.len();
    let mut groups: BTreeMap<usize, Vec<WorklistEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.dest_well).or_default().push(entry);
    }

    let mut queues: Vec<VecDeque<WorklistEntry>> = groups
        .into_values()
        .map(|mut group| {
            group.sort_by_key(|e| e.src_well);
            VecDeque::from(group)
        })
        .collect();

    let mut merged = Vec::with_capacity(total);
    while queues.iter().any(|q| !q.is_empty()) {
        for queue in queues.iter_mut() {
            if let Some(entry) = queue.pop_front() {
                merged.push(entry);
            }
        }
    }
    merged
}

/// Render one entry as an output row, converting both well indices to labels.
pub fn to_record(
    entry: &WorklistEntry,
    geometry: &PlateGeometry,
) -> Result<WorklistRecord, LayoutError> {
    Ok([
        entry.dest_plate.clone(),
        geometry.well_label(entry.dest_well)?,
        entry.src_plate.clone(),
        geometry.well_label(entry.src_well)?,
        entry.volume.to_string(),
        entry.component_name.clone(),
        entry.description.clone(),
        entry.registry_id.clone(),
        entry.assembly_id.clone(),
    ])
}

/// Merge `entries` and render them as output rows.
pub fn serialize(
    entries: Vec<WorklistEntry>,
    geometry: &PlateGeometry,
) -> Result<Vec<WorklistRecord>, LayoutError> {
    merge(entries)
        .iter()
        .map(|entry| to_record(entry, geometry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worklist::Volume;
    use pretty_assertions::assert_eq;

    fn entry(dest_well: usize, src_well: usize, name: &str) -> WorklistEntry {
        WorklistEntry {
            dest_plate: "lcr".to_string(),
            dest_well,
            src_plate: "components".to_string(),
            src_well,
            volume: Volume(1.0),
            component_name: name.to_string(),
            description: String::new(),
            registry_id: String::new(),
            assembly_id: format!("asm{dest_well}"),
        }
    }

    fn names(entries: &[WorklistEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.component_name.as_str()).collect()
    }

    #[test]
    fn test_round_robin_uneven_groups() {
        let merged = merge(vec![
            entry(0, 0, "d0e0"),
            entry(0, 1, "d0e1"),
            entry(0, 2, "d0e2"),
            entry(1, 0, "d1e0"),
        ]);
        assert_eq!(names(&merged), vec!["d0e0", "d1e0", "d0e1", "d0e2"]);
    }

    #[test]
    fn test_sorted_by_source_within_destination() {
        let merged = merge(vec![
            entry(1, 9, "late"),
            entry(0, 5, "b"),
            entry(0, 3, "a"),
            entry(1, 2, "early"),
        ]);
        assert_eq!(names(&merged), vec!["a", "early", "b", "late"]);
    }

    #[test]
    fn test_ties_keep_accumulation_order() {
        let merged = merge(vec![
            entry(0, 4, "first"),
            entry(0, 4, "second"),
            entry(0, 1, "zeroth"),
        ]);
        assert_eq!(names(&merged), vec!["zeroth", "first", "second"]);
    }

    #[test]
    fn test_sparse_destinations() {
        // Gaps in destination indices are skipped, not waited on
        let merged = merge(vec![entry(40, 0, "far"), entry(2, 0, "near")]);
        assert_eq!(names(&merged), vec!["near", "far"]);
    }

    #[test]
    fn test_empty() {
        assert!(merge(Vec::new()).is_empty());
    }

    #[test]
    fn test_serialize_labels() {
        let records = serialize(vec![entry(1, 8, "x")], &PlateGeometry::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].to_vec(),
            vec!["lcr", "B1", "components", "A2", "1", "x", "", "", "asm1"]
        );
    }

    #[test]
    fn test_serialize_out_of_range() {
        let result = serialize(vec![entry(0, 4, "x")], &PlateGeometry::new(2, 2).unwrap());
        assert!(matches!(result, Err(LayoutError::WellOutOfRange { index: 4, .. })));
    }
}
