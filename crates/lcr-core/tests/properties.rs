use std::collections::{BTreeMap, HashSet};

use lcr_core::merge::merge;
use lcr_core::{
    Component, ComponentGroup, PlateGeometry, Pool, Pools, Volume, WellAllocator, WorklistBuilder,
    WorklistEntry, WorklistError,
};
use proptest::prelude::*;

fn entry(dest_well: usize, src_well: usize, tag: usize) -> WorklistEntry {
    WorklistEntry {
        dest_plate: "lcr".to_string(),
        dest_well,
        src_plate: "components".to_string(),
        src_well,
        volume: Volume(1.0),
        component_name: format!("c{tag}"),
        description: String::new(),
        registry_id: String::new(),
        assembly_id: String::new(),
    }
}

fn part(id: String) -> Component {
    Component {
        id: id.clone(),
        name: id,
        entry_type: "PART".to_string(),
        subtype: Some("ORF".to_string()),
        description: String::new(),
        sequence: String::new(),
    }
}

proptest! {
    #[test]
    fn allocation_is_contiguous_and_unique(
        n_keys in 0usize..40,
        water_at in proptest::option::of(0usize..40),
        destinations in 0usize..24,
    ) {
        let mut groups: Vec<ComponentGroup> =
            (0..n_keys).map(|i| ComponentGroup::new(format!("k{i}"))).collect();
        if let Some(pos) = water_at {
            groups.insert(pos.min(groups.len()), ComponentGroup::new("water"));
        }

        let allocator = WellAllocator::new(PlateGeometry::default(), destinations);
        let required = allocator.wells_required(&groups);
        let result = allocator.allocate("plate", &groups);

        if required > 96 {
            prop_assert!(result.is_err());
            return Ok(());
        }
        let map = result.unwrap();

        // Every well index 0..required used exactly once, in input order
        let rows = map.rows();
        let indices: Vec<usize> = rows.iter().map(|(_, r)| r.index).collect();
        prop_assert_eq!(indices, (0..required).collect::<Vec<_>>());
        let ordered_keys: Vec<&str> = rows.iter().map(|(k, _)| *k).collect();
        let mut expected = Vec::new();
        for g in &groups {
            if g.key == "water" {
                expected.extend(std::iter::repeat(g.key.as_str()).take(destinations));
            } else {
                expected.push(g.key.as_str());
            }
        }
        prop_assert_eq!(ordered_keys, expected);

        if water_at.is_some() {
            let water = map.get("water").unwrap().records();
            prop_assert_eq!(water.len(), destinations);
            for pair in water.windows(2) {
                prop_assert_eq!(pair[1].index, pair[0].index + 1);
            }
        }
    }

    #[test]
    fn merge_preserves_each_destination_sequence(
        raw in proptest::collection::vec((0usize..8, 0usize..96), 0..120),
    ) {
        let entries: Vec<WorklistEntry> = raw
            .iter()
            .enumerate()
            .map(|(tag, (dest, src))| entry(*dest, *src, tag))
            .collect();

        // Expected per-destination order: stable sort by source well
        let mut expected: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        let mut sorted = entries.clone();
        sorted.sort_by_key(|e| e.src_well);
        for e in &sorted {
            expected.entry(e.dest_well).or_default().push(e.component_name.clone());
        }

        let merged = merge(entries);
        prop_assert_eq!(merged.len(), raw.len());

        let mut regrouped: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for e in &merged {
            regrouped.entry(e.dest_well).or_default().push(e.component_name.clone());
        }
        prop_assert_eq!(regrouped, expected);

        // Round-robin: the k-th pass emits at most one entry per destination
        let mut seen_in_pass: HashSet<usize> = HashSet::new();
        let mut last_dest: Option<usize> = None;
        for e in &merged {
            if let Some(prev) = last_dest {
                if e.dest_well <= prev {
                    seen_in_pass.clear();
                }
            }
            prop_assert!(seen_in_pass.insert(e.dest_well));
            last_dest = Some(e.dest_well);
        }
    }

    #[test]
    fn water_volumes_never_negative(
        part_counts in proptest::collection::vec(0usize..12, 1..10),
        total in 0.0f64..20.0,
        part_volume in 0.0f64..3.0,
    ) {
        let mut pools = Pools::new();
        let mut groups = vec![ComponentGroup::new("water")];
        for (a, count) in part_counts.iter().enumerate() {
            let mut pool = Pool::default();
            for p in 0..*count {
                let id = format!("a{a}p{p}");
                groups.push(ComponentGroup::new(id.clone()));
                pool.push(part(id));
            }
            pools.insert(format!("A{a}"), pool);
        }
        let allocator = WellAllocator::new(PlateGeometry::new(32, 48).unwrap(), pools.len());
        let wells = allocator.allocate("plate", &groups).unwrap();

        let builder = WorklistBuilder::new("lcr", &pools, &wells);
        match builder.water(total, part_volume) {
            Ok(worklist) => {
                for e in worklist {
                    prop_assert!(e.volume.value() >= 0.0);
                }
            }
            Err(WorklistError::VolumeBudget { volume, .. }) => prop_assert!(volume < 0.0),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

#[test]
fn three_assemblies_water_first() {
    let allocator = WellAllocator::new(PlateGeometry::default(), 3);
    let groups: Vec<ComponentGroup> = ["water", "g1", "g2", "g3", "g4"]
        .into_iter()
        .map(ComponentGroup::from)
        .collect();
    let map = allocator.allocate("MastermixTrough", &groups).unwrap();

    let water: Vec<usize> = (0..3)
        .map(|d| map.source_well("water", d).unwrap().index)
        .collect();
    assert_eq!(water, vec![0, 1, 2]);
    let others: Vec<usize> = ["g1", "g2", "g3", "g4"]
        .iter()
        .map(|k| map.source_well(k, 0).unwrap().index)
        .collect();
    assert_eq!(others, vec![3, 4, 5, 6]);
}
