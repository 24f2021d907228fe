use std::cell::RefCell;
use std::collections::HashMap;

use lcr_core::Component;
use lcr_registry::{
    MemoryRegistry, PartClassifier, PartRegistry, RegistryEntry, RegistryError,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const REGISTRY_JSON: &str = include_str!("fixtures/registry.json");

/// Wraps a registry and counts lookups per id.
struct CountingRegistry {
    inner: MemoryRegistry,
    calls: RefCell<HashMap<String, usize>>,
}

impl CountingRegistry {
    fn new(inner: MemoryRegistry) -> Self {
        Self {
            inner,
            calls: RefCell::new(HashMap::new()),
        }
    }

    fn calls(&self, id: &str) -> usize {
        self.calls.borrow().get(id).copied().unwrap_or(0)
    }
}

impl PartRegistry for CountingRegistry {
    fn fetch(&self, id: &str) -> Result<RegistryEntry, RegistryError> {
        *self.calls.borrow_mut().entry(id.to_string()).or_default() += 1;
        self.inner.fetch(id)
    }
}

fn ids(components: &[Component]) -> Vec<&str> {
    components.iter().map(|c| c.id.as_str()).collect()
}

fn assemblies(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_scenario_assembly_pool() {
    let registry = MemoryRegistry::from_json(REGISTRY_JSON).unwrap();
    let mut classifier = PartClassifier::new(registry);
    let pools = classifier.classify(&assemblies(&["A1"])).unwrap();
    let pool = pools.get("A1").unwrap();

    assert_eq!(ids(&pool.backbone), vec!["BB1", "BB2"]);
    assert_eq!(ids(&pool.parts), vec!["ORF1"]);
    assert_eq!(ids(&pool.dominoes), vec!["DOM1", "DOM2"]);
    assert_eq!(pool.backbone[0].description, "Backbone_high copy");
}

#[test]
fn test_each_part_fetched_once() {
    let registry = CountingRegistry::new(MemoryRegistry::from_json(REGISTRY_JSON).unwrap());
    let mut classifier = PartClassifier::new(&registry);

    classifier.classify(&assemblies(&["A1", "A2"])).unwrap();
    classifier.classify(&assemblies(&["A2", "A1"])).unwrap();
    classifier.order(&assemblies(&["A1", "A2"])).unwrap();

    for id in ["A1", "A2", "BB1", "BB2", "ORF1", "ORF2", "DOM1", "DOM2", "DOM3"] {
        assert_eq!(registry.calls(id), 1, "{id} fetched more than once");
    }
}

#[test]
fn test_order_across_assemblies() {
    let registry = MemoryRegistry::from_json(REGISTRY_JSON).unwrap();
    let mut classifier = PartClassifier::new(registry);
    let order = classifier.order(&assemblies(&["A2", "A1"])).unwrap();
    assert_eq!(
        ids(&order),
        vec!["BB1", "BB2", "DOM1", "DOM2", "DOM3", "ORF1", "ORF2"]
    );
}

#[test]
fn test_pools_follow_declared_order() {
    let registry = MemoryRegistry::from_json(REGISTRY_JSON).unwrap();
    let mut classifier = PartClassifier::new(registry);
    let pools = classifier.classify(&assemblies(&["A2", "A1"])).unwrap();
    let order: Vec<&str> = pools.assembly_ids().collect();
    assert_eq!(order, vec!["A2", "A1"]);
}

fn matching(
    part_ids: &[String],
    subtypes: &[Option<&str>],
    wanted: fn(Option<&str>) -> bool,
) -> Vec<String> {
    part_ids
        .iter()
        .zip(subtypes)
        .filter(|(_, s)| wanted(**s))
        .map(|(id, _)| id.clone())
        .collect()
}

proptest! {
    #[test]
    fn classification_is_a_partition(
        subtypes in proptest::collection::vec(
            prop_oneof![
                Just(Some("ORF")),
                Just(Some("DOMINO")),
                Just(Some("BACKBONE")),
                Just(Some("promoter")),
                Just(None),
            ],
            0..30,
        )
    ) {
        let mut registry = MemoryRegistry::new();
        let part_ids: Vec<String> = (0..subtypes.len()).map(|i| format!("P{i:03}")).collect();
        for (id, subtype) in part_ids.iter().zip(&subtypes) {
            registry.insert(RegistryEntry {
                id: id.clone(),
                name: id.clone(),
                entry_type: "PART".to_string(),
                subtype: subtype.map(String::from),
                short_description: String::new(),
                sequence: String::new(),
                linked_parts: None,
            });
        }
        registry.insert(RegistryEntry {
            id: "ASM".to_string(),
            name: "asm".to_string(),
            entry_type: "PLASMID".to_string(),
            subtype: None,
            short_description: String::new(),
            sequence: String::new(),
            linked_parts: Some(part_ids.clone()),
        });

        let mut classifier = PartClassifier::new(registry);
        let pools = classifier.classify(&["ASM".to_string()]).unwrap();
        let pool = pools.get("ASM").unwrap();

        prop_assert_eq!(pool.len(), part_ids.len());

        // Each sequence is the ordered subsequence of the input with that role
        let got = |components: &[Component]| -> Vec<String> {
            components.iter().map(|c| c.id.clone()).collect()
        };
        prop_assert_eq!(got(&pool.parts), matching(&part_ids, &subtypes, |s| s == Some("ORF")));
        prop_assert_eq!(
            got(&pool.dominoes),
            matching(&part_ids, &subtypes, |s| s == Some("DOMINO"))
        );
        prop_assert_eq!(
            got(&pool.backbone),
            matching(&part_ids, &subtypes, |s| s != Some("ORF") && s != Some("DOMINO"))
        );
    }
}
