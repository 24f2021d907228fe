use serde::{Deserialize, Serialize};

/// Role a linked part plays inside an LCR assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartRole {
    /// Open reading frame.
    Part,
    /// Bridging oligo joining two neighbouring parts.
    Domino,
    /// Vector backbone. Also the fallback for any unrecognised subtype.
    Backbone,
}

impl PartRole {
    /// Classify from the registry's subtype tag ("ORF", "DOMINO", ...).
    pub fn from_subtype(subtype: Option<&str>) -> Self {
        match subtype {
            Some("ORF") => PartRole::Part,
            Some("DOMINO") => PartRole::Domino,
            _ => PartRole::Backbone,
        }
    }
}

impl std::fmt::Display for PartRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartRole::Part => write!(f, "part"),
            PartRole::Domino => write!(f, "domino"),
            PartRole::Backbone => write!(f, "backbone"),
        }
    }
}

/// A registry part as used by the planner. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Registry identifier (e.g. "SBC012345").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Registry entry type ("PART", "PLASMID", ...).
    pub entry_type: String,
    /// Subtype tag used for classification ("ORF", "DOMINO", ...).
    #[serde(default)]
    pub subtype: Option<String>,
    /// Cleaned-up short description.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sequence: String,
}

impl Component {
    pub fn role(&self) -> PartRole {
        PartRole::from_subtype(self.subtype.as_deref())
    }

    /// Extra fields written next to the component on a plate map:
    /// name, type, subtype, description, sequence.
    pub fn plate_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.entry_type.clone(),
            self.subtype.clone().unwrap_or_default(),
            self.description.clone(),
            self.sequence.clone(),
        ]
    }
}

/// The classified parts of a single assembly, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub parts: Vec<Component>,
    pub dominoes: Vec<Component>,
    pub backbone: Vec<Component>,
}

impl Pool {
    pub fn push(&mut self, component: Component) {
        match component.role() {
            PartRole::Part => self.parts.push(component),
            PartRole::Domino => self.dominoes.push(component),
            PartRole::Backbone => self.backbone.push(component),
        }
    }

    /// Number of components dispensed straight into the reaction well.
    pub fn direct_count(&self) -> usize {
        self.backbone.len() + self.parts.len()
    }

    pub fn len(&self) -> usize {
        self.parts.len() + self.dominoes.len() + self.backbone.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pools for every assembly of a run, kept in declared assembly order.
///
/// The position of an assembly in this list is its destination well index on
/// every destination plate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pools {
    entries: Vec<(String, Pool)>,
}

impl Pools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an assembly. Returns false (and leaves the list unchanged) if the
    /// assembly id is already present.
    pub fn insert(&mut self, assembly_id: impl Into<String>, pool: Pool) -> bool {
        let assembly_id = assembly_id.into();
        if self.contains(&assembly_id) {
            return false;
        }
        self.entries.push((assembly_id, pool));
        true
    }

    pub fn contains(&self, assembly_id: &str) -> bool {
        self.entries.iter().any(|(id, _)| id == assembly_id)
    }

    pub fn get(&self, assembly_id: &str) -> Option<&Pool> {
        self.entries
            .iter()
            .find(|(id, _)| id == assembly_id)
            .map(|(_, pool)| pool)
    }

    /// Iterate `(destination index, assembly id, pool)` in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, &Pool)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, (id, pool))| (idx, id.as_str(), pool))
    }

    pub fn assembly_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
