use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::component::{Component, Pools};
use crate::wells::{ComponentWellMap, WellAssignment, WellRecord, WATER};
use crate::WorklistError;

/// Volume dispensed into a bulk pool well before it is split out.
pub const DEFAULT_POOL_VOLUME: f64 = 500.0;

/// A dispense volume in microlitres.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Volume(pub f64);

impl Volume {
    /// Decimal places a robot can dispense.
    pub const PRECISION: i32 = 4;

    /// `value` rounded to [`Volume::PRECISION`] places, with `-0` folded to `0`.
    pub fn rounded(value: f64) -> Self {
        let scale = 10f64.powi(Self::PRECISION);
        let rounded = (value * scale).round() / scale;
        Volume(if rounded == 0.0 { 0.0 } else { rounded })
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Volume {
    /// Shortest decimal form, rounded to 4 places: `12.5`, `7`, `12.4`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Volume::rounded(self.0).0)
    }
}

/// One pipetting instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorklistEntry {
    pub dest_plate: String,
    pub dest_well: usize,
    pub src_plate: String,
    pub src_well: usize,
    pub volume: Volume,
    pub component_name: String,
    pub description: String,
    /// Registry id of the dispensed part; empty for reagents and pools.
    pub registry_id: String,
    pub assembly_id: String,
}

/// Intermediate pools built ahead of the final reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    Domino,
    Phospho,
}

impl PoolKind {
    /// Component-well key of the pool built for `assembly_id`.
    pub fn key(&self, assembly_id: &str) -> String {
        match self {
            PoolKind::Domino => format!("{assembly_id}_domino_pool"),
            PoolKind::Phospho => format!("{assembly_id}_phospho_pool"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PoolKind::Domino => "domino pool",
            PoolKind::Phospho => "phospho pool",
        }
    }
}

/// Builds the instruction lists for one destination plate.
///
/// Destination well `i` always receives assembly `i` of `pools`.
#[derive(Debug, Clone, Copy)]
pub struct WorklistBuilder<'a> {
    dest_plate: &'a str,
    pools: &'a Pools,
    wells: &'a ComponentWellMap,
}

impl<'a> WorklistBuilder<'a> {
    pub fn new(dest_plate: &'a str, pools: &'a Pools, wells: &'a ComponentWellMap) -> Self {
        Self {
            dest_plate,
            pools,
            wells,
        }
    }

    pub fn dest_plate(&self) -> &str {
        self.dest_plate
    }

    /// Water to top each reaction up to `total`, given that every backbone and
    /// ORF part contributes `part_volume`.
    pub fn water(&self, total: f64, part_volume: f64) -> Result<Vec<WorklistEntry>, WorklistError> {
        let mut worklist = Vec::with_capacity(self.pools.len());
        for (dest, assembly_id, pool) in self.pools.iter() {
            let volume = total - pool.direct_count() as f64 * part_volume;
            worklist.push(self.reagent_entry(dest, assembly_id, WATER, volume)?);
        }
        debug!(dest_plate = self.dest_plate, entries = worklist.len(), "water worklist");
        Ok(worklist)
    }

    /// Backbone at `backbone_volume` followed by ORFs at `orf_volume`.
    pub fn parts(
        &self,
        backbone_volume: f64,
        orf_volume: f64,
    ) -> Result<Vec<WorklistEntry>, WorklistError> {
        let mut worklist = Vec::new();
        for (dest, assembly_id, pool) in self.pools.iter() {
            for component in &pool.backbone {
                worklist.push(self.component_entry(dest, assembly_id, component, backbone_volume)?);
            }
            for component in &pool.parts {
                worklist.push(self.component_entry(dest, assembly_id, component, orf_volume)?);
            }
        }
        debug!(dest_plate = self.dest_plate, entries = worklist.len(), "parts worklist");
        Ok(worklist)
    }

    /// Bulk domino pools: one pool well per assembly on this plate, holding
    /// every domino at `domino_volume` made up to `pool_volume` with water.
    ///
    /// Returns the instructions and the pool wells created on this plate.
    pub fn domino_pools(
        &self,
        domino_volume: f64,
        pool_volume: f64,
    ) -> Result<(Vec<WorklistEntry>, ComponentWellMap), WorklistError> {
        let mut worklist = Vec::new();
        for (dest, assembly_id, pool) in self.pools.iter() {
            let water = pool_volume - pool.dominoes.len() as f64 * domino_volume;
            worklist.push(self.reagent_entry(dest, assembly_id, WATER, water)?);
            for domino in &pool.dominoes {
                worklist.push(self.component_entry(dest, assembly_id, domino, domino_volume)?);
            }
        }
        let wells = self.pool_wells(PoolKind::Domino)?;
        debug!(dest_plate = self.dest_plate, entries = worklist.len(), "domino pool worklist");
        Ok((worklist, wells))
    }

    /// Pool wells of `kind` created on this plate, one per destination.
    pub fn pool_wells(&self, kind: PoolKind) -> Result<ComponentWellMap, WorklistError> {
        let mut wells = ComponentWellMap::new();
        for (dest, assembly_id, _) in self.pools.iter() {
            wells.insert(
                kind.key(assembly_id),
                WellAssignment::Single(WellRecord {
                    index: dest,
                    plate_id: self.dest_plate.to_string(),
                    extra: Vec::new(),
                }),
            )?;
        }
        Ok(wells)
    }

    /// Transfer of each assembly's previously built pool into its reaction.
    pub fn pool_transfer(
        &self,
        kind: PoolKind,
        volume: f64,
    ) -> Result<Vec<WorklistEntry>, WorklistError> {
        let mut worklist = Vec::with_capacity(self.pools.len());
        for (dest, assembly_id, _) in self.pools.iter() {
            let key = kind.key(assembly_id);
            let src = self.wells.source_well(&key, dest)?;
            worklist.push(self.entry(
                dest,
                assembly_id,
                src,
                volume,
                kind.label(),
                kind.label(),
                "",
            )?);
        }
        debug!(dest_plate = self.dest_plate, pool = kind.label(), "pool transfer worklist");
        Ok(worklist)
    }

    /// Fixed-volume reagents (name, volume) added to every destination.
    pub fn default_reagents(
        &self,
        reagents: &[(&str, f64)],
    ) -> Result<Vec<WorklistEntry>, WorklistError> {
        let mut worklist = Vec::with_capacity(self.pools.len() * reagents.len());
        for (dest, assembly_id, _) in self.pools.iter() {
            for (reagent, volume) in reagents {
                worklist.push(self.reagent_entry(dest, assembly_id, reagent, *volume)?);
            }
        }
        debug!(dest_plate = self.dest_plate, entries = worklist.len(), "reagent worklist");
        Ok(worklist)
    }

    fn reagent_entry(
        &self,
        dest: usize,
        assembly_id: &str,
        reagent: &str,
        volume: f64,
    ) -> Result<WorklistEntry, WorklistError> {
        let src = self.wells.source_well(reagent, dest)?;
        self.entry(dest, assembly_id, src, volume, reagent, reagent, "")
    }

    fn component_entry(
        &self,
        dest: usize,
        assembly_id: &str,
        component: &Component,
        volume: f64,
    ) -> Result<WorklistEntry, WorklistError> {
        let src = self.wells.source_well(&component.id, dest)?;
        self.entry(
            dest,
            assembly_id,
            src,
            volume,
            &component.name,
            &component.description,
            &component.id,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn entry(
        &self,
        dest: usize,
        assembly_id: &str,
        src: &WellRecord,
        volume: f64,
        component_name: &str,
        description: &str,
        registry_id: &str,
    ) -> Result<WorklistEntry, WorklistError> {
        // Checked at dispense precision so float noise around zero passes.
        let volume = Volume::rounded(volume);
        if volume.0 < 0.0 || volume.0.is_nan() {
            return Err(WorklistError::VolumeBudget {
                dest_plate: self.dest_plate.to_string(),
                assembly_id: assembly_id.to_string(),
                component: component_name.to_string(),
                volume: volume.0,
            });
        }
        Ok(WorklistEntry {
            dest_plate: self.dest_plate.to_string(),
            dest_well: dest,
            src_plate: src.plate_id.clone(),
            src_well: src.index,
            volume,
            component_name: component_name.to_string(),
            description: description.to_string(),
            registry_id: registry_id.to_string(),
            assembly_id: assembly_id.to_string(),
        })
    }
}
