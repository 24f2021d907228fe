use std::path::PathBuf;

use lcr_core::{
    Component, ComponentGroup, ComponentWellMap, LayoutError, Pools, PoolKind, WellAllocator,
    WorklistBuilder, WorklistEntry, WATER,
};
use lcr_formats::OutputDir;
use lcr_registry::{PartClassifier, PartRegistry};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::params::{ProtocolParams, ProtocolVariant};
use crate::{
    ProtocolError, StageError, COMPONENTS_PLATE, DOMINO_POOLS_PLATE, LCR_PLATE,
    MASTERMIX_TROUGH, PHOSPHO_PLATE,
};

/// Steps of a protocol run, in order. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ClassifyPools,
    LayoutReagentPlates,
    LayoutComponentPlate,
    BuildPoolWorklists,
    /// Phosphorylated LCR only.
    BuildPhosphoWorklist,
    BuildReactionWorklist,
    Done,
    /// A stage returned an error. Terminal: the run cannot be resumed.
    Failed,
}

impl Stage {
    pub fn next(self, variant: ProtocolVariant) -> Stage {
        match self {
            Stage::ClassifyPools => Stage::LayoutReagentPlates,
            Stage::LayoutReagentPlates => Stage::LayoutComponentPlate,
            Stage::LayoutComponentPlate => Stage::BuildPoolWorklists,
            Stage::BuildPoolWorklists => match variant {
                ProtocolVariant::Lcr => Stage::BuildReactionWorklist,
                ProtocolVariant::PhosphoLcr => Stage::BuildPhosphoWorklist,
            },
            Stage::BuildPhosphoWorklist => Stage::BuildReactionWorklist,
            Stage::BuildReactionWorklist | Stage::Done => Stage::Done,
            Stage::Failed => Stage::Failed,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::ClassifyPools => "classify pools",
            Stage::LayoutReagentPlates => "layout reagent plates",
            Stage::LayoutComponentPlate => "layout component plate",
            Stage::BuildPoolWorklists => "build pool worklists",
            Stage::BuildPhosphoWorklist => "build phospho worklist",
            Stage::BuildReactionWorklist => "build reaction worklist",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub variant: ProtocolVariant,
    pub assemblies: usize,
    pub worklist_rows: usize,
    pub files: Vec<PathBuf>,
}

/// One execution of a protocol over a list of assemblies.
///
/// Owns the metadata cache and the component-well map for the whole run;
/// later stages read the wells laid out by earlier ones.
#[derive(Debug)]
pub struct AssemblyRun<R> {
    run_id: Uuid,
    variant: ProtocolVariant,
    params: ProtocolParams,
    assembly_ids: Vec<String>,
    classifier: PartClassifier<R>,
    output: OutputDir,
    stage: Stage,
    pools: Pools,
    order: Vec<Component>,
    wells: ComponentWellMap,
    worklist_rows: usize,
    files: Vec<PathBuf>,
}

impl<R: PartRegistry> AssemblyRun<R> {
    pub fn new(
        variant: ProtocolVariant,
        registry: R,
        assembly_ids: Vec<String>,
        output: OutputDir,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            variant,
            params: variant.params(),
            assembly_ids,
            classifier: PartClassifier::new(registry),
            output,
            stage: Stage::ClassifyPools,
            pools: Pools::new(),
            order: Vec::new(),
            wells: ComponentWellMap::new(),
            worklist_rows: 0,
            files: Vec::new(),
        }
    }

    /// Replace the variant's default volume constants.
    pub fn with_params(mut self, params: ProtocolParams) -> Self {
        self.params = params;
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    pub fn wells(&self) -> &ComponentWellMap {
        &self.wells
    }

    /// Execute the current stage and advance. Returns the new stage.
    ///
    /// An error moves the run to [`Stage::Failed`]; every later call returns
    /// [`StageError::Aborted`].
    pub fn step(&mut self) -> Result<Stage, ProtocolError> {
        let stage = self.stage;
        let result = match stage {
            Stage::ClassifyPools => self.classify_pools(),
            Stage::LayoutReagentPlates => self.layout_reagent_plates(),
            Stage::LayoutComponentPlate => self.layout_component_plate(),
            Stage::BuildPoolWorklists => self.build_pool_worklists(),
            Stage::BuildPhosphoWorklist => self.build_phospho_worklist(),
            Stage::BuildReactionWorklist => self.build_reaction_worklist(),
            Stage::Done => Ok(()),
            Stage::Failed => Err(StageError::Aborted),
        };
        if let Err(source) = result {
            if stage != Stage::Failed {
                warn!(stage = %stage, error = %source, "stage failed, aborting run");
                self.stage = Stage::Failed;
            }
            return Err(ProtocolError { stage, source });
        }
        self.stage = stage.next(self.variant);
        info!(completed = %stage, next = %self.stage, "stage complete");
        Ok(self.stage)
    }

    /// Run every remaining stage.
    pub fn run(mut self) -> Result<RunSummary, ProtocolError> {
        let span = info_span!("run", run_id = %self.run_id, protocol = %self.variant);
        let _guard = span.enter();
        info!(assemblies = self.assembly_ids.len(), "starting run");

        while self.stage != Stage::Done {
            self.step()?;
        }

        info!(rows = self.worklist_rows, files = self.files.len(), "run finished");
        Ok(RunSummary {
            run_id: self.run_id,
            variant: self.variant,
            assemblies: self.pools.len(),
            worklist_rows: self.worklist_rows,
            files: self.files,
        })
    }

    fn classify_pools(&mut self) -> Result<(), StageError> {
        if self.assembly_ids.is_empty() {
            return Err(StageError::NoAssemblies);
        }
        let capacity = self.output.geometry().capacity();
        if self.assembly_ids.len() > capacity {
            return Err(LayoutError::CapacityExceeded {
                plate_id: LCR_PLATE.to_string(),
                requested: self.assembly_ids.len(),
                capacity,
            }
            .into());
        }
        self.pools = self.classifier.classify(&self.assembly_ids)?;
        self.order = self.classifier.order(&self.assembly_ids)?;
        debug!(
            assemblies = self.pools.len(),
            unique_parts = self.order.len(),
            "pools classified"
        );
        Ok(())
    }

    fn layout_reagent_plates(&mut self) -> Result<(), StageError> {
        let mut groups = vec![ComponentGroup::new(WATER)];
        groups.extend(self.params.trough_reagents.iter().map(|r| ComponentGroup::new(*r)));
        self.layout(MASTERMIX_TROUGH, &groups)
    }

    fn layout_component_plate(&mut self) -> Result<(), StageError> {
        let mut groups: Vec<ComponentGroup> = self
            .order
            .iter()
            .map(|c| ComponentGroup::with_fields(c.id.clone(), c.plate_fields()))
            .collect();
        groups.extend(self.params.enzymes.iter().map(|e| ComponentGroup::new(*e)));
        self.layout(COMPONENTS_PLATE, &groups)
    }

    fn build_pool_worklists(&mut self) -> Result<(), StageError> {
        self.start_worklist(DOMINO_POOLS_PLATE)?;
        let builder = WorklistBuilder::new(DOMINO_POOLS_PLATE, &self.pools, &self.wells);
        let (worklist, pool_wells) =
            builder.domino_pools(self.params.domino_volume, self.params.domino_pool_total)?;
        self.ensure_new_keys(DOMINO_POOLS_PLATE, pool_wells.keys())?;

        self.write_wells(DOMINO_POOLS_PLATE, &pool_wells)?;
        self.append(DOMINO_POOLS_PLATE, worklist)?;
        self.wells.extend(pool_wells)?;
        Ok(())
    }

    fn build_phospho_worklist(&mut self) -> Result<(), StageError> {
        let Some(phospho) = self.params.phospho.clone() else {
            return Ok(());
        };
        self.start_worklist(PHOSPHO_PLATE)?;

        let builder = WorklistBuilder::new(PHOSPHO_PLATE, &self.pools, &self.wells);
        let steps = [
            builder.water(phospho.water_total, phospho.part_volume)?,
            builder.parts(phospho.part_volume, phospho.orf_volume)?,
            builder.default_reagents(&phospho.reagents)?,
        ];
        let pool_wells = builder.pool_wells(PoolKind::Phospho)?;
        self.ensure_new_keys(PHOSPHO_PLATE, pool_wells.keys())?;

        for worklist in steps {
            self.append(PHOSPHO_PLATE, worklist)?;
        }
        self.write_wells(PHOSPHO_PLATE, &pool_wells)?;
        self.wells.extend(pool_wells)?;
        Ok(())
    }

    fn build_reaction_worklist(&mut self) -> Result<(), StageError> {
        let reaction = self.params.reaction.clone();
        self.start_worklist(LCR_PLATE)?;

        let builder = WorklistBuilder::new(LCR_PLATE, &self.pools, &self.wells);
        let mut steps = vec![builder.water(reaction.water_total, reaction.part_volume)?];
        if reaction.dispense_parts {
            steps.push(builder.parts(reaction.part_volume, reaction.orf_volume)?);
        }
        if let Some(volume) = reaction.phospho_pool_volume {
            steps.push(builder.pool_transfer(PoolKind::Phospho, volume)?);
        }
        steps.push(builder.pool_transfer(PoolKind::Domino, reaction.domino_pool_volume)?);
        steps.push(builder.default_reagents(&reaction.reagents)?);

        for worklist in steps {
            self.append(LCR_PLATE, worklist)?;
        }
        Ok(())
    }

    fn layout(&mut self, plate_id: &str, groups: &[ComponentGroup]) -> Result<(), StageError> {
        self.ensure_new_keys(plate_id, groups.iter().map(|g| g.key.as_str()))?;
        let allocator = WellAllocator::new(self.output.geometry(), self.pools.len());
        let map = allocator.allocate(plate_id, groups)?;
        self.write_wells(plate_id, &map)?;
        self.wells.extend(map)?;
        Ok(())
    }

    /// Reject keys already placed earlier in the run, before anything for
    /// `plate_id` is written.
    fn ensure_new_keys<'k>(
        &self,
        plate_id: &str,
        keys: impl IntoIterator<Item = &'k str>,
    ) -> Result<(), LayoutError> {
        match keys.into_iter().find(|key| self.wells.contains_key(key)) {
            Some(key) => Err(LayoutError::DuplicateKey {
                plate_id: plate_id.to_string(),
                key: key.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn write_wells(&mut self, plate_id: &str, wells: &ComponentWellMap) -> Result<(), StageError> {
        self.output.write_component_wells(plate_id, wells)?;
        self.track(self.output.plate_path(plate_id));
        Ok(())
    }

    fn start_worklist(&mut self, plate_id: &str) -> Result<(), StageError> {
        self.output.write_worklist_header(plate_id)?;
        self.track(self.output.worklist_path(plate_id));
        Ok(())
    }

    fn append(&mut self, plate_id: &str, worklist: Vec<WorklistEntry>) -> Result<(), StageError> {
        self.worklist_rows += self.output.append_worklist(plate_id, worklist)?;
        Ok(())
    }

    fn track(&mut self, path: PathBuf) {
        if !self.files.contains(&path) {
            info!(path = %path.display(), "writing");
            self.files.push(path);
        }
    }
}
