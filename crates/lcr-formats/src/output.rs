use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use lcr_core::merge::{serialize, WORKLIST_COLUMNS};
use lcr_core::{ComponentWellMap, PlateGeometry, WorklistEntry};
use tracing::{debug, info};

use crate::WriteError;

/// The run's output directory: one plate map per plate and one worklist per
/// destination plate, all appended to as the run progresses.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
    geometry: PlateGeometry,
}

impl OutputDir {
    /// Delete `root` if it exists and create it again, empty.
    pub fn recreate(root: impl Into<PathBuf>, geometry: PlateGeometry) -> Result<Self, WriteError> {
        let root = root.into();
        if root.exists() {
            debug!(path = %root.display(), "removing previous output");
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;
        info!(path = %root.display(), "created output directory");
        Ok(Self { root, geometry })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn geometry(&self) -> PlateGeometry {
        self.geometry
    }

    pub fn plate_path(&self, plate_id: &str) -> PathBuf {
        self.root.join(format!("{plate_id}.csv"))
    }

    pub fn worklist_path(&self, plate_id: &str) -> PathBuf {
        self.root.join(format!("{plate_id}_worklist.csv"))
    }

    /// Append `[well, component, extra...]` rows for every well in `wells`,
    /// sorted by well index. Returns the number of rows written.
    pub fn write_component_wells(
        &self,
        plate_id: &str,
        wells: &ComponentWellMap,
    ) -> Result<usize, WriteError> {
        let mut writer = appender(&self.plate_path(plate_id))?;
        let rows = wells.rows();
        for (key, record) in &rows {
            let mut row = Vec::with_capacity(record.extra.len() + 2);
            row.push(self.geometry.well_label(record.index)?);
            row.push(key.to_string());
            row.extend(record.extra.iter().cloned());
            writer.write_record(&row)?;
        }
        writer.flush()?;
        debug!(plate_id, rows = rows.len(), "wrote plate map");
        Ok(rows.len())
    }

    /// Start a destination plate's worklist with the header row.
    pub fn write_worklist_header(&self, plate_id: &str) -> Result<(), WriteError> {
        let mut writer = appender(&self.worklist_path(plate_id))?;
        writer.write_record(WORKLIST_COLUMNS)?;
        writer.flush()?;
        Ok(())
    }

    /// Merge one step's instructions and append them to the plate's worklist.
    /// Returns the number of rows written.
    pub fn append_worklist(
        &self,
        plate_id: &str,
        entries: Vec<WorklistEntry>,
    ) -> Result<usize, WriteError> {
        let records = serialize(entries, &self.geometry)?;
        let mut writer = appender(&self.worklist_path(plate_id))?;
        for record in &records {
            writer.write_record(record)?;
        }
        writer.flush()?;
        debug!(plate_id, rows = records.len(), "appended worklist step");
        Ok(records.len())
    }
}

fn appender(path: &Path) -> Result<Writer<File>, WriteError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(WriterBuilder::new().flexible(true).from_writer(file))
}
