use std::io::Write;
use std::path::Path;

use csv::Writer;
use lcr_core::Component;
use tracing::info;

use crate::WriteError;

pub const ORDER_COLUMNS: [&str; 6] = ["id", "name", "type", "subtype", "description", "sequence"];

/// Write the parts order: header plus one row per component, in the given order.
pub fn write_order<W: Write>(writer: W, components: &[Component]) -> Result<(), WriteError> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(ORDER_COLUMNS)?;
    for c in components {
        writer.write_record([
            c.id.as_str(),
            c.name.as_str(),
            c.entry_type.as_str(),
            c.subtype.as_deref().unwrap_or_default(),
            c.description.as_str(),
            c.sequence.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_order_file(path: impl AsRef<Path>, components: &[Component]) -> Result<(), WriteError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_order(file, components)?;
    info!(path = %path.display(), parts = components.len(), "wrote order");
    Ok(())
}
