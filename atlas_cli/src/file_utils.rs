use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, anyhow::Error> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Cannot parse {}", path.display()))?;

    Ok(value)
}

/// Writes `value` as pretty JSON, creating the parent folders.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), anyhow::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_write_then_read_json() {
        let dir = std::env::temp_dir().join(format!("atlas_cli_{}", std::process::id()));
        let path = dir.join("nested").join("value.json");
        let value = BTreeMap::from([(String::from("cost"), 10.5)]);

        write_json(&path, &value).unwrap();
        let read: BTreeMap<String, f64> = read_json(&path).unwrap();

        assert_eq!(read, value);
        std::fs::remove_dir_all(dir).unwrap();
    }
}
