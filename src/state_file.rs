//! Local state persistence.
//!
//! The orchestrator keeps one [`SubnetGroupState`] as pretty JSON between runs.

use crate::models::SubnetGroupState;
use std::error::Error;
use std::path::Path;

/// Read the state file.
///
/// # Returns
/// * `Ok(None)` - no state file yet
/// * `Ok(Some(state))` - the stored state
/// * `Err` - the file exists but can't be read or parsed
pub fn read_state(path: &str) -> Result<Option<SubnetGroupState>, Box<dyn Error>> {
    if !Path::new(path).exists() {
        log::info!("No state file: {path}");
        return Ok(None);
    }

    log::info!("Reading state file: {path}");
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading state file {path}: {e}"))?;
    let mut de = serde_json::Deserializer::from_str(&json);
    let state: SubnetGroupState = serde_path_to_error::deserialize(&mut de)
        .map_err(|e| format!("Error parsing state file {path}: path={} error={}", e.path(), e))?;
    Ok(Some(state))
}

/// Write `state`, or remove the file once the group is gone.
pub fn write_state(path: &str, state: &SubnetGroupState) -> Result<(), Box<dyn Error>> {
    if state.id.is_none() {
        if Path::new(path).exists() {
            log::warn!("Removing state file: {path}");
            std::fs::remove_file(path)
                .map_err(|e| format!("Error removing state file {path}: {e}"))?;
        }
        return Ok(());
    }

    let json = serde_json::to_string_pretty(state)
        .map_err(|e| format!("Error serializing state: {e}"))?;
    log::info!("Writing state file: {path}");
    std::fs::write(path, json).map_err(|e| format!("Error writing state file {path}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("subnet_group_state_{}_{name}.json", std::process::id()))
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn test_write_then_read() {
        let path = temp_path("roundtrip");
        let mut state = SubnetGroupState::with_id("cache-a");
        state.subnet_ids = vec!["subnet-b".to_string(), "subnet-a".to_string()];
        write_state(&path, &state).expect("Error writing state");

        let read = read_state(&path).expect("Error reading state");
        assert_eq!(read, Some(state));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_write_tombstone_removes_file() {
        let path = temp_path("tombstone");
        write_state(&path, &SubnetGroupState::with_id("g")).expect("Error writing state");
        assert!(Path::new(&path).exists());

        write_state(&path, &SubnetGroupState::default()).expect("Error removing state");
        assert!(!Path::new(&path).exists());
        assert_eq!(read_state(&path).expect("Missing file is not an error"), None);
    }

    #[test]
    fn test_read_corrupt_state() {
        let path = temp_path("corrupt");
        std::fs::write(&path, r#"{"id": 3}"#).expect("Error writing file");
        let err = read_state(&path).expect_err("Corrupt state");
        assert!(err.to_string().contains("path=id"), "{err}");
        std::fs::remove_file(&path).ok();
    }
}
