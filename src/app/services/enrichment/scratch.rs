//! Scratch file naming for enrichment output

use crate::constants::ENRICHED_FILE_PREFIX;
use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Unique output path inside `scratch_dir`
///
/// Combines a UTC timestamp, the process id and a random UUID, so
/// concurrent calls within one process never share a file.
pub fn scratch_output_path(scratch_dir: &Path) -> PathBuf {
    let filename = format!(
        "{}_{}_{}_{}.csv",
        ENRICHED_FILE_PREFIX,
        Utc::now().format("%Y%m%dT%H%M%S"),
        std::process::id(),
        Uuid::new_v4().simple()
    );
    scratch_dir.join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_scratch_paths_are_unique() {
        let dir = Path::new("/data/temp");
        let paths: HashSet<PathBuf> = (0..500).map(|_| scratch_output_path(dir)).collect();
        assert_eq!(paths.len(), 500);
    }

    #[test]
    fn test_scratch_path_shape() {
        let path = scratch_output_path(Path::new("/data/temp"));

        assert_eq!(path.parent(), Some(Path::new("/data/temp")));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("enriched_"));
        assert!(name.ends_with(".csv"));
        assert!(name.contains(&format!("_{}_", std::process::id())));
    }
}
