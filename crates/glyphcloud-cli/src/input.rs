//! Loading point sets from JSON files.

use anyhow::{Context, Result};
use glyphcloud::PointCloudOptions;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn load_point_set(path: &Path) -> Result<PointCloudOptions> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse point set {}", path.display()))
}

/// Expands directories into the `.json` files beneath them (sorted);
/// plain file arguments are kept as given.
pub fn collect_inputs(args: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for arg in args {
        if !arg.is_dir() {
            out.push(arg.clone());
            continue;
        }

        let mut found: Vec<_> = WalkDir::new(arg)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
            .map(|e| e.path().to_path_buf())
            .collect();

        if found.is_empty() {
            log::warn!("No .json point sets found in '{}'", arg.display());
        }
        found.sort();
        out.extend(found);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_and_load() {
        let dir = std::env::temp_dir().join(format!("glyphcloud-input-{}", std::process::id()));
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("b.json"), r#"{"position": [[0,0,0]]}"#).unwrap();
        fs::write(dir.join("nested/a.json"), r#"{"position": [[1,2,3]], "pickId": 2}"#).unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let inputs = collect_inputs(&[dir.clone()]);
        assert_eq!(inputs, vec![dir.join("b.json"), dir.join("nested/a.json")]);

        let opts = load_point_set(&inputs[1]).unwrap();
        assert_eq!(opts.position, Some(vec![[1.0, 2.0, 3.0]]));
        assert_eq!(opts.pick_id, Some(2));

        assert!(load_point_set(&dir.join("missing.json")).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }
}
