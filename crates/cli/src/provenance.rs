use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Metadata used to generate a provenance sidecar.
pub struct Payload {
    pub params: Value,
    pub inputs: Vec<String>,
    pub tag: Option<String>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            inputs: Vec::new(),
            tag: None,
        }
    }

    pub fn with_input(mut self, input: impl AsRef<Path>) -> Self {
        self.inputs.push(input.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }
}

/// Provenance block without outputs, as printed by `report`.
pub fn block(tag: Option<&str>) -> Value {
    json!({
        "code_rev": current_git_rev(),
        "lobfix_version": lobfix::VERSION,
        "tag": tag,
        "params": {},
        "outputs": []
    })
}

/// Write `<artifact>.provenance.json` next to `artifact`.
pub fn write_sidecar(artifact: &Path, payload: Payload) -> Result<PathBuf> {
    let path = provenance_path(artifact);
    let doc = json!({
        "code_rev": current_git_rev(),
        "lobfix_version": lobfix::VERSION,
        "tag": payload.tag,
        "params": payload.params,
        "inputs": payload.inputs,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// `dir/solution.json` becomes `dir/solution.provenance.json`.
fn provenance_path(artifact: &Path) -> PathBuf {
    let stem = artifact.file_stem().map_or_else(
        || "artifact".into(),
        |s| s.to_string_lossy().into_owned(),
    );
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` from the environment, else `git rev-parse HEAD`, else "unknown".
pub fn current_git_rev() -> String {
    std::env::var("GIT_COMMIT")
        .ok()
        .filter(|rev| !rev.is_empty())
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            out.status
                .success()
                .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn provenance_path_rewrites_extension() {
        let base = Path::new("/tmp/output/fix.json");
        let derived = provenance_path(base);
        assert_eq!(derived, Path::new("/tmp/output/fix.provenance.json"));
    }

    #[test]
    fn write_sidecar_records_inputs_and_outputs() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("solution.json");
        fs::write(&artifact, "{}").unwrap();
        let payload = Payload::new(json!({"composition": "all_pairs"}))
            .with_input("readings.csv")
            .with_tag(Some("exercise-7".into()));
        let prov_path = write_sidecar(&artifact, payload).unwrap();
        assert_eq!(prov_path, dir.path().join("solution.provenance.json"));
        assert!(prov_path.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(prov_path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["inputs"][0], "readings.csv");
        assert_eq!(parsed["tag"], "exercise-7");
        assert_eq!(parsed["params"]["composition"], "all_pairs");
    }

    #[test]
    fn report_block_has_no_outputs() {
        let b = block(None);
        assert!(b["outputs"].as_array().unwrap().is_empty());
        assert!(b["tag"].is_null());
    }
}
