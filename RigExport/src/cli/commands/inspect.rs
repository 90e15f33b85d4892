//! CLI commands for exported rig files

use std::path::Path;

use crate::rig::Skeleton;

/// Print a summary of an exported rig.
pub fn inspect(path: &Path) -> anyhow::Result<()> {
    let skeleton = Skeleton::load(path)?;
    let summary = skeleton.summary();

    println!("Rig: {}", path.display());
    println!();
    println!("Bones:          {}", summary.bone_count);
    println!("Roots:          {}", summary.roots.join(", "));
    println!("Max depth:      {}", summary.max_depth);
    println!("Weighted bones: {}", summary.weighted_bones);
    println!("Weights:        {}", summary.weight_count);
    println!("Vertex span:    {}", summary.vertex_span);
    println!();

    println!("Bones:");
    for (name, bone) in &skeleton.bones {
        let p = bone.position;
        println!(
            "  {:24} [{:>8.4}, {:>8.4}, {:>8.4}]  {:>3} children  {:>6} weights",
            name,
            p.x,
            p.y,
            p.z,
            bone.children.len(),
            bone.weights.len()
        );
    }

    Ok(())
}

/// Validate an exported rig. Fails when any issue is found.
pub fn validate(path: &Path) -> anyhow::Result<()> {
    let skeleton = Skeleton::load(path)?;
    let issues = skeleton.validate();

    if issues.is_empty() {
        println!("{}: OK ({} bones)", path.display(), skeleton.len());
        return Ok(());
    }

    println!("{}: {} issues", path.display(), issues.len());
    for issue in &issues {
        println!("  - {issue}");
    }
    anyhow::bail!("{} validation issues in {}", issues.len(), path.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_rig(dir: &Path, json: &str) -> std::path::PathBuf {
        let path = dir.join("rig.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_validate_clean_rig() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rig(
            dir.path(),
            r#"{"Root":{"pos":[0,0,-1],"children":["Spine"],"weights":{"0":0.5}},
                "Spine":{"pos":[0,0,-2],"children":[],"weights":{}}}"#,
        );
        validate(&path).unwrap();
        inspect(&path).unwrap();
    }

    #[test]
    fn test_validate_fails_on_issues() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rig(
            dir.path(),
            r#"{"Root":{"pos":[0,0,-1],"children":["Ghost"],"weights":{}}}"#,
        );
        let err = validate(&path).unwrap_err();
        assert!(err.to_string().contains("1 validation issues"));
    }

    #[test]
    fn test_unreadable_rig() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate(&dir.path().join("missing.json")).is_err());
        let path = write_rig(dir.path(), "not json");
        assert!(inspect(&path).is_err());
    }
}
