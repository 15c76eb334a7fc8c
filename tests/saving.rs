use aurora_modeller::{LineEnding, LoadedModel, SaveError, bim_path};
use pretty_assertions::assert_eq;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const INPUT: &str = "{\r\n    \"name\": \"M\",\r\n    \"compatibilityLevel\": 1500,\r\n    \"model\": {\r\n        \"tables\": [\r\n            {\r\n                \"name\": \"Sales\"\r\n            }\r\n        ]\r\n    }\r\n}";

#[test]
fn crlf_files_are_saved_with_crlf() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Model.bim");
    std::fs::write(&path, INPUT)?;

    let mut model = LoadedModel::load_path(&path)?;
    assert_eq!(model.line_ending, LineEnding::CrLf);
    model.save()?;

    assert_eq!(std::fs::read_to_string(&path)?, INPUT);
    Ok(())
}

#[test]
fn dirty_flag_follows_commits_and_saves() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Model.bim");
    std::fs::write(&path, INPUT)?;

    let mut model = LoadedModel::load_path(&path)?;
    assert!(!model.dirty);

    let name = model
        .tree
        .find_by_path(&bim_path!["model", "tables", 0usize, "name"])
        .ok_or("table name leaf")?;
    model.select(name);
    model.commit("Orders")?;
    assert!(model.dirty);

    model.save()?;
    assert!(!model.dirty);
    assert!(std::fs::read_to_string(&path)?.contains("\"name\": \"Orders\""));
    Ok(())
}

#[test]
fn failed_save_keeps_edits_for_a_later_save() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Model.bim");
    std::fs::write(&path, INPUT)?;
    let mut model = LoadedModel::load_path(&path)?;

    let level = model
        .tree
        .find_by_path(&bim_path!["compatibilityLevel"])
        .ok_or("compatibility leaf")?;
    model.select(level);
    model.commit("1600")?;

    let unwritable = dir.path().join("missing-dir").join("Model.bim");
    let err = model.save_to_path(&unwritable).unwrap_err();
    assert!(matches!(err, SaveError::Io { .. }));
    assert!(model.dirty);
    assert_eq!(model.source_path, path);

    // Edits made after the failure are part of the retried save.
    model.commit("1601")?;
    model.save()?;

    let saved = LoadedModel::load_path(&path)?;
    assert_eq!(
        saved.document.get(&bim_path!["compatibilityLevel"])?.as_i64(),
        Some(1601)
    );
    Ok(())
}

#[test]
fn save_as_moves_the_source_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Model.bim");
    let copy = dir.path().join("Copy.bim");
    std::fs::write(&path, INPUT)?;

    let mut model = LoadedModel::load_path(&path)?;
    model.save_to_path(&copy)?;

    assert_eq!(model.source_path, copy);
    assert_eq!(model.file_name(), "Copy.bim");
    assert_eq!(std::fs::read(&copy)?, std::fs::read(&path)?);
    Ok(())
}
