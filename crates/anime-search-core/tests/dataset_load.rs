use anime_search_core::dataset::{Dataset, LoadError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> std::io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[test]
fn loads_records_in_document_order() -> Result<(), Box<dyn std::error::Error>> {
    let file = write_temp(
        r#"[
            {"title": "Cowboy Bebop", "episodes": 26},
            {"title": "Trigun", "episodes": 26},
            {"title": "Monster", "episodes": "74"}
        ]"#,
    )?;

    let dataset = Dataset::load(file.path())?;
    let titles: Vec<&str> = dataset.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Cowboy Bebop", "Trigun", "Monster"]);
    Ok(())
}

#[test]
fn missing_file_is_read_error() {
    let result = Dataset::load("/definitely/not/here/animeData.json");
    assert!(matches!(result, Err(LoadError::Read { .. })));
}

#[test]
fn invalid_json_is_malformed() -> std::io::Result<()> {
    let file = write_temp("[{\"title\": \"Cowboy Bebop\",")?;
    let result = Dataset::load(file.path());
    assert!(matches!(result, Err(LoadError::Malformed(_))));
    Ok(())
}

#[test]
fn record_without_title_is_malformed() -> std::io::Result<()> {
    let file = write_temp(r#"[{"title": "Trigun"}, {"synopsis": "no title"}]"#)?;
    let result = Dataset::load(file.path());
    assert!(matches!(result, Err(LoadError::Malformed(_))));
    Ok(())
}

#[test]
fn read_error_names_the_path() {
    let result = Dataset::load("/definitely/not/here/animeData.json");
    let message = result.err().map(|e| e.to_string()).unwrap_or_default();
    assert!(message.contains("/definitely/not/here/animeData.json"));
}

#[test]
fn bundled_dataset_is_well_formed() -> Result<(), LoadError> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../animeData.json");
    let dataset = Dataset::load(path)?;
    assert!(!dataset.is_empty());
    Ok(())
}
