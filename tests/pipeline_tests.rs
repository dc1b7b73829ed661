mod common;

use anchorage::{DocumentNode, PipelineBuilder, PipelineError};
use common::TestResult;
use common::fixtures::*;
use std::fs;

fn document() -> Result<DocumentNode, serde_json::Error> {
    let header = with_children(
        panel("header", [0.0, 0.0, 400.0, 40.0]),
        vec![label("title", "Inbox", [10.0, 10.0, 60.0, 20.0])],
    );
    let mut footer = panel("footer", [0.0, 260.0, 400.0, 40.0]);
    footer["attributes"] = serde_json::json!({ "data-include": "footer" });
    serde_json::from_value(page(400.0, 300.0, vec![header, footer]))
}

#[test]
fn test_generate_to_dir_writes_every_layout() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir()?;
    let pipeline = PipelineBuilder::new().build()?;

    let written = pipeline.generate_to_dir(&document()?, "activity_inbox", dir.path())?;
    let names: Vec<String> = written
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    assert_eq!(names, ["activity_inbox.xml", "footer.xml"]);

    let main = fs::read_to_string(dir.path().join("activity_inbox.xml"))?;
    assert!(main.contains("<include layout=\"@layout/footer\"/>"));
    assert!(main.contains("android:id=\"@+id/header\""));
    let footer = fs::read_to_string(dir.path().join("footer.xml"))?;
    assert!(footer.contains("android:id=\"@+id/footer\""));
    Ok(())
}

#[test]
fn test_configuration_file_is_applied() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("anchorage.json");
    fs::write(
        &config_path,
        r#"{ "prettyPrint": false, "layout": { "decimal_places": 2 } }"#,
    )?;

    let pipeline = PipelineBuilder::new().with_config_file(&config_path)?.build()?;
    assert_eq!(pipeline.config().layout.decimal_places, 2);
    let files = pipeline.generate(&document()?, "main")?;
    assert_eq!(files[0].contents.trim_end().lines().count(), 1);
    Ok(())
}

#[test]
fn test_missing_configuration_file_is_an_io_error() {
    let result = PipelineBuilder::new().with_config_file("does/not/exist.json");
    assert!(matches!(result, Err(PipelineError::Io(_))));
}

#[test]
fn test_malformed_document_is_a_json_error() {
    let pipeline = PipelineBuilder::new().build().unwrap();
    let result = pipeline.convert_json(r#"{ "tag": "body" }"#);
    assert!(matches!(result, Err(PipelineError::Json(_))));
}

#[test]
fn test_resources_are_collected_per_conversion() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let pipeline = PipelineBuilder::new().build()?;
    let conversion = pipeline.convert(&document()?)?;
    assert!(!conversion.resources.is_empty());
    Ok(())
}
