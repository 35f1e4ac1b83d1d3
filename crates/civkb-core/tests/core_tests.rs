use std::fs;
use tempfile::TempDir;

use civkb_core::formatter::{format_resource, TOPIC_DELIMITER};
use civkb_core::loader::load_resources;
use civkb_core::types::Resource;

fn sample_json() -> &'static str {
    r#"{
      "resources": [
        {
          "id": 1,
          "title": "Citizens' Assembly on Climate",
          "author": "Assembly Secretariat",
          "geographic_focus": "Ireland",
          "publication_date": "2018-04-01",
          "url": "https://example.org/ie-climate",
          "type": "report",
          "topics": ["climate change", "deliberation"],
          "summary": "How the Irish assembly deliberated on climate policy."
        },
        {
          "id": "ca-uk",
          "title": "Climate Assembly UK",
          "author": "House of Commons",
          "geographic_focus": "United Kingdom",
          "publication_date": "2020-09-10",
          "url": "https://example.org/uk-climate",
          "type": "report",
          "topics": ["net zero"],
          "summary": "Recommendations for reaching net zero by 2050."
        }
      ]
    }"#
}

#[test]
fn load_preserves_count_order_and_fields() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("resources.json");
    fs::write(&path, sample_json()).unwrap();

    let resources = load_resources(&path).expect("load");
    assert_eq!(resources.len(), 2);
    // File order, with integer and string ids both normalized to strings
    assert_eq!(resources[0].id, "1");
    assert_eq!(resources[1].id, "ca-uk");
    assert_eq!(resources[0].title, "Citizens' Assembly on Climate");
    assert_eq!(resources[0].topics, vec!["climate change", "deliberation"]);
    assert_eq!(resources[1].resource_type, "report");
}

#[test]
fn load_fails_on_missing_file() {
    let tmp = TempDir::new().unwrap();
    let err = load_resources(&tmp.path().join("nope.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to load resources"));
}

#[test]
fn load_fails_on_missing_top_level_key() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("resources.json");
    fs::write(&path, r#"{"records": []}"#).unwrap();
    assert!(load_resources(&path).is_err());
}

#[test]
fn load_fails_on_missing_required_field() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("resources.json");
    // No "summary" on the record
    fs::write(
        &path,
        r#"{"resources": [{"id": 1, "title": "t", "author": "a", "geographic_focus": "g",
            "publication_date": "d", "url": "u", "type": "report", "topics": []}]}"#,
    )
    .unwrap();
    assert!(load_resources(&path).is_err());
}

#[test]
fn load_fails_on_duplicate_ids() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("resources.json");
    let json = sample_json().replace("\"ca-uk\"", "1");
    fs::write(&path, json).unwrap();
    let err = load_resources(&path).unwrap_err();
    assert!(err.to_string().contains("duplicate resource id"));
}

fn sample_resource() -> Resource {
    Resource {
        id: "42".to_string(),
        title: "Deliberative Wave".to_string(),
        author: "OECD".to_string(),
        geographic_focus: "Global".to_string(),
        publication_date: "2020-06-01".to_string(),
        url: "https://example.org/wave".to_string(),
        resource_type: "book".to_string(),
        topics: vec!["x".to_string(), "y".to_string()],
        summary: "Catching the deliberative wave.".to_string(),
    }
}

#[test]
fn format_text_contains_fields_verbatim_in_fixed_order() {
    let doc = format_resource(&sample_resource());
    let title_at = doc.text.find("Deliberative Wave").expect("title");
    let author_at = doc.text.find("OECD").expect("author");
    let focus_at = doc.text.find("Global").expect("focus");
    let topics_at = doc.text.find("x, y").expect("topics");
    let summary_at = doc.text.find("Catching the deliberative wave.").expect("summary");
    assert!(title_at < author_at && author_at < focus_at);
    assert!(focus_at < topics_at && topics_at < summary_at);
    assert!(doc.text.starts_with("Title: "));
}

#[test]
fn format_is_deterministic() {
    let r = sample_resource();
    let a = format_resource(&r);
    let b = format_resource(&r);
    assert_eq!(a.text, b.text);
    assert_eq!(a.metadata, b.metadata);
}

#[test]
fn format_metadata_flattens_topics_round_trip() {
    let r = sample_resource();
    let doc = format_resource(&r);
    let joined = doc.metadata.get("topics").expect("topics key");
    assert_eq!(joined, "x, y");
    let split: Vec<&str> = joined.split(TOPIC_DELIMITER).collect();
    assert_eq!(split, vec!["x", "y"]);
    // Scalar display fields survive, embedding text is not duplicated there
    assert_eq!(doc.metadata.get("url").map(String::as_str), Some("https://example.org/wave"));
    assert_eq!(doc.metadata.get("type").map(String::as_str), Some("book"));
    assert!(!doc.metadata.contains_key("summary"));
    assert_eq!(doc.metadata.len(), 7);
}
