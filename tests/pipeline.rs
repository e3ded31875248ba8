mod common;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use medication_extractor::{
    data::{documents, normalize::MappingMethod},
    nlp::status::{MentionContext, StatusClassifier, StatusRule, StrongContinuation},
    pipeline, ActiveStatus, Lexicon, Pipeline,
};
use proptest::prelude::*;

#[test]
fn document_result_resolves_concepts_and_statuses() {
    let pipeline = Pipeline::new(common::lexicon());
    let text = "Patient previously took metformin but discontinued due to GI upset. \
                Currently taking aspirin 81mg daily.";
    let result = pipeline.process_text("visit-1.html", text);

    assert_eq!(result.document_id, "visit-1.html");
    assert!(result.error.is_none());
    assert_eq!(result.medications.len(), 2);

    let metformin = &result.medications[0];
    assert_eq!(metformin.text, "metformin");
    assert_eq!(metformin.active_status, ActiveStatus::NonActive);
    assert_eq!(metformin.concept_id.as_deref(), Some("6809"));

    let aspirin = &result.medications[1];
    assert_eq!(aspirin.text, "aspirin");
    assert_eq!(aspirin.active_status, ActiveStatus::Active);
    assert_eq!(aspirin.concept_id.as_deref(), Some("1191"));
}

#[test]
fn brand_mentions_are_mapped_to_their_generic() {
    let pipeline = Pipeline::new(common::lexicon());
    let result = pipeline.process_text("n", "Taking Glucophage 500mg with meals.");
    assert_eq!(result.medications.len(), 1);
    let med = &result.medications[0];
    assert_eq!(med.text, "Glucophage");
    assert!((med.confidence - 0.96).abs() < 1e-9);
    assert_eq!(med.mapping_method, MappingMethod::BrandName);
    assert_eq!(med.normalized_name, "metformin");
}

#[test]
fn empty_lexicon_yields_no_mentions() {
    let result = Pipeline::new(Lexicon::default()).process_text("n", "aspirin");
    assert!(result.is_ok());
    assert!(result.medications.is_empty());
}

#[test]
fn serialized_record_uses_wire_names() {
    let pipeline = Pipeline::new(common::lexicon());
    let value = serde_json::to_value(pipeline.process_text("n", "Allergic to aspirin.")).unwrap();
    assert!(value.get("error").is_none());
    let med = &value["medications"][0];
    assert_eq!(med["active_status"], "non-active");
    assert_eq!(med["mapping_method"], "generic_name");
    assert_eq!(med["start_offset"], 12);
    assert_eq!(med["end_offset"], 19);
    assert!(med["flag"].is_null());
}

#[tokio::test]
async fn unreadable_document_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.html"), "Continue lisinopril 10mg daily.").unwrap();
    std::fs::write(dir.path().join("b.html"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();
    std::fs::write(dir.path().join("c.txt"), "Allergic to aspirin.").unwrap();
    std::fs::write(dir.path().join("ignored.csv"), "aspirin").unwrap();

    let exts = vec!["html".to_string(), "txt".to_string()];
    let paths = documents::discover(dir.path(), &exts, false);
    assert_eq!(paths.len(), 3);

    let pipeline = Arc::new(Pipeline::new(common::lexicon()));
    let (results, summary) = pipeline::process_batch(pipeline, paths, 2).await;

    let ids: Vec<&str> = results.iter().map(|r| r.document_id.as_str()).collect();
    assert_eq!(ids, vec!["a.html", "b.html", "c.txt"]);
    assert!(results[0].is_ok());
    assert_eq!(results[0].medications.len(), 1);
    assert!(results[1].error.is_some());
    assert!(results[1].medications.is_empty());
    assert_eq!(results[2].medications[0].active_status, ActiveStatus::NonActive);

    assert_eq!(summary.files_processed, 3);
    assert_eq!(summary.files_failed, 1);
    assert_eq!(summary.mentions_found, 2);
    assert_eq!(summary.mentions_mapped, 2);
}

/// Rule that panics on documents mentioning "corrupt".
struct PanicsOnCorrupt;

impl StatusRule for PanicsOnCorrupt {
    fn name(&self) -> &'static str {
        "panics_on_corrupt"
    }

    fn evaluate(&self, ctx: &MentionContext<'_>) -> Option<ActiveStatus> {
        assert!(!ctx.narrow.contains("corrupt"), "rule failed on corrupt record");
        None
    }
}

#[tokio::test]
async fn panicking_document_becomes_a_failed_result() {
    let dir = tempfile::tempdir().unwrap();
    let corrupt = dir.path().join("a.html");
    let healthy = dir.path().join("b.html");
    std::fs::write(&corrupt, "Corrupt aspirin record.").unwrap();
    std::fs::write(&healthy, "Continue lisinopril daily.").unwrap();

    let classifier =
        StatusClassifier::new(vec![Box::new(PanicsOnCorrupt), Box::new(StrongContinuation)]);
    let pipeline = Arc::new(Pipeline::with_classifier(common::lexicon(), classifier));
    let (results, summary) = pipeline::process_batch(pipeline, vec![corrupt, healthy], 2).await;

    assert_eq!(results[0].document_id, "a.html");
    assert!(results[0].error.is_some());
    assert!(results[0].medications.is_empty());
    assert!(results[1].is_ok());
    assert_eq!(results[1].medications[0].active_status, ActiveStatus::Active);
    assert_eq!(summary.files_failed, 1);
}

#[test]
fn output_paths_keep_extension_and_sub_folders() {
    let out = Path::new("out");
    let root = Path::new("in");
    let html = documents::output_path(out, root, Path::new("in/note.html"));
    let txt = documents::output_path(out, root, Path::new("in/note.txt"));
    let nested = documents::output_path(out, root, Path::new("in/ward/note.html"));

    assert_eq!(html, PathBuf::from("out/note.html_medications.json"));
    assert_eq!(txt, PathBuf::from("out/note.txt_medications.json"));
    assert_eq!(nested, PathBuf::from("out/ward/note.html_medications.json"));
    assert_ne!(html, txt);
    assert_ne!(html, nested);
}

#[test]
fn single_file_output_lands_directly_in_output_dir() {
    let path = documents::output_path(Path::new("out"), Path::new(""), Path::new("visit.txt"));
    assert_eq!(path, PathBuf::from("out/visit.txt_medications.json"));
}

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("aspirin".to_string()),
        Just("Glucophage".to_string()),
        Just("METFORMIN".to_string()),
        Just("continue ".to_string()),
        Just("stopped ".to_string()),
        Just("é".to_string()),
        Just("日本".to_string()),
        Just("\n".to_string()),
        "[a-zA-Z ]{0,8}",
    ]
}

proptest! {
    #[test]
    fn offsets_always_address_the_surface_text(parts in prop::collection::vec(fragment(), 0..24)) {
        let text: String = parts.concat();
        let pipeline = Pipeline::new(common::lexicon());
        let result = pipeline.process_text("prop", &text);
        prop_assert!(result.is_ok());
        let chars: Vec<char> = text.chars().collect();
        let mut spans = std::collections::HashSet::new();
        for med in &result.medications {
            prop_assert!(med.start_offset < med.end_offset);
            prop_assert!(med.end_offset <= chars.len());
            let surface: String = chars[med.start_offset..med.end_offset].iter().collect();
            prop_assert_eq!(surface, med.text.clone());
            prop_assert!(spans.insert((med.start_offset, med.end_offset)));
        }
    }
}
