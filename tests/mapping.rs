mod common;

use medication_extractor::{
    data::{
        lexicon::{Lexicon, LexiconEntry},
        normalize::{self, MappedMedication, MappingMethod, UNRECOGNIZED_FLAG},
    },
    nlp::{
        confidence::filter_confident,
        ner::{CandidateMention, MatchMethod},
        status::{ActiveStatus, ClassifiedMention},
        text::CharOffsets,
    },
    Pipeline,
};

fn classified(text: &str, method: MatchMethod, confidence: f64) -> ClassifiedMention {
    ClassifiedMention {
        mention: CandidateMention {
            text: text.to_string(),
            start: 0,
            end: text.len(),
            method,
            base_confidence: confidence,
            matched_generic: String::new(),
        },
        status: ActiveStatus::NonActive,
        rule: Some("negative_evidence"),
    }
}

fn map_one(
    lexicon: &Lexicon,
    text: &str,
    method: MatchMethod,
    confidence: f64,
) -> MappedMedication {
    let offsets = CharOffsets::new(text);
    normalize::map_mention(lexicon, &offsets, classified(text, method, confidence))
}

#[test]
fn generic_lookup_maps_with_full_confidence() {
    let lexicon = common::lexicon();
    let mapped = map_one(&lexicon, "Metformin", MatchMethod::Generic, 0.98);
    assert_eq!(mapped.concept_id.as_deref(), Some("6809"));
    assert_eq!(mapped.normalized_name, "metformin");
    assert_eq!(mapped.concept_type.as_deref(), Some("IN"));
    assert_eq!(mapped.mapping_method, MappingMethod::GenericName);
    assert_eq!(mapped.mapping_confidence, 1.0);
    assert_eq!(mapped.flag, None);
    assert_eq!(mapped.text, "Metformin");
}

#[test]
fn brand_lookup_resolves_through_generic() {
    let lexicon = common::lexicon();
    let mapped = map_one(&lexicon, "GLUCOPHAGE", MatchMethod::Brand, 0.96);
    assert_eq!(mapped.concept_id.as_deref(), Some("6809"));
    assert_eq!(mapped.normalized_name, "metformin");
    assert_eq!(mapped.mapping_method, MappingMethod::BrandName);
    assert!((mapped.mapping_confidence - 0.96).abs() < 1e-9);
}

#[test]
fn unknown_brand_is_flagged_not_an_error() {
    let lexicon = common::lexicon();
    let mapped = map_one(&lexicon, "Xarelto", MatchMethod::Brand, 0.96);
    assert_eq!(mapped.concept_id, None);
    assert_eq!(mapped.concept_type, None);
    assert_eq!(mapped.normalized_name, "Xarelto");
    assert_eq!(mapped.mapping_method, MappingMethod::NoMatch);
    assert_eq!(mapped.mapping_confidence, 0.0);
    assert_eq!(mapped.flag.as_deref(), Some(UNRECOGNIZED_FLAG));
    assert_eq!(mapped.active_status, ActiveStatus::NonActive);
}

#[test]
fn mapping_is_total() {
    let lexicon = common::lexicon();
    let input = vec![
        classified("aspirin", MatchMethod::Generic, 0.98),
        classified("Zestril", MatchMethod::Brand, 0.96),
        classified("unknownol", MatchMethod::Brand, 0.96),
    ];
    let mapped = normalize::map_all(&lexicon, "aspirin Zestril unknownol", input);
    let methods: Vec<MappingMethod> = mapped.iter().map(|m| m.mapping_method).collect();
    assert_eq!(
        methods,
        vec![
            MappingMethod::GenericName,
            MappingMethod::BrandName,
            MappingMethod::NoMatch
        ]
    );
}

#[test]
fn confidence_gate_drops_weak_methods_and_is_idempotent() {
    let input = vec![
        classified("aspirin", MatchMethod::Generic, 0.98),
        classified("Bayer", MatchMethod::Brand, 0.96),
        classified("asa", MatchMethod::Brand, 0.5),
    ];
    let once = filter_confident(input);
    assert_eq!(once.len(), 2);
    let twice = filter_confident(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn span_found_as_generic_and_brand_is_emitted_once() {
    let lexicon = Lexicon::from_entries(vec![
        LexiconEntry::new("aspirin", Some("1191"), Some("IN")),
        LexiconEntry::new("acetylsalicylic acid", Some("1191"), Some("IN"))
            .with_brands(["Aspirin"]),
    ]);
    let result = Pipeline::new(lexicon).process_text("note", "aspirin daily");
    assert_eq!(result.medications.len(), 1);
    let med = &result.medications[0];
    assert_eq!((med.start_offset, med.end_offset), (0, 7));
    assert!((med.confidence - 0.98).abs() < 1e-9);
    assert_eq!(med.mapping_method, MappingMethod::GenericName);
}

#[test]
fn offsets_count_characters_after_non_ascii_text() {
    let pipeline = Pipeline::new(common::lexicon());
    let text = "Température 38.5°C. Aspirin 81 mg daily.";
    let result = pipeline.process_text("vitals", text);
    assert_eq!(result.medications.len(), 1);
    let med = &result.medications[0];
    assert_eq!((med.start_offset, med.end_offset), (20, 27));
    let surface: String = text
        .chars()
        .skip(med.start_offset)
        .take(med.end_offset - med.start_offset)
        .collect();
    assert_eq!(surface, med.text);
}

#[test]
fn char_offsets_translate_multibyte_positions() {
    let offsets = CharOffsets::new("µg – x");
    assert_eq!(offsets.char_offset(0), 0);
    assert_eq!(offsets.char_offset(2), 1);
    assert_eq!(offsets.char_offset(4), 3);
    assert_eq!(offsets.char_offset(7), 4);
    assert_eq!(offsets.char_offset("µg – x".len()), 6);
}
