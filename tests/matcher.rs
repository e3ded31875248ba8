mod common;

use medication_extractor::{
    data::lexicon::{Lexicon, LexiconEntry},
    nlp::{
        dedup::dedup_mentions,
        ner::{CandidateMention, LexiconNer, MatchMethod, Ner},
    },
};

#[test]
fn generic_matches_keep_original_casing_and_offsets() {
    let lexicon = common::lexicon();
    let text = "Aspirin and ASPIRIN";
    let spans = LexiconNer::new(&lexicon).extract(text);

    assert_eq!(spans.len(), 2);
    assert_eq!((spans[0].start, spans[0].end), (0, 7));
    assert_eq!(spans[0].text, "Aspirin");
    assert_eq!((spans[1].start, spans[1].end), (12, 19));
    assert_eq!(spans[1].text, "ASPIRIN");
    assert!(spans.iter().all(|s| s.method == MatchMethod::Generic));
    assert!(spans.iter().all(|s| (s.base_confidence - 0.98).abs() < 1e-9));
}

#[test]
fn brand_matches_follow_generics_and_carry_their_generic() {
    let lexicon = common::lexicon();
    let text = "Lasix 40 mg, furosemide";
    let spans = LexiconNer::new(&lexicon).extract(text);

    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].method, MatchMethod::Generic);
    assert_eq!(spans[0].text, "furosemide");
    assert_eq!(spans[1].method, MatchMethod::Brand);
    assert_eq!(spans[1].text, "Lasix");
    assert_eq!(spans[1].start, 0);
    assert_eq!(spans[1].matched_generic, "furosemide");
    assert!((spans[1].base_confidence - 0.96).abs() < 1e-9);
}

#[test]
fn matching_ignores_word_boundaries() {
    let lexicon = Lexicon::from_entries(vec![LexiconEntry::new("statin", Some("1"), None)]);
    let spans = LexiconNer::new(&lexicon).extract("Nystatin swish");
    assert_eq!(spans.len(), 1);
    assert_eq!((spans[0].start, spans[0].end), (2, 8));
}

#[test]
fn empty_lexicon_or_text_finds_nothing() {
    let empty = Lexicon::default();
    assert!(LexiconNer::new(&empty).extract("aspirin").is_empty());
    assert!(LexiconNer::new(&common::lexicon()).extract("").is_empty());
}

fn candidate(text: &str, start: usize, method: MatchMethod) -> CandidateMention {
    CandidateMention {
        text: text.to_string(),
        start,
        end: start + text.len(),
        method,
        base_confidence: method.base_confidence(),
        matched_generic: text.to_lowercase(),
    }
}

#[test]
fn dedup_keeps_first_mention_per_span() {
    let unique = dedup_mentions(vec![
        candidate("Aspirin", 0, MatchMethod::Generic),
        candidate("aspirin", 0, MatchMethod::Brand),
        candidate("aspirin", 20, MatchMethod::Brand),
    ]);
    assert_eq!(unique.len(), 2);
    assert_eq!(unique[0].method, MatchMethod::Generic);
    assert_eq!(unique[1].start, 20);
}

#[test]
fn dedup_drops_very_short_surface_text() {
    let unique = dedup_mentions(vec![
        candidate("AZ", 0, MatchMethod::Brand),
        candidate("ASA", 5, MatchMethod::Brand),
    ]);
    assert_eq!(unique.len(), 1);
    assert_eq!(unique[0].text, "ASA");
}
