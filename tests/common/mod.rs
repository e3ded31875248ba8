#![allow(dead_code)]

use medication_extractor::{
    data::lexicon::Lexicon,
    nlp::{
        self,
        status::{ClassifiedMention, StatusClassifier},
    },
};

pub const LEXICON_CSV: &str = "\
generic,RxCUI,RxCUI term type (single or multi ingredient),most common brand name,other brand names
metformin,6809,IN,Glucophage,\"Fortamet, Glumetza\"
aspirin,1191,IN,Bayer,Ecotrin
lisinopril,29046,IN,Zestril,Prinivil
furosemide,4603,IN,Lasix,
apixaban,1364430,IN,Eliquis,
";

pub fn lexicon() -> Lexicon {
    Lexicon::from_reader(LEXICON_CSV.as_bytes()).expect("fixture lexicon parses")
}

pub fn classify(text: &str) -> Vec<ClassifiedMention> {
    nlp::extract_mentions(&lexicon(), &StatusClassifier::default(), text)
        .expect("classification succeeds")
}

/// Every classified mention whose folded surface text equals `name`.
pub fn mentions_of<'a>(
    classified: &'a [ClassifiedMention],
    name: &str,
) -> Vec<&'a ClassifiedMention> {
    classified
        .iter()
        .filter(|c| c.mention.text.eq_ignore_ascii_case(name))
        .collect()
}
