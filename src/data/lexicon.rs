//! Concept lexicon: generic names, concept identifiers and brand synonyms.

use std::{fs::File, io::Read, path::Path};

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{error::LexiconError, nlp::text::fold_case};

/// One generic drug and everything known about it.
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconEntry {
    /// Folded generic name; the lexicon key.
    pub generic_name: String,
    pub concept_id: Option<String>,
    pub concept_type: Option<String>,
    /// Folded brand synonyms in source order.
    pub brand_names: IndexSet<String>,
}

impl LexiconEntry {
    pub fn new(generic_name: &str, concept_id: Option<&str>, concept_type: Option<&str>) -> Self {
        Self {
            generic_name: fold_case(generic_name.trim()),
            concept_id: non_empty(concept_id),
            concept_type: non_empty(concept_type),
            brand_names: IndexSet::new(),
        }
    }

    /// Add brand synonyms; blanks are ignored.
    pub fn with_brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for brand in brands {
            let brand = fold_case(brand.as_ref().trim());
            if !brand.is_empty() {
                self.brand_names.insert(brand);
            }
        }
        self
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct LexiconRow {
    #[serde(rename = "generic", default)]
    generic: Option<String>,
    #[serde(rename = "RxCUI", default)]
    concept_id: Option<String>,
    #[serde(rename = "RxCUI term type (single or multi ingredient)", default)]
    concept_type: Option<String>,
    #[serde(rename = "most common brand name", default)]
    primary_brand: Option<String>,
    #[serde(rename = "other brand names", default)]
    other_brands: Option<String>,
}

impl LexiconRow {
    fn into_entry(self) -> Option<LexiconEntry> {
        let generic = self.generic.as_deref().map(str::trim).unwrap_or_default();
        if generic.is_empty() {
            return None;
        }
        let others = self.other_brands.unwrap_or_default();
        let brands = self
            .primary_brand
            .into_iter()
            .chain(others.split(',').map(str::to_string));
        Some(
            LexiconEntry::new(
                generic,
                self.concept_id.as_deref(),
                self.concept_type.as_deref(),
            )
            .with_brands(brands),
        )
    }
}

/// Read-only generic-name table plus the derived brand index.
///
/// Built once, then shared by reference with every pipeline stage.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: IndexMap<String, LexiconEntry>,
    brand_index: IndexMap<String, String>,
}

impl Lexicon {
    /// Build from in-memory entries. A repeated generic name replaces the
    /// earlier entry but keeps its original position.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = LexiconEntry>,
    {
        let mut map = IndexMap::new();
        for entry in entries {
            if entry.generic_name.is_empty() {
                warn!("skipping lexicon entry with empty generic name");
                continue;
            }
            map.insert(entry.generic_name.clone(), entry);
        }
        let mut brand_index = IndexMap::new();
        for (generic, entry) in &map {
            for brand in &entry.brand_names {
                brand_index.insert(brand.clone(), generic.clone());
            }
        }
        Self {
            entries: map,
            brand_index,
        }
    }

    /// Parse a CSV concept table. Rows that fail to deserialize or have no
    /// generic name are skipped with a warning.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LexiconError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        // Surface a broken header as an error rather than an empty table.
        csv_reader.headers()?;
        let mut entries = Vec::new();
        let mut skipped = 0usize;
        for (idx, result) in csv_reader.deserialize::<LexiconRow>().enumerate() {
            match result.map(LexiconRow::into_entry) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {
                    skipped += 1;
                    warn!(row = idx + 1, "skipping lexicon row without generic name");
                }
                Err(err) => {
                    skipped += 1;
                    warn!(row = idx + 1, %err, "skipping malformed lexicon row");
                }
            }
        }
        let lexicon = Self::from_entries(entries);
        info!(
            entries = lexicon.len(),
            brands = lexicon.brand_count(),
            skipped,
            "loaded concept lexicon"
        );
        Ok(lexicon)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LexiconError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Load the lexicon, degrading to an empty table when the source is
    /// missing or unreadable so that extraction still runs (every mention then
    /// maps to `no_match`).
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_path(&path) {
            Ok(lexicon) => lexicon,
            Err(err) => {
                warn!(
                    path = %path.as_ref().display(),
                    %err,
                    "lexicon unavailable; continuing with empty lexicon"
                );
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn brand_count(&self) -> usize {
        self.brand_index.len()
    }

    /// Look up a generic name; `key` must already be folded.
    pub fn generic(&self, key: &str) -> Option<&LexiconEntry> {
        self.entries.get(key)
    }

    /// Resolve a folded brand name to its generic entry.
    pub fn brand(&self, key: &str) -> Option<&LexiconEntry> {
        self.brand_index
            .get(key)
            .and_then(|generic| self.entries.get(generic))
    }

    pub fn entries(&self) -> impl Iterator<Item = &LexiconEntry> {
        self.entries.values()
    }

    /// `(brand, generic)` pairs in lexicon order.
    pub fn brands(&self) -> impl Iterator<Item = (&str, &str)> {
        self.brand_index
            .iter()
            .map(|(brand, generic)| (brand.as_str(), generic.as_str()))
    }

    pub fn missing_concept_ids(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.concept_id.is_none())
            .count()
    }
}
