//! Wire types for the analysis service.
//!
//! Sections of an analysis response are kept as raw JSON and only decoded on
//! access, so one analyzer returning an unexpected shape never poisons the
//! rest of the response.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub analysis_results: AnalysisResultsData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParaphraseRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParaphraseResponse {
    pub paraphrased_text: String,
}

/// All analyzer sections of one response; any of them may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResultsData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusive_language: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readability: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paraphraser: Option<String>,
}

impl AnalysisResultsData {
    pub fn grammar(&self) -> Section<GrammarData> {
        parse_section(self.grammar.as_ref())
    }

    pub fn inclusive_language(&self) -> Section<InclusiveData> {
        parse_section(self.inclusive_language.as_ref())
    }

    pub fn synonyms(&self) -> Section<SynonymData> {
        parse_section(self.synonyms.as_ref())
    }

    pub fn readability(&self) -> Section<ReadabilitySection> {
        parse_section(self.readability.as_ref())
    }

    pub fn tone(&self) -> Section<ToneData> {
        parse_section(self.tone.as_ref())
    }

    pub fn voice(&self) -> Section<VoiceData> {
        parse_section(self.voice.as_ref())
    }
}

/// Decoded state of one analyzer section
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Success(T),
    Error(String),
    Skipped(String),
    Missing,
    /// The section did not match the expected shape
    Malformed(String),
}

impl<T> Section<T> {
    pub fn success(self) -> Option<T> {
        match self {
            Section::Success(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SectionStatus {
    Success,
    Error,
    Skipped,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    status: SectionStatus,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

fn parse_section<T: DeserializeOwned>(raw: Option<&Value>) -> Section<T> {
    let Some(raw) = raw else {
        return Section::Missing;
    };
    let section = match RawSection::deserialize(raw) {
        Ok(section) => section,
        Err(e) => return Section::Malformed(e.to_string()),
    };
    match section.status {
        SectionStatus::Success => match section.data {
            Some(data) => match T::deserialize(&data) {
                Ok(data) => Section::Success(data),
                Err(e) => Section::Malformed(e.to_string()),
            },
            None => Section::Malformed("success without data".to_string()),
        },
        SectionStatus::Error => Section::Error(section.message.unwrap_or_default()),
        SectionStatus::Skipped => Section::Skipped(section.message.unwrap_or_default()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarData {
    pub issues: Vec<GrammarIssue>,
    #[serde(default)]
    pub original_text: String,
    #[serde(default)]
    pub corrected_text_suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarIssue {
    pub offset: i64,
    pub length: i64,
    pub message: String,
    #[serde(default)]
    pub original_segment: String,
    #[serde(default)]
    pub suggested_segment: String,
    #[serde(default)]
    pub context_before: String,
    #[serde(default)]
    pub context_after: String,
    #[serde(default)]
    pub full_original_sentence_context: String,
    #[serde(default)]
    pub display_context: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InclusiveData {
    pub issues: Vec<InclusiveIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InclusiveIssue {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub term: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub formatted_context: String,
    pub start_char: i64,
    pub end_char: i64,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymData {
    pub suggestions: Vec<SynonymSuggestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynonymSuggestion {
    pub original_word: String,
    pub start_char: i64,
    pub end_char: i64,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub pos: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityIssue {
    pub offset: i64,
    pub length: i64,
    pub message: String,
    #[serde(default)]
    pub original_segment: String,
    #[serde(default)]
    pub context_before: String,
    #[serde(default)]
    pub context_after: String,
    #[serde(default)]
    pub full_original_sentence_context: String,
    #[serde(default)]
    pub display_context: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadabilitySection {
    #[serde(default)]
    pub overall_summary: OverallSummary,
    #[serde(default)]
    pub detailed_scores: BTreeMap<String, ReadabilityScore>,
    #[serde(default)]
    pub statistics: ReadabilityStatistics,
    #[serde(default)]
    pub readability_issues: Option<Vec<ReadabilityIssue>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityScore {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub interpretation: ScoreInterpretation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreInterpretation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityStatistics {
    #[serde(default)]
    pub sentence_count: u32,
    #[serde(default)]
    pub word_count: u32,
    #[serde(default)]
    pub syllable_count: u32,
    #[serde(default)]
    pub average_words_per_sentence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToneData {
    pub tone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceData {
    pub voice: String,
    #[serde(default)]
    pub passive_ratio: f64,
    #[serde(default)]
    pub passive_sentences_count: u32,
    #[serde(default)]
    pub total_sentences_count: u32,
}
