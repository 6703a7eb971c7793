use once_cell::sync::Lazy;
use regex::Regex;

use super::normalize::normalize;
use super::{Extracted, Extractor};

/// The closing sentence of a synopsis with more than one sentence.
static LAST_SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\s([^.]+)\.$").expect("last sentence regex"));

/// Phrase looked for in the closing sentence, and the warning it yields.
/// An empty label is detected (so the sentence is removed) but not stored.
const DESCRIPTORS: &[(&str, &str)] = &[
    ("strong language", "strong language"),
    ("flashing images", "flashing images"),
    ("violence", "violent scenes"),
    ("sex", "sex or nudity"),
    ("mature themes", "mature themes"),
    ("mono sound", "mono sound only"),
    ("also in hd", ""),
];

/// Pulls content warnings out of the last sentence and drops that sentence.
pub(crate) struct DescriptorExtractor;

impl Extractor for DescriptorExtractor {
    type Output = Vec<&'static str>;

    fn extract(&self, text: &str) -> Option<Extracted<Self::Output>> {
        let caps = LAST_SENTENCE.captures(text)?;
        let sentence = caps[1].to_lowercase();

        let matched: Vec<&'static str> = DESCRIPTORS
            .iter()
            .filter(|(phrase, _)| sentence.contains(phrase))
            .map(|(_, label)| *label)
            .collect();
        if matched.is_empty() {
            return None;
        }

        // the match is anchored at the end, so cut there rather than at an
        // earlier copy of the same sentence
        let start = caps.get(0)?.start();
        let mut remainder = normalize(&text[..start]);
        remainder.push('.');
        Some(Extracted {
            value: matched.into_iter().filter(|label| !label.is_empty()).collect(),
            remainder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::DescriptorExtractor;
    use crate::synopsis::Extractor;

    #[test]
    fn extracts_warnings_in_table_order() {
        let found = DescriptorExtractor
            .extract("A tense drama. Contains violence and strong language.")
            .unwrap();
        assert_eq!(found.value, vec!["strong language", "violent scenes"]);
        assert_eq!(found.remainder, "A tense drama.");
    }

    #[test]
    fn detected_but_unstored_phrase_still_removes_sentence() {
        let found = DescriptorExtractor
            .extract("Live coverage. Also in HD.")
            .unwrap();
        assert!(found.value.is_empty());
        assert_eq!(found.remainder, "Live coverage.");
    }

    #[test]
    fn sentence_without_descriptors_is_kept() {
        assert!(DescriptorExtractor
            .extract("A tense drama. Filmed on location.")
            .is_none());
    }

    #[test]
    fn single_sentence_is_never_a_descriptor() {
        assert!(DescriptorExtractor.extract("Contains violence.").is_none());
    }

    #[test]
    fn only_the_last_sentence_is_inspected() {
        let found = DescriptorExtractor
            .extract("Flashing images open the film. A quiet story. Mono sound.")
            .unwrap();
        assert_eq!(found.value, vec!["mono sound only"]);
        assert_eq!(found.remainder, "Flashing images open the film. A quiet story.");
    }

    #[test]
    fn repeated_sentence_is_removed_from_the_end() {
        let found = DescriptorExtractor
            .extract("Intro. Contains violence. Plot. Contains violence.")
            .unwrap();
        assert_eq!(found.value, vec!["violent scenes"]);
        assert_eq!(found.remainder, "Intro. Contains violence. Plot.");
    }
}
