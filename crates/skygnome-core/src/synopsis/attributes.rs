use once_cell::sync::Lazy;
use regex::Regex;

use super::normalize::remove;
use super::{Extracted, Extractor};

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]").expect("bracket regex"));

/// Broadcast attribute codes as they appear inside `[...]`.
const ATTRIBUTES: &[(&str, &str)] = &[
    ("AD", "audio description"),
    ("C", "copy protected"),
    ("DS", "dolby stereo"),
    ("HD", "high definition"),
    ("S", "subtitles"),
    ("SL", "sign language"),
    ("UHD", "ultra high definition"),
    ("W", "widescreen"),
];

fn attribute_label(code: &str) -> Option<&'static str> {
    ATTRIBUTES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
}

/// Collects every bracketed group, e.g. `[HD,S,AD]`, and removes it.
/// Unknown codes inside a group are dropped along with the group.
pub(crate) struct AttributeExtractor;

impl Extractor for AttributeExtractor {
    type Output = Vec<&'static str>;

    fn extract(&self, text: &str) -> Option<Extracted<Self::Output>> {
        let groups: Vec<(&str, &str)> = BRACKETED
            .captures_iter(text)
            .filter_map(|caps| Some((caps.get(0)?.as_str(), caps.get(1)?.as_str())))
            .collect();
        if groups.is_empty() {
            return None;
        }

        let mut labels = Vec::new();
        let mut remainder = text.to_string();
        for (whole, inner) in groups {
            labels.extend(inner.split(',').filter_map(|part| attribute_label(part.trim())));
            remainder = remove(&remainder, whole);
        }
        Some(Extracted {
            value: labels,
            remainder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AttributeExtractor;
    use crate::synopsis::Extractor;

    #[test]
    fn maps_codes_in_order() {
        let found = AttributeExtractor.extract("Film. [HD, S ,AD]").unwrap();
        assert_eq!(
            found.value,
            vec!["high definition", "subtitles", "audio description"]
        );
        assert_eq!(found.remainder, "Film.");
    }

    #[test]
    fn collects_every_group() {
        let found = AttributeExtractor.extract("[W] Film [UHD,SL] again.").unwrap();
        assert_eq!(
            found.value,
            vec!["widescreen", "ultra high definition", "sign language"]
        );
        assert_eq!(found.remainder, "Film again.");
    }

    #[test]
    fn unknown_codes_are_dropped_with_their_group() {
        let found = AttributeExtractor.extract("Film [XYZ,DS] [Q]").unwrap();
        assert_eq!(found.value, vec!["dolby stereo"]);
        assert_eq!(found.remainder, "Film");
    }

    #[test]
    fn no_brackets_no_match() {
        assert!(AttributeExtractor.extract("Film (2001).").is_none());
        assert!(AttributeExtractor.extract("Empty [] brackets").is_none());
    }
}
