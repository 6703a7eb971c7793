use once_cell::sync::Lazy;
use regex::Regex;

use crate::Program;

use super::normalize::remove;
use super::{Extracted, Extractor};

/// Numeric programme field a pattern capture is stored into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetadataField {
    Year,
    Duration,
    Season,
    Episode,
    Episodes,
}

impl MetadataField {
    pub(crate) fn assign(self, program: &mut Program, value: Option<u32>) {
        let slot = match self {
            MetadataField::Year => &mut program.year,
            MetadataField::Duration => &mut program.duration,
            MetadataField::Season => &mut program.season,
            MetadataField::Episode => &mut program.episode,
            MetadataField::Episodes => &mut program.episodes,
        };
        *slot = value;
    }
}

/// A regex whose capture groups map, in order, onto programme fields.
#[derive(Debug)]
pub(crate) struct PatternMatcher {
    regex: Regex,
    fields: &'static [MetadataField],
}

impl PatternMatcher {
    fn new(pattern: &str, fields: &'static [MetadataField]) -> Self {
        Self {
            regex: Regex::new(pattern).expect("metadata regex"),
            fields,
        }
    }
}

impl Extractor for PatternMatcher {
    type Output = Vec<(MetadataField, Option<u32>)>;

    fn extract(&self, text: &str) -> Option<Extracted<Self::Output>> {
        let caps = self.regex.captures(text)?;
        let value = self
            .fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let parsed = caps.get(idx + 1).and_then(|m| m.as_str().parse().ok());
                (*field, parsed)
            })
            .collect();
        Some(Extracted {
            value,
            remainder: remove(text, &caps[0]),
        })
    }
}

/// Metadata patterns in priority order; each is tried once per pass.
pub(crate) static METADATA_MATCHERS: Lazy<Vec<PatternMatcher>> = Lazy::new(|| {
    use MetadataField::*;
    vec![
        // (2003)
        PatternMatcher::new(r"\(([0-9]{4})\)", &[Year]),
        // (122 mins), (1 min)
        PatternMatcher::new(r"\(([0-9]+)\s+mins?\)", &[Duration]),
        // (Ep 12), (Ep4)
        PatternMatcher::new(r"\([Ee][Pp]\s?([0-9]+)\)", &[Episode]),
        // (Ep 3/4), (Ep5/7)
        PatternMatcher::new(r"\([Ee][Pp]\s?([0-9]+)/([0-9]+)\)", &[Episode, Episodes]),
        // 6/8. (8/9).
        PatternMatcher::new(r"\(?([0-9]+)/([0-9]+)\)?[^A-Za-z0-9_\s]", &[Episode, Episodes]),
        // S3, Ep 3 / (S4,ep5)
        PatternMatcher::new(
            r"\(?[Ss]\s*([0-9]+)[,\s]+[Ee][Pp]\s*([0-9]+)\)?",
            &[Season, Episode],
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::{METADATA_MATCHERS, MetadataField};
    use crate::synopsis::Extractor;

    fn first_match(text: &str) -> Option<(usize, Vec<(MetadataField, Option<u32>)>, String)> {
        METADATA_MATCHERS
            .iter()
            .enumerate()
            .find_map(|(idx, m)| m.extract(text).map(|found| (idx, found.value, found.remainder)))
    }

    #[test]
    fn year_in_parentheses() {
        let (idx, values, rest) = first_match("Classic thriller (1958).").unwrap();
        assert_eq!(idx, 0);
        assert_eq!(values, vec![(MetadataField::Year, Some(1958))]);
        assert_eq!(rest, "Classic thriller .");
    }

    #[test]
    fn duration_singular_and_plural() {
        let (_, values, _) = first_match("Short (1 min)").unwrap();
        assert_eq!(values, vec![(MetadataField::Duration, Some(1))]);
        let (_, values, _) = first_match("Epic (122 mins)").unwrap();
        assert_eq!(values, vec![(MetadataField::Duration, Some(122))]);
    }

    #[test]
    fn single_episode() {
        let (idx, values, rest) = first_match("Drama continues (Ep4)").unwrap();
        assert_eq!(idx, 2);
        assert_eq!(values, vec![(MetadataField::Episode, Some(4))]);
        assert_eq!(rest, "Drama continues");
    }

    #[test]
    fn episode_of_total() {
        let (idx, values, _) = first_match("Finale (Ep 3/4)").unwrap();
        assert_eq!(idx, 3);
        assert_eq!(
            values,
            vec![(MetadataField::Episode, Some(3)), (MetadataField::Episodes, Some(4))]
        );
    }

    #[test]
    fn bare_fraction_needs_trailing_punctuation() {
        let (idx, values, rest) = first_match("6/8. The hunt goes on").unwrap();
        assert_eq!(idx, 4);
        assert_eq!(
            values,
            vec![(MetadataField::Episode, Some(6)), (MetadataField::Episodes, Some(8))]
        );
        assert_eq!(rest, "The hunt goes on");
        assert!(first_match("Mixed 6/8 time").is_none());
    }

    #[test]
    fn season_and_episode() {
        let (idx, values, rest) = first_match("Old friends return. (S4,ep5)").unwrap();
        assert_eq!(idx, 5);
        assert_eq!(
            values,
            vec![(MetadataField::Season, Some(4)), (MetadataField::Episode, Some(5))]
        );
        assert_eq!(rest, "Old friends return.");
    }

    #[test]
    fn unrelated_text_has_no_metadata() {
        assert!(first_match("Nothing to see here.").is_none());
    }
}
