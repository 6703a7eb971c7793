//! Mining of free-text programme synopses.
//!
//! A synopsis often carries more than prose: the tail of a truncated title,
//! a year or running time in parentheses, episode numbering, bracketed
//! broadcast attributes and a closing sentence of content warnings. Each kind
//! is handled by an extractor that, on a match, returns the values found and
//! the synopsis with the matched text removed. Extractors run in a fixed
//! order and each one sees the text left by the previous one:
//!
//! 1. title continuation (`title` module), before anything strips the
//!    leading ellipsis it relies on
//! 2. metadata patterns (`metadata`), each tried once
//! 3. bracketed attributes (`attributes`), all groups
//! 4. content descriptors in the last sentence (`descriptors`), repeated
//!    while the new last sentence also carries them
//!
//! Metadata must run before attributes: numeric patterns are matched before
//! bracket removal can disturb the text around them.

mod attributes;
mod descriptors;
mod metadata;
mod normalize;
mod title;

pub use normalize::normalize;

use crate::DecodedEvent;

use attributes::AttributeExtractor;
use descriptors::DescriptorExtractor;
use metadata::METADATA_MATCHERS;

/// Values pulled out of a text plus what remains of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Extracted<T> {
    pub value: T,
    pub remainder: String,
}

/// One independently testable extraction strategy.
pub(crate) trait Extractor {
    type Output;

    /// Attempt extraction; `None` leaves the text as it was.
    fn extract(&self, text: &str) -> Option<Extracted<Self::Output>>;
}

/// Run every mining step over the record's synopsis, in order.
///
/// Does nothing while no synopsis has arrived. Running it again over an
/// already mined record leaves it unchanged.
///
/// # Examples
/// ```
/// use skygnome_core::{DecodedEvent, mine_synopsis};
/// use time::OffsetDateTime;
///
/// let mut event = DecodedEvent::empty(OffsetDateTime::UNIX_EPOCH);
/// event.program.synopsis = Some("Drama. (2003) [S]".to_string());
/// mine_synopsis(&mut event);
/// assert_eq!(event.program.year, Some(2003));
/// assert_eq!(event.showing.attributes, vec!["subtitles".to_string()]);
/// assert_eq!(event.program.synopsis.as_deref(), Some("Drama."));
/// ```
pub fn mine_synopsis(event: &mut DecodedEvent) {
    let Some(mut synopsis) = event.program.synopsis.take() else {
        return;
    };

    if let Some(current) = event.program.title.as_deref() {
        if let Some((joined, rest)) = title::join_title(current, &synopsis) {
            event.program.title = Some(joined);
            synopsis = rest;
        }
    }

    for matcher in METADATA_MATCHERS.iter() {
        if let Some(found) = matcher.extract(&synopsis) {
            for (field, value) in found.value {
                field.assign(&mut event.program, value);
            }
            synopsis = found.remainder;
        }
    }
    synopsis = normalize(&synopsis);

    if let Some(found) = AttributeExtractor.extract(&synopsis) {
        event
            .showing
            .attributes
            .extend(found.value.into_iter().map(str::to_string));
        synopsis = found.remainder;
    }
    synopsis = normalize(&synopsis);

    // a removed descriptor sentence can expose another one, so repeat until
    // the closing sentence carries none
    let mut described = false;
    while let Some(found) = DescriptorExtractor.extract(&synopsis) {
        event
            .program
            .warnings
            .extend(found.value.into_iter().map(str::to_string));
        synopsis = found.remainder;
        described = true;
    }
    if !described {
        synopsis = normalize(&synopsis);
    }

    event.program.synopsis = Some(synopsis);
}

#[cfg(test)]
mod tests {
    use super::mine_synopsis;
    use crate::DecodedEvent;
    use time::OffsetDateTime;

    fn event(title: Option<&str>, synopsis: &str) -> DecodedEvent {
        let mut event = DecodedEvent::empty(OffsetDateTime::UNIX_EPOCH);
        event.program.title = title.map(str::to_string);
        event.program.synopsis = Some(synopsis.to_string());
        event
    }

    #[test]
    fn full_pipeline_extracts_everything() {
        let mut event = event(
            Some("Film Title..."),
            "...continues here: rest of synopsis (2010) (90 mins) [HD,S]. Contains violence.",
        );
        mine_synopsis(&mut event);

        assert_eq!(event.program.title.as_deref(), Some("Film Title continues here"));
        assert_eq!(event.program.synopsis.as_deref(), Some("rest of synopsis."));
        assert_eq!(event.program.year, Some(2010));
        assert_eq!(event.program.duration, Some(90));
        assert_eq!(
            event.showing.attributes,
            vec!["high definition".to_string(), "subtitles".to_string()]
        );
        assert_eq!(event.program.warnings, vec!["violent scenes".to_string()]);
    }

    #[test]
    fn mining_twice_changes_nothing() {
        let mut once = event(
            Some("Long Running Saga..."),
            "...Part Two. The heroes regroup. (S2, Ep 5) [AD,HD] Contains strong language and sex.",
        );
        mine_synopsis(&mut once);
        let mut twice = once.clone();
        mine_synopsis(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn stacked_descriptor_sentences_are_removed_in_one_pass() {
        let mut once = event(None, "A heist goes wrong. Contains strong language. Also in HD.");
        mine_synopsis(&mut once);
        assert_eq!(once.program.synopsis.as_deref(), Some("A heist goes wrong."));
        assert_eq!(once.program.warnings, vec!["strong language".to_string()]);

        let mut twice = once.clone();
        mine_synopsis(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn repeated_descriptor_sentence_keeps_the_earlier_copy() {
        let mut event = event(None, "Intro. Contains violence. Plot. Contains violence.");
        mine_synopsis(&mut event);
        assert_eq!(
            event.program.synopsis.as_deref(),
            Some("Intro. Contains violence. Plot.")
        );
        assert_eq!(event.program.warnings, vec!["violent scenes".to_string()]);
    }

    #[test]
    fn plain_synopsis_is_only_normalized() {
        let mut event = event(Some("News"), "  The latest   headlines.");
        mine_synopsis(&mut event);
        assert_eq!(event.program.synopsis.as_deref(), Some("The latest headlines."));
        assert_eq!(event.program.title.as_deref(), Some("News"));
        assert!(event.program.warnings.is_empty());
        assert!(event.showing.attributes.is_empty());
        assert_eq!(event.program.year, None);
    }

    #[test]
    fn missing_synopsis_is_a_no_op() {
        let mut event = DecodedEvent::empty(OffsetDateTime::UNIX_EPOCH);
        event.program.title = Some("Title...".to_string());
        let before = event.clone();
        mine_synopsis(&mut event);
        assert_eq!(event, before);
    }

    #[test]
    fn attributes_follow_metadata() {
        let mut event = event(None, "Quiz show (Ep 3/8) [W,C].");
        mine_synopsis(&mut event);
        assert_eq!(event.program.episode, Some(3));
        assert_eq!(event.program.episodes, Some(8));
        assert_eq!(
            event.showing.attributes,
            vec!["widescreen".to_string(), "copy protected".to_string()]
        );
        assert_eq!(event.program.synopsis.as_deref(), Some("Quiz show ."));
    }
}
