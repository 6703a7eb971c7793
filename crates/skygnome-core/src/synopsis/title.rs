use super::normalize::normalize;

const ELLIPSIS: &str = "...";

/// Rejoin a title the guide split with an ellipsis into the synopsis.
///
/// `"Film Title..."` + `"...continues here: the plot"` becomes
/// `"Film Title continues here"` + `"the plot"`. The split point is the
/// earliest colon or full stop after the synopsis's leading ellipsis; with
/// neither present nothing is joined. Returns the new title and synopsis.
pub(crate) fn join_title(title: &str, synopsis: &str) -> Option<(String, String)> {
    let head = title.strip_suffix(ELLIPSIS)?;
    let tail = synopsis.strip_prefix(ELLIPSIS)?;

    let split = match (tail.find(':'), tail.find('.')) {
        (Some(colon), Some(stop)) => colon.min(stop),
        (Some(colon), None) => colon,
        (None, Some(stop)) => stop,
        (None, None) => return None,
    };

    let title = normalize(&format!("{head} {}", &tail[..split]));
    let synopsis = normalize(&tail[split + 1..]);
    Some((title, synopsis))
}

#[cfg(test)]
mod tests {
    use super::join_title;

    #[test]
    fn joins_at_colon() {
        let (title, synopsis) =
            join_title("Film Title...", "...continues here: rest of synopsis").unwrap();
        assert_eq!(title, "Film Title continues here");
        assert_eq!(synopsis, "rest of synopsis");
    }

    #[test]
    fn joins_at_earliest_of_colon_and_stop() {
        let (title, synopsis) = join_title("The Long...", "...Goodbye. Noir: classic").unwrap();
        assert_eq!(title, "The Long Goodbye");
        assert_eq!(synopsis, "Noir: classic");
    }

    #[test]
    fn needs_both_ellipses() {
        assert!(join_title("Film Title", "...continues: rest").is_none());
        assert!(join_title("Film Title...", "continues: rest").is_none());
    }

    #[test]
    fn no_split_point_no_join() {
        assert!(join_title("Film Title...", "...continues without end").is_none());
    }
}
