//! Counted nouns for summaries.

/// `"1 target"`, `"3 targets"`, `"0 targets"`.
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "target"), "0 targets");
        assert_eq!(plural_count(1, "target"), "1 target");
        assert_eq!(plural_count(7, "bundle"), "7 bundles");
    }
}
