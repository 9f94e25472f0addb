//! The proverb catalogue
//!
//! A fixed list compiled into the binary, in canonical chapter/verse order.

use serde::Serialize;

use super::{Paginated, Pagination};

/// A single proverb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Proverb {
    pub chapter: u16,
    pub verse: u16,
    pub text: &'static str,
}

impl Proverb {
    const fn new(chapter: u16, verse: u16, text: &'static str) -> Self {
        Self {
            chapter,
            verse,
            text,
        }
    }
}

static CATALOGUE: [Proverb; 17] = [
    Proverb::new(1, 7, "The fear of the LORD is the beginning of knowledge, but fools despise wisdom and instruction."),
    Proverb::new(3, 5, "Trust in the LORD with all your heart and lean not on your own understanding;"),
    Proverb::new(3, 6, "in all your ways submit to him, and he will make your paths straight."),
    Proverb::new(4, 23, "Above all else, guard your heart, for everything you do flows from it."),
    Proverb::new(10, 12, "Hatred stirs up conflict, but love covers over all wrongs."),
    Proverb::new(12, 1, "Whoever loves discipline loves knowledge, but whoever hates correction is stupid."),
    Proverb::new(13, 3, "Those who guard their lips preserve their lives, but those who speak rashly will come to ruin."),
    Proverb::new(15, 1, "A gentle answer turns away wrath, but a harsh word stirs up anger."),
    Proverb::new(16, 3, "Commit to the LORD whatever you do, and he will establish your plans."),
    Proverb::new(16, 9, "In their hearts humans plan their course, but the LORD establishes their steps."),
    Proverb::new(17, 22, "A cheerful heart is good medicine, but a crushed spirit dries up the bones."),
    Proverb::new(18, 10, "The name of the LORD is a fortified tower; the righteous run to it and are safe."),
    Proverb::new(19, 21, "Many are the plans in a person\u{2019}s heart, but it is the LORD\u{2019}s purpose that prevails."),
    Proverb::new(22, 6, "Start children off on the way they should go, and even when they are old they will not turn from it."),
    Proverb::new(27, 17, "As iron sharpens iron, so one person sharpens another."),
    Proverb::new(28, 13, "Whoever conceals their sins does not prosper, but the one who confesses and renounces them finds mercy."),
    Proverb::new(29, 25, "Fear of man will prove to be a snare, but whoever trusts in the LORD is kept safe."),
];

/// Every proverb, in order.
pub fn catalogue() -> &'static [Proverb] {
    &CATALOGUE
}

/// One page of the catalogue. Pages past the end are empty.
pub fn page(pagination: Pagination) -> Paginated<Proverb> {
    Paginated::from_slice(catalogue(), pagination)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(proverb: &Proverb) -> String {
        format!("{}:{}", proverb.chapter, proverb.verse)
    }

    #[test]
    fn catalogue_is_in_canonical_order() {
        let all = catalogue();
        assert_eq!(all.len(), 17);
        assert!(all
            .windows(2)
            .all(|w| (w[0].chapter, w[0].verse) < (w[1].chapter, w[1].verse)));
        assert_eq!(reference(&all[0]), "1:7");
        assert_eq!(reference(&all[16]), "29:25");
    }

    #[test]
    fn default_page_is_first_five() {
        let first = page(Pagination::default());
        assert_eq!(first.items.len(), 5);
        assert_eq!(reference(&first.items[0]), "1:7");
        assert_eq!(reference(&first.items[4]), "10:12");
        assert_eq!(first.total, 17);
        assert_eq!(first.total_pages(), 4);
    }

    #[test]
    fn last_page_is_partial() {
        let last = page(Pagination::new(4, 5));
        let refs: Vec<_> = last.items.iter().map(reference).collect();
        assert_eq!(refs, vec!["28:13", "29:25"]);
        assert!(!last.has_next());
    }

    #[test]
    fn page_past_end_is_empty() {
        let beyond = page(Pagination::new(9, 5));
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 17);
    }

    #[test]
    fn serializes_like_the_api_contract() {
        let json = serde_json::to_value(catalogue()[1]).unwrap();
        assert_eq!(json["chapter"], 3);
        assert_eq!(json["verse"], 5);
        assert!(json["text"].as_str().unwrap().starts_with("Trust in the LORD"));
    }
}
