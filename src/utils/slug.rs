/// URL-safe slug derived from a product title. Deterministic: the same title
/// always yields the same slug. Uniqueness is not enforced here or in the
/// schema; lookups by slug take the oldest match.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_dash = true;

    for c in title.chars() {
        if c.is_alphanumeric() {
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_title() {
        assert_eq!(slugify("The Very Hungry Caterpillar"), "the-very-hungry-caterpillar");
    }

    #[test]
    fn test_punctuation_collapses() {
        assert_eq!(slugify("Where's  Spot?"), "where-s-spot");
        assert_eq!(slugify("  Goodnight, Moon!  "), "goodnight-moon");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(slugify("Room on the Broom"), slugify("Room on the Broom"));
    }

    #[test]
    fn test_numbers_kept() {
        assert_eq!(slugify("101 Dalmatians"), "101-dalmatians");
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
