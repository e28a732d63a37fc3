//! CFI Comparison and Ordering
//!
//! Implements comparison logic for CFIs to enable sorting annotations,
//! binary searching the locations index and determining reading order.
//!
//! Order is decided by spine position, then by the step indexes of the
//! start point (the common path followed by the range start), then by the
//! start offset. Step kinds and ID assertions do not take part. A path that
//! runs out of steps first sorts before the longer one.
//!
//! This order is not consistent with `Eq` on [`Cfi`], which also looks at
//! ID assertions, end points and assertions, so `Cfi` does not implement `Ord`.

use std::borrow::Cow;
use std::cmp::Ordering;

use super::parser::parse;
use super::types::*;

/// Anything that can be compared as a CFI: parsed addresses or wire strings
pub trait CfiLike {
    /// The parsed address, or `None` if the input is not a valid CFI
    fn as_cfi(&self) -> Option<Cow<'_, Cfi>>;
}

impl CfiLike for Cfi {
    fn as_cfi(&self) -> Option<Cow<'_, Cfi>> {
        Some(Cow::Borrowed(self))
    }
}

impl CfiLike for str {
    fn as_cfi(&self) -> Option<Cow<'_, Cfi>> {
        parse(self).ok().map(Cow::Owned)
    }
}

impl CfiLike for String {
    fn as_cfi(&self) -> Option<Cow<'_, Cfi>> {
        self.as_str().as_cfi()
    }
}

impl<T: CfiLike + ?Sized> CfiLike for &T {
    fn as_cfi(&self) -> Option<Cow<'_, Cfi>> {
        (**self).as_cfi()
    }
}

/// Compare two parsed CFIs in reading order
pub fn compare_cfi(a: &Cfi, b: &Cfi) -> Ordering {
    let spine = a.spine_pos().cmp(&b.spine_pos());
    if spine != Ordering::Equal {
        return spine;
    }

    let mut steps_b = b.start_steps();
    for step_a in a.start_steps() {
        let Some(step_b) = steps_b.next() else {
            return Ordering::Greater;
        };
        let cmp = step_a.index.cmp(&step_b.index);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    // All steps in `a` match and `a` is less specific
    if steps_b.next().is_some() {
        return Ordering::Less;
    }

    let offset_a = a.start_terminal().offset.unwrap_or(0);
    let offset_b = b.start_terminal().offset.unwrap_or(0);
    offset_a.cmp(&offset_b)
}

/// Compare two CFIs given as parsed addresses or strings.
///
/// Strings are parsed on the fly. An invalid CFI sorts before every valid
/// one, and two invalid CFIs compare equal.
pub fn compare<A, B>(a: A, b: B) -> Ordering
where
    A: CfiLike,
    B: CfiLike,
{
    match (a.as_cfi(), b.as_cfi()) {
        (Some(a), Some(b)) => compare_cfi(&a, &b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Determine if CFI `a` comes before CFI `b` in reading order
pub fn is_before(a: &Cfi, b: &Cfi) -> bool {
    compare_cfi(a, b) == Ordering::Less
}

/// Determine if CFI `a` comes after CFI `b` in reading order
pub fn is_after(a: &Cfi, b: &Cfi) -> bool {
    compare_cfi(a, b) == Ordering::Greater
}

/// Check if a CFI falls within a range (inclusive)
pub fn is_in_range(cfi: &Cfi, start: &Cfi, end: &Cfi) -> bool {
    compare_cfi(cfi, start) != Ordering::Less && compare_cfi(cfi, end) != Ordering::Greater
}

/// Compare two CFI strings, returning their ordering
/// Returns None if either CFI is invalid
pub fn compare_cfi_strings(a: &str, b: &str) -> Option<Ordering> {
    let cfi_a = parse(a).ok()?;
    let cfi_b = parse(b).ok()?;
    Some(compare_cfi(&cfi_a, &cfi_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cfi(s: &str) -> Cfi {
        parse(s).unwrap()
    }

    #[test]
    fn test_cfi_ordering_same_steps() {
        let a = cfi("epubcfi(/6/4!/4/2:0)");
        let b = cfi("epubcfi(/6/4!/4/2:5)");

        assert_eq!(compare(&a, &b), Ordering::Less);
        assert!(is_before(&a, &b));
        assert!(is_after(&b, &a));
    }

    #[test]
    fn test_cfi_ordering_different_spine() {
        assert_eq!(
            compare("epubcfi(/6/2!/4/2:0)", "epubcfi(/6/4!/4/2:0)"),
            Ordering::Less
        );
        // Spine wins over deeper steps
        assert_eq!(
            compare("epubcfi(/6/2!/4/40/2:900)", "epubcfi(/6/4!/2)"),
            Ordering::Less
        );
    }

    #[test]
    fn test_cfi_ordering_different_elements() {
        assert_eq!(
            compare("epubcfi(/6/4!/4/2)", "epubcfi(/6/4!/4/4)"),
            Ordering::Less
        );
    }

    #[test]
    fn test_cfi_ordering_nested_depth() {
        // Shallower prefix comes before the deeper path, whatever the offsets
        assert_eq!(
            compare("epubcfi(/6/4!/4/2:99)", "epubcfi(/6/4!/4/2/1:0)"),
            Ordering::Less
        );
        assert_eq!(
            compare("epubcfi(/6/4!/4/2/1:0)", "epubcfi(/6/4!/4/2:99)"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_kind_and_id_are_ignored() {
        // /3 (text 1) and /4 (element 1) share index 1
        assert_eq!(
            compare("epubcfi(/6/4!/4/3:2)", "epubcfi(/6/4[x]!/4[body]/4:2)"),
            Ordering::Equal
        );
    }

    #[test]
    fn test_range_uses_start() {
        let range = "epubcfi(/6/4!/4/10,/2/1:1,/3:4)";
        assert_eq!(compare(range, "epubcfi(/6/4!/4/10/2/1:1)"), Ordering::Equal);
        assert_eq!(compare(range, "epubcfi(/6/4!/4/10/2/1:2)"), Ordering::Less);
        assert_eq!(compare(range, "epubcfi(/6/4!/4/10/3:0)"), Ordering::Less);
    }

    #[test]
    fn test_missing_offset_counts_as_zero() {
        assert_eq!(
            compare("epubcfi(/6/4!/4/2/1)", "epubcfi(/6/4!/4/2/1:0)"),
            Ordering::Equal
        );
    }

    #[test]
    fn test_cfi_equality() {
        let a = cfi("epubcfi(/6/4!/4/2/1:42)");
        let b = cfi("epubcfi(/6/4!/4/2/1:42)");

        assert_eq!(a, b);
        assert_eq!(compare_cfi(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_cfi_in_range() {
        let start = cfi("epubcfi(/6/4!/4/2/1:0)");
        let end = cfi("epubcfi(/6/4!/4/2/1:100)");
        let middle = cfi("epubcfi(/6/4!/4/2/1:50)");
        let outside = cfi("epubcfi(/6/4!/4/2/1:150)");

        assert!(is_in_range(&middle, &start, &end));
        assert!(is_in_range(&start, &start, &end));
        assert!(!is_in_range(&outside, &start, &end));
    }

    #[test]
    fn test_sort_cfis() {
        let mut cfis = vec![
            "epubcfi(/6/8!/4/2/1:50)",
            "epubcfi(/6/4!/4/2/1:10)",
            "epubcfi(/6/6!/4/2/1:30)",
            "epubcfi(/6/4!/4/2/1:5)",
        ];

        cfis.sort_by(|a, b| compare(a, b));

        assert_eq!(
            cfis,
            vec![
                "epubcfi(/6/4!/4/2/1:5)",
                "epubcfi(/6/4!/4/2/1:10)",
                "epubcfi(/6/6!/4/2/1:30)",
                "epubcfi(/6/8!/4/2/1:50)",
            ]
        );
    }

    #[test]
    fn test_invalid_sorts_first() {
        assert_eq!(compare("garbage", "epubcfi(/6/2!/4)"), Ordering::Less);
        assert_eq!(compare("epubcfi(/6/2!/4)", ""), Ordering::Greater);
        assert_eq!(compare("", "garbage"), Ordering::Equal);
    }

    #[test]
    fn test_compare_cfi_strings() {
        assert_eq!(
            compare_cfi_strings("epubcfi(/6/4!/4/2/1:10)", "epubcfi(/6/4!/4/2/1:20)"),
            Some(Ordering::Less)
        );

        assert_eq!(compare_cfi_strings("invalid", "epubcfi(/6/4!/4/2)"), None);
    }

    fn small_step() -> impl Strategy<Value = Step> {
        (any::<bool>(), 0usize..3).prop_map(|(text, index)| {
            if text {
                Step::text(index)
            } else {
                Step::element(index)
            }
        })
    }

    fn small_segment() -> impl Strategy<Value = Segment> {
        (
            proptest::collection::vec(small_step(), 0..3),
            proptest::option::of(0usize..4),
        )
            .prop_map(|(steps, offset)| {
                let mut segment = Segment::with_steps(steps);
                segment.terminal.offset = offset;
                segment
            })
    }

    fn small_cfi() -> impl Strategy<Value = Cfi> {
        (
            0usize..3,
            small_segment(),
            proptest::option::of((small_segment(), small_segment())),
        )
            .prop_map(|(spine, path, range)| {
                let base = Segment::with_steps(vec![Step::element(2), Step::element(spine)]);
                match range {
                    Some((start, end)) => {
                        let path = Segment::with_steps(path.steps);
                        Cfi::with_range(base, path, CfiRange { start, end })
                    }
                    None => Cfi::new(base, path),
                }
            })
    }

    proptest! {
        #[test]
        fn prop_compare_is_antisymmetric(a in small_cfi(), b in small_cfi()) {
            prop_assert_eq!(compare_cfi(&a, &b), compare_cfi(&b, &a).reverse());
        }

        #[test]
        fn prop_compare_is_transitive(a in small_cfi(), b in small_cfi(), c in small_cfi()) {
            if compare_cfi(&a, &b) != Ordering::Greater && compare_cfi(&b, &c) != Ordering::Greater {
                prop_assert_ne!(compare_cfi(&a, &c), Ordering::Greater);
            }
        }

        #[test]
        fn prop_compare_string_matches_parsed(a in small_cfi(), b in small_cfi()) {
            prop_assert_eq!(compare(a.to_string(), b.to_string()), compare_cfi(&a, &b));
        }
    }
}
