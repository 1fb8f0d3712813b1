use line_debugger::source::LineTable;
use proptest::prelude::*;

use crate::utils::line_set;

proptest! {
    #[test]
    fn test_resolved_line_is_smallest_executable_at_or_after(
        lines in line_set(),
        requested in 0u32..600,
    ) {
        let table = LineTable::new(lines.clone()).unwrap();
        let expected = lines.iter().copied().filter(|&x| x >= requested).min();
        prop_assert_eq!(table.resolve(requested), expected);
    }

    #[test]
    fn test_executable_line_resolves_to_itself(lines in line_set(), pick in any::<prop::sample::Index>()) {
        let table = LineTable::new(lines.clone()).unwrap();
        let line = lines[pick.index(lines.len())];
        prop_assert_eq!(table.resolve(line), Some(line));
    }

    #[test]
    fn test_resolution_never_moves_backwards(lines in line_set(), requested in 0u32..600) {
        let table = LineTable::new(lines).unwrap();
        if let Some(resolved) = table.resolve(requested) {
            prop_assert!(resolved >= requested);
            prop_assert!(table.contains(resolved));
        }
    }

    #[test]
    fn test_past_last_line_has_no_code(lines in line_set(), beyond in 1u32..100) {
        let table = LineTable::new(lines).unwrap();
        let last = table.last().unwrap();
        prop_assert_eq!(table.resolve(last + beyond), None);
    }

    #[test]
    fn test_unsorted_tables_are_rejected(mut lines in line_set()) {
        prop_assume!(lines.len() > 1);
        lines.reverse();
        prop_assert!(LineTable::new(lines).is_err());
    }
}
