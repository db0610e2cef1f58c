//! Tests for the flood-fill visited bitset

#[cfg(test)]
mod tests {
    use traitsheet::segmentation::visited::VisitedMap;

    // Tests marking reports only the first visit
    // Verified by returning the previous bit instead of its negation
    #[test]
    fn test_mark_first_visit_only() {
        let mut map = VisitedMap::new(4, 3);

        assert!(map.mark(1, 2));
        assert!(!map.mark(1, 2));
        assert!(map.is_visited(1, 2));
        assert!(!map.is_visited(2, 1));
        assert_eq!(map.count(), 1);
    }

    // Tests positions outside the map are ignored
    // Verified by wrapping x into the next row
    #[test]
    fn test_out_of_bounds() {
        let mut map = VisitedMap::new(4, 3);

        assert!(!map.mark(4, 0));
        assert!(!map.mark(0, 3));
        assert!(!map.is_visited(4, 0));
        assert!(!map.is_visited(0, 1));
        assert_eq!(map.count(), 0);
    }

    // Tests dimensions and display summary
    // Verified by swapping dimensions in the display output
    #[test]
    fn test_dimensions_and_display() {
        let mut map = VisitedMap::new(7, 2);
        map.mark(6, 1);

        assert_eq!(map.dimensions(), (7, 2));
        assert_eq!(map.to_string(), "VisitedMap(7x2, 1 visited)");
    }
}
