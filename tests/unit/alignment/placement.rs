//! Tests for placing every trait of a combination

#[cfg(test)]
mod tests {
    use traitsheet::alignment::canvas::Rect;
    use traitsheet::alignment::placement::align_combination;
    use traitsheet::alignment::snap::Category;
    use traitsheet::composition::engine::enumerate;
    use traitsheet::composition::layer::{Layer, Trait};

    fn layers() -> Vec<Layer> {
        vec![
            Layer::new("Body")
                .with_category(Category::Body)
                .with_position(Rect::new(0.0, 0.0, 560.0, 500.0))
                .with_trait(Trait::new("Shirt", None)),
            Layer::new("Head")
                .with_category(Category::Head)
                .with_position(Rect::new(0.0, 0.0, 400.0, 300.0))
                .with_trait(Trait::new("Round", None)),
            Layer::new("Sparkle")
                .with_position(Rect::new(10.0, 20.0, 30.0, 40.0))
                .with_trait(Trait::new("Star", None)),
        ]
    }

    // Tests nominal placement snaps by category and keeps z-order
    // Verified by snapping every entry as a head
    #[test]
    fn test_align_nominal() {
        let layers = layers();
        let ordered: Vec<&Layer> = layers.iter().collect();
        let Some(combination) = enumerate(&ordered, 1).pop() else {
            unreachable!("one combination expected");
        };

        let placed = align_combination(&combination, |_| None);

        let [body, head, sparkle] = placed.as_slice() else {
            unreachable!("expected three placements, found {}", placed.len());
        };
        assert_eq!(body.rect, Rect::new(232.0, 420.0, 560.0, 500.0));
        assert_eq!(head.rect, Rect::new(312.0, 140.0, 400.0, 300.0));
        // No category keeps the nominal rect
        assert_eq!(sparkle.rect, Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(
            placed.iter().map(|p| p.z_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!((head.relative.top_pct - 140.0 / 1024.0 * 100.0).abs() < 1e-9);
    }

    // Tests measured sizes go through the rescale pass
    // Verified by ignoring the measurement
    #[test]
    fn test_align_measured() {
        let layers = layers();
        let ordered: Vec<&Layer> = layers.iter().collect();
        let Some(combination) = enumerate(&ordered, 1).pop() else {
            unreachable!("one combination expected");
        };

        let placed = align_combination(&combination, |entry| {
            (entry.trait_name == "Round").then_some((840.0, 420.0))
        });

        let [body, head, _] = placed.as_slice() else {
            unreachable!("expected three placements, found {}", placed.len());
        };
        assert_eq!(head.trait_name, "Round");
        assert!((head.rect.width - 420.0).abs() < 1e-9);
        assert!((head.rect.height - 210.0).abs() < 1e-9);
        assert!((head.rect.y - 230.0).abs() < 1e-9);
        assert_eq!(body.rect, Rect::new(232.0, 420.0, 560.0, 500.0));
    }
}
