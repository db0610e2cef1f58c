//! Tests for combination enumeration, capping strategies and rarity scoring

#[cfg(test)]
mod tests {
    use traitsheet::composition::engine::{
        CapStrategy, CombinationEngine, CombinationIter, enumerate, total_combinations,
        validate_layers,
    };
    use traitsheet::composition::layer::{Layer, Trait};
    use traitsheet::io::configuration::DEFAULT_COMBINATION_CAP;

    fn layer(name: &str, rarities: &[Option<f64>]) -> Layer {
        rarities
            .iter()
            .enumerate()
            .fold(Layer::new(name), |layer, (index, rarity)| {
                layer.with_trait(Trait::new(format!("{name}{index}"), *rarity))
            })
    }

    fn sized(name: &str, count: usize) -> Layer {
        layer(name, &vec![None; count])
    }

    // Tests the uncapped count equals the product of trait counts
    // Verified by summing trait counts instead of multiplying
    #[test]
    fn test_uncapped_count_is_product() {
        let layers = [sized("A", 2), sized("B", 3), sized("C", 2)];
        let ordered: Vec<&Layer> = layers.iter().collect();

        let combinations = enumerate(&ordered, 1000);

        assert_eq!(combinations.len(), 12);
        assert_eq!(total_combinations(&ordered), 12);
        assert!(combinations.iter().all(|c| c.len() == 3));
    }

    // Tests the cap bounds the result at min(cap, product)
    // Verified by ignoring the cap
    #[test]
    fn test_cap_applies() {
        let layers = [sized("A", 2), sized("B", 3), sized("C", 2)];
        let ordered: Vec<&Layer> = layers.iter().collect();

        assert_eq!(enumerate(&ordered, 5).len(), 5);
        assert_eq!(enumerate(&ordered, 12).len(), 12);
        assert!(enumerate(&ordered, 0).is_empty());
    }

    // Tests combinations are lexicographic with the last layer fastest
    // Verified by advancing the first layer fastest
    #[test]
    fn test_lexicographic_order() {
        let layers = [sized("A", 2), sized("B", 2)];
        let ordered: Vec<&Layer> = layers.iter().collect();

        let combinations = enumerate(&ordered, 10);
        let names: Vec<Vec<&str>> = combinations.iter().map(|c| c.trait_names()).collect();

        assert_eq!(
            names,
            vec![
                vec!["A0", "B0"],
                vec!["A0", "B1"],
                vec!["A1", "B0"],
                vec!["A1", "B1"],
            ]
        );
    }

    // Tests the rarity score is the mean of selected rarities
    // Verified by using the sum instead of the mean
    #[test]
    fn test_rarity_score_mean() {
        let layers = [
            layer("A", &[Some(50.0)]),
            layer("B", &[None]),
            layer("C", &[Some(50.0)]),
        ];
        let ordered: Vec<&Layer> = layers.iter().collect();

        let scores: Vec<f64> = enumerate(&ordered, 10)
            .iter()
            .map(|c| c.rarity_score())
            .collect();

        assert_eq!(scores.len(), 1);
        assert!(scores.iter().all(|score| (score - 200.0 / 3.0).abs() < 1e-9));
    }

    // Tests z-index follows the ordered layer position
    // Verified by numbering z-indices from 1
    #[test]
    fn test_z_index_assignment() {
        let layers = [sized("Back", 1), sized("Body", 1), sized("Head", 1)];
        let ordered: Vec<&Layer> = layers.iter().collect();

        let combinations = enumerate(&ordered, 1);
        let z: Vec<(usize, &str)> = combinations
            .iter()
            .flat_map(|c| &c.entries)
            .map(|e| (e.z_index, e.layer_name.as_str()))
            .collect();

        assert_eq!(z, vec![(0, "Back"), (1, "Body"), (2, "Head")]);
    }

    // Tests a zero-trait layer produces no combinations
    // Verified by skipping empty layers during expansion
    #[test]
    fn test_zero_trait_layer_yields_nothing() {
        let layers = [sized("A", 2), Layer::new("Empty")];
        let ordered: Vec<&Layer> = layers.iter().collect();

        assert!(enumerate(&ordered, 100).is_empty());
        assert_eq!(total_combinations(&ordered), 0);
        assert!(validate_layers(&ordered).is_err());
        assert!(validate_layers(ordered.get(..1).unwrap_or_default()).is_ok());
    }

    // Tests an empty layer list yields a single empty combination
    // Verified by returning no combinations for no layers
    #[test]
    fn test_no_layers() {
        let combinations = enumerate(&[], 10);

        let [only] = combinations.as_slice() else {
            unreachable!("expected one combination, found {}", combinations.len());
        };
        assert!(only.is_empty());
        assert!(only.rarity_score().abs() < f64::EPSILON);
    }

    // Tests the product saturates instead of overflowing
    // Verified by using wrapping multiplication
    #[test]
    fn test_total_saturates() {
        let layers: Vec<Layer> = (0..20).map(|i| sized(&format!("L{i}"), 10)).collect();
        let ordered: Vec<&Layer> = layers.iter().collect();

        assert_eq!(total_combinations(&ordered), u64::MAX);
        assert_eq!(CombinationIter::new(&ordered).take(3).count(), 3);
        assert_eq!(enumerate(&ordered, 7).len(), 7);
    }

    // Tests reservoir sampling is seeded, capped and keeps enumeration order
    // Verified by returning the reservoir in replacement order
    #[test]
    fn test_reservoir_sampling() {
        let layers = [sized("A", 6), sized("B", 5), sized("C", 4)];
        let ordered: Vec<&Layer> = layers.iter().collect();
        let engine = CombinationEngine::new(10).with_strategy(CapStrategy::Reservoir { seed: 7 });

        let first = engine.enumerate(&ordered);
        let second = engine.enumerate(&ordered);
        let all = enumerate(&ordered, 1000);

        assert_eq!(first.len(), 10);
        assert_eq!(first, second);

        let positions: Vec<usize> = first
            .iter()
            .filter_map(|c| all.iter().position(|candidate| candidate == c))
            .collect();
        assert_eq!(positions.len(), 10);
        assert!(positions.is_sorted());
        assert_ne!(first.as_slice(), all.get(..10).unwrap_or_default());
    }

    // Tests reservoir sampling returns everything when under the cap
    // Verified by always drawing exactly cap items
    #[test]
    fn test_reservoir_under_cap() {
        let layers = [sized("A", 2), sized("B", 2)];
        let ordered: Vec<&Layer> = layers.iter().collect();
        let engine = CombinationEngine::new(50).with_strategy(CapStrategy::Reservoir { seed: 1 });

        assert_eq!(engine.enumerate(&ordered), enumerate(&ordered, 50));
    }

    // Tests engine defaults
    // Verified by defaulting to reservoir sampling
    #[test]
    fn test_engine_defaults() {
        let engine = CombinationEngine::default();

        assert_eq!(engine.cap(), DEFAULT_COMBINATION_CAP);
        assert_eq!(engine.strategy(), CapStrategy::Prefix);
    }
}
