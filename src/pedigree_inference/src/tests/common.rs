use crate::{pedigree::Pedigree, posterior::Posteriors, tables::GeneCount};

/// Build a pedigree from `(name, parents, trait)` triplets. Parents are assigned once every individual is known.
pub fn mock_pedigree(persons: &[(&str, Option<(&str, &str)>, Option<bool>)]) -> Pedigree {
    let mut pedigree = Pedigree::new();
    for (name, _, observed_trait) in persons {
        pedigree.add_person(name, None, *observed_trait).expect("Mock individuals should be unique");
    }
    for (name, parents, _) in persons {
        if let Some(parents) = parents {
            pedigree.set_parents(name, *parents).expect("Mock parents should be defined");
        }
    }
    pedigree
}

/// Two unrelated founders, no observations.
pub fn mock_founders() -> Pedigree {
    mock_pedigree(&[
        ("Alice", None, None),
        ("Bob",   None, None),
    ])
}

/// Harry (unknown) is the son of James (trait present) and Lily (trait absent).
/// Parents are defined after their offspring.
pub fn mock_family0() -> Pedigree {
    mock_pedigree(&[
        ("Harry", Some(("Lily", "James")), None),
        ("James", None, Some(true)),
        ("Lily",  None, Some(false)),
    ])
}

/// Two founders and four offspring.
pub fn mock_family1() -> Pedigree {
    mock_pedigree(&[
        ("Arthur",  None,                      Some(false)),
        ("Charlie", Some(("Molly", "Arthur")), Some(false)),
        ("Fred",    Some(("Molly", "Arthur")), Some(true)),
        ("Ginny",   Some(("Molly", "Arthur")), None),
        ("Molly",   None,                      None),
        ("Ron",     Some(("Molly", "Arthur")), None),
    ])
}

/// Four grandparents, two parents and a single grandchild.
pub fn mock_three_generations() -> Pedigree {
    mock_pedigree(&[
        ("Abraham",    None,                           Some(true)),
        ("Mona",       None,                           None),
        ("Clancy",     None,                           None),
        ("Jacqueline", None,                           Some(false)),
        ("Homer",      Some(("Mona", "Abraham")),      None),
        ("Marge",      Some(("Jacqueline", "Clancy")), None),
        ("Bart",       Some(("Marge", "Homer")),       Some(true)),
    ])
}

/// Check the posterior distributions of `name`, given expected gene probabilities (ordered as 0, 1, 2 copies)
/// and the expected probability of expressing the trait.
pub fn assert_posterior(posteriors: &Posteriors, name: &str, gene: [f64; 3], trait_present: f64, tolerance: f64) {
    let posterior = posteriors.get(name).unwrap_or_else(|| panic!("{name} should be tracked"));
    for (count, expected) in GeneCount::ALL.into_iter().zip(gene) {
        let got = posterior.gene[count];
        assert!((got - expected).abs() < tolerance, "{name}: P(gene = {count}) = {got}. Expected {expected}");
    }
    let got = posterior.phenotype.present;
    assert!((got - trait_present).abs() < tolerance, "{name}: P(trait) = {got}. Expected {trait_present}");
    let got = posterior.phenotype.absent;
    assert!((got - (1.0 - trait_present)).abs() < tolerance, "{name}: P(no trait) = {got}. Expected {}", 1.0 - trait_present);
}

/// Check that every distribution sums to one.
pub fn assert_normalized(posteriors: &Posteriors, tolerance: f64) {
    for (name, posterior) in posteriors.iter() {
        let gene: f64 = posterior.gene.iter().map(|(_, p)| p).sum();
        assert!((gene - 1.0).abs() < tolerance, "{name}: gene distribution sums to {gene}");
        let phenotype = posterior.phenotype.present + posterior.phenotype.absent;
        assert!((phenotype - 1.0).abs() < tolerance, "{name}: trait distribution sums to {phenotype}");
    }
}

/// Check that two sets of posteriors track the same individuals, with matching distributions.
pub fn assert_same_posteriors(left: &Posteriors, right: &Posteriors, tolerance: f64) {
    assert_eq!(left.len(), right.len());
    for ((name, a), (other, b)) in left.iter().zip(right.iter()) {
        assert_eq!(name, other);
        for count in GeneCount::ALL {
            assert!((a.gene[count] - b.gene[count]).abs() < tolerance, "{name}: P(gene = {count}) differs: {} vs {}", a.gene[count], b.gene[count]);
        }
        assert!((a.phenotype.present - b.phenotype.present).abs() < tolerance, "{name}: P(trait) differs");
    }
}
