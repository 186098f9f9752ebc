//! Set operations over comma-separated tokens

use serde::Serialize;
use std::collections::BTreeSet;

/// Token set; `BTreeSet` keeps rendered output sorted
pub type TokenSet = BTreeSet<String>;

/// Split on commas, trim, drop empty entries and collapse duplicates
pub fn parse_set(input: &str) -> TokenSet {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sorted, comma-joined rendering
pub fn render(set: &TokenSet) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Every derived set and relation for a pair A, B
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetAlgebra {
    pub a: TokenSet,
    pub b: TokenSet,
    pub union: TokenSet,
    pub intersection: TokenSet,
    pub a_minus_b: TokenSet,
    pub b_minus_a: TokenSet,
    pub symmetric_difference: TokenSet,
    pub a_subset_of_b: bool,
    pub b_subset_of_a: bool,
    pub disjoint: bool,
}

impl SetAlgebra {
    pub fn new(a: TokenSet, b: TokenSet) -> Self {
        let union = a.union(&b).cloned().collect();
        let intersection = a.intersection(&b).cloned().collect();
        let a_minus_b = a.difference(&b).cloned().collect();
        let b_minus_a = b.difference(&a).cloned().collect();
        let symmetric_difference = a.symmetric_difference(&b).cloned().collect();
        Self {
            a_subset_of_b: a.is_subset(&b),
            b_subset_of_a: b.is_subset(&a),
            disjoint: a.is_disjoint(&b),
            a,
            b,
            union,
            intersection,
            a_minus_b,
            b_minus_a,
            symmetric_difference,
        }
    }

    /// Parse both operands from free text
    pub fn from_text(a: &str, b: &str) -> Self {
        Self::new(parse_set(a), parse_set(b))
    }

    /// Partition for a two-circle Venn diagram
    pub fn venn(&self) -> VennRegions {
        VennRegions {
            only_a: self.a_minus_b.clone(),
            both: self.intersection.clone(),
            only_b: self.b_minus_a.clone(),
        }
    }
}

/// Tokens placed in each Venn region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VennRegions {
    pub only_a: TokenSet,
    pub both: TokenSet,
    pub only_b: TokenSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        let set = parse_set(" b, a , ,b,c,");
        assert_eq!(render(&set), "a, b, c");
        assert!(parse_set("  ,  ").is_empty());
    }

    #[test]
    fn test_operations() {
        let algebra = SetAlgebra::from_text("1, 2, 3, 4", "3, 4, 5");
        assert_eq!(render(&algebra.union), "1, 2, 3, 4, 5");
        assert_eq!(render(&algebra.intersection), "3, 4");
        assert_eq!(render(&algebra.a_minus_b), "1, 2");
        assert_eq!(render(&algebra.b_minus_a), "5");
        assert_eq!(render(&algebra.symmetric_difference), "1, 2, 5");
        assert!(!algebra.disjoint);
        assert!(!algebra.a_subset_of_b);
    }

    #[test]
    fn test_inclusion_exclusion() {
        let algebra = SetAlgebra::from_text("x, y, z, w", "z, w, v");
        assert_eq!(
            algebra.union.len(),
            algebra.a.len() + algebra.b.len() - algebra.intersection.len()
        );
        // A = (A \ B) ∪ (A ∩ B), with no overlap
        assert!(algebra.a_minus_b.is_disjoint(&algebra.intersection));
        let rebuilt: TokenSet = algebra
            .a_minus_b
            .union(&algebra.intersection)
            .cloned()
            .collect();
        assert_eq!(rebuilt, algebra.a);
    }

    #[test]
    fn test_venn_and_subset() {
        let algebra = SetAlgebra::from_text("a, b", "a, b, c");
        assert!(algebra.a_subset_of_b);
        let venn = algebra.venn();
        assert!(venn.only_a.is_empty());
        assert_eq!(render(&venn.both), "a, b");
        assert_eq!(render(&venn.only_b), "c");
    }
}
