use crate::model::Axis;
use crate::utils::PLACEHOLDER_VALUE;

/// Value domains of every axis, in declared order.
///
/// An axis without values contributes the single placeholder so it cannot
/// collapse the product of the others to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationEngine {
    domains: Vec<Vec<String>>,
}

impl CombinationEngine {
    pub fn new(domains: Vec<Vec<String>>) -> Self {
        let domains = domains
            .into_iter()
            .map(|domain| {
                if domain.is_empty() {
                    vec![PLACEHOLDER_VALUE.to_string()]
                } else {
                    domain
                }
            })
            .collect();
        Self { domains }
    }

    pub fn from_axes(axes: &[Axis]) -> Self {
        Self::new(axes.iter().map(|axis| axis.values.clone()).collect())
    }

    pub fn domains(&self) -> &[Vec<String>] {
        &self.domains
    }

    /// Number of tuples, `None` on overflow. Zero axes yield zero tuples.
    pub fn len(&self) -> Option<usize> {
        if self.domains.is_empty() {
            return Some(0);
        }
        self.domains
            .iter()
            .try_fold(1usize, |acc, domain| acc.checked_mul(domain.len()))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Product size as text, exact even past `usize`.
    pub fn describe_len(&self) -> String {
        match self.len() {
            Some(len) => len.to_string(),
            None => {
                let factors: Vec<String> = self.domains.iter().map(|d| d.len().to_string()).collect();
                format!("more than {} ({})", usize::MAX, factors.join(" x "))
            }
        }
    }

    /// Tuples with the first axis varying slowest.
    pub fn iter(&self) -> Combinations<'_> {
        Combinations {
            domains: &self.domains,
            cursor: vec![0; self.domains.len()],
            exhausted: self.domains.is_empty(),
        }
    }
}

impl<'a> IntoIterator for &'a CombinationEngine {
    type Item = Vec<&'a str>;
    type IntoIter = Combinations<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Odometer over the domains: the last axis turns fastest.
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    domains: &'a [Vec<String>],
    cursor: Vec<usize>,
    exhausted: bool,
}

impl<'a> Iterator for Combinations<'a> {
    type Item = Vec<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let tuple = self
            .cursor
            .iter()
            .zip(self.domains)
            .map(|(&pos, domain)| domain[pos].as_str())
            .collect();

        self.exhausted = true;
        for (pos, domain) in self.cursor.iter_mut().zip(self.domains).rev() {
            *pos += 1;
            if *pos < domain.len() {
                self.exhausted = false;
                break;
            }
            *pos = 0;
        }

        Some(tuple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(domains: &[&[&str]]) -> CombinationEngine {
        CombinationEngine::new(
            domains
                .iter()
                .map(|d| d.iter().map(|v| v.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn declared_order_outer_to_inner() {
        let engine = engine(&[&["P", "M"], &["AZUL", "VERDE"]]);
        let tuples: Vec<Vec<&str>> = engine.iter().collect();
        assert_eq!(
            tuples,
            vec![
                vec!["P", "AZUL"],
                vec!["P", "VERDE"],
                vec!["M", "AZUL"],
                vec!["M", "VERDE"],
            ]
        );
        assert_eq!(engine.len(), Some(4));
    }

    #[test]
    fn empty_domain_becomes_placeholder() {
        let engine = engine(&[&["P", "M", "G"], &[]]);
        assert_eq!(engine.len(), Some(3));
        assert_eq!(engine.domains()[1], vec![PLACEHOLDER_VALUE.to_string()]);
        assert!(engine.iter().all(|t| t[1] == PLACEHOLDER_VALUE));
    }

    #[test]
    fn n_ary_product() {
        let engine = engine(&[&["a", "b"], &["1", "2", "3"], &["x", "y"], &["z"]]);
        let tuples: Vec<_> = engine.iter().collect();
        assert_eq!(tuples.len(), 12);
        assert_eq!(tuples.first().unwrap(), &vec!["a", "1", "x", "z"]);
        assert_eq!(tuples.last().unwrap(), &vec!["b", "3", "y", "z"]);
    }

    #[test]
    fn no_axes_no_tuples() {
        let engine = CombinationEngine::new(Vec::new());
        assert!(engine.is_empty());
        assert_eq!(engine.iter().count(), 0);
    }

    #[test]
    fn overflow_is_detected() {
        let big: Vec<String> = (0..1 << 16).map(|n| n.to_string()).collect();
        let engine = CombinationEngine::new(vec![big; 5]);
        assert_eq!(engine.len(), None);
        assert!(engine.describe_len().starts_with("more than"));
    }
}
