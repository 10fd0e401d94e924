//! Result grouping and report output

pub mod json;

use crate::models::{Category, CorsResult};

/// Groups vulnerable results by category, in `Category::ALL` order.
///
/// Results without a category are dropped. Empty buckets are kept.
pub fn group_by_category(results: &[CorsResult]) -> Vec<(Category, Vec<CorsResult>)> {
    Category::ALL
        .iter()
        .map(|category| {
            let bucket = results
                .iter()
                .filter(|r| r.vulnerable && r.category == Some(*category))
                .cloned()
                .collect();
            (*category, bucket)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CorsConfig;

    fn result(url: &str, category: Category) -> CorsResult {
        CorsResult::vulnerable(url, 200, CorsConfig::default(), category)
    }

    #[test]
    fn test_group_by_category() {
        let results = vec![
            result("https://a.test", Category::Wildcard),
            result("https://b.test", Category::DifferentDomain),
            result("https://c.test", Category::Wildcard),
            CorsResult::safe("https://d.test", 200, CorsConfig::default()),
        ];

        let groups = group_by_category(&results);
        let counts: Vec<_> = groups.iter().map(|(c, r)| (*c, r.len())).collect();
        assert_eq!(
            counts,
            vec![
                (Category::NullOrigin, 0),
                (Category::Wildcard, 2),
                (Category::SameDomain, 0),
                (Category::DifferentDomain, 1),
            ]
        );
    }
}
