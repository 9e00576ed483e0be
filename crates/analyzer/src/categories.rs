//! Keyword-based technology categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad technology area inferred from a repository description
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Frontend,
    Backend,
    Mobile,
    Devops,
    Data,
    Cloud,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Frontend,
        Category::Backend,
        Category::Mobile,
        Category::Devops,
        Category::Data,
        Category::Cloud,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Frontend => "frontend",
            Category::Backend => "backend",
            Category::Mobile => "mobile",
            Category::Devops => "devops",
            Category::Data => "data",
            Category::Cloud => "cloud",
        }
    }

    /// Lowercase substrings that place a description in this category
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Frontend => &["react", "vue", "angular", "svelte", "next.js", "nuxt"],
            Category::Backend => &["django", "flask", "fastapi", "express", "nest.js", "spring"],
            Category::Mobile => &["react native", "flutter", "swift", "kotlin", "ionic"],
            Category::Devops => &["docker", "kubernetes", "k8s", "terraform", "ansible", "ci/cd"],
            Category::Data => &["pandas", "numpy", "tensorflow", "pytorch", "spark", "airflow"],
            Category::Cloud => &["aws", "azure", "gcp", "cloud", "serverless", "lambda"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories whose keywords occur in `description`, case-insensitively
///
/// Plain substring matching: "spark" also matches "sparkle".
pub fn categorize(description: &str) -> Vec<Category> {
    let lower = description.to_lowercase();
    Category::ALL
        .into_iter()
        .filter(|c| c.keywords().iter().any(|k| lower.contains(k)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_description_has_no_categories() {
        assert!(categorize("").is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(categorize("A Terraform module"), vec![Category::Devops]);
    }

    #[test]
    fn multiple_categories_in_fixed_order() {
        let cats = categorize("Serverless FastAPI app with a React frontend on AWS");
        assert_eq!(
            cats,
            vec![Category::Frontend, Category::Backend, Category::Cloud]
        );
    }

    #[test]
    fn react_native_is_frontend_and_mobile() {
        let cats = categorize("React Native starter");
        assert_eq!(cats, vec![Category::Frontend, Category::Mobile]);
    }
}
