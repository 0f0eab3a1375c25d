//! Category and subtopic-suggestion oracle.
//!
//! Skill creation consults a [`SkillOracle`] once to label the skill with a
//! category and to obtain suggested subtopic titles. The default
//! [`KeywordOracle`] is a static keyword table; anything implementing the
//! trait (for example an ML-backed classifier) can be substituted without
//! touching the engine.

/// Category assigned when no keyword matches.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Pure categorization / suggestion capability consumed by skill creation.
pub trait SkillOracle: Send + Sync {
    /// Return the category label for a skill.
    fn categorize(&self, name: &str, description: &str) -> String;

    /// Return suggested subtopic titles, in presentation order.
    fn suggest_subtopics(&self, name: &str, category: &str) -> Vec<String>;
}

/* --------------------------------------------------------------------------
Keyword tables
-------------------------------------------------------------------------- */

/// Category -> keywords. Declaration order is match priority.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Web Development",
        &[
            "react", "javascript", "html", "css", "node", "vue", "angular", "frontend",
            "backend", "web",
        ],
    ),
    (
        "Data Science",
        &[
            "python",
            "machine learning",
            "data analysis",
            "pandas",
            "numpy",
            "statistics",
            "ai",
            "artificial intelligence",
        ],
    ),
    (
        "Mobile Development",
        &[
            "android",
            "ios",
            "flutter",
            "react native",
            "mobile",
            "swift",
            "kotlin",
        ],
    ),
    (
        "Cloud Computing",
        &["aws", "azure", "google cloud", "docker", "kubernetes", "cloud"],
    ),
    (
        "Programming",
        &[
            "java",
            "c++",
            "c#",
            "programming",
            "algorithm",
            "data structure",
            "coding",
        ],
    ),
    ("Design", &["ui", "ux", "figma", "adobe", "design", "photoshop"]),
    (
        "Business",
        &["marketing", "management", "finance", "business", "entrepreneurship"],
    ),
    ("Language", &["english", "spanish", "language", "communication"]),
];

/// Category -> suggested subtopic titles.
const CATEGORY_SUGGESTIONS: &[(&str, &[&str])] = &[
    (
        "Web Development",
        &[
            "Introduction and Setup",
            "Basic Concepts and Syntax",
            "Components and Props",
            "State Management",
            "Routing and Navigation",
            "API Integration",
            "Testing and Debugging",
            "Deployment",
        ],
    ),
    (
        "Data Science",
        &[
            "Introduction to Concepts",
            "Data Preprocessing",
            "Exploratory Data Analysis",
            "Machine Learning Algorithms",
            "Model Evaluation",
            "Data Visualization",
            "Real-world Projects",
        ],
    ),
    (
        "Programming",
        &[
            "Basic Syntax and Setup",
            "Data Types and Variables",
            "Control Structures",
            "Functions and Methods",
            "Object-Oriented Programming",
            "Error Handling",
            "Advanced Topics and Best Practices",
        ],
    ),
    (
        "Mobile Development",
        &[
            "Environment Setup",
            "UI Components and Layouts",
            "Navigation and Routing",
            "State Management",
            "API Integration",
            "Device Features Access",
            "Testing and Publishing",
        ],
    ),
];

/// Suggestions for categories without a dedicated list.
const GENERIC_SUGGESTIONS: &[&str] = &[
    "Introduction and Overview",
    "Basic Concepts",
    "Intermediate Topics",
    "Advanced Concepts",
    "Practical Projects",
    "Best Practices and Optimization",
];

/* --------------------------------------------------------------------------
Default implementation
-------------------------------------------------------------------------- */

/// Static keyword-table oracle.
///
/// Matching is a case-insensitive substring search over
/// `"{name} {description}"`; the first category (in table order) with any
/// matching keyword wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordOracle;

impl SkillOracle for KeywordOracle {
    fn categorize(&self, name: &str, description: &str) -> String {
        let text = format!("{name} {description}").to_lowercase();

        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
            .map(|(category, _)| (*category).to_string())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
    }

    fn suggest_subtopics(&self, _name: &str, category: &str) -> Vec<String> {
        let titles = CATEGORY_SUGGESTIONS
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, titles)| *titles)
            .unwrap_or(GENERIC_SUGGESTIONS);

        titles.iter().map(|t| (*t).to_string()).collect()
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorizes_by_first_matching_category() {
        let oracle = KeywordOracle;
        assert_eq!(oracle.categorize("React Basics", ""), "Web Development");
        assert_eq!(oracle.categorize("Rust Programming", ""), "Programming");
        assert_eq!(oracle.categorize("Figma", "prototyping"), "Design");
    }

    #[test]
    fn table_order_breaks_ties() {
        // "python" (Data Science) and "web" (Web Development) both match;
        // Web Development is declared first.
        let oracle = KeywordOracle;
        assert_eq!(oracle.categorize("Python web apps", ""), "Web Development");
    }

    #[test]
    fn description_participates_in_matching() {
        let oracle = KeywordOracle;
        assert_eq!(
            oracle.categorize("Weekend course", "deploying with docker"),
            "Cloud Computing"
        );
    }

    #[test]
    fn unknown_skill_falls_back_to_other() {
        let oracle = KeywordOracle;
        assert_eq!(oracle.categorize("Woodworking", "chisels"), DEFAULT_CATEGORY);
    }

    #[test]
    fn programming_has_seven_suggestions() {
        let titles = KeywordOracle.suggest_subtopics("Rust", "Programming");
        assert_eq!(titles.len(), 7);
        assert_eq!(titles[0], "Basic Syntax and Setup");
    }

    #[test]
    fn unknown_category_gets_generic_six() {
        let titles = KeywordOracle.suggest_subtopics("Woodworking", "Other");
        assert_eq!(titles.len(), 6);
        assert_eq!(titles[5], "Best Practices and Optimization");
    }
}
