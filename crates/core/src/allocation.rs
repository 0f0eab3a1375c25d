//! Subtopic planning and expected-hours allocation for new skills.
//!
//! A skill's subtopic list is the caller's own topics (cleaned, in the order
//! given) followed by the oracle's suggestions. Every subtopic receives the
//! same share of the skill's target hours, rounded to one decimal place.

use serde::{Deserialize, Serialize};

/// A caller-supplied subtopic as received at skill creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubtopicInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A subtopic ready to be persisted alongside its skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedSubtopic {
    pub title: String,
    pub description: String,
    pub order_index: i32,
    pub expected_hours: f64,
}

/// Round to one decimal place, halves away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Uniform per-subtopic share of `target_hours`.
///
/// Returns `0.0` when there are no subtopics.
pub fn expected_hours_per_subtopic(target_hours: f64, subtopic_count: usize) -> f64 {
    if subtopic_count == 0 {
        return 0.0;
    }
    round_to_tenth(target_hours / subtopic_count as f64)
}

/// Trim user topics and drop those whose title is blank.
fn clean_user_subtopics(inputs: &[SubtopicInput]) -> Vec<(String, String)> {
    inputs
        .iter()
        .filter_map(|input| {
            let title = input.title.as_deref().unwrap_or_default().trim();
            if title.is_empty() {
                return None;
            }
            let description = input.description.as_deref().unwrap_or_default().trim();
            Some((title.to_string(), description.to_string()))
        })
        .collect()
}

/// Build the final ordered subtopic plan for a new skill.
///
/// User topics come first, then suggestions (with empty descriptions).
/// `order_index` runs from 0 over the merged list and every entry gets the
/// same `expected_hours`.
pub fn plan_subtopics(
    target_hours: f64,
    user_subtopics: &[SubtopicInput],
    suggestions: Vec<String>,
) -> Vec<PlannedSubtopic> {
    let merged: Vec<(String, String)> = clean_user_subtopics(user_subtopics)
        .into_iter()
        .chain(suggestions.into_iter().map(|title| (title, String::new())))
        .collect();

    let share = expected_hours_per_subtopic(target_hours, merged.len());

    merged
        .into_iter()
        .enumerate()
        .map(|(index, (title, description))| PlannedSubtopic {
            title,
            description,
            order_index: index as i32,
            expected_hours: share,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(title: &str, description: &str) -> SubtopicInput {
        SubtopicInput {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
        }
    }

    fn suggestions(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Suggested {i}")).collect()
    }

    #[test]
    fn ten_hours_over_nine_subtopics() {
        let plan = plan_subtopics(10.0, &[user("A", ""), user("B", "")], suggestions(7));
        assert_eq!(plan.len(), 9);
        assert!(plan.iter().all(|s| s.expected_hours == 1.1));
    }

    #[test]
    fn user_topics_precede_suggestions_with_sequential_indices() {
        let plan = plan_subtopics(
            6.0,
            &[user("  Ownership ", " borrow rules "), user("Traits", "")],
            vec!["Intro".into(), "Projects".into()],
        );
        let titles: Vec<&str> = plan.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Ownership", "Traits", "Intro", "Projects"]);
        assert_eq!(plan[0].description, "borrow rules");
        assert_eq!(plan[2].description, "");
        let indices: Vec<i32> = plan.iter().map(|s| s.order_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn blank_and_missing_titles_are_dropped() {
        let inputs = vec![
            user("   ", "ignored"),
            SubtopicInput::default(),
            user("Kept", ""),
        ];
        let plan = plan_subtopics(3.0, &inputs, Vec::new());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].title, "Kept");
        assert_eq!(plan[0].order_index, 0);
        assert_eq!(plan[0].expected_hours, 3.0);
    }

    #[test]
    fn no_subtopics_means_no_allocation() {
        assert!(plan_subtopics(12.0, &[], Vec::new()).is_empty());
        assert_eq!(expected_hours_per_subtopic(12.0, 0), 0.0);
    }

    #[test]
    fn allocation_sum_stays_within_rounding_bound() {
        for target in [0.0, 1.0, 7.5, 10.0, 13.3, 40.0, 99.9] {
            for n in 1..=15usize {
                let share = expected_hours_per_subtopic(target, n);
                let sum = share * n as f64;
                assert!(
                    (sum - target).abs() <= 0.1 * n as f64 + 1e-9,
                    "target={target} n={n} sum={sum}"
                );
            }
        }
    }

    #[test]
    fn rounding_is_to_one_decimal() {
        assert_eq!(round_to_tenth(1.111), 1.1);
        assert_eq!(round_to_tenth(0.25), 0.3);
        assert_eq!(round_to_tenth(2.0 / 3.0), 0.7);
    }
}
