//! Built-in course catalogue: computer science courses and their prerequisites.

use crate::graph::DependencyGraph;

const COURSES: &[(&str, &[&str])] = &[
    ("algorithms", &["data structures"]),
    ("calculus", &["linear algebra"]),
    (
        "compilers",
        &["data structures", "formal languages", "computer organization"],
    ),
    ("data structures", &["discrete math"]),
    ("databases", &["data structures"]),
    ("discrete math", &["intro to programming"]),
    ("formal languages", &["discrete math"]),
    ("networks", &["operating systems"]),
    ("operating systems", &["data structures", "computer organization"]),
    (
        "programming languages",
        &["data structures", "computer organization"],
    ),
];

/// The course prerequisite table.
pub fn course_prerequisites() -> DependencyGraph<String> {
    COURSES
        .iter()
        .map(|(course, prereqs)| {
            (
                course.to_string(),
                prereqs.iter().map(|p| p.to_string()).collect(),
            )
        })
        .collect()
}
