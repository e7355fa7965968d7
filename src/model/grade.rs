use super::Nullable;
use std::fmt;

/// A grade received by a student on a project. Nothing guarantees that
/// the referenced student or project exists.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grade {
    pub student_github: String,
    pub project_title: String,
    pub grade: Option<i64>,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}'s grade for the {} project is {}",
            self.student_github,
            self.project_title,
            Nullable(&self.grade)
        )
    }
}

#[test]
fn test_display() {
    let mut g = Grade {
        student_github: "jhacks".into(),
        project_title: "Blog".into(),
        grade: Some(10),
    };
    assert_eq!(g.to_string(), "jhacks's grade for the Blog project is 10");
    g.grade = None;
    assert_eq!(g.to_string(), "jhacks's grade for the Blog project is -");
}
