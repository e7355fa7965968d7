use super::Nullable;
use std::fmt;

/// A class project. `description` and `max_grade` may be NULL in the
/// database.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    pub title: String,
    pub description: Option<String>,
    pub max_grade: Option<i64>,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Project: {}\nDescription: {}\nMax grade: {}",
            self.title,
            Nullable(&self.description),
            Nullable(&self.max_grade)
        )
    }
}

#[test]
fn test_display() {
    let p = Project {
        title: "HW1".into(),
        description: Some("Intro to SQL".into()),
        max_grade: Some(100),
    };
    assert_eq!(
        p.to_string(),
        "Project: HW1\nDescription: Intro to SQL\nMax grade: 100"
    );
    let p = Project {
        description: Some(String::new()),
        ..p
    };
    assert!(p.to_string().contains("Description: \n"));
    let p = Project {
        description: None,
        max_grade: None,
        ..p
    };
    assert_eq!(p.to_string(), "Project: HW1\nDescription: -\nMax grade: -");
}
