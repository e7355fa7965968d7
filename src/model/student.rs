use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Student {
    pub first_name: String,
    pub last_name: String,
    pub github: String,
}

impl Student {
    pub fn new(first_name: &str, last_name: &str, github: &str) -> Self {
        Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            github: github.to_owned(),
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Student: {} {}\nGitHub account: {}",
            self.first_name, self.last_name, self.github
        )
    }
}

#[test]
fn test_display() {
    let s = Student::new("Ada", "Lovelace", "ada123");
    assert_eq!(s.to_string(), "Student: Ada Lovelace\nGitHub account: ada123");
}
