use std::fmt;

pub use self::grade::Grade;
pub use self::project::Project;
pub use self::student::Student;

mod grade;
mod project;
mod student;

/// Displays a nullable column, with `-` standing for NULL.
pub struct Nullable<'a, T>(pub &'a Option<T>);

impl<T: fmt::Display> fmt::Display for Nullable<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("-"),
        }
    }
}

#[test]
fn test_nullable() {
    assert_eq!(Nullable(&Some(42)).to_string(), "42");
    assert_eq!(Nullable::<i64>(&None).to_string(), "-");
    assert_eq!(Nullable(&Some(String::new())).to_string(), "");
}
