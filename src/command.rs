use crate::model::{Grade, Project, Student};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    Any,
}

impl Arity {
    fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Exactly(expected) => n == expected,
            Arity::AtLeast(min) => n >= min,
            Arity::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
            Arity::Any => write!(f, "any number of"),
        }
    }
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum InvalidCommand {
    #[error("unknown command {0}")]
    Unknown(String),
    #[error("{command} takes {expected} arguments, {got} given")]
    Arity {
        command: &'static str,
        expected: Arity,
        got: usize,
    },
    #[error("{0} is not a number")]
    Number(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    GetStudent { github: String },
    NewStudent(Student),
    ProjectTitle { title: String },
    GetGrade { github: String, title: String },
    AssignGrade(Grade),
    AddProject(Project),
}

/// One line of operator input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Input {
    Blank,
    Quit,
    Command(Command),
}

struct Descriptor {
    name: &'static str,
    arity: Arity,
    /// Only called with an argument count accepted by `arity`.
    build: fn(&[&str]) -> Result<Input, InvalidCommand>,
}

const COMMANDS: &[Descriptor] = &[
    Descriptor {
        name: "get_student",
        arity: Arity::Exactly(1),
        build: |args| {
            Ok(Input::Command(Command::GetStudent {
                github: args[0].to_owned(),
            }))
        },
    },
    Descriptor {
        name: "new_student",
        arity: Arity::Exactly(3),
        build: |args| {
            Ok(Input::Command(Command::NewStudent(Student::new(
                args[0], args[1], args[2],
            ))))
        },
    },
    Descriptor {
        name: "project_title",
        arity: Arity::Exactly(1),
        build: |args| {
            Ok(Input::Command(Command::ProjectTitle {
                title: args[0].to_owned(),
            }))
        },
    },
    Descriptor {
        name: "get_grade",
        arity: Arity::Exactly(2),
        build: |args| {
            Ok(Input::Command(Command::GetGrade {
                github: args[0].to_owned(),
                title: args[1].to_owned(),
            }))
        },
    },
    Descriptor {
        name: "assign_grade",
        arity: Arity::Exactly(3),
        build: |args| {
            Ok(Input::Command(Command::AssignGrade(Grade {
                student_github: args[0].to_owned(),
                project_title: args[1].to_owned(),
                grade: Some(number(args[2])?),
            })))
        },
    },
    Descriptor {
        name: "add_project",
        arity: Arity::AtLeast(2),
        build: |args| {
            let last = args.len() - 1;
            Ok(Input::Command(Command::AddProject(Project {
                title: args[0].to_owned(),
                description: Some(args[1..last].join(" ")),
                max_grade: Some(number(args[last])?),
            })))
        },
    },
    Descriptor {
        name: "quit",
        arity: Arity::Any,
        build: |_| Ok(Input::Quit),
    },
];

fn number(token: &str) -> Result<i64, InvalidCommand> {
    token
        .parse()
        .map_err(|_| InvalidCommand::Number(token.to_owned()))
}

impl Input {
    /// Split a line on whitespace and map its first token to a command,
    /// checking the argument count before anything else.
    pub fn parse(line: &str) -> Result<Input, InvalidCommand> {
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        let Some((&name, args)) = tokens.split_first() else {
            return Ok(Input::Blank);
        };
        let descriptor = COMMANDS
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| InvalidCommand::Unknown(name.to_owned()))?;
        if !descriptor.arity.accepts(args.len()) {
            return Err(InvalidCommand::Arity {
                command: descriptor.name,
                expected: descriptor.arity,
                got: args.len(),
            });
        }
        (descriptor.build)(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(line: &str) -> Command {
        match Input::parse(line) {
            Ok(Input::Command(command)) => command,
            other => panic!("{line:?} parsed as {other:?}"),
        }
    }

    #[test]
    fn test_lookups() {
        assert_eq!(
            command("get_student ada123"),
            Command::GetStudent {
                github: "ada123".into()
            }
        );
        assert_eq!(
            command("  project_title\tHW1  "),
            Command::ProjectTitle { title: "HW1".into() }
        );
        assert_eq!(
            command("get_grade ada123 HW1"),
            Command::GetGrade {
                github: "ada123".into(),
                title: "HW1".into()
            }
        );
    }

    #[test]
    fn test_writes() {
        assert_eq!(
            command("new_student Ada Lovelace ada123"),
            Command::NewStudent(Student::new("Ada", "Lovelace", "ada123"))
        );
        assert_eq!(
            command("assign_grade ada123 HW1 95"),
            Command::AssignGrade(Grade {
                student_github: "ada123".into(),
                project_title: "HW1".into(),
                grade: Some(95),
            })
        );
    }

    #[test]
    fn test_add_project_description() {
        assert_eq!(
            command("add_project HW1   Intro  to SQL 100"),
            Command::AddProject(Project {
                title: "HW1".into(),
                description: Some("Intro to SQL".into()),
                max_grade: Some(100),
            })
        );
        assert_eq!(
            command("add_project HW2 50"),
            Command::AddProject(Project {
                title: "HW2".into(),
                description: Some(String::new()),
                max_grade: Some(50),
            })
        );
    }

    #[test]
    fn test_quit() {
        assert_eq!(Input::parse("quit"), Ok(Input::Quit));
        assert_eq!(Input::parse("quit now please"), Ok(Input::Quit));
        assert_eq!(
            Input::parse("QUIT"),
            Err(InvalidCommand::Unknown("QUIT".into()))
        );
    }

    #[test]
    fn test_blank() {
        assert_eq!(Input::parse(""), Ok(Input::Blank));
        assert_eq!(Input::parse(" \t "), Ok(Input::Blank));
    }

    #[test]
    fn test_invalid() {
        assert_eq!(
            Input::parse("drop_tables"),
            Err(InvalidCommand::Unknown("drop_tables".into()))
        );
        assert_eq!(
            Input::parse("new_student Ada Lovelace"),
            Err(InvalidCommand::Arity {
                command: "new_student",
                expected: Arity::Exactly(3),
                got: 2,
            })
        );
        assert!(Input::parse("new_student Ada Byron Lovelace ada123").is_err());
        assert!(Input::parse("get_student").is_err());
        assert!(Input::parse("get_grade ada123").is_err());
        assert!(Input::parse("add_project HW1").is_err());
        assert_eq!(
            Input::parse("assign_grade ada123 HW1 A+"),
            Err(InvalidCommand::Number("A+".into()))
        );
        assert_eq!(
            Input::parse("add_project HW1 Intro to SQL lots"),
            Err(InvalidCommand::Number("lots".into()))
        );
    }

    #[test]
    fn test_error_messages() {
        let e = Input::parse("add_project").unwrap_err();
        assert_eq!(e.to_string(), "add_project takes at least 2 arguments, 0 given");
    }
}
