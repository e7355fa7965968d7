use crate::command::{Command, Input};
use crate::database::Database;
use crate::model::Nullable;
use std::future::Future;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, warn};

pub const INVALID_ENTRY: &str = "Invalid Entry. Try again.";

/// Why the shell stopped reading commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Exit {
    Quit,
    EndOfInput,
    Interrupted,
}

pub struct Shell<R, W> {
    lines: Lines<R>,
    out: W,
    prompt: String,
}

impl<R: AsyncBufRead + Unpin, W: Write> Shell<R, W> {
    pub fn new(input: R, out: W, prompt: &str) -> Self {
        Self {
            lines: input.lines(),
            out,
            prompt: prompt.to_owned(),
        }
    }

    /// Prompt for and execute commands until `quit`, end of input or
    /// completion of `interrupt`. Only I/O errors on the terminal end the
    /// loop with an error. If `interrupt` fails, interrupts are ignored.
    pub async fn run(
        &mut self,
        db: &mut Database,
        interrupt: impl Future<Output = io::Result<()>>,
    ) -> io::Result<Exit> {
        tokio::pin!(interrupt);
        let mut listening = true;
        loop {
            write!(self.out, "{}", self.prompt)?;
            self.out.flush()?;
            let line = tokio::select! {
                line = self.lines.next_line() => line?,
                result = &mut interrupt, if listening => match result {
                    Ok(()) => {
                        writeln!(self.out)?;
                        return Ok(Exit::Interrupted);
                    }
                    Err(e) => {
                        warn!(error = %e, "cannot listen for interrupts");
                        listening = false;
                        continue;
                    }
                },
            };
            let Some(line) = line else {
                writeln!(self.out)?;
                return Ok(Exit::EndOfInput);
            };
            match Input::parse(&line) {
                Ok(Input::Blank) => {}
                Ok(Input::Quit) => return Ok(Exit::Quit),
                Ok(Input::Command(command)) => {
                    let message = execute(db, command).await;
                    writeln!(self.out, "{message}")?;
                }
                Err(e) => {
                    debug!(error = %e, %line, "invalid entry");
                    writeln!(self.out, "{INVALID_ENTRY}")?;
                }
            }
        }
    }
}

/// Run a command and describe its outcome, failures included.
async fn execute(db: &mut Database, command: Command) -> String {
    let result = match command {
        Command::GetStudent { github } => db.student(&github).await.map(|s| s.to_string()),
        Command::NewStudent(student) => db.add_student(&student).await.map(|()| {
            format!(
                "Successfully added student: {} {}",
                student.first_name, student.last_name
            )
        }),
        Command::ProjectTitle { title } => db.project(&title).await.map(|p| p.to_string()),
        Command::GetGrade { github, title } => {
            db.grade(&github, &title).await.map(|g| g.to_string())
        }
        Command::AssignGrade(grade) => db.assign_grade(&grade).await.map(|()| {
            format!(
                "Successfully assigned grade {} to {} for project {}",
                Nullable(&grade.grade),
                grade.student_github,
                grade.project_title
            )
        }),
        Command::AddProject(project) => db.add_project(&project).await.map(|()| {
            format!(
                "Successfully added project {} ({}) with max grade {}",
                project.title,
                Nullable(&project.description),
                Nullable(&project.max_grade)
            )
        }),
    };
    result.unwrap_or_else(|e| e.to_string())
}
