use crate::model::{Grade, Project, Student};
use sqlx::any::{AnyArguments, AnyConnectOptions, AnyRow, install_default_drivers};
use sqlx::query::Query;
use sqlx::{Any, AnyConnection, Connection, Row};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tracing::{info, trace, warn};

const SELECT_STUDENT: &str =
    "SELECT first_name, last_name, github FROM students WHERE github = $1";
const INSERT_STUDENT: &str =
    "INSERT INTO students (first_name, last_name, github) VALUES ($1, $2, $3)";
const SELECT_PROJECT: &str =
    "SELECT title, description, max_grade FROM projects WHERE title = $1";
const INSERT_PROJECT: &str =
    "INSERT INTO projects (title, description, max_grade) VALUES ($1, $2, $3)";
const SELECT_GRADE: &str = "SELECT student_github, project_title, grade FROM grades \
                            WHERE student_github = $1 AND project_title = $2";
const INSERT_GRADE: &str =
    "INSERT INTO grades (student_github, project_title, grade) VALUES ($1, $2, $3)";

/// What a lookup was looking for when it came back empty.
#[derive(Debug, Eq, PartialEq)]
pub enum Missing {
    Student(String),
    Project(String),
    Grade { github: String, title: String },
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Missing::Student(github) => write!(f, "No student with GitHub account {github}"),
            Missing::Project(title) => write!(f, "No project titled {title}"),
            Missing::Grade { github, title } => {
                write!(f, "No grade for {github} on project {title}")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    NotFound(Missing),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Placeholder syntax understood by the connected backend. Statements are
/// written with `$n` placeholders, always numbered in binding order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Placeholders {
    Dollar,
    QuestionMark,
}

impl Placeholders {
    fn for_backend(backend: &str) -> Self {
        if backend == "PostgreSQL" {
            Placeholders::Dollar
        } else {
            Placeholders::QuestionMark
        }
    }

    fn render(self, template: &str) -> Cow<'_, str> {
        match self {
            Placeholders::Dollar => Cow::Borrowed(template),
            Placeholders::QuestionMark => {
                let mut sql = String::with_capacity(template.len());
                let mut chars = template.chars().peekable();
                while let Some(c) = chars.next() {
                    if c == '$' && chars.peek().is_some_and(char::is_ascii_digit) {
                        while chars.peek().is_some_and(char::is_ascii_digit) {
                            chars.next();
                        }
                        sql.push('?');
                    } else {
                        sql.push(c);
                    }
                }
                Cow::Owned(sql)
            }
        }
    }
}

/// The single connection used by the whole session.
///
/// Lookups return the first matching row in whatever order the backend
/// produces it. Nothing prevents duplicate grades for the same student and
/// project, in which case which one is returned is unspecified.
pub struct Database {
    conn: AnyConnection,
    placeholders: Placeholders,
}

impl Database {
    pub async fn connect(url: &str) -> Result<Self, Error> {
        install_default_drivers();
        let conn = AnyConnection::connect_with(&AnyConnectOptions::from_str(url)?).await?;
        let placeholders = Placeholders::for_backend(conn.backend_name());
        info!(backend = conn.backend_name(), "connected to database");
        Ok(Self { conn, placeholders })
    }

    pub async fn close(self) -> Result<(), Error> {
        self.conn.close().await?;
        info!("database connection closed");
        Ok(())
    }

    pub async fn student(&mut self, github: &str) -> Result<Student, Error> {
        let sql = self.placeholders.render(SELECT_STUDENT);
        trace!(%sql, github, "looking up student");
        sqlx::query(&sql)
            .bind(github)
            .try_map(|row: AnyRow| {
                Ok(Student {
                    first_name: row.try_get("first_name")?,
                    last_name: row.try_get("last_name")?,
                    github: row.try_get("github")?,
                })
            })
            .fetch_optional(&mut self.conn)
            .await?
            .ok_or_else(|| Error::NotFound(Missing::Student(github.to_owned())))
    }

    pub async fn add_student(&mut self, student: &Student) -> Result<(), Error> {
        let sql = self.placeholders.render(INSERT_STUDENT);
        trace!(%sql, github = %student.github, "adding student");
        let query = sqlx::query(&sql)
            .bind(student.first_name.as_str())
            .bind(student.last_name.as_str())
            .bind(student.github.as_str());
        self.commit(query).await
    }

    pub async fn project(&mut self, title: &str) -> Result<Project, Error> {
        let sql = self.placeholders.render(SELECT_PROJECT);
        trace!(%sql, title, "looking up project");
        sqlx::query(&sql)
            .bind(title)
            .try_map(|row: AnyRow| {
                Ok(Project {
                    title: row.try_get("title")?,
                    description: row.try_get("description")?,
                    max_grade: row.try_get("max_grade")?,
                })
            })
            .fetch_optional(&mut self.conn)
            .await?
            .ok_or_else(|| Error::NotFound(Missing::Project(title.to_owned())))
    }

    pub async fn add_project(&mut self, project: &Project) -> Result<(), Error> {
        let sql = self.placeholders.render(INSERT_PROJECT);
        trace!(%sql, title = %project.title, "adding project");
        let query = sqlx::query(&sql)
            .bind(project.title.as_str())
            .bind(project.description.as_deref())
            .bind(project.max_grade);
        self.commit(query).await
    }

    pub async fn grade(&mut self, github: &str, title: &str) -> Result<Grade, Error> {
        let sql = self.placeholders.render(SELECT_GRADE);
        trace!(%sql, github, title, "looking up grade");
        sqlx::query(&sql)
            .bind(github)
            .bind(title)
            .try_map(|row: AnyRow| {
                Ok(Grade {
                    student_github: row.try_get("student_github")?,
                    project_title: row.try_get("project_title")?,
                    grade: row.try_get("grade")?,
                })
            })
            .fetch_optional(&mut self.conn)
            .await?
            .ok_or_else(|| {
                Error::NotFound(Missing::Grade {
                    github: github.to_owned(),
                    title: title.to_owned(),
                })
            })
    }

    /// Record a grade. The student and the project are not required to exist.
    pub async fn assign_grade(&mut self, grade: &Grade) -> Result<(), Error> {
        let sql = self.placeholders.render(INSERT_GRADE);
        trace!(
            %sql,
            github = %grade.student_github,
            title = %grade.project_title,
            "assigning grade"
        );
        let query = sqlx::query(&sql)
            .bind(grade.student_github.as_str())
            .bind(grade.project_title.as_str())
            .bind(grade.grade);
        self.commit(query).await
    }

    /// Run a single statement in its own transaction. A failed statement
    /// rolls the transaction back before the error is returned.
    async fn commit<'q>(&mut self, query: Query<'q, Any, AnyArguments<'q>>) -> Result<(), Error> {
        let mut trans = self.conn.begin().await?;
        match query.execute(&mut *trans).await {
            Ok(result) => {
                trans.commit().await?;
                trace!(rows = result.rows_affected(), "transaction committed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "statement failed, rolling back");
                if let Err(rollback) = trans.rollback().await {
                    warn!(error = %rollback, "cannot roll back transaction");
                }
                Err(e.into())
            }
        }
    }
}
