//! Data types shared by the mapper, executor and shaper.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One result row: column name to value, in the order the store returned them.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// A row of the `Employees` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    #[sqlx(rename = "ID")]
    pub id: i64,
    #[sqlx(rename = "Name")]
    pub name: String,
    #[sqlx(rename = "Department")]
    pub department: String,
    #[sqlx(rename = "Salary")]
    pub salary: i64,
    #[sqlx(rename = "Hire_Date")]
    pub hire_date: NaiveDate,
}

/// A row of the `Departments` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Department {
    #[sqlx(rename = "ID")]
    pub id: i64,
    #[sqlx(rename = "Name")]
    pub name: String,
    #[sqlx(rename = "Manager")]
    pub manager: Option<String>,
}

/// Which of the four supported questions was asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    EmployeesByDept,
    ManagerByDept,
    EmployeesAfterDate,
    SalarySumByDept,
}

impl StatementKind {
    /// The parameterized SQL run for this kind. Every statement takes exactly one `?`.
    pub fn sql(self) -> &'static str {
        match self {
            Self::EmployeesByDept => "SELECT * FROM Employees WHERE Department = ?",
            Self::ManagerByDept => "SELECT Manager FROM Departments WHERE Name = ?",
            Self::EmployeesAfterDate => "SELECT * FROM Employees WHERE Hire_Date > ?",
            Self::SalarySumByDept => {
                "SELECT SUM(Salary) AS total_salary FROM Employees WHERE Department = ?"
            }
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EmployeesByDept => "employees by department",
            Self::ManagerByDept => "manager of department",
            Self::EmployeesAfterDate => "employees hired after date",
            Self::SalarySumByDept => "salary total for department",
        };
        f.write_str(name)
    }
}

/// A value bound to a statement placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Param {
    /// A department name, already title-cased.
    Text(String),
    /// A `yyyy-mm-dd` date exactly as typed.
    Date(String),
}

impl Param {
    pub fn as_str(&self) -> &str {
        match self {
            Param::Text(s) | Param::Date(s) => s,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Text(s) => write!(f, "'{}'", s),
            Param::Date(s) => write!(f, "date '{}'", s),
        }
    }
}

/// A recognized question: what to run and with which parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub kind: StatementKind,
    pub params: Vec<Param>,
}

impl ParsedQuery {
    pub fn new(kind: StatementKind, params: Vec<Param>) -> Self {
        Self { kind, params }
    }

    /// SQL text for this query.
    pub fn sql(&self) -> &'static str {
        self.kind.sql()
    }
}
