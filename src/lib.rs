//! # hrchat
//!
//! Ask an employee database plain-English questions.
//!
//! A small, fixed set of question templates is mapped onto parameterized SQL,
//! run against SQLite, and shaped into a JSON answer.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use hrchat::prelude::*;
//!
//! let store = Store::connect("sqlite::memory:").await?;
//! seed::create_schema(&store).await?;
//! seed::seed_sample_data(&store).await?;
//!
//! let result = answer(&store, "Who is the manager of the Engineering department?").await?;
//! // => QueryResult::Manager { manager: "Bob" }
//! ```
//!
//! ## Supported questions
//!
//! | Question                                                      | Answer                   |
//! |---------------------------------------------------------------|--------------------------|
//! | `Show me all employees in the <dept> department`              | `{"employees": [...]}`   |
//! | `Who is the manager of the <dept> department`                 | `{"manager": "..."}`     |
//! | `List all employees hired after <yyyy-mm-dd>`                 | `{"employees": [...]}`   |
//! | `What is the total salary expense for the <dept> department`  | `{"total_salary_expense": n}` |

pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod model;
pub mod pattern;
pub mod seed;
pub mod server;
pub mod shaper;

pub mod prelude {
    pub use crate::config::ChatConfig;
    pub use crate::engine::Store;
    pub use crate::error::*;
    pub use crate::handler::answer;
    pub use crate::model::*;
    pub use crate::pattern::parse;
    pub use crate::seed;
    pub use crate::server::{AppState, ChatServer, create_router};
    pub use crate::shaper::{QueryResult, shape};
}

/// Map a question onto a statement and its parameters.
///
/// # Example
///
/// ```
/// use hrchat::model::StatementKind;
///
/// let parsed = hrchat::parse("List all employees hired after 2020-06-10.").unwrap();
/// assert_eq!(parsed.kind, StatementKind::EmployeesAfterDate);
/// ```
pub fn parse(input: &str) -> Option<model::ParsedQuery> {
    pattern::parse(input)
}
