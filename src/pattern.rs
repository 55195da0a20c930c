//! Question templates and the mapper that recognizes them.
//!
//! Four phrasings are supported, tried top to bottom:
//!
//! ```text
//! show me all employees in the <dept> department
//! who is the manager of the <dept> department
//! list all employees hired after <yyyy-mm-dd>
//! what is the total salary expense for the <dept> department
//! ```
//!
//! Matching is anchored at the start of the lower-cased, trimmed input.
//! Anything after the template (a `?`, a `.`) is ignored.

use nom::{
    bytes::complete::{tag, take_while, take_while_m_n},
    character::complete::char,
    combinator::recognize,
    error::{Error, ErrorKind},
    sequence::tuple,
    IResult,
};

use crate::model::{Param, ParsedQuery, StatementKind};

const DEPARTMENT_SUFFIX: &str = " department";

/// An entry of the pattern table.
struct Pattern {
    kind: StatementKind,
    extract: fn(&str) -> IResult<&str, Param>,
}

/// Evaluated in order; the first entry that matches wins.
const PATTERNS: &[Pattern] = &[
    Pattern {
        kind: StatementKind::EmployeesByDept,
        extract: employees_in_department,
    },
    Pattern {
        kind: StatementKind::ManagerByDept,
        extract: manager_of_department,
    },
    Pattern {
        kind: StatementKind::EmployeesAfterDate,
        extract: employees_hired_after,
    },
    Pattern {
        kind: StatementKind::SalarySumByDept,
        extract: salary_expense_for_department,
    },
];

/// Map a free-text question onto a statement and its parameters.
///
/// Returns `None` when no template matches. That is an expected outcome, not a
/// failure; callers decide how to report it.
///
/// # Example
///
/// ```
/// use hrchat::model::{Param, StatementKind};
///
/// let parsed = hrchat::parse("Who is the manager of the Engineering department?").unwrap();
/// assert_eq!(parsed.kind, StatementKind::ManagerByDept);
/// assert_eq!(parsed.params, vec![Param::Text("Engineering".to_string())]);
///
/// assert!(hrchat::parse("how many vacation days do I have").is_none());
/// ```
pub fn parse(text: &str) -> Option<ParsedQuery> {
    let normalized = text.to_lowercase();
    let normalized = normalized.trim();

    PATTERNS.iter().find_map(|pattern| {
        (pattern.extract)(normalized)
            .ok()
            .map(|(_, param)| ParsedQuery::new(pattern.kind, vec![param]))
    })
}

fn employees_in_department(input: &str) -> IResult<&str, Param> {
    let (input, _) = tag("show me all employees in the ")(input)?;
    department(input)
}

fn manager_of_department(input: &str) -> IResult<&str, Param> {
    let (input, _) = tag("who is the manager of the ")(input)?;
    department(input)
}

fn employees_hired_after(input: &str) -> IResult<&str, Param> {
    let (input, _) = tag("list all employees hired after ")(input)?;
    let (input, date) = recognize(tuple((
        digits(4),
        char('-'),
        digits(2),
        char('-'),
        digits(2),
    )))(input)?;

    Ok((input, Param::Date(date.to_string())))
}

fn salary_expense_for_department(input: &str) -> IResult<&str, Param> {
    let (input, _) = tag("what is the total salary expense for the ")(input)?;
    department(input)
}

/// Capture `<dept> department`.
///
/// The name is the longest run of word characters and spaces that is still
/// followed by ` department`, so `the sales department department` yields
/// `Sales Department`. The trimmed name must not be empty.
fn department(input: &str) -> IResult<&str, Param> {
    let (_, run) = take_while::<_, _, Error<&str>>(is_word_or_space)(input)?;

    let end = match run.rfind(DEPARTMENT_SUFFIX) {
        Some(end) if end > 0 => end,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Tag))),
    };

    let name = run[..end].trim();
    if name.is_empty() {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::TakeWhile1)));
    }

    Ok((
        &input[end + DEPARTMENT_SUFFIX.len()..],
        Param::Text(title_case(name)),
    ))
}

/// Exactly `n` ASCII digits.
fn digits(n: usize) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input| take_while_m_n(n, n, |c: char| c.is_ascii_digit())(input)
}

fn is_word_or_space(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c.is_whitespace()
}

/// Uppercase the first character of every whitespace-separated token.
///
/// Nothing else changes: `"research and development"` becomes
/// `"Research And Development"`, and spacing is kept as is.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_token_start = true;

    for c in text.chars() {
        if at_token_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_token_start = c.is_whitespace();
    }

    out
}
