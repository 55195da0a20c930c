//! Turn raw rows into the answer shape for each kind of question.

use serde::Serialize;

use crate::model::{Row, StatementKind};

pub const NO_RECORDS: &str = "No records found matching your query.";
pub const DEPARTMENT_NOT_FOUND: &str = "Department not found. Please check the department name.";
pub const NO_MANAGER: &str = "Department found, but no manager is assigned.";

/// A successful answer.
///
/// Serializes to exactly one of `{"employees": [...]}`, `{"manager": ...}`,
/// `{"total_salary_expense": ...}` or `{"message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Employees { employees: Vec<Row> },
    Manager { manager: String },
    SalaryTotal { total_salary_expense: serde_json::Number },
    /// The department asked about does not exist.
    NotFound { message: String },
    /// The question was valid but there is nothing to show.
    Empty { message: String },
}

impl QueryResult {
    fn not_found(message: &str) -> Self {
        Self::NotFound {
            message: message.to_string(),
        }
    }

    fn empty(message: &str) -> Self {
        Self::Empty {
            message: message.to_string(),
        }
    }
}

/// Shape `rows` according to the kind of question that produced them.
///
/// A salary total for a department with no employees (or no such department)
/// is `0`; the two cases are not told apart.
pub fn shape(kind: StatementKind, rows: Vec<Row>) -> QueryResult {
    match kind {
        StatementKind::SalarySumByDept => {
            let total = rows
                .first()
                .and_then(|row| row.get("total_salary"))
                .and_then(|value| match value {
                    serde_json::Value::Number(n) => Some(n.clone()),
                    _ => None,
                })
                .unwrap_or_else(|| 0.into());
            QueryResult::SalaryTotal {
                total_salary_expense: total,
            }
        }
        StatementKind::ManagerByDept => {
            let Some(row) = rows.first() else {
                return QueryResult::not_found(DEPARTMENT_NOT_FOUND);
            };
            match row.get("Manager") {
                Some(serde_json::Value::String(name)) if !name.is_empty() => {
                    QueryResult::Manager {
                        manager: name.clone(),
                    }
                }
                _ => QueryResult::empty(NO_MANAGER),
            }
        }
        StatementKind::EmployeesByDept | StatementKind::EmployeesAfterDate => {
            if rows.is_empty() {
                QueryResult::empty(NO_RECORDS)
            } else {
                QueryResult::Employees { employees: rows }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_salary_total() {
        let rows = vec![row(json!({"total_salary": 238000}))];
        assert_eq!(
            shape(StatementKind::SalarySumByDept, rows),
            QueryResult::SalaryTotal {
                total_salary_expense: 238000.into()
            }
        );
    }

    #[test]
    fn test_null_salary_total_is_zero() {
        let rows = vec![row(json!({"total_salary": null}))];
        assert_eq!(
            shape(StatementKind::SalarySumByDept, rows),
            QueryResult::SalaryTotal {
                total_salary_expense: 0.into()
            }
        );
        assert_eq!(
            shape(StatementKind::SalarySumByDept, vec![]),
            QueryResult::SalaryTotal {
                total_salary_expense: 0.into()
            }
        );
    }

    #[test]
    fn test_manager_states() {
        assert_eq!(
            shape(StatementKind::ManagerByDept, vec![]),
            QueryResult::NotFound {
                message: DEPARTMENT_NOT_FOUND.to_string()
            }
        );
        assert_eq!(
            shape(StatementKind::ManagerByDept, vec![row(json!({"Manager": null}))]),
            QueryResult::Empty {
                message: NO_MANAGER.to_string()
            }
        );
        assert_eq!(
            shape(StatementKind::ManagerByDept, vec![row(json!({"Manager": ""}))]),
            QueryResult::Empty {
                message: NO_MANAGER.to_string()
            }
        );
        assert_eq!(
            shape(StatementKind::ManagerByDept, vec![row(json!({"Manager": "Bob"}))]),
            QueryResult::Manager {
                manager: "Bob".to_string()
            }
        );
    }

    #[test]
    fn test_employee_lists() {
        for kind in [StatementKind::EmployeesByDept, StatementKind::EmployeesAfterDate] {
            assert_eq!(
                shape(kind, vec![]),
                QueryResult::Empty {
                    message: NO_RECORDS.to_string()
                }
            );
        }

        let rows = vec![row(json!({"ID": 1, "Name": "Alice"}))];
        assert_eq!(
            shape(StatementKind::EmployeesByDept, rows.clone()),
            QueryResult::Employees { employees: rows }
        );
    }

    #[test]
    fn test_kind_decides_shape_not_columns() {
        // A salary query never becomes an employee list, whatever columns come back.
        let rows = vec![row(json!({"ID": 1, "Name": "Alice"}))];
        assert_eq!(
            shape(StatementKind::SalarySumByDept, rows),
            QueryResult::SalaryTotal {
                total_salary_expense: 0.into()
            }
        );
    }

    #[test]
    fn test_serialized_shapes() {
        let manager = QueryResult::Manager {
            manager: "Bob".to_string(),
        };
        assert_eq!(serde_json::to_value(&manager).unwrap(), json!({"manager": "Bob"}));

        let total = QueryResult::SalaryTotal {
            total_salary_expense: 238000.into(),
        };
        assert_eq!(
            serde_json::to_value(&total).unwrap(),
            json!({"total_salary_expense": 238000})
        );

        let empty = QueryResult::Empty {
            message: NO_RECORDS.to_string(),
        };
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({"message": NO_RECORDS}));
    }
}
