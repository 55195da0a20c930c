//! Schema bootstrap and the fixed sample dataset.

use chrono::NaiveDate;

use crate::engine::Store;
use crate::error::{ChatError, ChatResult};
use crate::model::{Department, Employee};

const CREATE_EMPLOYEES: &str = "CREATE TABLE IF NOT EXISTS Employees (
    ID INTEGER PRIMARY KEY,
    Name TEXT NOT NULL,
    Department TEXT NOT NULL,
    Salary INTEGER,
    Hire_Date TEXT
)";

const CREATE_DEPARTMENTS: &str = "CREATE TABLE IF NOT EXISTS Departments (
    ID INTEGER PRIMARY KEY,
    Name TEXT NOT NULL,
    Manager TEXT
)";

const SAMPLE_EMPLOYEES: &[(i64, &str, &str, i64, &str)] = &[
    (1, "Alice", "Sales", 50000, "2021-01-10"),
    (2, "Bob", "Engineering", 70000, "2020-06-10"),
    (3, "Charlie", "Marketing", 60000, "2022-03-20"),
    (4, "David", "Sales", 55000, "2021-01-10"),
    (5, "Eve", "Engineering", 72000, "2020-06-10"),
    (6, "Frank", "Marketing", 58000, "2022-03-20"),
    (7, "Grace", "Sales", 53000, "2021-01-10"),
    (8, "Hank", "Engineering", 75000, "2020-06-10"),
    (9, "Ivy", "Marketing", 61000, "2022-03-20"),
    (10, "Jack", "Sales", 51000, "2021-01-10"),
    (11, "Karen", "Engineering", 73000, "2020-06-10"),
    (12, "Leo", "Marketing", 59000, "2022-03-20"),
];

const SAMPLE_DEPARTMENTS: &[(i64, &str, &str)] = &[
    (1, "Sales", "Alice"),
    (2, "Engineering", "Bob"),
    (3, "Marketing", "Eve"),
];

/// The employees written by [`seed_sample_data`].
pub fn sample_employees() -> ChatResult<Vec<Employee>> {
    SAMPLE_EMPLOYEES
        .iter()
        .map(|&(id, name, department, salary, hired)| {
            let hire_date = NaiveDate::parse_from_str(hired, "%Y-%m-%d")
                .map_err(|e| ChatError::InvalidValue(format!("hire date '{}': {}", hired, e)))?;
            Ok(Employee {
                id,
                name: name.to_string(),
                department: department.to_string(),
                salary,
                hire_date,
            })
        })
        .collect()
}

/// The departments written by [`seed_sample_data`].
pub fn sample_departments() -> Vec<Department> {
    SAMPLE_DEPARTMENTS
        .iter()
        .map(|&(id, name, manager)| Department {
            id,
            name: name.to_string(),
            manager: Some(manager.to_string()),
        })
        .collect()
}

/// Create both tables if they do not exist yet.
pub async fn create_schema(store: &Store) -> ChatResult<()> {
    for ddl in [CREATE_EMPLOYEES, CREATE_DEPARTMENTS] {
        sqlx::query(ddl)
            .execute(store.pool())
            .await
            .map_err(|e| ChatError::Execution(e.to_string()))?;
    }
    Ok(())
}

/// Write the sample rows. Existing rows with the same IDs are replaced, so
/// running this twice leaves the same data behind.
pub async fn seed_sample_data(store: &Store) -> ChatResult<()> {
    let employees = sample_employees()?;
    let departments = sample_departments();

    let mut tx = store
        .pool()
        .begin()
        .await
        .map_err(|e| ChatError::Execution(e.to_string()))?;

    for emp in &employees {
        sqlx::query(
            "INSERT OR REPLACE INTO Employees (ID, Name, Department, Salary, Hire_Date)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(emp.id)
        .bind(&emp.name)
        .bind(&emp.department)
        .bind(emp.salary)
        .bind(emp.hire_date)
        .execute(&mut *tx)
        .await
        .map_err(|e| ChatError::Execution(e.to_string()))?;
    }

    for dept in &departments {
        sqlx::query("INSERT OR REPLACE INTO Departments (ID, Name, Manager) VALUES (?, ?, ?)")
            .bind(dept.id)
            .bind(&dept.name)
            .bind(&dept.manager)
            .execute(&mut *tx)
            .await
            .map_err(|e| ChatError::Execution(e.to_string()))?;
    }

    tx.commit()
        .await
        .map_err(|e| ChatError::Execution(e.to_string()))?;

    tracing::info!(
        "Seeded {} employees and {} departments",
        employees.len(),
        departments.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sample_ids_are_unique() {
        let employees = sample_employees().unwrap();
        let ids: std::collections::BTreeSet<i64> = employees.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), employees.len());
        assert!(employees.iter().all(|e| !e.department.is_empty()));
    }

    #[tokio::test]
    async fn test_seed_round_trip() {
        let store = Store::connect("sqlite::memory:").await.unwrap();
        create_schema(&store).await.unwrap();
        seed_sample_data(&store).await.unwrap();

        assert_eq!(store.employees().await.unwrap(), sample_employees().unwrap());
        assert_eq!(store.departments().await.unwrap(), sample_departments());
    }

    #[tokio::test]
    async fn test_seeding_twice_is_idempotent() {
        let store = Store::connect("sqlite::memory:").await.unwrap();
        create_schema(&store).await.unwrap();
        seed_sample_data(&store).await.unwrap();
        create_schema(&store).await.unwrap();
        seed_sample_data(&store).await.unwrap();

        assert_eq!(store.employees().await.unwrap().len(), 12);
        assert_eq!(store.departments().await.unwrap().len(), 3);
    }
}
