//! GraphQL documents and response decoding.
//!
//! The document strings are sent verbatim. Responses are checked against the
//! expected shape instead of being trusted blindly.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::{AppError, DraftEmployee, EmployeeRecord, Result};

/// Query listing all employees.
pub const EMPLOYEES_QUERY: &str = "query { employees { id name email position } }";

/// Mutation creating one employee from a `NewEmployee` input.
pub const CREATE_EMPLOYEE_MUTATION: &str = "mutation CreateEmployee($input: NewEmployee!) { createEmployee(input: $input) { id name email position } }";

/// Top-level GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct EmployeesData {
    employees: Vec<EmployeeRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEmployeeData {
    create_employee: EmployeeRecord,
}

/// Variables for [`CREATE_EMPLOYEE_MUTATION`].
#[must_use]
pub fn create_employee_variables(draft: &DraftEmployee) -> Value {
    json!({ "input": draft })
}

/// Decode the response to [`EMPLOYEES_QUERY`].
///
/// # Errors
/// Returns [`AppError::GraphQl`] when the server reported errors and
/// [`AppError::MalformedResponse`] when `data.employees` is missing or
/// mistyped.
pub fn decode_employees(body: Value) -> Result<Vec<EmployeeRecord>> {
    decode::<EmployeesData>(body, "employees").map(|d| d.employees)
}

/// Decode the response to [`CREATE_EMPLOYEE_MUTATION`].
///
/// # Errors
/// Same as [`decode_employees`], for `data.createEmployee`.
pub fn decode_created(body: Value) -> Result<EmployeeRecord> {
    decode::<CreateEmployeeData>(body, "createEmployee").map(|d| d.create_employee)
}

fn decode<T: DeserializeOwned>(body: Value, field: &str) -> Result<T> {
    let envelope: Envelope<Value> = serde_json::from_value(body)
        .map_err(|e| AppError::malformed(format!("not a GraphQL response: {e}")))?;

    if !envelope.errors.is_empty() {
        return Err(AppError::GraphQl {
            messages: envelope.errors.into_iter().map(|e| e.message).collect(),
        });
    }

    let data = envelope
        .data
        .filter(|d| !d.is_null())
        .ok_or_else(|| AppError::malformed("response has no data"))?;

    serde_json::from_value(data)
        .map_err(|e| AppError::malformed(format!("unexpected shape for data.{field}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_are_exact() {
        assert_eq!(
            EMPLOYEES_QUERY,
            "query { employees { id name email position } }"
        );
        assert_eq!(
            CREATE_EMPLOYEE_MUTATION,
            "mutation CreateEmployee($input: NewEmployee!) { createEmployee(input: $input) { id name email position } }"
        );
    }

    #[test]
    fn test_create_variables_shape() {
        let draft = DraftEmployee::new("Ada", "ada@x.com", "Engineer");
        assert_eq!(
            create_employee_variables(&draft),
            json!({"input": {"name": "Ada", "email": "ada@x.com", "position": "Engineer"}})
        );
    }

    #[test]
    fn test_decode_employees_preserves_order() {
        let body = json!({"data": {"employees": [
            {"id": "2", "name": "Bo", "email": "bo@x.com", "position": "Ops"},
            {"id": "1", "name": "Ada", "email": "ada@x.com", "position": "Engineer"}
        ]}});
        let employees = decode_employees(body).unwrap();
        let ids: Vec<_> = employees.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn test_decode_empty_list() {
        let employees = decode_employees(json!({"data": {"employees": []}})).unwrap();
        assert!(employees.is_empty());
    }

    #[test]
    fn test_errors_array_on_success_status() {
        let body = json!({
            "data": null,
            "errors": [{"message": "email already exists", "path": ["createEmployee"]}]
        });
        match decode_created(body) {
            Err(AppError::GraphQl { messages }) => {
                assert_eq!(messages, vec!["email already exists".to_string()]);
            }
            other => panic!("expected GraphQl error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_data_is_malformed() {
        assert!(matches!(
            decode_employees(json!({})),
            Err(AppError::MalformedResponse { .. })
        ));
        assert!(matches!(
            decode_employees(json!({"data": {"staff": []}})),
            Err(AppError::MalformedResponse { .. })
        ));
        assert!(matches!(
            decode_employees(json!([1, 2, 3])),
            Err(AppError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_decode_created() {
        let body = json!({"data": {"createEmployee":
            {"id": "7", "name": "Ada", "email": "ada@x.com", "position": "Engineer"}}});
        assert_eq!(decode_created(body).unwrap().id, "7");
    }
}
