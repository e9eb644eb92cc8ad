//! Shapes accepted by the batch insert endpoint, one per [`Resource`](super::resource::Resource).
//!
//! Required fields are plain types so a record missing one fails to deserialize.
//! Unknown fields are ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentCreate {
    pub id: i64,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCreate {
    pub id: i64,
    pub job: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub id: i64,
    pub name: String,
    /// Hire timestamp. Optional, but must be a readable date/time when present.
    #[serde(default)]
    pub datetime: Option<String>,
    pub department_id: i64,
    pub job_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn employee_datetime_is_optional() {
        let e: EmployeeCreate = serde_json::from_value(json!({
            "id": 1, "name": "Ada", "department_id": 2, "job_id": 3
        }))
        .unwrap();
        assert_eq!(e.datetime, None);
    }

    #[test]
    fn missing_required_field_fails() {
        let err = serde_json::from_value::<DepartmentCreate>(json!({ "id": 1 })).unwrap_err();
        assert!(err.to_string().contains("department"));
    }

    #[test]
    fn wrong_type_fails() {
        let res = serde_json::from_value::<JobCreate>(json!({ "id": "one", "job": "Engineer" }));
        assert!(res.is_err());
    }
}
