use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of tables that accept CSV loads and batched record inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Departments,
    Jobs,
    Employees,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Departments, Resource::Jobs, Resource::Employees];

    /// Table name, also the name used in URLs and CSV upload requests.
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Departments => "departments",
            Resource::Jobs => "jobs",
            Resource::Employees => "employees",
        }
    }

    pub fn from_name(name: &str) -> Option<Resource> {
        Resource::ALL.into_iter().find(|r| r.name() == name)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
