use serde::{Deserialize, Serialize};

/// A named parameter of a [`Query`], such as `@id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name including the leading `@`.
    pub name: String,
    /// Parameter value.
    pub value: serde_json::Value,
}

impl Parameter {
    /// Create a new parameter.
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A parameterized SQL query.
///
/// ```
/// use documentdb::Query;
///
/// let q = Query::new("SELECT * FROM root r WHERE r.id = @id").with_parameter("@id", "tenant-1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// The query text.
    pub query: String,
    /// The query parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl Query {
    /// Create a query without parameters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            parameters: Vec::new(),
        }
    }

    /// Add a parameter.
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.push(Parameter::new(name, value));
        self
    }
}
