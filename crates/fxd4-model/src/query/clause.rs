//! Clauses accumulated by [`super::QueryBuilder`] and how each one is spelled
//! in the resource API's query string.

use serde_json::Value;

/// A row filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`. A JSON `null` becomes `column IS NULL`.
    Eq { column: String, value: Value },
    /// `column IN (values)`.
    In { column: String, values: Vec<Value> },
    /// Raw disjunction in the remote filter syntax, e.g. `id.eq.1,id.eq.2`.
    /// Passed through untouched.
    Or(String),
}

impl Filter {
    /// Query-string key and value for this filter.
    pub fn to_param(&self) -> (String, String) {
        match self {
            Filter::Eq {
                column,
                value: Value::Null,
            } => (column.clone(), "is.null".into()),
            Filter::Eq {
                column,
                value,
            } => (column.clone(), format!("eq.{}", format_value(value))),
            Filter::In {
                column,
                values,
            } => {
                let list = values
                    .iter()
                    .map(format_list_item)
                    .collect::<Vec<_>>()
                    .join(",");
                (column.clone(), format!("in.({list})"))
            }
            Filter::Or(expression) => ("or".into(), format!("({expression})")),
        }
    }
}

/// Sort direction and null placement for [`super::QueryBuilder::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderOptions {
    pub ascending: bool,
    /// `None` leaves null placement to the server.
    pub nulls_first: Option<bool>,
}

impl Default for OrderOptions {
    fn default() -> Self {
        Self {
            ascending: true,
            nulls_first: None,
        }
    }
}

impl OrderOptions {
    pub fn asc() -> Self {
        Self::default()
    }

    pub fn desc() -> Self {
        Self {
            ascending: false,
            ..Self::default()
        }
    }

    pub fn nulls_first(mut self, nulls_first: bool) -> Self {
        self.nulls_first = Some(nulls_first);
        self
    }
}

/// An ORDER BY key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub column: String,
    pub options: OrderOptions,
}

impl OrderClause {
    pub fn to_param(&self) -> String {
        let direction = if self.options.ascending { "asc" } else { "desc" };
        let mut param = format!("{}.{}", self.column, direction);
        match self.options.nulls_first {
            Some(true) => param.push_str(".nullsfirst"),
            Some(false) => param.push_str(".nullslast"),
            None => {}
        }
        param
    }
}

/// Formats a scalar for the query string. Strings are sent without quotes.
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// List members containing reserved characters must be double-quoted.
fn format_list_item(value: &Value) -> String {
    let item = format_value(value);
    if item.contains(|c| matches!(c, ',' | '(' | ')')) {
        format!("\"{item}\"")
    } else {
        item
    }
}
