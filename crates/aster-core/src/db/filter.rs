//! Structured WHERE predicates.
//!
//! A `Filter` is a small expression tree of field/operator/value triples joined
//! with AND / OR / NOT. It compiles to SQL text with `?` placeholders and a
//! parameter list, so values never become part of the statement text.

use super::query::quote_ident;
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    /// Equality under SQLite's NOCASE collation (ASCII case folding).
    EqNoCase,
}

impl CompareOp {
    fn sql(self) -> &'static str {
        match self {
            Self::Eq | Self::EqNoCase => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Like => "LIKE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
    In {
        field: String,
        values: Vec<Value>,
    },
    IsNull(String),
    IsNotNull(String),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    /// Caller-written SQL inserted verbatim. Only for trusted input; values
    /// should still go through `params`.
    Trusted { sql: String, params: Vec<Value> },
}

impl Filter {
    fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Ne, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Ge, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Le, value)
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::compare(field, CompareOp::Like, Value::Text(pattern.into()))
    }

    pub fn eq_ignore_case(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::EqNoCase, value)
    }

    pub fn in_list<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::IsNull(field.into())
    }

    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::IsNotNull(field.into())
    }

    pub fn trusted_sql(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self::Trusted {
            sql: sql.into(),
            params,
        }
    }

    pub fn all(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::And(filters.into_iter().collect())
    }

    pub fn any(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::Or(filters.into_iter().collect())
    }

    pub fn and(self, other: Filter) -> Self {
        match self {
            Self::And(mut parts) => {
                parts.push(other);
                Self::And(parts)
            }
            first => Self::And(vec![first, other]),
        }
    }

    pub fn or(self, other: Filter) -> Self {
        match self {
            Self::Or(mut parts) => {
                parts.push(other);
                Self::Or(parts)
            }
            first => Self::Or(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Compile to SQL text and its bound parameters, in placeholder order.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = String::new();
        let mut params = Vec::new();
        self.write_sql(&mut sql, &mut params);
        (sql, params)
    }

    fn write_sql(&self, sql: &mut String, params: &mut Vec<Value>) {
        match self {
            Self::Compare { field, op, value } => {
                sql.push_str(&quote_ident(field));
                sql.push(' ');
                sql.push_str(op.sql());
                sql.push_str(" ?");
                if *op == CompareOp::EqNoCase {
                    sql.push_str(" COLLATE NOCASE");
                }
                params.push(value.clone());
            }
            Self::In { field, values } => {
                if values.is_empty() {
                    sql.push('0');
                    return;
                }
                sql.push_str(&quote_ident(field));
                sql.push_str(" IN (");
                sql.push_str(&vec!["?"; values.len()].join(", "));
                sql.push(')');
                params.extend(values.iter().cloned());
            }
            Self::IsNull(field) => {
                sql.push_str(&quote_ident(field));
                sql.push_str(" IS NULL");
            }
            Self::IsNotNull(field) => {
                sql.push_str(&quote_ident(field));
                sql.push_str(" IS NOT NULL");
            }
            Self::And(parts) => write_joined(parts, " AND ", "1", sql, params),
            Self::Or(parts) => write_joined(parts, " OR ", "0", sql, params),
            Self::Not(inner) => {
                sql.push_str("NOT (");
                inner.write_sql(sql, params);
                sql.push(')');
            }
            Self::Trusted { sql: raw, params: bound } => {
                sql.push('(');
                sql.push_str(raw);
                sql.push(')');
                params.extend(bound.iter().cloned());
            }
        }
    }
}

fn write_joined(
    parts: &[Filter],
    separator: &str,
    empty: &str,
    sql: &mut String,
    params: &mut Vec<Value>,
) {
    if parts.is_empty() {
        sql.push_str(empty);
        return;
    }
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            sql.push_str(separator);
        }
        sql.push('(');
        part.write_sql(sql, params);
        sql.push(')');
    }
}
