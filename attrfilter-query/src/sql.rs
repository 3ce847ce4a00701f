//! SQL generation utilities.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::filter::FilterValue;

/// How parameter placeholders are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamStyle {
    /// Numbered placeholders: `$1`, `$2`, ... (tokio-postgres, sqlx).
    #[default]
    Dollar,
    /// Positional `?` placeholders for builders that rebind before sending.
    ///
    /// A literal `?` operator in the SQL text is written as `\?` so the
    /// builder does not take it for a placeholder.
    Question,
}

impl ParamStyle {
    /// Parse a style name (`dollar` or `question`, case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dollar" => Some(Self::Dollar),
            "question" => Some(Self::Question),
            _ => None,
        }
    }

    /// Write the placeholder for a 1-based parameter index.
    pub fn write_placeholder(&self, out: &mut String, index: usize) {
        match self {
            Self::Dollar => {
                let _ = write!(out, "${}", index);
            }
            Self::Question => out.push('?'),
        }
    }

    /// The JSONB key-exists operator as it must appear in SQL text.
    pub fn key_exists_operator(&self) -> &'static str {
        match self {
            Self::Dollar => "?",
            Self::Question => "\\?",
        }
    }
}

/// Accumulates SQL text and the values bound to its placeholders.
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    style: ParamStyle,
    sql: String,
    params: Vec<FilterValue>,
    offset: usize,
}

impl SqlBuilder {
    /// Create a new SQL builder.
    pub fn new(style: ParamStyle) -> Self {
        Self::with_offset(style, 0)
    }

    /// Create a builder whose first placeholder is numbered `offset + 1`.
    pub fn with_offset(style: ParamStyle, offset: usize) -> Self {
        Self {
            style,
            sql: String::with_capacity(128),
            params: Vec::new(),
            offset,
        }
    }

    /// Push a literal SQL string. Never pass user input here.
    pub fn push(&mut self, sql: impl AsRef<str>) -> &mut Self {
        self.sql.push_str(sql.as_ref());
        self
    }

    /// Push a placeholder and bind its value.
    pub fn push_param(&mut self, value: impl Into<FilterValue>) -> &mut Self {
        let index = self.next_param_index();
        self.style.write_placeholder(&mut self.sql, index);
        self.params.push(value.into());
        self
    }

    /// Push one placeholder per value, separated by `sep`.
    pub fn push_params<I, V>(&mut self, values: I, sep: &str) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(sep);
            }
            self.push_param(value);
        }
        self
    }

    /// The placeholder style in use.
    pub fn style(&self) -> ParamStyle {
        self.style
    }

    /// Get the current SQL string.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Get the current parameters.
    pub fn params(&self) -> &[FilterValue] {
        &self.params
    }

    /// Get the next parameter index.
    pub fn next_param_index(&self) -> usize {
        self.offset + self.params.len() + 1
    }

    /// Build the final SQL string and parameters.
    pub fn build(self) -> (String, Vec<FilterValue>) {
        (self.sql, self.params)
    }
}

impl Default for SqlBuilder {
    fn default() -> Self {
        Self::new(ParamStyle::Dollar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placeholders() {
        let mut out = String::new();
        ParamStyle::Dollar.write_placeholder(&mut out, 5);
        ParamStyle::Question.write_placeholder(&mut out, 6);
        assert_eq!(out, "$5?");
    }

    #[test]
    fn test_key_exists_operator() {
        assert_eq!(ParamStyle::Dollar.key_exists_operator(), "?");
        assert_eq!(ParamStyle::Question.key_exists_operator(), "\\?");
    }

    #[test]
    fn test_sql_builder() {
        let mut builder = SqlBuilder::default();
        builder
            .push("t.namespace = ")
            .push_param("ns")
            .push(" AND f(")
            .push_params(["a", "b"], ", ")
            .push(")");

        let (sql, params) = builder.build();
        assert_eq!(sql, "t.namespace = $1 AND f($2, $3)");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_sql_builder_offset() {
        let mut builder = SqlBuilder::with_offset(ParamStyle::Dollar, 3);
        builder.push("x = ").push_param(1i64);
        assert_eq!(builder.sql(), "x = $4");
        assert_eq!(builder.next_param_index(), 5);
    }

    #[test]
    fn test_style_from_name() {
        assert_eq!(ParamStyle::from_name("Dollar"), Some(ParamStyle::Dollar));
        assert_eq!(ParamStyle::from_name("question"), Some(ParamStyle::Question));
        assert_eq!(ParamStyle::from_name("colon"), None);
    }
}
