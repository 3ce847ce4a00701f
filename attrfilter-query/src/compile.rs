//! Predicate compiler.
//!
//! Turns a [`FilterClause`] into a parameterized SQL predicate over a table
//! with a `namespace` column and a JSON `data` column. The table name comes
//! from calling code and is written into the SQL as-is; namespace, keys and
//! values are always bound parameters.
//!
//! ```rust
//! use attrfilter_query::{compile, FilterClause, FilterValue};
//!
//! let clause = FilterClause::equal("ns", ["a"], "5");
//! let predicate = compile(&clause, "attributes");
//!
//! assert_eq!(
//!     predicate.sql,
//!     "(attributes.namespace = $1 AND json_extract_path_text(attributes.data::JSONB, $2) = $3)"
//! );
//! assert_eq!(
//!     predicate.params,
//!     vec![FilterValue::from("ns"), FilterValue::from("a"), FilterValue::from("5")]
//! );
//! ```
//!
//! The PostgreSQL primitives used are `json_extract_path_text` for value
//! comparisons, `->` to descend into child objects and `?` to probe for a key.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clause::{Condition, FilterClause};
use crate::filter::FilterValue;
use crate::sql::{ParamStyle, SqlBuilder};

/// Default name of the namespace column.
pub const DEFAULT_NAMESPACE_COLUMN: &str = "namespace";
/// Default name of the JSON document column.
pub const DEFAULT_DATA_COLUMN: &str = "data";

/// A compiled predicate and the values for its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    /// SQL boolean expression.
    pub sql: String,
    /// Bound values, one per placeholder.
    pub params: Vec<FilterValue>,
}

impl Predicate {
    /// Number of bound parameters.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Split into SQL text and parameters.
    pub fn into_parts(self) -> (String, Vec<FilterValue>) {
        (self.sql, self.params)
    }
}

/// How several compiled clauses are joined.
///
/// The compiler never picks one on its own; callers decide whether clauses
/// under one query key narrow (`All`) or widen (`Any`) the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Every clause must hold (`AND`). No clauses compiles to `TRUE`.
    All,
    /// At least one clause must hold (`OR`). No clauses compiles to `FALSE`.
    Any,
}

impl Combinator {
    fn keyword(&self) -> &'static str {
        match self {
            Self::All => " AND ",
            Self::Any => " OR ",
        }
    }

    fn empty(&self) -> &'static str {
        match self {
            Self::All => "TRUE",
            Self::Any => "FALSE",
        }
    }
}

/// Compiles filter clauses into SQL predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateCompiler {
    style: ParamStyle,
    namespace_column: String,
    data_column: String,
}

impl Default for PredicateCompiler {
    fn default() -> Self {
        Self {
            style: ParamStyle::Dollar,
            namespace_column: DEFAULT_NAMESPACE_COLUMN.to_string(),
            data_column: DEFAULT_DATA_COLUMN.to_string(),
        }
    }
}

impl PredicateCompiler {
    /// A compiler with `$n` placeholders and the default column names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder style.
    pub fn param_style(mut self, style: ParamStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the namespace column name. Must be a trusted identifier.
    pub fn namespace_column(mut self, column: impl Into<String>) -> Self {
        self.namespace_column = column.into();
        self
    }

    /// Set the JSON document column name. Must be a trusted identifier.
    pub fn data_column(mut self, column: impl Into<String>) -> Self {
        self.data_column = column.into();
        self
    }

    /// The placeholder style.
    pub fn style(&self) -> ParamStyle {
        self.style
    }

    /// Compile one clause against `table`.
    ///
    /// # Panics
    ///
    /// Panics if the clause has a value condition but no key path. The
    /// decoder never produces such a clause.
    pub fn compile(&self, clause: &FilterClause, table: &str) -> Predicate {
        self.compile_with_offset(clause, table, 0)
    }

    /// Compile one clause with placeholders numbered from `offset + 1`.
    ///
    /// Use this to append the predicate to a query that already binds
    /// `offset` parameters.
    ///
    /// # Panics
    ///
    /// Same as [`compile`](Self::compile).
    pub fn compile_with_offset(
        &self,
        clause: &FilterClause,
        table: &str,
        offset: usize,
    ) -> Predicate {
        let mut builder = SqlBuilder::with_offset(self.style, offset);
        self.write_clause(&mut builder, clause, table);
        let (sql, params) = builder.build();

        debug!(
            table = %table,
            operator = %clause.operator(),
            params = params.len(),
            "compiled filter predicate"
        );
        Predicate { sql, params }
    }

    /// Compile several clauses joined by `combinator`.
    ///
    /// # Panics
    ///
    /// Same as [`compile`](Self::compile).
    pub fn compile_all<'a, I>(&self, clauses: I, table: &str, combinator: Combinator) -> Predicate
    where
        I: IntoIterator<Item = &'a FilterClause>,
    {
        let mut builder = SqlBuilder::new(self.style);
        let mut count = 0;

        for clause in clauses {
            builder.push(if count == 0 { "(" } else { combinator.keyword() });
            self.write_clause(&mut builder, clause, table);
            count += 1;
        }

        if count == 0 {
            builder.push(combinator.empty());
        } else {
            builder.push(")");
        }

        let (sql, params) = builder.build();
        debug!(
            table = %table,
            clauses = count,
            params = params.len(),
            "compiled combined filter predicate"
        );
        Predicate { sql, params }
    }

    fn write_clause(&self, builder: &mut SqlBuilder, clause: &FilterClause, table: &str) {
        let keys = clause.keys();
        let Some((last, parents)) = keys.split_last() else {
            assert!(
                matches!(clause.condition(), Condition::Exists),
                "filter clause for namespace {:?} has a `{}` condition but no key path",
                clause.namespace(),
                clause.operator(),
            );
            self.write_namespace(builder, clause, table);
            return;
        };

        builder.push("(");
        self.write_namespace(builder, clause, table);
        builder.push(" AND ");

        match clause.condition() {
            Condition::LessThan(n) => {
                self.write_extract(builder, table, "JSON", keys);
                builder.push("::bigint < ").push_param(*n);
            }
            Condition::GreaterThan(n) => {
                self.write_extract(builder, table, "JSON", keys);
                builder.push("::bigint > ").push_param(*n);
            }
            Condition::Like(pattern) => {
                self.write_extract(builder, table, "JSONB", keys);
                builder.push(" LIKE ").push_param(pattern);
            }
            Condition::Equal(value) => {
                self.write_extract(builder, table, "JSONB", keys);
                builder.push(" = ").push_param(value);
            }
            Condition::Exists => {
                builder.push(format!("{}.{}::JSONB", table, self.data_column));
                for key in parents {
                    builder.push(" -> ").push_param(key);
                }
                builder
                    .push(" ")
                    .push(self.style.key_exists_operator())
                    .push(" ")
                    .push_param(last);
            }
        }

        builder.push(")");
    }

    fn write_namespace(&self, builder: &mut SqlBuilder, clause: &FilterClause, table: &str) {
        builder
            .push(format!("{}.{} = ", table, self.namespace_column))
            .push_param(clause.namespace());
    }

    fn write_extract(&self, builder: &mut SqlBuilder, table: &str, cast: &str, keys: &[String]) {
        builder
            .push(format!(
                "json_extract_path_text({}.{}::{}, ",
                table, self.data_column, cast
            ))
            .push_params(keys, ", ")
            .push(")");
    }
}

/// Compile a clause with the default compiler.
///
/// # Panics
///
/// Panics if the clause has a value condition but no key path.
pub fn compile(clause: &FilterClause, table: &str) -> Predicate {
    PredicateCompiler::default().compile(clause, table)
}
