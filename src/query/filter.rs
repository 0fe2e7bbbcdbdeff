use crate::value::Value;

/// [`super::Query`] filters over typed field accessors.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(&'static str, Value),
    Ne(&'static str, Value),
    Gt(&'static str, Value),
    Lt(&'static str, Value),
    Ge(&'static str, Value),
    Le(&'static str, Value),
    /// Raw SQL LIKE pattern; `\` is the escape character.
    Like(&'static str, String),
    NotNull(&'static str),
    IsNull(&'static str),
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Creates an equality filter.
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Eq(field, value.into())
    }

    /// Creates a not-equal filter.
    pub fn ne(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Ne(field, value.into())
    }

    /// Creates a greater-than filter.
    pub fn gt(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Gt(field, value.into())
    }

    /// Creates a less-than filter.
    pub fn lt(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Lt(field, value.into())
    }

    /// Creates a greater-than-or-equal filter.
    pub fn ge(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Ge(field, value.into())
    }

    /// Creates a less-than-or-equal filter.
    pub fn le(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Le(field, value.into())
    }

    /// Creates a LIKE filter from a raw pattern.
    pub fn like(field: &'static str, pattern: &str) -> Self {
        Filter::Like(field, pattern.to_string())
    }

    /// Creates a string-prefix filter. The prefix is escaped, so `%` and `_`
    /// in it match literally.
    pub fn starts_with(field: &'static str, prefix: &str) -> Self {
        let escaped = prefix
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Filter::Like(field, format!("{escaped}%"))
    }

    /// Creates a NOT NULL filter.
    pub fn not_null(field: &'static str) -> Self {
        Filter::NotNull(field)
    }

    /// Creates an IS NULL filter.
    pub fn is_null(field: &'static str) -> Self {
        Filter::IsNull(field)
    }

    /// Chain two filters with AND.
    pub(crate) fn and(self, other: Filter) -> Self {
        Filter::And(Box::new(self), Box::new(other))
    }

    /// Chain two filters with OR.
    pub(crate) fn or(self, other: Filter) -> Self {
        Filter::Or(Box::new(self), Box::new(other))
    }

    /// Negate a filter with NOT.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Filter::Not(Box::new(self))
    }
}
