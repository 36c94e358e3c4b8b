//! Declarative field validation with aggregated reporting.
//!
//! Each entity declares an explicit rule table (field name plus predicate)
//! evaluated imperatively in declaration order. Every failing field is
//! collected, not just the first, and the aggregate renders as one
//! comma-separated message with no trailing separator. The structured
//! violation list is kept alongside the rendered form so renderers can be
//! swapped without re-deriving the failures.

use std::fmt;

use serde::Serialize;

/// The way a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "expected")]
pub enum ViolationKind {
    /// The field is required but carries its type's zero value.
    Required,
    /// The field is present but does not match the expected format.
    Format(&'static str),
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::Format(expected) => write!(f, "must be a valid {expected}"),
        }
    }
}

/// A single field failure: which field, and how it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Wire name of the offending field.
    pub field: &'static str,
    /// Failure category.
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

/// Aggregate of every failing field for one entity, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Access the structured violation list.
    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no field failed. Kept for completeness; [`validate`]
    /// never returns an empty aggregate.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

/// One entry in an entity's rule table.
///
/// The predicate returns `None` when the field passes and the violation
/// kind when it fails. Rules are plain function pointers so tables can be
/// declared as constants.
pub struct Rule<T: ?Sized> {
    /// Wire name of the field this rule covers.
    pub field: &'static str,
    /// Predicate deciding whether the field passes.
    pub check: fn(&T) -> Option<ViolationKind>,
}

/// Evaluate a rule table against a subject, aggregating every failure.
///
/// Rules run in declaration order, which makes the rendered message
/// deterministic.
///
/// # Errors
///
/// Returns the aggregated [`Violations`] when at least one rule fails.
///
/// # Examples
/// ```
/// use storefront::domain::validation::{validate, Rule, ViolationKind};
///
/// struct Form {
///     name: String,
/// }
///
/// const RULES: &[Rule<Form>] = &[Rule {
///     field: "name",
///     check: |form| form.name.is_empty().then_some(ViolationKind::Required),
/// }];
///
/// let err = validate(&Form { name: String::new() }, RULES).expect_err("fails");
/// assert_eq!(err.to_string(), "name: required");
/// ```
pub fn validate<T: ?Sized>(subject: &T, rules: &[Rule<T>]) -> Result<(), Violations> {
    let failures: Vec<Violation> = rules
        .iter()
        .filter_map(|rule| {
            (rule.check)(subject).map(|kind| Violation {
                field: rule.field,
                kind,
            })
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(Violations(failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct Subject {
        name: String,
        email: String,
        quantity: i32,
    }

    const RULES: &[Rule<Subject>] = &[
        Rule {
            field: "name",
            check: |s| s.name.is_empty().then_some(ViolationKind::Required),
        },
        Rule {
            field: "email",
            check: |s| {
                if s.email.is_empty() {
                    Some(ViolationKind::Required)
                } else if !s.email.contains('@') {
                    Some(ViolationKind::Format("email address"))
                } else {
                    None
                }
            },
        },
        Rule {
            field: "quantity",
            check: |s| (s.quantity <= 0).then_some(ViolationKind::Required),
        },
    ];

    fn subject(name: &str, email: &str, quantity: i32) -> Subject {
        Subject {
            name: name.to_owned(),
            email: email.to_owned(),
            quantity,
        }
    }

    #[test]
    fn passes_when_every_rule_holds() {
        validate(&subject("Ada", "ada@example.com", 2), RULES).expect("subject should validate");
    }

    #[test]
    fn aggregates_every_failing_field_in_declaration_order() {
        let err =
            validate(&subject("", "ada@example.com", 0), RULES).expect_err("two fields fail");
        assert_eq!(err.len(), 2);
        assert_eq!(err.to_string(), "name: required, quantity: required");
    }

    #[rstest]
    #[case(subject("Ada", "", 1), "email: required")]
    #[case(subject("Ada", "not-an-email", 1), "email: must be a valid email address")]
    fn renders_single_failures_without_trailing_separator(
        #[case] subject: Subject,
        #[case] expected: &str,
    ) {
        let err = validate(&subject, RULES).expect_err("one field fails");
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn structured_list_survives_rendering() {
        let err = validate(&subject("", "bad", -1), RULES).expect_err("three fields fail");
        let fields: Vec<&str> = err.as_slice().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["name", "email", "quantity"]);
        assert_eq!(
            err.as_slice().get(1).map(|v| v.kind),
            Some(ViolationKind::Format("email address"))
        );
    }
}
