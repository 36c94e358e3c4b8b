//! Order entity, request draft, rule table and partial-update merge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{validate, Rule, ViolationKind, Violations};

/// A persisted order record.
///
/// `id` is server-assigned and monotonically increasing; `created_at` is set
/// on insert and `updated_at` only after the first replace. `total_value` is
/// stored as supplied by the caller, never recomputed from quantity and
/// price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    /// Server-assigned identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Identifier of the owning user.
    #[schema(example = 42)]
    pub user_id: i64,
    /// Free-text description of the ordered item.
    #[schema(example = "Widget")]
    pub item_description: String,
    /// Number of items ordered.
    #[schema(example = 3)]
    pub item_quantity: i32,
    /// Unit price of the item.
    #[schema(example = 9.99)]
    pub item_price: f64,
    /// Total order value as supplied by the caller.
    #[schema(example = 29.97)]
    pub total_value: f64,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp, absent until the first update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request-shaped order record.
///
/// Every field defaults to its type's zero value, and the zero value means
/// "field not supplied". This convention is what the partial-update merge
/// relies on: a caller cannot use an update to reset a field to zero or
/// empty, which is a documented limitation, not a bug.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct OrderDraft {
    /// Identifier of the owning user; zero means not supplied.
    #[serde(default)]
    pub user_id: i64,
    /// Item description; empty means not supplied.
    #[serde(default)]
    pub item_description: String,
    /// Item quantity; zero means not supplied.
    #[serde(default)]
    pub item_quantity: i32,
    /// Unit price; zero means not supplied.
    #[serde(default)]
    pub item_price: f64,
    /// Total value; zero means not supplied.
    #[serde(default)]
    pub total_value: f64,
}

/// Declarative rule table for order business fields.
const ORDER_RULES: &[Rule<OrderDraft>] = &[
    Rule {
        field: "user_id",
        check: |draft| (draft.user_id == 0).then_some(ViolationKind::Required),
    },
    Rule {
        field: "item_description",
        check: |draft| draft.item_description.is_empty().then_some(ViolationKind::Required),
    },
    Rule {
        field: "item_quantity",
        check: |draft| match draft.item_quantity {
            0 => Some(ViolationKind::Required),
            q if q < 0 => Some(ViolationKind::Format("positive number")),
            _ => None,
        },
    },
    Rule {
        field: "item_price",
        check: |draft| {
            if draft.item_price == 0.0 {
                Some(ViolationKind::Required)
            } else if draft.item_price < 0.0 {
                Some(ViolationKind::Format("positive number"))
            } else {
                None
            }
        },
    },
    Rule {
        field: "total_value",
        check: |draft| {
            if draft.total_value == 0.0 {
                Some(ViolationKind::Required)
            } else if draft.total_value < 0.0 {
                Some(ViolationKind::Format("positive number"))
            } else {
                None
            }
        },
    },
];

impl OrderDraft {
    /// Evaluate the order rule table, aggregating every failing field.
    ///
    /// # Errors
    ///
    /// Returns the aggregated [`Violations`] when at least one business
    /// field is missing or malformed.
    pub fn validate(&self) -> Result<(), Violations> {
        validate(self, ORDER_RULES)
    }
}

impl From<&Order> for OrderDraft {
    fn from(order: &Order) -> Self {
        Self {
            user_id: order.user_id,
            item_description: order.item_description.clone(),
            item_quantity: order.item_quantity,
            item_price: order.item_price,
            total_value: order.total_value,
        }
    }
}

impl Order {
    /// Merge a request draft into this record under the zero-value-as-absence
    /// convention.
    ///
    /// Non-default draft fields overwrite the stored value; default fields
    /// leave it untouched. `id`, `created_at` and `updated_at` are never
    /// affected by the merge itself.
    pub fn merged_with(&self, draft: &OrderDraft) -> Self {
        let mut merged = self.clone();
        if draft.user_id != 0 {
            merged.user_id = draft.user_id;
        }
        if !draft.item_description.is_empty() {
            merged.item_description = draft.item_description.clone();
        }
        if draft.item_quantity != 0 {
            merged.item_quantity = draft.item_quantity;
        }
        if draft.item_price != 0.0 {
            merged.item_price = draft.item_price;
        }
        if draft.total_value != 0.0 {
            merged.total_value = draft.total_value;
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn stored() -> Order {
        Order {
            id: 7,
            user_id: 42,
            item_description: "Widget".to_owned(),
            item_quantity: 1,
            item_price: 9.99,
            total_value: 9.99,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("timestamp"),
            updated_at: None,
        }
    }

    fn full_draft() -> OrderDraft {
        OrderDraft {
            user_id: 42,
            item_description: "Widget".to_owned(),
            item_quantity: 3,
            item_price: 9.99,
            total_value: 29.97,
        }
    }

    #[test]
    fn complete_draft_validates() {
        full_draft().validate().expect("draft should validate");
    }

    #[test]
    fn total_value_is_trusted_as_supplied() {
        let mut draft = full_draft();
        draft.total_value = 1.0;
        draft.validate().expect("mismatched total is accepted");
    }

    #[test]
    fn missing_fields_are_aggregated_not_truncated() {
        let draft = OrderDraft {
            user_id: 42,
            item_price: 9.99,
            total_value: 9.99,
            ..OrderDraft::default()
        };
        let err = draft.validate().expect_err("two fields fail");
        assert_eq!(
            err.to_string(),
            "item_description: required, item_quantity: required"
        );
    }

    #[test]
    fn empty_draft_reports_every_field() {
        let err = OrderDraft::default().validate().expect_err("all fields fail");
        assert_eq!(err.len(), 5);
    }

    #[rstest]
    #[case(-1, "item_quantity: must be a valid positive number")]
    fn negative_quantity_is_a_format_violation(#[case] quantity: i32, #[case] expected: &str) {
        let mut draft = full_draft();
        draft.item_quantity = quantity;
        let err = draft.validate().expect_err("negative quantity fails");
        assert_eq!(err.to_string(), expected);
    }

    #[rstest]
    fn merge_overwrites_only_supplied_fields(stored: Order) {
        let draft = OrderDraft {
            item_quantity: 5,
            ..OrderDraft::default()
        };

        let merged = stored.merged_with(&draft);
        assert_eq!(merged.item_description, "Widget");
        assert_eq!(merged.item_quantity, 5);
        assert_eq!(merged.user_id, stored.user_id);
        assert_eq!(merged.item_price, stored.item_price);
    }

    #[rstest]
    fn merge_never_erases_with_zero_values(stored: Order) {
        let merged = stored.merged_with(&OrderDraft::default());
        assert_eq!(merged, stored);
    }

    #[rstest]
    fn merge_leaves_identity_and_audit_fields_untouched(stored: Order) {
        let merged = stored.merged_with(&full_draft());
        assert_eq!(merged.id, stored.id);
        assert_eq!(merged.created_at, stored.created_at);
        assert_eq!(merged.updated_at, stored.updated_at);
    }

    #[rstest]
    fn draft_view_of_a_record_revalidates(stored: Order) {
        let merged = stored.merged_with(&OrderDraft {
            item_quantity: 5,
            ..OrderDraft::default()
        });
        OrderDraft::from(&merged).validate().expect("merged record stays valid");
    }

    #[test]
    fn draft_deserializes_with_all_fields_defaulted() {
        let draft: OrderDraft = serde_json::from_str("{}").expect("empty body decodes");
        assert_eq!(draft, OrderDraft::default());

        let partial: OrderDraft =
            serde_json::from_str(r#"{"item_quantity": 5}"#).expect("partial body decodes");
        assert_eq!(partial.item_quantity, 5);
        assert_eq!(partial.item_description, "");
    }
}
