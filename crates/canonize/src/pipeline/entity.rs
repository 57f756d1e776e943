//! Declarative cleaning pipelines, one per entity.
//!
//! Each [`EntitySpec`] lists the columns to drop, the ordered column rules,
//! an optional derived column and the required-field condition. The engine in
//! [`super::engine`] is the only interpreter of these descriptions.

use serde::Serialize;

use super::rules::Rule;
use crate::schema::EntityKind;

/// A rule bound to a named column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnRule {
    /// Column the rule reads and writes.
    pub column: &'static str,
    /// Conversion to apply.
    pub rule: Rule,
    /// Render the cell as text before applying the rule.
    pub text_first: bool,
}

impl ColumnRule {
    /// Bind `rule` to `column`.
    pub const fn new(column: &'static str, rule: Rule) -> Self {
        Self {
            column,
            rule,
            text_first: false,
        }
    }

    /// Coerce the raw cell to text before the rule sees it.
    pub const fn text_first(mut self) -> Self {
        self.text_first = true;
        self
    }
}

/// A column computed from another one, which is then dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Derivation {
    /// Source column, removed from the output.
    pub from: &'static str,
    /// Column written with the derived value.
    pub into: &'static str,
    /// Rule applied to the source column.
    pub rule: Rule,
    /// Rule applied to an existing `into` column when `from` is absent.
    pub reparse: Rule,
}

/// Which nulls remove a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Every group must have at least one non-null column.
    Columns(&'static [&'static [&'static str]]),
    /// No column may be null.
    AllColumns,
}

impl Requirement {
    /// Human-readable form, e.g. `longitude AND (latitude OR lat)`.
    pub fn describe(&self) -> String {
        match self {
            Requirement::AllColumns => "all columns".to_string(),
            Requirement::Columns(groups) => groups
                .iter()
                .map(|group| match group {
                    [single] => single.to_string(),
                    many => format!("({})", many.join(" OR ")),
                })
                .collect::<Vec<_>>()
                .join(" AND "),
        }
    }
}

/// The full cleaning description for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntitySpec {
    /// Entity this pipeline cleans.
    pub kind: EntityKind,
    /// Columns removed unconditionally.
    pub drop_columns: &'static [&'static str],
    /// Per-column rules in application order.
    pub rules: &'static [ColumnRule],
    /// Optional derived column.
    pub derive: Option<Derivation>,
    /// Required-field condition.
    pub required: Requirement,
    /// Column whose distinct values are counted before and after cleaning.
    pub distinct_key: Option<&'static str>,
}

impl EntitySpec {
    /// Look up the pipeline for an entity.
    pub fn for_kind(kind: EntityKind) -> &'static EntitySpec {
        match kind {
            EntityKind::User => &USER,
            EntityKind::Card => &CARD,
            EntityKind::Store => &STORE,
            EntityKind::Product => &PRODUCT,
            EntityKind::Order => &ORDER,
            EntityKind::DateTime => &DATE_TIME,
        }
    }

    /// Rule bound to a column, if any.
    pub fn rule_for(&self, column: &str) -> Option<&ColumnRule> {
        self.rules.iter().find(|r| r.column == column)
    }
}

static USER: EntitySpec = EntitySpec {
    kind: EntityKind::User,
    drop_columns: &[],
    rules: &[
        ColumnRule::new("user_uuid", Rule::Uuid).text_first(),
        ColumnRule::new("date_of_birth", Rule::Date).text_first(),
        ColumnRule::new("join_date", Rule::Date).text_first(),
    ],
    derive: None,
    required: Requirement::Columns(&[&["user_uuid"]]),
    distinct_key: Some("user_uuid"),
};

static CARD: EntitySpec = EntitySpec {
    kind: EntityKind::Card,
    drop_columns: &[],
    rules: &[
        ColumnRule::new("card_number", Rule::CardNumber),
        ColumnRule::new("expiry_date", Rule::ExpiryDate),
        ColumnRule::new("date_payment_confirmed", Rule::Date),
    ],
    derive: None,
    required: Requirement::Columns(&[&["card_number"]]),
    distinct_key: Some("card_number"),
};

static STORE: EntitySpec = EntitySpec {
    kind: EntityKind::Store,
    drop_columns: &[],
    rules: &[
        ColumnRule::new("longitude", Rule::Float),
        ColumnRule::new("latitude", Rule::Float),
        ColumnRule::new("lat", Rule::Float),
        ColumnRule::new("staff_numbers", Rule::Int),
        ColumnRule::new("opening_date", Rule::Date),
    ],
    derive: None,
    required: Requirement::Columns(&[&["longitude"], &["latitude", "lat"]]),
    distinct_key: Some("store_code"),
};

static PRODUCT: EntitySpec = EntitySpec {
    kind: EntityKind::Product,
    drop_columns: &[],
    rules: &[
        ColumnRule::new("product_price", Rule::Price),
        ColumnRule::new("weight", Rule::Weight),
        ColumnRule::new("date_added", Rule::Date),
        ColumnRule::new("uuid", Rule::Uuid),
    ],
    derive: Some(Derivation {
        from: "removed",
        into: "still_available",
        rule: Rule::Availability,
        reparse: Rule::Boolean,
    }),
    required: Requirement::Columns(&[&["product_code"]]),
    distinct_key: Some("product_code"),
};

static ORDER: EntitySpec = EntitySpec {
    kind: EntityKind::Order,
    drop_columns: &["first_name", "last_name", "1", "level_0"],
    rules: &[
        ColumnRule::new("date_uuid", Rule::Uuid),
        ColumnRule::new("user_uuid", Rule::Uuid),
        ColumnRule::new("card_number", Rule::CardNumber),
        ColumnRule::new("product_quantity", Rule::Int),
    ],
    derive: None,
    required: Requirement::Columns(&[&["card_number"]]),
    distinct_key: Some("card_number"),
};

static DATE_TIME: EntitySpec = EntitySpec {
    kind: EntityKind::DateTime,
    drop_columns: &[],
    rules: &[ColumnRule::new("date_uuid", Rule::Uuid)],
    derive: None,
    required: Requirement::AllColumns,
    distinct_key: Some("date_uuid"),
};
