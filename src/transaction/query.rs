//! The query string understood by `GET /transactions`.

use serde::{Deserialize, Serialize};

/// The direction to sort transactions in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Sort in order of increasing value.
    #[default]
    Asc,
    /// Sort in order of decreasing value.
    Desc,
}

impl SortOrder {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// The fields of a transaction that the collection can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// The backend assigned ID.
    Id,
    /// The description text.
    Description,
    /// Income or outcome.
    Type,
    /// The amount of money.
    Price,
    /// The category label.
    Category,
    /// The creation timestamp.
    CreatedAt,
}

impl SortField {
    /// The name of the field as it appears in the `_sort` parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Description => "description",
            SortField::Type => "type",
            SortField::Price => "price",
            SortField::Category => "category",
            SortField::CreatedAt => "createdAt",
        }
    }

    /// Look up a field from its `_sort` name, `None` for unknown names.
    pub fn from_query_value(value: &str) -> Option<Self> {
        [
            SortField::Id,
            SortField::Description,
            SortField::Type,
            SortField::Price,
            SortField::Category,
            SortField::CreatedAt,
        ]
        .into_iter()
        .find(|field| field.as_query_value() == value)
    }

    pub(crate) fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Description => "description",
            SortField::Type => "type",
            SortField::Price => "price",
            SortField::Category => "category",
            SortField::CreatedAt => "created_at",
        }
    }
}

/// Parameters for listing the transactions collection.
///
/// Field order matters: it is the order the parameters are written in the
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTransactionsQuery {
    /// The field to sort by.
    #[serde(rename = "_sort", default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// The sort direction, ascending if omitted.
    #[serde(rename = "_order", default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    /// Free text filter, matched by the backend against every field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl ListTransactionsQuery {
    /// The query used by the transaction store: newest transactions first,
    /// optionally filtered by `query`.
    pub fn newest_first(query: Option<&str>) -> Self {
        Self {
            sort: Some(SortField::CreatedAt.as_query_value().to_owned()),
            order: Some(SortOrder::Desc),
            q: query.map(str::to_owned),
        }
    }
}
