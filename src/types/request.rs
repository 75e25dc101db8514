use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Fixed page size for every list operation.
pub const PAGE_SIZE: u64 = 20;

#[derive(Debug)]
pub enum ResourceRequest {
    Put(String),
    Patch(String, String),
    Get(String),
    List(Query),
    Delete(String),
}

impl ResourceRequest {
    pub fn verb(&self) -> &'static str {
        match self {
            ResourceRequest::Put(_) => "create",
            ResourceRequest::Patch(_, _) => "update",
            ResourceRequest::Get(_) => "read",
            ResourceRequest::List(_) => "read",
            ResourceRequest::Delete(_) => "delete",
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(
            self,
            ResourceRequest::Put(_) | ResourceRequest::Patch(_, _) | ResourceRequest::Delete(_)
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl SortOrder {
    fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// List query options sent by the caller. The organization scope is never
/// taken from the wire, the dispatcher fills it in from the authenticated
/// principal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Query {
    pub page: Option<i64>,

    pub search: Option<String>,

    pub sort: Option<String>,

    pub order: Option<SortOrder>,

    #[serde(skip)]
    pub org: Option<String>,
}

impl Query {
    /// Page numbers at or below zero normalize to the first page.
    pub fn page(&self) -> u64 {
        match self.page {
            Some(page) if page > 1 => page as u64,
            _ => 1,
        }
    }

    pub fn generate_where(&self, search_field: &str) -> String {
        let mut where_clause = vec![];
        if self.search.is_some() {
            where_clause.push(format!("{search_field} LIKE ? COLLATE NOCASE"));
        }
        if self.org.is_some() {
            where_clause.push("organization_id = ?".to_string());
        }
        if where_clause.is_empty() {
            String::new()
        } else {
            format!("WHERE {} ", where_clause.join(" AND "))
        }
    }

    /// Builds the ORDER BY clause. The sort column must be in `columns`,
    /// anything else silently falls back to the primary key ascending so
    /// caller-supplied strings never reach the SQL text.
    pub fn generate_order(&self, columns: &[&'static str], primary_key: &'static str) -> String {
        let column = match self.sort.as_deref() {
            Some(sort) => match columns.iter().find(|c| **c == sort) {
                Some(column) => column,
                None => return format!("ORDER BY {primary_key} ASC "),
            },
            None => return format!("ORDER BY {primary_key} ASC "),
        };
        let order = self.order.unwrap_or_default();
        format!("ORDER BY {column} {} ", order.sql())
    }

    pub fn generate_limit(&self) -> &'static str {
        "LIMIT ? OFFSET ?"
    }

    /// Parameters for the WHERE clause only (used by count queries).
    pub fn where_params(&self) -> Vec<Value> {
        let mut params = vec![];
        if let Some(ref search) = self.search {
            params.push(Value::Text(format!("%{search}%")));
        }
        if let Some(ref org) = self.org {
            params.push(Value::Text(org.clone()));
        }
        params
    }

    /// Parameters for the full list query, WHERE then LIMIT/OFFSET.
    pub fn params(&self) -> Vec<Value> {
        let mut params = self.where_params();
        let page = self.page();
        params.push(Value::Integer(PAGE_SIZE as i64));
        params.push(Value::Integer(((page - 1) * PAGE_SIZE) as i64));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_normalize() {
        let mut query = Query::default();
        assert_eq!(query.page(), 1);

        query.page = Some(0);
        assert_eq!(query.page(), 1);

        query.page = Some(-3);
        assert_eq!(query.page(), 1);

        query.page = Some(4);
        assert_eq!(query.page(), 4);
    }

    #[test]
    fn test_generate_where() {
        let mut query = Query::default();
        assert_eq!(query.generate_where("nome"), "");

        query.org = Some("org_1".to_string());
        assert_eq!(query.generate_where("nome"), "WHERE organization_id = ? ");

        query.search = Some("acme".to_string());
        assert_eq!(
            query.generate_where("nome"),
            "WHERE nome LIKE ? COLLATE NOCASE AND organization_id = ? "
        );
    }

    #[test]
    fn test_generate_order_allow_list() {
        const COLUMNS: &[&str] = &["nome", "create_time"];

        let mut query = Query {
            sort: Some("nome".to_string()),
            order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(query.generate_order(COLUMNS, "id"), "ORDER BY nome DESC ");

        // Columns outside the allow-list fall back to the primary key
        query.sort = Some("nome; DROP TABLE client".to_string());
        assert_eq!(query.generate_order(COLUMNS, "id"), "ORDER BY id ASC ");

        query.sort = None;
        assert_eq!(query.generate_order(COLUMNS, "id"), "ORDER BY id ASC ");
    }

    #[test]
    fn test_params_pagination() {
        let query = Query {
            page: Some(3),
            org: Some("org_1".to_string()),
            ..Default::default()
        };
        let params = query.params();
        assert_eq!(params.len(), 3);
        assert!(matches!(params[1], Value::Integer(n) if n == PAGE_SIZE as i64));
        assert!(matches!(params[2], Value::Integer(n) if n == 2 * PAGE_SIZE as i64));
    }
}
