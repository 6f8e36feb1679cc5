use serde::Deserialize;

/// SQL query builder for the product catalog listing
/// Builds a single parameterized query with filters, sorting, and pagination
pub struct CatalogQueryBuilder {
    base_query: String,
    where_clauses: Vec<String>,
    params: Vec<String>,
    order_clause: Option<String>,
    limit: u32,
    offset: u32,
}

impl CatalogQueryBuilder {
    /// Creates a new CatalogQueryBuilder with default values
    pub fn new() -> Self {
        Self {
            base_query: "SELECT id, title, slug, price, price_discount, weight, \
                         delivery_schedule, preorder_date, stock, created_at, updated_at \
                         FROM products"
                .to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_clause: None,
            limit: 10,
            offset: 0,
        }
    }

    /// Adds a search filter for partial title matching (case-insensitive)
    pub fn add_search_filter(&mut self, search: &str) {
        let param_index = self.params.len() + 1;
        self.where_clauses
            .push(format!("title ILIKE ${}", param_index));
        self.params.push(format!("%{}%", search));
    }

    /// Adds price range filters (min and/or max, both inclusive)
    /// Parameters are bound as text and cast to numeric in SQL
    pub fn add_price_range(&mut self, min: Option<f64>, max: Option<f64>) {
        if let Some(min_price) = min {
            let param_index = self.params.len() + 1;
            self.where_clauses
                .push(format!("price >= ${}::numeric", param_index));
            self.params.push(min_price.to_string());
        }

        if let Some(max_price) = max {
            let param_index = self.params.len() + 1;
            self.where_clauses
                .push(format!("price <= ${}::numeric", param_index));
            self.params.push(max_price.to_string());
        }
    }

    /// Sets the sort order for the query
    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        let field_name = match field {
            SortField::Price => "price",
            SortField::Title => "title",
        };

        let order_str = match order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        self.order_clause = Some(format!("{} {}", field_name, order_str));
    }

    /// Sets pagination parameters
    /// Calculates LIMIT and OFFSET based on page number and limit
    pub fn set_pagination(&mut self, page: u32, limit: u32) {
        self.limit = limit;
        self.offset = (page - 1) * limit;
    }

    /// Builds the final SQL query string with all parameters
    /// Returns a tuple of (query_string, parameters)
    pub fn build(&self) -> (String, Vec<String>) {
        let mut query = self.base_query.clone();

        if !self.where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(ref order) = self.order_clause {
            query.push_str(" ORDER BY ");
            query.push_str(order);
        } else {
            query.push_str(" ORDER BY id");
        }

        // LIMIT and OFFSET are appended as literals; PostgreSQL requires
        // integers here, not text parameters
        query.push_str(&format!(" LIMIT {}", self.limit));
        query.push_str(&format!(" OFFSET {}", self.offset));

        (query, self.params.clone())
    }
}

impl Default for CatalogQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Query parameters extracted from the HTTP request
/// All fields are optional to support flexible querying
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// Search term for partial title matching (case-insensitive)
    pub search: Option<String>,
    /// Minimum price filter (inclusive)
    pub min_price: Option<f64>,
    /// Maximum price filter (inclusive)
    pub max_price: Option<f64>,
    /// Sort field: "price" or "title"
    pub sort: Option<String>,
    /// Sort order: "asc" or "desc"
    pub order: Option<String>,
    /// Page number (1-indexed, defaults to 1)
    pub page: Option<u32>,
    /// Items per page (defaults to 10)
    pub limit: Option<u32>,
}

/// Sort field options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Price,
    Title,
}

/// Sort order options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Validated and normalized query parameters
#[derive(Debug)]
pub struct ValidatedQuery {
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_field: Option<SortField>,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

/// Validation error type for query parameters
#[derive(Debug)]
pub struct QueryError {
    pub message: String,
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for QueryError {}

/// Query parameter validator
pub struct QueryValidator;

impl QueryValidator {
    /// Validates and normalizes query parameters
    pub fn validate(params: QueryParams) -> Result<ValidatedQuery, QueryError> {
        let search = Self::normalize_string(params.search);

        let min_price = if let Some(price) = params.min_price {
            Self::validate_price(price, "min_price")?;
            Some(price)
        } else {
            None
        };

        let max_price = if let Some(price) = params.max_price {
            Self::validate_price(price, "max_price")?;
            Some(price)
        } else {
            None
        };

        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                return Err(QueryError {
                    message: "min_price cannot be greater than max_price".to_string(),
                });
            }
        }

        let sort_field = if let Some(sort_str) = params.sort {
            Some(Self::parse_sort_field(&sort_str)?)
        } else {
            None
        };

        let sort_order = if let Some(order_str) = params.order {
            Self::parse_sort_order(&order_str)?
        } else {
            SortOrder::Asc
        };

        let page = if let Some(p) = params.page {
            Self::validate_pagination_param(p, "page")?;
            p
        } else {
            1
        };

        let limit = if let Some(l) = params.limit {
            Self::validate_pagination_param(l, "limit")?;
            l
        } else {
            10
        };

        Ok(ValidatedQuery {
            search,
            min_price,
            max_price,
            sort_field,
            sort_order,
            page,
            limit,
        })
    }

    /// Normalizes string parameters by trimming whitespace
    /// Returns None if the string is empty or whitespace-only
    fn normalize_string(s: Option<String>) -> Option<String> {
        s.and_then(|s| {
            let trimmed = s.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        })
    }

    /// Validates that a price filter is a positive, finite number
    fn validate_price(price: f64, param_name: &str) -> Result<(), QueryError> {
        if price <= 0.0 {
            return Err(QueryError {
                message: format!("{} must be a positive number", param_name),
            });
        }
        if price.is_nan() || price.is_infinite() {
            return Err(QueryError {
                message: format!("{} must be a valid number", param_name),
            });
        }
        Ok(())
    }

    fn parse_sort_field(s: &str) -> Result<SortField, QueryError> {
        match s.to_lowercase().as_str() {
            "price" => Ok(SortField::Price),
            "title" => Ok(SortField::Title),
            _ => Err(QueryError {
                message: format!("Invalid sort field '{}'. Must be 'price' or 'title'", s),
            }),
        }
    }

    fn parse_sort_order(s: &str) -> Result<SortOrder, QueryError> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(QueryError {
                message: format!("Invalid sort order '{}'. Must be 'asc' or 'desc'", s),
            }),
        }
    }

    /// Pagination parameters must be greater than zero
    fn validate_pagination_param(value: u32, param_name: &str) -> Result<(), QueryError> {
        if value == 0 {
            return Err(QueryError {
                message: format!("{} must be a positive number (greater than 0)", param_name),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_filters_defaults() {
        let builder = CatalogQueryBuilder::new();
        let (query, params) = builder.build();

        assert!(query.contains("FROM products"));
        assert!(!query.contains("WHERE"));
        assert!(query.ends_with("ORDER BY id LIMIT 10 OFFSET 0"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_with_search_and_price_range() {
        let mut builder = CatalogQueryBuilder::new();
        builder.add_search_filter("salmon");
        builder.add_price_range(Some(100.0), Some(900.0));
        let (query, params) = builder.build();

        assert!(query.contains("title ILIKE $1"));
        assert!(query.contains("price >= $2::numeric"));
        assert!(query.contains("price <= $3::numeric"));
        assert_eq!(params, vec!["%salmon%", "100", "900"]);
    }

    #[test]
    fn test_build_with_sort_and_pagination() {
        let mut builder = CatalogQueryBuilder::new();
        builder.set_sort(SortField::Price, SortOrder::Desc);
        builder.set_pagination(3, 20);
        let (query, _) = builder.build();

        assert!(query.contains("ORDER BY price DESC"));
        assert!(query.contains("LIMIT 20"));
        assert!(query.contains("OFFSET 40"));
    }

    #[test]
    fn test_validator_applies_defaults() {
        let params = QueryParams {
            search: Some("  ".to_string()),
            min_price: None,
            max_price: None,
            sort: None,
            order: None,
            page: None,
            limit: None,
        };

        let validated = QueryValidator::validate(params).unwrap();
        assert!(validated.search.is_none());
        assert_eq!(validated.page, 1);
        assert_eq!(validated.limit, 10);
        assert_eq!(validated.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_validator_rejects_inverted_price_range() {
        let params = QueryParams {
            search: None,
            min_price: Some(500.0),
            max_price: Some(100.0),
            sort: None,
            order: None,
            page: None,
            limit: None,
        };

        assert!(QueryValidator::validate(params).is_err());
    }

    #[test]
    fn test_validator_rejects_unknown_sort_field() {
        let params = QueryParams {
            search: None,
            min_price: None,
            max_price: None,
            sort: Some("stock".to_string()),
            order: None,
            page: None,
            limit: None,
        };

        assert!(QueryValidator::validate(params).is_err());
    }
}
