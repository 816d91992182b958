//! Names of the raw datasets and derived tables, and the columns the cleaning
//! rules touch.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const ORDER_PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";
pub const PRODUCT_ID: &str = "product_id";
pub const PRODUCT_CATEGORY_NAME: &str = "product_category_name";
pub const CUSTOMER_STATE: &str = "customer_state";

/// Filler for products without a category.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Accepted purchase timestamp layouts, tried in order.
///
/// Date-only values parse as midnight.
pub const PURCHASE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d",
];

/// A raw CSV input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Orders,
    OrderItems,
    Products,
    Customers,
}

impl Dataset {
    pub const ALL: [Dataset; 4] = [
        Dataset::Orders,
        Dataset::OrderItems,
        Dataset::Products,
        Dataset::Customers,
    ];

    /// Logical name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::OrderItems => "order_items",
            Self::Products => "products",
            Self::Customers => "customers",
        }
    }

    /// File name under the raw data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Orders => "olist_orders_dataset.csv",
            Self::OrderItems => "olist_order_items_dataset.csv",
            Self::Products => "olist_products_dataset.csv",
            Self::Customers => "olist_customers_dataset.csv",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A derived table written by the transformer and loaded into the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    FactOrders,
    FactOrderDetails,
    DimProducts,
    DimCustomers,
}

impl Table {
    /// Order in which the transformer writes snapshots.
    pub const ALL: [Table; 4] = [
        Table::FactOrders,
        Table::FactOrderDetails,
        Table::DimProducts,
        Table::DimCustomers,
    ];

    /// Order in which the loader writes tables: child before parent, then dimensions.
    pub const LOAD_ORDER: [Table; 4] = [
        Table::FactOrderDetails,
        Table::FactOrders,
        Table::DimProducts,
        Table::DimCustomers,
    ];

    /// Name of both the snapshot file stem and the database table.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FactOrders => "fact_orders",
            Self::FactOrderDetails => "fact_order_details",
            Self::DimProducts => "dim_products",
            Self::DimCustomers => "dim_customers",
        }
    }

    pub fn snapshot_file_name(&self) -> String {
        format!("{}.parquet", self.name())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_order_puts_details_before_orders() {
        let pos = |t: Table| Table::LOAD_ORDER.iter().position(|x| *x == t).unwrap();
        assert!(pos(Table::FactOrderDetails) < pos(Table::FactOrders));
        assert_eq!(Table::LOAD_ORDER.len(), Table::ALL.len());
        for table in Table::ALL {
            assert!(Table::LOAD_ORDER.contains(&table));
        }
    }

    #[test]
    fn test_snapshot_file_name() {
        assert_eq!(
            Table::FactOrderDetails.snapshot_file_name(),
            "fact_order_details.parquet"
        );
    }

    #[test]
    fn test_dataset_file_names() {
        assert_eq!(Dataset::Orders.file_name(), "olist_orders_dataset.csv");
        assert_eq!(Dataset::OrderItems.to_string(), "order_items");
    }
}
