//! Cleaning rules that turn the raw datasets into the four derived tables.
//!
//! - `orders`: drop rows without a purchase timestamp, parse the rest
//! - `products`: fill missing category names with "Unknown"
//! - `order_items` x `products`: many-to-one left join on `product_id`
//! - `customers`: upper-case state codes

mod converters;
mod validators;

pub use validators::{StateCodeCheck, check_state_codes, duplicate_key_count, require_columns};

use crate::error::{EtlError, Result, ResultExt};
use crate::tables::{
    CUSTOMER_STATE, Dataset, ORDER_PURCHASE_TIMESTAMP, PRODUCT_CATEGORY_NAME, PRODUCT_ID,
    PURCHASE_TIMESTAMP_FORMATS, Table, UNKNOWN_CATEGORY,
};
use converters::{fill_string_nulls, parse_datetime, uppercase_strings};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Temporary column that pins the left side's row order through the join.
const ROW_INDEX: &str = "__etl_row_index";

/// Drop orders with a null purchase timestamp and parse the rest to datetimes.
pub fn clean_orders(orders: DataFrame) -> Result<DataFrame> {
    require_columns(&orders, Dataset::Orders.name(), &[ORDER_PURCHASE_TIMESTAMP])?;

    let before = orders.height();
    let mask = orders.column(ORDER_PURCHASE_TIMESTAMP)?.is_not_null();
    let mut orders = orders.filter(&mask)?;
    let dropped = before - orders.height();
    if dropped > 0 {
        info!(
            "Dropped {} of {} orders without a purchase timestamp",
            dropped, before
        );
    }

    let parsed = parse_datetime(
        orders
            .column(ORDER_PURCHASE_TIMESTAMP)?
            .as_materialized_series(),
        PURCHASE_TIMESTAMP_FORMATS,
    )
    .context("Parsing order purchase timestamps")?;
    orders.replace(ORDER_PURCHASE_TIMESTAMP, parsed)?;

    debug!("fact_orders: {:?}", orders.shape());
    Ok(orders)
}

/// Replace missing product category names with [`UNKNOWN_CATEGORY`].
pub fn clean_products(products: DataFrame) -> Result<DataFrame> {
    require_columns(
        &products,
        Dataset::Products.name(),
        &[PRODUCT_ID, PRODUCT_CATEGORY_NAME],
    )?;

    let mut products = products;
    let category = products
        .column(PRODUCT_CATEGORY_NAME)?
        .as_materialized_series()
        .clone();
    let missing = category.null_count();
    if missing > 0 {
        products.replace(
            PRODUCT_CATEGORY_NAME,
            fill_string_nulls(&category, UNKNOWN_CATEGORY)?,
        )?;
        info!(
            "Filled {} missing product categories with '{}'",
            missing, UNKNOWN_CATEGORY
        );
    }

    Ok(products)
}

/// Left join order items with cleaned products on `product_id`.
///
/// The join must be many-to-one: if any product id occurs twice in
/// `products` the run fails instead of fanning out order items. The result
/// keeps the row order of `order_items`.
pub fn join_order_details(order_items: &DataFrame, products: &DataFrame) -> Result<DataFrame> {
    require_columns(order_items, Dataset::OrderItems.name(), &[PRODUCT_ID])?;
    require_columns(products, Dataset::Products.name(), &[PRODUCT_ID])?;

    let duplicate_keys = duplicate_key_count(products, PRODUCT_ID)?;
    if duplicate_keys > 0 {
        return Err(EtlError::JoinCardinality {
            table: Dataset::Products.name().to_string(),
            key: PRODUCT_ID.to_string(),
            duplicate_keys,
        });
    }

    let details = order_items
        .with_row_index(ROW_INDEX.into(), None)?
        .left_join(products, [PRODUCT_ID], [PRODUCT_ID])
        .context(format!("Joining {} with {}", Dataset::OrderItems, Dataset::Products))?
        .sort([ROW_INDEX], SortMultipleOptions::default())?
        .drop(ROW_INDEX)?;

    if details.height() != order_items.height() {
        return Err(EtlError::JoinCardinality {
            table: Table::FactOrderDetails.name().to_string(),
            key: PRODUCT_ID.to_string(),
            duplicate_keys: details.height().saturating_sub(order_items.height()),
        });
    }

    let unmatched = details.column(PRODUCT_CATEGORY_NAME).map_or(0, |c| c.null_count());
    if unmatched > 0 {
        warn!("{} order items reference unknown products", unmatched);
    }

    debug!("fact_order_details: {:?}", details.shape());
    Ok(details)
}

/// Upper-case customer state codes.
pub fn clean_customers(customers: DataFrame) -> Result<DataFrame> {
    require_columns(&customers, Dataset::Customers.name(), &[CUSTOMER_STATE])?;

    let mut customers = customers;
    let upper = uppercase_strings(customers.column(CUSTOMER_STATE)?.as_materialized_series())?;
    let check = check_state_codes(&upper)?;
    if check.invalid > 0 || check.missing > 0 {
        warn!(
            "{} customer state codes are not two upper-case letters, {} are missing",
            check.invalid, check.missing
        );
    }
    customers.replace(CUSTOMER_STATE, upper)?;

    Ok(customers)
}
