//! Product master ("custom master") served by the `/api/v1/master/*` endpoints.
//!
//! - [`schema`] - field and parameter descriptors
//! - [`records`] - the fixed product table and its positional wire format
//! - [`filter`] - AND-conjunction equality filtering with the zero-match fallback

pub mod filter;
pub mod records;
pub mod schema;

pub use filter::{FilterSet, Selection, SelectionMode};
pub use records::{default_record, CustomRecord, FieldValue, ProductRecord, PRODUCTS};
pub use schema::{FieldDescriptor, FieldType, ParamDescriptor, PRODUCT_FIELDS, PRODUCT_PARAMS};
