//! Field and parameter descriptors of the product master.
//!
//! The i-Reporter client uses the field list to map the positional
//! `{no, value}` pairs of a record back to named columns, so the order of
//! [`PRODUCT_FIELDS`] is part of the wire contract.

use serde::Serialize;

/// Column type of a master field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Numeric,
    Bool,
    Date,
}

/// One column of the product master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// 1-based position of the column in every record
    pub no: u32,

    /// Column name
    pub name: &'static str,

    /// Column type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Form item the column is bound to on the client
    pub item: &'static str,
}

impl FieldDescriptor {
    const fn new(no: u32, name: &'static str, field_type: FieldType) -> Self {
        Self {
            no,
            name,
            field_type,
            item: name,
        }
    }
}

/// A parameter the client may send when querying the master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamDescriptor {
    pub name: &'static str,

    #[serde(rename = "type")]
    pub param_type: &'static str,
}

/// Columns of the product master, in record order.
pub const PRODUCT_FIELDS: [FieldDescriptor; 7] = [
    FieldDescriptor::new(1, "product_id", FieldType::Text),
    FieldDescriptor::new(2, "product_name", FieldType::Text),
    FieldDescriptor::new(3, "category", FieldType::Text),
    FieldDescriptor::new(4, "price", FieldType::Numeric),
    FieldDescriptor::new(5, "stock_quantity", FieldType::Numeric),
    FieldDescriptor::new(6, "is_active", FieldType::Bool),
    FieldDescriptor::new(7, "created_date", FieldType::Date),
];

/// Parameters accepted by the product master.
pub const PRODUCT_PARAMS: [ParamDescriptor; 1] = [ParamDescriptor {
    name: "product_id",
    param_type: "string",
}];
