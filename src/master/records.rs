//! The fixed product table and its positional wire format.

use serde::Serialize;

use super::schema::PRODUCT_FIELDS;

/// A row of the product master. Every column is carried as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductRecord {
    pub product_id: &'static str,
    pub product_name: &'static str,
    pub category: &'static str,
    pub price: &'static str,
    pub stock_quantity: &'static str,
    pub is_active: &'static str,
    pub created_date: &'static str,
}

impl ProductRecord {
    /// Value of the named column, or `None` if the record has no such column.
    pub fn field(&self, name: &str) -> Option<&'static str> {
        match name {
            "product_id" => Some(self.product_id),
            "product_name" => Some(self.product_name),
            "category" => Some(self.category),
            "price" => Some(self.price),
            "stock_quantity" => Some(self.stock_quantity),
            "is_active" => Some(self.is_active),
            "created_date" => Some(self.created_date),
            _ => None,
        }
    }

    /// Reshape into `{fields: [{no, value}, ...]}` following [`PRODUCT_FIELDS`].
    pub fn to_custom_record(&self) -> CustomRecord {
        let fields = PRODUCT_FIELDS
            .iter()
            .map(|descriptor| FieldValue {
                no: descriptor.no,
                value: self.field(descriptor.name).unwrap_or_default(),
            })
            .collect();

        CustomRecord { fields }
    }
}

/// A single positional column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldValue {
    pub no: u32,
    pub value: &'static str,
}

/// A record as sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomRecord {
    pub fields: Vec<FieldValue>,
}

/// The product table. Never mutated.
pub const PRODUCTS: [ProductRecord; 5] = [
    ProductRecord {
        product_id: "1001",
        product_name: "製品A",
        category: "電子部品",
        price: "15000",
        stock_quantity: "150",
        is_active: "true",
        created_date: "2024/01/15",
    },
    ProductRecord {
        product_id: "1002",
        product_name: "製品B",
        category: "電子部品",
        price: "12000",
        stock_quantity: "80",
        is_active: "true",
        created_date: "2024/02/10",
    },
    ProductRecord {
        product_id: "1003",
        product_name: "製品C",
        category: "機械部品",
        price: "5000",
        stock_quantity: "300",
        is_active: "false",
        created_date: "2024/03/05",
    },
    ProductRecord {
        product_id: "1004",
        product_name: "製品D",
        category: "テストカテゴリ",
        price: "0",
        stock_quantity: "0",
        is_active: "true",
        created_date: "2025/01/01",
    },
    ProductRecord {
        product_id: "1005",
        product_name: "製品E",
        category: "消耗品",
        price: "200",
        stock_quantity: "5000",
        is_active: "true",
        created_date: "2024/04/01",
    },
];

/// The sample record advertised as `defaultRecord`.
pub fn default_record() -> &'static ProductRecord {
    &PRODUCTS[0]
}
