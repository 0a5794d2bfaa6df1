//! Canned `apply` payloads: equipment measurements and the equipment selector.
//!
//! Every `apply` entry tells the i-Reporter client which sheet/cluster of the
//! form to fill and with what value.

use serde::Serialize;

/// Identifier of the equipment that selects the alternate measurement set.
pub const PLCB_ID: &str = "PLCB";

/// Identifier of the default equipment.
pub const PLCA_ID: &str = "PLCA";

/// Sheet every canned value is written to.
pub const DEFAULT_SHEET: u32 = 1;

/// Cluster holding the equipment selector on the form.
pub const SELECT_CLUSTER: u32 = 18;

/// A value to apply to a form cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyItem {
    pub item: String,
    pub sheet: u32,
    pub cluster: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(rename = "selectItems", skip_serializing_if = "Option::is_none")]
    pub select_items: Option<Vec<SelectItem>>,
}

/// One choice of a selectable cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectItem {
    pub item: String,
    pub label: String,
    pub selected: bool,
}

/// Equipment profile chosen by the `plc_id` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equipment {
    PlcA,
    PlcB,
}

impl Equipment {
    /// Resolve a `plc_id`. Only `"PLCB"` selects PLC-B; anything else,
    /// including no value at all, falls back to PLC-A.
    pub fn from_plc_id(plc_id: Option<&str>) -> Self {
        match plc_id {
            Some(PLCB_ID) => Equipment::PlcB,
            _ => Equipment::PlcA,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Equipment::PlcA => PLCA_ID,
            Equipment::PlcB => PLCB_ID,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Equipment::PlcA => "設備 PLC-A",
            Equipment::PlcB => "設備 PLC-B",
        }
    }

    fn readings(&self) -> &'static [Reading; 4] {
        match self {
            Equipment::PlcA => &PLCA_READINGS,
            Equipment::PlcB => &PLCB_READINGS,
        }
    }

    /// The four measurement values of this equipment.
    pub fn measurements(&self) -> Vec<ApplyItem> {
        self.readings()
            .iter()
            .zip(1..)
            .map(|(reading, cluster)| ApplyItem {
                item: reading.item.to_string(),
                sheet: DEFAULT_SHEET,
                cluster,
                kind: "string".to_string(),
                value: reading.value.to_string(),
                select_items: None,
            })
            .collect()
    }
}

struct Reading {
    item: &'static str,
    value: &'static str,
}

const PLCA_READINGS: [Reading; 4] = [
    Reading {
        item: "sample-humidity",
        value: "50.4",
    },
    Reading {
        item: "sample-spin",
        value: "5000",
    },
    Reading {
        item: "sample-input-amount",
        value: "1000",
    },
    Reading {
        item: "sample-production-quantity",
        value: "500",
    },
];

const PLCB_READINGS: [Reading; 4] = [
    Reading {
        item: "sample-humidity",
        value: "65.8",
    },
    Reading {
        item: "sample-spin",
        value: "6500",
    },
    Reading {
        item: "sample-input-amount",
        value: "1500",
    },
    Reading {
        item: "sample-production-quantity",
        value: "750",
    },
];

/// The equipment selector, with PLC-A preselected.
pub fn equipment_selector() -> Vec<ApplyItem> {
    let default = Equipment::PlcA;
    let select_items = [Equipment::PlcA, Equipment::PlcB]
        .into_iter()
        .map(|equipment| SelectItem {
            item: equipment.id().to_string(),
            label: equipment.label().to_string(),
            selected: equipment == default,
        })
        .collect();

    vec![ApplyItem {
        item: "plca-select".to_string(),
        sheet: DEFAULT_SHEET,
        cluster: SELECT_CLUSTER,
        kind: "SetItemsToSelect".to_string(),
        value: default.id().to_string(),
        select_items: Some(select_items),
    }]
}
