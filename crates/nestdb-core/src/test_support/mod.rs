//! Shared test scaffolding: a customer/order/item/address schema and
//! instrumented store adapters.

mod probe;

pub(crate) use probe::{Probe, ScriptedAdapter};

use crate::{
    db::{
        hkey::HKey,
        row::{IndexRow, Row, TableRow},
        store::MemoryStore,
    },
    model::{HKeySegmentSource, IndexId, IndexToHKey, RowTypeId, Schema},
    value::Value,
};

///
/// Coi
///
/// customer ─┬─ order ── item
///           └─ address
///
/// Every table has one integer key column. `item_by_sku` entries are
/// `[sku, customer, order, item]`.
///

pub(crate) struct Coi {
    pub(crate) schema: Schema,
    pub(crate) customer: RowTypeId,
    pub(crate) order: RowTypeId,
    pub(crate) item: RowTypeId,
    pub(crate) address: RowTypeId,
    pub(crate) item_by_sku: IndexId,
}

impl Coi {
    pub(crate) fn new() -> Self {
        let mut builder = Schema::builder();
        let customer = builder.table("customer", None, 1).expect("customer");
        let order = builder.table("order", Some(customer), 1).expect("order");
        let item = builder.table("item", Some(order), 1).expect("item");
        let address = builder.table("address", Some(customer), 1).expect("address");
        let item_by_sku = builder
            .index(
                "item_by_sku",
                item,
                4,
                IndexToHKey::new(vec![
                    HKeySegmentSource::new(customer, vec![1]),
                    HKeySegmentSource::new(order, vec![2]),
                    HKeySegmentSource::new(item, vec![3]),
                ]),
            )
            .expect("item_by_sku");

        Self {
            schema: builder.build(),
            customer,
            order,
            item,
            address,
            item_by_sku,
        }
    }

    // Table row whose values are its full key path.
    fn table_row(&self, row_type: RowTypeId, path: &[(RowTypeId, i64)]) -> Row {
        let values = path.iter().map(|(_, key)| Value::Int(*key)).collect();

        Row::Table(TableRow::new(&self.schema, row_type, hkey_of(path), values))
    }

    pub(crate) fn customer_row(&self, customer: i64) -> Row {
        self.table_row(self.customer, &[(self.customer, customer)])
    }

    pub(crate) fn order_row(&self, customer: i64, order: i64) -> Row {
        self.table_row(
            self.order,
            &[(self.customer, customer), (self.order, order)],
        )
    }

    pub(crate) fn item_row(&self, customer: i64, order: i64, item: i64) -> Row {
        self.table_row(
            self.item,
            &[
                (self.customer, customer),
                (self.order, order),
                (self.item, item),
            ],
        )
    }

    pub(crate) fn address_row(&self, customer: i64, address: i64) -> Row {
        self.table_row(
            self.address,
            &[(self.customer, customer), (self.address, address)],
        )
    }

    pub(crate) fn item_entry(&self, sku: &str, customer: i64, order: i64, item: i64) -> Row {
        Row::Index(IndexRow::new(
            self.schema.index(self.item_by_sku).clone(),
            vec![
                Value::from(sku),
                Value::Int(customer),
                Value::Int(order),
                Value::Int(item),
            ],
        ))
    }

    /// Store holding every given table row plus the `item_by_sku` entry of
    /// each item row (sku = `sku-<item>`).
    pub(crate) fn store(&self, rows: impl IntoIterator<Item = Row>) -> MemoryStore {
        let mut store = MemoryStore::new();
        let index = self.schema.index(self.item_by_sku).clone();
        for row in rows {
            let Row::Table(row) = row else {
                panic!("store fixture only takes table rows");
            };
            if row.row_type() == self.item {
                let keys = row.base().values().to_vec();
                let sku = match keys.last() {
                    Some(Value::Int(item)) => format!("sku-{item}"),
                    _ => panic!("item rows end with their integer key"),
                };
                let mut entry = vec![Value::from(sku)];
                entry.extend(keys);
                store
                    .insert_index_entry(&index, entry)
                    .expect("fixture index entry should insert");
            }
            store.insert_row(row).expect("fixture row should insert");
        }

        store
    }
}

/// HKey with one integer key column per segment.
pub(crate) fn hkey_of(path: &[(RowTypeId, i64)]) -> HKey {
    let mut hkey = HKey::new();
    for (table, key) in path {
        hkey.push_segment(*table, [Value::Int(*key)]);
    }

    hkey
}
