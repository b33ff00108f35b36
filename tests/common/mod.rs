//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use bigdecimal::BigDecimal;
use xmlbind::{BindError, Binder, TypeDescriptor};

pub const PURCHASE_ORDER: &str = r#"<?xml version="1.0"?>
<purchaseOrder orderDate="1999-10-20" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <shipTo country="US">
    <name>Alice Smith</name>
    <street>123 Maple Street</street>
    <city>Mill Valley</city>
    <state>CA</state>
    <zip>90952</zip>
  </shipTo>
  <billTo country="US">
    <name>Robert Smith</name>
    <street>8 Oak Avenue</street>
    <city>Old Town</city>
    <state>PA</state>
    <zip>95819</zip>
  </billTo>
  <!-- hurry -->
  <comment>Hurry, my lawn is going wild!</comment>
  <items>
    <item partNum="872-AA">
      <productName>Lawnmower</productName>
      <quantity>1</quantity>
      <USPrice>148.95</USPrice>
      <comment>Confirm this is electric</comment>
    </item>
    <item partNum="926-AA">
      <productName>Baby Monitor</productName>
      <quantity>1</quantity>
      <USPrice>39.98</USPrice>
      <shipDate>1999-05-21</shipDate>
    </item>
  </items>
</purchaseOrder>
"#;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Address {
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: i64,
    pub country: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Item {
    pub part_num: String,
    pub product_name: String,
    pub quantity: i32,
    pub price: BigDecimal,
    pub comment: Option<String>,
    pub ship_date: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PurchaseOrder {
    pub order_date: String,
    pub ship_to: Address,
    pub bill_to: Address,
    pub comment: String,
    pub items: Vec<Item>,
}

pub fn address() -> Result<TypeDescriptor<Address>, BindError> {
    TypeDescriptor::builder("Address")
        .default_constructor()
        .field("name", "name", |a: &mut Address, v: String| a.name = v)
        .field("street", "street", |a: &mut Address, v: String| a.street = v)
        .field("city", "city", |a: &mut Address, v: String| a.city = v)
        .field("state", "state", |a: &mut Address, v: String| a.state = v)
        .field("zip", "zip", |a: &mut Address, v: i64| a.zip = v)
        .field("country", "@country", |a: &mut Address, v: String| a.country = v)
        .build()
}

pub fn item() -> Result<TypeDescriptor<Item>, BindError> {
    TypeDescriptor::builder("Item")
        .default_constructor()
        .field("part_num", "@partNum", |i: &mut Item, v: String| i.part_num = v)
        .field("product_name", "productName", |i: &mut Item, v: String| i.product_name = v)
        .field("quantity", "quantity", |i: &mut Item, v: i32| i.quantity = v)
        .field("price", "USPrice", |i: &mut Item, v: BigDecimal| i.price = v)
        .field("comment", "comment", |i: &mut Item, v: Option<String>| i.comment = v)
        .field("ship_date", "shipDate", |i: &mut Item, v: Option<String>| i.ship_date = v)
        .build()
}

pub fn purchase_order() -> Result<Binder<PurchaseOrder>, BindError> {
    let address = Arc::new(address()?);
    let descriptor = TypeDescriptor::builder("PurchaseOrder")
        .root("/purchaseOrder")
        .default_constructor()
        .field("order_date", "@orderDate", |p: &mut PurchaseOrder, v: String| p.order_date = v)
        .object("ship_to", "shipTo", Arc::clone(&address), |p: &mut PurchaseOrder, v: Address| {
            p.ship_to = v
        })
        .object("bill_to", "billTo", address, |p: &mut PurchaseOrder, v: Address| p.bill_to = v)
        .field("comment", "comment", |p: &mut PurchaseOrder, v: String| p.comment = v)
        .object_list("items", "items/item", item()?, |p: &mut PurchaseOrder, v: Vec<Item>| {
            p.items = v
        })
        .build()?;
    Ok(Binder::new(descriptor))
}
