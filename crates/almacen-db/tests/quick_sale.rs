//! End-to-end quick sale against an in-memory database.

use almacen_core::{Cart, CoreError, InvoiceType, Money, Product, TaxRate};
use almacen_db::{Database, DbConfig, SaleError};

async fn db_with(products: &[(&str, i64, i64)]) -> (Database, Vec<Product>) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let mut inserted = Vec::new();
    for (name, price_cents, stock) in products {
        let product = db
            .products()
            .insert(&Product::new(*name, *price_cents, *stock))
            .await
            .unwrap();
        inserted.push(product);
    }
    (db, inserted)
}

async fn stock_of(db: &Database, product: &Product) -> i64 {
    db.products()
        .get_by_id(&product.id)
        .await
        .unwrap()
        .unwrap()
        .stock
}

#[tokio::test]
async fn sale_creates_one_invoice_matching_the_cart() {
    let (db, p) = db_with(&[("A", 1000, 5), ("B", 500, 3), ("C", 333, 10)]).await;
    let mut cart = Cart::new(TaxRate::from_bps(1600));
    cart.add_item(&p[0], 2).unwrap();
    cart.add_item(&p[1], 3).unwrap();
    cart.add_item(&p[2], 1).unwrap();
    let expected = cart.totals();
    let line_count = cart.line_count();

    let id = db.sales().process_sale(&mut cart, "Ana").await.unwrap();

    assert!(cart.is_empty());
    assert_eq!(db.invoices().count().await.unwrap(), 1);

    let detail = db.invoices().get_with_items(&id).await.unwrap().unwrap();
    assert_eq!(detail.invoice.customer_name, "Ana");
    assert_eq!(detail.invoice.invoice_type, InvoiceType::Sale);
    assert_eq!(detail.invoice.total(), expected.total);
    assert_eq!(detail.invoice.subtotal_cents, expected.subtotal.cents());
    assert_eq!(detail.items.len(), line_count);
    assert_eq!(detail.items_subtotal(), expected.subtotal);
    assert!(detail.is_consistent());

    let quantities: Vec<(String, i64)> = detail
        .items
        .iter()
        .map(|i| (i.product_name.clone(), i.quantity))
        .collect();
    assert_eq!(
        quantities,
        [("A".to_string(), 2), ("B".to_string(), 3), ("C".to_string(), 1)]
    );

    assert_eq!(stock_of(&db, &p[0]).await, 3);
    assert_eq!(stock_of(&db, &p[1]).await, 0);
    assert_eq!(stock_of(&db, &p[2]).await, 9);
}

#[tokio::test]
async fn failure_on_second_line_changes_nothing() {
    let (db, p) = db_with(&[("A", 1000, 5), ("B", 500, 3), ("C", 333, 10)]).await;
    let mut cart = Cart::new(TaxRate::from_bps(1600));
    cart.add_item(&p[0], 2).unwrap();
    cart.add_item(&p[1], 3).unwrap();
    cart.add_item(&p[2], 1).unwrap();

    // Someone else sells B after the cart was built
    db.products().adjust_stock(&p[1].id, -2).await.unwrap();

    let err = db.sales().process_sale(&mut cart, "Ana").await.unwrap_err();
    assert!(matches!(
        err,
        SaleError::Core(CoreError::InsufficientStock {
            available: 1,
            requested: 3,
            ..
        })
    ));

    assert_eq!(stock_of(&db, &p[0]).await, 5);
    assert_eq!(stock_of(&db, &p[1]).await, 1);
    assert_eq!(stock_of(&db, &p[2]).await, 10);
    assert_eq!(db.invoices().count().await.unwrap(), 0);
    assert!(db.invoices().list(10).await.unwrap().is_empty());
    assert_eq!(cart.line_count(), 3);

    // The same cart goes through once stock is back
    db.products().adjust_stock(&p[1].id, 2).await.unwrap();
    db.sales().process_sale(&mut cart, "Ana").await.unwrap();
    assert_eq!(db.invoices().count().await.unwrap(), 1);
    assert_eq!(stock_of(&db, &p[1]).await, 0);
}

#[tokio::test]
async fn invoice_keeps_price_snapshot_after_repricing() {
    let (db, p) = db_with(&[("Funda iPhone 15 Pro", 8000, 100)]).await;
    let mut cart = Cart::new(TaxRate::from_bps(1600));
    cart.add_item(&p[0], 2).unwrap();
    let id = db.sales().process_sale(&mut cart, "Luis").await.unwrap();

    let mut repriced = db.products().get_by_id(&p[0].id).await.unwrap().unwrap();
    repriced.price_cents = 9500;
    repriced.name = "Funda iPhone 15 Pro (nueva)".to_string();
    db.products().update(&repriced).await.unwrap();

    let items = db.invoices().get_items(&id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].unit_price_cents, 8000);
    assert_eq!(items[0].product_name, "Funda iPhone 15 Pro");
    assert_eq!(items[0].line_total(), Money::from_cents(16_000));
}

#[tokio::test]
async fn sold_product_cannot_be_deleted() {
    let (db, p) = db_with(&[("A", 1000, 5)]).await;
    let mut cart = Cart::new(TaxRate::default());
    cart.add_item(&p[0], 1).unwrap();
    db.sales().process_sale(&mut cart, "Ana").await.unwrap();

    let err = db.products().delete(&p[0].id).await.unwrap_err();
    assert!(matches!(err, almacen_db::DbError::ForeignKeyViolation { .. }));
}
