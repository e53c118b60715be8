use std::collections::HashMap;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ConnectionTrait, Statement};

use engine::{EngineError, ErrorKind, Gender, SaleRequest};

mod common;

use common::{engine_with_db, engine_with_options, frasco, lavanda};

#[tokio::test]
async fn sale_charges_weighted_cost_and_debits_stock() {
    let (engine, _db) = engine_with_db().await;
    engine.add_essence("ESE001", lavanda()).await.unwrap();

    let sale = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(200), dec!(100.00)))
        .await
        .unwrap();

    assert_eq!(sale.id, "SAL001");
    assert_eq!(sale.costs.cost_per_ml, dec!(0.25));
    assert_eq!(sale.costs.essence_cost, dec!(50));
    assert_eq!(sale.costs.container_cost, dec!(0));
    assert_eq!(sale.profit, dec!(50));
    assert_eq!(sale.product_name.as_deref(), Some("Lavanda Premium"));
    assert_eq!(sale.gender, Some(Gender::Unisex));

    let essence = engine.essence("ESE001").await.unwrap().unwrap();
    assert_eq!(essence.stock_ml, dec!(300));
    assert_eq!(essence.entry_cost, dec!(75));

    let stored = engine.sale("SAL001").await.unwrap();
    assert_eq!(stored.profit, dec!(50));
    assert_eq!(stored.quantity_ml, dec!(200));
    assert_eq!(stored.costs.essence_cost, dec!(50));
}

#[tokio::test]
async fn insufficient_stock_leaves_everything_unchanged() {
    let (engine, _db) = engine_with_db().await;
    engine.add_essence("ESE001", lavanda()).await.unwrap();
    engine
        .sell_essence(SaleRequest::new("ESE001", dec!(200), dec!(100)))
        .await
        .unwrap();

    let err = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(400), dec!(150)))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientStock {
            item: "ESE001".to_string(),
            available: dec!(300),
            requested: dec!(400),
        }
    );
    assert_eq!(err.kind(), ErrorKind::InsufficientStock);
    assert!(err.to_string().contains("available 300"));

    let essence = engine.essence("ESE001").await.unwrap().unwrap();
    assert_eq!(essence.stock_ml, dec!(300));
    assert_eq!(engine.list_sales().await.unwrap().len(), 1);
}

#[tokio::test]
async fn capacity_is_checked_before_any_debit() {
    let (engine, _db) = engine_with_db().await;
    engine.add_essence("ESE001", lavanda()).await.unwrap();
    engine.add_container("F001", frasco()).await.unwrap();

    let err = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(40), dec!(30)).container("F001"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::CapacityExceeded {
            container: "F001".to_string(),
            capacity: dec!(30),
            requested: dec!(40),
        }
    );

    assert_eq!(
        engine.essence("ESE001").await.unwrap().unwrap().stock_ml,
        dec!(500)
    );
    assert_eq!(
        engine.container("F001").await.unwrap().unwrap().stock_units,
        5
    );
    assert!(engine.list_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn bottled_sale_adds_container_and_overhead_costs() {
    let (engine, _db) = engine_with_db().await;
    engine.add_essence("ESE001", lavanda()).await.unwrap();
    engine.add_container("F001", frasco()).await.unwrap();

    let sale = engine
        .sell_essence(
            SaleRequest::new("ESE001", dec!(20), dec!(30))
                .container("F001")
                .overhead_cost(dec!(2.50))
                .customer("  María  "),
        )
        .await
        .unwrap();

    assert_eq!(sale.costs.essence_cost, dec!(5));
    assert_eq!(sale.costs.container_cost, dec!(5));
    assert_eq!(sale.costs.overhead_cost, dec!(2.50));
    assert_eq!(sale.costs.total(), dec!(12.50));
    assert_eq!(sale.profit, dec!(17.50));
    assert_eq!(sale.container_id.as_deref(), Some("F001"));
    assert_eq!(sale.customer.as_deref(), Some("María"));

    let container = engine.container("F001").await.unwrap().unwrap();
    assert_eq!(container.stock_units, 4);
    assert_eq!(
        engine.essence("ESE001").await.unwrap().unwrap().stock_ml,
        dec!(480)
    );
}

#[tokio::test]
async fn empty_container_stock_is_insufficient() {
    let (engine, _db) = engine_with_db().await;
    engine.add_essence("ESE001", lavanda()).await.unwrap();
    let mut empty = frasco();
    empty.stock_units = 0;
    engine.add_container("F002", empty).await.unwrap();

    let err = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(10), dec!(20)).container("F002"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::InsufficientStock { ref item, .. } if item == "F002"
    ));
    assert_eq!(
        engine.essence("ESE001").await.unwrap().unwrap().stock_ml,
        dec!(500)
    );
}

#[tokio::test]
async fn two_partial_sales_cost_the_same_as_one() {
    let (engine, _db) = engine_with_db().await;
    engine.add_essence("ESE001", lavanda()).await.unwrap();
    engine.add_essence("ESE002", lavanda()).await.unwrap();

    let first = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(200), dec!(100)))
        .await
        .unwrap();
    let second = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(100), dec!(50)))
        .await
        .unwrap();
    // Second sale: 75 left over 300 ml.
    assert_eq!(second.costs.cost_per_ml, dec!(0.25));
    assert_eq!(second.costs.essence_cost, dec!(25));

    let single = engine
        .sell_essence(SaleRequest::new("ESE002", dec!(300), dec!(150)))
        .await
        .unwrap();
    assert_eq!(
        first.costs.essence_cost + second.costs.essence_cost,
        single.costs.essence_cost
    );
}

#[tokio::test]
async fn restock_changes_the_basis_of_later_sales() {
    let (engine, _db) = engine_with_db().await;
    engine.add_essence("ESE001", lavanda()).await.unwrap();
    engine
        .sell_essence(SaleRequest::new("ESE001", dec!(400), dec!(200)))
        .await
        .unwrap();

    // 100 ml worth 25 left; add 100 ml bought for 75.
    let mut restock = lavanda();
    restock.stock_ml = dec!(200);
    restock.entry_cost = dec!(100);
    engine.update_essence("ESE001", restock).await.unwrap();

    let sale = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(50), dec!(40)))
        .await
        .unwrap();
    assert_eq!(sale.costs.cost_per_ml, dec!(0.5));
    assert_eq!(sale.costs.essence_cost, dec!(25));
    assert_eq!(sale.profit, dec!(15));
}

#[tokio::test]
async fn selling_everything_amortizes_the_whole_batch() {
    let (engine, _db) = engine_with_db().await;
    engine.add_essence("ESE001", lavanda()).await.unwrap();

    let mut charged = dec!(0);
    for quantity in [dec!(150), dec!(150), dec!(200)] {
        let sale = engine
            .sell_essence(SaleRequest::new("ESE001", quantity, dec!(80)))
            .await
            .unwrap();
        charged += sale.costs.essence_cost;
    }
    assert_eq!(charged, dec!(125));

    let essence = engine.essence("ESE001").await.unwrap().unwrap();
    assert_eq!(essence.stock_ml, dec!(0));
    assert_eq!(essence.entry_cost, dec!(0));

    let err = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(1), dec!(1)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientStock);
}

#[tokio::test]
async fn negative_profit_is_kept() {
    let (engine, _db) = engine_with_db().await;
    engine.add_essence("ESE001", lavanda()).await.unwrap();

    let sale = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(100), dec!(10)))
        .await
        .unwrap();
    assert_eq!(sale.profit, dec!(-15));
    assert_eq!(engine.sale(&sale.id).await.unwrap().profit, dec!(-15));
}

#[tokio::test]
async fn request_validation_and_lookups() {
    let (engine, _db) = engine_with_db().await;
    engine.add_essence("ESE001", lavanda()).await.unwrap();

    for request in [
        SaleRequest::new("ESE001", dec!(0), dec!(10)),
        SaleRequest::new("ESE001", dec!(-5), dec!(10)),
        SaleRequest::new("ESE001", dec!(5), dec!(-10)),
        SaleRequest::new("ESE001", dec!(5), dec!(10)).overhead_cost(dec!(-1)),
        SaleRequest::new("  ", dec!(5), dec!(10)),
    ] {
        let err = engine.sell_essence(request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    let err = engine
        .sell_essence(SaleRequest::new("ESE404", dec!(5), dec!(10)))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::EssenceNotFound("ESE404".to_string()));

    let err = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(5), dec!(10)).container("F404"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ContainerNotFound("F404".to_string()));

    assert_eq!(
        engine.essence("ESE001").await.unwrap().unwrap().stock_ml,
        dec!(500)
    );
    assert!(engine.list_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn default_overhead_applies_when_request_has_none() {
    let engine = engine_with_options(HashMap::new(), dec!(2.50)).await;
    assert_eq!(engine.default_overhead_cost(), dec!(2.50));
    engine.add_essence("ESE001", lavanda()).await.unwrap();

    let defaulted = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(20), dec!(20)))
        .await
        .unwrap();
    assert_eq!(defaulted.costs.overhead_cost, dec!(2.50));
    assert_eq!(defaulted.profit, dec!(12.50));

    let explicit = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(20), dec!(20)).overhead_cost(dec!(0)))
        .await
        .unwrap();
    assert_eq!(explicit.costs.overhead_cost, dec!(0));
}

#[tokio::test]
async fn sold_at_is_kept_as_given() {
    let (engine, _db) = engine_with_db().await;
    engine.add_essence("ESE001", lavanda()).await.unwrap();
    let yesterday = Utc::now() - Duration::days(1);

    let sale = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(10), dec!(10)).sold_at(yesterday))
        .await
        .unwrap();
    assert_eq!(sale.sold_at, yesterday);
    let stored = engine.sale(&sale.id).await.unwrap();
    assert_eq!(stored.sold_at.timestamp(), yesterday.timestamp());
}

#[tokio::test]
async fn failed_ledger_insert_rolls_back_the_debit() {
    let (engine, db) = engine_with_db().await;
    engine.add_essence("ESE001", lavanda()).await.unwrap();
    engine.add_container("F001", frasco()).await.unwrap();

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "DROP TABLE sales",
    ))
    .await
    .unwrap();

    let err = engine
        .sell_essence(SaleRequest::new("ESE001", dec!(20), dec!(30)).container("F001"))
        .await
        .unwrap_err();
    assert!(err.kind().is_storage());

    assert_eq!(
        engine.essence("ESE001").await.unwrap().unwrap().stock_ml,
        dec!(500)
    );
    assert_eq!(
        engine.container("F001").await.unwrap().unwrap().stock_units,
        5
    );
}
