//! End-to-end checks against a real MySQL server.
//!
//! Set `DATABASE_URL` (directly or through a `.env` file) to run them; without
//! it every test returns early.

use tinysql::{
    Connection, DatabaseConfig, FromRow, InsertModel, MySqlConnection, OrmError, OrmResult, Row,
};

#[derive(Debug, InsertModel)]
#[orm(table = "tinysql_live_orders")]
struct NewOrder {
    customer: String,
    total: i64,
    note: Option<String>,
}

#[derive(Debug, PartialEq, FromRow)]
struct OrderRow {
    id: i64,
    customer: String,
    total: i64,
    note: Option<String>,
}

async fn connect() -> Option<MySqlConnection> {
    dotenvy::dotenv().ok();
    let config = DatabaseConfig::from_env().ok()?;
    match MySqlConnection::connect(&config.max_connections(2)).await {
        Ok(conn) => Some(conn),
        Err(e) => panic!("DATABASE_URL is set but connecting failed: {e}"),
    }
}

async fn fresh_table(conn: &MySqlConnection, name: &str) -> OrmResult<()> {
    conn.execute(&format!("drop table if exists `{name}`"), &[])
        .await?;
    conn.execute(
        &format!(
            "create table `{name}` (
                id bigint not null auto_increment primary key,
                customer varchar(64) not null unique,
                total bigint not null,
                note varchar(255) null
            )"
        ),
        &[],
    )
    .await?;
    Ok(())
}

fn order(customer: &str, total: i64) -> NewOrder {
    NewOrder {
        customer: customer.into(),
        total,
        note: None,
    }
}

#[tokio::test]
async fn crud_round_trip() -> OrmResult<()> {
    let Some(conn) = connect().await else {
        return Ok(());
    };
    fresh_table(&conn, "tinysql_live_orders").await?;
    let mut b = conn.builder();

    let first = b.insert_model(&order("ann", 10)).await?;
    let second = b.insert_model(&order("bob", 25)).await?;
    b.insert_model(&order("cat", 40)).await?;
    assert_eq!(second, first + 1);

    let rows: Vec<OrderRow> = b
        .from("tinysql_live_orders")
        .group_start()
        .and_where("customer", "ann")
        .or_where("customer", "bob")
        .group_end()
        .and_where("total>", 5)
        .order_by("id desc")
        .get()
        .await?;
    let names: Vec<&str> = rows.iter().map(|r| r.customer.as_str()).collect();
    assert_eq!(names, ["bob", "ann"]);

    b.from("tinysql_live_orders").and_where_in("customer", ["ann", "cat"]);
    assert_eq!(b.count(false).await?, 2);
    let page: Vec<Row> = b.order_by("id").limit(1, 1).get().await?;
    assert_eq!(page[0].try_get::<String>("customer")?, "cat");

    let updated = b
        .set("note", "vip")
        .and_where("total>=", 25)
        .update("tinysql_live_orders")
        .await?;
    assert_eq!(updated, 2);

    let bob: Option<OrderRow> = b
        .from("tinysql_live_orders")
        .and_where("customer", "bob")
        .first()
        .await?;
    assert_eq!(bob.and_then(|r| r.note).as_deref(), Some("vip"));

    let deleted = b
        .from("tinysql_live_orders")
        .and_where("total<", 20)
        .delete()
        .await?;
    assert_eq!(deleted, 1);
    assert_eq!(b.from("tinysql_live_orders").count(true).await?, 2);
    Ok(())
}

#[tokio::test]
async fn aggregates() -> OrmResult<()> {
    let Some(conn) = connect().await else {
        return Ok(());
    };
    fresh_table(&conn, "tinysql_live_aggregates").await?;
    let mut b = conn.builder();
    for (customer, total) in [("a", 1), ("b", 2), ("c", 3)] {
        b.insert("tinysql_live_aggregates", &order(customer, total))
            .await?;
    }

    let row: Option<Row> = b
        .from("tinysql_live_aggregates")
        .select_max("total", "hi")
        .select_min("total", "lo")
        .select_count("*", "n")
        .first()
        .await?;
    let row = row.ok_or_else(|| OrmError::not_found("aggregate row"))?;
    assert_eq!(row.try_get::<i64>("hi")?, 3);
    assert_eq!(row.try_get::<i64>("lo")?, 1);
    assert_eq!(row.try_get::<i64>("n")?, 3);
    Ok(())
}

#[tokio::test]
async fn unique_violation_is_classified() -> OrmResult<()> {
    let Some(conn) = connect().await else {
        return Ok(());
    };
    fresh_table(&conn, "tinysql_live_unique").await?;
    let mut b = conn.builder();
    b.insert("tinysql_live_unique", &order("dup", 1)).await?;
    let err = b
        .insert("tinysql_live_unique", &order("dup", 2))
        .await
        .unwrap_err();
    assert!(err.is_unique_violation(), "{err:?}");
    Ok(())
}

#[tokio::test]
async fn rollback_discards_and_commit_keeps() -> OrmResult<()> {
    let Some(conn) = connect().await else {
        return Ok(());
    };
    fresh_table(&conn, "tinysql_live_tx").await?;
    let mut b = conn.builder();

    assert!(matches!(
        b.commit().await.unwrap_err(),
        OrmError::NoActiveTransaction
    ));

    b.begin().await?;
    assert!(conn.in_transaction());
    assert!(matches!(
        b.begin().await.unwrap_err(),
        OrmError::TransactionActive
    ));
    b.insert("tinysql_live_tx", &order("gone", 1)).await?;
    b.rollback().await?;
    assert!(!conn.in_transaction());
    assert_eq!(b.from("tinysql_live_tx").count(true).await?, 0);

    b.begin().await?;
    b.insert("tinysql_live_tx", &order("kept", 1)).await?;
    b.commit().await?;
    assert_eq!(b.from("tinysql_live_tx").count(true).await?, 1);
    Ok(())
}
