use chrono::Utc;
use diesel::prelude::*;
use serde_json::json;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::customer::Customer;
use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, Order, OrderLine, OrderLineInput, OrderStatus};
use crate::domain::ports::OrderStore;
use crate::schema::{commerce_order_outbox, order_lines, orders};

use super::models::{NewOrderLineRow, NewOrderRow, NewOutboxEventRow, OrderLineRow, OrderRow};

const AGGREGATE_TYPE: &str = "Order";

pub struct DieselOrderStore {
    pool: DbPool,
}

impl DieselOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_order(row: OrderRow, lines: Vec<OrderLineRow>) -> Result<Order, DomainError> {
    Ok(Order {
        id: row.id,
        customer_id: row.customer_id,
        status: row.status.parse()?,
        created_at: row.created_at,
        lines: lines
            .into_iter()
            .map(|l| OrderLine {
                id: l.id,
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect(),
    })
}

fn insert_outbox_event(
    conn: &mut PgConnection,
    order_id: Uuid,
    event_type: &str,
    payload: serde_json::Value,
) -> Result<(), DomainError> {
    // Debezium's EventRouter SMT derives the Kafka topic from `aggregate_type`.
    diesel::insert_into(commerce_order_outbox::table)
        .values(&NewOutboxEventRow {
            id: Uuid::new_v4(),
            aggregate_type: AGGREGATE_TYPE.to_string(),
            aggregate_id: order_id.to_string(),
            event_type: event_type.to_string(),
            payload,
        })
        .execute(conn)?;
    Ok(())
}

impl OrderStore for DieselOrderStore {
    fn create(&self, customer: &Customer, lines: Vec<OrderLineInput>) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order
            let order_row = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: Uuid::new_v4(),
                    customer_id: customer.id,
                    status: OrderStatus::Pending.as_str().to_string(),
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            // 2. Insert order lines, numbered in request order
            let new_lines: Vec<NewOrderLineRow> = lines
                .iter()
                .enumerate()
                .map(|(i, l)| NewOrderLineRow {
                    id: Uuid::new_v4(),
                    order_id: order_row.id,
                    product_id: l.product_id,
                    line_no: i as i32 + 1,
                    quantity: l.quantity,
                    unit_price: l.unit_price.clone(),
                })
                .collect();
            let mut line_rows = diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .returning(OrderLineRow::as_returning())
                .get_results(conn)?;
            line_rows.sort_by_key(|l| l.line_no);

            // 3. Outbox event in the same transaction
            let line_payloads: Vec<serde_json::Value> = lines
                .iter()
                .map(|l| {
                    json!({
                        "product_id": l.product_id,
                        "quantity": l.quantity,
                        "unit_price": l.unit_price.to_string()
                    })
                })
                .collect();
            insert_outbox_event(
                conn,
                order_row.id,
                "OrderCreated",
                json!({
                    "order_id": order_row.id,
                    "customer_id": customer.id,
                    "status": order_row.status,
                    "lines": line_payloads
                }),
            )?;

            to_order(order_row, line_rows)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = OrderLineRow::belonging_to(&order)
            .select(OrderLineRow::as_select())
            .order(order_lines::line_no.asc())
            .load(&mut conn)?;

        to_order(order, lines).map(Some)
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1) * limit;
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let rows = orders::table
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            let items = rows
                .into_iter()
                .map(|o| to_order(o, vec![]))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(ListResult { items, total })
        })
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let affected = diesel::update(orders::table.filter(orders::id.eq(id)))
                .set((
                    orders::status.eq(status.as_str()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;
            if affected == 0 {
                return Err(DomainError::OrderNotFound);
            }

            if status == OrderStatus::Cancelled {
                insert_outbox_event(
                    conn,
                    id,
                    "OrderCancelled",
                    json!({ "order_id": id, "status": status.as_str() }),
                )?;
            }
            Ok(())
        })
    }
}
