use super::sqlite_book_repository::BookModel;
use super::sqlite_user_repository::UserModel;
use crate::database::{
    books, last_insert_id, order_items, orders, run_blocking, users, SqlitePool,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use domain::{
    Book, DomainError, Order, OrderAggregate, OrderItem, OrderRepository, OrderStatus, User,
};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct OrderModel {
    order_id: i32,
    user_id: Option<i32>,
    time: NaiveDateTime,
    status: String,
}

#[derive(Insertable)]
#[diesel(table_name = orders)]
struct NewOrderModel {
    user_id: Option<i32>,
    time: NaiveDateTime,
    status: String,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct OrderItemModel {
    order_item_id: i32,
    book_id: Option<i32>,
    order_id: i32,
    amount: i32,
    price: i32,
}

#[derive(Insertable)]
#[diesel(table_name = order_items)]
struct NewOrderItemModel {
    book_id: Option<i32>,
    order_id: i32,
    amount: i32,
    price: i32,
}

impl From<OrderItemModel> for OrderItem {
    fn from(model: OrderItemModel) -> Self {
        OrderItem {
            id: Some(model.order_item_id),
            book_id: model.book_id,
            order_id: Some(model.order_id),
            quantity: model.amount,
            price: model.price,
        }
    }
}

/// Everything one aggregate needs, as loaded from the tables.
struct AggregateRows {
    order: OrderModel,
    items: Vec<OrderItemModel>,
    user: Option<UserModel>,
    books: Vec<BookModel>,
}

impl AggregateRows {
    fn load(conn: &mut SqliteConnection, order: OrderModel) -> QueryResult<Self> {
        let items = order_items::table
            .filter(order_items::order_id.eq(order.order_id))
            .order(order_items::order_item_id.asc())
            .select(OrderItemModel::as_select())
            .load::<OrderItemModel>(conn)?;

        let user = match order.user_id {
            Some(user_id) => users::table
                .filter(users::user_id.eq(user_id))
                .select(UserModel::as_select())
                .first::<UserModel>(conn)
                .optional()?,
            None => None,
        };

        let book_ids: Vec<i32> = items.iter().filter_map(|item| item.book_id).collect();
        let books = books::table
            .filter(books::book_id.eq_any(book_ids))
            .select(BookModel::as_select())
            .load::<BookModel>(conn)?;

        Ok(Self {
            order,
            items,
            user,
            books,
        })
    }

    fn load_all(conn: &mut SqliteConnection, order_rows: Vec<OrderModel>) -> QueryResult<Vec<Self>> {
        let mut rows = Vec::with_capacity(order_rows.len());
        for order in order_rows {
            rows.push(Self::load(conn, order)?);
        }
        Ok(rows)
    }

    fn into_order(order: OrderModel, items: Vec<OrderItemModel>) -> Result<Order, DomainError> {
        let status: OrderStatus = order.status.parse()?;
        Ok(Order {
            id: Some(order.order_id),
            user_id: order.user_id,
            time: order.time,
            status,
            items: items.into_iter().map(OrderItem::from).collect(),
        })
    }
}

impl TryFrom<AggregateRows> for OrderAggregate {
    type Error = DomainError;

    fn try_from(rows: AggregateRows) -> Result<Self, Self::Error> {
        let mut aggregate = OrderAggregate::new(AggregateRows::into_order(rows.order, rows.items)?);

        if let Some(user) = rows.user {
            aggregate = aggregate.with_user(User::try_from(user)?);
        }
        for book in rows.books {
            aggregate = aggregate.with_book(Book::from(book));
        }

        Ok(aggregate)
    }
}

fn into_aggregates(rows: Vec<AggregateRows>) -> Result<Vec<OrderAggregate>, DomainError> {
    rows.into_iter().map(OrderAggregate::try_from).collect()
}

pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn get_order(&self, id: i32) -> Result<Option<OrderAggregate>, DomainError> {
        let result = run_blocking(&self.pool, move |conn| {
            let order = orders::table
                .filter(orders::order_id.eq(id))
                .select(OrderModel::as_select())
                .first::<OrderModel>(conn)
                .optional()?;

            order.map(|order| AggregateRows::load(conn, order)).transpose()
        })
        .await?;

        result.map(OrderAggregate::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<OrderAggregate>, DomainError> {
        let result = run_blocking(&self.pool, move |conn| {
            let order_rows = orders::table
                .filter(orders::user_id.eq(user_id))
                .order(orders::order_id.asc())
                .select(OrderModel::as_select())
                .load::<OrderModel>(conn)?;

            AggregateRows::load_all(conn, order_rows)
        })
        .await?;

        into_aggregates(result)
    }

    async fn find_all(&self) -> Result<Vec<OrderAggregate>, DomainError> {
        let result = run_blocking(&self.pool, move |conn| {
            let order_rows = orders::table
                .order(orders::order_id.asc())
                .select(OrderModel::as_select())
                .load::<OrderModel>(conn)?;

            AggregateRows::load_all(conn, order_rows)
        })
        .await?;

        into_aggregates(result)
    }

    async fn save(&self, order: &Order) -> Result<Order, DomainError> {
        let new_order = NewOrderModel {
            user_id: order.user_id,
            time: order.time,
            status: order.status.as_str().to_string(),
        };
        let items: Vec<(Option<i32>, i32, i32)> = order
            .items
            .iter()
            .map(|item| (item.book_id, item.quantity, item.price))
            .collect();

        let (saved, saved_items) = run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::insert_into(orders::table)
                    .values(&new_order)
                    .execute(conn)?;
                let order_id = last_insert_id(conn)?;

                let saved = orders::table
                    .filter(orders::order_id.eq(order_id))
                    .select(OrderModel::as_select())
                    .first::<OrderModel>(conn)?;

                for (book_id, amount, price) in items {
                    diesel::insert_into(order_items::table)
                        .values(&NewOrderItemModel {
                            book_id,
                            order_id: saved.order_id,
                            amount,
                            price,
                        })
                        .execute(conn)?;
                }

                let saved_items = order_items::table
                    .filter(order_items::order_id.eq(saved.order_id))
                    .order(order_items::order_item_id.asc())
                    .select(OrderItemModel::as_select())
                    .load::<OrderItemModel>(conn)?;

                Ok((saved, saved_items))
            })
        })
        .await?;

        AggregateRows::into_order(saved, saved_items)
    }

    async fn update_status(&self, id: i32, status: OrderStatus) -> Result<(), DomainError> {
        let updated = run_blocking(&self.pool, move |conn| {
            diesel::update(orders::table.filter(orders::order_id.eq(id)))
                .set(orders::status.eq(status.as_str()))
                .execute(conn)
        })
        .await?;

        if updated == 0 {
            return Err(DomainError::OrderNotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::delete(order_items::table.filter(order_items::order_id.eq(id)))
                    .execute(conn)?;
                diesel::delete(orders::table.filter(orders::order_id.eq(id))).execute(conn)?;
                Ok(())
            })
        })
        .await
    }
}
