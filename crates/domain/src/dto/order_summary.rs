use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::entities::OrderAggregate;
use crate::errors::DomainError;

/// Flat, read-only view of an order for clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub time: NaiveDateTime,
    pub user_id: i32,
    pub username: String,
    pub order_item_list: Vec<OrderSummaryLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryLine {
    pub book_id: i32,
    pub book_name: String,
    pub price: i32,
    pub book_number: i32,
}

impl OrderSummary {
    /// Flatten an order aggregate.
    ///
    /// Book names are read from the aggregate's books as they are now; price
    /// and quantity come from the stored order items. Items keep their order.
    /// A missing user or book reference means the aggregate is broken and
    /// yields [`DomainError::BrokenAggregate`].
    pub fn build(aggregate: &OrderAggregate) -> Result<Self, DomainError> {
        let order = &aggregate.order;

        let user_id = order.user_id.ok_or_else(|| {
            DomainError::BrokenAggregate(format!(
                "order {:?} has no user reference",
                order.id
            ))
        })?;
        let user = aggregate.user().ok_or_else(|| {
            DomainError::BrokenAggregate(format!(
                "order {:?} references unknown user {}",
                order.id, user_id
            ))
        })?;

        let order_item_list = order
            .items
            .iter()
            .map(|item| {
                let book_id = item.book_id.ok_or_else(|| {
                    DomainError::BrokenAggregate(format!(
                        "order item {:?} has no book reference",
                        item.id
                    ))
                })?;
                let book = aggregate.book(book_id).ok_or_else(|| {
                    DomainError::BrokenAggregate(format!(
                        "order item {:?} references unknown book {}",
                        item.id, book_id
                    ))
                })?;

                Ok(OrderSummaryLine {
                    book_id,
                    book_name: book.name.clone(),
                    price: item.price,
                    book_number: item.quantity,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(Self {
            time: order.time,
            user_id,
            username: user.username.clone(),
            order_item_list,
        })
    }

    pub fn total_price(&self) -> i64 {
        self.order_item_list
            .iter()
            .map(|line| i64::from(line.price) * i64::from(line.book_number))
            .sum()
    }
}

impl TryFrom<&OrderAggregate> for OrderSummary {
    type Error = DomainError;

    fn try_from(aggregate: &OrderAggregate) -> Result<Self, Self::Error> {
        Self::build(aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Book, Order, OrderItem, OrderStatus, User, UserRole};
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|date| date.and_hms_opt(14, 5, 0))
            .unwrap()
    }

    fn alice() -> User {
        User::with_id(
            7,
            "alice".to_string(),
            "secret".to_string(),
            "alice@example.com".to_string(),
            UserRole::Customer,
        )
    }

    fn item(id: i32, book_id: i32, quantity: i32, price: i32) -> OrderItem {
        OrderItem {
            id: Some(id),
            book_id: Some(book_id),
            order_id: Some(1),
            quantity,
            price,
        }
    }

    #[fixture]
    fn aggregate() -> OrderAggregate {
        let order = Order {
            id: Some(1),
            user_id: Some(7),
            time: timestamp(),
            status: OrderStatus::Pending,
            items: vec![item(10, 1, 2, 20), item(11, 2, 1, 15)],
        };

        OrderAggregate::new(order)
            .with_user(alice())
            .with_book(Book::with_id(1, "Dune".into(), "Herbert".into(), 20, 5))
            .with_book(Book::with_id(2, "Foundation".into(), "Asimov".into(), 15, 5))
    }

    #[rstest]
    fn flattens_order_into_wire_shape(aggregate: OrderAggregate) {
        let summary = OrderSummary::build(&aggregate).unwrap();

        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({
                "time": "2024-03-09T14:05:00",
                "userId": 7,
                "username": "alice",
                "orderItemList": [
                    { "bookId": 1, "bookName": "Dune", "price": 20, "bookNumber": 2 },
                    { "bookId": 2, "bookName": "Foundation", "price": 15, "bookNumber": 1 },
                ]
            })
        );
        assert_eq!(summary.total_price(), 55);
    }

    #[rstest]
    fn uses_snapshot_price_and_live_name(mut aggregate: OrderAggregate) {
        if let Some(book) = aggregate.books.get_mut(&1) {
            book.price = 99;
            book.name = "Dune (Deluxe)".to_string();
        }

        let summary = OrderSummary::build(&aggregate).unwrap();
        let line = &summary.order_item_list[0];
        assert_eq!(line.price, 20);
        assert_eq!(line.book_number, 2);
        assert_eq!(line.book_name, "Dune (Deluxe)");
    }

    #[rstest]
    fn keeps_item_count_and_order(mut aggregate: OrderAggregate) {
        aggregate.order.items = vec![item(12, 2, 3, 15), item(13, 1, 1, 18), item(14, 2, 1, 14)];

        let summary = OrderSummary::build(&aggregate).unwrap();
        let ids: Vec<i32> = summary.order_item_list.iter().map(|l| l.book_id).collect();
        assert_eq!(ids, vec![2, 1, 2]);
        assert_eq!(summary.order_item_list[2].price, 14);
    }

    #[rstest]
    fn empty_order_yields_empty_list(mut aggregate: OrderAggregate) {
        aggregate.order.items.clear();

        let summary = OrderSummary::build(&aggregate).unwrap();
        assert!(summary.order_item_list.is_empty());
        assert_eq!(summary.username, "alice");
    }

    #[rstest]
    fn building_twice_is_stable_and_leaves_input_untouched(aggregate: OrderAggregate) {
        let before = aggregate.clone();

        let first = OrderSummary::try_from(&aggregate).unwrap();
        let second = OrderSummary::try_from(&aggregate).unwrap();

        assert_eq!(first, second);
        assert_eq!(aggregate, before);
    }

    #[rstest]
    fn missing_user_reference_is_a_precondition_violation(mut aggregate: OrderAggregate) {
        aggregate.order.user_id = None;

        let err = OrderSummary::build(&aggregate).unwrap_err();
        assert!(err.is_precondition_violation());
    }

    #[rstest]
    fn unresolved_user_is_a_precondition_violation(mut aggregate: OrderAggregate) {
        aggregate.users.clear();

        let err = OrderSummary::build(&aggregate).unwrap_err();
        assert!(matches!(err, DomainError::BrokenAggregate(_)));
    }

    #[rstest]
    #[case::no_reference(None)]
    #[case::unknown_book(Some(42))]
    fn broken_book_reference_is_a_precondition_violation(
        mut aggregate: OrderAggregate,
        #[case] book_id: Option<i32>,
    ) {
        aggregate.order.items[1].book_id = book_id;

        let err = OrderSummary::build(&aggregate).unwrap_err();
        assert!(err.is_precondition_violation());
    }
}
