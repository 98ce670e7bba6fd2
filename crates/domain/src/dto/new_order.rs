use serde::{Deserialize, Serialize};

/// Order placement payload: which books, and how many of each, in order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    pub order_item_list: Vec<NewOrderLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderLine {
    pub book_id: i32,
    pub book_number: i32,
}

impl NewOrderRequest {
    pub fn new(lines: impl IntoIterator<Item = (i32, i32)>) -> Self {
        Self {
            order_item_list: lines
                .into_iter()
                .map(|(book_id, book_number)| NewOrderLine {
                    book_id,
                    book_number,
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order_item_list.is_empty()
    }
}
