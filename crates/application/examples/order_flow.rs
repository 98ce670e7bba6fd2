use application::BookstoreApp;
use domain::{NewOrderRequest, NewUserRequest};

/// Example usage demonstrating the order flow on the in-memory backend
/// Flow: register → stock books → place order → reprice → read summary
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = BookstoreApp::in_memory();

    let alice = app
        .register_user(NewUserRequest {
            username: "alice".to_string(),
            password: "wonderland".to_string(),
            email: "alice@example.com".to_string(),
            id_name: "Alice Liddell".to_string(),
        })
        .await?;
    let user_id = alice.id().ok_or("user was not assigned an id")?;

    let dune = app
        .book_service
        .add_book("Dune".into(), "Frank Herbert".into(), 20, 10)
        .await?;
    let foundation = app
        .book_service
        .add_book("Foundation".into(), "Isaac Asimov".into(), 15, 4)
        .await?;
    let dune_id = dune.id.ok_or("book was not assigned an id")?;
    let foundation_id = foundation.id.ok_or("book was not assigned an id")?;

    let placed = app
        .place_order(user_id, &NewOrderRequest::new([(dune_id, 2), (foundation_id, 1)]))
        .await?;
    println!("Placed:\n{}", serde_json::to_string_pretty(&placed)?);

    // Later price changes do not touch the stored order
    app.book_service.update_price(dune_id, 35).await?;

    for summary in app.order_service.orders_for_user(user_id).await? {
        println!("Re-read after repricing:\n{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
