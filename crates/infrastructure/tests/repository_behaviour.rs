//! Both storage backends must behave the same behind the domain ports.

use chrono::{NaiveDate, NaiveDateTime};
use domain::{
    Book, BookRepository, DomainError, Order, OrderItem, OrderRepository, OrderStatus, User,
    UserRepository, UserRole,
};
use infrastructure::{
    Database, InMemoryStore, SqliteBookRepository, SqliteOrderRepository, SqliteUserRepository,
};
use rstest::rstest;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum Backend {
    Memory,
    Sqlite,
}

struct Repositories {
    users: Arc<dyn UserRepository>,
    books: Arc<dyn BookRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl Repositories {
    fn open(backend: Backend) -> Self {
        match backend {
            Backend::Memory => {
                let store = Arc::new(InMemoryStore::new());
                Self {
                    users: store.clone(),
                    books: store.clone(),
                    orders: store,
                }
            }
            Backend::Sqlite => {
                let database = Database::in_memory().unwrap();
                let pool = database.get_pool().clone();
                Self {
                    users: Arc::new(SqliteUserRepository::new(pool.clone())),
                    books: Arc::new(SqliteBookRepository::new(pool.clone())),
                    orders: Arc::new(SqliteOrderRepository::new(pool)),
                }
            }
        }
    }

    async fn seed(&self) -> (User, Book, Book) {
        let user = self
            .users
            .save(&User::new(
                "alice".to_string(),
                "secret".to_string(),
                "alice@example.com".to_string(),
                UserRole::Customer,
            ))
            .await
            .unwrap();
        let dune = self
            .books
            .save(&Book::new("Dune".into(), "Frank Herbert".into(), 20, 5))
            .await
            .unwrap();
        let foundation = self
            .books
            .save(&Book::new("Foundation".into(), "Isaac Asimov".into(), 15, 3))
            .await
            .unwrap();
        (user, dune, foundation)
    }
}

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .unwrap()
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn users_get_identities_and_can_be_found(#[case] backend: Backend) {
    let repos = Repositories::open(backend);
    let (alice, _, _) = repos.seed().await;
    let bob = repos
        .users
        .save(&User::new(
            "bob".into(),
            "pw".into(),
            "bob@example.com".into(),
            UserRole::Admin,
        ))
        .await
        .unwrap();

    assert_ne!(alice.id(), bob.id());
    assert_eq!(
        repos.users.find_by_username("bob").await.unwrap(),
        Some(bob.clone())
    );
    assert_eq!(
        repos.users.find_by_email("alice@example.com").await.unwrap(),
        Some(alice.clone())
    );
    assert_eq!(repos.users.find_by_id(-1).await.unwrap(), None);

    let found = repos.users.find_by_id(bob.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(found.role, UserRole::Admin);
    assert_eq!(found.password, "pw");
    assert_eq!(repos.users.find_all().await.unwrap(), vec![alice, bob]);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn books_can_be_updated(#[case] backend: Backend) {
    let repos = Repositories::open(backend);
    let (_, mut dune, _) = repos.seed().await;

    dune.price = 25;
    dune.stock = 1;
    let updated = repos.books.update(&dune).await.unwrap();

    assert_eq!(updated, dune);
    assert_eq!(repos.books.find_by_id(dune.id.unwrap()).await.unwrap(), Some(dune));
    assert_eq!(repos.books.find_all().await.unwrap().len(), 2);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn updating_unknown_book_fails(#[case] backend: Backend) {
    let repos = Repositories::open(backend);
    let ghost = Book::with_id(404, "Ghost".into(), "Nobody".into(), 1, 1);

    assert_eq!(
        repos.books.update(&ghost).await,
        Err(DomainError::BookNotFound(404))
    );
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn saved_order_comes_back_as_resolved_aggregate(#[case] backend: Backend) {
    let repos = Repositories::open(backend);
    let (alice, dune, foundation) = repos.seed().await;
    let user_id = alice.id().unwrap();
    let dune_id = dune.id.unwrap();
    let foundation_id = foundation.id.unwrap();

    let order = Order::new(
        user_id,
        at(9),
        vec![
            OrderItem::new(foundation_id, 1, 15),
            OrderItem::new(dune_id, 2, 20),
        ],
    );
    let saved = repos.orders.save(&order).await.unwrap();
    let order_id = saved.id.unwrap();

    assert_eq!(saved.items.len(), 2);
    assert!(saved.items.iter().all(|item| item.id.is_some()));
    assert!(saved.items.iter().all(|item| item.order_id == Some(order_id)));

    let aggregate = repos.orders.get_order(order_id).await.unwrap().unwrap();
    assert_eq!(aggregate.order, saved);
    assert_eq!(aggregate.order.time, at(9));
    assert_eq!(aggregate.user(), Some(&alice));
    assert_eq!(aggregate.book(dune_id), Some(&dune));
    assert_eq!(aggregate.book(foundation_id), Some(&foundation));

    let book_order: Vec<Option<i32>> = aggregate.order.items.iter().map(|i| i.book_id).collect();
    assert_eq!(book_order, vec![Some(foundation_id), Some(dune_id)]);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn orders_are_listed_per_user(#[case] backend: Backend) {
    let repos = Repositories::open(backend);
    let (alice, dune, _) = repos.seed().await;
    let bob = repos
        .users
        .save(&User::new("bob".into(), "pw".into(), "bob@example.com".into(), UserRole::Customer))
        .await
        .unwrap();
    let dune_id = dune.id.unwrap();

    for (user, hour) in [(&alice, 8), (&bob, 9), (&alice, 10)] {
        let order = Order::new(user.id().unwrap(), at(hour), vec![OrderItem::new(dune_id, 1, 20)]);
        repos.orders.save(&order).await.unwrap();
    }

    let alice_orders = repos.orders.find_by_user(alice.id().unwrap()).await.unwrap();
    assert_eq!(alice_orders.len(), 2);
    assert!(alice_orders
        .iter()
        .all(|aggregate| aggregate.order.user_id == alice.id()));
    assert_eq!(repos.orders.find_all().await.unwrap().len(), 3);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn deleting_an_order_removes_it(#[case] backend: Backend) {
    let repos = Repositories::open(backend);
    let (alice, dune, _) = repos.seed().await;
    let order = Order::new(
        alice.id().unwrap(),
        at(12),
        vec![OrderItem::new(dune.id.unwrap(), 1, 20)],
    );
    let order_id = repos.orders.save(&order).await.unwrap().id.unwrap();

    repos.orders.delete(order_id).await.unwrap();

    assert_eq!(repos.orders.get_order(order_id).await.unwrap(), None);
    assert!(repos.orders.find_all().await.unwrap().is_empty());
    assert!(repos.books.find_by_id(dune.id.unwrap()).await.unwrap().is_some());
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn order_status_is_stored(#[case] backend: Backend) {
    let repos = Repositories::open(backend);
    let (alice, dune, _) = repos.seed().await;
    let order = Order::new(
        alice.id().unwrap(),
        at(14),
        vec![OrderItem::new(dune.id.unwrap(), 1, 20)],
    );
    let saved = repos.orders.save(&order).await.unwrap();
    let order_id = saved.id.unwrap();
    assert_eq!(saved.status, OrderStatus::Pending);

    repos
        .orders
        .update_status(order_id, OrderStatus::Shipping)
        .await
        .unwrap();

    let aggregate = repos.orders.get_order(order_id).await.unwrap().unwrap();
    assert_eq!(aggregate.order.status, OrderStatus::Shipping);
    assert_eq!(
        repos.orders.update_status(404, OrderStatus::Cancelled).await,
        Err(DomainError::OrderNotFound(404))
    );
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[tokio::test]
async fn concurrent_saves_get_back_their_own_rows(#[case] backend: Backend) {
    let repos = Arc::new(Repositories::open(backend));

    let mut handles = Vec::new();
    for n in 0..20 {
        let repos = repos.clone();
        handles.push(tokio::spawn(async move {
            let name = format!("Volume {}", n);
            let saved = repos
                .books
                .save(&Book::new(name.clone(), "Anon".into(), n, n))
                .await
                .unwrap();
            (name, saved)
        }));
    }

    for handle in handles {
        let (name, saved) = handle.await.unwrap();
        assert_eq!(saved.name, name);
        assert_eq!(
            repos.books.find_by_id(saved.id.unwrap()).await.unwrap(),
            Some(saved)
        );
    }
}

#[tokio::test]
async fn sqlite_rejects_a_second_user_with_the_same_email() {
    let repos = Repositories::open(Backend::Sqlite);
    repos.seed().await;

    let duplicate = repos
        .users
        .save(&User::new(
            "alicia".into(),
            "pw".into(),
            "alice@example.com".into(),
            UserRole::Customer,
        ))
        .await;

    assert!(matches!(duplicate, Err(DomainError::RepositoryError(_))));
    assert_eq!(repos.users.find_all().await.unwrap().len(), 1);
}
