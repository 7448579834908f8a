use std::time::Duration;

use todo_api::domain::{repository::TodoRepository, todo::TodoId};
use todo_api::infrastructure::sqlite_repo::SqliteTodoRepository;

async fn store() -> SqliteTodoRepository {
    let repo = SqliteTodoRepository::connect("sqlite::memory:").await.unwrap();
    repo.init().await.unwrap();
    repo
}

#[tokio::test]
async fn insert_assigns_increasing_ids_and_timestamps() {
    let repo = store().await;
    let a = repo.insert("First").await.unwrap();
    let b = repo.insert("Second").await.unwrap();
    assert!(!a.completed);
    assert!(b.id > a.id);
    assert!(b.created_at >= a.created_at);
}

#[tokio::test]
async fn init_is_idempotent() {
    let repo = store().await;
    repo.insert("Survives").await.unwrap();
    repo.init().await.unwrap();
    assert_eq!(repo.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_all_is_newest_first() {
    let repo = store().await;
    assert!(repo.list_all().await.unwrap().is_empty());
    for text in ["First todo", "Second todo", "Third todo"] {
        repo.insert(text).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let todos = repo.list_all().await.unwrap();
    let texts: Vec<_> = todos.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["Third todo", "Second todo", "First todo"]);
    assert!(todos.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn same_instant_inserts_still_list_newest_first() {
    let repo = store().await;
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(repo.insert(&format!("burst {i}")).await.unwrap().id);
    }
    ids.reverse();
    let listed: Vec<_> = repo.list_all().await.unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn update_completed_touches_only_the_flag() {
    let repo = store().await;
    let created = repo.insert("Persistence test todo").await.unwrap();
    let updated = repo.update_completed(created.id, true).await.unwrap().unwrap();
    assert!(updated.completed);
    assert_eq!((updated.id, &updated.text, updated.created_at), (created.id, &created.text, created.created_at));

    let back = repo.update_completed(created.id, false).await.unwrap().unwrap();
    assert!(!back.completed);
    assert_eq!(repo.list_all().await.unwrap(), vec![back]);
}

#[tokio::test]
async fn update_completed_on_missing_row_is_none() {
    let repo = store().await;
    assert!(repo.update_completed(TodoId(999), true).await.unwrap().is_none());
    assert!(repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_by_id_removes_one_row_and_ids_are_not_reused() {
    let repo = store().await;
    let first = repo.insert("First todo").await.unwrap();
    let second = repo.insert("Second todo").await.unwrap();
    let third = repo.insert("Third todo").await.unwrap();

    assert!(repo.delete_by_id(third.id).await.unwrap());
    assert!(!repo.delete_by_id(third.id).await.unwrap());

    let remaining: Vec<_> = repo.list_all().await.unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(remaining, [second.id, first.id]);

    let fourth = repo.insert("Fourth todo").await.unwrap();
    assert!(fourth.id > third.id);
}

#[tokio::test]
async fn insert_never_stamps_earlier_than_the_newest_row() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("todos.db").display());
    let repo = SqliteTodoRepository::connect(&url).await.unwrap();
    repo.init().await.unwrap();

    // a row written by another client whose clock runs far ahead
    let other = sqlx::SqlitePool::connect(&url).await.unwrap();
    sqlx::query("INSERT INTO todos (text, completed, created_at) VALUES ('From the future', 0, '2099-01-01T00:00:00.000Z')")
        .execute(&other)
        .await
        .unwrap();
    other.close().await;

    let seeded = repo.list_all().await.unwrap().remove(0);
    let fresh = repo.insert("Written now").await.unwrap();
    assert!(fresh.created_at >= seeded.created_at);

    let listed: Vec<_> = repo.list_all().await.unwrap().into_iter().map(|t| t.text).collect();
    assert_eq!(listed, ["Written now", "From the future"]);
}
