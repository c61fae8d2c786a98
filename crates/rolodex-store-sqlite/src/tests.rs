//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::Utc;
use rolodex_core::{
  entity::{
    BookRecordUpdate, ContactRecordUpdate, NewBookRecord, NewContactRecord,
  },
  store::{BookFilter, ContactFilter, EntityStore},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn book(name: &str) -> NewBookRecord {
  NewBookRecord {
    name:       name.into(),
    created_by: Some("tester".into()),
    changed_by: Some("tester".into()),
    deleted:    false,
    deleted_on: None,
  }
}

fn contact(book_id: i64, name: &str, email: &str) -> NewContactRecord {
  NewContactRecord {
    name: name.into(),
    email: email.into(),
    contact_book_id: book_id,
    created_by: Some("tester".into()),
    changed_by: Some("tester".into()),
    deleted: false,
    deleted_on: None,
  }
}

// ─── Contact books ───────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_fetch_book() {
  let s = store().await;

  let created = s.insert_book(book("Team A")).await.unwrap();
  assert!(created.id > 0);
  assert_eq!(created.name, "Team A");
  assert_eq!(created.created_by.as_deref(), Some("tester"));
  assert_eq!(created.created_on, created.updated_on);

  let fetched = s.fetch_book(created.id, false).await.unwrap().unwrap();
  assert_eq!(fetched.id, created.id);
  assert_eq!(fetched.name, "Team A");
  assert!(!fetched.deleted);
}

#[tokio::test]
async fn fetch_book_missing_returns_none() {
  let s = store().await;
  assert!(s.fetch_book(42, true).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_book_name_is_a_constraint_violation() {
  let s = store().await;
  s.insert_book(book("Team A")).await.unwrap();

  let err = s.insert_book(book("Team A")).await.unwrap_err();
  assert!(matches!(err, Error::Constraint { field: "name" }));
}

#[tokio::test]
async fn soft_deleted_book_still_occupies_its_name() {
  let s = store().await;
  let created = s.insert_book(book("Team A")).await.unwrap();
  s.soft_delete_book(created.id, Utc::now(), None).await.unwrap();

  let err = s.insert_book(book("Team A")).await.unwrap_err();
  assert!(matches!(err, Error::Constraint { field: "name" }));

  // Hard delete frees the name.
  assert!(s.hard_delete_book(created.id).await.unwrap());
  s.insert_book(book("Team A")).await.unwrap();
}

#[tokio::test]
async fn fetch_hides_soft_deleted_unless_asked() {
  let s = store().await;
  let created = s.insert_book(book("Hidden")).await.unwrap();
  s.soft_delete_book(created.id, Utc::now(), None).await.unwrap();

  assert!(s.fetch_book(created.id, false).await.unwrap().is_none());
  let raw = s.fetch_book(created.id, true).await.unwrap().unwrap();
  assert!(raw.deleted);
  assert!(raw.deleted_on.is_some());
}

#[tokio::test]
async fn update_book_writes_columns_and_refreshes_updated_on() {
  let s = store().await;
  let created = s.insert_book(book("Before")).await.unwrap();

  let updated = s
    .update_book(created.id, BookRecordUpdate {
      name:       "After".into(),
      changed_by: Some("editor".into()),
      deleted:    false,
      deleted_on: None,
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.name, "After");
  assert_eq!(updated.changed_by.as_deref(), Some("editor"));
  assert_eq!(updated.created_by.as_deref(), Some("tester"));
  assert!(updated.updated_on >= created.updated_on);
}

#[tokio::test]
async fn update_book_missing_id_returns_none() {
  let s = store().await;
  let result = s
    .update_book(999, BookRecordUpdate {
      name:       "Ghost".into(),
      changed_by: None,
      deleted:    false,
      deleted_on: None,
    })
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn rename_onto_taken_name_is_a_constraint_violation() {
  let s = store().await;
  s.insert_book(book("Taken")).await.unwrap();
  let other = s.insert_book(book("Free")).await.unwrap();

  let err = s
    .update_book(other.id, BookRecordUpdate {
      name:       "Taken".into(),
      changed_by: None,
      deleted:    false,
      deleted_on: None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Constraint { field: "name" }));
}

// ─── Soft-delete cascade ─────────────────────────────────────────────────────

#[tokio::test]
async fn soft_delete_book_cascades_to_all_contacts() {
  let s = store().await;
  let b = s.insert_book(book("Team A")).await.unwrap();
  let active = s
    .insert_contact(contact(b.id, "Alice", "alice@example.com"))
    .await
    .unwrap();
  let gone = s
    .insert_contact(contact(b.id, "Bob", "bob@example.com"))
    .await
    .unwrap();
  // One contact already soft-deleted with its own timestamp.
  s.soft_delete_contact(gone.id, Utc::now(), None).await.unwrap();

  let at = Utc::now();
  let marked = s.soft_delete_book(b.id, at, Some("tester".into()))
    .await
    .unwrap()
    .unwrap();
  assert!(marked.deleted);
  assert_eq!(marked.deleted_on, Some(at));
  assert_eq!(marked.changed_by.as_deref(), Some("tester"));

  // Both contacts carry the book's timestamp, prior state notwithstanding.
  for id in [active.id, gone.id] {
    let c = s.fetch_contact(id, true).await.unwrap().unwrap();
    assert!(c.deleted);
    assert_eq!(c.deleted_on, Some(at));
  }
}

#[tokio::test]
async fn soft_delete_missing_book_returns_none() {
  let s = store().await;
  let result = s.soft_delete_book(77, Utc::now(), None).await.unwrap();
  assert!(result.is_none());
}

// ─── Hard delete ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn hard_delete_book_removes_owned_contacts() {
  let s = store().await;
  let b = s.insert_book(book("Doomed")).await.unwrap();
  let c = s
    .insert_contact(contact(b.id, "Alice", "alice@example.com"))
    .await
    .unwrap();

  assert!(s.hard_delete_book(b.id).await.unwrap());
  assert!(s.fetch_book(b.id, true).await.unwrap().is_none());
  assert!(s.fetch_contact(c.id, true).await.unwrap().is_none());
}

#[tokio::test]
async fn hard_delete_missing_rows_report_not_found() {
  let s = store().await;
  assert!(!s.hard_delete_book(5).await.unwrap());
  assert!(!s.hard_delete_contact(5).await.unwrap());
}

// ─── Contacts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn email_unique_within_book_but_not_across_books() {
  let s = store().await;
  let a = s.insert_book(book("Team A")).await.unwrap();
  let b = s.insert_book(book("Team B")).await.unwrap();

  s.insert_contact(contact(a.id, "Bob", "bob@x.com")).await.unwrap();

  let err = s
    .insert_contact(contact(a.id, "Robert", "bob@x.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Constraint { field: "email" }));

  // Same address in a different book is fine.
  s.insert_contact(contact(b.id, "Bob", "bob@x.com")).await.unwrap();
}

#[tokio::test]
async fn contact_requires_existing_book() {
  let s = store().await;
  let err = s
    .insert_contact(contact(404, "Nobody", "nobody@example.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Constraint { field: "contact_book" }));
}

#[tokio::test]
async fn update_contact_can_move_between_books() {
  let s = store().await;
  let a = s.insert_book(book("Team A")).await.unwrap();
  let b = s.insert_book(book("Team B")).await.unwrap();
  let c = s
    .insert_contact(contact(a.id, "Alice", "alice@example.com"))
    .await
    .unwrap();

  let moved = s
    .update_contact(c.id, ContactRecordUpdate {
      name:            "Alice".into(),
      email:           "alice@example.com".into(),
      contact_book_id: b.id,
      changed_by:      Some("editor".into()),
      deleted:         false,
      deleted_on:      None,
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(moved.contact_book_id, b.id);
  assert_eq!(moved.changed_by.as_deref(), Some("editor"));
}

#[tokio::test]
async fn soft_delete_contact_marks_only_that_contact() {
  let s = store().await;
  let b = s.insert_book(book("Team A")).await.unwrap();
  let one = s
    .insert_contact(contact(b.id, "Alice", "alice@example.com"))
    .await
    .unwrap();
  let two = s
    .insert_contact(contact(b.id, "Bob", "bob@example.com"))
    .await
    .unwrap();

  let at = Utc::now();
  let marked = s
    .soft_delete_contact(one.id, at, Some("tester".into()))
    .await
    .unwrap()
    .unwrap();
  assert!(marked.deleted);
  assert_eq!(marked.deleted_on, Some(at));

  let untouched = s.fetch_contact(two.id, false).await.unwrap();
  assert!(untouched.is_some());
  let parent = s.fetch_book(b.id, false).await.unwrap().unwrap();
  assert!(!parent.deleted);
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_books_orders_newest_first() {
  let s = store().await;
  for name in ["First", "Second", "Third"] {
    s.insert_book(book(name)).await.unwrap();
  }

  let listed =
    s.list_books(BookFilter::default(), 10, 0).await.unwrap();
  let names: Vec<_> = listed.iter().map(|b| b.name.as_str()).collect();
  assert_eq!(names, ["Third", "Second", "First"]);
}

#[tokio::test]
async fn list_books_windows_with_limit_and_offset() {
  let s = store().await;
  for i in 0..25 {
    s.insert_book(book(&format!("book-{i:02}"))).await.unwrap();
  }

  let first = s.list_books(BookFilter::default(), 15, 0).await.unwrap();
  assert_eq!(first.len(), 15);
  let second = s.list_books(BookFilter::default(), 15, 15).await.unwrap();
  assert_eq!(second.len(), 10);
  // Windows do not overlap.
  assert!(first.last().unwrap().id > second.first().unwrap().id);

  let total = s.count_books(BookFilter::default()).await.unwrap();
  assert_eq!(total, 25);
}

#[tokio::test]
async fn book_name_filter_is_exact_and_case_insensitive() {
  let s = store().await;
  s.insert_book(book("Team A")).await.unwrap();
  s.insert_book(book("Team A extras")).await.unwrap();

  let filter = BookFilter { name: Some("team a".into()), ..Default::default() };
  let listed = s.list_books(filter.clone(), 10, 0).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].name, "Team A");
  assert_eq!(s.count_books(filter).await.unwrap(), 1);
}

#[tokio::test]
async fn book_search_matches_id_and_name_substrings() {
  let s = store().await;
  let first = s.insert_book(book("Engineering")).await.unwrap();
  s.insert_book(book("Sales")).await.unwrap();

  let by_name = BookFilter { search: Some("GINEER".into()), ..Default::default() };
  let listed = s.list_books(by_name, 10, 0).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].name, "Engineering");

  let by_id =
    BookFilter { search: Some(first.id.to_string()), ..Default::default() };
  let listed = s.list_books(by_id, 10, 0).await.unwrap();
  assert!(listed.iter().any(|b| b.id == first.id));
}

#[tokio::test]
async fn lists_hide_soft_deleted_unless_asked() {
  let s = store().await;
  let keep = s.insert_book(book("Keep")).await.unwrap();
  let hidden = s.insert_book(book("Drop")).await.unwrap();
  s.soft_delete_book(hidden.id, Utc::now(), None).await.unwrap();

  let visible = s.list_books(BookFilter::default(), 10, 0).await.unwrap();
  assert_eq!(visible.len(), 1);
  assert_eq!(visible[0].id, keep.id);
  assert_eq!(s.count_books(BookFilter::default()).await.unwrap(), 1);

  let all_filter = BookFilter { include_deleted: true, ..Default::default() };
  let all = s.list_books(all_filter.clone(), 10, 0).await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(s.count_books(all_filter).await.unwrap(), 2);
}

#[tokio::test]
async fn contact_filters_compose_with_and() {
  let s = store().await;
  let a = s.insert_book(book("Team A")).await.unwrap();
  let b = s.insert_book(book("Team B")).await.unwrap();
  s.insert_contact(contact(a.id, "Alice", "alice@x.com")).await.unwrap();
  s.insert_contact(contact(a.id, "Bob", "bob@x.com")).await.unwrap();
  s.insert_contact(contact(b.id, "Alice", "alice@x.com")).await.unwrap();

  // email filter alone spans books
  let by_email = ContactFilter {
    email: Some("ALICE@X.COM".into()),
    ..Default::default()
  };
  assert_eq!(s.count_contacts(by_email).await.unwrap(), 2);

  // AND-composed with the book restriction
  let scoped = ContactFilter {
    email: Some("alice@x.com".into()),
    contact_book_id: Some(a.id),
    ..Default::default()
  };
  let listed = s.list_contacts(scoped, 10, 0).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].contact_book_id, a.id);

  let by_name = ContactFilter { name: Some("bob".into()), ..Default::default() };
  assert_eq!(s.count_contacts(by_name).await.unwrap(), 1);
}

#[tokio::test]
async fn list_contacts_orders_newest_first() {
  let s = store().await;
  let b = s.insert_book(book("Team A")).await.unwrap();
  for i in 0..3 {
    s.insert_contact(contact(b.id, &format!("c{i}"), &format!("c{i}@x.com")))
      .await
      .unwrap();
  }

  let listed =
    s.list_contacts(ContactFilter::default(), 10, 0).await.unwrap();
  let names: Vec<_> = listed.iter().map(|c| c.name.as_str()).collect();
  assert_eq!(names, ["c2", "c1", "c0"]);
}
