use chrono::NaiveDate;
use daybook_shared::{
  DateKey,
  MemoryRepository,
  Session,
  StoreError,
  SubmitOutcome,
  TaskMap,
  TaskRepository
};

fn today() -> NaiveDate {
  NaiveDate::from_ymd_opt(2024, 5, 15)
    .expect("valid date")
}

fn key(raw: &str) -> DateKey {
  DateKey::parse(raw).expect("valid key")
}

fn map_of(
  raw: &str,
  texts: &[&str]
) -> TaskMap {
  let mut map = TaskMap::new();
  map.insert(
    key(raw),
    texts
      .iter()
      .map(|text| text.to_string())
      .collect()
  );
  map
}

#[test]
fn buy_milk_scenario() {
  let mut session =
    Session::open(MemoryRepository::new(), today());
  session.click_day(10).expect("May 10");

  session.set_draft("Buy milk");
  session.submit().expect("add");
  assert_eq!(
    session.store().snapshot(),
    map_of("2024-05-10", &["Buy milk"])
  );

  session.set_draft("Call Bob");
  session.submit().expect("add");
  assert_eq!(
    session.store().snapshot(),
    map_of("2024-05-10", &["Buy milk", "Call Bob"])
  );

  session.begin_edit(0).expect("edit");
  session.set_draft("Buy oat milk");
  assert_eq!(
    session.submit().expect("update"),
    SubmitOutcome::Updated { index: 0 }
  );
  assert_eq!(
    session.store().snapshot(),
    map_of("2024-05-10", &["Buy oat milk", "Call Bob"])
  );

  session.delete(1).expect("delete");
  assert_eq!(
    session.store().snapshot(),
    map_of("2024-05-10", &["Buy oat milk"])
  );

  session.delete(0).expect("delete");
  assert!(session.store().snapshot().is_empty());
  assert_eq!(
    session.store().repository().raw(),
    Some("{}")
  );
  // one write per mutation
  assert_eq!(
    session.store().repository().save_count(),
    5
  );
}

#[test]
fn reload_reconstructs_the_same_map() {
  let mut session =
    Session::open(MemoryRepository::new(), today());
  for (day, text) in
    [(3, "Dentist"), (10, "Buy milk"), (10, "Call Bob")]
  {
    session.click_day(day).expect("day");
    session.set_draft(text);
    session.submit().expect("add");
  }
  let before = session.store().snapshot();

  let raw = session
    .store()
    .repository()
    .raw()
    .expect("persisted")
    .to_string();
  let reloaded = Session::open(
    MemoryRepository::with_raw(raw),
    today()
  );

  assert_eq!(reloaded.store().snapshot(), before);
  assert_eq!(
    MemoryRepository::with_raw(
      reloaded
        .store()
        .repository()
        .raw()
        .expect("slot")
    )
    .load()
    .expect("decode"),
    before
  );
}

#[test]
fn moved_edit_target_follows_its_task() {
  let mut session =
    Session::open(MemoryRepository::new(), today());
  session.click_day(10).expect("day");
  for text in ["first", "second"] {
    session.set_draft(text);
    session.submit().expect("add");
  }

  session.begin_edit(1).expect("edit");
  session
    .store_mut()
    .delete_task(key("2024-05-10"), 0)
    .expect("external delete");

  session.set_draft("second, revised");
  assert_eq!(
    session.submit().expect("update"),
    SubmitOutcome::Updated { index: 0 }
  );
  assert_eq!(
    session.store().snapshot(),
    map_of("2024-05-10", &["second, revised"])
  );
}

#[test]
fn stale_edit_target_is_rejected() {
  let mut session =
    Session::open(MemoryRepository::new(), today());
  session.click_day(10).expect("day");
  session.set_draft("doomed");
  session.submit().expect("add");

  session.begin_edit(0).expect("edit");
  session
    .store_mut()
    .delete_task(key("2024-05-10"), 0)
    .expect("external delete");

  session.set_draft("revived");
  let err = session
    .submit()
    .expect_err("target is gone");
  assert_eq!(
    err.downcast_ref::<StoreError>(),
    Some(&StoreError::StaleTask {
      key: key("2024-05-10")
    })
  );
  assert!(session.store().is_empty());
  assert!(!session.is_editing());
  assert_eq!(session.draft(), "revived");
}

#[test]
fn corrupt_storage_starts_empty_and_recovers() {
  let mut session = Session::open(
    MemoryRepository::with_raw("[1, 2"),
    today()
  );
  assert!(session.store().is_empty());

  session.click_day(1).expect("day");
  session.set_draft("fresh start");
  session.submit().expect("add");
  assert_eq!(
    session.store().repository().raw(),
    Some(r#"{"2024-05-01":["fresh start"]}"#)
  );
}

#[test]
fn failed_save_still_clears_the_form() {
  let mut session = Session::open(
    MemoryRepository::new().read_only(),
    today()
  );
  session.click_day(10).expect("day");

  session.set_draft("Buy milk");
  let err = session
    .submit()
    .expect_err("save refused");
  assert!(StoreError::is_unsaved(&err));
  assert_eq!(session.draft(), "");
  assert_eq!(
    session.store().snapshot(),
    map_of("2024-05-10", &["Buy milk"])
  );

  // pressing submit again must not
  // duplicate the task
  assert_eq!(
    session.submit().expect("blank submit"),
    SubmitOutcome::Ignored
  );
  assert_eq!(session.selected_tasks().len(), 1);

  session.begin_edit(0).expect("edit");
  session.set_draft("Buy oat milk");
  let err = session
    .submit()
    .expect_err("save refused");
  assert!(StoreError::is_unsaved(&err));
  assert!(!session.is_editing());
  assert_eq!(session.draft(), "");
  assert_eq!(
    session.store().snapshot(),
    map_of("2024-05-10", &["Buy oat milk"])
  );

  session.begin_edit(0).expect("edit");
  let err = session
    .delete(0)
    .expect_err("save refused");
  assert!(StoreError::is_unsaved(&err));
  assert!(!session.is_editing());
  assert!(session.store().is_empty());
  assert_eq!(session.store().repository().raw(), None);
}
