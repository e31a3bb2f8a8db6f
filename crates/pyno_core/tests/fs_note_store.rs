use chrono::NaiveDate;
use pyno_core::{CleanupOutcome, DailyNoteService, FsNoteStore, NoteStore, StoreError};
use std::fs;

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

#[test]
fn write_read_delete_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FsNoteStore::new(dir.path());

    store.write(date(1, 5), "# 2024-01-05\n").unwrap();
    assert!(dir.path().join("2024/01/2024-01-05.md").is_file());
    assert_eq!(store.read(date(1, 5)).unwrap(), "# 2024-01-05\n");

    store.write(date(1, 5), "replaced\n").unwrap();
    assert_eq!(store.read(date(1, 5)).unwrap(), "replaced\n");

    store.delete(date(1, 5)).unwrap();
    assert!(matches!(store.read(date(1, 5)), Err(StoreError::NotFound(_))));
    assert!(matches!(store.delete(date(1, 5)), Err(StoreError::NotFound(_))));
}

#[test]
fn list_dates_is_sorted_across_months_and_ignores_foreign_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FsNoteStore::new(dir.path());
    store.write(date(2, 1), "b").unwrap();
    store.write(date(1, 31), "a").unwrap();
    store.write(date(12, 24), "c").unwrap();

    fs::write(dir.path().join("2024/01/notes.md"), "x").unwrap();
    fs::write(dir.path().join("2024/01/2024-01-07.txt"), "x").unwrap();
    fs::create_dir_all(dir.path().join("archive/01")).unwrap();
    fs::write(dir.path().join("archive/01/2024-01-03.md"), "x").unwrap();
    // Filed under the wrong month.
    fs::write(dir.path().join("2024/02/2024-01-09.md"), "x").unwrap();

    assert_eq!(
        store.list_dates().unwrap(),
        vec![date(1, 31), date(2, 1), date(12, 24)]
    );
}

#[test]
fn missing_root_lists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsNoteStore::new(dir.path().join("not-yet-created"));
    assert!(store.list_dates().unwrap().is_empty());
}

#[test]
fn writes_leave_no_temp_files_behind() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FsNoteStore::new(dir.path());
    store.write(date(3, 1), "one").unwrap();
    store.write(date(3, 1), "two").unwrap();

    let names = fs::read_dir(dir.path().join("2024/03"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["2024-03-01.md".to_string()]);
}

#[test]
fn daily_run_on_disk_spans_month_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FsNoteStore::new(dir.path());
    store
        .write(date(1, 30), "# 2024-01-30\n\n## todo\n- [ ] file taxes\n")
        .unwrap();
    store
        .write(date(1, 31), "# 2024-01-31\n\n## todo\n- [ ] 2024-01-30: file taxes\n")
        .unwrap();

    let mut service = DailyNoteService::new(store);
    let report = service.run_daily(date(2, 1)).unwrap();
    assert_eq!(report.cleanup, CleanupOutcome::Deleted { date: date(1, 31) });

    let today = fs::read_to_string(dir.path().join("2024/02/2024-02-01.md")).unwrap();
    assert_eq!(today, "# 2024-02-01\n\n## todo\n- [ ] 2024-01-30: file taxes\n");
    assert!(!dir.path().join("2024/01/2024-01-31.md").exists());
}
