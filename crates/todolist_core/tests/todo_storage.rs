use std::fs;
use todolist_core::{JsonFileTodoRepository, Todo, TodoPatch, TodoRepository};

fn temp_repo() -> (tempfile::TempDir, JsonFileTodoRepository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileTodoRepository::new(dir.path().join("todos.json"));
    (dir, repo)
}

#[test]
fn missing_file_reads_as_empty_list() {
    let (_dir, repo) = temp_repo();

    assert!(repo.get_all().unwrap().is_empty());
    assert!(repo.get_by_id("anything").unwrap().is_none());
}

#[test]
fn blank_and_invalid_content_read_as_empty_list() {
    let (_dir, repo) = temp_repo();

    for content in ["", "  \n", "not json", "{\"id\": 1}", "[{\"id\": \"x\"}]"] {
        fs::write(repo.path(), content).unwrap();
        assert!(repo.get_all().unwrap().is_empty(), "content: {content:?}");
    }

    fs::write(repo.path(), [0xff, 0xfe, 0x00]).unwrap();
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn offsetless_timestamps_are_read_and_survive_a_save() {
    let (_dir, repo) = temp_repo();
    fs::write(
        repo.path(),
        r#"[{"id":"keep-1","title":"Legacy","description":"","completed":false,"createdAt":"2024-01-01T10:00:00.000","updatedAt":"2024-01-02"}]"#,
    )
    .unwrap();

    let before = repo.get_all().unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].id, "keep-1");

    let added = Todo::create("New", "").unwrap();
    repo.save(&added).unwrap();

    let all = repo.get_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, "keep-1");
    assert_eq!(all[1], added);

    let raw = fs::read_to_string(repo.path()).unwrap();
    assert!(raw.contains("\"createdAt\": \"2024-01-01T10:00:00.000Z\""));
}

#[test]
fn save_then_get_all_roundtrips_exactly_one_entity() {
    let (_dir, repo) = temp_repo();
    let todo = Todo::create("Persist me", "with description").unwrap();

    repo.save(&todo).unwrap();

    let all = repo.get_all().unwrap();
    assert_eq!(all, vec![todo.clone()]);
    assert_eq!(repo.get_by_id(&todo.id).unwrap(), Some(todo));
}

#[test]
fn save_with_existing_id_replaces_in_place() {
    let (_dir, repo) = temp_repo();
    let first = Todo::create("first", "").unwrap();
    let second = Todo::create("second", "").unwrap();
    repo.save(&first).unwrap();
    repo.save(&second).unwrap();

    let edited = first.update(&TodoPatch::title("first, edited")).unwrap();
    repo.save(&edited).unwrap();

    let all = repo.get_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], edited);
    assert_eq!(all[1], second);
}

#[test]
fn delete_absent_id_returns_false_and_leaves_file_untouched() {
    let (_dir, repo) = temp_repo();
    let todo = Todo::create("stay", "").unwrap();
    repo.save(&todo).unwrap();
    let before = fs::read_to_string(repo.path()).unwrap();

    assert!(!repo.delete_by_id("does-not-exist").unwrap());

    assert_eq!(fs::read_to_string(repo.path()).unwrap(), before);
    assert_eq!(repo.get_all().unwrap(), vec![todo]);
}

#[test]
fn delete_absent_id_on_missing_file_does_not_create_it() {
    let (_dir, repo) = temp_repo();

    assert!(!repo.delete_by_id("ghost").unwrap());
    assert!(!repo.path().exists());
}

#[test]
fn delete_present_id_removes_exactly_that_entity() {
    let (_dir, repo) = temp_repo();
    let keep_a = Todo::create("a", "").unwrap();
    let remove = Todo::create("b", "").unwrap();
    let keep_c = Todo::create("c", "").unwrap();
    for todo in [&keep_a, &remove, &keep_c] {
        repo.save(todo).unwrap();
    }

    assert!(repo.delete_by_id(&remove.id).unwrap());

    assert_eq!(repo.get_all().unwrap(), vec![keep_a, keep_c]);
}

#[test]
fn persisted_file_is_a_json_array_with_string_timestamps() {
    let (_dir, repo) = temp_repo();
    let todo = Todo::create("on disk", "").unwrap().toggle_completion();
    repo.save(&todo).unwrap();

    let raw = fs::read_to_string(repo.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["completed"], true);
    assert!(records[0]["createdAt"].as_str().unwrap().ends_with('Z'));
    assert!(records[0]["updatedAt"].is_string());
}
