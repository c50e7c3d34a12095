use todolist_core::{
    JsonFileTodoRepository, TodoPatch, TodoRepository, TodoService, TodoServiceError,
    TodoValidationError,
};

fn temp_service() -> (tempfile::TempDir, TodoService<JsonFileTodoRepository>) {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileTodoRepository::new(dir.path().join("todos.json"));
    (dir, TodoService::new(repo))
}

#[test]
fn create_persists_and_get_returns_it() {
    let (_dir, service) = temp_service();

    let created = service.create_todo("A", "B").unwrap();
    let fetched = service.get_todo(&created.id).unwrap();

    assert_eq!(fetched, created);
    assert_eq!(service.list_todos().unwrap(), vec![created]);
}

#[test]
fn create_with_blank_title_is_validation_error_and_writes_nothing() {
    let (_dir, service) = temp_service();

    let err = service.create_todo("  ", "desc").unwrap_err();
    assert!(matches!(
        err,
        TodoServiceError::Validation(TodoValidationError::EmptyTitle)
    ));
    assert!(!service.repository().path().exists());
}

#[test]
fn update_unknown_id_is_not_found_even_with_invalid_patch() {
    let (_dir, service) = temp_service();

    let err = service
        .update_todo("missing", &TodoPatch::title(""))
        .unwrap_err();
    assert!(matches!(err, TodoServiceError::NotFound(id) if id == "missing"));
}

#[test]
fn update_persists_changes_and_rejects_empty_title() {
    let (_dir, service) = temp_service();
    let created = service.create_todo("Before", "desc").unwrap();

    let updated = service
        .update_todo(&created.id, &TodoPatch::title("After"))
        .unwrap();
    assert_eq!(updated.title, "After");
    assert_eq!(service.get_todo(&created.id).unwrap(), updated);

    let err = service
        .update_todo(&created.id, &TodoPatch::title(""))
        .unwrap_err();
    assert!(matches!(err, TodoServiceError::Validation(_)));
    assert_eq!(service.get_todo(&created.id).unwrap().title, "After");
}

#[test]
fn toggle_flips_and_persists() {
    let (_dir, service) = temp_service();
    let created = service.create_todo("flip", "").unwrap();

    assert!(service.toggle_todo(&created.id).unwrap().completed);
    assert!(service.get_todo(&created.id).unwrap().completed);
    assert!(!service.toggle_todo(&created.id).unwrap().completed);

    let err = service.toggle_todo("nope").unwrap_err();
    assert!(matches!(err, TodoServiceError::NotFound(_)));
}

#[test]
fn delete_removes_and_second_delete_is_not_found() {
    let (_dir, service) = temp_service();
    let created = service.create_todo("bye", "").unwrap();

    service.delete_todo(&created.id).unwrap();
    assert!(matches!(
        service.get_todo(&created.id).unwrap_err(),
        TodoServiceError::NotFound(_)
    ));
    assert!(matches!(
        service.delete_todo(&created.id).unwrap_err(),
        TodoServiceError::NotFound(_)
    ));
    assert!(service.repository().get_all().unwrap().is_empty());
}

#[test]
fn toggle_works_on_stored_record_with_blank_title() {
    let (_dir, service) = temp_service();
    std::fs::write(
        service.repository().path(),
        r#"[{"id":"t1","title":"  ","description":"","completed":false,"createdAt":"2024-01-01T10:00:00.000Z","updatedAt":"2024-01-01T10:00:00.000Z"}]"#,
    )
    .unwrap();

    let toggled = service.toggle_todo("t1").unwrap();
    assert!(toggled.completed);
    assert_eq!(toggled.title, "  ");
    assert!(service.get_todo("t1").unwrap().completed);

    let err = service
        .update_todo("t1", &TodoPatch::title(" "))
        .unwrap_err();
    assert!(matches!(err, TodoServiceError::Validation(_)));
}
