use chrono::NaiveDate;
use jotter_core::board::{Board, Intent};
use jotter_core::config::Config;
use jotter_core::item::{ItemId, TodoItem};
use jotter_core::list::TodoList;
use jotter_core::render::Renderer;
use jotter_core::session::run_session;

fn item(id: u64, text: &str, completed: bool) -> TodoItem {
    let mut item = TodoItem::new(ItemId(id), text.to_string(), None);
    item.completed = completed;
    item
}

fn texts(list: &TodoList) -> Vec<&str> {
    list.items().iter().map(|item| item.text.as_str()).collect()
}

#[test]
fn add_to_empty_list() {
    let mut list = TodoList::new();
    list.add("Buy milk", NaiveDate::from_ymd_opt(2024, 12, 1))
        .expect("add accepted");

    assert_eq!(list.len(), 1);
    let only = &list.items()[0];
    assert_eq!(only.text, "Buy milk");
    assert_eq!(only.deadline, NaiveDate::from_ymd_opt(2024, 12, 1));
    assert!(!only.completed);
}

#[test]
fn toggle_moves_item_behind_open_items_but_ahead_of_older_completed() {
    let mut list = TodoList::from_items(vec![
        item(1, "A", false),
        item(2, "B", false),
        item(3, "C", true),
    ]);

    list.toggle_complete(ItemId(1));

    let state: Vec<(&str, bool)> = list
        .items()
        .iter()
        .map(|item| (item.text.as_str(), item.completed))
        .collect();
    assert_eq!(state, vec![("B", false), ("A", true), ("C", true)]);
}

#[test]
fn drag_first_row_onto_third() {
    let mut board = Board::new(TodoList::from_items(vec![
        item(1, "A", false),
        item(2, "B", false),
        item(3, "C", false),
        item(4, "D", false),
    ]));

    board.dispatch(Intent::DragStart(0));
    board.dispatch(Intent::DragEnter(1));
    board.dispatch(Intent::DragEnter(2));
    assert!(board.dispatch(Intent::DragEnd));

    assert_eq!(texts(board.list()), vec!["B", "C", "A", "D"]);
}

#[test]
fn scripted_session_end_to_end() {
    let script = "\
# start from an empty board
add Buy milk due:2024-12-01
add Walk the dog
add Call mom
toggle 1
move 1 2
delete 3
export
";

    let mut board = Board::new(TodoList::new());
    let renderer = Renderer::plain(&Config::default());
    let mut out = Vec::new();
    run_session(&mut board, &renderer, script.as_bytes(), &mut out, false)
        .expect("session runs");

    // [Call mom, Walk the dog, Buy milk] -> toggle 1 -> [Call mom, Walk the dog, Buy milk(x)]
    // -> move 1 2 -> [Walk the dog, Call mom, Buy milk(x)] -> delete 3 (Call mom)
    assert_eq!(texts(board.list()), vec!["Walk the dog", "Buy milk"]);
    assert!(board.list().items()[1].completed);

    let out = String::from_utf8(out).expect("utf8");
    assert!(out.contains("Nothing to do... maybe put on some jazz?"));
    assert!(out.contains("1 open, 1 done"));
    assert!(out.contains("\"deadline\": \"2024-12-01\""));
}

#[test]
fn sample_board_renders_with_positions() {
    let board = Board::new(TodoList::with_samples());
    let renderer = Renderer::plain(&Config::default());
    let mut out = Vec::new();
    renderer
        .print_board(&mut out, board.list().items())
        .expect("render");

    let out = String::from_utf8(out).expect("utf8");
    let rows: Vec<&str> = out.lines().skip(3).take(3).collect();
    assert!(rows[0].starts_with("1 1  [ ]  Go buy vinyl records"));
    assert!(rows[1].starts_with("2 3  [ ]  Jazz dance party"));
    assert!(rows[2].starts_with("3 2  [x]  Repair the old radio"));
}
