//! Behaviour-driven step definitions driving the history CLI scenarios.

use super::helpers::{Workspace, lima_request, stdout_text};
use super::*;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use std::cell::RefCell;

#[derive(Debug)]
struct HistoryWorld {
    workspace: Workspace,
    store_path: Utf8PathBuf,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl HistoryWorld {
    fn new() -> Self {
        let workspace = Workspace::new();
        let store_path = workspace.path("history.db");
        Self {
            workspace,
            store_path,
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn save_calculation(&self, group_id: u64) {
        let request_path = self
            .workspace
            .write_json("request.json", &lima_request(group_id));
        let argv = [
            "mesa".to_owned(),
            "calculate".to_owned(),
            request_path.as_str().to_owned(),
            format!("--{ARG_STORE}"),
            self.store_path.as_str().to_owned(),
        ];
        let cli = Cli::try_parse_from(argv).expect("arguments should parse");
        let Command::Calculate(args) = cli.command else {
            panic!("expected calculate command");
        };
        let mut sink = Vec::new();
        if let Err(err) = calculate::run_calculate_with(args, &mut sink) {
            panic!("saving calculation failed: {err}");
        }
    }
}

#[fixture]
fn world() -> HistoryWorld {
    HistoryWorld::new()
}

#[given("calculations for groups 1, 2 and 1 were saved")]
fn calculations_saved(#[from(world)] world: &HistoryWorld) {
    for group_id in [1, 2, 1] {
        world.save_calculation(group_id);
    }
}

#[given("no history store exists")]
fn no_store(#[from(world)] world: &HistoryWorld) {
    assert!(!world.store_path.exists());
}

#[when("I list the history for group {group_id}")]
fn list_history(#[from(world)] world: &HistoryWorld, group_id: u64) {
    let argv = [
        "mesa".to_owned(),
        "history".to_owned(),
        format!("--{ARG_STORE}"),
        world.store_path.as_str().to_owned(),
        format!("--{ARG_GROUP}"),
        group_id.to_string(),
    ];
    let cli = Cli::try_parse_from(argv).expect("arguments should parse");
    let Command::History(args) = cli.command else {
        panic!("expected history command");
    };
    let mut buffer = world.stdout.borrow_mut();
    let outcome = history::run_history_with(args, &mut *buffer);
    world.result.replace(Some(outcome));
}

#[then("{count} stored calculations are printed")]
fn stored_calculations_printed(#[from(world)] world: &HistoryWorld, count: usize) {
    if let Some(Err(err)) = world.result.borrow().as_ref() {
        panic!("history failed: {err}");
    }
    let json: Value =
        serde_json::from_str(&stdout_text(&world.stdout.borrow())).expect("JSON output");
    let rows = json.as_array().expect("history array");
    assert_eq!(rows.len(), count);
    let ids: Vec<u64> = rows.iter().filter_map(|row| row["id"].as_u64()).collect();
    assert_eq!(ids, vec![1, 3]);
    assert!(rows.iter().all(|row| row["groupId"] == 1));
}

#[then("the command fails because the store is missing")]
fn store_is_missing(#[from(world)] world: &HistoryWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingSourceFile { field, .. } => assert_eq!(*field, ARG_STORE),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[scenario(path = "tests/features/history_command.feature", index = 0)]
fn history_lists_group(#[from(world)] world: HistoryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/history_command.feature", index = 1)]
fn history_requires_store(#[from(world)] world: HistoryWorld) {
    let _ = world;
}
