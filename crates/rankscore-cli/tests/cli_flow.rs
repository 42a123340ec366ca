use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

struct Table {
    dir: TempDir,
}

impl Table {
    fn new() -> Self {
        let dir = tempdir().expect("temp dir");
        fs::write(
            dir.path().join("rankscore.yaml"),
            "store:\n  path: \"game.json\"\nauto_advance_ms: 0\nseats:\n  south: \"Binh\"\n",
        )
        .expect("write config");
        Self { dir }
    }

    fn store(&self) -> PathBuf {
        self.dir.path().join("game.json")
    }

    fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("rankscore").expect("binary built");
        cmd.current_dir(self.dir.path()).args(args);
        cmd
    }

    fn ok(&self, args: &[&str]) -> String {
        let output = self.cmd(args).assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("utf8 stdout")
    }

    fn history(&self) -> serde_json::Value {
        serde_json::from_str(&self.ok(&["--quiet", "history", "--json"])).expect("history json")
    }
}

fn play_round(table: &Table, order: [&str; 3]) {
    table.ok(&["start"]);
    for seat in order {
        table.ok(&["select", seat]);
    }
    table.ok(&["commit"]);
}

fn saved(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&fs::read(path).expect("store written")).expect("store json")
}

#[test]
fn full_round_with_override_is_recorded() {
    let table = Table::new();
    table
        .cmd(&["new", "--name", "north=An"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Game started"));
    table.ok(&["select", "east"]);
    table.ok(&["select", "south"]);
    table
        .cmd(&["select", "west"])
        .assert()
        .success()
        .stdout(predicate::str::contains("An").and(predicate::str::contains("4th")));

    table
        .cmd(&["commit", "--set", "east=5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Round 1 saved"));

    let history = table.history();
    assert_eq!(history[0]["roundNumber"], 1);
    assert_eq!(history[0]["scores"]["east"], 5);
    assert_eq!(history[0]["ranks"]["east"], 1);
    assert_eq!(history[0]["scores"]["north"], 0);

    let store = saved(&table.store());
    assert_eq!(store["players"]["east"]["total"], 5);
    assert_eq!(store["players"]["north"]["name"], "An");
    assert_eq!(store["players"]["south"]["name"], "Binh");
    assert_eq!(store["nextRoundNumber"], 2);
}

#[test]
fn deselect_between_invocations_closes_the_gap() {
    let table = Table::new();
    table.ok(&["start"]);
    table.ok(&["select", "east"]);
    table.ok(&["select", "south"]);
    table.ok(&["select", "west"]);
    table.ok(&["deselect", "south"]);

    let store = saved(&table.store());
    let ranks: Vec<(String, u64)> = store["activeAssignments"]
        .as_array()
        .expect("assignments")
        .iter()
        .map(|a| {
            (
                a["seat"].as_str().expect("seat").to_string(),
                a["rank"].as_u64().expect("rank"),
            )
        })
        .collect();
    assert_eq!(
        ranks,
        vec![
            ("east".to_string(), 1),
            ("west".to_string(), 2),
            ("north".to_string(), 3),
        ]
    );

    table
        .cmd(&["select", "south"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already ranked"));
}

#[test]
fn delete_keeps_later_rounds_and_numbering() {
    let table = Table::new();
    play_round(&table, ["east", "south", "west"]);
    play_round(&table, ["north", "west", "east"]);

    table
        .cmd(&["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Round 1 deleted"));
    play_round(&table, ["south", "north", "east"]);

    let numbers: Vec<u64> = table
        .history()
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["roundNumber"].as_u64().expect("number"))
        .collect();
    assert_eq!(numbers, vec![3, 2]);
}

#[test]
fn rejected_actions_exit_with_code_two() {
    let table = Table::new();
    table
        .cmd(&["undo"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no recorded round"));
    table
        .cmd(&["commit"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot commit"));
    assert!(!table.store().exists());
}

#[test]
fn corrupt_save_is_discarded() {
    let table = Table::new();
    fs::write(table.store(), "{ definitely not json").expect("write corrupt save");

    table
        .cmd(&["show"])
        .assert()
        .success()
        .stderr(predicate::str::contains("discarded"))
        .stdout(predicate::str::contains("Round 1 not started"));
    assert!(!table.store().exists());
}

#[test]
fn session_reads_commands_from_stdin() {
    let table = Table::new();
    table
        .cmd(&["session"])
        .write_stdin("start\nselect e\nselect s\nselect w\ncommit\nundo\nhistory\nquit\nstart\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Round 1 saved")
                .and(predicate::str::contains("Round 1 undone"))
                .and(predicate::str::contains("No rounds recorded")),
        );

    let store = saved(&table.store());
    assert_eq!(store["nextRoundNumber"], 1);
    assert_eq!(store["activeRoundInProgress"], false);
}

#[test]
fn session_with_rejected_line_exits_with_code_two() {
    let table = Table::new();
    table
        .cmd(&["session"])
        .write_stdin("start\nbogus\nundo\nselect n\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no recorded round"));

    let store = saved(&table.store());
    assert_eq!(store["activeRoundInProgress"], true);
    assert_eq!(store["activeAssignments"][0]["seat"], "north");
}
