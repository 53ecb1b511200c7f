// ABOUTME: Concurrency tests for ConfigStore
// ABOUTME: Single-winner creation, atomic save and non-torn updates under contention

use chatcfg_storage::{ConfigStore, ConfigUpdate, SaveOutcome, StorageError};
use std::sync::{Arc, Barrier};
use std::thread;

const CONTENDERS: usize = 32;

fn shared_store() -> Arc<ConfigStore> {
    Arc::new(
        ConfigStore::builder()
            .default_model("gpt-default")
            .build()
            .unwrap(),
    )
}

#[test]
fn test_concurrent_creates_have_exactly_one_winner() {
    let store = shared_store();
    let barrier = Arc::new(Barrier::new(CONTENDERS));

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..CONTENDERS)
            .map(|i| {
                let store = &store;
                let barrier = barrier.clone();
                scope.spawn(move || {
                    let input = ConfigUpdate::new()
                        .model(format!("model-{i}"))
                        .prompt(format!("prompt-{i}"));
                    barrier.wait();
                    (i, store.create("alice", input))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners: Vec<_> = results
        .iter()
        .filter_map(|(i, result)| result.as_ref().ok().map(|record| (*i, record.clone())))
        .collect();
    assert_eq!(winners.len(), 1, "exactly one create must succeed");

    let losers = results
        .iter()
        .filter(|(_, result)| {
            matches!(result, Err(StorageError::AlreadyExists(user)) if user == "alice")
        })
        .count();
    assert_eq!(losers, CONTENDERS - 1);

    let (winner, winning_record) = &winners[0];
    let stored = store.get("alice").unwrap();
    assert_eq!(&stored, winning_record);
    assert_eq!(stored.model, format!("model-{winner}"));
    assert_eq!(stored.prompt, format!("prompt-{winner}"));
}

#[test]
fn test_concurrent_saves_create_once() {
    let store = shared_store();
    let barrier = Arc::new(Barrier::new(CONTENDERS));

    let outcomes: Vec<SaveOutcome> = thread::scope(|scope| {
        let handles: Vec<_> = (0..CONTENDERS)
            .map(|i| {
                let store = &store;
                let barrier = barrier.clone();
                scope.spawn(move || {
                    barrier.wait();
                    store
                        .save("alice", ConfigUpdate::new().prompt(format!("prompt-{i}")))
                        .map(|(_, outcome)| outcome)
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let created = outcomes
        .iter()
        .filter(|outcome| **outcome == SaveOutcome::Created)
        .count();
    assert_eq!(created, 1);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("alice").unwrap().model, "gpt-default");
}

#[test]
fn test_concurrent_updates_never_mix_fields() {
    let store = shared_store();
    store
        .create("alice", ConfigUpdate::new().model("model-start").prompt("prompt-start"))
        .unwrap();
    let barrier = Arc::new(Barrier::new(CONTENDERS));

    thread::scope(|scope| {
        for i in 0..CONTENDERS {
            let store = &store;
            let barrier = barrier.clone();
            scope.spawn(move || {
                barrier.wait();
                for round in 0..20 {
                    let tag = format!("{i}-{round}");
                    store
                        .update(
                            "alice",
                            ConfigUpdate::new()
                                .model(format!("model-{tag}"))
                                .prompt(format!("prompt-{tag}")),
                        )
                        .unwrap();
                    let seen = store.get("alice").unwrap();
                    assert_eq!(
                        seen.model.trim_start_matches("model-"),
                        seen.prompt.trim_start_matches("prompt-")
                    );
                }
            });
        }
    });

    let last = store.get("alice").unwrap();
    assert_eq!(
        last.model.trim_start_matches("model-"),
        last.prompt.trim_start_matches("prompt-")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_users_created_in_parallel_tasks() {
    let store = shared_store();

    let tasks: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let user = format!("user-{i}");
                store.create(&user, ConfigUpdate::new().model(format!("model-{i}")))?;
                store.update(&user, ConfigUpdate::new().prompt(format!("prompt-{i}")))
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(store.len(), CONTENDERS);
    for i in 0..CONTENDERS {
        let record = store.get(&format!("user-{i}")).unwrap();
        assert_eq!(record.model, format!("model-{i}"));
        assert_eq!(record.prompt, format!("prompt-{i}"));
    }
}
