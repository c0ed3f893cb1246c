use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use csv_report_watcher::pipeline::{FileTask, Pipeline, TaskObserver, TaskOutcome};
use csv_report_watcher::watcher::{Dispatcher, FolderWatcher};
use csv_report_watcher::Config;

#[derive(Default)]
struct Finished {
    outcomes: Mutex<Vec<(PathBuf, TaskOutcome)>>,
}

impl TaskObserver for Finished {
    fn on_finished(&self, task: &FileTask, outcome: &TaskOutcome) {
        self.outcomes
            .lock()
            .unwrap()
            .push((task.source.clone(), outcome.clone()));
    }
}

fn setup() -> (tempfile::TempDir, Config) {
    let root = tempfile::tempdir().unwrap();
    let config = Config::new(
        root.path().join("watch"),
        root.path().join("output"),
        root.path().join("archive"),
    );
    config.ensure_directories().unwrap();
    (root, config)
}

fn drop_sales(config: &Config, name: &str) -> PathBuf {
    let dest = config.watch_folder.join(name);
    fs::copy(Path::new("tests/fixtures/sales.csv"), &dest).unwrap();
    dest
}

#[test]
fn duplicate_submissions_run_once_and_shutdown_drains() {
    let (_root, config) = setup();
    let first = drop_sales(&config, "a.csv");
    let second = drop_sales(&config, "b.csv");
    let finished = Arc::new(Finished::default());
    let pipeline = Pipeline::new(config.clone()).with_observer(finished.clone());

    let dispatcher = Dispatcher::spawn(Arc::new(pipeline), Duration::from_millis(200)).unwrap();
    let handle = dispatcher.handle();
    assert!(handle.submit(first.clone()));
    assert!(!handle.submit(first.clone()));
    assert!(handle.submit(second.clone()));
    assert!(handle.is_pending(&first));

    dispatcher.shutdown();

    let outcomes = finished.outcomes.lock().unwrap();
    let sources: Vec<_> = outcomes.iter().map(|(p, _)| p.clone()).collect();
    assert_eq!(sources, vec![first.clone(), second]);
    assert!(outcomes.iter().all(|(_, o)| o.is_archived()));
    assert!(!handle.is_pending(&first));
    assert_eq!(fs::read_dir(&config.output_folder).unwrap().count(), 2);
}

#[test]
fn submissions_after_shutdown_are_refused() {
    let (_root, config) = setup();
    let source = drop_sales(&config, "late.csv");
    let dispatcher = Dispatcher::spawn(Arc::new(Pipeline::new(config.clone())), Duration::ZERO).unwrap();
    let handle = dispatcher.handle();
    dispatcher.shutdown();

    assert!(!handle.submit(source.clone()));
    assert!(!handle.is_pending(&source));
    assert!(source.is_file());
}

#[test]
fn dropped_file_is_picked_up_by_the_watcher() {
    let (_root, config) = setup();
    let dispatcher =
        Dispatcher::spawn(Arc::new(Pipeline::new(config.clone())), Duration::from_millis(100)).unwrap();
    let watcher = FolderWatcher::start(&config.watch_folder, dispatcher.handle()).unwrap();
    assert_eq!(watcher.folder(), config.watch_folder.as_path());

    drop_sales(&config, "live.csv");

    let archived = config.archive_folder.join("live.csv");
    let deadline = Instant::now() + Duration::from_secs(10);
    while !archived.is_file() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(50));
    }

    watcher.stop();
    dispatcher.shutdown();
    assert!(archived.is_file(), "live.csv was not archived in time");
    assert!(!config.watch_folder.join("live.csv").exists());
    assert_eq!(fs::read_dir(&config.output_folder).unwrap().count(), 1);
}
