//! Scene tests: each script is played and the resulting widget state checked.

use sprig::{
    Config,
    command::Cursor,
    error::Result,
    testing::TestBackend,
    widgets::{Checkbox, Label, ListView, Scrollbar, SplitView, Toggle},
};

use crate::{LogBackend, Scenario, Scene};

/// Build and play a scenario against a fresh log backend.
fn played(scenario: Scenario) -> Result<Scene> {
    let backend = LogBackend::new();
    let stats = backend.stats();
    let mut scene = Scene::build(scenario, Config::default(), Box::new(backend))?;
    scene.play()?;
    assert!(stats.borrow().frames >= 1);
    assert_eq!(stats.borrow().fonts, vec![("default".to_string(), 16)]);
    Ok(scene)
}

#[test]
fn gallery_clicks_update_the_status() -> Result<()> {
    let scene = played(Scenario::Gallery)?;
    let status = scene.mark("status").expect("status");
    assert_eq!(scene.sprig.widget::<Label>(status)?.text(), "Clicked 2 times");
    let checkbox = scene.mark("checkbox").expect("checkbox");
    assert!(scene.sprig.widget::<Checkbox>(checkbox)?.is_checked());
    let toggle = scene.mark("toggle").expect("toggle");
    assert!(scene.sprig.widget::<Toggle>(toggle)?.is_on());
    scene.sprig.check_tree_invariants()
}

#[test]
fn list_scrolls_and_follows_the_scrollbar() -> Result<()> {
    let scene = played(Scenario::List)?;
    let list = scene.mark("list").expect("list");
    let bar = scene.mark("scrollbar").expect("scrollbar");
    assert_eq!(scene.sprig.widget::<Scrollbar>(bar)?.offset(), 196);
    assert_eq!(scene.sprig.widget::<ListView>(list)?.offset(), -196);
    assert_eq!(scene.sprig.active_scrollbar(), None);
    Ok(())
}

#[test]
fn split_divider_drags() -> Result<()> {
    let scene = played(Scenario::Split)?;
    let split = scene.mark("split").expect("split");
    let ratio = scene.sprig.widget::<SplitView>(split)?.ratio();
    assert!((ratio - 398.0 / 596.0).abs() < 1e-4, "{ratio}");
    assert_eq!(scene.sprig.cursor(), Cursor::Arrow);
    assert_eq!(scene.sprig.active_scrollbar(), None);
    Ok(())
}

#[test]
fn gallery_text_reaches_the_backend() -> Result<()> {
    let (log, backend) = TestBackend::create();
    let mut scene = Scene::build(Scenario::Gallery, Config::default(), Box::new(backend))?;
    scene.play()?;
    let log = log.lock().expect("log");
    assert!(log.contains("Hola!"));
    assert!(log.contains("Clicked 2 times"));
    assert!(log.contains("Framed"));
    Ok(())
}
