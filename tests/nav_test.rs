mod common;

use assert2::check;
use common::{TempWorkspace, doc_site, site_config};
use docnav::{ExpansionState, LoadError, NavPath, Navigator, NotFoundError};
use rstest::rstest;

/// Test: The documented example resolves to [2,1] and opens [2] and [2,1].
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolve_and_apply_building_demo(doc_site: TempWorkspace) {
    let navigator = Navigator::load(&site_config(&doc_site).navigation).await.unwrap();

    let path = navigator
        .resolve_path("building.html", Some("building_demo"))
        .unwrap()
        .clone();
    check!(path == NavPath::from([2, 1]));

    let tree = navigator.tree();
    let mut state = ExpansionState::new();
    let overlay = state.apply_path(tree, &path).unwrap();

    let building = tree.node_at(&NavPath::from([2])).unwrap();
    let demo = tree.node_at(&path).unwrap();
    check!(overlay.opened == [building, demo]);
    check!(state.highlighted() == Some(demo));
    check!(tree.node(demo).map(|node| node.label.as_str()) == Some("Demo"));
    check!(tree.node(demo).and_then(|node| node.anchor.as_deref()) == Some("building_demo"));
}

/// Test: Children stored in a separate script are spliced into the tree.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_resolves_subtree_scripts(doc_site: TempWorkspace) {
    let navigator = Navigator::load(&site_config(&doc_site).navigation).await.unwrap();
    let tree = navigator.tree();

    // Root, 3 top-level pages, 2 config pages, 2 building sections, 2 demo pages.
    check!(tree.len() == 10);
    let gui = tree.node_at(&NavPath::from([2, 1, 1])).unwrap();
    check!(tree.node(gui).map(|node| node.label.as_str()) == Some("GUI"));
    check!(tree.path_of(gui) == Some(NavPath::from([2, 1, 1])));
}

/// Test: Index files merge in order; a later file overrides an earlier one.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn later_index_files_win(doc_site: TempWorkspace) {
    let navigator = Navigator::load(&site_config(&doc_site).navigation).await.unwrap();
    let index = navigator.index();

    check!(index.get("global_config.html") == Some(&NavPath::from([1])));
    check!(index.is_ambiguous("global_config.html"));
    check!(!index.is_ambiguous("intro.html"));
    check!(navigator.resolve_path("index.html", None) == Ok(&NavPath::default()));
}

/// Test: Index entries pointing outside the tree are dropped at load.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dangling_index_entries_are_dropped(doc_site: TempWorkspace) {
    let navigator = Navigator::load(&site_config(&doc_site).navigation).await.unwrap();

    check!(navigator.index().get("ghost.html") == None);
    check!(navigator.index().len() == 10);
    for key in navigator.index().keys() {
        let path = navigator.index().get(key).unwrap();
        check!(navigator.tree().node_at(path).is_ok(), "{} -> {}", key, path);
    }
}

/// Test: An explicit index list replaces discovery and is merged in the given order.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn explicit_index_order(doc_site: TempWorkspace) {
    let mut config = site_config(&doc_site).navigation;
    config.indexes = vec![
        doc_site.path().join("html/navtreeindex1.js"),
        doc_site.path().join("html/navtreeindex0.js"),
    ];

    let navigator = Navigator::load(&config).await.unwrap();
    check!(navigator.index().get("global_config.html") == Some(&NavPath::from([0])));
}

/// Test: An unknown page keeps the expansion and clears the highlight.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_page_keeps_expansion(doc_site: TempWorkspace) {
    let navigator = Navigator::load(&site_config(&doc_site).navigation).await.unwrap();
    let mut state = ExpansionState::new();

    navigator
        .navigate(&mut state, "building.html#building_demo_gui", None)
        .unwrap();
    check!(state.expanded().len() == 3);

    let before = state.expanded().clone();
    let result = navigator.navigate(&mut state, "bulding.html", None);
    check!(
        result
            == Err(NotFoundError {
                key: "bulding.html".to_string()
            })
    );
    check!(*state.expanded() == before);
    check!(state.highlighted() == None);

    let suggestions = navigator.suggest("bulding.html", 3);
    check!(suggestions.first().map(|s| s.key.as_str()) == Some("building.html"));
}

/// Test: A subtree script that does not exist fails the navigation load.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_subtree_script_fails(doc_site: TempWorkspace) {
    doc_site.remove_file("html/building.js");

    let result = Navigator::load(&site_config(&doc_site).navigation).await;
    check!(let Err(LoadError::Io { .. }) = result);
}
