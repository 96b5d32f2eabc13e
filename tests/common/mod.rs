//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Every test gets its own temporary site directory laid out the way the
//! documentation generator writes it:
//!
//! ```text
//! docnav.toml
//! html/navtreedata.js      tree, with the "Building" children in building.js
//! html/building.js
//! html/navtreeindex0.js
//! html/navtreeindex1.js
//! html/search/all_0.js     generator-native records
//! html/search/pages_2.js
//! html/search/search.js    not a shard (excluded by default)
//! ```
//!
//! # Available Fixtures
//!
//! - `doc_site`: The full site above.
//!
//! Use `site_config(&site)` for its config with paths resolved into the temp directory.

use docnav::SiteConfig;
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CONFIG: &str = r#"
[search]
dir = "html/search"

[navigation]
tree = "html/navtreedata.js"
suggestions = 3
"#;

pub const NAVTREEDATA: &str = r#"/*
@licstart  The following is the entire license notice for the JavaScript code in this file.
@licend  The above is the entire license notice for the JavaScript code in this file
*/
var NAVTREE =
[
  [ "C SDK", "index.html", [
    [ "Introduction", "intro.html", null ],
    [ "Configuration", "global_config.html", [
      [ "Library", "global_library_config.html", null ],
      [ "Demos", "global_demos_config.html", null ],
    ] ],
    [ "Building", "building.html", "building" ]
  ] ]
];

var NAVTREEINDEX =
[
"building.html"
];

var SYNCONMSG = 'click to disable panel synchronisation';
var SYNCOFFMSG = 'click to enable panel synchronisation';
"#;

pub const BUILDING: &str = r#"var building =
[
    [ "Configuration", "building.html#building_configuration", null ],
    [ "Demo", "building.html#building_demo", [
      [ "Command line", "building.html#building_demo_commmandline", null ],
      [ "GUI", "building.html#building_demo_gui", null ]
    ] ]
];"#;

pub const NAVTREEINDEX0: &str = r#"var NAVTREEINDEX0 =
{
"building.html":[2],
"building.html#building_configuration":[2,0],
"building.html#building_demo":[2,1],
"building.html#building_demo_commmandline":[2,1,0],
"building.html#building_demo_gui":[2,1,1],
"global_config.html":[0],
"index.html":[],
"intro.html":[0]
};
"#;

pub const NAVTREEINDEX1: &str = r#"var NAVTREEINDEX1 =
{
"global_config.html":[1],
"global_demos_config.html":[1,1],
"global_library_config.html":[1,0],
"ghost.html":[9],
"intro.html":[0]
};
"#;

pub const ALL_0: &str = r#"var searchData=
[
  ['iot_5fdemo_5fport_0',['IOT_DEMO_PORT',['../global_demos_config.html#IOT_DEMO_PORT',1,'']]],
  ['xqueuesend_1',['xQueueSend',['../queue_8h.html#a1b2',1,'queue.h'],['../group__queue.html#gaa3',1,'queue']]]
];
"#;

pub const PAGES_2: &str = r#"var searchData=
[
  ['pkcs_20_2311_20pal_20functions_355',['PKCS #11 PAL Functions',['../pkcs11_core_pal_function.html',1,'']]],
  ['pkcs11_5fpal_5fdestroyobject_361',['PKCS11_PAL_DestroyObject',['../pkcs11_pal_destroyobject.html',1,'pkcs11_core_pal_function']]],
  ['pkcs11_5fpal_5ffindobject_362',['PKCS11_PAL_FindObject',['../pkcs11_pal_findobject.html',1,'pkcs11_core_pal_function']]],
  ['pkcs11_5fpal_5fgetobjectvalue_363',['PKCS11_PAL_GetObjectValue',['../pkcs11_pal_getobjectvalue.html',1,'pkcs11_core_pal_function']]],
  ['pkcs11_5fpal_5fgetobjectvaluecleanup_364',['PKCS11_PAL_GetObjectValueCleanup',['../pkcs11_pal_getobjectvaluecleanup.html',1,'pkcs11_core_pal_function']]],
  ['pkcs11_5fpal_5finitialize_365',['PKCS11_PAL_Initialize',['../pkcs11_pal_initialize.html',1,'pkcs11_core_pal_function']]],
  ['pkcs11_5fpal_5fsaveobject_366',['PKCS11_PAL_SaveObject',['../pkcs11_pal_saveobject.html',1,'pkcs11_core_pal_function']]]
];
"#;

pub const SEARCH_JS: &str = "function SearchBox(name, resultsPath, inFrame, label) { }\n";

/// A temporary workspace directory for test isolation.
///
/// Provides basic filesystem operations within a temp directory that is
/// automatically cleaned up when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Removes a file from this workspace.
    ///
    /// # Panics
    /// Panics if the file cannot be removed.
    pub fn remove_file(&self, path: &str) {
        std::fs::remove_file(self.root.join(path))
            .unwrap_or_else(|e| panic!("Failed to remove file '{}': {}", path, e));
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete generated documentation site in a temporary directory.
#[fixture]
pub fn doc_site() -> TempWorkspace {
    docnav::tracing::init(docnav::tracing::LogFormat::Compact);

    let workspace = TempWorkspace::new();
    workspace.create_file("docnav.toml", CONFIG);
    workspace.create_file("html/navtreedata.js", NAVTREEDATA);
    workspace.create_file("html/building.js", BUILDING);
    workspace.create_file("html/navtreeindex0.js", NAVTREEINDEX0);
    workspace.create_file("html/navtreeindex1.js", NAVTREEINDEX1);
    workspace.create_file("html/search/all_0.js", ALL_0);
    workspace.create_file("html/search/pages_2.js", PAGES_2);
    workspace.create_file("html/search/search.js", SEARCH_JS);
    workspace
}

/// The config of [`doc_site`], with paths resolved into its directory.
#[allow(dead_code)]
pub fn site_config(site: &TempWorkspace) -> SiteConfig {
    SiteConfig::load(&site.path().join("docnav.toml")).expect("Failed to load site config")
}
