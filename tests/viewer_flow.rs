//! End-to-end viewer behavior: hotplug, skin swaps and fragment handling
//! against the in-memory document and skin files on disk.

use std::collections::BTreeMap;
use std::path::Path;

use gamergrip::controller::{DeviceEvent, DeviceSample, GamepadSource};
use gamergrip::dom::document::Document;
use gamergrip::options::{Options, DEFAULT_DEADZONE, DEFAULT_SKIN};
use gamergrip::page::Page;
use gamergrip::skin::catalog::SkinCatalog;
use gamergrip::skin::loader::{load_template, DirSkinFetcher};
use gamergrip::viewer::{SkinChange, SkinRequest, Viewer};

/// Gamepads driven by the test.
#[derive(Default)]
struct ScriptedPads {
    devices: BTreeMap<usize, DeviceSample>,
    pending: Vec<DeviceEvent>,
}

impl ScriptedPads {
    fn plug(&mut self, index: usize) {
        self.devices.insert(index, DeviceSample::idle(index));
        self.pending.push(DeviceEvent::Connected(index));
    }

    fn unplug(&mut self, index: usize) {
        self.devices.remove(&index);
        self.pending.push(DeviceEvent::Disconnected(index));
    }
}

impl GamepadSource for ScriptedPads {
    fn connected(&self) -> Vec<usize> {
        self.devices.keys().copied().collect()
    }

    fn snapshot(&mut self) -> Vec<DeviceSample> {
        self.devices.values().cloned().collect()
    }

    fn rescan(&mut self) -> Vec<DeviceEvent> {
        std::mem::take(&mut self.pending)
    }
}

fn write_skins(root: &Path) {
    let skins = root.join("skins");
    std::fs::create_dir_all(&skins).unwrap();
    for skin in ["psx", "nes", "snes"] {
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g id="{}-body"/><circle id="b0-hilight" style="fill-opacity:0"/><circle id="ls-hilight" r="4"/></svg>"#,
            skin
        );
        std::fs::write(skins.join(format!("{}.svg", skin)), svg).unwrap();
    }
}

fn viewer() -> Viewer<Document, ScriptedPads> {
    Viewer::new(
        SkinCatalog::builtin(),
        Options::default(),
        Document::new(),
        ScriptedPads::default(),
        60,
    )
}

async fn complete(
    viewer: &mut Viewer<Document, ScriptedPads>,
    fetcher: &DirSkinFetcher,
    request: SkinRequest,
) -> SkinChange {
    let loaded = load_template(fetcher, &request.id).await;
    viewer.finish_skin_change(request.generation, loaded).unwrap()
}

#[tokio::test]
async fn test_device_connected_before_template_gets_instance_on_load() {
    let dir = tempfile::tempdir().unwrap();
    write_skins(dir.path());
    let fetcher = DirSkinFetcher::new(dir.path());
    let mut viewer = viewer();

    let request = viewer.start("").unwrap();
    viewer.source_mut().plug(0);
    viewer.rescan();

    assert!(viewer.page().instance_ids().is_empty());
    assert!(!viewer.page().placeholder_visible());

    let change = complete(&mut viewer, &fetcher, request).await;
    assert_eq!(change, SkinChange::Applied { instances: 1 });
    assert_eq!(viewer.page().instance_ids(), vec!["gamepad-0"]);
    assert!(viewer.frame_clock().is_running());
}

#[tokio::test]
async fn test_disconnect_and_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    write_skins(dir.path());
    let fetcher = DirSkinFetcher::new(dir.path());
    let mut viewer = viewer();

    let request = viewer.start("").unwrap();
    complete(&mut viewer, &fetcher, request).await;
    for index in 0..3 {
        viewer.source_mut().plug(index);
    }
    viewer.rescan();
    assert_eq!(viewer.page().instance_ids().len(), 3);

    viewer.source_mut().unplug(1);
    viewer.rescan();
    assert_eq!(viewer.page().instance_ids(), vec!["gamepad-0", "gamepad-2"]);

    // Reattached instances are appended, like any new element
    viewer.source_mut().plug(1);
    viewer.rescan();
    assert_eq!(
        viewer.page().instance_ids(),
        vec!["gamepad-0", "gamepad-2", "gamepad-1"]
    );

    for index in 0..3 {
        viewer.source_mut().unplug(index);
    }
    viewer.rescan();
    assert!(viewer.page().instance_ids().is_empty());
    assert!(viewer.page().placeholder_visible());
    assert!(!viewer.frame_clock().is_running());
}

#[tokio::test]
async fn test_default_skin_has_no_stylesheet() {
    let dir = tempfile::tempdir().unwrap();
    write_skins(dir.path());
    let fetcher = DirSkinFetcher::new(dir.path());
    let mut viewer = viewer();

    let request = viewer.start("").unwrap();
    assert_eq!(request.id.template_path(), "skins/psx.svg");
    assert_eq!(viewer.page().stylesheet(), None);

    complete(&mut viewer, &fetcher, request).await;
    assert_eq!(viewer.template().unwrap().skin(), "psx");
}

#[tokio::test]
async fn test_styled_skin_swaps_stylesheet_template_and_fragment() {
    let dir = tempfile::tempdir().unwrap();
    write_skins(dir.path());
    let fetcher = DirSkinFetcher::new(dir.path());
    let mut viewer = viewer();

    let request = viewer.start("#!deadzone=0.1").unwrap();
    complete(&mut viewer, &fetcher, request).await;

    let request = viewer.change_skin("nes_jp").unwrap();
    assert_eq!(viewer.page().stylesheet().as_deref(), Some("skins/nes_jp.css"));
    assert_eq!(request.id.template_path(), "skins/nes.svg");
    assert_eq!(viewer.page().fragment(), "#!deadzone=0.1&skin=nes_jp");
    assert_eq!(viewer.page().selector().selected().unwrap().value, "nes_jp");

    complete(&mut viewer, &fetcher, request).await;
    assert_eq!(viewer.template().unwrap().skin(), "nes");

    // Back to an unstyled skin drops the link again
    viewer.change_skin("psx").unwrap();
    assert_eq!(viewer.page().stylesheet(), None);
}

#[tokio::test]
async fn test_swap_keeps_one_instance_per_device() {
    let dir = tempfile::tempdir().unwrap();
    write_skins(dir.path());
    let fetcher = DirSkinFetcher::new(dir.path());
    let mut viewer = viewer();

    let request = viewer.start("").unwrap();
    complete(&mut viewer, &fetcher, request).await;
    for index in 0..4 {
        viewer.source_mut().plug(index);
    }
    viewer.rescan();

    let request = viewer.change_skin("snes_eu").unwrap();
    let change = complete(&mut viewer, &fetcher, request).await;
    assert_eq!(change, SkinChange::Applied { instances: 4 });

    let ids = viewer.page().instance_ids();
    assert_eq!(ids.len(), 4);
    for id in &ids {
        let root = viewer.page().instance(id).unwrap();
        assert_eq!(root.attribute("data-skin"), Some("snes"));
        assert!(root.find_by_id("snes-body").is_some());
        assert!(root.find_by_id("psx-body").is_none());
    }
}

#[tokio::test]
async fn test_missing_template_keeps_previous_skin() {
    let dir = tempfile::tempdir().unwrap();
    write_skins(dir.path());
    let fetcher = DirSkinFetcher::new(dir.path());
    let mut viewer = viewer();

    let request = viewer.start("").unwrap();
    complete(&mut viewer, &fetcher, request).await;
    viewer.source_mut().plug(0);
    viewer.rescan();

    // n64.svg was never written
    let request = viewer.change_skin("n64").unwrap();
    let loaded = load_template(&fetcher, &request.id).await;
    assert!(viewer.finish_skin_change(request.generation, loaded).is_err());

    assert_eq!(viewer.template().unwrap().skin(), "psx");
    assert_eq!(viewer.page().instance_ids(), vec!["gamepad-0"]);
}

#[test]
fn test_unknown_skin_in_fragment_keeps_default() {
    let mut viewer = viewer();
    let request = viewer.start("#!skin=xbox&deadzone=banana").unwrap();

    assert_eq!(viewer.options().skin(), DEFAULT_SKIN);
    assert_eq!(viewer.options().deadzone(), DEFAULT_DEADZONE);
    assert_eq!(request.id.skin(), DEFAULT_SKIN);
}

#[tokio::test]
async fn test_pressed_button_renders_opacity() {
    let dir = tempfile::tempdir().unwrap();
    write_skins(dir.path());
    let fetcher = DirSkinFetcher::new(dir.path());
    let mut viewer = viewer();

    let request = viewer.start("").unwrap();
    complete(&mut viewer, &fetcher, request).await;
    viewer.source_mut().plug(0);
    viewer.rescan();

    viewer.source_mut().devices.get_mut(&0).unwrap().buttons[0] = 1.0;
    assert!(viewer.redraw() > 0);
    assert_eq!(
        viewer.page().element_attribute("gamepad-0", "b0-hilight", "style").as_deref(),
        Some("fill-opacity:1")
    );
    assert!(viewer.page().to_html().contains("fill-opacity:1"));
}
