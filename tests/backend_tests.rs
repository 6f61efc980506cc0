use powerbar::backend::*;
use powerbar::utils::TtlCache;
use std::os::unix::fs::PermissionsExt;
use std::time::Duration;
use tempfile::TempDir;

const ROOT: &str = r#"_NET_DESKTOP_NAMES(UTF8_STRING) = "1", "2", "web, mail"
_NET_CURRENT_DESKTOP(CARDINAL) = 1
_NET_ACTIVE_WINDOW(WINDOW): window id # 0x3e00003
_NET_SUPPORTED(ATOM) = _NET_WM_NAME
WM_NAME(STRING) = "root window"
not a property line
_NET_NUMBER_OF_DESKTOPS(CARDINAL) = 3
"#;

#[test]
fn test_parse_root_properties() {
    let props = parse_xprop(ROOT);

    assert_eq!(
        desktop_names(&props).expect("names"),
        vec!["1".to_string(), "2".to_string(), "web, mail".to_string()]
    );
    assert_eq!(current_desktop(&props).expect("current"), 1);
    assert_eq!(
        props.get("_NET_ACTIVE_WINDOW"),
        Some(&XProperty::Single(XValue::Window("0x3e00003".to_string())))
    );
    assert_eq!(
        props.get("_NET_NUMBER_OF_DESKTOPS"),
        Some(&XProperty::Single(XValue::Integer(3)))
    );
    // Atoms are not understood.
    assert!(!props.contains_key("_NET_SUPPORTED"));
}

#[test]
fn test_missing_desktop_properties() {
    let props = parse_xprop("WM_NAME(STRING) = \"x\"\n");
    assert!(desktop_names(&props).is_err());
    assert!(current_desktop(&props).is_err());
}

#[test]
fn test_single_desktop_name() {
    let props = parse_xprop("_NET_DESKTOP_NAMES(UTF8_STRING) = \"only\"\n");
    assert_eq!(desktop_names(&props).expect("names"), vec!["only".to_string()]);
}

#[test]
fn test_window_title_lookup() {
    let props = parse_xprop("_NET_WM_NAME(UTF8_STRING) = \"fancy\"\nWM_NAME(STRING) = \"plain\"\n");
    // WM_NAME comes before _NET_WM_NAME.
    assert_eq!(title_from(&props), "plain");

    let props = parse_xprop("_NET_WM_NAME(UTF8_STRING) = \"say \\\"hi\\\", twice\"\n");
    assert_eq!(title_from(&props), "say \"hi\", twice");

    assert_eq!(
        title_from(&XProperties::new()),
        "Window has no property which could be a name."
    );
}

#[test]
fn test_x11_capabilities() {
    let backend = X11Backend::default();
    assert_eq!(backend.name(), "X11");
    for capability in [
        Capability::ListWorkspaces,
        Capability::ActiveWorkspace,
        Capability::SetWorkspace,
        Capability::WindowTitle,
    ] {
        assert!(backend.supports(capability), "{}", capability.as_str());
    }
}

const AMIXER: &str = "Simple mixer control 'Master',0
  Capabilities: pvolume pswitch pswitch-joined
  Playback channels: Front Left - Front Right
  Limits: Playback 0 - 65536
  Mono:
  Front Left: Playback 45875 [70%] [on]
  Front Right: Playback 45875 [70%] [on]
";

#[test]
fn test_parse_amixer() {
    assert_eq!(parse_volume(AMIXER).expect("volume"), 70);
    assert!(!parse_muted(AMIXER).expect("switch"));

    let muted = AMIXER.replace("[on]", "[off]");
    assert!(parse_muted(&muted).expect("switch"));

    assert!(parse_volume("Simple mixer control 'Capture',0\n").is_err());
    assert!(parse_muted("no switch here").is_err());
}

#[test]
fn test_cache_hits_within_ttl() {
    let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
    assert!(cache.is_empty());

    cache.insert("root".to_string(), 7);
    assert_eq!(cache.get(&"root".to_string()), Some(7));
    assert_eq!(cache.len(), 1);

    let shared = cache.clone();
    shared.insert("window".to_string(), 8);
    assert_eq!(cache.get(&"window".to_string()), Some(8));

    assert_eq!(cache.invalidate(&"root".to_string()), Some(7));
    assert_eq!(cache.get(&"root".to_string()), None);

    cache.clear();
    assert!(shared.is_empty());
}

#[test]
fn test_cache_entries_expire() {
    let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_millis(10));
    cache.insert("root", 1);
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(cache.get(&"root"), None);
    assert!(cache.is_empty());
}

/// Fake `amixer` that logs each subcommand and reports 70%, unmuted.
fn fake_mixer(dir: &TempDir) -> (String, std::path::PathBuf) {
    let log = dir.path().join("calls.log");
    let script = dir.path().join("amixer");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\necho \"$2\" >> \"{}\"\necho \"  Front Left: Playback 45875 [70%] [on]\"\n",
            log.display()
        ),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    (script.to_string_lossy().into_owned(), log)
}

fn calls(log: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_alsa_reads_once_per_frame() {
    let dir = TempDir::new().unwrap();
    let (program, log) = fake_mixer(&dir);
    let backend = AlsaBackend::with_program(&program, "Master").with_cache_ttl(Duration::from_secs(60));

    assert_eq!(backend.volume().await.unwrap(), 70);
    assert!(!backend.muted().await.unwrap());
    assert_eq!(backend.volume().await.unwrap(), 70);
    assert_eq!(calls(&log), vec!["get"]);

    backend.set_volume(40).await.unwrap();
    assert_eq!(backend.volume().await.unwrap(), 70);
    assert_eq!(calls(&log), vec!["get", "set", "get"]);
}
