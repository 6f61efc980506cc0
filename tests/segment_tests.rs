use anyhow::Result;
use chrono::{TimeZone, Utc};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use powerbar::backend::{AudioBackend, Capability, WindowingBackend};
use powerbar::segments::*;
use powerbar::*;
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::io::Write;
use std::rc::Rc;
use tempfile::NamedTempFile;

struct FakeMixer {
    volume: Cell<u8>,
    muted: Cell<bool>,
}

impl FakeMixer {
    fn new(volume: u8) -> Rc<Self> {
        Rc::new(Self {
            volume: Cell::new(volume),
            muted: Cell::new(false),
        })
    }
}

impl AudioBackend for FakeMixer {
    fn name(&self) -> &str {
        "fake"
    }

    fn volume(&self) -> LocalBoxFuture<'_, Result<u8>> {
        Box::pin(async move { Ok(self.volume.get()) })
    }

    fn set_volume(&self, percent: u8) -> LocalBoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.volume.set(percent);
            Ok(())
        })
    }

    fn muted(&self) -> LocalBoxFuture<'_, Result<bool>> {
        Box::pin(async move { Ok(self.muted.get()) })
    }

    fn set_muted(&self, muted: bool) -> LocalBoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.muted.set(muted);
            Ok(())
        })
    }
}

struct FakeWm {
    names: RefCell<Vec<String>>,
    active: Cell<usize>,
    capabilities: Vec<Capability>,
    switched: RefCell<Vec<String>>,
}

impl FakeWm {
    fn new(names: &[&str], capabilities: Vec<Capability>) -> Rc<Self> {
        Rc::new(Self {
            names: RefCell::new(names.iter().map(|n| n.to_string()).collect()),
            active: Cell::new(0),
            capabilities,
            switched: RefCell::new(Vec::new()),
        })
    }

    fn full(names: &[&str]) -> Rc<Self> {
        Self::new(
            names,
            vec![
                Capability::ListWorkspaces,
                Capability::ActiveWorkspace,
                Capability::SetWorkspace,
                Capability::WindowTitle,
            ],
        )
    }
}

impl WindowingBackend for FakeWm {
    fn name(&self) -> &str {
        "fake"
    }

    fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn list_workspaces(&self) -> LocalBoxFuture<'_, Result<Vec<String>>> {
        Box::pin(async move { Ok(self.names.borrow().clone()) })
    }

    fn active_workspace(&self) -> LocalBoxFuture<'_, Result<usize>> {
        Box::pin(async move { Ok(self.active.get()) })
    }

    fn set_workspace<'a>(&'a self, name: &'a str) -> LocalBoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            self.switched.borrow_mut().push(name.to_string());
            Ok(true)
        })
    }

    fn window_title(&self) -> LocalBoxFuture<'_, Result<Option<String>>> {
        Box::pin(async move { Ok(Some("editor".to_string())) })
    }
}

/// Backend that only has a name.
struct Bare;

impl WindowingBackend for Bare {
    fn name(&self) -> &str {
        "bare"
    }

    fn supports(&self, _capability: Capability) -> bool {
        false
    }
}

async fn plain(modules: &[ModuleRef]) -> String {
    strip_ansi(&render(modules, None).await)
}

fn click(kind: ClickKind) -> ClickEvent {
    ClickEvent::new(kind, 0)
}

#[tokio::test]
async fn test_text_alloc_counts_chars() {
    let module = text("h\u{e9}llo");
    let Module::Render(inner) = module.as_ref() else {
        panic!("text is a render module");
    };
    assert_eq!(inner.alloc(), Some(5));
    assert_eq!(plain(&[module.clone()]).await, "h\u{e9}llo");
}

#[tokio::test]
async fn test_envvar_substitution() {
    std::env::set_var("POWERBAR_TEST_GREETING", "howdy");
    assert_eq!(plain(&[envvar("{POWERBAR_TEST_GREETING}!")]).await, "howdy!");
}

#[tokio::test]
async fn test_wm_state_custom_provider() {
    let provider = StateProvider::custom(|| async { Ok("resize".to_string()) }.boxed_local());
    assert_eq!(plain(&[wm_state("mode: {state}", provider)]).await, "mode: resize");
}

#[test]
fn test_day_suffix() {
    let cases = [
        (1, "st"),
        (2, "nd"),
        (3, "rd"),
        (4, "th"),
        (11, "th"),
        (12, "th"),
        (13, "th"),
        (21, "st"),
        (22, "nd"),
        (23, "rd"),
        (30, "th"),
        (31, "st"),
    ];
    for (day, suffix) in cases {
        assert_eq!(day_suffix(day), suffix, "day {}", day);
    }
}

#[test]
fn test_time_context_keys() {
    let t = Utc.with_ymd_and_hms(2024, 8, 21, 23, 5, 9).unwrap();
    let ctx = time_context(&t);

    assert_eq!(ctx["year"], json!(2024));
    assert_eq!(ctx["month"], json!(8));
    assert_eq!(ctx["monthName"], json!("August"));
    assert_eq!(ctx["shortMonthName"], json!("Aug"));
    assert_eq!(ctx["dayOfMonth"], json!(21));
    assert_eq!(ctx["dayOfMonthSuffix"], json!("st"));
    assert_eq!(ctx["dayOfWeek"], json!("Wednesday"));
    assert_eq!(ctx["dayOfWeekNumber"], json!(3));
    assert_eq!(ctx["shortDayOfWeek"], json!("Wed"));
    assert_eq!(ctx["hour"], json!(23));
    assert_eq!(ctx["twelveHour"], json!(11));
    assert_eq!(ctx["amPm"], json!("pm"));
    assert_eq!(ctx["minute"], json!("05"));
    assert_eq!(ctx["second"], json!("09"));

    assert_eq!(
        substitute("{twelveHour}:{minute} {amPm}", &ctx),
        "11:05 pm"
    );
}

#[test]
fn test_time_context_midnight() {
    let t = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let ctx = time_context(&t);
    assert_eq!(ctx["twelveHour"], json!(12));
    assert_eq!(ctx["amPm"], json!("am"));
    assert_eq!(ctx["dayOfWeek"], json!("Sunday"));
    assert_eq!(ctx["dayOfWeekNumber"], json!(0));
    assert_eq!(ctx["month"], json!(1));
}

#[tokio::test]
async fn test_time_click_switches_format() {
    let module = time("primary", Some("alternate".into()));
    assert_eq!(plain(&[module.clone()]).await, "primary");

    module.input(&click(ClickKind::MouseRight)).await.expect("input");
    assert_eq!(plain(&[module.clone()]).await, "primary");

    module.input(&click(ClickKind::MouseLeft)).await.expect("input");
    assert_eq!(plain(&[module.clone()]).await, "alternate");
}

fn meminfo_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write meminfo");
    file
}

#[test]
fn test_parse_meminfo() {
    let info = parse_meminfo("MemTotal:  1024 kB\nMemFree:  100 kB\nMemAvailable:  512 kB\n").expect("parse");
    assert_eq!(info.total, 1024 * 1024);
    assert_eq!(info.free, 512 * 1024);
    assert_eq!(info.used(), 512 * 1024);

    let old_kernel = parse_meminfo("MemTotal: 2048 kB\nMemFree: 1024 kB\n").expect("parse");
    assert_eq!(old_kernel.free, 1024 * 1024);

    assert!(parse_meminfo("MemFree: 10 kB\n").is_err());
    assert!(parse_meminfo("").is_err());
}

#[tokio::test]
async fn test_ram_reads_file_and_toggles() {
    let file = meminfo_file("MemTotal:  1024 kB\nMemFree:  100 kB\nMemAvailable:  512 kB\n");
    let module = ram_from("RAM {ramUsagePercent}", Some("{used}/{total}".into()), file.path());

    assert_eq!(plain(&[module.clone()]).await, "RAM 50%");
    assert!(module.accepts_input());

    module.input(&click(ClickKind::MouseLeft)).await.expect("input");
    assert_eq!(plain(&[module.clone()]).await, "512KiB/1MiB");

    module.input(&click(ClickKind::MouseLeft)).await.expect("input");
    assert_eq!(plain(&[module.clone()]).await, "RAM 50%");
}

#[tokio::test]
async fn test_ram_missing_file_renders_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let module = ram_from("{used}", None, dir.path().join("missing"));
    assert_eq!(render(&[module], None).await, "");
}

#[test]
fn test_audio_action_parsing() {
    assert_eq!("+5".parse::<AudioAction>(), Ok(AudioAction::Raise(5)));
    assert_eq!("-10".parse::<AudioAction>(), Ok(AudioAction::Lower(10)));
    assert_eq!("=40".parse::<AudioAction>(), Ok(AudioAction::Set(40)));
    assert_eq!("mute".parse::<AudioAction>(), Ok(AudioAction::Mute));
    assert_eq!("unmute".parse::<AudioAction>(), Ok(AudioAction::Unmute));
    assert_eq!("!mute".parse::<AudioAction>(), Ok(AudioAction::ToggleMute));
    assert!("louder".parse::<AudioAction>().is_err());
    assert!("+".parse::<AudioAction>().is_err());
    assert!("*5".parse::<AudioAction>().is_err());
}

#[test]
fn test_invalid_audio_actions_are_skipped() {
    let actions = audio_actions(&[(ClickKind::MouseLeft, "!mute"), (ClickKind::ScrollUp, "louder")]);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions.get(&ClickKind::MouseLeft), Some(&AudioAction::ToggleMute));
}

#[tokio::test]
async fn test_audio_actions_drive_backend() {
    let mixer = FakeMixer::new(50);
    let actions = audio_actions(&[
        (ClickKind::ScrollUp, "+5"),
        (ClickKind::ScrollDown, "-60"),
        (ClickKind::MouseRight, "=120"),
        (ClickKind::MouseLeft, "!mute"),
    ]);
    let module = audio("{volume}%", Some("muted".into()), actions, mixer.clone());
    assert!(module.accepts_input());
    assert_eq!(plain(&[module.clone()]).await, "50%");

    module.input(&click(ClickKind::ScrollUp)).await.expect("input");
    assert_eq!(mixer.volume.get(), 55);

    module.input(&click(ClickKind::ScrollDown)).await.expect("input");
    assert_eq!(mixer.volume.get(), 0);

    module.input(&click(ClickKind::MouseRight)).await.expect("input");
    assert_eq!(mixer.volume.get(), 100);

    module.input(&click(ClickKind::MouseMiddle)).await.expect("input");
    assert_eq!(mixer.volume.get(), 100);

    module.input(&click(ClickKind::MouseLeft)).await.expect("input");
    assert!(mixer.muted.get());
    assert_eq!(plain(&[module.clone()]).await, "muted");
}

#[tokio::test]
async fn test_audio_without_actions_is_not_clickable() {
    let module = audio("{volume} {mute}", None, AudioActions::new(), FakeMixer::new(30));
    assert!(!module.accepts_input());
    assert_eq!(plain(&[module]).await, "30 false");
}

#[tokio::test]
async fn test_workspaces_sorted_with_current() {
    let wm = FakeWm::full(&["10", "2", "1"]);
    let module = workspaces(|| render_env("[{thisWorkspace}|{currentWorkspace}]"), wm.clone()).expect("supported");

    assert_eq!(plain(&[module]).await, "[1|10][2|10][10|10]");
}

#[tokio::test]
async fn test_workspace_modules_are_reused() {
    let wm = FakeWm::full(&["a", "b"]);
    let created = Rc::new(Cell::new(0));
    let counter = created.clone();
    let module = workspaces(
        move || {
            counter.set(counter.get() + 1);
            render_env("{thisWorkspace}")
        },
        wm.clone(),
    )
    .expect("supported");

    assert_eq!(plain(&[module.clone()]).await, "ab");
    assert_eq!(plain(&[module.clone()]).await, "ab");
    assert_eq!(created.get(), 2);

    wm.names.borrow_mut().retain(|n| n != "b");
    assert_eq!(plain(&[module.clone()]).await, "a");
    assert_eq!(created.get(), 2);

    wm.names.borrow_mut().push("b".to_string());
    assert_eq!(plain(&[module.clone()]).await, "ab");
    assert_eq!(created.get(), 3);
}

#[test]
fn test_workspaces_need_listing() {
    let err = match workspaces(|| text("x"), Rc::new(Bare)) {
        Ok(_) => panic!("bare backend cannot list workspaces"),
        Err(e) => e,
    };
    assert!(matches!(
        err.downcast_ref::<BarError>(),
        Some(BarError::Unsupported { .. })
    ));
}

#[tokio::test]
async fn test_unsupported_default_methods_fail() {
    let bare = Bare;
    assert!(bare.list_workspaces().await.is_err());
    assert!(bare.active_workspace().await.is_err());
    assert!(bare.set_workspace("1").await.is_err());
    let err = bare.window_title().await.expect_err("unsupported");
    assert_eq!(
        err.to_string(),
        "backend \"bare\" does not provide getWindowTitle"
    );
}

#[tokio::test]
async fn test_workspace_button_switches_on_click() {
    let wm = FakeWm::full(&["10", "2", "1"]);
    let backend = wm.clone();
    let module = workspaces(move || workspace_button("{thisWorkspace}", backend.clone()), wm.clone())
        .expect("supported");
    let bar = Bar::new(
        BarLayout {
            left: vec![module],
            ..Default::default()
        },
        40,
    );
    bar.status().await;

    let spans: Vec<(i64, i64)> = bar.regions().iter().map(|r| (r.start, r.end)).collect();
    assert_eq!(spans, vec![(0, 1), (1, 2), (2, 4)]);

    bar.handle_event(Some(&ClickEvent::new(ClickKind::MouseLeft, 3))).await;
    bar.handle_event(Some(&ClickEvent::new(ClickKind::ScrollUp, 0))).await;
    bar.handle_event(Some(&ClickEvent::new(ClickKind::MouseLeft, 1))).await;
    assert_eq!(*wm.switched.borrow(), vec!["10".to_string(), "2".to_string()]);
}

#[tokio::test]
async fn test_stock_layout_workspace_clicks() {
    let wm = FakeWm::full(&["1", "2"]);
    let layout = themes::default_layout(&themes::get_theme("dark"), wm.clone(), FakeMixer::new(20));
    let bar = Bar::new(layout, 200);
    let line = strip_ansi(&bar.status().await);

    let chars: Vec<char> = line.chars().collect();
    let first = chars.iter().position(|c| *c == '1').expect("workspace 1 on screen") as i64;
    let second = chars.iter().position(|c| *c == '2').expect("workspace 2 on screen") as i64;
    // Buttons render as " N ", so each region starts one column before the name.
    let spans: Vec<(i64, i64)> = bar.regions().iter().map(|r| (r.start, r.end)).collect();
    assert!(spans.contains(&(first - 1, first + 2)), "{:?} in {:?}", spans, line);
    assert!(spans.contains(&(second - 1, second + 2)), "{:?} in {:?}", spans, line);

    bar.handle_event(Some(&ClickEvent::new(ClickKind::MouseLeft, second))).await;
    bar.handle_event(Some(&ClickEvent::new(ClickKind::MouseLeft, first - 1))).await;
    assert_eq!(*wm.switched.borrow(), vec!["2".to_string(), "1".to_string()]);
}

#[tokio::test]
async fn test_workspace_button_needs_set_capability() {
    let wm = FakeWm::new(&["1"], vec![Capability::ListWorkspaces]);
    let button = workspace_button("{thisWorkspace}", wm);
    assert!(!button.accepts_input());
}

#[tokio::test]
async fn test_window_title() {
    let wm = FakeWm::full(&[]);
    assert_eq!(plain(&[window("<{title}>", wm)]).await, "<editor>");

    assert_eq!(plain(&[window("<{title}>", Rc::new(Bare))]).await, "<{title}>");
}

#[tokio::test]
async fn test_default_layout_builds() {
    let theme = themes::get_theme("nord");
    let layout = themes::default_layout(&theme, FakeWm::full(&["1", "2"]), FakeMixer::new(20));
    assert_eq!(layout.left.len(), 1);
    assert_eq!(layout.center.len(), 1);
    assert_eq!(layout.right.len(), 5);

    let fallback = themes::default_layout(&theme, Rc::new(Bare), FakeMixer::new(20));
    assert_eq!(fallback.left.len(), 1);

    assert_eq!(themes::get_theme("unknown"), themes::get_theme("dark"));
}
