use crate::backend::{AudioBackend, WindowingBackend};
use crate::bar::{powerline_open, powerline_transition, BarLayout, Direction, Environment, ModuleRef};
use crate::input::ClickKind;
use crate::segments::{
    audio, audio_actions, conditional, group, ram, text, time, window, workspace_button, workspaces,
    CURRENT_WORKSPACE, THIS_WORKSPACE,
};
use crate::utils::{value_to_text, warn_with_context};
use std::rc::Rc;

/// Powerline colours of the stock layout. Values are style colour arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub workspaces: String,
    pub workspace_active: String,
    pub workspace_idle: String,
    pub audio: String,
    pub ram: String,
    pub clock: String,
}

pub fn get_theme(name: &str) -> Theme {
    match name {
        "dark" => dark_theme(),
        "light" => light_theme(),
        "nord" => nord_theme(),
        _ => dark_theme(), // fallback
    }
}

fn dark_theme() -> Theme {
    Theme {
        workspaces: "21".to_string(),
        workspace_active: "39".to_string(),
        workspace_idle: "32".to_string(),
        audio: "bright-blue".to_string(),
        ram: "blue".to_string(),
        clock: "red".to_string(),
    }
}

fn light_theme() -> Theme {
    Theme {
        workspaces: "#bee3f8".to_string(),
        workspace_active: "#faf089".to_string(),
        workspace_idle: "#c6f6d5".to_string(),
        audio: "#d6bcfa".to_string(),
        ram: "#b2f5ea".to_string(),
        clock: "#feb2b2".to_string(),
    }
}

fn nord_theme() -> Theme {
    Theme {
        workspaces: "#5e81ac".to_string(),
        workspace_active: "#88c0d0".to_string(),
        workspace_idle: "#81a1c1".to_string(),
        audio: "#b48ead".to_string(),
        ram: "#5e81ac".to_string(),
        clock: "#bf616a".to_string(),
    }
}

const OPEN: &str = "\u{e0b6}";
const CLOSE: &str = "\u{e0b4}";
const ARROW_RIGHT: &str = "\u{e0b0}";

fn is_current(env: &Environment) -> bool {
    let vars = env.collapse();
    let this = vars.get(THIS_WORKSPACE).and_then(value_to_text);
    let current = vars.get(CURRENT_WORKSPACE).and_then(value_to_text);
    this.is_some() && this == current
}

fn workspace_chain(theme: &Theme, windowing: Rc<dyn WindowingBackend>) -> Vec<ModuleRef> {
    let theme = theme.clone();
    let button_backend = windowing.clone();
    let provider = move || {
        // Arrows point away from the active workspace on both sides.
        group(vec![
            conditional(
                vec![
                    powerline_transition(ARROW_RIGHT, &theme.workspaces, Direction::Left),
                    powerline_transition(ARROW_RIGHT, &theme.workspace_active, Direction::Left),
                    workspace_button(" {thisWorkspace} ", button_backend.clone()),
                ],
                |c| is_current(c.env),
            ),
            conditional(
                vec![
                    powerline_transition(ARROW_RIGHT, &theme.workspaces, Direction::Right),
                    powerline_transition(ARROW_RIGHT, &theme.workspace_idle, Direction::Right),
                    workspace_button(" {thisWorkspace} ", button_backend.clone()),
                ],
                |c| !is_current(c.env),
            ),
        ])
    };

    match workspaces(provider, windowing) {
        Ok(module) => vec![module, text(" ")],
        Err(e) => {
            warn_with_context("theme", &format!("workspaces disabled: {:#}", e));
            vec![text(" ")]
        }
    }
}

/// The stock bar: workspaces on the left, window title in the middle,
/// volume, memory and clock on the right.
pub fn default_layout(
    theme: &Theme,
    windowing: Rc<dyn WindowingBackend>,
    audio_backend: Rc<dyn AudioBackend>,
) -> BarLayout {
    let actions = audio_actions(&[
        (ClickKind::MouseLeft, "!mute"),
        (ClickKind::ScrollDown, "-5"),
        (ClickKind::ScrollUp, "+5"),
    ]);

    BarLayout {
        left: vec![powerline_open(
            OPEN,
            CLOSE,
            &theme.workspaces,
            workspace_chain(theme, windowing.clone()),
        )],
        center: vec![window("{title}", windowing)],
        right: vec![
            powerline_open(
                OPEN,
                CLOSE,
                &theme.audio,
                vec![audio("{volume}%", Some("\u{f075f} ".into()), actions, audio_backend)],
            ),
            text(" "),
            powerline_open(
                OPEN,
                CLOSE,
                &theme.ram,
                vec![ram("RAM {ramUsagePercent}", Some("RAM {used}/{total}".into()))],
            ),
            text(" "),
            powerline_open(
                OPEN,
                CLOSE,
                &theme.clock,
                vec![time(
                    " {twelveHour}:{minute}:{second}",
                    Some(" {shortDayOfWeek} {shortMonthName} {dayOfMonth}{dayOfMonthSuffix}, {year}".into()),
                )],
            ),
        ],
    }
}
