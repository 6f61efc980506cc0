use crate::backend::{Capability, WindowingBackend};
use crate::error::BarError;
use crate::utils::{debug_with_context, run_command, TtlCache};
use anyhow::Result;
use futures::future::LocalBoxFuture;
use std::collections::HashMap;
use std::time::Duration;

/// One typed X property value as printed by `xprop`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XValue {
    Integer(i64),
    Text(String),
    Window(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XProperty {
    Single(XValue),
    List(Vec<XValue>),
}

pub type XProperties = HashMap<String, XProperty>;

const TITLE_PROPERTIES: [&str; 5] = [
    "_WM_NAME",
    "WM_NAME",
    "_NET_WM_NAME",
    "_NET_WM_ICON_NAME",
    "_NET_ICON_NAME",
];

fn parse_value(kind: &str, raw: &str) -> Option<XValue> {
    match kind {
        "CARDINAL" => raw.trim().parse().ok().map(XValue::Integer),
        "STRING" | "UTF8_STRING" => Some(XValue::Text(unquote(raw.trim()))),
        "WINDOW" => raw
            .split_whitespace()
            .last()
            .filter(|id| id.starts_with("0x"))
            .map(|id| XValue::Window(id.to_string())),
        _ => None,
    }
}

fn unquote(raw: &str) -> String {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
        .replace("\\\"", "\"")
}

/// Split on commas outside double quotes, so titles containing commas stay whole.
fn split_list(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in raw.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);
    parts
}

/// Parse `NAME(TYPE) = value` / `NAME(TYPE): value` lines. Lines without a
/// type, and types not understood, are skipped.
pub fn parse_xprop(output: &str) -> XProperties {
    let mut props = XProperties::new();
    for line in output.lines() {
        let Some(open) = line.find('(') else { continue };
        let Some(close) = line[open..].find(')').map(|i| open + i) else { continue };
        let name = line[..open].trim();
        let kind = &line[open + 1..close];
        let rest = &line[close + 1..];
        let Some(sep) = rest.find(['=', ':']) else { continue };
        let raw = rest[sep + 1..].trim();
        if name.is_empty() || kind.is_empty() || raw.is_empty() {
            continue;
        }

        let parts = split_list(raw);
        let property = if parts.len() > 1 {
            XProperty::List(parts.into_iter().filter_map(|p| parse_value(kind, p)).collect())
        } else {
            match parse_value(kind, raw) {
                Some(value) => XProperty::Single(value),
                None => continue,
            }
        };
        props.insert(name.to_string(), property);
    }
    props
}

/// Windowing backend reading EWMH root and window properties through `xprop`.
pub struct X11Backend {
    cache: TtlCache<String, XProperties>,
}

impl X11Backend {
    pub fn new() -> Self {
        Self::with_cache_ttl(Duration::from_millis(100))
    }

    pub fn with_cache_ttl(ttl: Duration) -> Self {
        Self {
            cache: TtlCache::new(ttl),
        }
    }

    async fn xprop(&self, target: &[&str]) -> Result<XProperties> {
        let key = target.join(" ");
        if let Some(props) = self.cache.get(&key) {
            return Ok(props);
        }
        debug_with_context("x11", &format!("xprop {}", key));
        let props = parse_xprop(&run_command("xprop", target).await?);
        self.cache.insert(key, props.clone());
        Ok(props)
    }

    async fn root(&self) -> Result<XProperties> {
        self.xprop(&["-root"]).await
    }
}

impl Default for X11Backend {
    fn default() -> Self {
        Self::new()
    }
}

/// Workspace names from `_NET_DESKTOP_NAMES`.
pub fn desktop_names(props: &XProperties) -> Result<Vec<String>> {
    let values = match props.get("_NET_DESKTOP_NAMES") {
        Some(XProperty::List(values)) => values.clone(),
        Some(XProperty::Single(value)) => vec![value.clone()],
        None => return Err(BarError::Backend("_NET_DESKTOP_NAMES is not set".into()).into()),
    };
    values
        .into_iter()
        .map(|value| match value {
            XValue::Text(name) => Ok(name),
            other => Err(BarError::Backend(format!("_NET_DESKTOP_NAMES holds {:?}", other)).into()),
        })
        .collect()
}

pub fn current_desktop(props: &XProperties) -> Result<usize> {
    match props.get("_NET_CURRENT_DESKTOP") {
        Some(XProperty::Single(XValue::Integer(n))) if *n >= 0 => Ok(*n as usize),
        Some(other) => Err(BarError::Backend(format!("_NET_CURRENT_DESKTOP is {:?}", other)).into()),
        None => Err(BarError::Backend("_NET_CURRENT_DESKTOP is not set".into()).into()),
    }
}

/// First usable name property of a window; describes the problem otherwise.
pub fn title_from(window: &XProperties) -> String {
    let mut status = "Window has no property which could be a name.".to_string();
    for name in TITLE_PROPERTIES {
        match window.get(name) {
            Some(XProperty::Single(XValue::Text(title))) => return title.clone(),
            Some(XProperty::List(_)) => status = format!("Window's {} is a list.", name),
            Some(XProperty::Single(other)) => status = format!("Window's {} is {:?}, not text.", name, other),
            None => {}
        }
    }
    status
}

impl WindowingBackend for X11Backend {
    fn name(&self) -> &str {
        "X11"
    }

    fn supports(&self, capability: Capability) -> bool {
        matches!(
            capability,
            Capability::ListWorkspaces
                | Capability::ActiveWorkspace
                | Capability::SetWorkspace
                | Capability::WindowTitle
        )
    }

    fn list_workspaces(&self) -> LocalBoxFuture<'_, Result<Vec<String>>> {
        Box::pin(async move { desktop_names(&self.root().await?) })
    }

    fn active_workspace(&self) -> LocalBoxFuture<'_, Result<usize>> {
        Box::pin(async move { current_desktop(&self.root().await?) })
    }

    fn set_workspace<'a>(&'a self, name: &'a str) -> LocalBoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            let names = desktop_names(&self.root().await?)?;
            let Some(index) = names.iter().position(|n| n == name) else {
                return Ok(false);
            };
            run_command("wmctrl", &["-s", &index.to_string()]).await?;
            self.cache.clear();
            Ok(true)
        })
    }

    fn window_title(&self) -> LocalBoxFuture<'_, Result<Option<String>>> {
        Box::pin(async move {
            let root = self.root().await?;
            let id = match root.get("_NET_ACTIVE_WINDOW") {
                Some(XProperty::Single(XValue::Window(id))) => id.clone(),
                Some(other) => {
                    return Err(BarError::Backend(format!("_NET_ACTIVE_WINDOW is {:?}", other)).into())
                }
                None => {
                    return Ok(Some(match root.get("_NET_WM_NAME") {
                        Some(XProperty::Single(XValue::Text(name))) => name.clone(),
                        _ => "Desktop".to_string(),
                    }))
                }
            };
            let window = self.xprop(&["-id", &id]).await?;
            Ok(Some(title_from(&window)))
        })
    }
}
