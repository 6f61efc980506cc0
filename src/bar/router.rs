use crate::bar::{Bar, HitRegion};
use crate::input::ClickEvent;
use crate::utils::{debug_with_context, warn_with_context};

/// First region containing `column`. Regions may overlap; list order decides.
pub fn find_region(regions: &[HitRegion], column: i64) -> Option<&HitRegion> {
    regions.iter().find(|r| r.contains(column))
}

impl Bar {
    /// Route a click to the module under it, then render a fresh frame so the
    /// result is visible before the next tick. `None` events are ignored.
    pub async fn handle_event(&self, event: Option<&ClickEvent>) -> Option<String> {
        let event = event?;
        let target = find_region(&self.regions(), event.column).cloned();

        match target {
            Some(region) => {
                debug_with_context(
                    "router",
                    &format!("{:?} at {} -> [{}, {})", event.kind, event.column, region.start, region.end),
                );
                if let Err(e) = region.invoke(event).await {
                    warn_with_context("router", &format!("input handler failed: {:#}", e));
                }
            }
            None => debug_with_context("router", &format!("{:?} at {} hit nothing", event.kind, event.column)),
        }

        Some(self.status().await)
    }
}
