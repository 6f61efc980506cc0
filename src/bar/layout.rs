use crate::bar::{render, Environment, Module, ModuleRef};
use crate::input::ClickEvent;
use crate::utils::{debug_with_context, visible_length, warn_with_context};
use anyhow::Result;
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::fmt;

/// The three independently rendered groups of the bar.
#[derive(Default, Clone)]
pub struct BarLayout {
    pub left: Vec<ModuleRef>,
    pub center: Vec<ModuleRef>,
    pub right: Vec<ModuleRef>,
}

/// Half-open column span `[start, end)` routed to `module`'s input handler.
#[derive(Clone)]
pub struct HitRegion {
    pub start: i64,
    pub end: i64,
    pub module: ModuleRef,
}

impl HitRegion {
    pub fn contains(&self, column: i64) -> bool {
        self.start <= column && column < self.end
    }

    pub async fn invoke(&self, event: &ClickEvent) -> Result<()> {
        self.module.input(event).await
    }
}

impl fmt::Debug for HitRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HitRegion[{}, {}) {:?}", self.start, self.end, self.module)
    }
}

/// Where each group lands on a line of `width` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Fits {
        left_pad: usize,
        right_pad: usize,
    },
    Overflow {
        by: usize,
        total: usize,
    },
}

impl Placement {
    /// Center the middle group and right-align the last one, shifting the
    /// center group when the outer groups crowd it. Overflows only when the
    /// three groups together are wider than the line.
    pub fn compute(width: usize, left: usize, center: usize, right: usize) -> Self {
        let w = width as i64;
        let (l, c, r) = (left as i64, center as i64, right as i64);

        let center_offset = w / 2 - c / 2;
        let right_offset = w - r;
        let mut left_pad = center_offset - l;
        let mut right_pad = right_offset - (center_offset + c);

        if left_pad < 0 {
            right_pad += left_pad;
            left_pad = 0;
        }
        if right_pad < 0 {
            left_pad += right_pad;
            right_pad = 0;
        }

        if left_pad < 0 {
            Placement::Overflow {
                by: (-left_pad) as usize,
                total: left + center + right,
            }
        } else {
            Placement::Fits {
                left_pad: left_pad as usize,
                right_pad: right_pad as usize,
            }
        }
    }
}

/// Replacement line shown when the bar does not fit.
pub fn overflow_message(width: usize, by: usize, total: usize) -> String {
    let msg = format!("Output is too long, by {} characters! ({})", by, total);
    if msg.chars().count() < width {
        msg
    } else {
        "Too Long!".to_string()
    }
}

/// Renders the layout into one terminal line and keeps the clickable regions
/// of the last rendered frame.
pub struct Bar {
    layout: BarLayout,
    width: usize,
    column_bias: i64,
    regions: RefCell<Vec<HitRegion>>,
}

impl Bar {
    pub fn new(layout: BarLayout, width: usize) -> Self {
        Self {
            layout,
            width,
            column_bias: 0,
            regions: RefCell::new(Vec::new()),
        }
    }

    /// Offset added to every region bound so they line up with the columns
    /// the paired event source reports.
    pub fn with_column_bias(mut self, bias: i64) -> Self {
        self.column_bias = bias;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn column_bias(&self) -> i64 {
        self.column_bias
    }

    /// Regions computed by the most recent `status()`.
    pub fn regions(&self) -> Vec<HitRegion> {
        self.regions.borrow().clone()
    }

    /// Render one frame of the bar.
    pub async fn status(&self) -> String {
        let left = render(&self.layout.left, None).await;
        let center = render(&self.layout.center, None).await;
        let right = render(&self.layout.right, None).await;

        let (l, c, r) = (visible_length(&left), visible_length(&center), visible_length(&right));

        let (left_pad, right_pad) = match Placement::compute(self.width, l, c, r) {
            Placement::Fits { left_pad, right_pad } => (left_pad, right_pad),
            Placement::Overflow { by, total } => {
                let msg = format!("Output is too long, by {} characters! ({})", by, total);
                warn_with_context("layout", &msg);
                self.regions.borrow_mut().clear();
                return overflow_message(self.width, by, total);
            }
        };

        let center_start = l + left_pad;
        let right_start = center_start + c + right_pad;

        let mut regions = Vec::new();
        for (group, start) in [
            (&self.layout.left, 0),
            (&self.layout.center, center_start),
            (&self.layout.right, right_start),
        ] {
            let (found, _) = collect_regions(group, None, start, self.column_bias).await;
            regions.extend(found);
        }
        debug_with_context("layout", &format!("{} hit regions", regions.len()));
        *self.regions.borrow_mut() = regions;

        let line = format!(
            "{}{}{}{}{}",
            left,
            " ".repeat(left_pad),
            center,
            " ".repeat(right_pad),
            right
        );
        line.replace(['\n', '\r'], "")
    }
}

/// Walk `modules` again, ignoring colour, and record the span of every module
/// that takes input. Returns the regions and the total width walked.
pub fn collect_regions<'a>(
    modules: &'a [ModuleRef],
    parent: Option<&'a Environment>,
    offset: usize,
    bias: i64,
) -> LocalBoxFuture<'a, (Vec<HitRegion>, usize)> {
    Box::pin(async move {
        let env = Environment::new(parent);
        let mut regions = Vec::new();
        let mut pos = offset;

        for module in modules {
            let width = match module.as_ref() {
                Module::Render(m) => {
                    let width = match m.alloc() {
                        Some(width) => width,
                        None => match m.render(&env).await {
                            Ok(text) => visible_length(&text),
                            Err(_) => 0,
                        },
                    };
                    if m.accepts_input() {
                        regions.push(region(module, pos, width, bias));
                    }
                    width
                }
                Module::Meta(m) => {
                    let children = match m.children(&env).await {
                        Ok(children) => children,
                        Err(_) => continue,
                    };
                    let (inner, width) = collect_regions(&children, Some(&env), pos, bias).await;
                    if m.accepts_input() {
                        regions.push(region(module, pos, width, bias));
                    } else {
                        regions.extend(inner);
                    }
                    width
                }
            };
            pos += width;
        }

        (regions, pos - offset)
    })
}

fn region(module: &ModuleRef, pos: usize, width: usize, bias: i64) -> HitRegion {
    HitRegion {
        start: pos as i64 + bias,
        end: (pos + width) as i64 + bias,
        module: module.clone(),
    }
}
