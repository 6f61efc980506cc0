use crate::utils::FormatContext;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

pub const FG_COLOR: &str = "fg_color";
pub const BG_COLOR: &str = "bg_color";
/// Marks the environment level a powerline chain was opened in.
pub const POWERLINE_ROOT: &str = "isPowerBar";

/// Ambient render state shared down the module tree.
///
/// Cloning an `Environment` yields another handle to the same frame, so writes
/// made by one module are seen by the siblings rendered after it. Lookups that
/// miss locally continue up the parent chain.
#[derive(Clone, Debug)]
pub struct Environment {
    frame: Rc<Frame>,
}

#[derive(Debug)]
struct Frame {
    vars: RefCell<FormatContext>,
    parent: Option<Environment>,
}

impl Environment {
    /// Fresh frame with the default colours: white foreground, no background.
    pub fn new(parent: Option<&Environment>) -> Self {
        let mut vars = FormatContext::new();
        vars.insert(FG_COLOR.to_string(), Value::from("white"));
        vars.insert(BG_COLOR.to_string(), Value::Null);
        Self::with_vars(vars, parent)
    }

    /// Frame holding exactly `vars`, without the colour defaults.
    pub fn with_vars(vars: FormatContext, parent: Option<&Environment>) -> Self {
        Self {
            frame: Rc::new(Frame {
                vars: RefCell::new(vars),
                parent: parent.cloned(),
            }),
        }
    }

    pub fn parent(&self) -> Option<&Environment> {
        self.frame.parent.as_ref()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.frame.vars.borrow().get(key) {
            return Some(value.clone());
        }
        self.parent().and_then(|p| p.get(key))
    }

    pub fn get_local(&self, key: &str) -> Option<Value> {
        self.frame.vars.borrow().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<Value>) {
        self.frame.vars.borrow_mut().insert(key.to_string(), value.into());
    }

    pub fn fg_color(&self) -> Option<String> {
        self.color(FG_COLOR)
    }

    pub fn bg_color(&self) -> Option<String> {
        self.color(BG_COLOR)
    }

    pub fn set_fg_color(&self, color: Option<&str>) {
        self.set(FG_COLOR, color.map_or(Value::Null, Value::from));
    }

    pub fn set_bg_color(&self, color: Option<&str>) {
        self.set(BG_COLOR, color.map_or(Value::Null, Value::from));
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get_local(key), Some(Value::Bool(true)))
    }

    /// Nearest frame, starting with this one, flagged as a powerline root.
    /// Falls back to the outermost frame when no chain is open.
    pub fn powerline_root(&self) -> Environment {
        let mut env = self.clone();
        loop {
            if env.flag(POWERLINE_ROOT) {
                return env;
            }
            match env.parent() {
                Some(parent) => env = parent.clone(),
                None => return env,
            }
        }
    }

    /// Flatten the chain into one record, nearer frames shadowing ancestors.
    pub fn collapse(&self) -> FormatContext {
        let mut out = match self.parent() {
            Some(parent) => parent.collapse(),
            None => FormatContext::new(),
        };
        for (key, value) in self.frame.vars.borrow().iter() {
            out.insert(key.clone(), value.clone());
        }
        out
    }

    fn color(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}
