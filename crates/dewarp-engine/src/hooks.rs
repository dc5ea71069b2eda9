//! Pluggable per-frame hooks.
//!
//! Hooks run synchronously at the start of every tick, in registration order,
//! before the draw. They observe and may mutate the shared view parameters
//! (pan offset, fov). A failing hook is isolated: it is reported and the
//! remaining hooks and the draw still run, so one faulty plugin can never
//! halt the render loop.

use crate::error::EngineError;
use crate::projection::ViewParams;

/// One unit of per-frame logic.
pub trait Hook {
    /// Name used in logs when the hook fails.
    fn name(&self) -> &str;

    /// Called once per tick with the inter-frame delta in milliseconds.
    /// Hooks must not block; they run inside the frame callback.
    fn update(&mut self, view: &mut ViewParams, delta_ms: f64) -> Result<(), EngineError>;
}

/// A hook failure surfaced from one tick. The registry keeps running.
#[derive(Debug)]
pub struct HookFailure {
    pub hook: String,
    pub error: EngineError,
}

/// Ordered, append-only hook registry. Insertion order is invocation order;
/// duplicates are allowed.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Box<dyn Hook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a hook bound to the player's current view parameters and
    /// append it to the sequence.
    pub fn register<F>(&mut self, view: &ViewParams, factory: F)
    where
        F: FnOnce(&ViewParams) -> Box<dyn Hook>,
    {
        self.hooks.push(factory(view));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Invoke every hook in registration order. Failures are collected, not
    /// propagated; the caller logs them and continues with the draw.
    pub fn update_all(&mut self, view: &mut ViewParams, delta_ms: f64) -> Vec<HookFailure> {
        let mut failures = Vec::new();
        for hook in &mut self.hooks {
            if let Err(error) = hook.update(view, delta_ms) {
                failures.push(HookFailure {
                    hook: hook.name().to_string(),
                    error,
                });
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        label: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        fail: bool,
    }

    impl Hook for Recorder {
        fn name(&self) -> &str {
            self.label
        }

        fn update(&mut self, view: &mut ViewParams, _delta_ms: f64) -> Result<(), EngineError> {
            self.log.borrow_mut().push(self.label);
            view.pan.x += 1.0;
            if self.fail {
                Err(EngineError::Hook {
                    name: self.label.to_string(),
                    msg: "boom".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn recorder(
        label: &'static str,
        log: &Rc<RefCell<Vec<&'static str>>>,
        fail: bool,
    ) -> Box<dyn Hook> {
        Box::new(Recorder {
            label,
            log: log.clone(),
            fail,
        })
    }

    #[test]
    fn hooks_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut view = ViewParams::default();
        let mut registry = HookRegistry::new();
        registry.register(&view, |_| recorder("h1", &log, false));
        registry.register(&view, |_| recorder("h2", &log, false));

        for _ in 0..3 {
            let failures = registry.update_all(&mut view, 16.0);
            assert!(failures.is_empty());
        }
        assert_eq!(*log.borrow(), ["h1", "h2", "h1", "h2", "h1", "h2"]);
    }

    #[test]
    fn failing_hook_does_not_stop_the_rest() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut view = ViewParams::default();
        let mut registry = HookRegistry::new();
        registry.register(&view, |_| recorder("bad", &log, true));
        registry.register(&view, |_| recorder("good", &log, false));

        let failures = registry.update_all(&mut view, 16.0);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].hook, "bad");
        assert_eq!(*log.borrow(), ["bad", "good"]);
        // Both hooks still ran and mutated shared state.
        assert_eq!(view.pan.x, 2.0);
    }

    #[test]
    fn duplicate_registration_is_allowed() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut view = ViewParams::default();
        let mut registry = HookRegistry::new();
        registry.register(&view, |_| recorder("h", &log, false));
        registry.register(&view, |_| recorder("h", &log, false));
        assert_eq!(registry.len(), 2);
        registry.update_all(&mut view, 16.0);
        assert_eq!(log.borrow().len(), 2);
    }
}
