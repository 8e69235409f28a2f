#![forbid(unsafe_code)]

//! Dependency-collection context.
//!
//! The collecting effect is tracked on a thread-local stack rather than in a
//! single slot. Effect construction pushes a frame, reads the model, and pops
//! the frame when the guard drops (also on early return via `?`). Property
//! reads register only with the TOP frame, so building an effect while
//! another is still collecting leaves the outer effect's registrations
//! intact.
//!
//! An [`untracked`] frame masks every frame beneath it: reads performed while
//! it is on top register nowhere. Effect updates run untracked so that a
//! re-read never adds registrations.

use std::cell::RefCell;
use std::rc::Rc;

use super::dep::DependencySet;
use super::effect::ReactiveEffect;

thread_local! {
    static COLLECTORS: RefCell<Vec<Option<Rc<ReactiveEffect>>>> = const { RefCell::new(Vec::new()) };
}

/// Pops the frame it pushed when dropped.
struct FrameGuard {
    depth: usize,
}

impl FrameGuard {
    fn push(frame: Option<Rc<ReactiveEffect>>) -> Self {
        let depth = COLLECTORS.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(frame);
            stack.len()
        });
        Self { depth }
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        COLLECTORS.with(|stack| {
            let mut stack = stack.borrow_mut();
            debug_assert_eq!(stack.len(), self.depth, "collector frames popped out of order");
            stack.pop();
        });
    }
}

/// Run `f` with `effect` as the collecting subscriber.
pub(crate) fn collect<R>(effect: &Rc<ReactiveEffect>, f: impl FnOnce() -> R) -> R {
    let _frame = FrameGuard::push(Some(Rc::clone(effect)));
    f()
}

/// Run `f` with dependency collection suspended.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    let _frame = FrameGuard::push(None);
    f()
}

/// Register the collecting effect (if any) as a subscriber of `deps`.
pub(crate) fn register_read(deps: &DependencySet) {
    let current = COLLECTORS.with(|stack| stack.borrow().last().cloned().flatten());
    if let Some(effect) = current {
        deps.register(&effect);
    }
}

/// Whether an effect is currently collecting dependencies on this thread.
#[must_use]
pub fn is_collecting() -> bool {
    COLLECTORS.with(|stack| matches!(stack.borrow().last(), Some(Some(_))))
}

/// Number of frames on the collection stack.
#[must_use]
pub fn depth() -> usize {
    COLLECTORS.with(|stack| stack.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::intercept_root;
    use serde_json::json;

    #[test]
    fn stack_is_empty_outside_collection() {
        assert_eq!(depth(), 0);
        assert!(!is_collecting());
    }

    #[test]
    fn nested_collection_keeps_outer_registrations() {
        let model = intercept_root(json!({"a": 1, "b": 2, "c": 3})).unwrap();
        let outer = ReactiveEffect::new("a", &model, |_| Ok(())).unwrap();
        let a_deps = model.cell("a").unwrap().dependencies().len();

        // Re-enter collection for the outer effect, build an inner effect in
        // the middle, then keep reading.
        let inner = collect(&outer, || {
            let inner = ReactiveEffect::new("b", &model, |_| Ok(())).unwrap();
            let _ = model.read("c");
            inner
        });

        let b_ids = model.cell("b").unwrap().dependencies().subscriber_ids();
        let c_ids = model.cell("c").unwrap().dependencies().subscriber_ids();
        assert_eq!(b_ids, vec![inner.id()]);
        assert_eq!(c_ids, vec![outer.id()], "outer must still collect after inner");
        assert_eq!(model.cell("a").unwrap().dependencies().len(), a_deps);
        assert_eq!(depth(), 0);
    }

    #[test]
    fn untracked_masks_the_collector() {
        let model = intercept_root(json!({"a": 1, "b": 2})).unwrap();
        let effect = ReactiveEffect::new("a", &model, |_| Ok(())).unwrap();
        collect(&effect, || {
            assert!(is_collecting());
            untracked(|| {
                assert!(!is_collecting());
                let _ = model.read("b");
            });
        });
        assert!(model.cell("b").unwrap().dependencies().is_empty());
    }

    #[test]
    fn frame_pops_on_early_return() {
        let model = intercept_root(json!({"a": null})).unwrap();
        let result = ReactiveEffect::new("a.b", &model, |_| Ok(()));
        assert!(result.is_err());
        assert_eq!(depth(), 0);
    }

    #[test]
    fn repeated_reads_register_repeatedly() {
        let model = intercept_root(json!({"a": 1})).unwrap();
        let effect = ReactiveEffect::new("a", &model, |_| Ok(())).unwrap();
        collect(&effect, || {
            let _ = model.read("a");
        });

        let cell = model.cell("a").unwrap();
        assert_eq!(cell.dependencies().subscriber_ids(), vec![effect.id(), effect.id()]);

        model.write("a", 2).unwrap();
        assert_eq!(effect.update_count(), 2, "one update per registration");
    }
}
