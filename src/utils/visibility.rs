use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use web_sys::js_sys::Array;

type Callback = Box<dyn FnOnce()>;

/// Source of a single "now visible" signal.
///
/// The callback runs at most once. Dropping the subscription before it
/// fires cancels it.
pub trait VisibilityTrigger {
    type Subscription;

    fn subscribe(&self, on_visible: Box<dyn FnOnce()>) -> Self::Subscription;
}

/// Holds a pending callback until it is fired or dropped.
#[derive(Clone, Default)]
struct Pending(Rc<RefCell<Option<Callback>>>);

impl Pending {
    fn arm(&self, callback: Callback) {
        *self.0.borrow_mut() = Some(callback);
    }

    fn fire(&self) -> bool {
        // Take before calling so re-entrant fires are no-ops
        let callback = self.0.borrow_mut().take();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    fn cancel(&self) {
        self.0.borrow_mut().take();
    }

    fn is_armed(&self) -> bool {
        self.0.borrow().is_some()
    }
}

/// Trigger fired explicitly by the caller.
///
/// Used off-browser and wherever visibility is known up front.
#[derive(Clone, Default)]
pub struct ManualTrigger {
    pending: Pending,
}

impl ManualTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the armed callback. Returns `false` if nothing was armed.
    pub fn fire(&self) -> bool {
        self.pending.fire()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_armed()
    }
}

pub struct ManualSubscription {
    pending: Pending,
}

impl Drop for ManualSubscription {
    fn drop(&mut self) {
        self.pending.cancel();
    }
}

impl VisibilityTrigger for ManualTrigger {
    type Subscription = ManualSubscription;

    fn subscribe(&self, on_visible: Box<dyn FnOnce()>) -> ManualSubscription {
        self.pending.arm(on_visible);
        ManualSubscription {
            pending: self.pending.clone(),
        }
    }
}

/// Share of the element that must be on screen to count as visible.
const VISIBLE_RATIO: f64 = 0.2;

/// Fires when an element first intersects the viewport.
pub struct ViewportTrigger {
    element: Element,
}

impl ViewportTrigger {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

/// Disconnects the observer on drop.
pub struct ViewportSubscription {
    observer: Option<IntersectionObserver>,
    pending: Pending,
    _callback: Option<Closure<dyn FnMut(Array, IntersectionObserver)>>,
}

impl Drop for ViewportSubscription {
    fn drop(&mut self) {
        self.pending.cancel();
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
    }
}

impl VisibilityTrigger for ViewportTrigger {
    type Subscription = ViewportSubscription;

    fn subscribe(&self, on_visible: Box<dyn FnOnce()>) -> ViewportSubscription {
        let pending = Pending::default();
        pending.arm(on_visible);

        let fire = pending.clone();
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                let visible = entries.iter().any(|entry| {
                    entry
                        .dyn_into::<IntersectionObserverEntry>()
                        .is_ok_and(|entry| entry.is_intersecting())
                });
                if visible {
                    observer.disconnect();
                    fire.fire();
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&VISIBLE_RATIO.into());

        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
            Ok(observer) => {
                observer.observe(&self.element);
                ViewportSubscription {
                    observer: Some(observer),
                    pending,
                    _callback: Some(callback),
                }
            }
            Err(_) => {
                // No observer support: treat the element as visible
                crate::utils::log::warn("IntersectionObserver unavailable, starting immediately");
                pending.fire();
                ViewportSubscription {
                    observer: None,
                    pending,
                    _callback: None,
                }
            }
        }
    }
}
