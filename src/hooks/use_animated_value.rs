use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use yew::prelude::*;

use crate::config::Config;
use crate::services::animator::{Animator, resolve_target};
use crate::services::orchestrator::DatasetId;
use crate::utils::format::{NO_DATA, Unit};
use crate::utils::visibility::{ViewportSubscription, ViewportTrigger, VisibilityTrigger};

/// Counts a KPI up from zero the first time `node` scrolls into view.
///
/// Restarts only when `dataset` changes; repaints with the same dataset
/// keep the current progress.
#[hook]
pub fn use_animated_value(
    node: NodeRef,
    value: Option<f64>,
    formatted: Option<AttrValue>,
    unit_hint: Option<Unit>,
    dataset: DatasetId,
) -> String {
    let animator = use_mut_ref(Animator::default);
    let redraw = use_force_update();
    let resolved = resolve_target(value, formatted.as_deref(), unit_hint);

    {
        let animator = animator.clone();

        use_effect_with(dataset, move |dataset| {
            let mut subscription: Option<ViewportSubscription> = None;
            let aborted = Rc::new(Cell::new(false));

            if let Some((target, unit)) = resolved {
                animator.borrow_mut().arm(*dataset, target, unit);

                if let Some(element) = node.cast::<Element>() {
                    let aborted = aborted.clone();
                    let on_visible = Box::new(move || {
                        animator.borrow_mut().start();
                        spawn_local(frame_loop(animator, aborted, redraw));
                    });
                    subscription = Some(ViewportTrigger::new(element).subscribe(on_visible));
                }
            }

            move || {
                aborted.set(true);
                drop(subscription);
            }
        });
    }

    if resolved.is_some() {
        animator.borrow().rendered()
    } else {
        NO_DATA.to_string()
    }
}

async fn frame_loop(
    animator: Rc<RefCell<Animator>>,
    aborted: Rc<Cell<bool>>,
    redraw: UseForceUpdateHandle,
) {
    loop {
        TimeoutFuture::new(Config::ANIMATION_FRAME_MS).await;
        if aborted.get() {
            break;
        }

        let finished = {
            let mut animator = animator.borrow_mut();
            animator.advance(Config::ANIMATION_FRAME_MS);
            animator.is_finished()
        };
        redraw.force_update();

        if finished {
            break;
        }
    }
}
