use crate::update_banner::BannerUi;
use gloo::timers::future::sleep;
use js_sys::Reflect;
use leptos::{provide_context, spawn_local, use_context, window, SignalSet};
use std::cell::RefCell;
use std::rc::Rc;
use volume_core::{
    BannerMode, Effect, FlowEvent, UpdateFlow, Version, WorkerLifecycle, WorkerMessage,
    UPDATE_DELAY,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    ServiceWorker, ServiceWorkerContainer, ServiceWorkerRegistration, ServiceWorkerState,
};

/// Fixed absolute path of the update worker script. Its update and cache
/// logic lives entirely on the worker side.
pub const WORKER_PATH: &str = "/sw.js";

/// Glue between the host worker registry and the pure update flow: host
/// events go in as [`FlowEvent`]s, the returned [`Effect`]s are applied to
/// the banner signals and the registry.
#[derive(Clone)]
pub struct ServiceWorkerBridge {
    container: ServiceWorkerContainer,
    flow: Rc<RefCell<UpdateFlow>>,
    registration: Rc<RefCell<Option<ServiceWorkerRegistration>>>,
    ui: BannerUi,
}

/// Registers the update worker and wires its lifecycle to the banner.
/// Returns `None` when the host exposes no worker registry, in which case
/// the check control never shows up and the page simply has no update flow.
pub fn wire_service_worker(ui: BannerUi, version: Version) -> Option<ServiceWorkerBridge> {
    let container = service_worker_container()?;
    ui.check_visible.set(true);

    let bridge = ServiceWorkerBridge {
        container,
        flow: Rc::new(RefCell::new(UpdateFlow::new(version))),
        registration: Rc::new(RefCell::new(None)),
        ui,
    };

    bridge.register();
    bridge.await_ready();

    Some(bridge)
}

pub fn provide_service_worker_bridge(bridge: Option<ServiceWorkerBridge>) {
    provide_context(bridge);
}

pub fn use_service_worker_bridge() -> Option<ServiceWorkerBridge> {
    use_context::<Option<ServiceWorkerBridge>>().flatten()
}

impl ServiceWorkerBridge {
    /// Click entry of the manual check control. Does nothing until the
    /// registration has landed, matching the page only binding the click
    /// once registration succeeded.
    pub fn check_for_update(&self) {
        if self.registration.borrow().is_none() {
            return;
        }
        self.dispatch(FlowEvent::CheckRequested);
    }

    fn register(&self) {
        let bridge = self.clone();
        spawn_local(async move {
            match JsFuture::from(bridge.container.register(WORKER_PATH)).await {
                Ok(value) => {
                    let registration: ServiceWorkerRegistration = value.unchecked_into();
                    bridge.observe_updates(&registration);
                    *bridge.registration.borrow_mut() = Some(registration);
                }
                Err(err) => log::error!("Service Worker Registration : {err:?}"),
            }
        });
    }

    fn await_ready(&self) {
        let bridge = self.clone();
        spawn_local(async move {
            match ready_registration(&bridge.container).await {
                Ok(registration) => {
                    // The ready registration may land before our own
                    // register() call resolves, so the handshake posts
                    // through it directly.
                    let has_active = registration.active().is_some();
                    bridge.dispatch_with(Some(&registration), FlowEvent::Ready { has_active });
                }
                Err(err) => log::error!("Service Worker Ready : {err:?}"),
            }
        });
    }

    fn observe_updates(&self, registration: &ServiceWorkerRegistration) {
        let bridge = self.clone();
        let reg = registration.clone();
        let on_update_found = Closure::wrap(Box::new(move || {
            bridge.dispatch(FlowEvent::UpdateFound);

            let Some(installing) = reg.installing() else {
                return;
            };
            let bridge = bridge.clone();
            let worker = installing.clone();
            let on_state_change = Closure::wrap(Box::new(move || {
                let Some(state) = worker_lifecycle(worker.state()) else {
                    return;
                };
                let has_controller = bridge.container.controller().is_some();
                bridge.dispatch(FlowEvent::InstallingStateChanged {
                    state,
                    has_controller,
                });
            }) as Box<dyn FnMut()>);
            installing.set_onstatechange(Some(on_state_change.as_ref().unchecked_ref()));
            on_state_change.forget();
        }) as Box<dyn FnMut()>);
        registration.set_onupdatefound(Some(on_update_found.as_ref().unchecked_ref()));
        on_update_found.forget();
    }

    fn dispatch(&self, event: FlowEvent) {
        self.dispatch_with(None, event);
    }

    fn dispatch_with(&self, registration: Option<&ServiceWorkerRegistration>, event: FlowEvent) {
        let effects = self.flow.borrow_mut().on_event(event);
        for effect in effects {
            self.apply(registration, effect);
        }
    }

    fn apply(&self, registration: Option<&ServiceWorkerRegistration>, effect: Effect) {
        match effect {
            Effect::AnnounceUpdate => {
                self.ui.mode.set(BannerMode::UpdateAvailable);
                self.ui.open.set(true);
            }
            Effect::ScheduleReload => self.schedule(FlowEvent::ReloadDelayElapsed),
            Effect::HideCheckControl => self.ui.check_visible.set(false),
            Effect::ShowCheckControl => self.ui.check_visible.set(true),
            Effect::OpenBanner => self.ui.open.set(true),
            Effect::CollapseBanner => self.ui.open.set(false),
            Effect::RequestRegistrationUpdate => {
                if let Some(registration) = registration.or(self.registration.borrow().as_ref()) {
                    // Fire and forget; the outcome never feeds back into
                    // the check window.
                    if let Err(err) = registration.update() {
                        log::error!("Service Worker Update : {err:?}");
                    }
                }
            }
            Effect::ScheduleCheckReset => self.schedule(FlowEvent::CheckWindowElapsed),
            Effect::ReportVersion(version) => {
                let stored = self.registration.borrow();
                let active = registration
                    .or(stored.as_ref())
                    .and_then(|registration| registration.active());
                if let Some(active) = active {
                    let message = WorkerMessage::version_report(version);
                    if let Err(err) = post_message(&active, &message) {
                        log::error!("Service Worker Post : {err:?}");
                    }
                }
            }
            Effect::Reload => {
                if let Err(err) = window().location().reload() {
                    log::error!("Reload : {err:?}");
                }
            }
        }
    }

    fn schedule(&self, event: FlowEvent) {
        let bridge = self.clone();
        spawn_local(async move {
            sleep(UPDATE_DELAY).await;
            bridge.dispatch(event);
        });
    }
}

fn service_worker_container() -> Option<ServiceWorkerContainer> {
    let window = web_sys::window()?;
    let navigator = window.navigator();
    let supported =
        Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false);
    if !supported {
        return None;
    }
    Some(navigator.service_worker())
}

async fn ready_registration(
    container: &ServiceWorkerContainer,
) -> Result<ServiceWorkerRegistration, JsValue> {
    let ready = JsFuture::from(container.ready()?).await?;
    Ok(ready.unchecked_into())
}

fn worker_lifecycle(state: ServiceWorkerState) -> Option<WorkerLifecycle> {
    match state {
        ServiceWorkerState::Installing => Some(WorkerLifecycle::Installing),
        ServiceWorkerState::Installed => Some(WorkerLifecycle::Installed),
        ServiceWorkerState::Activating => Some(WorkerLifecycle::Activating),
        ServiceWorkerState::Activated => Some(WorkerLifecycle::Activated),
        ServiceWorkerState::Redundant => Some(WorkerLifecycle::Redundant),
        _ => None,
    }
}

fn post_message(worker: &ServiceWorker, message: &WorkerMessage) -> Result<(), JsValue> {
    let WorkerMessage::VersionReport { value } = message;
    let payload = js_sys::Object::new();
    Reflect::set(
        &payload,
        &JsValue::from_str("type"),
        &JsValue::from_str(message.tag()),
    )?;
    Reflect::set(
        &payload,
        &JsValue::from_str("value"),
        &JsValue::from_str(value.as_str()),
    )?;
    worker.post_message(&payload)
}
