use crate::service_worker::use_service_worker_bridge;
use leptos::*;
use volume_core::BannerMode;

pub const UPDATE_HEADLINE: &str = "Update Available";
pub const UPDATE_SUBHEAD: &str = "App is updating to the latest version..";

/// Signals the update flow writes into. The banner's appearance switch is
/// the `data-state` attribute; open/closed is the inline height.
#[derive(Clone, Copy)]
pub struct BannerUi {
    pub mode: RwSignal<BannerMode>,
    pub open: RwSignal<bool>,
    pub check_visible: RwSignal<bool>,
}

impl BannerUi {
    pub fn new() -> BannerUi {
        BannerUi {
            mode: create_rw_signal(BannerMode::Hidden),
            open: create_rw_signal(false),
            check_visible: create_rw_signal(false),
        }
    }
}

pub fn provide_banner_ui() -> BannerUi {
    let ui = BannerUi::new();
    provide_context(ui);
    ui
}

pub fn use_banner_ui() -> BannerUi {
    use_context::<BannerUi>().unwrap()
}

#[component]
pub fn CheckUpdateControl() -> impl IntoView {
    let ui = use_banner_ui();
    let bridge = use_service_worker_bridge();

    view! {
        <button
            id="checkUpdate"
            type="button"
            style:display=move || if ui.check_visible.get() { "block" } else { "none" }
            on:click=move |_| {
                if let Some(bridge) = &bridge {
                    bridge.check_for_update();
                }
            }
        >
            "Check for update"
        </button>
    }
}

#[component]
pub fn UpdateBanner() -> impl IntoView {
    let ui = use_banner_ui();
    let content_ref = create_node_ref::<html::Div>();

    // Open height is measured from the content so the css transition has a
    // concrete pixel target; collapsed is a hard 0.
    let banner_height = move || {
        if ui.open.get() {
            let content_height = content_ref
                .get()
                .map(|element| element.offset_height())
                .unwrap_or(0);
            format!("{content_height}px")
        } else {
            "0".to_owned()
        }
    };

    view! {
        <div
            id="updateBanner"
            data-state=move || ui.mode.get().as_data_state()
            style:height=banner_height
        >
            <div class="banner-content" node_ref=content_ref>
                <Show
                    when=move || ui.mode.get() == BannerMode::UpdateAvailable
                    fallback=|| ()
                >
                    <div class="banner-headline">{UPDATE_HEADLINE}</div>
                    <div class="banner-subhead">{UPDATE_SUBHEAD}</div>
                </Show>
            </div>
        </div>
    }
}
