use crate::bootstrap::{self, AppManifest};
use crate::service_worker::{provide_service_worker_bridge, wire_service_worker};
use crate::update_banner::{provide_banner_ui, CheckUpdateControl, UpdateBanner};
use crate::versioning::VERSION;
use leptos::*;
use volume_core::Version;

#[component]
pub fn App() -> impl IntoView {
    let ui = provide_banner_ui();

    let (manifest, set_manifest) = create_signal::<Option<AppManifest>>(None);
    bootstrap::init_app(set_manifest);

    let version = Version::new(VERSION).unwrap();
    let bridge = wire_service_worker(ui, version);
    provide_service_worker_bridge(bridge);

    // The manifest title doubles as the tab title once it lands.
    create_effect(move |_| {
        if let Some(manifest) = manifest.get() {
            document().set_title(&manifest.title);
        }
    });

    let title = move || {
        manifest
            .get()
            .map(|manifest| manifest.title)
            .unwrap_or_else(|| "Volume".to_owned())
    };
    let tagline = move || manifest.get().and_then(|manifest| manifest.tagline);

    view! {
        <div class="app-shell">
            <header class="app-header">
                <h1 class="app-title">{title}</h1>
                <CheckUpdateControl />
            </header>
            <UpdateBanner />
            <main id="app" class="app-main">
                <Show
                    when=move || tagline().is_some()
                    fallback=|| ()
                >
                    <p class="app-tagline">{tagline}</p>
                </Show>
            </main>
        </div>
    }
}
