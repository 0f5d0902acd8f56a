use crate::version::Version;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Window given to the user to read the banner before the page reloads,
/// and the length of the manual check window. The reload cannot be
/// cancelled once scheduled.
pub const UPDATE_DELAY: Duration = Duration::from_millis(3000);

/// Lifecycle states of a worker registration, as reported by the host
/// registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkerLifecycle {
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown worker state {0:?}")]
pub struct UnknownWorkerState(pub String);

impl FromStr for WorkerLifecycle {
    type Err = UnknownWorkerState;

    fn from_str(raw: &str) -> Result<WorkerLifecycle, UnknownWorkerState> {
        match raw {
            "installing" => Ok(WorkerLifecycle::Installing),
            "installed" => Ok(WorkerLifecycle::Installed),
            "activating" => Ok(WorkerLifecycle::Activating),
            "activated" => Ok(WorkerLifecycle::Activated),
            "redundant" => Ok(WorkerLifecycle::Redundant),
            _ => Err(UnknownWorkerState(raw.to_owned())),
        }
    }
}

/// Everything the page reacts to: host registry notifications, the user's
/// click, and the two fixed timers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowEvent {
    UpdateFound,
    InstallingStateChanged {
        state: WorkerLifecycle,
        has_controller: bool,
    },
    Ready {
        has_active: bool,
    },
    CheckRequested,
    CheckWindowElapsed,
    ReloadDelayElapsed,
}

/// Host-side actions the reducer asks for. The wasm layer performs them;
/// tests just assert on them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Switch the banner to its update-available appearance, fill in the
    /// headline and subhead, and open it.
    AnnounceUpdate,
    /// Start the fixed [`UPDATE_DELAY`] countdown to [`Effect::Reload`].
    ScheduleReload,
    HideCheckControl,
    ShowCheckControl,
    /// Open the banner without changing its display mode (the manual check
    /// shows an empty banner).
    OpenBanner,
    CollapseBanner,
    /// Ask the host registry to refresh the registration.
    RequestRegistrationUpdate,
    /// Start the fixed [`UPDATE_DELAY`] countdown to
    /// [`FlowEvent::CheckWindowElapsed`].
    ScheduleCheckReset,
    ReportVersion(Version),
    Reload,
}

/// Display mode reflected as the banner container's data attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerMode {
    Hidden,
    UpdateAvailable,
}

impl BannerMode {
    pub fn as_data_state(self) -> &'static str {
        match self {
            BannerMode::Hidden => "",
            BannerMode::UpdateAvailable => "updateavailable",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BannerState {
    pub mode: BannerMode,
    pub open: bool,
}

impl BannerState {
    pub fn hidden() -> BannerState {
        BannerState {
            mode: BannerMode::Hidden,
            open: false,
        }
    }
}

/// Reaction logic of the page: one event in, a list of host effects out.
/// The host worker registry itself is an external collaborator; this type
/// only tracks what the page shows and what it has already sent.
pub struct UpdateFlow {
    version: Version,
    banner: BannerState,
    check_visible: bool,
    version_sent: bool,
}

impl UpdateFlow {
    pub fn new(version: Version) -> UpdateFlow {
        UpdateFlow {
            version,
            banner: BannerState::hidden(),
            check_visible: true,
            version_sent: false,
        }
    }

    pub fn banner(&self) -> BannerState {
        self.banner
    }

    pub fn is_check_visible(&self) -> bool {
        self.check_visible
    }

    pub fn on_event(&mut self, event: FlowEvent) -> Vec<Effect> {
        match event {
            // The host attaches the state change observer to the installing
            // worker; nothing to show yet.
            FlowEvent::UpdateFound => vec![],
            FlowEvent::InstallingStateChanged {
                state,
                has_controller,
            } => {
                if state == WorkerLifecycle::Installed && has_controller {
                    // A controller already owns the page, so this install is
                    // an update rather than the first visit.
                    self.banner = BannerState {
                        mode: BannerMode::UpdateAvailable,
                        open: true,
                    };
                    vec![Effect::AnnounceUpdate, Effect::ScheduleReload]
                } else {
                    vec![]
                }
            }
            FlowEvent::CheckRequested => {
                self.check_visible = false;
                self.banner.open = true;
                vec![
                    Effect::HideCheckControl,
                    Effect::OpenBanner,
                    Effect::RequestRegistrationUpdate,
                    Effect::ScheduleCheckReset,
                ]
            }
            FlowEvent::CheckWindowElapsed => {
                // Unconditional: the banner collapses and the control comes
                // back even when the refresh is still pending or an update
                // announcement landed inside the window. The display mode
                // attribute is left as it was.
                self.check_visible = true;
                self.banner.open = false;
                vec![Effect::CollapseBanner, Effect::ShowCheckControl]
            }
            FlowEvent::Ready { has_active } => {
                if has_active && !self.version_sent {
                    self.version_sent = true;
                    vec![Effect::ReportVersion(self.version.clone())]
                } else {
                    vec![]
                }
            }
            FlowEvent::ReloadDelayElapsed => vec![Effect::Reload],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_version() -> Version {
        Version::new("660731-1515").unwrap()
    }

    fn flow() -> UpdateFlow {
        UpdateFlow::new(test_version())
    }

    fn installed(has_controller: bool) -> FlowEvent {
        FlowEvent::InstallingStateChanged {
            state: WorkerLifecycle::Installed,
            has_controller,
        }
    }

    #[test]
    fn test_update_with_controller_announces_and_schedules_reload() {
        let mut flow = flow();
        assert_eq!(flow.on_event(FlowEvent::UpdateFound), vec![]);

        let effects = flow.on_event(installed(true));
        assert_eq!(effects, vec![Effect::AnnounceUpdate, Effect::ScheduleReload]);
        assert_eq!(
            flow.banner(),
            BannerState {
                mode: BannerMode::UpdateAvailable,
                open: true,
            }
        );
    }

    #[test]
    fn test_first_install_stays_silent() {
        let mut flow = flow();
        let effects = flow.on_event(installed(false));
        assert_eq!(effects, vec![]);
        assert_eq!(flow.banner(), BannerState::hidden());
    }

    #[test]
    fn test_non_installed_states_are_ignored() {
        let mut flow = flow();
        for state in [
            WorkerLifecycle::Installing,
            WorkerLifecycle::Activating,
            WorkerLifecycle::Activated,
            WorkerLifecycle::Redundant,
        ] {
            let effects = flow.on_event(FlowEvent::InstallingStateChanged {
                state,
                has_controller: true,
            });
            assert_eq!(effects, vec![], "state {state:?} must not trigger the banner");
        }
        assert_eq!(flow.banner(), BannerState::hidden());
    }

    #[test]
    fn test_reload_fires_at_the_fixed_delay() {
        assert_eq!(UPDATE_DELAY, Duration::from_millis(3000));

        let mut flow = flow();
        flow.on_event(installed(true));
        assert_eq!(flow.on_event(FlowEvent::ReloadDelayElapsed), vec![Effect::Reload]);
    }

    #[test]
    fn test_manual_check_opens_banner_and_refreshes_registration() {
        let mut flow = flow();
        let effects = flow.on_event(FlowEvent::CheckRequested);
        assert_eq!(
            effects,
            vec![
                Effect::HideCheckControl,
                Effect::OpenBanner,
                Effect::RequestRegistrationUpdate,
                Effect::ScheduleCheckReset,
            ]
        );
        assert!(!flow.is_check_visible());
        assert_eq!(flow.banner().mode, BannerMode::Hidden);
        assert!(flow.banner().open);
    }

    #[test]
    fn test_check_window_restores_control_regardless_of_outcome() {
        let mut flow = flow();
        flow.on_event(FlowEvent::CheckRequested);

        let effects = flow.on_event(FlowEvent::CheckWindowElapsed);
        assert_eq!(effects, vec![Effect::CollapseBanner, Effect::ShowCheckControl]);
        assert!(flow.is_check_visible());
        assert!(!flow.banner().open);
    }

    #[test]
    fn test_check_window_collapses_even_after_update_announcement() {
        // An update landing inside the manual check window still gets its
        // banner collapsed when the window elapses; only the height resets,
        // the display mode stays update-available.
        let mut flow = flow();
        flow.on_event(FlowEvent::CheckRequested);
        flow.on_event(installed(true));

        let effects = flow.on_event(FlowEvent::CheckWindowElapsed);
        assert_eq!(effects, vec![Effect::CollapseBanner, Effect::ShowCheckControl]);
        assert_eq!(flow.banner().mode, BannerMode::UpdateAvailable);
        assert!(!flow.banner().open);
    }

    #[test]
    fn test_ready_with_active_worker_reports_version_once() {
        let mut flow = flow();
        let effects = flow.on_event(FlowEvent::Ready { has_active: true });
        assert_eq!(effects, vec![Effect::ReportVersion(test_version())]);

        assert_eq!(flow.on_event(FlowEvent::Ready { has_active: true }), vec![]);
    }

    #[test]
    fn test_ready_without_active_worker_sends_nothing() {
        let mut flow = flow();
        assert_eq!(flow.on_event(FlowEvent::Ready { has_active: false }), vec![]);
    }

    #[test]
    fn test_worker_lifecycle_parses_host_state_strings() {
        assert_eq!("installing".parse(), Ok(WorkerLifecycle::Installing));
        assert_eq!("installed".parse(), Ok(WorkerLifecycle::Installed));
        assert_eq!("activating".parse(), Ok(WorkerLifecycle::Activating));
        assert_eq!("activated".parse(), Ok(WorkerLifecycle::Activated));
        assert_eq!("redundant".parse(), Ok(WorkerLifecycle::Redundant));
        assert_eq!(
            "parsed".parse::<WorkerLifecycle>(),
            Err(UnknownWorkerState("parsed".to_owned()))
        );
    }

    #[test]
    fn test_banner_mode_data_state_values() {
        assert_eq!(BannerMode::Hidden.as_data_state(), "");
        assert_eq!(BannerMode::UpdateAvailable.as_data_state(), "updateavailable");
    }
}
