pub const TITLE: &str = "Pomodoro \u{1F345}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub sound: bool,
}

impl Alert {
    pub fn interval_finished(label: &str) -> Self {
        Alert {
            title: TITLE.to_string(),
            message: format!("{label} finished!"),
            sound: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

pub trait Notifier {
    fn send(&self, alert: &Alert) -> Result<(), NotifyError>;
}

pub struct DesktopNotifier {
    silent: bool,
}

impl DesktopNotifier {
    pub fn new(silent: bool) -> Self {
        DesktopNotifier { silent }
    }
}

impl Notifier for DesktopNotifier {
    fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        let mut notification = notify_rust::Notification::new();
        notification
            .summary(&alert.title)
            .body(&alert.message)
            .appname("pomo");

        let sound = alert.sound && !self.silent;

        #[cfg(target_os = "macos")]
        if sound {
            notification.sound_name("Glass");
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        if sound {
            notification.hint(notify_rust::Hint::SoundName("message-new-instant".to_string()));
        }

        #[cfg(windows)]
        let _ = sound;

        notification
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError(e.to_string()))
    }
}
