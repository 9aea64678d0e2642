//! Restarting the host application after a switch
//!
//! The restart is fire-and-forget: by the time it runs the config has been
//! written and the app is about to be torn down, so nobody waits for it.

use std::process::{Command, Stdio};

/// Host application name used when none is configured
pub const DEFAULT_APP_NAME: &str = "Claude";

/// Something that restarts the host application
pub trait Restarter {
    /// Start the restart and return immediately
    fn trigger(&self);
}

/// Does nothing; used when restarts are disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRestarter;

impl Restarter for NoopRestarter {
    fn trigger(&self) {
        tracing::info!("restart disabled, restart the application manually");
    }
}

/// Restarts the app with a detached shell script
#[derive(Debug, Clone)]
pub struct CommandRestarter {
    script: String,
    args: Vec<String>,
}

impl CommandRestarter {
    /// Platform restart recipe for `app_name`
    ///
    /// Returns `None` where no recipe is known.
    #[must_use]
    pub fn for_app(app_name: &str) -> Option<Self> {
        restart_script().map(|script| Self::with_script(script, [app_name]))
    }

    /// Restart by running a shell script
    ///
    /// `args` are passed as the positional parameters `$1`, `$2`, ... and are
    /// never spliced into the script text.
    #[must_use]
    pub fn with_script<I, S>(script: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: script.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Restarter for CommandRestarter {
    fn trigger(&self) {
        let spawned = Command::new("sh")
            .arg("-c")
            .arg(&self.script)
            .arg("sh")
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                // Reap in the background so the child never lingers as a zombie
                std::thread::spawn(move || {
                    let _ = child.wait();
                });
                tracing::info!("restart triggered");
            }
            Err(e) => tracing::warn!(error = %e, "failed to trigger restart"),
        }
    }
}

/// Quit and reopen the app named by `$1`
#[cfg(target_os = "macos")]
const MACOS_RESTART_SCRIPT: &str = "osascript -e 'on run argv' -e 'quit app (item 1 of argv)' -e 'end run' \"$1\"
sleep 1
open -a \"$1\"";

#[cfg(target_os = "macos")]
fn restart_script() -> Option<&'static str> {
    Some(MACOS_RESTART_SCRIPT)
}

#[cfg(not(target_os = "macos"))]
fn restart_script() -> Option<&'static str> {
    None
}

/// Pick the restarter for this platform
#[must_use]
pub fn platform_restarter(app_name: &str) -> Box<dyn Restarter> {
    match CommandRestarter::for_app(app_name) {
        Some(restarter) => Box::new(restarter),
        None => {
            tracing::debug!("no restart recipe for this platform");
            Box::new(NoopRestarter)
        }
    }
}
