//! Wires settings into a running application.

use std::sync::Arc;

use seedsweep_config::Settings;
use seedsweep_core::{SweepOptions, SweepService};
use seedsweep_events::{EventBus, LogNotifier, Notifier, WebhookNotifier};
use seedsweep_qbit::QbitClient;
use seedsweep_telemetry::{LogFormat, LoggingConfig, init_logging};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::scheduler::{self, SweepSchedule};

/// Install the tracing subscriber per the logging settings.
pub(crate) fn init_telemetry(settings: &Settings) -> AppResult<()> {
    init_logging(&LoggingConfig {
        level: &settings.logging.level,
        format: LogFormat::from_label(&settings.logging.format),
    })?;
    Ok(())
}

/// Build the sweep service from validated settings.
pub(crate) fn build_service(settings: &Settings) -> AppResult<SweepService> {
    let client = Arc::new(QbitClient::new(
        &settings.client.base_url,
        &settings.client.username,
        &settings.client.password,
    )?);

    let notifier: Arc<dyn Notifier> = match &settings.notifier.webhook_url {
        Some(raw) => {
            let endpoint = raw.parse().map_err(|_| AppError::WebhookUrl {
                value: raw.clone(),
            })?;
            let webhook = WebhookNotifier::new(endpoint).ok_or_else(|| AppError::WebhookUrl {
                value: raw.clone(),
            })?;
            Arc::new(webhook)
        }
        None => Arc::new(LogNotifier),
    };

    let options = SweepOptions {
        notify: settings.job.notify,
        delete_invalid_torrents: settings.job.delete_invalid_torrents,
        detect_invalid_files: settings.job.detect_invalid_files,
        delete_invalid_files: settings.job.delete_invalid_files,
        mappings: settings.mappings()?,
        exclude_keywords: settings.directories.exclude_keywords.clone(),
    };

    Ok(SweepService::new(
        Arc::clone(&client) as Arc<dyn seedsweep_qbit::TorrentSource>,
        client,
        notifier,
        EventBus::new(),
        options,
    ))
}

/// How a given invocation should execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunMode {
    /// Execute one sweep immediately, then exit.
    Once,
    /// Run the cron loop.
    Scheduled,
    /// Do nothing.
    Disabled,
}

/// One-shot triggers fire whether or not the job is enabled; the enabled
/// flag only gates the recurring schedule.
const fn run_mode(settings: &Settings, once: bool) -> RunMode {
    if once || settings.job.run_once {
        RunMode::Once
    } else if settings.job.enabled {
        RunMode::Scheduled
    } else {
        RunMode::Disabled
    }
}

/// Run the application: a single sweep with `run_once`, the cron loop
/// otherwise.
pub(crate) async fn run_app(settings: &Settings, once: bool) -> AppResult<()> {
    match run_mode(settings, once) {
        RunMode::Disabled => {
            info!("job disabled, nothing to do");
            Ok(())
        }
        RunMode::Once => {
            // Run-once ignores scheduling entirely; a failed sweep has
            // already been logged and notified.
            let service = build_service(settings)?;
            let _ = service.run_sweep().await;
            Ok(())
        }
        RunMode::Scheduled => {
            let service = build_service(settings)?;
            let schedule = SweepSchedule::parse(&settings.job.cron)?;
            scheduler::run_scheduled(&schedule, &service).await;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with(webhook: Option<&str>) -> Settings {
        let mut settings = Settings::default();
        settings.notifier.webhook_url = webhook.map(ToString::to_string);
        settings
    }

    #[test]
    fn builds_service_with_log_notifier() -> anyhow::Result<()> {
        build_service(&settings_with(None))?;
        Ok(())
    }

    #[test]
    fn builds_service_with_webhook_notifier() -> anyhow::Result<()> {
        build_service(&settings_with(Some("http://hooks.lan/sweep")))?;
        Ok(())
    }

    #[test]
    fn rejects_bad_webhook_url() {
        let err = build_service(&settings_with(Some("not a url"))).expect_err("must fail");
        assert!(matches!(err, AppError::WebhookUrl { .. }));
    }

    #[test]
    fn run_once_fires_even_when_the_job_is_disabled() {
        let mut settings = Settings::default();
        settings.job.enabled = false;
        settings.job.run_once = true;
        assert_eq!(run_mode(&settings, false), RunMode::Once);
    }

    #[test]
    fn cli_once_overrides_a_disabled_job() {
        let settings = Settings::default();
        assert_eq!(run_mode(&settings, true), RunMode::Once);
        assert_eq!(run_mode(&settings, false), RunMode::Disabled);
    }

    #[test]
    fn enabled_job_without_one_shot_schedules() {
        let mut settings = Settings::default();
        settings.job.enabled = true;
        assert_eq!(run_mode(&settings, false), RunMode::Scheduled);
    }
}
