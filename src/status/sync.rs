use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{SyncConfig, TargetRef};
use crate::platform::{ActivityKind, Platform};
use crate::server::SnapshotSource;
use crate::types::{PlatformError, SyncFailure};

use super::embed::RenderedPayload;
use super::presence::presence_text;

/// Outcome for one configured message during a tick.
#[derive(Debug)]
pub struct TargetReport {
    pub target: TargetRef,
    pub result: Result<(), SyncFailure>,
}

#[derive(Debug)]
pub enum PresenceOutcome {
    Updated(String),
    Disabled,
    /// The tick ended before presence could be computed.
    NotAttempted,
    Failed(SyncFailure),
}

/// Everything that happened during a single tick. Only used for reporting.
#[derive(Debug)]
pub struct TickReport {
    pub snapshot_error: Option<SyncFailure>,
    pub targets: Vec<TargetReport>,
    pub presence: PresenceOutcome,
}

impl TickReport {
    fn skipped(failure: SyncFailure) -> Self {
        Self {
            snapshot_error: Some(failure),
            targets: Vec::new(),
            presence: PresenceOutcome::NotAttempted,
        }
    }

    pub fn updated_targets(&self) -> usize {
        self.targets.iter().filter(|report| report.result.is_ok()).count()
    }

    pub fn failed_targets(&self) -> usize {
        self.targets.len() - self.updated_targets()
    }

    pub fn is_clean(&self) -> bool {
        self.snapshot_error.is_none()
            && self.failed_targets() == 0
            && !matches!(self.presence, PresenceOutcome::Failed(_))
    }
}

/// One reconciliation pass: snapshot in, messages and presence out.
pub struct Reconciler {
    config: SyncConfig,
    footer: String,
    platform: Arc<dyn Platform>,
    source: Arc<dyn SnapshotSource>,
}

impl Reconciler {
    pub fn new(
        config: SyncConfig,
        footer: impl Into<String>,
        platform: Arc<dyn Platform>,
        source: Arc<dyn SnapshotSource>,
    ) -> Self {
        Self {
            config,
            footer: footer.into(),
            platform,
            source,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Runs a full tick. Never fails; problems are logged and returned in the report.
    pub async fn tick(&self) -> TickReport {
        let snapshot = match self.source.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = ?err, "Skipping status update, server snapshot unavailable");
                return TickReport::skipped(SyncFailure::SnapshotUnavailable(err));
            }
        };

        let payload = RenderedPayload::render(&snapshot, &self.footer);
        let targets = sync_targets(self.platform.as_ref(), &self.config.targets, &payload).await;

        let presence = if self.config.disable_status {
            PresenceOutcome::Disabled
        } else {
            update_presence(self.platform.as_ref(), presence_text(&snapshot)).await
        };

        let report = TickReport {
            snapshot_error: None,
            targets,
            presence,
        };
        debug!(
            updated = report.updated_targets(),
            failed = report.failed_targets(),
            "Status tick finished"
        );
        report
    }
}

/// Pushes the payload to every target. A failing target never stops the others.
pub async fn sync_targets(
    platform: &dyn Platform,
    targets: &[TargetRef],
    payload: &RenderedPayload,
) -> Vec<TargetReport> {
    let mut reports = Vec::with_capacity(targets.len());

    for target in targets {
        let result = sync_target(platform, target, payload).await;
        match &result {
            Ok(()) => debug!(
                channel = %target.channel_id,
                message = %target.message_id,
                "Updated status message"
            ),
            Err(err) => warn!(
                channel = %target.channel_id,
                message = %target.message_id,
                error = %err,
                "Failed to update status message"
            ),
        }
        reports.push(TargetReport {
            target: target.clone(),
            result,
        });
    }

    reports
}

/// Resolves the existing message and edits it in place.
pub async fn sync_target(
    platform: &dyn Platform,
    target: &TargetRef,
    payload: &RenderedPayload,
) -> Result<(), SyncFailure> {
    let resolution = |source: PlatformError| SyncFailure::TargetResolution {
        target: target.clone(),
        source,
    };

    let channel = platform
        .fetch_channel(&target.channel_id)
        .await
        .map_err(resolution)?;
    let message = platform
        .fetch_message(&channel, &target.message_id)
        .await
        .map_err(resolution)?;

    platform
        .edit_message(&message, payload)
        .await
        .map_err(|source| SyncFailure::TargetUpdate {
            target: target.clone(),
            source,
        })
}

pub async fn update_presence(platform: &dyn Platform, text: String) -> PresenceOutcome {
    match platform.set_presence(&text, ActivityKind::Watching).await {
        Ok(()) => PresenceOutcome::Updated(text),
        Err(err) => {
            let failure = SyncFailure::PresenceUpdate(err);
            warn!(error = %failure, "Failed to update presence");
            PresenceOutcome::Failed(failure)
        }
    }
}
