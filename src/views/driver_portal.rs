//! Driver portal: the signed-in driver's task list and availability toggle

use std::sync::{Arc, RwLock};
use tracing::debug;
use crate::models::{BusyStatus, BusyStatusUpdate, Transfer, TransferStatus, TransferUpdate};
use crate::sync::{Subscription, Visibility};
use crate::utils::errors::{Result, TransferError};
use crate::utils::helpers::navigation_url;
use crate::utils::logging::{log_poll_failure, log_transfer_transition};
use super::{read, write, SubmitGuard, ViewContext};

/// Reasons a driver can give for declining a task or going busy
pub const DECLINE_REASON_KEYS: [&str; 9] = [
    "driver.declineReason.onBreak",
    "driver.declineReason.refueling",
    "driver.declineReason.carRepair",
    "driver.declineReason.shiftEnded",
    "driver.declineReason.personalMatter",
    "driver.declineReason.trafficRisk",
    "driver.declineReason.gpsIssue",
    "driver.declineReason.phoneIssue",
    "driver.declineReason.documentIssue",
];

#[derive(Debug, Clone, Default)]
pub struct DriverPortalState {
    pub transfers: Vec<Transfer>,
    pub loading: bool,
    pub busy: bool,
    pub busy_reason: Option<String>,
}

impl DriverPortalState {
    /// Tasks still in play: neither completed nor declined
    pub fn active_tasks(&self) -> Vec<Transfer> {
        self.transfers
            .iter()
            .filter(|t| t.status.is_active())
            .cloned()
            .collect()
    }

    pub fn completed_tasks(&self) -> Vec<Transfer> {
        self.transfers
            .iter()
            .filter(|t| t.status == TransferStatus::Completed)
            .cloned()
            .collect()
    }
}

pub struct DriverPortalView {
    ctx: ViewContext,
    driver_id: String,
    state: Arc<RwLock<DriverPortalState>>,
    submit: SubmitGuard,
}

impl DriverPortalView {
    /// A driver's user id doubles as their driver id
    pub fn new(ctx: ViewContext, driver_id: impl Into<String>) -> Self {
        Self {
            ctx,
            driver_id: driver_id.into(),
            state: Arc::new(RwLock::new(DriverPortalState::default())),
            submit: SubmitGuard::default(),
        }
    }

    /// Poll the task list while `visibility` says the portal is on screen
    pub fn mount(&self, visibility: &Visibility) -> Subscription {
        write(&self.state).loading = true;

        let api = self.ctx.api.clone();
        let driver_id = self.driver_id.clone();
        let state = self.state.clone();
        let failed_state = self.state.clone();
        let ctx = self.ctx.clone();

        self.ctx
            .poller("driver_transfers", move || {
                let api = api.clone();
                let driver_id = driver_id.clone();
                async move { api.transfers().by_driver(&driver_id).await }
            })
            .gated_by(visibility)
            .on_initial_error(move |_| {
                write(&failed_state).loading = false;
                ctx.error("driver.fetchError");
            })
            .subscribe(move |page| {
                let mut state = write(&state);
                state.transfers = page.transfers;
                state.loading = false;
            })
    }

    pub fn state(&self) -> DriverPortalState {
        read(&self.state).clone()
    }

    pub fn active_tasks(&self) -> Vec<Transfer> {
        read(&self.state).active_tasks()
    }

    pub fn completed_tasks(&self) -> Vec<Transfer> {
        read(&self.state).completed_tasks()
    }

    pub async fn reload(&self) -> Result<()> {
        let page = self.ctx.api.transfers().by_driver(&self.driver_id).await?;
        write(&self.state).transfers = page.transfers;
        Ok(())
    }

    async fn reload_quietly(&self) {
        if let Err(e) = self.reload().await {
            log_poll_failure("driver_transfers", &e);
        }
    }

    fn transfer(&self, transfer_id: &str) -> Result<Transfer> {
        read(&self.state)
            .transfers
            .iter()
            .find(|t| t.id == transfer_id)
            .cloned()
            .ok_or_else(|| TransferError::NotFound(format!("transfer {}", transfer_id)))
    }

    /// Translated label for the button that advances a task
    pub fn action_label(&self, transfer: &Transfer) -> Option<String> {
        transfer.status.action_label_key().map(|key| self.ctx.t(key))
    }

    /// Directions to wherever the driver should be heading for this task
    pub fn navigation_link(&self, transfer: &Transfer) -> Option<String> {
        transfer.current_destination().map(navigation_url)
    }

    /// Move a task one step along pending, accepted, arrived, in-progress, completed
    pub async fn advance(&self, transfer_id: &str) -> Result<TransferStatus> {
        let _ticket = self.submit.begin()?;
        let transfer = self.transfer(transfer_id)?;
        let next = transfer.status.next().ok_or_else(|| TransferError::InvalidStateTransition {
            from: transfer.status.to_string(),
            to: "next".to_string(),
        })?;

        let update = TransferUpdate {
            status: Some(next),
            decline_reason: None,
        };
        self.send_update(&transfer, update).await?;
        Ok(next)
    }

    /// Decline a pending task with one of [`DECLINE_REASON_KEYS`]
    pub async fn decline(&self, transfer_id: &str, reason_key: &str) -> Result<()> {
        let _ticket = self.submit.begin()?;
        let transfer = self.transfer(transfer_id)?;
        if !transfer.status.can_decline() {
            return Err(TransferError::InvalidStateTransition {
                from: transfer.status.to_string(),
                to: TransferStatus::Declined.to_string(),
            });
        }

        let update = TransferUpdate {
            status: Some(TransferStatus::Declined),
            decline_reason: Some(self.ctx.t(reason_key)),
        };
        self.send_update(&transfer, update).await
    }

    async fn send_update(&self, transfer: &Transfer, update: TransferUpdate) -> Result<()> {
        let Some(next) = update.status else {
            return Ok(());
        };

        match self.ctx.api.transfers().update(&transfer.id, &update).await {
            Ok(_) => {
                log_transfer_transition(&transfer.id, transfer.status.as_str(), next.as_str());
                if let Some(local) = write(&self.state).transfers.iter_mut().find(|t| t.id == transfer.id) {
                    local.status = next;
                    if update.decline_reason.is_some() {
                        local.decline_reason = update.decline_reason.clone();
                    }
                }
                self.ctx.success("driver.statusUpdated");
                self.reload_quietly().await;
                Ok(())
            }
            Err(e) => {
                self.ctx.error("driver.statusUpdateError");
                Err(e)
            }
        }
    }

    /// Go offline with a translated reason
    pub async fn set_busy(&self, reason_key: &str) -> Result<()> {
        let _ticket = self.submit.begin()?;
        let reason = self.ctx.t(reason_key);
        let update = BusyStatusUpdate {
            status: BusyStatus::Offline,
            busy_reason: Some(reason.clone()),
        };

        match self.ctx.api.drivers().update_busy_status(&update).await {
            Ok(_) => {
                let mut state = write(&self.state);
                state.busy = true;
                state.busy_reason = Some(reason);
                drop(state);
                debug!(driver_id = %self.driver_id, "Driver set busy");
                self.ctx.success("driver.statusBusy");
                Ok(())
            }
            Err(e) => {
                self.ctx.error("driver.statusUpdateError");
                Err(e)
            }
        }
    }

    pub async fn set_free(&self) -> Result<()> {
        let _ticket = self.submit.begin()?;
        let update = BusyStatusUpdate {
            status: BusyStatus::Available,
            busy_reason: None,
        };

        match self.ctx.api.drivers().update_busy_status(&update).await {
            Ok(_) => {
                let mut state = write(&self.state);
                state.busy = false;
                state.busy_reason = None;
                drop(state);
                debug!(driver_id = %self.driver_id, "Driver set available");
                self.ctx.success("driver.statusFree");
                Ok(())
            }
            Err(e) => {
                self.ctx.error("driver.statusUpdateError");
                Err(e)
            }
        }
    }
}
