//! UploadController: owns the page and drives one submission end to end.
//!
//! A submission runs in three phases:
//! 1. **Prepare**: snapshot the upload form, refuse if no file is selected or
//!    another upload is still in flight, show the progress bar.
//! 2. **Exchange**: POST the payload through the [`UploadTransport`]. This is
//!    the only suspension point. Transport and decode failures are logged and
//!    leave the page as it was, apart from the progress bar.
//! 3. **Render**: complete the progress bar, clear the previous results,
//!    validate the reply and render it, then schedule the panel switches.
//!
//! Panel switches run on their own tasks after a fixed delay. Each submission
//! bumps a generation counter and a switch only fires if no newer submission
//! has started in the meantime.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::error::{Result, UploadError};
use crate::page::{Display, Page, ids};
use crate::panel::Panel;
use crate::render::{RenderReport, clear_results, render_response};
use crate::request::UploadRequest;
use crate::response::UploadResponse;
use crate::transport::{HttpTransport, UploadTransport};

pub const MISSING_FILE_ALERT: &str = "Please select a file to upload.";

/// A panel switch waiting for its delay to elapse
#[derive(Debug)]
pub struct ScheduledSwitch {
    pub panel: Panel,
    pub delay: Duration,
    handle: JoinHandle<bool>,
}

impl ScheduledSwitch {
    /// Wait for the switch; `true` if it was applied, `false` if it went stale.
    pub async fn wait(self) -> bool {
        match self.handle.await {
            Ok(applied) => applied,
            Err(e) => {
                warn!("Panel switch to {} did not complete: {}", self.panel, e);
                false
            }
        }
    }
}

/// Result of a successful submission
#[derive(Debug)]
pub struct UploadOutcome {
    pub request_id: Uuid,
    pub response: UploadResponse,
    pub report: RenderReport,
    pub switches: Vec<ScheduledSwitch>,
}

impl UploadOutcome {
    /// Wait for every scheduled switch and return the panels that were shown.
    pub async fn settle(self) -> Vec<Panel> {
        let mut shown = Vec::new();
        for switch in self.switches {
            let panel = switch.panel;
            if switch.wait().await {
                shown.push(panel);
            }
        }
        shown
    }
}

/// Releases the in-flight flag when the submission ends, however it ends.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct UploadController {
    page: Arc<Mutex<Page>>,
    transport: Arc<dyn UploadTransport>,
    config: UploadConfig,
    in_flight: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl UploadController {
    pub fn new(page: Page, transport: Arc<dyn UploadTransport>, config: UploadConfig) -> Self {
        Self {
            page: Arc::new(Mutex::new(page)),
            transport,
            config,
            in_flight: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Controller over the standard page, posting to `config.endpoint`.
    pub fn http(config: UploadConfig) -> Self {
        let transport = Arc::new(HttpTransport::new(config.endpoint.clone()));
        Self::new(Page::standard(), transport, config)
    }

    /// Shared handle to the page tree.
    pub fn page(&self) -> Arc<Mutex<Page>> {
        Arc::clone(&self.page)
    }

    pub async fn snapshot(&self) -> Page {
        self.page.lock().await.clone()
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Check the page against the element contract. Returns `false` when the
    /// upload button is missing and uploads cannot be triggered from the page.
    pub async fn attach(&self) -> bool {
        let page = self.page.lock().await;
        let missing = page.check_contract();
        for id in &missing {
            error!("Required element not found: {}", id);
        }

        if missing.contains(&ids::UPLOAD_BUTTON) {
            error!("Upload button not found, uploads must be triggered directly");
            return false;
        }

        info!("Upload controller attached ({} elements)", page.elements().count());
        true
    }

    pub async fn show_tab(&self, tab_id: &str) -> bool {
        self.page.lock().await.show_tab(tab_id)
    }

    pub async fn upload_file(&self) -> Result<UploadOutcome> {
        info!("Upload button clicked");

        // The generation moves under the page lock so a pending switch either
        // lands before this submission starts or sees it.
        let (request, _guard, generation) = {
            let mut page = self.page.lock().await;
            let Some(request) = page.form_data() else {
                warn!("Upload aborted: no file selected");
                page.alert(MISSING_FILE_ALERT);
                return Err(UploadError::MissingInput);
            };

            let Some(guard) = InFlightGuard::acquire(&self.in_flight) else {
                warn!("Upload ignored: another upload is still in flight");
                return Err(UploadError::InFlight);
            };

            let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            (request, guard, generation)
        };

        let request_id = Uuid::new_v4();
        let span = info_span!("upload", request_id = %request_id, generation);

        self.run_upload(request, request_id, generation)
            .instrument(span)
            .await
    }

    async fn run_upload(
        &self,
        request: UploadRequest,
        request_id: Uuid,
        generation: u64,
    ) -> Result<UploadOutcome> {
        {
            let mut page = self.page.lock().await;
            page.set_display(ids::PROGRESS_CONTAINER, Display::Block);
            page.set_progress(0);
        }

        let body = self.transport.submit(request).await.map_err(|e| {
            error!("Upload failed: {}", e);
            e
        })?;
        info!("Response received");

        let (response, report) = {
            let mut page = self.page.lock().await;
            page.set_progress(100);
            clear_results(&mut page);

            let response = UploadResponse::from_json(&body, self.config.schema).map_err(|e| {
                error!("Rendering aborted: {}", e);
                e
            })?;
            let report = render_response(&mut page, &response, &self.config.static_figures_path);
            (response, report)
        };

        let mut switches = vec![self.schedule_switch(
            Panel::Summary,
            self.config.summary_delay,
            generation,
        )];
        if report.figures > 0 {
            switches.push(self.schedule_switch(
                Panel::Figures,
                self.config.figures_delay,
                generation,
            ));
        }

        Ok(UploadOutcome {
            request_id,
            response,
            report,
            switches,
        })
    }

    fn schedule_switch(&self, panel: Panel, delay: Duration, generation: u64) -> ScheduledSwitch {
        let page = Arc::clone(&self.page);
        let current = Arc::clone(&self.generation);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut page = page.lock().await;
            if current.load(Ordering::Acquire) != generation {
                debug!("Dropping stale switch to {}", panel);
                return false;
            }
            page.show_panel(panel);
            true
        });

        ScheduledSwitch {
            panel,
            delay,
            handle,
        }
    }
}
