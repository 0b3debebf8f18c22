use crate::model::{
    PredictEvent, PredictionReport, RequestPhase, SelectedPhoto, ERROR_MESSAGE,
};
use crate::preview::PhotoPreview;
use std::path::PathBuf;
use std::time::Instant;

/// All view state. Owned by the UI thread; mutated only by key handling
/// and `apply_event`.
pub struct UiState {
    pub tab: usize,
    pub phase: RequestPhase,
    pub info: String,
    pub service_url: String,

    pub photo: Option<SelectedPhoto>,
    pub preview: Option<PhotoPreview>,

    /// Most recently applied completion. Failures never touch it, so the
    /// previous result stays on screen under the alert.
    pub last_report: Option<PredictionReport>,
    pub error: Option<String>,

    /// Latest issued cycle number. Completions and failures carrying an
    /// older number are stale and ignored.
    pub latest_seq: u64,

    pub analysis_scroll: u16,

    // Picker pane
    pub picker_open: bool,
    pub picker_dir: PathBuf,
    pub picker_entries: Vec<PathBuf>,
    pub picker_selected: usize,

    // Spinner frame source
    pub run_start: Instant,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            phase: RequestPhase::Idle,
            info: String::new(),
            service_url: String::new(),
            photo: None,
            preview: None,
            last_report: None,
            error: None,
            latest_seq: 0,
            analysis_scroll: 0,
            picker_open: false,
            picker_dir: PathBuf::from("."),
            picker_entries: Vec::new(),
            picker_selected: 0,
            run_start: Instant::now(),
        }
    }
}

/// Apply one orchestrator event to the view state. Pure with respect to
/// the terminal: no I/O happens here.
pub fn apply_event(state: &mut UiState, ev: PredictEvent) {
    match ev {
        PredictEvent::Started { seq, file_name } => {
            state.latest_seq = seq;
            state.phase = RequestPhase::Loading;
            state.error = None;
            state.info = format!("Analyzing {}", file_name);
        }
        PredictEvent::Completed { seq, report } => {
            if seq != state.latest_seq {
                tracing::debug!("discarding stale completion for cycle {}", seq);
                return;
            }
            state.phase = RequestPhase::Success;
            state.error = None;
            state.info = format!("Done in {} ms", report.elapsed_ms);
            state.analysis_scroll = 0;
            state.last_report = Some(*report);
        }
        PredictEvent::Failed { seq } => {
            if seq != state.latest_seq {
                tracing::debug!("discarding stale failure for cycle {}", seq);
                return;
            }
            state.phase = RequestPhase::Failed;
            state.error = Some(ERROR_MESSAGE.to_string());
            state.info = "Request failed".into();
        }
    }
}
