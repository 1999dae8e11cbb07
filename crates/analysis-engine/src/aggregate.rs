//! Run orchestration: archive traversal, bounded-parallel classification,
//! completeness, verification, and report assembly.
//!
//! Entries are classified independently on a fixed pool of worker threads fed
//! through a bounded channel, so at most `worker_threads + 1` decompressed
//! entries are in memory at once. The join point waits for every
//! classification before the completeness and verification passes run, and
//! the finished `AnalysisReport` is returned as a single value; callers never
//! observe an in-progress report.

use std::collections::HashSet;
use std::io::{Read, Seek};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, unbounded};
use tracing::{debug, info, warn};

use archive_reader::{EntryError, EntryMeta, ZipReader};
use pdf_inspect::InspectConfig;
use shared_types::{
    AnalysisReport, AnalysisWarning, ChecklistSpec, DocumentKind, DocumentRecord, PairSpec,
    Summary, WarningKind,
};

use crate::classify::{self, AmountRules};
use crate::completeness::check_missing;
use crate::error::AnalysisError;
use crate::verify::verify;

/// Tuning knobs for one analyzer instance.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Bounded classification parallelism.
    pub worker_threads: usize,
    /// Per-entry decompressed size cap; larger entries degrade with a warning.
    pub max_entry_bytes: u64,
    pub inspect: InspectConfig,
    pub totals: AmountRules,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        let workers = thread::available_parallelism()
            .map(|n| n.get().min(8))
            .unwrap_or(4);
        Self {
            worker_threads: workers,
            max_entry_bytes: 256 * 1024 * 1024,
            inspect: InspectConfig::default(),
            totals: AmountRules::default(),
        }
    }
}

/// Cooperative cancellation handle shared between the caller and a run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Classification progress, emitted once per finished entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: u32,
    pub total: u32,
}

type ProgressObserver = Arc<dyn Fn(Progress) + Send + Sync>;

/// Work unit handed to the classification pool.
enum Job {
    Classify {
        index: usize,
        filename: String,
        bytes: Vec<u8>,
    },
    /// Entry could not be extracted; record + warning were decided upstream.
    Degraded {
        index: usize,
        filename: String,
        warning: AnalysisWarning,
    },
    /// Entry skipped entirely (encrypted, unknown compression).
    Skipped { warning: AnalysisWarning },
}

struct Outcome {
    index: usize,
    record: Option<DocumentRecord>,
    warnings: Vec<AnalysisWarning>,
}

/// The only component the presentation layer touches: owns configuration and
/// produces immutable reports.
pub struct Analyzer {
    checklist: ChecklistSpec,
    pairs: Vec<PairSpec>,
    config: AnalyzerConfig,
    cancel: CancelToken,
    observer: Option<ProgressObserver>,
}

impl Analyzer {
    pub fn new(checklist: ChecklistSpec, pairs: Vec<PairSpec>) -> Self {
        Self {
            checklist,
            pairs,
            config: AnalyzerConfig::default(),
            cancel: CancelToken::new(),
            observer: None,
        }
    }

    /// Analyzer for the standard filing layout.
    pub fn standard_filing() -> Self {
        Self::new(ChecklistSpec::standard_filing(), PairSpec::standard_filing())
    }

    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    /// Install a caller-held token; triggering it stops new classification
    /// tasks and fails the run with [`AnalysisError::Cancelled`] after
    /// in-flight tasks drain.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Observe classification completion counts as tasks finish.
    pub fn on_progress(mut self, observer: impl Fn(Progress) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Run the full pipeline over a ZIP container.
    ///
    /// Container-level corruption is fatal; everything scoped to a single
    /// entry degrades that entry and is collected on the report.
    pub fn analyze<R: Read + Seek + Send>(&self, reader: R) -> Result<AnalysisReport, AnalysisError> {
        let mut archive = ZipReader::open(reader)?;

        // Metadata pass: decide which entries are classification tasks.
        let mut tasks: Vec<(usize, EntryMeta)> = Vec::new();
        for index in 0..archive.len() {
            let meta = archive.entry_meta(index)?;
            if meta.is_pdf() {
                tasks.push((index, meta));
            } else if !meta.is_dir {
                debug!(entry = %meta.path, "ignoring non-PDF entry");
            }
        }
        let total = tasks.len() as u32;
        info!(entries = total, "starting analysis run");

        let enrolled: HashSet<DocumentKind> = self
            .pairs
            .iter()
            .flat_map(|p| [p.left.kind, p.right.kind])
            .collect();

        let outcomes = self.run_classification(&mut archive, tasks, &enrolled, total);

        if self.cancel.is_cancelled() {
            // Partially classified records are discarded, never returned.
            return Err(AnalysisError::Cancelled);
        }

        Ok(self.assemble(outcomes))
    }

    /// Fan entries out to the worker pool and gather every outcome.
    fn run_classification<R: Read + Seek + Send>(
        &self,
        archive: &mut ZipReader<R>,
        tasks: Vec<(usize, EntryMeta)>,
        enrolled: &HashSet<DocumentKind>,
        total: u32,
    ) -> Vec<Outcome> {
        let workers = self.config.worker_threads.max(1);
        let mut outcomes = Vec::with_capacity(tasks.len());

        thread::scope(|scope| {
            let (job_tx, job_rx) = bounded::<Job>(workers);
            let (res_tx, res_rx) = unbounded::<Outcome>();

            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let res_tx = res_tx.clone();
                let config = &self.config;
                scope.spawn(move || {
                    for job in job_rx {
                        let outcome = match job {
                            Job::Classify {
                                index,
                                filename,
                                bytes,
                            } => {
                                let (record, warnings) = classify::classify_entry(
                                    &filename,
                                    &bytes,
                                    enrolled,
                                    &config.inspect,
                                    &config.totals,
                                );
                                Outcome {
                                    index,
                                    record: Some(record),
                                    warnings,
                                }
                            }
                            Job::Degraded {
                                index,
                                filename,
                                warning,
                            } => Outcome {
                                index,
                                record: Some(DocumentRecord::degraded(filename)),
                                warnings: vec![warning],
                            },
                            Job::Skipped { warning } => Outcome {
                                index: usize::MAX,
                                record: None,
                                warnings: vec![warning],
                            },
                        };
                        if res_tx.send(outcome).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(job_rx);
            drop(res_tx);

            // Producer: stream entries out of the single archive handle. The
            // bounded job channel is the memory backstop.
            let cancel = self.cancel.clone();
            let max_bytes = self.config.max_entry_bytes;
            scope.spawn(move || {
                for (index, meta) in tasks {
                    if cancel.is_cancelled() {
                        debug!("cancellation observed, no further entries issued");
                        break;
                    }
                    let job = extract_job(archive, index, &meta, max_bytes);
                    if job_tx.send(job).is_err() {
                        break;
                    }
                }
            });

            let mut completed = 0u32;
            for outcome in res_rx {
                completed += 1;
                if let Some(observer) = &self.observer {
                    observer(Progress { completed, total });
                }
                outcomes.push(outcome);
            }
        });

        outcomes
    }

    /// Join point: deterministic ordering, then the pure passes.
    fn assemble(&self, outcomes: Vec<Outcome>) -> AnalysisReport {
        let mut records = Vec::new();
        let mut warnings = Vec::new();
        let mut indexed: Vec<(usize, DocumentRecord)> = Vec::new();

        for outcome in outcomes {
            warnings.extend(outcome.warnings);
            if let Some(record) = outcome.record {
                indexed.push((outcome.index, record));
            }
        }

        // Sort by filename (archive index as tie-break) so identical archives
        // produce identical reports regardless of worker scheduling.
        indexed.sort_by(|(ai, a), (bi, b)| a.filename.cmp(&b.filename).then(ai.cmp(bi)));
        records.extend(indexed.into_iter().map(|(_, record)| record));
        warnings.sort_by(|a, b| (&a.entry, a.kind).cmp(&(&b.entry, b.kind)));

        for warning in &warnings {
            warn!(entry = %warning.entry, kind = ?warning.kind, detail = %warning.detail, "degraded entry");
        }

        let missing = check_missing(&records, &self.checklist);
        let verifications = verify(&records, &self.pairs);
        let summary = Summary::from_records(&records, &missing);
        info!(
            documents = records.len(),
            missing = missing.len(),
            warnings = warnings.len(),
            "analysis run complete"
        );

        AnalysisReport {
            total_documents: records.len() as u32,
            records,
            missing,
            verifications,
            warnings,
            summary,
        }
    }
}

/// Pull one entry's bytes, mapping extraction problems to degraded jobs.
fn extract_job<R: Read + Seek>(
    archive: &mut ZipReader<R>,
    index: usize,
    meta: &EntryMeta,
    max_bytes: u64,
) -> Job {
    let filename = meta.filename().to_string();

    let mut entry = match archive.entry(index) {
        Ok(entry) => entry,
        Err(EntryError::Unsupported { path, reason }) => {
            return Job::Skipped {
                warning: AnalysisWarning {
                    entry: path,
                    kind: WarningKind::UnsupportedEntry,
                    detail: reason,
                },
            }
        }
        Err(EntryError::Unreadable { path, reason }) => {
            return Job::Degraded {
                index,
                filename,
                warning: AnalysisWarning {
                    entry: path,
                    kind: WarningKind::ClassificationFailure,
                    detail: reason,
                },
            }
        }
    };

    let mut bytes = Vec::new();
    match entry.by_ref().take(max_bytes + 1).read_to_end(&mut bytes) {
        Ok(_) if bytes.len() as u64 > max_bytes => Job::Degraded {
            index,
            filename,
            warning: AnalysisWarning {
                entry: meta.path.clone(),
                kind: WarningKind::ClassificationFailure,
                detail: format!("entry exceeds size cap of {} bytes", max_bytes),
            },
        },
        Ok(_) => Job::Classify {
            index,
            filename,
            bytes,
        },
        Err(e) => Job::Degraded {
            index,
            filename,
            warning: AnalysisWarning {
                entry: meta.path.clone(),
                kind: WarningKind::ClassificationFailure,
                detail: e.to_string(),
            },
        },
    }
}
