//! aescrypt-recover - brute-force password recovery for AES Crypt files
//!
//! Generates candidates from a password policy and tests them against the
//! document's header authenticator until one opens it.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use aescrypt_recover::document::validate_and_open;
use aescrypt_recover::{
    estimate_count, validate, CancelToken, GenerationBudget, GenerationObserver,
    GenerationOutcome, GenerationTask, MemoryCeiling, MemoryGovernor, PasswordPolicy,
    PolicyBuilder, SearchController, SearchObserver, SearchResult,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, trace};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// aescrypt-recover - brute-force password recovery for AES Crypt files
#[derive(Parser, Debug)]
#[command(name = "aescrypt-recover")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that a file is a password-protected AES Crypt document
    Check {
        /// Path to the .aes file
        file: PathBuf,
    },

    /// Print how many candidates a policy would generate
    Estimate {
        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Search for the password of an AES Crypt document
    Recover {
        /// Path to the .aes file
        file: PathBuf,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Memory ceiling in MB (default: half of system memory, 1000–16000)
        #[arg(long)]
        memory_ceiling_mb: Option<u64>,

        /// Skip the first N candidates, e.g. after a cancelled run
        #[arg(long, default_value_t = 0)]
        resume_from: usize,
    },
}

#[derive(Args, Debug)]
struct PolicyArgs {
    /// Shortest password length to try (1–10)
    #[arg(long, default_value_t = 4)]
    min_length: usize,

    /// Longest password length to try (1–12)
    #[arg(long, default_value_t = 6)]
    max_length: usize,

    /// Include a–z (if no class is given: lowercase and digits)
    #[arg(long)]
    lowercase: bool,

    /// Include A–Z
    #[arg(long)]
    uppercase: bool,

    /// Include 0–9
    #[arg(long)]
    digits: bool,

    /// Include !@#$%^&*
    #[arg(long)]
    special: bool,

    /// Lift the 1 000 000 candidate cap
    #[arg(long)]
    unlimited: bool,

    /// Confirm that an unlimited run may exhaust memory
    #[arg(long)]
    accept_memory_risk: bool,
}

impl PolicyArgs {
    fn to_policy(&self) -> Result<PasswordPolicy> {
        let mut builder = PolicyBuilder::new().with_lengths(self.min_length, self.max_length);
        if self.lowercase || self.uppercase || self.digits || self.special {
            builder = builder
                .with_lowercase(self.lowercase)
                .with_uppercase(self.uppercase)
                .with_digits(self.digits)
                .with_special(self.special);
        }
        builder = builder.unlimited(self.unlimited);
        if self.accept_memory_risk {
            builder = builder.acknowledge_unlimited();
        }
        builder.build().context("invalid password policy")
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Check { file } => {
            let verdict = validate(&file);
            println!("{}: {}", file.display(), verdict.reason);
            Ok(exit_status(verdict.valid))
        }
        Commands::Estimate { policy } => {
            let policy = policy.to_policy()?;
            println!("{}", estimate_count(&policy));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Recover {
            file,
            policy,
            memory_ceiling_mb,
            resume_from,
        } => recover(&file, &policy, memory_ceiling_mb, resume_from),
    }
}

fn exit_status(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn recover(
    file: &Path,
    policy: &PolicyArgs,
    memory_ceiling_mb: Option<u64>,
    resume_from: usize,
) -> Result<ExitCode> {
    let policy = policy.to_policy()?;
    let ceiling = match memory_ceiling_mb {
        Some(mb) => MemoryCeiling::new(mb).context("invalid --memory-ceiling-mb")?,
        None => MemoryCeiling::detect(),
    };

    let (verdict, document) = validate_and_open(file);
    let Some(document) = document else {
        eprintln!("{}: {}", file.display(), verdict.reason);
        return Ok(ExitCode::FAILURE);
    };
    info!(file = %file.display(), %ceiling, "{}", verdict.reason);

    let running: ActivePhase = ActivePhase::default();
    watch_interrupts(running.clone())?;

    let generation = GenerationTask::spawn(
        policy.clone(),
        GenerationBudget::for_policy(&policy),
        GenerationLog,
        MemoryGovernor::for_process(ceiling),
    )
    .context("failed to start candidate generation")?;
    running.set(Running::Generating(generation.cancel_token()));
    let batch = generation.join()?;

    match batch.outcome() {
        GenerationOutcome::Cancelled(reason) => {
            eprintln!(
                "candidate generation stopped after {} candidates: {reason}",
                batch.emitted_count()
            );
            return Ok(ExitCode::FAILURE);
        }
        GenerationOutcome::BudgetReached => eprintln!(
            "candidate list capped at {}; raise the lengths or pass --unlimited to go further",
            batch.emitted_count()
        ),
        GenerationOutcome::Complete => {}
    }
    eprintln!("testing {} candidates", batch.len());

    let search = Arc::new(SearchController::resuming_at(resume_from));
    running.set(Running::Searching(search.clone()));
    search
        .start(
            batch.into_candidates(),
            document,
            SearchLog::default(),
            MemoryGovernor::for_process(ceiling),
        )
        .context("failed to start search")?;

    match search.wait()? {
        SearchResult::Found(password) => {
            println!("{password}");
            Ok(ExitCode::SUCCESS)
        }
        SearchResult::Cancelled(reason) => {
            eprintln!("{reason}");
            eprintln!("resume with --resume-from {}", search.cursor());
            Ok(ExitCode::FAILURE)
        }
        other => {
            eprintln!("{other}");
            Ok(ExitCode::FAILURE)
        }
    }
}

struct GenerationLog;

impl GenerationObserver for GenerationLog {
    fn on_progress(&mut self, emitted: u64, estimate: u128) {
        info!(emitted, estimate, "generating candidates");
    }

    fn on_pattern(&mut self, label: &str) {
        info!(pattern = label, "generating");
    }
}

/// Reports each new percentage on stderr.
#[derive(Default)]
struct SearchLog {
    last_percent: Option<u8>,
}

impl SearchObserver for SearchLog {
    fn on_progress(&mut self, percent: u8) {
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            eprintln!("searched {percent}%");
        }
    }

    fn on_testing(&mut self, candidate: &str) {
        trace!(candidate, "testing");
    }
}

/// The phase a Ctrl-C should stop.
enum Running {
    Generating(CancelToken),
    Searching(Arc<SearchController>),
}

impl Running {
    fn stop(&self) {
        match self {
            Running::Generating(token) => token.cancel(),
            Running::Searching(search) => search.cancel(),
        }
    }
}

#[derive(Clone, Default)]
struct ActivePhase(Arc<Mutex<Option<Running>>>);

impl ActivePhase {
    fn set(&self, running: Running) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(running);
    }

    /// Returns `false` when nothing is running yet.
    fn stop(&self) -> bool {
        match self.0.lock().unwrap_or_else(PoisonError::into_inner).as_ref() {
            Some(running) => {
                running.stop();
                true
            }
            None => false,
        }
    }
}

/// First Ctrl-C stops the active phase at its next checkpoint; a second one exits.
fn watch_interrupts(active: ActivePhase) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build signal runtime")?;

    thread::Builder::new()
        .name("interrupt".into())
        .spawn(move || {
            runtime.block_on(async {
                let mut stopping = false;
                while tokio::signal::ctrl_c().await.is_ok() {
                    if stopping || !active.stop() {
                        std::process::exit(130);
                    }
                    stopping = true;
                    eprintln!(
                        "interrupted; stopping at the next checkpoint (Ctrl-C again to quit)"
                    );
                }
            });
        })
        .context("failed to start interrupt watcher")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aescrypt_recover::{CancelReason, DocumentDecryptor, RecoveryError};

    struct NeverOpens;

    impl DocumentDecryptor for NeverOpens {
        fn is_encrypted(&self) -> bool {
            true
        }

        fn try_password(&self, _candidate: &str) -> Result<bool, RecoveryError> {
            Ok(false)
        }
    }

    #[test]
    fn stop_before_any_phase_reports_idle() {
        assert!(!ActivePhase::default().stop());
    }

    #[test]
    fn stop_cancels_generation_token() {
        let active = ActivePhase::default();
        let token = CancelToken::new();
        active.set(Running::Generating(token.clone()));

        assert!(active.stop());
        assert_eq!(token.reason(), Some(CancelReason::Requested));
    }

    #[test]
    fn stop_cancels_search_and_keeps_cursor() {
        let active = ActivePhase::default();
        let search = Arc::new(SearchController::resuming_at(200));
        active.set(Running::Searching(search.clone()));
        assert!(active.stop());

        let candidates: Vec<String> = (0..500).map(|i| format!("p{i}")).collect();
        search
            .start(
                candidates,
                NeverOpens,
                (),
                MemoryGovernor::for_process(MemoryCeiling::default()),
            )
            .unwrap();
        assert_eq!(
            search.wait().unwrap(),
            SearchResult::Cancelled(CancelReason::Requested)
        );
        assert_eq!(search.cursor(), 200);
    }

    #[test]
    fn search_log_reports_each_percent_once() {
        let mut log = SearchLog::default();
        log.on_progress(40);
        log.on_progress(40);
        assert_eq!(log.last_percent, Some(40));
        log.on_progress(80);
        assert_eq!(log.last_percent, Some(80));
    }
}
