use crate::infra::{load_form, parse_step};
use crate::render::{render_issues, render_notice, render_report};
use crate::server;
use clap::{Args, Parser, Subcommand};
use reunion_ai::analysis::{BackendAnalysisClient, ErrorNotice};
use reunion_ai::config::AppConfig;
use reunion_ai::consultation::{self, ConsultationController, FormStep};
use reunion_ai::error::AppError;
use reunion_ai::report::{Countdown, ReconciliationReport, RevealState};
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(
    name = "Reunion Consultation Service",
    about = "Run the reunion analysis relay or exercise a consultation from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Show the fallback report for a consultation form without calling the backend
    Preview(FormArgs),
    /// Validate a consultation form, optionally a single step
    Validate(ValidateArgs),
    /// Submit a consultation form to the analysis backend and print the report
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct FormArgs {
    /// JSON file holding the consultation form (camelCase keys)
    #[arg(long)]
    pub(crate) form: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    #[command(flatten)]
    pub(crate) input: FormArgs,
    /// Only report errors for this step (1-4)
    #[arg(long, value_parser = parse_step)]
    pub(crate) step: Option<FormStep>,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    #[command(flatten)]
    pub(crate) input: FormArgs,
    /// Play the advertisement countdown and print the unlocked report
    #[arg(long)]
    pub(crate) watch_ad: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Preview(args) => run_preview(args),
        Command::Validate(args) => run_validate(args),
        Command::Analyze(args) => run_analyze(args).await,
    }
}

fn run_preview(args: FormArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let form = load_form(&args.form)?;
    let report = ReconciliationReport::new(form, None, config.contact);
    print!("{}", render_report(&report));
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let form = load_form(&args.input.form)?;
    let issues = consultation::validate(&form);
    let issues: Vec<_> = match args.step {
        Some(step) => issues
            .into_iter()
            .filter(|issue| issue.field.step() == step)
            .collect(),
        None => issues,
    };

    print!("{}", render_issues(&issues));
    match issues.first() {
        Some(issue) => Err(AppError::Form(issue.message.clone())),
        None => Ok(()),
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let form = load_form(&args.input.form)?;

    let mut controller = ConsultationController::with_form(form);
    while controller.current_step() != Some(FormStep::Breakup) {
        if !controller.next() {
            let message = controller.validation_error().unwrap_or_default().to_string();
            return Err(AppError::Form(message));
        }
    }

    let Some(pending) = controller.begin_submission() else {
        let message = controller.validation_error().unwrap_or_default().to_string();
        return Err(AppError::Form(message));
    };

    let client = BackendAnalysisClient::from_config(config.analysis)?;
    println!("분석 중...");
    let result = pending.run(&client).await;
    let failure = result.as_ref().err().cloned();
    controller.finish_submission(result);

    if let Some(err) = failure {
        let notice = controller
            .submit_error()
            .cloned()
            .unwrap_or_else(ErrorNotice::unknown);
        eprint!("{}", render_notice(&notice));
        return Err(err.into());
    }

    let Some(mut report) = controller.report(config.contact) else {
        return Ok(());
    };
    print!("{}", render_report(&report));

    if args.watch_ad && report.watch_ad() {
        watch_ad(&mut report).await;
        println!();
        print!("{}", render_report(&report));
    }

    Ok(())
}

async fn watch_ad(report: &mut ReconciliationReport) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = Countdown::default().start(
        move |remaining| {
            let _ = tx.send(remaining);
        },
        || {},
    );

    while rx.recv().await.is_some() {
        match report.tick() {
            RevealState::AdPlaying { remaining } => println!("광고 시청 중... ({remaining}초)"),
            RevealState::Unlocked => println!("광고 시청 완료"),
            RevealState::Locked => {}
        }
    }

    handle.wait().await;
}
