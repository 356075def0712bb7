mod app;
mod cli;
mod config;
mod describe;
mod input;
mod k8s;
mod model;
mod paint;
mod sort;
mod status;
mod ui;

use anyhow::{Context, Result};
use app::{Column, Picker};
use chrono::{DateTime, Local, Utc};
use clap::Parser;
use cli::{CliArgs, Target};
use config::KandieConfig;
use crossterm::event::EventStream;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use describe::{Describer, TemplateFunctions};
use k8s::{ConnectOptions, KubeGateway, pod_summary};
use k8s_openapi::jiff::Timestamp;
use model::{PickerRow, PodSummary, ResourceKind, SelectionOutcome};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

// Set while the picker owns the terminal; log lines would draw over it.
static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    let result = match init_tracing(&args.log_filter) {
        Ok(()) => run(args).await,
        Err(error) => Err(error),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            println!("kandie: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level_filter)
        .or_else(|_| EnvFilter::try_new("warn"))
        .context("failed to initialize tracing filter")?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr.with_filter(|_| logs_visible()))
        .try_init();

    Ok(())
}

fn logs_visible() -> bool {
    !TERMINAL_ACTIVE.load(Ordering::Relaxed)
}

fn set_terminal_active(active: bool) {
    TERMINAL_ACTIVE.store(active, Ordering::Relaxed);
}

async fn run(args: CliArgs) -> Result<()> {
    let config = KandieConfig::discover()?;
    let target = Target::parse(&args.resource, args.name.as_deref());
    let Some(kind) = ResourceKind::from_token(&target.kind) else {
        anyhow::bail!("i don't know how to describe: {}", target.kind);
    };

    let options = ConnectOptions {
        kubeconfig: args.kubeconfig.or_else(|| config.kubeconfig.clone()),
        context: args.context.or_else(|| config.context.clone()),
        namespace: args.namespace.or_else(|| config.namespace.clone()),
    };
    let gateway = KubeGateway::connect(&options).await?;
    info!(
        "using context {} namespace {}",
        gateway.context(),
        gateway.namespace()
    );

    match kind {
        ResourceKind::Pod => describe_pod(&gateway, &config, target.name).await,
    }
}

async fn describe_pod(
    gateway: &KubeGateway,
    config: &KandieConfig,
    name: Option<String>,
) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => match choose_pod(gateway, config.picker_height()).await? {
            Some(name) => name,
            None => {
                info!("pod selection cancelled");
                return Ok(());
            }
        },
    };

    let pod = gateway.get_pod(&name).await?;
    let template = config.template_source(ResourceKind::Pod)?;
    let describer = Describer::new(TemplateFunctions::standard());
    describer.describe(&pod, &template, io::stdout().lock())
}

async fn choose_pod(gateway: &KubeGateway, visible_rows: usize) -> Result<Option<String>> {
    let pods = gateway
        .list_pods()
        .await
        .context("cannot get pod listing")?;
    let mut summaries = pods.iter().map(pod_summary).collect::<Vec<_>>();
    sort::sort_pods(&mut summaries);

    match pick(pod_columns(), picker_rows(&summaries), visible_rows).await? {
        SelectionOutcome::Cancelled => Ok(None),
        SelectionOutcome::Selected(name) => require_selection(name).map(Some),
    }
}

fn require_selection(name: String) -> Result<String> {
    if name.is_empty() {
        anyhow::bail!("need a pod to be selected");
    }
    Ok(name)
}

fn pod_columns() -> Vec<Column> {
    vec![
        Column::new("Name", 50),
        Column::new("Created", 20),
        Column::new("Status", 30),
    ]
}

fn picker_rows(pods: &[PodSummary]) -> Vec<PickerRow> {
    pods.iter()
        .map(|pod| PickerRow {
            key: pod.name.clone(),
            created: format_created(pod.created_at),
            phase: status::paint_phase(status::phase_of(pod)),
        })
        .collect()
}

fn format_created(created_at: Option<Timestamp>) -> String {
    created_at
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts.as_second(), 0))
        .map(|time| {
            time.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

async fn pick(
    columns: Vec<Column>,
    rows: Vec<PickerRow>,
    visible_rows: usize,
) -> Result<SelectionOutcome> {
    let mut picker = Picker::new(columns, rows);
    let mut terminal = init_terminal()?;
    let mut events = EventStream::new();

    let pick_result = app::drive(&mut picker, &mut events, interrupted(), |picker| {
        terminal
            .draw(|frame| ui::render(frame, picker, visible_rows))
            .context("failed to render terminal frame")?;
        Ok(())
    })
    .await;
    let restore_result = restore_terminal(&mut terminal);
    debug!("picker result={pick_result:?}");

    match (pick_result, restore_result) {
        (Err(pick_error), Err(restore_error)) => Err(anyhow::anyhow!(
            "{pick_error:#}\nterminal restore error: {restore_error:#}"
        )),
        (Err(error), _) => Err(error),
        (_, Err(error)) => Err(error),
        (Ok(outcome), Ok(())) => Ok(outcome),
    }
}

async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn init_terminal() -> Result<TuiTerminal> {
    set_terminal_active(true);
    if let Err(error) = enable_raw_mode() {
        set_terminal_active(false);
        return Err(error).context("failed to enable raw mode");
    }
    let mut stdout = io::stdout();
    if let Err(error) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        set_terminal_active(false);
        return Err(error).context("failed to enter alternate screen");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().context("failed to clear terminal")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut TuiTerminal) -> Result<()> {
    set_terminal_active(false);
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{format_created, logs_visible, picker_rows, require_selection, set_terminal_active};
    use crate::model::{ContainerState, PodSummary};
    use k8s_openapi::jiff::Timestamp;

    #[test]
    fn empty_selection_is_rejected() {
        assert!(require_selection(String::new()).is_err());
        assert_eq!(require_selection("web-0".to_string()).ok().as_deref(), Some("web-0"));
    }

    #[test]
    fn rows_project_name_time_and_phase() {
        let pods = vec![PodSummary {
            name: "web-0".to_string(),
            created_at: Timestamp::from_second(1_700_000_000).ok(),
            started_at: None,
            containers: vec![ContainerState::Waiting {
                reason: "ImagePullBackOff".to_string(),
            }],
        }];

        let rows = picker_rows(&pods);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "web-0");
        assert_eq!(rows[0].created.len(), "2006-01-02 15:04:05".len());
        assert_eq!(rows[0].phase.text, "Failed");
    }

    #[test]
    fn logs_are_muted_while_the_picker_owns_the_terminal() {
        assert!(logs_visible());
        set_terminal_active(true);
        assert!(!logs_visible());
        set_terminal_active(false);
        assert!(logs_visible());
    }

    #[test]
    fn missing_creation_time_renders_dash() {
        assert_eq!(format_created(None), "-");
    }
}
