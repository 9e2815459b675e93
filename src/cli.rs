use crate::ai::{CampaignExtractor, GeminiExtractor};
use crate::config::AppConfig;
use crate::store::{CampaignStore, PostgrestStore};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "tribe-points",
    version,
    about = "Youth-group campaign point tracker with an optional TUI"
)]
pub struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Database project URL
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Database API key (sent as apikey and bearer token)
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub supabase_key: Option<String>,

    /// Campaign table name
    #[arg(long)]
    pub table: Option<String>,

    /// Gemini API key; without it AI-assisted authoring is disabled
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    #[arg(long)]
    pub gemini_model: Option<String>,

    /// Gemini API base URL
    #[arg(long)]
    pub gemini_base_url: Option<String>,

    /// Timeout for every remote request (e.g. 30s). No timeout by default
    #[arg(long)]
    pub request_timeout: Option<humantime::Duration>,

    /// Print all campaigns as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print a text summary and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Export all campaigns as JSON
    #[arg(long)]
    pub export_json: Option<std::path::PathBuf>,
}

impl Cli {
    pub fn is_interactive(&self) -> bool {
        !self.json && !self.text && self.export_json.is_none()
    }
}

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args)?;

    if args.is_interactive() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(cfg).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(&args, &cfg).await;
        }
    }

    if args.json {
        return run_json(&args, &cfg).await;
    }
    run_text(&args, &cfg).await
}

/// Layer CLI flags and environment over the config file.
pub fn build_config(args: &Cli) -> Result<AppConfig> {
    let mut cfg = AppConfig::load(args.config.as_deref())?;

    if let Some(url) = args.supabase_url.as_ref() {
        cfg.database.url = url.clone();
    }
    if let Some(key) = args.supabase_key.as_ref() {
        cfg.database.api_key = key.clone();
    }
    if let Some(table) = args.table.as_ref() {
        cfg.database.table = table.clone();
    }
    if let Some(key) = args.gemini_api_key.as_ref() {
        cfg.ai.api_key = Some(key.clone());
    }
    if let Some(model) = args.gemini_model.as_ref() {
        cfg.ai.model = model.clone();
    }
    if let Some(base) = args.gemini_base_url.as_ref() {
        cfg.ai.base_url = base.clone();
    }
    if let Some(t) = args.request_timeout {
        cfg.network.request_timeout = Some(Duration::from(t));
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Build the remote collaborators. The extractor is absent when no AI key is configured.
pub(crate) fn connect(
    cfg: &AppConfig,
) -> Result<(Arc<dyn CampaignStore>, Option<Arc<dyn CampaignExtractor>>)> {
    let timeout = cfg.network.request_timeout;
    let store = PostgrestStore::new(&cfg.database, timeout).context("build database client")?;
    let extractor = match cfg.ai_key() {
        Some(key) => {
            let ex = GeminiExtractor::new(&cfg.ai, key.to_string(), timeout)
                .context("build AI client")?;
            tracing::info!(model = ex.model(), "AI extraction enabled");
            Some(Arc::new(ex) as Arc<dyn CampaignExtractor>)
        }
        None => {
            tracing::info!("no AI key configured, AI extraction disabled");
            None
        }
    };
    Ok((Arc::new(store), extractor))
}

async fn fetch_all(cfg: &AppConfig) -> Result<Vec<crate::model::Campaign>> {
    let (store, _) = connect(cfg)?;
    store.list().await.context("load campaigns")
}

async fn run_json(args: &Cli, cfg: &AppConfig) -> Result<()> {
    let campaigns = fetch_all(cfg).await?;
    handle_exports(args, &campaigns)?;

    let (out_tx, out_handle) = spawn_output_writer();
    let out = serde_json::to_string_pretty(&campaigns)?;
    let _ = out_tx.send(OutputLine::Stdout(out));
    if let Some(p) = args.export_json.as_deref() {
        let _ = out_tx.send(OutputLine::Stderr(format!("Exported JSON: {}", p.display())));
    }
    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}

async fn run_text(args: &Cli, cfg: &AppConfig) -> Result<()> {
    let (out_tx, out_handle) = spawn_output_writer();
    let _ = out_tx.send(OutputLine::Stderr(
        crate::model::InfoEvent::Loading.to_message(),
    ));

    let campaigns = fetch_all(cfg).await?;
    handle_exports(args, &campaigns)?;

    let summary = crate::text_summary::build_text_summary(&campaigns);
    for line in summary.lines {
        let _ = out_tx.send(OutputLine::Stdout(line));
    }
    if let Some(p) = args.export_json.as_deref() {
        let _ = out_tx.send(OutputLine::Stderr(format!("Exported JSON: {}", p.display())));
    }
    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}

fn handle_exports(args: &Cli, campaigns: &[crate::model::Campaign]) -> Result<()> {
    if let Some(p) = args.export_json.as_deref() {
        crate::export::export_json(p, campaigns)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn parse(extra: &[&str]) -> Cli {
        let mut argv = vec!["tribe-points"];
        argv.extend_from_slice(extra);
        Cli::parse_from(argv)
    }

    #[test]
    fn flags_override_config_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
[database]
url = "https://file.example"
api_key = "file-key"
table = "from_file"

[ai]
model = "file-model"
"#
        )
        .unwrap();
        let path = f.path().to_str().unwrap().to_string();
        let args = parse(&[
            "--config",
            &path,
            "--table",
            "cli_table",
            "--gemini-api-key",
            "g",
            "--request-timeout",
            "5s",
        ]);
        let cfg = build_config(&args).unwrap();
        assert_eq!(cfg.database.table, "cli_table");
        assert_eq!(cfg.ai.model, "file-model");
        assert_eq!(cfg.ai_key(), Some("g"));
        assert_eq!(cfg.network.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn missing_database_settings_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();
        let mut args = parse(&["--config", path.to_str().unwrap()]);
        // Environment may provide these; clear them for a deterministic check.
        args.supabase_url = None;
        args.supabase_key = None;
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn interactive_only_without_output_flags() {
        assert!(parse(&[]).is_interactive());
        assert!(!parse(&["--text"]).is_interactive());
        assert!(!parse(&["--export-json", "out.json"]).is_interactive());
    }
}
