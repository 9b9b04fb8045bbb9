use std::fmt;
use std::sync::Arc;

use services::{ActivityTracking, AppServices, Clock, TracingReporter};
use storage::ProgressStore;
use study_core::model::{ActivityItem, BinaryKind, IdentifierPath};
use tracing_subscriber::EnvFilter;

const APP_IDENTIFIER: &str = "com.example.playbook";

const HAMLET_JSON: &str = include_str!("../content/hamlet.json");
const MACBETH_JSON: &str = include_str!("../content/macbeth.json");

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidScore { raw: String },
    EmptyPath { flag: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidScore { raw } => write!(f, "invalid --score value: {raw}"),
            ArgsError::EmptyPath { flag } => write!(f, "{flag} requires a non-empty path"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_path(raw: &str, flag: &'static str) -> Result<IdentifierPath, ArgsError> {
    let segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(ArgsError::EmptyPath { flag });
    }
    Ok(IdentifierPath::from_segments(segments))
}

#[derive(Debug)]
struct Args {
    scene: IdentifierPath,
    score: f64,
    deep_link: Option<IdentifierPath>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, ArgsError> {
    let mut scene = IdentifierPath::from_segments(["hamlet", "act-1", "scene-1"]);
    let mut score = 87.0;
    let mut deep_link = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scene" => {
                let raw = require_value(&mut args, "--scene")?;
                scene = parse_path(&raw, "--scene")?;
            }
            "--score" => {
                let raw = require_value(&mut args, "--score")?;
                score = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite() && (0.0..=100.0).contains(value))
                    .ok_or(ArgsError::InvalidScore { raw })?;
            }
            "--deep-link" => {
                let raw = require_value(&mut args, "--deep-link")?;
                deep_link = Some(parse_path(&raw, "--deep-link")?);
            }
            other => return Err(ArgsError::UnknownArg(other.to_owned())),
        }
    }

    Ok(Args {
        scene,
        score,
        deep_link,
    })
}

/// Deep links arrive with the application's own context identifier in
/// front; drop it, then show what the remaining path points at.
fn handle_deep_link(services: &AppServices, link: &IdentifierPath) {
    let path = link.without_application_prefix();
    match services.registry().node_at(path.segments()) {
        Some(node) if path.is_empty() => {
            tracing::info!(children = node.children().len(), "deep link to all content");
        }
        Some(node) => {
            tracing::info!(%path, title = node.title(), "deep link resolved");
        }
        None => {
            tracing::warn!(%path, "deep link does not match any content");
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let services = AppServices::new_in_memory(
        APP_IDENTIFIER,
        &[("hamlet.json", HAMLET_JSON), ("macbeth.json", MACBETH_JSON)],
        Arc::new(TracingReporter),
        Clock::system(),
    )?;

    // Declaring the whole tree touches every leaf; keep it off the main
    // task the way a UI app would keep it off the main thread.
    let declaration = services.declaration();
    let declared = tokio::spawn(async move { declaration.declare_all().await }).await?;
    tracing::info!(declared, "content tree declared to the store");

    // The store can also be brought up to date one level at a time, the way
    // a context-request extension would.
    let root = services.store().main_root().await?;
    services.reconciler().reconcile_children(&root).await?;

    if let Some(link) = &args.deep_link {
        handle_deep_link(&services, link);
    }

    // Walk one scene the way a reader would: open it, work through it,
    // record the practice and the quiz, close it.
    let activity = services.activity();
    let scene = &args.scene;

    let started = activity.start_activity(scene).await?;
    tracing::info!(
        path = %started.context.identifier_path(),
        title = started.context.title(),
        "scene opened"
    );

    activity.set_progress(0.0, scene, false).await;
    activity.set_progress(0.5, scene, false).await;
    activity
        .add_additional_item(
            ActivityItem::binary("practiced", "Practiced lines", true, BinaryKind::YesNo)?,
            scene,
            false,
        )
        .await;
    activity
        .set_primary_item(
            ActivityItem::score("scene-quiz", "Scene quiz", args.score, 100.0)?,
            scene,
            false,
        )
        .await;
    activity.set_progress(1.0, scene, false).await;
    activity.stop_activity(scene, true).await;

    let context = services.store().descendant(scene.segments()).await?;
    if let Some(finished) = context.current_activity() {
        tracing::info!(
            progress = finished.progress(),
            items = finished.additional_items().len(),
            "scene closed"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!(
                "usage: app [--scene <play/act/scene>] [--score <0-100>] [--deep-link <app/play/...>]"
            );
            std::process::exit(2);
        }
    };

    if let Err(error) = run(args).await {
        tracing::error!(%error, "demo run failed");
        std::process::exit(1);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
