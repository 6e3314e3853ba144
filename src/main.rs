use anyhow::Result;
use chrono::Utc;
use hazardwatch::{
    AppModel, ApiClient, Cmd, HazardWatchConfig, Msg, Phase, geocode, pipeline, report,
};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = HazardWatchConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let watch = args.iter().any(|a| a == "--watch");
    let query = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

    let client = ApiClient::new(config.clone())?;
    let mut model = AppModel::new();

    // Resolve the query up front; with no query the default city is assessed
    if !query.is_empty() {
        let results = geocode::search(&client, &query).await;
        match results.into_iter().next() {
            Some(location) => {
                info!("Resolved '{}' to {}", query, location.name);
                run_cmd(&client, &mut model, Msg::LocationSelected(location)).await;
            }
            None => {
                error!("No location found for '{}'", query);
                std::process::exit(1);
            }
        }
    } else {
        let cmd = model.begin_fetch();
        drive(&client, &mut model, cmd).await;
    }

    render_phase(&model);

    if watch {
        let interval = Duration::from_secs(u64::from(config.refresh.interval_minutes) * 60);
        info!("Watching; refreshing every {} minutes", config.refresh.interval_minutes);
        loop {
            tokio::time::sleep(interval).await;
            run_cmd(&client, &mut model, Msg::RefreshTick).await;
            render_phase(&model);
        }
    }

    Ok(())
}

/// Apply a message and run whatever command it produces
async fn run_cmd(client: &ApiClient, model: &mut AppModel, msg: Msg) {
    let cmd = model.update(msg);
    drive(client, model, cmd).await;
}

/// Execute commands against the outside world, feeding results back into the
/// model until it has no more work
async fn drive(client: &ApiClient, model: &mut AppModel, mut cmd: Cmd) {
    loop {
        cmd = match cmd {
            Cmd::None => return,
            Cmd::Search { query } => {
                let results = geocode::search(client, &query).await;
                model.update(Msg::SearchCompleted { query, results })
            }
            Cmd::Fetch { seq, location } => {
                let mut rng = rand::rng();
                let report = pipeline::assess(client, &location, Utc::now(), &mut rng).await;
                model.update(Msg::FetchCompleted {
                    seq,
                    report: Box::new(report),
                })
            }
        };
    }
}

fn render_phase(model: &AppModel) {
    match &model.phase {
        Phase::Displaying => {
            if let Some(current) = &model.report {
                println!("{}", report::render(current));
            }
        }
        Phase::Error(message) => error!("Assessment failed: {}", message),
        Phase::Idle | Phase::Loading => {}
    }
}
