use clip_stats::build_rocket;
use clip_stats::config::{create_app_state, init_logger, load_environment, PORT, STATIC_DIR};
use log::info;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    load_environment();
    init_logger();

    let state = create_app_state()?;
    let figment = rocket::Config::figment().merge(("port", *PORT));
    let rocket = build_rocket(state, STATIC_DIR.as_str())?.configure(figment);

    info!("Clip stats server running on port {}", *PORT);
    info!("Dashboard: http://localhost:{}", *PORT);

    rocket
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {e}"))?;
    Ok(())
}
