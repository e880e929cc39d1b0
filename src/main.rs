use clap::Parser;

use nowplaying_fb::Config;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    // Only device setup can fail; once the loop runs nothing is fatal
    if let Err(e) = run(config) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(target_os = "linux")]
fn run(config: Config) -> anyhow::Result<()> {
    use anyhow::Context;
    use nowplaying_fb::network::{build_client, HttpImageProvider, HttpStateProvider};
    use nowplaying_fb::platform::Framebuffer;
    use nowplaying_fb::ui::ImageCrateDecoder;
    use nowplaying_fb::RenderLoop;

    log::info!(
        "nowplaying-fb {} - endpoint {}, device {}",
        env!("CARGO_PKG_VERSION"),
        config.endpoint,
        config.device
    );

    let client = build_client(config.http_timeout(), config.insecure).context("building HTTP client")?;
    let states = HttpStateProvider::new(client.clone(), config.endpoint.clone());
    let images = HttpImageProvider::new(client);

    let surface = Framebuffer::open(&config.device, config.device_retries, config.device_backoff())
        .context("framebuffer not ready, aborting")?;

    RenderLoop::new(surface, states, images, ImageCrateDecoder, config.loop_config()).run()
}

#[cfg(not(target_os = "linux"))]
fn run(_config: Config) -> anyhow::Result<()> {
    anyhow::bail!("nowplaying-fb drives a Linux framebuffer and only runs on Linux")
}
