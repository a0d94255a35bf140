mod capture;
mod config;
mod core;
mod domain;
mod remote;
mod render;
mod session;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    core::app::run()
}
