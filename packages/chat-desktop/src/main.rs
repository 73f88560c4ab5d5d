//! Starter Chat Desktop
//!
//! Native desktop client for a chat server that offers conversation
//! starters, server-driven commands and toggles, and side panels.

mod api;
mod app;
mod components;
mod config;
mod events;
mod i18n;
mod keyboard;
mod starter;
mod state;
mod theme;
mod views;

use anyhow::Result;
use gpui::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Starter Chat Desktop");

    let config = AppConfig::load();

    Application::new().run(move |cx: &mut App| {
        i18n::init(cx);
        state::init(cx, &config);
        theme::init(&config.theme, cx);
        keyboard::init(cx);

        if let Err(e) = api::init(cx, &config.server_url, config.access_token.clone()) {
            tracing::error!("Failed to initialize API client: {}", e);
            cx.quit();
            return;
        }

        events::start_event_loop(cx);

        let opened = cx.open_window(
            WindowOptions {
                titlebar: Some(TitlebarOptions {
                    title: Some("Chat".into()),
                    appears_transparent: true,
                    ..Default::default()
                }),
                window_bounds: Some(WindowBounds::Windowed(Bounds {
                    origin: point(px(100.0), px(100.0)),
                    size: size(px(1200.0), px(800.0)),
                })),
                ..Default::default()
            },
            |window, cx| cx.new(|cx| app::AppRoot::new(window, cx)),
        );

        match opened {
            Ok(_) => tracing::info!("Window opened, server {}", config.server_url),
            Err(e) => {
                tracing::error!("Failed to open window: {}", e);
                cx.quit();
            }
        }
    });

    Ok(())
}
