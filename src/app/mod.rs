// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring the configured backends into the egui UI.

use std::sync::Arc;

use eframe::egui;
use egui_phosphor::Variant;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::logic::memory_store::MemoryStore;
use crate::logic::rest_store::RestStore;
use crate::logic::store::DataStore;
use crate::logic::webhook::HttpTransport;
use crate::mvu::Services;
use crate::ui::ExtratosApp;

/// Pick the data store and webhook transport described by `config`.
pub fn build_services(config: &AppConfig) -> Services {
    let store: Arc<dyn DataStore> = if config.backend.is_offline() {
        warn!("No backend URL configured; using the seeded in-memory store");
        Arc::new(MemoryStore::seeded())
    } else {
        info!(url = %config.backend.url, "Using hosted backend");
        Arc::new(RestStore::new(&config.backend))
    };

    Services {
        store,
        transport: Arc::new(HttpTransport::new(config.webhook_url.clone())),
    }
}

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run(config: &AppConfig) -> eframe::Result<()> {
    let services = build_services(config);

    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Extratos",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(ExtratosApp::new(services)))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use crate::logic::memory_store::{OFFLINE_ADMIN_EMAIL, OFFLINE_ADMIN_PASSWORD};

    #[test]
    fn offline_config_gets_seeded_store() {
        let services = build_services(&AppConfig::default());

        assert!(
            services
                .store
                .sign_in(OFFLINE_ADMIN_EMAIL, OFFLINE_ADMIN_PASSWORD)
                .is_ok()
        );
    }

    #[test]
    fn configured_backend_gets_rest_store() {
        let config = AppConfig {
            backend: BackendConfig {
                url: "http://127.0.0.1:9".into(),
                anon_key: "anon".into(),
            },
            ..AppConfig::default()
        };

        let services = build_services(&config);

        assert!(services.store.session().is_none());
        assert!(
            services
                .store
                .sign_in(OFFLINE_ADMIN_EMAIL, OFFLINE_ADMIN_PASSWORD)
                .is_err()
        );
    }
}
