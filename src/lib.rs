pub mod config;
pub mod csv_import;
pub mod db;
pub mod error;
pub mod export;
pub mod filters;
pub mod models;
pub mod money;
pub mod store;
pub mod telemetry;

#[cfg(feature = "desktop")]
mod commands;


#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use crate::commands::{auth, customers, exports, invoices, products, reports, settings};
    use crate::config::AppConfig;
    use crate::db::Database;
    use crate::telemetry;
    use tauri::{
        menu::{Menu, MenuItem},
        tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
        Manager,
    };

    fn toggle_main_window(app: &tauri::AppHandle) {
        if let Some(window) = app.get_webview_window("main") {
            if window.is_visible().unwrap_or(false) {
                let _ = window.hide();
            } else {
                let _ = window.show();
                let _ = window.set_focus();
            }
        }
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        let config = AppConfig::load(None).unwrap_or_else(|e| {
            eprintln!("failed to load configuration, using defaults: {e}");
            AppConfig::default()
        });
        telemetry::init_tracing(&config.log_filter);

        tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .plugin(tauri_plugin_dialog::init())
            .plugin(tauri_plugin_fs::init())
            .setup(move |app| {
                let db = Database::new(app.handle(), &config)?;
                db.initialize(&config)?;
                app.manage(db);
                app.manage(config);

                let open = MenuItem::with_id(app, "open", "Open BizDesk", true, None::<&str>)?;
                let quit = MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?;
                let menu = Menu::with_items(app, &[&open, &quit])?;

                let mut tray = TrayIconBuilder::new()
                    .menu(&menu)
                    .show_menu_on_left_click(false)
                    .on_tray_icon_event(|tray, event| {
                        if let TrayIconEvent::Click {
                            button: MouseButton::Left,
                            button_state: MouseButtonState::Up,
                            ..
                        } = event
                        {
                            toggle_main_window(tray.app_handle());
                        }
                    })
                    .on_menu_event(|app, event| match event.id.as_ref() {
                        "open" => toggle_main_window(app),
                        "quit" => app.exit(0),
                        _ => {}
                    });
                if let Some(icon) = app.default_window_icon() {
                    tray = tray.icon(icon.clone());
                }
                tray.build(app)?;

                tracing::info!("BizDesk started");
                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                // Auth
                auth::login,
                auth::current_user,
                auth::logout,
                // Customers
                customers::get_customers,
                customers::get_customer,
                customers::create_customer,
                customers::update_customer,
                customers::search_customers,
                // Inventory
                products::get_products,
                products::get_product,
                products::create_product,
                products::update_product,
                products::get_brands,
                products::get_products_by_brand,
                products::get_low_stock,
                products::search_products,
                products::preview_product_import,
                products::import_products,
                products::get_import_template,
                // Invoices
                invoices::get_invoices,
                invoices::get_recent_invoices,
                invoices::get_invoice,
                invoices::create_invoice,
                invoices::update_invoice,
                invoices::set_invoice_status,
                invoices::search_invoices,
                // Reports
                reports::get_dashboard_metrics,
                reports::get_monthly_sales,
                reports::generate_report,
                // Settings
                settings::get_settings,
                settings::update_settings,
                // Export
                exports::export_inventory,
                exports::export_invoices,
                exports::export_customers,
                exports::save_export,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}
