// src/app.rs
use eframe::egui;
use log::{error, info};
use rfd::FileDialog;

use hygiene_eda::config::Settings;
use hygiene_eda::file::{FileHandler, SettingsFileHandler};
use hygiene_eda::state::{AppState, Section};

pub struct HygieneApp {
    state: AppState,
    settings_handler: SettingsFileHandler,
    info_message: Option<String>,
}

impl HygieneApp {
    pub fn new(settings: Settings) -> Self {
        let mut state = AppState::new(settings);
        // Failures surface through the error window
        let _ = state.load_data();

        Self {
            state,
            settings_handler: SettingsFileHandler::new(),
            info_message: None,
        }
    }

    fn show_menu(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("Fichier", |ui| {
                if ui.button("Ouvrir un CSV…").clicked() {
                    self.open_survey();
                    ui.close_menu();
                }
                if ui.button("Recharger").clicked() {
                    let _ = self.state.reload();
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Enregistrer les paramètres").clicked() {
                    self.save_settings();
                    ui.close_menu();
                }
            });

            ui.menu_button("Intervalles", |ui| {
                self.show_interval_menu(ui);
            });

            ui.separator();
            ui.label(
                egui::RichText::new(self.state.settings.data_path.display().to_string()).weak(),
            );
        });
    }

    fn show_interval_menu(&mut self, ui: &mut egui::Ui) {
        use hygiene_eda::analysis::IntervalMethod;

        let mut settings = self.state.settings.clone();
        let mut changed = false;

        for method in [IntervalMethod::Wilson, IntervalMethod::Normal, IntervalMethod::ExactBinomial] {
            changed |= ui
                .radio_value(&mut settings.interval_method, method, method.to_string())
                .changed();
        }
        ui.separator();
        for level in [0.90, 0.95, 0.99] {
            changed |= ui
                .radio_value(&mut settings.confidence_level, level, format!("{:.0} %", level * 100.0))
                .changed();
        }

        if changed {
            self.state.apply_settings(settings);
        }
    }

    fn open_survey(&mut self) {
        let file_dialog = FileDialog::new()
            .add_filter("Fichiers CSV", &["csv"])
            .set_title("Ouvrir les données de l'enquête");

        if let Some(path) = file_dialog.pick_file() {
            info!("Opening {}", path.display());
            let _ = self.state.open(path);
        }
    }

    fn save_settings(&mut self) {
        let path = Settings::default_path();
        match self.settings_handler.save(&self.state.settings, &path) {
            Ok(()) => {
                info!("Settings saved to {}", path.display());
                self.info_message = Some(format!("Paramètres enregistrés dans {}", path.display()));
            }
            Err(e) => {
                error!("Failed to save settings: {}", e);
                self.state.error_message = Some(e.user_message());
            }
        }
    }
}

impl eframe::App for HygieneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.show_menu(ui);
        });

        egui::SidePanel::left("sections")
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Navigation");
                ui.separator();
                for section in Section::ALL {
                    ui.selectable_value(&mut self.state.current_section, section, section.label());
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            crate::ui::show_section(ui, &mut self.state);
        });

        // Show error modal if needed
        let error_msg = self.state.error_message.clone();
        if let Some(error) = error_msg {
            egui::Window::new("Erreur")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&error);
                    if ui.button("OK").clicked() {
                        self.state.error_message = None;
                    }
                });
        }

        let info_msg = self.info_message.clone();
        if let Some(message) = info_msg {
            egui::Window::new("Information")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&message);
                    if ui.button("OK").clicked() {
                        self.info_message = None;
                    }
                });
        }
    }
}
