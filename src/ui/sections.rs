// src/ui/sections.rs
use eframe::egui::{self, RichText};

use hygiene_eda::analysis::{ConfidenceInterval, ProportionEstimate, Proportions};
use hygiene_eda::config::{BarrierCategory, Indicator, Record, Response};
use hygiene_eda::state::{AppState, Section, SectionView};

use super::charts::show_chart;

pub fn show_section(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(state.current_section.label());
    ui.separator();

    if state.current_section == Section::Companies {
        show_company_picker(ui, state);
        ui.separator();
    }

    let Some(view) = state.current_view() else {
        ui.centered_and_justified(|ui| {
            ui.label("Aucune donnée chargée. Ouvrez un fichier CSV depuis le menu Fichier.");
        });
        return;
    };

    egui::ScrollArea::vertical().show(ui, |ui| {
        match view.as_ref() {
            SectionView::Overview { overview, loaded_at, records, product_chart } => {
                egui::Grid::new("overview_metrics")
                    .num_columns(2)
                    .spacing([40.0, 4.0])
                    .show(ui, |ui| {
                        metric(ui, "Nombre d'entreprises", overview.companies.to_string());
                        metric(ui, "Localisations", overview.locations.to_string());
                        metric(ui, "Types de produits", overview.product_types.to_string());
                        metric(ui, "Données manquantes", format!("{:.1} %", overview.missing_rate * 100.0));
                        metric(ui, "Chargé le", loaded_at.format("%d/%m/%Y %H:%M:%S").to_string());
                    });
                ui.add_space(8.0);
                show_records_preview(ui, records);
                ui.add_space(8.0);
                show_chart(ui, "overview_products", product_chart);
            }
            SectionView::DescriptiveStatistics { hygiene, staff, breakdown_chart } => {
                egui::Grid::new("hygiene_statistics")
                    .striped(true)
                    .num_columns(1 + 2 * Response::ALL.len())
                    .show(ui, |ui| {
                        ui.label(RichText::new("Indicateur").strong());
                        for response in Response::ALL {
                            ui.label(RichText::new(response.label()).strong());
                            ui.label(RichText::new(format!("IC ({})", response.label())).strong());
                        }
                        ui.end_row();

                        for stats in hygiene {
                            ui.label(stats.indicator.label());
                            for response in Response::ALL {
                                ui.label(share_text(&stats.proportions, response));
                                let statistic = stats.responses.iter().find(|r| r.response == response);
                                ui.label(statistic.map_or("-".to_string(), |r| interval_text(&r.confidence_interval)));
                            }
                            ui.end_row();
                        }
                    });

                if let Some(staff) = staff {
                    ui.add_space(8.0);
                    ui.label(RichText::new("Effectif du personnel").strong());
                    ui.label(format!(
                        "Moyenne {:.1}, médiane {:.1}, étendue [{:.0}, {:.0}] sur {} entreprises",
                        staff.summary.mean,
                        staff.summary.median,
                        staff.summary.min,
                        staff.summary.max,
                        staff.summary.count
                    ));
                    for (band, estimate) in &staff.bands {
                        ui.label(format!("{band} : {}", estimate_text(estimate)));
                    }
                }

                ui.add_space(8.0);
                show_chart(ui, "descriptive_breakdown", breakdown_chart);
            }
            SectionView::Companies { profiles, details, radar } => {
                show_chart(ui, "company_radar", radar);

                for profile in profiles.iter().filter(|p| !p.is_found()) {
                    ui.label(RichText::new(format!("{} : aucune donnée", profile.company_id)).weak());
                }
                for record in details {
                    show_company_details(ui, record);
                }
            }
            SectionView::Obstacles { barriers, barrier_chart, specific, specific_chart } => {
                show_chart(ui, "barrier_chart", barrier_chart);

                egui::Grid::new("barrier_statistics").striped(true).show(ui, |ui| {
                    ui.label(RichText::new("Obstacle").strong());
                    ui.label(RichText::new("Signalé").strong());
                    ui.end_row();
                    for barrier in barriers {
                        ui.label(barrier.category.label());
                        ui.label(barrier.prevalence.as_ref().map_or("-".to_string(), estimate_text));
                        ui.end_row();
                    }
                });

                ui.add_space(8.0);
                if specific.is_empty() {
                    ui.label("Aucun autre obstacle déclaré");
                } else {
                    show_chart(ui, "specific_obstacles", specific_chart);
                }
            }
            SectionView::Training { training, distribution_chart, correlation_chart } => {
                egui::Grid::new("training_statistics").striped(true).show(ui, |ui| {
                    for stats in training {
                        ui.label(&stats.training);
                        ui.label(estimate_text(&stats.estimate));
                        ui.end_row();
                    }
                });
                ui.add_space(8.0);
                show_chart(ui, "training_distribution", distribution_chart);
                show_chart(ui, "training_correlation", correlation_chart);
            }
            SectionView::Comparisons { comparison_chart, boxplot, product_chart } => {
                show_chart(ui, "company_comparison", comparison_chart);
                show_chart(ui, "hygiene_boxplot", boxplot);
                show_chart(ui, "product_type_scores", product_chart);
            }
        }
    });
}

fn show_company_picker(ui: &mut egui::Ui, state: &mut AppState) {
    let company_ids = state.company_ids();
    if company_ids.is_empty() {
        return;
    }

    ui.label(RichText::new("Sélectionnez les entreprises à comparer").strong());
    egui::ScrollArea::horizontal().id_source("company_picker").show(ui, |ui| {
        ui.horizontal(|ui| {
            for id in &company_ids {
                let mut selected = state.selected_companies.contains(id);
                if ui.checkbox(&mut selected, id.as_str()).changed() {
                    state.toggle_company(id);
                }
            }
        });
    });
}

fn show_records_preview(ui: &mut egui::Ui, records: &[Record]) {
    ui.label(RichText::new("Aperçu des données").strong());
    egui::ScrollArea::both()
        .id_source("records_preview")
        .max_height(300.0)
        .show(ui, |ui| {
            egui::Grid::new("records_preview_grid").striped(true).show(ui, |ui| {
                for header in ["ID", "Localisation", "Type de produit", "Effectif", "Formation"] {
                    ui.label(RichText::new(header).strong());
                }
                for indicator in Indicator::ALL {
                    ui.label(RichText::new(indicator.column()).strong());
                }
                for category in BarrierCategory::ALL {
                    ui.label(RichText::new(category.column()).strong());
                }
                ui.label(RichText::new("Autres obstacles").strong());
                ui.end_row();

                for record in records {
                    ui.label(&record.company_id);
                    ui.label(&record.location);
                    ui.label(&record.product_type);
                    ui.label(&record.staff_size);
                    ui.label(&record.training_received);
                    for response in record.practices.iter().chain(record.barriers.iter()) {
                        ui.label(response.label());
                    }
                    ui.label(record.other_obstacles.as_deref().unwrap_or("-"));
                    ui.end_row();
                }
            });
        });
}

fn show_company_details(ui: &mut egui::Ui, record: &Record) {
    egui::CollapsingHeader::new(format!("Détails de l'entreprise {}", record.company_id))
        .default_open(true)
        .show(ui, |ui| {
            ui.columns(2, |columns| {
                columns[0].label(RichText::new("Informations générales").strong());
                columns[0].label(format!("Localisation : {}", record.location));
                columns[0].label(format!("Type de produit : {}", record.product_type));
                columns[0].label(format!("Effectif : {}", record.staff_size));
                columns[0].label(format!("Formation reçue : {}", record.training_received));

                columns[1].label(RichText::new("Pratiques d'hygiène").strong());
                for indicator in Indicator::ALL {
                    columns[1].label(format!(
                        "{} {}",
                        status_icon(record.practice(indicator)),
                        indicator.label()
                    ));
                }
            });

            ui.label(RichText::new("Obstacles").strong());
            ui.horizontal_wrapped(|ui| {
                for category in BarrierCategory::ALL {
                    ui.label(format!("{} {}", status_icon(record.barrier(category)), category.label()));
                }
            });
            if let Some(other) = &record.other_obstacles {
                ui.label(format!("Autres obstacles : {other}"));
            }
        });
}

fn metric(ui: &mut egui::Ui, label: &str, value: String) {
    ui.label(label);
    ui.label(RichText::new(value).strong());
    ui.end_row();
}

fn status_icon(response: Response) -> &'static str {
    match response {
        Response::Yes => "✅",
        Response::No => "❌",
        Response::Unknown => "❓",
    }
}

fn share_text(proportions: &Proportions, response: Response) -> String {
    proportions.shares()
        .map_or("-".to_string(), |shares| format!("{:.1} %", shares.share(response) * 100.0))
}

fn interval_text(ci: &ConfidenceInterval) -> String {
    format!(
        "[{:.1} %, {:.1} %] ({:.0} %)",
        ci.lower_bound * 100.0,
        ci.upper_bound * 100.0,
        ci.confidence_level * 100.0
    )
}

fn estimate_text(estimate: &ProportionEstimate) -> String {
    format!(
        "{}/{} = {:.1} % {}",
        estimate.count,
        estimate.total,
        estimate.proportion * 100.0,
        interval_text(&estimate.confidence_interval)
    )
}
