use crate::statics;
use crate::{LoadedModel, ModelTree, NodeId, Selection};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use tracing::{debug, error};

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 600.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(ModellerApp::default()))),
    )
}

/// A modal popup. `close_app` ends the session once the user dismisses it.
#[derive(Debug, Clone, PartialEq)]
struct Message {
    title: &'static str,
    text: String,
    is_error: bool,
    close_app: bool,
}

impl Message {
    fn info(title: &'static str, text: String) -> Self {
        Self {
            title,
            text,
            is_error: false,
            close_app: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            title: statics::EN_WINDOW_ERROR,
            text,
            is_error: true,
            close_app: false,
        }
    }

    fn fatal(title: &'static str, text: String, is_error: bool) -> Self {
        Self {
            title,
            text,
            is_error,
            close_app: true,
        }
    }
}

fn loaded_message(file_name: &str) -> String {
    format!("{file_name} {}", statics::EN_SUFFIX_LOADED)
}

fn saved_message(file_name: &str) -> String {
    format!("{file_name} {}", statics::EN_SUFFIX_SAVED)
}

/// Window state: the loaded model (owned) plus the pending popup.
#[derive(Default)]
struct ModellerApp {
    model: Option<LoadedModel>,
    started: bool,
    message: Option<Message>,
}

impl ModellerApp {
    fn open_at_startup(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title(statics::EN_DIALOG_OPEN_TITLE)
            .add_filter(statics::EN_FILTER_BIM, &["bim"])
            .add_filter(statics::EN_FILTER_ALL, &["*"])
            .pick_file();

        let Some(path) = picked else {
            self.message = Some(Message::fatal(
                statics::EN_WINDOW_NO_FILE,
                statics::EN_NO_FILE_SELECTED.to_string(),
                false,
            ));
            return;
        };

        match LoadedModel::load_path(&path) {
            Ok(model) => {
                self.message = Some(Message::info(
                    statics::EN_WINDOW_FILE_LOADED,
                    loaded_message(&model.file_name()),
                ));
                self.model = Some(model);
            }
            Err(e) => {
                let e = anyhow::Error::from(e);
                error!("{e:#}");
                self.message = Some(Message::fatal(
                    statics::EN_WINDOW_ERROR,
                    format!("{} {e:#}", statics::EN_PREFIX_LOAD_FAILED),
                    true,
                ));
            }
        }
    }

    fn save_file(&mut self) {
        let Some(model) = self.model.as_mut() else {
            return;
        };

        self.message = Some(match model.save() {
            Ok(()) => Message::info(
                statics::EN_WINDOW_FILE_SAVED,
                saved_message(&model.file_name()),
            ),
            Err(e) => Message::error(format!(
                "{} {:#}",
                statics::EN_PREFIX_SAVE_FAILED,
                anyhow::Error::from(e)
            )),
        });
    }

    fn commit_edit(&mut self) {
        let Some(model) = self.model.as_mut() else {
            return;
        };

        if let Err(e) = model.commit_buffer() {
            let path = model
                .session()
                .map(|s| s.path().to_string())
                .unwrap_or_default();
            self.message = Some(Message::error(format!(
                "{} {path}: {e}",
                statics::EN_PREFIX_UPDATE_FAILED
            )));
        }
    }

    fn select_node(&mut self, id: NodeId) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        if model.select(id) == Selection::NotEditable {
            debug!(node = id.index(), "selection has no editable field");
        }
    }

    fn render_message(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.message else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(message.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                if message.is_error {
                    ui.colored_label(egui::Color32::RED, &message.text);
                } else {
                    ui.label(&message.text);
                }
                if ui.button(statics::EN_BTN_OK).clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            let close_app = message.close_app;
            self.message = None;
            if close_app {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}

/// What the user did in the tree panel this frame.
#[derive(Default)]
struct TreeEvents {
    clicked: Option<NodeId>,
    toggled: Vec<(NodeId, bool)>,
}

fn render_tree_node(
    ui: &mut egui::Ui,
    tree: &ModelTree,
    id: NodeId,
    selected: Option<NodeId>,
    events: &mut TreeEvents,
) {
    let Some(node) = tree.node(id) else {
        return;
    };

    if node.children().is_empty() {
        if ui.selectable_label(selected == Some(id), node.label()).clicked() {
            events.clicked = Some(id);
        }
        return;
    }

    let resp = egui::CollapsingHeader::new(node.label())
        .id_salt(id.index())
        .default_open(node.is_expanded())
        .show(ui, |ui| {
            for child in node.children() {
                render_tree_node(ui, tree, *child, selected, events);
            }
        });
    if resp.header_response.clicked() {
        events.clicked = Some(id);
    }
    let open = resp.body_returned.is_some();
    if open != node.is_expanded() {
        events.toggled.push((id, open));
    }
}

/// Detail form for the selected field. Returns `true` when the edit box was left with changed text.
fn render_detail_panel(ui: &mut egui::Ui, model: &mut LoadedModel) -> bool {
    ui.heading(statics::EN_HEADING_DETAIL);
    ui.separator();

    let shown = model
        .session()
        .and_then(|s| model.tree.node(s.node()))
        .and_then(|n| n.value_text())
        .map(str::to_string);

    let Some(session) = model.session_mut() else {
        ui.label(statics::EN_SELECT_LEAF);
        return false;
    };

    let path_text = session.path().to_string();
    let kind_text = session.original_kind().name();
    let key = session.key().to_string();
    let mut commit = false;
    let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;

    ui.push_id("detail_table", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(180.0).resizable(true))
            .column(Column::remainder().resizable(true))
            .header(row_h, |mut header| {
                header.col(|ui| {
                    ui.strong(statics::EN_COL_PROPERTY);
                });
                header.col(|ui| {
                    ui.strong(statics::EN_COL_VALUE);
                });
            })
            .body(|mut body| {
                body.row(row_h, |mut row| {
                    row.col(|ui| {
                        ui.label(statics::EN_ROW_PATH);
                    });
                    row.col(|ui| {
                        ui.monospace(&path_text);
                    });
                });
                body.row(row_h, |mut row| {
                    row.col(|ui| {
                        ui.label(statics::EN_ROW_TYPE);
                    });
                    row.col(|ui| {
                        ui.label(kind_text);
                    });
                });
                body.row(row_h, |mut row| {
                    row.col(|ui| {
                        ui.strong(&key);
                    });
                    row.col(|ui| {
                        let resp = ui.add(
                            egui::TextEdit::singleline(session.text_mut())
                                .desired_width(ui.available_width()),
                        );
                        // Enter and focus loss both finish the edit.
                        if resp.lost_focus() && shown.as_deref() != Some(session.text()) {
                            commit = true;
                        }
                    });
                });
            });
    });

    commit
}

impl eframe::App for ModellerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.started {
            self.started = true;
            self.open_at_startup();
        }

        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::CTRL, egui::Key::S)) {
            self.save_file();
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                let has_model = self.model.is_some();
                if ui
                    .add_enabled(has_model, egui::Button::new(statics::EN_BTN_SAVE))
                    .clicked()
                {
                    self.save_file();
                }

                if let Some(model) = &self.model {
                    ui.separator();
                    ui.label(model.source_path.display().to_string());
                    if model.dirty {
                        ui.colored_label(egui::Color32::YELLOW, statics::EN_BADGE_DIRTY);
                    }
                }
            });
        });

        let mut events = TreeEvents::default();
        egui::SidePanel::left("tree_panel")
            .resizable(true)
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.heading(statics::EN_HEADING_TREE);
                ui.separator();
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        if let Some(model) = &self.model {
                            let selected = model.session().map(|s| s.node());
                            let root = model.tree.root();
                            render_tree_node(ui, &model.tree, root, selected, &mut events);
                        }
                    });
            });

        let mut commit = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(model) = self.model.as_mut() {
                commit = render_detail_panel(ui, model);
            }
        });

        // A pending edit lands before a new selection replaces the session.
        if commit {
            self.commit_edit();
        }
        if let Some(model) = self.model.as_mut() {
            for (id, open) in events.toggled {
                model.tree.set_expanded(id, open);
            }
        }
        if let Some(id) = events.clicked {
            self.select_node(id);
        }

        self.render_message(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::{Message, loaded_message, saved_message};
    use crate::statics;

    #[test]
    fn status_messages_name_the_file() {
        assert_eq!(loaded_message("Model.bim"), "Model.bim loaded successfully.");
        assert_eq!(saved_message("Model.bim"), "Model.bim saved successfully.");
    }

    #[test]
    fn only_fatal_messages_close_the_app() {
        assert!(!Message::info(statics::EN_WINDOW_FILE_LOADED, String::new()).close_app);
        assert!(!Message::error(String::new()).close_app);

        let no_file = Message::fatal(
            statics::EN_WINDOW_NO_FILE,
            statics::EN_NO_FILE_SELECTED.to_string(),
            false,
        );
        assert!(no_file.close_app);
        assert!(!no_file.is_error);
    }
}
