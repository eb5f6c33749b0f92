//! 音色库选择对话框

use egui::*;

/// 提供可选音色库名称的外部浏览器
pub trait BankBrowser {
    fn bank_names(&self) -> Vec<String>;
}

impl BankBrowser for Vec<String> {
    fn bank_names(&self) -> Vec<String> {
        self.clone()
    }
}

impl BankBrowser for [&str] {
    fn bank_names(&self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BankDialogAction {
    Pick(String),
    Cancel,
}

/// 不区分大小写的子串匹配，空过滤条件保留全部
pub fn filter_banks(names: &[String], filter: &str) -> Vec<String> {
    let needle = filter.trim().to_lowercase();
    names
        .iter()
        .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub struct BankDialog<'a> {
    filter: &'a mut String,
    banks: Vec<String>,
    is_used: &'a dyn Fn(&str) -> bool,
}

impl<'a> BankDialog<'a> {
    pub fn new(filter: &'a mut String, banks: Vec<String>, is_used: &'a dyn Fn(&str) -> bool) -> Self {
        Self { filter, banks, is_used }
    }

    /// 以模态窗口显示，背后的网格在关闭前不响应输入
    pub fn show(self, ctx: &Context) -> Option<BankDialogAction> {
        let mut action = None;
        let modal = Modal::new(Id::new("drums_bank_dialog")).show(ctx, |ui| {
            ui.set_width(260.0);
            ui.heading("Add drum track");
            ui.label("Pick a MIDI bank:");
            ui.horizontal(|ui| {
                ui.label("🔍");
                ui.text_edit_singleline(&mut *self.filter);
            });
            ui.add_space(6.0);

            let visible = filter_banks(&self.banks, self.filter.as_str());
            ScrollArea::vertical()
                .max_height(240.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    if visible.is_empty() {
                        ui.weak("No matching banks");
                    }
                    for name in visible {
                        let used = (self.is_used)(&name);
                        let response = ui
                            .add_enabled(!used, Button::new(&name).frame(false))
                            .on_disabled_hover_text("Already in this song");
                        if response.clicked() {
                            action = Some(BankDialogAction::Pick(name));
                        }
                    }
                });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    action = Some(BankDialogAction::Cancel);
                }
            });
        });

        // 点击背景或按 Escape 视为取消
        if action.is_none() && modal.should_close() {
            action = Some(BankDialogAction::Cancel);
        }
        action
    }
}
