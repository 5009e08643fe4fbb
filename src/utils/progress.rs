use crate::models::{Notice, NoticeLevel};

pub type ProgressFn = dyn Fn(&Notice) + Send + Sync;

/// Emits progress lines and advisory warnings to the log and, when set, to
/// a caller-supplied callback.
#[derive(Default)]
pub struct Reporter {
    on_notice: Option<Box<ProgressFn>>,
}

impl Reporter {
    pub fn new(on_notice: impl Fn(&Notice) + Send + Sync + 'static) -> Self {
        Self {
            on_notice: Some(Box::new(on_notice)),
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.emit(NoticeLevel::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.emit(NoticeLevel::Warning, message);
    }

    fn emit(&self, level: NoticeLevel, message: String) {
        if let Some(on_notice) = &self.on_notice {
            on_notice(&Notice { level, message });
        }
    }
}
