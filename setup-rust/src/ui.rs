use anyhow::{anyhow, Result};
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub header: String,
    pub body: String,
}

impl Dialog {
    pub fn new(
        title: impl Into<String>,
        header: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            header: header.into(),
            body: body.into(),
        }
    }

    pub fn text(&self) -> String {
        format!("{}\n\n{}", self.header, self.body)
    }
}

/// What the pipeline may ask of the user. Both calls block until answered.
pub trait Prompt {
    fn confirm(&self, dialog: Dialog) -> Result<bool>;
    fn error(&self, dialog: Dialog) -> Result<()>;
}

/// Shows dialogs; only ever called from the thread running [`UiLoop::serve`].
pub trait DialogBackend {
    fn confirm(&self, dialog: &Dialog) -> bool;
    fn error(&self, dialog: &Dialog);
}

enum UiRequest {
    Confirm(Dialog, Sender<bool>),
    Error(Dialog, Sender<()>),
}

/// Requesting side of the dialog channel, handed to the setup thread.
#[derive(Clone)]
pub struct UiHandle {
    requests: Sender<UiRequest>,
}

/// Serving side of the dialog channel, owned by the main thread.
pub struct UiLoop {
    requests: Receiver<UiRequest>,
}

pub fn channel() -> (UiHandle, UiLoop) {
    let (tx, rx) = mpsc::channel();
    (UiHandle { requests: tx }, UiLoop { requests: rx })
}

impl UiHandle {
    fn ask<T>(&self, request: impl FnOnce(Sender<T>) -> UiRequest) -> Result<T> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.requests
            .send(request(reply_tx))
            .map_err(|_| anyhow!("dialog thread is not running"))?;
        reply_rx
            .recv()
            .map_err(|_| anyhow!("dialog closed without an answer"))
    }
}

impl Prompt for UiHandle {
    fn confirm(&self, dialog: Dialog) -> Result<bool> {
        self.ask(|reply| UiRequest::Confirm(dialog, reply))
    }

    fn error(&self, dialog: Dialog) -> Result<()> {
        self.ask(|reply| UiRequest::Error(dialog, reply))
    }
}

impl UiLoop {
    /// Answers requests until every [`UiHandle`] is dropped.
    pub fn serve(self, backend: &dyn DialogBackend) {
        for request in self.requests {
            match request {
                UiRequest::Confirm(dialog, reply) => {
                    let accepted = backend.confirm(&dialog);
                    debug!(title = %dialog.title, accepted, "confirmation answered");
                    let _ = reply.send(accepted);
                }
                UiRequest::Error(dialog, reply) => {
                    backend.error(&dialog);
                    let _ = reply.send(());
                }
            }
        }
    }
}

/// Native message boxes.
pub struct NativeDialogs;

impl DialogBackend for NativeDialogs {
    fn confirm(&self, dialog: &Dialog) -> bool {
        let result = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Info)
            .set_title(&dialog.title)
            .set_description(dialog.text())
            .set_buttons(rfd::MessageButtons::OkCancel)
            .show();
        matches!(result, rfd::MessageDialogResult::Ok)
    }

    fn error(&self, dialog: &Dialog) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(&dialog.title)
            .set_description(dialog.text())
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::thread;

    struct ScriptedBackend {
        answer: bool,
        shown: RefCell<Vec<String>>,
    }

    impl DialogBackend for ScriptedBackend {
        fn confirm(&self, dialog: &Dialog) -> bool {
            self.shown.borrow_mut().push(format!("confirm:{}", dialog.title));
            self.answer
        }

        fn error(&self, dialog: &Dialog) {
            self.shown.borrow_mut().push(format!("error:{}", dialog.title));
        }
    }

    #[test]
    fn requests_are_answered_on_serving_thread() {
        let (handle, ui_loop) = channel();
        let worker = thread::spawn(move || {
            let accepted = handle
                .confirm(Dialog::new("Install", "header", "body"))
                .unwrap();
            handle.error(Dialog::new("Failed", "header", "body")).unwrap();
            accepted
        });

        let backend = ScriptedBackend {
            answer: true,
            shown: RefCell::new(Vec::new()),
        };
        ui_loop.serve(&backend);

        assert!(worker.join().unwrap());
        assert_eq!(
            backend.shown.into_inner(),
            vec!["confirm:Install".to_string(), "error:Failed".to_string()]
        );
    }

    #[test]
    fn refusal_is_returned() {
        let (handle, ui_loop) = channel();
        let worker = thread::spawn(move || handle.confirm(Dialog::new("t", "h", "b")).unwrap());
        ui_loop.serve(&ScriptedBackend {
            answer: false,
            shown: RefCell::new(Vec::new()),
        });
        assert!(!worker.join().unwrap());
    }

    #[test]
    fn confirm_fails_when_loop_is_gone() {
        let (handle, ui_loop) = channel();
        drop(ui_loop);
        let err = handle.confirm(Dialog::new("t", "h", "b")).unwrap_err();
        assert!(err.to_string().contains("dialog thread is not running"));
    }

    #[test]
    fn dialog_text_puts_header_first() {
        let dialog = Dialog::new("t", "Node.js not found", "Install it?");
        assert_eq!(dialog.text(), "Node.js not found\n\nInstall it?");
    }
}
