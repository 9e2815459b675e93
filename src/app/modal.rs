//! Confirmation dialog state machine: `Closed → Open → (Processing) → Closed`.

/// What pressing "confirm" does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Remote delete; the dialog stays up in `Processing` until the outcome arrives.
    DeleteCampaign(String),
    RemoveMission(String),
    ClearMissions,
    /// Informational dialog, confirm only dismisses it.
    Acknowledge,
}

impl ConfirmAction {
    pub fn is_async(&self) -> bool {
        matches!(self, ConfirmAction::DeleteCampaign(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalConfig {
    pub title: String,
    pub message: String,
    pub danger: bool,
    pub show_cancel: bool,
    pub action: ConfirmAction,
}

impl ModalConfig {
    pub fn delete_campaign(id: impl Into<String>) -> Self {
        Self {
            title: "EXCLUIR CAMPANHA?".into(),
            message: "Esta ação removerá permanentemente esta campanha e todos os seus pontos. Confirmar?"
                .into(),
            danger: true,
            show_cancel: true,
            action: ConfirmAction::DeleteCampaign(id.into()),
        }
    }

    pub fn remove_mission(id: impl Into<String>) -> Self {
        Self {
            title: "EXCLUIR MISSÃO?".into(),
            message: "Isso removerá esta missão e todas as regras de pontuação dela.".into(),
            danger: true,
            show_cancel: true,
            action: ConfirmAction::RemoveMission(id.into()),
        }
    }

    pub fn clear_missions() -> Self {
        Self {
            title: "LIMPAR TUDO?".into(),
            message: "Isso apagará todas as missões da lista atual.".into(),
            danger: true,
            show_cancel: true,
            action: ConfirmAction::ClearMissions,
        }
    }

    /// Validation / informational notice with a single OK button.
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            title: "ATENÇÃO".into(),
            message: message.into(),
            danger: false,
            show_cancel: false,
            action: ConfirmAction::Acknowledge,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    Closed,
    Open(ModalConfig),
    Processing(ModalConfig),
}

impl Modal {
    /// Show a dialog. Refused while a confirmed action is still in flight.
    pub fn open(&mut self, cfg: ModalConfig) -> bool {
        if self.is_processing() {
            return false;
        }
        *self = Modal::Open(cfg);
        true
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::Closed)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, Modal::Processing(_))
    }

    pub fn config(&self) -> Option<&ModalConfig> {
        match self {
            Modal::Closed => None,
            Modal::Open(cfg) | Modal::Processing(cfg) => Some(cfg),
        }
    }

    /// Press confirm. Returns the action to carry out, or `None` when confirm is
    /// unavailable (closed, or already processing).
    pub fn confirm(&mut self) -> Option<ConfirmAction> {
        match std::mem::take(self) {
            Modal::Open(cfg) => {
                let action = cfg.action.clone();
                if action.is_async() {
                    *self = Modal::Processing(cfg);
                }
                Some(action)
            }
            other => {
                *self = other;
                None
            }
        }
    }

    /// Cancel button or backdrop. Disabled while processing.
    pub fn cancel(&mut self) -> bool {
        match self {
            Modal::Open(_) => {
                *self = Modal::Closed;
                true
            }
            _ => false,
        }
    }

    /// The in-flight action resolved (either way).
    pub fn finish(&mut self) {
        *self = Modal::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_closes_open_dialog() {
        let mut m = Modal::Closed;
        assert!(m.open(ModalConfig::clear_missions()));
        assert!(m.cancel());
        assert_eq!(m, Modal::Closed);
    }

    #[test]
    fn async_confirm_enters_processing_and_blocks_repeat() {
        let mut m = Modal::Closed;
        m.open(ModalConfig::delete_campaign("c1"));
        assert_eq!(m.confirm(), Some(ConfirmAction::DeleteCampaign("c1".into())));
        assert!(m.is_processing());

        // Second confirm and cancel are both disabled while the request is in flight.
        assert_eq!(m.confirm(), None);
        assert!(!m.cancel());
        assert!(m.is_processing());

        m.finish();
        assert_eq!(m, Modal::Closed);
    }

    #[test]
    fn sync_confirm_closes_immediately() {
        let mut m = Modal::Closed;
        m.open(ModalConfig::remove_mission("m1"));
        assert_eq!(m.confirm(), Some(ConfirmAction::RemoveMission("m1".into())));
        assert_eq!(m, Modal::Closed);
    }

    #[test]
    fn cannot_replace_processing_dialog() {
        let mut m = Modal::Closed;
        m.open(ModalConfig::delete_campaign("c1"));
        m.confirm();
        assert!(!m.open(ModalConfig::notice("x")));
        assert!(m.is_processing());
    }

    #[test]
    fn closed_dialog_ignores_input() {
        let mut m = Modal::Closed;
        assert_eq!(m.confirm(), None);
        assert!(!m.cancel());
    }

    #[test]
    fn notice_has_no_cancel() {
        let cfg = ModalConfig::notice("Por favor");
        assert!(!cfg.show_cancel);
        assert!(!cfg.danger);
        assert_eq!(cfg.action, ConfirmAction::Acknowledge);
    }
}
