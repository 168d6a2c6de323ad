//! Typed publish/subscribe events emitted by the status board

use leafcam_codec::UiSettings;

use crate::model::{ResolutionInfo, StatusSnapshot, SystemInfo, TechnicalSettings};

/// Which section of the snapshot an event concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Technical,
    Ui,
    System,
    Resolution,
    /// A full reload completed; carries the whole snapshot
    All,
}

/// A status board notification with its payload
///
/// Payloads are copies of board state at publish time - holding on to one
/// never aliases the live snapshot.
#[derive(Debug, Clone)]
pub enum StatusEvent {
    Technical(TechnicalSettings),
    Ui(UiSettings),
    System(SystemInfo),
    Resolution(ResolutionInfo),
    All(StatusSnapshot),
}

impl StatusEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            StatusEvent::Technical(_) => EventKind::Technical,
            StatusEvent::Ui(_) => EventKind::Ui,
            StatusEvent::System(_) => EventKind::System,
            StatusEvent::Resolution(_) => EventKind::Resolution,
            StatusEvent::All(_) => EventKind::All,
        }
    }

    /// UI settings carried by this event, if any
    ///
    /// Both `Ui` and `All` events carry them; view layers usually only care
    /// about those two.
    pub fn ui_settings(&self) -> Option<&UiSettings> {
        match self {
            StatusEvent::Ui(ui) => Some(ui),
            StatusEvent::All(snapshot) => Some(&snapshot.ui),
            _ => None,
        }
    }
}
