//! Process exit statuses and the message printed for each

use flightmap_core::ItineraryError;
use std::process::ExitCode;

/// Bad command line, for every role
pub const USAGE: u8 = 1;

pub trait ExitStatus: Copy {
    fn code(self) -> u8;

    /// Printed to stderr when the process ends with this status
    fn message(self) -> Option<&'static str>;

    fn exit(self) -> ExitCode {
        if let Some(message) = self.message() {
            eprintln!("{}", message);
        }
        ExitCode::from(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperExit {
    Normal = 0,
    Fatal = 1,
}

impl ExitStatus for MapperExit {
    fn code(self) -> u8 {
        self as u8
    }

    fn message(self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Fatal => Some("Mapper stopped serving"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlExit {
    Normal = 0,
    InvalidField = 2,
    InvalidPort = 3,
    RegistryUnreachable = 4,
    ListenFailed = 5,
}

impl ExitStatus for ControlExit {
    fn code(self) -> u8 {
        self as u8
    }

    fn message(self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::InvalidField => Some("Invalid char in parameter"),
            Self::InvalidPort => Some("Invalid port"),
            Self::RegistryUnreachable => Some("Can not connect to map"),
            Self::ListenFailed => Some("Can not listen"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RocExit {
    Normal = 0,
    InvalidMapperPort = 2,
    MapperRequired = 3,
    MapperUnreachable = 4,
    Unresolved = 5,
    VisitFailed = 6,
}

impl ExitStatus for RocExit {
    fn code(self) -> u8 {
        self as u8
    }

    fn message(self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::InvalidMapperPort => Some("Invalid mapper port"),
            Self::MapperRequired => Some("Mapper required"),
            Self::MapperUnreachable => Some("Failed to connect to mapper"),
            Self::Unresolved => Some("No map entry for destination"),
            Self::VisitFailed => Some("Failed to connect to at least one destination"),
        }
    }
}

impl From<&ItineraryError> for RocExit {
    fn from(err: &ItineraryError) -> Self {
        match err {
            ItineraryError::RegistryRequired => Self::MapperRequired,
            ItineraryError::RegistryUnreachable(_) => Self::MapperUnreachable,
            ItineraryError::Unresolved(_) => Self::Unresolved,
            ItineraryError::VisitFailed(_) => Self::VisitFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roc_codes() {
        assert_eq!(RocExit::from(&ItineraryError::RegistryRequired).code(), 3);
        assert_eq!(
            RocExit::from(&ItineraryError::RegistryUnreachable("refused".to_string())).code(),
            4
        );
        assert_eq!(RocExit::from(&ItineraryError::Unresolved(vec![])).code(), 5);
        assert_eq!(RocExit::from(&ItineraryError::VisitFailed(vec![])).code(), 6);
        assert_eq!(RocExit::Normal.message(), None);
    }

    #[test]
    fn test_control_codes() {
        assert_eq!(ControlExit::InvalidField.code(), 2);
        assert_eq!(ControlExit::InvalidPort.code(), 3);
        assert_eq!(
            ControlExit::RegistryUnreachable.message(),
            Some("Can not connect to map")
        );
    }
}
